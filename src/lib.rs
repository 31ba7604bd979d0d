mod macros;

pub mod ast;
pub mod cli;
pub mod diagnostics;
pub mod lexer;
pub mod parser;
pub mod passes;
pub mod span;

use std::cell::RefCell;
use std::path::PathBuf;

use anyhow::{Result, anyhow};

use crate::{
    diagnostics::DiagnosticCollector,
    passes::{PassManager, observers::NontrivialParamAdvisor},
    span::sourcemaps::SourceMapManager,
};

pub struct DiagnosticsContext {
    pub collector: RefCell<DiagnosticCollector>,
}

thread_local! {
    pub static DIAGNOSTICS: DiagnosticsContext = DiagnosticsContext {
        collector: RefCell::new(DiagnosticCollector::new()),
    };
    pub static SOURCE_MAPS: RefCell<SourceMapManager> =
        RefCell::new(SourceMapManager::default());
    pub static ENABLE_PRINTING: RefCell<bool> = const { RefCell::new(false) };
}

/// Runs the advisory pipeline over one preprocessed translation unit.
///
/// Registers the source with the source-map manager, tokenizes and parses
/// it, then drives the default pass pipeline with the non-trivial-parameter
/// advisor registered. Diagnostics land in the thread-local collector.
pub fn check_file(source: String, path: PathBuf) -> Result<()> {
    let file_id = SOURCE_MAPS.with(|sm| sm.borrow_mut().add_source(source, path));

    let tokens = SOURCE_MAPS.with(|sm| {
        let maps = sm.borrow();
        let map = maps
            .get_source(file_id)
            .ok_or_else(|| anyhow!("source map not found for file id {file_id}"))?;
        lexer::tokenize(map.content(), file_id)
    })?;

    let unit = parser::parse(tokens)?;

    let mut passes = PassManager::with_default_passes();
    passes.register_observer(Box::new(NontrivialParamAdvisor));
    passes.run(&unit);

    Ok(())
}
