use std::fs;
use std::process::ExitCode;

use clap::Parser;

use parmnote::{
    cli::Cli,
    diagnostics::{DiagnosticCollector, builders},
    logln,
};

fn main() -> ExitCode {
    let cli = Cli::parse();

    parmnote::ENABLE_PRINTING.with(|e| *e.borrow_mut() = !cli.quiet);
    parmnote::DIAGNOSTICS.with(|d| {
        *d.collector.borrow_mut() = DiagnosticCollector::new().with_max_errors(cli.max_errors);
    });

    for path in &cli.files {
        logln!("checking {}", path.display());

        let source = match fs::read_to_string(path) {
            Ok(source) => source,
            Err(err) => {
                parmnote::DIAGNOSTICS.with(|d| {
                    d.collector
                        .borrow_mut()
                        .add(builders::error(format!(
                            "failed to read {}: {err}",
                            path.display()
                        )));
                });
                continue;
            }
        };

        if let Err(err) = parmnote::check_file(source, path.clone()) {
            parmnote::DIAGNOSTICS.with(|d| {
                d.collector.borrow_mut().add(
                    builders::error(format!("{}: {err}", path.display()))
                        .with_info("input must be a preprocessed C translation unit"),
                );
            });
        }
    }

    let failed = parmnote::DIAGNOSTICS.with(|d| {
        let collector = d.collector.borrow();
        collector.print_all();
        collector.has_errors()
    });

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
