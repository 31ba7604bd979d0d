pub mod widgets;

use std::{
    collections::HashMap,
    fmt::{self, Display, Formatter},
    path::PathBuf,
};

use colored::Colorize;

use crate::{
    diagnostics::widgets::{CodeWidget, HighlightType, InfoWidget, LocationWidget, Widget},
    span::SourceLocation,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Note,
    Warning,
    Error,
    Fatal,
}

impl Display for Level {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Level::Note => write!(f, "{}", "note".blue().bold()),
            Level::Warning => write!(f, "{}", "warning".yellow().bold()),
            Level::Error => write!(f, "{}", "error".red().bold()),
            Level::Fatal => write!(f, "{}", "fatal".red().bold()),
        }
    }
}

/// The function a diagnostic was produced in, announced once above the
/// function's first diagnostic the way compilers do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionContext {
    pub name: Box<str>,
    pub file: PathBuf,
}

#[derive(Debug)]
pub struct Diagnostic {
    level: Level,
    message: Box<str>,
    location: Option<SourceLocation>,
    context: Option<FunctionContext>,
    widgets: Vec<Box<dyn Widget>>,
}

impl Diagnostic {
    pub fn new(level: Level, message: impl Into<Box<str>>) -> Self {
        Self {
            level,
            message: message.into(),
            location: None,
            context: None,
            widgets: Vec::new(),
        }
    }

    pub fn with_location(mut self, location: SourceLocation) -> Self {
        let highlight = match self.level {
            Level::Note => HighlightType::Note,
            Level::Warning => HighlightType::Warning,
            Level::Error | Level::Fatal => HighlightType::Error,
        };

        self.widgets.push(Box::new(LocationWidget::new(&location)));
        if let Ok(code) = CodeWidget::new(location.span, location.file_id, highlight) {
            self.widgets.push(Box::new(code));
        }

        self.location = Some(location);
        self
    }

    pub fn with_info(mut self, content: impl Into<Box<str>>) -> Self {
        let pad = self
            .location
            .as_ref()
            .map(|loc| loc.line.to_string().len())
            .unwrap_or(0);
        self.widgets.push(Box::new(InfoWidget::new(pad, content)));
        self
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn location(&self) -> Option<&SourceLocation> {
        self.location.as_ref()
    }

    pub fn context(&self) -> Option<&FunctionContext> {
        self.context.as_ref()
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if let Some(context) = &self.context {
            writeln!(
                f,
                "{}: In function '{}':",
                context.file.display(),
                context.name
            )?;
        }

        writeln!(f, "{}: {}", self.level, self.message.bold())?;

        for widget in &self.widgets {
            widget.render(f)?;
            writeln!(f)?;
        }

        Ok(())
    }
}

#[derive(Debug)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
    max_errors: usize,
    exit_on_fatal: bool,
    context: Option<FunctionContext>,
    announced: bool,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
            max_errors: 100,
            exit_on_fatal: true,
            context: None,
            announced: false,
        }
    }

    pub fn with_max_errors(mut self, max_errors: usize) -> Self {
        self.max_errors = max_errors;
        self
    }

    pub fn with_exit_on_fatal(mut self, exit_on_fatal: bool) -> Self {
        self.exit_on_fatal = exit_on_fatal;
        self
    }

    /// Marks the function subsequent diagnostics belong to. The context is
    /// attached to the first diagnostic added while it is active.
    pub fn enter_function(&mut self, context: FunctionContext) {
        self.context = Some(context);
        self.announced = false;
    }

    pub fn leave_function(&mut self) {
        self.context = None;
        self.announced = false;
    }

    pub fn add(&mut self, mut diagnostic: Diagnostic) {
        if !self.announced
            && let Some(context) = &self.context
        {
            diagnostic.context = Some(context.clone());
            self.announced = true;
        }

        if diagnostic.level == Level::Fatal && self.exit_on_fatal {
            eprint!("{}", diagnostic);
            std::process::exit(1);
        }

        self.diagnostics.push(diagnostic);

        // Notes and warnings do not count toward the cap.
        let error_count = self
            .diagnostics
            .iter()
            .filter(|d| d.level >= Level::Error)
            .count();
        if error_count >= self.max_errors && self.exit_on_fatal {
            let max_error = builders::fatal(format!(
                "Too many errors ({}), stopping",
                self.max_errors
            ));
            eprint!("{}", max_error);
            std::process::exit(1);
        }
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.level >= Level::Error)
    }

    pub fn has_warnings(&self) -> bool {
        self.diagnostics.iter().any(|d| d.level == Level::Warning)
    }

    pub fn can_continue(&self) -> bool {
        !self.diagnostics.iter().any(|d| d.level == Level::Fatal)
    }

    pub fn get_all(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn get_at_level(&self, level: Level) -> Vec<&Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.level == level)
            .collect()
    }

    pub fn counts(&self) -> HashMap<Level, usize> {
        let mut counts = HashMap::new();
        for diagnostic in &self.diagnostics {
            *counts.entry(diagnostic.level).or_insert(0) += 1;
        }
        counts
    }

    pub fn clear(&mut self) {
        self.diagnostics.clear();
        self.context = None;
        self.announced = false;
    }

    pub fn print_all(&self) {
        for diagnostic in &self.diagnostics {
            eprint!("{}", diagnostic);
        }
    }
}

impl Default for DiagnosticCollector {
    fn default() -> Self {
        Self::new()
    }
}

pub mod builders {
    use super::*;

    pub fn note(message: impl Into<Box<str>>) -> Diagnostic {
        Diagnostic::new(Level::Note, message)
    }

    pub fn warning(message: impl Into<Box<str>>) -> Diagnostic {
        Diagnostic::new(Level::Warning, message)
    }

    pub fn error(message: impl Into<Box<str>>) -> Diagnostic {
        Diagnostic::new(Level::Error, message)
    }

    pub fn fatal(message: impl Into<Box<str>>) -> Diagnostic {
        Diagnostic::new(Level::Fatal, message)
    }
}

/// The informational-note primitive observers report through: builds a
/// note at `location` and hands it to the thread-local collector.
pub fn inform(location: SourceLocation, message: impl Into<Box<str>>) {
    let diagnostic = builders::note(message).with_location(location);
    crate::DIAGNOSTICS.with(|d| d.collector.borrow_mut().add(diagnostic));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::{FileId, Span};

    fn dummy_location(file: &str) -> SourceLocation {
        SourceLocation {
            file: PathBuf::from(file),
            line: 3,
            column: 7,
            system_header: None,
            file_id: FileId(999),
            span: Span::new(10, 14),
        }
    }

    #[test]
    fn test_levels_are_ordered() {
        assert!(Level::Note < Level::Warning);
        assert!(Level::Warning < Level::Error);
        assert!(Level::Error < Level::Fatal);
    }

    #[test]
    fn test_collector_counts_and_queries() {
        let mut collector = DiagnosticCollector::new().with_exit_on_fatal(false);

        collector.add(builders::note("note message"));
        collector.add(builders::warning("warning message"));
        collector.add(builders::error("error message"));

        assert_eq!(collector.get_all().len(), 3);
        assert!(collector.has_errors());
        assert!(collector.has_warnings());
        assert!(collector.can_continue());
        assert_eq!(collector.counts().get(&Level::Note), Some(&1));
        assert_eq!(collector.get_at_level(Level::Warning).len(), 1);
    }

    #[test]
    fn test_notes_do_not_fail_a_run() {
        let mut collector = DiagnosticCollector::new().with_exit_on_fatal(false);
        collector.add(builders::note("advisory only"));
        assert!(!collector.has_errors());
    }

    #[test]
    fn test_diagnostic_keeps_its_location() {
        let diagnostic =
            builders::note("parameter type is not trivial").with_location(dummy_location("a.c"));

        let location = diagnostic.location().unwrap();
        assert_eq!(location.file, PathBuf::from("a.c"));
        assert_eq!(location.line, 3);
    }

    #[test]
    fn test_function_context_announced_once() {
        let mut collector = DiagnosticCollector::new().with_exit_on_fatal(false);
        collector.enter_function(FunctionContext {
            name: "f".into(),
            file: PathBuf::from("a.c"),
        });

        collector.add(builders::note("first"));
        collector.add(builders::note("second"));
        collector.leave_function();
        collector.add(builders::note("outside"));

        let all = collector.get_all();
        assert!(all[0].context().is_some());
        assert!(all[1].context().is_none());
        assert!(all[2].context().is_none());
    }
}
