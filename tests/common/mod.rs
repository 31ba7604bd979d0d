use std::path::PathBuf;

use parmnote::{
    check_file,
    diagnostics::{DiagnosticCollector, Level},
};

/// One translation unit run end-to-end through the pipeline, with the
/// collected diagnostics pulled back out for assertions.
pub struct Scenario {
    name: String,
    source: String,
    path: PathBuf,
}

impl Scenario {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            source: String::new(),
            path: PathBuf::from("main.c"),
        }
    }

    pub fn source(mut self, source: &str) -> Self {
        self.source = source.trim().to_string();
        self
    }

    pub fn path(mut self, path: &str) -> Self {
        self.path = PathBuf::from(path);
        self
    }

    pub fn run(self) -> Report {
        parmnote::DIAGNOSTICS.with(|d| {
            *d.collector.borrow_mut() = DiagnosticCollector::new().with_exit_on_fatal(false);
        });

        let mut report = Report {
            name: self.name,
            notes: Vec::new(),
            warnings: Vec::new(),
            errors: Vec::new(),
        };

        if let Err(err) = check_file(self.source, self.path) {
            report.errors.push(err.to_string());
            return report;
        }

        parmnote::DIAGNOSTICS.with(|d| {
            let collector = d.collector.borrow();
            for diagnostic in collector.get_all() {
                match diagnostic.level() {
                    Level::Note => report.notes.push(Note {
                        file: diagnostic
                            .location()
                            .map(|l| l.file.clone())
                            .unwrap_or_default(),
                        line: diagnostic.location().map(|l| l.line).unwrap_or(0),
                        column: diagnostic.location().map(|l| l.column).unwrap_or(0),
                        message: diagnostic.message().to_string(),
                        context: diagnostic.context().map(|c| c.name.to_string()),
                    }),
                    Level::Warning => report.warnings.push(diagnostic.message().to_string()),
                    Level::Error | Level::Fatal => {
                        report.errors.push(diagnostic.message().to_string())
                    }
                }
            }
        });

        report
    }
}

pub struct Note {
    pub file: PathBuf,
    pub line: usize,
    pub column: usize,
    pub message: String,
    pub context: Option<String>,
}

pub struct Report {
    name: String,
    pub notes: Vec<Note>,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl Report {
    pub fn assert_clean(&self) -> &Self {
        assert!(
            self.errors.is_empty(),
            "[{}] unexpected errors: {:?}",
            self.name,
            self.errors
        );
        self
    }

    pub fn assert_note_count(&self, expected: usize) -> &Self {
        assert_eq!(
            self.notes.len(),
            expected,
            "[{}] expected {} notes, got {:?}",
            self.name,
            expected,
            self.notes.iter().map(|n| &n.message).collect::<Vec<_>>()
        );
        self
    }

    pub fn assert_no_notes(&self) -> &Self {
        self.assert_note_count(0)
    }

    pub fn assert_note_at(&self, file: &str, line: usize) -> &Self {
        assert!(
            self.notes
                .iter()
                .any(|n| n.file == PathBuf::from(file) && n.line == line),
            "[{}] no note at {}:{}, notes: {:?}",
            self.name,
            file,
            line,
            self.notes
                .iter()
                .map(|n| format!("{}:{}", n.file.display(), n.line))
                .collect::<Vec<_>>()
        );
        self
    }

    pub fn assert_warning(&self, message: &str) -> &Self {
        assert!(
            self.warnings.iter().any(|w| w == message),
            "[{}] missing warning {:?}, warnings: {:?}",
            self.name,
            message,
            self.warnings
        );
        self
    }

    pub fn assert_no_warnings(&self) -> &Self {
        assert!(
            self.warnings.is_empty(),
            "[{}] unexpected warnings: {:?}",
            self.name,
            self.warnings
        );
        self
    }
}
