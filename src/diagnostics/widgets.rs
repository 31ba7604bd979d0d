use std::fmt::{self, Debug, Formatter};
use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;

use crate::span::{FileId, SourceLocation, Span};

pub trait Widget: Debug {
    fn render(&self, f: &mut Formatter<'_>) -> fmt::Result;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HighlightType {
    Note,
    Warning,
    Error,
}

/// The `--> file:line:column` arrow, using the logical coordinates the
/// preprocessor reported.
#[derive(Debug, Clone)]
pub struct LocationWidget {
    line: usize,
    column: usize,
    file: PathBuf,
}

impl LocationWidget {
    pub fn new(location: &SourceLocation) -> Self {
        Self {
            line: location.line,
            column: location.column,
            file: location.file.clone(),
        }
    }

    pub fn from_raw(line: usize, column: usize, file: PathBuf) -> Self {
        Self { line, column, file }
    }
}

impl Widget for LocationWidget {
    fn render(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{} {}:{}:{}",
            " ".repeat(self.line.to_string().len()),
            "-->".purple(),
            self.file.display(),
            self.line,
            self.column
        )?;
        Ok(())
    }
}

/// The offending physical source line with a caret underline.
#[derive(Debug, Clone)]
pub struct CodeWidget {
    line: usize,
    column: usize,
    length: usize,
    code: Box<str>,
    highlight_type: HighlightType,
}

impl CodeWidget {
    pub fn new(span: Span, file_id: FileId, highlight_type: HighlightType) -> Result<Self> {
        let (line, column) = crate::SOURCE_MAPS.with(|sm| {
            let maps = sm.borrow();
            maps.get_source(file_id)
                .map(|map| map.line_column(span.start()))
                .ok_or_else(|| anyhow::anyhow!("source map not found for file id {file_id}"))
        })?;

        let code = crate::SOURCE_MAPS.with(|sm| {
            let maps = sm.borrow();
            maps.get_source(file_id)
                .and_then(|map| map.get_line(line))
                .unwrap_or("<failed to get line>")
                .to_string()
        });

        Ok(Self {
            line,
            column,
            length: span.len().max(1) as usize,
            highlight_type,
            code: code.into(),
        })
    }

    pub fn from_raw(
        line: usize,
        column: usize,
        length: usize,
        code: Box<str>,
        highlight_type: HighlightType,
    ) -> Self {
        Self {
            line,
            column,
            length,
            code,
            highlight_type,
        }
    }

    pub fn line(&self) -> usize {
        self.line
    }
}

impl Widget for CodeWidget {
    fn render(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let pad = self.line.to_string().len();

        writeln!(f, "{} {}", " ".repeat(pad), "|".purple())?;
        writeln!(
            f,
            "{} {} {}",
            self.line.to_string().purple(),
            "|".purple(),
            self.code
        )?;

        let underline =
            " ".repeat(self.column.saturating_sub(1)) + &"^".repeat(self.length.max(1));
        write!(
            f,
            "{} {} {}",
            " ".repeat(pad),
            "|".purple(),
            match self.highlight_type {
                HighlightType::Note => underline.blue().bold(),
                HighlightType::Warning => underline.yellow().bold(),
                HighlightType::Error => underline.red().bold(),
            }
        )?;

        Ok(())
    }
}

/// Supplementary `= note:` line under a diagnostic.
#[derive(Debug, Clone)]
pub struct InfoWidget {
    pad: usize,
    content: Box<str>,
}

impl InfoWidget {
    pub fn new(pad: usize, content: impl Into<Box<str>>) -> Self {
        Self {
            pad,
            content: content.into(),
        }
    }
}

impl Widget for InfoWidget {
    fn render(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} note: {}",
            " ".repeat(self.pad),
            "=".purple(),
            self.content
        )?;

        Ok(())
    }
}
