use std::{collections::HashMap, path::PathBuf};

use lazy_static::lazy_static;
use regex::Regex;

use crate::span::{FileId, SourceLocation, Span};

lazy_static! {
    // GCC linemarkers (`# 12 "file.h" 1 3`) and plain `#line` directives.
    static ref LINEMARKER: Regex =
        Regex::new(r#"^#\s*(?:line\s+)?(\d+)\s+"([^"]*)"\s*([0-9 \t]*)$"#).unwrap();
}

/// A linemarker recorded while scanning a physical file. Every physical
/// line after `physical_line` (up to the next directive) belongs to the
/// logical `file`, starting at logical `line`.
#[derive(Debug, Clone)]
struct LineDirective {
    physical_line: usize,
    file: PathBuf,
    line: usize,
    system_header: bool,
}

#[derive(Debug, Clone)]
pub struct SourceMap {
    content: Box<str>,
    path: PathBuf,
    line_starts: Vec<u32>,
    directives: Vec<LineDirective>,
}

impl SourceMap {
    pub fn new(content: String, path: PathBuf) -> Self {
        let mut line_starts = vec![0u32];
        for (i, c) in content.char_indices() {
            if c == '\n' {
                line_starts.push((i + 1) as u32);
            }
        }

        let mut directives = Vec::new();
        for (idx, line) in content.lines().enumerate() {
            if let Some(caps) = LINEMARKER.captures(line.trim_end()) {
                let logical_line = caps[1].parse().unwrap_or(1);
                let flags = caps[3].split_whitespace().collect::<Vec<_>>();
                directives.push(LineDirective {
                    physical_line: idx + 1,
                    file: PathBuf::from(&caps[2]),
                    line: logical_line,
                    system_header: flags.contains(&"3"),
                });
            }
        }

        Self {
            content: content.into_boxed_str(),
            path,
            line_starts,
            directives,
        }
    }

    pub fn line_column(&self, byte_offset: u32) -> (usize, usize) {
        let offset = byte_offset as usize;
        if offset >= self.content.len() {
            return (self.line_starts.len(), 1);
        }

        let result = self.line_starts.binary_search(&(offset as u32));
        let line_idx = match result {
            Ok(i) => i,
            Err(i) => i - 1,
        };

        let line_start = self.line_starts[line_idx] as usize;
        let column = offset.saturating_sub(line_start);
        (line_idx + 1, column + 1)
    }

    pub fn get_line(&self, line: usize) -> Option<&str> {
        if line == 0 || line > self.line_starts.len() {
            return None;
        }
        let start = self.line_starts[line - 1] as usize;
        let end = if line < self.line_starts.len() {
            self.line_starts[line] as usize
        } else {
            self.content.len()
        };
        let line_content = self.content.get(start..end)?;
        if let Some(stripped) = line_content.strip_suffix('\n') {
            Some(stripped)
        } else {
            Some(line_content)
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Logical (file, line, system-header) coordinates for a physical line,
    /// honoring the latest linemarker above it. Files without linemarkers
    /// resolve to the physical path with no system-header verdict.
    fn logical_line(&self, physical_line: usize) -> (PathBuf, usize, Option<bool>) {
        let idx = self
            .directives
            .partition_point(|d| d.physical_line < physical_line);
        match idx.checked_sub(1).map(|i| &self.directives[i]) {
            Some(d) => (
                d.file.clone(),
                d.line + (physical_line - d.physical_line - 1),
                Some(d.system_header),
            ),
            None => (self.path.clone(), physical_line, None),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SourceMapManager {
    source_maps: HashMap<FileId, SourceMap>,
    next_id: FileId,
}

impl SourceMapManager {
    pub fn add_source(&mut self, content: String, path: PathBuf) -> FileId {
        let id = self.next_id;
        let source_map = SourceMap::new(content, path);
        self.source_maps.insert(id, source_map);
        self.next_id = FileId(self.next_id.0 + 1);
        id
    }

    pub fn get_source(&self, id: FileId) -> Option<&SourceMap> {
        self.source_maps.get(&id)
    }

    pub fn location(&self, id: FileId, span: Span) -> Option<SourceLocation> {
        let map = self.source_maps.get(&id)?;
        let (physical_line, column) = map.line_column(span.start());
        let (file, line, system_header) = map.logical_line(physical_line);
        Some(SourceLocation {
            file,
            line,
            column,
            system_header,
            file_id: id,
            span,
        })
    }
}
