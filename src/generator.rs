use crate::interner::StringIndex;
use crate::mapping::{Mapping, Position, SourceLocation};
use crate::payload::SourceMapPayload;
use crate::vlq::VlqEncoder;
use crate::{BuildError, BuildResult};
use std::collections::HashMap;

/// A mapping retained by the generator; source information is guaranteed
/// present (source-less mappings were dropped at `add_mapping`).
#[derive(Debug, Clone, Eq, PartialEq)]
struct RetainedMapping {
    generated: Position,
    source_file: String,
    original: Position,
    name: Option<String>,
}

/// Accumulates [Mapping] events and serializes them into a v3
/// [SourceMapPayload].
///
/// Mappings may be added in any order; [generate](Self::generate) sorts them
/// by generated position before delta-encoding, so ordering is never an
/// error. `generate` is a pure read: calling it twice without intervening
/// mutation produces byte-identical payloads.
///
/// # Example
///
/// ```
/// use tracemap::{Mapping, SourceMapGenerator};
///
/// let mut generator = SourceMapGenerator::new();
/// generator.set_file("out.js");
/// generator.add_mapping(Mapping::new(0, 0).with_source("a.js", 0, 0));
/// generator.add_mapping(Mapping::new(0, 8).with_source("a.js", 2, 4).with_name("foo"));
/// let payload = generator.generate();
/// assert_eq!(payload.mappings, "AAAA,QAEIA;");
/// ```
#[derive(Debug, Default)]
pub struct SourceMapGenerator {
    file: Option<String>,
    source_root: Option<String>,
    line_count: Option<u32>,
    mappings: Vec<RetainedMapping>,
    sources_content: HashMap<String, String>,
    // starting position of the generated output within a larger buffer
    offset_line: u32,
    offset_column: u32,
    // generated lines occupied by an output wrapper prefix
    prefix_lines: u32,
}

impl SourceMapGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the `file` entry of the generated payload.
    pub fn set_file(&mut self, file: impl Into<String>) {
        self.file = Some(file.into());
    }

    /// Sets the `sourceRoot` entry of the generated payload.
    ///
    /// The value is round-tripped only; it is never applied to the `sources`
    /// entries.
    pub fn set_source_root(&mut self, source_root: impl Into<String>) {
        self.source_root = Some(source_root.into());
    }

    /// Overrides the `lineCount` entry of the generated payload. Without an
    /// override, `lineCount` is one past the highest mapped generated line.
    pub fn set_line_count(&mut self, line_count: u32) {
        self.line_count = Some(line_count);
    }

    /// Declares that generated code is being appended to an existing buffer
    /// starting at the given position, rather than at line 0, column 0.
    /// Subsequently added mappings are shifted accordingly; the column shift
    /// applies only to mappings on generated line 0.
    pub fn set_starting_position(&mut self, line: u32, column: u32) {
        self.offset_line = line;
        self.offset_column = column;
    }

    /// Declares a wrapper prefix prepended to the generated output before it
    /// is written, so that `lineCount` accounts for the prefix's lines.
    pub fn set_wrapper_prefix(&mut self, prefix: &str) {
        self.prefix_lines = prefix.bytes().filter(|&b| b == b'\n').count() as u32;
    }

    /// Records a mapping event.
    ///
    /// A mapping without source information is insufficiently specified and
    /// is dropped silently; this is not an error.
    pub fn add_mapping(&mut self, mapping: Mapping) {
        let (generated, source, name) = mapping.into_parts();
        let Some(SourceLocation { file, position }) = source else {
            return;
        };

        let generated = if self.offset_line == 0 && self.offset_column == 0 {
            generated
        } else {
            // Mappings on the first generated line are shifted by the number
            // of characters already on the last line of the buffer.
            Position::new(
                generated.line + self.offset_line,
                if generated.line > 0 {
                    generated.column
                } else {
                    generated.column + self.offset_column
                },
            )
        };

        self.mappings.push(RetainedMapping {
            generated,
            source_file: file,
            original: position,
            name,
        });
    }

    /// Records the full text of an original source file for embedding in the
    /// payload's `sourcesContent`.
    pub fn add_sources_content(
        &mut self,
        source: impl Into<String>,
        content: impl Into<String>,
    ) -> BuildResult<()> {
        let source = source.into();
        if self.sources_content.contains_key(&source) {
            return Err(BuildError::DuplicateSourceContent(source));
        }
        self.sources_content.insert(source, content.into());
        Ok(())
    }

    /// Clears all accumulated mappings, source-content records, and position
    /// adjustments so the generator can be reused. The `file`, `sourceRoot`,
    /// and `lineCount` settings are kept.
    pub fn reset(&mut self) {
        self.mappings.clear();
        self.sources_content.clear();
        self.offset_line = 0;
        self.offset_column = 0;
        self.prefix_lines = 0;
    }

    /// Serializes the accumulated mappings into a [SourceMapPayload].
    pub fn generate(&self) -> SourceMapPayload {
        let mut order: Vec<&RetainedMapping> = self.mappings.iter().collect();
        order.sort_by(|a, b| {
            (a.generated, a.source_file.as_str(), a.original, a.name.as_deref()).cmp(&(
                b.generated,
                b.source_file.as_str(),
                b.original,
                b.name.as_deref(),
            ))
        });

        let max_line = order.iter().map(|m| m.generated.line + 1).max().unwrap_or(0);
        let line_count = self.line_count.unwrap_or(max_line + self.prefix_lines);

        let mut sources = StringIndex::default();
        let mut names = StringIndex::default();

        let mut buf = Vec::with_capacity(order.len() * 6 + 1);
        let mut prev_generated_line = 0;
        let mut prev_generated_col = 0;
        let mut prev_source_id = 0;
        let mut prev_source_line = 0;
        let mut prev_source_col = 0;
        let mut prev_name_id = 0;
        let mut last_emitted: Option<Position> = None;

        for mapping in order {
            let generated = mapping.generated;

            // Equal generated positions collapse into the first in sort order.
            if last_emitted == Some(generated) {
                continue;
            }

            if generated.line != prev_generated_line {
                prev_generated_col = 0;
                while generated.line != prev_generated_line {
                    buf.push(b';');
                    prev_generated_line += 1;
                }
            } else if last_emitted.is_some() {
                buf.push(b',');
            }

            let mut encoder = VlqEncoder::new(&mut buf);

            encoder.encode(i64::from(generated.column) - i64::from(prev_generated_col));
            prev_generated_col = generated.column;

            let source_id = sources.intern(&mapping.source_file);
            encoder.encode(i64::from(source_id) - i64::from(prev_source_id));
            prev_source_id = source_id;

            encoder.encode(i64::from(mapping.original.line) - i64::from(prev_source_line));
            prev_source_line = mapping.original.line;

            encoder.encode(i64::from(mapping.original.column) - i64::from(prev_source_col));
            prev_source_col = mapping.original.column;

            if let Some(name) = &mapping.name {
                let name_id = names.intern(name);
                encoder.encode(i64::from(name_id) - i64::from(prev_name_id));
                prev_name_id = name_id;
            }

            last_emitted = Some(generated);
        }

        buf.push(b';');

        let sources = sources.into_items();
        let sources_content = if self.sources_content.is_empty() {
            None
        } else {
            Some(
                sources
                    .iter()
                    .map(|source| self.sources_content.get(source).cloned())
                    .collect(),
            )
        };

        SourceMapPayload {
            version: 3,
            file: self.file.clone(),
            line_count: Some(line_count),
            source_root: self.source_root.clone(),
            sources,
            sources_content,
            names: names.into_items(),
            // SAFETY: the encoder only emits base64 digits and separators
            mappings: unsafe { String::from_utf8_unchecked(buf) },
        }
    }
}
