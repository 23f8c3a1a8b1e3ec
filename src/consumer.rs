use crate::mapping::{OriginalMapping, ReverseMapping};
use crate::payload::RawSourceMap;
use crate::splitter::MappingSplitter;
use crate::vlq::VlqDecoder;
use crate::{ParseError, ParseResult};
use simd_json_derive::Deserialize;
use std::collections::HashMap;
use std::sync::OnceLock;

/// A decoded segment within one generated line. A segment without a source
/// reference marks an unattributed range of generated text.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
struct Entry {
    generated_column: u32,
    source: Option<SourceRef>,
    name_id: Option<u32>,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
struct SourceRef {
    id: u32,
    line: u32,
    column: u32,
}

// original file -> original line (0-based) -> matches
type ReverseIndex = HashMap<String, HashMap<u32, Vec<ReverseMapping>>>;

/// Parses a v3 source map payload into queryable per-line entry tables.
///
/// Once constructed a consumer is read-only; the reverse index is built
/// lazily on the first [reverse_mappings](Self::reverse_mappings) call and
/// memoized, so concurrent reads are safe.
///
/// # Example
///
/// ```
/// use tracemap::SourceMapConsumer;
///
/// let json = br#"{"version":3,"file":"min.js","sources":["a.js"],"mappings":"AAAA;AACA;"}"#;
/// let consumer = SourceMapConsumer::from(json.to_vec()).unwrap();
/// let found = consumer.mapping_for_line(2, 1).unwrap();
/// assert_eq!((found.line, found.column), (2, 1));
/// ```
#[derive(Debug)]
pub struct SourceMapConsumer {
    file: String,
    source_root: Option<String>,
    line_count: Option<u32>,
    sources: Vec<String>,
    sources_content: Vec<Option<String>>,
    names: Vec<String>,
    // slot is None for generated lines without entries
    lines: Vec<Option<Vec<Entry>>>,
    reverse: OnceLock<ReverseIndex>,
}

impl SourceMapConsumer {
    /// Creates a consumer from a JSON buffer.
    #[inline]
    pub fn from(mut source: Vec<u8>) -> ParseResult<Self> {
        Self::from_slice(&mut source)
    }

    /// Creates a consumer from a JSON buffer slice.
    ///
    /// The slice is mutable to facilitate in-place replacement of escape
    /// characters in the JSON string.
    #[inline]
    pub fn from_slice(json: &mut [u8]) -> ParseResult<Self> {
        Self::from_raw(RawSourceMap::from_slice(json)?)
    }

    /// Creates a consumer from a JSON string; see [Self::from_slice].
    #[inline]
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(json: &mut str) -> ParseResult<Self> {
        Self::from_raw(RawSourceMap::from_str(json)?)
    }

    fn from_raw(raw: RawSourceMap) -> ParseResult<Self> {
        if !matches!(raw.version, Some(3)) {
            return Err(ParseError::UnsupportedVersion);
        }

        let file = match raw.file.map(str::trim).filter(|f| !f.is_empty()) {
            Some(file) => file.to_owned(),
            None => return Err(ParseError::InvalidFile),
        };

        let sources: Vec<String> = raw
            .sources
            .unwrap_or_default()
            .into_iter()
            .map(|s| s.unwrap_or_default().to_owned())
            .collect();

        let sources_content: Vec<Option<String>> = match raw.sources_content {
            Some(sources_content) => {
                if sources_content.len() != sources.len() {
                    return Err(ParseError::MismatchSourcesContent {
                        sources_len: sources.len() as u32,
                        sources_content_len: sources_content.len() as u32,
                    });
                }
                sources_content
                    .into_iter()
                    .map(|s| s.map(str::to_owned))
                    .collect()
            }
            None => vec![None; sources.len()],
        };

        let names: Vec<String> = raw
            .names
            .unwrap_or_default()
            .into_iter()
            .map(str::to_owned)
            .collect();

        let mut consumer = Self {
            file,
            source_root: raw.source_root.map(str::to_owned),
            line_count: raw.line_count,
            sources,
            sources_content,
            names,
            lines: Vec::new(),
            reverse: OnceLock::new(),
        };
        consumer.decode_mappings(raw.mappings.unwrap_or_default())?;
        Ok(consumer)
    }

    fn decode_mappings(&mut self, mappings: &str) -> ParseResult<()> {
        let mut decoder = VlqDecoder::new();
        let mut entries: Vec<Entry> = Vec::new();

        let mut generated_col: u32 = 0;
        // these four counters persist across generated lines
        let mut source_id: u32 = 0;
        let mut source_line: u32 = 0;
        let mut source_col: u32 = 0;
        let mut name_id: u32 = 0;

        for (segment, closes_line) in MappingSplitter::new(mappings) {
            if !segment.is_empty() {
                if let Some(line_count) = self.line_count {
                    let line = self.lines.len() as u32;
                    if line >= line_count {
                        return Err(ParseError::LineCountExceeded { line, line_count });
                    }
                }

                let nums = decoder.decode(segment)?;

                // a backwards generated column can only come from a negative
                // delta; entries within a line must be non-decreasing
                if nums[0] < 0 {
                    return Err(ParseError::UnorderedMappings);
                }
                generated_col = apply_delta(generated_col, nums[0], segment)?;

                let mut entry = Entry {
                    generated_column: generated_col,
                    source: None,
                    name_id: None,
                };

                if nums.len() >= 4 {
                    source_id = apply_delta(source_id, nums[1], segment)?;
                    if source_id >= self.sources.len() as u32 {
                        return Err(ParseError::UnknownSourceReference(source_id));
                    }

                    source_line = apply_delta(source_line, nums[2], segment)?;
                    source_col = apply_delta(source_col, nums[3], segment)?;

                    entry.source = Some(SourceRef {
                        id: source_id,
                        line: source_line,
                        column: source_col,
                    });

                    if nums.len() == 5 {
                        name_id = apply_delta(name_id, nums[4], segment)?;
                        if name_id >= self.names.len() as u32 {
                            return Err(ParseError::UnknownNameReference(name_id));
                        }
                        entry.name_id = Some(name_id);
                    }
                }

                entries.push(entry);
            }

            if closes_line {
                self.commit_line(&mut entries);
                generated_col = 0;
            }
        }

        // some encoders omit the trailing line separator
        if !entries.is_empty() {
            self.commit_line(&mut entries);
        }

        Ok(())
    }

    fn commit_line(&mut self, entries: &mut Vec<Entry>) {
        if entries.is_empty() {
            self.lines.push(None);
        } else {
            self.lines.push(Some(std::mem::take(entries)));
        }
    }
}

impl SourceMapConsumer {
    /// Returns the original mapping covering the given generated position,
    /// or `None` if the position precedes every mapping or falls in an
    /// unattributed range.
    ///
    /// `line` and `column` are **1-based**. If the generated line has no
    /// entries, or its first entry starts past `column`, the last entry of
    /// the nearest preceding non-empty line covers the position.
    pub fn mapping_for_line(&self, line: u32, column: u32) -> Option<OriginalMapping> {
        let line = line.checked_sub(1)? as usize;
        let column = column.checked_sub(1)?;

        if line >= self.lines.len() {
            return None;
        }

        let entries = match &self.lines[line] {
            Some(entries) if entries[0].generated_column <= column => entries,
            _ => return self.previous_mapping(line),
        };

        // rightmost entry with generated_column <= column
        let idx = entries.partition_point(|e| e.generated_column <= column) - 1;
        self.original_mapping(&entries[idx])
    }

    /// Returns the last mapping of the nearest non-empty line preceding
    /// `line`, or `None` if there is none.
    fn previous_mapping(&self, mut line: usize) -> Option<OriginalMapping> {
        loop {
            if line == 0 {
                return None;
            }
            line -= 1;
            if let Some(entries) = &self.lines[line] {
                return self.original_mapping(entries.last()?);
            }
        }
    }

    /// Returns the generated locations that map to the given original file
    /// and **1-based** line.
    ///
    /// A collection is returned because one original line commonly maps from
    /// several generated locations (e.g. an inlined function); each match
    /// carries the generated position alongside the recorded original
    /// location. The column is intentionally not refined further. An
    /// unrecorded line yields an empty slice, never a failure.
    pub fn reverse_mappings(
        &self,
        original_file: &str,
        line: u32,
        _column: u32,
    ) -> &[ReverseMapping] {
        let Some(line) = line.checked_sub(1) else {
            return &[];
        };
        self.reverse
            .get_or_init(|| self.build_reverse_index())
            .get(original_file)
            .and_then(|by_line| by_line.get(&line))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn build_reverse_index(&self) -> ReverseIndex {
        let mut index = ReverseIndex::new();

        for (line, entries) in self.lines.iter().enumerate() {
            let Some(entries) = entries else { continue };
            for entry in entries {
                let Some(source) = entry.source else { continue };
                let Some(original) = self.original_mapping(entry) else {
                    continue;
                };
                index
                    .entry(self.sources[source.id as usize].clone())
                    .or_default()
                    .entry(source.line)
                    .or_default()
                    .push(ReverseMapping {
                        generated_line: line as u32 + 1,
                        generated_column: entry.generated_column + 1,
                        original,
                    });
            }
        }

        index
    }

    fn original_mapping(&self, entry: &Entry) -> Option<OriginalMapping> {
        let source = entry.source?;
        Some(OriginalMapping {
            source: self.sources[source.id as usize].clone(),
            line: source.line + 1,
            column: source.column + 1,
            name: entry
                .name_id
                .map(|id| self.names[id as usize].clone()),
        })
    }
}

impl SourceMapConsumer {
    /// The distinct source files the payload declared, in payload order.
    #[inline]
    pub fn original_sources(&self) -> &[String] {
        &self.sources
    }

    #[inline]
    pub fn file(&self) -> &str {
        &self.file
    }

    #[inline]
    pub fn source_root(&self) -> Option<&str> {
        self.source_root.as_deref()
    }

    #[inline]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Embedded source texts, aligned positionally with
    /// [original_sources](Self::original_sources).
    #[inline]
    pub fn sources_content(&self) -> &[Option<String>] {
        &self.sources_content
    }
}

fn apply_delta(base: u32, delta: i64, segment: &str) -> ParseResult<u32> {
    i64::from(base)
        .checked_add(delta)
        .and_then(|value| u32::try_from(value).ok())
        .ok_or_else(|| ParseError::MappingMalformed(segment.to_owned()))
}
