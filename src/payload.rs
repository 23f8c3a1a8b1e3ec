use simd_json_derive::Serialize;
use std::io;
use std::io::Write;

/// Wire-level DTO parsed from a source map JSON buffer.
///
/// Borrows every string from the input buffer; the consumer converts it into
/// owned, validated state.
#[derive(Debug, simd_json_derive::Deserialize)]
#[simd_json(rename_all = "camelCase")]
pub(crate) struct RawSourceMap<'a> {
    pub version: Option<u32>,
    pub file: Option<&'a str>,
    pub line_count: Option<u32>,
    pub source_root: Option<&'a str>,
    pub sources: Option<Vec<Option<&'a str>>>,
    pub sources_content: Option<Vec<Option<&'a str>>>,
    pub names: Option<Vec<&'a str>>,
    pub mappings: Option<&'a str>,
}

/// The serializable source map object produced by
/// [generate](crate::SourceMapGenerator::generate).
///
/// `sources` and `names` are in interning (first-seen) order; ids in the
/// `mappings` string index into them. `sources_content`, when present, is
/// aligned positionally with `sources`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SourceMapPayload {
    pub version: u32,
    pub file: Option<String>,
    pub line_count: Option<u32>,
    pub source_root: Option<String>,
    pub sources: Vec<String>,
    pub sources_content: Option<Vec<Option<String>>>,
    pub names: Vec<String>,
    pub mappings: String,
}

impl SourceMapPayload {
    pub fn write<W>(&self, w: &mut W) -> io::Result<()>
    where
        W: Write,
    {
        w.write_all(br#"{"version":3"#)?;

        if let Some(file) = self.file.as_deref() {
            w.write_all(br#","file":"#)?;
            file.json_write(w)?;
        }

        if let Some(line_count) = self.line_count {
            w.write_all(br#","lineCount":"#)?;
            line_count.json_write(w)?;
        }

        if let Some(source_root) = self.source_root.as_deref() {
            w.write_all(br#","sourceRoot":"#)?;
            source_root.json_write(w)?;
        }

        w.write_all(br#","sources":"#)?;
        self.sources.json_write(w)?;

        if let Some(sources_content) = &self.sources_content {
            w.write_all(br#","sourcesContent":"#)?;
            sources_content.json_write(w)?;
        }

        if !self.names.is_empty() {
            w.write_all(br#","names":"#)?;
            self.names.json_write(w)?;
        }

        w.write_all(br#","mappings":"#)?;
        self.mappings.json_write(w)?;

        w.write_all(br#"}"#)
    }

    #[inline]
    pub fn to_vec(&self) -> io::Result<Vec<u8>> {
        let mut v = Vec::with_capacity(1024);
        self.write(&mut v)?;
        Ok(v)
    }

    #[inline]
    pub fn to_string(&self) -> io::Result<String> {
        // SAFETY: write only emits valid UTF-8
        self.to_vec()
            .map(|v| unsafe { String::from_utf8_unchecked(v) })
    }
}
