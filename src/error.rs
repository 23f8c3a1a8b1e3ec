use std::error::Error;

pub type ParseResult<T> = Result<T, ParseError>;
pub type BuildResult<T> = Result<T, BuildError>;

/// Errors raised while parsing a source map payload.
///
/// Every variant is fatal for the whole parse; no partial consumer is
/// ever returned.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ParseError {
    #[error("unsupported source map version")]
    UnsupportedVersion,
    #[error("file entry is missing or empty")]
    InvalidFile,
    #[error("source map syntax error: {0}")]
    Syntax(Box<dyn Error>),
    #[error("a mapping is malformed: \"{0}\"")]
    MappingMalformed(String),
    #[error("mappings are unordered")]
    UnorderedMappings,
    #[error("a mapping references unknown source #{0}")]
    UnknownSourceReference(u32),
    #[error("a mapping references unknown name #{0}")]
    UnknownNameReference(u32),
    #[error("mapping on generated line {line} exceeds declared line count {line_count}")]
    LineCountExceeded { line: u32, line_count: u32 },
    #[error(
        "source map has {} sources but {} sourcesContent entries",
        sources_len,
        sources_content_len
    )]
    MismatchSourcesContent {
        sources_len: u32,
        sources_content_len: u32,
    },
}

impl From<simd_json::Error> for ParseError {
    fn from(value: simd_json::Error) -> Self {
        Self::Syntax(Box::new(value))
    }
}

/// Errors raised while accumulating state in a [SourceMapGenerator](crate::SourceMapGenerator).
///
/// Insufficiently specified mappings passed to `add_mapping` are dropped
/// silently rather than reported here.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum BuildError {
    #[error("source content for \"{0}\" is already registered")]
    DuplicateSourceContent(String),
}
