use std::fmt::{Debug, Formatter};

/// `Position` represents a zero-based line and zero-based column in a file.
///
/// # Note
///
/// Both fields are 0-based everywhere inside the crate: in [Mapping] inputs
/// to the generator and in the decoded entry tables of the consumer. The
/// consumer's lookup API is the one deliberate exception, taking and
/// returning 1-based coordinates; see
/// [mapping_for_line](crate::SourceMapConsumer::mapping_for_line).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl From<(u32, u32)> for Position {
    fn from((line, column): (u32, u32)) -> Self {
        Self::new(line, column)
    }
}

/// A position in a named original source file.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SourceLocation {
    pub file: String,
    pub position: Position,
}

/// One mapping event fed to the [SourceMapGenerator](crate::SourceMapGenerator):
/// a generated position, optionally correlated with an original source
/// position and an original identifier name.
///
/// A `Mapping` without source information is insufficiently specified; the
/// generator drops it silently (callers routinely probe with partial
/// information).
#[derive(Clone, Eq, PartialEq)]
pub struct Mapping {
    generated: Position,
    source: Option<SourceLocation>,
    name: Option<String>,
}

impl Debug for Mapping {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.generated.line, self.generated.column)?;
        if let Some(source) = &self.source {
            write!(
                f,
                " -> {}:{}:{}",
                source.file, source.position.line, source.position.column,
            )?;
            if let Some(name) = &self.name {
                write!(f, " ({})", name)?;
            }
        }
        Ok(())
    }
}

impl Mapping {
    pub fn new(generated_line: u32, generated_col: u32) -> Self {
        Self {
            generated: Position {
                line: generated_line,
                column: generated_col,
            },
            source: None,
            name: None,
        }
    }

    pub fn with_source(
        self,
        file: impl Into<String>,
        source_line: u32,
        source_col: u32,
    ) -> Self {
        Self {
            source: Some(SourceLocation {
                file: file.into(),
                position: Position::new(source_line, source_col),
            }),
            ..self
        }
    }

    pub fn with_name(self, name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..self
        }
    }
}

impl Mapping {
    /// Returns the generated position of the mapping.
    #[inline]
    pub fn generated(&self) -> Position {
        self.generated
    }

    /// Returns the original source location, if any.
    #[inline]
    pub fn source(&self) -> Option<&SourceLocation> {
        self.source.as_ref()
    }

    /// Returns the original identifier name, if any.
    #[inline]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub(crate) fn into_parts(self) -> (Position, Option<SourceLocation>, Option<String>) {
        (self.generated, self.source, self.name)
    }
}

/// The result of a consumer lookup: a location in an original source file.
///
/// `line` and `column` are **1-based**, matching the convention of stack
/// traces and devtools panels.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct OriginalMapping {
    pub source: String,
    pub line: u32,
    pub column: u32,
    pub name: Option<String>,
}

/// A reverse-lookup result: one generated location that maps to the queried
/// original line, together with the original location recorded there.
///
/// `generated_line` and `generated_column` are **1-based**, like the
/// coordinates of the [OriginalMapping] they pair with.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ReverseMapping {
    pub generated_line: u32,
    pub generated_column: u32,
    pub original: OriginalMapping,
}
