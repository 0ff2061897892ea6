use std::fmt;

use winnow::error::ContextError;

/// A rejected decision expression: what the grammar expected, plus the byte
/// offset into the source where it stopped.
#[derive(Debug)]
pub struct ParseError {
    expected: ContextError,
    offset: usize,
}

impl ParseError {
    pub(crate) fn from_parse(err: winnow::error::ParseError<&str, ContextError>) -> Self {
        Self {
            offset: err.offset(),
            expected: err.into_inner(),
        }
    }

    /// Byte offset into the source at which parsing failed.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "parse error at offset {}", self.offset)?;
        let expected = self.expected.to_string();
        if !expected.is_empty() {
            write!(f, ": {expected}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}
