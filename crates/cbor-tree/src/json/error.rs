use thiserror::Error;

/// Text-decode failures. `line` is 1-based, `column` 0-based, both
/// pointing at the construct that could not be read; any failure aborts
/// the whole parse with no partial tree.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JsonError {
    #[error("{line}:{column} unexpected character `{found}`")]
    UnexpectedCharacter { found: char, line: usize, column: usize },
    #[error("{line}:{column} unexpected end of input")]
    UnexpectedEnd { line: usize, column: usize },
    #[error("{line}:{column} expected {expected}")]
    Expected {
        expected: &'static str,
        line: usize,
        column: usize,
    },
    #[error("{line}:{column} unterminated string")]
    UnterminatedString { line: usize, column: usize },
    #[error("{line}:{column} line break inside string")]
    LineBreakInString { line: usize, column: usize },
    #[error("{line}:{column} invalid escape sequence")]
    BadEscape { line: usize, column: usize },
    #[error("{line}:{column} utf-16 surrogate pairing error")]
    SurrogateError { line: usize, column: usize },
    #[error("{line}:{column} invalid number literal")]
    BadNumber { line: usize, column: usize },
    #[error("{line}:{column} unterminated block comment")]
    UnterminatedComment { line: usize, column: usize },
}
