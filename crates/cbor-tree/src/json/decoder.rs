//! Text decoder: recursive descent over raw bytes with line:column
//! tracking for every diagnostic.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use super::error::JsonError;
use super::DATA_URI_PREFIX;
use crate::value::{NodeId, Tree};

/// Decodes one value from `text`. Trailing content after the value is
/// ignored.
pub fn decode(tree: &mut Tree, text: &[u8]) -> Result<NodeId, JsonError> {
    JsonDecoder::new(text).parse_value(tree)
}

pub struct JsonDecoder<'a> {
    source: &'a [u8],
    offset: usize,
    line: usize,
    column: usize,
}

impl<'a> JsonDecoder<'a> {
    pub fn new(source: &'a [u8]) -> Self {
        Self {
            source,
            offset: 0,
            line: 1,
            column: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.source.get(self.offset).copied()
    }

    fn peek_at(&self, ahead: usize) -> Option<u8> {
        self.source.get(self.offset + ahead).copied()
    }

    /// Advances over one non-line-break byte.
    fn bump(&mut self) {
        self.offset += 1;
        self.column += 1;
    }

    /// Advances over a line break (`\r\n`, `\r` or `\n`).
    fn bump_line(&mut self) {
        if self.peek() == Some(b'\r') && self.peek_at(1) == Some(b'\n') {
            self.offset += 2;
        } else {
            self.offset += 1;
        }
        self.line += 1;
        self.column = 0;
    }

    fn unexpected_end(&self) -> JsonError {
        JsonError::UnexpectedEnd {
            line: self.line,
            column: self.column,
        }
    }

    fn expected(&self, expected: &'static str) -> JsonError {
        JsonError::Expected {
            expected,
            line: self.line,
            column: self.column,
        }
    }

    fn skip_line_comment(&mut self) {
        self.bump();
        self.bump();
        while let Some(byte) = self.peek() {
            if byte == b'\r' || byte == b'\n' {
                self.bump_line();
                break;
            }
            self.bump();
        }
    }

    /// Block comments nest; running out of input before the matching
    /// `*/` is an error.
    fn skip_block_comment(&mut self) -> Result<(), JsonError> {
        let (line, column) = (self.line, self.column);
        self.bump();
        self.bump();
        loop {
            match (self.peek(), self.peek_at(1)) {
                (Some(b'/'), Some(b'*')) => self.skip_block_comment()?,
                (Some(b'*'), Some(b'/')) => {
                    self.bump();
                    self.bump();
                    return Ok(());
                }
                (Some(b'\r'), _) | (Some(b'\n'), _) => self.bump_line(),
                (Some(_), _) => self.bump(),
                (None, _) => return Err(JsonError::UnterminatedComment { line, column }),
            }
        }
    }

    fn skip_whitespace(&mut self) -> Result<(), JsonError> {
        loop {
            match (self.peek(), self.peek_at(1)) {
                (Some(b'/'), Some(b'/')) => self.skip_line_comment(),
                (Some(b'/'), Some(b'*')) => self.skip_block_comment()?,
                (Some(b'\r'), _) | (Some(b'\n'), _) => self.bump_line(),
                (Some(byte), _) if byte.is_ascii_whitespace() || byte == 0x0b => self.bump(),
                _ => return Ok(()),
            }
        }
    }

    pub fn parse_value(&mut self, tree: &mut Tree) -> Result<NodeId, JsonError> {
        self.skip_whitespace()?;
        match self.peek().ok_or_else(|| self.unexpected_end())? {
            b'{' => self.parse_object(tree),
            b'[' => self.parse_array(tree),
            b'"' => self.parse_string(tree),
            b't' => {
                self.keyword("true", "`true`")?;
                Ok(tree.new_boolean(true))
            }
            b'f' => {
                self.keyword("false", "`false`")?;
                Ok(tree.new_boolean(false))
            }
            b'n' => {
                self.keyword("null", "`null`")?;
                Ok(tree.new_null())
            }
            b'0'..=b'9' | b'-' | b'+' => self.parse_number(tree),
            other => Err(JsonError::UnexpectedCharacter {
                found: other as char,
                line: self.line,
                column: self.column,
            }),
        }
    }

    fn keyword(&mut self, word: &'static str, expected: &'static str) -> Result<(), JsonError> {
        for (i, byte) in word.bytes().enumerate() {
            if self.peek_at(i) != Some(byte) {
                return Err(self.expected(expected));
            }
        }
        for _ in 0..word.len() {
            self.bump();
        }
        Ok(())
    }

    fn parse_object(&mut self, tree: &mut Tree) -> Result<NodeId, JsonError> {
        self.bump();
        let container = tree.new_map();
        loop {
            self.skip_whitespace()?;
            match self.peek() {
                Some(b'}') if tree.container_empty(container) => {
                    self.bump();
                    return Ok(container);
                }
                Some(b'}') => return Err(self.expected("key-value pair")),
                Some(_) => {}
                None => return Err(self.unexpected_end()),
            }

            let key = self.parse_value(tree)?;
            if !tree.is_string(key) {
                return Err(self.expected("string as object key"));
            }

            self.skip_whitespace()?;
            if self.peek() == Some(b':') {
                self.bump();
            } else {
                return Err(self.expected("`:` as key-value separator"));
            }

            let value = self.parse_value(tree)?;
            let pair = tree.new_pair(key, value);
            tree.insert_tail(container, pair);

            self.skip_whitespace()?;
            match self.peek() {
                Some(b'}') => {
                    self.bump();
                    return Ok(container);
                }
                Some(b',') => self.bump(),
                Some(_) => return Err(self.expected("`,` or `}` in object")),
                None => return Err(self.unexpected_end()),
            }
        }
    }

    fn parse_array(&mut self, tree: &mut Tree) -> Result<NodeId, JsonError> {
        self.bump();
        let container = tree.new_array();
        loop {
            self.skip_whitespace()?;
            match self.peek() {
                Some(b']') if tree.container_empty(container) => {
                    self.bump();
                    return Ok(container);
                }
                Some(b']') => return Err(self.expected("array element")),
                Some(_) => {}
                None => return Err(self.unexpected_end()),
            }

            let element = self.parse_value(tree)?;
            tree.insert_tail(container, element);

            self.skip_whitespace()?;
            match self.peek() {
                Some(b']') => {
                    self.bump();
                    return Ok(container);
                }
                Some(b',') => self.bump(),
                Some(_) => return Err(self.expected("`,` or `]` in array")),
                None => return Err(self.unexpected_end()),
            }
        }
    }

    fn parse_string(&mut self, tree: &mut Tree) -> Result<NodeId, JsonError> {
        let (line, column) = (self.line, self.column);
        self.bump();
        let mut payload: Vec<u8> = Vec::new();
        loop {
            match self.peek() {
                None => return Err(JsonError::UnterminatedString { line, column }),
                Some(b'"') => {
                    self.bump();
                    break;
                }
                Some(b'\r') | Some(b'\n') => {
                    return Err(JsonError::LineBreakInString {
                        line: self.line,
                        column: self.column,
                    })
                }
                Some(b'\\') => self.parse_escape(&mut payload)?,
                Some(byte) => {
                    payload.push(byte);
                    self.bump();
                }
            }
        }
        // A data-URI string decodes back into the byte string it stands
        // for; anything else (including a URI with broken base64) stays
        // text.
        if let Some(b64) = payload.strip_prefix(DATA_URI_PREFIX.as_bytes()) {
            if let Ok(bytes) = STANDARD.decode(b64) {
                return Ok(tree.new_bytes(&bytes));
            }
        }
        Ok(tree.new_text_bytes(&payload))
    }

    fn parse_escape(&mut self, payload: &mut Vec<u8>) -> Result<(), JsonError> {
        let (line, column) = (self.line, self.column);
        self.bump();
        let escape = self.peek().ok_or_else(|| self.unexpected_end())?;
        let byte = match escape {
            b'r' => Some(b'\r'),
            b'n' => Some(b'\n'),
            b't' => Some(b'\t'),
            b'f' => Some(0x0c),
            b'b' => Some(0x08),
            b'"' => Some(b'"'),
            b'\\' => Some(b'\\'),
            b'/' => Some(b'/'),
            b'u' => None,
            _ => return Err(JsonError::BadEscape { line, column }),
        };
        if let Some(byte) = byte {
            payload.push(byte);
            self.bump();
            return Ok(());
        }
        self.bump();
        let high = self.read_hex4()?;
        let code = if (0xd800..=0xdbff).contains(&high) {
            // A high surrogate must be chased by an escaped low one.
            if self.peek() == Some(b'\\') && self.peek_at(1) == Some(b'u') {
                self.bump();
                self.bump();
                let low = self.read_hex4()?;
                if !(0xdc00..=0xdfff).contains(&low) {
                    return Err(JsonError::SurrogateError {
                        line: self.line,
                        column: self.column,
                    });
                }
                (((high & 0x3ff) << 10) | (low & 0x3ff)) + 0x10000
            } else {
                return Err(JsonError::SurrogateError {
                    line: self.line,
                    column: self.column,
                });
            }
        } else {
            high
        };
        // A lone low surrogate has no scalar value; substitute U+FFFD.
        let ch = char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER);
        let mut utf8 = [0u8; 4];
        payload.extend_from_slice(ch.encode_utf8(&mut utf8).as_bytes());
        Ok(())
    }

    fn read_hex4(&mut self) -> Result<u32, JsonError> {
        let mut out: u32 = 0;
        for _ in 0..4 {
            let byte = self.peek().ok_or_else(|| self.unexpected_end())?;
            let digit = match byte {
                b'0'..=b'9' => byte - b'0',
                b'a'..=b'f' => byte - b'a' + 10,
                b'A'..=b'F' => byte - b'A' + 10,
                _ => {
                    return Err(JsonError::UnexpectedCharacter {
                        found: byte as char,
                        line: self.line,
                        column: self.column,
                    })
                }
            };
            out = (out << 4) | digit as u32;
            self.bump();
        }
        Ok(out)
    }

    /// Greedy scan of the number alphabet, then integer parse with a
    /// float fallback.
    fn parse_number(&mut self, tree: &mut Tree) -> Result<NodeId, JsonError> {
        let (line, column) = (self.line, self.column);
        let start = self.offset;
        while let Some(byte) = self.peek() {
            match byte {
                b'+' | b'-' | b'.' | b'e' | b'E' | b'0'..=b'9' => self.bump(),
                _ => break,
            }
        }
        let literal = std::str::from_utf8(&self.source[start..self.offset])
            .map_err(|_| JsonError::BadNumber { line, column })?;
        if let Ok(integer) = literal.parse::<i64>() {
            Ok(tree.new_integer(integer))
        } else if let Ok(real) = literal.parse::<f64>() {
            Ok(tree.new_float(real))
        } else {
            Err(JsonError::BadNumber { line, column })
        }
    }
}
