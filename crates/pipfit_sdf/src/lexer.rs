//! S-expression tokenizer for SDF.

use crate::error::SdfError;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    LParen,
    RParen,
    /// An atom, verbatim. Quoted segments keep their quotes, so
    /// `"a.b"/Q` is one atom.
    Atom(String),
}

pub(crate) struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub(crate) fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    pub(crate) fn pos(&self) -> usize {
        self.pos
    }

    fn bytes(&self) -> &'a [u8] {
        self.input.as_bytes()
    }

    fn skip_trivia(&mut self) {
        let bytes = self.bytes();
        while self.pos < bytes.len() {
            let ch = bytes[self.pos];
            if ch.is_ascii_whitespace() {
                self.pos += 1;
            } else if bytes[self.pos..].starts_with(b"//") {
                while self.pos < bytes.len() && bytes[self.pos] != b'\n' {
                    self.pos += 1;
                }
            } else if bytes[self.pos..].starts_with(b"/*") {
                self.pos += 2;
                while self.pos < bytes.len() && !bytes[self.pos..].starts_with(b"*/") {
                    self.pos += 1;
                }
                self.pos = (self.pos + 2).min(bytes.len());
            } else {
                break;
            }
        }
    }

    /// Steps over a quoted segment, closing quote included.
    fn skip_quoted(&mut self) -> Result<(), SdfError> {
        let bytes = self.bytes();
        self.pos += 1;
        loop {
            match bytes.get(self.pos) {
                None => return Err(SdfError::UnexpectedEof),
                Some(b'\\') => self.pos += 2,
                Some(b'"') => {
                    self.pos += 1;
                    return Ok(());
                }
                Some(_) => self.pos += 1,
            }
        }
    }

    /// Returns the next token and its starting byte offset.
    pub(crate) fn next_token(&mut self) -> Result<Option<(usize, Token)>, SdfError> {
        self.skip_trivia();
        let bytes = self.bytes();
        let start = self.pos;
        let Some(&ch) = bytes.get(start) else {
            return Ok(None);
        };
        let token = match ch {
            b'(' => {
                self.pos += 1;
                Token::LParen
            }
            b')' => {
                self.pos += 1;
                Token::RParen
            }
            _ => {
                while let Some(&c) = bytes.get(self.pos) {
                    match c {
                        b'\\' => self.pos += 2,
                        b'"' => self.skip_quoted()?,
                        b'(' | b')' => break,
                        c if c.is_ascii_whitespace() => break,
                        _ => self.pos += 1,
                    }
                }
                self.pos = self.pos.min(bytes.len());
                Token::Atom(self.input[start..self.pos].to_string())
            }
        };
        Ok(Some((start, token)))
    }

    pub(crate) fn peek_token(&mut self) -> Result<Option<Token>, SdfError> {
        let saved = self.pos;
        let tok = self.next_token()?;
        self.pos = saved;
        Ok(tok.map(|(_, t)| t))
    }
}
