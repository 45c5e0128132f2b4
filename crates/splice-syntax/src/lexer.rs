//! Lexer for Mica source text.
//!
//! Comments (`// ...`) and whitespace are trivia: the lexer skips them, and
//! because document edits are span-based text replacements, trivia outside a
//! replaced span always survives a rewrite untouched.

use crate::error::SyntaxError;
use crate::span::Span;
use crate::string_interner::StringInterner;
use crate::token::{Token, TokenKind};
use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;
use std::sync::Arc;

static KEYWORDS: Lazy<FxHashMap<&'static str, TokenKind>> = Lazy::new(|| {
    let mut map = FxHashMap::default();
    map.insert("fn", TokenKind::Fn);
    map.insert("extern", TokenKind::Extern);
    map.insert("class", TokenKind::Class);
    map.insert("static", TokenKind::Static);
    map.insert("let", TokenKind::Let);
    map.insert("prop", TokenKind::Prop);
    map.insert("if", TokenKind::If);
    map.insert("else", TokenKind::Else);
    map.insert("while", TokenKind::While);
    map.insert("for", TokenKind::For);
    map.insert("in", TokenKind::In);
    map.insert("return", TokenKind::Return);
    map.insert("this", TokenKind::This);
    map.insert("self", TokenKind::SelfKw);
    map.insert("as", TokenKind::As);
    map.insert("true", TokenKind::True);
    map.insert("false", TokenKind::False);
    map.insert("nil", TokenKind::Nil);
    map
});

pub struct Lexer<'src> {
    source: &'src str,
    bytes: &'src [u8],
    pos: usize,
    interner: Arc<StringInterner>,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str, interner: &Arc<StringInterner>) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            pos: 0,
            interner: Arc::clone(interner),
        }
    }

    pub fn tokenize(mut self) -> Result<Vec<Token>, SyntaxError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let is_eof = matches!(token.kind, TokenKind::Eof);
            tokens.push(token);
            if is_eof {
                return Ok(tokens);
            }
        }
    }

    fn next_token(&mut self) -> Result<Token, SyntaxError> {
        self.skip_trivia();

        let start = self.pos as u32;
        let Some(&byte) = self.bytes.get(self.pos) else {
            return Ok(Token::new(TokenKind::Eof, Span::new(start, start)));
        };

        let kind = match byte {
            b'(' => self.single(TokenKind::LParen),
            b')' => self.single(TokenKind::RParen),
            b'{' => self.single(TokenKind::LBrace),
            b'}' => self.single(TokenKind::RBrace),
            b'[' => self.single(TokenKind::LBracket),
            b']' => self.single(TokenKind::RBracket),
            b',' => self.single(TokenKind::Comma),
            b':' => self.single(TokenKind::Colon),
            b'+' => self.single(TokenKind::Plus),
            b'*' => self.single(TokenKind::Star),
            b'%' => self.single(TokenKind::Percent),
            b'.' => {
                if self.bytes[self.pos..].starts_with(b"...") {
                    self.pos += 3;
                    TokenKind::Ellipsis
                } else {
                    self.single(TokenKind::Dot)
                }
            }
            b'-' => {
                if self.peek_at(1) == Some(b'>') {
                    self.pos += 2;
                    TokenKind::Arrow
                } else {
                    self.single(TokenKind::Minus)
                }
            }
            b'=' => {
                if self.peek_at(1) == Some(b'=') {
                    self.pos += 2;
                    TokenKind::EqEq
                } else {
                    self.single(TokenKind::Eq)
                }
            }
            b'!' => {
                if self.peek_at(1) == Some(b'=') {
                    self.pos += 2;
                    TokenKind::NotEq
                } else {
                    self.single(TokenKind::Bang)
                }
            }
            b'<' => {
                if self.peek_at(1) == Some(b'=') {
                    self.pos += 2;
                    TokenKind::LtEq
                } else {
                    self.single(TokenKind::Lt)
                }
            }
            b'>' => {
                if self.peek_at(1) == Some(b'=') {
                    self.pos += 2;
                    TokenKind::GtEq
                } else {
                    self.single(TokenKind::Gt)
                }
            }
            b'&' => {
                if self.peek_at(1) == Some(b'&') {
                    self.pos += 2;
                    TokenKind::AndAnd
                } else {
                    return Err(SyntaxError::new(
                        "unexpected character `&`",
                        Span::new(start, start + 1),
                    ));
                }
            }
            b'|' => {
                if self.peek_at(1) == Some(b'|') {
                    self.pos += 2;
                    TokenKind::OrOr
                } else {
                    self.single(TokenKind::Pipe)
                }
            }
            b'/' => self.single(TokenKind::Slash),
            b'"' => self.lex_string(start)?,
            b'0'..=b'9' => self.lex_number(start)?,
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => self.lex_ident(),
            other => {
                return Err(SyntaxError::new(
                    format!("unexpected character `{}`", other as char),
                    Span::new(start, start + 1),
                ));
            }
        };

        Ok(Token::new(kind, Span::new(start, self.pos as u32)))
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.pos += 1;
        kind
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn skip_trivia(&mut self) {
        loop {
            match self.bytes.get(self.pos) {
                Some(b' ' | b'\t' | b'\r' | b'\n') => self.pos += 1,
                Some(b'/') if self.peek_at(1) == Some(b'/') => {
                    while self.pos < self.bytes.len() && self.bytes[self.pos] != b'\n' {
                        self.pos += 1;
                    }
                }
                _ => return,
            }
        }
    }

    fn lex_ident(&mut self) -> TokenKind {
        let start = self.pos;
        while matches!(
            self.bytes.get(self.pos),
            Some(b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'_')
        ) {
            self.pos += 1;
        }
        let text = &self.source[start..self.pos];
        if let Some(keyword) = KEYWORDS.get(text) {
            *keyword
        } else {
            TokenKind::Ident(self.interner.intern(text))
        }
    }

    fn lex_number(&mut self, start: u32) -> Result<TokenKind, SyntaxError> {
        let begin = self.pos;
        while matches!(self.bytes.get(self.pos), Some(b'0'..=b'9')) {
            self.pos += 1;
        }
        let mut is_float = false;
        // A `.` only continues a number when followed by a digit, so that
        // `1.method()` still lexes as member access.
        if self.bytes.get(self.pos) == Some(&b'.')
            && matches!(self.bytes.get(self.pos + 1), Some(b'0'..=b'9'))
        {
            is_float = true;
            self.pos += 1;
            while matches!(self.bytes.get(self.pos), Some(b'0'..=b'9')) {
                self.pos += 1;
            }
        }
        let text = &self.source[begin..self.pos];
        if is_float {
            text.parse::<f64>()
                .map(TokenKind::Float)
                .map_err(|_| SyntaxError::new("invalid float literal", Span::new(start, self.pos as u32)))
        } else {
            text.parse::<i64>()
                .map(TokenKind::Int)
                .map_err(|_| SyntaxError::new("integer literal out of range", Span::new(start, self.pos as u32)))
        }
    }

    fn lex_string(&mut self, start: u32) -> Result<TokenKind, SyntaxError> {
        self.pos += 1; // opening quote
        let mut value = String::new();
        loop {
            match self.bytes.get(self.pos) {
                None | Some(b'\n') => {
                    return Err(SyntaxError::new(
                        "unterminated string literal",
                        Span::new(start, self.pos as u32),
                    ));
                }
                Some(b'"') => {
                    self.pos += 1;
                    return Ok(TokenKind::Str(self.interner.intern(&value)));
                }
                Some(b'\\') => {
                    let escape = self.peek_at(1);
                    self.pos += 2;
                    match escape {
                        Some(b'n') => value.push('\n'),
                        Some(b't') => value.push('\t'),
                        Some(b'"') => value.push('"'),
                        Some(b'\\') => value.push('\\'),
                        _ => {
                            return Err(SyntaxError::new(
                                "invalid escape sequence",
                                Span::new((self.pos - 2) as u32, self.pos as u32),
                            ));
                        }
                    }
                }
                Some(_) => {
                    // Multi-byte characters are copied verbatim.
                    let ch_start = self.pos;
                    let ch = self.source[ch_start..].chars().next().unwrap();
                    value.push(ch);
                    self.pos += ch.len_utf8();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(source: &str) -> Vec<TokenKind> {
        let interner = Arc::new(StringInterner::new());
        Lexer::new(source, &interner)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn lexes_function_header() {
        let interner = Arc::new(StringInterner::new());
        let tokens = Lexer::new("fn add(a: Int) -> Int", &interner)
            .tokenize()
            .unwrap();
        assert!(matches!(tokens[0].kind, TokenKind::Fn));
        assert!(matches!(tokens[1].kind, TokenKind::Ident(_)));
        assert!(matches!(tokens[6].kind, TokenKind::RParen));
        assert!(matches!(tokens[7].kind, TokenKind::Arrow));
    }

    #[test]
    fn skips_comments() {
        let kinds = lex("// leading\nlet x = 1 // trailing\n");
        assert!(matches!(kinds[0], TokenKind::Let));
        assert!(matches!(kinds[3], TokenKind::Int(1)));
        assert!(matches!(kinds[4], TokenKind::Eof));
    }

    #[test]
    fn distinguishes_float_from_member_access() {
        let kinds = lex("1.5 x.y");
        assert!(matches!(kinds[0], TokenKind::Float(_)));
        assert!(matches!(kinds[2], TokenKind::Dot));
    }

    #[test]
    fn lexes_compound_operators() {
        let kinds = lex("== != <= >= && || -> ...");
        assert!(matches!(kinds[0], TokenKind::EqEq));
        assert!(matches!(kinds[1], TokenKind::NotEq));
        assert!(matches!(kinds[2], TokenKind::LtEq));
        assert!(matches!(kinds[3], TokenKind::GtEq));
        assert!(matches!(kinds[4], TokenKind::AndAnd));
        assert!(matches!(kinds[5], TokenKind::OrOr));
        assert!(matches!(kinds[6], TokenKind::Arrow));
        assert!(matches!(kinds[7], TokenKind::Ellipsis));
    }

    #[test]
    fn string_escapes() {
        let interner = Arc::new(StringInterner::new());
        let tokens = Lexer::new(r#""a\n\"b""#, &interner).tokenize().unwrap();
        if let TokenKind::Str(id) = tokens[0].kind {
            assert_eq!(interner.resolve(id), "a\n\"b");
        } else {
            panic!("expected string token");
        }
    }

    #[test]
    fn rejects_unterminated_string() {
        let interner = Arc::new(StringInterner::new());
        assert!(Lexer::new("\"abc", &interner).tokenize().is_err());
    }
}
