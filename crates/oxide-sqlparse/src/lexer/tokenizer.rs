//! Scanner turning SQL text into tokens.

use super::{Keyword, Span, Token, TokenKind};

/// What a scanner produced: a token kind, or the message of an error token.
type Scan = Result<TokenKind, String>;

/// Splits SQL text into tokens.
///
/// The lexer never fails: input it cannot make sense of becomes a
/// [`TokenKind::Error`] token so the grammar can report it in place. As an
/// iterator it yields every token up to and including the single EOF token.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    input: &'a str,
    /// Byte offset of the next character.
    pos: usize,
    /// Byte offset where the token being scanned starts.
    start: usize,
    finished: bool,
}

impl<'a> Lexer<'a> {
    /// Creates a lexer positioned at the start of `input`.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            start: 0,
            finished: false,
        }
    }

    /// Tokenizes the rest of the input.
    ///
    /// The returned stream always ends with exactly one EOF token.
    #[must_use]
    pub fn tokenize(&mut self) -> Vec<Token> {
        self.collect()
    }

    /// Scans the next token. Once the input is exhausted every call returns
    /// an EOF token.
    #[must_use]
    pub fn next_token(&mut self) -> Token {
        self.skip_trivia();
        self.start = self.pos;
        let kind = match self.bump() {
            None => Ok(TokenKind::Eof),
            Some(c) => self.scan(c),
        };
        let span = Span::new(self.start, self.pos);
        Token::new(kind.unwrap_or_else(TokenKind::Error), span)
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.rest().chars().nth(1)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Consumes `expected` if it is next.
    fn eat(&mut self, expected: char) -> bool {
        let matched = self.peek() == Some(expected);
        if matched {
            self.pos += expected.len_utf8();
        }
        matched
    }

    fn bump_while(&mut self, mut keep: impl FnMut(char) -> bool) {
        while self.peek().is_some_and(&mut keep) {
            self.bump();
        }
    }

    fn text(&self) -> &'a str {
        &self.input[self.start..self.pos]
    }

    /// Skips whitespace, `-- line` comments and `/* block */` comments.
    fn skip_trivia(&mut self) {
        loop {
            self.bump_while(char::is_whitespace);
            if self.rest().starts_with("--") {
                // A lone \r ends a line comment too
                self.bump_while(|c| c != '\n' && c != '\r');
            } else if self.rest().starts_with("/*") {
                self.pos += 2;
                match self.rest().find("*/") {
                    Some(end) => self.pos += end + 2,
                    None => self.pos = self.input.len(),
                }
            } else {
                return;
            }
        }
    }

    /// Scans the token whose first character `c` was just consumed.
    fn scan(&mut self, c: char) -> Scan {
        let kind = match c {
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            '[' => TokenKind::LeftBracket,
            ']' => TokenKind::RightBracket,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,
            '~' => TokenKind::BitNot,
            '?' => TokenKind::Question,
            '@' => TokenKind::At,
            '.' => TokenKind::Dot,
            '&' => TokenKind::BitAnd,
            '=' => TokenKind::Eq,
            ':' if self.eat(':') => TokenKind::DoubleColon,
            ':' => TokenKind::Colon,
            '|' if self.eat('|') => TokenKind::Concat,
            '|' => TokenKind::BitOr,
            '!' if self.eat('=') => TokenKind::NotEq,
            '<' if self.eat('=') => TokenKind::LtEq,
            '<' if self.eat('>') => TokenKind::NotEq,
            '<' if self.eat('<') => TokenKind::LeftShift,
            '<' => TokenKind::Lt,
            '>' if self.eat('=') => TokenKind::GtEq,
            '>' if self.eat('>') => TokenKind::RightShift,
            '>' => TokenKind::Gt,
            '$' => return self.scan_parameter(),
            '\'' => return self.scan_quoted('\'').map(TokenKind::String),
            '"' | '`' => return self.scan_quoted(c).map(TokenKind::Identifier),
            'X' | 'x' if self.eat('\'') => return self.scan_blob(),
            c if c.is_ascii_digit() => return self.scan_number(),
            c if c.is_alphabetic() || c == '_' => return Ok(self.scan_word()),
            _ => return Err(format!("Unexpected character: {c}")),
        };
        Ok(kind)
    }

    /// Scans a keyword or a bare identifier.
    fn scan_word(&mut self) -> TokenKind {
        self.bump_while(|c| c.is_alphanumeric() || c == '_');
        let text = self.text();
        Keyword::from_str(text)
            .map_or_else(|| TokenKind::Identifier(String::from(text)), TokenKind::Keyword)
    }

    /// Scans the body of a string or quoted identifier after its opening
    /// quote. A doubled quote stands for one quote character.
    fn scan_quoted(&mut self, quote: char) -> Result<String, String> {
        let mut value = String::new();
        loop {
            match self.bump() {
                Some(c) if c == quote && self.eat(quote) => value.push(quote),
                Some(c) if c == quote => return Ok(value),
                Some(c) => value.push(c),
                None if quote == '\'' => return Err(String::from("Unterminated string literal")),
                None => return Err(String::from("Unterminated quoted identifier")),
            }
        }
    }

    /// Scans an integer or float whose first digit was consumed.
    fn scan_number(&mut self) -> Scan {
        let digit = |c: char| c.is_ascii_digit();
        self.bump_while(digit);

        let mut is_float = false;
        if self.peek() == Some('.') && self.peek_second().is_some_and(digit) {
            is_float = true;
            self.bump();
            self.bump_while(digit);
        }
        if matches!(self.peek(), Some('e' | 'E'))
            && self
                .peek_second()
                .is_some_and(|c| c.is_ascii_digit() || c == '+' || c == '-')
        {
            is_float = true;
            self.bump();
            if !self.eat('+') {
                self.eat('-');
            }
            self.bump_while(digit);
        }

        let text = self.text();
        if is_float {
            text.parse()
                .map(TokenKind::Float)
                .map_err(|e| format!("Invalid float: {e}"))
        } else {
            // Digits alone are always a valid literal; values past `i64` keep
            // their text.
            Ok(text.parse().map_or_else(
                |_| TokenKind::Numeric(String::from(text)),
                TokenKind::Integer,
            ))
        }
    }

    /// Scans the hex digits of `X'...'` after the opening quote. Whitespace
    /// between digits is ignored. A bad digit still consumes the literal up
    /// to its closing quote.
    fn scan_blob(&mut self) -> Scan {
        let mut digits = Vec::new();
        let mut valid = true;
        loop {
            match self.bump() {
                Some('\'') => break,
                Some(c) if c.is_whitespace() => {}
                Some(c) => match c.to_digit(16) {
                    Some(nibble) => digits.push(nibble),
                    None => valid = false,
                },
                None => return Err(String::from("Unterminated blob literal")),
            }
        }
        if !valid {
            return Err(String::from("Invalid character in blob literal"));
        }
        if digits.len() % 2 != 0 {
            return Err(String::from("Odd number of hex digits in blob literal"));
        }
        let bytes = digits
            .chunks_exact(2)
            .map(|pair| u8::try_from((pair[0] << 4) | pair[1]).unwrap_or_default())
            .collect();
        Ok(TokenKind::Blob(bytes))
    }

    /// Scans the digits of a `$n` parameter.
    fn scan_parameter(&mut self) -> Scan {
        self.bump_while(|c| c.is_ascii_digit());
        let digits = &self.text()[1..];
        if digits.is_empty() {
            return Err(String::from("Unexpected character: $"));
        }
        digits
            .parse()
            .map(TokenKind::Parameter)
            .map_err(|e| format!("Invalid parameter index: {e}"))
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }
        let token = self.next_token();
        self.finished = token.is_eof();
        Some(token)
    }
}

impl core::iter::FusedIterator for Lexer<'_> {}
