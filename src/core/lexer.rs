//! # Lexer
//!
//! Turns the text of a configuration file into typed tokens, one at a time. Token text
//! borrows from the input, so lexing never allocates.
//!
//! The lexer tracks the current line: every `\n` token bumps the counter *after* it is
//! produced, so a token always reports the line it sits on. Comments are consumed
//! internally and never reach the caller.

/// Classification of a configuration token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// End of input (or a NUL byte). Terminal: the lexer never moves past it.
    Eof,
    /// Any single character that has no meaning in the grammar.
    Unknown,
    /// `-`, which introduces the extension list.
    Minus,
    /// `(`
    OpenParen,
    /// `)`
    CloseParen,
    /// `@TAG`. The token text excludes the `@` and may be empty.
    Tag,
    /// `%`
    Percent,
    /// A line break.
    Newline,
    /// A maximal run of ASCII letters, digits and `/`.
    Literal,
    /// `#` up to the end of the line. Discarded by [`Lexer::next_token`].
    LineComment,
}

/// A classified slice of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    /// What the token is.
    pub kind: TokenKind,
    /// The token's text, borrowed from the input.
    pub text: &'a str,
    /// 1-based line the token starts on.
    pub line: usize,
}

impl Token<'_> {
    /// Length of the token text in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// `true` for zero-length tokens (end of input, an empty tag).
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// `true` if this is a literal whose text is exactly `text`.
    pub fn is_literal(&self, text: &str) -> bool {
        self.kind == TokenKind::Literal && self.text == text
    }
}

#[inline]
fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r')
}

#[inline]
fn is_end_of_line(b: u8) -> bool {
    matches!(b, b'\n' | b'\r')
}

#[inline]
fn is_literal_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'/'
}

/// A cursor over configuration text.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    src: &'a str,
    pos: usize,
    line: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a lexer positioned at the start of `src`, on line 1.
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            line: 1,
        }
    }

    /// The line the cursor is currently on.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Returns the next token, skipping blanks and comments.
    pub fn next_token(&mut self) -> Token<'a> {
        loop {
            let token = self.lex_one();
            if token.kind != TokenKind::LineComment {
                return token;
            }
        }
    }

    /// Skips ahead to the next token of `kind`, or to the end of input.
    ///
    /// Comments are never surfaced, so asking for [`TokenKind::LineComment`] always
    /// runs to the end.
    pub fn find_kind(&mut self, kind: TokenKind) -> Token<'a> {
        loop {
            let token = self.next_token();
            if token.kind == kind || token.kind == TokenKind::Eof {
                return token;
            }
        }
    }

    /// Skips ahead to the next literal whose text equals `text`, or to the end of input.
    pub fn find_literal(&mut self, text: &str) -> Token<'a> {
        loop {
            let token = self.next_token();
            if token.is_literal(text) || token.kind == TokenKind::Eof {
                return token;
            }
        }
    }

    fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    fn slice(&self, start: usize, end: usize) -> &'a str {
        self.src.get(start..end).unwrap_or_default()
    }

    /// Advances while `keep` holds, never past the end or a NUL byte.
    fn advance_while(&mut self, keep: impl Fn(u8) -> bool) {
        while let Some(b) = self.peek() {
            if b == 0 || !keep(b) {
                break;
            }
            self.pos += 1;
        }
    }

    fn token(&self, kind: TokenKind, start: usize, line: usize) -> Token<'a> {
        Token {
            kind,
            text: self.slice(start, self.pos),
            line,
        }
    }

    fn lex_one(&mut self) -> Token<'a> {
        self.advance_while(is_whitespace);

        let start = self.pos;
        let line = self.line;

        let Some(byte) = self.peek().filter(|&b| b != 0) else {
            return self.token(TokenKind::Eof, start, line);
        };

        let single = match byte {
            b'-' => Some(TokenKind::Minus),
            b'(' => Some(TokenKind::OpenParen),
            b')' => Some(TokenKind::CloseParen),
            b'%' => Some(TokenKind::Percent),
            b'\n' => Some(TokenKind::Newline),
            _ => None,
        };
        if let Some(kind) = single {
            self.pos += 1;
            let token = self.token(kind, start, line);
            if kind == TokenKind::Newline {
                self.line += 1;
            }
            return token;
        }

        match byte {
            b'#' => {
                // The line break itself is left for the next token.
                self.pos += 1;
                let body = self.pos;
                self.advance_while(|b| !is_end_of_line(b));
                self.token(TokenKind::LineComment, body, line)
            }
            b'@' => {
                self.pos += 1;
                let body = self.pos;
                self.advance_while(|b| !is_whitespace(b) && !is_end_of_line(b));
                self.token(TokenKind::Tag, body, line)
            }
            b if is_literal_byte(b) => {
                self.advance_while(is_literal_byte);
                self.token(TokenKind::Literal, start, line)
            }
            _ => {
                // One whole character, so the text stays on a UTF-8 boundary.
                let width = self
                    .src
                    .get(start..)
                    .and_then(|rest| rest.chars().next())
                    .map_or(1, char::len_utf8);
                self.pos += width;
                self.token(TokenKind::Unknown, start, line)
            }
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    /// Yields tokens up to, but not including, the end of input.
    fn next(&mut self) -> Option<Self::Item> {
        let token = self.next_token();
        (token.kind != TokenKind::Eof).then_some(token)
    }
}
