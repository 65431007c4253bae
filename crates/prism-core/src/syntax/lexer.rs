//! Trivia-preserving lexer
//!
//! Produces every byte of the input as a token, including whitespace,
//! comments, and preprocessor directives, so that the CST built from the
//! token stream round-trips losslessly: `parse(source).text() == source`.

use std::ops::Range;

use super::SyntaxKind;

/// Byte range in the original source.
pub type Span = Range<usize>;

/// A lexer error. The offending bytes are still emitted as an `Error` token,
/// so the tree stays lossless even for broken input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub message: String,
    pub span: Span,
}

impl LexError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self { message: message.into(), span }
    }
}

impl std::fmt::Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}..{}", self.message, self.span.start, self.span.end)
    }
}

/// A lexed token: kind, exact source text, byte span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: SyntaxKind,
    pub text: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: SyntaxKind, text: impl Into<String>, span: Span) -> Self {
        Self { kind, text: text.into(), span }
    }
}

/// Lex input preserving all trivia.
pub fn lex(input: &str) -> (Vec<Token>, Vec<LexError>) {
    let mut lexer = Lexer::new(input);
    lexer.run();
    (lexer.tokens, lexer.errors)
}

struct Lexer<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
    /// True until a non-trivia token is seen on the current line; directives
    /// are only recognized at the start of a line.
    at_line_start: bool,
    tokens: Vec<Token>,
    errors: Vec<LexError>,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            bytes: input.as_bytes(),
            pos: 0,
            at_line_start: true,
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn run(&mut self) {
        while self.pos < self.bytes.len() {
            let start = self.pos;
            let c = self.bytes[self.pos];

            match c {
                b'\n' => {
                    self.pos += 1;
                    self.push(SyntaxKind::Newline, start);
                    self.at_line_start = true;
                }
                b'\r' => {
                    self.pos += 1;
                    if self.peek() == Some(b'\n') {
                        self.pos += 1;
                    }
                    self.push(SyntaxKind::Newline, start);
                    self.at_line_start = true;
                }
                b' ' | b'\t' => {
                    while matches!(self.peek(), Some(b' ') | Some(b'\t')) {
                        self.pos += 1;
                    }
                    self.push(SyntaxKind::Whitespace, start);
                }
                b'/' if self.peek_at(1) == Some(b'/') => {
                    self.take_until_newline();
                    self.push(SyntaxKind::CommentLine, start);
                }
                b'/' if self.peek_at(1) == Some(b'*') => {
                    self.lex_block_comment(start);
                }
                b'#' if self.at_line_start => {
                    // Directive runs to the end of the line, excluding the newline.
                    self.take_until_newline();
                    self.push(SyntaxKind::Directive, start);
                }
                b'"' => self.lex_string(start),
                b'0'..=b'9' => {
                    while matches!(self.peek(), Some(b'0'..=b'9') | Some(b'_')) {
                        self.pos += 1;
                    }
                    self.push(SyntaxKind::IntLiteral, start);
                    self.at_line_start = false;
                }
                c if c == b'_' || c.is_ascii_alphabetic() => {
                    while matches!(self.peek(), Some(b'_') | Some(b'0'..=b'9'))
                        || self.peek().is_some_and(|b| b.is_ascii_alphabetic())
                    {
                        self.pos += 1;
                    }
                    let text = &self.input[start..self.pos];
                    let kind = SyntaxKind::from_keyword(text).unwrap_or(SyntaxKind::Ident);
                    self.push(kind, start);
                    self.at_line_start = false;
                }
                _ => self.lex_operator(start),
            }
        }

        // Eof is synthesized by the parser, not the lexer: emitting it here
        // would break the lossless-text property.
    }

    fn lex_block_comment(&mut self, start: usize) {
        self.pos += 2;
        loop {
            match self.peek() {
                None => {
                    self.errors.push(LexError::new(
                        "unterminated block comment",
                        start..self.pos,
                    ));
                    break;
                }
                Some(b'*') if self.peek_at(1) == Some(b'/') => {
                    self.pos += 2;
                    break;
                }
                _ => self.pos += 1,
            }
        }
        self.push(SyntaxKind::CommentBlock, start);
    }

    fn lex_string(&mut self, start: usize) {
        self.pos += 1;
        loop {
            match self.peek() {
                None | Some(b'\n') => {
                    self.errors.push(LexError::new(
                        "unterminated string literal",
                        start..self.pos,
                    ));
                    break;
                }
                Some(b'\\') => {
                    self.pos += 1;
                    if self.peek().is_some() && self.peek() != Some(b'\n') {
                        self.pos += 1;
                    }
                }
                Some(b'"') => {
                    self.pos += 1;
                    break;
                }
                Some(_) => self.pos += 1,
            }
        }
        self.push(SyntaxKind::StringLiteral, start);
        self.at_line_start = false;
    }

    fn lex_operator(&mut self, start: usize) {
        let c = self.bytes[self.pos];
        let two = self.peek_at(1).map(|n| [c, n]);

        let (kind, len) = match (c, two) {
            (b'?', Some([b'?', b'?'])) => (SyntaxKind::QuestionQuestion, 2),
            (b'=', Some([b'=', b'='])) => (SyntaxKind::EqEq, 2),
            (b'!', Some([b'!', b'='])) => (SyntaxKind::NotEq, 2),
            (b'<', Some([b'<', b'='])) => (SyntaxKind::LtEq, 2),
            (b'>', Some([b'>', b'='])) => (SyntaxKind::GtEq, 2),
            (b'&', Some([b'&', b'&'])) => (SyntaxKind::AmpAmp, 2),
            (b'|', Some([b'|', b'|'])) => (SyntaxKind::PipePipe, 2),
            (b'(', _) => (SyntaxKind::LParen, 1),
            (b')', _) => (SyntaxKind::RParen, 1),
            (b'{', _) => (SyntaxKind::LBrace, 1),
            (b'}', _) => (SyntaxKind::RBrace, 1),
            (b'[', _) => (SyntaxKind::LBracket, 1),
            (b']', _) => (SyntaxKind::RBracket, 1),
            (b',', _) => (SyntaxKind::Comma, 1),
            (b';', _) => (SyntaxKind::Semicolon, 1),
            (b':', _) => (SyntaxKind::Colon, 1),
            (b'.', _) => (SyntaxKind::Dot, 1),
            (b'?', _) => (SyntaxKind::Question, 1),
            (b'=', _) => (SyntaxKind::Eq, 1),
            (b'<', _) => (SyntaxKind::Lt, 1),
            (b'>', _) => (SyntaxKind::Gt, 1),
            (b'&', _) => (SyntaxKind::Amp, 1),
            (b'|', _) => (SyntaxKind::Pipe, 1),
            (b'^', _) => (SyntaxKind::Caret, 1),
            (b'+', _) => (SyntaxKind::Plus, 1),
            (b'-', _) => (SyntaxKind::Minus, 1),
            (b'*', _) => (SyntaxKind::Star, 1),
            (b'/', _) => (SyntaxKind::Slash, 1),
            (b'!', _) => (SyntaxKind::Bang, 1),
            _ => {
                // Unknown byte (or multi-byte char): consume one whole char.
                let ch_len = self.input[self.pos..]
                    .chars()
                    .next()
                    .map_or(1, char::len_utf8);
                self.pos += ch_len;
                self.errors.push(LexError::new(
                    format!("unexpected character {:?}", &self.input[start..self.pos]),
                    start..self.pos,
                ));
                self.push(SyntaxKind::Error, start);
                self.at_line_start = false;
                return;
            }
        };

        self.pos += len;
        self.push(kind, start);
        self.at_line_start = false;
    }

    fn take_until_newline(&mut self) {
        while let Some(c) = self.peek() {
            if c == b'\n' || c == b'\r' {
                break;
            }
            self.pos += 1;
        }
    }

    fn push(&mut self, kind: SyntaxKind, start: usize) {
        self.tokens.push(Token::new(
            kind,
            &self.input[start..self.pos],
            start..self.pos,
        ));
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }
}
