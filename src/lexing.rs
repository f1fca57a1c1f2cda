use std::fmt::Display;

use phf::phf_map;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Tagged, Taggable};


/// Complete list of all token types in the Tin grammar.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash, Serialize, Deserialize)]
pub enum TokenType {
    Asterisk,     // *
    Bang,         // !
    CloseBrace,   // }
    CloseBracket, // ]
    CloseParen,   // )
    Colon,        // :
    Comma,        // ,
    DoubleEq,     // ==
    Eq,           // =
    ExclamEq,     // !=
    Greater,      // >
    Less,         // <
    Minus,        // -
    OpenBrace,    // {
    OpenBracket,  // [
    OpenParen,    // (
    Plus,         // +
    SemiColon,    // ;
    Slash,        // /

    Name,      // Identifier
    Integer,   // Integer literal
    StringLit, // String literal

    Else,
    False,
    Fn,
    If,
    Let,
    Return,
    True,

    /// A character no token can start with.
    Illegal,

    /// End of input. The lexer keeps producing this forever.
    Eof,
}

impl Display for TokenType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Asterisk => "'*'",
            Self::Bang => "'!'",
            Self::CloseBrace => "'}'",
            Self::CloseBracket => "']'",
            Self::CloseParen => "')'",
            Self::Colon => "':'",
            Self::Comma => "','",
            Self::DoubleEq => "'=='",
            Self::Eq => "'='",
            Self::ExclamEq => "'!='",
            Self::Greater => "'>'",
            Self::Less => "'<'",
            Self::Minus => "'-'",
            Self::OpenBrace => "'{'",
            Self::OpenBracket => "'['",
            Self::OpenParen => "'('",
            Self::Plus => "'+'",
            Self::SemiColon => "';'",
            Self::Slash => "'/'",
            Self::Name => "name",
            Self::Integer => "int",
            Self::StringLit => "string literal",
            Self::Else => "'else'",
            Self::False => "'false'",
            Self::Fn => "'fn'",
            Self::If => "'if'",
            Self::Let => "'let'",
            Self::Return => "'return'",
            Self::True => "'true'",
            Self::Illegal => "ILLEGAL",
            Self::Eof => "EOF",
        })
    }
}


/// Keywords are carved out of the identifier space after a maximal name has
/// been read.
static KEYWORDS: phf::Map<&'static str, TokenType> = phf_map! {
    "else" => TokenType::Else,
    "false" => TokenType::False,
    "fn" => TokenType::Fn,
    "if" => TokenType::If,
    "let" => TokenType::Let,
    "return" => TokenType::Return,
    "true" => TokenType::True,
};


/// A token: its type and the source text it covers. String literal tokens
/// carry the text between the quotes.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct Token<'a> {
    pub kind: TokenType,
    pub text: &'a str,
}


lazy_static! {
    // Regex for matching an identifier or keyword
    static ref NAME: Regex = Regex::new("^[A-Za-z_][A-Za-z0-9_]*").unwrap();

    // Regex for matching an integer
    static ref DIGITS: Regex = Regex::new("^[[:digit:]]+").unwrap();

    // Regex for matching horizontal whitespace (newlines are counted
    // separately to track line numbers)
    static ref WHITESPACE: Regex = Regex::new("^[ \t\r]+").unwrap();
}


/// A cheap cursor into the source code. Advancing consumes the lexer and
/// returns a new one, so callers can keep old positions around for free.
#[derive(Debug, Clone, Copy)]
pub struct Lexer<'a> {
    code: &'a str,
    offset: usize,
    line: u32,
}

impl<'a> Lexer<'a> {
    /// Construct a new lexer. Lines are numbered from 1.
    pub fn new(code: &'a str) -> Lexer<'a> {
        Lexer {
            code,
            offset: 0,
            line: 1,
        }
    }

    /// Peek the next character.
    fn peek(&self) -> Option<char> {
        self.code.chars().next()
    }

    /// Return true if the i'th character exists and satisfies the predicate `f`.
    fn satisfies_at(&self, i: usize, f: impl FnOnce(char) -> bool) -> bool {
        self.code.chars().nth(i).map(f).unwrap_or(false)
    }

    /// Advance the lexer in the buffer.
    fn skip(self, length: usize, delta_line: u32) -> Self {
        Lexer {
            code: &self.code[length..],
            offset: self.offset + length,
            line: self.line + delta_line,
        }
    }

    /// Emit a token covering the next `length` bytes of the buffer and
    /// advance past it.
    fn skip_tag(self, length: usize, delta_line: u32, kind: TokenType) -> (Lexer<'a>, Tagged<Token<'a>>) {
        let token = Token { kind, text: &self.code[..length] }
            .tag((self.offset, self.line, length));
        (self.skip(length, delta_line), token)
    }

    /// Skip an arbitrary amount of whitespace.
    fn skip_whitespace(mut self) -> Self {
        loop {
            if let Some(m) = WHITESPACE.find(self.code) {
                self = self.skip(m.end(), 0);
            }
            match self.peek() {
                Some('\n') => {
                    self = self.skip(1, 1);
                }
                _ => break,
            }
        }
        self
    }

    /// Interpret the next token as an identifier or keyword.
    fn next_name(self) -> (Lexer<'a>, Tagged<Token<'a>>) {
        match NAME.find(self.code) {
            Some(m) => {
                let kind = KEYWORDS
                    .get(&self.code[..m.end()])
                    .copied()
                    .unwrap_or(TokenType::Name);
                self.skip_tag(m.end(), 0, kind)
            }
            None => self.next_illegal(),
        }
    }

    /// Interpret the next token as an integer literal. Negative literals do
    /// not exist; a leading minus is a prefix operator.
    fn next_integer(self) -> (Lexer<'a>, Tagged<Token<'a>>) {
        match DIGITS.find(self.code) {
            Some(m) => self.skip_tag(m.end(), 0, TokenType::Integer),
            None => self.next_illegal(),
        }
    }

    /// Interpret the next token as a string literal: everything up to the
    /// next double quote, or to the end of input if the literal is
    /// unterminated. No escape processing; the bytes are kept raw.
    fn next_string(self) -> (Lexer<'a>, Tagged<Token<'a>>) {
        let (text, span) = match self.code[1..].find('"') {
            Some(i) => (&self.code[1..1 + i], i + 2),
            None => (&self.code[1..], self.code.len()),
        };
        let delta_line = text.matches('\n').count() as u32;
        let token = Token { kind: TokenType::StringLit, text }
            .tag((self.offset, self.line, span));
        (self.skip(span, delta_line), token)
    }

    /// Emit an ILLEGAL token covering exactly one character.
    fn next_illegal(self) -> (Lexer<'a>, Tagged<Token<'a>>) {
        let length = self.peek().map(char::len_utf8).unwrap_or(0);
        self.skip_tag(length, 0, TokenType::Illegal)
    }

    /// Return the next token and the lexer that follows it.
    pub fn next_token(mut self) -> (Lexer<'a>, Tagged<Token<'a>>) {
        self = self.skip_whitespace();

        match self.peek() {
            None => self.skip_tag(0, 0, TokenType::Eof),

            // Identifiers and keywords begin with letters or underscores
            Some('a'..='z') | Some('A'..='Z') | Some('_') => self.next_name(),

            Some(x) if x.is_ascii_digit() => self.next_integer(),

            Some('"') => self.next_string(),

            // Two-character operators must be checked before their
            // one-character prefixes.
            Some('=') if self.satisfies_at(1, |x| x == '=') => {
                self.skip_tag(2, 0, TokenType::DoubleEq)
            }
            Some('=') => self.skip_tag(1, 0, TokenType::Eq),
            Some('!') if self.satisfies_at(1, |x| x == '=') => {
                self.skip_tag(2, 0, TokenType::ExclamEq)
            }
            Some('!') => self.skip_tag(1, 0, TokenType::Bang),
            Some('+') => self.skip_tag(1, 0, TokenType::Plus),
            Some('-') => self.skip_tag(1, 0, TokenType::Minus),
            Some('*') => self.skip_tag(1, 0, TokenType::Asterisk),
            Some('/') => self.skip_tag(1, 0, TokenType::Slash),
            Some('<') => self.skip_tag(1, 0, TokenType::Less),
            Some('>') => self.skip_tag(1, 0, TokenType::Greater),
            Some(',') => self.skip_tag(1, 0, TokenType::Comma),
            Some(';') => self.skip_tag(1, 0, TokenType::SemiColon),
            Some(':') => self.skip_tag(1, 0, TokenType::Colon),
            Some('(') => self.skip_tag(1, 0, TokenType::OpenParen),
            Some(')') => self.skip_tag(1, 0, TokenType::CloseParen),
            Some('{') => self.skip_tag(1, 0, TokenType::OpenBrace),
            Some('}') => self.skip_tag(1, 0, TokenType::CloseBrace),
            Some('[') => self.skip_tag(1, 0, TokenType::OpenBracket),
            Some(']') => self.skip_tag(1, 0, TokenType::CloseBracket),

            Some(_) => self.next_illegal(),
        }
    }
}
