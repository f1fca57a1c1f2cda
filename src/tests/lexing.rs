use crate::error::Taggable;
use crate::lexing::{Lexer, Token, TokenType};


macro_rules! tok {
    ($lex:expr, $want:expr) => {{
        let (lex, token) = $lex.next_token();
        assert_eq!(token, $want);
        lex
    }};
}

macro_rules! stop {
    ($lex:expr) => {{
        let (_, token) = $lex.next_token();
        assert_eq!(token.as_ref().kind, TokenType::Eof);
    }};
}


fn name(s: &'static str) -> Token<'static> { Token { kind: TokenType::Name, text: s } }
fn stringlit(s: &'static str) -> Token<'static> { Token { kind: TokenType::StringLit, text: s } }

fn sym(kind: TokenType, s: &'static str) -> Token<'static> { Token { kind, text: s } }


/// Collect the whole token stream as (type, text) pairs, stopping at EOF.
fn lex_all(code: &str) -> Vec<(TokenType, &str)> {
    let mut lexer = Lexer::new(code);
    let mut tokens = Vec::new();
    loop {
        let (next, token) = lexer.next_token();
        lexer = next;
        let token = *token.as_ref();
        if token.kind == TokenType::Eof {
            return tokens;
        }
        tokens.push((token.kind, token.text));
    }
}


#[test]
fn whitespace() {
    let lex = Lexer::new("dingbob");
    let lex = tok!(lex, name("dingbob").tag(0..7));
    stop!(lex);

    let lex = Lexer::new("  dingbob  ");
    let lex = tok!(lex, name("dingbob").tag(2..9));
    stop!(lex);

    let lex = Lexer::new("\ndingbob");
    let lex = tok!(lex, name("dingbob").tag(1..8).line(2));
    stop!(lex);

    let lex = Lexer::new("a\r\n\tb");
    let lex = tok!(lex, name("a").tag(0..1));
    let lex = tok!(lex, name("b").tag(4..5).line(2));
    stop!(lex);
}


#[test]
fn operators() {
    assert_eq!(lex_all("=+(){},;"), vec![
        (TokenType::Eq, "="),
        (TokenType::Plus, "+"),
        (TokenType::OpenParen, "("),
        (TokenType::CloseParen, ")"),
        (TokenType::OpenBrace, "{"),
        (TokenType::CloseBrace, "}"),
        (TokenType::Comma, ","),
        (TokenType::SemiColon, ";"),
    ]);

    assert_eq!(lex_all("!-/*<>:[]"), vec![
        (TokenType::Bang, "!"),
        (TokenType::Minus, "-"),
        (TokenType::Slash, "/"),
        (TokenType::Asterisk, "*"),
        (TokenType::Less, "<"),
        (TokenType::Greater, ">"),
        (TokenType::Colon, ":"),
        (TokenType::OpenBracket, "["),
        (TokenType::CloseBracket, "]"),
    ]);
}


#[test]
fn two_char_operators() {
    let lex = Lexer::new("== != =");
    let lex = tok!(lex, sym(TokenType::DoubleEq, "==").tag(0..2));
    let lex = tok!(lex, sym(TokenType::ExclamEq, "!=").tag(3..5));
    let lex = tok!(lex, sym(TokenType::Eq, "=").tag(6..7));
    stop!(lex);

    // A bang followed by an equals sign with a gap stays two tokens.
    assert_eq!(lex_all("! ="), vec![
        (TokenType::Bang, "!"),
        (TokenType::Eq, "="),
    ]);
}


#[test]
fn keywords() {
    assert_eq!(lex_all("let fn if else return true false"), vec![
        (TokenType::Let, "let"),
        (TokenType::Fn, "fn"),
        (TokenType::If, "if"),
        (TokenType::Else, "else"),
        (TokenType::Return, "return"),
        (TokenType::True, "true"),
        (TokenType::False, "false"),
    ]);

    // Keywords must be maximal names, not prefixes.
    assert_eq!(lex_all("lets fnord truest _let"), vec![
        (TokenType::Name, "lets"),
        (TokenType::Name, "fnord"),
        (TokenType::Name, "truest"),
        (TokenType::Name, "_let"),
    ]);
}


#[test]
fn strings() {
    let lex = Lexer::new("\"foobar\"");
    let lex = tok!(lex, stringlit("foobar").tag(0..8));
    stop!(lex);

    let lex = Lexer::new("\"foo bar\"");
    let lex = tok!(lex, stringlit("foo bar").tag(0..9));
    stop!(lex);

    let lex = Lexer::new("\"\"");
    let lex = tok!(lex, stringlit("").tag(0..2));
    stop!(lex);

    // No escape processing: the backslash is just a byte.
    let lex = Lexer::new(r#""a\b""#);
    let lex = tok!(lex, stringlit("a\\b").tag(0..5));
    stop!(lex);

    // Unterminated literals run to the end of input.
    let lex = Lexer::new("\"unterminated");
    let lex = tok!(lex, stringlit("unterminated").tag(0..13));
    stop!(lex);

    // Newlines inside a string count towards the line number.
    let lex = Lexer::new("\"a\nb\" x");
    let lex = tok!(lex, stringlit("a\nb").tag(0..5));
    let lex = tok!(lex, name("x").tag(6..7).line(2));
    stop!(lex);
}


#[test]
fn illegal() {
    let lex = Lexer::new("@");
    let lex = tok!(lex, sym(TokenType::Illegal, "@").tag(0..1));
    stop!(lex);

    assert_eq!(lex_all("1 @ 2"), vec![
        (TokenType::Integer, "1"),
        (TokenType::Illegal, "@"),
        (TokenType::Integer, "2"),
    ]);
}


#[test]
fn eof_repeats() {
    let (lex, token) = Lexer::new("x").next_token();
    assert_eq!(token.as_ref().kind, TokenType::Name);

    let (lex, token) = lex.next_token();
    assert_eq!(token.as_ref().kind, TokenType::Eof);

    let (_, token) = lex.next_token();
    assert_eq!(token.as_ref().kind, TokenType::Eof);
}


#[test]
fn program() {
    let code = concat!(
        "let five = 5;\n",
        "let ten = 10;\n",
        "let add = fn(x, y) { x + y; };\n",
        "let result = add(five, ten);\n",
        "5 < 10 > 5;\n",
        "10 == 10;\n",
        "10 != 9;\n",
        "[1, 2];\n",
        "{\"foo\": \"bar\"}\n",
    );

    assert_eq!(lex_all(code), vec![
        (TokenType::Let, "let"),
        (TokenType::Name, "five"),
        (TokenType::Eq, "="),
        (TokenType::Integer, "5"),
        (TokenType::SemiColon, ";"),
        (TokenType::Let, "let"),
        (TokenType::Name, "ten"),
        (TokenType::Eq, "="),
        (TokenType::Integer, "10"),
        (TokenType::SemiColon, ";"),
        (TokenType::Let, "let"),
        (TokenType::Name, "add"),
        (TokenType::Eq, "="),
        (TokenType::Fn, "fn"),
        (TokenType::OpenParen, "("),
        (TokenType::Name, "x"),
        (TokenType::Comma, ","),
        (TokenType::Name, "y"),
        (TokenType::CloseParen, ")"),
        (TokenType::OpenBrace, "{"),
        (TokenType::Name, "x"),
        (TokenType::Plus, "+"),
        (TokenType::Name, "y"),
        (TokenType::SemiColon, ";"),
        (TokenType::CloseBrace, "}"),
        (TokenType::SemiColon, ";"),
        (TokenType::Let, "let"),
        (TokenType::Name, "result"),
        (TokenType::Eq, "="),
        (TokenType::Name, "add"),
        (TokenType::OpenParen, "("),
        (TokenType::Name, "five"),
        (TokenType::Comma, ","),
        (TokenType::Name, "ten"),
        (TokenType::CloseParen, ")"),
        (TokenType::SemiColon, ";"),
        (TokenType::Integer, "5"),
        (TokenType::Less, "<"),
        (TokenType::Integer, "10"),
        (TokenType::Greater, ">"),
        (TokenType::Integer, "5"),
        (TokenType::SemiColon, ";"),
        (TokenType::Integer, "10"),
        (TokenType::DoubleEq, "=="),
        (TokenType::Integer, "10"),
        (TokenType::SemiColon, ";"),
        (TokenType::Integer, "10"),
        (TokenType::ExclamEq, "!="),
        (TokenType::Integer, "9"),
        (TokenType::SemiColon, ";"),
        (TokenType::OpenBracket, "["),
        (TokenType::Integer, "1"),
        (TokenType::Comma, ","),
        (TokenType::Integer, "2"),
        (TokenType::CloseBracket, "]"),
        (TokenType::SemiColon, ";"),
        (TokenType::OpenBrace, "{"),
        (TokenType::StringLit, "foo"),
        (TokenType::Colon, ":"),
        (TokenType::StringLit, "bar"),
        (TokenType::CloseBrace, "}"),
    ]);
}
