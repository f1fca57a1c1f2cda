use crate::ast::{Block, Expr, Program, Stmt};
use crate::error::{Syntax, SyntaxError, Tagged};
use crate::lexing::{Lexer, Token, TokenType};
use crate::types::{BinOp, Key, UnOp};

// Precedence
// ----------------------------------------------------------------

/// Binding strength of infix positions, weakest first. The derived order is
/// what the Pratt loop compares; every operator is left-associative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Prec {
    Lowest,
    Equals,
    LessGreater,
    Sum,
    Product,
    Prefix,
    Call,
    Index,
}

/// The precedence a token has in infix position. Tokens that cannot appear
/// there bind weakest of all, which stops the Pratt loop.
fn precedence(kind: TokenType) -> Prec {
    match kind {
        TokenType::DoubleEq | TokenType::ExclamEq => Prec::Equals,
        TokenType::Less | TokenType::Greater => Prec::LessGreater,
        TokenType::Plus | TokenType::Minus => Prec::Sum,
        TokenType::Slash | TokenType::Asterisk => Prec::Product,
        TokenType::OpenParen => Prec::Call,
        TokenType::OpenBracket => Prec::Index,
        _ => Prec::Lowest,
    }
}

fn binary_op(kind: TokenType) -> Option<BinOp> {
    match kind {
        TokenType::Plus => Some(BinOp::Add),
        TokenType::Minus => Some(BinOp::Subtract),
        TokenType::Asterisk => Some(BinOp::Multiply),
        TokenType::Slash => Some(BinOp::Divide),
        TokenType::Less => Some(BinOp::Less),
        TokenType::Greater => Some(BinOp::Greater),
        TokenType::DoubleEq => Some(BinOp::Equal),
        TokenType::ExclamEq => Some(BinOp::NotEqual),
        _ => None,
    }
}

// Parser
// ----------------------------------------------------------------

/// A Pratt parser over the lexer's token stream.
///
/// The parser keeps the current and the peek token. Prefix productions
/// dispatch on the current token type; infix productions dispatch on the
/// peek token type and take the expression parsed so far as their left
/// operand. Failed productions return `None` and leave a [`SyntaxError`]
/// behind; parsing then resumes at the next statement.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    cur: Tagged<Token<'a>>,
    peek: Tagged<Token<'a>>,
    errors: Vec<SyntaxError>,
}

impl<'a> Parser<'a> {
    pub fn new(code: &'a str) -> Parser<'a> {
        let lexer = Lexer::new(code);
        let (lexer, cur) = lexer.next_token();
        let (lexer, peek) = lexer.next_token();
        Parser { lexer, cur, peek, errors: Vec::new() }
    }

    fn bump(&mut self) {
        self.cur = self.peek;
        let (lexer, token) = self.lexer.next_token();
        self.lexer = lexer;
        self.peek = token;
    }

    fn cur_kind(&self) -> TokenType {
        self.cur.as_ref().kind
    }

    fn cur_text(&self) -> &'a str {
        self.cur.as_ref().text
    }

    fn cur_is(&self, kind: TokenType) -> bool {
        self.cur_kind() == kind
    }

    fn peek_is(&self, kind: TokenType) -> bool {
        self.peek.as_ref().kind == kind
    }

    fn peek_precedence(&self) -> Prec {
        precedence(self.peek.as_ref().kind)
    }

    /// Advance if the peek token has the expected type; otherwise record an
    /// error and stay put.
    fn expect_peek(&mut self, kind: TokenType) -> bool {
        if self.peek_is(kind) {
            self.bump();
            true
        } else {
            self.errors.push(SyntaxError::new(
                self.peek.location(),
                Syntax::ExpectedToken { expected: kind, got: self.peek.as_ref().kind },
            ));
            false
        }
    }

    pub fn errors(&self) -> &[SyntaxError] {
        &self.errors
    }

    /// Parse statements until end of input. Always returns a program, which
    /// may be partial; check [`Parser::errors`] before trusting it.
    pub fn parse_program(&mut self) -> Program {
        let mut statements = Vec::new();
        while !self.cur_is(TokenType::Eof) {
            if let Some(statement) = self.parse_statement() {
                statements.push(statement);
            }
            self.bump();
        }
        Program { statements }
    }

    fn parse_statement(&mut self) -> Option<Stmt> {
        match self.cur_kind() {
            TokenType::Let => self.parse_let(),
            TokenType::Return => self.parse_return(),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_let(&mut self) -> Option<Stmt> {
        if !self.expect_peek(TokenType::Name) {
            return None;
        }
        let name = Key::new(self.cur_text());
        if !self.expect_peek(TokenType::Eq) {
            return None;
        }
        self.bump();
        let value = self.parse_expression(Prec::Lowest)?;
        if self.peek_is(TokenType::SemiColon) {
            self.bump();
        }
        Some(Stmt::Let { name, value })
    }

    fn parse_return(&mut self) -> Option<Stmt> {
        self.bump();
        let value = self.parse_expression(Prec::Lowest)?;
        if self.peek_is(TokenType::SemiColon) {
            self.bump();
        }
        Some(Stmt::Return(value))
    }

    fn parse_expression_statement(&mut self) -> Option<Stmt> {
        let value = self.parse_expression(Prec::Lowest)?;
        if self.peek_is(TokenType::SemiColon) {
            self.bump();
        }
        Some(Stmt::Expr(value))
    }

    /// The Pratt loop: parse a prefix, then keep extending it to the left
    /// operand of infix positions for as long as the next operator binds
    /// tighter than `prec`.
    fn parse_expression(&mut self, prec: Prec) -> Option<Expr> {
        let mut left = self.parse_prefix()?;

        while !self.peek_is(TokenType::SemiColon) && prec < self.peek_precedence() {
            left = match self.peek.as_ref().kind {
                TokenType::OpenParen => {
                    self.bump();
                    self.parse_call(left)?
                }
                TokenType::OpenBracket => {
                    self.bump();
                    self.parse_index(left)?
                }
                kind => match binary_op(kind) {
                    Some(op) => {
                        self.bump();
                        self.parse_infix(op, left)?
                    }
                    None => return Some(left),
                },
            };
        }

        Some(left)
    }

    /// Prefix dispatch, keyed on the current token type.
    fn parse_prefix(&mut self) -> Option<Expr> {
        match self.cur_kind() {
            TokenType::Name => Some(Expr::Identifier(Key::new(self.cur_text()))),
            TokenType::Integer => self.parse_integer(),
            TokenType::StringLit => Some(Expr::StringLit(Key::new(self.cur_text()))),
            TokenType::True => Some(Expr::Boolean(true)),
            TokenType::False => Some(Expr::Boolean(false)),
            TokenType::Bang => self.parse_prefix_op(UnOp::LogicalNegate),
            TokenType::Minus => self.parse_prefix_op(UnOp::ArithmeticalNegate),
            TokenType::OpenParen => self.parse_grouped(),
            TokenType::If => self.parse_if(),
            TokenType::Fn => self.parse_function(),
            TokenType::OpenBracket => self.parse_list(),
            TokenType::OpenBrace => self.parse_map(),
            kind => {
                self.errors.push(SyntaxError::new(
                    self.cur.location(),
                    Syntax::MissingPrefix(kind),
                ));
                None
            }
        }
    }

    fn parse_integer(&mut self) -> Option<Expr> {
        let text = self.cur_text();
        match text.parse::<i64>() {
            Ok(value) => Some(Expr::Integer(value)),
            Err(_) => {
                self.errors.push(SyntaxError::new(
                    self.cur.location(),
                    Syntax::BadIntegerLiteral(text.to_string()),
                ));
                None
            }
        }
    }

    fn parse_prefix_op(&mut self, op: UnOp) -> Option<Expr> {
        self.bump();
        let right = self.parse_expression(Prec::Prefix)?;
        Some(Expr::Prefix(op, Box::new(right)))
    }

    fn parse_infix(&mut self, op: BinOp, left: Expr) -> Option<Expr> {
        let prec = precedence(self.cur_kind());
        self.bump();
        let right = self.parse_expression(prec)?;
        Some(Expr::Infix(op, Box::new(left), Box::new(right)))
    }

    fn parse_grouped(&mut self) -> Option<Expr> {
        self.bump();
        let inner = self.parse_expression(Prec::Lowest)?;
        if !self.expect_peek(TokenType::CloseParen) {
            return None;
        }
        Some(inner)
    }

    fn parse_if(&mut self) -> Option<Expr> {
        if !self.expect_peek(TokenType::OpenParen) {
            return None;
        }
        self.bump();
        let condition = self.parse_expression(Prec::Lowest)?;
        if !self.expect_peek(TokenType::CloseParen) {
            return None;
        }
        if !self.expect_peek(TokenType::OpenBrace) {
            return None;
        }
        let consequence = self.parse_block();

        let alternative = if self.peek_is(TokenType::Else) {
            self.bump();
            if !self.expect_peek(TokenType::OpenBrace) {
                return None;
            }
            Some(self.parse_block())
        } else {
            None
        };

        Some(Expr::If {
            condition: Box::new(condition),
            consequence,
            alternative,
        })
    }

    /// Statements between braces. Enters with the current token on the
    /// opening brace and leaves it on the closing one.
    fn parse_block(&mut self) -> Block {
        let mut statements = Vec::new();
        self.bump();
        while !self.cur_is(TokenType::CloseBrace) && !self.cur_is(TokenType::Eof) {
            if let Some(statement) = self.parse_statement() {
                statements.push(statement);
            }
            self.bump();
        }
        Block(statements)
    }

    fn parse_function(&mut self) -> Option<Expr> {
        if !self.expect_peek(TokenType::OpenParen) {
            return None;
        }
        let params = self.parse_parameters()?;
        if !self.expect_peek(TokenType::OpenBrace) {
            return None;
        }
        let body = self.parse_block();
        Some(Expr::Function { params, body })
    }

    fn parse_parameters(&mut self) -> Option<Vec<Key>> {
        let mut params = Vec::new();

        if self.peek_is(TokenType::CloseParen) {
            self.bump();
            return Some(params);
        }

        if !self.expect_peek(TokenType::Name) {
            return None;
        }
        params.push(Key::new(self.cur_text()));

        while self.peek_is(TokenType::Comma) {
            self.bump();
            if !self.expect_peek(TokenType::Name) {
                return None;
            }
            params.push(Key::new(self.cur_text()));
        }

        if !self.expect_peek(TokenType::CloseParen) {
            return None;
        }
        Some(params)
    }

    fn parse_list(&mut self) -> Option<Expr> {
        let elements = self.parse_expressions(TokenType::CloseBracket)?;
        Some(Expr::List(elements))
    }

    /// A comma-separated expression list ending at `end`. Enters with the
    /// current token on the opening delimiter.
    fn parse_expressions(&mut self, end: TokenType) -> Option<Vec<Expr>> {
        let mut elements = Vec::new();

        if self.peek_is(end) {
            self.bump();
            return Some(elements);
        }

        self.bump();
        elements.push(self.parse_expression(Prec::Lowest)?);

        while self.peek_is(TokenType::Comma) {
            self.bump();
            self.bump();
            elements.push(self.parse_expression(Prec::Lowest)?);
        }

        if !self.expect_peek(end) {
            return None;
        }
        Some(elements)
    }

    fn parse_map(&mut self) -> Option<Expr> {
        let mut pairs = Vec::new();

        while !self.peek_is(TokenType::CloseBrace) {
            self.bump();
            let key = self.parse_expression(Prec::Lowest)?;
            if !self.expect_peek(TokenType::Colon) {
                return None;
            }
            self.bump();
            let value = self.parse_expression(Prec::Lowest)?;
            pairs.push((key, value));

            if !self.peek_is(TokenType::CloseBrace) && !self.expect_peek(TokenType::Comma) {
                return None;
            }
        }

        if !self.expect_peek(TokenType::CloseBrace) {
            return None;
        }
        Some(Expr::Map(pairs))
    }

    fn parse_call(&mut self, callee: Expr) -> Option<Expr> {
        let args = self.parse_expressions(TokenType::CloseParen)?;
        Some(Expr::Call { callee: Box::new(callee), args })
    }

    fn parse_index(&mut self, target: Expr) -> Option<Expr> {
        self.bump();
        let index = self.parse_expression(Prec::Lowest)?;
        if !self.expect_peek(TokenType::CloseBracket) {
            return None;
        }
        Some(Expr::Index {
            target: Box::new(target),
            index: Box::new(index),
        })
    }
}


/// Parse a complete program. A non-empty error list means the program is
/// partial and should not be evaluated.
pub fn parse(input: &str) -> Result<Program, Vec<SyntaxError>> {
    let mut parser = Parser::new(input);
    let program = parser.parse_program();
    if parser.errors.is_empty() {
        Ok(program)
    } else {
        Err(parser.errors)
    }
}
