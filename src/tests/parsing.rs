use crate::ast::{Block, Expr, Program, Stmt};
use crate::parsing::parse;
use crate::types::{BinOp, Key, UnOp};


fn infix(op: BinOp, left: Expr, right: Expr) -> Expr {
    Expr::Infix(op, Box::new(left), Box::new(right))
}

fn prefix(op: UnOp, right: Expr) -> Expr {
    Expr::Prefix(op, Box::new(right))
}

fn call(callee: Expr, args: Vec<Expr>) -> Expr {
    Expr::Call { callee: Box::new(callee), args }
}

fn index(target: Expr, idx: Expr) -> Expr {
    Expr::Index { target: Box::new(target), index: Box::new(idx) }
}

/// Parse a source consisting of a single expression statement.
fn parse_one(input: &str) -> Expr {
    let mut program = parse(input).unwrap();
    assert_eq!(program.statements.len(), 1, "program: {:?}", program);
    match std::mem::take(&mut program.statements).into_iter().next().unwrap() {
        Stmt::Expr(ref expr) => expr.clone(),
        other => panic!("expected expression statement, got {:?}", other),
    }
}

fn parse_errors(input: &str) -> Vec<String> {
    match parse(input) {
        Ok(_) => Vec::new(),
        Err(errors) => errors.iter().map(|e| e.to_string()).collect(),
    }
}


#[test]
fn let_statements() {
    assert_eq!(
        parse("let x = 5;"),
        Ok(Program {
            statements: vec![Stmt::Let { name: Key::new("x"), value: Expr::Integer(5) }],
        }),
    );

    assert_eq!(
        parse("let y = true;"),
        Ok(Program {
            statements: vec![Stmt::Let { name: Key::new("y"), value: Expr::Boolean(true) }],
        }),
    );

    assert_eq!(
        parse("let foobar = y;"),
        Ok(Program {
            statements: vec![Stmt::Let { name: Key::new("foobar"), value: Expr::id("y") }],
        }),
    );

    // The trailing semicolon is optional.
    assert_eq!(
        parse("let x = 5"),
        Ok(Program {
            statements: vec![Stmt::Let { name: Key::new("x"), value: Expr::Integer(5) }],
        }),
    );
}


#[test]
fn return_statements() {
    assert_eq!(
        parse("return 5; return x;"),
        Ok(Program {
            statements: vec![
                Stmt::Return(Expr::Integer(5)),
                Stmt::Return(Expr::id("x")),
            ],
        }),
    );
}


#[test]
fn literals() {
    assert_eq!(parse_one("foobar"), Expr::id("foobar"));
    assert_eq!(parse_one("5"), Expr::Integer(5));
    assert_eq!(parse_one("true"), Expr::Boolean(true));
    assert_eq!(parse_one("false"), Expr::Boolean(false));
    assert_eq!(parse_one("\"hello world\""), Expr::string("hello world"));
    assert_eq!(parse_one("9223372036854775807"), Expr::Integer(9223372036854775807));
}


#[test]
fn prefix_expressions() {
    assert_eq!(parse_one("!5"), prefix(UnOp::LogicalNegate, Expr::Integer(5)));
    assert_eq!(parse_one("-15"), prefix(UnOp::ArithmeticalNegate, Expr::Integer(15)));
    assert_eq!(parse_one("!true"), prefix(UnOp::LogicalNegate, Expr::Boolean(true)));
}


#[test]
fn infix_expressions() {
    let cases = vec![
        ("5 + 5", BinOp::Add),
        ("5 - 5", BinOp::Subtract),
        ("5 * 5", BinOp::Multiply),
        ("5 / 5", BinOp::Divide),
        ("5 < 5", BinOp::Less),
        ("5 > 5", BinOp::Greater),
        ("5 == 5", BinOp::Equal),
        ("5 != 5", BinOp::NotEqual),
    ];

    for (input, op) in cases {
        assert_eq!(parse_one(input), infix(op, Expr::Integer(5), Expr::Integer(5)));
    }
}


#[test]
fn operator_precedence() {
    let cases = vec![
        ("-a * b", "((-a) * b)"),
        ("!-a", "(!(-a))"),
        ("a + b + c", "((a + b) + c)"),
        ("a + b - c", "((a + b) - c)"),
        ("a * b * c", "((a * b) * c)"),
        ("a * b / c", "((a * b) / c)"),
        ("a + b / c", "(a + (b / c))"),
        ("a + b * c + d / e - f", "(((a + (b * c)) + (d / e)) - f)"),
        ("3 + 4; -5 * 5", "(3 + 4)((-5) * 5)"),
        ("5 > 4 == 3 < 4", "((5 > 4) == (3 < 4))"),
        ("5 < 4 != 3 > 4", "((5 < 4) != (3 > 4))"),
        ("3 + 4 * 5 == 3 * 1 + 4 * 5", "((3 + (4 * 5)) == ((3 * 1) + (4 * 5)))"),
        ("true", "true"),
        ("false", "false"),
        ("3 > 5 == false", "((3 > 5) == false)"),
        ("1 + (2 + 3) + 4", "((1 + (2 + 3)) + 4)"),
        ("(5 + 5) * 2", "((5 + 5) * 2)"),
        ("2 / (5 + 5)", "(2 / (5 + 5))"),
        ("-(5 + 5)", "(-(5 + 5))"),
        ("!(true == true)", "(!(true == true))"),
        ("a + add(b * c) + d", "((a + add((b * c))) + d)"),
        (
            "add(a, b, 1, 2 * 3, 4 + 5, add(6, 7 * 8))",
            "add(a,b,1,(2 * 3),(4 + 5),add(6,(7 * 8)))",
        ),
        ("add(a + b + c * d / f + g)", "add((((a + b) + ((c * d) / f)) + g))"),
        ("a * [1, 2, 3, 4][b * c] * d", "((a * ([1,2,3,4][(b * c)])) * d)"),
        (
            "add(a * b[2], b[1], 2 * [1, 2][1])",
            "add((a * (b[2])),(b[1]),(2 * ([1,2][1])))",
        ),
    ];

    for (input, want) in cases {
        assert_eq!(parse(input).unwrap().to_string(), want);
    }
}


#[test]
fn canonical_form_reparses() {
    // String literals are excluded: their canonical form drops the quotes.
    let cases = vec![
        "a + b * c + d / e - f",
        "-(5 + 5) * !x",
        "add(a, b[1], fn(x) { x })",
        "if (x < y) { x } else { y }",
        "let q = {1: [2, 3]}; q[1][0]",
    ];

    for input in cases {
        let canonical = parse(input).unwrap().to_string();
        assert_eq!(parse(&canonical).unwrap().to_string(), canonical);
    }
}


#[test]
fn if_expressions() {
    assert_eq!(
        parse_one("if (x < y) { x }"),
        Expr::If {
            condition: Box::new(infix(BinOp::Less, Expr::id("x"), Expr::id("y"))),
            consequence: Block(vec![Stmt::Expr(Expr::id("x"))]),
            alternative: None,
        },
    );

    assert_eq!(
        parse_one("if (x < y) { x } else { y }"),
        Expr::If {
            condition: Box::new(infix(BinOp::Less, Expr::id("x"), Expr::id("y"))),
            consequence: Block(vec![Stmt::Expr(Expr::id("x"))]),
            alternative: Some(Block(vec![Stmt::Expr(Expr::id("y"))])),
        },
    );
}


#[test]
fn function_literals() {
    assert_eq!(
        parse_one("fn(x, y) { x + y; }"),
        Expr::Function {
            params: vec![Key::new("x"), Key::new("y")],
            body: Block(vec![Stmt::Expr(infix(BinOp::Add, Expr::id("x"), Expr::id("y")))]),
        },
    );

    assert_eq!(
        parse_one("fn() {}"),
        Expr::Function { params: vec![], body: Block(vec![]) },
    );

    assert_eq!(
        parse_one("fn(x) {}"),
        Expr::Function { params: vec![Key::new("x")], body: Block(vec![]) },
    );
}


#[test]
fn call_expressions() {
    assert_eq!(
        parse_one("add(1, 2 * 3, 4 + 5)"),
        call(Expr::id("add"), vec![
            Expr::Integer(1),
            infix(BinOp::Multiply, Expr::Integer(2), Expr::Integer(3)),
            infix(BinOp::Add, Expr::Integer(4), Expr::Integer(5)),
        ]),
    );

    assert_eq!(parse_one("noargs()"), call(Expr::id("noargs"), vec![]));

    // Function literals can be called directly.
    assert_eq!(
        parse_one("fn(x) { x }(5)"),
        call(
            Expr::Function {
                params: vec![Key::new("x")],
                body: Block(vec![Stmt::Expr(Expr::id("x"))]),
            },
            vec![Expr::Integer(5)],
        ),
    );
}


#[test]
fn array_literals() {
    assert_eq!(parse_one("[]"), Expr::List(vec![]));

    assert_eq!(
        parse_one("[1, 2 * 2, 3 + 3]"),
        Expr::List(vec![
            Expr::Integer(1),
            infix(BinOp::Multiply, Expr::Integer(2), Expr::Integer(2)),
            infix(BinOp::Add, Expr::Integer(3), Expr::Integer(3)),
        ]),
    );
}


#[test]
fn index_expressions() {
    assert_eq!(
        parse_one("myArray[1 + 1]"),
        index(
            Expr::id("myArray"),
            infix(BinOp::Add, Expr::Integer(1), Expr::Integer(1)),
        ),
    );
}


#[test]
fn hash_literals() {
    assert_eq!(parse_one("{}"), Expr::Map(vec![]));

    assert_eq!(
        parse_one("{\"one\": 1, \"two\": 2, \"three\": 3}"),
        Expr::Map(vec![
            (Expr::string("one"), Expr::Integer(1)),
            (Expr::string("two"), Expr::Integer(2)),
            (Expr::string("three"), Expr::Integer(3)),
        ]),
    );

    assert_eq!(
        parse_one("{1: true, false: 2}"),
        Expr::Map(vec![
            (Expr::Integer(1), Expr::Boolean(true)),
            (Expr::Boolean(false), Expr::Integer(2)),
        ]),
    );

    assert_eq!(
        parse_one("{\"one\": 0 + 1, \"two\": 10 - 8}"),
        Expr::Map(vec![
            (Expr::string("one"), infix(BinOp::Add, Expr::Integer(0), Expr::Integer(1))),
            (Expr::string("two"), infix(BinOp::Subtract, Expr::Integer(10), Expr::Integer(8))),
        ]),
    );
}


#[test]
fn errors() {
    assert_eq!(parse_errors("let x 5;"), vec!["expected '=', got int"]);

    assert_eq!(parse_errors("let = 5;"), vec![
        "expected name, got '='",
        "no prefix parse function for '=' found",
    ]);

    assert_eq!(parse_errors("let x = ;"), vec![
        "no prefix parse function for ';' found",
    ]);

    assert_eq!(parse_errors("@"), vec![
        "no prefix parse function for ILLEGAL found",
    ]);

    // Recovery after a failed `if` is coarse: the parser re-enters at the
    // brace and misreads the block as a hash literal.
    assert_eq!(parse_errors("if (x { y }"), vec![
        "expected ')', got '{'",
        "expected ':', got '}'",
        "no prefix parse function for '}' found",
    ]);

    assert_eq!(parse_errors("[1, 2"), vec![
        "expected ']', got EOF",
    ]);

    // Recovery: a broken statement does not take later statements with it.
    assert_eq!(parse_errors("let x 5; let y 6;"), vec![
        "expected '=', got int",
        "expected '=', got int",
    ]);
}


#[test]
fn error_locations() {
    let errors = parse("let x\n  5;").unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].location.line, 2);
    assert_eq!(errors[0].location.offset, 8);
    assert_eq!(errors[0].location.length, 1);
}
