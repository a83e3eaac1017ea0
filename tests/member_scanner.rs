use php_code_scanner::scanner::Visibility;
use php_code_scanner::{
    LineRange, MemberScanner, ScanConfig, ScanError, Token, TokenArrayScanner, TokenKind, TokenRange,
    tokenize,
};

#[test]
fn function_parameters_and_body() {
    let tokens = tokenize("<?php function foo($a, $b = 2, &$c) { return 1; }");
    let function = MemberScanner::new(&tokens[1..]);
    assert_eq!(function.name().unwrap(), "foo");
    assert_eq!(function.parameter_names().unwrap(), vec!["a", "b", "c"]);
    assert_eq!(function.body().unwrap(), " return 1; ");
    assert!(function.has_body().unwrap());
    assert_eq!(function.return_type().unwrap(), None);
    assert_eq!(function.visibility().unwrap(), Visibility::Public);

    let b = function.parameter("b").unwrap();
    assert_eq!(b.position, 1);
    assert!(b.is_optional);
    assert_eq!(b.default_value.as_deref(), Some("2"));

    let c = function.parameter("$c").unwrap();
    assert!(c.is_passed_by_reference);
    assert!(!c.is_optional);
    assert!(function.has_parameter("$a").unwrap());
    assert!(!function.has_parameter("d").unwrap());
}

#[test]
fn body_and_lines_from_hand_built_tokens() {
    let tokens = vec![
        Token::classified(TokenKind::Function, "function", 1),
        Token::classified(TokenKind::Whitespace, " ", 1),
        Token::classified(TokenKind::Identifier, "f", 1),
        Token::raw("("),
        Token::raw(")"),
        Token::classified(TokenKind::Whitespace, " ", 1),
        Token::raw("{"),
        Token::classified(TokenKind::Whitespace, "\n    ", 1),
        Token::classified(TokenKind::Return, "return", 2),
        Token::raw(";"),
        Token::classified(TokenKind::Whitespace, "\n", 2),
        Token::raw("}"),
    ];
    let function = MemberScanner::new(&tokens);
    assert_eq!(function.body().unwrap(), "\n    return;\n");
    assert_eq!(function.line_range().unwrap(), LineRange::new(1, 3));
    assert!(function.parameters().unwrap().is_empty());
}

#[test]
fn method_modifiers() {
    let tokens = tokenize("<?php final protected static function make(): static { return new static(); }");
    let method = MemberScanner::new(&tokens[1..]);
    assert!(method.is_final().unwrap());
    assert!(method.is_static().unwrap());
    assert!(method.is_protected().unwrap());
    assert!(!method.is_public().unwrap());
    assert!(!method.is_abstract().unwrap());
    assert_eq!(method.return_type().unwrap(), Some("static"));
}

#[test]
fn doc_comment_belongs_to_the_function() {
    let scanner = TokenArrayScanner::new(tokenize(
        "<?php\n/**\n * Adds.\n * @param int $a\n */\nfunction add(int $a) { return $a; }\n",
    ));
    let add = scanner.function("add").unwrap();
    let doc = add.doc_block().unwrap().unwrap();
    assert_eq!(doc.short_description, "Adds.");
    assert!(doc.has_tag("param"));
    assert_eq!(add.line_range().unwrap(), LineRange::new(6, 6));
}

#[test]
fn unterminated_body_is_truncated_by_default() {
    let tokens = tokenize("<?php function f() { if (1) {");
    let function = MemberScanner::new(&tokens[1..]);
    let record = function.record().unwrap();
    assert!(record.truncated);
    assert_eq!(record.body, " if (1) {");
}

#[test]
fn unterminated_body_is_rejected_when_strict() {
    let tokens = tokenize("<?php function f() { if (1) {");
    let function = MemberScanner::with_config(&tokens[1..], ScanConfig::strict());
    assert_eq!(
        function.record().err(),
        Some(ScanError::Unbalanced {
            delimiter: '}',
            context: "function body",
            line: 1,
        })
    );
}

#[test]
fn unterminated_parameter_list() {
    let tokens = tokenize("<?php function f($a, $b");
    let function = MemberScanner::with_config(&tokens[1..], ScanConfig::strict());
    assert_eq!(
        function.record().err(),
        Some(ScanError::Unbalanced {
            delimiter: ')',
            context: "parameter list",
            line: 1,
        })
    );
}

#[test]
fn parameter_index_out_of_range() {
    let tokens = tokenize("<?php function foo($a, $b = 2, &$c) {}");
    let function = MemberScanner::new(&tokens[1..]);
    assert_eq!(
        function.parameter(9).err(),
        Some(ScanError::IndexOutOfRange {
            kind: "parameter",
            index: 9,
            len: 3,
        })
    );
    assert_eq!(function.body().unwrap(), "");
}

#[test]
fn empty_member_slice_is_rejected() {
    let function = MemberScanner::new(&[]);
    assert_eq!(function.name().err(), Some(ScanError::NoTokens));
}

#[test]
fn parameter_ranges_locate_each_parameter_in_the_member() {
    let tokens = tokenize("<?php function foo($a, $b = 2, &$c) {}");
    let scanner = TokenArrayScanner::new(&tokens);
    let function = scanner.function("foo").unwrap();
    let record = function.record().unwrap();
    assert_eq!(record.token_range, TokenRange::new(1, tokens.len() - 1));

    let member_tokens = function.tokens();
    let texts: Vec<String> = record
        .parameters
        .iter()
        .map(|parameter| {
            parameter
                .token_range
                .slice(member_tokens)
                .iter()
                .map(Token::text)
                .collect()
        })
        .collect();
    assert_eq!(texts, vec!["$a", "$b = 2", "&$c"]);
    assert_eq!(record.parameters[1].token_range, TokenRange::new(7, 11));
}

#[test]
fn defaults_with_parentheses_do_not_split_parameters() {
    let tokens = tokenize("<?php function f($a = array([array('default')]), $b = foo(1, 2)) {}");
    let function = MemberScanner::new(&tokens[1..]);
    assert_eq!(function.parameter_names().unwrap(), vec!["a", "b"]);
    assert_eq!(
        function.parameter("a").unwrap().default_value.as_deref(),
        Some("array([array('default')])")
    );
    assert_eq!(function.parameter("b").unwrap().default_value.as_deref(), Some("foo(1, 2)"));
}
