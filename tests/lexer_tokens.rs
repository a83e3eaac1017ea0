use php_code_scanner::{Token, TokenKind, tokenize};

fn significant(tokens: &[Token]) -> Vec<(Option<TokenKind>, &str)> {
    tokens
        .iter()
        .filter(|token| !token.is_trivia())
        .map(|token| (token.kind(), token.text()))
        .collect()
}

#[test]
fn classifies_keywords_and_leaves_punctuation_raw() {
    let tokens = tokenize("<?php\nnamespace Foo;\n");
    assert_eq!(
        tokens,
        vec![
            Token::classified(TokenKind::OpenTag, "<?php\n", 1),
            Token::classified(TokenKind::Namespace, "namespace", 2),
            Token::classified(TokenKind::Whitespace, " ", 2),
            Token::classified(TokenKind::Identifier, "Foo", 2),
            Token::raw(";"),
            Token::classified(TokenKind::Whitespace, "\n", 2),
        ]
    );
}

#[test]
fn splits_interpolated_strings_around_raw_quotes() {
    let tokens = tokenize("<?php $a = \"x $b y\";");
    assert_eq!(
        significant(&tokens),
        vec![
            (Some(TokenKind::OpenTag), "<?php "),
            (Some(TokenKind::Variable), "$a"),
            (None, "="),
            (None, "\""),
            (Some(TokenKind::EncapsedAndWhitespace), "x "),
            (Some(TokenKind::Variable), "$b"),
            (Some(TokenKind::EncapsedAndWhitespace), " y"),
            (None, "\""),
            (None, ";"),
        ]
    );
}

#[test]
fn plain_double_quoted_string_is_one_literal() {
    let tokens = tokenize("<?php 'a' . \"b\\n\";");
    assert_eq!(
        significant(&tokens),
        vec![
            (Some(TokenKind::OpenTag), "<?php "),
            (Some(TokenKind::StringLiteral), "'a'"),
            (None, "."),
            (Some(TokenKind::StringLiteral), "\"b\\n\""),
            (None, ";"),
        ]
    );
}

#[test]
fn names_after_double_colon_are_identifiers() {
    let tokens = tokenize("<?php Foo::class; $x->function;");
    let kinds: Vec<_> = significant(&tokens);
    assert!(kinds.contains(&(Some(TokenKind::Identifier), "class")));
    assert!(kinds.contains(&(Some(TokenKind::Identifier), "function")));
    assert!(!kinds.iter().any(|(kind, _)| *kind == Some(TokenKind::Class)));
}

#[test]
fn keywords_are_case_insensitive() {
    let tokens = tokenize("<?php ABSTRACT Class Foo {}");
    assert_eq!(tokens[1].kind(), Some(TokenKind::Abstract));
    assert_eq!(tokens[3].kind(), Some(TokenKind::Class));
    assert_eq!(tokens[3].text(), "Class");
}

#[test]
fn distinguishes_doc_comments_from_comments() {
    let tokens = tokenize("<?php /** doc */ /**/ /* plain */ // line\n# hash\n");
    let comments: Vec<_> = tokens
        .iter()
        .filter(|token| matches!(token.kind(), Some(TokenKind::Comment | TokenKind::DocComment)))
        .map(|token| (token.kind(), token.text()))
        .collect();
    assert_eq!(
        comments,
        vec![
            (Some(TokenKind::DocComment), "/** doc */"),
            (Some(TokenKind::Comment), "/**/"),
            (Some(TokenKind::Comment), "/* plain */"),
            (Some(TokenKind::Comment), "// line"),
            (Some(TokenKind::Comment), "# hash"),
        ]
    );
}

#[test]
fn lexes_yield_from_as_single_token() {
    let tokens = tokenize("<?php yield from foo(); yield 1;");
    let kinds: Vec<_> = tokens.iter().filter_map(Token::kind).collect();
    assert!(kinds.contains(&TokenKind::YieldFrom));
    assert!(kinds.contains(&TokenKind::Yield));
}

#[test]
fn tracks_lines_of_classified_tokens() {
    let tokens = tokenize("<?php\n/**\n * doc\n */\nclass A {}\n");
    let class = tokens
        .iter()
        .find(|token| token.is(TokenKind::Class))
        .and_then(Token::line);
    assert_eq!(class, Some(5));
}

#[test]
fn inline_html_and_close_tag() {
    let tokens = tokenize("<p><?php echo 1; ?>\n</p>");
    let kinds: Vec<_> = tokens.iter().filter_map(Token::kind).collect();
    assert_eq!(kinds.first(), Some(&TokenKind::InlineHtml));
    assert!(kinds.contains(&TokenKind::CloseTag));
    assert_eq!(tokens.last().map(Token::text), Some("</p>"));
}
