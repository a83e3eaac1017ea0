use php_code_scanner::scanner::TokenCursor;
use php_code_scanner::{Token, TokenKind, tokenize};

#[test]
fn joins_split_string_into_one_literal() {
    let tokens = tokenize("<?php $a = \"x {$b} y\";");
    let mut cursor = TokenCursor::new(&tokens);
    let mut seen = Vec::new();
    while cursor.advance() {
        if !cursor.is_trivia() {
            seen.push((cursor.kind(), cursor.text().to_string()));
        }
    }
    assert_eq!(
        seen,
        vec![
            (Some(TokenKind::OpenTag), "<?php ".to_string()),
            (Some(TokenKind::Variable), "$a".to_string()),
            (None, "=".to_string()),
            (Some(TokenKind::StringLiteral), "\"x {$b} y\"".to_string()),
            (None, ";".to_string()),
        ]
    );
}

#[test]
fn joined_string_spans_from_opening_to_closing_quote() {
    let tokens = vec![
        Token::raw("\""),
        Token::classified(TokenKind::Variable, "$a", 1),
        Token::raw("\""),
        Token::raw(";"),
    ];
    let mut cursor = TokenCursor::new(&tokens);
    assert!(cursor.advance());
    assert_eq!(cursor.start_index(), 0);
    assert_eq!(cursor.index(), 2);
    assert!(cursor.is(TokenKind::StringLiteral));
    assert!(!cursor.is_raw("\""));
    assert!(cursor.advance());
    assert!(cursor.is_raw(";"));
    assert!(!cursor.advance());
    assert!(!cursor.advance());
}

#[test]
fn raw_token_line_follows_newlines_of_previous_token() {
    let tokens = vec![
        Token::classified(TokenKind::Comment, "/* a\nb */", 3),
        Token::raw(";"),
    ];
    let mut cursor = TokenCursor::new(&tokens);
    assert!(cursor.advance());
    assert_eq!(cursor.line(), 3);
    assert!(cursor.advance());
    assert_eq!(cursor.line(), 4);
}

#[test]
fn multi_line_joined_string_counts_every_absorbed_newline() {
    let tokens = vec![
        Token::raw("\""),
        Token::classified(TokenKind::EncapsedAndWhitespace, "one\n", 5),
        Token::classified(TokenKind::Variable, "$two", 6),
        Token::classified(TokenKind::EncapsedAndWhitespace, "\nthree", 6),
        Token::raw("\""),
        Token::raw(";"),
    ];
    let mut cursor = TokenCursor::new(&tokens);
    assert!(cursor.advance());
    assert_eq!(cursor.line(), 5);
    assert_eq!(cursor.text(), "\"one\n$two\nthree\"");
    assert!(cursor.advance());
    assert_eq!(cursor.line(), 7);
}

#[test]
fn unterminated_quote_ends_the_stream() {
    let tokens = vec![
        Token::classified(TokenKind::Echo, "echo", 1),
        Token::raw("\""),
        Token::classified(TokenKind::EncapsedAndWhitespace, "dangling", 1),
    ];
    let mut cursor = TokenCursor::new(&tokens);
    assert!(cursor.advance());
    assert!(!cursor.advance());
}

#[test]
fn empty_slice_never_advances() {
    let mut cursor = TokenCursor::new(&[]);
    assert!(!cursor.advance());
}

#[test]
fn peek_significant_skips_whitespace_and_comments() {
    let tokens = tokenize("<?php class /* c */ Foo {}");
    let mut cursor = TokenCursor::new(&tokens);
    while cursor.advance() && !cursor.is(TokenKind::Class) {}
    assert_eq!(cursor.peek_significant().map(Token::text), Some("Foo"));
    assert_eq!(cursor.peek(2).map(Token::text), Some("/* c */"));
}
