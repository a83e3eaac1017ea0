use php_code_scanner::scanner::{DocBlock, DocTag};

#[test]
fn descriptions_and_multi_line_tags() {
    let block = DocBlock::parse(
        "/**
     * Short line one
     * continues here
     *
     * Long description.
     * Second line.
     *
     * @param int $a The a
     *     value.
     * @return void
     */",
    );
    assert_eq!(block.short_description, "Short line one continues here");
    assert_eq!(block.long_description, "Long description.\nSecond line.");
    assert_eq!(
        block.tags,
        vec![
            DocTag {
                name: "param".into(),
                content: "int $a The a\nvalue.".into(),
            },
            DocTag {
                name: "return".into(),
                content: "void".into(),
            },
        ]
    );
}

#[test]
fn short_description_ends_at_first_period() {
    let block = DocBlock::parse("/**\n * First. \n * Rest of it.\n */");
    assert_eq!(block.short_description, "First.");
    assert_eq!(block.long_description, "Rest of it.");
    assert!(block.tags.is_empty());
}

#[test]
fn repeated_tags_can_be_filtered() {
    let block = DocBlock::parse("/** Sum.\n * @param int $a\n * @param int $b\n * @deprecated\n */");
    let params: Vec<_> = block.tags_named("param").map(|tag| tag.content.as_str()).collect();
    assert_eq!(params, vec!["int $a", "int $b"]);
    assert!(block.has_tag("deprecated"));
    assert!(!block.has_tag("return"));
    assert_eq!(block.short_description, "Sum.");
}
