use php_code_scanner::scanner::{ClassKind, IncludeKind, StructuralRecord, UseStatement};
use php_code_scanner::{
    LineRange, ScanConfig, ScanError, Token, TokenArrayScanner, TokenKind, tokenize,
};

const SERVICE: &str = r"<?php
namespace Foo\Bar;

use A\B as C, D\E;
use F\{G, H as I};

require_once __DIR__ . '/bootstrap.php';

/**
 * A service.
 */
final class Service extends Base implements C
{
    public function run() {}
}

abstract class Model {}

function helper($x) { return $x; }
";

#[test]
fn single_namespace_is_reported() {
    let scanner = TokenArrayScanner::new(tokenize(SERVICE));
    assert_eq!(scanner.namespaces().unwrap(), vec!["Foo\\Bar"]);
}

#[test]
fn use_statements_with_aliases() {
    let scanner = TokenArrayScanner::new(tokenize("<?php use A\\B as C, D\\E;"));
    let uses = scanner.uses(None).unwrap();
    assert_eq!(
        uses,
        vec![
            &UseStatement::new("A\\B", Some("C")),
            &UseStatement::new("D\\E", None),
        ]
    );
}

#[test]
fn group_use_prefixes_each_import() {
    let scanner = TokenArrayScanner::new(tokenize(SERVICE));
    let imports: Vec<_> = scanner
        .uses(Some("Foo\\Bar"))
        .unwrap()
        .into_iter()
        .map(|statement| (statement.import.as_str(), statement.alias.as_deref()))
        .collect();
    assert_eq!(
        imports,
        vec![
            ("A\\B", Some("C")),
            ("D\\E", None),
            ("F\\G", None),
            ("F\\H", Some("I")),
        ]
    );
    assert!(scanner.uses(None).unwrap().is_empty());
}

#[test]
fn include_path_is_kept_verbatim() {
    let scanner = TokenArrayScanner::new(tokenize(SERVICE));
    let includes = scanner.includes().unwrap();
    assert_eq!(includes.len(), 1);
    assert_eq!(includes[0].kind, IncludeKind::RequireOnce);
    assert_eq!(includes[0].path, "__DIR__ . '/bootstrap.php'");
}

#[test]
fn class_modifiers_match_the_declaration() {
    let scanner = TokenArrayScanner::new(tokenize(SERVICE));
    assert_eq!(
        scanner.class_names().unwrap(),
        vec!["Foo\\Bar\\Service", "Foo\\Bar\\Model"]
    );

    let classes: Vec<_> = scanner
        .records()
        .unwrap()
        .iter()
        .filter_map(|record| match record {
            StructuralRecord::ClassLike(class) => Some(class),
            _ => None,
        })
        .collect();
    assert!(classes[0].is_final);
    assert!(!classes[0].is_abstract);
    assert_eq!(classes[0].short_name, "Service");
    assert_eq!(classes[0].kind, ClassKind::Class);
    assert!(!classes[1].is_final);
    assert!(classes[1].is_abstract);
    assert_eq!(classes[1].uses.len(), 4);
}

#[test]
fn doc_comment_before_declaration_starts_the_record() {
    let tokens = tokenize(SERVICE);
    let scanner = TokenArrayScanner::new(&tokens);
    let records = scanner.records().unwrap();
    let service = records
        .iter()
        .find_map(|record| match record {
            StructuralRecord::ClassLike(class) if class.short_name == "Service" => Some(class),
            _ => None,
        })
        .unwrap();
    assert!(tokens[service.token_range.start].is(TokenKind::DocComment));
    assert_eq!(service.line_range.start, 12);
    assert_eq!(service.line_range.end, 15);
    assert!(tokens[service.token_range.end].is_raw("}"));
}

#[test]
fn doc_comment_followed_by_other_code_attaches_to_nothing() {
    let tokens = tokenize("<?php\n/** not attached */\n$x = 1;\nclass A {}\n");
    let scanner = TokenArrayScanner::new(&tokens);
    let records = scanner.records().unwrap();
    assert_eq!(records.len(), 1);
    assert!(tokens[records[0].token_range().start].is(TokenKind::Class));
    assert_eq!(scanner.doc_comment().unwrap(), Some("/** not attached */"));
}

#[test]
fn file_doc_comment_is_absent_when_code_comes_first() {
    let scanner = TokenArrayScanner::new(tokenize("<?php\n$a = 1;\n/** late */\n"));
    assert_eq!(scanner.doc_comment().unwrap(), None);
}

#[test]
fn functions_are_recorded_with_namespace() {
    let scanner = TokenArrayScanner::new(tokenize(SERVICE));
    assert_eq!(scanner.function_names().unwrap(), vec!["Foo\\Bar\\helper"]);
    assert!(scanner.has_function("foo\\bar\\HELPER").unwrap());
    let helper = scanner.function("Foo\\Bar\\helper").unwrap();
    assert_eq!(helper.name().unwrap(), "helper");
    assert_eq!(helper.body().unwrap(), " return $x; ");
}

#[test]
fn lookups_by_name_and_index() {
    let scanner = TokenArrayScanner::new(tokenize(SERVICE));
    assert_eq!(scanner.class(1).unwrap().name().unwrap(), "Foo\\Bar\\Model");
    assert!(scanner.has_class("foo\\bar\\service").unwrap());
    assert!(scanner.has_class("\\Foo\\Bar\\Model").unwrap());
    assert!(!scanner.has_class("Service").unwrap());

    assert_eq!(
        scanner.class(5).err(),
        Some(ScanError::IndexOutOfRange {
            kind: "class",
            index: 5,
            len: 2
        })
    );
    assert_eq!(
        scanner.class("Nope").err(),
        Some(ScanError::NotFound {
            kind: "class",
            name: "Nope".to_string()
        })
    );
    assert!(scanner.function(3).is_err());
}

#[test]
fn class_name_information_carries_imports() {
    let scanner = TokenArrayScanner::new(tokenize(SERVICE));
    let info = scanner.class_name_information("Foo\\Bar\\Service").unwrap();
    assert_eq!(info.namespace(), Some("Foo\\Bar"));
    assert_eq!(info.resolve_name("C"), "A\\B");
    assert_eq!(info.resolve_name("Base"), "Foo\\Bar\\Base");
}

#[test]
fn empty_token_array_is_rejected() {
    let scanner = TokenArrayScanner::new(Vec::<Token>::new());
    assert_eq!(scanner.records().err(), Some(ScanError::NoTokens));
    assert_eq!(scanner.namespaces().err(), Some(ScanError::NoTokens));
    assert_eq!(scanner.has_class("A").err(), Some(ScanError::NoTokens));
    assert_eq!(scanner.doc_comment().err(), Some(ScanError::NoTokens));
}

#[test]
fn scan_runs_once_and_is_cached() {
    let scanner = TokenArrayScanner::new(tokenize(SERVICE));
    let first = scanner.records().unwrap();
    let _ = scanner.class("Missing");
    let second = scanner.records().unwrap();
    assert!(std::ptr::eq(first, second));
    assert_eq!(first, second);
}

#[test]
fn record_ranges_are_ordered() {
    let scanner = TokenArrayScanner::new(tokenize(SERVICE));
    let records = scanner.records().unwrap();
    assert_eq!(records.len(), 7);
    for record in records {
        assert!(record.token_range().end >= record.token_range().start);
        assert!(record.line_range().end >= record.line_range().start);
    }
    for pair in records.windows(2) {
        assert!(pair[1].token_range().start >= pair[0].token_range().end);
    }
}

#[test]
fn global_namespace_block_is_an_empty_name() {
    let scanner = TokenArrayScanner::new(tokenize("<?php namespace { class A {} }"));
    assert_eq!(scanner.namespaces().unwrap(), vec![""]);
    assert_eq!(scanner.class_names().unwrap(), vec!["A"]);
}

#[test]
fn uses_are_scoped_per_namespace() {
    let source = "<?php
namespace One;
use Lib\\X;
class A {}
namespace Two;
use Lib\\Y;
class B {}
";
    let scanner = TokenArrayScanner::new(tokenize(source));
    assert_eq!(scanner.namespaces().unwrap(), vec!["One", "Two"]);
    assert_eq!(scanner.class_names().unwrap(), vec!["One\\A", "Two\\B"]);
    assert_eq!(scanner.uses(Some("Two")).unwrap(), vec![&UseStatement::new("Lib\\Y", None)]);
    let b = scanner.class("Two\\B").unwrap();
    assert_eq!(b.name_information().uses(), &[UseStatement::new("Lib\\Y", None)]);
}

#[test]
fn class_constant_fetch_does_not_start_a_declaration() {
    let scanner = TokenArrayScanner::new(tokenize("<?php $name = Foo::class; interface Bar {}"));
    assert_eq!(scanner.class_names().unwrap(), vec!["Bar"]);
}

#[test]
fn unbalanced_class_is_truncated_by_default() {
    let tokens = tokenize("<?php class Broken { public function f() {");
    let scanner = TokenArrayScanner::new(&tokens);
    let records = scanner.records().unwrap();
    match &records[0] {
        StructuralRecord::ClassLike(class) => {
            assert!(class.truncated);
            assert_eq!(class.name, "Broken");
            assert_eq!(class.token_range.end, tokens.len() - 1);
        }
        other => panic!("unexpected record {other:?}"),
    }
}

#[test]
fn unbalanced_class_is_rejected_when_strict() {
    let scanner = TokenArrayScanner::with_config(
        tokenize("<?php class Broken { public function f() {"),
        ScanConfig::strict(),
    );
    assert_eq!(
        scanner.records().err(),
        Some(ScanError::Unbalanced {
            delimiter: '}',
            context: "class",
            line: 1
        })
    );
}

#[test]
fn closures_and_anonymous_classes_are_not_declarations() {
    let scanner = TokenArrayScanner::new(tokenize(
        "<?php
$f = function ($x) use ($y) { return $x; };
function real() {}
$o = new class { public function inner() {} };
function &byRef() { static $v; return $v; }
",
    ));
    assert_eq!(scanner.function_names().unwrap(), vec!["real", "byRef"]);
    assert!(scanner.class_names().unwrap().is_empty());
    assert!(!scanner.has_function("inner").unwrap());
}

#[test]
fn attached_doc_comment_starts_the_record_line_range() {
    let scanner = TokenArrayScanner::new(tokenize("<?php\n/**\n * Helper.\n */\nfunction helper() {\n}\n"));
    let records = scanner.records().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].line_range(), LineRange::new(2, 6));
}
