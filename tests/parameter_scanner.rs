use php_code_scanner::scanner::UseStatement;
use php_code_scanner::{NameInformation, ParameterScanner, ScanConfig, ScanError, tokenize};

fn app_names() -> NameInformation {
    NameInformation::new(Some("App".to_string()), vec![UseStatement::new("Lib\\Bar", None)])
}

#[test]
fn nested_default_is_kept_verbatim() {
    let tokens = tokenize("<?php $x = array([array('default')])");
    let parameter = ParameterScanner::new(&tokens[1..], 0);
    let record = parameter.record().unwrap();
    assert_eq!(record.name, "x");
    assert_eq!(record.default_value.as_deref(), Some("array([array('default')])"));
    assert!(record.is_default_value_available);
    assert!(record.is_optional);
    assert_eq!(record.type_hint, None);
}

#[test]
fn union_type_resolves_each_class_name() {
    let tokens = tokenize("<?php Bar|null $b");
    let parameter = ParameterScanner::new(&tokens[1..], 2).with_name_information(app_names());
    assert_eq!(parameter.type_hint().unwrap(), Some("Lib\\Bar|null"));
    assert_eq!(parameter.record().unwrap().position, 2);
}

#[test]
fn type_resolution_can_be_disabled() {
    let tokens = tokenize("<?php Bar|null $b");
    let config = ScanConfig {
        resolve_type_hints: false,
        ..ScanConfig::default()
    };
    let parameter =
        ParameterScanner::with_config(&tokens[1..], 0, config).with_name_information(app_names());
    assert_eq!(parameter.type_hint().unwrap(), Some("Bar|null"));
}

#[test]
fn ampersand_between_types_is_an_intersection() {
    let tokens = tokenize("<?php A&B $x");
    let record = ParameterScanner::new(&tokens[1..], 0).record().cloned().unwrap();
    assert_eq!(record.type_hint.as_deref(), Some("A&B"));
    assert!(!record.is_passed_by_reference);
}

#[test]
fn ampersand_before_variable_passes_by_reference() {
    let tokens = tokenize("<?php array &$items");
    let record = ParameterScanner::new(&tokens[1..], 0).record().cloned().unwrap();
    assert!(record.is_passed_by_reference);
    assert!(record.is_array);
    assert_eq!(record.type_hint.as_deref(), Some("array"));
}

#[test]
fn attributes_are_not_part_of_the_type() {
    let tokens = tokenize("<?php #[Sensitive] string $password");
    let parameter = ParameterScanner::new(&tokens[1..], 0);
    assert_eq!(parameter.name().unwrap(), "password");
    assert_eq!(parameter.type_hint().unwrap(), Some("string"));
}

#[test]
fn variadic_has_no_default_and_is_optional() {
    let tokens = tokenize("<?php string ...$names");
    let record = ParameterScanner::new(&tokens[1..], 0).record().cloned().unwrap();
    assert!(record.is_variadic);
    assert!(record.is_optional);
    assert!(!record.is_default_value_available);
    assert_eq!(record.default_value, None);
}

#[test]
fn nullable_and_callable_flags() {
    let tokens = tokenize("<?php ?callable $next = null");
    let record = ParameterScanner::new(&tokens[1..], 0).record().cloned().unwrap();
    assert!(record.is_nullable);
    assert!(record.is_callable);
    assert_eq!(record.type_hint.as_deref(), Some("callable"));
    assert_eq!(record.default_value.as_deref(), Some("null"));
}

#[test]
fn empty_parameter_slice_is_rejected() {
    let parameter = ParameterScanner::new(&[], 0);
    assert_eq!(parameter.name().err(), Some(ScanError::NoTokens));
}
