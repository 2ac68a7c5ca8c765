//! Tests for expression error types and error message formatting.

use msgfmt::expression::{
    DisabledEvaluator, EvaluationError, ExpressionError, ExpressionEvaluator, StandardEvaluator,
    parse_expression,
};
use msgfmt::{compute_suggestions, evaluate_expression, params};

#[test]
fn free_identifier_is_a_syntax_error() {
    let err = evaluate_expression("aaa ?  label", &params! {}).unwrap_err();
    assert!(err.is_syntax());
    insta::assert_snapshot!(
        err.to_string(),
        @"syntax error at column 1 in 'aaa ?  label': unknown identifier 'aaa'; variables are referenced as '#aaa'"
    );
}

#[test]
fn syntax_error_column_counts_characters() {
    let err = parse_expression("'日本' + )").unwrap_err();
    assert_eq!(err.column, 8);
    assert_eq!(err.message, "unexpected ')'");
}

#[test]
fn unclosed_call_is_a_syntax_error() {
    let err = parse_expression("#join(#a, ','").unwrap_err();
    insta::assert_snapshot!(err.message, @"expected ',', found end of expression");
}

#[test]
fn trailing_tokens_are_rejected() {
    let err = parse_expression("#a #b").unwrap_err();
    assert_eq!(err.column, 4);
    assert_eq!(err.message, "unexpected '#b'");
}

#[test]
fn keyword_operator_in_operand_position() {
    let err = parse_expression("1 + and").unwrap_err();
    assert_eq!(err.message, "unexpected operator 'and'");
}

#[test]
fn unknown_function_suggests_names() {
    let err = evaluate_expression("#jion(#a, ',')", &params! {}).unwrap_err();
    assert!(err.is_evaluation());
    insta::assert_snapshot!(
        err.to_string(),
        @"failed to evaluate '#jion(#a, ',')': unknown function '#jion', did you mean: join?"
    );
}

#[test]
fn division_by_zero_is_an_evaluation_error() {
    let err = evaluate_expression("1 / #n", &params! { "n" => 0 }).unwrap_err();
    assert_eq!(err.evaluation_error(), Some(&EvaluationError::DivisionByZero));
}

#[test]
fn float_division_by_zero_is_infinite() {
    let value = evaluate_expression("1.0 / #n", &params! { "n" => 0 }).unwrap();
    assert_eq!(value.as_float(), Some(f64::INFINITY));
}

#[test]
fn type_mismatch_names_operand_kinds() {
    let err = evaluate_expression("#a - 'x'", &params! { "a" => 1 }).unwrap_err();
    insta::assert_snapshot!(
        err.to_string(),
        @"failed to evaluate '#a - 'x'': cannot apply '-' to int and string"
    );
}

#[test]
fn null_condition_is_rejected() {
    let err = evaluate_expression("#flag ? 1 : 2", &params! {}).unwrap_err();
    assert!(matches!(
        err.evaluation_error(),
        Some(EvaluationError::TypeMismatch { found, .. }) if found == "null"
    ));
}

#[test]
fn missing_property() {
    let err = evaluate_expression("#n.name", &params! { "n" => 3 }).unwrap_err();
    assert_eq!(
        err.evaluation_error(),
        Some(&EvaluationError::MissingProperty {
            property: "name".to_string(),
            kind: "int".to_string(),
        })
    );
}

#[test]
fn property_of_null_without_null_safe_operator() {
    let err = evaluate_expression("#nobody.name", &params! {}).unwrap_err();
    insta::assert_snapshot!(
        err.to_string(),
        @"failed to evaluate '#nobody.name': cannot read property 'name' of null"
    );
}

#[test]
fn index_out_of_bounds_on_fixed_list() {
    let err = evaluate_expression("#a[5]", &params! { "a" => vec![1, 2] }).unwrap_err();
    assert_eq!(
        err.evaluation_error(),
        Some(&EvaluationError::IndexOutOfBounds { index: 5, len: 2 })
    );
}

#[test]
fn function_argument_count() {
    let err = evaluate_expression("#join(#a)", &params! {}).unwrap_err();
    insta::assert_snapshot!(
        err.to_string(),
        @"failed to evaluate '#join(#a)': function '#join' expects 2 arguments, got 1"
    );
}

#[test]
fn disabled_evaluator_rejects_everything() {
    let err = DisabledEvaluator.evaluate("1 + 1", &params! {}).unwrap_err();
    assert_eq!(err.evaluation_error(), Some(&EvaluationError::Unsupported));
}

#[test]
fn check_reports_only_syntax() {
    let evaluator = StandardEvaluator::new();
    assert!(evaluator.check("#undefined(#x)").is_ok());
    assert!(matches!(
        evaluator.check("#a +"),
        Err(ExpressionError::Syntax(_))
    ));
}

#[test]
fn compute_suggestions_limits_to_three() {
    let available: Vec<String> = (0..10).map(|i| format!("item{i}")).collect();
    let suggestions = compute_suggestions("item", available.iter().map(String::as_str));
    assert_eq!(suggestions, vec!["item0", "item1", "item2"]);
}

#[test]
fn deeply_nested_expression_is_a_syntax_error() {
    let source = format!("{}#n{}", "(".repeat(200_000), ")".repeat(200_000));
    let err = evaluate_expression(&source, &params! { "n" => 1 }).unwrap_err();
    assert!(err.is_syntax());
}

#[test]
fn oversized_format_width_is_an_evaluation_error() {
    for pattern in ["%99999999999999999999d", "%999999999d"] {
        let source = format!("#format('{pattern}', 1)");
        let err = evaluate_expression(&source, &params! {}).unwrap_err();
        assert!(err.is_evaluation(), "{pattern}");
    }
}
