//! Tests for the standard expression evaluator.

use std::collections::BTreeMap;

use msgfmt::expression::{EvaluationError, ExpressionEvaluator, StandardEvaluator};
use msgfmt::{SharedList, Value, Variables, evaluate_expression, params};

fn eval(expression: &str, variables: &Variables) -> Value {
    evaluate_expression(expression, variables).unwrap()
}

#[test]
fn addition_with_variable() {
    assert_eq!(eval("1 + #add", &params! { "add" => 20 }), Value::Int(21));
}

#[test]
fn empty_function_in_ternary() {
    let expression = "#empty(#label) ? '空です' : #label";
    assert_eq!(eval(expression, &params! {}), Value::from("空です"));
    assert_eq!(
        eval(expression, &params! { "label" => "Hello" }),
        Value::from("Hello")
    );
    assert_eq!(eval(expression, &params! { "label" => "" }), Value::from("空です"));
}

#[test]
fn empty_function_on_collections() {
    let vars = params! {
        "none" => Vec::<i32>::new(),
        "some" => vec![1],
        "map" => BTreeMap::<String, Value>::new(),
    };
    assert_eq!(eval("#empty(#none)", &vars), Value::Bool(true));
    assert_eq!(eval("#empty(#some)", &vars), Value::Bool(false));
    assert_eq!(eval("#empty(#map)", &vars), Value::Bool(true));
    assert_eq!(eval("#empty(0)", &vars), Value::Bool(false));
}

#[test]
fn join_function_over_array() {
    assert_eq!(
        eval("#join(#array, ', ')", &params! { "array" => vec![1, 2, 3] }),
        Value::from("1, 2, 3")
    );
}

#[test]
fn join_formats_nested_values() {
    let vars = params! { "items" => vec![Value::from(1.5), Value::from(true), Value::Null] };
    assert_eq!(eval("#join(#items, '/')", &vars), Value::from("1.5/true/"));
}

#[test]
fn format_function_fixed_precision() {
    assert_eq!(
        eval("#format('%1.2f', #v)", &params! { "v" => 3.1 }),
        Value::from("3.10")
    );
    assert_eq!(
        eval("#format('%s=%05d', 'id', #n)", &params! { "n" => 42 }),
        Value::from("id=00042")
    );
}

#[test]
fn case_functions() {
    let vars = params! { "name" => "élan" };
    assert_eq!(eval("#upper(#name)", &vars), Value::from("ÉLAN"));
    assert_eq!(eval("#cap(#name)", &vars), Value::from("Élan"));
    assert_eq!(eval("#lower('ABC')", &vars), Value::from("abc"));
}

#[test]
fn size_and_default_functions() {
    let vars = params! { "list" => vec![1, 2, 3], "blank" => "" };
    assert_eq!(eval("#size(#list)", &vars), Value::Int(3));
    assert_eq!(eval("#list.size", &vars), Value::Int(3));
    assert_eq!(eval("#default(#blank, 'n/a')", &vars), Value::from("n/a"));
    assert_eq!(eval("#size(#missing)", &vars), Value::Int(0));
}

#[test]
fn unbound_variable_is_null() {
    assert_eq!(eval("#missing", &params! {}), Value::Null);
    assert_eq!(eval("#missing == null", &params! {}), Value::Bool(true));
}

#[test]
fn comparison_and_logic() {
    let vars = params! { "min" => 1, "max" => 10, "v" => 3.1 };
    assert_eq!(
        eval("#v >= #min && #v le #max", &vars),
        Value::Bool(true)
    );
    assert_eq!(eval("#v > #max or not (#v > #min)", &vars), Value::Bool(false));
    assert_eq!(eval("#min == 1.0", &vars), Value::Bool(true));
    assert_eq!(eval("'abc' < 'abd'", &vars), Value::Bool(true));
    assert_eq!(eval("1 == '1'", &vars), Value::Bool(false));
}

#[test]
fn keyword_arithmetic() {
    assert_eq!(eval("7 div 2", &params! {}), Value::Int(3));
    assert_eq!(eval("7 mod 2", &params! {}), Value::Int(1));
    assert_eq!(eval("-(2 * 3) + 1", &params! {}), Value::Int(-5));
}

#[test]
fn map_properties_and_null_safe_access() {
    let mut user = BTreeMap::new();
    user.insert("name".to_string(), Value::from("Alice"));
    user.insert("tags".to_string(), Value::from(vec!["a", "b"]));
    let vars = params! { "user" => user };

    assert_eq!(eval("#user.name", &vars), Value::from("Alice"));
    assert_eq!(eval("#user.tags[1]", &vars), Value::from("b"));
    assert_eq!(eval("#user['name']", &vars), Value::from("Alice"));
    assert_eq!(eval("#nobody?.name", &vars), Value::Null);
    assert_eq!(eval("#nobody?.name ?: 'guest'", &vars), Value::from("guest"));
}

#[test]
fn auto_growing_index_access() {
    let list = SharedList::new();
    let mut obj = BTreeMap::new();
    obj.insert("list".to_string(), Value::from(list.clone()));
    let vars = params! { "obj" => obj };

    assert_eq!(eval("#obj.list[3]", &vars), Value::from(""));
    assert_eq!(list.len(), 4);
    assert_eq!(list.get(0), Some(Value::from("")));
}

#[test]
fn auto_grow_respects_limit() {
    let evaluator = StandardEvaluator::builder().auto_grow_limit(4).build();
    let list = SharedList::from_values([1]);
    let vars = params! { "list" => list.clone() };

    assert_eq!(evaluator.evaluate("#list[3]", &vars).unwrap(), Value::from(""));
    let err = evaluator.evaluate("#list[4]", &vars).unwrap_err();
    assert_eq!(
        err.evaluation_error(),
        Some(&EvaluationError::IndexOutOfBounds { index: 4, len: 4 })
    );
    assert_eq!(list.len(), 4);
}

#[test]
fn existing_elements_are_read_without_growth() {
    let list = SharedList::from_values(["a", "b"]);
    let vars = params! { "list" => list.clone() };
    assert_eq!(eval("#list[1]", &vars), Value::from("b"));
    assert_eq!(list.len(), 2);
}

#[test]
fn custom_functions_are_callable() {
    let mut evaluator = StandardEvaluator::new();
    evaluator
        .functions_mut()
        .register("twice", |args: &[Value]| match args {
            [Value::Int(n)] => Ok(Value::Int(n * 2)),
            _ => Err(EvaluationError::InvalidArgument {
                function: "twice".to_string(),
                message: "expected one integer".to_string(),
            }),
        });

    let result = evaluator.evaluate("#twice(#n) + 1", &params! { "n" => 4 });
    assert_eq!(result.unwrap(), Value::Int(9));
}

#[test]
fn parsed_expressions_are_cached() {
    let evaluator = StandardEvaluator::new();
    let vars = params! { "a" => 1 };
    evaluator.evaluate("#a + 1", &vars).unwrap();
    evaluator.evaluate("#a + 1", &vars).unwrap();
    evaluator.evaluate("#a + 2", &vars).unwrap();
    assert_eq!(evaluator.cache_len(), 2);

    evaluator.clear_cache();
    assert_eq!(evaluator.cache_len(), 0);
}

#[test]
fn inline_lists() {
    assert_eq!(
        eval("#join({1, 'two', 3.5}, '-')", &params! {}),
        Value::from("1-two-3.5")
    );
}
