//! Tests for recursive resolution and transitive message lookup.

use std::collections::HashMap;

use msgfmt::{InterpolationContext, InterpolationOptions, Interpolator, Parameter, params};

fn lookup_table(entries: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let table: HashMap<String, String> = entries
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    move |name: &str| table.get(name).cloned()
}

fn recursive(template: &str, parameters: Vec<Parameter>, depth: usize) -> String {
    Interpolator::new()
        .interpolate_with(template, parameters, InterpolationOptions::with_depth(depth), None)
        .unwrap()
}

#[test]
fn value_resolves_through_catalog_message() {
    let lookup = lookup_table(&[("min", "3")]);
    let text = Interpolator::new()
        .interpolate_with(
            r"再帰的なメッセージ：\{abc\}={value}",
            [Parameter::new("value", "{min}")],
            InterpolationOptions::with_depth(2),
            Some(&lookup),
        )
        .unwrap();
    assert_eq!(text, "再帰的なメッセージ：{abc}=3");
}

#[test]
fn mutual_reference_stops_at_repeated_string() {
    let lookup = lookup_table(&[("max", "{value}")]);
    let text = Interpolator::new()
        .interpolate_with(
            r"再帰的なメッセージ：\{abc\}={value}",
            [Parameter::new("value", "{max}")],
            InterpolationOptions::with_depth(5),
            Some(&lookup),
        )
        .unwrap();
    assert_eq!(text, "再帰的なメッセージ：{abc}={max}");
}

#[test]
fn depth_limits_number_of_reruns() {
    let chain = || {
        vec![
            Parameter::new("a", "{b}"),
            Parameter::new("b", "{c}"),
            Parameter::new("c", "done"),
        ]
    };
    assert_eq!(recursive("{a}", chain(), 0), "{b}");
    assert_eq!(recursive("{a}", chain(), 1), "{c}");
    assert_eq!(recursive("{a}", chain(), 2), "done");
    assert_eq!(recursive("{a}", chain(), 10), "done");
}

#[test]
fn cycle_between_parameters_terminates() {
    let parameters = vec![Parameter::new("a", "{b}"), Parameter::new("b", "{a}")];
    assert_eq!(recursive("[{a}]", parameters, 100), "[{b}]");
}

#[test]
fn unresolvable_placeholder_is_a_fixed_point() {
    let text = recursive(r"\{x\} {unknown}", Vec::new(), 3);
    assert_eq!(text, "{x} {unknown}");
}

#[test]
fn escapes_survive_intermediate_passes() {
    let parameters = vec![Parameter::new("a", "{c}"), Parameter::new("c", "x")];
    assert_eq!(recursive(r"\{a\} {a}", parameters, 2), "{a} x");
}

#[test]
fn backslashes_in_values_are_kept() {
    let path = || vec![Parameter::new("path", r"\\server\share")];
    let single = Interpolator::new()
        .interpolate_with("{path}", path(), InterpolationOptions::single_pass(), None)
        .unwrap();
    assert_eq!(single, r"\\server\share");
    assert_eq!(recursive("{path}", path(), 2), single);
    assert_eq!(recursive("{#path}", path(), 2), single);
}

#[test]
fn backslashes_in_values_do_not_hide_placeholders() {
    let parameters = vec![Parameter::new("a", r"\{b\} {c}"), Parameter::new("c", "x")];
    assert_eq!(recursive("{a}", parameters, 2), r"\{b\} x");
}

#[test]
fn expression_results_are_rescanned() {
    let text = recursive("{#'{' + 'x}'}", vec![Parameter::new("x", 5)], 2);
    assert_eq!(text, "5");
}

#[test]
fn looked_up_messages_may_contain_expressions() {
    let lookup = lookup_table(&[("greeting", "Hi {#upper(#name)}")]);
    let text = Interpolator::new()
        .interpolate_with(
            "{greeting}!",
            [Parameter::new("name", "bob")],
            InterpolationOptions::with_depth(2),
            Some(&lookup),
        )
        .unwrap();
    assert_eq!(text, "Hi BOB!");
}

#[test]
fn single_pass_leaves_unbound_names_literal() {
    let lookup = lookup_table(&[("abc", "FROM_STORE")]);
    let text = Interpolator::new()
        .interpolate_with(
            "{abc}={value}",
            [Parameter::new("value", 1)],
            InterpolationOptions::single_pass(),
            Some(&lookup),
        )
        .unwrap();
    assert_eq!(text, "{abc}=1");
}

#[test]
fn looked_up_escapes_stay_escapes_on_reuse() {
    let lookup = lookup_table(&[("brace", r"\{x\}")]);
    let text = Interpolator::new()
        .interpolate_with(
            "{brace}{again}",
            [Parameter::new("again", "{brace}")],
            InterpolationOptions::with_depth(2),
            Some(&lookup),
        )
        .unwrap();
    assert_eq!(text, "{x}{x}");
}

#[test]
fn bound_parameters_shadow_lookup() {
    let lookup = lookup_table(&[("min", "from catalog")]);
    let text = Interpolator::new()
        .interpolate_with(
            "{min}",
            [Parameter::new("min", 1)],
            InterpolationOptions::with_depth(2),
            Some(&lookup),
        )
        .unwrap();
    assert_eq!(text, "1");
}

#[test]
fn lookup_hits_are_recorded_in_context() {
    let lookup = lookup_table(&[("min", "3")]);
    let mut ctx = InterpolationContext::from_values(&params! { "value" => "{min}" }, 2);
    let text = Interpolator::new()
        .run("{value}", &mut ctx, true, Some(&lookup))
        .unwrap();
    assert_eq!(text, "3");
    assert!(ctx.has_param("min"));
    assert_eq!(ctx.param_count(), 2);
    assert_eq!(ctx.depth_remaining(), 1);
}

#[test]
fn configured_options_apply_to_interpolate() {
    let interpolator = Interpolator::builder()
        .options(InterpolationOptions::with_depth(1))
        .build();
    let values = params! { "a" => "{b}", "b" => "{c}", "c" => "done" };
    assert_eq!(interpolator.interpolate("{a}", &values).unwrap(), "{c}");
}
