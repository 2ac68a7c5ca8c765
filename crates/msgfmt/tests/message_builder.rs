//! Tests for the fluent message builder over a catalog.

use std::sync::Arc;
use std::thread;

use icu_locale_core::{LanguageIdentifier, langid};
use msgfmt::{
    Catalog, EnumValue, MessageError, MessageFormatter, StandardEvaluator, TemplateError,
    TypeName, Value,
};

const MESSAGES: &str = r"
test.message01=メッセージ：{#format('%1.2f', #validatedValue)}は、{min}～{max}の範囲で入力してください。
test.recursive=再帰的なメッセージ：\{abc\}={value}
test.recursiveMax=再帰的なメッセージ：\{abc\}={value}
test.varWithArray=配列の指定：「{arrays}」
test.varWithAnno=変数の初期フォーマット：アノテーション「{anno}」
test.varWithEnum=変数の初期フォーマット：列挙型「{enum}」
test.varWithClass=変数の初期フォーマット：クラス「{class}」
test.varWithClasses=変数の初期フォーマット：クラス「{classes}」
test.lowerBound=下限：{min}
min=3
max={value}
";

mod model {
    #[derive(Debug)]
    pub enum Role {
        Admin,
    }

    pub struct Entity;
}

fn type_of<T>(_: &T) -> TypeName {
    TypeName::of::<T>()
}

fn formatter() -> MessageFormatter {
    let catalog = Catalog::new();
    catalog.load_bundle_str(&langid!("und"), MESSAGES).unwrap();
    catalog.insert(&langid!("en"), "greeting", "Hello, {name}");
    catalog.insert(&langid!("ja"), "greeting", "こんにちは、{name}");
    MessageFormatter::new(Arc::new(catalog))
}

#[test]
fn format_with_expression() {
    let result = formatter()
        .create("test.message01")
        .param("validatedValue", 3.1)
        .param("min", 1)
        .param("max", 10)
        .format()
        .unwrap();
    assert_eq!(result, "メッセージ：3.10は、1～10の範囲で入力してください。");
}

#[test]
fn format_recursively_resolves_catalog_messages() {
    let result = formatter()
        .create("test.recursive")
        .param("value", "{min}")
        .format_recursively()
        .unwrap();
    assert_eq!(result, "再帰的なメッセージ：{abc}=3");
}

#[test]
fn format_recursively_stops_on_cycle() {
    let result = formatter()
        .create("test.recursiveMax")
        .param("value", "{max}")
        .format_recursively_with_depth(5)
        .unwrap();
    assert_eq!(result, "再帰的なメッセージ：{abc}={max}");
}

#[test]
fn single_pass_keeps_substituted_placeholders() {
    let result = formatter()
        .create("test.recursive")
        .param("value", "{min}")
        .format()
        .unwrap();
    assert_eq!(result, "再帰的なメッセージ：{abc}={min}");
}

#[test]
fn catalog_messages_are_looked_up_only_when_recursive() {
    let formatter = formatter();
    let single = formatter.create("test.lowerBound").format().unwrap();
    assert_eq!(single, "下限：{min}");
    let recursive = formatter.create("test.lowerBound").format_recursively().unwrap();
    assert_eq!(recursive, "下限：3");
}

#[test]
fn param_values_become_a_sequence() {
    let result = formatter()
        .create("test.varWithArray")
        .param_values("arrays", [Value::from(1), Value::from("abc"), Value::from(3)])
        .format()
        .unwrap();
    assert_eq!(result, "配列の指定：「1,abc,3」");
}

#[test]
fn annotation_parameter() {
    let result = formatter()
        .create("test.varWithAnno")
        .param_with_annotation("anno", type_of(&model::Entity))
        .format()
        .unwrap();
    assert_eq!(result, "変数の初期フォーマット：アノテーション「@Entity」");
}

#[test]
fn enum_parameter() {
    let result = formatter()
        .create("test.varWithEnum")
        .param_with_enum(
            "enum",
            EnumValue::of::<model::Role>(format!("{:?}", model::Role::Admin)),
        )
        .format()
        .unwrap();
    assert_eq!(result, "変数の初期フォーマット：列挙型「Role#Admin」");
}

#[test]
fn single_type_parameter() {
    let result = formatter()
        .create("test.varWithClass")
        .param_with_types("class", [TypeName::of::<MessageFormatter>()])
        .format()
        .unwrap();
    assert_eq!(
        result,
        "変数の初期フォーマット：クラス「msgfmt::builder::MessageFormatter」"
    );
}

#[test]
fn multiple_type_parameter() {
    let result = formatter()
        .create("test.varWithClasses")
        .param_with_types(
            "classes",
            [
                TypeName::of::<MessageFormatter>(),
                TypeName::of::<StandardEvaluator>(),
            ],
        )
        .format()
        .unwrap();
    assert_eq!(
        result,
        "変数の初期フォーマット：クラス「msgfmt::builder::MessageFormatter, msgfmt::expression::eval::StandardEvaluator」"
    );
}

#[test]
fn later_parameter_replaces_earlier() {
    let formatter = formatter();
    let builder = formatter
        .create("greeting")
        .language(langid!("en"))
        .param("name", "first")
        .param("name", "second");
    assert_eq!(
        builder.get_param("name").map(|p| p.value.clone()),
        Some(Value::from("second"))
    );
    assert_eq!(builder.format().unwrap(), "Hello, second");
}

#[test]
fn precomputed_text_is_shown_but_expressions_see_the_value() {
    let catalog = Catalog::new();
    catalog.insert(&langid!("und"), "total", "{amount} ({#amount * 2})");
    let formatter = MessageFormatter::new(Arc::new(catalog));

    let result = formatter
        .create("total")
        .param_with_text("amount", 21, "twenty-one")
        .format()
        .unwrap();
    assert_eq!(result, "twenty-one (42)");
}

#[test]
fn language_selection_and_fallback() {
    let formatter = MessageFormatter::builder()
        .store(Arc::new({
            let catalog = Catalog::new();
            catalog.insert(&langid!("en"), "greeting", "Hello, {name}");
            catalog.insert(&langid!("ja"), "greeting", "こんにちは、{name}");
            catalog
        }))
        .language(langid!("ja-JP"))
        .build();
    assert_eq!(formatter.language(), &langid!("ja-JP"));

    let ja = formatter.create("greeting").param("name", "太郎").format();
    assert_eq!(ja.unwrap(), "こんにちは、太郎");

    let en = formatter
        .create("greeting")
        .language(langid!("en-GB"))
        .param("name", "Taro")
        .format();
    assert_eq!(en.unwrap(), "Hello, Taro");
}

#[test]
fn default_language_is_undetermined() {
    let formatter = formatter();
    assert_eq!(formatter.language(), &LanguageIdentifier::UNKNOWN);
    let built = MessageFormatter::builder()
        .store(Arc::new(Catalog::new()))
        .build();
    assert_eq!(built.language(), &langid!("und"));
}

#[test]
fn unknown_code_is_a_template_error() {
    let err = formatter().create("no.such.code").format().unwrap_err();
    assert_eq!(
        err,
        MessageError::Template(TemplateError::NotFound {
            code: "no.such.code".to_string(),
            language: "und".to_string(),
        })
    );
}

#[test]
fn expression_failures_surface_as_expression_errors() {
    let catalog = Catalog::new();
    catalog.insert(&langid!("und"), "bad", "{#one +}");
    catalog.insert(&langid!("und"), "div", "{#one / #zero}");
    let formatter = MessageFormatter::new(Arc::new(catalog));

    let err = formatter.create("bad").format().unwrap_err();
    assert!(matches!(err, MessageError::Expression(ref e) if e.is_syntax()));

    let err = formatter
        .create("div")
        .param("one", 1)
        .param("zero", 0)
        .format()
        .unwrap_err();
    assert!(matches!(err, MessageError::Expression(ref e) if e.is_evaluation()));
}

#[test]
fn formatter_is_shared_across_threads() {
    let formatter = Arc::new(formatter());
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let formatter = Arc::clone(&formatter);
            thread::spawn(move || {
                formatter
                    .create("greeting")
                    .language(langid!("en"))
                    .param("name", i)
                    .format()
                    .unwrap()
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), format!("Hello, {i}"));
    }
}
