use super::*;
use crate::expression::parser::{parse_expr, parse_string_template};

fn run(src: &str, ctx: &FeatureExpressionContext) -> Result<Value, EvalError> {
    eval(&parse_expr(src).unwrap(), ctx)
}

#[test]
fn integer_arithmetic_stays_integral() {
    let ctx = FeatureExpressionContext::default();
    assert_eq!(run("2 + 3 * 4", &ctx).unwrap(), Value::Long(14));
    assert_eq!(run("7 % 4", &ctx).unwrap(), Value::Long(3));
    assert_eq!(run("-(2)", &ctx).unwrap(), Value::Long(-2));
    assert_eq!(run("7 / 2", &ctx).unwrap(), Value::Double(3.5));
    assert_eq!(run("1.5 + 1", &ctx).unwrap(), Value::Double(2.5));
}

#[test]
fn attributes_and_zoom_resolve_from_context() {
    let ctx = FeatureExpressionContext::new(14.0)
        .with_attribute("height", 12i64)
        .with_attribute("kind", "bus");
    assert_eq!(run("[height] * 2", &ctx).unwrap(), Value::Long(24));
    assert_eq!(run("zoom >= 14", &ctx).unwrap(), Value::Bool(true));
    assert_eq!(run("[kind] = 'bus'", &ctx).unwrap(), Value::Bool(true));
    assert_eq!(run("[missing]", &ctx).unwrap(), Value::Null);
}

#[test]
fn variables_shadow_zoom() {
    let ctx = FeatureExpressionContext::new(3.0).with_variable("zoom", 9i64);
    assert_eq!(run("zoom", &ctx).unwrap(), Value::Long(9));
}

#[test]
fn logic_short_circuits() {
    let ctx = FeatureExpressionContext::default();
    assert_eq!(run("false && unknown_fn()", &ctx).unwrap(), Value::Bool(false));
    assert_eq!(run("true || unknown_fn()", &ctx).unwrap(), Value::Bool(true));
    assert!(run("true && unknown_fn()", &ctx).is_err());
}

#[test]
fn builtins_check_arity() {
    let ctx = FeatureExpressionContext::default();
    assert_eq!(run("max(2, 5)", &ctx).unwrap(), Value::Double(5.0));
    assert_eq!(run("abs(-3)", &ctx).unwrap(), Value::Long(3));
    assert_eq!(run("clamp(15, 0, 10)", &ctx).unwrap(), Value::Double(10.0));
    assert!(run("min(1)", &ctx).is_err());
    assert!(run("clamp(1, 5, 0)", &ctx).is_err());
}

#[test]
fn string_concat_and_comparison() {
    let ctx = FeatureExpressionContext::default().with_attribute("n", 3i64);
    assert_eq!(
        run("'a' + [n]", &ctx).unwrap(),
        Value::String("a3".to_owned())
    );
    assert_eq!(run("'abc' < 'abd'", &ctx).unwrap(), Value::Bool(true));
    assert!(run("'abc' < 1", &ctx).is_err());
    assert_eq!(run("'1' = 1", &ctx).unwrap(), Value::Bool(false));
    assert_eq!(run("null = null", &ctx).unwrap(), Value::Bool(true));
}

#[test]
fn template_stringifies_attributes() {
    let ctx = FeatureExpressionContext::default()
        .with_attribute("kind", "cafe")
        .with_attribute("size", 2.5);
    let e = parse_string_template("icons/[kind]-[size].png").unwrap();
    assert_eq!(
        eval(&e, &ctx).unwrap(),
        Value::String("icons/cafe-2.5.png".to_owned())
    );
    let missing = parse_string_template("[nope]").unwrap();
    assert_eq!(eval(&missing, &ctx).unwrap(), Value::String(String::new()));
}
