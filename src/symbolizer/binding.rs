use crate::{
    expression::{Expression, context::FeatureExpressionContext, value::Value},
    foundation::core::{Affine, Color},
    foundation::error::{StyleError, StyleResult},
    style::transform,
};

/// Converts an evaluated expression value into a parameter value.
pub type Converter<T> = fn(&Value) -> StyleResult<T>;

/// Conversion used by [`Bound::new`] for plain parameter types.
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> StyleResult<Self>;
}

impl FromValue for f32 {
    fn from_value(value: &Value) -> StyleResult<Self> {
        value
            .as_f64()
            .map(|v| v as f32)
            .ok_or_else(|| StyleError::evaluation(format!("expected a number, got {value:?}")))
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> StyleResult<Self> {
        value
            .as_bool()
            .ok_or_else(|| StyleError::evaluation(format!("expected a boolean, got {value:?}")))
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> StyleResult<Self> {
        if value.is_null() {
            return Err(StyleError::evaluation("expected a string, got null"));
        }
        Ok(value.to_string())
    }
}

/// Parse a color from the value's string form.
pub fn convert_color(value: &Value) -> StyleResult<Color> {
    Color::parse(&value.to_string())
}

/// Parse an SVG-style transform list from the value's string form. Empty means identity.
pub fn convert_transform(value: &Value) -> StyleResult<Affine> {
    transform::parse_transform(&value.to_string())
}

/// A style parameter: a literal or an expression, plus its last resolved value.
#[derive(Clone, Debug)]
pub struct Bound<T> {
    value: T,
    default: T,
    expr: Option<Expression>,
    convert: Converter<T>,
}

impl<T: FromValue + Clone> Bound<T> {
    pub fn new(default: T) -> Self {
        Self::with_converter(default, T::from_value)
    }
}

impl<T: Clone> Bound<T> {
    pub fn with_converter(default: T, convert: Converter<T>) -> Self {
        Self {
            value: default.clone(),
            default,
            expr: None,
            convert,
        }
    }

    /// Attach `expr`, replacing any earlier binding. Constants are resolved right away.
    pub fn bind(&mut self, expr: Expression) {
        if expr.is_constant() {
            self.value = self.resolve(&expr, &FeatureExpressionContext::default());
            self.expr = None;
        } else {
            self.value = self.default.clone();
            self.expr = Some(expr);
        }
    }

    /// Re-evaluate against `ctx`. Failures fall back to the default.
    pub fn update(&mut self, ctx: &FeatureExpressionContext) {
        if let Some(expr) = &self.expr {
            self.value = self.resolve(expr, ctx);
        }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn get(&self) -> T {
        self.value.clone()
    }

    /// The expression still evaluated per build, if any.
    pub fn expression(&self) -> Option<&Expression> {
        self.expr.as_ref()
    }

    fn resolve(&self, expr: &Expression, ctx: &FeatureExpressionContext) -> T {
        match expr.evaluate(ctx).and_then(|v| (self.convert)(&v)) {
            Ok(v) => v,
            Err(err) => {
                tracing::debug!(expr = expr.source(), %err, "binding fell back to default");
                self.default.clone()
            }
        }
    }
}

/// The `transform` parameter: the converted affine plus the raw expression, so callers
/// can ask whether the evaluated transform rotates.
#[derive(Clone, Debug)]
pub struct TransformBinding {
    bound: Bound<Affine>,
    expr: Option<Expression>,
}

impl Default for TransformBinding {
    fn default() -> Self {
        Self {
            bound: Bound::with_converter(Affine::IDENTITY, convert_transform),
            expr: None,
        }
    }
}

impl TransformBinding {
    pub fn bind(&mut self, expr: Expression) {
        self.expr = Some(expr.clone());
        self.bound.bind(expr);
    }

    pub fn update(&mut self, ctx: &FeatureExpressionContext) {
        self.bound.update(ctx);
    }

    pub fn value(&self) -> Affine {
        *self.bound.value()
    }

    /// Whether the evaluated transform list contains `rotate(..)`. Any failure is `false`.
    pub fn has_rotation(&self, ctx: &FeatureExpressionContext) -> bool {
        let Some(expr) = &self.expr else {
            return false;
        };
        match expr.evaluate(ctx) {
            Ok(v) => transform::contains_rotation(&v.to_string()),
            Err(err) => {
                tracing::debug!(%err, "transform evaluation failed, assuming no rotation");
                false
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/symbolizer/binding.rs"]
mod tests;
