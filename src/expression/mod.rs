//! Style expressions: parsing and evaluation against a feature expression context.
//!
//! Two source forms exist. *Value expressions* (`[height] * 2`, `zoom >= 14`, `true`) are
//! parsed with [`Expression::parse`]. *String templates* (`icons/[kind].png`, `#ff0000`,
//! `rotate(45)`) are parsed with [`Expression::parse_string`]: literal text with embedded
//! `[attribute]` references.

pub(crate) mod ast;
pub(crate) mod context;
pub(crate) mod error;
pub(crate) mod eval;
pub(crate) mod lexer;
pub(crate) mod parser;
pub(crate) mod value;

use crate::expression::ast::Expr;
use crate::expression::context::FeatureExpressionContext;
use crate::expression::value::Value;
use crate::foundation::error::{StyleError, StyleResult};

/// A parsed style expression.
#[derive(Clone, Debug, PartialEq)]
pub struct Expression {
    source: String,
    root: Expr,
}

impl Expression {
    /// Parse a value expression.
    pub fn parse(src: &str) -> StyleResult<Self> {
        let root = parser::parse_expr(src)
            .map_err(|e| StyleError::expression(format!("'{src}': {e}")))?;
        Ok(Self {
            source: src.to_owned(),
            root,
        })
    }

    /// Parse a string template with `[attribute]` substitutions.
    pub fn parse_string(src: &str) -> StyleResult<Self> {
        let root = parser::parse_string_template(src)
            .map_err(|e| StyleError::expression(format!("'{src}': {e}")))?;
        Ok(Self {
            source: src.to_owned(),
            root,
        })
    }

    /// Wrap a literal value.
    pub fn constant(value: Value) -> Self {
        Self {
            source: value.to_string(),
            root: Expr::Lit(value),
        }
    }

    /// Original source text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// True when the expression references no attributes or context variables.
    pub fn is_constant(&self) -> bool {
        self.root.is_constant()
    }

    /// Evaluate against `ctx`.
    pub fn evaluate(&self, ctx: &FeatureExpressionContext) -> StyleResult<Value> {
        eval::eval(&self.root, ctx)
            .map_err(|e| StyleError::evaluation(format!("'{}': {e}", self.source)))
    }
}
