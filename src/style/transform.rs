//! SVG-style transform lists (`translate(10, 5) rotate(45)`), as used by the `transform`
//! style parameter.

use crate::foundation::core::{Affine, Point, Vec2};
use crate::foundation::error::{StyleError, StyleResult};

/// One entry of a transform list. Angles are in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Transform {
    /// `matrix(a, b, c, d, e, f)`.
    Matrix(Affine),
    /// `translate(x[, y])`.
    Translate(Vec2),
    /// `scale(x[, y])`.
    Scale(Vec2),
    /// `rotate(angle[, cx, cy])`.
    Rotate {
        /// Rotation angle in degrees.
        angle_deg: f64,
        /// Optional rotation center.
        center: Option<Point>,
    },
    /// `skewX(angle)`.
    SkewX(f64),
    /// `skewY(angle)`.
    SkewY(f64),
}

impl Transform {
    /// Affine matrix equivalent.
    pub fn to_affine(&self) -> Affine {
        match *self {
            Transform::Matrix(m) => m,
            Transform::Translate(v) => Affine::translate(v),
            Transform::Scale(s) => Affine::scale_non_uniform(s.x, s.y),
            Transform::Rotate { angle_deg, center } => {
                let th = angle_deg.to_radians();
                match center {
                    Some(c) => Affine::rotate_about(th, c),
                    None => Affine::rotate(th),
                }
            }
            Transform::SkewX(a) => Affine::skew(a.to_radians().tan(), 0.0),
            Transform::SkewY(a) => Affine::skew(0.0, a.to_radians().tan()),
        }
    }

    /// True for `rotate(..)` entries.
    pub fn is_rotation(&self) -> bool {
        matches!(self, Transform::Rotate { .. })
    }
}

/// Parse a whitespace/comma separated transform list. An empty list is the identity.
pub fn parse_transform_list(src: &str) -> StyleResult<Vec<Transform>> {
    let mut out = Vec::new();
    let mut rest = src.trim_start_matches(is_separator);

    while !rest.is_empty() {
        let name_len = rest
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(rest.len());
        if name_len == 0 {
            return Err(invalid(src, "expected transform name"));
        }
        let name = &rest[..name_len];
        let after_name = rest[name_len..].trim_start();
        let Some(args_src) = after_name.strip_prefix('(') else {
            return Err(invalid(src, &format!("expected '(' after '{name}'")));
        };
        let Some(close) = args_src.find(')') else {
            return Err(invalid(src, "unterminated argument list"));
        };
        let args = parse_args(&args_src[..close]).map_err(|msg| invalid(src, &msg))?;
        out.push(build(name, &args).map_err(|msg| invalid(src, &msg))?);
        rest = args_src[close + 1..].trim_start_matches(is_separator);
    }

    Ok(out)
}

/// Compose a parsed list left to right, the way SVG nests transforms.
pub fn compose_transform_list(list: &[Transform]) -> Affine {
    list.iter()
        .fold(Affine::IDENTITY, |acc, t| acc * t.to_affine())
}

/// Parse and compose in one step.
pub fn parse_transform(src: &str) -> StyleResult<Affine> {
    Ok(compose_transform_list(&parse_transform_list(src)?))
}

/// True when `src` parses and contains a `rotate(..)` entry. Parse failures yield `false`.
pub fn contains_rotation(src: &str) -> bool {
    match parse_transform_list(src) {
        Ok(list) => list.iter().any(Transform::is_rotation),
        Err(err) => {
            tracing::debug!(%err, "transform is not parseable, assuming no rotation");
            false
        }
    }
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || c == ','
}

fn invalid(src: &str, msg: &str) -> StyleError {
    StyleError::evaluation(format!("invalid transform '{src}': {msg}"))
}

fn parse_args(src: &str) -> Result<Vec<f64>, String> {
    src.split(is_separator)
        .filter(|s| !s.is_empty())
        .map(|s| {
            let v: f64 = s
                .parse()
                .map_err(|_| format!("invalid number '{s}'"))?;
            if v.is_finite() {
                Ok(v)
            } else {
                Err(format!("non-finite number '{s}'"))
            }
        })
        .collect()
}

fn build(name: &str, args: &[f64]) -> Result<Transform, String> {
    let arity_err = || format!("wrong number of arguments for '{name}': {}", args.len());
    match (name, args) {
        ("matrix", &[a, b, c, d, e, f]) => Ok(Transform::Matrix(Affine::new([a, b, c, d, e, f]))),
        ("translate", &[x]) => Ok(Transform::Translate(Vec2::new(x, 0.0))),
        ("translate", &[x, y]) => Ok(Transform::Translate(Vec2::new(x, y))),
        ("scale", &[s]) => Ok(Transform::Scale(Vec2::new(s, s))),
        ("scale", &[x, y]) => Ok(Transform::Scale(Vec2::new(x, y))),
        ("rotate", &[a]) => Ok(Transform::Rotate {
            angle_deg: a,
            center: None,
        }),
        ("rotate", &[a, cx, cy]) => Ok(Transform::Rotate {
            angle_deg: a,
            center: Some(Point::new(cx, cy)),
        }),
        ("skewX", &[a]) => Ok(Transform::SkewX(a)),
        ("skewY", &[a]) => Ok(Transform::SkewY(a)),
        ("matrix" | "translate" | "scale" | "rotate" | "skewX" | "skewY", _) => Err(arity_err()),
        (other, _) => Err(format!("unknown transform '{other}'")),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/style/transform.rs"]
mod tests;
