use std::str::FromStr;

use crate::foundation::error::StyleError;

/// Compositing operator applied when a batch is drawn onto the tile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CompOp {
    Clear,
    Src,
    Dst,
    #[default]
    SrcOver,
    DstOver,
    SrcIn,
    DstIn,
    SrcOut,
    DstOut,
    SrcAtop,
    DstAtop,
    Xor,
    Plus,
    Minus,
    Multiply,
    Screen,
    Overlay,
    Darken,
    Lighten,
    ColorDodge,
    ColorBurn,
    HardLight,
    SoftLight,
    Difference,
    Exclusion,
}

impl FromStr for CompOp {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "clear" => CompOp::Clear,
            "src" => CompOp::Src,
            "dst" => CompOp::Dst,
            "src-over" => CompOp::SrcOver,
            "dst-over" => CompOp::DstOver,
            "src-in" => CompOp::SrcIn,
            "dst-in" => CompOp::DstIn,
            "src-out" => CompOp::SrcOut,
            "dst-out" => CompOp::DstOut,
            "src-atop" => CompOp::SrcAtop,
            "dst-atop" => CompOp::DstAtop,
            "xor" => CompOp::Xor,
            "plus" => CompOp::Plus,
            "minus" => CompOp::Minus,
            "multiply" => CompOp::Multiply,
            "screen" => CompOp::Screen,
            "overlay" => CompOp::Overlay,
            "darken" => CompOp::Darken,
            "lighten" => CompOp::Lighten,
            "color-dodge" => CompOp::ColorDodge,
            "color-burn" => CompOp::ColorBurn,
            "hard-light" => CompOp::HardLight,
            "soft-light" => CompOp::SoftLight,
            "difference" => CompOp::Difference,
            "exclusion" => CompOp::Exclusion,
            other => {
                return Err(StyleError::evaluation(format!(
                    "unknown comp-op '{other}'"
                )));
            }
        })
    }
}

/// Resolve a `comp-op` value, falling back to `src-over` for unknown names.
pub fn convert_comp_op(name: &str) -> CompOp {
    name.parse().unwrap_or_else(|err| {
        tracing::debug!(%err, "falling back to src-over");
        CompOp::SrcOver
    })
}

/// Whether a glyph is anchored at a point or follows a line direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LabelOrientation {
    #[default]
    Point,
    Line,
}

/// Map a `placement` value to an orientation: `line` follows lines, everything else is a point.
pub fn convert_label_placement(placement: &str) -> LabelOrientation {
    match placement.trim() {
        "line" => LabelOrientation::Line,
        _ => LabelOrientation::Point,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/style/params.rs"]
mod tests;
