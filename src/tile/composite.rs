use crate::{
    foundation::error::{StyleError, StyleResult},
    style::params::CompOp,
};

pub type PremulRgba8 = [u8; 4];

/// Composite `src` onto `dst` (both premultiplied) with `op`.
pub fn blend(dst: PremulRgba8, src: PremulRgba8, op: CompOp) -> PremulRgba8 {
    if op == CompOp::SrcOver && src[3] == 0 {
        return dst;
    }
    let s = to_unit(src);
    let d = to_unit(dst);
    let (sa, da) = (s[3], d[3]);

    let out = match porter_duff(op, sa, da) {
        Some((fa, fb)) => [
            s[0] * fa + d[0] * fb,
            s[1] * fa + d[1] * fb,
            s[2] * fa + d[2] * fb,
            sa * fa + da * fb,
        ],
        None if op == CompOp::Minus => {
            let a = sa + da - sa * da;
            [
                (d[0] - s[0]).max(0.0),
                (d[1] - s[1]).max(0.0),
                (d[2] - s[2]).max(0.0),
                a,
            ]
        }
        None => {
            let a = sa + da - sa * da;
            let mut out = [0.0; 4];
            for i in 0..3 {
                let cs = if sa > 0.0 { s[i] / sa } else { 0.0 };
                let cb = if da > 0.0 { d[i] / da } else { 0.0 };
                out[i] = s[i] * (1.0 - da) + d[i] * (1.0 - sa) + sa * da * mix(op, cb, cs);
            }
            out[3] = a;
            out
        }
    };
    from_unit(out)
}

/// Composite a whole `src` layer onto `dst` in place.
pub fn blend_in_place(dst: &mut [u8], src: &[u8], op: CompOp) -> StyleResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(StyleError::evaluation(
            "blend_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = blend([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], op);
        d.copy_from_slice(&out);
    }
    Ok(())
}

fn porter_duff(op: CompOp, sa: f32, da: f32) -> Option<(f32, f32)> {
    Some(match op {
        CompOp::Clear => (0.0, 0.0),
        CompOp::Src => (1.0, 0.0),
        CompOp::Dst => (0.0, 1.0),
        CompOp::SrcOver => (1.0, 1.0 - sa),
        CompOp::DstOver => (1.0 - da, 1.0),
        CompOp::SrcIn => (da, 0.0),
        CompOp::DstIn => (0.0, sa),
        CompOp::SrcOut => (1.0 - da, 0.0),
        CompOp::DstOut => (0.0, 1.0 - sa),
        CompOp::SrcAtop => (da, 1.0 - sa),
        CompOp::DstAtop => (1.0 - da, sa),
        CompOp::Xor => (1.0 - da, 1.0 - sa),
        CompOp::Plus => (1.0, 1.0),
        _ => return None,
    })
}

/// Separable blend function on straight color channels.
fn mix(op: CompOp, cb: f32, cs: f32) -> f32 {
    let screen = |b: f32, s: f32| b + s - b * s;
    let hard_light = |b: f32, s: f32| {
        if s <= 0.5 {
            b * 2.0 * s
        } else {
            screen(b, 2.0 * s - 1.0)
        }
    };
    match op {
        CompOp::Multiply => cb * cs,
        CompOp::Screen => screen(cb, cs),
        CompOp::Overlay => hard_light(cs, cb),
        CompOp::Darken => cb.min(cs),
        CompOp::Lighten => cb.max(cs),
        CompOp::ColorDodge => {
            if cb == 0.0 {
                0.0
            } else if cs >= 1.0 {
                1.0
            } else {
                (cb / (1.0 - cs)).min(1.0)
            }
        }
        CompOp::ColorBurn => {
            if cb >= 1.0 {
                1.0
            } else if cs <= 0.0 {
                0.0
            } else {
                1.0 - ((1.0 - cb) / cs).min(1.0)
            }
        }
        CompOp::HardLight => hard_light(cb, cs),
        CompOp::SoftLight => {
            if cs <= 0.5 {
                cb - (1.0 - 2.0 * cs) * cb * (1.0 - cb)
            } else {
                let d = if cb <= 0.25 {
                    ((16.0 * cb - 12.0) * cb + 4.0) * cb
                } else {
                    cb.sqrt()
                };
                cb + (2.0 * cs - 1.0) * (d - cb)
            }
        }
        CompOp::Difference => (cb - cs).abs(),
        CompOp::Exclusion => cb + cs - 2.0 * cb * cs,
        _ => cs,
    }
}

fn to_unit(px: PremulRgba8) -> [f32; 4] {
    px.map(|c| f32::from(c) / 255.0)
}

fn from_unit(px: [f32; 4]) -> PremulRgba8 {
    let a = px[3].clamp(0.0, 1.0);
    let q = |c: f32| (c.clamp(0.0, a) * 255.0).round() as u8;
    [q(px[0]), q(px[1]), q(px[2]), (a * 255.0).round() as u8]
}

#[cfg(test)]
#[path = "../../tests/unit/tile/composite.rs"]
mod tests;
