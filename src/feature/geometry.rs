use crate::foundation::core::{Point, Vec2};

/// Tile-local vertex; `[0, 1]` on both axes lies inside the tile.
pub type Vertex = Point;

/// Feature geometry. Closed set: symbolizers match on it and skip what they cannot place.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Geometry {
    Point(PointGeometry),
    Line(LineGeometry),
    Polygon(PolygonGeometry),
    /// Geometry of a type this crate does not understand.
    #[serde(other)]
    Unknown,
}

impl Geometry {
    /// Short name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Point(_) => "point",
            Self::Line(_) => "line",
            Self::Polygon(_) => "polygon",
            Self::Unknown => "unknown",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PointGeometry {
    pub vertices: Vec<Vertex>,
}

/// One or more polylines.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LineGeometry {
    pub lines: Vec<Vec<Vertex>>,
}

impl LineGeometry {
    /// Arc-length midpoint of every non-empty polyline.
    pub fn mid_points(&self) -> Vec<Vertex> {
        self.lines.iter().filter_map(|l| mid_point(l)).collect()
    }
}

/// Point halfway along `vertices` measured by arc length.
pub fn mid_point(vertices: &[Vertex]) -> Option<Vertex> {
    let first = *vertices.first()?;
    let total: f64 = vertices.windows(2).map(|w| (w[1] - w[0]).hypot()).sum();
    if total <= 0.0 {
        return Some(first);
    }

    let mut remaining = total * 0.5;
    for w in vertices.windows(2) {
        let len = (w[1] - w[0]).hypot();
        if remaining <= len && len > 0.0 {
            return Some(w[0].lerp(w[1], remaining / len));
        }
        remaining -= len;
    }
    vertices.last().copied()
}

/// Polygons, each a list of rings: the first ring is the exterior, the rest are holes.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PolygonGeometry {
    pub polygons: Vec<Vec<Vec<Vertex>>>,
}

impl PolygonGeometry {
    /// One interior point per polygon with a non-empty exterior ring.
    pub fn surface_points(&self) -> Vec<Vertex> {
        self.polygons
            .iter()
            .filter_map(|rings| surface_point(rings))
            .collect()
    }
}

/// A point inside the polygon (even-odd rule over all rings).
///
/// Scans the horizontal line through the middle of the bounding box and returns the center
/// of the widest inside span. Degenerate polygons fall back to the exterior vertex average.
pub fn surface_point(rings: &[Vec<Vertex>]) -> Option<Vertex> {
    let exterior = rings.first().filter(|r| !r.is_empty())?;
    let (min_y, max_y) = exterior
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p.y), hi.max(p.y))
        });
    let y = (min_y + max_y) * 0.5;

    let mut xs = Vec::new();
    for ring in rings {
        for (i, &a) in ring.iter().enumerate() {
            let b = ring[(i + 1) % ring.len()];
            if (a.y <= y && y < b.y) || (b.y <= y && y < a.y) {
                let t = (y - a.y) / (b.y - a.y);
                xs.push(a.x + (b.x - a.x) * t);
            }
        }
    }
    xs.sort_by(f64::total_cmp);

    let widest = xs
        .chunks_exact(2)
        .map(|span| (span[0], span[1]))
        .filter(|(x0, x1)| x1 > x0)
        .max_by(|a, b| (a.1 - a.0).total_cmp(&(b.1 - b.0)));
    if let Some((x0, x1)) = widest {
        return Some(Point::new((x0 + x1) * 0.5, y));
    }

    let sum = exterior
        .iter()
        .fold(Vec2::ZERO, |acc, p| acc + p.to_vec2());
    Some((sum / exterior.len() as f64).to_point())
}

/// Even-odd point-in-polygon test over all rings.
pub fn polygon_contains(rings: &[Vec<Vertex>], p: Vertex) -> bool {
    let mut inside = false;
    for ring in rings {
        for (i, &a) in ring.iter().enumerate() {
            let b = ring[(i + 1) % ring.len()];
            if (a.y > p.y) != (b.y > p.y) {
                let x = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
                if p.x < x {
                    inside = !inside;
                }
            }
        }
    }
    inside
}

#[cfg(test)]
#[path = "../../tests/unit/feature/geometry.rs"]
mod tests;
