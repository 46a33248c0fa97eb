pub(crate) mod line;

use std::sync::Arc;

use crate::{
    feature::geometry::{Geometry, Vertex},
    foundation::core::Vec2,
    placement::line::LineWalk,
    style::params::LabelOrientation,
};

/// Where a single marker goes.
#[derive(Clone, Debug, PartialEq)]
pub enum Placement {
    /// A fixed point.
    Anchor(Vertex),
    /// A whole polyline; the builder picks the spot and follows the line.
    Polyline(Arc<[Vertex]>),
    /// A point along a line, rotated to `direction`.
    Oriented { position: Vertex, direction: Vec2 },
}

impl Placement {
    /// Representative point, for consumers that can only draw at a vertex.
    pub fn anchor(&self) -> Option<Vertex> {
        match self {
            Self::Anchor(p) => Some(*p),
            Self::Polyline(v) => crate::feature::geometry::mid_point(v),
            Self::Oriented { position, .. } => Some(*position),
        }
    }
}

/// Turns feature geometry into placements.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacementGenerator {
    /// `Line` follows line geometry; `Point` reduces lines to their midpoints.
    pub mode: LabelOrientation,
    /// Spacing walk for `Line` mode; without it each line is placed as a whole.
    pub line_walk: Option<LineWalk>,
}

impl PlacementGenerator {
    pub fn new(mode: LabelOrientation, line_walk: Option<LineWalk>) -> Self {
        Self { mode, line_walk }
    }

    /// All placements for `geometry`, or `None` when the geometry kind cannot be placed.
    pub fn placements(&self, geometry: &Geometry) -> Option<Vec<Placement>> {
        let out = match geometry {
            Geometry::Point(g) => g.vertices.iter().copied().map(Placement::Anchor).collect(),
            Geometry::Polygon(g) => g
                .surface_points()
                .into_iter()
                .map(Placement::Anchor)
                .collect(),
            Geometry::Line(g) => match (self.mode, self.line_walk) {
                (LabelOrientation::Line, Some(walk)) => g
                    .lines
                    .iter()
                    .flat_map(|l| walk.walk(l))
                    .map(|lp| Placement::Oriented {
                        position: lp.position,
                        direction: lp.direction,
                    })
                    .collect(),
                (LabelOrientation::Line, None) => g
                    .lines
                    .iter()
                    .filter(|l| !l.is_empty())
                    .map(|l| Placement::Polyline(Arc::from(l.as_slice())))
                    .collect(),
                (LabelOrientation::Point, _) => {
                    g.mid_points().into_iter().map(Placement::Anchor).collect()
                }
            },
            Geometry::Unknown => return None,
        };
        Some(out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/placement/mod.rs"]
mod tests;
