use std::sync::Arc;

use crate::feature::geometry::Geometry;

/// A single feature as seen by a symbolizer.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Feature {
    /// Id unique within the tile layer.
    pub local_id: i64,
    /// Id stable across tiles; `0` when not applicable.
    #[serde(default)]
    pub global_id: u64,
    pub geometry: Arc<Geometry>,
}

impl Feature {
    pub fn new(local_id: i64, global_id: u64, geometry: Geometry) -> Self {
        Self {
            local_id,
            global_id,
            geometry: Arc::new(geometry),
        }
    }
}

/// Ordered features of one tile layer; read-only while a symbolizer builds.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct FeatureCollection {
    features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, feature: Feature) {
        self.features.push(feature);
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Feature> {
        self.features.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Feature> {
        self.features.iter()
    }
}

impl FromIterator<Feature> for FeatureCollection {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        Self {
            features: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a FeatureCollection {
    type Item = &'a Feature;
    type IntoIter = std::slice::Iter<'a, Feature>;

    fn into_iter(self) -> Self::IntoIter {
        self.features.iter()
    }
}
