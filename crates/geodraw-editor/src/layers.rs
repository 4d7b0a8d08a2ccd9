//! The live feature group: drawn layers in insertion order.

use geodraw_core::geojson::{Feature, FeatureCollection, FeatureError, feature_values};
use geodraw_core::id::LayerId;
use geodraw_core::model::Layer;
use serde_json::Value;

/// Ordered set of layers currently on the map. Ids are unique.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureGroup {
    layers: Vec<Layer>,
}

impl FeatureGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter()
    }

    pub fn get(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    pub fn get_mut(&mut self, id: LayerId) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|l| l.id == id)
    }

    pub fn contains(&self, id: LayerId) -> bool {
        self.get(id).is_some()
    }

    /// Append a layer. Adding a layer whose id is already present is a no-op
    /// and returns `false`.
    pub fn add_layer(&mut self, layer: Layer) -> bool {
        if self.contains(layer.id) {
            return false;
        }
        self.layers.push(layer);
        true
    }

    pub fn remove_layer(&mut self, id: LayerId) -> Option<Layer> {
        let pos = self.layers.iter().position(|l| l.id == id)?;
        Some(self.layers.remove(pos))
    }

    /// Remove every layer, returning them in order.
    pub fn clear_layers(&mut self) -> Vec<Layer> {
        std::mem::take(&mut self.layers)
    }

    /// Remove the layers matching `pred`, returning them in order.
    pub fn remove_where(&mut self, mut pred: impl FnMut(&Layer) -> bool) -> Vec<Layer> {
        let (removed, kept): (Vec<Layer>, Vec<Layer>) = std::mem::take(&mut self.layers)
            .into_iter()
            .partition(|l| pred(l));
        self.layers = kept;
        removed
    }

    /// Convert and append every feature in `data`.
    ///
    /// Features that fail to convert are skipped; their errors are returned
    /// alongside the count of layers added.
    pub fn add_data(&mut self, data: &Value) -> Result<(usize, Vec<FeatureError>), FeatureError> {
        let mut added = 0;
        let mut skipped = Vec::new();
        for value in feature_values(data)? {
            match Feature::from_value(value).and_then(|f| Layer::from_feature(&f)) {
                Ok(layer) => {
                    if self.add_layer(layer) {
                        added += 1;
                    }
                }
                Err(e) => skipped.push(e),
            }
        }
        Ok((added, skipped))
    }

    pub fn to_features(&self) -> Vec<Feature> {
        self.layers.iter().map(Layer::to_feature).collect()
    }

    pub fn to_collection(&self) -> FeatureCollection {
        FeatureCollection::from_layers(&self.layers)
    }

    /// Serialized form written back to the `data` attribute.
    pub fn to_data(&self) -> Vec<Value> {
        self.layers.iter().map(|l| l.to_feature().to_value()).collect()
    }
}

impl<'a> IntoIterator for &'a FeatureGroup {
    type Item = &'a Layer;
    type IntoIter = std::slice::Iter<'a, Layer>;

    fn into_iter(self) -> Self::IntoIter {
        self.layers.iter()
    }
}
