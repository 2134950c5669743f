use serde::{Serialize, Deserialize};

use crate::error::{NetError, Result};

/// The layer width vector: `widths[0]` is the input layer, the last entry the
/// output layer. Fixed once the network is configured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct LayerLayout {
    widths: Vec<usize>,
    max_width: usize,
}

impl LayerLayout {
    /// Validates and wraps a width vector.
    ///
    /// At least an input and an output layer are required, and no layer may
    /// be empty.
    pub fn new(widths: Vec<usize>) -> Result<LayerLayout> {
        if widths.len() < 2 {
            return Err(NetError::InvalidLayout(format!(
                "need at least an input and an output layer, got {} layer(s)",
                widths.len()
            )));
        }
        if let Some(layer) = widths.iter().position(|&w| w == 0) {
            return Err(NetError::InvalidLayout(format!("layer {layer} has zero units")));
        }
        let max_width = widths.iter().copied().max().unwrap_or(0);
        Ok(LayerLayout { widths, max_width })
    }

    pub fn widths(&self) -> &[usize] {
        &self.widths
    }

    pub fn width(&self, layer: usize) -> usize {
        self.widths[layer]
    }

    pub fn layer_count(&self) -> usize {
        self.widths.len()
    }

    /// Index of the output layer.
    pub fn last(&self) -> usize {
        self.widths.len() - 1
    }

    pub fn input_width(&self) -> usize {
        self.widths[0]
    }

    pub fn output_width(&self) -> usize {
        self.widths[self.last()]
    }

    /// Physical row width shared by every padded tensor.
    pub fn max_width(&self) -> usize {
        self.max_width
    }

    /// Number of weight slabs, one per pair of adjacent layers.
    pub fn boundary_count(&self) -> usize {
        self.widths.len() - 1
    }
}

impl TryFrom<Vec<usize>> for LayerLayout {
    type Error = NetError;

    fn try_from(widths: Vec<usize>) -> Result<Self> {
        LayerLayout::new(widths)
    }
}

impl From<LayerLayout> for Vec<usize> {
    fn from(layout: LayerLayout) -> Self {
        layout.widths
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_few_layers() {
        assert!(matches!(LayerLayout::new(vec![3]), Err(NetError::InvalidLayout(_))));
        assert!(matches!(LayerLayout::new(vec![]), Err(NetError::InvalidLayout(_))));
    }

    #[test]
    fn empty_layer() {
        assert!(matches!(LayerLayout::new(vec![2, 0, 1]), Err(NetError::InvalidLayout(_))));
    }

    #[test]
    fn reports_widest_layer_and_boundaries() {
        let layout = LayerLayout::new(vec![2, 5, 3, 1]).unwrap();
        assert_eq!(layout.max_width(), 5);
        assert_eq!(layout.boundary_count(), 3);
        assert_eq!(layout.input_width(), 2);
        assert_eq!(layout.output_width(), 1);
        assert_eq!(layout.last(), 3);
    }

    #[test]
    fn deserializing_rejects_bad_layouts() {
        assert!(serde_json::from_str::<LayerLayout>("[4]").is_err());
        let layout: LayerLayout = serde_json::from_str("[4, 2, 4]").unwrap();
        assert_eq!(layout.widths(), &[4, 2, 4]);
    }
}
