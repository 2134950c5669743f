use rand::Rng;
use serde::{Serialize, Deserialize};
use std::fmt::Write as _;
use std::path::Path;

use crate::error::{NetError, Result};
use crate::math::matrix::Matrix;
use crate::network::layout::LayerLayout;

/// Connection weights indexed `[layer][left][right]`.
///
/// Slab `layer` connects layer `layer` (left) to layer `layer + 1` (right).
/// Each slab is a `max_width × max_width` grid; only the
/// `width[layer] × width[layer + 1]` corner is ever read or written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightTensor {
    layout: LayerLayout,
    slabs: Vec<Matrix>,
}

impl WeightTensor {
    pub fn zeros(layout: &LayerLayout) -> WeightTensor {
        let m = layout.max_width();
        WeightTensor {
            layout: layout.clone(),
            slabs: (0..layout.boundary_count()).map(|_| Matrix::zeros(m, m)).collect(),
        }
    }

    /// Draws every logical weight uniformly from `[min, max)`.
    ///
    /// Cells are drawn slab by slab, left unit by left unit, right unit by
    /// right unit, so a seeded `rng` always yields the same tensor.
    pub fn random<R: Rng + ?Sized>(
        layout: &LayerLayout,
        min: f64,
        max: f64,
        rng: &mut R,
    ) -> Result<WeightTensor> {
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(NetError::Config(format!(
                "random weight range [{min}, {max}] is not a finite, ordered interval"
            )));
        }
        let mut res = WeightTensor::zeros(layout);
        for layer in 0..layout.boundary_count() {
            for left in 0..layout.width(layer) {
                for right in 0..layout.width(layer + 1) {
                    res.slabs[layer][(left, right)] = rng.gen::<f64>() * (max - min) + min;
                }
            }
        }
        Ok(res)
    }

    /// Builds the tensor from explicitly supplied `[layer][left][right]` values.
    ///
    /// The nesting must match the layout exactly; nothing is truncated or padded.
    pub fn explicit(layout: &LayerLayout, values: &[Vec<Vec<f64>>]) -> Result<WeightTensor> {
        if values.len() != layout.boundary_count() {
            return Err(NetError::shape("weight slab count", layout.boundary_count(), values.len()));
        }
        for (layer, slab) in values.iter().enumerate() {
            if slab.len() != layout.width(layer) {
                return Err(NetError::shape(
                    format!("weight slab {layer} (left units)"),
                    layout.width(layer),
                    slab.len(),
                ));
            }
            for (left, row) in slab.iter().enumerate() {
                if row.len() != layout.width(layer + 1) {
                    return Err(NetError::shape(
                        format!("weights[{layer}][{left}] (right units)"),
                        layout.width(layer + 1),
                        row.len(),
                    ));
                }
            }
        }
        let m = layout.max_width();
        Ok(WeightTensor {
            layout: layout.clone(),
            slabs: values.iter().map(|slab| Matrix::padded_from(slab, m, m)).collect(),
        })
    }

    pub fn layout(&self) -> &LayerLayout {
        &self.layout
    }

    pub fn get(&self, layer: usize, left: usize, right: usize) -> f64 {
        self.slabs[layer][(left, right)]
    }

    pub fn slab(&self, layer: usize) -> &Matrix {
        &self.slabs[layer]
    }

    pub(crate) fn slab_mut(&mut self, layer: usize) -> &mut Matrix {
        &mut self.slabs[layer]
    }

    /// Logical `[layer][left][right]` values without padding.
    pub fn to_nested(&self) -> Vec<Vec<Vec<f64>>> {
        (0..self.layout.boundary_count())
            .map(|layer| {
                self.slabs[layer].block(self.layout.width(layer), self.layout.width(layer + 1))
            })
            .collect()
    }

    /// One `w[layer][left][right] = value` line per logical weight.
    pub fn listing(&self) -> String {
        let mut s = String::new();
        for layer in 0..self.layout.boundary_count() {
            for left in 0..self.layout.width(layer) {
                for right in 0..self.layout.width(layer + 1) {
                    let _ = writeln!(s, "w[{layer}][{left}][{right}] = {}", self.get(layer, left, right));
                }
            }
        }
        s
    }

    /// Serializes the weights to a pretty-printed JSON file.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path.as_ref())?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes weights previously written by `save_json`.
    ///
    /// Slab shapes are re-checked against the stored layout.
    pub fn load_json(path: impl AsRef<Path>) -> Result<WeightTensor> {
        let file = std::fs::File::open(path.as_ref())?;
        let reader = std::io::BufReader::new(file);
        let tensor: WeightTensor = serde_json::from_reader(reader)?;
        tensor.check_shape()?;
        Ok(tensor)
    }

    fn check_shape(&self) -> Result<()> {
        let m = self.layout.max_width();
        if self.slabs.len() != self.layout.boundary_count() {
            return Err(NetError::shape("weight slab count", self.layout.boundary_count(), self.slabs.len()));
        }
        for (layer, slab) in self.slabs.iter().enumerate() {
            let rows_ok = slab.rows == m && slab.data.len() == m;
            let cols_ok = slab.cols == m && slab.data.iter().all(|row| row.len() == m);
            if !rows_ok || !cols_ok {
                return Err(NetError::shape(format!("padded width of weight slab {layer}"), m, slab.rows));
            }
        }
        Ok(())
    }
}
