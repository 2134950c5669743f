//! Bitmap decoding and rendering for image-mode runs.
//!
//! Pixels are kept as integer levels: 8-bit luma for grayscale images and
//! packed `0xRRGGBB` values for RGB images. Network values in [0, 1] map onto
//! those levels through `ColorDepth::scale` and `ColorDepth::reverse_scale`.

use log::debug;
use serde::{Serialize, Deserialize};
use std::path::Path;

use crate::error::{NetError, Result};

/// Threshold below which an inverted hand-image level is treated as background.
const HAND_BACKGROUND_LEVEL: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorDepth {
    Grayscale,
    Rgb,
}

impl ColorDepth {
    /// Largest pixel level: 2^8 - 1 or 2^24 - 1.
    pub fn max_level(self) -> f64 {
        match self {
            ColorDepth::Grayscale => 255.0,
            ColorDepth::Rgb => 16_777_215.0,
        }
    }

    /// Maps a pixel level onto [0, 1], ignoring anything above the low 24 bits.
    pub fn scale(self, level: u32) -> f64 {
        (level & 0x00FF_FFFF) as f64 / self.max_level()
    }

    /// Maps a network value back onto a pixel level.
    pub fn reverse_scale(self, value: f64) -> f64 {
        value * self.max_level()
    }
}

/// A decoded image as row-major pixel levels.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelGrid {
    pub width: usize,
    pub height: usize,
    pub levels: Vec<u32>,
}

impl PixelGrid {
    pub fn new(width: usize, height: usize, levels: Vec<u32>) -> Result<PixelGrid> {
        if levels.len() != width * height {
            return Err(NetError::shape("pixel grid", width * height, levels.len()));
        }
        Ok(PixelGrid { width, height, levels })
    }

    /// Decodes any format the `image` crate was built with.
    pub fn load(path: &Path, depth: ColorDepth) -> Result<PixelGrid> {
        let img = image::open(path)?;
        let (width, height, levels) = match depth {
            ColorDepth::Grayscale => {
                let luma = img.to_luma8();
                let levels: Vec<u32> = luma.pixels().map(|p| p.0[0] as u32).collect();
                (luma.width() as usize, luma.height() as usize, levels)
            }
            ColorDepth::Rgb => {
                let rgb = img.to_rgb8();
                let levels: Vec<u32> = rgb
                    .pixels()
                    .map(|p| (p.0[0] as u32) << 16 | (p.0[1] as u32) << 8 | p.0[2] as u32)
                    .collect();
                (rgb.width() as usize, rgb.height() as usize, levels)
            }
        };
        debug!("decoded {} ({width}x{height}, {depth:?})", path.display());
        PixelGrid::new(width, height, levels)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn is_square(&self) -> bool {
        self.width == self.height
    }

    pub fn level(&self, row: usize, col: usize) -> u32 {
        self.levels[row * self.width + col]
    }

    /// Network-ready values in [0, 1].
    pub fn scaled(&self, depth: ColorDepth) -> Vec<f64> {
        self.levels.iter().map(|&level| depth.scale(level)).collect()
    }
}

/// Cleans up a photographed hand-drawn grayscale image.
///
/// Inverts every level, drops faint levels (below 100) to zero and shifts
/// the picture so its intensity centre of mass lands on the image centre.
/// Pixels pushed off the frame are lost. A blank image is returned as is.
pub fn hand_process(grid: &PixelGrid) -> Result<PixelGrid> {
    if !grid.is_square() {
        return Err(NetError::NonSquareImage(format!(
            "cannot centre a {}x{} image",
            grid.width, grid.height
        )));
    }

    let mut cleaned = Vec::with_capacity(grid.len());
    let (mut row_com, mut col_com, mut total) = (0.0, 0.0, 0.0);
    for row in 0..grid.height {
        for col in 0..grid.width {
            let inverted = 255 - grid.level(row, col).min(255);
            let level = if inverted < HAND_BACKGROUND_LEVEL { 0 } else { inverted };
            cleaned.push(level);
            total += level as f64;
            row_com += (row as f64) * level as f64;
            col_com += (col as f64) * level as f64;
        }
    }
    let cleaned = PixelGrid::new(grid.width, grid.height, cleaned)?;
    if total == 0.0 {
        return Ok(cleaned);
    }

    let half = (grid.height / 2) as i64;
    let row_shift = half - (row_com / total) as i64;
    let col_shift = half - (col_com / total) as i64;

    let mut centred = vec![0; grid.len()];
    for row in 0..grid.height {
        for col in 0..grid.width {
            let new_row = row as i64 + row_shift;
            let new_col = col as i64 + col_shift;
            let inside = (0..grid.height as i64).contains(&new_row) && (0..grid.width as i64).contains(&new_col);
            if inside {
                centred[new_row as usize * grid.width + new_col as usize] = cleaned.level(row, col);
            }
        }
    }
    PixelGrid::new(grid.width, grid.height, centred)
}

/// Side length of the square image an output vector of `len` values fills.
pub fn square_side(len: usize, square: bool) -> Result<usize> {
    if !square {
        return Err(NetError::NonSquareImage(
            "rendering requires images configured as square".to_string(),
        ));
    }
    let side = (len as f64).sqrt().round() as usize;
    if side * side != len || len == 0 {
        return Err(NetError::NonSquareImage(format!(
            "{len} output values do not form a square image"
        )));
    }
    Ok(side)
}

/// Writes `outputs` as a square bitmap; the format follows `path`'s extension.
pub fn render_square(outputs: &[f64], depth: ColorDepth, square: bool, path: &Path) -> Result<()> {
    let side = square_side(outputs.len(), square)?;
    let levels: Vec<u32> = outputs
        .iter()
        .map(|&v| depth.reverse_scale(v).clamp(0.0, depth.max_level()) as u32)
        .collect();
    let at = |x: u32, y: u32| levels[y as usize * side + x as usize];

    match depth {
        ColorDepth::Grayscale => {
            image::GrayImage::from_fn(side as u32, side as u32, |x, y| image::Luma([at(x, y) as u8]))
                .save(path)?;
        }
        ColorDepth::Rgb => {
            image::RgbImage::from_fn(side as u32, side as u32, |x, y| {
                let l = at(x, y);
                image::Rgb([(l >> 16 & 0xFF) as u8, (l >> 8 & 0xFF) as u8, (l & 0xFF) as u8])
            })
            .save(path)?;
        }
    }
    debug!("wrote {side}x{side} bitmap to {}", path.display());
    Ok(())
}
