pub mod bitmap;

pub use bitmap::{ColorDepth, PixelGrid, hand_process, render_square};
