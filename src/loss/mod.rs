pub mod half_sse;

pub use half_sse::HalfSquaredError;
