pub mod run_config;

pub use run_config::{
    BitmapSource, ExampleSource, ImageSettings, OutputKind, PreparedRun, Processing, RunConfig,
    WeightInit,
};
