use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Serialize, Deserialize};
use std::path::{Path, PathBuf};

use crate::error::{NetError, Result};
use crate::imaging::bitmap::{hand_process, ColorDepth, PixelGrid};
use crate::network::{LayerLayout, NetworkState, WeightTensor};
use crate::train::examples::{Example, TrainingSet};
use crate::train::train_config::Hyperparameters;

/// A complete, serializable description of one training run.
///
/// ```json
/// {
///   "layers": [2, 2, 1],
///   "examples": { "mode": "manual", "cases": [ { "input": [0, 0], "target": [0] } ] },
///   "weights": { "init": "random", "min": -1.0, "max": 1.0, "seed": 7 },
///   "learning_rate": 0.5,
///   "max_iterations": 5000,
///   "report_interval": 500,
///   "error_threshold": 0.01
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Full width vector, input layer first.
    pub layers: Vec<usize>,
    pub examples: ExampleSource,
    pub weights: WeightInit,
    pub learning_rate: f64,
    pub max_iterations: usize,
    pub report_interval: usize,
    pub error_threshold: f64,
}

/// Where the training examples come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ExampleSource {
    /// Input and target vectors written out in the config.
    Manual { cases: Vec<Example> },
    /// One example per image file.
    Bitmap(BitmapSource),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BitmapSource {
    pub color: ColorDepth,
    /// Every image (and every rendered output) is square.
    pub square: bool,
    pub output: OutputKind,
    #[serde(default)]
    pub processing: Processing,
    /// Declared pixel count of every image.
    pub pixels: usize,
    /// Image paths, relative to the config file.
    pub images: Vec<PathBuf>,
    /// One target per image; only read for `OutputKind::Number`.
    #[serde(default)]
    pub targets: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputKind {
    /// The network reproduces its input image.
    Image,
    /// The network maps each image onto a single number.
    Number,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Processing {
    /// Use pixels as decoded.
    #[default]
    Letter,
    /// Invert, drop the background and centre a photographed drawing.
    Hand,
}

/// How the initial weights are chosen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "init", rename_all = "snake_case")]
pub enum WeightInit {
    /// Uniform in `[min, max)`. Without a seed every run starts differently.
    Random {
        min: f64,
        max: f64,
        #[serde(default)]
        seed: Option<u64>,
    },
    /// `values[layer][left][right]`, matching the layer widths exactly.
    Explicit { values: Vec<Vec<Vec<f64>>> },
}

/// How outputs are rendered in image mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSettings {
    pub color: ColorDepth,
    pub square: bool,
}

/// Everything a training run needs, checked for consistency.
#[derive(Debug)]
pub struct PreparedRun {
    pub state: NetworkState,
    pub examples: TrainingSet,
    pub hyper: Hyperparameters,
    /// `Some` when outputs should also be rendered as bitmaps.
    pub image: Option<ImageSettings>,
}

impl RunConfig {
    /// Deserializes a `RunConfig` from a JSON file.
    pub fn load_json(path: &Path) -> Result<RunConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Serializes the config to a pretty-printed JSON file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Fixes the random-weight seed. Explicit weights are left untouched.
    pub fn set_seed(&mut self, seed: u64) {
        if let WeightInit::Random { seed: current, .. } = &mut self.weights {
            *current = Some(seed);
        }
    }

    pub fn hyperparameters(&self) -> Hyperparameters {
        Hyperparameters {
            learning_rate: self.learning_rate,
            max_iterations: self.max_iterations,
            report_interval: self.report_interval,
            error_threshold: self.error_threshold,
        }
    }

    /// Builds and cross-checks the layout, examples, weights and
    /// hyperparameters. Image paths are resolved against `base_dir`.
    pub fn prepare(&self, base_dir: &Path) -> Result<PreparedRun> {
        let layout = LayerLayout::new(self.layers.clone())?;
        let hyper = self.hyperparameters();
        hyper.validate()?;

        let (examples, image) = match &self.examples {
            ExampleSource::Manual { cases } => (TrainingSet::new(cases.clone()), None),
            ExampleSource::Bitmap(source) => {
                let examples = source.load(base_dir)?;
                let image = match source.output {
                    OutputKind::Image => Some(ImageSettings {
                        color: source.effective_color(),
                        square: source.square,
                    }),
                    OutputKind::Number => None,
                };
                (examples, image)
            }
        };
        examples.validate(&layout)?;

        let weights = match &self.weights {
            WeightInit::Random { min, max, seed } => {
                let mut rng = match seed {
                    Some(seed) => StdRng::seed_from_u64(*seed),
                    None => StdRng::from_entropy(),
                };
                WeightTensor::random(&layout, *min, *max, &mut rng)?
            }
            WeightInit::Explicit { values } => WeightTensor::explicit(&layout, values)?,
        };

        info!(
            "configured {:?} with {} examples ({})",
            layout.widths(),
            examples.len(),
            if image.is_some() { "image mode" } else { "numeric mode" }
        );
        Ok(PreparedRun {
            state: NetworkState::new(weights),
            examples,
            hyper,
            image,
        })
    }
}

impl BitmapSource {
    /// Hand processing always yields grayscale levels.
    pub fn effective_color(&self) -> ColorDepth {
        match self.processing {
            Processing::Hand => ColorDepth::Grayscale,
            Processing::Letter => self.color,
        }
    }

    /// Decodes every image into one example.
    pub fn load(&self, base_dir: &Path) -> Result<TrainingSet> {
        if self.output == OutputKind::Number && self.targets.len() != self.images.len() {
            return Err(NetError::shape("bitmap target list", self.images.len(), self.targets.len()));
        }

        let depth = self.effective_color();
        let mut inputs = Vec::with_capacity(self.images.len());
        let mut targets = Vec::with_capacity(self.images.len());
        for (index, image) in self.images.iter().enumerate() {
            let path = base_dir.join(image);
            let mut grid = PixelGrid::load(&path, depth)?;

            if self.square && !grid.is_square() {
                return Err(NetError::NonSquareImage(format!(
                    "{} is {}x{} but images are configured as square",
                    path.display(),
                    grid.width,
                    grid.height
                )));
            }
            if self.processing == Processing::Hand {
                grid = hand_process(&grid)?;
            }
            if grid.len() != self.pixels {
                return Err(NetError::shape(
                    format!("pixel count of {}", path.display()),
                    self.pixels,
                    grid.len(),
                ));
            }

            let input = grid.scaled(depth);
            let target = match self.output {
                OutputKind::Image => input.clone(),
                OutputKind::Number => vec![self.targets[index]],
            };
            debug!("loaded case {index} from {}", path.display());
            inputs.push(input);
            targets.push(target);
        }
        TrainingSet::from_pairs(inputs, targets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const XOR_LIKE: &str = r#"{
        "layers": [2, 2, 1],
        "examples": { "mode": "manual", "cases": [
            { "input": [0, 0], "target": [0] },
            { "input": [1, 1], "target": [1] }
        ] },
        "weights": { "init": "random", "min": -1.0, "max": 1.0, "seed": 11 },
        "learning_rate": 0.5,
        "max_iterations": 5000,
        "report_interval": 1000,
        "error_threshold": 0.01
    }"#;

    fn parse(text: &str) -> RunConfig {
        serde_json::from_str(text).unwrap()
    }

    #[test]
    fn manual_config_prepares_a_consistent_run() {
        let run = parse(XOR_LIKE).prepare(Path::new(".")).unwrap();
        assert_eq!(run.state.layout().widths(), &[2, 2, 1]);
        assert_eq!(run.examples.len(), 2);
        assert_eq!(run.hyper.report_interval, 1000);
        assert!(run.image.is_none());
    }

    #[test]
    fn seeded_random_weights_repeat() {
        let a = parse(XOR_LIKE).prepare(Path::new(".")).unwrap();
        let b = parse(XOR_LIKE).prepare(Path::new(".")).unwrap();
        assert_eq!(a.state.weights(), b.state.weights());
    }

    #[test]
    fn set_seed_only_touches_random_init() {
        let mut config = parse(XOR_LIKE);
        config.set_seed(99);
        assert!(matches!(config.weights, WeightInit::Random { seed: Some(99), .. }));

        config.weights = WeightInit::Explicit { values: vec![] };
        config.set_seed(1);
        assert_eq!(config.weights, WeightInit::Explicit { values: vec![] });
    }

    #[test]
    fn example_length_mismatch_is_fatal() {
        let mut config = parse(XOR_LIKE);
        config.layers = vec![3, 2, 1];
        assert!(matches!(
            config.prepare(Path::new(".")),
            Err(NetError::ShapeMismatch { expected: 3, found: 2, .. })
        ));
    }

    #[test]
    fn explicit_weights_must_fit_the_layers() {
        let mut config = parse(XOR_LIKE);
        config.weights = WeightInit::Explicit {
            values: vec![vec![vec![0.1, 0.2], vec![0.3, 0.4]]],
        };
        assert!(matches!(config.prepare(Path::new(".")), Err(NetError::ShapeMismatch { .. })));
    }

    #[test]
    fn unknown_mode_is_rejected() {
        let text = XOR_LIKE.replace("\"manual\"", "\"spreadsheet\"");
        assert!(serde_json::from_str::<RunConfig>(&text).is_err());
    }

    #[test]
    fn bitmap_number_mode_needs_one_target_per_image() {
        let source = BitmapSource {
            color: ColorDepth::Grayscale,
            square: true,
            output: OutputKind::Number,
            processing: Processing::Letter,
            pixels: 4,
            images: vec![PathBuf::from("a.bmp"), PathBuf::from("b.bmp")],
            targets: vec![1.0],
        };
        assert!(matches!(source.load(Path::new(".")), Err(NetError::ShapeMismatch { .. })));
    }

    #[test]
    fn bitmap_number_mode_pairs_each_image_with_its_target() {
        let dir = tempfile::tempdir().unwrap();
        for (name, level) in [("dark.bmp", 0u8), ("light.bmp", 255u8)] {
            image::GrayImage::from_pixel(2, 2, image::Luma([level]))
                .save(dir.path().join(name))
                .unwrap();
        }
        let source = BitmapSource {
            color: ColorDepth::Grayscale,
            square: true,
            output: OutputKind::Number,
            processing: Processing::Letter,
            pixels: 4,
            images: vec![PathBuf::from("dark.bmp"), PathBuf::from("light.bmp")],
            targets: vec![0.25, 0.75],
        };

        let set = source.load(dir.path()).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.get(0).unwrap().input, vec![0.0; 4]);
        assert_eq!(set.get(0).unwrap().target, vec![0.25]);
        assert_eq!(set.get(1).unwrap().input, vec![1.0; 4]);
        assert_eq!(set.get(1).unwrap().target, vec![0.75]);
    }

    #[test]
    fn json_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");
        let config = parse(XOR_LIKE);
        config.save_json(&path).unwrap();
        assert_eq!(RunConfig::load_json(&path).unwrap(), config);
    }
}
