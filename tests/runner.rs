use std::fs;
use std::path::Path;

use padded_perceptron::runner::{self, RunOptions};
use padded_perceptron::{NetError, Recorder, TerminationReason, WeightTensor};

const AND_GATE: &str = r#"{
    "layers": [2, 2, 1],
    "examples": { "mode": "manual", "cases": [
        { "input": [0, 0], "target": [0] },
        { "input": [1, 1], "target": [1] }
    ] },
    "weights": { "init": "explicit", "values": [
        [[0.3, -0.2], [0.1, 0.4]],
        [[0.5], [-0.3]]
    ] },
    "learning_rate": 0.5,
    "max_iterations": 5000,
    "report_interval": 500,
    "error_threshold": 0.01
}"#;

fn write(dir: &Path, name: &str, text: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, text).unwrap();
    path
}

fn gray(dir: &Path, name: &str, side: (u32, u32), levels: &[u8]) {
    image::GrayImage::from_fn(side.0, side.1, |x, y| image::Luma([levels[(y * side.0 + x) as usize]]))
        .save(dir.join(name))
        .unwrap();
}

#[test]
fn run_file_writes_log_report_and_weights() {
    let dir = tempfile::tempdir().unwrap();
    let config = write(dir.path(), "and.json", AND_GATE);

    let mut options = RunOptions::new(runner::default_log_path(&config));
    options.json_report = Some(dir.path().join("report.json"));
    options.save_weights = Some(dir.path().join("weights.json"));
    options.dump_weights = true;

    let mut rec = Recorder::default();
    let report = runner::run_file(&config, &options, &mut rec).unwrap();
    assert_eq!(report.reason, TerminationReason::ErrorThreshold);
    assert_eq!(rec.records[0].iteration, 0);
    assert!(rec.records.iter().all(|r| r.iteration % 500 == 0));

    let log = fs::read_to_string(dir.path().join("logand.json")).unwrap();
    assert!(log.starts_with("Cause of Termination: Error Threshold (0.01) reached for all cases\n\n"));
    assert!(log.contains(&format!("Iterations: {}\n", report.iterations)));
    assert!(log.contains("Case 1: Target / Calculated\n1 "));
    assert!(log.contains("Final Weights:\nw[0][0][0] = "));

    let json = fs::read_to_string(dir.path().join("report.json")).unwrap();
    assert!(json.contains("\"error_threshold\""));

    let weights = WeightTensor::load_json(dir.path().join("weights.json")).unwrap();
    assert_eq!(weights.layout().widths(), &[2, 2, 1]);
    assert_ne!(weights.get(1, 0, 0), 0.5);
}

#[test]
fn zero_learning_rate_is_logged_as_the_cause() {
    let dir = tempfile::tempdir().unwrap();
    let config = write(
        dir.path(),
        "frozen.json",
        &AND_GATE.replace("\"learning_rate\": 0.5", "\"learning_rate\": 0.0"),
    );
    let options = RunOptions::new(dir.path().join("frozen.log"));
    let report = runner::run_file(&config, &options, &mut ()).unwrap();

    assert_eq!(report.reason, TerminationReason::ZeroLearningRate);
    let log = fs::read_to_string(dir.path().join("frozen.log")).unwrap();
    assert!(log.starts_with("Cause of Termination: Learning Rate = 0\n\nIterations: 0\n"));
}

#[test]
fn image_mode_renders_initial_and_final_outputs() {
    let dir = tempfile::tempdir().unwrap();
    gray(dir.path(), "a.bmp", (2, 2), &[0, 255, 255, 0]);
    gray(dir.path(), "b.bmp", (2, 2), &[255, 0, 0, 255]);
    let config = write(
        dir.path(),
        "faces.json",
        r#"{
            "layers": [4, 3, 4],
            "examples": { "mode": "bitmap", "color": "grayscale", "square": true,
                          "output": "image", "pixels": 4, "images": ["a.bmp", "b.bmp"] },
            "weights": { "init": "random", "min": -0.5, "max": 0.5, "seed": 3 },
            "learning_rate": 0.5,
            "max_iterations": 40,
            "report_interval": 10,
            "error_threshold": 0.0
        }"#,
    );

    let options = RunOptions::new(runner::default_log_path(&config));
    let report = runner::run_file(&config, &options, &mut ()).unwrap();
    assert_eq!(report.reason, TerminationReason::Timeout);
    assert_eq!(report.iterations, 40);
    assert_eq!(report.cases[1].target, vec![1.0, 0.0, 0.0, 1.0]);

    for name in [
        "logfaces_-1_40_case0.bmp",
        "logfaces_40_40_case0.bmp",
        "logfaces_40_40_case1.bmp",
    ] {
        let rendered = image::open(dir.path().join(name)).unwrap().to_luma8();
        assert_eq!(rendered.dimensions(), (2, 2), "{name}");
    }
}

#[test]
fn outputs_that_cannot_be_drawn_fail_before_training() {
    let dir = tempfile::tempdir().unwrap();
    gray(dir.path(), "wide.bmp", (3, 2), &[0, 50, 100, 150, 200, 250]);
    let config = write(
        dir.path(),
        "wide.json",
        r#"{
            "layers": [6, 2, 6],
            "examples": { "mode": "bitmap", "color": "grayscale", "square": false,
                          "output": "image", "pixels": 6, "images": ["wide.bmp"] },
            "weights": { "init": "random", "min": -1.0, "max": 1.0, "seed": 1 },
            "learning_rate": 0.5,
            "max_iterations": 10,
            "report_interval": 10,
            "error_threshold": 0.0
        }"#,
    );

    let options = RunOptions::new(dir.path().join("wide.log"));
    let result = runner::run_file(&config, &options, &mut ());
    assert!(matches!(result, Err(NetError::NonSquareImage(_))));
    assert!(!dir.path().join("wide.log").exists());
}

#[test]
fn mismatched_examples_never_reach_training() {
    let dir = tempfile::tempdir().unwrap();
    let config = write(
        dir.path(),
        "bad.json",
        &AND_GATE.replace("\"layers\": [2, 2, 1]", "\"layers\": [3, 2, 1]"),
    );
    let options = RunOptions::new(dir.path().join("bad.log"));
    let result = runner::run_file(&config, &options, &mut ());
    assert!(matches!(result, Err(NetError::ShapeMismatch { .. })));
    assert!(!dir.path().join("bad.log").exists());
}
