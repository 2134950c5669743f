use padded_perceptron::{
    Example, Hyperparameters, LayerLayout, LogSink, NetworkState, TrainingEngine, TrainingSet,
    WeightTensor,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> padded_perceptron::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let layout = LayerLayout::new(vec![2, 4, 1])?;
    let weights = WeightTensor::random(&layout, -1.0, 1.0, &mut StdRng::seed_from_u64(2020))?;

    let examples = TrainingSet::new(vec![
        Example::new(vec![1.0, 0.0], vec![1.0]),
        Example::new(vec![1.0, 1.0], vec![0.0]),
        Example::new(vec![0.0, 1.0], vec![1.0]),
        Example::new(vec![0.0, 0.0], vec![0.0]),
    ]);

    let hyper = Hyperparameters::new(1.0, 100_000, 0.001).with_report_interval(10_000);
    let mut engine = TrainingEngine::new(NetworkState::new(weights), examples, hyper)?;
    let report = engine.run(&mut LogSink::default())?;

    println!("Terminated: {} after {} iterations", report.reason, report.iterations);
    for case in &report.cases {
        println!(
            "Case {}: target {:?} -> output {:.4} (error {:.6})",
            case.case, case.target, case.computed[0], case.error
        );
    }
    Ok(())
}
