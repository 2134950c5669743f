use std::time::Instant;

use log::{debug, info, warn};

use crate::activation::activation::{Activation, Sigmoid};
use crate::error::Result;
use crate::loss::half_sse::HalfSquaredError;
use crate::network::state::NetworkState;
use crate::report::training_report::{CaseReport, TrainingReport};
use crate::train::backprop::back_propagate;
use crate::train::examples::TrainingSet;
use crate::train::forward::forward;
use crate::train::progress::{ProgressRecord, ProgressSink, SweepSummary};
use crate::train::termination::{self, TerminationReason, TrainingStatus};
use crate::train::train_config::Hyperparameters;

/// Owns the network tensors for the duration of a run and drives online
/// (one example at a time) gradient descent over them.
///
/// Each step trains on one example: forward, backward, forward again so the
/// activations reflect the updated weights. A sweep runs one step per
/// example in set order, then scores every example; termination is only
/// decided at the end of a sweep.
pub struct TrainingEngine<A: Activation = Sigmoid> {
    state: NetworkState,
    examples: TrainingSet,
    hyper: Hyperparameters,
    activation: A,
    iteration: usize,
    sweeps: usize,
    previous_error: f64,
    status: TrainingStatus,
    started: Instant,
}

impl TrainingEngine<Sigmoid> {
    pub fn new(
        state: NetworkState,
        examples: TrainingSet,
        hyper: Hyperparameters,
    ) -> Result<TrainingEngine<Sigmoid>> {
        TrainingEngine::with_activation(state, examples, hyper, Sigmoid)
    }
}

impl<A: Activation> TrainingEngine<A> {
    /// Checks the examples and hyperparameters against the network before
    /// anything runs; every inconsistency is reported here.
    pub fn with_activation(
        state: NetworkState,
        examples: TrainingSet,
        hyper: Hyperparameters,
        activation: A,
    ) -> Result<TrainingEngine<A>> {
        hyper.validate()?;
        examples.validate(state.layout())?;
        debug!(
            "engine ready: layers={:?} examples={} hyperparameters={:?}",
            state.layout().widths(),
            examples.len(),
            hyper
        );
        Ok(TrainingEngine {
            state,
            examples,
            hyper,
            activation,
            iteration: 0,
            sweeps: 0,
            previous_error: 0.0,
            status: TrainingStatus::Running,
            started: Instant::now(),
        })
    }

    pub fn state(&self) -> &NetworkState {
        &self.state
    }

    pub fn into_state(self) -> NetworkState {
        self.state
    }

    pub fn examples(&self) -> &TrainingSet {
        &self.examples
    }

    pub fn hyperparameters(&self) -> &Hyperparameters {
        &self.hyper
    }

    /// Single-example steps taken so far.
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    pub fn sweeps(&self) -> usize {
        self.sweeps
    }

    pub fn status(&self) -> TrainingStatus {
        self.status
    }

    /// Loads `case`'s input and runs a forward pass.
    pub fn propagate(&mut self, case: usize) -> Result<()> {
        let example = self.examples.get(case)?;
        self.state.load_inputs(&example.input)?;
        forward(&mut self.state, &self.activation);
        Ok(())
    }

    /// Error of `case` under the current weights.
    pub fn evaluate(&mut self, case: usize) -> Result<f64> {
        self.propagate(case)?;
        HalfSquaredError::of_state(&self.state, &self.examples.get(case)?.target)
    }

    /// Worst example error under the current weights.
    pub fn max_error(&mut self) -> Result<f64> {
        let mut max_error = 0.0;
        for case in 0..self.examples.len() {
            let error = self.evaluate(case)?;
            if error > max_error {
                max_error = error;
            }
        }
        Ok(max_error)
    }

    /// Trains on a single example and reports it if the step is due.
    pub fn step<S: ProgressSink + ?Sized>(&mut self, case: usize, sink: &mut S) -> Result<()> {
        let example = self.examples.get(case)?;

        self.state.load_inputs(&example.input)?;
        forward(&mut self.state, &self.activation);
        back_propagate(&mut self.state, &self.activation, &example.target, self.hyper.learning_rate)?;
        forward(&mut self.state, &self.activation);

        let error = HalfSquaredError::of_state(&self.state, &example.target)?;
        let error_change = self.previous_error - error;
        self.previous_error = error;

        if self.iteration % self.hyper.report_interval == 0 {
            sink.record(&ProgressRecord {
                iteration: self.iteration,
                elapsed_ms: self.started.elapsed().as_millis() as u64,
                error,
                error_change,
                learning_rate: self.hyper.learning_rate,
                case,
                output: self.state.output_vector().to_vec(),
                target: example.target.clone(),
            });
        }

        self.iteration += 1;
        Ok(())
    }

    /// One step per example in set order, then the worst error afterwards.
    pub fn sweep<S: ProgressSink + ?Sized>(&mut self, sink: &mut S) -> Result<f64> {
        for case in 0..self.examples.len() {
            self.step(case, sink)?;
        }
        let max_error = self.max_error()?;
        self.sweeps += 1;
        sink.sweep(&SweepSummary {
            sweep: self.sweeps,
            iteration: self.iteration,
            max_error,
        });
        Ok(max_error)
    }

    /// Sweeps until a termination condition holds, then scores every example.
    ///
    /// Calling `run` again on a finished engine does not train further; it
    /// only rebuilds the report.
    pub fn run<S: ProgressSink + ?Sized>(&mut self, sink: &mut S) -> Result<TrainingReport> {
        if self.status.is_running() {
            info!(
                "training {:?} on {} examples: learning_rate={} max_iterations={} error_threshold={}",
                self.state.layout().widths(),
                self.examples.len(),
                self.hyper.learning_rate,
                self.hyper.max_iterations,
                self.hyper.error_threshold,
            );
            self.status = termination::check_before_training(&self.hyper);
            if !self.status.is_running() {
                warn!("learning rate is zero; the weights can never change");
            }
            self.previous_error = self.evaluate(0)?;
        }

        while self.status.is_running() {
            let max_error = self.sweep(sink)?;
            self.status = termination::check_after_sweep(&self.hyper, self.iteration, max_error);
        }

        let reason = match self.status {
            TrainingStatus::Terminated(reason) => reason,
            TrainingStatus::Running => TerminationReason::Timeout,
        };
        info!("terminated: {reason} after {} iterations ({} sweeps)", self.iteration, self.sweeps);

        Ok(TrainingReport {
            reason,
            iterations: self.iteration,
            sweeps: self.sweeps,
            elapsed_ms: self.started.elapsed().as_millis() as u64,
            cases: self.case_reports()?,
        })
    }

    /// Target, computed output and error for every example.
    pub fn case_reports(&mut self) -> Result<Vec<CaseReport>> {
        let mut cases = Vec::with_capacity(self.examples.len());
        for case in 0..self.examples.len() {
            let error = self.evaluate(case)?;
            cases.push(CaseReport {
                case,
                target: self.examples.get(case)?.target.clone(),
                computed: self.state.output_vector().to_vec(),
                error,
            });
        }
        Ok(cases)
    }
}
