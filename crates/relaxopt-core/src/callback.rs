//! Callback support for relaxation runs.
//!
//! Callbacks observe a run and may stop it early. Stopping is cooperative:
//! the optimizer asks the callback after each step whether to continue.

use crate::{error::OptimizerResult, optimizer::OptimizationResult, types::Scalar};

/// Snapshot of the optimizer passed to callbacks after each step.
#[derive(Clone, Copy, Debug)]
pub struct IterationInfo<T: Scalar> {
    /// Number of steps taken so far in this run
    pub iteration: usize,
    /// Energy at the position the step started from
    pub energy: T,
    /// RMS force at the position the step started from
    pub rms_force: T,
    /// Step size after the update
    pub dt: T,
    /// Mixing factor after the update
    pub mixing: T,
    /// Consecutive steps with positive power
    pub good_steps: usize,
}

/// Trait for relaxation callbacks.
pub trait OptimizationCallback<T: Scalar> {
    /// Called at the start of a run.
    fn on_optimization_start(&mut self) -> OptimizerResult<()> {
        Ok(())
    }

    /// Called at the end of each step.
    ///
    /// Returns `true` to continue, `false` to stop early.
    fn on_iteration_end(&mut self, info: &IterationInfo<T>) -> OptimizerResult<bool> {
        let _ = info;
        Ok(true)
    }

    /// Called once the run has finished.
    fn on_optimization_end(&mut self, result: &OptimizationResult<T>) -> OptimizerResult<()> {
        let _ = result;
        Ok(())
    }
}

/// A no-op callback that does nothing.
pub struct NoOpCallback;

impl<T: Scalar> OptimizationCallback<T> for NoOpCallback {}

/// A callback that reports progress through the `log` facade.
pub struct LoggingCallback {
    log_every: usize,
}

impl LoggingCallback {
    /// Logs every `log_every` steps (a value of 0 is treated as 1).
    pub fn new(log_every: usize) -> Self {
        Self {
            log_every: log_every.max(1),
        }
    }
}

impl<T: Scalar> OptimizationCallback<T> for LoggingCallback {
    fn on_optimization_start(&mut self) -> OptimizerResult<()> {
        log::info!("Starting relaxation");
        Ok(())
    }

    fn on_iteration_end(&mut self, info: &IterationInfo<T>) -> OptimizerResult<bool> {
        if info.iteration % self.log_every == 0 {
            log::info!(
                "Step {}: energy = {}, rms force = {}, dt = {}",
                info.iteration,
                info.energy,
                info.rms_force,
                info.dt
            );
        }
        Ok(true)
    }

    fn on_optimization_end(&mut self, result: &OptimizationResult<T>) -> OptimizerResult<()> {
        log::info!(
            "Relaxation finished after {} steps ({:?}). Final energy: {}",
            result.iterations,
            result.termination_reason,
            result.energy
        );
        Ok(())
    }
}

/// Records the energy and RMS force of every step.
#[derive(Debug, Default)]
pub struct HistoryCallback<T: Scalar> {
    /// Energies, one per step
    pub energies: Vec<T>,
    /// RMS forces, one per step
    pub rms_forces: Vec<T>,
    /// Step sizes after each update
    pub step_sizes: Vec<T>,
}

impl<T: Scalar> HistoryCallback<T> {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self {
            energies: Vec::new(),
            rms_forces: Vec::new(),
            step_sizes: Vec::new(),
        }
    }
}

impl<T: Scalar> OptimizationCallback<T> for HistoryCallback<T> {
    fn on_optimization_start(&mut self) -> OptimizerResult<()> {
        self.energies.clear();
        self.rms_forces.clear();
        self.step_sizes.clear();
        Ok(())
    }

    fn on_iteration_end(&mut self, info: &IterationInfo<T>) -> OptimizerResult<bool> {
        self.energies.push(info.energy);
        self.rms_forces.push(info.rms_force);
        self.step_sizes.push(info.dt);
        Ok(true)
    }
}

/// Stops the run after a fixed number of steps.
pub struct StopAfter {
    steps: usize,
}

impl StopAfter {
    /// Stops once `steps` steps have completed.
    pub fn new(steps: usize) -> Self {
        Self { steps }
    }
}

impl<T: Scalar> OptimizationCallback<T> for StopAfter {
    fn on_iteration_end(&mut self, info: &IterationInfo<T>) -> OptimizerResult<bool> {
        Ok(info.iteration < self.steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(iteration: usize) -> IterationInfo<f64> {
        IterationInfo {
            iteration,
            energy: 1.0 / (iteration as f64 + 1.0),
            rms_force: 0.5,
            dt: 0.1,
            mixing: 0.1,
            good_steps: 0,
        }
    }

    #[test]
    fn test_history_records_each_step() {
        let mut history = HistoryCallback::<f64>::new();
        history.on_optimization_start().unwrap();
        for i in 1..=3 {
            assert!(history.on_iteration_end(&info(i)).unwrap());
        }
        assert_eq!(history.energies.len(), 3);
        assert_eq!(history.rms_forces, vec![0.5; 3]);

        history.on_optimization_start().unwrap();
        assert!(history.energies.is_empty());
    }

    #[test]
    fn test_stop_after() {
        let mut stop = StopAfter::new(2);
        assert!(OptimizationCallback::<f64>::on_iteration_end(&mut stop, &info(1)).unwrap());
        assert!(!OptimizationCallback::<f64>::on_iteration_end(&mut stop, &info(2)).unwrap());
    }

    #[test]
    fn test_logging_callback_never_stops() {
        let mut cb = LoggingCallback::new(0);
        for i in 0..5 {
            assert!(OptimizationCallback::<f64>::on_iteration_end(&mut cb, &info(i)).unwrap());
        }
    }
}
