//! Fast Inertial Relaxation Engine (FIRE).
//!
//! FIRE relaxes coordinates toward a local energy minimum by running damped
//! molecular dynamics with unit masses, steering the velocity toward the
//! force and adapting the time step to how consistently the system moves
//! downhill.
//!
//! # Algorithm Overview
//!
//! Each step takes the current force `f` (the negative gradient) and:
//! 1. On the very first step, starts from zero velocity
//! 2. Otherwise computes the power `P = v·f`
//!    - `P > 0`: mixes the velocity toward the force direction,
//!      `v ← (1-α)v + α f ‖v‖/‖f‖`; after more than `n_min` such steps in a
//!      row, grows `dt` (capped at `dt_max`) and decays `α`
//!    - `P ≤ 0`: zeroes the velocity, resets `α`, shrinks `dt`
//! 3. Integrates `v ← v + dt·f` and proposes `dr = dt·v`
//! 4. Caps the displacement at `max_move` and moves `x ← x + dr`
//!
//! Convergence is judged on the RMS force `‖f‖/√n`, not the largest
//! component.
//!
//! # Examples
//!
//! ```rust
//! use relaxopt_core::{potentials::Harmonic, types::DVector};
//! use relaxopt_optim::{Fire, FireConfig};
//!
//! let well = Harmonic::new(DVector::<f64>::from_vec(vec![1.0, -2.0]), 1.0).unwrap();
//! let mut fire = Fire::new(
//!     DVector::from_vec(vec![4.0, 3.0]),
//!     well,
//!     FireConfig::new().with_max_move(0.2),
//! )
//! .unwrap();
//!
//! let result = fire.run(1e-6, 10_000).unwrap();
//! assert!(result.converged);
//! assert!((result.point[0] - 1.0).abs() < 1e-4);
//! ```

use num_traits::Float;
use relaxopt_core::{
    callback::{IterationInfo, NoOpCallback, OptimizationCallback},
    error::{OptimizerError, OptimizerResult},
    optimizer::{rms_force, OptimizationResult, Optimizer, TerminationReason},
    potential::Potential,
    types::{all_finite, max_abs, stable_norm, DVector, Scalar},
};
use std::time::Instant;

/// How the size of a trial displacement is measured against `max_move`.
///
/// The same measure is used to decide whether to cap and to rescale, so a
/// capped displacement always measures exactly `max_move`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StepNorm {
    /// Euclidean norm of the whole displacement vector
    #[default]
    Euclidean,
    /// Largest absolute component of the displacement
    MaxComponent,
}

impl StepNorm {
    /// Measures `dr` with this norm.
    pub fn measure<T: Scalar>(self, dr: &DVector<T>) -> T {
        match self {
            Self::Euclidean => stable_norm(dr),
            Self::MaxComponent => max_abs(dr),
        }
    }
}

/// Configuration for the FIRE optimizer.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FireConfig<T>
where
    T: Scalar,
{
    /// Initial time step
    pub dt: T,

    /// Largest displacement allowed in one step
    pub max_move: T,

    /// Upper bound on the time step
    pub dt_max: T,

    /// Aligned steps required before `dt` grows and `alpha` decays
    pub n_min: usize,

    /// Time step growth factor (> 1)
    pub f_inc: T,

    /// Time step shrink factor on a velocity reset (in (0, 1))
    pub f_dec: T,

    /// Value `alpha` is reset to after a velocity reset
    pub alpha_start: T,

    /// Decay factor for `alpha` (in (0, 1))
    pub f_alpha: T,

    /// Initial mixing factor
    pub alpha: T,

    /// Measure used for the displacement cap
    pub step_norm: StepNorm,
}

impl<T> Default for FireConfig<T>
where
    T: Scalar,
{
    fn default() -> Self {
        Self {
            dt: <T as Scalar>::from_f64(0.1),
            max_move: <T as Scalar>::from_f64(0.5),
            dt_max: <T as Scalar>::from_f64(1.0),
            n_min: 5,
            f_inc: <T as Scalar>::from_f64(1.1),
            f_dec: <T as Scalar>::from_f64(0.5),
            alpha_start: <T as Scalar>::from_f64(0.1),
            f_alpha: <T as Scalar>::from_f64(0.99),
            alpha: <T as Scalar>::from_f64(0.1),
            step_norm: StepNorm::Euclidean,
        }
    }
}

impl<T> FireConfig<T>
where
    T: Scalar,
{
    /// Creates a new FIRE configuration with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the initial time step.
    pub fn with_dt(mut self, dt: T) -> Self {
        self.dt = dt;
        self
    }

    /// Sets the displacement cap.
    pub fn with_max_move(mut self, max_move: T) -> Self {
        self.max_move = max_move;
        self
    }

    /// Sets the upper bound on the time step.
    pub fn with_dt_max(mut self, dt_max: T) -> Self {
        self.dt_max = dt_max;
        self
    }

    /// Sets the number of aligned steps required before acceleration.
    pub fn with_n_min(mut self, n_min: usize) -> Self {
        self.n_min = n_min;
        self
    }

    /// Sets the time step growth factor.
    pub fn with_f_inc(mut self, f_inc: T) -> Self {
        self.f_inc = f_inc;
        self
    }

    /// Sets the time step shrink factor.
    pub fn with_f_dec(mut self, f_dec: T) -> Self {
        self.f_dec = f_dec;
        self
    }

    /// Sets the mixing factor restored after a velocity reset.
    pub fn with_alpha_start(mut self, alpha_start: T) -> Self {
        self.alpha_start = alpha_start;
        self
    }

    /// Sets the mixing factor decay.
    pub fn with_f_alpha(mut self, f_alpha: T) -> Self {
        self.f_alpha = f_alpha;
        self
    }

    /// Sets the initial mixing factor.
    pub fn with_alpha(mut self, alpha: T) -> Self {
        self.alpha = alpha;
        self
    }

    /// Sets the displacement cap measure.
    pub fn with_step_norm(mut self, step_norm: StepNorm) -> Self {
        self.step_norm = step_norm;
        self
    }

    /// Checks every parameter against its allowed range.
    ///
    /// Out-of-range values are reported, never clamped.
    pub fn validate(&self) -> OptimizerResult<()> {
        for (name, value) in [
            ("dt", self.dt),
            ("max_move", self.max_move),
            ("dt_max", self.dt_max),
            ("f_inc", self.f_inc),
            ("f_dec", self.f_dec),
            ("alpha_start", self.alpha_start),
            ("f_alpha", self.f_alpha),
            ("alpha", self.alpha),
        ] {
            if !(<T as Float>::is_finite(value) && value > T::zero()) {
                return Err(invalid(name, value, "must be positive and finite"));
            }
        }

        if self.n_min == 0 {
            return Err(OptimizerError::invalid_configuration(
                "must be at least 1",
                "n_min",
                "0",
            ));
        }
        if self.f_inc <= T::one() {
            return Err(invalid("f_inc", self.f_inc, "must be greater than 1"));
        }
        if self.f_dec >= T::one() {
            return Err(invalid("f_dec", self.f_dec, "must lie in (0, 1)"));
        }
        if self.f_alpha >= T::one() {
            return Err(invalid("f_alpha", self.f_alpha, "must lie in (0, 1)"));
        }
        if self.dt > self.dt_max {
            return Err(invalid("dt", self.dt, "must not exceed dt_max"));
        }
        if self.alpha > self.alpha_start {
            return Err(invalid("alpha", self.alpha, "must not exceed alpha_start"));
        }

        Ok(())
    }
}

fn invalid<T: Scalar>(parameter: &str, value: T, reason: &str) -> OptimizerError {
    OptimizerError::invalid_configuration(reason, parameter, value.to_string())
}

/// Velocity of the fictitious dynamics.
///
/// `Unset` until the first step, which starts from rest without a power
/// check.
#[derive(Debug, Clone)]
enum Velocity<T: Scalar> {
    Unset,
    Tracking(DVector<T>),
}

/// FIRE optimizer.
///
/// Owns the coordinates, the potential and all adaptive state of one
/// relaxation. Independent relaxations share nothing and can run on
/// separate threads.
#[derive(Debug)]
pub struct Fire<T, P>
where
    T: Scalar,
    P: Potential<T>,
{
    config: FireConfig<T>,
    potential: P,
    position: DVector<T>,
    velocity: Velocity<T>,
    dt: T,
    alpha: T,
    n_steps: usize,
    total_steps: usize,
}

impl<T, P> Fire<T, P>
where
    T: Scalar,
    P: Potential<T>,
{
    /// Creates a FIRE optimizer starting from `x0`.
    ///
    /// Fails with `InvalidInput` if `x0` is empty and with
    /// `InvalidConfiguration` if `config` does not validate.
    pub fn new(x0: DVector<T>, potential: P, config: FireConfig<T>) -> OptimizerResult<Self> {
        if x0.is_empty() {
            return Err(OptimizerError::invalid_input(
                "initial coordinates must not be empty",
            ));
        }
        config.validate()?;

        Ok(Self {
            dt: config.dt,
            alpha: config.alpha,
            config,
            potential,
            position: x0,
            velocity: Velocity::Unset,
            n_steps: 0,
            total_steps: 0,
        })
    }

    /// Creates a FIRE optimizer with the default configuration.
    pub fn with_defaults(x0: DVector<T>, potential: P) -> OptimizerResult<Self> {
        Self::new(x0, potential, FireConfig::default())
    }

    /// Returns the optimizer configuration.
    pub fn config(&self) -> &FireConfig<T> {
        &self.config
    }

    /// Returns the potential being minimized.
    pub fn potential(&self) -> &P {
        &self.potential
    }

    /// Current coordinates.
    pub fn position(&self) -> &DVector<T> {
        &self.position
    }

    /// Consumes the optimizer and returns the coordinates.
    pub fn into_position(self) -> DVector<T> {
        self.position
    }

    /// Number of coordinates.
    pub fn dimension(&self) -> usize {
        self.position.len()
    }

    /// Current time step.
    pub fn dt(&self) -> T {
        self.dt
    }

    /// Current mixing factor.
    pub fn mixing(&self) -> T {
        self.alpha
    }

    /// Consecutive steps with positive power.
    pub fn good_steps(&self) -> usize {
        self.n_steps
    }

    /// Steps taken over the optimizer's lifetime, across runs.
    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    /// Norm of the velocity, or `None` before the first step.
    pub fn velocity_norm(&self) -> Option<T> {
        match &self.velocity {
            Velocity::Unset => None,
            Velocity::Tracking(v) => Some(v.norm()),
        }
    }

    /// Returns the optimizer name.
    pub fn name(&self) -> &str {
        "FIRE"
    }

    /// Discards the dynamics and restores the configured `dt` and `alpha`.
    ///
    /// The coordinates are kept, so a subsequent run continues from them.
    pub fn reset(&mut self) {
        self.velocity = Velocity::Unset;
        self.dt = self.config.dt;
        self.alpha = self.config.alpha;
        self.n_steps = 0;
    }

    /// Checks the RMS force criterion `‖f‖/√n < fmax`.
    pub fn converged(&self, forces: &DVector<T>, fmax: T) -> bool {
        rms_force(forces) < fmax
    }

    /// Advances the dynamics by one step under `force`.
    ///
    /// `force` is the negative gradient at the current position. A force of
    /// the wrong length is rejected with `InvalidInput`, and a step whose
    /// velocity or displacement would stop being finite with
    /// `NumericalError`. In both cases no state changes.
    pub fn step(&mut self, force: &DVector<T>) -> OptimizerResult<()> {
        let n = self.position.len();
        if force.len() != n {
            return Err(OptimizerError::dimension_mismatch("force", n, force.len()));
        }

        let cfg = &self.config;
        let (mut dt, mut alpha, mut n_steps) = (self.dt, self.alpha, self.n_steps);
        let mut velocity = match &self.velocity {
            Velocity::Unset => DVector::zeros(n),
            Velocity::Tracking(v) => {
                let power = v.dot(force);
                if power > T::zero() {
                    // P > 0 implies ‖f‖ > 0
                    let scale = alpha * stable_norm(v) / stable_norm(force);
                    let mixed = v * (T::one() - alpha) + force * scale;
                    if n_steps > cfg.n_min {
                        dt = <T as Float>::min(dt * cfg.f_inc, cfg.dt_max);
                        alpha = <T as Float>::max(
                            alpha * cfg.f_alpha,
                            <T as Float>::min_positive_value(),
                        );
                    }
                    n_steps += 1;
                    mixed
                } else {
                    log::debug!(
                        "FIRE velocity reset after {} aligned steps (power = {})",
                        n_steps,
                        power
                    );
                    alpha = cfg.alpha_start;
                    dt = <T as Float>::max(dt * cfg.f_dec, <T as Float>::min_positive_value());
                    n_steps = 0;
                    DVector::zeros(n)
                }
            }
        };

        // v ← v + dt·f
        velocity.axpy(dt, force, T::one());

        let mut displacement = &velocity * dt;
        self.clip_displacement(&mut displacement);

        if !(all_finite(&velocity) && all_finite(&displacement)) {
            return Err(OptimizerError::numerical_error(
                format!("FIRE step produced a non-finite velocity (dt = {dt})"),
                self.total_steps,
            ));
        }

        self.dt = dt;
        self.alpha = alpha;
        self.n_steps = n_steps;
        self.position += &displacement;
        self.velocity = Velocity::Tracking(velocity);
        self.total_steps += 1;
        Ok(())
    }

    /// Relaxes until the RMS force drops below `fmax` or `max_steps`
    /// energy/gradient evaluations have been spent.
    ///
    /// The run starts from rest. On convergence the returned point is the
    /// one the converged force was evaluated at. The reported energy is
    /// always that of the last evaluated position.
    pub fn run(&mut self, fmax: T, max_steps: usize) -> OptimizerResult<OptimizationResult<T>> {
        self.run_with_callback(fmax, max_steps, &mut NoOpCallback)
    }

    /// Same as [`Fire::run`], notifying `callback` along the way.
    ///
    /// The callback may stop the run after any step, which terminates with
    /// [`TerminationReason::UserTerminated`].
    pub fn run_with_callback<C>(
        &mut self,
        fmax: T,
        max_steps: usize,
        callback: &mut C,
    ) -> OptimizerResult<OptimizationResult<T>>
    where
        C: OptimizationCallback<T> + ?Sized,
    {
        if !(<T as Float>::is_finite(fmax) && fmax > T::zero()) {
            return Err(invalid("fmax", fmax, "must be positive and finite"));
        }
        if max_steps == 0 {
            return Err(OptimizerError::invalid_configuration(
                "must be at least 1",
                "max_steps",
                "0",
            ));
        }

        let start_time = Instant::now();
        self.reset();
        callback.on_optimization_start()?;
        log::debug!(
            "FIRE run started: n = {}, fmax = {}, max_steps = {}",
            self.position.len(),
            fmax,
            max_steps
        );

        let mut iterations = 0;
        let mut evaluations = 0;
        let (energy, rms, reason) = loop {
            let (energy, gradient) = self.evaluate(iterations)?;
            evaluations += 1;

            let force = -gradient;
            let rms = rms_force(&force);
            if self.converged(&force, fmax) {
                break (energy, rms, TerminationReason::Converged);
            }

            self.step(&force)?;
            iterations += 1;

            log::trace!(
                "FIRE step {}: energy = {}, rms force = {}, dt = {}, alpha = {}",
                iterations,
                energy,
                rms,
                self.dt,
                self.alpha
            );

            let info = IterationInfo {
                iteration: iterations,
                energy,
                rms_force: rms,
                dt: self.dt,
                mixing: self.alpha,
                good_steps: self.n_steps,
            };
            if !callback.on_iteration_end(&info)? {
                break (energy, rms, TerminationReason::UserTerminated);
            }

            if iterations >= max_steps {
                break (energy, rms, TerminationReason::MaxIterations);
            }
        };

        let result = OptimizationResult::new(
            self.position.clone(),
            energy,
            iterations,
            start_time.elapsed(),
            reason,
        )
        .with_rms_force(rms)
        .with_function_evaluations(evaluations);

        log::debug!(
            "FIRE run finished: {:?} after {} steps, energy = {}, rms force = {}",
            reason,
            iterations,
            energy,
            rms
        );
        callback.on_optimization_end(&result)?;

        Ok(result)
    }

    /// Queries the potential at the current position and checks its output.
    fn evaluate(&self, iteration: usize) -> OptimizerResult<(T, DVector<T>)> {
        let (energy, gradient) = self.potential.energy_gradient(&self.position)?;

        if gradient.len() != self.position.len() {
            return Err(OptimizerError::dimension_mismatch(
                "gradient",
                self.position.len(),
                gradient.len(),
            ));
        }
        if !<T as Float>::is_finite(energy) {
            return Err(OptimizerError::numerical_error(
                format!("potential returned non-finite energy {energy}"),
                iteration,
            ));
        }
        if !all_finite(&gradient) {
            return Err(OptimizerError::numerical_error(
                "potential returned a non-finite gradient component",
                iteration,
            ));
        }

        Ok((energy, gradient))
    }

    /// Rescales `dr` so that its measure does not exceed `max_move`.
    fn clip_displacement(&self, dr: &mut DVector<T>) {
        let size = self.config.step_norm.measure(dr);
        if size > self.config.max_move {
            dr.scale_mut(self.config.max_move / size);
        }
    }
}

impl<T, P> Optimizer<T> for Fire<T, P>
where
    T: Scalar,
    P: Potential<T>,
{
    fn name(&self) -> &str {
        "FIRE"
    }

    fn position(&self) -> &DVector<T> {
        &self.position
    }

    fn run(&mut self, fmax: T, max_steps: usize) -> OptimizerResult<OptimizationResult<T>> {
        Fire::run(self, fmax, max_steps)
    }
}
