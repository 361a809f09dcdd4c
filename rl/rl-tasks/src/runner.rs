//! PPO runner configuration records.
//!
//! Flat, immutable hyperparameter records consumed verbatim by the
//! external training loop. No field is derived from another; `validate`
//! only checks ranges.

use serde::{Deserialize, Serialize};

use crate::error::TaskError;
use crate::Result;

/// Network activation function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Activation {
    /// Exponential linear unit.
    #[default]
    Elu,
    /// Rectified linear unit.
    Relu,
    /// Hyperbolic tangent.
    Tanh,
}

/// How the policy's exploration noise std is parameterized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum NoiseStdType {
    /// Direct scalar parameter.
    #[default]
    Scalar,
    /// Log-space parameter, exponentiated at sample time.
    Log,
}

/// One policy or value network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Hidden layer widths.
    pub hidden_dims: Vec<usize>,

    /// Activation between layers.
    pub activation: Activation,

    /// Normalize observations with running statistics.
    pub obs_normalization: bool,

    /// Sample actions from a distribution (actor) or output values
    /// deterministically (critic).
    pub stochastic: bool,

    /// Initial exploration noise std.
    pub init_noise_std: f64,

    /// Noise std parameterization.
    pub noise_std_type: NoiseStdType,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            hidden_dims: vec![512, 256, 128],
            activation: Activation::Elu,
            obs_normalization: false,
            stochastic: false,
            init_noise_std: 1.0,
            noise_std_type: NoiseStdType::Scalar,
        }
    }
}

impl PolicyConfig {
    /// A stochastic actor network.
    #[must_use]
    pub fn actor() -> Self {
        Self {
            stochastic: true,
            ..Self::default()
        }
    }

    /// A deterministic critic network.
    #[must_use]
    pub fn critic() -> Self {
        Self::default()
    }

    /// Enable observation normalization.
    #[must_use]
    pub fn with_obs_normalization(mut self, enable: bool) -> Self {
        self.obs_normalization = enable;
        self
    }

    /// Set the noise std parameterization.
    #[must_use]
    pub fn with_noise_std_type(mut self, noise_std_type: NoiseStdType) -> Self {
        self.noise_std_type = noise_std_type;
        self
    }

    fn check(&self, experiment: &str) -> Result<()> {
        if self.hidden_dims.is_empty() || self.hidden_dims.contains(&0) {
            return Err(TaskError::invalid_runner(
                experiment,
                "hidden_dims must be non-empty and positive",
            ));
        }
        if self.init_noise_std <= 0.0 {
            return Err(TaskError::invalid_runner(
                experiment,
                "init_noise_std must be positive",
            ));
        }
        Ok(())
    }
}

/// Learning-rate schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum LrSchedule {
    /// Constant learning rate.
    Fixed,
    /// Adjust the rate to hold the KL divergence near `desired_kl`.
    #[default]
    Adaptive,
}

/// PPO algorithm hyperparameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PpoConfig {
    /// Value loss coefficient.
    pub value_loss_coef: f64,

    /// Clip the value loss like the surrogate objective.
    pub use_clipped_value_loss: bool,

    /// Surrogate clipping parameter.
    pub clip_param: f64,

    /// Entropy bonus coefficient.
    pub entropy_coef: f64,

    /// Optimization epochs per rollout.
    pub num_learning_epochs: usize,

    /// Minibatches per epoch.
    pub num_mini_batches: usize,

    /// Base learning rate.
    pub learning_rate: f64,

    /// Learning-rate schedule.
    pub schedule: LrSchedule,

    /// Discount factor.
    pub gamma: f64,

    /// GAE lambda.
    pub lam: f64,

    /// KL target for the adaptive schedule.
    pub desired_kl: f64,

    /// Gradient clipping norm.
    pub max_grad_norm: f64,
}

impl Default for PpoConfig {
    fn default() -> Self {
        Self {
            value_loss_coef: 1.0,
            use_clipped_value_loss: true,
            clip_param: 0.2,
            entropy_coef: 0.01,
            num_learning_epochs: 5,
            num_mini_batches: 4,
            learning_rate: 1.0e-3,
            schedule: LrSchedule::Adaptive,
            gamma: 0.99,
            lam: 0.95,
            desired_kl: 0.01,
            max_grad_norm: 1.0,
        }
    }
}

impl PpoConfig {
    /// Set the base learning rate.
    #[must_use]
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    fn check(&self, experiment: &str) -> Result<()> {
        if self.learning_rate <= 0.0 {
            return Err(TaskError::invalid_runner(
                experiment,
                "learning_rate must be positive",
            ));
        }
        if !(0.0..1.0).contains(&self.clip_param) || self.clip_param == 0.0 {
            return Err(TaskError::invalid_runner(
                experiment,
                "clip_param must be in (0, 1)",
            ));
        }
        if !(0.0..=1.0).contains(&self.gamma) || !(0.0..=1.0).contains(&self.lam) {
            return Err(TaskError::invalid_runner(
                experiment,
                "gamma and lam must be in [0, 1]",
            ));
        }
        if self.num_learning_epochs == 0 || self.num_mini_batches == 0 {
            return Err(TaskError::invalid_runner(
                experiment,
                "epochs and minibatches must be > 0",
            ));
        }
        Ok(())
    }
}

/// A complete on-policy runner configuration.
///
/// # Example
///
/// ```
/// use rl_tasks::RunnerConfig;
///
/// let runner = RunnerConfig::new("quadruped_getup");
/// assert!(runner.validate().is_ok());
/// assert_eq!(runner.num_steps_per_env, 24);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Experiment name, used for checkpoints and logs.
    pub experiment_name: String,

    /// Actor network.
    pub actor: PolicyConfig,

    /// Critic network.
    pub critic: PolicyConfig,

    /// PPO hyperparameters.
    pub algorithm: PpoConfig,

    /// Iterations between checkpoint saves.
    pub save_interval: usize,

    /// Rollout length per environment instance.
    pub num_steps_per_env: usize,

    /// Total training iterations.
    pub max_iterations: usize,
}

impl RunnerConfig {
    /// Create a runner with default networks and algorithm.
    #[must_use]
    pub fn new(experiment_name: impl Into<String>) -> Self {
        Self {
            experiment_name: experiment_name.into(),
            actor: PolicyConfig::actor(),
            critic: PolicyConfig::critic(),
            algorithm: PpoConfig::default(),
            save_interval: 50,
            num_steps_per_env: 24,
            max_iterations: 10_000,
        }
    }

    /// Set the checkpoint save interval.
    #[must_use]
    pub fn with_save_interval(mut self, save_interval: usize) -> Self {
        self.save_interval = save_interval;
        self
    }

    /// Set the PPO hyperparameters.
    #[must_use]
    pub fn with_algorithm(mut self, algorithm: PpoConfig) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Set the actor network.
    #[must_use]
    pub fn with_actor(mut self, actor: PolicyConfig) -> Self {
        self.actor = actor;
        self
    }

    /// Set the critic network.
    #[must_use]
    pub fn with_critic(mut self, critic: PolicyConfig) -> Self {
        self.critic = critic;
        self
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::InvalidRunner`] naming the first violation.
    pub fn validate(&self) -> Result<()> {
        if self.experiment_name.is_empty() {
            return Err(TaskError::invalid_runner(
                "<unnamed>",
                "experiment name must not be empty",
            ));
        }
        self.actor.check(&self.experiment_name)?;
        self.critic.check(&self.experiment_name)?;
        self.algorithm.check(&self.experiment_name)?;
        if self.save_interval == 0 || self.num_steps_per_env == 0 || self.max_iterations == 0 {
            return Err(TaskError::invalid_runner(
                &self.experiment_name,
                "intervals and iteration counts must be > 0",
            ));
        }
        Ok(())
    }
}

/// Runner configuration for the getup task.
#[must_use]
pub fn getup_runner_config() -> RunnerConfig {
    RunnerConfig::new("quadruped_getup")
        .with_actor(
            PolicyConfig::actor()
                .with_obs_normalization(true)
                .with_noise_std_type(NoiseStdType::Log),
        )
        .with_critic(PolicyConfig::critic().with_obs_normalization(true))
        .with_algorithm(PpoConfig::default().with_learning_rate(3.0e-4))
        .with_save_interval(100)
}

/// Runner configuration for the velocity tasks.
#[must_use]
pub fn velocity_runner_config() -> RunnerConfig {
    RunnerConfig::new("quadruped_velocity")
        .with_algorithm(PpoConfig::default().with_learning_rate(1.0e-3))
        .with_save_interval(50)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_getup_runner() {
        let runner = getup_runner_config();
        runner.validate().unwrap();

        assert_eq!(runner.experiment_name, "quadruped_getup");
        assert_eq!(runner.actor.hidden_dims, vec![512, 256, 128]);
        assert!(runner.actor.stochastic);
        assert!(!runner.critic.stochastic);
        assert!(runner.actor.obs_normalization);
        assert_eq!(runner.actor.noise_std_type, NoiseStdType::Log);
        assert_eq!(runner.algorithm.learning_rate, 3.0e-4);
        assert_eq!(runner.save_interval, 100);
        assert_eq!(runner.max_iterations, 10_000);
    }

    #[test]
    fn test_velocity_runner() {
        let runner = velocity_runner_config();
        runner.validate().unwrap();

        assert!(!runner.actor.obs_normalization);
        assert_eq!(runner.actor.noise_std_type, NoiseStdType::Scalar);
        assert_eq!(runner.algorithm.learning_rate, 1.0e-3);
        assert_eq!(runner.save_interval, 50);
        assert_eq!(runner.num_steps_per_env, 24);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut runner = getup_runner_config();
        runner.algorithm.learning_rate = 0.0;
        assert!(runner.validate().is_err());

        let mut runner = getup_runner_config();
        runner.actor.hidden_dims.clear();
        assert!(runner.validate().is_err());

        let mut runner = getup_runner_config();
        runner.max_iterations = 0;
        assert!(runner.validate().is_err());
    }

    #[test]
    fn test_serde_roundtrip() {
        let runner = velocity_runner_config();
        let json = serde_json::to_string(&runner).unwrap();
        let back: RunnerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, runner);
    }
}
