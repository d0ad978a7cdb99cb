use std::fs;
use std::path::Path;

use chordwalk_core::errors::ErrorInfo;
use chordwalk_core::{RngHandle, SamplerError};
use serde::{Deserialize, Serialize};

use crate::determinism;

/// YAML-configurable parameters governing a sampling chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplerConfig {
    /// Walk used to move the chain.
    #[serde(default)]
    pub walk: WalkKind,
    /// Number of walk steps between two emitted samples.
    #[serde(default = "default_walk_len")]
    pub walk_len: usize,
    /// Numerical knobs of the billiard walk.
    #[serde(default)]
    pub billiard: BilliardTuning,
    /// Master seed and stream selection.
    #[serde(default)]
    pub seed_policy: SeedPolicy,
}

fn default_walk_len() -> usize {
    1
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            walk: WalkKind::default(),
            walk_len: default_walk_len(),
            billiard: BilliardTuning::default(),
            seed_policy: SeedPolicy::default(),
        }
    }
}

impl SamplerConfig {
    /// Parses a configuration from YAML and validates it.
    pub fn from_yaml_str(contents: &str) -> Result<Self, SamplerError> {
        let config: SamplerConfig = serde_yaml::from_str(contents).map_err(|err| {
            SamplerError::Serde(ErrorInfo::new("config-parse", err.to_string()))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a YAML configuration file.
    pub fn load(path: &Path) -> Result<Self, SamplerError> {
        let contents = fs::read_to_string(path).map_err(|err| {
            SamplerError::Serde(
                ErrorInfo::new("config-read", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        Self::from_yaml_str(&contents).map_err(|err| match err {
            SamplerError::Serde(info) => {
                SamplerError::Serde(info.with_context("path", path.display().to_string()))
            }
            other => other,
        })
    }

    /// Checks value ranges the walks rely on.
    pub fn validate(&self) -> Result<(), SamplerError> {
        if self.walk_len == 0 {
            return Err(invalid("walk_len", "0", "walk_len must be at least 1"));
        }
        match self.walk {
            WalkKind::Ball { delta } if !(delta >= 0.0 && delta.is_finite()) => {
                return Err(invalid(
                    "delta",
                    &delta.to_string(),
                    "ball walk radius must be finite and non-negative",
                ));
            }
            WalkKind::Billiard { diameter } if !(diameter > 0.0 && diameter.is_finite()) => {
                return Err(invalid(
                    "diameter",
                    &diameter.to_string(),
                    "billiard travel budget must be finite and positive",
                ));
            }
            _ => {}
        }
        self.billiard.validate()
    }

    /// Builds the generator for this chain from the seed policy.
    pub fn rng(&self) -> RngHandle {
        RngHandle::from_seed(determinism::chain_seed(
            self.seed_policy.master_seed,
            self.seed_policy.stream,
        ))
    }
}

fn invalid(field: &str, value: &str, message: &str) -> SamplerError {
    SamplerError::Config(
        ErrorInfo::new("invalid-parameter", message)
            .with_context("field", field)
            .with_context("value", value),
    )
}

/// Supported walk flavours.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum WalkKind {
    /// Ball walk with proposals uniform in a ball of radius `delta`.
    Ball {
        /// Proposal radius.
        delta: f64,
    },
    /// Hit-and-run along random coordinate axes with cached slacks.
    CoordinateHitAndRun,
    /// Hit-and-run along isotropic random directions.
    #[default]
    HitAndRun,
    /// Billiard walk with total path length drawn from `[0, diameter)`.
    Billiard {
        /// Travel budget, typically a bound on the body's diameter.
        diameter: f64,
    },
}

/// Numerical parameters of the billiard walk.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BilliardTuning {
    /// Fraction of the distance to a facet actually travelled before reflecting.
    #[serde(default = "default_safety_margin")]
    pub safety_margin: f64,
    /// Reflections allowed per call, as a multiple of the dimension.
    #[serde(default = "default_reflection_factor")]
    pub reflection_factor: usize,
}

fn default_safety_margin() -> f64 {
    0.995
}

fn default_reflection_factor() -> usize {
    3
}

impl Default for BilliardTuning {
    fn default() -> Self {
        Self {
            safety_margin: default_safety_margin(),
            reflection_factor: default_reflection_factor(),
        }
    }
}

impl BilliardTuning {
    /// Checks that the margin lies in `(0, 1)` and at least one reflection is allowed.
    pub fn validate(&self) -> Result<(), SamplerError> {
        if !(self.safety_margin > 0.0 && self.safety_margin < 1.0) {
            return Err(invalid(
                "safety_margin",
                &self.safety_margin.to_string(),
                "billiard safety margin must lie strictly between 0 and 1",
            ));
        }
        if self.reflection_factor == 0 {
            return Err(invalid(
                "reflection_factor",
                "0",
                "billiard walk needs at least one reflection per dimension",
            ));
        }
        Ok(())
    }
}

/// Deterministic seeding configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedPolicy {
    /// Master seed shared by every chain of an experiment.
    #[serde(default = "default_master_seed")]
    pub master_seed: u64,
    /// Index of this chain's substream.
    #[serde(default)]
    pub stream: u64,
}

fn default_master_seed() -> u64 {
    0x05EE_D5EE_DD15_5EED_u64
}

impl Default for SeedPolicy {
    fn default() -> Self {
        Self {
            master_seed: default_master_seed(),
            stream: 0,
        }
    }
}
