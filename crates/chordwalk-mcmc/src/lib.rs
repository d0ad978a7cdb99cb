#![deny(missing_docs)]

//! Markov-chain samplers for convex bodies: hit-and-run (random, coordinate
//! and Boltzmann-biased directions), the ball walk and the billiard walk,
//! plus the drivers that turn walk steps into sample sequences.

/// Sampler configuration schema and defaults.
pub mod config;
/// Seed derivation for independent chains.
pub mod determinism;
/// Isotropic and anisotropic direction draws.
pub mod direction;
/// Sample-sequence drivers for polytopes, spectrahedra and nested bodies.
pub mod driver;
/// Per-chain walk state carried between steps.
pub mod state;
/// Counters collected while a chain runs.
pub mod stats;
/// Ball walk.
pub mod walk_ball;
/// Billiard walk with specular reflections.
pub mod walk_billiard;
/// Hit-and-run biased by a Boltzmann potential.
pub mod walk_boltzmann;
/// Coordinate-direction hit-and-run.
pub mod walk_coord;
/// Random-direction hit-and-run.
pub mod walk_hnr;

pub use config::{BilliardTuning, SamplerConfig, SeedPolicy, WalkKind};
pub use driver::{
    boltzmann_walk, sample_boltzmann, sample_nested, sample_polytope, sample_spectrahedron,
    sample_spectrahedron_constrained, SampleRun,
};
pub use state::{BilliardPhase, BilliardState, CoordinateState, WalkState};
pub use stats::WalkStats;
pub use walk_billiard::{BilliardParams, BilliardReport};
pub use walk_boltzmann::BoltzmannTarget;
