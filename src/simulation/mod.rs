//! Scenario generation for benches, demos and stress testing.

pub mod generator;
