pub mod config;
pub mod distribute;
pub mod enumerate;
pub mod progress;
pub mod requirement;
pub mod rng;
pub mod simulation;
pub mod sweep;
pub mod table;

#[cfg(test)]
mod integration_tests;
