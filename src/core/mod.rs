pub mod alerts;
pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod scheduler;

#[cfg(test)]
mod scenario_test;
