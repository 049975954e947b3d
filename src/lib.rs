pub mod config;
pub mod constants;
pub mod dataset;
pub mod error;
pub mod extract;
pub mod logging;
pub mod orchestrator;
pub mod resolver;
pub mod types;

// Port definitions and their concrete adapters
pub mod app;
pub mod infra;
