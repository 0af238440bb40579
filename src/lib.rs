pub mod config;
pub mod engine;
pub mod errors;
pub mod models;
pub mod report;
pub mod snapshot;
