// Module declarations
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod parsers;
pub mod prompts;
pub mod providers;
pub mod render;

// Server module (HTTP API)
pub mod server;
