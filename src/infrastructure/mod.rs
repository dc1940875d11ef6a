// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod generator;
pub mod json_lines;
pub mod memory;
pub mod surface;
