// Domain layer - Core models and pure chart math
pub mod aggregate;
pub mod buffer;
pub mod chart;
pub mod metrics;
pub mod sample;
pub mod table;
pub mod viewport;
