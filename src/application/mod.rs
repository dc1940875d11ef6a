// Application layer - Services and shared state
pub mod render_service;
pub mod sample_source;
pub mod state;
pub mod stream_service;
pub mod view_service;
