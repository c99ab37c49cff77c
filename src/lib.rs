//! vizlearn
//!
//! Generated 3D lessons: a REST server that asks a generative model for
//! lesson scripts, and a headless client that plays them step by step.

pub mod headless;
pub mod serve;

// Re-export main entry points
pub use headless::runner::run_headless;
pub use serve::run_serve;
