//! Emberline Application
//!
//! The application shell: windowing, pointer input, and frame scheduling
//! for the ink annotation surface.

mod app;

pub use app::{App, AppConfig};
