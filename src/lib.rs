//! Water Ripple - refraction ripples over a still image
//!
//! Core modules:
//! - `sim`: Deterministic ripple kernel (energy grid, refraction, weather)
//! - `renderer`: Presentation helpers (RGBA conversion, PPM, browser canvas)
//! - `platform`: Native/browser differences (clock seed)
//! - `settings`: Host configuration

pub mod error;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::{InitError, PpmError, SettingsError};
pub use settings::{EffectPreset, Settings};
pub use sim::{Lifecycle, PixelFrame, Stencil, WaveState, tick};

/// Host configuration constants
pub mod consts {
    /// Smallest accepted grid dimension (the kernel needs an interior)
    pub const MIN_DIMENSION: u32 = 4;
    /// Default host tick interval in milliseconds
    pub const DEFAULT_TICK_MS: u32 = 30;
    /// Maximum ticks a frame-driven host runs to catch up
    pub const MAX_SUBSTEPS: u32 = 4;
}
