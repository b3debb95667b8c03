//! Ripple simulation kernel
//!
//! Everything that shapes the water lives here. This module is pure and
//! deterministic:
//! - Stepped only by the host calling `tick`
//! - Seeded RNG only
//! - No windowing, timer or display dependencies

pub mod effect;
pub mod energy;
pub mod frame;
pub mod refract;
pub mod rng;
pub mod state;
pub mod stone;
pub mod tick;

pub use effect::{Boat, Effect, EffectKind, RAIN_BASE_WEIGHT};
pub use energy::{DAMPING_SHIFT, EnergyField, Stencil};
pub use frame::{BYTES_PER_PIXEL, PixelFrame, row_bytes};
pub use refract::refract;
pub use rng::WaveRng;
pub use state::{Lifecycle, WaveState};
pub use stone::{Footprint, Stone};
pub use tick::tick;
