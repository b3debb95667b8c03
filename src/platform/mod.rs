//! Platform abstraction layer
//!
//! Handles browser/native differences for the time-derived RNG seed.

/// Seed derived from the wall clock, in milliseconds truncated to 32 bits
#[cfg(not(target_arch = "wasm32"))]
pub fn clock_seed() -> u32 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u32)
        .unwrap_or(0)
}

/// Seed derived from `Date.now()`, truncated to 32 bits
#[cfg(target_arch = "wasm32")]
pub fn clock_seed() -> u32 {
    js_sys::Date::now() as u64 as u32
}
