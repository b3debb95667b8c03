//! Per-tick orchestration
//!
//! Order is fixed: diffusion, render, effects. Effects run last so a stone
//! they drop becomes visible on the next tick.

use super::state::WaveState;

/// Advance the simulation by one step.
///
/// Presentation is left to the host: check `consume_present_flag` (or
/// `present`) afterwards.
pub fn tick(state: &mut WaveState) {
    if !state.is_ready() {
        return;
    }
    state.spread();
    state.render();
    state.generate_effect();
}
