//! Simulation object and the operations a host may call on it
//!
//! A `WaveState` owns both energy steps, the source image and the rendered
//! frame. Every call other than `init` is cosmetic: on an uninitialized or
//! torn-down object it quietly does nothing.

use glam::IVec2;

use super::effect::{Effect, EffectKind};
use super::energy::{EnergyField, Stencil};
use super::frame::PixelFrame;
use super::refract::refract;
use super::rng::WaveRng;
use super::stone::Stone;
use crate::consts::MIN_DIMENSION;
use crate::error::InitError;
use crate::platform;
use crate::settings::Settings;

/// Where an object is in its life
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Never initialized (`WaveState::default()`)
    Uninitialized,
    /// Ready, nothing moving; diffusion and rendering are skipped
    Idle,
    /// Ready and stepping
    Rippling,
    /// Buffers released
    TornDown,
}

/// Buffers owned by a ready object
#[derive(Debug, Clone)]
struct Surfaces {
    energy: EnergyField,
    source: PixelFrame,
    render: PixelFrame,
}

/// Complete simulation state
#[derive(Debug, Clone, Default)]
pub struct WaveState {
    surfaces: Option<Surfaces>,
    torn_down: bool,
    stencil: Stencil,
    rng: WaveRng,
    /// Grid still has displacement and must keep stepping
    active: bool,
    /// A rendered frame awaits presentation
    needs_present: bool,
    /// Enabled effect (`None` = effects off)
    effect: Option<Effect>,
}

impl WaveState {
    /// Create a ready object from padded BGR source bytes.
    pub fn init(
        width: u32,
        height: u32,
        source: &[u8],
        stencil: Stencil,
        seed: u32,
    ) -> Result<Self, InitError> {
        check_dimensions(width, height)?;
        let source = PixelFrame::from_padded(width as usize, height as usize, source)?;
        Self::from_frame(source, stencil, seed)
    }

    /// Create a ready object that takes ownership of `source`.
    ///
    /// The render buffer starts as a copy of the source and is flagged for
    /// presentation, so the host shows the still image once at start-up.
    pub fn from_frame(source: PixelFrame, stencil: Stencil, seed: u32) -> Result<Self, InitError> {
        check_dimensions(source.width() as u32, source.height() as u32)?;
        let energy = EnergyField::new(source.width(), source.height())?;
        let mut render = PixelFrame::new(source.width(), source.height())?;
        render.as_bytes_mut().copy_from_slice(source.as_bytes());

        log::info!(
            "Wave object ready: {}x{}, {} stencil, seed {}",
            source.width(),
            source.height(),
            stencil.as_str(),
            seed
        );

        Ok(Self {
            surfaces: Some(Surfaces {
                energy,
                source,
                render,
            }),
            torn_down: false,
            stencil,
            rng: WaveRng::new(seed),
            active: false,
            needs_present: true,
            effect: None,
        })
    }

    /// Create from settings: stencil, seed (time-derived when unset) and the
    /// initial effect.
    pub fn with_settings(source: PixelFrame, settings: &Settings) -> Result<Self, InitError> {
        let seed = settings.seed.unwrap_or_else(platform::clock_seed);
        let mut state = Self::from_frame(source, settings.stencil, seed)?;
        let (kind, p1, p2, p3) = settings.effect.params();
        state.set_effect_kind(kind, p1, p2, p3);
        Ok(state)
    }

    pub fn lifecycle(&self) -> Lifecycle {
        match (&self.surfaces, self.torn_down) {
            (_, true) => Lifecycle::TornDown,
            (None, false) => Lifecycle::Uninitialized,
            (Some(_), false) if self.active => Lifecycle::Rippling,
            (Some(_), false) => Lifecycle::Idle,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.surfaces.is_some()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn needs_present(&self) -> bool {
        self.needs_present
    }

    pub fn stencil(&self) -> Stencil {
        self.stencil
    }

    pub fn effect(&self) -> Option<&Effect> {
        self.effect.as_ref()
    }

    pub fn rng(&self) -> &WaveRng {
        &self.rng
    }

    /// Grid size in cells (0x0 when not ready)
    pub fn size(&self) -> (usize, usize) {
        self.surfaces
            .as_ref()
            .map_or((0, 0), |s| (s.energy.width(), s.energy.height()))
    }

    pub fn energy(&self) -> Option<&EnergyField> {
        self.surfaces.as_ref().map(|s| &s.energy)
    }

    pub fn source(&self) -> Option<&PixelFrame> {
        self.surfaces.as_ref().map(|s| &s.source)
    }

    /// Most recently rendered frame
    pub fn frame(&self) -> Option<&PixelFrame> {
        self.surfaces.as_ref().map(|s| &s.render)
    }

    /// Drop a stone at (x, y). Returns true when it landed.
    ///
    /// A stone whose bounding box reaches the outer ring is ignored entirely
    /// and does not wake the simulation.
    pub fn drop_stone(&mut self, x: i32, y: i32, size: u32, weight: i32) -> bool {
        let Some(surfaces) = self.surfaces.as_mut() else {
            return false;
        };
        let landed = surfaces
            .energy
            .drop_stone(&Stone::new(x, y, size, weight), self.stencil);
        if landed {
            self.active = true;
        } else {
            log::trace!("Stone at ({x}, {y}) size {size} rejected");
        }
        landed
    }

    /// Select an effect by numeric code: 0 off, 1 rain, 2 boat, 3 wind.
    /// Unknown codes are ignored.
    pub fn set_effect(&mut self, code: u32, p1: u32, p2: u32, p3: u32) {
        match EffectKind::from_code(code) {
            Some(kind) => self.set_effect_kind(kind, p1, p2, p3),
            None => log::warn!("Ignoring unknown effect type {code}"),
        }
    }

    /// Select an effect. Enabling the boat places it at a random interior
    /// point with its parity counter reset.
    pub fn set_effect_kind(&mut self, kind: EffectKind, p1: u32, p2: u32, p3: u32) {
        if !self.is_ready() {
            return;
        }
        let (width, height) = self.size();
        let bounds = IVec2::new(width as i32, height as i32);
        self.effect = Effect::from_params(kind, p1, p2, p3, bounds, &mut self.rng);
        log::info!("Effect set to {kind:?} ({p1}, {p2}, {p3})");
    }

    /// Diffusion stage of a tick; skipped while idle
    pub fn spread(&mut self) {
        if !self.active {
            return;
        }
        if let Some(surfaces) = self.surfaces.as_mut() {
            surfaces.energy.spread(self.stencil);
        }
    }

    /// Render stage of a tick; skipped while idle.
    ///
    /// Flags the frame for presentation and goes idle when nothing moved.
    pub fn render(&mut self) {
        if !self.active {
            return;
        }
        let Some(surfaces) = self.surfaces.as_mut() else {
            return;
        };
        self.needs_present = true;
        let moved = refract(&surfaces.source, &surfaces.energy, &mut surfaces.render);
        if !moved {
            self.active = false;
            log::debug!("Ripples settled, going idle");
        }
    }

    /// Effect stage of a tick
    pub fn generate_effect(&mut self) {
        let Some(surfaces) = self.surfaces.as_mut() else {
            return;
        };
        let Some(effect) = self.effect.as_mut() else {
            return;
        };
        if effect.generate(&mut surfaces.energy, self.stencil, &mut self.rng) {
            self.active = true;
        }
    }

    /// Return and clear the presentation flag
    pub fn consume_present_flag(&mut self) -> bool {
        std::mem::take(&mut self.needs_present)
    }

    /// Frame to show, if one is due (or `force` is set); clears the flag.
    pub fn present(&mut self, force: bool) -> Option<&PixelFrame> {
        let due = self.consume_present_flag() || force;
        if due { self.frame() } else { None }
    }

    /// Release every buffer. Later calls on this object are no-ops.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        if self.surfaces.take().is_some() {
            log::info!("Wave object released");
        }
        *self = Self {
            torn_down: true,
            ..Self::default()
        };
    }

    #[cfg(test)]
    pub(crate) fn energy_mut(&mut self) -> Option<&mut EnergyField> {
        self.surfaces.as_mut().map(|s| &mut s.energy)
    }

    #[cfg(test)]
    pub(crate) fn force_active(&mut self) {
        self.active = true;
    }
}

fn check_dimensions(width: u32, height: u32) -> Result<(), InitError> {
    if width < MIN_DIMENSION || height < MIN_DIMENSION {
        return Err(InitError::InvalidDimensions { width, height });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::frame::row_bytes;

    fn gray(width: usize, height: usize) -> PixelFrame {
        PixelFrame::from_fn(width, height, |_, _| [128, 128, 128]).unwrap()
    }

    #[test]
    fn test_init_rejects_small_dimensions() {
        let bytes = vec![0u8; 64];
        assert!(matches!(
            WaveState::init(3, 10, &bytes, Stencil::Circular, 1),
            Err(InitError::InvalidDimensions { width: 3, height: 10 })
        ));
        assert!(matches!(
            WaveState::init(10, 3, &bytes, Stencil::Circular, 1),
            Err(InitError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_init_rejects_short_source() {
        let bytes = vec![0u8; row_bytes(4) * 4 - 1];
        assert!(matches!(
            WaveState::init(4, 4, &bytes, Stencil::Circular, 1),
            Err(InitError::SourceImage(_))
        ));
    }

    #[test]
    fn test_init_is_idle_with_initial_frame() {
        let bytes = vec![9u8; row_bytes(4) * 4];
        let mut state = WaveState::init(4, 4, &bytes, Stencil::Elliptical, 1).unwrap();
        assert_eq!(state.lifecycle(), Lifecycle::Idle);
        assert_eq!(state.stencil(), Stencil::Elliptical);
        assert_eq!(state.frame().unwrap().as_bytes(), &bytes[..]);
        assert!(state.consume_present_flag());
        assert!(!state.consume_present_flag());
    }

    #[test]
    fn test_uninitialized_calls_are_noops() {
        let mut state = WaveState::default();
        assert_eq!(state.lifecycle(), Lifecycle::Uninitialized);
        assert!(!state.drop_stone(5, 5, 1, 100));
        state.set_effect(1, 0, 1, 1);
        state.spread();
        state.render();
        state.generate_effect();
        assert!(state.effect().is_none());
        assert!(!state.is_active());
        assert!(!state.consume_present_flag());
        assert!(state.present(true).is_none());
    }

    #[test]
    fn test_stone_wakes_and_idle_render_sleeps() {
        let mut state = WaveState::from_frame(gray(8, 8), Stencil::Circular, 1).unwrap();
        assert!(state.drop_stone(4, 4, 0, 100));
        assert_eq!(state.lifecycle(), Lifecycle::Rippling);

        state.energy_mut().unwrap().set(4, 4, 0);
        state.render();
        assert_eq!(state.lifecycle(), Lifecycle::Idle);
    }

    #[test]
    fn test_rejected_stone_does_not_wake() {
        let mut state = WaveState::from_frame(gray(8, 8), Stencil::Circular, 1).unwrap();
        assert!(!state.drop_stone(1, 1, 2, 100));
        assert!(!state.is_active());
        assert!(state.energy().unwrap().is_flat());
    }

    #[test]
    fn test_zero_energy_render_is_identity() {
        let source = PixelFrame::from_fn(9, 7, |x, y| [x as u8 * 9, y as u8 * 5, 3]).unwrap();
        let mut state = WaveState::from_frame(source.clone(), Stencil::Circular, 1).unwrap();
        state.consume_present_flag();
        state.force_active();

        state.render();
        assert_eq!(state.frame(), Some(&source));
        assert!(state.needs_present());
        assert!(!state.is_active());
    }

    #[test]
    fn test_set_effect_codes() {
        let mut state = WaveState::from_frame(gray(20, 20), Stencil::Circular, 5).unwrap();
        state.set_effect(2, 4, 2, 400);
        let Some(Effect::Boat(boat)) = state.effect().copied() else {
            panic!("boat expected");
        };
        assert_eq!(boat.vel, IVec2::new(4, 4));
        assert_eq!(boat.flip, 0);
        assert!((1..=18).contains(&boat.pos.x) && (1..=18).contains(&boat.pos.y));

        state.set_effect(9, 1, 1, 1);
        assert_eq!(state.effect().map(|e| e.kind()), Some(EffectKind::Boat));

        state.set_effect(0, 0, 0, 0);
        assert!(state.effect().is_none());
    }

    #[test]
    fn test_present_force() {
        let mut state = WaveState::from_frame(gray(6, 6), Stencil::Circular, 1).unwrap();
        assert!(state.present(false).is_some());
        assert!(state.present(false).is_none());
        assert!(state.present(true).is_some());
    }

    #[test]
    fn test_teardown_releases_and_silences() {
        let mut state = WaveState::from_frame(gray(8, 8), Stencil::Elliptical, 1).unwrap();
        state.set_effect(3, 5, 2, 7);
        state.drop_stone(4, 4, 1, 50);
        state.teardown();

        assert_eq!(state.lifecycle(), Lifecycle::TornDown);
        assert_eq!(state.size(), (0, 0));
        assert!(state.frame().is_none());
        assert!(state.effect().is_none());
        assert!(!state.drop_stone(4, 4, 1, 50));
        assert!(!state.consume_present_flag());

        state.teardown();
        assert_eq!(state.lifecycle(), Lifecycle::TornDown);
    }
}
