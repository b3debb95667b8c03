//! Procedural weather: rain, a motorboat and wind-driven waves
//!
//! Generators run once per tick after rendering, so whatever they drop shows
//! up on the following tick.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::energy::{EnergyField, Stencil};
use super::rng::WaveRng;
use super::stone::Stone;

/// Rain drops weigh at least this much
pub const RAIN_BASE_WEIGHT: i32 = 50;

/// Effect selector as passed by the host (`0` turns effects off)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectKind {
    Off,
    Rain,
    Boat,
    Wind,
}

impl EffectKind {
    /// Map the numeric selector; unknown values yield `None`
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(EffectKind::Off),
            1 => Some(EffectKind::Rain),
            2 => Some(EffectKind::Boat),
            3 => Some(EffectKind::Wind),
            _ => None,
        }
    }

    pub fn code(&self) -> u32 {
        match self {
            EffectKind::Off => 0,
            EffectKind::Rain => 1,
            EffectKind::Boat => 2,
            EffectKind::Wind => 3,
        }
    }
}

/// A moving point that leaves a wake
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Boat {
    pub pos: IVec2,
    pub vel: IVec2,
    /// Stone size of the wake
    pub size: u32,
    /// Stone weight of the wake
    pub weight: i32,
    /// Tick parity counter; the boat moves on even counts
    pub flip: u32,
}

impl Boat {
    /// Launch at a random interior point with equal x/y speed
    pub fn launch(speed: u32, size: u32, weight: i32, bounds: IVec2, rng: &mut WaveRng) -> Self {
        let pos = random_interior(bounds, rng);
        let speed = speed.min(i32::MAX as u32) as i32;
        Self {
            pos,
            vel: IVec2::splat(speed),
            size,
            weight,
            flip: 0,
        }
    }

    /// Count a tick; on every second one, advance, bounce off the interior
    /// edges and return the wake stone.
    pub fn advance(&mut self, bounds: IVec2) -> Option<Stone> {
        self.flip = self.flip.wrapping_add(1);
        if self.flip & 1 != 0 {
            return None;
        }

        let next = self.pos.saturating_add(self.vel);
        let (x, flip_x) = reflect(next.x, bounds.x);
        let (y, flip_y) = reflect(next.y, bounds.y);
        if flip_x {
            self.vel.x = -self.vel.x;
        }
        if flip_y {
            self.vel.y = -self.vel.y;
        }
        self.pos = IVec2::new(x, y);

        Some(Stone::new(self.pos.x, self.pos.y, self.size, self.weight))
    }
}

/// Mirror `v` back into `[1, dim - 2]`, reporting whether an edge was hit
fn reflect(v: i32, dim: i32) -> (i32, bool) {
    let low = 1;
    let high = (dim - 2).max(low);
    if v < low {
        ((2 * low).saturating_sub(v).clamp(low, high), true)
    } else if v > high {
        ((2 * high).saturating_sub(v).clamp(low, high), true)
    } else {
        (v, false)
    }
}

/// Uniformly random interior cell
fn random_interior(bounds: IVec2, rng: &mut WaveRng) -> IVec2 {
    let x = rng.next32((bounds.x - 2).max(1) as u32) as i32 + 1;
    let y = rng.next32((bounds.y - 2).max(1) as u32) as i32 + 1;
    IVec2::new(x, y)
}

/// Draw in `[0, max)`, or 0 when `max` is 0
fn draw(rng: &mut WaveRng, max: u32) -> u32 {
    if max == 0 { 0 } else { rng.next32(max) }
}

/// An enabled effect and its state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Fires with probability 1 / (`sparseness` + 1) per tick
    Rain {
        sparseness: u32,
        max_size: u32,
        max_weight: u32,
    },
    Boat(Boat),
    /// `density` + 1 stones per tick
    Wind {
        density: u32,
        max_size: u32,
        max_weight: u32,
    },
}

impl Effect {
    /// Build an effect from the host's selector and generic parameters.
    ///
    /// Returns `None` for `Off`. The boat draws its start position from `rng`.
    pub fn from_params(
        kind: EffectKind,
        p1: u32,
        p2: u32,
        p3: u32,
        bounds: IVec2,
        rng: &mut WaveRng,
    ) -> Option<Self> {
        match kind {
            EffectKind::Off => None,
            EffectKind::Rain => Some(Effect::Rain {
                sparseness: p1,
                max_size: p2,
                max_weight: p3,
            }),
            EffectKind::Boat => {
                let weight = p3.min(i32::MAX as u32) as i32;
                Some(Effect::Boat(Boat::launch(p1, p2, weight, bounds, rng)))
            }
            EffectKind::Wind => Some(Effect::Wind {
                density: p1,
                max_size: p2,
                max_weight: p3,
            }),
        }
    }

    pub fn kind(&self) -> EffectKind {
        match self {
            Effect::Rain { .. } => EffectKind::Rain,
            Effect::Boat(_) => EffectKind::Boat,
            Effect::Wind { .. } => EffectKind::Wind,
        }
    }

    /// Run one tick of the generator. Returns true if any stone landed.
    pub fn generate(&mut self, field: &mut EnergyField, stencil: Stencil, rng: &mut WaveRng) -> bool {
        let bounds = IVec2::new(field.width() as i32, field.height() as i32);
        match self {
            Effect::Rain {
                sparseness,
                max_size,
                max_weight,
            } => {
                if rng.next32(sparseness.saturating_add(1)) != 0 {
                    return false;
                }
                let stone = random_stone(rng, bounds, *max_size, *max_weight, RAIN_BASE_WEIGHT);
                field.drop_stone(&stone, stencil)
            }
            Effect::Boat(boat) => match boat.advance(bounds) {
                Some(stone) => field.drop_stone(&stone, stencil),
                None => false,
            },
            Effect::Wind {
                density,
                max_size,
                max_weight,
            } => {
                let mut landed = false;
                for _ in 0..=*density {
                    let stone = random_stone(rng, bounds, *max_size, *max_weight, 0);
                    landed |= field.drop_stone(&stone, stencil);
                }
                landed
            }
        }
    }
}

/// Stone at a random interior cell with size in `[1, max_size]` and weight
/// in `[base, base + max_weight)`
fn random_stone(rng: &mut WaveRng, bounds: IVec2, max_size: u32, max_weight: u32, base: i32) -> Stone {
    let pos = random_interior(bounds, rng);
    let size = draw(rng, max_size) + 1;
    // Keep the draw inside i32 so the weight never wraps negative
    let weight = base.saturating_add(draw(rng, max_weight.min(i32::MAX as u32)) as i32);
    Stone::new(pos.x, pos.y, size, weight)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn still_boat(pos: IVec2, vel: IVec2) -> Boat {
        Boat {
            pos,
            vel,
            size: 0,
            weight: 100,
            flip: 0,
        }
    }

    #[test]
    fn test_kind_codes() {
        for code in 0..4 {
            assert_eq!(EffectKind::from_code(code).unwrap().code(), code);
        }
        assert_eq!(EffectKind::from_code(4), None);
    }

    #[test]
    fn test_boat_moves_every_other_tick() {
        let bounds = IVec2::new(40, 40);
        let mut boat = still_boat(IVec2::new(10, 10), IVec2::new(2, 2));
        assert_eq!(boat.advance(bounds), None);
        assert_eq!(boat.pos, IVec2::new(10, 10));
        let stone = boat.advance(bounds).unwrap();
        assert_eq!(boat.pos, IVec2::new(12, 12));
        assert_eq!((stone.x, stone.y, stone.weight), (12, 12, 100));
        assert_eq!(boat.advance(bounds), None);
    }

    #[test]
    fn test_boat_bounces_off_far_edge() {
        let bounds = IVec2::new(12, 12);
        let mut boat = still_boat(IVec2::new(9, 5), IVec2::new(2, 2));
        boat.advance(bounds);
        boat.advance(bounds);
        // 11 overshoots the last interior column (10) by one
        assert_eq!(boat.pos, IVec2::new(9, 7));
        assert_eq!(boat.vel, IVec2::new(-2, 2));
    }

    #[test]
    fn test_boat_bounces_off_near_edge() {
        let bounds = IVec2::new(12, 12);
        let mut boat = still_boat(IVec2::new(2, 6), IVec2::new(-2, -2));
        boat.advance(bounds);
        boat.advance(bounds);
        // 0 is one past the first interior column
        assert_eq!(boat.pos, IVec2::new(2, 4));
        assert_eq!(boat.vel, IVec2::new(2, -2));
    }

    #[test]
    fn test_boat_one_flip_per_contact() {
        let bounds = IVec2::new(16, 11);
        let mut boat = still_boat(IVec2::new(5, 5), IVec2::new(2, 2));
        let mut flips = IVec2::ZERO;
        let mut contacts = IVec2::ZERO;

        for _ in 0..400 {
            let before = boat.vel;
            let next = boat.pos + boat.vel;
            let moved = boat.advance(bounds).is_some();
            if moved {
                if next.x < 1 || next.x > bounds.x - 2 {
                    contacts.x += 1;
                }
                if next.y < 1 || next.y > bounds.y - 2 {
                    contacts.y += 1;
                }
            }
            if boat.vel.x != before.x {
                flips.x += 1;
                assert_eq!(boat.vel.x, -before.x);
            }
            if boat.vel.y != before.y {
                flips.y += 1;
                assert_eq!(boat.vel.y, -before.y);
            }
            assert!((1..=bounds.x - 2).contains(&boat.pos.x));
            assert!((1..=bounds.y - 2).contains(&boat.pos.y));
        }

        assert!(contacts.x > 0 && contacts.y > 0);
        assert_eq!(flips, contacts);
    }

    #[test]
    fn test_boat_fast_speed_stays_inside() {
        let bounds = IVec2::new(6, 6);
        let mut boat = still_boat(IVec2::new(2, 3), IVec2::new(50, -50));
        for _ in 0..20 {
            boat.advance(bounds);
            assert!((1..=4).contains(&boat.pos.x));
            assert!((1..=4).contains(&boat.pos.y));
        }
    }

    #[test]
    fn test_launch_starts_inside_with_even_parity() {
        let mut rng = WaveRng::new(7);
        let bounds = IVec2::new(30, 20);
        for _ in 0..50 {
            let boat = Boat::launch(3, 2, 400, bounds, &mut rng);
            assert!((1..=28).contains(&boat.pos.x));
            assert!((1..=18).contains(&boat.pos.y));
            assert_eq!(boat.vel, IVec2::new(3, 3));
            assert_eq!(boat.flip, 0);
        }
    }

    #[test]
    fn test_rain_every_tick_when_dense() {
        let mut field = EnergyField::new(64, 64).unwrap();
        let mut rng = WaveRng::new(42);
        let mut rain = Effect::Rain {
            sparseness: 0,
            max_size: 1,
            max_weight: 10,
        };
        for _ in 0..20 {
            assert!(rain.generate(&mut field, Stencil::Circular, &mut rng));
        }
        assert!(field.current().iter().all(|&v| v == 0 || (50..60).contains(&v)));
    }

    #[test]
    fn test_rain_sparse_sometimes_skips() {
        let mut field = EnergyField::new(64, 64).unwrap();
        let mut rng = WaveRng::new(42);
        let mut rain = Effect::Rain {
            sparseness: 9,
            max_size: 0,
            max_weight: 0,
        };
        let landed = (0..500)
            .filter(|_| rain.generate(&mut field, Stencil::Circular, &mut rng))
            .count();
        assert!(landed > 0 && landed < 500);
        // Zero bounds: size 1, weight exactly the base
        assert!(field.current().iter().all(|&v| v == 0 || v == RAIN_BASE_WEIGHT));
    }

    #[test]
    fn test_wind_weights_below_max() {
        let mut field = EnergyField::new(50, 50).unwrap();
        let mut rng = WaveRng::new(3);
        let mut wind = Effect::Wind {
            density: 30,
            max_size: 2,
            max_weight: 7,
        };
        wind.generate(&mut field, Stencil::Elliptical, &mut rng);
        assert!(field.current().iter().all(|&v| (0..7).contains(&v)));
    }

    #[test]
    fn test_unbounded_weights_stay_non_negative() {
        let mut field = EnergyField::new(40, 40).unwrap();
        let mut rng = WaveRng::new(11);
        let mut rain = Effect::Rain {
            sparseness: 0,
            max_size: 1,
            max_weight: u32::MAX,
        };
        let mut wind = Effect::Wind {
            density: 20,
            max_size: 1,
            max_weight: u32::MAX,
        };
        for _ in 0..50 {
            rain.generate(&mut field, Stencil::Circular, &mut rng);
            assert!(field.current().iter().all(|&v| v >= 0));
            wind.generate(&mut field, Stencil::Circular, &mut rng);
            assert!(field.current().iter().all(|&v| v >= 0));
        }
        assert!(!field.is_flat());
    }

    #[test]
    fn test_from_params_off_is_none() {
        let mut rng = WaveRng::new(1);
        let bounds = IVec2::new(10, 10);
        assert_eq!(Effect::from_params(EffectKind::Off, 1, 2, 3, bounds, &mut rng), None);
        let wind = Effect::from_params(EffectKind::Wind, 1, 2, 3, bounds, &mut rng).unwrap();
        assert_eq!(wind.kind(), EffectKind::Wind);
    }
}
