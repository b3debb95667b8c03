//! Disturbance primitive: dropping a stone into the water
//!
//! A stone overwrites a disc of cells in the current step with a fixed
//! energy. The bounding box is validated against the grid before anything
//! is written.

use super::energy::{EnergyField, Stencil};

/// A single stone drop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stone {
    pub x: i32,
    pub y: i32,
    /// Disc radius (0 still disturbs the center cell)
    pub size: u32,
    /// Energy written into every covered cell
    pub weight: i32,
}

/// Inclusive cell bounds written by a stone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Footprint {
    pub min_x: i64,
    pub max_x: i64,
    pub min_y: i64,
    pub max_y: i64,
}

impl Stone {
    pub fn new(x: i32, y: i32, size: u32, weight: i32) -> Self {
        Self { x, y, size, weight }
    }

    /// Radius used for the disc test
    pub fn radius(&self) -> i64 {
        self.size.max(1) as i64
    }

    /// Bounding box for the given stencil. The elliptical stencil compresses
    /// the vertical extent to match its flattened ripples.
    pub fn footprint(&self, stencil: Stencil) -> Footprint {
        let half_x = (self.size >> 1) as i64;
        let half_y = match stencil {
            Stencil::Circular => half_x,
            Stencil::Elliptical => (self.size >> 2) as i64,
        };
        let (x, y) = (self.x as i64, self.y as i64);
        Footprint {
            min_x: x - half_x,
            max_x: x + half_x,
            min_y: y - half_y,
            max_y: y + half_y,
        }
    }
}

impl EnergyField {
    /// Drop a stone into the current step.
    ///
    /// Returns false without touching the grid when the bounding box reaches
    /// the outer ring.
    pub fn drop_stone(&mut self, stone: &Stone, stencil: Stencil) -> bool {
        let bounds = stone.footprint(stencil);
        if !self.is_interior(bounds.min_x, bounds.min_y)
            || !self.is_interior(bounds.max_x, bounds.max_y)
        {
            return false;
        }

        let r2 = stone.radius() * stone.radius();
        let (cx, cy) = (stone.x as i64, stone.y as i64);
        for y in bounds.min_y..=bounds.max_y {
            for x in bounds.min_x..=bounds.max_x {
                let (dx, dy) = (x - cx, y - cy);
                if dx * dx + dy * dy <= r2 {
                    self.set(x, y, stone.weight);
                }
            }
        }
        true
    }
}
