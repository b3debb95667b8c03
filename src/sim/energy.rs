//! Energy grid and damped wave propagation
//!
//! Two same-shaped buffers hold the field at the current and the previous
//! step. Each spread computes the next step into the previous buffer and then
//! swaps roles, so no data is ever copied.

use serde::{Deserialize, Serialize};

use crate::error::InitError;

/// Right shift applied to a cell's new value to get its per-step energy loss
/// (about 3%).
pub const DAMPING_SHIFT: u32 = 5;

/// Elliptical horizontal taps as (distance, weight), applied on both sides
const ELLIPSE_TAPS: [(isize, i32); 3] = [(1, 3), (2, 2), (3, 2)];
/// Elliptical weight of each vertical neighbor
const ELLIPSE_VERTICAL_WEIGHT: i32 = 8;

/// Neighbor pattern used by diffusion (fixed for an object's lifetime)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stencil {
    /// Four direct neighbors, round ripples
    #[default]
    Circular,
    /// Wide horizontal, narrow vertical: ripples foreshortened as if viewed
    /// at an angle
    Elliptical,
}

impl Stencil {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stencil::Circular => "circular",
            Stencil::Elliptical => "elliptical",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "circular" | "circle" | "0" => Some(Stencil::Circular),
            "elliptical" | "ellipse" | "1" => Some(Stencil::Elliptical),
            _ => None,
        }
    }
}

/// Double-buffered field of signed energy cells, row stride == width
#[derive(Debug, Clone)]
pub struct EnergyField {
    width: usize,
    height: usize,
    buffers: [Vec<i32>; 2],
    /// Index of the buffer holding the current step
    current: usize,
}

impl EnergyField {
    /// Allocate a zeroed field
    pub fn new(width: usize, height: usize) -> Result<Self, InitError> {
        let len = width
            .checked_mul(height)
            .ok_or(InitError::TooLarge { width, height })?;
        let mut first = Vec::new();
        first.try_reserve_exact(len)?;
        first.resize(len, 0);
        let mut second = Vec::new();
        second.try_reserve_exact(len)?;
        second.resize(len, 0);

        Ok(Self {
            width,
            height,
            buffers: [first, second],
            current: 0,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Cells of the current step
    pub fn current(&self) -> &[i32] {
        &self.buffers[self.current]
    }

    /// Cells of the step before the current one
    pub fn previous(&self) -> &[i32] {
        &self.buffers[1 - self.current]
    }

    /// Current energy at (x, y), `None` outside the grid
    pub fn get(&self, x: i64, y: i64) -> Option<i32> {
        self.index(x, y).map(|i| self.buffers[self.current][i])
    }

    /// Overwrite the current energy at (x, y). Returns false (and writes
    /// nothing) outside the grid.
    pub fn set(&mut self, x: i64, y: i64, value: i32) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.buffers[self.current][i] = value;
                true
            }
            None => false,
        }
    }

    /// True when (x, y) is inside the grid but not on its outer ring
    pub fn is_interior(&self, x: i64, y: i64) -> bool {
        x >= 1 && y >= 1 && x + 1 < self.width as i64 && y + 1 < self.height as i64
    }

    fn index(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    /// Advance the field one step and swap buffer roles.
    ///
    /// Every interior cell is recomputed; the outer ring is never written.
    /// Sums wrap at 32 bits, so any stone weight is accepted.
    pub fn spread(&mut self, stencil: Stencil) {
        let width = self.width;
        let height = self.height;
        let (front, back) = self.buffers.split_at_mut(1);
        let (cur, next) = if self.current == 0 {
            (&front[0], &mut back[0])
        } else {
            (&back[0], &mut front[0])
        };

        for y in 1..height.saturating_sub(1) {
            let row = y * width;
            for x in 1..width.saturating_sub(1) {
                let i = row + x;
                let value = match stencil {
                    Stencil::Circular => {
                        let raw = cur[i - 1]
                            .wrapping_add(cur[i + 1])
                            .wrapping_add(cur[i - width])
                            .wrapping_add(cur[i + width]);
                        (raw >> 1).wrapping_sub(next[i])
                    }
                    Stencil::Elliptical => {
                        let mut raw = ELLIPSE_VERTICAL_WEIGHT
                            .wrapping_mul(cur[i - width].wrapping_add(cur[i + width]));
                        for (dist, weight) in ELLIPSE_TAPS {
                            // Taps past the row ends read as rest
                            let left = x.checked_sub(dist as usize).map_or(0, |lx| cur[row + lx]);
                            let right = if x + (dist as usize) < width {
                                cur[i + dist as usize]
                            } else {
                                0
                            };
                            raw = raw.wrapping_add(weight.wrapping_mul(left.wrapping_add(right)));
                        }
                        (raw >> 4).wrapping_sub(next[i])
                    }
                };
                next[i] = value - (value >> DAMPING_SHIFT);
            }
        }

        self.current = 1 - self.current;
    }

    /// True when every cell of the current step is at rest
    pub fn is_flat(&self) -> bool {
        self.current().iter().all(|&v| v == 0)
    }
}
