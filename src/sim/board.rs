//! Board geometry for the peg field and landing slots
//!
//! A board is a centered triangular peg arrangement: row `r` (0-based) has
//! `r + 2` pegs. All reference spacing is scaled by the smaller of the
//! width/height ratios against the layout's natural extents, so the board
//! stays proportional and inside the canvas at any size.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::RevealError;

/// Immutable board parameters for one session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Number of peg rows
    pub row_count: u32,
    /// Number of landing slots (participant count at simulation start)
    pub slot_count: u32,
    /// Canvas width in pixels
    pub canvas_width: f32,
    /// Canvas height in pixels
    pub canvas_height: f32,
}

impl BoardConfig {
    pub fn new(row_count: u32, slot_count: u32, canvas_width: f32, canvas_height: f32) -> Self {
        Self {
            row_count,
            slot_count,
            canvas_width,
            canvas_height,
        }
    }

    fn validate(&self) -> Result<(), RevealError> {
        if self.row_count == 0 {
            return Err(RevealError::InvalidConfiguration(
                "row_count must be positive".into(),
            ));
        }
        if self.slot_count == 0 {
            return Err(RevealError::InvalidConfiguration(
                "slot_count must be positive".into(),
            ));
        }
        if self.slot_count > MAX_SLOT_COUNT {
            return Err(RevealError::InvalidConfiguration(format!(
                "slot_count {} exceeds cap {}",
                self.slot_count, MAX_SLOT_COUNT
            )));
        }
        if !(self.canvas_width.is_finite() && self.canvas_width > 0.0)
            || !(self.canvas_height.is_finite() && self.canvas_height > 0.0)
        {
            return Err(RevealError::InvalidConfiguration(format!(
                "canvas {}x{} is not a positive size",
                self.canvas_width, self.canvas_height
            )));
        }
        Ok(())
    }
}

/// Derived peg/slot geometry, cached per `BoardConfig`. Never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PegLayout {
    /// Peg centers, row-major top to bottom
    pub pegs: Vec<Vec2>,
    pub row_count: u32,
    pub slot_count: u32,
    pub canvas_width: f32,
    pub canvas_height: f32,
    /// Uniform scale applied to the reference spacing
    pub scale: f32,
    /// Horizontal center of the board
    pub center_x: f32,
    /// Full board width after scaling
    pub board_width: f32,
    /// Peg radius after scaling
    pub peg_radius: f32,
    /// Y of the landing band where balls settle
    pub slot_band_y: f32,
}

impl PegLayout {
    /// Build the layout for a config. Deterministic, pure.
    pub fn build(config: &BoardConfig) -> Result<Self, RevealError> {
        config.validate()?;

        let rows = config.row_count;
        // Natural extents at reference spacing: the widest row has rows + 1
        // pegs, plus half a spacing of margin on each side.
        let natural_width = (rows + 1) as f32 * PEG_SPACING_X;
        let natural_height = TOP_MARGIN + rows as f32 * PEG_SPACING_Y + BOTTOM_MARGIN;

        let scale =
            (config.canvas_width / natural_width).min(config.canvas_height / natural_height);
        let center_x = config.canvas_width / 2.0;
        let board_width = natural_width * scale;

        let mut pegs = Vec::with_capacity(peg_count(rows));
        for r in 0..rows {
            let n = r + 2;
            let y = (TOP_MARGIN + r as f32 * PEG_SPACING_Y) * scale;
            for i in 0..n {
                let offset = i as f32 - (n - 1) as f32 / 2.0;
                let x = center_x + offset * PEG_SPACING_X * scale;
                pegs.push(Vec2::new(x, y));
            }
        }

        Ok(Self {
            pegs,
            row_count: rows,
            slot_count: config.slot_count,
            canvas_width: config.canvas_width,
            canvas_height: config.canvas_height,
            scale,
            center_x,
            board_width,
            peg_radius: PEG_RADIUS * scale,
            slot_band_y: (TOP_MARGIN + rows as f32 * PEG_SPACING_Y) * scale,
        })
    }

    /// Horizontal center of a slot's visual column.
    pub fn slot_to_position(&self, slot: u32) -> Result<f32, RevealError> {
        if slot >= self.slot_count {
            return Err(RevealError::OutOfRange {
                slot,
                slot_count: self.slot_count,
            });
        }
        Ok(self.slot_center(slot))
    }

    /// Infallible variant for slots already validated at job creation.
    pub(crate) fn slot_center(&self, slot: u32) -> f32 {
        debug_assert!(slot < self.slot_count);
        let pitch = self.board_width / self.slot_count as f32;
        self.center_x - self.board_width / 2.0 + (slot as f32 + 0.5) * pitch
    }

    /// Where freshly dropped balls enter the board (above the first row).
    pub fn spawn_point(&self) -> Vec2 {
        Vec2::new(self.center_x, BALL_RADIUS * self.scale)
    }

    /// Y below which the steering bias toward the target slot engages.
    pub fn steer_start_y(&self) -> f32 {
        self.slot_band_y * STEER_START_FRACTION
    }
}

/// Total pegs for a row count: sum of (r + 2) for r in 0..rows
pub fn peg_count(rows: u32) -> usize {
    (0..rows).map(|r| (r + 2) as usize).sum()
}
