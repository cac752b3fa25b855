//! Ball state for one winner's drop

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::board::PegLayout;
use crate::consts::*;

/// A fading trail sample behind the ball (render-only)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrailParticle {
    pub pos: Vec2,
    /// 1.0 when recorded, decays to 0 and is evicted
    pub alpha: f32,
}

/// One simulated ball. Owned by the sequencer for the lifetime of a single
/// rank's drop; destroyed after its landing event is consumed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Landing slot, fixed at creation. Supplied by the caller, never
    /// computed by the physics.
    pub target_slot: u32,
    pub settled: bool,
    /// Ticks simulated so far, bounded by the force-settle cap
    pub ticks: u32,
    /// Trail history, newest first
    #[serde(skip)]
    pub trail: Vec<TrailParticle>,
    /// Trail sample cap (quality-dependent)
    #[serde(skip)]
    pub trail_cap: usize,
}

impl Ball {
    /// Spawn at the board's entry point with a horizontal launch offset.
    /// `jitter` is in reference pixels; the layout's scale is applied here.
    pub fn launch(layout: &PegLayout, target_slot: u32, jitter: f32, vx: f32, trail_cap: usize) -> Self {
        let mut pos = layout.spawn_point();
        pos.x += jitter * layout.scale;
        Self {
            pos,
            vel: Vec2::new(vx * layout.scale, 0.0),
            radius: BALL_RADIUS * layout.scale,
            target_slot,
            settled: false,
            ticks: 0,
            trail: Vec::with_capacity(trail_cap),
            trail_cap,
        }
    }

    /// Record the current position and age out old samples. Oldest samples
    /// are evicted first; fully faded samples are dropped regardless of age.
    pub fn record_trail(&mut self, dt: f32) {
        for p in &mut self.trail {
            p.alpha -= TRAIL_FADE_PER_SEC * dt;
        }
        self.trail.retain(|p| p.alpha > 0.0);
        if self.trail_cap == 0 {
            return;
        }
        self.trail.insert(
            0,
            TrailParticle {
                pos: self.pos,
                alpha: 1.0,
            },
        );
        if self.trail.len() > self.trail_cap {
            self.trail.pop();
        }
    }

    /// Snap to the target slot's center and stop. Used both by the normal
    /// settle test and by the step-cap safety valve.
    pub fn settle_at_target(&mut self, layout: &PegLayout) {
        self.pos = Vec2::new(layout.slot_center(self.target_slot), layout.slot_band_y);
        self.vel = Vec2::ZERO;
        self.settled = true;
    }
}
