//! Browser host bindings
//!
//! The JS host view (drop detail page) drives the session from its
//! `requestAnimationFrame` loop: construct once per board mount, call
//! `reset_for_drop` whenever the routed drop changes, `start_reveal` when
//! winner slots are known, and `tick` + `drain_events` every frame.

use wasm_bindgen::prelude::*;

use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::settings::Settings;
use crate::sim::{BoardConfig, DropId, RevealOrigin, RevealPhase, RevealSession};

/// Hook up panic reporting and console logging. Call once at module load.
#[wasm_bindgen]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

/// One reveal board instance, exclusively owned by its host view.
#[wasm_bindgen]
pub struct PlinkoReveal {
    session: RevealSession,
    accumulator: f32,
}

#[wasm_bindgen]
impl PlinkoReveal {
    #[wasm_bindgen(constructor)]
    pub fn new(
        row_count: u32,
        slot_count: u32,
        canvas_width: f32,
        canvas_height: f32,
    ) -> Result<PlinkoReveal, JsValue> {
        let config = BoardConfig::new(row_count, slot_count, canvas_width, canvas_height);
        let session = RevealSession::new(config, Settings::load())
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self {
            session,
            accumulator: 0.0,
        })
    }

    /// Hard reset on drop identity change; a repeated id is a no-op.
    pub fn reset_for_drop(&mut self, drop_id: u64) {
        self.session.reset_for_drop(DropId(drop_id));
    }

    /// Begin revealing. `observed` marks winners that were already decided
    /// before this view arrived (vs a draw the host just triggered).
    pub fn start_reveal(&mut self, winner_slots: &[u32], observed: bool) -> Result<(), JsValue> {
        let origin = if observed {
            RevealOrigin::Observed
        } else {
            RevealOrigin::Triggered
        };
        self.session
            .start_reveal(winner_slots, origin)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Advance by wall-clock seconds, fixed-stepping the simulation.
    pub fn tick(&mut self, elapsed_secs: f32) {
        self.accumulator += elapsed_secs.min(0.1);
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.session.tick(SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
    }

    /// Pending events as a JSON array (drained)
    pub fn drain_events(&mut self) -> String {
        serde_json::to_string(&self.session.drain_events()).unwrap_or_else(|_| "[]".into())
    }

    /// The falling ball (pos, trail, settled) as JSON, or null
    pub fn ball_json(&self) -> String {
        match self.session.ball() {
            Some(ball) => serde_json::to_string(ball).unwrap_or_else(|_| "null".into()),
            None => "null".into(),
        }
    }

    /// Peg centers, flattened `[x0, y0, x1, y1, ...]`
    pub fn pegs(&self) -> Vec<f32> {
        self.session
            .layout()
            .pegs
            .iter()
            .flat_map(|p| [p.x, p.y])
            .collect()
    }

    pub fn slot_x(&self, slot: u32) -> Result<f32, JsValue> {
        self.session
            .layout()
            .slot_to_position(slot)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn slot_band_y(&self) -> f32 {
        self.session.layout().slot_band_y
    }

    /// `(slot, rank)` pairs landed so far, flattened
    pub fn animated_winners(&self) -> Vec<u32> {
        self.session
            .animated_winners()
            .iter()
            .flat_map(|&(slot, rank)| [slot, rank])
            .collect()
    }

    /// Current completion banner text, if one is showing
    pub fn notice(&self) -> Option<String> {
        self.session.notice().map(|n| n.message.clone())
    }

    pub fn is_revealing(&self) -> bool {
        matches!(self.session.phase(), RevealPhase::Dropping(_))
    }

    pub fn is_complete(&self) -> bool {
        self.session.phase() == RevealPhase::Complete
    }
}
