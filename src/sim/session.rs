//! Session lifecycle: one owned simulation context per rendered board
//!
//! The session is the reset boundary. It remembers the last drop identity it
//! was shown and treats any change as a hard reset, so one drop's reveal can
//! never leak onto another drop's board.

use serde::{Deserialize, Serialize};

use super::ball::Ball;
use super::board::{BoardConfig, PegLayout};
use super::sequencer::{RevealEvent, RevealJob, RevealOrigin, RevealPhase, RevealSequencer};
use crate::consts::NOTICE_SECS;
use crate::error::RevealError;
use crate::settings::Settings;

/// Opaque external key identifying the drop being viewed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DropId(pub u64);

/// Transient completion banner. The host renders it until `ttl` runs out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub message: String,
    pub ttl: f32,
}

impl Notice {
    fn new(message: String) -> Self {
        Self {
            message,
            ttl: NOTICE_SECS,
        }
    }
}

/// Owns the board geometry, the sequencer, and the pending notice for one
/// rendered board. Created fresh per board mount; rebuilt only when the
/// structural config changes.
#[derive(Debug, Clone)]
pub struct RevealSession {
    config: BoardConfig,
    layout: PegLayout,
    sequencer: RevealSequencer,
    settings: Settings,
    drop_id: Option<DropId>,
    notice: Option<Notice>,
    events: Vec<RevealEvent>,
}

impl RevealSession {
    pub fn new(config: BoardConfig, settings: Settings) -> Result<Self, RevealError> {
        let layout = PegLayout::build(&config)?;
        Ok(Self {
            config,
            layout,
            sequencer: RevealSequencer::new(settings.effective_trail_len()),
            settings,
            drop_id: None,
            notice: None,
            events: Vec::new(),
        })
    }

    pub fn layout(&self) -> &PegLayout {
        &self.layout
    }

    pub fn phase(&self) -> RevealPhase {
        self.sequencer.phase()
    }

    pub fn ball(&self) -> Option<&Ball> {
        self.sequencer.ball()
    }

    pub fn animated_winners(&self) -> &[(u32, u32)] {
        self.sequencer.animated_winners()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The sole reset entry point. Called by the host view on every
    /// observation of the (possibly unchanged) drop identity.
    pub fn reset_for_drop(&mut self, id: DropId) {
        if self.drop_id == Some(id) {
            return;
        }
        if let Some(prev) = self.drop_id {
            log::info!("drop changed {} -> {}, discarding reveal state", prev.0, id.0);
        }
        self.sequencer.reset();
        self.sequencer.set_seed(id.0);
        self.notice = None;
        self.events.clear();
        self.drop_id = Some(id);
    }

    /// Single entry point for both host-triggered draws and passively
    /// observed, already-completed drops. With reduced motion on, degrades
    /// to an immediate non-animated reveal.
    pub fn start_reveal(
        &mut self,
        winner_slots: &[u32],
        origin: RevealOrigin,
    ) -> Result<(), RevealError> {
        let job = RevealJob::new(winner_slots.to_vec(), origin);
        let result = if self.settings.reduced_motion {
            self.sequencer.reveal_instantly(job, &self.layout)
        } else {
            self.sequencer.start_reveal(job, &self.layout)
        };
        self.collect_events();
        result
    }

    /// Advance the simulation by one render tick's worth of time.
    pub fn tick(&mut self, dt: f32) {
        self.sequencer.tick(&self.layout, dt);
        self.collect_events();
        if let Some(notice) = &mut self.notice {
            notice.ttl -= dt;
            if notice.ttl <= 0.0 {
                self.notice = None;
            }
        }
    }

    /// Take all pending events, oldest first.
    pub fn drain_events(&mut self) -> Vec<RevealEvent> {
        std::mem::take(&mut self.events)
    }

    /// Rebuild the board when the structural config changes. A changed
    /// config discards any in-flight reveal; an identical one is a no-op.
    pub fn reconfigure(&mut self, config: BoardConfig) -> Result<(), RevealError> {
        if config == self.config {
            return Ok(());
        }
        let layout = PegLayout::build(&config)?;
        log::info!(
            "board reconfigured: {} rows, {} slots",
            config.row_count,
            config.slot_count
        );
        self.config = config;
        self.layout = layout;
        self.sequencer.reset();
        self.notice = None;
        self.events.clear();
        Ok(())
    }

    /// Funnel sequencer events into the session queue, pinning the
    /// completion message as the transient notice on the way through.
    fn collect_events(&mut self) {
        for event in self.sequencer.drain_events() {
            if let RevealEvent::RevealComplete { message, .. } = &event {
                self.notice = Some(Notice::new(message.clone()));
            }
            self.events.push(event);
        }
    }
}
