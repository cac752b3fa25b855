//! Plinko Reveal - winner reveal animation for on-chain drops
//!
//! Core modules:
//! - `sim`: Deterministic simulation (board geometry, ball physics, reveal
//!   sequencing, session lifecycle)
//! - `snapshot`: Interface boundary with the contract-reading collaborator
//! - `settings`: Display preferences
//! - `web`: Browser host bindings (wasm32 only)
//!
//! The authoritative winner selection lives in an external smart contract;
//! this crate only turns its already-final results into a rank-ordered,
//! replayable ball-drop animation.

pub mod error;
pub mod settings;
pub mod sim;
pub mod snapshot;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use error::RevealError;
pub use settings::{QualityPreset, Settings};
pub use sim::{
    Ball, BoardConfig, DropId, Notice, PegLayout, RevealEvent, RevealJob, RevealOrigin,
    RevealPhase, RevealSequencer, RevealSession,
};
pub use snapshot::{DropSnapshot, Participant};

/// Simulation tuning constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz for smooth physics)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Reference peg spacing (pixels at scale 1.0)
    pub const PEG_SPACING_X: f32 = 32.0;
    pub const PEG_SPACING_Y: f32 = 48.0;
    /// Drop zone above the first peg row
    pub const TOP_MARGIN: f32 = 48.0;
    /// Breathing room below the landing band
    pub const BOTTOM_MARGIN: f32 = 24.0;

    pub const PEG_RADIUS: f32 = 5.0;
    pub const BALL_RADIUS: f32 = 9.0;
    /// Hard cap on how many slots one board may show
    pub const MAX_SLOT_COUNT: u32 = 100;

    /// Downward acceleration (pixels/s² at scale 1.0)
    pub const GRAVITY: f32 = 900.0;
    /// Velocity kept after a peg or wall rebound
    pub const RESTITUTION: f32 = 0.55;
    /// Speed ceiling (pixels/s at scale 1.0)
    pub const BALL_MAX_SPEED: f32 = 640.0;
    /// Sideways kick on a dead-center peg hit (pixels/s at scale 1.0)
    pub const PEG_NUDGE: f32 = 26.0;

    /// Fraction of the board height below which steering engages
    pub const STEER_START_FRACTION: f32 = 0.7;
    /// Steering acceleration per pixel of horizontal error (1/s²)
    pub const STEER_GAIN: f32 = 14.0;
    /// Horizontal drag while steering (1/s)
    pub const STEER_DRAG: f32 = 2.2;

    /// Per-tick horizontal damping inside the landing band
    pub const SETTLE_DAMPING: f32 = 0.82;
    /// Speed below which the ball snaps to its slot (pixels/s at scale 1.0)
    pub const SETTLE_SPEED_EPS: f32 = 3.0;
    /// Force-settle cap: 20 seconds at 120 Hz
    pub const MAX_SETTLE_TICKS: u32 = 2400;

    /// Launch offset range (pixels at scale 1.0)
    pub const LAUNCH_JITTER: f32 = 14.0;
    /// Launch horizontal speed range (pixels/s at scale 1.0)
    pub const LAUNCH_VX_JITTER: f32 = 40.0;

    /// Maximum trail samples per ball
    pub const TRAIL_LENGTH: usize = 24;
    /// Trail alpha decay per second
    pub const TRAIL_FADE_PER_SEC: f32 = 2.5;

    /// How long the completion banner stays up
    pub const NOTICE_SECS: f32 = 2.5;
}
