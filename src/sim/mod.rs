//! Deterministic reveal simulation
//!
//! All animation logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only, and only at ball launch
//! - No rendering or platform dependencies

pub mod ball;
pub mod board;
pub mod sequencer;
pub mod session;
pub mod step;

pub use ball::{Ball, TrailParticle};
pub use board::{BoardConfig, PegLayout, peg_count};
pub use sequencer::{
    RevealEvent, RevealJob, RevealOrigin, RevealPhase, RevealSequencer, compose_message, ordinal,
};
pub use session::{DropId, Notice, RevealSession};
pub use step::{advance, reflect_velocity};
