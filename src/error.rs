//! Error taxonomy for the reveal simulator
//!
//! Configuration errors are fatal to the render; job errors are fatal to that
//! job (the caller falls back to a static winner display). The physics step
//! cap is a safety valve, recovered locally, and never surfaces here.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RevealError {
    /// Bad board dimensions. No retry; the host must fix its config.
    #[error("invalid board configuration: {0}")]
    InvalidConfiguration(String),

    /// Slot index outside `[0, slot_count)` on a layout query.
    #[error("slot {slot} out of range (slot count {slot_count})")]
    OutOfRange { slot: u32, slot_count: u32 },

    /// Winner slot outside `[0, slot_count)` at job creation. Rejected rather
    /// than clamped: a visually wrong landing is worse than failing loudly.
    #[error("winner slot {slot} outside [0, {slot_count})")]
    InvalidWinnerSlot { slot: u32, slot_count: u32 },

    /// Winner address not found among the known participants.
    #[error("winner address {address} not found among participants")]
    WinnerNotFound { address: String },

    /// Drop state does not admit a draw right now.
    #[error("drop is not ready: {reason}")]
    DropNotReady { reason: &'static str },
}
