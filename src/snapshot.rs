//! Interface boundary with the contract-reading collaborator
//!
//! The chain is authoritative for everything here: the simulator only ever
//! consumes a read-back snapshot of one drop, plus the participant list used
//! to resolve winner addresses to slot indices. Fetching, transaction
//! submission, and retries all live with the caller.

use serde::{Deserialize, Serialize};

use crate::error::RevealError;

/// One participant as recorded on-chain: slot order is join order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub address: String,
    pub name: String,
    pub slot: u32,
}

/// Read-back of a single drop's state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropSnapshot {
    pub max_participants: u32,
    pub current_participants: u32,
    /// Prize count, 1..=3
    pub num_winners: u32,
    pub is_manual_selection: bool,
    pub is_active: bool,
    pub is_completed: bool,
    /// Winner addresses in prize rank order; empty until selection runs
    pub winners: Vec<String>,
}

impl DropSnapshot {
    /// Slots the board should show: never more than the participants
    /// physically recorded at simulation start.
    pub fn slot_count(&self) -> u32 {
        self.current_participants.min(self.max_participants)
    }

    /// Pre-draw checks, mirroring what the contract would reject anyway.
    pub fn validate_draw(&self) -> Result<(), RevealError> {
        if self.current_participants < self.num_winners {
            return Err(RevealError::DropNotReady {
                reason: "not enough participants",
            });
        }
        if !self.is_active {
            return Err(RevealError::DropNotReady {
                reason: "drop is not active",
            });
        }
        if self.is_completed {
            return Err(RevealError::DropNotReady {
                reason: "drop is already completed",
            });
        }
        Ok(())
    }

    /// Resolve winner addresses to slot indices, prize rank order preserved.
    /// A winner not present in the participant list is an error: it means
    /// the participant list was read stale relative to the winner list, and
    /// animating a guessed slot would be worse than failing loudly.
    pub fn resolve_winner_slots(
        &self,
        participants: &[Participant],
    ) -> Result<Vec<u32>, RevealError> {
        self.winners
            .iter()
            .map(|winner| {
                find_slot(participants, winner).ok_or_else(|| RevealError::WinnerNotFound {
                    address: winner.clone(),
                })
            })
            .collect()
    }

    /// Degraded-mode resolution: an unresolved winner falls back to
    /// `rank % current_participants` so a stale read still animates
    /// *something*. Only for callers that deliberately tolerate stale
    /// participant lists; prefer `resolve_winner_slots`.
    pub fn resolve_winner_slots_lossy(&self, participants: &[Participant]) -> Vec<u32> {
        self.winners
            .iter()
            .enumerate()
            .map(|(rank, winner)| match find_slot(participants, winner) {
                Some(slot) => slot,
                None => {
                    let guessed = rank as u32 % self.current_participants.max(1);
                    log::warn!(
                        "winner {winner} not found among {} participants, guessing slot {guessed}",
                        participants.len()
                    );
                    guessed
                }
            })
            .collect()
    }
}

fn find_slot(participants: &[Participant], address: &str) -> Option<u32> {
    participants
        .iter()
        .find(|p| p.address.eq_ignore_ascii_case(address))
        .map(|p| p.slot)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn participants() -> Vec<Participant> {
        ["0xAaa", "0xBbb", "0xCcc", "0xDdd"]
            .iter()
            .enumerate()
            .map(|(i, addr)| Participant {
                address: addr.to_string(),
                name: format!("User-{i}"),
                slot: i as u32,
            })
            .collect()
    }

    fn snapshot(winners: &[&str]) -> DropSnapshot {
        DropSnapshot {
            max_participants: 10,
            current_participants: 4,
            num_winners: winners.len() as u32,
            is_manual_selection: true,
            is_active: true,
            is_completed: false,
            winners: winners.iter().map(|w| w.to_string()).collect(),
        }
    }

    #[test]
    fn test_resolution_is_case_insensitive_and_ordered() {
        let snap = snapshot(&["0xCCC", "0xaaa"]);
        let slots = snap.resolve_winner_slots(&participants()).unwrap();
        assert_eq!(slots, vec![2, 0]);
    }

    #[test]
    fn test_unknown_winner_is_an_error() {
        let snap = snapshot(&["0xBbb", "0xEee"]);
        let err = snap.resolve_winner_slots(&participants()).unwrap_err();
        assert_eq!(
            err,
            RevealError::WinnerNotFound {
                address: "0xEee".into()
            }
        );
    }

    #[test]
    fn test_lossy_resolution_guesses_by_rank() {
        let snap = snapshot(&["0xEee", "0xBbb", "0xFff"]);
        let slots = snap.resolve_winner_slots_lossy(&participants());
        // rank 0 % 4 = 0, resolved 1, rank 2 % 4 = 2
        assert_eq!(slots, vec![0, 1, 2]);
    }

    #[test]
    fn test_snapshot_deserializes_from_host_json() {
        let json = r#"{
            "max_participants": 10,
            "current_participants": 4,
            "num_winners": 2,
            "is_manual_selection": true,
            "is_active": false,
            "is_completed": true,
            "winners": ["0xBbb", "0xDdd"]
        }"#;
        let snap: DropSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snap.slot_count(), 4);
        let slots = snap.resolve_winner_slots(&participants()).unwrap();
        assert_eq!(slots, vec![1, 3]);
    }

    #[test]
    fn test_slot_count_capped_by_max() {
        let mut snap = snapshot(&[]);
        snap.current_participants = 12;
        assert_eq!(snap.slot_count(), 10);
    }

    #[test]
    fn test_validate_draw_rejections() {
        let mut snap = snapshot(&[]);
        snap.num_winners = 5;
        assert_eq!(
            snap.validate_draw(),
            Err(RevealError::DropNotReady {
                reason: "not enough participants"
            })
        );

        let mut snap = snapshot(&["0xAaa"]);
        snap.is_active = false;
        assert_eq!(
            snap.validate_draw(),
            Err(RevealError::DropNotReady {
                reason: "drop is not active"
            })
        );

        let mut snap = snapshot(&["0xAaa"]);
        snap.is_completed = true;
        assert_eq!(
            snap.validate_draw(),
            Err(RevealError::DropNotReady {
                reason: "drop is already completed"
            })
        );

        assert!(snapshot(&["0xAaa"]).validate_draw().is_ok());
    }
}
