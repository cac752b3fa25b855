//! Reveal sequencing state machine
//!
//! Drops one ball per winner, in prize-rank order, and only starts rank
//! `i + 1` once rank `i` has settled. The ordering invariant is enforced
//! structurally: there is exactly one ball slot, refilled on landing.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ball::Ball;
use super::board::PegLayout;
use super::step::advance;
use crate::consts::*;
use crate::error::RevealError;

/// Current phase of a reveal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevealPhase {
    /// No reveal running
    Idle,
    /// Ball for winner rank `index + 1` is falling
    Dropping(usize),
    /// All winners revealed
    Complete,
}

/// How the winner data reached us
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevealOrigin {
    /// Host pressed the draw button and we received fresh results
    Triggered,
    /// The drop was already completed when we arrived
    Observed,
}

/// One "winners announced" occurrence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealJob {
    /// Winner slot indices, prize rank order (rank 1 first)
    pub winner_slots: Vec<u32>,
    pub origin: RevealOrigin,
}

impl RevealJob {
    pub fn new(winner_slots: Vec<u32>, origin: RevealOrigin) -> Self {
        Self {
            winner_slots,
            origin,
        }
    }
}

/// Events drained by the host view once per frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RevealEvent {
    /// Ball for `rank` landed on `slot`; highlight it
    WinnerAnimated { slot: u32, rank: u32 },
    /// The whole sequence finished
    RevealComplete { slots: Vec<u32>, message: String },
}

/// Drives repeated physics runs, one per winner rank.
#[derive(Debug, Clone)]
pub struct RevealSequencer {
    phase: RevealPhase,
    job: Option<RevealJob>,
    ball: Option<Ball>,
    /// `(slot, rank)` pairs landed so far, for incremental highlighting
    animated: Vec<(u32, u32)>,
    events: Vec<RevealEvent>,
    /// Seed for launch jitter; reveals replay tick-for-tick per drop
    seed: u64,
    trail_cap: usize,
}

impl RevealSequencer {
    pub fn new(trail_cap: usize) -> Self {
        Self {
            phase: RevealPhase::Idle,
            job: None,
            ball: None,
            animated: Vec::new(),
            events: Vec::new(),
            seed: 0,
            trail_cap,
        }
    }

    pub fn phase(&self) -> RevealPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        matches!(self.phase, RevealPhase::Dropping(_))
    }

    /// The currently falling ball, if any (for rendering)
    pub fn ball(&self) -> Option<&Ball> {
        self.ball.as_ref()
    }

    /// Winners landed so far, `(slot, rank)` in landing order
    pub fn animated_winners(&self) -> &[(u32, u32)] {
        &self.animated
    }

    pub fn set_seed(&mut self, seed: u64) {
        self.seed = seed;
    }

    pub fn set_trail_cap(&mut self, trail_cap: usize) {
        self.trail_cap = trail_cap;
    }

    /// Begin a new reveal. A zero-winner job is a no-op; slot indices outside
    /// the board are rejected, never clamped. Ignored while a reveal is
    /// already in flight.
    pub fn start_reveal(&mut self, job: RevealJob, layout: &PegLayout) -> Result<(), RevealError> {
        if job.winner_slots.is_empty() {
            log::debug!("reveal with zero winners, staying idle");
            return Ok(());
        }
        if self.is_active() {
            log::debug!("reveal already in progress, ignoring new job");
            return Ok(());
        }
        Self::validate_slots(&job.winner_slots, layout)?;

        log::info!(
            "starting reveal of {} winner(s) ({:?})",
            job.winner_slots.len(),
            job.origin
        );
        self.animated.clear();
        self.spawn_ball(&job, 0, layout);
        self.job = Some(job);
        self.phase = RevealPhase::Dropping(0);
        Ok(())
    }

    /// Degraded mode: emit every landing and the completion at once, with no
    /// animation. Used for reduced motion and as the fallback on any
    /// internal fault, so the UI never sticks mid-animation.
    pub fn reveal_instantly(
        &mut self,
        job: RevealJob,
        layout: &PegLayout,
    ) -> Result<(), RevealError> {
        if job.winner_slots.is_empty() {
            return Ok(());
        }
        if self.is_active() {
            return Ok(());
        }
        Self::validate_slots(&job.winner_slots, layout)?;

        self.animated.clear();
        for (i, &slot) in job.winner_slots.iter().enumerate() {
            let rank = i as u32 + 1;
            self.animated.push((slot, rank));
            self.events.push(RevealEvent::WinnerAnimated { slot, rank });
        }
        self.events.push(RevealEvent::RevealComplete {
            slots: job.winner_slots.clone(),
            message: compose_message(&job.winner_slots),
        });
        self.job = Some(job);
        self.ball = None;
        self.phase = RevealPhase::Complete;
        Ok(())
    }

    /// Advance the in-flight ball by one fixed timestep and run the state
    /// machine on its landing.
    pub fn tick(&mut self, layout: &PegLayout, dt: f32) {
        let RevealPhase::Dropping(index) = self.phase else {
            return;
        };
        let Some(ball) = self.ball.as_mut() else {
            return;
        };

        advance(ball, layout, dt);
        if !ball.settled {
            return;
        }

        let slot = ball.target_slot;
        let rank = index as u32 + 1;
        self.ball = None;
        self.animated.push((slot, rank));
        self.events.push(RevealEvent::WinnerAnimated { slot, rank });

        let Some(job) = self.job.clone() else {
            // Unreachable by construction; recover to Idle rather than stall.
            self.phase = RevealPhase::Idle;
            return;
        };
        let next = index + 1;
        if next < job.winner_slots.len() {
            self.spawn_ball(&job, next, layout);
            self.phase = RevealPhase::Dropping(next);
        } else {
            let message = compose_message(&job.winner_slots);
            log::info!("reveal complete: {message}");
            self.events.push(RevealEvent::RevealComplete {
                slots: job.winner_slots,
                message,
            });
            self.phase = RevealPhase::Complete;
        }
    }

    /// Take all pending events, oldest first.
    pub fn drain_events(&mut self) -> Vec<RevealEvent> {
        std::mem::take(&mut self.events)
    }

    /// Force back to `Idle`, discarding the job, any in-flight ball, and all
    /// pending events. The session reset boundary is the only caller.
    pub fn reset(&mut self) {
        if self.phase != RevealPhase::Idle {
            log::info!("reveal reset from {:?}", self.phase);
        }
        self.phase = RevealPhase::Idle;
        self.job = None;
        self.ball = None;
        self.animated.clear();
        self.events.clear();
    }

    fn validate_slots(slots: &[u32], layout: &PegLayout) -> Result<(), RevealError> {
        for &slot in slots {
            if slot >= layout.slot_count {
                return Err(RevealError::InvalidWinnerSlot {
                    slot,
                    slot_count: layout.slot_count,
                });
            }
        }
        Ok(())
    }

    fn spawn_ball(&mut self, job: &RevealJob, index: usize, layout: &PegLayout) {
        // One RNG stream per (drop, rank): ranks take distinct paths, and the
        // same drop replays the same paths.
        let mut rng = Pcg32::seed_from_u64(self.seed.wrapping_add(index as u64));
        let jitter = rng.random_range(-LAUNCH_JITTER..=LAUNCH_JITTER);
        let vx = rng.random_range(-LAUNCH_VX_JITTER..=LAUNCH_VX_JITTER);
        self.ball = Some(Ball::launch(
            layout,
            job.winner_slots[index],
            jitter,
            vx,
            self.trail_cap,
        ));
    }
}

/// Human-readable ranking summary, 1-indexed slots with ordinal ranks.
pub fn compose_message(slots: &[u32]) -> String {
    let parts: Vec<String> = slots
        .iter()
        .enumerate()
        .map(|(i, &slot)| format!("#{} ({})", slot + 1, ordinal(i as u32 + 1)))
        .collect();
    format!("Winners: {}!", parts.join(", "))
}

/// Ordinal suffix: 1st, 2nd, 3rd, 4th, ... with the 11th/12th/13th cases
pub fn ordinal(rank: u32) -> String {
    let suffix = match (rank % 10, rank % 100) {
        (1, r) if r != 11 => "st",
        (2, r) if r != 12 => "nd",
        (3, r) if r != 13 => "rd",
        _ => "th",
    };
    format!("{rank}{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::board::BoardConfig;

    fn layout() -> PegLayout {
        PegLayout::build(&BoardConfig::new(10, 8, 640.0, 560.0)).unwrap()
    }

    fn run_until_idle_or_complete(seq: &mut RevealSequencer, layout: &PegLayout) -> Vec<RevealEvent> {
        let mut events = Vec::new();
        // Generous bound: cap ticks per ball, per winner
        for _ in 0..(MAX_SETTLE_TICKS as usize * 4) {
            seq.tick(layout, SIM_DT);
            events.extend(seq.drain_events());
            if seq.phase() != RevealPhase::Idle && !seq.is_active() {
                break;
            }
        }
        events
    }

    #[test]
    fn test_winners_revealed_in_rank_order() {
        let layout = layout();
        let mut seq = RevealSequencer::new(TRAIL_LENGTH);
        seq.set_seed(42);
        seq.start_reveal(
            RevealJob::new(vec![3, 7, 1], RevealOrigin::Triggered),
            &layout,
        )
        .unwrap();
        assert_eq!(seq.phase(), RevealPhase::Dropping(0));

        let events = run_until_idle_or_complete(&mut seq, &layout);
        assert_eq!(seq.phase(), RevealPhase::Complete);

        let landings: Vec<(u32, u32)> = events
            .iter()
            .filter_map(|e| match e {
                RevealEvent::WinnerAnimated { slot, rank } => Some((*slot, *rank)),
                _ => None,
            })
            .collect();
        assert_eq!(landings, vec![(3, 1), (7, 2), (1, 3)]);

        let completions: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                RevealEvent::RevealComplete { slots, message } => {
                    Some((slots.clone(), message.clone()))
                }
                _ => None,
            })
            .collect();
        assert_eq!(completions.len(), 1);
        assert_eq!(completions[0].0, vec![3, 7, 1]);
        assert_eq!(completions[0].1, "Winners: #4 (1st), #8 (2nd), #2 (3rd)!");
        // Completion came after every landing
        let last = events.last().unwrap();
        assert!(matches!(last, RevealEvent::RevealComplete { .. }));
    }

    #[test]
    fn test_zero_winners_is_a_noop() {
        let layout = layout();
        let mut seq = RevealSequencer::new(TRAIL_LENGTH);
        seq.start_reveal(RevealJob::new(vec![], RevealOrigin::Observed), &layout)
            .unwrap();
        assert_eq!(seq.phase(), RevealPhase::Idle);
        seq.tick(&layout, SIM_DT);
        assert!(seq.drain_events().is_empty());
    }

    #[test]
    fn test_out_of_board_slot_rejected() {
        let layout = layout(); // 8 slots
        let mut seq = RevealSequencer::new(TRAIL_LENGTH);
        let err = seq
            .start_reveal(RevealJob::new(vec![2, 8], RevealOrigin::Triggered), &layout)
            .unwrap_err();
        assert_eq!(
            err,
            RevealError::InvalidWinnerSlot {
                slot: 8,
                slot_count: 8
            }
        );
        assert_eq!(seq.phase(), RevealPhase::Idle);
    }

    #[test]
    fn test_second_job_ignored_while_dropping() {
        let layout = layout();
        let mut seq = RevealSequencer::new(TRAIL_LENGTH);
        seq.start_reveal(RevealJob::new(vec![3, 7], RevealOrigin::Triggered), &layout)
            .unwrap();
        seq.start_reveal(RevealJob::new(vec![0], RevealOrigin::Triggered), &layout)
            .unwrap();
        let events = run_until_idle_or_complete(&mut seq, &layout);
        // First job ran to completion; the second never started
        let landings: Vec<u32> = events
            .iter()
            .filter_map(|e| match e {
                RevealEvent::WinnerAnimated { slot, .. } => Some(*slot),
                _ => None,
            })
            .collect();
        assert_eq!(landings, vec![3, 7]);
    }

    #[test]
    fn test_instant_reveal_emits_everything_at_once() {
        let layout = layout();
        let mut seq = RevealSequencer::new(TRAIL_LENGTH);
        seq.reveal_instantly(RevealJob::new(vec![5, 2], RevealOrigin::Observed), &layout)
            .unwrap();
        assert_eq!(seq.phase(), RevealPhase::Complete);
        assert!(seq.ball().is_none());
        let events = seq.drain_events();
        assert_eq!(events.len(), 3);
        assert_eq!(
            events[2],
            RevealEvent::RevealComplete {
                slots: vec![5, 2],
                message: "Winners: #6 (1st), #3 (2nd)!".into()
            }
        );
    }

    #[test]
    fn test_replay_is_deterministic_per_seed() {
        let layout = layout();
        let job = RevealJob::new(vec![4], RevealOrigin::Triggered);

        let mut a = RevealSequencer::new(TRAIL_LENGTH);
        a.set_seed(7);
        a.start_reveal(job.clone(), &layout).unwrap();
        let mut b = RevealSequencer::new(TRAIL_LENGTH);
        b.set_seed(7);
        b.start_reveal(job, &layout).unwrap();

        // 1 second in: less than free-fall time to the band, so the ball is
        // still airborne in both runs
        for _ in 0..120 {
            a.tick(&layout, SIM_DT);
            b.tick(&layout, SIM_DT);
        }
        let (pa, pb) = (a.ball().unwrap().pos, b.ball().unwrap().pos);
        assert_eq!(pa, pb);
    }

    #[test]
    fn test_ordinal_suffixes() {
        assert_eq!(ordinal(1), "1st");
        assert_eq!(ordinal(2), "2nd");
        assert_eq!(ordinal(3), "3rd");
        assert_eq!(ordinal(4), "4th");
        assert_eq!(ordinal(11), "11th");
        assert_eq!(ordinal(12), "12th");
        assert_eq!(ordinal(13), "13th");
        assert_eq!(ordinal(21), "21st");
        assert_eq!(ordinal(102), "102nd");
    }
}
