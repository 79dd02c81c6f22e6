//! Pitch (association football) rules

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{Pending, Score, format_clock};
use crate::consts::{
    GOAL_AREA_DEPTH, PENALTY_AREA_DEPTH, PENALTY_AREA_HALF_WIDTH, PENALTY_SPOT_DISTANCE,
    PITCH_HALF_LENGTH, PITCH_HALF_WIDTH,
};
use crate::sim::entity::Side;
use crate::tuning::PitchParams;

/// How play restarts after the ball leaves the pitch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RestartKind {
    ThrowIn,
    CornerKick,
    GoalKick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PitchPhase {
    /// Teams in formation, waiting for the kickoff
    Kickoff,
    Playing,
    /// Celebration before the next kickoff
    GoalScored,
    OutOfBounds(RestartKind),
    FreeKick,
    Penalty,
    HalfTime,
    FullTime,
}

impl PitchPhase {
    pub fn message_key(self) -> &'static str {
        match self {
            PitchPhase::Kickoff => "kickoff",
            PitchPhase::Playing => "playing",
            PitchPhase::GoalScored => "goal",
            PitchPhase::OutOfBounds(RestartKind::ThrowIn) => "throw_in",
            PitchPhase::OutOfBounds(RestartKind::CornerKick) => "corner_kick",
            PitchPhase::OutOfBounds(RestartKind::GoalKick) => "goal_kick",
            PitchPhase::FreeKick => "free_kick",
            PitchPhase::Penalty => "penalty",
            PitchPhase::HalfTime => "half_time",
            PitchPhase::FullTime => "full_time",
        }
    }

    /// Dead-ball phases that end with the ball handed to one side
    pub fn is_restart(self) -> bool {
        matches!(
            self,
            PitchPhase::OutOfBounds(_) | PitchPhase::FreeKick | PitchPhase::Penalty
        )
    }
}

/// Kickoff, restart and clock bookkeeping for a pitch match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PitchRules {
    pub phase: PitchPhase,
    /// Side awarded the ball (or holding it in open play)
    pub possession: Side,
    /// Side taking the next kickoff
    pub kicking: Side,
    pub score: Score,
    /// Seconds played in the current half
    pub clock: f32,
    /// 1 or 2
    pub half: u8,
    /// Simulated seconds since the rules were created
    pub time: f32,
    /// Where the ball is placed for the pending restart
    pub restart_spot: Vec2,
    opening_kicker: Side,
    tossed: bool,
    pending: Option<Pending<PitchPhase>>,
    params: PitchParams,
}

impl PitchRules {
    pub fn new(params: PitchParams) -> Self {
        Self {
            phase: PitchPhase::Kickoff,
            possession: Side::Home,
            kicking: Side::Home,
            score: Score::default(),
            clock: 0.0,
            half: 1,
            time: 0.0,
            restart_spot: Vec2::ZERO,
            opening_kicker: Side::Home,
            tossed: false,
            pending: None,
            params,
        }
    }

    /// Decide the opening kicker and schedule the kickoff
    pub fn coin_flip(&mut self, rng: &mut impl Rng) -> bool {
        if self.tossed || self.phase != PitchPhase::Kickoff {
            return false;
        }
        let side = if rng.random::<bool>() {
            Side::Home
        } else {
            Side::Away
        };
        self.tossed = true;
        self.opening_kicker = side;
        self.kicking = side;
        self.possession = side;
        self.restart_spot = Vec2::ZERO;
        log::info!("{side:?} wins the toss and kicks off");
        self.schedule(self.params.kickoff_delay, PitchPhase::Playing);
        true
    }

    /// Record a goal for `scorer` and start the celebration
    pub fn goal_scored(&mut self, scorer: Side, rng: &mut impl Rng) -> bool {
        if self.phase != PitchPhase::Playing {
            return false;
        }
        self.score.add(scorer, 1);
        self.kicking = scorer.opponent();
        self.possession = scorer.opponent();
        self.restart_spot = Vec2::ZERO;
        log::info!(
            "GOAL {scorer:?}! {} - {}",
            self.score.home,
            self.score.away
        );

        let jitter = if self.params.celebration_jitter > 0.0 {
            rng.random_range(0.0..self.params.celebration_jitter)
        } else {
            0.0
        };
        self.enter(PitchPhase::GoalScored);
        self.schedule(self.params.celebration_delay + jitter, PitchPhase::Kickoff);
        true
    }

    /// Classify a ball leaving the pitch at `pos`
    pub fn ball_out(&mut self, pos: Vec2, last_toucher: Option<Side>) -> bool {
        if self.phase != PitchPhase::Playing {
            return false;
        }

        let (kind, awarded, spot) = if pos.y.abs() >= PITCH_HALF_LENGTH {
            let end = pos.y.signum();
            // Home attacks the +y goal line
            let attacking = if end > 0.0 { Side::Home } else { Side::Away };
            if last_toucher == Some(attacking) {
                let corner = Vec2::new(pos.x.signum() * PITCH_HALF_WIDTH, end * PITCH_HALF_LENGTH);
                (RestartKind::CornerKick, attacking, corner)
            } else {
                let goal_kick = Vec2::new(0.0, end * (PITCH_HALF_LENGTH - GOAL_AREA_DEPTH));
                (RestartKind::GoalKick, attacking.opponent(), goal_kick)
            }
        } else {
            let awarded = last_toucher.map_or(self.possession.opponent(), Side::opponent);
            let spot = Vec2::new(
                pos.x.signum() * PITCH_HALF_WIDTH,
                pos.y.clamp(-PITCH_HALF_LENGTH, PITCH_HALF_LENGTH),
            );
            (RestartKind::ThrowIn, awarded, spot)
        };

        self.possession = awarded;
        self.restart_spot = spot;
        self.enter(PitchPhase::OutOfBounds(kind));
        self.schedule(self.params.restart_delay, PitchPhase::Playing);
        true
    }

    /// Award a free kick or, inside the defending penalty area, a penalty
    pub fn foul_called(&mut self, pos: Vec2, fouled: Side) -> bool {
        if self.phase != PitchPhase::Playing {
            return false;
        }

        let dir = fouled.attack_dir();
        let in_area = pos.x.abs() <= PENALTY_AREA_HALF_WIDTH
            && pos.y * dir >= PITCH_HALF_LENGTH - PENALTY_AREA_DEPTH;

        self.possession = fouled;
        if in_area {
            self.restart_spot = Vec2::new(0.0, dir * (PITCH_HALF_LENGTH - PENALTY_SPOT_DISTANCE));
            self.enter(PitchPhase::Penalty);
        } else {
            self.restart_spot = pos;
            self.enter(PitchPhase::FreeKick);
        }
        self.schedule(self.params.restart_delay, PitchPhase::Playing);
        true
    }

    /// Open-play change of possession
    pub fn set_possession(&mut self, side: Side) -> bool {
        if self.phase != PitchPhase::Playing || self.possession == side {
            return false;
        }
        self.possession = side;
        true
    }

    /// Fire the pending transition now instead of waiting for its delay
    pub fn resume(&mut self) -> bool {
        match self.pending.take() {
            Some(pending) => {
                self.enter(pending.to);
                true
            }
            None => false,
        }
    }

    /// Advance the clocks by `dt`. Returns true if the phase changed.
    pub fn update(&mut self, dt: f32) -> bool {
        let before = self.phase;
        self.time += dt;

        if self.phase == PitchPhase::Playing {
            self.clock += dt;
            if self.clock >= self.params.effective_half_duration() {
                self.clock = self.params.effective_half_duration();
                if self.half == 1 {
                    self.enter(PitchPhase::HalfTime);
                    self.schedule(self.params.half_time_break, PitchPhase::Kickoff);
                } else {
                    self.enter(PitchPhase::FullTime);
                    log::info!(
                        "Full time: {} - {}",
                        self.score.home,
                        self.score.away
                    );
                }
            }
        }

        if let Some(pending) = self.pending.filter(|p| self.time >= p.at) {
            self.pending = None;
            self.enter(pending.to);
        }

        self.phase != before
    }

    /// Restart spot for the current stoppage
    pub fn restart_spot(&self) -> Option<Vec2> {
        match self.phase {
            PitchPhase::Playing | PitchPhase::GoalScored | PitchPhase::FullTime => None,
            _ => Some(self.restart_spot),
        }
    }

    pub fn clock_text(&self) -> String {
        let offset = f32::from(self.half - 1) * self.params.effective_half_duration();
        format_clock(self.clock + offset)
    }

    /// Seconds until the pending transition fires
    pub fn pending_in(&self) -> Option<f32> {
        self.pending.map(|p| (p.at - self.time).max(0.0))
    }

    fn schedule(&mut self, delay: f32, to: PitchPhase) {
        self.pending = Some(Pending {
            at: self.time + delay,
            to,
        });
    }

    fn enter(&mut self, phase: PitchPhase) {
        log::info!("Pitch phase {:?} -> {:?}", self.phase, phase);
        let from = self.phase;
        self.phase = phase;
        self.pending = None;

        match phase {
            PitchPhase::Kickoff => {
                if from == PitchPhase::HalfTime {
                    self.half = 2;
                    self.clock = 0.0;
                    self.kicking = self.opening_kicker.opponent();
                }
                self.possession = self.kicking;
                self.restart_spot = Vec2::ZERO;
                self.schedule(self.params.kickoff_delay, PitchPhase::Playing);
            }
            PitchPhase::HalfTime => {
                self.restart_spot = Vec2::ZERO;
            }
            _ => {}
        }
    }
}
