//! Match rules state machines
//!
//! Both variants are driven by explicit transition calls. A call made in a
//! phase that does not permit it changes nothing and returns `false`.

pub mod gridiron;
pub mod pitch;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::Side;

pub use gridiron::{GridironPhase, GridironRules, PlayResult};
pub use pitch::{PitchPhase, PitchRules, RestartKind};

/// Running score tally
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub home: u32,
    pub away: u32,
}

impl Score {
    pub fn add(&mut self, side: Side, points: u32) {
        match side {
            Side::Home => self.home += points,
            Side::Away => self.away += points,
        }
    }

    pub fn get(&self, side: Side) -> u32 {
        match side {
            Side::Home => self.home,
            Side::Away => self.away,
        }
    }
}

/// Current phase of either rules variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    Pitch(PitchPhase),
    Gridiron(GridironPhase),
}

impl MatchPhase {
    /// Stable key for the HUD phase message
    pub fn message_key(self) -> &'static str {
        match self {
            MatchPhase::Pitch(phase) => phase.message_key(),
            MatchPhase::Gridiron(phase) => phase.message_key(),
        }
    }

    /// Whether the ball is in play
    pub fn is_live(self) -> bool {
        matches!(
            self,
            MatchPhase::Pitch(PitchPhase::Playing) | MatchPhase::Gridiron(GridironPhase::Live)
        )
    }
}

/// Condition detected during a tick, applied to the rules once the tick's
/// physics and contact passes are done
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RuleSignal {
    /// Ball crossed a goal line inside the goal mouth
    Goal { scorer: Side },
    /// Ball left the pitch anywhere else
    BallOut {
        pos: Vec2,
        last_toucher: Option<Side>,
    },
    Foul { pos: Vec2, fouled: Side },
    /// Gridiron play over with the ball dead at `y`
    PlayEnded { y: f32 },
    /// Forward pass hit the ground
    Incomplete,
    /// Gridiron punt landed or went out untouched by the receivers
    KickDead { y: f32 },
    /// A different side took control of the ball in play
    PossessionChanged { side: Side },
}

/// The rules machine for whichever sport is being played
#[derive(Debug, Clone)]
pub enum Rules {
    Pitch(PitchRules),
    Gridiron(GridironRules),
}

impl Rules {
    pub fn phase(&self) -> MatchPhase {
        match self {
            Rules::Pitch(rules) => MatchPhase::Pitch(rules.phase),
            Rules::Gridiron(rules) => MatchPhase::Gridiron(rules.phase),
        }
    }

    pub fn is_live(&self) -> bool {
        self.phase().is_live()
    }

    pub fn score(&self) -> Score {
        match self {
            Rules::Pitch(rules) => rules.score,
            Rules::Gridiron(rules) => rules.score,
        }
    }

    pub fn possession(&self) -> Side {
        match self {
            Rules::Pitch(rules) => rules.possession,
            Rules::Gridiron(rules) => rules.possession,
        }
    }

    pub fn pitch(&self) -> Option<&PitchRules> {
        match self {
            Rules::Pitch(rules) => Some(rules),
            Rules::Gridiron(_) => None,
        }
    }

    pub fn pitch_mut(&mut self) -> Option<&mut PitchRules> {
        match self {
            Rules::Pitch(rules) => Some(rules),
            Rules::Gridiron(_) => None,
        }
    }

    pub fn gridiron(&self) -> Option<&GridironRules> {
        match self {
            Rules::Gridiron(rules) => Some(rules),
            Rules::Pitch(_) => None,
        }
    }

    pub fn gridiron_mut(&mut self) -> Option<&mut GridironRules> {
        match self {
            Rules::Gridiron(rules) => Some(rules),
            Rules::Pitch(_) => None,
        }
    }

    /// Formation reference line: halfway for the pitch, line of scrimmage for gridiron
    pub fn reference_y(&self) -> f32 {
        match self {
            Rules::Pitch(_) => 0.0,
            Rules::Gridiron(rules) => rules.line_of_scrimmage,
        }
    }

    /// Resolve the opening toss
    pub fn coin_flip(&mut self, rng: &mut impl Rng) -> bool {
        match self {
            Rules::Pitch(rules) => rules.coin_flip(rng),
            Rules::Gridiron(rules) => rules.coin_flip(rng),
        }
    }

    /// Advance clocks and fire any due transition. Returns true if the phase changed.
    pub fn update(&mut self, dt: f32) -> bool {
        match self {
            Rules::Pitch(rules) => rules.update(dt),
            Rules::Gridiron(rules) => rules.update(dt),
        }
    }

    /// Apply a buffered signal. Signals for the other sport are ignored.
    pub fn apply(&mut self, signal: RuleSignal, rng: &mut impl Rng) -> bool {
        match (self, signal) {
            (Rules::Pitch(rules), RuleSignal::Goal { scorer }) => rules.goal_scored(scorer, rng),
            (Rules::Pitch(rules), RuleSignal::BallOut { pos, last_toucher }) => {
                rules.ball_out(pos, last_toucher)
            }
            (Rules::Pitch(rules), RuleSignal::Foul { pos, fouled }) => rules.foul_called(pos, fouled),
            (Rules::Pitch(rules), RuleSignal::PossessionChanged { side }) => {
                rules.set_possession(side)
            }
            (Rules::Gridiron(rules), RuleSignal::PlayEnded { y }) => rules.end_play(y).is_some(),
            (Rules::Gridiron(rules), RuleSignal::Incomplete) => rules.incomplete().is_some(),
            (Rules::Gridiron(rules), RuleSignal::KickDead { y }) => rules.kick_dead(y).is_some(),
            (Rules::Gridiron(rules), RuleSignal::PossessionChanged { side }) => {
                rules.turnover_in_play(side)
            }
            (_, signal) => {
                log::debug!("Ignoring {signal:?} for this sport");
                false
            }
        }
    }

    /// Clock text for the HUD
    pub fn clock_text(&self) -> String {
        match self {
            Rules::Pitch(rules) => rules.clock_text(),
            Rules::Gridiron(rules) => rules.clock_text(),
        }
    }

    /// Seconds until the next automatic transition, if one is scheduled
    pub fn pending_in(&self) -> Option<f32> {
        match self {
            Rules::Pitch(rules) => rules.pending_in(),
            Rules::Gridiron(rules) => rules.pending_in(),
        }
    }

    /// Secondary HUD line: half index or down and distance
    pub fn detail_text(&self) -> String {
        match self {
            Rules::Pitch(rules) => format!("Half {}", rules.half),
            Rules::Gridiron(rules) => rules.down_and_distance_text(),
        }
    }
}

/// Transition scheduled for simulated time `at`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub(crate) struct Pending<P> {
    pub at: f32,
    pub to: P,
}

/// "MM:SS" for a number of seconds
pub(crate) fn format_clock(seconds: f32) -> String {
    let total = seconds.max(0.0) as u32;
    format!("{:02}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_score_tally() {
        let mut score = Score::default();
        score.add(Side::Away, 6);
        score.add(Side::Away, 2);
        score.add(Side::Home, 1);
        assert_eq!(score.get(Side::Away), 8);
        assert_eq!(score.get(Side::Home), 1);
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0.0), "00:00");
        assert_eq!(format_clock(125.7), "02:05");
        assert_eq!(format_clock(-3.0), "00:00");
    }

    #[test]
    fn test_signals_for_other_sport_are_ignored() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut rules = Rules::Pitch(PitchRules::new(tuning.pitch.clone()));
        let before = rules.phase();
        assert!(!rules.apply(RuleSignal::PlayEnded { y: 10.0 }, &mut rng));
        assert!(!rules.apply(RuleSignal::Incomplete, &mut rng));
        assert!(!rules.apply(RuleSignal::KickDead { y: 0.0 }, &mut rng));
        assert_eq!(rules.phase(), before);

        let mut rules = Rules::Gridiron(GridironRules::new(tuning.gridiron.clone()));
        assert!(!rules.apply(RuleSignal::Goal { scorer: Side::Home }, &mut rng));
    }

    #[test]
    fn test_live_phases() {
        assert!(MatchPhase::Pitch(PitchPhase::Playing).is_live());
        assert!(MatchPhase::Gridiron(GridironPhase::Live).is_live());
        assert!(!MatchPhase::Pitch(PitchPhase::Penalty).is_live());
        assert!(!MatchPhase::Gridiron(GridironPhase::Whistle).is_live());
    }
}
