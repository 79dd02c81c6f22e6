//! Gridiron (American football) rules
//!
//! Field coordinates run along y with goal lines at ±50. Home attacks +y.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{Pending, Score, format_clock};
use crate::consts::GRIDIRON_GOAL_LINE;
use crate::sim::entity::Side;
use crate::tuning::GridironParams;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GridironPhase {
    CoinFlip,
    Kickoff,
    /// Huddle and line-up before the snap
    PreSnap,
    /// Ball snapped, play in progress
    Live,
    /// Play over, waiting for the next huddle
    Whistle,
}

impl GridironPhase {
    pub fn message_key(self) -> &'static str {
        match self {
            GridironPhase::CoinFlip => "coin_flip",
            GridironPhase::Kickoff => "kickoff",
            GridironPhase::PreSnap => "pre_snap",
            GridironPhase::Live => "live",
            GridironPhase::Whistle => "whistle",
        }
    }
}

/// What a finished play did to the drive
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PlayResult {
    Touchdown { scorer: Side },
    Safety { scorer: Side },
    FirstDown,
    /// Short of the marker; the next down is `down`
    Gain { yards: f32, down: u8 },
    /// Out of downs, the other side takes over at the spot
    TurnoverOnDowns,
    /// Ball changed hands during the play; new drive for the side holding it
    ChangeOfPossession,
}

/// Down, distance, possession and score bookkeeping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridironRules {
    pub phase: GridironPhase,
    /// Offence
    pub possession: Side,
    /// Side kicking off next
    pub kicking: Side,
    pub score: Score,
    pub line_of_scrimmage: f32,
    pub first_down_marker: f32,
    pub down: u8,
    /// Yards still needed for a first down
    pub distance: f32,
    /// Simulated seconds since the rules were created
    pub time: f32,
    pub last_result: Option<PlayResult>,
    /// Possession flipped during the current play
    changed_hands: bool,
    pending: Option<Pending<GridironPhase>>,
    params: GridironParams,
}

impl GridironRules {
    pub fn new(params: GridironParams) -> Self {
        Self {
            phase: GridironPhase::CoinFlip,
            possession: Side::Home,
            kicking: Side::Away,
            score: Score::default(),
            line_of_scrimmage: 0.0,
            first_down_marker: 0.0,
            down: 1,
            distance: params.first_down_distance,
            time: 0.0,
            last_result: None,
            changed_hands: false,
            pending: None,
            params,
        }
    }

    /// The toss winner receives
    pub fn coin_flip(&mut self, rng: &mut impl Rng) -> bool {
        if self.phase != GridironPhase::CoinFlip {
            return false;
        }
        let winner = if rng.random::<bool>() {
            Side::Home
        } else {
            Side::Away
        };
        self.possession = winner;
        self.kicking = winner.opponent();
        log::info!("{winner:?} wins the toss and receives");
        self.enter(GridironPhase::Kickoff);
        true
    }

    /// Kick off to the receiving side
    ///
    /// `return_spot` is where the returner was downed; `None` or a spot in the
    /// receiving end zone is a touchback.
    pub fn kickoff(&mut self, return_spot: Option<f32>) -> bool {
        if self.phase != GridironPhase::Kickoff {
            return false;
        }
        let receiving = self.kicking.opponent();
        let spot = self.receiving_spot(receiving, return_spot);
        self.start_drive(receiving, spot);
        true
    }

    /// A punt died untouched at `y`: the receivers take over there
    pub fn kick_dead(&mut self, y: f32) -> Option<PlayResult> {
        if self.phase != GridironPhase::Live {
            return None;
        }
        let receiving = self.possession.opponent();
        let spot = self.receiving_spot(receiving, Some(y));
        log::info!("Punt dead at {y:.0}, {receiving:?} ball at {spot:.0}");
        self.possession = receiving;
        self.down = 1;
        self.changed_hands = false;
        self.set_series(spot);
        self.enter(GridironPhase::Whistle);
        let result = PlayResult::ChangeOfPossession;
        self.last_result = Some(result);
        Some(result)
    }

    /// Where `receiving` starts after a kick dead at `y`; touchback when it
    /// died in their end zone or was never fielded
    fn receiving_spot(&self, receiving: Side, y: Option<f32>) -> f32 {
        let dir = receiving.attack_dir();
        match y {
            Some(y) if y * dir > -GRIDIRON_GOAL_LINE => {
                y.clamp(-GRIDIRON_GOAL_LINE + 1.0, GRIDIRON_GOAL_LINE - 1.0)
            }
            _ => -dir * (GRIDIRON_GOAL_LINE - self.params.touchback_distance),
        }
    }

    /// First and ten for `side` at `spot`
    pub fn start_drive(&mut self, side: Side, spot: f32) {
        self.possession = side;
        self.down = 1;
        self.changed_hands = false;
        self.set_series(spot);
        log::info!(
            "{side:?} ball at {:.0}, {}",
            spot,
            self.down_and_distance_text()
        );
        self.enter(GridironPhase::PreSnap);
    }

    pub fn snap(&mut self) -> bool {
        if self.phase != GridironPhase::PreSnap {
            return false;
        }
        self.changed_hands = false;
        self.enter(GridironPhase::Live);
        true
    }

    /// The ball changed hands mid-play (interception or recovery)
    pub fn turnover_in_play(&mut self, side: Side) -> bool {
        if self.phase != GridironPhase::Live || self.possession == side {
            return false;
        }
        log::info!("Turnover! {side:?} takes over in play");
        self.possession = side;
        self.changed_hands = !self.changed_hands;
        true
    }

    /// Incomplete pass: the play ends at the line of scrimmage
    pub fn incomplete(&mut self) -> Option<PlayResult> {
        if self.phase != GridironPhase::Live {
            return None;
        }
        self.end_play(self.line_of_scrimmage)
    }

    /// End the live play with the ball dead at field coordinate `y`
    pub fn end_play(&mut self, y: f32) -> Option<PlayResult> {
        if self.phase != GridironPhase::Live {
            return None;
        }

        let offence = self.possession;
        let dir = offence.attack_dir();
        let advance = y * dir;

        let result = if advance >= GRIDIRON_GOAL_LINE {
            self.score.add(offence, self.params.touchdown_points);
            self.kicking = offence;
            log::info!(
                "TOUCHDOWN {offence:?}! {} - {}",
                self.score.home,
                self.score.away
            );
            self.enter(GridironPhase::Kickoff);
            PlayResult::Touchdown { scorer: offence }
        } else if advance <= -GRIDIRON_GOAL_LINE {
            let scorer = offence.opponent();
            self.score.add(scorer, self.params.safety_points);
            self.kicking = offence;
            log::info!("Safety, {scorer:?} +{}", self.params.safety_points);
            self.enter(GridironPhase::Kickoff);
            PlayResult::Safety { scorer }
        } else if self.changed_hands {
            self.down = 1;
            self.changed_hands = false;
            self.set_series(y);
            self.enter(GridironPhase::Whistle);
            PlayResult::ChangeOfPossession
        } else if (y - self.first_down_marker) * dir >= 0.0 {
            self.down = 1;
            self.set_series(y);
            log::info!("First down at {y:.0}");
            self.enter(GridironPhase::Whistle);
            PlayResult::FirstDown
        } else {
            let yards = (y - self.line_of_scrimmage) * dir;
            self.down += 1;
            if self.down > self.params.max_downs {
                log::info!("Turnover on downs at {y:.0}");
                self.possession = offence.opponent();
                self.down = 1;
                self.set_series(y);
                self.enter(GridironPhase::Whistle);
                PlayResult::TurnoverOnDowns
            } else {
                self.line_of_scrimmage = y;
                self.distance = (self.first_down_marker - y) * dir;
                self.enter(GridironPhase::Whistle);
                PlayResult::Gain {
                    yards,
                    down: self.down,
                }
            }
        };

        self.last_result = Some(result);
        Some(result)
    }

    /// Advance time by `dt`. Returns true if the phase changed.
    pub fn update(&mut self, dt: f32) -> bool {
        let before = self.phase;
        self.time += dt;

        if let Some(pending) = self.pending.filter(|p| self.time >= p.at) {
            self.pending = None;
            match pending.to {
                // Kickoffs not returned in play go for a touchback
                GridironPhase::PreSnap if self.phase == GridironPhase::Kickoff => {
                    self.kickoff(None);
                }
                GridironPhase::Live => {
                    self.snap();
                }
                to => self.enter(to),
            }
        }

        self.phase != before
    }

    pub fn clock_text(&self) -> String {
        format_clock(self.time)
    }

    /// "3rd & 7", or "1st & Goal" when the marker sits on the goal line
    pub fn down_and_distance_text(&self) -> String {
        let ordinal = match self.down {
            1 => "1st",
            2 => "2nd",
            3 => "3rd",
            _ => "4th",
        };
        let goal_to_go = self.first_down_marker.abs() >= GRIDIRON_GOAL_LINE;
        if goal_to_go {
            format!("{ordinal} & Goal")
        } else {
            format!("{ordinal} & {:.0}", self.distance.max(0.0).ceil())
        }
    }

    /// New set of downs from `spot` for the current possession
    /// Seconds until the pending transition fires
    pub fn pending_in(&self) -> Option<f32> {
        self.pending.map(|p| (p.at - self.time).max(0.0))
    }

    fn set_series(&mut self, spot: f32) {
        let dir = self.possession.attack_dir();
        self.line_of_scrimmage = spot;
        let marker = spot + dir * self.params.first_down_distance;
        self.first_down_marker = if marker * dir > GRIDIRON_GOAL_LINE {
            dir * GRIDIRON_GOAL_LINE
        } else {
            marker
        };
        self.distance = (self.first_down_marker - spot) * dir;
    }

    fn enter(&mut self, phase: GridironPhase) {
        log::info!("Gridiron phase {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
        self.pending = match phase {
            GridironPhase::Kickoff | GridironPhase::Whistle => Some(Pending {
                at: self.time + self.params.whistle_delay,
                to: GridironPhase::PreSnap,
            }),
            GridironPhase::PreSnap => Some(Pending {
                at: self.time + self.params.huddle_time,
                to: GridironPhase::Live,
            }),
            GridironPhase::CoinFlip | GridironPhase::Live => None,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn drive(side: Side, spot: f32) -> GridironRules {
        let mut rules = GridironRules::new(GridironParams::default());
        rules.start_drive(side, spot);
        rules
    }

    fn run_play(rules: &mut GridironRules, y: f32) -> PlayResult {
        assert!(rules.snap(), "snap from {:?}", rules.phase);
        let result = rules.end_play(y).unwrap();
        // Let the whistle clear
        rules.update(GridironParams::default().whistle_delay);
        result
    }

    #[test]
    fn test_first_down_resets_series() {
        let mut rules = drive(Side::Home, -40.0);
        assert_eq!(rules.down, 1);
        assert_eq!(rules.distance, 10.0);
        assert_eq!(rules.first_down_marker, -30.0);

        let result = run_play(&mut rules, -28.0);
        assert_eq!(result, PlayResult::FirstDown);
        assert_eq!(rules.down, 1);
        assert_eq!(rules.distance, 10.0);
        assert_eq!(rules.line_of_scrimmage, -28.0);
        assert_eq!(rules.first_down_marker, -18.0);
        assert_eq!(rules.phase, GridironPhase::PreSnap);
    }

    #[test]
    fn test_short_gain_advances_down() {
        let mut rules = drive(Side::Home, -40.0);
        let result = run_play(&mut rules, -37.0);
        assert_eq!(result, PlayResult::Gain { yards: 3.0, down: 2 });
        assert_eq!(rules.distance, 7.0);
        assert_eq!(rules.down_and_distance_text(), "2nd & 7");
    }

    #[test]
    fn test_turnover_on_downs() {
        let mut rules = drive(Side::Home, -40.0);
        for (i, y) in [-39.0, -38.0, -37.0].into_iter().enumerate() {
            let result = run_play(&mut rules, y);
            assert!(matches!(result, PlayResult::Gain { .. }), "play {i}");
            assert_eq!(rules.possession, Side::Home);
        }
        let result = run_play(&mut rules, -36.0);
        assert_eq!(result, PlayResult::TurnoverOnDowns);
        assert_eq!(rules.possession, Side::Away);
        assert_eq!(rules.down, 1);
        assert_eq!(rules.line_of_scrimmage, -36.0);
        // Away attacks -y
        assert_eq!(rules.first_down_marker, -46.0);
    }

    #[test]
    fn test_touchdown_scores_and_kicks_off() {
        let mut rules = drive(Side::Home, 40.0);
        assert!(rules.snap());
        let result = rules.end_play(50.0).unwrap();
        assert_eq!(result, PlayResult::Touchdown { scorer: Side::Home });
        assert_eq!(rules.score.home, 6);
        assert_eq!(rules.phase, GridironPhase::Kickoff);
        assert_eq!(rules.kicking, Side::Home);
    }

    #[test]
    fn test_safety_scores_for_defence() {
        let mut rules = drive(Side::Away, 45.0);
        assert!(rules.snap());
        let result = rules.end_play(51.0).unwrap();
        assert_eq!(result, PlayResult::Safety { scorer: Side::Home });
        assert_eq!(rules.score.home, 2);
        assert_eq!(rules.kicking, Side::Away);
        assert_eq!(rules.phase, GridironPhase::Kickoff);
    }

    #[test]
    fn test_kickoff_touchback() {
        let mut rules = GridironRules::new(GridironParams::default());
        let mut rng = Pcg32::seed_from_u64(4);
        assert!(rules.coin_flip(&mut rng));
        assert_eq!(rules.phase, GridironPhase::Kickoff);
        let receiving = rules.possession;

        assert!(rules.kickoff(None));
        assert_eq!(rules.possession, receiving);
        assert_eq!(rules.line_of_scrimmage, -receiving.attack_dir() * 25.0);
        assert_eq!(rules.phase, GridironPhase::PreSnap);
    }

    #[test]
    fn test_kickoff_return_and_end_zone_return() {
        let mut rules = GridironRules::new(GridironParams::default());
        rules.phase = GridironPhase::Kickoff;
        rules.kicking = Side::Away;
        assert!(rules.kickoff(Some(-18.0)));
        assert_eq!(rules.line_of_scrimmage, -18.0);

        rules.phase = GridironPhase::Kickoff;
        assert!(rules.kickoff(Some(-55.0)));
        assert_eq!(rules.line_of_scrimmage, -25.0);
    }

    #[test]
    fn test_kickoff_auto_touchback_after_delay() {
        let params = GridironParams::default();
        let mut rules = drive(Side::Home, 40.0);
        rules.snap();
        rules.end_play(55.0);
        assert_eq!(rules.phase, GridironPhase::Kickoff);
        assert!(rules.update(params.whistle_delay));
        assert_eq!(rules.phase, GridironPhase::PreSnap);
        assert_eq!(rules.possession, Side::Away);
        assert_eq!(rules.line_of_scrimmage, 25.0);
    }

    #[test]
    fn test_huddle_snaps_automatically() {
        let params = GridironParams::default();
        let mut rules = drive(Side::Home, 0.0);
        assert!(!rules.update(params.huddle_time * 0.5));
        assert!(rules.update(params.huddle_time));
        assert_eq!(rules.phase, GridironPhase::Live);
    }

    #[test]
    fn test_incomplete_pass_ends_at_line() {
        let mut rules = drive(Side::Away, 10.0);
        rules.snap();
        let result = rules.incomplete().unwrap();
        assert_eq!(result, PlayResult::Gain { yards: 0.0, down: 2 });
        assert_eq!(rules.line_of_scrimmage, 10.0);
        assert_eq!(rules.distance, 10.0);
    }

    #[test]
    fn test_interception_starts_new_drive() {
        let mut rules = drive(Side::Home, -10.0);
        rules.snap();
        assert!(rules.turnover_in_play(Side::Away));
        assert!(!rules.turnover_in_play(Side::Away));
        let result = rules.end_play(5.0).unwrap();
        assert_eq!(result, PlayResult::ChangeOfPossession);
        assert_eq!(rules.possession, Side::Away);
        assert_eq!(rules.down, 1);
        assert_eq!(rules.first_down_marker, -5.0);
    }

    #[test]
    fn test_pick_six() {
        let mut rules = drive(Side::Home, -10.0);
        rules.snap();
        rules.turnover_in_play(Side::Away);
        let result = rules.end_play(-50.0).unwrap();
        assert_eq!(result, PlayResult::Touchdown { scorer: Side::Away });
        assert_eq!(rules.score.away, 6);
        assert_eq!(rules.kicking, Side::Away);
    }

    #[test]
    fn test_goal_to_go() {
        let rules = drive(Side::Home, 45.0);
        assert_eq!(rules.first_down_marker, 50.0);
        assert_eq!(rules.distance, 5.0);
        assert_eq!(rules.down_and_distance_text(), "1st & Goal");
    }

    #[test]
    fn test_out_of_phase_calls_are_noops() {
        let mut rules = GridironRules::new(GridironParams::default());
        assert!(!rules.snap());
        assert!(rules.end_play(10.0).is_none());
        assert!(rules.incomplete().is_none());
        assert!(!rules.kickoff(None));
        assert!(!rules.turnover_in_play(Side::Away));
        assert_eq!(rules.phase, GridironPhase::CoinFlip);
        assert_eq!(rules.score, Score::default());
    }

    #[test]
    fn test_dead_punt_goes_to_receivers() {
        let mut rules = drive(Side::Home, -20.0);
        assert!(rules.snap());
        let result = rules.kick_dead(15.0).unwrap();

        assert_eq!(result, PlayResult::ChangeOfPossession);
        assert_eq!(rules.possession, Side::Away);
        assert_eq!(rules.down, 1);
        assert_eq!(rules.line_of_scrimmage, 15.0);
        // Away attacks -y
        assert_eq!(rules.first_down_marker, 5.0);
        assert_eq!(rules.phase, GridironPhase::Whistle);
        assert_eq!(rules.score, Score::default());

        rules.update(GridironParams::default().whistle_delay);
        assert_eq!(rules.phase, GridironPhase::PreSnap);
    }

    #[test]
    fn test_punt_into_end_zone_is_touchback() {
        let mut rules = drive(Side::Home, 10.0);
        assert!(rules.snap());
        rules.kick_dead(56.0).unwrap();
        assert_eq!(rules.possession, Side::Away);
        assert_eq!(rules.line_of_scrimmage, 25.0);
    }

    #[test]
    fn test_kick_dead_needs_live_play() {
        let mut rules = drive(Side::Away, 20.0);
        assert!(rules.kick_dead(0.0).is_none());
        assert_eq!(rules.possession, Side::Away);
        assert_eq!(rules.phase, GridironPhase::PreSnap);
    }
}
