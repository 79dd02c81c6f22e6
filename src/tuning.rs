//! Data-driven simulation coefficients
//!
//! Every constant the simulation reads lives here so balance passes never touch
//! code. Documents are JSON; missing fields fall back to defaults.

use serde::{Deserialize, Serialize};

/// Match length presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MatchLength {
    Short,
    #[default]
    Standard,
    Full,
}

impl MatchLength {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchLength::Short => "Short",
            MatchLength::Standard => "Standard",
            MatchLength::Full => "Full",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "short" => Some(MatchLength::Short),
            "standard" | "std" => Some(MatchLength::Standard),
            "full" => Some(MatchLength::Full),
            _ => None,
        }
    }

    /// Simulated seconds per half for this preset
    pub fn half_duration(&self) -> f32 {
        match self {
            MatchLength::Short => 120.0,
            MatchLength::Standard => 240.0,
            MatchLength::Full => 45.0 * 60.0,
        }
    }
}

/// Ball flight, bounce and roll coefficients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BallParams {
    /// Downward acceleration (units/s²)
    pub gravity: f32,
    /// Scale of the spin × velocity lateral force
    pub curve_strength: f32,
    /// Spin magnitude below which no curve is computed
    pub spin_epsilon: f32,
    /// Quadratic drag coefficient while airborne
    pub air_drag: f32,
    /// Quadratic drag coefficient while on the ground (higher than air)
    pub ground_drag: f32,
    /// Horizontal velocity retained per reference tick while grounded
    pub ground_friction: f32,
    /// Spin retained per reference tick
    pub spin_decay: f32,
    /// Minimum descending speed that still produces a bounce
    pub bounce_threshold: f32,
    /// Fraction of vertical speed kept after a bounce
    pub restitution: f32,
    /// Horizontal velocity kept through a bounce
    pub bounce_horizontal_damping: f32,
    /// Maximum random spin added per bounce axis
    pub bounce_spin_jitter: f32,
    /// Grounded horizontal speed under which the ball stops dead
    pub stop_speed: f32,
    /// Spin magnitude under which spin is zeroed
    pub spin_stop: f32,
    /// Lift fraction above which an impulse launches the ball
    pub lift_threshold: f32,
    /// Share of carrier velocity the ball inherits while carried
    pub carry_velocity_inherit: f32,
    /// Distance the carried ball sits ahead of the carrier
    pub carry_lead: f32,
    /// Easing rate used for carried balls (per second)
    pub carry_easing: f32,
    /// Highest ball a standing entity can control
    pub control_height: f32,
    /// Seconds before a kicker may touch their own kick again
    pub kick_touch_cooldown: f32,
}

impl Default for BallParams {
    fn default() -> Self {
        Self {
            gravity: 9.81,
            curve_strength: 0.012,
            spin_epsilon: 0.01,
            air_drag: 0.012,
            ground_drag: 0.03,
            ground_friction: 0.985,
            spin_decay: 0.99,
            bounce_threshold: 1.2,
            restitution: 0.6,
            bounce_horizontal_damping: 0.85,
            bounce_spin_jitter: 0.5,
            stop_speed: 0.08,
            spin_stop: 0.05,
            lift_threshold: 0.05,
            carry_velocity_inherit: 0.8,
            carry_lead: 0.6,
            carry_easing: 18.0,
            control_height: 1.0,
            kick_touch_cooldown: 0.3,
        }
    }
}

/// Tackle reach for each entity class
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TackleRanges {
    pub pitch_field: f32,
    pub pitch_goalkeeper: f32,
    pub gridiron_lineman: f32,
    pub gridiron_skill: f32,
    pub gridiron_defender: f32,
}

impl Default for TackleRanges {
    fn default() -> Self {
        Self {
            pitch_field: 1.2,
            pitch_goalkeeper: 1.6,
            gridiron_lineman: 1.4,
            gridiron_skill: 1.2,
            gridiron_defender: 1.5,
        }
    }
}

/// Contact resolution coefficients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactParams {
    pub tackle_ranges: TackleRanges,
    /// Radius within which a loose ball is picked up (pitch)
    pub pitch_control_radius: f32,
    /// Radius within which a loose ball is caught or recovered (gridiron)
    pub gridiron_control_radius: f32,
    /// Velocity applied per unit of knockback strength
    pub knockback_speed: f32,
    /// Seconds an entity waits between tackle attempts
    pub tackle_cooldown: f32,
    /// Chance a successful tackle from behind is whistled as a foul
    pub behind_foul_chance: f32,
    /// Loose-ball reach of a goalkeeper
    pub goalkeeper_reach: f32,
}

impl Default for ContactParams {
    fn default() -> Self {
        Self {
            tackle_ranges: TackleRanges::default(),
            pitch_control_radius: 0.9,
            gridiron_control_radius: 1.2,
            knockback_speed: 4.0,
            tackle_cooldown: 0.8,
            behind_foul_chance: 0.35,
            goalkeeper_reach: 1.8,
        }
    }
}

/// Role steering coefficients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SteeringParams {
    /// Seconds between AI state re-evaluations
    pub decision_interval: f32,
    /// Seconds between support offset refreshes
    pub support_refresh: f32,
    /// Distance at which an entity counts as arrived
    pub arrive_threshold: f32,
    /// Velocity kept per reference tick once arrived
    pub settle_factor: f32,
    /// Distance over which speed tapers on final approach
    pub slow_radius: f32,
    /// Lowest speed fraction during final approach
    pub min_approach_fraction: f32,
    /// Velocity blend rates (per second)
    pub goalkeeper_smoothing: f32,
    pub field_smoothing: f32,
    pub gridiron_smoothing: f32,
    pub controlled_smoothing: f32,
    /// Base running speeds (units/s)
    pub goalkeeper_speed: f32,
    pub defender_speed: f32,
    pub midfielder_speed: f32,
    pub attacker_speed: f32,
    pub lineman_speed: f32,
    pub receiver_speed: f32,
    pub back_speed: f32,
    pub gridiron_defender_speed: f32,
    /// Speed multiplier when the controlled entity sprints
    pub sprint_multiplier: f32,
    /// Distance within which chasers go for the ball
    pub chase_range: f32,
    /// Fraction of chase range defenders commit from
    pub defender_chase_fraction: f32,
    /// Fraction of chase range attackers commit from
    pub attacker_chase_fraction: f32,
    /// Opponent distance that triggers man marking
    pub mark_distance: f32,
    /// Distance within which midfielders join the attack
    pub support_threshold: f32,
    /// Radius of the randomized support offset
    pub support_jitter: f32,
    /// Forward bias added to support targets
    pub attacker_forward_bias: f32,
    pub midfielder_forward_bias: f32,
    /// Hold-position drift toward the ball
    pub lateral_drift: f32,
    pub longitudinal_drift: f32,
    /// Furthest a defender advances past halfway
    pub defender_advance_limit: f32,
    /// Goal-to-ball interpolation for primary defenders and auxiliary roles
    pub defender_defend_factor: f32,
    pub auxiliary_defend_factor: f32,
    /// Interpolation from a marked opponent toward the defended goal
    pub mark_factor: f32,
    /// Goalkeeper lateral tracking range around the goal mouth
    pub goalkeeper_lateral_range: f32,
    /// Goalkeeper distance off the goal line
    pub goalkeeper_line_depth: f32,
    /// Extra step the goalkeeper takes toward a close ball
    pub goalkeeper_forward_nudge: f32,
    /// Ball distance that triggers the goalkeeper nudge
    pub goalkeeper_proximity: f32,
    /// Distance to goal within which AI carriers shoot
    pub shooting_range: f32,
    /// Shot speed for AI carriers
    pub shot_power: f32,
    /// Gridiron blocking engagement distance
    pub block_engage_distance: f32,
    /// Opponent distance at which an AI carrier looks to pass
    pub pressure_distance: f32,
    /// Ground pass speed for AI carriers
    pub pass_power: f32,
    /// Goalkeeper clearance speed
    pub clearance_power: f32,
}

impl Default for SteeringParams {
    fn default() -> Self {
        Self {
            decision_interval: 0.4,
            support_refresh: 2.5,
            arrive_threshold: 0.3,
            settle_factor: 0.8,
            slow_radius: 2.0,
            min_approach_fraction: 0.25,
            goalkeeper_smoothing: 14.0,
            field_smoothing: 6.0,
            gridiron_smoothing: 8.0,
            controlled_smoothing: 10.0,
            goalkeeper_speed: 5.5,
            defender_speed: 6.5,
            midfielder_speed: 7.0,
            attacker_speed: 7.5,
            lineman_speed: 5.0,
            receiver_speed: 8.5,
            back_speed: 8.0,
            gridiron_defender_speed: 7.5,
            sprint_multiplier: 1.35,
            chase_range: 30.0,
            defender_chase_fraction: 0.5,
            attacker_chase_fraction: 0.35,
            mark_distance: 6.0,
            support_threshold: 25.0,
            support_jitter: 6.0,
            attacker_forward_bias: 8.0,
            midfielder_forward_bias: 3.0,
            lateral_drift: 0.3,
            longitudinal_drift: 0.15,
            defender_advance_limit: 5.0,
            defender_defend_factor: 0.3,
            auxiliary_defend_factor: 0.5,
            mark_factor: 0.15,
            goalkeeper_lateral_range: 3.0,
            goalkeeper_line_depth: 1.0,
            goalkeeper_forward_nudge: 2.0,
            goalkeeper_proximity: 20.0,
            shooting_range: 22.0,
            shot_power: 24.0,
            block_engage_distance: 4.0,
            pressure_distance: 2.5,
            pass_power: 15.0,
            clearance_power: 22.0,
        }
    }
}

/// Pitch rules timing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PitchParams {
    pub match_length: MatchLength,
    /// Overrides the preset half duration when set
    pub half_duration: Option<f32>,
    /// Minimum goal celebration before the kickoff
    pub celebration_delay: f32,
    /// Random extra celebration time (0..jitter)
    pub celebration_jitter: f32,
    /// Delay before a dead-ball restart is taken
    pub restart_delay: f32,
    /// Delay before a kickoff is taken
    pub kickoff_delay: f32,
    /// Break between halves
    pub half_time_break: f32,
}

impl Default for PitchParams {
    fn default() -> Self {
        Self {
            match_length: MatchLength::Standard,
            half_duration: None,
            celebration_delay: 2.5,
            celebration_jitter: 1.5,
            restart_delay: 1.5,
            kickoff_delay: 1.0,
            half_time_break: 3.0,
        }
    }
}

impl PitchParams {
    pub fn effective_half_duration(&self) -> f32 {
        self.half_duration
            .unwrap_or_else(|| self.match_length.half_duration())
    }
}

/// Gridiron rules constants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GridironParams {
    /// Yards needed for a first down
    pub first_down_distance: f32,
    /// Downs available before a turnover
    pub max_downs: u8,
    pub touchdown_points: u32,
    pub safety_points: u32,
    /// Distance from the receiving team's own goal line after a touchback
    pub touchback_distance: f32,
    /// Delay between the whistle and the next huddle
    pub whistle_delay: f32,
    /// Seconds in the huddle before the ball is snapped automatically
    pub huddle_time: f32,
    /// Seconds after the snap before an AI passer throws
    pub throw_time: f32,
    /// Forward pass speed
    pub pass_speed: f32,
    /// Distance of the kickoff tee from the kicking team's goal line
    pub kickoff_tee: f32,
}

impl Default for GridironParams {
    fn default() -> Self {
        Self {
            first_down_distance: 10.0,
            max_downs: 4,
            touchdown_points: 6,
            safety_points: 2,
            touchback_distance: 25.0,
            whistle_delay: 1.0,
            huddle_time: 2.0,
            throw_time: 1.2,
            pass_speed: 18.0,
            kickoff_tee: 15.0,
        }
    }
}

/// All simulation coefficients
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub ball: BallParams,
    pub contact: ContactParams,
    pub steering: SteeringParams,
    pub pitch: PitchParams,
    pub gridiron: GridironParams,
}

impl Tuning {
    /// Parse a tuning document; fields it omits keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let tuning: Tuning = serde_json::from_str(json)?;
        log::info!(
            "Loaded tuning (half={}s, decision={}s)",
            tuning.pitch.effective_half_duration(),
            tuning.steering.decision_interval
        );
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
