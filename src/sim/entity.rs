//! Moving entities and their role configuration

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::routes::RouteKind;
use super::steering::SteeringState;
use crate::tuning::Tuning;

/// Team side. Home attacks toward +y, Away toward -y.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Home,
    Away,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::Home => Side::Away,
            Side::Away => Side::Home,
        }
    }

    /// Sign of the y axis this side attacks toward
    #[inline]
    pub fn attack_dir(self) -> f32 {
        match self {
            Side::Home => 1.0,
            Side::Away => -1.0,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Side::Home => 0,
            Side::Away => 1,
        }
    }
}

/// Pitch behavioural roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PitchRole {
    Goalkeeper,
    Defender,
    Midfielder,
    Attacker,
}

/// Gridiron behavioural roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GridironRole {
    Lineman,
    /// Runs the given route once the ball is snapped
    Receiver(RouteKind),
    /// Takes the snap
    Back,
    Defender,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Pitch(PitchRole),
    Gridiron(GridironRole),
}

/// Ability ratings, each in [0, 1]
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Attributes {
    pub speed: f32,
    pub power: f32,
    pub control: f32,
    pub stamina: f32,
}

impl Default for Attributes {
    fn default() -> Self {
        Self {
            speed: 0.5,
            power: 0.5,
            control: 0.5,
            stamina: 1.0,
        }
    }
}

impl Attributes {
    /// Running speed multiplier, tired legs run slower
    pub fn speed_factor(&self) -> f32 {
        (0.85 + 0.3 * self.speed) * (0.9 + 0.1 * self.stamina)
    }

    /// Kick power multiplier
    pub fn power_factor(&self) -> f32 {
        0.8 + 0.4 * self.power
    }
}

/// Static per-entity configuration derived from its formation slot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleProfile {
    pub role: Role,
    /// Nominal offset from the reference line: x lateral, y depth behind the line
    pub formation_offset: Vec2,
    /// Willingness to commit to the ball (0-1)
    pub aggressiveness: f32,
    /// How tightly the slot is held against ball drift (0-1)
    pub positioning_strictness: f32,
    pub chase_range: f32,
    /// Velocity blend rate (per second)
    pub smoothing: f32,
    pub base_speed: f32,
    pub max_speed: f32,
    pub tackle_range: f32,
}

impl RoleProfile {
    pub fn for_role(role: Role, formation_offset: Vec2, tuning: &Tuning) -> Self {
        let s = &tuning.steering;
        let ranges = &tuning.contact.tackle_ranges;
        let (aggressiveness, positioning_strictness, smoothing, base_speed, tackle_range) =
            match role {
                Role::Pitch(PitchRole::Goalkeeper) => (
                    0.2,
                    0.9,
                    s.goalkeeper_smoothing,
                    s.goalkeeper_speed,
                    ranges.pitch_goalkeeper,
                ),
                Role::Pitch(PitchRole::Defender) => {
                    (0.6, 0.7, s.field_smoothing, s.defender_speed, ranges.pitch_field)
                }
                Role::Pitch(PitchRole::Midfielder) => (
                    0.5,
                    0.5,
                    s.field_smoothing,
                    s.midfielder_speed,
                    ranges.pitch_field,
                ),
                Role::Pitch(PitchRole::Attacker) => {
                    (0.4, 0.4, s.field_smoothing, s.attacker_speed, ranges.pitch_field)
                }
                Role::Gridiron(GridironRole::Lineman) => (
                    0.7,
                    0.8,
                    s.gridiron_smoothing,
                    s.lineman_speed,
                    ranges.gridiron_lineman,
                ),
                Role::Gridiron(GridironRole::Receiver(_)) => (
                    0.3,
                    0.6,
                    s.gridiron_smoothing,
                    s.receiver_speed,
                    ranges.gridiron_skill,
                ),
                Role::Gridiron(GridironRole::Back) => (
                    0.4,
                    0.6,
                    s.gridiron_smoothing,
                    s.back_speed,
                    ranges.gridiron_skill,
                ),
                Role::Gridiron(GridironRole::Defender) => (
                    0.8,
                    0.5,
                    s.gridiron_smoothing,
                    s.gridiron_defender_speed,
                    ranges.gridiron_defender,
                ),
            };

        Self {
            role,
            formation_offset,
            aggressiveness,
            positioning_strictness,
            chase_range: s.chase_range * (0.75 + 0.5 * aggressiveness),
            smoothing,
            base_speed,
            max_speed: base_speed * s.sprint_multiplier,
            tackle_range,
        }
    }

    pub fn is_goalkeeper(&self) -> bool {
        self.role == Role::Pitch(PitchRole::Goalkeeper)
    }
}

/// A ball carrier, tackler or AI-controlled actor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub side: Side,
    pub pos: Vec2,
    pub vel: Vec2,
    pub mass: f32,
    pub attrs: Attributes,
    pub has_ball: bool,
    pub profile: RoleProfile,
    pub steering: SteeringState,
    /// Seconds until the next tackle attempt is allowed
    #[serde(default)]
    pub tackle_cooldown: f32,
}

impl Entity {
    pub fn new(id: u32, side: Side, pos: Vec2, profile: RoleProfile) -> Self {
        Self {
            id,
            side,
            pos,
            vel: Vec2::ZERO,
            mass: 1.0,
            attrs: Attributes::default(),
            has_ball: false,
            profile,
            steering: SteeringState::default(),
            tackle_cooldown: 0.0,
        }
    }

    /// Comfortable running speed
    pub fn cruise_speed(&self) -> f32 {
        self.profile.base_speed * self.attrs.speed_factor()
    }

    /// Hard velocity bound for this entity
    pub fn max_speed(&self) -> f32 {
        self.profile.max_speed * self.attrs.speed_factor()
    }

    /// Swap in a new role (formation change); steering restarts from scratch
    pub fn reassign(&mut self, profile: RoleProfile) {
        self.profile = profile;
        self.steering = SteeringState::default();
    }

    pub fn distance_to(&self, point: Vec2) -> f32 {
        self.pos.distance(point)
    }
}
