//! Tackle contact resolution
//!
//! Approach geometry, closing speed and relative mass combine into a tackle
//! power; the carrier then gets one roll to break free.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::Entity;
use crate::consts::REFERENCE_HZ;
use crate::normalize_or;

/// Which side of the carrier the tackler arrives from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Approach {
    Front,
    Side,
    Behind,
}

impl Approach {
    /// Bucket an approach angle in degrees
    pub fn from_angle(degrees: f32) -> Self {
        if degrees <= 60.0 {
            Approach::Front
        } else if degrees <= 120.0 {
            Approach::Side
        } else {
            Approach::Behind
        }
    }

    pub fn modifier(self) -> f32 {
        match self {
            Approach::Front => 1.0,
            Approach::Side => 0.75,
            Approach::Behind => 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactCategory {
    Full,
    Trip,
    Stumble,
    Missed,
}

/// Result of a single tackle attempt. Produced and consumed within one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactOutcome {
    pub success: bool,
    pub category: ContactCategory,
    /// Push applied to the carrier, along tackler -> carrier
    pub knockback: Vec2,
    /// Share of carrier velocity removed, in [0, 1]
    pub slowdown: f32,
    pub approach: Approach,
    pub tackle_power: f32,
    pub break_chance: f32,
}

impl ContactOutcome {
    pub fn missed() -> Self {
        Self {
            success: false,
            category: ContactCategory::Missed,
            knockback: Vec2::ZERO,
            slowdown: 0.0,
            approach: Approach::Front,
            tackle_power: 0.0,
            break_chance: 0.0,
        }
    }
}

/// Contact formulas work on per-reference-tick displacement
#[inline]
fn tick_speed(v: Vec2) -> f32 {
    v.length() / REFERENCE_HZ
}

/// Whether `carrier` is within `range` (or the tackler's own reach)
pub fn is_in_range(tackler: &Entity, carrier: &Entity, range: Option<f32>) -> bool {
    let range = range.unwrap_or(tackler.profile.tackle_range);
    tackler.pos.distance(carrier.pos) <= range
}

/// Angle in degrees between the carrier's heading and the direction to the tackler.
/// A stationary carrier is always met head-on.
pub fn approach_angle(tackler_pos: Vec2, carrier_pos: Vec2, carrier_vel: Vec2) -> f32 {
    let Some(heading) = carrier_vel.try_normalize() else {
        return 0.0;
    };
    let Some(to_tackler) = (tackler_pos - carrier_pos).try_normalize() else {
        return 0.0;
    };
    heading.dot(to_tackler).clamp(-1.0, 1.0).acos().to_degrees()
}

/// Raw tackle power in [0, 1]
pub fn tackle_power(approach: Approach, closing_speed: f32, mass_ratio: f32) -> f32 {
    let speed_mod = (0.5 + closing_speed * 2.0).min(1.5);
    let mass_mod = mass_ratio.clamp(0.5, 1.5);
    (approach.modifier() * speed_mod * mass_mod * 0.5).clamp(0.0, 1.0)
}

/// Chance the carrier breaks the tackle, in [0, 0.5]
pub fn break_chance(carrier_speed: f32, carrier_mass: f32, tackle_power: f32) -> f32 {
    ((0.1 + carrier_speed * 0.2 + (carrier_mass - 1.0) * 0.1) * (1.0 - tackle_power))
        .clamp(0.0, 0.5)
}

/// Resolve a tackle, drawing the break roll from `rng`
pub fn resolve(tackler: &Entity, carrier: &Entity, rng: &mut impl Rng) -> ContactOutcome {
    if !is_in_range(tackler, carrier, None) {
        return ContactOutcome::missed();
    }
    resolve_with_roll(tackler, carrier, rng.random::<f32>())
}

/// Resolve a tackle with a pre-drawn uniform roll in [0, 1)
pub fn resolve_with_roll(tackler: &Entity, carrier: &Entity, roll: f32) -> ContactOutcome {
    if !is_in_range(tackler, carrier, None) {
        return ContactOutcome::missed();
    }

    let approach = Approach::from_angle(approach_angle(tackler.pos, carrier.pos, carrier.vel));
    let closing = tick_speed(tackler.vel - carrier.vel);
    let power = tackle_power(approach, closing, tackler.mass / carrier.mass.max(f32::EPSILON));
    let chance = break_chance(tick_speed(carrier.vel), carrier.mass, power);

    let push_dir = normalize_or(
        carrier.pos - tackler.pos,
        normalize_or(carrier.vel, Vec2::new(0.0, carrier.side.attack_dir())),
    );

    let (success, category, strength, slowdown) = if roll < chance {
        (false, ContactCategory::Stumble, 0.2, 0.3)
    } else if power > 0.7 {
        (true, ContactCategory::Full, 0.5, 1.0)
    } else if power > 0.4 {
        (true, ContactCategory::Trip, 0.3, 0.8)
    } else {
        (true, ContactCategory::Stumble, 0.1, 0.5)
    };

    log::debug!(
        "Tackle {} -> {}: {:?} {:?} power={:.2} break={:.2} roll={:.2}",
        tackler.id,
        carrier.id,
        approach,
        category,
        power,
        chance,
        roll
    );

    ContactOutcome {
        success,
        category,
        knockback: push_dir * strength,
        slowdown,
        approach,
        tackle_power: power,
        break_chance: chance,
    }
}
