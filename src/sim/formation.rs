//! Formation slot tables
//!
//! Offsets are relative to a reference line (halfway line or line of
//! scrimmage): x lateral, y depth behind the line toward the side's own goal.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{GridironRole, PitchRole, Role, Side};
use super::routes::RouteKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Formation {
    /// Pitch 4-4-2
    FourFourTwo,
    /// Pitch 4-3-3
    FourThreeThree,
    /// Gridiron offence: five linemen, four receivers, one back
    Spread,
    /// Gridiron defence: four down linemen, two linebackers, corners, safeties
    NickelDefense,
}

/// One position in a formation
#[derive(Debug, Clone, Copy)]
pub struct FormationSlot {
    pub role: Role,
    pub offset: Vec2,
}

const fn slot(role: Role, x: f32, depth: f32) -> FormationSlot {
    FormationSlot {
        role,
        offset: Vec2::new(x, depth),
    }
}

const GK: Role = Role::Pitch(PitchRole::Goalkeeper);
const DEF: Role = Role::Pitch(PitchRole::Defender);
const MID: Role = Role::Pitch(PitchRole::Midfielder);
const ATT: Role = Role::Pitch(PitchRole::Attacker);
const OL: Role = Role::Gridiron(GridironRole::Lineman);
const BACK: Role = Role::Gridiron(GridironRole::Back);
const DL: Role = Role::Gridiron(GridironRole::Defender);

const fn wr(route: RouteKind) -> Role {
    Role::Gridiron(GridironRole::Receiver(route))
}

const FOUR_FOUR_TWO: [FormationSlot; 11] = [
    slot(GK, 0.0, 50.5),
    slot(DEF, -20.0, 35.0),
    slot(DEF, -7.0, 37.0),
    slot(DEF, 7.0, 37.0),
    slot(DEF, 20.0, 35.0),
    slot(MID, -22.0, 18.0),
    slot(MID, -8.0, 20.0),
    slot(MID, 8.0, 20.0),
    slot(MID, 22.0, 18.0),
    slot(ATT, -6.0, 1.5),
    slot(ATT, 6.0, 1.5),
];

const FOUR_THREE_THREE: [FormationSlot; 11] = [
    slot(GK, 0.0, 50.5),
    slot(DEF, -20.0, 35.0),
    slot(DEF, -7.0, 37.0),
    slot(DEF, 7.0, 37.0),
    slot(DEF, 20.0, 35.0),
    slot(MID, -12.0, 20.0),
    slot(MID, 0.0, 22.0),
    slot(MID, 12.0, 20.0),
    slot(ATT, -18.0, 4.0),
    slot(ATT, 0.0, 1.5),
    slot(ATT, 18.0, 4.0),
];

const SPREAD: [FormationSlot; 10] = [
    slot(OL, -4.0, 1.0),
    slot(OL, -2.0, 1.0),
    slot(OL, 0.0, 1.0),
    slot(OL, 2.0, 1.0),
    slot(OL, 4.0, 1.0),
    slot(wr(RouteKind::Fly), -20.0, 1.0),
    slot(wr(RouteKind::Post), 20.0, 1.0),
    slot(wr(RouteKind::Slant), -10.0, 1.5),
    slot(wr(RouteKind::Curl), 10.0, 1.5),
    slot(BACK, 0.0, 5.0),
];

const NICKEL: [FormationSlot; 10] = [
    slot(DL, -3.0, 1.0),
    slot(DL, -1.0, 1.0),
    slot(DL, 1.0, 1.0),
    slot(DL, 3.0, 1.0),
    slot(DL, -6.0, 5.0),
    slot(DL, 6.0, 5.0),
    slot(DL, -20.0, 7.0),
    slot(DL, 20.0, 7.0),
    slot(DL, -8.0, 12.0),
    slot(DL, 8.0, 12.0),
];

impl Formation {
    pub fn slots(self) -> &'static [FormationSlot] {
        match self {
            Formation::FourFourTwo => &FOUR_FOUR_TWO,
            Formation::FourThreeThree => &FOUR_THREE_THREE,
            Formation::Spread => &SPREAD,
            Formation::NickelDefense => &NICKEL,
        }
    }
}

/// World position of a formation offset for `side` at the reference line
#[inline]
pub fn slot_position(offset: Vec2, side: Side, reference_y: f32) -> Vec2 {
    Vec2::new(offset.x, reference_y - side.attack_dir() * offset.y)
}
