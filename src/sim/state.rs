//! Match state and world container
//!
//! Everything the simulation mutates lives here. Entities are kept sorted by
//! id so every pass iterates in the same order.

use glam::{Vec2, Vec3};
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::ball::Ball;
use super::entity::{Entity, RoleProfile, Side};
use super::formation::{Formation, slot_position};
use super::rules::{GridironRules, PitchRules, RuleSignal, Rules};
use super::steering::FieldBounds;
use crate::consts::*;
use crate::tuning::Tuning;

/// Sport being simulated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sport {
    Pitch,
    Gridiron,
}

/// Complete match state (deterministic for a given seed and input stream)
#[derive(Debug, Clone)]
pub struct MatchState {
    /// Match seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub ball: Ball,
    /// All entities, sorted by id
    pub entities: Vec<Entity>,
    pub rules: Rules,
    /// Entity driven by `TickInput` (None lets the AI play both sides)
    pub controlled: Option<u32>,
    /// Simulated seconds
    pub time: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Seconds spent in the current phase
    pub phase_time: f32,
    /// A forward pass is in the air
    pub pass_in_flight: bool,
    /// Side whose punt is in the air or rolling, untouched by the receivers
    pub kick_in_flight: Option<Side>,
    /// Signals applied to the rules during the last tick
    pub signals: Vec<RuleSignal>,
    /// Match RNG, the single source for every random draw
    pub rng: Pcg32,
    next_id: u32,
}

impl MatchState {
    fn empty(seed: u64, tuning: Tuning, rules: Rules) -> Self {
        Self {
            seed,
            tuning,
            ball: Ball::new(Vec2::ZERO),
            entities: Vec::new(),
            rules,
            controlled: None,
            time: 0.0,
            time_ticks: 0,
            phase_time: 0.0,
            pass_in_flight: false,
            kick_in_flight: None,
            signals: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Eleven a side, toss done, kickoff pending
    pub fn new_pitch(seed: u64, tuning: Tuning) -> Self {
        let rules = Rules::Pitch(PitchRules::new(tuning.pitch.clone()));
        let mut state = Self::empty(seed, tuning, rules);

        state.spawn_formation(Side::Home, Formation::FourFourTwo, 0.0);
        state.spawn_formation(Side::Away, Formation::FourThreeThree, 0.0);
        state.rules.coin_flip(&mut state.rng);

        log::info!(
            "New pitch match (seed {seed}), {} entities",
            state.entities.len()
        );
        state
    }

    /// Ten a side, toss done, kickoff pending
    pub fn new_gridiron(seed: u64, tuning: Tuning) -> Self {
        let rules = Rules::Gridiron(GridironRules::new(tuning.gridiron.clone()));
        let mut state = Self::empty(seed, tuning, rules);

        state.spawn_formation(Side::Home, Formation::Spread, 0.0);
        state.spawn_formation(Side::Away, Formation::NickelDefense, 0.0);
        state.rules.coin_flip(&mut state.rng);
        let offence = state.rules.possession();
        state.assign_gridiron_formations(offence);

        log::info!(
            "New gridiron match (seed {seed}), {} entities",
            state.entities.len()
        );
        state
    }

    pub fn sport(&self) -> Sport {
        match self.rules {
            Rules::Pitch(_) => Sport::Pitch,
            Rules::Gridiron(_) => Sport::Gridiron,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Add one entity per formation slot for `side`
    pub fn spawn_formation(&mut self, side: Side, formation: Formation, reference_y: f32) {
        for slot in formation.slots() {
            let id = self.next_entity_id();
            let profile = RoleProfile::for_role(slot.role, slot.offset, &self.tuning);
            let pos = slot_position(slot.offset, side, reference_y);
            self.entities.push(Entity::new(id, side, pos, profile));
        }
        self.normalize_order();
    }

    /// Give each side the offence or defence roles, in id order
    pub fn assign_gridiron_formations(&mut self, offence: Side) {
        for side in [Side::Home, Side::Away] {
            let formation = if side == offence {
                Formation::Spread
            } else {
                Formation::NickelDefense
            };
            let slots = formation.slots();
            let members = self.entities.iter_mut().filter(|e| e.side == side);
            for (entity, slot) in members.zip(slots) {
                let profile = RoleProfile::for_role(slot.role, slot.offset, &self.tuning);
                entity.reassign(profile);
            }
        }
    }

    /// Move every entity back to its formation slot, stationary
    pub fn reset_formations(&mut self, reference_y: f32) {
        for entity in &mut self.entities {
            entity.pos = slot_position(entity.profile.formation_offset, entity.side, reference_y);
            entity.vel = Vec2::ZERO;
            entity.has_ball = false;
            entity.tackle_cooldown = 0.0;
            entity.steering.force_decision();
        }
    }

    /// Ensure entities are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.entities.sort_by_key(|e| e.id);
    }

    pub fn entity(&self, id: u32) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn entity_mut(&mut self, id: u32) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    /// Index of the entity holding the ball
    pub fn carrier_index(&self) -> Option<usize> {
        self.entities.iter().position(|e| e.has_ball)
    }

    pub fn carrier(&self) -> Option<&Entity> {
        self.carrier_index().map(|i| &self.entities[i])
    }

    /// Hand the ball to the entity at `index`
    pub fn give_ball(&mut self, index: usize) {
        for (i, entity) in self.entities.iter_mut().enumerate() {
            entity.has_ball = i == index;
        }
        let carrier = &self.entities[index];
        self.ball.last_toucher = Some(carrier.side);
        self.ball.vel = Vec3::ZERO;
        self.ball.spin = Vec3::ZERO;
        self.pass_in_flight = false;
        self.kick_in_flight = None;
    }

    /// Nobody holds the ball
    pub fn release_ball(&mut self) {
        for entity in &mut self.entities {
            entity.has_ball = false;
        }
    }

    /// Nearest entity of `side` to `point`, lowest id on ties
    pub fn nearest_of_side(&self, side: Side, point: Vec2) -> Option<usize> {
        self.entities
            .iter()
            .enumerate()
            .filter(|(_, e)| e.side == side)
            .min_by(|(_, a), (_, b)| {
                a.distance_to(point)
                    .partial_cmp(&b.distance_to(point))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|(i, _)| i)
    }

    /// Let the player drive the entity of `side` nearest the ball
    pub fn control_nearest(&mut self, side: Side) {
        self.controlled = self
            .nearest_of_side(side, self.ball.ground_pos())
            .map(|i| self.entities[i].id);
    }

    /// Playable area for the sport
    pub fn bounds(&self) -> FieldBounds {
        match self.sport() {
            Sport::Pitch => FieldBounds {
                half_width: PITCH_HALF_WIDTH,
                half_length: PITCH_HALF_LENGTH,
            },
            Sport::Gridiron => FieldBounds {
                half_width: GRIDIRON_HALF_WIDTH,
                half_length: GRIDIRON_GOAL_LINE + GRIDIRON_END_ZONE_DEPTH,
            },
        }
    }

    /// Distance from centre to each goal line
    pub fn goal_line(&self) -> f32 {
        match self.sport() {
            Sport::Pitch => PITCH_HALF_LENGTH,
            Sport::Gridiron => GRIDIRON_GOAL_LINE,
        }
    }
}
