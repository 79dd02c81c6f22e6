//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod ball;
pub mod contact;
pub mod entity;
pub mod formation;
pub mod hud;
pub mod routes;
pub mod rules;
pub mod state;
pub mod steering;
pub mod tick;

pub use ball::Ball;
pub use contact::{Approach, ContactCategory, ContactOutcome};
pub use entity::{Attributes, Entity, GridironRole, PitchRole, Role, RoleProfile, Side};
pub use formation::Formation;
pub use hud::HudSnapshot;
pub use routes::{RouteKind, RouteRunner};
pub use rules::{
    GridironPhase, GridironRules, MatchPhase, PitchPhase, PitchRules, PlayResult, RestartKind,
    RuleSignal, Rules, Score,
};
pub use state::{MatchState, Sport};
pub use steering::{AiState, FieldBounds, Possession, SteeringContext, SteeringState};
pub use tick::{TickInput, tick};
