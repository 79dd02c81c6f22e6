//! Role-based steering for non-controlled entities
//!
//! Each entity re-classifies its behaviour on a coarse decision cadence, then
//! every tick computes a target for that behaviour and eases its velocity toward
//! it. Decision noise never reaches the motion directly.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::{Entity, GridironRole, PitchRole, Role};
use super::formation::slot_position;
use super::routes::{RouteKind, RouteRunner};
use crate::consts::VELOCITY_EPSILON;
use crate::tuning::SteeringParams;
use crate::{decay_for, smoothing_alpha};

/// Discrete behaviour, owned by the steering engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AiState {
    Idle,
    ChaseBall,
    HoldPosition,
    SupportAttack,
    Defend,
    MarkOpponent,
    GoalkeeperPosition,
    Route(RouteKind),
}

impl AiState {
    /// Stable key for animation selection
    pub fn label(self) -> &'static str {
        match self {
            AiState::Idle => "idle",
            AiState::ChaseBall => "chase_ball",
            AiState::HoldPosition => "hold_position",
            AiState::SupportAttack => "support_attack",
            AiState::Defend => "defend",
            AiState::MarkOpponent => "mark_opponent",
            AiState::GoalkeeperPosition => "goalkeeper_position",
            AiState::Route(RouteKind::Fly) => "route_fly",
            AiState::Route(RouteKind::Slant) => "route_slant",
            AiState::Route(RouteKind::Post) => "route_post",
            AiState::Route(RouteKind::Curl) => "route_curl",
            AiState::Route(RouteKind::Block) => "block",
        }
    }

    /// Share of cruise speed used in this state
    fn speed_multiplier(self) -> f32 {
        match self {
            AiState::Idle => 0.0,
            AiState::ChaseBall => 1.0,
            AiState::SupportAttack => 0.85,
            AiState::Defend => 0.8,
            AiState::MarkOpponent => 0.85,
            AiState::HoldPosition => 0.6,
            AiState::GoalkeeperPosition => 0.7,
            AiState::Route(RouteKind::Block) => 0.6,
            AiState::Route(_) => 1.0,
        }
    }
}

/// Who holds the ball, from one entity's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Possession {
    Own,
    Opponent,
    Loose,
}

/// Playable area, centred on the origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldBounds {
    pub half_width: f32,
    pub half_length: f32,
}

impl FieldBounds {
    pub fn clamp(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            p.x.clamp(-self.half_width, self.half_width),
            p.y.clamp(-self.half_length, self.half_length),
        )
    }
}

/// Situation snapshot handed to every steering update
#[derive(Debug, Clone, Copy)]
pub struct SteeringContext<'a> {
    pub ball_pos: Vec2,
    pub possession: Possession,
    pub nearest_opponent: Option<Vec2>,
    /// Formation reference line (halfway line or line of scrimmage)
    pub reference_y: f32,
    /// Distance from centre to each goal line
    pub goal_line: f32,
    pub play_live: bool,
    pub bounds: FieldBounds,
    pub params: &'a SteeringParams,
}

/// Per-entity steering memory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SteeringState {
    state: AiState,
    /// Seconds until the next state re-evaluation
    pub decision_timer: f32,
    pub support_offset: Vec2,
    /// Seconds until the support offset is re-rolled
    pub support_timer: f32,
    pub route: Option<RouteRunner>,
}

impl Default for SteeringState {
    fn default() -> Self {
        Self {
            state: AiState::Idle,
            decision_timer: 0.0,
            support_offset: Vec2::ZERO,
            support_timer: 0.0,
            route: None,
        }
    }
}

impl SteeringState {
    /// Current AI state; only `update` moves it
    pub fn state(&self) -> AiState {
        self.state
    }

    /// Re-evaluate on the next update instead of waiting out the cadence
    pub fn force_decision(&mut self) {
        self.decision_timer = 0.0;
    }
}

/// Advance one entity's steering by `dt`
pub fn update(entity: &mut Entity, ctx: &SteeringContext, rng: &mut impl Rng, dt: f32) {
    let params = ctx.params;

    entity.steering.decision_timer -= dt;
    if entity.steering.decision_timer <= 0.0 {
        entity.steering.decision_timer = params.decision_interval;
        let next = select_state(entity, ctx);
        if next != entity.steering.state {
            log::debug!(
                "Entity {} {} -> {}",
                entity.id,
                entity.steering.state.label(),
                next.label()
            );
            entity.steering.state = next;
            entity.steering.route = match next {
                AiState::Route(kind) => Some(RouteRunner::new(
                    kind,
                    entity.pos.x,
                    entity.side.attack_dir(),
                )),
                _ => None,
            };
        }
    }

    entity.steering.support_timer -= dt;
    if entity.steering.support_timer <= 0.0 {
        entity.steering.support_timer = params.support_refresh;
        let angle = rng.random_range(0.0..std::f32::consts::TAU);
        let radius = rng.random_range(0.3..=1.0) * params.support_jitter;
        entity.steering.support_offset = Vec2::from_angle(angle) * radius;
    }

    let state = entity.steering.state;
    let speed_mult = if entity.has_ball {
        0.95
    } else {
        state.speed_multiplier()
    };

    let follows_route = matches!(state, AiState::Route(kind) if kind != RouteKind::Block)
        && !entity.has_ball;
    if follows_route {
        let run = entity.vel.length() * dt;
        let heading = entity.steering.route.as_mut().and_then(|route| {
            let heading = route.advance(run);
            (!route.is_finished()).then_some(heading)
        });
        match heading {
            Some(heading) => {
                let desired = heading * entity.cruise_speed() * speed_mult;
                let rate = entity.profile.smoothing;
                blend_velocity(entity, desired, rate, dt);
            }
            None => settle(entity, params, dt),
        }
        return;
    }

    match target_for(entity, state, ctx) {
        Some(target) => steer_toward(entity, target, speed_mult, params, dt),
        None => settle(entity, params, dt),
    }
}

/// Classify an entity's behaviour from its role and the match situation
pub fn select_state(entity: &Entity, ctx: &SteeringContext) -> AiState {
    let params = ctx.params;
    let profile = &entity.profile;
    let dist_ball = entity.pos.distance(ctx.ball_pos);
    let own_ball = ctx.possession == Possession::Own;
    let opponent_close = ctx
        .nearest_opponent
        .is_some_and(|o| entity.pos.distance(o) <= params.mark_distance);

    if profile.is_goalkeeper() {
        return AiState::GoalkeeperPosition;
    }
    if !ctx.play_live {
        return AiState::HoldPosition;
    }

    match profile.role {
        Role::Pitch(PitchRole::Goalkeeper) => AiState::GoalkeeperPosition,
        Role::Pitch(PitchRole::Defender) => {
            if !own_ball && dist_ball <= profile.chase_range * params.defender_chase_fraction {
                AiState::ChaseBall
            } else if opponent_close {
                AiState::MarkOpponent
            } else if !own_ball {
                AiState::Defend
            } else {
                AiState::HoldPosition
            }
        }
        Role::Pitch(PitchRole::Midfielder) => {
            if own_ball {
                if dist_ball < params.support_threshold {
                    AiState::SupportAttack
                } else {
                    AiState::HoldPosition
                }
            } else if dist_ball < profile.chase_range {
                AiState::ChaseBall
            } else {
                AiState::Defend
            }
        }
        Role::Pitch(PitchRole::Attacker) => {
            if own_ball {
                AiState::SupportAttack
            } else if dist_ball <= profile.chase_range * params.attacker_chase_fraction {
                AiState::ChaseBall
            } else {
                AiState::HoldPosition
            }
        }
        Role::Gridiron(GridironRole::Lineman) => AiState::Route(RouteKind::Block),
        Role::Gridiron(GridironRole::Receiver(kind)) => {
            if entity.has_ball {
                AiState::SupportAttack
            } else if own_ball {
                AiState::Route(kind)
            } else {
                AiState::ChaseBall
            }
        }
        Role::Gridiron(GridironRole::Back) => {
            if own_ball {
                AiState::SupportAttack
            } else {
                AiState::ChaseBall
            }
        }
        Role::Gridiron(GridironRole::Defender) => {
            if own_ball {
                AiState::SupportAttack
            } else if opponent_close && dist_ball > profile.chase_range * 0.4 {
                AiState::MarkOpponent
            } else {
                AiState::ChaseBall
            }
        }
    }
}

/// Continuous target for the current state (None means stay put)
pub fn target_for(entity: &Entity, state: AiState, ctx: &SteeringContext) -> Option<Vec2> {
    let params = ctx.params;
    let dir = entity.side.attack_dir();
    let own_goal = Vec2::new(0.0, -dir * ctx.goal_line);
    let slot = slot_position(entity.profile.formation_offset, entity.side, ctx.reference_y);

    if entity.has_ball {
        return Some(carrier_target(entity, ctx));
    }

    let target = match state {
        AiState::Idle => return None,
        AiState::ChaseBall => ctx.ball_pos,
        AiState::HoldPosition => hold_target(entity, slot, ctx),
        AiState::SupportAttack => {
            let bias = match entity.profile.role {
                Role::Pitch(PitchRole::Attacker) => params.attacker_forward_bias,
                _ => params.midfielder_forward_bias,
            };
            ctx.ball_pos + entity.steering.support_offset + Vec2::new(0.0, dir * bias)
        }
        AiState::Defend => {
            let factor = match entity.profile.role {
                Role::Pitch(PitchRole::Defender) => params.defender_defend_factor,
                _ => params.auxiliary_defend_factor,
            };
            let line = own_goal.lerp(ctx.ball_pos, factor);
            Vec2::new(slot.x * 0.5 + ctx.ball_pos.x * 0.5, line.y)
        }
        AiState::MarkOpponent => match ctx.nearest_opponent {
            Some(opponent) => {
                let goal_side = opponent.lerp(own_goal, params.mark_factor);
                Vec2::new(opponent.x, goal_side.y)
            }
            None => hold_target(entity, slot, ctx),
        },
        AiState::GoalkeeperPosition => {
            let range = params.goalkeeper_lateral_range;
            let mut target = Vec2::new(
                ctx.ball_pos.x.clamp(-range, range),
                own_goal.y + dir * params.goalkeeper_line_depth,
            );
            if ctx.ball_pos.distance(own_goal) < params.goalkeeper_proximity {
                target.y += dir * params.goalkeeper_forward_nudge;
            }
            target
        }
        AiState::Route(RouteKind::Block) => match ctx.nearest_opponent {
            Some(opponent) if entity.pos.distance(opponent) <= params.block_engage_distance => {
                opponent
            }
            _ => Vec2::new(slot.x, ctx.reference_y),
        },
        // Receivers off their route (e.g. after the play ends) hold their slot
        AiState::Route(_) => slot,
    };

    Some(ctx.bounds.clamp(target))
}

/// Where an AI ball carrier heads: the goal mouth, or straight upfield to the end zone
fn carrier_target(entity: &Entity, ctx: &SteeringContext) -> Vec2 {
    let dir = entity.side.attack_dir();
    match entity.profile.role {
        Role::Pitch(_) => Vec2::new(0.0, dir * ctx.goal_line),
        Role::Gridiron(_) => Vec2::new(entity.pos.x, dir * ctx.bounds.half_length),
    }
}

/// Formation slot with drift toward the ball
fn hold_target(entity: &Entity, slot: Vec2, ctx: &SteeringContext) -> Vec2 {
    let params = ctx.params;
    if matches!(entity.profile.role, Role::Gridiron(_)) {
        return slot;
    }

    let slack = 1.0 - entity.profile.positioning_strictness * 0.5;
    let mut target = Vec2::new(
        slot.x + (ctx.ball_pos.x - slot.x) * params.lateral_drift * slack,
        slot.y + (ctx.ball_pos.y - slot.y) * params.longitudinal_drift * slack,
    );

    if entity.profile.role == Role::Pitch(PitchRole::Defender) {
        let dir = entity.side.attack_dir();
        let limit = params.defender_advance_limit;
        if target.y * dir > limit {
            target.y = limit * dir;
        }
    }
    target
}

/// Ease toward `target`, slowing on final approach and settling on arrival
pub fn steer_toward(
    entity: &mut Entity,
    target: Vec2,
    speed_mult: f32,
    params: &SteeringParams,
    dt: f32,
) {
    let to_target = target - entity.pos;
    let distance = to_target.length();
    if distance < params.arrive_threshold {
        settle(entity, params, dt);
        return;
    }

    let mut speed = entity.cruise_speed() * speed_mult;
    if distance < params.slow_radius {
        speed *= (distance / params.slow_radius).max(params.min_approach_fraction);
    }
    let rate = entity.profile.smoothing;
    blend_velocity(entity, to_target / distance * speed, rate, dt);
}

/// Exponentially blend velocity toward `desired`, bounded by the entity's max speed
pub fn blend_velocity(entity: &mut Entity, desired: Vec2, rate: f32, dt: f32) {
    let alpha = smoothing_alpha(rate, dt);
    entity.vel = entity
        .vel
        .lerp(desired, alpha)
        .clamp_length_max(entity.max_speed());
    if entity.vel.length() < VELOCITY_EPSILON && desired.length() < VELOCITY_EPSILON {
        entity.vel = Vec2::ZERO;
    }
}

/// Bleed off velocity once there is nowhere to go
pub fn settle(entity: &mut Entity, params: &SteeringParams, dt: f32) {
    entity.vel *= decay_for(params.settle_factor, dt);
    if entity.vel.length() < VELOCITY_EPSILON {
        entity.vel = Vec2::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{PITCH_HALF_LENGTH, PITCH_HALF_WIDTH, SIM_DT};
    use crate::sim::entity::{RoleProfile, Side};
    use crate::tuning::Tuning;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const PITCH: FieldBounds = FieldBounds {
        half_width: PITCH_HALF_WIDTH,
        half_length: PITCH_HALF_LENGTH,
    };

    fn ctx(params: &SteeringParams, ball: Vec2, possession: Possession) -> SteeringContext<'_> {
        SteeringContext {
            ball_pos: ball,
            possession,
            nearest_opponent: None,
            reference_y: 0.0,
            goal_line: PITCH_HALF_LENGTH,
            play_live: true,
            bounds: PITCH,
            params,
        }
    }

    fn pitch_entity(role: PitchRole, offset: Vec2, pos: Vec2) -> Entity {
        let profile = RoleProfile::for_role(Role::Pitch(role), offset, &Tuning::default());
        Entity::new(1, Side::Home, pos, profile)
    }

    #[test]
    fn test_goalkeeper_always_positions() {
        let params = SteeringParams::default();
        let keeper = pitch_entity(PitchRole::Goalkeeper, Vec2::new(0.0, 50.5), Vec2::new(0.0, -50.0));
        for possession in [Possession::Own, Possession::Opponent, Possession::Loose] {
            let c = ctx(&params, Vec2::new(0.0, -48.0), possession);
            assert_eq!(select_state(&keeper, &c), AiState::GoalkeeperPosition);
        }
    }

    #[test]
    fn test_defender_state_selection() {
        let params = SteeringParams::default();
        let defender = pitch_entity(PitchRole::Defender, Vec2::new(7.0, 37.0), Vec2::new(7.0, -37.0));

        let close = ctx(&params, Vec2::new(7.0, -30.0), Possession::Opponent);
        assert_eq!(select_state(&defender, &close), AiState::ChaseBall);

        let mut marking = ctx(&params, Vec2::new(0.0, 30.0), Possession::Opponent);
        marking.nearest_opponent = Some(Vec2::new(8.0, -34.0));
        assert_eq!(select_state(&defender, &marking), AiState::MarkOpponent);

        let far = ctx(&params, Vec2::new(0.0, 30.0), Possession::Opponent);
        assert_eq!(select_state(&defender, &far), AiState::Defend);

        let ours = ctx(&params, Vec2::new(0.0, 30.0), Possession::Own);
        assert_eq!(select_state(&defender, &ours), AiState::HoldPosition);
    }

    #[test]
    fn test_midfielder_state_selection() {
        let params = SteeringParams::default();
        let mid = pitch_entity(PitchRole::Midfielder, Vec2::new(8.0, 20.0), Vec2::new(8.0, -20.0));

        let near_own = ctx(&params, Vec2::new(8.0, -10.0), Possession::Own);
        assert_eq!(select_state(&mid, &near_own), AiState::SupportAttack);

        let far_own = ctx(&params, Vec2::new(0.0, 45.0), Possession::Own);
        assert_eq!(select_state(&mid, &far_own), AiState::HoldPosition);

        let near_theirs = ctx(&params, Vec2::new(8.0, -10.0), Possession::Opponent);
        assert_eq!(select_state(&mid, &near_theirs), AiState::ChaseBall);

        let far_theirs = ctx(&params, Vec2::new(0.0, 45.0), Possession::Opponent);
        assert_eq!(select_state(&mid, &far_theirs), AiState::Defend);
    }

    #[test]
    fn test_attacker_state_selection() {
        let params = SteeringParams::default();
        let att = pitch_entity(PitchRole::Attacker, Vec2::new(6.0, 1.5), Vec2::new(6.0, -1.5));

        let ours = ctx(&params, Vec2::new(0.0, -40.0), Possession::Own);
        assert_eq!(select_state(&att, &ours), AiState::SupportAttack);

        let close = ctx(&params, Vec2::new(6.0, 2.0), Possession::Loose);
        assert_eq!(select_state(&att, &close), AiState::ChaseBall);

        let far = ctx(&params, Vec2::new(0.0, -40.0), Possession::Opponent);
        assert_eq!(select_state(&att, &far), AiState::HoldPosition);
    }

    #[test]
    fn test_dead_ball_holds_position() {
        let params = SteeringParams::default();
        let att = pitch_entity(PitchRole::Attacker, Vec2::new(6.0, 1.5), Vec2::new(6.0, -1.5));
        let mut c = ctx(&params, Vec2::new(6.0, 2.0), Possession::Loose);
        c.play_live = false;
        assert_eq!(select_state(&att, &c), AiState::HoldPosition);
    }

    #[test]
    fn test_goalkeeper_target_clamped_and_nudged() {
        let params = SteeringParams::default();
        let keeper = pitch_entity(PitchRole::Goalkeeper, Vec2::new(0.0, 50.5), Vec2::new(0.0, -50.0));

        let far = ctx(&params, Vec2::new(25.0, 10.0), Possession::Opponent);
        let t = target_for(&keeper, AiState::GoalkeeperPosition, &far).unwrap();
        assert_eq!(t.x, params.goalkeeper_lateral_range);
        assert!((t.y - (-PITCH_HALF_LENGTH + params.goalkeeper_line_depth)).abs() < 1e-4);

        let near = ctx(&params, Vec2::new(-2.0, -40.0), Possession::Opponent);
        let t = target_for(&keeper, AiState::GoalkeeperPosition, &near).unwrap();
        assert_eq!(t.x, -2.0);
        let nudged = -PITCH_HALF_LENGTH + params.goalkeeper_line_depth + params.goalkeeper_forward_nudge;
        assert!((t.y - nudged).abs() < 1e-4);
    }

    #[test]
    fn test_defender_hold_respects_advance_limit() {
        let params = SteeringParams::default();
        let defender = pitch_entity(PitchRole::Defender, Vec2::new(7.0, 2.0), Vec2::new(7.0, 0.0));
        let c = ctx(&params, Vec2::new(0.0, 50.0), Possession::Own);
        let t = target_for(&defender, AiState::HoldPosition, &c).unwrap();
        assert!(t.y <= params.defender_advance_limit + 1e-4);
    }

    #[test]
    fn test_defend_sits_between_goal_and_ball() {
        let params = SteeringParams::default();
        let defender = pitch_entity(PitchRole::Defender, Vec2::new(7.0, 37.0), Vec2::new(7.0, -37.0));
        let mid = pitch_entity(PitchRole::Midfielder, Vec2::new(8.0, 20.0), Vec2::new(8.0, -20.0));
        let c = ctx(&params, Vec2::new(10.0, 10.0), Possession::Opponent);
        let d = target_for(&defender, AiState::Defend, &c).unwrap();
        let m = target_for(&mid, AiState::Defend, &c).unwrap();
        assert!(d.y > -PITCH_HALF_LENGTH && d.y < 10.0);
        assert!(d.y < m.y, "primary defenders sit deeper");
    }

    #[test]
    fn test_mark_goes_goal_side_of_opponent() {
        let params = SteeringParams::default();
        let defender = pitch_entity(PitchRole::Defender, Vec2::new(7.0, 37.0), Vec2::new(7.0, -37.0));
        let mut c = ctx(&params, Vec2::ZERO, Possession::Opponent);
        c.nearest_opponent = Some(Vec2::new(12.0, -30.0));
        let t = target_for(&defender, AiState::MarkOpponent, &c).unwrap();
        assert_eq!(t.x, 12.0);
        assert!(t.y < -30.0);
    }

    #[test]
    fn test_support_biases_attackers_further_forward() {
        let params = SteeringParams::default();
        let att = pitch_entity(PitchRole::Attacker, Vec2::ZERO, Vec2::ZERO);
        let mid = pitch_entity(PitchRole::Midfielder, Vec2::ZERO, Vec2::ZERO);
        let c = ctx(&params, Vec2::ZERO, Possession::Own);
        let a = target_for(&att, AiState::SupportAttack, &c).unwrap();
        let m = target_for(&mid, AiState::SupportAttack, &c).unwrap();
        assert!(a.y > m.y);
    }

    #[test]
    fn test_decisions_wait_for_cadence() {
        let params = SteeringParams::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut att = pitch_entity(PitchRole::Attacker, Vec2::new(6.0, 1.5), Vec2::new(6.0, -1.5));

        let ours = ctx(&params, Vec2::new(0.0, -20.0), Possession::Own);
        update(&mut att, &ours, &mut rng, SIM_DT);
        assert_eq!(att.steering.state, AiState::SupportAttack);

        // Possession flips, but the next decision is not due yet
        let theirs = ctx(&params, Vec2::new(0.0, 40.0), Possession::Opponent);
        update(&mut att, &theirs, &mut rng, SIM_DT);
        assert_eq!(att.steering.state, AiState::SupportAttack);

        let ticks = (params.decision_interval / SIM_DT).ceil() as usize;
        for _ in 0..ticks {
            update(&mut att, &theirs, &mut rng, SIM_DT);
        }
        assert_eq!(att.steering.state, AiState::HoldPosition);
    }

    #[test]
    fn test_support_offset_refreshes() {
        let params = SteeringParams::default();
        let mut rng = Pcg32::seed_from_u64(9);
        let mut mid = pitch_entity(PitchRole::Midfielder, Vec2::ZERO, Vec2::ZERO);
        let c = ctx(&params, Vec2::ZERO, Possession::Own);
        update(&mut mid, &c, &mut rng, SIM_DT);
        let first = mid.steering.support_offset;
        assert!(first.length() <= params.support_jitter + 1e-4);

        let ticks = (params.support_refresh / SIM_DT).ceil() as usize + 1;
        for _ in 0..ticks {
            update(&mut mid, &c, &mut rng, SIM_DT);
        }
        assert_ne!(mid.steering.support_offset, first);
    }

    #[test]
    fn test_chaser_reaches_ball_and_settles() {
        let params = SteeringParams::default();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut mid = pitch_entity(PitchRole::Midfielder, Vec2::ZERO, Vec2::new(0.0, -10.0));
        let ball = Vec2::new(0.0, 0.0);
        let c = ctx(&params, ball, Possession::Loose);
        for _ in 0..600 {
            update(&mut mid, &c, &mut rng, SIM_DT);
            assert!(mid.vel.length() <= mid.max_speed() + 1e-4);
            mid.pos += mid.vel * SIM_DT;
        }
        assert_eq!(mid.steering.state, AiState::ChaseBall);
        assert!(mid.pos.distance(ball) < params.arrive_threshold + 0.2);
        assert_eq!(mid.vel, Vec2::ZERO);
    }

    #[test]
    fn test_goalkeeper_reacts_faster_than_field_player() {
        let params = SteeringParams::default();
        let mut keeper = pitch_entity(PitchRole::Goalkeeper, Vec2::ZERO, Vec2::ZERO);
        let mut mid = pitch_entity(PitchRole::Midfielder, Vec2::ZERO, Vec2::ZERO);
        let target = Vec2::new(10.0, 0.0);
        steer_toward(&mut keeper, target, 1.0, &params, SIM_DT);
        steer_toward(&mut mid, target, 1.0, &params, SIM_DT);
        let keeper_share = keeper.vel.length() / keeper.cruise_speed();
        let mid_share = mid.vel.length() / mid.cruise_speed();
        assert!(keeper_share > mid_share);
    }

    #[test]
    fn test_receiver_runs_route_after_snap() {
        let tuning = Tuning::default();
        let params = &tuning.steering;
        let mut rng = Pcg32::seed_from_u64(5);
        let role = Role::Gridiron(GridironRole::Receiver(RouteKind::Slant));
        let profile = RoleProfile::for_role(role, Vec2::new(-10.0, 1.5), &tuning);
        let mut wr = Entity::new(7, Side::Home, Vec2::new(-10.0, -41.5), profile);
        let mut c = ctx(params, Vec2::new(0.0, -40.0), Possession::Own);
        c.reference_y = -40.0;

        for _ in 0..120 {
            update(&mut wr, &c, &mut rng, SIM_DT);
            wr.pos += wr.vel * SIM_DT;
        }
        assert_eq!(wr.steering.state, AiState::Route(RouteKind::Slant));
        let route = wr.steering.route.as_ref().unwrap();
        assert!(route.cut_made);
        assert!(wr.vel.x > 0.0, "left-side slant breaks toward the middle");
        assert!(wr.pos.y > -41.5);
    }

    #[test]
    fn test_curl_receiver_stops_when_route_finishes() {
        let tuning = Tuning::default();
        let params = &tuning.steering;
        let mut rng = Pcg32::seed_from_u64(8);
        let role = Role::Gridiron(GridironRole::Receiver(RouteKind::Curl));
        let profile = RoleProfile::for_role(role, Vec2::new(10.0, 1.5), &tuning);
        let mut wr = Entity::new(9, Side::Home, Vec2::new(10.0, -41.5), profile);
        let mut c = ctx(params, Vec2::new(0.0, -40.0), Possession::Own);
        c.reference_y = -40.0;

        for _ in 0..600 {
            update(&mut wr, &c, &mut rng, SIM_DT);
            wr.pos += wr.vel * SIM_DT;
        }
        assert_eq!(wr.steering.state(), AiState::Route(RouteKind::Curl));
        assert!(wr.steering.route.as_ref().unwrap().is_finished());
        assert_eq!(wr.vel, Vec2::ZERO);
    }
}
