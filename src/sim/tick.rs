//! Fixed timestep simulation tick
//!
//! One call advances the whole match in a fixed order: rules snapshot, AI
//! steering, player control, ball, contact, then the rule signals collected on
//! the way. Rule transitions made this tick are only seen by the next one.

use std::cmp::Ordering;

use glam::{Vec2, Vec3};
use rand::Rng;

use super::contact::{self, Approach};
use super::entity::{Entity, GridironRole, Role, Side};
use super::rules::{GridironPhase, MatchPhase, PitchPhase, RuleSignal};
use super::state::{MatchState, Sport};
use super::steering::{self, Possession, SteeringContext};
use crate::consts::*;
use crate::{decay_for, normalize_or};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Movement intent for the controlled entity (zero to stand still)
    pub move_dir: Vec2,
    pub sprint: bool,
    /// Kick the ball along `move_dir` (a punt on the gridiron)
    pub kick: bool,
    /// Pass to the most open teammate
    pub pass: bool,
    pub shoot: bool,
    /// Attempt a tackle on a carrier in range
    pub tackle: bool,
}

/// How far past the lines pitch entities may run
const PITCH_RUNOFF: f32 = 2.0;
/// Controlled kick speed before the power attribute
const KICK_POWER: f32 = 14.0;
const KICK_LIFT: f32 = 0.25;
const PUNT_POWER: f32 = 20.0;
const PUNT_LIFT: f32 = 0.35;
const SHOT_LIFT: f32 = 0.08;
const CLEARANCE_LIFT: f32 = 0.3;
const THROW_LIFT: f32 = 0.25;
/// Spin (rad/s) per unit of lateral input on a controlled shot
const SHOT_CURL: f32 = 8.0;
/// Speed a tackled ball squirts loose at
const LOOSE_BALL_SPEED: f32 = 3.0;
/// Velocity a blocked rusher keeps per reference tick
const BLOCK_HOLD: f32 = 0.85;

/// Advance the match by one timestep
pub fn tick(state: &mut MatchState, input: &TickInput, dt: f32) {
    let dt = dt.min(MAX_DT);
    if dt <= 0.0 {
        return;
    }

    state.signals.clear();
    let phase = state.rules.phase();
    let live = phase.is_live();
    let mut signals = Vec::new();

    steer_ai(state, live, dt);
    steer_controlled(state, input, dt);
    if live && state.sport() == Sport::Gridiron {
        apply_blocks(state, dt);
    }
    move_entities(state, dt);

    if live {
        player_actions(state, input);
        ai_actions(state);
    }

    update_ball(state, dt);

    if live {
        resolve_pickup(state, &mut signals);
        resolve_tackle(state, input, &mut signals);
        detect_boundaries(state, &mut signals);
    }

    for signal in signals {
        if state.rules.apply(signal, &mut state.rng) {
            state.signals.push(signal);
        }
    }
    state.rules.update(dt);

    state.time += dt;
    state.time_ticks += 1;
    state.phase_time += dt;

    let next = state.rules.phase();
    if next != phase {
        state.phase_time = 0.0;
        on_phase_change(state, next);
    }
}

fn nearest_opponent(entities: &[Entity], entity: &Entity) -> Option<Vec2> {
    entities
        .iter()
        .filter(|o| o.side != entity.side)
        .map(|o| o.pos)
        .min_by(|a, b| {
            a.distance_squared(entity.pos)
                .partial_cmp(&b.distance_squared(entity.pos))
                .unwrap_or(Ordering::Equal)
        })
}

fn steer_ai(state: &mut MatchState, live: bool, dt: f32) {
    let carrier_side = state.carrier().map(|c| c.side);
    let ball_pos = state.ball.ground_pos();
    let reference_y = state.rules.reference_y();
    let goal_line = state.goal_line();
    let bounds = state.bounds();
    let controlled = state.controlled;
    let opponents: Vec<Option<Vec2>> = state
        .entities
        .iter()
        .map(|e| nearest_opponent(&state.entities, e))
        .collect();

    for (entity, nearest_opponent) in state.entities.iter_mut().zip(opponents) {
        if controlled == Some(entity.id) {
            continue;
        }
        let possession = match carrier_side {
            Some(side) if side == entity.side => Possession::Own,
            Some(_) => Possession::Opponent,
            None => Possession::Loose,
        };
        let ctx = SteeringContext {
            ball_pos,
            possession,
            nearest_opponent,
            reference_y,
            goal_line,
            play_live: live,
            bounds,
            params: &state.tuning.steering,
        };
        steering::update(entity, &ctx, &mut state.rng, dt);
    }
}

fn steer_controlled(state: &mut MatchState, input: &TickInput, dt: f32) {
    let Some(id) = state.controlled else {
        return;
    };
    let rate = state.tuning.steering.controlled_smoothing;
    let sprint = state.tuning.steering.sprint_multiplier;
    let Some(entity) = state.entity_mut(id) else {
        return;
    };

    let dir = input.move_dir.normalize_or_zero();
    let speed = entity.cruise_speed() * if input.sprint { sprint } else { 1.0 };
    steering::blend_velocity(entity, dir * speed, rate, dt);
}

/// Offensive linemen hold up rushers they are engaged with
fn apply_blocks(state: &mut MatchState, dt: f32) {
    let offence = state.rules.possession();
    let reach = state.tuning.contact.tackle_ranges.gridiron_lineman;
    let blockers: Vec<Vec2> = state
        .entities
        .iter()
        .filter(|e| e.side == offence && e.profile.role == Role::Gridiron(GridironRole::Lineman))
        .map(|e| e.pos)
        .collect();

    let hold = decay_for(BLOCK_HOLD, dt);
    for rusher in state.entities.iter_mut().filter(|e| e.side != offence) {
        if blockers.iter().any(|b| b.distance(rusher.pos) <= reach) {
            rusher.vel *= hold;
        }
    }
}

fn move_entities(state: &mut MatchState, dt: f32) {
    let bounds = state.bounds();
    let margin = match state.sport() {
        Sport::Pitch => PITCH_RUNOFF,
        Sport::Gridiron => 0.0,
    };
    let limit = Vec2::new(bounds.half_width + margin, bounds.half_length + margin);

    for entity in &mut state.entities {
        entity.tackle_cooldown = (entity.tackle_cooldown - dt).max(0.0);
        entity.pos = (entity.pos + entity.vel * dt).clamp(-limit, limit);
    }
}

/// Launch the ball off the entity at `index`
fn kick(state: &mut MatchState, index: usize, direction: Vec2, power: f32, lift: f32, spin: Vec3) {
    let entity = &mut state.entities[index];
    entity.has_ball = false;
    let (id, side) = (entity.id, entity.side);

    let params = &state.tuning.ball;
    state
        .ball
        .apply_impulse(params, direction, power, spin, lift, Some(side));
    state.ball.mark_kicked(id, side, params.kick_touch_cooldown);
    log::debug!(
        "Entity {id} kicks: power={power:.1} lift={lift:.2} dir={direction:?}"
    );
}

/// Forward pass to a point, lofted to land near it
fn throw_to(state: &mut MatchState, index: usize, target: Vec2) {
    let from = state.entities[index].pos;
    let range = from.distance(target);
    let nominal = state.tuning.gridiron.pass_speed;
    let gravity = state.tuning.ball.gravity;
    // Flat-ground range of a lofted ball is 2·lift·v²/g; pad a little for drag
    let speed = ((range * gravity / (2.0 * THROW_LIFT)).sqrt() * 1.1)
        .clamp(nominal * 0.5, nominal * 1.5);

    kick(state, index, target - from, speed, THROW_LIFT, Vec3::ZERO);
    state.pass_in_flight = true;
    log::info!("Pass thrown {range:.0} yards");
}

/// Teammate with the most space, weighted toward forward progress
fn open_teammate(
    state: &MatchState,
    index: usize,
    max_range: f32,
    eligible: impl Fn(&Entity) -> bool,
) -> Option<usize> {
    let carrier = &state.entities[index];
    let dir = carrier.side.attack_dir();

    state
        .entities
        .iter()
        .enumerate()
        .filter(|(i, e)| *i != index && e.side == carrier.side && eligible(e))
        .filter_map(|(i, e)| {
            let distance = e.distance_to(carrier.pos);
            if !(5.0..=max_range).contains(&distance) {
                return None;
            }
            let space = nearest_opponent(&state.entities, e)
                .map_or(20.0, |o| o.distance(e.pos))
                .min(20.0);
            let progress = (e.pos.y - carrier.pos.y) * dir;
            Some((i, space + progress * 0.5))
        })
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal))
        .map(|(i, _)| i)
}

/// Where to aim a pass so it meets a moving teammate
fn lead_target(from: Vec2, receiver: &Entity, speed: f32) -> Vec2 {
    let flight = from.distance(receiver.pos) / speed.max(1.0);
    receiver.pos + receiver.vel * flight
}

fn is_receiver(e: &Entity) -> bool {
    matches!(e.profile.role, Role::Gridiron(GridironRole::Receiver(_)))
}

/// Edge-triggered actions for the controlled carrier
fn player_actions(state: &mut MatchState, input: &TickInput) {
    let Some(id) = state.controlled else {
        return;
    };
    let Some(index) = state.entities.iter().position(|e| e.id == id && e.has_ball) else {
        return;
    };

    let entity = &state.entities[index];
    let side = entity.side;
    let pos = entity.pos;
    let power = entity.attrs.power_factor();
    let forward = Vec2::new(0.0, side.attack_dir());
    let facing = normalize_or(input.move_dir, normalize_or(entity.vel, forward));

    match state.sport() {
        Sport::Pitch => {
            if input.shoot {
                let goal = forward * state.goal_line();
                let aim = goal + Vec2::new(input.move_dir.x * GOAL_HALF_WIDTH * 0.6, 0.0);
                let spin = Vec3::new(0.0, 0.0, input.move_dir.x * SHOT_CURL);
                let shot = state.tuning.steering.shot_power * power;
                kick(state, index, aim - pos, shot, SHOT_LIFT, spin);
            } else if input.pass {
                let speed = state.tuning.steering.pass_power;
                let target = open_teammate(state, index, 35.0, |e| !e.profile.is_goalkeeper())
                    .map_or(pos + facing, |t| lead_target(pos, &state.entities[t], speed));
                kick(state, index, target - pos, speed * power, 0.0, Vec3::ZERO);
            } else if input.kick {
                kick(state, index, facing, KICK_POWER * power, KICK_LIFT, Vec3::ZERO);
            }
        }
        Sport::Gridiron => {
            if input.pass && !state.pass_in_flight {
                let speed = state.tuning.gridiron.pass_speed;
                let target = open_teammate(state, index, 40.0, is_receiver)
                    .map_or(pos + facing * 15.0, |t| {
                        lead_target(pos, &state.entities[t], speed)
                    });
                throw_to(state, index, target);
            } else if input.kick {
                kick(state, index, facing, PUNT_POWER * power, PUNT_LIFT, Vec3::ZERO);
                state.kick_in_flight = Some(side);
                log::info!("{side:?} punt");
            }
        }
    }
}

/// Carrier decisions for AI-controlled ball holders
fn ai_actions(state: &mut MatchState) {
    let Some(index) = state.carrier_index() else {
        return;
    };
    if state.controlled == Some(state.entities[index].id) {
        return;
    }
    match state.sport() {
        Sport::Pitch => ai_pitch_carrier(state, index),
        Sport::Gridiron => ai_gridiron_carrier(state, index),
    }
}

fn ai_pitch_carrier(state: &mut MatchState, index: usize) {
    let carrier = &state.entities[index];
    let dir = carrier.side.attack_dir();
    let pos = carrier.pos;
    let power = carrier.attrs.power_factor();
    let params = &state.tuning.steering;
    let goal = Vec2::new(0.0, dir * state.goal_line());

    if carrier.profile.is_goalkeeper() {
        let lateral = state.rng.random_range(-0.4..=0.4);
        let clearance = params.clearance_power * power;
        kick(state, index, Vec2::new(lateral, dir), clearance, CLEARANCE_LIFT, Vec3::ZERO);
        return;
    }

    if pos.distance(goal) < params.shooting_range {
        let post = GOAL_HALF_WIDTH - 0.6;
        let aim = Vec2::new(state.rng.random_range(-post..=post), goal.y);
        let spin = Vec3::new(0.0, 0.0, state.rng.random_range(-4.0..=4.0));
        let shot = params.shot_power * power;
        log::debug!("Entity {} shoots from {:.0}", carrier.id, pos.distance(goal));
        kick(state, index, aim - pos, shot, SHOT_LIFT, spin);
        return;
    }

    let pressured = nearest_opponent(&state.entities, carrier)
        .is_some_and(|o| o.distance(pos) <= params.pressure_distance);
    if pressured {
        let speed = params.pass_power;
        if let Some(t) = open_teammate(state, index, 35.0, |e| !e.profile.is_goalkeeper()) {
            let target = lead_target(pos, &state.entities[t], speed);
            kick(state, index, target - pos, speed * power, 0.0, Vec3::ZERO);
        }
    }
}

fn ai_gridiron_carrier(state: &mut MatchState, index: usize) {
    let Some(rules) = state.rules.gridiron() else {
        return;
    };
    let carrier = &state.entities[index];
    let dir = carrier.side.attack_dir();
    let behind_line = (carrier.pos.y - rules.line_of_scrimmage) * dir <= 1.0;
    let passer = carrier.profile.role == Role::Gridiron(GridironRole::Back);

    if passer
        && behind_line
        && !state.pass_in_flight
        && state.phase_time >= state.tuning.gridiron.throw_time
    {
        let pos = carrier.pos;
        let speed = state.tuning.gridiron.pass_speed;
        if let Some(t) = open_teammate(state, index, 40.0, is_receiver) {
            let target = lead_target(pos, &state.entities[t], speed);
            throw_to(state, index, target);
        }
    }
}

fn update_ball(state: &mut MatchState, dt: f32) {
    let params = &state.tuning.ball;
    match state.carrier_index() {
        Some(i) => {
            let carrier = &state.entities[i];
            state
                .ball
                .apply_carry(params, carrier.pos, carrier.vel, params.carry_easing, dt);
            state.ball.last_toucher = Some(carrier.side);
        }
        None => state.ball.integrate(params, dt, &mut state.rng),
    }
}

/// A loose ball within reach is controlled by the nearest entity
fn resolve_pickup(state: &mut MatchState, signals: &mut Vec<RuleSignal>) {
    if state.carrier_index().is_some() {
        return;
    }
    let ball = &state.ball;
    if ball.height() > state.tuning.ball.control_height {
        return;
    }
    let sport = state.sport();
    // Gridiron balls are only caught in the air; a grounded ball is dead
    if sport == Sport::Gridiron && ball.height() <= 0.0 {
        return;
    }

    let ball_pos = ball.ground_pos();
    let contact = &state.tuning.contact;
    let was_pass = state.pass_in_flight;
    let punter = state.kick_in_flight;
    let picked = state
        .entities
        .iter()
        .enumerate()
        .filter(|(_, e)| !(ball.touch_cooldown > 0.0 && ball.last_touch_id == Some(e.id)))
        // A punt belongs to the receivers until one of them touches it
        .filter(|(_, e)| punter != Some(e.side))
        // Linemen are not eligible receivers
        .filter(|(_, e)| !(was_pass && e.profile.role == Role::Gridiron(GridironRole::Lineman)))
        .filter_map(|(i, e)| {
            let reach = match sport {
                Sport::Pitch if e.profile.is_goalkeeper() => contact.goalkeeper_reach,
                Sport::Pitch => contact.pitch_control_radius,
                Sport::Gridiron => contact.gridiron_control_radius,
            };
            let distance = e.distance_to(ball_pos);
            (distance <= reach).then_some((i, distance))
        })
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal))
        .map(|(i, _)| i);

    let Some(index) = picked else {
        return;
    };
    let side = state.entities[index].side;
    let holder = state.rules.possession();
    state.give_ball(index);

    if side != holder {
        if was_pass {
            log::info!("Intercepted by entity {}", state.entities[index].id);
        }
        signals.push(RuleSignal::PossessionChanged { side });
    } else if was_pass {
        log::info!("Caught by entity {}", state.entities[index].id);
    }
}

/// At most one tackle is resolved per tick
fn resolve_tackle(state: &mut MatchState, input: &TickInput, signals: &mut Vec<RuleSignal>) {
    let Some(ci) = state.carrier_index() else {
        return;
    };
    let carrier_side = state.entities[ci].side;
    let controlled = state.controlled;

    let tackler = state
        .entities
        .iter()
        .enumerate()
        .find(|(_, e)| {
            e.side != carrier_side
                && e.tackle_cooldown <= 0.0
                && (controlled != Some(e.id) || input.tackle)
                && contact::is_in_range(e, &state.entities[ci], None)
        })
        .map(|(i, _)| i);
    let Some(ti) = tackler else {
        return;
    };

    let outcome = contact::resolve(&state.entities[ti], &state.entities[ci], &mut state.rng);
    let contact_params = &state.tuning.contact;
    state.entities[ti].tackle_cooldown = contact_params.tackle_cooldown;

    let knock = outcome.knockback * contact_params.knockback_speed;
    let carrier = &mut state.entities[ci];
    carrier.vel = carrier.vel * (1.0 - outcome.slowdown) + knock;
    if !outcome.success {
        log::debug!("Entity {} breaks the tackle", carrier.id);
        return;
    }

    let (carrier_id, carrier_pos, carrier_vel) = (carrier.id, carrier.pos, carrier.vel);
    match state.sport() {
        Sport::Pitch => {
            let foul = outcome.approach == Approach::Behind
                && state.rng.random::<f32>() < contact_params.behind_foul_chance;
            if foul {
                signals.push(RuleSignal::Foul {
                    pos: carrier_pos,
                    fouled: carrier_side,
                });
                return;
            }
            // Dispossessed: the ball squirts away along the push
            state.entities[ci].has_ball = false;
            let push = normalize_or(outcome.knockback, Vec2::new(0.0, carrier_side.attack_dir()));
            let loose = carrier_vel * 0.5 + push * LOOSE_BALL_SPEED;
            state.ball.vel = loose.extend(0.0);
            state.ball.mark_kicked(
                carrier_id,
                carrier_side.opponent(),
                state.tuning.ball.kick_touch_cooldown,
            );
        }
        Sport::Gridiron => {
            log::info!("Carrier {carrier_id} down at {:.0}", carrier_pos.y);
            signals.push(RuleSignal::PlayEnded { y: carrier_pos.y });
        }
    }
}

fn detect_boundaries(state: &MatchState, signals: &mut Vec<RuleSignal>) {
    let ball = &state.ball;
    match state.sport() {
        Sport::Pitch => {
            if ball.pos.y.abs() > PITCH_HALF_LENGTH {
                let in_mouth = ball.pos.x.abs() <= GOAL_HALF_WIDTH && ball.height() <= CROSSBAR_HEIGHT;
                if in_mouth {
                    // Home attacks +y whoever touched it last
                    let scorer = if ball.pos.y > 0.0 { Side::Home } else { Side::Away };
                    signals.push(RuleSignal::Goal { scorer });
                } else {
                    signals.push(RuleSignal::BallOut {
                        pos: ball.ground_pos(),
                        last_toucher: ball.last_toucher,
                    });
                }
            } else if ball.pos.x.abs() > PITCH_HALF_WIDTH {
                signals.push(RuleSignal::BallOut {
                    pos: ball.ground_pos(),
                    last_toucher: ball.last_toucher,
                });
            }
        }
        Sport::Gridiron => {
            let bounds = state.bounds();
            if let Some(carrier) = state.carrier() {
                let scored = carrier.pos.y * carrier.side.attack_dir() >= GRIDIRON_GOAL_LINE;
                // Entities are clamped to the field, so touching the edge is out
                let out = carrier.pos.x.abs() >= bounds.half_width
                    || carrier.pos.y.abs() >= bounds.half_length;
                if scored || out {
                    signals.push(RuleSignal::PlayEnded { y: carrier.pos.y });
                }
                return;
            }
            let out = ball.pos.x.abs() > bounds.half_width || ball.pos.y.abs() > bounds.half_length;
            if ball.height() <= 0.0 || out {
                if state.pass_in_flight {
                    signals.push(RuleSignal::Incomplete);
                } else if state.kick_in_flight.is_some() {
                    signals.push(RuleSignal::KickDead { y: ball.pos.y });
                } else {
                    signals.push(RuleSignal::PlayEnded { y: ball.pos.y });
                }
            }
        }
    }
}

/// Put the world in shape for the phase just entered
fn on_phase_change(state: &mut MatchState, phase: MatchPhase) {
    match phase {
        MatchPhase::Pitch(PitchPhase::Kickoff) => {
            state.reset_formations(0.0);
            state.ball.reset_to(Vec2::ZERO);
        }
        MatchPhase::Pitch(PitchPhase::Playing) => {
            // Kickoffs and restarts: the awarded side takes the ball on the spot
            let spot = state.ball.ground_pos();
            let side = state.rules.possession();
            if let Some(i) = state.nearest_of_side(side, spot) {
                state.entities[i].pos = spot;
                state.entities[i].vel = Vec2::ZERO;
                state.give_ball(i);
            }
        }
        MatchPhase::Pitch(PitchPhase::HalfTime) => {
            state.release_ball();
            state.ball.reset_to(Vec2::ZERO);
        }
        MatchPhase::Pitch(restart) if restart.is_restart() => {
            state.release_ball();
            if let Some(spot) = state.rules.pitch().and_then(|r| r.restart_spot()) {
                state.ball.reset_to(spot);
            }
        }
        MatchPhase::Pitch(_) => state.release_ball(),
        MatchPhase::Gridiron(GridironPhase::Kickoff) => {
            state.release_ball();
            state.pass_in_flight = false;
            state.kick_in_flight = None;
            let kicking = state
                .rules
                .gridiron()
                .map_or(Side::Home, |r| r.kicking);
            let tee = -kicking.attack_dir() * (GRIDIRON_GOAL_LINE - state.tuning.gridiron.kickoff_tee);
            state.ball.reset_to(Vec2::new(0.0, tee));
        }
        MatchPhase::Gridiron(GridironPhase::PreSnap) => {
            let offence = state.rules.possession();
            let line = state.rules.reference_y();
            state.assign_gridiron_formations(offence);
            state.reset_formations(line);
            state.ball.reset_to(Vec2::new(0.0, line));
            state.pass_in_flight = false;
            state.kick_in_flight = None;
        }
        MatchPhase::Gridiron(GridironPhase::Live) => {
            let offence = state.rules.possession();
            let spot = state.ball.ground_pos();
            let passer = state
                .entities
                .iter()
                .position(|e| e.side == offence && e.profile.role == Role::Gridiron(GridironRole::Back))
                .or_else(|| state.nearest_of_side(offence, spot));
            if let Some(i) = passer {
                state.give_ball(i);
                state.ball.reset_to(state.entities[i].pos);
            }
        }
        MatchPhase::Gridiron(GridironPhase::Whistle) => {
            state.release_ball();
            state.pass_in_flight = false;
            state.kick_in_flight = None;
            let spot = state.ball.ground_pos();
            state.ball.reset_to(spot);
        }
        MatchPhase::Gridiron(GridironPhase::CoinFlip) => {}
    }
}
