//! Ball flight, bounce and roll
//!
//! Positions are x lateral, y depth, z height. Velocities are units per second.
//! Per-tick decays are defined at the 60 Hz reference rate and rescaled for `dt`.

use glam::{Vec2, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::Side;
use crate::tuning::BallParams;
use crate::{decay_for, normalize_or, smoothing_alpha};

/// The match ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec3,
    pub vel: Vec3,
    /// Angular velocity (rad/s)
    pub spin: Vec3,
    pub grounded: bool,
    /// Seconds since the ball last left the ground
    pub air_time: f32,
    pub last_toucher: Option<Side>,
    /// Entity that last kicked the ball
    #[serde(default)]
    pub last_touch_id: Option<u32>,
    /// Seconds before the last kicker may control the ball again
    #[serde(default)]
    pub touch_cooldown: f32,
}

impl Ball {
    pub fn new(spot: Vec2) -> Self {
        Self {
            pos: spot.extend(0.0),
            vel: Vec3::ZERO,
            spin: Vec3::ZERO,
            grounded: true,
            air_time: 0.0,
            last_toucher: None,
            last_touch_id: None,
            touch_cooldown: 0.0,
        }
    }

    /// Place the ball on a spot with all motion zeroed
    pub fn reset_to(&mut self, spot: Vec2) {
        self.pos = spot.extend(0.0);
        self.vel = Vec3::ZERO;
        self.spin = Vec3::ZERO;
        self.grounded = true;
        self.air_time = 0.0;
        self.touch_cooldown = 0.0;
        self.last_touch_id = None;
    }

    #[inline]
    pub fn ground_pos(&self) -> Vec2 {
        self.pos.truncate()
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.pos.z
    }

    #[inline]
    pub fn horizontal_speed(&self) -> f32 {
        self.vel.truncate().length()
    }

    pub fn is_airborne(&self) -> bool {
        self.pos.z > 0.0 || self.vel.z != 0.0
    }

    /// Lateral acceleration from spin (Magnus curve), horizontal only
    pub fn magnus_accel(&self, params: &BallParams) -> Vec2 {
        if self.spin.length() <= params.spin_epsilon {
            return Vec2::ZERO;
        }
        (self.spin.cross(self.vel) * params.curve_strength).truncate()
    }

    /// Advance the ball by one timestep
    pub fn integrate(&mut self, params: &BallParams, dt: f32, rng: &mut impl Rng) {
        if dt <= 0.0 {
            return;
        }
        self.touch_cooldown = (self.touch_cooldown - dt).max(0.0);

        let airborne = self.is_airborne();
        if airborne {
            self.vel.z -= params.gravity * dt;
            self.air_time += dt;
            self.grounded = false;
        } else {
            self.grounded = true;
        }

        let curve = self.magnus_accel(params);
        self.vel.x += curve.x * dt;
        self.vel.y += curve.y * dt;

        // Quadratic drag, never strong enough to reverse the ball
        let speed = self.vel.length();
        if speed > 0.0 {
            let k = if airborne {
                params.air_drag
            } else {
                params.ground_drag
            };
            let loss = (k * speed * speed * dt).min(speed);
            self.vel -= self.vel / speed * loss;
        }

        if self.grounded {
            let friction = decay_for(params.ground_friction, dt);
            self.vel.x *= friction;
            self.vel.y *= friction;
        }

        self.spin *= decay_for(params.spin_decay, dt);

        self.pos += self.vel * dt;

        if self.pos.z <= 0.0 && self.vel.z < 0.0 {
            let impact = -self.vel.z;
            self.pos.z = 0.0;
            if impact > params.bounce_threshold {
                self.vel.z = impact * params.restitution;
                self.vel.x *= params.bounce_horizontal_damping;
                self.vel.y *= params.bounce_horizontal_damping;
                let j = params.bounce_spin_jitter;
                if j > 0.0 {
                    self.spin += Vec3::new(
                        rng.random_range(-j..=j),
                        rng.random_range(-j..=j),
                        rng.random_range(-j..=j),
                    );
                }
                self.grounded = false;
            } else {
                self.vel.z = 0.0;
                self.grounded = true;
                self.air_time = 0.0;
            }
        } else if self.pos.z < 0.0 {
            self.pos.z = 0.0;
        }

        if self.grounded && self.horizontal_speed() < params.stop_speed {
            self.vel.x = 0.0;
            self.vel.y = 0.0;
        }
        if self.spin.length() < params.spin_stop {
            self.spin = Vec3::ZERO;
        }
    }

    /// Launch the ball from a kick, pass or shot
    ///
    /// `direction` is horizontal; a zero vector falls back to the toucher's
    /// attacking direction (or +y with no toucher).
    pub fn apply_impulse(
        &mut self,
        params: &BallParams,
        direction: Vec2,
        power: f32,
        spin: Vec3,
        lift_fraction: f32,
        toucher: Option<Side>,
    ) {
        let forward = Vec2::new(0.0, toucher.map_or(1.0, Side::attack_dir));
        if direction.try_normalize().is_none() {
            log::warn!("Impulse with degenerate direction {direction:?}, kicking forward");
        }
        let dir = normalize_or(direction, forward);

        let horizontal = dir * power;
        let lifted = lift_fraction > params.lift_threshold;
        self.vel = horizontal.extend(if lifted { power * lift_fraction } else { 0.0 });
        self.spin = spin;
        if lifted {
            self.grounded = false;
            self.air_time = 0.0;
        }
        self.last_toucher = toucher;
    }

    /// Keep the ball at a carrier's feet, easing toward a point just ahead of them
    pub fn apply_carry(
        &mut self,
        params: &BallParams,
        carrier_pos: Vec2,
        carrier_vel: Vec2,
        easing: f32,
        dt: f32,
    ) {
        let lead = carrier_vel.normalize_or_zero() * params.carry_lead;
        let target = carrier_pos + lead;
        let alpha = smoothing_alpha(easing, dt);
        let ground = self.ground_pos().lerp(target, alpha);

        self.pos = ground.extend(0.0);
        self.vel = (carrier_vel * params.carry_velocity_inherit).extend(0.0);
        self.spin = Vec3::ZERO;
        self.grounded = true;
        self.air_time = 0.0;
    }

    /// Take the ball off a carrier's foot with a kick
    pub fn mark_kicked(&mut self, kicker: u32, side: Side, cooldown: f32) {
        self.last_touch_id = Some(kicker);
        self.last_toucher = Some(side);
        self.touch_cooldown = cooldown;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn rolling_ball(vx: f32, vy: f32) -> Ball {
        let mut ball = Ball::new(Vec2::ZERO);
        ball.vel = Vec3::new(vx, vy, 0.0);
        ball
    }

    #[test]
    fn test_ground_ball_comes_to_rest() {
        let params = BallParams::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut ball = rolling_ball(12.0, -5.0);
        let mut last = ball.horizontal_speed();
        let mut ticks = 0;
        while ball.horizontal_speed() > 0.0 {
            ball.integrate(&params, SIM_DT, &mut rng);
            let speed = ball.horizontal_speed();
            assert!(speed < last, "speed must strictly decrease");
            last = speed;
            ticks += 1;
            assert!(ticks < 2000, "ball never stopped");
        }
        assert_eq!(ball.vel, Vec3::ZERO);
        assert_eq!(ball.height(), 0.0);
    }

    #[test]
    fn test_bounce_reflects_and_restitutes() {
        let params = BallParams::default();
        let mut rng = Pcg32::seed_from_u64(2);
        let mut ball = Ball::new(Vec2::ZERO);
        ball.pos.z = 0.05;
        ball.vel = Vec3::new(3.0, 0.0, -8.0);
        ball.grounded = false;
        ball.integrate(&params, SIM_DT, &mut rng);

        assert_eq!(ball.height(), 0.0);
        assert!(ball.vel.z > 0.0);
        let bound = params.restitution * (8.0 + params.gravity * SIM_DT);
        assert!(ball.vel.z <= bound + 1e-4);
        assert!(!ball.grounded);
        assert!(ball.vel.x < 3.0);
    }

    #[test]
    fn test_slow_landing_settles() {
        let params = BallParams::default();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut ball = Ball::new(Vec2::ZERO);
        ball.pos.z = 0.001;
        ball.vel = Vec3::new(2.0, 0.0, -0.3);
        ball.air_time = 1.0;
        ball.grounded = false;
        ball.integrate(&params, SIM_DT, &mut rng);

        assert!(ball.grounded);
        assert_eq!(ball.vel.z, 0.0);
        assert_eq!(ball.height(), 0.0);
        assert_eq!(ball.air_time, 0.0);
    }

    #[test]
    fn test_gravity_accumulates_air_time() {
        let params = BallParams::default();
        let mut rng = Pcg32::seed_from_u64(4);
        let mut ball = Ball::new(Vec2::ZERO);
        ball.apply_impulse(&params, Vec2::Y, 20.0, Vec3::ZERO, 0.4, Some(Side::Home));
        for _ in 0..10 {
            ball.integrate(&params, SIM_DT, &mut rng);
        }
        assert!(ball.height() > 0.0);
        assert!(ball.vel.z < 8.0);
        assert!((ball.air_time - 10.0 * SIM_DT).abs() < 1e-4);
    }

    #[test]
    fn test_magnus_sign_reverses_with_spin() {
        let params = BallParams::default();
        let mut ball = Ball::new(Vec2::ZERO);
        ball.vel = Vec3::new(0.0, 20.0, 0.0);
        ball.spin = Vec3::new(0.0, 0.0, 8.0);
        let left = ball.magnus_accel(&params);
        ball.spin = -ball.spin;
        let right = ball.magnus_accel(&params);

        assert!(left.x < 0.0);
        assert!(right.x > 0.0);
        assert!((left + right).length() < 1e-6);
        assert_eq!(left.y, 0.0);
    }

    #[test]
    fn test_zero_direction_kicks_forward() {
        let params = BallParams::default();
        let mut ball = Ball::new(Vec2::ZERO);
        ball.apply_impulse(&params, Vec2::ZERO, 10.0, Vec3::ZERO, 0.0, Some(Side::Away));
        assert!(ball.vel.is_finite());
        assert!((ball.vel.y + 10.0).abs() < 1e-5);
        assert_eq!(ball.last_toucher, Some(Side::Away));
        assert!(ball.grounded);
    }

    #[test]
    fn test_lifted_impulse_leaves_ground() {
        let params = BallParams::default();
        let mut ball = Ball::new(Vec2::ZERO);
        ball.air_time = 3.0;
        ball.apply_impulse(&params, Vec2::X, 15.0, Vec3::ZERO, 0.3, None);
        assert!(!ball.grounded);
        assert_eq!(ball.air_time, 0.0);
        assert!(ball.vel.z > 0.0);
    }

    #[test]
    fn test_carry_follows_carrier() {
        let params = BallParams::default();
        let mut ball = Ball::new(Vec2::ZERO);
        ball.pos.z = 0.5;
        let carrier = Vec2::new(4.0, 0.0);
        let carrier_vel = Vec2::new(5.0, 0.0);
        for _ in 0..60 {
            ball.apply_carry(&params, carrier, carrier_vel, params.carry_easing, SIM_DT);
        }
        let expected = carrier + Vec2::X * params.carry_lead;
        assert!(ball.ground_pos().distance(expected) < 0.05);
        assert_eq!(ball.height(), 0.0);
        assert!((ball.vel.x - 5.0 * params.carry_velocity_inherit).abs() < 1e-5);
    }

    #[test]
    fn test_spin_below_threshold_is_zeroed() {
        let params = BallParams::default();
        let mut rng = Pcg32::seed_from_u64(5);
        let mut ball = Ball::new(Vec2::ZERO);
        ball.spin = Vec3::new(0.0, 0.0, params.spin_stop * 0.5);
        ball.integrate(&params, SIM_DT, &mut rng);
        assert_eq!(ball.spin, Vec3::ZERO);
    }

    proptest! {
        #[test]
        fn prop_ground_speed_decays_to_zero(vx in -30.0f32..30.0, vy in -30.0f32..30.0) {
            let params = BallParams::default();
            let mut rng = Pcg32::seed_from_u64(7);
            let mut ball = rolling_ball(vx, vy);
            let mut last = ball.horizontal_speed();
            let mut ticks = 0;
            while ball.horizontal_speed() > 0.0 {
                ball.integrate(&params, SIM_DT, &mut rng);
                prop_assert!(ball.horizontal_speed() < last);
                last = ball.horizontal_speed();
                ticks += 1;
                prop_assert!(ticks < 2000);
            }
        }

        #[test]
        fn prop_bounce_never_gains_energy(vz in -25.0f32..-1.5, height in 0.0f32..0.02) {
            let params = BallParams::default();
            let mut rng = Pcg32::seed_from_u64(11);
            let mut ball = Ball::new(Vec2::ZERO);
            ball.pos.z = height;
            ball.vel = Vec3::new(0.0, 5.0, vz);
            ball.grounded = false;
            ball.integrate(&params, SIM_DT, &mut rng);
            prop_assert!(ball.height() >= 0.0);
            if ball.height() == 0.0 && ball.vel.z > 0.0 {
                let bound = params.restitution * (-vz + params.gravity * SIM_DT);
                prop_assert!(ball.vel.z <= bound + 1e-4);
            }
        }
    }
}
