//! Read-only match snapshot for presentation layers

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::entity::{Role, Side};
use super::rules::Score;
use super::state::MatchState;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallView {
    pub pos: Vec2,
    pub height: f32,
    pub vel: Vec3,
    pub grounded: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityView {
    pub id: u32,
    pub side: Side,
    pub pos: Vec2,
    pub vel: Vec2,
    pub role: Role,
    /// AI state label
    pub state: String,
    pub has_ball: bool,
    pub controlled: bool,
}

/// Everything a HUD needs after a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HudSnapshot {
    /// Stable phase message key, e.g. "throw_in"
    pub phase_key: String,
    pub score: Score,
    pub clock: String,
    /// Half index or down and distance
    pub detail: String,
    /// Seconds until the next automatic phase change
    pub countdown: Option<f32>,
    pub possession: Side,
    pub ball: BallView,
    pub entities: Vec<EntityView>,
}

impl HudSnapshot {
    pub fn capture(state: &MatchState) -> Self {
        let ball = &state.ball;
        Self {
            phase_key: state.rules.phase().message_key().to_string(),
            score: state.rules.score(),
            clock: state.rules.clock_text(),
            detail: state.rules.detail_text(),
            countdown: state.rules.pending_in(),
            possession: state.rules.possession(),
            ball: BallView {
                pos: ball.ground_pos(),
                height: ball.height(),
                vel: ball.vel,
                grounded: ball.grounded,
            },
            entities: state
                .entities
                .iter()
                .map(|e| EntityView {
                    id: e.id,
                    side: e.side,
                    pos: e.pos,
                    vel: e.vel,
                    role: e.profile.role,
                    state: e.steering.state().label().to_string(),
                    has_ball: e.has_ball,
                    controlled: state.controlled == Some(e.id),
                })
                .collect(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    #[test]
    fn test_capture_pitch_kickoff() {
        let mut state = MatchState::new_pitch(11, Tuning::default());
        state.control_nearest(Side::Home);
        let hud = HudSnapshot::capture(&state);

        assert_eq!(hud.phase_key, "kickoff");
        assert_eq!(hud.clock, "00:00");
        assert_eq!(hud.detail, "Half 1");
        assert_eq!(hud.entities.len(), 22);
        assert_eq!(hud.entities.iter().filter(|e| e.controlled).count(), 1);
        assert!(hud.entities.iter().all(|e| !e.has_ball));
        assert_eq!(hud.countdown, Some(Tuning::default().pitch.kickoff_delay));
    }

    #[test]
    fn test_capture_gridiron_detail() {
        let state = MatchState::new_gridiron(4, Tuning::default());
        let hud = HudSnapshot::capture(&state);
        assert_eq!(hud.entities.len(), 20);
        assert_eq!(hud.score, Score::default());
        assert!(hud.detail.starts_with("1st"));
        assert_eq!(hud.countdown, Some(Tuning::default().gridiron.whistle_delay));
    }

    #[test]
    fn test_snapshot_json_round_trip() {
        let state = MatchState::new_pitch(2, Tuning::default());
        let hud = HudSnapshot::capture(&state);
        let json = hud.to_json().unwrap();
        assert!(json.contains("\"phase_key\":\"kickoff\""));
        let parsed: HudSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, hud);
    }
}
