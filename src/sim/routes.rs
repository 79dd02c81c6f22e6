//! Gridiron receiver routes
//!
//! Routes are direction based: the runner holds a heading and changes it when
//! the distance run since the snap crosses the route's cut threshold.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::normalize_or;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RouteKind {
    /// Straight upfield
    Fly,
    /// Short stem, sharp cut toward the middle
    Slant,
    /// Long stem, cut upfield toward the middle
    Post,
    /// Long stem, turn back toward the line and sit
    Curl,
    /// Hold the line and engage the nearest rusher
    Block,
}

impl RouteKind {
    /// Distance run before the cut (None for routes without one)
    pub fn cut_distance(self) -> Option<f32> {
        match self {
            RouteKind::Fly | RouteKind::Block => None,
            RouteKind::Slant => Some(3.0),
            RouteKind::Post => Some(10.0),
            RouteKind::Curl => Some(10.0),
        }
    }
}

/// Distance a curl runner comes back before settling
const CURL_RETURN: f32 = 2.0;

/// Per-play route progress
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteRunner {
    pub kind: RouteKind,
    /// Current heading (unit vector, zero once the route is finished)
    pub heading: Vec2,
    pub distance_run: f32,
    pub cut_made: bool,
    /// Distance run since the cut
    pub since_cut: f32,
    attack_dir: f32,
    /// +1 when lined up right of centre, -1 left
    inside_sign: f32,
}

impl RouteRunner {
    /// Start a route from the given alignment
    pub fn new(kind: RouteKind, lateral: f32, attack_dir: f32) -> Self {
        Self {
            kind,
            heading: Vec2::new(0.0, attack_dir),
            distance_run: 0.0,
            cut_made: false,
            since_cut: 0.0,
            attack_dir,
            // inside is toward the centre
            inside_sign: if lateral > 0.0 { -1.0 } else { 1.0 },
        }
    }

    /// Record `distance` run this tick and return the heading to follow
    pub fn advance(&mut self, distance: f32) -> Vec2 {
        self.distance_run += distance;
        if self.cut_made {
            self.since_cut += distance;
        }

        let cut_due = matches!(
            self.kind.cut_distance(),
            Some(cut) if !self.cut_made && self.distance_run >= cut
        );
        if cut_due {
            self.cut_made = true;
            self.heading = self.cut_heading();
            log::debug!(
                "{:?} route cut after {:.1} ({:?})",
                self.kind,
                self.distance_run,
                self.heading
            );
        }

        if self.kind == RouteKind::Curl && self.cut_made && self.since_cut >= CURL_RETURN {
            self.heading = Vec2::ZERO;
        }
        self.heading
    }

    fn cut_heading(&self) -> Vec2 {
        let up = self.attack_dir;
        let inside = self.inside_sign;
        let dir = match self.kind {
            RouteKind::Slant => Vec2::new(inside * 1.0, up * 0.8),
            RouteKind::Post => Vec2::new(inside * 0.7, up * 1.0),
            RouteKind::Curl => Vec2::new(inside * 0.3, -up),
            RouteKind::Fly | RouteKind::Block => Vec2::new(0.0, up),
        };
        normalize_or(dir, Vec2::new(0.0, up))
    }

    pub fn is_finished(&self) -> bool {
        self.heading == Vec2::ZERO
    }
}
