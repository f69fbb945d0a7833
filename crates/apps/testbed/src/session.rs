//! Run state shared between the simulation loop and whoever drives it

use glam::Vec3;

/// Play state, score and the rider's latest kinematics
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionState {
    pub is_playing: bool,
    pub is_paused: bool,
    pub score: u64,
    pub player_position: Vec3,
    pub player_velocity: Vec3,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a run; clears any pause
    pub fn start(&mut self) {
        self.is_playing = true;
        self.is_paused = false;
    }

    /// Pause, only while a run is in progress
    pub fn pause(&mut self) {
        if self.is_playing {
            self.is_paused = true;
        }
    }

    pub fn resume(&mut self) {
        self.is_paused = false;
    }

    pub fn end(&mut self) {
        self.is_playing = false;
        self.is_paused = false;
    }

    pub fn add_score(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
    }

    pub fn update_player_position(&mut self, position: Vec3) {
        self.player_position = position;
    }

    pub fn update_player_velocity(&mut self, velocity: Vec3) {
        self.player_velocity = velocity;
    }

    /// Whether the simulation should advance this frame
    pub fn is_running(&self) -> bool {
        self.is_playing && !self.is_paused
    }

    /// Back to the idle state with zero score
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
