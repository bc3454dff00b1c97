//! Rendering abstraction.
//!
//! This crate intentionally does not depend on a graphics backend.
//! The window, GUI, and asset layers implement [`DrawSurface`]; the core
//! only issues draw calls and never reads back.

use crate::math::Vec2;
use crate::wire::PlayerId;

/// A minimal draw-call surface.
pub trait DrawSurface {
    fn draw_local_player(&mut self, position: Vec2);
    fn draw_remote_player(&mut self, id: PlayerId, position: Vec2);
    /// Full-screen fade overlay; `alpha` in `[0,1]`, 1 = fully opaque.
    fn draw_fade_overlay(&mut self, alpha: f32);
}

/// A no-op surface useful for headless runs.
#[derive(Default)]
pub struct NullSurface;

impl DrawSurface for NullSurface {
    fn draw_local_player(&mut self, _position: Vec2) {}
    fn draw_remote_player(&mut self, _id: PlayerId, _position: Vec2) {}
    fn draw_fade_overlay(&mut self, _alpha: f32) {}
}

/// Records every draw call; useful for headless tests.
#[derive(Default)]
pub struct RecordingSurface {
    pub local_players: Vec<Vec2>,
    pub remote_players: Vec<(PlayerId, Vec2)>,
    pub fade_alphas: Vec<f32>,
}

impl RecordingSurface {
    /// Clears all recorded calls, typically between frames.
    pub fn clear(&mut self) {
        self.local_players.clear();
        self.remote_players.clear();
        self.fade_alphas.clear();
    }

    /// Remote player ids drawn since the last clear, sorted.
    pub fn remote_ids(&self) -> Vec<PlayerId> {
        let mut ids: Vec<PlayerId> = self.remote_players.iter().map(|(id, _)| *id).collect();
        ids.sort();
        ids
    }
}

impl DrawSurface for RecordingSurface {
    fn draw_local_player(&mut self, position: Vec2) {
        self.local_players.push(position);
    }

    fn draw_remote_player(&mut self, id: PlayerId, position: Vec2) {
        self.remote_players.push((id, position));
    }

    fn draw_fade_overlay(&mut self, alpha: f32) {
        self.fade_alphas.push(alpha);
    }
}
