//! Local player.
//!
//! Moves immediately from local input (prediction) and replicates changes:
//! a direction change emits `PlayerMove`, a release emits `PlayerStop`.
//! Steady movement sends nothing; the server dead-reckons from velocity.

use realm_shared::math::Vec2;
use realm_shared::wire::{Message, PlayerId};

use crate::scene::SceneContext;

pub struct LocalPlayer {
    id: PlayerId,
    position: Vec2,
    velocity: Vec2,
    move_speed: f32,
}

impl LocalPlayer {
    pub fn new(id: PlayerId, spawn: Vec2, move_speed: f32) -> Self {
        Self {
            id,
            position: spawn,
            velocity: Vec2::ZERO,
            move_speed,
        }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn update(&mut self, ctx: &mut SceneContext<'_>, dt: f32) {
        let wish = ctx.input.movement_axis().normalized_or_zero() * self.move_speed;
        if wish != self.velocity {
            self.velocity = wish;
            if wish == Vec2::ZERO {
                ctx.send(Message::PlayerStop {
                    position: self.position,
                });
            } else {
                ctx.send(Message::PlayerMove {
                    position: self.position,
                    velocity: self.velocity,
                });
            }
        }
        self.position += self.velocity * dt;
    }
}
