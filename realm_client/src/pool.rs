//! Remote player pool.
//!
//! Authoritative cache of remote players keyed by id. Lifecycle events
//! (join/leave/roster) decide membership; movement events only ever touch
//! entities the server has already reported as joined. Out-of-order or
//! duplicate events are absorbed as no-ops, since the wire protocol does
//! not guarantee exactly-once delivery.

use std::collections::HashMap;

use realm_shared::math::Vec2;
use realm_shared::render::DrawSurface;
use realm_shared::wire::{Message, PlayerId, PlayerSnapshot};
use tracing::{debug, trace};

/// Exponential approach rate toward the interpolation target.
const APPROACH_RATE: f32 = 8.0;
/// Distance below which the displayed position snaps onto the target.
const SNAP_EPSILON: f32 = 0.01;

/// A remote player as rendered locally.
#[derive(Debug, Clone, Copy)]
pub struct RemotePlayer {
    /// Position currently rendered.
    pub displayed: Vec2,
    /// Most recent authoritative position, animated toward.
    pub target: Vec2,
    /// Last reported velocity, used to dead-reckon the target.
    pub velocity: Vec2,
}

impl RemotePlayer {
    fn at(position: Vec2) -> Self {
        Self {
            displayed: position,
            target: position,
            velocity: Vec2::ZERO,
        }
    }

    fn from_snapshot(snap: &PlayerSnapshot) -> Self {
        Self {
            displayed: snap.position,
            target: snap.position,
            velocity: snap.velocity,
        }
    }
}

#[derive(Default)]
pub struct PlayerPool {
    players: HashMap<PlayerId, RemotePlayer>,
}

impl PlayerPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one lifecycle/movement message. Messages for unknown ids
    /// are no-ops; the pool never creates entities speculatively.
    pub fn process_message(&mut self, msg: &Message) {
        match msg {
            Message::PlayerJoin {
                player_id,
                position,
            } => {
                // Re-joins are an idempotent refresh, not an error.
                debug!(player = player_id.0, "player joined");
                self.players.insert(*player_id, RemotePlayer::at(*position));
            }
            Message::PlayerLeave { player_id } => {
                if self.players.remove(player_id).is_some() {
                    debug!(player = player_id.0, "player left");
                }
            }
            Message::PlayersResponse { players } => {
                debug!(count = players.len(), "roster replaced");
                self.players = players
                    .iter()
                    .map(|snap| (snap.id, RemotePlayer::from_snapshot(snap)))
                    .collect();
            }
            Message::OtherPlayerMove {
                player_id,
                position,
                velocity,
            } => {
                if let Some(player) = self.players.get_mut(player_id) {
                    player.target = *position;
                    player.velocity = *velocity;
                }
            }
            Message::OtherPlayerStop {
                player_id,
                position,
            } => {
                if let Some(player) = self.players.get_mut(player_id) {
                    player.velocity = Vec2::ZERO;
                    player.target = *position;
                }
            }
            other => {
                trace!(kind = ?other.kind(), "pool ignoring message");
            }
        }
    }

    /// Advances every displayed position toward its target so remote
    /// movement appears smooth between discrete network updates.
    pub fn update(&mut self, dt: f32) {
        let t = 1.0 - (-APPROACH_RATE * dt).exp();
        for player in self.players.values_mut() {
            player.target += player.velocity * dt;
            player.displayed = player.displayed.lerp(player.target, t);
            if (player.target - player.displayed).len_sq() <= SNAP_EPSILON * SNAP_EPSILON {
                player.displayed = player.target;
            }
        }
    }

    pub fn draw(&self, surface: &mut dyn DrawSurface) {
        for (id, player) in &self.players {
            surface.draw_remote_player(*id, player.displayed);
        }
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.players.contains_key(&id)
    }

    pub fn get(&self, id: PlayerId) -> Option<&RemotePlayer> {
        self.players.get(&id)
    }
}
