//! Game scene.
//!
//! Active once login succeeds. Owns the remote player pool and the local
//! player; routes lifecycle/movement messages to the pool and replicates
//! local movement through the outbound sink.

use realm_shared::config::ClientConfig;
use realm_shared::math::Vec2;
use realm_shared::render::DrawSurface;
use realm_shared::wire::{Message, MessageKind, PlayerId};

use crate::player::LocalPlayer;
use crate::pool::PlayerPool;
use crate::scene::{Scene, SceneContext};

pub struct GameScene {
    pool: PlayerPool,
    player: LocalPlayer,
}

impl GameScene {
    pub fn new(cfg: &ClientConfig, player_id: PlayerId, spawn: Vec2) -> Self {
        Self {
            pool: PlayerPool::new(),
            player: LocalPlayer::new(player_id, spawn, cfg.move_speed),
        }
    }

    pub fn pool(&self) -> &PlayerPool {
        &self.pool
    }

    pub fn player(&self) -> &LocalPlayer {
        &self.player
    }
}

impl Scene for GameScene {
    fn name(&self) -> &'static str {
        "game"
    }

    fn on_enter(&mut self, ctx: &mut SceneContext<'_>) {
        // Seed the pool from an authoritative roster snapshot.
        ctx.send(Message::PlayersRequest);
    }

    fn process_messages(&mut self, _ctx: &mut SceneContext<'_>, batch: &[Message]) {
        for msg in batch {
            match msg.kind() {
                MessageKind::PlayersResponse
                | MessageKind::OtherPlayerMove
                | MessageKind::OtherPlayerStop
                | MessageKind::PlayerJoin
                | MessageKind::PlayerLeave => self.pool.process_message(msg),
                _ => {}
            }
        }
    }

    fn update(&mut self, ctx: &mut SceneContext<'_>, dt: f32) -> anyhow::Result<()> {
        self.pool.update(dt);
        self.player.update(ctx, dt);
        Ok(())
    }

    fn draw(&self, surface: &mut dyn DrawSurface) {
        self.pool.draw(surface);
        surface.draw_local_player(self.player.position());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::InputSnapshot;
    use crate::transport::RecordingSink;
    use realm_shared::render::RecordingSurface;

    fn scene() -> GameScene {
        GameScene::new(&ClientConfig::default(), PlayerId(1), Vec2::ZERO)
    }

    #[test]
    fn entering_requests_the_roster_once() {
        let mut game = scene();
        let mut sink = RecordingSink::default();
        let input = InputSnapshot::default();
        let mut ctx = SceneContext::new(&mut sink, &input);

        game.on_enter(&mut ctx);
        game.update(&mut ctx, 0.016).unwrap();

        assert_eq!(sink.sent, vec![Message::PlayersRequest]);
    }

    #[test]
    fn lifecycle_messages_reach_the_pool_in_order() {
        let mut game = scene();
        let mut sink = RecordingSink::default();
        let input = InputSnapshot::default();
        let mut ctx = SceneContext::new(&mut sink, &input);

        game.process_messages(
            &mut ctx,
            &[
                Message::PlayerJoin {
                    player_id: PlayerId(5),
                    position: Vec2::ZERO,
                },
                Message::OtherPlayerMove {
                    player_id: PlayerId(5),
                    position: Vec2::new(10.0, 0.0),
                    velocity: Vec2::ZERO,
                },
                Message::PlayerLeave {
                    player_id: PlayerId(5),
                },
            ],
        );

        assert!(game.pool().is_empty());
    }

    #[test]
    fn unrecognized_messages_are_ignored() {
        let mut game = scene();
        let mut sink = RecordingSink::default();
        let input = InputSnapshot::default();
        let mut ctx = SceneContext::new(&mut sink, &input);

        game.process_messages(
            &mut ctx,
            &[
                Message::VersionResponse { version: 99 },
                Message::RegisterResponse { success: true },
            ],
        );
        assert!(game.pool().is_empty());
        assert!(sink.sent.is_empty());
    }

    #[test]
    fn draw_renders_pool_then_local_player() {
        let mut game = scene();
        let mut sink = RecordingSink::default();
        let input = InputSnapshot::default();
        let mut ctx = SceneContext::new(&mut sink, &input);
        game.process_messages(
            &mut ctx,
            &[Message::PlayerJoin {
                player_id: PlayerId(7),
                position: Vec2::new(3.0, 3.0),
            }],
        );

        let mut surface = RecordingSurface::default();
        game.draw(&mut surface);
        assert_eq!(surface.remote_ids(), vec![PlayerId(7)]);
        assert_eq!(surface.local_players, vec![Vec2::ZERO]);
    }
}
