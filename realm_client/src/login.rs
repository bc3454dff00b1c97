//! Login scene.
//!
//! Drives the connection handshake: protocol version check, then login
//! with the configured account, registering it first if the server does
//! not know it. A successful login switches to the game scene. The login
//! form itself lives in the external GUI layer.

use anyhow::bail;
use realm_shared::config::ClientConfig;
use realm_shared::math::Vec2;
use realm_shared::render::DrawSurface;
use realm_shared::wire::{Message, PROTOCOL_VERSION};
use tracing::{info, warn};

use crate::game::GameScene;
use crate::scene::{Scene, SceneContext};

pub struct LoginScene {
    cfg: ClientConfig,
    register_attempted: bool,
    /// Server protocol version, when it did not match ours.
    version_mismatch: Option<u32>,
    /// Set when the server definitively rejected the account.
    rejection: Option<String>,
}

impl LoginScene {
    pub fn new(cfg: &ClientConfig) -> Self {
        Self {
            cfg: cfg.clone(),
            register_attempted: false,
            version_mismatch: None,
            rejection: None,
        }
    }

    fn send_login(&self, ctx: &mut SceneContext<'_>) {
        ctx.send(Message::LoginRequest {
            username: self.cfg.username.clone(),
            password: self.cfg.password.clone(),
        });
    }
}

impl Scene for LoginScene {
    fn name(&self) -> &'static str {
        "login"
    }

    fn on_enter(&mut self, ctx: &mut SceneContext<'_>) {
        // Nothing else is trusted until the version handshake completes.
        ctx.send(Message::VersionRequest);
    }

    fn process_messages(&mut self, ctx: &mut SceneContext<'_>, batch: &[Message]) {
        for msg in batch {
            match msg {
                Message::VersionResponse { version } => {
                    if *version == PROTOCOL_VERSION {
                        self.send_login(ctx);
                    } else {
                        self.version_mismatch = Some(*version);
                    }
                }
                Message::LoginResponse {
                    success: true,
                    player_id,
                    spawn,
                } => match player_id {
                    Some(id) => {
                        info!(player = id.0, "login accepted");
                        let spawn = spawn.unwrap_or(Vec2::ZERO);
                        ctx.switch_to(Box::new(GameScene::new(&self.cfg, *id, spawn)));
                    }
                    None => {
                        self.rejection =
                            Some("login response carried no player id".to_string());
                    }
                },
                Message::LoginResponse { success: false, .. } => {
                    if self.register_attempted {
                        self.rejection =
                            Some(format!("login rejected for '{}'", self.cfg.username));
                    } else {
                        // Unknown account; try creating it once.
                        warn!(user = %self.cfg.username, "login failed, registering");
                        self.register_attempted = true;
                        ctx.send(Message::RegisterRequest {
                            username: self.cfg.username.clone(),
                            password: self.cfg.password.clone(),
                        });
                    }
                }
                Message::RegisterResponse { success } => {
                    if *success {
                        self.send_login(ctx);
                    } else {
                        self.rejection =
                            Some(format!("registration rejected for '{}'", self.cfg.username));
                    }
                }
                _ => {}
            }
        }
    }

    fn update(&mut self, _ctx: &mut SceneContext<'_>, _dt: f32) -> anyhow::Result<()> {
        if let Some(server) = self.version_mismatch {
            bail!(
                "protocol version mismatch: client {}, server {}",
                PROTOCOL_VERSION,
                server
            );
        }
        if let Some(reason) = &self.rejection {
            bail!("{reason}");
        }
        Ok(())
    }

    fn draw(&self, _surface: &mut dyn DrawSurface) {
        // The login form is drawn by the GUI layer.
    }
}
