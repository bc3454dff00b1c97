//! Standalone client binary.
//!
//! Usage:
//!   cargo run -p realm_client -- [--addr 127.0.0.1:40000] [--name Player] [--password pw]
//!
//! Connects to the server, runs the login handshake, and drives the frame
//! loop headless (window/GUI/input layers attach through the collaborator
//! traits and are not part of this binary).

use std::env;
use std::time::{Duration, Instant};

use anyhow::Context;
use realm_client::client::{Client, FrameOutcome};
use realm_client::input::InputSnapshot;
use realm_client::login::LoginScene;
use realm_shared::config::ClientConfig;
use realm_shared::render::NullSurface;
use tracing::{debug, info};

/// Cap on the frame delta so a stall never turns into a teleport.
const MAX_FRAME_DELTA: f32 = 0.25;

fn parse_args() -> ClientConfig {
    let mut cfg = ClientConfig::default();
    let args: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--addr" if i + 1 < args.len() => {
                cfg.server_addr = args[i + 1].clone();
                i += 2;
            }
            "--name" if i + 1 < args.len() => {
                cfg.username = args[i + 1].clone();
                i += 2;
            }
            "--password" if i + 1 < args.len() => {
                cfg.password = args[i + 1].clone();
                i += 2;
            }
            _ => i += 1,
        }
    }
    cfg
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cfg = parse_args();
    info!(server = %cfg.server_addr, user = %cfg.username, "starting client");

    let mut client = Client::connect(cfg.clone()).await.context("connect")?;

    let input = InputSnapshot::default();
    client.set_scene(Box::new(LoginScene::new(&cfg)), &input);

    let frame_interval = Duration::from_secs_f32(1.0 / cfg.frame_hz as f32);
    let mut surface = NullSurface;
    let mut last = Instant::now();
    let mut frames: u64 = 0;

    loop {
        tokio::time::sleep(frame_interval).await;

        let now = Instant::now();
        let dt = (now - last).as_secs_f32().min(MAX_FRAME_DELTA);
        last = now;

        match client.run_frame(&input, dt, &mut surface)? {
            FrameOutcome::Continue => {}
            FrameOutcome::Disconnected => {
                info!("server closed the connection");
                break;
            }
        }

        frames += 1;
        if frames % 600 == 0 {
            debug!(
                frames,
                scene = client.active_scene_name().unwrap_or("none"),
                decode_drops = client.transport().decode_drop_count(),
                "frame loop alive"
            );
        }
    }

    Ok(())
}
