//! Full socket-based integration test: login handshake, roster seeding,
//! lifecycle replication, and disconnect observation.

use std::time::Duration;

use anyhow::ensure;
use realm_client::client::{Client, FrameOutcome};
use realm_client::crash::MemorySink;
use realm_client::input::InputSnapshot;
use realm_client::login::LoginScene;
use realm_client::transport::Transport;
use realm_shared::config::ClientConfig;
use realm_shared::math::Vec2;
use realm_shared::render::RecordingSurface;
use realm_shared::wire::{Message, PlayerId, PlayerSnapshot, PROTOCOL_VERSION};
use realm_tests::{read_frame, write_frame};
use tokio::net::TcpListener;

fn roster_entry(id: u32, x: f32) -> PlayerSnapshot {
    PlayerSnapshot {
        id: PlayerId(id),
        position: Vec2::new(x, 0.0),
        velocity: Vec2::ZERO,
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn login_handshake_seeds_game_scene_and_replicates_lifecycle() -> anyhow::Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("info")
        .with_test_writer()
        .try_init();

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let server = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await?;

        let msg = read_frame(&mut stream).await?;
        ensure!(msg == Message::VersionRequest, "expected VersionRequest, got {msg:?}");
        write_frame(
            &mut stream,
            &Message::VersionResponse {
                version: PROTOCOL_VERSION,
            },
        )
        .await?;

        let msg = read_frame(&mut stream).await?;
        ensure!(
            matches!(msg, Message::LoginRequest { .. }),
            "expected LoginRequest, got {msg:?}"
        );
        write_frame(
            &mut stream,
            &Message::LoginResponse {
                success: true,
                player_id: Some(PlayerId(7)),
                spawn: Some(Vec2::new(4.0, 4.0)),
            },
        )
        .await?;

        let msg = read_frame(&mut stream).await?;
        ensure!(msg == Message::PlayersRequest, "expected PlayersRequest, got {msg:?}");
        write_frame(
            &mut stream,
            &Message::PlayersResponse {
                players: vec![roster_entry(1, 1.0), roster_entry(2, 2.0)],
            },
        )
        .await?;

        write_frame(
            &mut stream,
            &Message::PlayerJoin {
                player_id: PlayerId(3),
                position: Vec2::new(3.0, 0.0),
            },
        )
        .await?;
        write_frame(
            &mut stream,
            &Message::OtherPlayerMove {
                player_id: PlayerId(3),
                position: Vec2::new(6.0, 0.0),
                velocity: Vec2::ZERO,
            },
        )
        .await?;
        write_frame(
            &mut stream,
            &Message::PlayerLeave {
                player_id: PlayerId(2),
            },
        )
        .await?;

        // Give the client time to drain before the socket closes.
        tokio::time::sleep(Duration::from_millis(300)).await;
        Ok::<_, anyhow::Error>(())
    });

    let cfg = ClientConfig {
        server_addr: addr.to_string(),
        username: "ada".into(),
        password: "pw".into(),
        ..Default::default()
    };
    let transport = Transport::connect(&cfg.server_addr).await?;
    let sink = MemorySink::default();
    let mut client = Client::new(cfg.clone(), transport, Box::new(sink.clone()));

    let input = InputSnapshot::default();
    client.set_scene(Box::new(LoginScene::new(&cfg)), &input);
    assert_eq!(client.active_scene_name(), Some("login"));

    let mut surface = RecordingSurface::default();
    let mut saw_roster = false;
    let mut disconnected = false;

    for _ in 0..400 {
        surface.clear();
        let outcome = client.run_frame(&input, 0.05, &mut surface)?;

        if surface.remote_ids() == vec![PlayerId(1), PlayerId(3)] {
            saw_roster = true;
        }
        if outcome == FrameOutcome::Disconnected {
            disconnected = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    assert_eq!(client.active_scene_name(), Some("game"));
    assert!(saw_roster, "expected roster of players 1 and 3 to be drawn");
    assert!(disconnected, "expected the client to observe connection loss");
    assert!(sink.is_empty(), "no crash records expected");

    server.await??;
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn unknown_account_registers_then_logs_in() -> anyhow::Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("info")
        .with_test_writer()
        .try_init();

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let server = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await?;

        let msg = read_frame(&mut stream).await?;
        ensure!(msg == Message::VersionRequest, "expected VersionRequest");
        write_frame(
            &mut stream,
            &Message::VersionResponse {
                version: PROTOCOL_VERSION,
            },
        )
        .await?;

        // First login attempt: account unknown.
        let msg = read_frame(&mut stream).await?;
        ensure!(matches!(msg, Message::LoginRequest { .. }), "expected LoginRequest");
        write_frame(
            &mut stream,
            &Message::LoginResponse {
                success: false,
                player_id: None,
                spawn: None,
            },
        )
        .await?;

        let msg = read_frame(&mut stream).await?;
        ensure!(
            matches!(msg, Message::RegisterRequest { .. }),
            "expected RegisterRequest, got {msg:?}"
        );
        write_frame(&mut stream, &Message::RegisterResponse { success: true }).await?;

        let msg = read_frame(&mut stream).await?;
        ensure!(matches!(msg, Message::LoginRequest { .. }), "expected second LoginRequest");
        write_frame(
            &mut stream,
            &Message::LoginResponse {
                success: true,
                player_id: Some(PlayerId(11)),
                spawn: None,
            },
        )
        .await?;

        // The fresh game scene asks for the roster.
        let msg = read_frame(&mut stream).await?;
        ensure!(msg == Message::PlayersRequest, "expected PlayersRequest");
        write_frame(&mut stream, &Message::PlayersResponse { players: vec![] }).await?;

        tokio::time::sleep(Duration::from_millis(200)).await;
        Ok::<_, anyhow::Error>(())
    });

    let cfg = ClientConfig {
        server_addr: addr.to_string(),
        username: "newcomer".into(),
        ..Default::default()
    };
    let transport = Transport::connect(&cfg.server_addr).await?;
    let mut client = Client::new(cfg.clone(), transport, Box::new(MemorySink::default()));

    let input = InputSnapshot::default();
    client.set_scene(Box::new(LoginScene::new(&cfg)), &input);

    let mut surface = RecordingSurface::default();
    for _ in 0..400 {
        if client.run_frame(&input, 0.016, &mut surface)? == FrameOutcome::Disconnected {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    assert_eq!(client.active_scene_name(), Some("game"));
    server.await??;
    Ok(())
}
