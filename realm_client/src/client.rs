//! Client driver.
//!
//! Composes transport, message queue, and scene handler, and runs one
//! frame at a time: poll network, dispatch the batch, update, draw. The
//! caller owns the cadence (and clamps the frame delta); the driver owns
//! the ordering guarantees and the fatal-error path.

use chrono::Local;
use realm_shared::config::ClientConfig;
use realm_shared::render::DrawSurface;

use crate::crash::{CrashReportFile, CrashSink};
use crate::input::InputSnapshot;
use crate::queue::MessageQueue;
use crate::scene::{Scene, SceneContext, SceneHandler};
use crate::transport::Transport;

/// What a completed frame tells the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Continue,
    /// The transport observed connection loss; no further frames will
    /// receive messages.
    Disconnected,
}

pub struct Client {
    cfg: ClientConfig,
    transport: Transport,
    queue: MessageQueue,
    scenes: SceneHandler,
    crash_sink: Box<dyn CrashSink>,
}

impl Client {
    /// Connects to the configured server. Must be called within a Tokio
    /// runtime.
    pub async fn connect(cfg: ClientConfig) -> anyhow::Result<Self> {
        let transport = Transport::connect(&cfg.server_addr).await?;
        let sink = Box::new(CrashReportFile::new(&cfg.crash_report_path));
        Ok(Self::new(cfg, transport, sink))
    }

    pub fn new(cfg: ClientConfig, transport: Transport, crash_sink: Box<dyn CrashSink>) -> Self {
        Self {
            cfg,
            transport,
            queue: MessageQueue::default(),
            scenes: SceneHandler::new(),
            crash_sink,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.cfg
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    pub fn active_scene_name(&self) -> Option<&'static str> {
        self.scenes.active_scene_name()
    }

    /// Installs a scene; called once with the login scene before the
    /// frame loop starts.
    pub fn set_scene(&mut self, scene: Box<dyn Scene>, input: &InputSnapshot) {
        let mut ctx = SceneContext::new(&mut self.transport, input);
        self.scenes.set_scene(scene, &mut ctx);
    }

    /// Runs one frame: network poll, batch dispatch, update, draw.
    ///
    /// A fatal update error is recorded via the crash sink exactly once
    /// and then re-raised to the caller.
    pub fn run_frame(
        &mut self,
        input: &InputSnapshot,
        dt: f32,
        surface: &mut dyn DrawSurface,
    ) -> anyhow::Result<FrameOutcome> {
        self.pump_network(input);

        if let Err(err) = self.update(input, dt) {
            self.crash_sink.record(&err, Local::now());
            return Err(err);
        }

        self.scenes.draw(surface);
        self.scenes.draw_fade(surface);

        if self.transport.is_closed() {
            return Ok(FrameOutcome::Disconnected);
        }
        Ok(FrameOutcome::Continue)
    }

    /// Appends newly decoded messages to the queue, then hands the whole
    /// queue to the active scene as one ordered batch.
    fn pump_network(&mut self, input: &InputSnapshot) {
        self.queue.extend(self.transport.poll_messages());
        if self.queue.is_empty() {
            return;
        }
        let batch = self.queue.drain_batch();
        let mut ctx = SceneContext::new(&mut self.transport, input);
        self.scenes.handle_messages(&mut ctx, &batch);
    }

    fn update(&mut self, input: &InputSnapshot, dt: f32) -> anyhow::Result<()> {
        let mut ctx = SceneContext::new(&mut self.transport, input);
        self.scenes.update(&mut ctx, dt)
    }
}
