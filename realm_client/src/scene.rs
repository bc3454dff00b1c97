//! Scene state machine.
//!
//! Exactly one scene is active at a time, owned by the [`SceneHandler`].
//! Scenes receive frame updates, draw calls, and inbound message batches;
//! they request transitions through the [`SceneContext`], which the
//! handler applies after the current call returns so a batch is always
//! delivered atomically to the scene that was active at batch start.
//!
//! Scene swaps start a fade-in overlay that is purely cosmetic: it never
//! gates updates or message dispatch.

use realm_shared::render::DrawSurface;
use realm_shared::wire::Message;
use tracing::info;

use crate::input::InputSnapshot;
use crate::transport::MessageSink;

/// Seconds a transition fade stays on screen.
const FADE_SECONDS: f32 = 0.4;

/// Per-call context handed to scene operations, making dependencies
/// explicit at the call site instead of ambient.
pub struct SceneContext<'a> {
    pub outbox: &'a mut dyn MessageSink,
    pub input: &'a InputSnapshot,
    next_scene: Option<Box<dyn Scene>>,
}

impl<'a> SceneContext<'a> {
    pub fn new(outbox: &'a mut dyn MessageSink, input: &'a InputSnapshot) -> Self {
        Self {
            outbox,
            input,
            next_scene: None,
        }
    }

    /// Sends an outbound message; never blocks.
    pub fn send(&mut self, msg: Message) {
        self.outbox.send_message(msg);
    }

    /// Requests a scene swap, applied by the handler once the current
    /// scene call returns.
    pub fn switch_to(&mut self, scene: Box<dyn Scene>) {
        self.next_scene = Some(scene);
    }

    pub(crate) fn take_next(&mut self) -> Option<Box<dyn Scene>> {
        self.next_scene.take()
    }
}

/// A gameplay mode: consumes input, time and message batches, renders its
/// own state, and may emit messages when entered.
pub trait Scene {
    fn name(&self) -> &'static str;

    /// One-shot side effect at scene entry (e.g. a bootstrap request).
    fn on_enter(&mut self, _ctx: &mut SceneContext<'_>) {}

    /// Consumes one ordered message batch. Unrecognized discriminants are
    /// ignored without error.
    fn process_messages(&mut self, ctx: &mut SceneContext<'_>, batch: &[Message]);

    /// Advances scene state; an error here is fatal and must propagate.
    fn update(&mut self, ctx: &mut SceneContext<'_>, dt: f32) -> anyhow::Result<()>;

    /// Pure render of current state, no mutation.
    fn draw(&self, surface: &mut dyn DrawSurface);
}

/// Cosmetic fade-in overlay shown after a scene swap.
struct Fade {
    remaining: f32,
    duration: f32,
}

impl Fade {
    fn new(duration: f32) -> Self {
        Self {
            remaining: duration,
            duration,
        }
    }

    fn tick(&mut self, dt: f32) {
        self.remaining = (self.remaining - dt).max(0.0);
    }

    fn done(&self) -> bool {
        self.remaining <= 0.0
    }

    fn alpha(&self) -> f32 {
        self.remaining / self.duration
    }
}

/// Owns the active scene and routes updates, draws, and message batches.
#[derive(Default)]
pub struct SceneHandler {
    active: Option<Box<dyn Scene>>,
    fade: Option<Fade>,
}

impl SceneHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the active scene immediately; the prior scene is dropped.
    pub fn set_scene(&mut self, scene: Box<dyn Scene>, ctx: &mut SceneContext<'_>) {
        self.install(scene, ctx);
        self.apply_pending(ctx);
    }

    /// Forwards the whole batch to the active scene exactly once, then the
    /// batch is considered consumed.
    pub fn handle_messages(&mut self, ctx: &mut SceneContext<'_>, batch: &[Message]) {
        if let Some(active) = self.active.as_mut() {
            active.process_messages(ctx, batch);
        }
        self.apply_pending(ctx);
    }

    /// Forwards the frame update; errors from the scene propagate
    /// unswallowed. Also advances the fade, which never gates dispatch.
    pub fn update(&mut self, ctx: &mut SceneContext<'_>, dt: f32) -> anyhow::Result<()> {
        if let Some(fade) = self.fade.as_mut() {
            fade.tick(dt);
            if fade.done() {
                self.fade = None;
            }
        }
        if let Some(active) = self.active.as_mut() {
            active.update(ctx, dt)?;
        }
        self.apply_pending(ctx);
        Ok(())
    }

    pub fn draw(&self, surface: &mut dyn DrawSurface) {
        if let Some(active) = &self.active {
            active.draw(surface);
        }
    }

    pub fn draw_fade(&self, surface: &mut dyn DrawSurface) {
        if let Some(fade) = &self.fade {
            surface.draw_fade_overlay(fade.alpha());
        }
    }

    pub fn active_scene_name(&self) -> Option<&'static str> {
        self.active.as_deref().map(|scene| scene.name())
    }

    fn install(&mut self, mut scene: Box<dyn Scene>, ctx: &mut SceneContext<'_>) {
        info!(scene = scene.name(), "scene change");
        scene.on_enter(ctx);
        self.active = Some(scene);
        self.fade = Some(Fade::new(FADE_SECONDS));
    }

    fn apply_pending(&mut self, ctx: &mut SceneContext<'_>) {
        while let Some(next) = ctx.take_next() {
            self.install(next, ctx);
        }
    }
}
