//! Artifact loading and mounting
//!
//! ```text
//!   navigate(id) ──► begin(id) ──► LoadTicket ──► LoadQueue::dispatch
//!                      │                               │ (worker thread)
//!                      ▼                               ▼
//!                   Loading ◄──── complete(ticket) ◄── Completion
//!                   │     │
//!            Ok(artifact)  Err(failure)
//!                   ▼     ▼
//!               Healthy ─► Failed
//! ```
//!
//! Every mount gets a new generation number. A completion whose ticket does
//! not match the current mount is stale (the user navigated away) and is
//! dropped without touching the outlet.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

use crossterm::event::KeyEvent;
use ratatui::text::Text;

use super::artifact::{Artifact, ArtifactContext, ArtifactLoader, LoadError};
use super::guard::{catch, CaughtPanic, RenderGuard};
use super::state::StateStore;
use super::toast::ToastQueue;
use crate::domain::{ArtifactId, FailureCategory, FailureInfo, FailurePhase};

/// Identifies one load attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

/// Why a load produced no artifact
#[derive(Debug, Clone, PartialEq)]
pub struct LoadFailure {
    pub category: FailureCategory,
    pub message: String,
    pub stack: Option<String>,
}

impl From<LoadError> for LoadFailure {
    fn from(err: LoadError) -> Self {
        Self {
            category: err.category(),
            message: err.to_string(),
            stack: None,
        }
    }
}

impl From<CaughtPanic> for LoadFailure {
    fn from(caught: CaughtPanic) -> Self {
        Self {
            category: FailureCategory::classify(&caught.message),
            message: format!("Loader panicked: {}", caught.message),
            stack: caught.stack,
        }
    }
}

pub type LoadResult = Result<Box<dyn Artifact>, LoadFailure>;

/// Invokes a loader, containing panics
pub fn invoke(loader: &ArtifactLoader) -> LoadResult {
    match catch(|| loader.load()) {
        Ok(Ok(artifact)) => Ok(artifact),
        Ok(Err(err)) => Err(err.into()),
        Err(caught) => Err(caught.into()),
    }
}

/// Lifecycle phase of the mounted artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountPhase {
    Loading,
    Healthy,
    Failed,
}

struct Mount {
    id: ArtifactId,
    ticket: LoadTicket,
    guard: RenderGuard,
    artifact: Option<Box<dyn Artifact>>,
}

impl Mount {
    fn phase(&self) -> MountPhase {
        if self.guard.is_failed() {
            MountPhase::Failed
        } else if self.artifact.is_none() {
            MountPhase::Loading
        } else {
            MountPhase::Healthy
        }
    }

    /// Runs `f` against the artifact inside the guard, raising an error toast
    /// when the guard trips
    fn with_artifact<R>(
        &mut self,
        phase: FailurePhase,
        state: &mut StateStore,
        toasts: &mut ToastQueue,
        f: impl FnOnce(&mut dyn Artifact, &mut ArtifactContext<'_>) -> R,
    ) -> Option<R> {
        let Mount {
            id, guard, artifact, ..
        } = self;
        let artifact = artifact.as_mut()?;
        if guard.is_failed() {
            return None;
        }

        let result = {
            let mut ctx = ArtifactContext::new(id, state, toasts);
            guard.run(phase, || f(&mut **artifact, &mut ctx))
        };

        if result.is_none() {
            if let Some(info) = guard.failure() {
                toasts.error(format!("{} crashed", info.artifact.display_name()));
            }
        }
        result
    }
}

/// The slot the current artifact is mounted in
#[derive(Default)]
pub struct ArtifactOutlet {
    mount: Option<Mount>,
    generation: u64,
}

impl ArtifactOutlet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts mounting `id`
    ///
    /// Returns `None` when `id` is already mounted: the loader is invoked once
    /// per navigation to an identity, not on every visit of the same route.
    pub fn begin(&mut self, id: ArtifactId) -> Option<LoadTicket> {
        if self.current() == Some(&id) {
            return None;
        }

        self.generation += 1;
        let ticket = LoadTicket {
            generation: self.generation,
        };
        tracing::debug!(artifact = %id, generation = ticket.generation, "mounting artifact");

        self.mount = Some(Mount {
            guard: RenderGuard::new(id.clone()),
            id,
            ticket,
            artifact: None,
        });
        Some(ticket)
    }

    /// Applies a finished load; returns false if the ticket is stale
    pub fn complete(&mut self, ticket: LoadTicket, result: LoadResult, toasts: &mut ToastQueue) -> bool {
        let mount = match self.mount.as_mut() {
            Some(mount) if mount.ticket == ticket && mount.artifact.is_none() && !mount.guard.is_failed() => mount,
            _ => {
                tracing::debug!(generation = ticket.generation, "discarding stale load");
                return false;
            }
        };

        match result {
            Ok(artifact) => {
                tracing::debug!(artifact = %mount.id, "artifact loaded");
                mount.artifact = Some(artifact);
            }
            Err(failure) => {
                mount.guard.fail_as(
                    FailurePhase::Load,
                    failure.category,
                    failure.message,
                    failure.stack,
                );
                toasts.error(format!("{} failed to load", mount.id.display_name()));
            }
        }
        true
    }

    /// Drops the mounted artifact; pending loads become stale
    pub fn unmount(&mut self) {
        if let Some(mount) = self.mount.take() {
            tracing::debug!(artifact = %mount.id, "unmounting artifact");
        }
    }

    pub fn current(&self) -> Option<&ArtifactId> {
        self.mount.as_ref().map(|m| &m.id)
    }

    pub fn phase(&self) -> Option<MountPhase> {
        self.mount.as_ref().map(Mount::phase)
    }

    pub fn failure(&self) -> Option<&FailureInfo> {
        self.mount.as_ref()?.guard.failure()
    }

    /// Renders the artifact; `None` while loading or once failed
    pub fn render(&mut self, state: &mut StateStore, toasts: &mut ToastQueue) -> Option<Text<'static>> {
        self.mount
            .as_mut()?
            .with_artifact(FailurePhase::Render, state, toasts, |a, ctx| a.render(ctx))
    }

    /// Forwards a key; returns true if the artifact consumed it
    pub fn handle_key(&mut self, key: KeyEvent, state: &mut StateStore, toasts: &mut ToastQueue) -> bool {
        self.mount
            .as_mut()
            .and_then(|m| m.with_artifact(FailurePhase::Input, state, toasts, |a, ctx| a.handle_key(key, ctx)))
            .unwrap_or(false)
    }

    pub fn tick(&mut self, state: &mut StateStore, toasts: &mut ToastQueue) {
        if let Some(mount) = self.mount.as_mut() {
            mount.with_artifact(FailurePhase::Tick, state, toasts, |a, ctx| a.tick(ctx));
        }
    }

    /// Status bar hints of the healthy artifact
    pub fn hints(&self) -> &'static str {
        match &self.mount {
            Some(m) if m.phase() == MountPhase::Healthy => {
                m.artifact.as_ref().map(|a| a.hints()).unwrap_or("")
            }
            _ => "",
        }
    }
}

/// A finished load coming back from a worker
pub struct Completion {
    pub ticket: LoadTicket,
    pub result: LoadResult,
}

/// Runs loaders off the UI thread
pub struct LoadQueue {
    tx: Sender<Completion>,
    rx: Receiver<Completion>,
}

impl LoadQueue {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { tx, rx }
    }

    /// Invokes `loader` on a worker thread
    pub fn dispatch(&self, ticket: LoadTicket, loader: ArtifactLoader) {
        let tx = self.tx.clone();
        let spawned = thread::Builder::new()
            .name("artifact-loader".to_string())
            .spawn(move || {
                let result = invoke(&loader);
                // Receiver gone means the gallery shut down
                let _ = tx.send(Completion { ticket, result });
            });

        if let Err(e) = spawned {
            let _ = self.tx.send(Completion {
                ticket,
                result: Err(LoadFailure {
                    category: FailureCategory::Unclassified,
                    message: format!("Failed to start loader thread: {}", e),
                    stack: None,
                }),
            });
        }
    }

    /// Completions that arrived so far
    pub fn drain(&self) -> Vec<Completion> {
        self.rx.try_iter().collect()
    }

    /// Waits for the next completion
    pub fn wait(&self, timeout: Duration) -> Option<Completion> {
        match self.rx.recv_timeout(timeout) {
            Ok(completion) => Some(completion),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}

impl Default for LoadQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::state::StateKey;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Label(&'static str);

    impl Artifact for Label {
        fn render(&mut self, _ctx: &mut ArtifactContext<'_>) -> Text<'static> {
            Text::raw(self.0)
        }
    }

    struct Exploding;

    impl Artifact for Exploding {
        fn render(&mut self, _ctx: &mut ArtifactContext<'_>) -> Text<'static> {
            panic!("render exploded")
        }
    }

    /// Panics on its second render
    #[derive(Default)]
    struct Flaky {
        renders: u32,
    }

    impl Artifact for Flaky {
        fn render(&mut self, ctx: &mut ArtifactContext<'_>) -> Text<'static> {
            self.renders += 1;
            let key = ctx.key::<u32>("renders");
            ctx.write(&key, &self.renders).unwrap();
            if self.renders > 1 {
                panic!("second render failed");
            }
            Text::raw("ok")
        }
    }

    fn id(name: &str, version: u32) -> ArtifactId {
        ArtifactId::new(name, version).unwrap()
    }

    fn text(t: &Text<'static>) -> String {
        t.lines
            .iter()
            .flat_map(|l| l.spans.iter().map(|s| s.content.to_string()))
            .collect()
    }

    struct Harness {
        outlet: ArtifactOutlet,
        state: StateStore,
        toasts: ToastQueue,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                outlet: ArtifactOutlet::new(),
                state: StateStore::new(),
                toasts: ToastQueue::new(100),
            }
        }

        fn mount(&mut self, id: ArtifactId, artifact: Box<dyn Artifact>) {
            let ticket = self.outlet.begin(id).unwrap();
            assert!(self.outlet.complete(ticket, Ok(artifact), &mut self.toasts));
        }

        fn render(&mut self) -> Option<Text<'static>> {
            self.outlet.render(&mut self.state, &mut self.toasts)
        }
    }

    #[test]
    fn loading_until_complete() {
        let mut h = Harness::new();
        let ticket = h.outlet.begin(id("counter", 1)).unwrap();

        assert_eq!(h.outlet.phase(), Some(MountPhase::Loading));
        assert!(h.render().is_none());

        h.outlet.complete(ticket, Ok(Box::new(Label("counter"))), &mut h.toasts);
        assert_eq!(h.outlet.phase(), Some(MountPhase::Healthy));
        assert_eq!(text(&h.render().unwrap()), "counter");
    }

    #[test]
    fn same_identity_does_not_reload() {
        let mut h = Harness::new();
        assert!(h.outlet.begin(id("counter", 1)).is_some());
        assert!(h.outlet.begin(id("counter", 1)).is_none());
        assert!(h.outlet.begin(id("counter", 2)).is_some());
    }

    #[test]
    fn render_panic_fails_once_and_is_contained() {
        let mut h = Harness::new();
        h.mount(id("counter", 1), Box::new(Exploding));

        assert!(h.render().is_none());
        assert_eq!(h.outlet.phase(), Some(MountPhase::Failed));
        assert_eq!(h.outlet.failure().unwrap().raw, "render exploded");
        assert_eq!(h.toasts.len(), 1);

        // Terminal: no further calls, no further toasts
        assert!(h.render().is_none());
        assert_eq!(h.toasts.len(), 1);
    }

    #[test]
    fn failure_after_healthy_renders() {
        let mut h = Harness::new();
        h.mount(id("flaky", 1), Box::new(Flaky::default()));

        assert!(h.render().is_some());
        assert!(h.render().is_none());
        assert_eq!(h.outlet.phase(), Some(MountPhase::Failed));

        // Writes made before the panic stay in the store
        let key = StateKey::<u32>::scoped(&id("flaky", 1), "renders");
        assert_eq!(h.state.read(&key, 0).unwrap(), 2);
    }

    #[test]
    fn identity_change_resets_to_healthy() {
        let mut h = Harness::new();
        h.mount(id("counter", 1), Box::new(Exploding));
        assert!(h.render().is_none());
        assert_eq!(h.outlet.phase(), Some(MountPhase::Failed));

        h.mount(id("counter", 2), Box::new(Label("v2")));
        assert_eq!(h.outlet.phase(), Some(MountPhase::Healthy));
        assert!(h.outlet.failure().is_none());
        assert_eq!(text(&h.render().unwrap()), "v2");
    }

    #[test]
    fn stale_completion_is_discarded() {
        let mut h = Harness::new();
        let old = h.outlet.begin(id("timer", 1)).unwrap();
        let new = h.outlet.begin(id("timer", 2)).unwrap();

        assert!(!h.outlet.complete(old, Ok(Box::new(Label("old"))), &mut h.toasts));
        assert_eq!(h.outlet.phase(), Some(MountPhase::Loading));

        assert!(h.outlet.complete(new, Ok(Box::new(Label("new"))), &mut h.toasts));
        assert_eq!(text(&h.render().unwrap()), "new");
    }

    #[test]
    fn completion_after_unmount_is_discarded() {
        let mut h = Harness::new();
        let ticket = h.outlet.begin(id("timer", 1)).unwrap();
        h.outlet.unmount();

        assert!(!h.outlet.complete(ticket, Ok(Box::new(Label("late"))), &mut h.toasts));
        assert!(h.outlet.phase().is_none());
    }

    #[test]
    fn load_failure_marks_failed() {
        let mut h = Harness::new();
        let ticket = h.outlet.begin(id("notes", 2)).unwrap();
        let failure = LoadFailure::from(LoadError::NotFound("notes/v2/index.md".into()));

        assert!(h.outlet.complete(ticket, Err(failure), &mut h.toasts));
        let info = h.outlet.failure().unwrap();
        assert_eq!(info.phase, FailurePhase::Load);
        assert_eq!(info.raw, "Module not found: notes/v2/index.md");
        assert_eq!(info.category, FailureCategory::InvalidModule);
    }

    #[test]
    fn load_failure_category_comes_from_cause() {
        let mut h = Harness::new();
        let ticket = h.outlet.begin(id("network-map", 1)).unwrap();
        let failure = LoadFailure::from(LoadError::Parse {
            path: "artifacts/network-map/v1/index.md".into(),
            reason: "value was null".into(),
        });

        assert!(h.outlet.complete(ticket, Err(failure), &mut h.toasts));
        assert_eq!(h.outlet.failure().unwrap().category, FailureCategory::Syntax);
    }

    #[test]
    fn invoke_contains_loader_panics() {
        let loader = ArtifactLoader::new(|| panic!("loader exploded"));
        let failure = invoke(&loader).err().unwrap();
        assert_eq!(failure.message, "Loader panicked: loader exploded");
    }

    #[test]
    fn queue_runs_loader_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let loader = ArtifactLoader::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(Label("loaded")))
        });

        let mut h = Harness::new();
        let queue = LoadQueue::new();
        let ticket = h.outlet.begin(id("counter", 1)).unwrap();
        queue.dispatch(ticket, loader);

        let completion = queue.wait(Duration::from_secs(5)).unwrap();
        assert_eq!(completion.ticket, ticket);
        assert!(h.outlet.complete(completion.ticket, completion.result, &mut h.toasts));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(queue.drain().is_empty());
    }
}
