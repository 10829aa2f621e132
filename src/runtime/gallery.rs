//! The gallery shell state
//!
//! Owns the registry, the current route, the artifact outlet, the state store
//! and the toast queue. Both the TUI and the headless `show` command drive a
//! [`Gallery`]; neither touches the outlet directly.

use std::time::{Duration, Instant};

use crossterm::event::KeyEvent;
use ratatui::text::Text;

use super::artifact::Registry;
use super::loader::{ArtifactOutlet, LoadQueue, MountPhase};
use super::state::StateStore;
use super::toast::ToastQueue;
use crate::domain::{breadcrumbs, sidebar, ArtifactId, Crumb, FailureInfo, Route, SidebarModel};

/// Failure panel contents
#[derive(Debug, Clone, PartialEq)]
pub struct FailurePanel {
    pub info: FailureInfo,
    /// Route of version N-1, when the registry has it
    pub previous_version: Option<String>,
}

/// What the viewport shows for the current route
#[derive(Debug)]
pub enum View {
    Page(Route),
    Loading(ArtifactId),
    Artifact {
        id: ArtifactId,
        content: Text<'static>,
    },
    Failed(FailurePanel),
}

pub struct Gallery {
    registry: Registry,
    route: Route,
    outlet: ArtifactOutlet,
    queue: LoadQueue,
    state: StateStore,
    toasts: ToastQueue,
}

impl Gallery {
    pub fn new(registry: Registry, toast_ticks: u32) -> Self {
        Self {
            registry,
            route: Route::Home,
            outlet: ArtifactOutlet::new(),
            queue: LoadQueue::new(),
            state: StateStore::new(),
            toasts: ToastQueue::new(toast_ticks),
        }
    }

    /// Moves to `path`
    ///
    /// Artifact routes are canonicalized: `/artifacts/<name>` lands on the
    /// entry it resolves to. Artifacts missing from the registry become
    /// [`Route::NotFound`]. Returns the route actually shown.
    pub fn navigate(&mut self, path: &str) -> &Route {
        let requested = Route::parse(path);

        self.route = if requested.is_artifact() {
            match self.registry.resolve(&requested) {
                Some(version) => {
                    if let Some(ticket) = self.outlet.begin(version.id.clone()) {
                        self.queue.dispatch(ticket, version.loader.clone());
                    }
                    Route::parse(&version.route_path)
                }
                None => {
                    self.outlet.unmount();
                    Route::NotFound(requested.path())
                }
            }
        } else {
            self.outlet.unmount();
            requested
        };

        tracing::debug!(requested = path, route = %self.route, "navigated");
        &self.route
    }

    /// Applies finished loads; returns true if the outlet changed
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        for completion in self.queue.drain() {
            changed |= self
                .outlet
                .complete(completion.ticket, completion.result, &mut self.toasts);
        }
        changed
    }

    /// Blocks until the pending load settles or `timeout` elapses
    pub fn wait_for_load(&mut self, timeout: Duration) -> Option<MountPhase> {
        let deadline = Instant::now() + timeout;

        while self.outlet.phase() == Some(MountPhase::Loading) {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            if let Some(completion) = self.queue.wait(remaining) {
                self.outlet
                    .complete(completion.ticket, completion.result, &mut self.toasts);
            }
        }

        self.outlet.phase()
    }

    /// Renders the current route
    pub fn view(&mut self) -> View {
        if !self.route.is_artifact() {
            return View::Page(self.route.clone());
        }

        let Some(id) = self.outlet.current().cloned() else {
            return View::Page(self.route.clone());
        };

        match self.outlet.phase() {
            Some(MountPhase::Loading) => View::Loading(id),
            Some(MountPhase::Healthy) => match self.outlet.render(&mut self.state, &mut self.toasts) {
                Some(content) => View::Artifact { id, content },
                None => self.failure_view(),
            },
            _ => self.failure_view(),
        }
    }

    fn failure_view(&self) -> View {
        match self.outlet.failure() {
            Some(info) => View::Failed(FailurePanel {
                info: info.clone(),
                previous_version: self.previous_version_path(),
            }),
            None => View::Page(self.route.clone()),
        }
    }

    /// Forwards a key to the mounted artifact
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        self.outlet.handle_key(key, &mut self.state, &mut self.toasts)
    }

    /// Advances the artifact and ages toasts
    pub fn tick(&mut self) {
        self.outlet.tick(&mut self.state, &mut self.toasts);
        self.toasts.tick();
    }

    /// Full reload: tears down the state store and remounts the current route
    pub fn reload(&mut self) {
        tracing::info!(route = %self.route, "full reload");
        self.state.clear();
        self.toasts.clear();
        self.outlet.unmount();

        let path = self.route.path();
        self.navigate(&path);
        self.toasts.info("Gallery reloaded");
    }

    /// Recovery link of the failure panel
    pub fn previous_version_path(&self) -> Option<String> {
        let failed = self.outlet.failure()?;
        self.registry
            .previous_version(&failed.artifact)
            .map(|v| v.route_path.clone())
    }

    pub fn sidebar(&self) -> SidebarModel {
        sidebar(&self.registry, &self.route.path())
    }

    pub fn breadcrumbs(&self) -> Vec<Crumb> {
        breadcrumbs(&self.route.path())
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn phase(&self) -> Option<MountPhase> {
        self.outlet.phase()
    }

    pub fn current(&self) -> Option<&ArtifactId> {
        self.outlet.current()
    }

    /// Key hints of the mounted artifact
    pub fn hints(&self) -> &'static str {
        self.outlet.hints()
    }

    pub fn state(&self) -> &StateStore {
        &self.state
    }

    pub fn toasts(&self) -> &ToastQueue {
        &self.toasts
    }
}
