//! Failure boundary for mounted artifacts
//!
//! [`RenderGuard`] wraps every call into an artifact and catches panics
//! before they unwind into the shell. The first failure switches the guard
//! to `Failed`; from then on the artifact is never called again. A fresh
//! guard is created for every mount, so a new identity always starts
//! healthy.
//!
//! While a guard is active the process panic hook records the panic location
//! and a backtrace instead of printing to the terminal.

use std::any::Any;
use std::backtrace::Backtrace;
use std::cell::{Cell, RefCell};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;

use crate::domain::{ArtifactId, FailureCategory, FailureInfo, FailurePhase};

thread_local! {
    static GUARD_DEPTH: Cell<usize> = const { Cell::new(0) };
    static LAST_PANIC: RefCell<Option<String>> = const { RefCell::new(None) };
}

static HOOK: Once = Once::new();

/// A panic caught by [`catch`]
#[derive(Debug, Clone, PartialEq)]
pub struct CaughtPanic {
    pub message: String,
    /// Location and backtrace recorded by the panic hook
    pub stack: Option<String>,
}

/// Routes panics raised inside a guard to [`LAST_PANIC`]; others go to the
/// previously installed hook.
fn install_hook() {
    HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if GUARD_DEPTH.with(Cell::get) == 0 {
                previous(info);
                return;
            }

            let location = info
                .location()
                .map(|l| format!("at {}", l))
                .unwrap_or_else(|| "at <unknown location>".to_string());
            let stack = format!("{}\n\n{}", location, Backtrace::force_capture());
            LAST_PANIC.with(|p| *p.borrow_mut() = Some(stack));
        }));
    });
}

/// Runs `f`, converting a panic into a [`CaughtPanic`]
pub fn catch<R>(f: impl FnOnce() -> R) -> Result<R, CaughtPanic> {
    install_hook();

    GUARD_DEPTH.with(|d| d.set(d.get() + 1));
    let result = panic::catch_unwind(AssertUnwindSafe(f));
    GUARD_DEPTH.with(|d| d.set(d.get() - 1));

    result.map_err(|payload| CaughtPanic {
        message: panic_message(payload.as_ref()),
        stack: LAST_PANIC.with(|p| p.borrow_mut().take()),
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panicked with a non-string payload".to_string()
    }
}

/// Tagged boundary state
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryState {
    Healthy,
    Failed(Box<FailureInfo>),
}

/// Failure boundary scoped to one artifact identity
#[derive(Debug)]
pub struct RenderGuard {
    artifact: ArtifactId,
    state: BoundaryState,
}

impl RenderGuard {
    pub fn new(artifact: ArtifactId) -> Self {
        Self {
            artifact,
            state: BoundaryState::Healthy,
        }
    }

    pub fn artifact(&self) -> &ArtifactId {
        &self.artifact
    }

    pub fn state(&self) -> &BoundaryState {
        &self.state
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.state, BoundaryState::Failed(_))
    }

    pub fn failure(&self) -> Option<&FailureInfo> {
        match &self.state {
            BoundaryState::Failed(info) => Some(info),
            BoundaryState::Healthy => None,
        }
    }

    /// Runs `f` inside the boundary
    ///
    /// Returns `None` if the guard already failed (and `f` is not run) or if
    /// `f` panicked (and the guard is now failed).
    pub fn run<R>(&mut self, phase: FailurePhase, f: impl FnOnce() -> R) -> Option<R> {
        if self.is_failed() {
            return None;
        }

        match catch(f) {
            Ok(value) => Some(value),
            Err(caught) => {
                self.fail(phase, caught.message, caught.stack);
                None
            }
        }
    }

    /// Records a failure; returns false if the guard had already failed
    pub fn fail(&mut self, phase: FailurePhase, raw: impl Into<String>, stack: Option<String>) -> bool {
        let raw = raw.into();
        let category = FailureCategory::classify(&raw);
        self.fail_as(phase, category, raw, stack)
    }

    /// Records a failure whose category is known from its cause
    pub fn fail_as(
        &mut self,
        phase: FailurePhase,
        category: FailureCategory,
        raw: impl Into<String>,
        stack: Option<String>,
    ) -> bool {
        if self.is_failed() {
            return false;
        }

        let info = FailureInfo::with_category(self.artifact.clone(), phase, category, raw, stack);
        tracing::error!(
            artifact = %info.artifact,
            phase = ?info.phase,
            category = info.category.as_str(),
            error = %info.raw,
            stack = info.stack.as_deref().unwrap_or(""),
            "artifact failed"
        );

        self.state = BoundaryState::Failed(Box::new(info));
        true
    }
}
