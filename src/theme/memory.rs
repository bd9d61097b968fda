//! In-process collaborators.
//!
//! Used while rendering on the server, where there is no browser storage or
//! media query, and by tests that need to drive the OS signal by hand.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use futures::future::{self, LocalBoxFuture};
use futures::FutureExt;

use super::controller::{ColorSchemeSource, PreferenceStore, ThemeBackend, ThemeSurface, WatchGuard};
use super::cues::{AudioClip, Cue, CueLoader, CuePlayer};
use super::{ActualTheme, ThemeError};

#[derive(Debug, Default)]
pub struct MemoryStore {
    value: RefCell<Option<String>>,
    writes: Cell<usize>,
    fail_writes: Cell<bool>,
}

impl MemoryStore {
    pub fn with_value(value: Option<&str>) -> Self {
        Self {
            value: RefCell::new(value.map(str::to_string)),
            ..Self::default()
        }
    }

    pub fn value(&self) -> Option<String> {
        self.value.borrow().clone()
    }

    /// Number of successful writes.
    pub fn writes(&self) -> usize {
        self.writes.get()
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }
}

impl PreferenceStore for MemoryStore {
    fn load(&self) -> Option<String> {
        self.value()
    }

    fn store(&self, value: &str) -> Result<(), ThemeError> {
        if self.fail_writes.get() {
            return Err(ThemeError::Storage("quota exceeded".into()));
        }
        *self.value.borrow_mut() = Some(value.to_string());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

type SchemeHandlers = Rc<RefCell<Vec<(u64, Rc<dyn Fn(bool)>)>>>;

/// OS signal whose value is set by hand.
#[derive(Default)]
pub struct ManualScheme {
    dark: Cell<bool>,
    handlers: SchemeHandlers,
    next_id: Cell<u64>,
}

impl ManualScheme {
    pub fn new(dark: bool) -> Self {
        Self {
            dark: Cell::new(dark),
            ..Self::default()
        }
    }

    /// Change the signal and notify every live subscriber.
    pub fn set_dark(&self, dark: bool) {
        self.dark.set(dark);
        self.notify(dark);
    }

    /// Deliver a notification without touching the current value, as a
    /// queued event from an earlier change would arrive.
    pub fn notify(&self, dark: bool) {
        let handlers: Vec<_> = self
            .handlers
            .borrow()
            .iter()
            .map(|(_, handler)| handler.clone())
            .collect();
        for handler in handlers {
            handler(dark);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.handlers.borrow().len()
    }
}

impl ColorSchemeSource for ManualScheme {
    fn prefers_dark(&self) -> bool {
        self.dark.get()
    }

    fn watch(&self, on_change: Box<dyn Fn(bool)>) -> WatchGuard {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.handlers.borrow_mut().push((id, Rc::from(on_change)));

        let handlers = Rc::downgrade(&self.handlers);
        WatchGuard::new(move || {
            if let Some(handlers) = handlers.upgrade() {
                handlers.borrow_mut().retain(|(handler, _)| *handler != id);
            }
        })
    }
}

/// Document root stand-in tracking the dark class.
#[derive(Debug, Default)]
pub struct RootClasses {
    dark: Cell<bool>,
    applied: Cell<usize>,
}

impl RootClasses {
    pub fn is_dark(&self) -> bool {
        self.dark.get()
    }

    /// Number of apply calls received.
    pub fn applied(&self) -> usize {
        self.applied.get()
    }
}

impl ThemeSurface for RootClasses {
    fn apply(&self, actual: ActualTheme) {
        self.dark.set(actual.is_dark());
        self.applied.set(self.applied.get() + 1);
    }
}

/// Loader that answers immediately from a fixed table.
#[derive(Debug, Default)]
pub struct StaticCues {
    clips: HashMap<Cue, AudioClip>,
}

impl StaticCues {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with(mut self, cue: Cue, clip: AudioClip) -> Self {
        self.clips.insert(cue, clip);
        self
    }
}

impl CueLoader for StaticCues {
    fn load(&self, cue: Cue) -> LocalBoxFuture<'static, Result<AudioClip, ThemeError>> {
        let result = self.clips.get(&cue).cloned().ok_or(ThemeError::CueLoad {
            cue,
            reason: "not available".into(),
        });
        future::ready(result).boxed_local()
    }
}

/// Player that remembers what it was asked to play.
#[derive(Debug, Default)]
pub struct RecordingPlayer {
    played: RefCell<Vec<AudioClip>>,
}

impl RecordingPlayer {
    pub fn played(&self) -> Vec<AudioClip> {
        self.played.borrow().clone()
    }
}

impl CuePlayer for RecordingPlayer {
    fn play(&self, clip: &AudioClip) {
        self.played.borrow_mut().push(clip.clone());
    }
}

/// Backend with no stored value, a light OS and no audio.
pub fn detached_backend() -> ThemeBackend {
    ThemeBackend {
        store: Rc::new(MemoryStore::default()),
        scheme: Rc::new(ManualScheme::new(false)),
        surface: Rc::new(RootClasses::default()),
        loader: Rc::new(StaticCues::empty()),
        player: Rc::new(RecordingPlayer::default()),
    }
}
