//! Theme controller.
//!
//! One controller exists per page session. It is created explicitly, handed
//! to the UI tree, and disposed when the tree detaches. Everything runs on
//! the single UI thread, so shared state lives in `Rc<RefCell<_>>` and event
//! ordering decides races between manual switches and OS notifications.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use futures::future::{join_all, LocalBoxFuture};
use futures::FutureExt;

use super::cues::{AudioCueSet, Cue, CueLoader, CuePlayer};
use super::{ActualTheme, ThemeError, ThemePreference, ThemeState};

/// Durable string storage for the preference.
pub trait PreferenceStore {
    /// Stored value, if any. Read failures count as absent.
    fn load(&self) -> Option<String>;
    fn store(&self, value: &str) -> Result<(), ThemeError>;
}

/// The OS "prefers dark color scheme" signal.
pub trait ColorSchemeSource {
    fn prefers_dark(&self) -> bool;

    /// Subscribe to changes. The subscription lives until the guard drops.
    fn watch(&self, on_change: Box<dyn Fn(bool)>) -> WatchGuard;
}

/// Where the resolved theme becomes visible (the document root class).
/// Implementations must be idempotent.
pub trait ThemeSurface {
    fn apply(&self, actual: ActualTheme);
}

/// Releases an OS subscription on drop.
pub struct WatchGuard {
    release: Option<Box<dyn FnOnce()>>,
}

impl WatchGuard {
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// Guard for sources that never notify.
    pub fn noop() -> Self {
        Self { release: None }
    }
}

impl Drop for WatchGuard {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

/// Everything the controller talks to.
#[derive(Clone)]
pub struct ThemeBackend {
    pub store: Rc<dyn PreferenceStore>,
    pub scheme: Rc<dyn ColorSchemeSource>,
    pub surface: Rc<dyn ThemeSurface>,
    pub loader: Rc<dyn CueLoader>,
    pub player: Rc<dyn CuePlayer>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

type Observer = Rc<dyn Fn(&ThemeState)>;

struct Session {
    state: ThemeState,
    cues: AudioCueSet,
    watch: Option<WatchGuard>,
    observers: Vec<(ObserverId, Observer)>,
    next_observer: u64,
    attached: bool,
}

struct Shared {
    session: RefCell<Session>,
    backend: ThemeBackend,
}

/// Owner of the per-session theme state.
///
/// Cloning yields another handle to the same session. No `RefCell` borrow is
/// held while collaborators or observers run, so observers may call back
/// into the controller.
#[derive(Clone)]
pub struct ThemeController {
    shared: Rc<Shared>,
}

impl PartialEq for ThemeController {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.shared, &other.shared)
    }
}

impl ThemeController {
    pub fn new(backend: ThemeBackend) -> Self {
        Self {
            shared: Rc::new(Shared {
                session: RefCell::new(Session {
                    state: ThemeState::default(),
                    cues: AudioCueSet::default(),
                    watch: None,
                    observers: Vec::new(),
                    next_observer: 0,
                    attached: true,
                }),
                backend,
            }),
        }
    }

    /// Read the stored preference and derive the initial state.
    ///
    /// The state transition completes before this returns. The returned
    /// future loads both audio cues; the host spawns it and never waits on
    /// it. Each cue becomes playable as soon as its own load finishes.
    pub fn initialize(&self) -> Result<LocalBoxFuture<'static, ()>, ThemeError> {
        self.shared.ensure_attached()?;
        let backend = &self.shared.backend;

        let stored = backend.store.load();
        let preference = match stored.as_deref().map(ThemePreference::parse) {
            Some(Some(pref)) => pref,
            Some(None) => {
                tracing::debug!("Ignoring unrecognised stored theme {:?}", stored);
                ThemePreference::System
            }
            None => ThemePreference::System,
        };

        let next = ThemeState::new(preference, backend.scheme.prefers_dark());
        let prev = self.shared.replace_state(next);
        self.shared.reflect(prev, next);
        self.shared.ensure_watch();

        tracing::debug!(
            "Theme initialized: preference={} actual={:?}",
            preference,
            next.actual
        );

        Ok(self.shared.load_cues())
    }

    /// Advance the preference one step through light → dark → system.
    ///
    /// Updates memory, persists, then reflects the change. The cue follows
    /// the resulting actual theme: switch-on for light, switch-off for dark,
    /// whether or not the rendered theme changed.
    pub fn switch_theme(&self) -> Result<ThemeState, ThemeError> {
        self.shared.ensure_attached()?;
        let backend = &self.shared.backend;

        let current = self.shared.session.borrow().state.preference;
        let preference = ThemePreference::after(current);
        let actual = preference.resolve(backend.scheme.prefers_dark());
        let next = ThemeState {
            preference: Some(preference),
            actual: Some(actual),
        };

        let prev = self.shared.replace_state(next);
        if let Err(e) = backend.store.store(preference.as_str()) {
            tracing::warn!("Failed to persist theme preference: {}", e);
        }
        self.shared.reflect(prev, next);
        self.shared.ensure_watch();

        let clip = self.shared.session.borrow().cues.for_theme(actual).cloned();
        match clip {
            Some(clip) => backend.player.play(&clip),
            None => tracing::debug!("{} cue not loaded yet, switching silently", actual.cue()),
        }

        tracing::info!("Theme switched to {} ({})", preference, actual.as_str());
        Ok(next)
    }

    pub fn state(&self) -> Result<ThemeState, ThemeError> {
        self.shared.ensure_attached()?;
        Ok(self.shared.session.borrow().state)
    }

    pub fn is_cue_loaded(&self, cue: Cue) -> bool {
        self.shared.session.borrow().cues.is_loaded(cue)
    }

    pub fn is_attached(&self) -> bool {
        self.shared.session.borrow().attached
    }

    /// Register a callback invoked with the new state after every change.
    pub fn observe(&self, callback: impl Fn(&ThemeState) + 'static) -> Result<ObserverId, ThemeError> {
        self.shared.ensure_attached()?;
        let mut session = self.shared.session.borrow_mut();
        let id = ObserverId(session.next_observer);
        session.next_observer += 1;
        session.observers.push((id, Rc::new(callback)));
        Ok(id)
    }

    pub fn unobserve(&self, id: ObserverId) {
        self.shared
            .session
            .borrow_mut()
            .observers
            .retain(|(observer, _)| *observer != id);
    }

    /// Detach from the session: release the OS subscription and observers.
    /// Every later operation returns [`ThemeError::Detached`].
    pub fn dispose(&self) {
        let (watch, observers) = {
            let mut session = self.shared.session.borrow_mut();
            if !session.attached {
                return;
            }
            session.attached = false;
            (session.watch.take(), std::mem::take(&mut session.observers))
        };
        drop(watch);
        drop(observers);
        tracing::debug!("Theme controller disposed");
    }
}

impl Shared {
    fn ensure_attached(&self) -> Result<(), ThemeError> {
        if self.session.borrow().attached {
            Ok(())
        } else {
            Err(ThemeError::Detached)
        }
    }

    fn replace_state(&self, next: ThemeState) -> ThemeState {
        std::mem::replace(&mut self.session.borrow_mut().state, next)
    }

    /// Push a committed state out to the surface and observers.
    fn reflect(&self, prev: ThemeState, next: ThemeState) {
        if prev.actual != next.actual {
            if let Some(actual) = next.actual {
                self.backend.surface.apply(actual);
            }
        }

        let observers: Vec<Observer> = self
            .session
            .borrow()
            .observers
            .iter()
            .map(|(_, observer)| observer.clone())
            .collect();
        for observer in observers {
            observer(&next);
        }
    }

    /// Subscribe to OS changes once the preference is known. The handler
    /// checks the preference on delivery, so one subscription serves every
    /// later preference.
    fn ensure_watch(self: &Rc<Self>) {
        {
            let session = self.session.borrow();
            if session.watch.is_some() || session.state.preference.is_none() {
                return;
            }
        }

        let weak: Weak<Shared> = Rc::downgrade(self);
        let guard = self.backend.scheme.watch(Box::new(move |dark| {
            if let Some(shared) = weak.upgrade() {
                shared.on_scheme_change(dark);
            }
        }));

        let mut session = self.session.borrow_mut();
        if session.attached {
            session.watch = Some(guard);
        }
    }

    fn on_scheme_change(&self, dark: bool) {
        let next = {
            let session = self.session.borrow();
            if !session.attached {
                return;
            }
            if session.state.preference != Some(ThemePreference::System) {
                tracing::debug!(
                    "Dropping OS color-scheme change, preference is {:?}",
                    session.state.preference
                );
                return;
            }
            ThemeState {
                preference: session.state.preference,
                actual: Some(ActualTheme::from_dark(dark)),
            }
        };

        let prev = self.replace_state(next);
        self.reflect(prev, next);
        tracing::debug!("OS color scheme changed, dark={}", dark);
    }

    fn load_cues(self: &Rc<Self>) -> LocalBoxFuture<'static, ()> {
        let loads: Vec<_> = Cue::ALL
            .into_iter()
            .map(|cue| {
                let pending = self.backend.loader.load(cue);
                let weak = Rc::downgrade(self);
                async move {
                    match pending.await {
                        Ok(clip) => {
                            if let Some(shared) = weak.upgrade() {
                                let mut session = shared.session.borrow_mut();
                                if session.attached && session.cues.insert(cue, clip) {
                                    tracing::debug!("{} cue loaded", cue);
                                }
                            }
                        }
                        Err(e) => tracing::warn!("{}", e),
                    }
                }
            })
            .collect();

        async move {
            join_all(loads).await;
        }
        .boxed_local()
    }
}
