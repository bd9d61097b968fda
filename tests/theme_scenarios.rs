//! Theme controller scenarios
//!
//! Drives the controller through in-memory storage, a hand-operated OS
//! color-scheme signal and a recording audio player.
//!
//! Run with: cargo test --test theme_scenarios

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use folio::theme::bootstrap;
use folio::theme::memory::{ManualScheme, MemoryStore, RecordingPlayer, RootClasses, StaticCues};
use folio::theme::{
    ActualTheme, AudioClip, Cue, CueLoader, ThemeBackend, ThemeController, ThemeError,
    ThemePreference, ThemeState,
};
use futures::channel::oneshot;
use futures::future::LocalBoxFuture;
use futures::FutureExt;

fn on_clip() -> AudioClip {
    AudioClip::new(b"switch-on".to_vec())
}

fn off_clip() -> AudioClip {
    AudioClip::new(b"switch-off".to_vec())
}

struct Harness {
    controller: ThemeController,
    store: Rc<MemoryStore>,
    scheme: Rc<ManualScheme>,
    root: Rc<RootClasses>,
    player: Rc<RecordingPlayer>,
}

impl Harness {
    fn new(stored: Option<&str>, os_dark: bool, loader: Rc<dyn CueLoader>) -> Self {
        let store = Rc::new(MemoryStore::with_value(stored));
        let scheme = Rc::new(ManualScheme::new(os_dark));
        let root = Rc::new(RootClasses::default());
        let player = Rc::new(RecordingPlayer::default());
        let controller = ThemeController::new(ThemeBackend {
            store: store.clone(),
            scheme: scheme.clone(),
            surface: root.clone(),
            loader,
            player: player.clone(),
        });
        Self {
            controller,
            store,
            scheme,
            root,
            player,
        }
    }

    /// Both cues available and loaded during initialize.
    fn loaded(stored: Option<&str>, os_dark: bool) -> Self {
        let loader = StaticCues::empty()
            .with(Cue::SwitchOn, on_clip())
            .with(Cue::SwitchOff, off_clip());
        let h = Self::new(stored, os_dark, Rc::new(loader));
        let loads = h.controller.initialize().expect("initialize");
        futures::executor::block_on(loads);
        h
    }

    fn state(&self) -> ThemeState {
        self.controller.state().expect("attached")
    }
}

/// Loader whose clips arrive when the test says so.
#[derive(Default)]
struct DeferredCues {
    senders: RefCell<HashMap<Cue, oneshot::Sender<AudioClip>>>,
}

impl DeferredCues {
    fn deliver(&self, cue: Cue, clip: AudioClip) {
        let sender = self.senders.borrow_mut().remove(&cue).expect("load requested");
        sender.send(clip).expect("receiver alive");
    }
}

impl CueLoader for DeferredCues {
    fn load(&self, cue: Cue) -> LocalBoxFuture<'static, Result<AudioClip, ThemeError>> {
        let (tx, rx) = oneshot::channel();
        self.senders.borrow_mut().insert(cue, tx);
        async move {
            rx.await.map_err(|_| ThemeError::CueLoad {
                cue,
                reason: "cancelled".into(),
            })
        }
        .boxed_local()
    }
}

// =============================================================================
// Initial load
// =============================================================================

#[test]
fn stored_light_with_dark_os_renders_light() {
    let h = Harness::loaded(Some("light"), true);

    assert_eq!(
        h.state(),
        ThemeState {
            preference: Some(ThemePreference::Light),
            actual: Some(ActualTheme::Light),
        }
    );
    assert!(!h.root.is_dark());
    assert!(h.player.played().is_empty(), "no cue on initial load");
    assert_eq!(h.store.writes(), 0);
}

#[test]
fn absent_preference_follows_dark_os() {
    // Pre-paint step runs first and persists "system"
    let store = MemoryStore::default();
    let scheme = ManualScheme::new(true);
    let root = RootClasses::default();
    let plan = bootstrap::apply(&store, &scheme, &root);
    assert_eq!(plan.actual, ActualTheme::Dark);
    assert_eq!(store.value().as_deref(), Some("system"));
    assert!(root.is_dark());

    // The controller itself never writes during initialize
    let h = Harness::loaded(None, true);
    assert_eq!(h.state().preference, Some(ThemePreference::System));
    assert_eq!(h.state().actual, Some(ActualTheme::Dark));
    assert!(h.root.is_dark());
    assert_eq!(h.store.value(), None);
}

#[test]
fn unrecognised_stored_value_is_treated_as_system() {
    let h = Harness::loaded(Some("oled"), false);
    assert_eq!(h.state().preference, Some(ThemePreference::System));
    assert_eq!(h.state().actual, Some(ActualTheme::Light));
    assert_eq!(h.store.value().as_deref(), Some("oled"));
}

#[test]
fn bootstrap_keeps_explicit_values() {
    for (stored, dark) in [("dark", true), ("light", false)] {
        let store = MemoryStore::with_value(Some(stored));
        let scheme = ManualScheme::new(!dark);
        let root = RootClasses::default();

        bootstrap::apply(&store, &scheme, &root);

        assert_eq!(root.is_dark(), dark);
        assert_eq!(store.value().as_deref(), Some(stored));
        assert_eq!(store.writes(), 0);
    }
}

// =============================================================================
// Manual switching
// =============================================================================

#[test]
fn light_to_dark_plays_switch_off_and_persists() {
    let h = Harness::loaded(Some("light"), false);

    let next = h.controller.switch_theme().unwrap();

    assert_eq!(next.preference, Some(ThemePreference::Dark));
    assert_eq!(next.actual, Some(ActualTheme::Dark));
    assert_eq!(h.store.value().as_deref(), Some("dark"));
    assert!(h.root.is_dark());
    assert_eq!(h.player.played(), vec![off_clip()]);
}

#[test]
fn full_cycle_returns_to_start() {
    let h = Harness::loaded(Some("light"), false);

    let stored: Vec<_> = (0..3)
        .map(|_| {
            h.controller.switch_theme().unwrap();
            h.store.value().unwrap()
        })
        .collect();

    assert_eq!(stored, vec!["dark", "system", "light"]);
    assert_eq!(h.state().preference, Some(ThemePreference::Light));
}

#[test]
fn cue_follows_resulting_theme_even_without_visual_change() {
    // Dark -> System while the OS is dark: rendered theme stays dark
    let h = Harness::loaded(Some("dark"), true);
    let applied_before = h.root.applied();

    let next = h.controller.switch_theme().unwrap();

    assert_eq!(next.preference, Some(ThemePreference::System));
    assert_eq!(next.actual, Some(ActualTheme::Dark));
    assert_eq!(h.player.played(), vec![off_clip()]);
    assert_eq!(h.root.applied(), applied_before, "surface untouched when actual is unchanged");
}

#[test]
fn system_to_light_plays_switch_on() {
    let h = Harness::loaded(Some("system"), true);
    h.controller.switch_theme().unwrap();
    assert_eq!(h.state().actual, Some(ActualTheme::Light));
    assert_eq!(h.player.played(), vec![on_clip()]);
}

#[test]
fn switch_before_initialize_starts_at_light() {
    let h = Harness::new(Some("dark"), true, Rc::new(StaticCues::empty()));

    let next = h.controller.switch_theme().unwrap();

    assert_eq!(next.preference, Some(ThemePreference::Light));
    assert_eq!(h.store.value().as_deref(), Some("light"));
}

#[test]
fn storage_failure_keeps_memory_state() {
    let h = Harness::loaded(Some("light"), false);
    h.store.set_fail_writes(true);

    let next = h.controller.switch_theme().unwrap();

    assert_eq!(next.preference, Some(ThemePreference::Dark));
    assert_eq!(h.state(), next);
    assert_eq!(h.store.value().as_deref(), Some("light"));
    assert!(h.root.is_dark());
}

#[test]
fn rapid_switches_each_complete_in_order() {
    let h = Harness::loaded(Some("light"), false);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let seen_in = seen.clone();
    let store = h.store.clone();
    h.controller
        .observe(move |state| {
            // Storage already holds the value being reflected
            assert_eq!(store.value().as_deref(), state.preference.map(|p| p.as_str()));
            seen_in.borrow_mut().push(state.preference);
        })
        .unwrap();

    h.controller.switch_theme().unwrap();
    h.controller.switch_theme().unwrap();

    assert_eq!(
        *seen.borrow(),
        vec![Some(ThemePreference::Dark), Some(ThemePreference::System)]
    );
    assert_eq!(h.player.played(), vec![off_clip(), on_clip()]);
}

// =============================================================================
// Audio cue loading
// =============================================================================

#[test]
fn switch_before_cues_load_is_silent() {
    let loader = Rc::new(DeferredCues::default());
    let h = Harness::new(Some("light"), false, loader.clone());
    let mut loads = h.controller.initialize().unwrap();

    h.controller.switch_theme().unwrap();
    assert!(h.player.played().is_empty());

    // Only the switch-on clip arrives
    loader.deliver(Cue::SwitchOn, on_clip());
    assert!(futures::executor::block_on(futures::future::poll_immediate(&mut loads)).is_none());
    assert!(h.controller.is_cue_loaded(Cue::SwitchOn));
    assert!(!h.controller.is_cue_loaded(Cue::SwitchOff));

    // dark -> system (OS light): light, switch-on now available
    h.controller.switch_theme().unwrap();
    assert_eq!(h.player.played(), vec![on_clip()]);

    // system -> light plays switch-on again, light -> dark has no clip yet
    h.controller.switch_theme().unwrap();
    h.controller.switch_theme().unwrap();
    assert_eq!(h.player.played(), vec![on_clip(), on_clip()]);

    loader.deliver(Cue::SwitchOff, off_clip());
    futures::executor::block_on(loads);
    assert!(h.controller.is_cue_loaded(Cue::SwitchOff));
}

#[test]
fn failed_cue_load_leaves_direction_silent() {
    let loader = StaticCues::empty().with(Cue::SwitchOn, on_clip());
    let h = Harness::new(Some("light"), false, Rc::new(loader));
    futures::executor::block_on(h.controller.initialize().unwrap());

    h.controller.switch_theme().unwrap();

    assert!(!h.controller.is_cue_loaded(Cue::SwitchOff));
    assert!(h.player.played().is_empty());
}

// =============================================================================
// OS color-scheme changes
// =============================================================================

#[test]
fn os_change_updates_actual_while_system() {
    let h = Harness::loaded(Some("system"), false);
    assert_eq!(h.state().actual, Some(ActualTheme::Light));
    let writes = h.store.writes();

    h.scheme.set_dark(true);

    assert_eq!(h.state().preference, Some(ThemePreference::System));
    assert_eq!(h.state().actual, Some(ActualTheme::Dark));
    assert!(h.root.is_dark());
    assert!(h.player.played().is_empty(), "OS changes never play cues");
    assert_eq!(h.store.writes(), writes, "OS changes never persist");
    assert_eq!(h.store.value().as_deref(), Some("system"));
}

#[test]
fn late_notification_after_leaving_system_is_dropped() {
    let h = Harness::loaded(Some("system"), false);

    // system -> light while a "dark" notification is still queued
    h.controller.switch_theme().unwrap();
    assert_eq!(h.state().preference, Some(ThemePreference::Light));

    h.scheme.notify(true);

    assert_eq!(h.state().actual, Some(ActualTheme::Light));
    assert!(!h.root.is_dark());
}

#[test]
fn notifications_ignored_when_never_system() {
    let h = Harness::loaded(Some("dark"), false);

    h.scheme.set_dark(false);
    h.scheme.notify(false);

    assert_eq!(h.state().actual, Some(ActualTheme::Dark));
    assert!(h.root.is_dark());
}

#[test]
fn switching_back_to_system_resumes_tracking() {
    let h = Harness::loaded(Some("dark"), false);

    h.controller.switch_theme().unwrap(); // -> system, OS light
    assert_eq!(h.state().actual, Some(ActualTheme::Light));

    h.scheme.set_dark(true);
    assert_eq!(h.state().actual, Some(ActualTheme::Dark));
    assert_eq!(h.scheme.subscriber_count(), 1);
}

#[test]
fn notifications_after_dispose_are_ignored() {
    let h = Harness::loaded(Some("system"), false);
    let seen = Rc::new(RefCell::new(0));
    let seen_in = seen.clone();
    h.controller
        .observe(move |_| *seen_in.borrow_mut() += 1)
        .unwrap();

    h.controller.dispose();
    h.scheme.set_dark(true);

    assert_eq!(*seen.borrow(), 0);
    assert!(!h.root.is_dark());
    assert!(matches!(h.controller.state(), Err(ThemeError::Detached)));
}

#[test]
fn surface_application_is_idempotent() {
    let h = Harness::loaded(Some("system"), true);
    let dark_once = h.root.is_dark();

    // Same value delivered twice
    h.scheme.set_dark(true);
    h.scheme.set_dark(true);

    assert_eq!(h.root.is_dark(), dark_once);
    assert_eq!(h.root.applied(), 1, "only the initial render touched the root");
    assert_eq!(h.state().actual, Some(ActualTheme::Dark));
}
