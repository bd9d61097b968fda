//! Theme context for the Dioxus tree.
//!
//! Wraps the per-session [`ThemeController`] and mirrors its state into a
//! signal so components re-render on every change. The controller is
//! created and initialized when the provider first renders and disposed
//! when it unmounts.

use dioxus::prelude::*;

use crate::theme::{ThemeBackend, ThemeController, ThemeError, ThemeState};

/// Theme state shared via context
#[derive(Clone)]
pub struct ThemeContext {
    pub state: Signal<ThemeState>,
    controller: ThemeController,
}

impl ThemeContext {
    /// Get current state
    pub fn get(&self) -> ThemeState {
        (self.state)()
    }

    /// Cycle to the next preference (light → dark → system)
    pub fn switch(&self) {
        if let Err(e) = self.controller.switch_theme() {
            tracing::error!("Theme switch failed: {}", e);
        }
    }

    pub fn controller(&self) -> &ThemeController {
        &self.controller
    }
}

/// What the provider does with its backend on mount.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThemeMount {
    /// Read the stored preference, watch the OS and load cues.
    Live,
    /// Server render: nothing is read, the state stays unset.
    Static,
}

/// Initialize theme context provider - call once at app root
pub fn use_theme_provider() -> ThemeContext {
    #[cfg(target_arch = "wasm32")]
    let ctx = use_theme_provider_with(crate::app::browser::backend, ThemeMount::Live);

    #[cfg(not(target_arch = "wasm32"))]
    let ctx = use_theme_provider_with(crate::theme::memory::detached_backend, ThemeMount::Static);

    ctx
}

/// Provider over an explicit backend. `make_backend` runs once, on first
/// render; the controller is disposed when the providing scope drops.
pub fn use_theme_provider_with(
    make_backend: impl FnOnce() -> ThemeBackend,
    mount: ThemeMount,
) -> ThemeContext {
    let controller = use_hook(move || {
        let controller = ThemeController::new(make_backend());
        if mount == ThemeMount::Live {
            match controller.initialize() {
                Ok(cue_loads) => {
                    spawn(cue_loads);
                }
                Err(e) => tracing::error!("Theme initialization failed: {}", e),
            }
        }
        controller
    });

    // Seeded from the controller so the first render already shows the
    // initialized state
    let state = use_signal({
        let controller = controller.clone();
        move || controller.state().unwrap_or_default()
    });

    use_hook({
        let controller = controller.clone();
        move || {
            let observed = controller.observe(move |next| {
                let mut state = state;
                state.set(*next);
            });
            if let Err(e) = observed {
                tracing::error!("Theme observer not registered: {}", e);
            }
        }
    });

    let ctx = use_context_provider({
        let controller = controller.clone();
        move || ThemeContext { state, controller }
    });

    use_drop(move || controller.dispose());
    ctx
}

/// Get theme context, or `Detached` when no live provider is mounted.
pub fn try_use_theme() -> Result<ThemeContext, ThemeError> {
    let ctx = try_use_context::<ThemeContext>().ok_or(ThemeError::Detached)?;
    if ctx.controller.is_attached() {
        Ok(ctx)
    } else {
        Err(ThemeError::Detached)
    }
}

/// Get theme context - use in any component below `use_theme_provider`
pub fn use_theme() -> ThemeContext {
    match try_use_theme() {
        Ok(ctx) => ctx,
        Err(e) => panic!("use_theme() requires use_theme_provider() higher in the tree: {e}"),
    }
}
