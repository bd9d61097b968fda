//! Browser implementations of the theme collaborators (WASM only).

use std::cell::RefCell;
use std::rc::Rc;

use futures::future::LocalBoxFuture;
use futures::FutureExt;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{AudioBuffer, AudioContext, MediaQueryList, MediaQueryListEvent, Response};

use crate::theme::{
    ActualTheme, AudioClip, ColorSchemeSource, Cue, CueLoader, CuePlayer, PreferenceStore,
    ThemeBackend, ThemeError, ThemeSurface, WatchGuard, DARK_CLASS, DARK_SCHEME_QUERY, STORAGE_KEY,
};

pub fn backend() -> ThemeBackend {
    ThemeBackend {
        store: Rc::new(LocalStorage),
        scheme: Rc::new(SchemeQuery),
        surface: Rc::new(DocumentRoot),
        loader: Rc::new(FetchCues),
        player: Rc::new(WebAudio::default()),
    }
}

/// Drop server-rendered children of the mount point before the client
/// renders into it.
pub fn clear_root(id: &str) {
    if let Some(root) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(id))
    {
        root.set_inner_html("");
    }
}

fn js_err(e: JsValue) -> String {
    format!("{:?}", e)
}

/// `window.localStorage`
struct LocalStorage;

impl LocalStorage {
    fn storage() -> Result<web_sys::Storage, ThemeError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .ok_or(ThemeError::Unavailable("localStorage"))
    }
}

impl PreferenceStore for LocalStorage {
    fn load(&self) -> Option<String> {
        Self::storage().ok()?.get_item(STORAGE_KEY).ok().flatten()
    }

    fn store(&self, value: &str) -> Result<(), ThemeError> {
        Self::storage()?
            .set_item(STORAGE_KEY, value)
            .map_err(|e| ThemeError::Storage(js_err(e)))
    }
}

/// `matchMedia("(prefers-color-scheme: dark)")`
struct SchemeQuery;

impl SchemeQuery {
    fn query() -> Option<MediaQueryList> {
        web_sys::window()?.match_media(DARK_SCHEME_QUERY).ok().flatten()
    }
}

impl ColorSchemeSource for SchemeQuery {
    fn prefers_dark(&self) -> bool {
        Self::query().map_or(false, |mq| mq.matches())
    }

    fn watch(&self, on_change: Box<dyn Fn(bool)>) -> WatchGuard {
        let Some(mq) = Self::query() else {
            return WatchGuard::noop();
        };

        let listener = Closure::wrap(Box::new(move |e: MediaQueryListEvent| {
            on_change(e.matches());
        }) as Box<dyn FnMut(_)>);

        if let Err(e) = mq.add_event_listener_with_callback("change", listener.as_ref().unchecked_ref())
        {
            web_sys::console::warn_1(&format!("Theme: cannot watch color scheme: {:?}", e).into());
            return WatchGuard::noop();
        }

        // The closure must outlive the listener registration
        WatchGuard::new(move || {
            let _ = mq.remove_event_listener_with_callback("change", listener.as_ref().unchecked_ref());
            drop(listener);
        })
    }
}

/// `<html>` class list
struct DocumentRoot;

impl ThemeSurface for DocumentRoot {
    fn apply(&self, actual: ActualTheme) {
        if let Some(root) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.document_element())
        {
            let _ = root
                .class_list()
                .toggle_with_force(DARK_CLASS, actual.is_dark());
        }
    }
}

/// Loads cue clips with `fetch`.
struct FetchCues;

async fn fetch_bytes(path: &'static str) -> Result<Vec<u8>, String> {
    let window = web_sys::window().ok_or("No window")?;
    let resp_value = JsFuture::from(window.fetch_with_str(path))
        .await
        .map_err(js_err)?;
    let resp: Response = resp_value.dyn_into().map_err(|_| "Not a Response")?;
    if !resp.ok() {
        return Err(format!("HTTP {}", resp.status()));
    }
    let buffer = JsFuture::from(resp.array_buffer().map_err(js_err)?)
        .await
        .map_err(js_err)?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}

impl CueLoader for FetchCues {
    fn load(&self, cue: Cue) -> LocalBoxFuture<'static, Result<AudioClip, ThemeError>> {
        async move {
            fetch_bytes(cue.default_path())
                .await
                .map(|bytes| AudioClip::new(bytes))
                .map_err(|reason| ThemeError::CueLoad { cue, reason })
        }
        .boxed_local()
    }
}

/// Decodes and plays clips through one lazily created `AudioContext`.
#[derive(Default)]
struct WebAudio {
    context: RefCell<Option<AudioContext>>,
}

impl WebAudio {
    fn context(&self) -> Option<AudioContext> {
        let mut slot = self.context.borrow_mut();
        if slot.is_none() {
            *slot = AudioContext::new().ok();
        }
        slot.clone()
    }
}

async fn decode_and_play(ctx: AudioContext, clip: AudioClip) -> Result<(), JsValue> {
    // decodeAudioData detaches its input, so hand it a copy
    let bytes = js_sys::Uint8Array::from(clip.bytes());
    let decoded = JsFuture::from(ctx.decode_audio_data(&bytes.buffer())?).await?;
    let buffer: AudioBuffer = decoded.dyn_into()?;

    let source = ctx.create_buffer_source()?;
    source.set_buffer(Some(&buffer));
    source.connect_with_audio_node(&ctx.destination())?;
    source.start()?;
    Ok(())
}

impl CuePlayer for WebAudio {
    fn play(&self, clip: &AudioClip) {
        let Some(ctx) = self.context() else {
            web_sys::console::warn_1(&"Theme: AudioContext unavailable".into());
            return;
        };
        let clip = clip.clone();
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = decode_and_play(ctx, clip).await {
                web_sys::console::warn_1(&format!("Theme: cue playback failed: {:?}", e).into());
            }
        });
    }
}
