//! Switch-on / switch-off audio cues.
//!
//! Both clips load independently in the background. Until a clip arrives the
//! matching switch direction is silent.

use std::fmt;
use std::rc::Rc;

use futures::future::LocalBoxFuture;

use super::{ActualTheme, ThemeError};

/// Which cue to play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cue {
    /// Played when a switch lands on the light theme
    SwitchOn,
    /// Played when a switch lands on the dark theme
    SwitchOff,
}

impl Cue {
    pub const ALL: [Cue; 2] = [Cue::SwitchOn, Cue::SwitchOff];

    pub fn name(&self) -> &'static str {
        match self {
            Cue::SwitchOn => "switch-on",
            Cue::SwitchOff => "switch-off",
        }
    }

    /// Default path the clip is served from.
    pub fn default_path(&self) -> &'static str {
        match self {
            Cue::SwitchOn => "/sounds/switch-on.mp3",
            Cue::SwitchOff => "/sounds/switch-off.mp3",
        }
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Encoded clip bytes, shared cheaply between the cue set and the player.
#[derive(Clone, PartialEq, Eq)]
pub struct AudioClip(Rc<[u8]>);

impl AudioClip {
    pub fn new(bytes: impl Into<Rc<[u8]>>) -> Self {
        Self(bytes.into())
    }

    pub fn bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for AudioClip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AudioClip").field(&self.0.len()).finish()
    }
}

/// Fetches an encoded clip.
pub trait CueLoader {
    fn load(&self, cue: Cue) -> LocalBoxFuture<'static, Result<AudioClip, ThemeError>>;
}

/// Decodes and plays a clip. Playback is fire-and-forget.
pub trait CuePlayer {
    fn play(&self, clip: &AudioClip);
}

/// The two lazily loaded clips.
#[derive(Clone, Debug, Default)]
pub struct AudioCueSet {
    on_light: Option<AudioClip>,
    on_dark: Option<AudioClip>,
}

impl AudioCueSet {
    pub fn get(&self, cue: Cue) -> Option<&AudioClip> {
        match cue {
            Cue::SwitchOn => self.on_light.as_ref(),
            Cue::SwitchOff => self.on_dark.as_ref(),
        }
    }

    /// Clip to play after a switch that resolved to `actual`.
    pub fn for_theme(&self, actual: ActualTheme) -> Option<&AudioClip> {
        self.get(actual.cue())
    }

    /// Store a loaded clip. A slot is filled at most once; later loads are
    /// ignored.
    pub fn insert(&mut self, cue: Cue, clip: AudioClip) -> bool {
        let slot = match cue {
            Cue::SwitchOn => &mut self.on_light,
            Cue::SwitchOff => &mut self.on_dark,
        };
        if slot.is_some() {
            return false;
        }
        *slot = Some(clip);
        true
    }

    pub fn is_loaded(&self, cue: Cue) -> bool {
        self.get(cue).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_fill_once() {
        let mut cues = AudioCueSet::default();
        assert!(!cues.is_loaded(Cue::SwitchOn));

        assert!(cues.insert(Cue::SwitchOn, AudioClip::new(vec![1u8, 2, 3])));
        assert!(!cues.insert(Cue::SwitchOn, AudioClip::new(vec![9u8])));

        assert_eq!(cues.get(Cue::SwitchOn).map(AudioClip::bytes), Some(&[1u8, 2, 3][..]));
        assert!(!cues.is_loaded(Cue::SwitchOff));
    }

    #[test]
    fn for_theme_maps_direction() {
        let mut cues = AudioCueSet::default();
        cues.insert(Cue::SwitchOff, AudioClip::new(vec![7u8]));

        assert!(cues.for_theme(ActualTheme::Light).is_none());
        assert_eq!(
            cues.for_theme(ActualTheme::Dark).map(AudioClip::bytes),
            Some(&[7u8][..])
        );
    }
}
