//! Sound effects.
//!
//! The terminal has one voice, the bell, so playback rings it whenever the
//! effect is audible at the configured volume.

use crate::config::Settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sound {
    /// Ball hits a paddle
    Hit,
    /// Ball bounces off the top or bottom wall
    Collide,
    /// Snake eats the food
    Eat,
}

impl Sound {
    /// Per-effect level before the global effects volume is applied.
    pub fn volume(&self) -> f32 {
        match self {
            Sound::Hit => 0.5,
            Sound::Collide => 0.2,
            Sound::Eat => 0.5,
        }
    }
}

pub struct Mixer {
    sfx_volume: f32,
    muted: bool,
}

impl Mixer {
    pub fn new(settings: &Settings) -> Self {
        Mixer { sfx_volume: settings.sfx_volume, muted: settings.muted }
    }

    pub fn effective_volume(&self, sound: Sound) -> f32 {
        if self.muted {
            0.0
        } else {
            sound.volume() * self.sfx_volume
        }
    }

    /// Returns whether the bell should ring for this batch of effects.
    pub fn mix(&self, sounds: &[Sound]) -> bool {
        let mut audible = false;

        for &sound in sounds {
            let volume = self.effective_volume(sound);
            log::debug!("sound {:?} at volume {:.2}", sound, volume);
            audible |= volume > 0.0;
        }

        audible
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_independent_levels() {
        let mixer = Mixer::new(&Settings { sfx_volume: 0.5, ..Settings::default() });

        assert_eq!(mixer.effective_volume(Sound::Hit), 0.25);
        assert_eq!(mixer.effective_volume(Sound::Collide), 0.1);
        assert_eq!(mixer.effective_volume(Sound::Eat), 0.25);
    }

    #[test]
    fn test_mute_and_empty_batches_are_silent() {
        let muted = Mixer::new(&Settings { muted: true, ..Settings::default() });
        assert!(!muted.mix(&[Sound::Hit, Sound::Eat]));

        let mixer = Mixer::new(&Settings::default());
        assert!(!mixer.mix(&[]));
        assert!(mixer.mix(&[Sound::Collide]));
    }
}
