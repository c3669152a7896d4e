use crate::canvas::Caption;
use crate::color::{Rgb, ROSE};
use crate::error::AudioError;
use std::path::PathBuf;
use std::time::Duration;

const HINT_DURATION: Duration = Duration::from_secs(3);
const HINT_BEAT_MS: u128 = 500;
const INDICATOR_COLOR: Rgb = Rgb(200, 200, 200);

/// Something that can play and pause one background track.
pub trait AudioPlayer {
    /// Starts or resumes playback. May be refused.
    fn play(&mut self) -> Result<(), AudioError>;
    fn pause(&mut self);
    fn set_volume(&mut self, _volume: f32) {}
}

/// Refuses every play request.
pub struct SilentPlayer {
    track: Option<PathBuf>,
}

impl SilentPlayer {
    pub fn new(track: Option<PathBuf>) -> Self {
        Self { track }
    }
}

impl AudioPlayer for SilentPlayer {
    fn play(&mut self) -> Result<(), AudioError> {
        match self.track {
            None => Err(AudioError::NoTrack),
            Some(_) => Err(AudioError::Unsupported),
        }
    }

    fn pause(&mut self) {}
}

#[cfg(feature = "audio")]
pub use self::rodio_player::RodioPlayer;

#[cfg(feature = "audio")]
mod rodio_player {
    use super::AudioPlayer;
    use crate::error::AudioError;
    use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
    use std::fs::File;
    use std::io::BufReader;
    use std::path::PathBuf;

    /// Loops one track on the default output device.
    pub struct RodioPlayer {
        track: PathBuf,
        volume: f32,
        // The stream must outlive the sink
        output: Option<(OutputStream, OutputStreamHandle)>,
        sink: Option<Sink>,
    }

    impl RodioPlayer {
        pub fn new(track: PathBuf) -> Self {
            Self { track, volume: 1.0, output: None, sink: None }
        }

        fn open(&mut self) -> Result<Sink, AudioError> {
            if self.output.is_none() {
                let output = OutputStream::try_default()
                    .map_err(|e| AudioError::Output(e.to_string()))?;
                self.output = Some(output);
            }
            let Some((_, handle)) = &self.output else {
                return Err(AudioError::Output("no output stream".into()));
            };

            let file = File::open(&self.track).map_err(|source| AudioError::Open {
                path: self.track.clone(),
                source,
            })?;
            let source = Decoder::new_looped(BufReader::new(file))
                .map_err(|e| AudioError::Decode(e.to_string()))?;
            let sink = Sink::try_new(handle).map_err(|e| AudioError::Output(e.to_string()))?;
            sink.set_volume(self.volume);
            sink.append(source);
            Ok(sink)
        }
    }

    impl AudioPlayer for RodioPlayer {
        fn play(&mut self) -> Result<(), AudioError> {
            if let Some(sink) = &self.sink {
                sink.play();
                return Ok(());
            }
            let sink = self.open()?;
            self.sink = Some(sink);
            Ok(())
        }

        fn pause(&mut self) {
            if let Some(sink) = &self.sink {
                sink.pause();
            }
        }

        fn set_volume(&mut self, volume: f32) {
            self.volume = volume;
            if let Some(sink) = &self.sink {
                sink.set_volume(volume);
            }
        }
    }
}

/// Picks the best player this build supports for `track`.
pub fn default_player(track: Option<PathBuf>) -> Box<dyn AudioPlayer> {
    match track {
        #[cfg(feature = "audio")]
        Some(track) => Box::new(RodioPlayer::new(track)),
        track => Box::new(SilentPlayer::new(track)),
    }
}

/// Background music toggle with its on-screen indicator.
pub struct Music {
    player: Box<dyn AudioPlayer>,
    playing: bool,
    hint_until: Option<Duration>,
}

impl Music {
    pub fn new(mut player: Box<dyn AudioPlayer>, volume: f32) -> Self {
        player.set_volume(volume);
        Self { player, playing: false, hint_until: None }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Best effort. A refusal leaves the state untouched and flashes the
    /// indicator for a few seconds.
    pub fn play(&mut self, now: Duration) {
        if self.playing {
            return;
        }

        match self.player.play() {
            Ok(()) => {
                self.playing = true;
                log::info!("background music started");
            }
            Err(err) => {
                log::info!("background music failed to play: {err}");
                self.hint_until = Some(now + HINT_DURATION);
            }
        }
    }

    pub fn pause(&mut self) {
        if !self.playing {
            return;
        }
        self.player.pause();
        self.playing = false;
        log::info!("background music paused");
    }

    pub fn toggle(&mut self, now: Duration) {
        if self.playing {
            self.pause();
        } else {
            self.play(now);
        }
    }

    pub fn is_hinting(&self, now: Duration) -> bool {
        self.hint_until.is_some_and(|until| now < until)
    }

    pub fn indicator(&self, now: Duration) -> Caption {
        let text = if self.playing { "♪ on  [m]" } else { "♪ off [m]" };

        let color = match self.hint_until {
            Some(until) if now < until => {
                let beat = (until - now).as_millis() / HINT_BEAT_MS;
                if beat % 2 == 0 { ROSE } else { INDICATOR_COLOR }
            }
            _ => INDICATOR_COLOR,
        };

        Caption::top_right(text, color)
    }
}
