use super::scheduler::{Scheduler, TaskId};
use super::stage::{Page, Stage};
use crate::album::Slideshow;
use crate::audio::Music;
use crate::blessing::{Blink, BlessingText};
use crate::canvas::Caption;
use crate::color::{Rgb, BLACK, ROSE, WHITE};
use crate::config::{Config, Timing};
use crate::fireworks::FireworksField;
use crate::surface::Surface;
use crate::tree::HeartTree;
use fastrand::Rng;
use std::time::Duration;

/// Where the show has got to. Only ever moves forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    Idle,
    TreeGrowing,
    AlbumPlaying,
    FireworksActive,
    FireworksWithBlessing,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Task {
    RevealTree,
    StartAlbum,
    NextSlide,
    StartFireworks,
    Spawn,
    ShowBlessing,
    Blink,
}

/// Runs the greeting from the first key press to the final blessing.
///
/// Time is passed in explicitly as the offset from program start, both to
/// [`Director::poll`] (timers) and [`Director::frame`] (drawing). Every
/// timer lives in the director's scheduler so [`Director::stop`] can cancel
/// all pending work at once.
pub struct Director {
    phase: Phase,
    timing: Timing,
    stage: Stage,
    scheduler: Scheduler<Task>,
    field: FireworksField,
    tree: HeartTree,
    slideshow: Slideshow,
    blessing: BlessingText,
    music: Music,
    title: String,
    background: Rgb,
    bounds: (f32, f32),
    animating: bool,
    slide_timer: Option<TaskId>,
    spawn_timer: Option<TaskId>,
    blink_timer: Option<TaskId>,
}

impl Director {
    pub fn new(config: &Config, slideshow: Slideshow, music: Music, mut rng: Rng) -> Self {
        Self {
            phase: Phase::Idle,
            timing: config.timing.clone(),
            stage: Stage::new(),
            scheduler: Scheduler::new(),
            field: FireworksField::new(rng.fork()),
            tree: HeartTree::new(&mut rng),
            slideshow,
            blessing: BlessingText::new(config.display.blessing.clone(), config.timing.blink_count),
            music,
            title: config.display.title.clone(),
            background: BLACK,
            bounds: (0.0, 0.0),
            animating: false,
            slide_timer: None,
            spawn_timer: None,
            blink_timer: None,
        }
    }

    pub fn with_background(mut self, background: Rgb) -> Self {
        self.background = background;
        self.field = self.field.with_fade_color(background);
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn field(&self) -> &FireworksField {
        &self.field
    }

    pub fn slideshow(&self) -> &Slideshow {
        &self.slideshow
    }

    pub fn blessing(&self) -> &BlessingText {
        &self.blessing
    }

    pub fn music(&self) -> &Music {
        &self.music
    }

    /// Whether the fireworks frame animation is running.
    pub fn is_animating(&self) -> bool {
        self.animating
    }

    /// Whether the blessing is still in its opening blink cycle.
    pub fn is_blinking(&self) -> bool {
        self.blink_timer.is_some()
    }

    /// How many of `steps` elapsed fixed steps need a `frame` call. Only
    /// the fireworks carry physics between frames; the other pages draw
    /// the same picture for a given `now`.
    pub fn frames_for(&self, steps: u32) -> u32 {
        if self.animating { steps } else { steps.min(1) }
    }

    pub fn pending_timers(&self) -> usize {
        self.scheduler.len()
    }

    /// Logical size used for launches until the next frame reports one.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.bounds = (width, height);
    }

    /// The user's opening gesture. Returns false once the show is running.
    pub fn begin(&mut self, now: Duration) -> bool {
        if self.phase != Phase::Idle {
            return false;
        }

        log::info!("starting greeting sequence");
        self.stage.deactivate(Page::Start);
        // The gesture is what lets playback start at all
        self.music.play(now);
        self.phase = Phase::TreeGrowing;
        self.scheduler.once(now, self.timing.reveal_delay(), Task::RevealTree);
        true
    }

    pub fn toggle_music(&mut self, now: Duration) {
        self.music.toggle(now);
    }

    /// Runs every timer that is due at `now`. Each task sees the time it
    /// was scheduled for, so follow-up delays do not drift with the poll rate.
    pub fn poll(&mut self, now: Duration) {
        while let Some((id, at, task)) = self.scheduler.due(now) {
            self.run(id, task, at);
        }
    }

    fn run(&mut self, id: TaskId, task: Task, now: Duration) {
        match task {
            Task::RevealTree => {
                self.stage.activate(Page::Tree);
                self.tree.grow(now);
                self.scheduler.once(now, self.timing.tree_duration(), Task::StartAlbum);
            }
            Task::StartAlbum => self.start_album(now),
            Task::NextSlide => self.slideshow.next_slide(),
            Task::StartFireworks => self.start_fireworks(now),
            Task::Spawn => self.field.spawn(self.bounds.0, self.bounds.1),
            Task::ShowBlessing => self.show_blessing(now),
            Task::Blink => {
                if self.blessing.blink() == Blink::Settled {
                    self.scheduler.cancel(id);
                    self.blink_timer = None;
                }
            }
        }
    }

    fn start_album(&mut self, now: Duration) {
        log::info!("album playing, {} slides", self.slideshow.len());
        self.phase = Phase::AlbumPlaying;
        self.stage.deactivate(Page::Tree);
        self.stage.activate(Page::Album);

        if let Some(id) = self.slide_timer.take() {
            self.scheduler.cancel(id);
        }
        if self.slideshow.can_rotate() {
            let every = self.timing.slide_duration();
            self.slide_timer = Some(self.scheduler.every(now, every, Task::NextSlide));
        } else {
            log::info!("not enough photos to rotate");
        }

        self.scheduler.once(now, self.timing.album_duration(), Task::StartFireworks);
    }

    fn start_fireworks(&mut self, now: Duration) {
        log::info!("fireworks started");
        self.phase = Phase::FireworksActive;

        if let Some(id) = self.slide_timer.take() {
            self.scheduler.cancel(id);
        }
        self.stage.deactivate(Page::Album);
        self.stage.activate(Page::Fireworks);

        self.animating = true;
        self.field.set_active(true);
        self.field.spawn(self.bounds.0, self.bounds.1);
        self.set_cadence(now, self.timing.base_cadence());

        self.scheduler.once(now, self.timing.fireworks_duration(), Task::ShowBlessing);
    }

    fn show_blessing(&mut self, now: Duration) {
        log::info!("blessing shown, fireworks continue");
        self.phase = Phase::FireworksWithBlessing;
        self.blessing.show();
        self.field.show_blessing(now);
        self.set_cadence(now, self.timing.blessing_cadence());

        let every = self.timing.blink_interval();
        self.blink_timer = Some(self.scheduler.every(now, every, Task::Blink));
    }

    /// Replaces the launch timer; fireworks already in flight are kept.
    fn set_cadence(&mut self, now: Duration, every: Duration) {
        if let Some(id) = self.spawn_timer.take() {
            self.scheduler.cancel(id);
        }
        self.spawn_timer = Some(self.scheduler.every(now, every, Task::Spawn));
    }

    /// Draws one frame of whichever page is in front.
    pub fn frame(&mut self, surface: &mut dyn Surface, now: Duration) {
        let (width, height) = (surface.width(), surface.height());
        self.bounds = (width, height);

        match self.stage.front() {
            Some(Page::Fireworks) => {
                if self.animating {
                    self.field.tick(surface, now);
                }
            }
            Some(Page::Album) => {
                surface.fill_rect(0.0, 0.0, width, height, self.background, 1.0);
                self.slideshow.render(surface);
            }
            Some(Page::Tree) => {
                surface.fill_rect(0.0, 0.0, width, height, self.background, 1.0);
                self.tree.render(surface, now);
            }
            Some(Page::Start) => {
                surface.fill_rect(0.0, 0.0, width, height, self.background, 1.0);
                let beat = 1.0 + 0.08 * (now.as_secs_f32() * 4.0).sin();
                surface.fill_heart(width * 0.5, height * 0.45, 120.0 * beat, ROSE, 1.0);
            }
            None => surface.fill_rect(0.0, 0.0, width, height, self.background, 1.0),
        }
    }

    /// Text to lay over the current frame.
    pub fn captions(&self, now: Duration) -> Vec<Caption> {
        let mut captions = Vec::new();

        match self.stage.front() {
            Some(Page::Start) => captions.push(Caption::centered(self.title.clone(), 0.75, WHITE)),
            Some(Page::Album) => captions.extend(self.slideshow.caption()),
            Some(Page::Fireworks) => captions.extend(self.blessing.caption()),
            _ => {}
        }

        captions.push(self.music.indicator(now));
        captions
    }

    /// Cancels the animation and every pending timer. Safe to call twice.
    pub fn stop(&mut self) {
        if self.animating || !self.scheduler.is_empty() {
            log::info!("stopping, {} timers cancelled", self.scheduler.len());
        }
        self.scheduler.cancel_all();
        self.slide_timer = None;
        self.spawn_timer = None;
        self.blink_timer = None;
        self.animating = false;
        self.field.set_active(false);
        self.music.pause();
    }
}
