use crate::canvas::Caption;
use crate::color::{Rgb, GOLD, ROSE};

/// Glow colour applied to the blessing text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Glow {
    Rose,
    Gold,
}

impl Glow {
    pub fn color(self) -> Rgb {
        match self {
            Glow::Rose => ROSE,
            Glow::Gold => GOLD,
        }
    }
}

/// Outcome of one blink step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Blink {
    Continue,
    Settled,
}

/// The message shown over the fireworks, with its opening blink cycle.
pub struct BlessingText {
    text: String,
    visible: bool,
    glow: Glow,
    blinks: u32,
    max_blinks: u32,
}

impl BlessingText {
    pub fn new(text: impl Into<String>, max_blinks: u32) -> Self {
        Self {
            text: text.into(),
            visible: false,
            glow: Glow::Rose,
            blinks: 0,
            max_blinks,
        }
    }

    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn glow(&self) -> Glow {
        self.glow
    }

    /// Alternates gold and rose `max_blinks` times, then holds rose.
    pub fn blink(&mut self) -> Blink {
        if self.blinks >= self.max_blinks {
            self.glow = Glow::Rose;
            return Blink::Settled;
        }

        self.glow = if self.blinks % 2 == 0 { Glow::Gold } else { Glow::Rose };
        self.blinks += 1;
        Blink::Continue
    }

    pub fn caption(&self) -> Option<Caption> {
        self.visible
            .then(|| Caption::centered(self.text.clone(), 0.5, self.glow.color()))
    }
}
