use std::time::Duration;

/// What happens after the last frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopMode {
    #[default]
    Loop,
    /// Hold the last frame
    Once,
}

/// Steps through a frame sequence at a fixed rate
#[derive(Debug, Clone)]
pub struct FramePlayer {
    frames: Vec<String>,
    fps: f32,
    mode: LoopMode,
    elapsed: Duration,
}

impl FramePlayer {
    pub fn new(frames: impl Into<Vec<String>>, fps: f32, mode: LoopMode) -> Self {
        Self {
            frames: frames.into(),
            fps,
            mode,
            elapsed: Duration::ZERO,
        }
    }

    pub fn frames(&self) -> &[String] {
        &self.frames
    }

    pub fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }

    /// Move the clock forward and return the frame to draw
    pub fn advance(&mut self, dt: Duration) -> Option<&str> {
        self.elapsed = self.elapsed.saturating_add(dt);
        self.current()
    }

    /// Frame for the current clock; `None` when there are no frames
    pub fn current(&self) -> Option<&str> {
        let last = self.frames.len().checked_sub(1)?;
        let step = self.step();
        let index = match self.mode {
            LoopMode::Loop => step % self.frames.len(),
            LoopMode::Once => step.min(last),
        };
        self.frames.get(index).map(String::as_str)
    }

    /// True once a non-looping player has reached its last frame
    pub fn is_finished(&self) -> bool {
        match self.mode {
            LoopMode::Loop => false,
            LoopMode::Once => match self.frames.len().checked_sub(1) {
                Some(last) => self.step() >= last,
                None => true,
            },
        }
    }

    /// Whole frames elapsed; a bad frame rate freezes on the first frame
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "value is floored, non-negative and clamped"
    )]
    fn step(&self) -> usize {
        if !self.fps.is_finite() || self.fps <= 0.0 {
            return 0;
        }
        let frames = (self.elapsed.as_secs_f64() * f64::from(self.fps)).floor();
        frames.min(usize::MAX as f64) as usize
    }
}
