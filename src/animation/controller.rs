use std::time::Duration;

use log::debug;

use super::{AnimationName, CharacterState, animation_for_message};

/// Delay between acknowledging a message and starting to think
pub const THINKING_DELAY: Duration = Duration::from_millis(500);
/// How long a reply's emotion plays before talking resumes
pub const EMOTION_DURATION: Duration = Duration::from_millis(2000);
/// How long after a reply arrives the character goes back to idle
pub const RETURN_TO_IDLE_AFTER: Duration = Duration::from_millis(4000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transition {
    EnterState(CharacterState),
    ShowAnimation(AnimationName),
    /// End of a timed animation
    FinishTimed,
    ReturnToIdle,
}

#[derive(Debug, Clone, Copy)]
struct Scheduled {
    at: Duration,
    transition: Transition,
}

/// Conversation-driven animation state.
///
/// Time is passed in explicitly; call [`CharacterController::update`] with
/// the current clock to fire scheduled transitions.
#[derive(Debug, Clone, Default)]
pub struct CharacterController {
    animation: AnimationName,
    state: CharacterState,
    /// A timed animation is playing and blocks [`CharacterController::play`]
    animating: bool,
    pending: Vec<Scheduled>,
}

impl CharacterController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn animation(&self) -> AnimationName {
        self.animation
    }

    pub fn state(&self) -> CharacterState {
        self.state
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    pub fn can_change_animation(&self) -> bool {
        !self.animating
    }

    /// Enter a state and show its default animation
    pub fn set_state(&mut self, state: CharacterState) {
        self.state = state;
        self.animation = state.default_animation();
    }

    pub fn return_to_idle(&mut self) {
        self.animation = AnimationName::Idle;
        self.state = CharacterState::Idle;
    }

    /// Show an animation, optionally for a limited time before returning
    /// to idle. Ignored while another timed animation is playing.
    pub fn play(&mut self, now: Duration, animation: AnimationName, duration: Option<Duration>) {
        if !self.can_change_animation() {
            debug!("Ignoring {} while a timed animation plays", animation);
            return;
        }

        self.animation = animation;
        if let Some(duration) = duration {
            self.animating = true;
            self.schedule(now + duration, Transition::FinishTimed);
        }
    }

    /// The user sent a message: listen, then think
    pub fn message_sent(&mut self, now: Duration) {
        self.set_state(CharacterState::Listening);
        self.schedule(
            now + THINKING_DELAY,
            Transition::EnterState(CharacterState::Thinking),
        );
    }

    pub fn response_started(&mut self) {
        self.set_state(CharacterState::Thinking);
    }

    /// A reply arrived: speak, flash its emotion, then settle back to idle
    pub fn response_received(&mut self, now: Duration, content: &str) {
        let animation = animation_for_message(content);
        self.set_state(CharacterState::Speaking);

        if animation != AnimationName::Talking {
            self.play(now, animation, Some(EMOTION_DURATION));
            self.schedule(
                now + EMOTION_DURATION,
                Transition::ShowAnimation(AnimationName::Talking),
            );
        }

        self.schedule(now + RETURN_TO_IDLE_AFTER, Transition::ReturnToIdle);
    }

    /// Fire every transition due at or before `now`, in schedule order
    pub fn update(&mut self, now: Duration) {
        let (due, pending): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|s| s.at <= now);
        self.pending = pending;

        for scheduled in due {
            match scheduled.transition {
                Transition::EnterState(state) => self.set_state(state),
                Transition::ShowAnimation(animation) => self.animation = animation,
                Transition::FinishTimed => {
                    self.animating = false;
                    self.return_to_idle();
                }
                Transition::ReturnToIdle => self.return_to_idle(),
            }
        }
    }

    /// Drop all scheduled transitions
    pub fn cancel_pending(&mut self) {
        self.pending.clear();
        self.animating = false;
    }

    fn schedule(&mut self, at: Duration, transition: Transition) {
        // Stable insert keeps same-time transitions in call order
        let index = self.pending.partition_point(|s| s.at <= at);
        self.pending.insert(index, Scheduled { at, transition });
    }
}
