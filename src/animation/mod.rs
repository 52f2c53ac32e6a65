mod controller;
mod mood;
mod player;

pub use controller::{
    CharacterController, EMOTION_DURATION, RETURN_TO_IDLE_AFTER, THINKING_DELAY,
};
pub use mood::{AnimationName, CharacterState, animation_for_message, resolve_animation};
pub use player::{FramePlayer, LoopMode};
