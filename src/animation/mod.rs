mod animatable;
mod driver;
mod spring;

pub use animatable::Animatable;
pub use driver::{
    AnimationDriver, AnimationEvent, AnimationHandle, SpringAnimation, SpringAnimator,
};
pub use spring::{SpringConfig, SpringState};

/// Initial spring velocity for moving from `current_y` to `target_y` while the
/// finger moves at `velocity_y` units per second.
///
/// The result is expressed in fractions of the remaining travel per second.
/// A zero travel, or any non-finite ratio, yields zero.
pub fn project_velocity(velocity_y: f32, current_y: f32, target_y: f32) -> f32 {
    let delta = target_y - current_y;
    if delta == 0.0 {
        return 0.0;
    }
    let ratio = velocity_y / delta;
    if ratio.is_finite() {
        ratio
    } else {
        0.0
    }
}
