// extensions/mod.rs
//
// Animation extensions for the editor.
// Decoupled from any renderer: targets only implement `Animatable`.

pub mod animatable;
pub mod color;
pub mod easing;
pub mod scheduler;
pub mod tween;

pub use animatable::{Animatable, PropertyTable};
pub use color::{channels, channel_delta, from_channels, lerp_color, luminance};
pub use easing::{Easing, UnknownEasing, lerp, ease};
pub use scheduler::TweenScheduler;
pub use tween::{Tween, TweenLoop, WeakTween, DEFAULT_TOTAL_TIME};
