pub mod api;
pub mod core;
pub mod systems;
pub mod export;
pub mod extensions;

// Re-export key types at crate root for convenience
pub use api::config::EditorConfig;
pub use core::time::{Debounce, Throttle};
pub use export::tsv::{records_to_tsv, json_to_tsv};

#[cfg(feature = "pathfinding")]
pub use systems::pathfinding::{
    find_path, euclidean, Graph, NodeGraph, Pathfinder,
};

pub use extensions::{
    Animatable, PropertyTable,
    Easing, UnknownEasing, lerp, ease,
    luminance,
    TweenScheduler, Tween, TweenLoop, WeakTween,
};
