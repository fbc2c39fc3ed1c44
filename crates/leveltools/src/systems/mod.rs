#[cfg(feature = "pathfinding")]
pub mod pathfinding;
