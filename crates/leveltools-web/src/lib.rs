pub mod js_target;
pub mod js_tween;
pub mod runner;
pub mod timing;

use std::cell::RefCell;

use wasm_bindgen::prelude::*;

use leveltools::{EditorConfig, Easing, TweenScheduler};

pub use js_target::JsTarget;
pub use js_tween::JsTween;
pub use runner::FrameLoop;
pub use timing::{JsDebounce, JsThrottle};

thread_local! {
    static RUNTIME: RefCell<Option<FrameLoop>> = const { RefCell::new(None) };
}

/// Handle to the page-wide scheduler, creating it with default settings if
/// `init` has not run. The borrow is released before the caller uses it, so
/// tween callbacks may create tweens freely.
pub fn default_scheduler() -> TweenScheduler {
    RUNTIME.with(|cell| {
        cell.borrow_mut()
            .get_or_insert_with(|| FrameLoop::attach(TweenScheduler::new()))
            .scheduler()
            .clone()
    })
}

/// Install the panic hook and console logger, then create the default
/// scheduler. `config_json` is an `EditorConfig` document; omitted fields
/// keep their defaults. Calling again keeps the existing scheduler.
#[wasm_bindgen]
pub fn init(config_json: Option<String>) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let config = match config_json {
        Some(json) => EditorConfig::from_json(&json).map_err(|err| JsValue::from_str(&err.to_string()))?,
        None => EditorConfig::default(),
    };
    let _ = console_log::init_with_level(config.log_level);

    RUNTIME.with(|cell| {
        let mut runtime = cell.borrow_mut();
        if runtime.is_some() {
            log::warn!("leveltools: already initialized; keeping the running scheduler");
        } else {
            *runtime = Some(FrameLoop::attach(TweenScheduler::with_config(&config)));
            log::info!("leveltools: initialized (default tween {} ms)", config.default_tween_ms);
        }
    });
    Ok(())
}

/// Evaluate the named curve at `k`, e.g. `ease("Back.Out", 0.5)`.
#[wasm_bindgen]
pub fn ease(name: &str, k: f64) -> Result<f64, JsValue> {
    let easing: Easing = name.parse().map_err(|err: leveltools::UnknownEasing| JsValue::from_str(&err.to_string()))?;
    Ok(easing.apply(k))
}

/// Perceived brightness of a packed 0xRRGGBB color, 0..100.
#[wasm_bindgen]
pub fn luminance(color: f64) -> f64 {
    leveltools::luminance(color)
}

/// Convert a JSON array of flat records into TSV text.
#[wasm_bindgen(js_name = arrayToTsv)]
pub fn array_to_tsv(json: &str) -> Result<String, JsValue> {
    leveltools::json_to_tsv(json).map_err(|err| JsValue::from_str(&err.to_string()))
}

/// Tweens currently registered with the default scheduler.
#[wasm_bindgen(js_name = activeTweenCount)]
pub fn active_tween_count() -> u32 {
    default_scheduler().len() as u32
}

/// Shortest path over an adjacency list (`adjacency[i]` lists the nodes
/// reachable from `i`). `cost(node)` prices entering a node (default 1) and
/// `heuristic(node, end)` estimates the remaining cost (default 0). Returns
/// the node indices from `start` to `end`, or `null` when `end` is
/// unreachable.
#[cfg(feature = "pathfinding")]
#[wasm_bindgen(js_name = findPath)]
pub fn find_path(
    adjacency: js_sys::Array,
    start: usize,
    end: usize,
    cost: Option<js_sys::Function>,
    heuristic: Option<js_sys::Function>,
) -> JsValue {
    let graph = adjacency_from_js(&adjacency);
    if start >= graph.len() || end >= graph.len() {
        log::warn!("findPath: node out of range ({} -> {}, {} nodes)", start, end, graph.len());
        return JsValue::NULL;
    }

    let mut finder = leveltools::Pathfinder::new(&graph);
    if let Some(cost) = cost {
        finder = finder.cost(move |node| js_cost(&cost, node));
    }
    if let Some(heuristic) = heuristic {
        finder = finder.heuristic(move |node, goal| js_estimate(&heuristic, node, goal));
    }
    path_to_js(finder.find_path(start, end))
}

/// `findPath` over positioned nodes, guided by straight-line distance.
/// `positions` holds `x, y` pairs, one per node.
#[cfg(feature = "pathfinding")]
#[wasm_bindgen(js_name = findSpatialPath)]
pub fn find_spatial_path(
    adjacency: js_sys::Array,
    positions: &[f32],
    start: usize,
    end: usize,
    cost: Option<js_sys::Function>,
) -> JsValue {
    let rows = adjacency_from_js(&adjacency);
    let Some(graph) = spatial_graph(&rows, positions) else {
        log::warn!("findSpatialPath: {} coordinates for {} nodes", positions.len(), rows.len());
        return JsValue::NULL;
    };
    if start >= graph.len() || end >= graph.len() {
        log::warn!("findSpatialPath: node out of range ({} -> {}, {} nodes)", start, end, graph.len());
        return JsValue::NULL;
    }

    let mut finder = leveltools::Pathfinder::new(&graph).heuristic(graph.spatial_heuristic());
    if let Some(cost) = cost {
        finder = finder.cost(move |node| js_cost(&cost, node));
    }
    path_to_js(finder.find_path(start, end))
}

/// Build a positioned graph from adjacency rows and `x, y` pairs. `None` when
/// the coordinate count does not match the node count.
#[cfg(feature = "pathfinding")]
fn spatial_graph(rows: &[Vec<usize>], positions: &[f32]) -> Option<leveltools::NodeGraph> {
    if positions.len() != rows.len() * 2 {
        return None;
    }
    let mut graph = leveltools::NodeGraph::new();
    for xy in positions.chunks_exact(2) {
        graph.add_node(glam::Vec2::new(xy[0], xy[1]));
    }
    for (from, row) in rows.iter().enumerate() {
        for &to in row {
            graph.connect_one_way(from, to);
        }
    }
    Some(graph)
}

/// Parse `[[1], [0, 2], ...]`. Ids that are not non-negative integers are
/// dropped with a warning.
#[cfg(feature = "pathfinding")]
fn adjacency_from_js(adjacency: &js_sys::Array) -> Vec<Vec<usize>> {
    adjacency
        .iter()
        .enumerate()
        .map(|(from, row)| {
            js_sys::Array::from(&row)
                .iter()
                .filter_map(|node| {
                    let id = node.as_f64().and_then(node_index);
                    if id.is_none() {
                        log::warn!("findPath: ignoring edge {} -> {:?}", from, node);
                    }
                    id
                })
                .collect()
        })
        .collect()
}

/// A JS number as a node index: finite, non-negative and integral.
#[cfg(feature = "pathfinding")]
fn node_index(id: f64) -> Option<usize> {
    (id >= 0.0 && id.fract() == 0.0 && id <= usize::MAX as f64).then_some(id as usize)
}

#[cfg(feature = "pathfinding")]
fn js_cost(cost: &js_sys::Function, node: usize) -> f32 {
    match cost.call1(&JsValue::NULL, &JsValue::from_f64(node as f64)) {
        Ok(value) => value.as_f64().unwrap_or(1.0) as f32,
        Err(err) => {
            log::error!("findPath: cost function threw: {:?}", err);
            1.0
        }
    }
}

#[cfg(feature = "pathfinding")]
fn js_estimate(heuristic: &js_sys::Function, node: usize, goal: usize) -> f32 {
    let (node, goal) = (JsValue::from_f64(node as f64), JsValue::from_f64(goal as f64));
    match heuristic.call2(&JsValue::NULL, &node, &goal) {
        Ok(value) => value.as_f64().unwrap_or(0.0) as f32,
        Err(err) => {
            log::error!("findPath: heuristic threw: {:?}", err);
            0.0
        }
    }
}

#[cfg(feature = "pathfinding")]
fn path_to_js(path: Option<Vec<usize>>) -> JsValue {
    match path {
        Some(path) => path
            .into_iter()
            .map(|node| JsValue::from_f64(node as f64))
            .collect::<js_sys::Array>()
            .into(),
        None => JsValue::NULL,
    }
}
