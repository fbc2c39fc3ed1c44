use js_sys::{Object, Reflect};
use wasm_bindgen::JsValue;

use leveltools::Animatable;

/// A plain JS object used as a tween target. Fields are read and written by
/// name through `Reflect`, so display objects from any framework work.
#[derive(Clone)]
pub struct JsTarget(pub Object);

impl Animatable for JsTarget {
    fn property(&self, key: &str) -> Option<f64> {
        Reflect::get(&self.0, &JsValue::from_str(key))
            .ok()
            .and_then(|value| value.as_f64())
    }

    fn set_property(&mut self, key: &str, value: f64) {
        if let Err(err) = Reflect::set(&self.0, &JsValue::from_str(key), &JsValue::from_f64(value)) {
            log::warn!("could not set `{}` on tween target: {:?}", key, err);
        }
    }
}

/// Numeric own properties of `props`, in insertion order. Non-numeric values
/// are skipped with a warning.
pub fn numeric_entries(props: &Object) -> Vec<(String, f64)> {
    Object::entries(props)
        .iter()
        .filter_map(|entry| {
            let pair = js_sys::Array::from(&entry);
            let key = pair.get(0).as_string()?;
            match pair.get(1).as_f64() {
                Some(value) => Some((key, value)),
                None => {
                    log::warn!("tween property `{}` is not a number; skipped", key);
                    None
                }
            }
        })
        .collect()
}
