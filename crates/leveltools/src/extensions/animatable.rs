// extensions/animatable.rs
//
// Key → numeric field access for tween targets.
//
// Usage:
//   static FIELDS: PropertyTable<Marker> = PropertyTable::new(&[
//       ("x", |m| m.x, |m, v| m.x = v),
//       ("alpha", |m| m.alpha, |m, v| m.alpha = v),
//   ]);
//
//   impl Animatable for Marker {
//       fn property(&self, key: &str) -> Option<f64> { FIELDS.get(self, key) }
//       fn set_property(&mut self, key: &str, value: f64) { FIELDS.set(self, key, value); }
//   }

use std::collections::HashMap;

/// Anything whose numeric fields a tween can read and write by name.
pub trait Animatable {
    /// Current value of `key`, or `None` if the target has no such field.
    fn property(&self, key: &str) -> Option<f64>;

    /// Overwrite `key`. Unknown keys are ignored.
    fn set_property(&mut self, key: &str, value: f64);
}

/// Reads one field.
pub type Getter<T> = fn(&T) -> f64;
/// Writes one field.
pub type Setter<T> = fn(&mut T, f64);

/// Explicit registration table mapping field names to accessor pairs.
pub struct PropertyTable<T: 'static> {
    fields: &'static [(&'static str, Getter<T>, Setter<T>)],
}

impl<T: 'static> PropertyTable<T> {
    pub const fn new(fields: &'static [(&'static str, Getter<T>, Setter<T>)]) -> Self {
        Self { fields }
    }

    pub fn get(&self, target: &T, key: &str) -> Option<f64> {
        self.fields
            .iter()
            .find(|(name, _, _)| *name == key)
            .map(|(_, get, _)| get(target))
    }

    /// Returns false when `key` is not registered.
    pub fn set(&self, target: &mut T, key: &str, value: f64) -> bool {
        match self.fields.iter().find(|(name, _, _)| *name == key) {
            Some((_, _, set)) => {
                set(target, value);
                true
            }
            None => false,
        }
    }

    /// Registered field names, in registration order.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|(name, _, _)| *name)
    }
}

/// A plain property bag: every key is animatable, missing keys are created on write.
impl Animatable for HashMap<String, f64> {
    fn property(&self, key: &str) -> Option<f64> {
        self.get(key).copied()
    }

    fn set_property(&mut self, key: &str, value: f64) {
        self.insert(key.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Marker {
        x: f64,
        alpha: f64,
    }

    static FIELDS: PropertyTable<Marker> = PropertyTable::new(&[
        ("x", |m| m.x, |m, v| m.x = v),
        ("alpha", |m| m.alpha, |m, v| m.alpha = v),
    ]);

    impl Animatable for Marker {
        fn property(&self, key: &str) -> Option<f64> {
            FIELDS.get(self, key)
        }

        fn set_property(&mut self, key: &str, value: f64) {
            FIELDS.set(self, key, value);
        }
    }

    #[test]
    fn table_routes_by_key() {
        let mut m = Marker { x: 1.0, alpha: 0.5 };
        assert_eq!(m.property("x"), Some(1.0));
        m.set_property("alpha", 0.25);
        assert_eq!(m.alpha, 0.25);
        assert_eq!(m.property("missing"), None);
        assert!(!FIELDS.set(&mut m, "missing", 3.0));
        assert_eq!(FIELDS.keys().collect::<Vec<_>>(), vec!["x", "alpha"]);
    }

    #[test]
    fn property_bag_inserts_on_write() {
        let mut bag: HashMap<String, f64> = HashMap::new();
        assert_eq!(bag.property("y"), None);
        bag.set_property("y", 4.0);
        assert_eq!(bag.property("y"), Some(4.0));
    }
}
