//! Batched rectangle measurement.
//!
//! The tracker periodically asks a [`RectSource`] for fresh rectangles of
//! every observed resource, in one batch, and replaces the engine's targets
//! with the visible ones. The source is the caller's window into layout:
//! an intersection observer, a widget tree, a test fixture.

use std::collections::HashMap;
use std::hash::Hash;

use parking_lot::Mutex;

use crate::geometry::Rect;

/// One measured resource.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement<K> {
    pub resource: K,
    pub rect: Rect,
    /// Whether the resource currently intersects the viewport.
    pub visible: bool,
}

/// Supplies rectangles for observed resources.
pub trait RectSource<K>: Send + Sync {
    /// Measure the given resources.
    ///
    /// Resources the source knows nothing about may be omitted.
    fn measure(&self, resources: &[K]) -> Vec<Measurement<K>>;
}

/// In-memory rectangle source.
///
/// Holds a rectangle and visibility flag per resource; useful for tests and
/// for hosts that already know their layout.
#[derive(Debug)]
pub struct StaticRectSource<K> {
    entries: Mutex<HashMap<K, (Rect, bool)>>,
}

impl<K> Default for StaticRectSource<K> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl<K: Hash + Eq + Clone> StaticRectSource<K> {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a visible rectangle for `resource`.
    pub fn set(&self, resource: K, rect: Rect) {
        self.entries.lock().insert(resource, (rect, true));
    }

    /// Mark `resource` as scrolled out of view, keeping its rectangle.
    pub fn hide(&self, resource: &K) {
        if let Some(entry) = self.entries.lock().get_mut(resource) {
            entry.1 = false;
        }
    }

    /// Forget `resource` entirely.
    pub fn remove(&self, resource: &K) {
        self.entries.lock().remove(resource);
    }
}

impl<K: Hash + Eq + Clone + Send + Sync> RectSource<K> for StaticRectSource<K> {
    fn measure(&self, resources: &[K]) -> Vec<Measurement<K>> {
        let entries = self.entries.lock();
        resources
            .iter()
            .filter_map(|resource| {
                entries.get(resource).map(|(rect, visible)| Measurement {
                    resource: resource.clone(),
                    rect: *rect,
                    visible: *visible,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_source_measures_known_resources() {
        let source = StaticRectSource::new();
        source.set(1u32, Rect::new(0.0, 0.0, 10.0, 10.0));
        source.set(2u32, Rect::new(20.0, 0.0, 30.0, 10.0));
        source.hide(&2);

        let measured = source.measure(&[1, 2, 3]);
        assert_eq!(measured.len(), 2);
        assert!(measured[0].visible);
        assert!(!measured[1].visible);
    }

    #[test]
    fn test_static_source_remove() {
        let source = StaticRectSource::new();
        source.set("a", Rect::default());
        source.remove(&"a");
        assert!(source.measure(&["a"]).is_empty());
    }
}
