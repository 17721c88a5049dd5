//! Shared canvas storage with change notification.
//!
//! Provides a thread-safe [`CanvasStore`] handle that is shared between the
//! script worker that draws and whatever reads the canvas to paint it.

use std::sync::{Arc, RwLock};

use crate::observer::{Observers, SubscriptionId};
use crate::{CanvasChange, CanvasShadow, CanvasShape, CanvasState, CanvasTransform};

#[derive(Debug, Default)]
struct Inner {
    state: RwLock<CanvasState>,
    observers: Observers<CanvasChange>,
}

/// Thread-safe, observable canvas state.
///
/// Cloning the handle shares the same canvas. Every mutation takes the write
/// lock, releases it, and then notifies observers synchronously on the
/// calling thread.
///
/// # Example
///
/// ```
/// use canvas_core::{CanvasShape, CanvasStore, DEFAULT_COLOR};
///
/// let store = CanvasStore::new();
/// store.add_shape(CanvasShape::Circle {
///     x: 50.0,
///     y: 50.0,
///     radius: 10.0,
///     color: DEFAULT_COLOR.to_string(),
/// });
///
/// assert_eq!(store.shape_count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CanvasStore {
    inner: Arc<Inner>,
}

impl CanvasStore {
    /// Create a store holding a default 600x400 canvas.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store from an existing state.
    #[must_use]
    pub fn with_state(state: CanvasState) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: RwLock::new(state),
                observers: Observers::new(),
            }),
        }
    }

    /// Register a change observer.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&CanvasChange) + Send + Sync + 'static,
    {
        self.inner.observers.subscribe(callback)
    }

    /// Remove a change observer.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.observers.unsubscribe(id)
    }

    /// Append a shape.
    pub fn add_shape(&self, shape: CanvasShape) {
        let kind = shape.kind();
        let index = self.mutate(|state| state.add_shape(shape));
        tracing::trace!("Shape added: {kind} at index {index}");
        self.inner.observers.notify(&CanvasChange::ShapeAdded { index });
    }

    /// Remove all shapes. Transforms and shadow are kept.
    pub fn clear(&self) {
        self.mutate(CanvasState::clear);
        tracing::trace!("Shapes cleared");
        self.inner.observers.notify(&CanvasChange::ShapesCleared);
    }

    /// Replace the canvas dimensions. No validation is performed.
    pub fn set_size(&self, width: f64, height: f64) {
        self.mutate(|state| state.set_size(width, height));
        tracing::trace!("Canvas resized to {width}x{height}");
        self.inner
            .observers
            .notify(&CanvasChange::Resized { width, height });
    }

    /// Set or replace the shadow.
    pub fn set_shadow(&self, shadow: CanvasShadow) {
        self.mutate(|state| state.set_shadow(shadow));
        self.inner.observers.notify(&CanvasChange::ShadowSet);
    }

    /// Remove the shadow.
    pub fn clear_shadow(&self) {
        self.mutate(CanvasState::clear_shadow);
        self.inner.observers.notify(&CanvasChange::ShadowCleared);
    }

    /// Append a transform.
    pub fn add_transform(&self, transform: CanvasTransform) {
        self.mutate(|state| state.add_transform(transform));
        tracing::trace!("Transform added: {transform:?}");
        self.inner.observers.notify(&CanvasChange::TransformAdded);
    }

    /// Remove all transforms. Shapes and shadow are kept.
    pub fn reset_transform(&self) {
        self.mutate(CanvasState::reset_transform);
        self.inner.observers.notify(&CanvasChange::TransformsReset);
    }

    /// Clone the current state.
    #[must_use]
    pub fn snapshot(&self) -> CanvasState {
        self.read(Clone::clone)
    }

    /// Run a closure with shared access to the current state.
    pub fn read<R>(&self, f: impl FnOnce(&CanvasState) -> R) -> R {
        let state = self
            .inner
            .state
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        f(&state)
    }

    /// Number of shapes currently on the canvas.
    #[must_use]
    pub fn shape_count(&self) -> usize {
        self.read(|state| state.shapes().len())
    }

    /// Current `(width, height)`.
    #[must_use]
    pub fn size(&self) -> (f64, f64) {
        self.read(|state| (state.width, state.height))
    }

    /// Check whether two handles share the same canvas.
    #[must_use]
    pub fn same_canvas(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    fn mutate<R>(&self, f: impl FnOnce(&mut CanvasState) -> R) -> R {
        let mut state = self
            .inner
            .state
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        f(&mut state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEFAULT_COLOR;
    use std::sync::Mutex;

    fn dot(x: f64) -> CanvasShape {
        CanvasShape::FilledCircle {
            x,
            y: 0.0,
            radius: 1.0,
            color: DEFAULT_COLOR.to_string(),
        }
    }

    fn recorder(store: &CanvasStore) -> Arc<Mutex<Vec<CanvasChange>>> {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        store.subscribe(move |change| sink.lock().expect("lock").push(*change));
        events
    }

    #[test]
    fn test_every_mutation_notifies() {
        let store = CanvasStore::new();
        let events = recorder(&store);

        store.add_shape(dot(1.0));
        store.add_shape(dot(2.0));
        store.set_size(800.0, 600.0);
        store.add_transform(CanvasTransform::Translate { dx: 1.0, dy: 1.0 });
        store.set_shadow(CanvasShadow {
            offset_x: 1.0,
            offset_y: 1.0,
            blur: 0.0,
            color: "gray".to_string(),
        });
        store.clear_shadow();
        store.reset_transform();
        store.clear();

        let events = events.lock().expect("lock");
        assert_eq!(
            *events,
            vec![
                CanvasChange::ShapeAdded { index: 0 },
                CanvasChange::ShapeAdded { index: 1 },
                CanvasChange::Resized {
                    width: 800.0,
                    height: 600.0
                },
                CanvasChange::TransformAdded,
                CanvasChange::ShadowSet,
                CanvasChange::ShadowCleared,
                CanvasChange::TransformsReset,
                CanvasChange::ShapesCleared,
            ]
        );
    }

    #[test]
    fn test_observer_can_read_store() {
        let store = CanvasStore::new();
        let counts = Arc::new(Mutex::new(Vec::new()));
        let reader = store.clone();
        let sink = Arc::clone(&counts);
        store.subscribe(move |_| sink.lock().expect("lock").push(reader.shape_count()));

        store.add_shape(dot(1.0));
        store.add_shape(dot(2.0));

        assert_eq!(*counts.lock().expect("lock"), vec![1, 2]);
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let store = CanvasStore::new();
        let events = Arc::new(Mutex::new(0_usize));
        let sink = Arc::clone(&events);
        let id = store.subscribe(move |_| *sink.lock().expect("lock") += 1);

        store.add_shape(dot(1.0));
        assert!(store.unsubscribe(id));
        store.add_shape(dot(2.0));

        assert_eq!(*events.lock().expect("lock"), 1);
        assert_eq!(store.shape_count(), 2);
    }

    #[test]
    fn test_clones_share_canvas() {
        let store = CanvasStore::new();
        let other = store.clone();
        other.add_shape(dot(3.0));

        assert!(store.same_canvas(&other));
        assert!(!store.same_canvas(&CanvasStore::new()));
        assert_eq!(store.shape_count(), 1);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let store = CanvasStore::new();
        store.add_shape(dot(1.0));
        let snapshot = store.snapshot();
        store.clear();

        assert_eq!(snapshot.shapes().len(), 1);
        assert_eq!(store.shape_count(), 0);
    }

    #[test]
    fn test_with_state() {
        let store = CanvasStore::with_state(CanvasState::new(100.0, 50.0));
        assert_eq!(store.size(), (100.0, 50.0));
    }
}
