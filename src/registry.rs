use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::debug;

use crate::error::TourError;
use crate::widget::{EventHandle, WidgetHandle};

/// One registered tour: the live widget handle plus the optional caller-side
/// event handler supplied at setup.
#[derive(Clone)]
pub struct TourInstance {
    id: String,
    handle: WidgetHandle,
    events: Option<EventHandle>,
}

impl TourInstance {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn handle(&self) -> WidgetHandle {
        self.handle.clone()
    }

    pub fn events(&self) -> Option<EventHandle> {
        self.events.clone()
    }
}

impl fmt::Debug for TourInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TourInstance")
            .field("id", &self.id)
            .field("events", &self.events.is_some())
            .finish()
    }
}

/// Page-lifetime map from caller-assigned id to live tour instance.
///
/// Ids are unique: a second `register` under a live id fails instead of
/// shadowing the first. Reads are lock-free; `register`/`unregister` are
/// atomic per key through the sharded map.
#[derive(Clone, Debug, Default)]
pub struct TourRegistry {
    tours: Arc<DashMap<String, TourInstance>>,
}

impl TourRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &self,
        id: &str,
        handle: WidgetHandle,
        events: Option<EventHandle>,
    ) -> Result<(), TourError> {
        match self.tours.entry(id.to_string()) {
            Entry::Occupied(_) => Err(TourError::DuplicateId(id.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(TourInstance {
                    id: id.to_string(),
                    handle,
                    events,
                });
                debug!(id, "registered tour");
                Ok(())
            }
        }
    }

    pub fn resolve(&self, id: &str) -> Result<TourInstance, TourError> {
        self.tours
            .get(id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| TourError::UnknownId(id.to_string()))
    }

    /// Removes and returns the instance. Every `register` should be paired
    /// with one of these when the owning component goes away, otherwise
    /// instances accumulate for the page's lifetime.
    pub fn unregister(&self, id: &str) -> Result<TourInstance, TourError> {
        match self.tours.remove(id) {
            Some((_, instance)) => {
                debug!(id, "unregistered tour");
                Ok(instance)
            }
            None => Err(TourError::UnknownId(id.to_string())),
        }
    }

    pub fn ids(&self) -> Vec<String> {
        self.tours.iter().map(|kv| kv.key().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.tours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tours.is_empty()
    }
}
