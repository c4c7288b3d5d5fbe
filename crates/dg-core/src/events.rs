//! Grid transition events
//!
//! A [`DataGrid`](crate::DataGrid) with a bus attached publishes one event
//! per observable transition. Subscribers register per event type and get
//! the concrete event back, already downcast.

use std::any::{Any, TypeId};
use std::fmt::Debug;

use ahash::AHashMap;
use parking_lot::Mutex;
use tracing::trace;

use crate::row::RowId;
use crate::sort::SortState;

/// Something a grid reports about itself
pub trait GridEvent: Any + Debug + Send + Sync {
    /// Name of the grid the event came from
    fn grid(&self) -> &str;
}

type Subscriber = Box<dyn FnMut(&dyn Any) + Send>;

/// Fan-out of grid events to subscribers, keyed by event type
#[derive(Default)]
pub struct EventBus {
    subscribers: Mutex<AHashMap<TypeId, Vec<Subscriber>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call `handler` for every published `E`, in subscription order
    pub fn subscribe<E, F>(&self, mut handler: F)
    where
        E: GridEvent,
        F: FnMut(&E) + Send + 'static,
    {
        let subscriber: Subscriber = Box::new(move |event| {
            if let Some(event) = event.downcast_ref::<E>() {
                handler(event);
            }
        });
        self.subscribers
            .lock()
            .entry(TypeId::of::<E>())
            .or_default()
            .push(subscriber);
    }

    /// Handlers must not publish on the same bus.
    pub fn publish<E: GridEvent>(&self, event: E) {
        trace!(grid = event.grid(), "publishing {:?}", event);
        if let Some(subscribers) = self.subscribers.lock().get_mut(&TypeId::of::<E>()) {
            for subscriber in subscribers.iter_mut() {
                subscriber(&event);
            }
        }
    }

    pub fn subscriber_count<E: GridEvent>(&self) -> usize {
        self.subscribers
            .lock()
            .get(&TypeId::of::<E>())
            .map_or(0, Vec::len)
    }
}

impl Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("event_types", &self.subscribers.lock().len())
            .finish()
    }
}

/// Row set replaced after a (re)load
#[derive(Debug, Clone)]
pub struct RowsReplaced {
    pub grid: String,
    pub row_count: usize,
}

/// Search text and column filters cleared
#[derive(Debug, Clone)]
pub struct FiltersReset {
    pub grid: String,
}

#[derive(Debug, Clone)]
pub struct SortChanged {
    pub grid: String,
    pub sort: SortState,
}

/// Page index or page size changed
#[derive(Debug, Clone)]
pub struct PageChanged {
    pub grid: String,
    pub page_index: usize,
    pub page_size: usize,
}

#[derive(Debug, Clone)]
pub struct RowExpansionToggled {
    pub grid: String,
    pub row: RowId,
    pub expanded: bool,
}

macro_rules! grid_events {
    ($($t:ty),* $(,)?) => {
        $(
            impl GridEvent for $t {
                fn grid(&self) -> &str {
                    &self.grid
                }
            }
        )*
    };
}

grid_events!(RowsReplaced, FiltersReset, SortChanged, PageChanged, RowExpansionToggled);
