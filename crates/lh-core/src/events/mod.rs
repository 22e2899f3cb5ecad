//! Typed publish/subscribe between panels and their host

use std::any::{Any, TypeId};
use std::sync::Arc;

use ahash::AHashMap;
use parking_lot::Mutex;

type HandlerMap = AHashMap<TypeId, Vec<Box<dyn EventHandler>>>;

/// Something a panel announces
pub trait Event: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;

    /// Short name for logs
    fn name(&self) -> &'static str;
}

/// Receives events of the types it was subscribed for
pub trait EventHandler: Send + Sync {
    fn handle(&mut self, event: &dyn Event);
}

/// Events published by panels
pub mod events {
    /// A histogram was (re)computed
    #[derive(Debug, Clone)]
    pub struct HistogramComputed {
        pub panel: String,
        pub field: String,
        pub buckets: usize,
        pub total: u64,
    }

    /// A panel narrowed the current view
    #[derive(Debug, Clone)]
    pub struct ViewFiltered {
        pub panel: String,
        pub filter: String,
        pub matching: usize,
    }

    /// A panel cleared the current view's filter
    #[derive(Debug, Clone)]
    pub struct ViewCleared {
        pub panel: String,
    }

    /// A panel asked the host to open a companion region next to it
    #[derive(Debug, Clone)]
    pub struct SplitRequested {
        pub panel: String,
        pub companion: String,
    }

    macro_rules! event_types {
        ($($t:ident),* $(,)?) => {
            $(
                impl super::Event for $t {
                    fn as_any(&self) -> &dyn std::any::Any {
                        self
                    }

                    fn name(&self) -> &'static str {
                        stringify!($t)
                    }
                }
            )*
        };
    }

    event_types!(HistogramComputed, ViewFiltered, ViewCleared, SplitRequested);
}

/// Dispatches events to handlers keyed by event type.
///
/// Clones share one handler table.
#[derive(Clone, Default)]
pub struct EventBus {
    handlers: Arc<Mutex<HandlerMap>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call `handler` for every future `E`
    pub fn subscribe<E: Event>(&self, handler: Box<dyn EventHandler>) {
        self.handlers
            .lock()
            .entry(TypeId::of::<E>())
            .or_default()
            .push(handler);
    }

    pub fn subscriber_count<E: Event>(&self) -> usize {
        self.handlers.lock().get(&TypeId::of::<E>()).map_or(0, Vec::len)
    }

    /// Deliver `event` to its subscribers.
    ///
    /// Handlers run synchronously under the bus lock and must not publish on the same bus.
    pub fn publish<E: Event>(&self, event: E) {
        let mut handlers = self.handlers.lock();
        let Some(subscribers) = handlers.get_mut(&TypeId::of::<E>()) else {
            return;
        };

        tracing::trace!("Publishing {} to {} handler(s)", event.name(), subscribers.len());
        for handler in subscribers.iter_mut() {
            handler.handle(&event);
        }
    }
}

/// [`EventHandler`] backed by a closure
pub struct FnHandler<F>(F);

impl<F> EventHandler for FnHandler<F>
where
    F: FnMut(&dyn Event) + Send + Sync,
{
    fn handle(&mut self, event: &dyn Event) {
        (self.0)(event)
    }
}

pub fn handler_from_fn<F>(f: F) -> Box<dyn EventHandler>
where
    F: FnMut(&dyn Event) + Send + Sync + 'static,
{
    Box::new(FnHandler(f))
}
