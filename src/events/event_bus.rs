// src/events/event_bus.rs
//
// Synchronous in-process event bus.
//
// Services emit scrape lifecycle events; observers (run reporting, tests)
// subscribe without the services knowing about them. Handlers run
// immediately, in subscription order, on the emitting thread.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::events::DomainEvent;

type EventHandler = Box<dyn Fn(&dyn Any) + Send + Sync>;

pub struct EventBus {
    handlers: RwLock<HashMap<TypeId, Vec<EventHandler>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            handlers: RwLock::new(HashMap::new()),
        }
    }

    /// Subscribe a handler for one event type. Handlers execute in the
    /// order they were subscribed.
    pub fn subscribe<E, F>(&self, handler: F)
    where
        E: DomainEvent + 'static,
        F: Fn(&E) + Send + Sync + 'static,
    {
        let wrapped: EventHandler = Box::new(move |event: &dyn Any| {
            if let Some(concrete) = event.downcast_ref::<E>() {
                handler(concrete);
            }
        });

        let mut handlers = self.handlers.write().unwrap_or_else(|e| e.into_inner());
        handlers.entry(TypeId::of::<E>()).or_default().push(wrapped);
    }

    /// Emit an event to all subscribed handlers. Emitting with no
    /// subscribers is valid and silent.
    pub fn emit<E>(&self, event: E)
    where
        E: DomainEvent + 'static,
    {
        log::debug!("event {}: {:?}", event.event_type(), event);

        let handlers = self.handlers.read().unwrap_or_else(|e| e.into_inner());
        if let Some(subscribed) = handlers.get(&TypeId::of::<E>()) {
            for handler in subscribed {
                handler(&event);
            }
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

pub fn create_event_bus() -> Arc<EventBus> {
    Arc::new(EventBus::new())
}
