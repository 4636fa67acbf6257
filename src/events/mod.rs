// src/events/mod.rs
//
// Internal Event System - Public API

pub mod event_bus;
pub mod scrape_events;

pub use event_bus::{create_event_bus, EventBus};

pub use scrape_events::{
    DomainEvent, MovieResolved, ResolutionFailed, ReviewsCollected, ScrapeBatchCompleted,
};
