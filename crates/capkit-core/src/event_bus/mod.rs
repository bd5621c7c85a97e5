//! # Event Bus Module
//!
//! Publish/subscribe notifications for the design, cart and order state
//! containers.
//!
//! ## Usage
//!
//! ```rust
//! use capkit_core::event_bus::{AppEvent, DesignEvent, EventBus, EventCategory, EventFilter};
//!
//! let bus = EventBus::new();
//! let subscription = bus.subscribe(
//!     EventFilter::Categories(vec![EventCategory::Design]),
//!     |event| println!("{}", event.description()),
//! );
//!
//! bus.publish(AppEvent::Design(DesignEvent::DesignCleared));
//! bus.unsubscribe(subscription);
//! ```

mod bus;
mod events;

pub use bus::*;
pub use events::*;
