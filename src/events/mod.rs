//! Event handling
//!
//! - [`event`]: platform events and the delegated view handlers see
//! - [`delegation`]: selector-based delegation with one root listener per type
//! - [`emitter`]: the named-topic event bus
//! - [`bind`]: handlers bound to a shared receiver

pub mod bind;
pub mod delegation;
pub mod emitter;
pub mod event;

pub use bind::{bind, bind_all, Bindable, Method};
pub use delegation::{Delegator, Handler};
pub use emitter::{EventBus, Subscriber};
pub use event::{DelegatedEvent, DomEvent, NON_BUBBLING_EVENTS};
