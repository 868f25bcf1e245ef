//! Platform events and the delegated view handlers receive

use std::cell::Cell;

/// Event types that do not bubble natively
pub const NON_BUBBLING_EVENTS: &[&str] = &[
    "mouseenter",
    "mouseleave",
    "pointerenter",
    "pointerleave",
    "focus",
    "blur",
    "load",
    "unload",
];

/// An event as the platform delivers it
#[derive(Debug)]
pub struct DomEvent<N> {
    event_type: String,
    target: N,
    bubbles: bool,
    cancelable: bool,
    propagation_stopped: Cell<bool>,
    default_prevented: Cell<bool>,
}

impl<N> DomEvent<N> {
    /// Create an event aimed at `target`. Bubbling follows the native
    /// semantics of `event_type`.
    pub fn new(event_type: &str, target: N) -> Self {
        Self {
            event_type: event_type.to_string(),
            target,
            bubbles: !NON_BUBBLING_EVENTS.contains(&event_type),
            cancelable: true,
            propagation_stopped: Cell::new(false),
            default_prevented: Cell::new(false),
        }
    }

    /// Override bubbling
    pub fn with_bubbles(mut self, bubbles: bool) -> Self {
        self.bubbles = bubbles;
        self
    }

    /// Override cancelability
    pub fn with_cancelable(mut self, cancelable: bool) -> Self {
        self.cancelable = cancelable;
        self
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// The node the event was fired at
    pub fn target(&self) -> &N {
        &self.target
    }

    pub fn bubbles(&self) -> bool {
        self.bubbles
    }

    pub fn cancelable(&self) -> bool {
        self.cancelable
    }

    /// Stop propagation to further nodes
    pub fn stop_propagation(&self) {
        self.propagation_stopped.set(true);
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped.get()
    }

    /// Prevent the default action, if the event is cancelable
    pub fn prevent_default(&self) {
        if self.cancelable {
            self.default_prevented.set(true);
        }
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}

/// What a delegated handler observes: the platform event plus the ancestor
/// whose selector matched.
#[derive(Debug)]
pub struct DelegatedEvent<'a, N> {
    /// The event as the platform delivered it
    pub original_event: &'a DomEvent<N>,
    /// The element the handler's selector matched
    pub delegated_target: N,
}

impl<'a, N> DelegatedEvent<'a, N> {
    /// The element this handler is about
    pub fn current_target(&self) -> &N {
        &self.delegated_target
    }

    /// The literal event source
    pub fn target(&self) -> &N {
        self.original_event.target()
    }

    pub fn event_type(&self) -> &str {
        self.original_event.event_type()
    }

    pub fn stop_propagation(&self) {
        self.original_event.stop_propagation();
    }

    pub fn prevent_default(&self) {
        self.original_event.prevent_default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bubbling_defaults() {
        assert!(DomEvent::new("click", 1u32).bubbles());
        assert!(!DomEvent::new("focus", 1u32).bubbles());
        assert!(!DomEvent::new("mouseleave", 1u32).bubbles());
        assert!(DomEvent::new("focus", 1u32).with_bubbles(true).bubbles());
    }

    #[test]
    fn test_delegated_event_forwards_flags() {
        let event = DomEvent::new("click", 3u32);
        let delegated = DelegatedEvent {
            original_event: &event,
            delegated_target: 1u32,
        };

        assert_eq!(*delegated.current_target(), 1);
        assert_eq!(*delegated.target(), 3);
        delegated.stop_propagation();
        delegated.prevent_default();
        assert!(event.is_propagation_stopped());
        assert!(event.is_default_prevented());
    }

    #[test]
    fn test_prevent_default_requires_cancelable() {
        let event = DomEvent::new("click", 0u32).with_cancelable(false);
        event.prevent_default();
        assert!(!event.is_default_prevented());
    }
}
