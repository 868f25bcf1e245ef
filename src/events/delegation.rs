//! Event delegation
//!
//! A [`Delegator`] keeps one [`SelectorSet`] of handlers per event type and a
//! single listener on the document root for each type that has handlers:
//! - the listener is attached when the first handler for a type is delegated
//!   and detached when the last one is removed
//! - on dispatch the event target and its element ancestors are matched
//!   against the set, and handlers run from the target outwards
//! - every handler receives a [`DelegatedEvent`] naming the element its
//!   selector matched

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::rc::Rc;

use crate::config::Config;
use crate::dom::{EventHost, Listener, ListenerOptions, ListenerTarget, NodeType};
use crate::events::{DelegatedEvent, DomEvent};
use crate::selector_set::{SelectorSet, SelectorSetSnapshot};
use crate::Error;

/// A delegated event handler.
///
/// Handlers compare by identity: a clone is equal to its original, two
/// handlers built from identical closures are not.
pub struct Handler<N> {
    func: Rc<dyn Fn(&DelegatedEvent<'_, N>) -> anyhow::Result<()>>,
}

impl<N> Handler<N> {
    /// Wrap a closure as a handler
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&DelegatedEvent<'_, N>) -> anyhow::Result<()> + 'static,
    {
        Self {
            func: Rc::new(func),
        }
    }

    /// Invoke the handler
    pub fn call(&self, event: &DelegatedEvent<'_, N>) -> anyhow::Result<()> {
        (self.func)(event)
    }
}

impl<N> Clone for Handler<N> {
    fn clone(&self) -> Self {
        Self {
            func: self.func.clone(),
        }
    }
}

impl<N> PartialEq for Handler<N> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.func), Rc::as_ptr(&other.func))
    }
}

impl<N> fmt::Debug for Handler<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("func", &Rc::as_ptr(&self.func))
            .finish()
    }
}

/// Handlers and root listener of one event type
struct DelegatedType<N> {
    set: SelectorSet<Handler<N>>,
    listener: Listener<N>,
    capture: bool,
}

/// Ancestor matched during a dispatch, with the handlers to run for it
type Planned<N> = (N, Vec<Handler<N>>);

/// Per-event-type delegation registry
pub struct Delegator<D: EventHost> {
    types: RefCell<HashMap<String, DelegatedType<D::Node>>>,
    config: Config,
}

impl<D: EventHost + 'static> Delegator<D> {
    /// Create a delegator with no delegated types
    pub fn new(config: Config) -> Self {
        Self {
            types: RefCell::new(HashMap::new()),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Register `handler` for `selector` under every whitespace-separated
    /// type in `types`, attaching root listeners as needed.
    pub fn delegate(
        self: &Rc<Self>,
        dom: &Rc<D>,
        types: &str,
        selector: &str,
        handler: &Handler<D::Node>,
    ) -> Result<(), Error> {
        if selector.is_empty() {
            return Ok(());
        }

        for event_type in types.split_whitespace() {
            let initialized = self.types.borrow().contains_key(event_type);
            if !initialized {
                let capture = self.config.is_capture_type(event_type);
                let listener = self.root_listener(dom);
                dom.add_listener(
                    &ListenerTarget::Document,
                    event_type,
                    &listener,
                    ListenerOptions { capture },
                )?;
                log::debug!("attached root `{event_type}` listener (capture: {capture})");

                self.types.borrow_mut().insert(
                    event_type.to_string(),
                    DelegatedType {
                        set: SelectorSet::new()
                            .with_universal_logging(self.config.log_universal_fallback),
                        listener,
                        capture,
                    },
                );
            }

            if let Some(delegated) = self.types.borrow_mut().get_mut(event_type) {
                delegated.set.add(selector, handler.clone());
            }
        }
        Ok(())
    }

    /// Remove delegated handlers.
    ///
    /// With a selector only entries registered with exactly that text are
    /// considered, otherwise every entry of the type. A handler narrows the
    /// removal to entries holding that handler. Types left without handlers
    /// detach their root listener. Returns the number of entries removed.
    pub fn undelegate(
        &self,
        dom: &D,
        types: &str,
        selector: Option<&str>,
        handler: Option<&Handler<D::Node>>,
    ) -> Result<usize, Error> {
        let mut removed = 0;

        for event_type in types.split_whitespace() {
            let emptied = {
                let mut registry = self.types.borrow_mut();
                let Some(delegated) = registry.get_mut(event_type) else {
                    continue;
                };

                match selector {
                    Some(selector) => removed += delegated.set.remove(selector, handler),
                    None => {
                        let texts: BTreeSet<String> =
                            delegated.set.selectors().iter().cloned().collect();
                        for text in texts {
                            removed += delegated.set.remove(&text, handler);
                        }
                    }
                }

                if delegated.set.is_empty() {
                    registry.remove(event_type)
                } else {
                    None
                }
            };

            if let Some(delegated) = emptied {
                dom.remove_listener(
                    &ListenerTarget::Document,
                    event_type,
                    &delegated.listener,
                    ListenerOptions {
                        capture: delegated.capture,
                    },
                )?;
                log::debug!("detached root `{event_type}` listener");
            }
        }
        Ok(removed)
    }

    /// Run the handlers matching `event`'s target and its element ancestors.
    ///
    /// Matching finishes before the first handler runs, so handlers may
    /// delegate or undelegate freely; such changes apply to later events.
    /// The first handler error ends the pass and is returned.
    pub fn dispatch(&self, dom: &D, event: &DomEvent<D::Node>) -> anyhow::Result<()> {
        let plan = self.plan(dom, event);
        if plan.is_empty() {
            return Ok(());
        }

        log::trace!(
            "`{}` matched delegated handlers on {} element(s)",
            event.event_type(),
            plan.len()
        );

        for (node, handlers) in plan {
            let delegated = DelegatedEvent {
                original_event: event,
                delegated_target: node,
            };
            for handler in handlers {
                handler.call(&delegated)?;
            }
        }
        Ok(())
    }

    fn plan(&self, dom: &D, event: &DomEvent<D::Node>) -> Vec<Planned<D::Node>> {
        let types = self.types.borrow();
        let Some(delegated) = types.get(event.event_type()) else {
            return Vec::new();
        };

        let mut plan = Vec::new();
        let mut cursor = Some(event.target().clone());
        while let Some(node) = cursor {
            if dom.node_type(&node) != NodeType::Element {
                break;
            }
            // Capture-mode types only fire for the target itself.
            cursor = if delegated.capture {
                None
            } else {
                dom.parent_element(&node)
            };

            let handlers: Vec<Handler<D::Node>> = delegated
                .set
                .matches(dom, &node)
                .into_iter()
                .map(|entry| entry.payload().clone())
                .collect();
            if !handlers.is_empty() {
                plan.push((node, handlers));
            }
        }
        plan
    }

    fn root_listener(self: &Rc<Self>, dom: &Rc<D>) -> Listener<D::Node> {
        let delegator = Rc::downgrade(self);
        let dom = Rc::downgrade(dom);
        Listener::new(move |event: &DomEvent<D::Node>| {
            let (Some(delegator), Some(dom)) = (delegator.upgrade(), dom.upgrade()) else {
                return;
            };
            if let Err(err) = delegator.dispatch(&dom, event) {
                log::error!("delegated `{}` handler failed: {err:#}", event.event_type());
            }
        })
    }

    /// Whether `event_type` currently has a root listener
    pub fn is_delegated(&self, event_type: &str) -> bool {
        self.types.borrow().contains_key(event_type)
    }

    /// Event types with handlers, sorted
    pub fn delegated_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self.types.borrow().keys().cloned().collect();
        types.sort();
        types
    }

    /// Number of handlers registered for `event_type`
    pub fn handler_count(&self, event_type: &str) -> usize {
        self.types
            .borrow()
            .get(event_type)
            .map_or(0, |delegated| delegated.set.len())
    }

    /// Snapshot of every event type's selector set
    pub fn snapshot(&self) -> BTreeMap<String, SelectorSetSnapshot> {
        self.types
            .borrow()
            .iter()
            .map(|(event_type, delegated)| (event_type.clone(), delegated.set.snapshot()))
            .collect()
    }
}

impl<D: EventHost> fmt::Debug for Delegator<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let types: Vec<String> = self.types.borrow().keys().cloned().collect();
        f.debug_struct("Delegator")
            .field("types", &types)
            .field("config", &self.config)
            .finish()
    }
}
