//! The `Events` context
//!
//! Owns the platform handle, the delegation registry and the event bus, and
//! exposes the binding surface applications use. Contexts are independent:
//! two contexts over the same platform never see each other's handlers.

use std::collections::BTreeMap;
use std::rc::Rc;

use serde_json::{json, Value};

use crate::config::Config;
use crate::dom::{EventHost, Listener, ListenerOptions, ListenerTarget};
use crate::events::{bind, bind_all, Bindable, Delegator, EventBus, Handler, Method, Subscriber};
use crate::Error;

/// Target of a direct binding
#[derive(Debug, Clone, PartialEq)]
pub enum Target<N> {
    /// The document root
    Document,
    /// One node
    Node(N),
    /// Every node matching a selector at the time of the call
    Selector(String),
}

impl<N> Target<N> {
    /// Selector target
    pub fn selector(selector: impl Into<String>) -> Self {
        Target::Selector(selector.into())
    }
}

/// Delegation and event bus context bound to one platform
pub struct Events<D: EventHost + 'static> {
    dom: Rc<D>,
    delegator: Rc<Delegator<D>>,
    bus: EventBus,
}

impl<D: EventHost + 'static> Events<D> {
    /// Create a context with the default configuration
    pub fn new(dom: Rc<D>) -> Self {
        Self::with_config(dom, Config::default())
    }

    /// Create a context with an explicit configuration
    pub fn with_config(dom: Rc<D>, config: Config) -> Self {
        Self {
            dom,
            delegator: Rc::new(Delegator::new(config)),
            bus: EventBus::new(),
        }
    }

    /// The platform this context is bound to
    pub fn dom(&self) -> &Rc<D> {
        &self.dom
    }

    pub fn config(&self) -> &Config {
        self.delegator.config()
    }

    pub fn delegator(&self) -> &Rc<Delegator<D>> {
        &self.delegator
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    fn resolve(&self, target: &Target<D::Node>) -> Result<Vec<ListenerTarget<D::Node>>, Error> {
        Ok(match target {
            Target::Document => vec![ListenerTarget::Document],
            Target::Node(node) => vec![ListenerTarget::Node(node.clone())],
            Target::Selector(selector) => self
                .dom
                .query_document(selector)?
                .into_iter()
                .map(ListenerTarget::Node)
                .collect(),
        })
    }

    /// Attach `listener` directly for every whitespace-separated type in
    /// `types`. A selector target binds every node it matches right now.
    pub fn on(
        &self,
        types: &str,
        target: &Target<D::Node>,
        listener: &Listener<D::Node>,
        options: ListenerOptions,
    ) -> Result<(), Error> {
        let targets = self.resolve(target)?;
        for event_type in types.split_whitespace() {
            for target in &targets {
                self.dom.add_listener(target, event_type, listener, options)?;
            }
        }
        Ok(())
    }

    /// Detach a listener attached with [`Events::on`]
    pub fn off_direct(
        &self,
        types: &str,
        target: &Target<D::Node>,
        listener: &Listener<D::Node>,
        options: ListenerOptions,
    ) -> Result<(), Error> {
        let targets = self.resolve(target)?;
        for event_type in types.split_whitespace() {
            for target in &targets {
                self.dom
                    .remove_listener(target, event_type, listener, options)?;
            }
        }
        Ok(())
    }

    /// Subscribe to every whitespace-separated topic in `topics`
    pub fn subscribe(&self, topics: &str, subscriber: &Subscriber) {
        for topic in topics.split_whitespace() {
            self.bus.subscribe(topic, subscriber);
        }
    }

    /// Remove `subscriber` from each whitespace-separated topic
    pub fn unsubscribe(&self, topics: &str, subscriber: &Subscriber) {
        for topic in topics.split_whitespace() {
            self.bus.unsubscribe(topic, subscriber);
        }
    }

    /// Run `handler` for events of `types` whose target, or an element
    /// ancestor of it, matches `selector`
    pub fn delegate(
        &self,
        types: &str,
        selector: &str,
        handler: &Handler<D::Node>,
    ) -> Result<(), Error> {
        self.delegator
            .delegate(&self.dom, types, selector, handler)
    }

    /// Remove delegated handlers, see [`Delegator::undelegate`].
    ///
    /// Called with neither a selector nor a handler it also clears the bus
    /// topics named by `types`.
    pub fn off(
        &self,
        types: &str,
        selector: Option<&str>,
        handler: Option<&Handler<D::Node>>,
    ) -> Result<usize, Error> {
        let removed = self
            .delegator
            .undelegate(&self.dom, types, selector, handler)?;
        if selector.is_none() && handler.is_none() {
            for topic in types.split_whitespace() {
                self.bus.clear(topic);
            }
        }
        Ok(removed)
    }

    /// Publish `args` on `topic`
    pub fn emit(&self, topic: &str, args: &[Value]) {
        self.bus.emit(topic, args);
    }

    /// Bind `method` to `receiver`, see [`bind`]
    pub fn bind<T: 'static>(&self, receiver: &Rc<T>, method: Method<T, D::Node>) -> Handler<D::Node> {
        bind(receiver, method)
    }

    /// Bind several methods of `receiver`, see [`bind_all`]
    pub fn bind_all<T: Bindable<D::Node>>(
        &self,
        receiver: &Rc<T>,
        names: Option<&[&str]>,
    ) -> Result<BTreeMap<&'static str, Handler<D::Node>>, Error> {
        bind_all(receiver, names)
    }

    /// JSON snapshot of every delegated event type's selector set
    pub fn debug_delegated(&self) -> Value {
        json!(self.delegator.snapshot())
    }

    /// Topic name to subscriber count
    pub fn debug_bus(&self) -> BTreeMap<String, usize> {
        self.bus.topics()
    }

    /// Whether the bus knows `topic`
    pub fn has_bus(&self, topic: &str) -> bool {
        self.bus.has_topic(topic)
    }
}

impl<D: EventHost + 'static> std::fmt::Debug for Events<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Events")
            .field("delegator", &self.delegator)
            .field("bus", &self.bus)
            .finish()
    }
}
