//! Platform seam for the delegation engine
//!
//! The matching engine never touches a concrete DOM. Everything it needs from the
//! platform goes through two traits:
//! - [`Dom`] - cheap structural accessors plus the native selector primitives
//!   (`matches` and `querySelectorAll`)
//! - [`EventHost`] - listener attachment on the document root and on nodes
//!
//! [`Document`] is an in-memory implementation of both, and `web::WebDocument`
//! (feature `web`) implements them over `web-sys`.

pub mod document;
pub mod selector;
#[cfg(feature = "web")]
pub mod web;

pub use document::{Document, NodeId};
pub use selector::{SelectorError, SelectorList};

use std::borrow::Cow;
use std::fmt;
use std::rc::Rc;

use crate::events::DomEvent;
use crate::Error;

/// Kind of a node in the platform tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    /// The document root
    Document,
    /// An element
    Element,
    /// Text content
    Text,
}

/// Structural access to a UI tree
pub trait Dom {
    /// Handle to a node. Cheap to clone.
    type Node: Clone + PartialEq + fmt::Debug;

    /// Kind of the node
    fn node_type(&self, node: &Self::Node) -> NodeType;

    /// Parent element, `None` at the top of the element tree
    fn parent_element(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Node name as the platform reports it (`"BUTTON"`, `"button"`, ...)
    fn node_name(&self, node: &Self::Node) -> Cow<'_, str>;

    /// The `id` attribute, if any
    fn element_id(&self, node: &Self::Node) -> Option<Cow<'_, str>>;

    /// The raw `class` attribute, if any
    fn class_name(&self, node: &Self::Node) -> Option<Cow<'_, str>>;

    /// Native structural test of `node` against `selector`.
    fn matches_selector(&self, node: &Self::Node, selector: &str) -> Result<bool, Error>;

    /// Native query of the descendants of `root` matching `selector`, in document order.
    fn query_selector_all(&self, root: &Self::Node, selector: &str)
        -> Result<Vec<Self::Node>, Error>;

    /// Native query against the whole document.
    fn query_document(&self, selector: &str) -> Result<Vec<Self::Node>, Error>;
}

/// Where a listener is attached
#[derive(Debug, Clone, PartialEq)]
pub enum ListenerTarget<N> {
    /// The document root
    Document,
    /// A single node
    Node(N),
}

/// Options for a direct listener
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListenerOptions {
    /// Listen during the capture phase instead of the bubble phase
    pub capture: bool,
}

impl ListenerOptions {
    /// Capture-phase options
    pub fn capture() -> Self {
        Self { capture: true }
    }
}

/// A platform event listener.
///
/// Two listeners are equal only when they wrap the same closure, which is what
/// listener removal compares.
pub struct Listener<N> {
    func: Rc<dyn Fn(&DomEvent<N>)>,
}

impl<N> Listener<N> {
    /// Wrap a closure as a listener
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&DomEvent<N>) + 'static,
    {
        Self {
            func: Rc::new(func),
        }
    }

    /// Invoke the listener
    pub fn call(&self, event: &DomEvent<N>) {
        (self.func)(event)
    }
}

impl<N> Clone for Listener<N> {
    fn clone(&self) -> Self {
        Self {
            func: self.func.clone(),
        }
    }
}

impl<N> PartialEq for Listener<N> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.func), Rc::as_ptr(&other.func))
    }
}

impl<N> fmt::Debug for Listener<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("func", &Rc::as_ptr(&self.func))
            .finish()
    }
}

/// Listener attachment on the platform
pub trait EventHost: Dom {
    /// Attach `listener` for `event_type` on `target`
    fn add_listener(
        &self,
        target: &ListenerTarget<Self::Node>,
        event_type: &str,
        listener: &Listener<Self::Node>,
        options: ListenerOptions,
    ) -> Result<(), Error>;

    /// Detach a listener previously attached with the same arguments
    fn remove_listener(
        &self,
        target: &ListenerTarget<Self::Node>,
        event_type: &str,
        listener: &Listener<Self::Node>,
        options: ListenerOptions,
    ) -> Result<(), Error>;
}
