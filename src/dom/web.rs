//! Browser platform over `web-sys`
//!
//! Nodes are `web_sys::Element`s and the native `matches` /
//! `querySelectorAll` implement the structural tests. Listener closures are
//! kept alive here until they are removed again, and freed once none of this
//! document's listeners is running.

use std::borrow::Cow;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, EventTarget, NodeList};

use crate::dom::{Dom, EventHost, Listener, ListenerOptions, ListenerTarget, NodeType};
use crate::events::DomEvent;
use crate::Error;

type JsListener = Closure<dyn FnMut(web_sys::Event)>;

struct Registration {
    target: ListenerTarget<Element>,
    event_type: String,
    listener: Listener<Element>,
    capture: bool,
    closure: JsListener,
}

/// Values released while a listener may still be running on the JS stack.
///
/// Dropping a `Closure` from inside its own call is undefined, so a closure
/// removed during dispatch is parked until the dispatch depth is back to 0.
struct Retired<T> {
    depth: Rc<Cell<usize>>,
    parked: RefCell<Vec<T>>,
}

impl<T> Retired<T> {
    fn new() -> Self {
        Self {
            depth: Rc::new(Cell::new(0)),
            parked: RefCell::new(Vec::new()),
        }
    }

    /// Dispatch depth counter shared with the forwarding closures
    fn depth(&self) -> Rc<Cell<usize>> {
        self.depth.clone()
    }

    fn release(&self, value: T) {
        if self.depth.get() == 0 {
            drop(value);
            self.collect();
        } else {
            self.parked.borrow_mut().push(value);
        }
    }

    /// Free parked values unless a listener is running
    fn collect(&self) {
        if self.depth.get() > 0 {
            return;
        }
        let parked = std::mem::take(&mut *self.parked.borrow_mut());
        drop(parked);
    }
}

/// Marks a forwarding closure as running for as long as it lives
struct Running(Rc<Cell<usize>>);

impl Running {
    fn enter(depth: &Rc<Cell<usize>>) -> Self {
        depth.set(depth.get() + 1);
        Self(depth.clone())
    }
}

impl Drop for Running {
    fn drop(&mut self) {
        self.0.set(self.0.get().saturating_sub(1));
    }
}

/// The browser document
pub struct WebDocument {
    document: web_sys::Document,
    registrations: RefCell<Vec<Registration>>,
    retired: Retired<JsListener>,
}

fn js_error(err: JsValue) -> Error {
    Error::Platform(err.as_string().unwrap_or_else(|| format!("{err:?}")))
}

fn elements(list: NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|index| list.item(index))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

/// Element an event is about: the target itself or, for text targets, its
/// parent element
fn target_element(event: &web_sys::Event) -> Option<Element> {
    let target = event.target()?;
    match target.dyn_into::<Element>() {
        Ok(element) => Some(element),
        Err(target) => target
            .dyn_ref::<web_sys::Node>()
            .and_then(|node| node.parent_element()),
    }
}

impl WebDocument {
    /// Bind to the document of the current window
    pub fn new() -> Result<Self, Error> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| Error::Platform("no document available".to_string()))?;
        Ok(Self::from_document(document))
    }

    /// Bind to a given document
    pub fn from_document(document: web_sys::Document) -> Self {
        Self {
            document,
            registrations: RefCell::new(Vec::new()),
            retired: Retired::new(),
        }
    }

    pub fn document(&self) -> &web_sys::Document {
        &self.document
    }

    fn event_target<'a>(&'a self, target: &'a ListenerTarget<Element>) -> &'a EventTarget {
        match target {
            ListenerTarget::Document => self.document.as_ref(),
            ListenerTarget::Node(element) => element.as_ref(),
        }
    }
}

impl Dom for WebDocument {
    type Node = Element;

    fn node_type(&self, node: &Element) -> NodeType {
        match node.node_type() {
            web_sys::Node::ELEMENT_NODE => NodeType::Element,
            web_sys::Node::DOCUMENT_NODE => NodeType::Document,
            _ => NodeType::Text,
        }
    }

    fn parent_element(&self, node: &Element) -> Option<Element> {
        node.parent_element()
    }

    fn node_name(&self, node: &Element) -> Cow<'_, str> {
        Cow::Owned(node.node_name())
    }

    fn element_id(&self, node: &Element) -> Option<Cow<'_, str>> {
        let id = node.id();
        (!id.is_empty()).then_some(Cow::Owned(id))
    }

    // The attribute rather than `className`, which is not a string on SVG
    // elements.
    fn class_name(&self, node: &Element) -> Option<Cow<'_, str>> {
        node.get_attribute("class").map(Cow::Owned)
    }

    fn matches_selector(&self, node: &Element, selector: &str) -> Result<bool, Error> {
        node.matches(selector).map_err(js_error)
    }

    fn query_selector_all(&self, root: &Element, selector: &str) -> Result<Vec<Element>, Error> {
        root.query_selector_all(selector)
            .map(elements)
            .map_err(js_error)
    }

    fn query_document(&self, selector: &str) -> Result<Vec<Element>, Error> {
        self.document
            .query_selector_all(selector)
            .map(elements)
            .map_err(js_error)
    }
}

impl EventHost for WebDocument {
    fn add_listener(
        &self,
        target: &ListenerTarget<Element>,
        event_type: &str,
        listener: &Listener<Element>,
        options: ListenerOptions,
    ) -> Result<(), Error> {
        self.retired.collect();

        let registered = self.registrations.borrow().iter().any(|existing| {
            existing.capture == options.capture
                && existing.event_type == event_type
                && existing.target == *target
                && existing.listener == *listener
        });
        if registered {
            return Ok(());
        }

        let forward = listener.clone();
        let depth = self.retired.depth();
        let closure: JsListener = Closure::new(move |event: web_sys::Event| {
            let Some(element) = target_element(&event) else {
                return;
            };
            let _running = Running::enter(&depth);
            let dom_event = DomEvent::new(&event.type_(), element)
                .with_bubbles(event.bubbles())
                .with_cancelable(event.cancelable());
            forward.call(&dom_event);

            if dom_event.is_propagation_stopped() {
                event.stop_propagation();
            }
            if dom_event.is_default_prevented() {
                event.prevent_default();
            }
        });

        let callback: &js_sys::Function = closure.as_ref().unchecked_ref();
        self.event_target(target)
            .add_event_listener_with_callback_and_bool(event_type, callback, options.capture)
            .map_err(js_error)?;

        self.registrations.borrow_mut().push(Registration {
            target: target.clone(),
            event_type: event_type.to_string(),
            listener: listener.clone(),
            capture: options.capture,
            closure,
        });
        Ok(())
    }

    fn remove_listener(
        &self,
        target: &ListenerTarget<Element>,
        event_type: &str,
        listener: &Listener<Element>,
        options: ListenerOptions,
    ) -> Result<(), Error> {
        let registration = {
            let mut registrations = self.registrations.borrow_mut();
            let Some(position) = registrations.iter().position(|existing| {
                existing.capture == options.capture
                    && existing.event_type == event_type
                    && existing.target == *target
                    && existing.listener == *listener
            }) else {
                return Ok(());
            };
            registrations.remove(position)
        };

        let callback: &js_sys::Function = registration.closure.as_ref().unchecked_ref();
        if let Err(err) = self
            .event_target(target)
            .remove_event_listener_with_callback_and_bool(event_type, callback, options.capture)
        {
            log::warn!("failed to remove `{event_type}` listener: {err:?}");
        }
        self.retired.release(registration.closure);
        Ok(())
    }
}
