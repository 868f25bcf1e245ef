//! In-memory document
//!
//! Arena-backed tree with element, text and document nodes, a structural
//! selector engine and a listener store that runs the usual capture, target and
//! bubble phases. It is the reference platform for the delegation engine.

use std::borrow::Cow;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use selectors::attr::{AttrSelectorOperation, CaseSensitivity, NamespaceConstraint};
use selectors::matching::{ElementSelectorFlags, MatchingContext};
use selectors::OpaqueElement;

use crate::dom::selector::{
    CssIdent, CssString, NonTSPseudoClass, PseudoElement, SelectorError, SelectorImpl,
    SelectorList,
};
use crate::dom::{Dom, EventHost, Listener, ListenerOptions, ListenerTarget, NodeType};
use crate::events::DomEvent;
use crate::Error;

/// Node identifier (index into the arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// The document node
    pub const DOCUMENT: NodeId = NodeId(0);

    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug)]
enum NodeData {
    Document,
    Element(ElementData),
    Text(String),
}

#[derive(Debug)]
struct ElementData {
    /// Tag name in ASCII lowercase
    local_name: String,
    attrs: Vec<(String, String)>,
}

impl ElementData {
    fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(attr, _)| attr == name)
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    data: NodeData,
}

#[derive(Debug, Clone)]
struct RegisteredListener {
    event_type: String,
    listener: Listener<NodeId>,
    capture: bool,
}

type ParsedSelector = Result<Rc<SelectorList>, SelectorError>;

/// In-memory document tree
#[derive(Debug)]
pub struct Document {
    nodes: Vec<Node>,
    listeners: RefCell<HashMap<NodeId, Vec<RegisteredListener>>>,
    parsed: RefCell<HashMap<String, ParsedSelector>>,
}

impl Document {
    /// Create an empty document holding only the document node
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                parent: None,
                children: Vec::new(),
                data: NodeData::Document,
            }],
            listeners: RefCell::new(HashMap::new()),
            parsed: RefCell::new(HashMap::new()),
        }
    }

    /// The document node
    pub fn document(&self) -> NodeId {
        NodeId::DOCUMENT
    }

    /// Number of nodes, including the document node
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the document node is always present
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeData::Element(ElementData {
            local_name: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
        }))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.push(NodeData::Text(content.to_string()))
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            parent: None,
            children: Vec::new(),
            data,
        });
        id
    }

    fn node(&self, id: NodeId) -> Result<&Node, Error> {
        self.nodes.get(id.index()).ok_or(Error::UnknownNode)
    }

    fn element_data(&self, id: NodeId) -> Option<&ElementData> {
        match &self.nodes.get(id.index())?.data {
            NodeData::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Append `child` as the last child of `parent`, detaching it first
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), Error> {
        if matches!(self.node(parent)?.data, NodeData::Text(_)) {
            return Err(Error::Platform("text nodes cannot have children".to_string()));
        }
        if matches!(self.node(child)?.data, NodeData::Document) {
            return Err(Error::Platform("the document node cannot be appended".to_string()));
        }

        let mut ancestor = Some(parent);
        while let Some(node) = ancestor {
            if node == child {
                return Err(Error::Platform(
                    "cannot append a node to its own descendant".to_string(),
                ));
            }
            ancestor = self.nodes[node.index()].parent;
        }

        if let Some(old_parent) = self.nodes[child.index()].parent.take() {
            self.nodes[old_parent.index()]
                .children
                .retain(|&sibling| sibling != child);
        }
        self.nodes[child.index()].parent = Some(parent);
        self.nodes[parent.index()].children.push(child);
        Ok(())
    }

    /// Set an attribute on an element; names are stored lowercase
    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> Result<(), Error> {
        let element = match self.nodes.get_mut(node.index()) {
            Some(Node {
                data: NodeData::Element(element),
                ..
            }) => element,
            Some(_) => return Err(Error::Platform("attributes require an element".to_string())),
            None => return Err(Error::UnknownNode),
        };

        let name = name.to_ascii_lowercase();
        match element.attrs.iter_mut().find(|(attr, _)| *attr == name) {
            Some((_, existing)) => *existing = value.to_string(),
            None => element.attrs.push((name, value.to_string())),
        }
        Ok(())
    }

    /// Create an element with attributes and append it to `parent`
    pub fn element(
        &mut self,
        parent: NodeId,
        tag: &str,
        attrs: &[(&str, &str)],
    ) -> Result<NodeId, Error> {
        let element = self.create_element(tag);
        for (name, value) in attrs {
            self.set_attribute(element, name, value)?;
        }
        self.append_child(parent, element)?;
        Ok(element)
    }

    /// Parent node, including the document node
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.index())?.parent
    }

    /// Children in order
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(node.index())
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    /// Attribute value of an element
    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element_data(node)?.attr(&name.to_ascii_lowercase())
    }

    /// Text content of a text node
    pub fn text(&self, node: NodeId) -> Option<&str> {
        match &self.nodes.get(node.index())?.data {
            NodeData::Text(content) => Some(content),
            _ => None,
        }
    }

    /// First element in document order with the given id
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(NodeId::DOCUMENT)
            .into_iter()
            .find(|&node| self.element_data(node).and_then(|e| e.attr("id")) == Some(id))
    }

    /// Descendants of `root` in document order, excluding `root`
    fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(root).iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.children(node).iter().rev().copied());
        }
        out
    }

    fn parse_selector(&self, selector: &str) -> ParsedSelector {
        if let Some(parsed) = self.parsed.borrow().get(selector) {
            return parsed.clone();
        }
        let parsed = SelectorList::parse(selector).map(Rc::new);
        self.parsed
            .borrow_mut()
            .insert(selector.to_string(), parsed.clone());
        parsed
    }

    fn selector_list(&self, selector: &str) -> Result<Rc<SelectorList>, Error> {
        self.parse_selector(selector)
            .map_err(|source| Error::Selector {
                selector: selector.to_string(),
                source,
            })
    }

    /// Number of listeners for `event_type` attached on `target`
    pub fn listener_count(&self, target: &ListenerTarget<NodeId>, event_type: &str) -> usize {
        self.listeners
            .borrow()
            .get(&Self::listener_node(target))
            .map(|listeners| {
                listeners
                    .iter()
                    .filter(|registered| registered.event_type == event_type)
                    .count()
            })
            .unwrap_or(0)
    }

    fn listener_node(target: &ListenerTarget<NodeId>) -> NodeId {
        match target {
            ListenerTarget::Document => NodeId::DOCUMENT,
            ListenerTarget::Node(node) => *node,
        }
    }

    fn listeners_for(&self, node: NodeId, event_type: &str, capture: bool) -> Vec<Listener<NodeId>> {
        self.listeners
            .borrow()
            .get(&node)
            .map(|listeners| {
                listeners
                    .iter()
                    .filter(|registered| {
                        registered.capture == capture && registered.event_type == event_type
                    })
                    .map(|registered| registered.listener.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn invoke(&self, node: NodeId, event: &DomEvent<NodeId>, capture: bool) {
        for listener in self.listeners_for(node, event.event_type(), capture) {
            listener.call(event);
        }
    }

    /// Dispatch `event` through the capture, target and bubble phases.
    ///
    /// Returns `false` if a listener prevented the default action.
    pub fn dispatch_event(&self, event: &DomEvent<NodeId>) -> bool {
        let target = *event.target();
        let mut path = Vec::new();
        let mut cursor = self.parent(target);
        while let Some(node) = cursor {
            path.push(node);
            cursor = self.parent(node);
        }
        path.reverse();

        log::trace!(
            "dispatching `{}` to {:?} through {} ancestors",
            event.event_type(),
            target,
            path.len()
        );

        // Capture phase, root first.
        for &node in &path {
            self.invoke(node, event, true);
            if event.is_propagation_stopped() {
                return !event.is_default_prevented();
            }
        }

        // Target phase: capture listeners first.
        self.invoke(target, event, true);
        if event.is_propagation_stopped() {
            return !event.is_default_prevented();
        }
        self.invoke(target, event, false);

        // Bubble phase.
        if event.bubbles() {
            for &node in path.iter().rev() {
                if event.is_propagation_stopped() {
                    break;
                }
                self.invoke(node, event, false);
            }
        }

        !event.is_default_prevented()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// An element of a [`Document`] as the selector matcher sees it
#[derive(Clone, Copy)]
struct ElementRef<'a> {
    doc: &'a Document,
    id: NodeId,
    node: &'a Node,
    data: &'a ElementData,
}

impl fmt::Debug for ElementRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementRef")
            .field("id", &self.id)
            .field("local_name", &self.data.local_name)
            .finish_non_exhaustive()
    }
}

impl<'a> ElementRef<'a> {
    /// Wrap `id`, which must name an element
    fn new(doc: &'a Document, id: NodeId) -> Option<Self> {
        let node = doc.nodes.get(id.index())?;
        match &node.data {
            NodeData::Element(data) => Some(Self {
                doc,
                id,
                node,
                data,
            }),
            _ => None,
        }
    }

    fn siblings(&self) -> &'a [NodeId] {
        self.node
            .parent
            .map(|parent| self.doc.children(parent))
            .unwrap_or(&[])
    }

    fn position(&self) -> Option<usize> {
        self.siblings().iter().position(|&sibling| sibling == self.id)
    }

    fn first_element<I>(&self, nodes: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a NodeId>,
    {
        nodes
            .into_iter()
            .find_map(|&node| ElementRef::new(self.doc, node))
    }
}

impl selectors::Element for ElementRef<'_> {
    type Impl = SelectorImpl;

    fn opaque(&self) -> OpaqueElement {
        OpaqueElement::new(self.node)
    }

    fn parent_element(&self) -> Option<Self> {
        ElementRef::new(self.doc, self.node.parent?)
    }

    fn parent_node_is_shadow_root(&self) -> bool {
        false
    }

    fn containing_shadow_host(&self) -> Option<Self> {
        None
    }

    fn is_pseudo_element(&self) -> bool {
        false
    }

    fn prev_sibling_element(&self) -> Option<Self> {
        let position = self.position()?;
        self.first_element(self.siblings()[..position].iter().rev())
    }

    fn next_sibling_element(&self) -> Option<Self> {
        let position = self.position()?;
        self.first_element(&self.siblings()[position + 1..])
    }

    fn first_element_child(&self) -> Option<Self> {
        self.first_element(&self.node.children)
    }

    fn is_html_element_in_html_document(&self) -> bool {
        true
    }

    fn has_local_name(&self, local_name: &str) -> bool {
        self.data.local_name == local_name
    }

    fn has_namespace(&self, _ns: &()) -> bool {
        true
    }

    fn is_same_type(&self, other: &Self) -> bool {
        self.data.local_name == other.data.local_name
    }

    fn attr_matches(
        &self,
        _ns: &NamespaceConstraint<&()>,
        local_name: &CssIdent,
        operation: &AttrSelectorOperation<&CssString>,
    ) -> bool {
        self.data
            .attr(&local_name.0.to_ascii_lowercase())
            .is_some_and(|value| operation.eval_str(value))
    }

    fn match_non_ts_pseudo_class(
        &self,
        pc: &NonTSPseudoClass,
        _context: &mut MatchingContext<SelectorImpl>,
    ) -> bool {
        match *pc {}
    }

    fn match_pseudo_element(
        &self,
        pe: &PseudoElement,
        _context: &mut MatchingContext<SelectorImpl>,
    ) -> bool {
        match *pe {}
    }

    fn apply_selector_flags(&self, _flags: ElementSelectorFlags) {}

    fn is_link(&self) -> bool {
        matches!(self.data.local_name.as_str(), "a" | "area" | "link")
            && self.data.attr("href").is_some()
    }

    fn is_html_slot_element(&self) -> bool {
        false
    }

    fn has_id(&self, id: &CssIdent, case_sensitivity: CaseSensitivity) -> bool {
        self.data
            .attr("id")
            .is_some_and(|value| case_sensitivity.eq(value.as_bytes(), id.0.as_bytes()))
    }

    fn has_class(&self, name: &CssIdent, case_sensitivity: CaseSensitivity) -> bool {
        self.data.attr("class").is_some_and(|classes| {
            classes
                .split_whitespace()
                .any(|class| case_sensitivity.eq(class.as_bytes(), name.0.as_bytes()))
        })
    }

    fn imported_part(&self, _name: &CssIdent) -> Option<CssIdent> {
        None
    }

    fn is_part(&self, _name: &CssIdent) -> bool {
        false
    }

    fn is_empty(&self) -> bool {
        self.node.children.iter().all(|&child| {
            match self.doc.nodes.get(child.index()).map(|node| &node.data) {
                Some(NodeData::Text(content)) => content.is_empty(),
                Some(NodeData::Element(_)) => false,
                Some(NodeData::Document) | None => true,
            }
        })
    }

    fn is_root(&self) -> bool {
        self.node.parent == Some(NodeId::DOCUMENT)
    }
}

impl Dom for Document {
    type Node = NodeId;

    fn node_type(&self, node: &NodeId) -> NodeType {
        match self.nodes.get(node.index()).map(|node| &node.data) {
            Some(NodeData::Element(_)) => NodeType::Element,
            Some(NodeData::Document) => NodeType::Document,
            Some(NodeData::Text(_)) | None => NodeType::Text,
        }
    }

    fn parent_element(&self, node: &NodeId) -> Option<NodeId> {
        self.parent(*node)
            .filter(|&parent| self.element_data(parent).is_some())
    }

    fn node_name(&self, node: &NodeId) -> Cow<'_, str> {
        match self.nodes.get(node.index()).map(|node| &node.data) {
            Some(NodeData::Element(element)) => Cow::Owned(element.local_name.to_ascii_uppercase()),
            Some(NodeData::Document) => Cow::Borrowed("#document"),
            Some(NodeData::Text(_)) | None => Cow::Borrowed("#text"),
        }
    }

    fn element_id(&self, node: &NodeId) -> Option<Cow<'_, str>> {
        self.element_data(*node)?.attr("id").map(Cow::Borrowed)
    }

    fn class_name(&self, node: &NodeId) -> Option<Cow<'_, str>> {
        self.element_data(*node)?.attr("class").map(Cow::Borrowed)
    }

    fn matches_selector(&self, node: &NodeId, selector: &str) -> Result<bool, Error> {
        let list = self.selector_list(selector)?;
        Ok(ElementRef::new(self, *node).is_some_and(|element| list.matches(&element)))
    }

    fn query_selector_all(&self, root: &NodeId, selector: &str) -> Result<Vec<NodeId>, Error> {
        self.node(*root)?;
        let list = self.selector_list(selector)?;
        Ok(self
            .descendants(*root)
            .into_iter()
            .filter(|&node| {
                ElementRef::new(self, node).is_some_and(|element| list.matches(&element))
            })
            .collect())
    }

    fn query_document(&self, selector: &str) -> Result<Vec<NodeId>, Error> {
        self.query_selector_all(&NodeId::DOCUMENT, selector)
    }
}

impl EventHost for Document {
    fn add_listener(
        &self,
        target: &ListenerTarget<NodeId>,
        event_type: &str,
        listener: &Listener<NodeId>,
        options: ListenerOptions,
    ) -> Result<(), Error> {
        let node = Self::listener_node(target);
        self.node(node)?;

        let mut listeners = self.listeners.borrow_mut();
        let registered = listeners.entry(node).or_default();
        let duplicate = registered.iter().any(|existing| {
            existing.capture == options.capture
                && existing.event_type == event_type
                && existing.listener == *listener
        });
        if !duplicate {
            registered.push(RegisteredListener {
                event_type: event_type.to_string(),
                listener: listener.clone(),
                capture: options.capture,
            });
        }
        Ok(())
    }

    fn remove_listener(
        &self,
        target: &ListenerTarget<NodeId>,
        event_type: &str,
        listener: &Listener<NodeId>,
        options: ListenerOptions,
    ) -> Result<(), Error> {
        let node = Self::listener_node(target);
        self.node(node)?;

        let mut listeners = self.listeners.borrow_mut();
        if let Some(registered) = listeners.get_mut(&node) {
            if let Some(position) = registered.iter().position(|existing| {
                existing.capture == options.capture
                    && existing.event_type == event_type
                    && existing.listener == *listener
            }) {
                registered.remove(position);
            }
            if registered.is_empty() {
                listeners.remove(&node);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Document, NodeId, NodeId, NodeId) {
        let mut doc = Document::new();
        let html = doc.element(NodeId::DOCUMENT, "html", &[]).unwrap();
        let list = doc
            .element(html, "ul", &[("id", "menu"), ("class", "nav main")])
            .unwrap();
        let first = doc.element(list, "li", &[("class", "item")]).unwrap();
        let text = doc.create_text("between");
        doc.append_child(list, text).unwrap();
        let second = doc
            .element(list, "LI", &[("class", "item last"), ("data-x", "1")])
            .unwrap();
        (doc, list, first, second)
    }

    #[test]
    fn test_tree_building() {
        let (doc, list, first, second) = sample();
        assert_eq!(doc.parent(first), Some(list));
        assert_eq!(doc.children(list).len(), 3);
        assert_eq!(doc.get_element_by_id("menu"), Some(list));
        assert_eq!(doc.attribute(second, "DATA-X"), Some("1"));
        assert_eq!(doc.node_name(&second), "LI");
        assert_eq!(doc.node_type(&NodeId::DOCUMENT), NodeType::Document);
    }

    #[test]
    fn test_append_rejects_cycles() {
        let (mut doc, list, first, _) = sample();
        assert!(doc.append_child(first, list).is_err());
        assert!(doc.append_child(list, NodeId::DOCUMENT).is_err());
        assert!(matches!(
            doc.append_child(list, NodeId(999)),
            Err(Error::UnknownNode)
        ));
    }

    #[test]
    fn test_matches_selector() {
        let (doc, list, first, second) = sample();
        assert!(doc.matches_selector(&first, "li.item").unwrap());
        assert!(doc.matches_selector(&first, "#menu > .item").unwrap());
        assert!(doc.matches_selector(&second, "html li").unwrap());
        assert!(doc.matches_selector(&second, ".item + li").unwrap());
        assert!(doc.matches_selector(&second, "li ~ .last").unwrap());
        assert!(doc.matches_selector(&second, "[data-x=\"1\"]").unwrap());
        assert!(doc.matches_selector(&list, "UL.nav.main").unwrap());
        assert!(!doc.matches_selector(&first, ".item + li").unwrap());
        assert!(!doc.matches_selector(&first, "ul").unwrap());
        assert!(!doc.matches_selector(&NodeId::DOCUMENT, "*").unwrap());
        assert!(doc.matches_selector(&first, "li:first-child").unwrap());
        assert!(!doc.matches_selector(&second, "li:first-child").unwrap());
        assert!(doc.matches_selector(&second, "li:not(:first-child)").unwrap());
        assert!(doc.matches_selector(&second, "[class~=last][data-x^='1']").unwrap());
        assert!(doc.matches_selector(&list, ":root > ul").unwrap());
        assert!(doc.matches_selector(&first, "li:hover").is_err());
    }

    #[test]
    fn test_matches_escaped_names() {
        let mut doc = Document::new();
        let node = doc
            .element(NodeId::DOCUMENT, "div", &[("id", "a:b"), ("class", "x.y")])
            .unwrap();
        assert!(doc.matches_selector(&node, "#a\\:b").unwrap());
        assert!(doc.matches_selector(&node, ".x\\.y").unwrap());
        assert!(!doc.matches_selector(&node, ".x").unwrap());
    }

    #[test]
    fn test_query_selector_all_document_order() {
        let (doc, list, first, second) = sample();
        assert_eq!(doc.query_document("li, ul").unwrap(), vec![list, first, second]);
        assert_eq!(doc.query_selector_all(&list, "li").unwrap(), vec![first, second]);
        assert!(doc.query_selector_all(&list, "ul").unwrap().is_empty());
        assert!(doc.query_document("li >").is_err());
    }

    #[test]
    fn test_dispatch_phases_and_stop_propagation() {
        let (doc, list, first, _) = sample();
        let log = Rc::new(RefCell::new(Vec::new()));

        let record = |label: &'static str| {
            let log = log.clone();
            Listener::new(move |_event: &DomEvent<NodeId>| log.borrow_mut().push(label))
        };

        let doc_capture = record("document-capture");
        let list_bubble = record("list-bubble");
        let target_bubble = record("target-bubble");
        doc.add_listener(&ListenerTarget::Document, "click", &doc_capture, ListenerOptions::capture())
            .unwrap();
        doc.add_listener(&ListenerTarget::Node(list), "click", &list_bubble, ListenerOptions::default())
            .unwrap();
        doc.add_listener(&ListenerTarget::Node(first), "click", &target_bubble, ListenerOptions::default())
            .unwrap();

        doc.dispatch_event(&DomEvent::new("click", first));
        assert_eq!(
            *log.borrow(),
            vec!["document-capture", "target-bubble", "list-bubble"]
        );

        log.borrow_mut().clear();
        doc.dispatch_event(&DomEvent::new("focus", first));
        assert!(log.borrow().is_empty());

        let stopper = Listener::new(|event: &DomEvent<NodeId>| event.stop_propagation());
        doc.add_listener(&ListenerTarget::Node(first), "click", &stopper, ListenerOptions::default())
            .unwrap();
        doc.dispatch_event(&DomEvent::new("click", first));
        assert_eq!(*log.borrow(), vec!["document-capture", "target-bubble"]);
    }

    #[test]
    fn test_listener_identity_and_removal() {
        let (doc, list, _, _) = sample();
        let listener = Listener::new(|_event: &DomEvent<NodeId>| {});
        let target = ListenerTarget::Node(list);

        doc.add_listener(&target, "click", &listener, ListenerOptions::default())
            .unwrap();
        doc.add_listener(&target, "click", &listener.clone(), ListenerOptions::default())
            .unwrap();
        assert_eq!(doc.listener_count(&target, "click"), 1);

        doc.remove_listener(&target, "click", &listener, ListenerOptions::capture())
            .unwrap();
        assert_eq!(doc.listener_count(&target, "click"), 1);

        doc.remove_listener(&target, "click", &listener, ListenerOptions::default())
            .unwrap();
        assert_eq!(doc.listener_count(&target, "click"), 0);
    }

    #[test]
    fn test_prevent_default_reported() {
        let (doc, _, first, _) = sample();
        let listener = Listener::new(|event: &DomEvent<NodeId>| event.prevent_default());
        doc.add_listener(&ListenerTarget::Document, "submit", &listener, ListenerOptions::default())
            .unwrap();
        assert!(!doc.dispatch_event(&DomEvent::new("submit", first)));
        assert!(doc.dispatch_event(&DomEvent::new("submit", first).with_cancelable(false)));
    }
}
