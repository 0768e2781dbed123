//! Node abstraction and the headless host.
//!
//! [`GenericNode`] is the contract between components and whatever host ultimately owns the
//! tree. [`HeadlessNode`] is the only host shipped here: it keeps the tree in memory, renders it
//! to an HTML string and delivers events synchronously, one at a time.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use ahash::AHashSet;
use html_escape::{encode_double_quoted_attribute, encode_text};
use indexmap::IndexMap;
use once_cell::sync::Lazy;

/// Elements that render without a closing tag.
static VOID_ELEMENTS: Lazy<AHashSet<&'static str>> = Lazy::new(|| {
    [
        "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
        "source", "track", "wbr",
    ]
    .iter()
    .copied()
    .collect()
});

type EventHandler<'a> = Rc<RefCell<Box<dyn FnMut() + 'a>>>;

/// Abstraction over a rendering host.
///
/// Effects update nodes in place through this trait; the tree description itself is never
/// diffed.
pub trait GenericNode<'a>: Clone + PartialEq + Eq + 'a {
    /// Create a new element node.
    fn element(tag: &str) -> Self;

    /// Create a new text node.
    fn text_node(text: &str) -> Self;

    /// Append a child node to this node's children.
    fn append_child(&self, child: &Self);

    /// Set an attribute on this node. No-op on text nodes.
    fn set_attribute(&self, name: &str, value: &str);

    /// Bind an event handler to this node. No-op on text nodes.
    fn event(&self, name: &str, handler: Box<dyn FnMut() + 'a>);

    /// Replace the text content of this node. No-op on element nodes.
    fn update_text(&self, text: &str);
}

enum NodeKind<'a> {
    Element {
        tag: String,
        attributes: IndexMap<String, String>,
        handlers: Vec<(String, EventHandler<'a>)>,
    },
    Text(String),
}

struct NodeInner<'a> {
    kind: NodeKind<'a>,
    children: Vec<HeadlessNode<'a>>,
}

/// An in-memory node. Cloning a [`HeadlessNode`] clones the reference, not the node itself.
#[derive(Clone)]
pub struct HeadlessNode<'a>(Rc<RefCell<NodeInner<'a>>>);

impl<'a> PartialEq for HeadlessNode<'a> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<'a> Eq for HeadlessNode<'a> {}

impl<'a> GenericNode<'a> for HeadlessNode<'a> {
    fn element(tag: &str) -> Self {
        Self(Rc::new(RefCell::new(NodeInner {
            kind: NodeKind::Element {
                tag: tag.to_string(),
                attributes: IndexMap::new(),
                handlers: Vec::new(),
            },
            children: Vec::new(),
        })))
    }

    fn text_node(text: &str) -> Self {
        Self(Rc::new(RefCell::new(NodeInner {
            kind: NodeKind::Text(text.to_string()),
            children: Vec::new(),
        })))
    }

    fn append_child(&self, child: &Self) {
        self.0.borrow_mut().children.push(child.clone());
    }

    fn set_attribute(&self, name: &str, value: &str) {
        if let NodeKind::Element { attributes, .. } = &mut self.0.borrow_mut().kind {
            attributes.insert(name.to_string(), value.to_string());
        }
    }

    fn event(&self, name: &str, handler: Box<dyn FnMut() + 'a>) {
        if let NodeKind::Element { handlers, .. } = &mut self.0.borrow_mut().kind {
            handlers.push((name.to_string(), Rc::new(RefCell::new(handler))));
        }
    }

    fn update_text(&self, text: &str) {
        if let NodeKind::Text(t) = &mut self.0.borrow_mut().kind {
            *t = text.to_string();
        }
    }
}

impl<'a> HeadlessNode<'a> {
    /// Delivers an event to this node, running every matching handler to completion before
    /// returning. Events are never queued or interleaved.
    pub fn dispatch(&self, event: &str) {
        let handlers = match &self.0.borrow().kind {
            NodeKind::Element { handlers, .. } => handlers
                .iter()
                .filter(|(name, _)| name.as_str() == event)
                .map(|(_, cb)| Rc::clone(cb))
                .collect::<Vec<_>>(),
            NodeKind::Text(_) => Vec::new(),
        };
        for cb in handlers {
            (&mut **cb.borrow_mut())();
        }
    }

    /// Shorthand for dispatching a `click` event.
    pub fn click(&self) {
        self.dispatch("click");
    }

    /// Returns all descendant elements with the given tag, in document order.
    pub fn query_all(&self, tag: &str) -> Vec<HeadlessNode<'a>> {
        let mut out = Vec::new();
        self.collect_tag(tag, &mut out);
        out
    }

    fn collect_tag(&self, tag: &str, out: &mut Vec<HeadlessNode<'a>>) {
        for child in &self.0.borrow().children {
            if let NodeKind::Element { tag: t, .. } = &child.0.borrow().kind {
                if t == tag {
                    out.push(child.clone());
                }
            }
            child.collect_tag(tag, out);
        }
    }

    /// Concatenation of all text in this subtree.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        let inner = self.0.borrow();
        if let NodeKind::Text(text) = &inner.kind {
            out.push_str(text);
        }
        for child in &inner.children {
            child.collect_text(out);
        }
    }

    /// Renders this node (tag included) to an HTML string.
    pub fn render_to_string(&self) -> String {
        let mut out = String::new();
        self.write_node(&mut out);
        out
    }

    /// Renders the children of this node to an HTML string.
    pub fn inner_html(&self) -> String {
        let mut out = String::new();
        for child in &self.0.borrow().children {
            child.write_node(&mut out);
        }
        out
    }

    fn write_node(&self, out: &mut String) {
        let inner = self.0.borrow();
        match &inner.kind {
            NodeKind::Text(text) => out.push_str(&encode_text(text)),
            NodeKind::Element {
                tag, attributes, ..
            } => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in attributes {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&encode_double_quoted_attribute(value));
                    out.push('"');
                }
                if VOID_ELEMENTS.contains(tag.as_str()) {
                    out.push_str("/>");
                } else {
                    out.push('>');
                    for child in &inner.children {
                        child.write_node(out);
                    }
                    out.push_str("</");
                    out.push_str(tag);
                    out.push('>');
                }
            }
        }
    }
}

impl<'a> fmt::Debug for HeadlessNode<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_to_string())
    }
}
