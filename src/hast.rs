// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! An HTML syntax tree.
//!
//! The tree is shaped after [hast], the syntax tree used by the unified
//! family of document processors: a [`Root`] holds an ordered sequence of
//! [`Element`], [`Text`], [`Comment`], and [`Doctype`] nodes, and elements
//! hold further children of their own.
//!
//! Children are owned by their parent, so a node can never have more than
//! one parent and no cycles can be introduced into the tree.
//!
//! [hast]: https://github.com/syntax-tree/hast

pub mod parse;
pub mod serialize;
pub mod text;
pub mod visit;

pub use parse::{FragmentParser, ParseError};
pub use serialize::to_html;
pub use text::to_string;
pub use visit::{Visitable, VisitableMut, Visitor, VisitorMut, Walk, visit_elements_mut};

use itertools::Itertools;
use std::collections::BTreeMap;
use std::collections::btree_map;

/// A node in an HTML syntax tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    /// The root of a document or fragment.
    Root(Root),

    /// An HTML element, such as `<code>`.
    Element(Element),

    /// Character data.
    Text(Text),

    /// An HTML comment.
    Comment(Comment),

    /// A document type declaration.
    Doctype(Doctype),
}

impl Node {
    /// Creates a new root node containing `children`.
    pub fn root(children: Vec<Node>) -> Self {
        Node::Root(Root { children })
    }

    /// Creates a new text node.
    pub fn text(value: impl Into<String>) -> Self {
        Node::Text(Text {
            value: value.into(),
        })
    }

    /// Creates a new comment node.
    pub fn comment(value: impl Into<String>) -> Self {
        Node::Comment(Comment {
            value: value.into(),
        })
    }

    /// The node's children, if it is a kind of node that can have children.
    pub fn children(&self) -> Option<&Vec<Node>> {
        match self {
            Node::Root(Root { children }) | Node::Element(Element { children, .. }) => {
                Some(children)
            }
            _ => None,
        }
    }

    /// Mutable access to the node's children, if it can have them.
    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Root(Root { children }) | Node::Element(Element { children, .. }) => {
                Some(children)
            }
            _ => None,
        }
    }

    /// Returns the node as an element, if it is one.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Consumes the node, returning its children.
    ///
    /// Nodes that cannot have children return an empty vector.
    pub fn into_children(self) -> Vec<Node> {
        match self {
            Node::Root(Root { children }) | Node::Element(Element { children, .. }) => children,
            _ => Vec::new(),
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

/// The root of a tree.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Root {
    pub children: Vec<Node>,
}

/// An HTML element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Element {
    /// Lowercase tag name, such as `code` or `div`.
    pub tag_name: String,

    /// The element's attributes.
    pub properties: Properties,

    /// The element's children, in document order.
    pub children: Vec<Node>,
}

impl Element {
    /// Creates a new element with no attributes and no children.
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            properties: Properties::default(),
            children: Vec::new(),
        }
    }

    /// Sets an attribute on the element.
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(name, value);
        self
    }

    /// Appends a child to the element.
    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    /// True if the element's tag name is `tag_name`.
    ///
    /// Tag names are compared case-insensitively.
    pub fn is(&self, tag_name: &str) -> bool {
        self.tag_name.eq_ignore_ascii_case(tag_name)
    }

    /// True if `class_name` is one of the element's classes.
    ///
    /// # Examples
    ///
    /// ```
    /// use pseudomark::hast::Element;
    /// let code = Element::new("code").with_property("class", "language-pseudo numbered");
    /// assert!(code.has_class("language-pseudo"));
    /// assert!(!code.has_class("language-rust"));
    /// ```
    pub fn has_class(&self, class_name: &str) -> bool {
        self.properties.class_names().any(|c| c == class_name)
    }
}

/// Character data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Text {
    pub value: String,
}

/// An HTML comment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Comment {
    pub value: String,
}

/// A document type declaration, such as `<!DOCTYPE html>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Doctype {
    pub name: String,
}

/// An element's attributes, keyed by attribute name.
///
/// Names are unique. Iteration order is alphabetical by name, which keeps
/// serialized output stable.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Properties(BTreeMap<String, String>);

impl Properties {
    /// Sets `name` to `value`, replacing any existing value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    /// The value of the attribute `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Removes every attribute.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, String> {
        self.0.iter()
    }

    /// The element's classes: the whitespace-separated tokens of its
    /// `class` attribute.
    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.get("class")
            .into_iter()
            .flat_map(str::split_ascii_whitespace)
            .unique()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Properties {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<'a> IntoIterator for &'a Properties {
    type Item = (&'a String, &'a String);
    type IntoIter = btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
