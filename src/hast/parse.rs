// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Parses HTML markup into syntax trees.
//!
//! Parsing is done by [html5ever], so markup is interpreted exactly the way
//! a browser would interpret it, implied end tags and all. html5ever builds
//! the tree through a [`TreeSink`]; [`DomSink`] collects it into reference
//! counted nodes that are then converted into an owned [`Node`] tree.
//!
//! [html5ever]: https://docs.rs/html5ever

use crate::hast::{Doctype, Element, Node, Properties};
use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::tree_builder::{ElementFlags, NodeOrText, QuirksMode, TreeSink};
use html5ever::{Attribute, ParseOpts, QualName, local_name, ns, parse_document};
use log::{debug, trace};
use std::borrow::Cow;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use thiserror::Error;

/// Indicates that markup could not be interpreted as a syntax tree.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// The markup is not well-formed HTML. Only reported by strict parsers.
    #[error("malformed markup: {}", .0.join("; "))]
    Malformed(Vec<String>),
}

/// Parses markup fragments: markup that is not wrapped in `<html>` and
/// `<body>` tags.
///
/// By default the parser is lenient, like a browser, and recovers from
/// malformed markup. A [strict](FragmentParser::strict) parser instead
/// rejects any markup html5ever reports errors for.
#[derive(Clone, Debug, Default)]
pub struct FragmentParser {
    strict: bool,
}

impl FragmentParser {
    /// Creates a new lenient fragment parser.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new fragment parser that rejects malformed markup.
    pub fn strict() -> Self {
        Self { strict: true }
    }

    /// Parses `markup` into a [`Node::Root`] holding the fragment's nodes.
    ///
    /// No implicit `<html>`, `<head>`, or `<body>` elements appear in the
    /// result.
    ///
    /// # Examples
    ///
    /// ```
    /// use pseudomark::hast::{FragmentParser, Node, Element};
    ///
    /// let root = FragmentParser::new().parse("<div>RENDERED</div>").unwrap();
    /// let expected = Node::root(vec![Element::new("div").with_child(Node::text("RENDERED")).into()]);
    /// assert_eq!(root, expected);
    /// ```
    pub fn parse(&self, markup: &str) -> Result<Node, ParseError> {
        let wrapped = format!("<!DOCTYPE html><html><head></head><body>{markup}</body></html>");
        let sink = parse(&wrapped);

        if self.strict && !sink.errors.borrow().is_empty() {
            let errors = sink.errors.take().into_iter().map(String::from).collect();
            return Err(ParseError::Malformed(errors));
        }

        // The wrapper always yields a body.
        let body = find_element(&sink.document, &local_name!("body"))
            .unwrap_or_else(|| Rc::clone(&sink.document));
        let children = body.children.borrow().iter().filter_map(convert).collect();
        Ok(Node::root(children))
    }
}

fn parse(markup: &str) -> DomSink {
    let sink = parse_document(DomSink::new(), ParseOpts::default()).one(markup);
    let errors = sink.errors.borrow().len();
    if errors > 0 {
        debug!("html5ever recovered from {errors} parse error(s)");
    }
    sink
}

fn find_element(handle: &Handle, local: &html5ever::LocalName) -> Option<Handle> {
    if let SinkData::Element { name, .. } = &handle.data
        && name.local == *local
    {
        return Some(Rc::clone(handle));
    }
    handle
        .children
        .borrow()
        .iter()
        .find_map(|child| find_element(child, local))
}

fn convert(handle: &Handle) -> Option<Node> {
    match &handle.data {
        SinkData::Document => Some(Node::root(
            handle.children.borrow().iter().filter_map(convert).collect(),
        )),
        SinkData::Doctype { name } => Some(Node::Doctype(Doctype { name: name.clone() })),
        SinkData::Text(text) => Some(Node::text(text.borrow().as_str())),
        SinkData::Comment(text) => Some(Node::comment(text.as_str())),
        SinkData::Element { name, attrs } => {
            let properties: Properties = attrs
                .borrow()
                .iter()
                .map(|attr| (attribute_name(&attr.name), attr.value.to_string()))
                .collect();
            Some(Node::Element(Element {
                tag_name: name.local.to_string(),
                properties,
                children: handle.children.borrow().iter().filter_map(convert).collect(),
            }))
        }
        SinkData::ProcessingInstruction => None,
    }
}

fn attribute_name(name: &QualName) -> String {
    match &name.prefix {
        Some(prefix) => format!("{prefix}:{}", name.local),
        None => name.local.to_string(),
    }
}

type Handle = Rc<SinkNode>;

#[derive(Debug)]
struct SinkNode {
    data: SinkData,
    parent: RefCell<Option<Weak<SinkNode>>>,
    children: RefCell<Vec<Handle>>,
}

#[derive(Debug)]
enum SinkData {
    Document,
    Doctype { name: String },
    Text(RefCell<String>),
    Comment(String),
    ProcessingInstruction,
    Element {
        name: QualName,
        attrs: RefCell<Vec<Attribute>>,
    },
}

impl SinkNode {
    fn new(data: SinkData) -> Handle {
        Rc::new(Self {
            data,
            parent: RefCell::new(None),
            children: RefCell::new(Vec::new()),
        })
    }

    fn parent(&self) -> Option<Handle> {
        self.parent.borrow().as_ref().and_then(Weak::upgrade)
    }

    /// Index of `child` in this node's children.
    fn position_of(&self, child: &Handle) -> Option<usize> {
        self.children
            .borrow()
            .iter()
            .position(|c| Rc::ptr_eq(c, child))
    }
}

fn append_child(parent: &Handle, child: Handle) {
    detach(&child);
    *child.parent.borrow_mut() = Some(Rc::downgrade(parent));
    parent.children.borrow_mut().push(child);
}

fn detach(node: &Handle) {
    if let Some(parent) = node.parent.take().and_then(|weak| weak.upgrade())
        && let Some(i) = parent.position_of(node)
    {
        parent.children.borrow_mut().remove(i);
    }
}

/// Appends `text` to `existing` if it is a text node, so adjacent character
/// data ends up in a single node.
fn merge_text(existing: Option<&Handle>, text: &str) -> bool {
    match existing.map(|node| &node.data) {
        Some(SinkData::Text(value)) => {
            value.borrow_mut().push_str(text);
            true
        }
        _ => false,
    }
}

/// A [`TreeSink`] that collects html5ever's output into [`SinkNode`]s.
///
/// html5ever drives the sink through `&self`, so nodes use interior
/// mutability.
struct DomSink {
    document: Handle,
    errors: RefCell<Vec<Cow<'static, str>>>,
}

impl DomSink {
    fn new() -> Self {
        Self {
            document: SinkNode::new(SinkData::Document),
            errors: RefCell::new(Vec::new()),
        }
    }
}

impl TreeSink for DomSink {
    type Handle = Handle;
    type Output = Self;
    type ElemName<'a>
        = &'a QualName
    where
        Self: 'a;

    fn finish(self) -> Self::Output {
        self
    }

    fn parse_error(&self, msg: Cow<'static, str>) {
        trace!("parse error: {msg}");
        self.errors.borrow_mut().push(msg);
    }

    fn get_document(&self) -> Self::Handle {
        Rc::clone(&self.document)
    }

    fn elem_name<'a>(&'a self, target: &'a Self::Handle) -> Self::ElemName<'a> {
        static EMPTY: QualName = QualName {
            prefix: None,
            ns: ns!(),
            local: local_name!(""),
        };

        match &target.data {
            SinkData::Element { name, .. } => name,
            _ => &EMPTY,
        }
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<Attribute>,
        _flags: ElementFlags,
    ) -> Self::Handle {
        SinkNode::new(SinkData::Element {
            name,
            attrs: RefCell::new(attrs),
        })
    }

    fn create_comment(&self, text: StrTendril) -> Self::Handle {
        SinkNode::new(SinkData::Comment(text.to_string()))
    }

    fn create_pi(&self, _target: StrTendril, _data: StrTendril) -> Self::Handle {
        SinkNode::new(SinkData::ProcessingInstruction)
    }

    fn append(&self, parent: &Self::Handle, child: NodeOrText<Self::Handle>) {
        match child {
            NodeOrText::AppendNode(node) => append_child(parent, node),
            NodeOrText::AppendText(text) => {
                let merged = merge_text(parent.children.borrow().last(), &text);
                if !merged {
                    append_child(parent, SinkNode::new(SinkData::Text(RefCell::new(text.to_string()))));
                }
            }
        }
    }

    fn append_based_on_parent_node(
        &self,
        element: &Self::Handle,
        prev_element: &Self::Handle,
        child: NodeOrText<Self::Handle>,
    ) {
        if element.parent().is_some() {
            self.append_before_sibling(element, child);
        } else {
            self.append(prev_element, child);
        }
    }

    fn append_doctype_to_document(
        &self,
        name: StrTendril,
        _public_id: StrTendril,
        _system_id: StrTendril,
    ) {
        let doctype = SinkNode::new(SinkData::Doctype {
            name: name.to_string(),
        });
        append_child(&self.document, doctype);
    }

    fn get_template_contents(&self, target: &Self::Handle) -> Self::Handle {
        Rc::clone(target)
    }

    fn same_node(&self, x: &Self::Handle, y: &Self::Handle) -> bool {
        Rc::ptr_eq(x, y)
    }

    fn set_quirks_mode(&self, _mode: QuirksMode) {}

    fn append_before_sibling(&self, sibling: &Self::Handle, new_node: NodeOrText<Self::Handle>) {
        let Some(parent) = sibling.parent() else {
            return;
        };
        let Some(i) = parent.position_of(sibling) else {
            return;
        };

        let child = match new_node {
            NodeOrText::AppendText(text) => {
                let previous = if i > 0 {
                    parent.children.borrow().get(i - 1).cloned()
                } else {
                    None
                };
                if merge_text(previous.as_ref(), &text) {
                    return;
                }
                SinkNode::new(SinkData::Text(RefCell::new(text.to_string())))
            }
            NodeOrText::AppendNode(node) => {
                detach(&node);
                node
            }
        };

        // Detaching may have shifted the sibling, so look it up again.
        let i = parent.position_of(sibling).unwrap_or(i);
        *child.parent.borrow_mut() = Some(Rc::downgrade(&parent));
        parent.children.borrow_mut().insert(i, child);
    }

    fn add_attrs_if_missing(&self, target: &Self::Handle, attrs: Vec<Attribute>) {
        if let SinkData::Element {
            attrs: existing, ..
        } = &target.data
        {
            let mut existing = existing.borrow_mut();
            for attr in attrs {
                if !existing.iter().any(|a| a.name == attr.name) {
                    existing.push(attr);
                }
            }
        }
    }

    fn remove_from_parent(&self, target: &Self::Handle) {
        detach(target);
    }

    fn reparent_children(&self, node: &Self::Handle, new_parent: &Self::Handle) {
        let children = node.children.take();
        for child in children {
            *child.parent.borrow_mut() = Some(Rc::downgrade(new_parent));
            new_parent.children.borrow_mut().push(child);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hast::Element;
    use pretty_assertions::assert_eq;

    #[test]
    fn it_parses_a_fragment_without_wrapping_it() {
        let root = FragmentParser::new().parse("<div>RENDERED</div>").unwrap();
        assert_eq!(
            root,
            Node::root(vec![
                Element::new("div")
                    .with_child(Node::text("RENDERED"))
                    .into()
            ])
        );
    }

    #[test]
    fn it_parses_sibling_nodes() {
        let root = FragmentParser::new()
            .parse("<p>one</p>two<!--three-->")
            .unwrap();
        assert_eq!(
            root,
            Node::root(vec![
                Element::new("p").with_child(Node::text("one")).into(),
                Node::text("two"),
                Node::comment("three"),
            ])
        );
    }

    #[test]
    fn it_parses_attributes() {
        let root = FragmentParser::new()
            .parse(r#"<span class="ps-keyword bold" id="k1">if</span>"#)
            .unwrap();
        let span = root.children().unwrap()[0].as_element().unwrap();
        assert_eq!(span.properties.get("id"), Some("k1"));
        assert!(span.has_class("ps-keyword"));
        assert!(span.has_class("bold"));
    }

    #[test]
    fn it_decodes_character_references() {
        let root = FragmentParser::new().parse("a &lt; b &amp;&amp; c").unwrap();
        assert_eq!(root, Node::root(vec![Node::text("a < b && c")]));
    }

    #[test]
    fn it_closes_unclosed_elements() {
        let root = FragmentParser::new().parse("<div><span>open").unwrap();
        assert_eq!(
            root,
            Node::root(vec![
                Element::new("div")
                    .with_child(Element::new("span").with_child(Node::text("open")))
                    .into()
            ])
        );
    }

    #[test]
    fn it_parses_empty_markup_into_an_empty_root() {
        let root = FragmentParser::new().parse("").unwrap();
        assert_eq!(root, Node::root(vec![]));
    }

    #[test]
    fn it_rejects_stray_end_tags_when_strict() {
        let result = FragmentParser::strict().parse("<p>a</span></p>");
        assert!(matches!(result, Err(ParseError::Malformed(_))));
    }

    #[test]
    fn it_recovers_from_stray_end_tags_when_lenient() {
        let root = FragmentParser::new().parse("<p>a</span></p>").unwrap();
        assert_eq!(
            root,
            Node::root(vec![Element::new("p").with_child(Node::text("a")).into()])
        );
    }
}
