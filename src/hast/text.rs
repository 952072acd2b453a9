// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Plain-text content of HTML syntax trees.

use crate::hast::{Node, Visitable, Visitor};
use log::trace;

/// Returns the plain-text content of `node`.
///
/// For a text node this is its value; for a root or element it is the
/// concatenation of every descendant text node, in document order. Comments
/// and doctypes contribute nothing.
///
/// # Examples
///
/// ```
/// use pseudomark::hast::{self, Element, Node};
///
/// let code = Element::new("code")
///     .with_child(Node::text("if x "))
///     .with_child(Element::new("b").with_child(Node::text("then")))
///     .with_child(Node::comment("ignored"));
/// assert_eq!(hast::to_string(&code.into()), "if x then");
/// ```
pub fn to_string(node: &Node) -> String {
    let mut visitor = TextVisitor::new();
    node.accept(&mut visitor);
    visitor.text
}

#[derive(Debug)]
struct TextVisitor {
    text: String,
}

impl TextVisitor {
    fn new() -> Self {
        Self {
            text: String::new(),
        }
    }
}

impl Visitor for TextVisitor {
    fn visit(&mut self, node: &Node) {
        match node {
            Node::Text(text) => self.text += &text.value,
            Node::Root(_) | Node::Element(_) => self.swallow(node),
            Node::Comment(_) | Node::Doctype(_) => trace!("ignoring non-text node: {node:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::to_string;
    use crate::hast::{Element, Node};
    use pretty_assertions::assert_eq;

    #[test]
    fn it_returns_the_value_of_a_text_node() {
        assert_eq!(to_string(&Node::text("plain")), "plain");
    }

    #[test]
    fn it_preserves_whitespace_and_newlines() {
        let code = Element::new("code").with_child(Node::text("if true then\n  print 1\nend if"));
        assert_eq!(to_string(&code.into()), "if true then\n  print 1\nend if");
    }

    #[test]
    fn it_concatenates_nested_text_in_document_order() {
        let tree = Node::root(vec![
            Node::text("a"),
            Element::new("p")
                .with_child(Node::text("b"))
                .with_child(Element::new("em").with_child(Node::text("c")))
                .with_child(Node::text("d"))
                .into(),
            Node::text("e"),
        ]);
        assert_eq!(to_string(&tree), "abcde");
    }

    #[test]
    fn it_ignores_comments() {
        assert_eq!(to_string(&Node::comment("hidden")), "");
    }

    #[test]
    fn it_returns_an_empty_string_for_empty_elements() {
        assert_eq!(to_string(&Element::new("code").into()), "");
    }
}
