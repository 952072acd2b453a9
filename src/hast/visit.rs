// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Depth-first traversal of HTML syntax trees.
//!
//! Traversal is pre-order: a node is visited before its children, and
//! siblings are visited left to right. A visitor decides for itself whether
//! to descend into a node's children, which is what makes it safe to
//! replace a node's contents while visiting it: the visitor simply does not
//! descend into the content it just produced.

use crate::hast::{Element, Node};
use log::trace;

/// "Visit" a node in an HTML syntax tree.
pub trait Visitor {
    /// "Visit" a particular node in the tree.
    fn visit(&mut self, node: &Node);

    /// "Swallows" a node.
    ///
    /// Nothing is done by the visitor for the node, but it continues visiting
    /// the node's children.
    fn swallow(&mut self, node: &Node)
    where
        Self: Sized,
    {
        node.accept_children(self);
    }
}

/// A data structure that can be visited.
pub trait Visitable {
    /// Accept a visitor for processing the visitable item.
    fn accept<V: Visitor>(&self, visitor: &mut V);

    /// Accept a visitor for processing all child nodes.
    fn accept_children<V: Visitor>(&self, visitor: &mut V);
}

impl Visitable for Node {
    fn accept<V: Visitor>(&self, visitor: &mut V) {
        visitor.visit(self);
    }

    fn accept_children<V: Visitor>(&self, visitor: &mut V) {
        if let Some(children) = self.children() {
            for child in children {
                child.accept(visitor);
            }
        }
    }
}

/// "Visit" a node in an HTML syntax tree, possibly changing it.
///
/// A mutating visitor receives exclusive access to one node at a time. It
/// may rewrite anything about that node, including its children, but it
/// cannot detach the node from its parent.
pub trait VisitorMut {
    /// "Visit" a particular node in the tree.
    fn visit_mut(&mut self, node: &mut Node);

    /// Leaves the node alone but continues visiting its children.
    fn swallow_mut(&mut self, node: &mut Node)
    where
        Self: Sized,
    {
        node.accept_children_mut(self);
    }
}

/// A data structure that can be visited by a [`VisitorMut`].
pub trait VisitableMut {
    /// Accept a mutating visitor for processing the visitable item.
    fn accept_mut<V: VisitorMut>(&mut self, visitor: &mut V);

    /// Accept a mutating visitor for processing all child nodes.
    fn accept_children_mut<V: VisitorMut>(&mut self, visitor: &mut V);
}

impl VisitableMut for Node {
    fn accept_mut<V: VisitorMut>(&mut self, visitor: &mut V) {
        visitor.visit_mut(self);
    }

    fn accept_children_mut<V: VisitorMut>(&mut self, visitor: &mut V) {
        if let Some(children) = self.children_mut() {
            // The visitor only ever holds one child at a time, so the number
            // and order of siblings cannot change underneath this loop.
            for child in children.iter_mut() {
                child.accept_mut(visitor);
            }
        }
    }
}

/// What to do after an element has been visited by [`visit_elements_mut`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Walk {
    /// Continue into the element's children.
    Continue,

    /// Do not visit the element's children, but continue with its siblings.
    Skip,
}

/// Visits every element in `tree`, in pre-order, calling `f` on each one.
///
/// `f` is called with each element exactly once. When it returns
/// [`Walk::Continue`], the walk descends into the element's children as they
/// are *after* `f` has returned; [`Walk::Skip`] leaves them unvisited.
///
/// # Examples
///
/// ```
/// use pseudomark::hast::{Element, Node, Walk, visit_elements_mut};
///
/// let mut tree = Node::root(vec![
///     Element::new("p").with_child(Element::new("em")).into(),
///     Node::text("tail"),
/// ]);
///
/// let mut seen = Vec::new();
/// visit_elements_mut(&mut tree, |el| {
///     seen.push(el.tag_name.clone());
///     Walk::Continue
/// });
/// assert_eq!(seen, vec!["p", "em"]);
/// ```
pub fn visit_elements_mut<F>(tree: &mut Node, f: F)
where
    F: FnMut(&mut Element) -> Walk,
{
    tree.accept_mut(&mut ElementVisitor { f });
}

struct ElementVisitor<F> {
    f: F,
}

impl<F> VisitorMut for ElementVisitor<F>
where
    F: FnMut(&mut Element) -> Walk,
{
    fn visit_mut(&mut self, node: &mut Node) {
        let walk = match node {
            Node::Element(element) => (self.f)(element),
            Node::Root(_) => Walk::Continue,
            Node::Text(_) | Node::Comment(_) | Node::Doctype(_) => return,
        };
        match walk {
            Walk::Continue => self.swallow_mut(node),
            Walk::Skip => trace!("skipping children of visited element"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hast::Node;
    use pretty_assertions::assert_eq;

    fn sample_tree() -> Node {
        Node::root(vec![
            Element::new("section")
                .with_child(Element::new("h1").with_child(Node::text("Title")))
                .with_child(
                    Element::new("p")
                        .with_child(Node::text("a "))
                        .with_child(Element::new("em").with_child(Node::text("b"))),
                )
                .into(),
            Node::comment("c"),
            Element::new("footer").into(),
        ])
    }

    struct TagCollector {
        tags: Vec<String>,
    }

    impl Visitor for TagCollector {
        fn visit(&mut self, node: &Node) {
            if let Node::Element(element) = node {
                self.tags.push(element.tag_name.clone());
            }
            self.swallow(node);
        }
    }

    #[test]
    fn it_visits_elements_in_pre_order() {
        let mut collector = TagCollector { tags: Vec::new() };
        sample_tree().accept(&mut collector);
        assert_eq!(collector.tags, vec!["section", "h1", "p", "em", "footer"]);
    }

    #[test]
    fn it_visits_each_element_once_when_mutating() {
        let mut tree = sample_tree();
        let mut seen = Vec::new();
        visit_elements_mut(&mut tree, |el| {
            seen.push(el.tag_name.clone());
            Walk::Continue
        });
        assert_eq!(seen, vec!["section", "h1", "p", "em", "footer"]);
    }

    #[test]
    fn it_does_not_descend_into_skipped_elements() {
        let mut tree = sample_tree();
        let mut seen = Vec::new();
        visit_elements_mut(&mut tree, |el| {
            seen.push(el.tag_name.clone());
            if el.is("section") {
                Walk::Skip
            } else {
                Walk::Continue
            }
        });
        assert_eq!(seen, vec!["section", "footer"]);
    }

    #[test]
    fn it_does_not_revisit_replaced_content() {
        let mut tree = sample_tree();
        let mut seen = Vec::new();
        visit_elements_mut(&mut tree, |el| {
            seen.push(el.tag_name.clone());
            if el.is("h1") {
                el.tag_name = String::from("div");
                el.children = vec![Element::new("span").into()];
                return Walk::Skip;
            }
            Walk::Continue
        });
        assert_eq!(seen, vec!["section", "h1", "p", "em", "footer"]);
    }

    #[test]
    fn it_descends_into_new_children_when_asked_to() {
        let mut tree = sample_tree();
        let mut seen = Vec::new();
        visit_elements_mut(&mut tree, |el| {
            seen.push(el.tag_name.clone());
            if el.is("footer") {
                el.children = vec![Element::new("small").into()];
            }
            Walk::Continue
        });
        assert_eq!(seen, vec!["section", "h1", "p", "em", "footer", "small"]);
    }

    #[test]
    fn it_keeps_sibling_order_after_mutation() {
        let mut tree = sample_tree();
        visit_elements_mut(&mut tree, |el| {
            if el.is("section") {
                el.tag_name = String::from("article");
                el.children.clear();
            }
            Walk::Continue
        });
        let tags: Vec<_> = tree
            .children()
            .unwrap()
            .iter()
            .filter_map(|n| n.as_element().map(|e| e.tag_name.as_str()))
            .collect();
        assert_eq!(tags, vec!["article", "footer"]);
    }
}
