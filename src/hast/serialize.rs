// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Writes HTML syntax trees back out as HTML markup.
//!
//! Serialization is done by [html5ever], so void elements, raw text elements,
//! and escaping follow the HTML serialization algorithm.
//!
//! [html5ever]: https://docs.rs/html5ever

use crate::hast::{Element, Node};
use html5ever::serialize::{Serialize, SerializeOpts, Serializer, TraversalScope, serialize};
use html5ever::{LocalName, QualName, ns};
use std::io;

/// Serializes `node` into HTML markup.
///
/// Text and attribute values are escaped, except for the text of raw text
/// elements such as `<script>`.
///
/// # Examples
///
/// ```
/// use pseudomark::hast::{self, Element, Node};
///
/// let p = Element::new("p")
///     .with_property("class", "note")
///     .with_child(Node::text("a < b"));
/// assert_eq!(hast::to_html(&p.into()).unwrap(), r#"<p class="note">a &lt; b</p>"#);
/// ```
pub fn to_html(node: &Node) -> io::Result<String> {
    let mut bytes = Vec::new();
    let opts = SerializeOpts {
        traversal_scope: TraversalScope::IncludeNode,
        ..Default::default()
    };
    serialize(&mut bytes, node, opts)?;
    String::from_utf8(bytes).map_err(io::Error::other)
}

impl Serialize for Node {
    fn serialize<S>(&self, serializer: &mut S, traversal_scope: TraversalScope) -> io::Result<()>
    where
        S: Serializer,
    {
        match self {
            Node::Root(root) => serialize_children(&root.children, serializer),
            Node::Element(element) => {
                if traversal_scope == TraversalScope::IncludeNode {
                    serialize_element(element, serializer)
                } else {
                    serialize_children(&element.children, serializer)
                }
            }
            Node::Text(text) => serializer.write_text(&text.value),
            Node::Comment(comment) => serializer.write_comment(&comment.value),
            Node::Doctype(doctype) => serializer.write_doctype(&doctype.name),
        }
    }
}

fn serialize_children<S: Serializer>(children: &[Node], serializer: &mut S) -> io::Result<()> {
    for child in children {
        child.serialize(serializer, TraversalScope::IncludeNode)?;
    }
    Ok(())
}

fn serialize_element<S: Serializer>(element: &Element, serializer: &mut S) -> io::Result<()> {
    let name = QualName::new(None, ns!(html), LocalName::from(element.tag_name.as_str()));
    // Prefixed attribute names are stored whole, e.g. `xlink:href`.
    let attrs: Vec<(QualName, &str)> = element
        .properties
        .iter()
        .map(|(name, value)| {
            let name = QualName::new(None, ns!(), LocalName::from(name.as_str()));
            (name, value.as_str())
        })
        .collect();

    serializer.start_elem(name.clone(), attrs.iter().map(|(name, value)| (name, *value)))?;
    serialize_children(&element.children, serializer)?;
    serializer.end_elem(name)
}

#[cfg(test)]
mod tests {
    use super::to_html;
    use crate::hast::{Doctype, Element, FragmentParser, Node};
    use pretty_assertions::assert_eq;

    fn reparse(markup: &str) -> String {
        let root = FragmentParser::new().parse(markup).unwrap();
        to_html(&root).unwrap()
    }

    #[test]
    fn it_escapes_text() {
        let node = Node::text("<b> & \"quotes\"");
        assert_eq!(to_html(&node).unwrap(), "&lt;b&gt; &amp; \"quotes\"");
    }

    #[test]
    fn it_escapes_attribute_values() {
        let el = Element::new("a").with_property("title", r#"say "hi" & bye"#);
        assert_eq!(
            to_html(&el.into()).unwrap(),
            r#"<a title="say &quot;hi&quot; &amp; bye"></a>"#
        );
    }

    #[test]
    fn it_writes_attributes_in_name_order() {
        let el = Element::new("div")
            .with_property("id", "x")
            .with_property("class", "y");
        assert_eq!(to_html(&el.into()).unwrap(), r#"<div class="y" id="x"></div>"#);
    }

    #[test]
    fn it_does_not_close_void_elements() {
        let el = Element::new("p")
            .with_child(Node::text("a"))
            .with_child(Element::new("br"))
            .with_child(Element::new("keygen"))
            .with_child(Node::text("b"));
        assert_eq!(to_html(&el.into()).unwrap(), "<p>a<br><keygen>b</p>");
    }

    #[test]
    fn it_does_not_escape_script_contents() {
        let el = Element::new("script").with_child(Node::text("if (a < b) {}"));
        assert_eq!(to_html(&el.into()).unwrap(), "<script>if (a < b) {}</script>");
    }

    #[test]
    fn it_does_not_escape_raw_text_elements() {
        for markup in [
            "<xmp>a < b</xmp>",
            "<noscript>a &amp; b</noscript>",
            "<noembed>a & b</noembed>",
        ] {
            assert_eq!(reparse(markup), markup);
            assert_eq!(reparse(&reparse(markup)), markup);
        }
    }

    #[test]
    fn it_writes_comments_and_doctypes() {
        let root = Node::root(vec![
            Node::Doctype(Doctype {
                name: String::from("html"),
            }),
            Node::comment(" note "),
        ]);
        assert_eq!(to_html(&root).unwrap(), "<!DOCTYPE html><!-- note -->");
    }

    #[test]
    fn it_reproduces_parsed_markup() {
        let markup = r#"<div class="ps-root"><p class="ps-line">x &lt; y</p><br></div>"#;
        assert_eq!(reparse(markup), markup);
    }
}
