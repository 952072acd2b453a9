// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Replaces pseudocode blocks in a syntax tree with rendered algorithms.
//!
//! A pseudocode block is a `<code>` element with the `language-pseudo`
//! class, which is what a Markdown fenced code block tagged `pseudo`
//! becomes when converted to HTML:
//!
//! ````markdown
//! ```pseudo
//! \begin{algorithmic}
//! \PRINT \texttt{'hello world'}
//! \end{algorithmic}
//! ```
//! ````
//!
//! Each block's text is rendered by a [`Renderer`], and the rendered markup
//! is spliced into the tree in place of the block: the `<code>` element
//! becomes a `<div>` with no attributes whose children are the rendered
//! nodes. The element stays where it was in its parent, so anything else
//! in the tree is unaffected.
//!
//! A block that cannot be rendered is left exactly as it was, and the error
//! is sent to a [`Diagnostics`] sink. A bad block never stops the other
//! blocks in the tree from being rendered.

use crate::diagnostics::{Diagnostics, LogDiagnostics};
use crate::error::Result;
use crate::hast::{self, Element, FragmentParser, Node, Walk, visit_elements_mut};
use crate::options::RenderOptions;
use crate::pipeline::Stage;
use crate::render::{Renderer, render_to_string};
use log::{debug, trace};

/// Tag name of pseudocode blocks.
pub const PSEUDO_TAG: &str = "code";

/// Class that marks a `<code>` element as a pseudocode block.
pub const PSEUDO_CLASS: &str = "language-pseudo";

/// Tag name of the container that replaces a rendered block.
pub const CONTAINER_TAG: &str = "div";

/// True if `element` is a pseudocode block.
///
/// # Examples
///
/// ```
/// use pseudomark::hast::Element;
/// use pseudomark::transform::is_pseudocode;
///
/// let block = Element::new("code").with_property("class", "language-pseudo");
/// assert!(is_pseudocode(&block));
/// assert!(!is_pseudocode(&Element::new("code").with_property("class", "language-rust")));
/// assert!(!is_pseudocode(&Element::new("pre").with_property("class", "language-pseudo")));
/// ```
pub fn is_pseudocode(element: &Element) -> bool {
    element.is(PSEUDO_TAG) && element.has_class(PSEUDO_CLASS)
}

/// The outcome of a transform pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Report {
    /// Blocks that were rendered and spliced into the tree.
    pub rendered: usize,

    /// Blocks that could not be rendered and were left alone.
    pub failed: usize,
}

/// Renders every pseudocode block in a syntax tree.
///
/// The transform owns its renderer and its options for as long as it
/// lives, and can be run over any number of trees. Options are never
/// modified by a pass.
pub struct PseudoTransform<R> {
    renderer: R,
    options: RenderOptions,
    parser: FragmentParser,
    diagnostics: Box<dyn Diagnostics>,
}

impl<R: Renderer> PseudoTransform<R> {
    /// Creates a new transform that renders blocks with `renderer`.
    ///
    /// Errors are reported through [`LogDiagnostics`].
    pub fn new(renderer: R, options: RenderOptions) -> Self {
        Self {
            renderer,
            options,
            parser: FragmentParser::new(),
            diagnostics: Box::new(LogDiagnostics),
        }
    }

    /// Reports errors to `diagnostics` instead of the log.
    pub fn with_diagnostics(mut self, diagnostics: impl Diagnostics + 'static) -> Self {
        self.diagnostics = Box::new(diagnostics);
        self
    }

    /// Parses rendered markup with `parser`.
    pub fn with_parser(mut self, parser: FragmentParser) -> Self {
        self.parser = parser;
        self
    }

    /// The options blocks are rendered with.
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// The renderer blocks are rendered with.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Consumes the transform, returning its renderer.
    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// Renders every pseudocode block in `tree`, in document order.
    ///
    /// Never fails as a whole. Blocks that fail are counted in the
    /// returned [`Report`] and sent to the diagnostics sink.
    pub fn transform(&mut self, tree: &mut Node) -> Report {
        let mut report = Report::default();

        visit_elements_mut(tree, |element| {
            if !is_pseudocode(element) {
                return Walk::Continue;
            }

            let source: String = element.children.iter().map(hast::to_string).collect();
            match self.render(&source) {
                Ok(fragment) => {
                    splice(element, fragment);
                    report.rendered += 1;
                }
                Err(err) => {
                    self.diagnostics.report(&err, &source);
                    report.failed += 1;
                }
            }

            // Neither the rendered markup nor the source of a failed block
            // holds further pseudocode blocks.
            Walk::Skip
        });

        debug!(
            "rendered {} pseudocode block(s), {} failed",
            report.rendered, report.failed
        );
        report
    }

    fn render(&mut self, source: &str) -> Result<Node> {
        let markup = render_to_string(&mut self.renderer, source, &self.options)?;
        trace!("parsing rendered markup: {markup}");
        Ok(self.parser.parse(&markup)?)
    }
}

impl<R: Renderer> Stage for PseudoTransform<R> {
    fn run<'t>(&mut self, tree: &'t mut Node) -> &'t mut Node {
        self.transform(tree);
        tree
    }
}

/// Overwrites `element` with the rendered `fragment`.
fn splice(element: &mut Element, fragment: Node) {
    element.tag_name = String::from(CONTAINER_TAG);
    element.properties.clear();
    element.children = fragment.into_children();
}
