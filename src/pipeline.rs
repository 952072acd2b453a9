// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Converts Markdown documents into HTML, one stage at a time.
//!
//! A [`Pipeline`] converts Markdown into HTML, parses the HTML into a
//! syntax tree, runs each of its [`Stage`]s over the tree in the order they
//! were added, and writes the tree back out as HTML.
//!
//! # Examples
//!
//! ```no_run
//! use pseudomark::options::RenderOptions;
//! use pseudomark::pipeline::Pipeline;
//! use pseudomark::render::CommandRenderer;
//! use pseudomark::transform::PseudoTransform;
//!
//! let renderer = CommandRenderer::new("pseudocode-render");
//! let opts = RenderOptions::build().ident_size("2em").build();
//! let mut pipeline = Pipeline::new().stage(PseudoTransform::new(renderer, opts));
//! let html = pipeline.process("```pseudo\n\\PRINT x\n```").unwrap();
//! ```

use crate::hast::{self, FragmentParser, Node, ParseError};
use log::debug;
use markdown::{CompileOptions, Options, ParseOptions};
use std::io;
use thiserror::Error;

/// A single step in a [`Pipeline`].
pub trait Stage {
    /// Runs the stage over `tree`, changing it in place.
    ///
    /// Returns the same tree it was given.
    fn run<'t>(&mut self, tree: &'t mut Node) -> &'t mut Node;
}

/// Indicates that a document could not be processed.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The Markdown source could not be converted into HTML.
    #[error("could not convert Markdown: {0}")]
    Markdown(String),

    /// The converted HTML could not be parsed.
    #[error("could not parse HTML: {0}")]
    Parse(#[from] ParseError),

    /// The transformed tree could not be written out as HTML.
    #[error("could not write HTML: {0}")]
    Serialize(#[from] io::Error),
}

/// Converts Markdown into HTML, running a series of stages over the
/// document's syntax tree along the way.
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
    parser: FragmentParser,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Pipeline {
    /// Creates a pipeline with no stages.
    pub fn new() -> Self {
        Self {
            stages: Vec::new(),
            parser: FragmentParser::new(),
        }
    }

    /// Adds a stage to the end of the pipeline.
    pub fn stage(mut self, stage: impl Stage + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Number of stages in the pipeline.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Converts Markdown source into HTML.
    pub fn process(&mut self, markdown: &str) -> Result<String, PipelineError> {
        let html = markdown::to_html_with_options(markdown, &self.markdown_options())
            .map_err(|msg| PipelineError::Markdown(msg.to_string()))?;
        self.process_html(&html)
    }

    /// Runs the pipeline's stages over an HTML fragment.
    pub fn process_html(&mut self, html: &str) -> Result<String, PipelineError> {
        let mut tree = self.parser.parse(html)?;
        self.run(&mut tree);
        Ok(hast::to_html(&tree)?)
    }

    /// Runs every stage over `tree`, in order.
    pub fn run<'t>(&mut self, tree: &'t mut Node) -> &'t mut Node {
        let count = self.stages.len();
        for (i, stage) in self.stages.iter_mut().enumerate() {
            debug!("running stage {} of {count}", i + 1);
            stage.run(tree);
        }
        tree
    }

    fn markdown_options(&self) -> Options {
        Options {
            parse: ParseOptions::gfm(),
            compile: CompileOptions {
                allow_dangerous_html: true,
                ..CompileOptions::gfm()
            },
        }
    }
}
