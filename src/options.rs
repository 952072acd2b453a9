// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Options that control how pseudocode is rendered.
//!
//! Options are passed through to the [`Renderer`](crate::render::Renderer)
//! untouched. An option that is not set stays unset, and the renderer
//! applies its own default for it; the defaults listed on each option are
//! the ones pseudocode.js uses.

use clap::ValueEnum;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, LazyLock};
use thiserror::Error;

/// Matches a length in `em` units, such as `1.2em`.
static EM_LENGTH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+(\.\d*)?|\.\d+)em$").expect("invalid em length regex"));

/// Indicates that a set of render options is invalid.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OptionsError {
    /// The indent size is not a length in `em` units.
    #[error("indent size must be a length in 'em' units, not {0:?}")]
    IdentSize(String),
}

/// Render options for pseudocode blocks.
///
/// Render options are immutable once built. Use [`RenderOptions::build()`]
/// to construct them incrementally, or deserialize them from JSON using the
/// same camel-cased option names pseudocode.js uses:
///
/// ```
/// use pseudomark::options::{MathEngine, RenderOptions};
/// let opts: RenderOptions = serde_json::from_str(r#"{"identSize": "2em", "mathEngine": "katex"}"#).unwrap();
/// assert_eq!(opts.ident_size(), Some("2em"));
/// assert_eq!(opts.math_engine(), Some(MathEngine::Katex));
/// ```
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct RenderOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    ident_size: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    comment_delimiter: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    line_number_punc: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    line_number: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    no_end: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    caption_count: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    title_prefix: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    math_engine: Option<MathEngine>,

    #[serde(skip)]
    math_renderer: Option<MathRenderer>,
}

impl RenderOptions {
    /// Incrementally builds a new set of render options.
    ///
    /// # Examples
    ///
    /// ```
    /// use pseudomark::options::RenderOptions;
    /// let opts = RenderOptions::build().line_number(true).title_prefix("Procedure").build();
    /// assert_eq!(opts.line_number(), Some(true));
    /// assert_eq!(opts.no_end(), None);
    /// ```
    pub fn build() -> RenderOptionsBuilder {
        RenderOptionsBuilder::default()
    }

    /// The indent size inside a control block, such as `if` or `for`.
    /// Default: `1.2em`.
    pub fn ident_size(&self) -> Option<&str> {
        self.ident_size.as_deref()
    }

    /// The delimiter that starts a line comment. Default: `//`.
    pub fn comment_delimiter(&self) -> Option<&str> {
        self.comment_delimiter.as_deref()
    }

    /// The punctuation that follows a line number. Default: `:`.
    pub fn line_number_punc(&self) -> Option<&str> {
        self.line_number_punc.as_deref()
    }

    /// Whether lines are numbered. Default: `false`.
    pub fn line_number(&self) -> Option<bool> {
        self.line_number
    }

    /// Whether block endings, like `end if`, are hidden. Default: `false`.
    pub fn no_end(&self) -> Option<bool> {
        self.no_end
    }

    /// The new value of the algorithm caption counter.
    pub fn caption_count(&self) -> Option<u32> {
        self.caption_count
    }

    /// The prefix of an algorithm's title. Default: `Algorithm`.
    pub fn title_prefix(&self) -> Option<&str> {
        self.title_prefix.as_deref()
    }

    /// The math engine used to typeset math in pseudocode.
    pub fn math_engine(&self) -> Option<MathEngine> {
        self.math_engine
    }

    /// A custom function for typesetting math in pseudocode.
    pub fn math_renderer(&self) -> Option<&MathRenderer> {
        self.math_renderer.as_ref()
    }

    /// True if either math option is set.
    pub fn has_math_options(&self) -> bool {
        self.math_engine.is_some() || self.math_renderer.is_some()
    }

    /// Checks that every option that is set has a sensible value.
    ///
    /// # Examples
    ///
    /// ```
    /// use pseudomark::options::RenderOptions;
    /// assert!(RenderOptions::build().ident_size("1.5em").build().validate().is_ok());
    /// assert!(RenderOptions::build().ident_size("12px").build().validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), OptionsError> {
        match self.ident_size() {
            Some(size) if !EM_LENGTH.is_match(size) => Err(OptionsError::IdentSize(size.to_string())),
            _ => Ok(()),
        }
    }

    /// Returns these options, with every unset option taken from `fallback`.
    pub fn or(self, fallback: RenderOptions) -> RenderOptions {
        RenderOptions {
            ident_size: self.ident_size.or(fallback.ident_size),
            comment_delimiter: self.comment_delimiter.or(fallback.comment_delimiter),
            line_number_punc: self.line_number_punc.or(fallback.line_number_punc),
            line_number: self.line_number.or(fallback.line_number),
            no_end: self.no_end.or(fallback.no_end),
            caption_count: self.caption_count.or(fallback.caption_count),
            title_prefix: self.title_prefix.or(fallback.title_prefix),
            math_engine: self.math_engine.or(fallback.math_engine),
            math_renderer: self.math_renderer.or(fallback.math_renderer),
        }
    }
}

/// A builder for render options.
///
/// You probably don't want to use this directly; call [`RenderOptions::build()`]
/// and construct it incrementally instead.
#[derive(Debug, Default)]
#[must_use]
pub struct RenderOptionsBuilder {
    options: RenderOptions,
}

impl RenderOptionsBuilder {
    /// Sets the indent size. Must be a length in `em` units.
    pub fn ident_size(mut self, ident_size: impl Into<String>) -> Self {
        self.options.ident_size = Some(ident_size.into());
        self
    }

    /// Sets the line comment delimiter.
    pub fn comment_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.options.comment_delimiter = Some(delimiter.into());
        self
    }

    /// Sets the punctuation that follows line numbers.
    pub fn line_number_punc(mut self, punc: impl Into<String>) -> Self {
        self.options.line_number_punc = Some(punc.into());
        self
    }

    /// Turns line numbering on or off.
    pub fn line_number(mut self, line_number: bool) -> Self {
        self.options.line_number = Some(line_number);
        self
    }

    /// Hides or shows block endings.
    pub fn no_end(mut self, no_end: bool) -> Self {
        self.options.no_end = Some(no_end);
        self
    }

    /// Sets the algorithm caption counter.
    pub fn caption_count(mut self, count: u32) -> Self {
        self.options.caption_count = Some(count);
        self
    }

    /// Sets the prefix of algorithm titles.
    pub fn title_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.options.title_prefix = Some(prefix.into());
        self
    }

    /// Sets the math engine.
    pub fn math_engine(mut self, engine: MathEngine) -> Self {
        self.options.math_engine = Some(engine);
        self
    }

    /// Sets a custom math rendering function.
    pub fn math_renderer<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.options.math_renderer = Some(MathRenderer::new(f));
        self
    }

    /// Finalizes the [`RenderOptions`].
    pub fn build(self) -> RenderOptions {
        self.options
    }
}

/// Engines that can typeset math inside pseudocode.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MathEngine {
    /// [KaTeX](https://katex.org/).
    Katex,

    /// [MathJax](https://www.mathjax.org/).
    #[value(name = "mathjax")]
    MathJax,
}

impl fmt::Display for MathEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MathEngine::Katex => write!(f, "katex"),
            MathEngine::MathJax => write!(f, "mathjax"),
        }
    }
}

/// A function that converts TeX source into math markup.
#[derive(Clone)]
pub struct MathRenderer(Arc<dyn Fn(&str) -> String + Send + Sync>);

impl MathRenderer {
    /// Wraps `f` as a math renderer.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Typesets `tex`.
    pub fn render(&self, tex: &str) -> String {
        (self.0)(tex)
    }
}

impl fmt::Debug for MathRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MathRenderer(..)")
    }
}

/// The math backend a renderer typesets math with.
///
/// A backend is owned by a renderer and may already be configured before
/// any options are applied to it; see [`MathBackend::fill_missing()`].
#[derive(Clone, Debug, Default)]
pub struct MathBackend {
    /// The named math engine.
    pub name: Option<MathEngine>,

    /// The driver that does the typesetting.
    pub driver: Option<MathDriver>,
}

/// Does the actual typesetting for a [`MathBackend`].
#[derive(Clone, Debug, Default)]
pub struct MathDriver {
    /// Converts TeX into markup.
    pub render_to_string: Option<MathRenderer>,
}

impl MathBackend {
    /// Creates a backend using the named math engine.
    pub fn named(engine: MathEngine) -> Self {
        Self {
            name: Some(engine),
            driver: None,
        }
    }

    /// Fills the backend's name and render function from `options`.
    ///
    /// Each slot is filled only if it is currently empty, so a backend that
    /// is already configured keeps its configuration. Nothing changes unless
    /// `options` sets at least one of the math options.
    ///
    /// # Examples
    ///
    /// ```
    /// use pseudomark::options::{MathBackend, MathEngine, RenderOptions};
    ///
    /// let opts = RenderOptions::build().math_engine(MathEngine::Katex).build();
    /// let mut backend = MathBackend::named(MathEngine::MathJax);
    /// backend.fill_missing(&opts);
    /// assert_eq!(backend.name, Some(MathEngine::MathJax));
    /// ```
    pub fn fill_missing(&mut self, options: &RenderOptions) {
        if !options.has_math_options() {
            return;
        }

        if self.name.is_none() {
            self.name = options.math_engine();
        }

        let driver = self.driver.get_or_insert_with(MathDriver::default);
        if driver.render_to_string.is_none() {
            driver.render_to_string = options.math_renderer().cloned();
        }
    }

    /// The backend's render function, if it has one.
    pub fn render_to_string(&self) -> Option<&MathRenderer> {
        self.driver
            .as_ref()
            .and_then(|driver| driver.render_to_string.as_ref())
    }
}
