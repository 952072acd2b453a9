// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Pseudocode renderers.
//!
//! The actual work of lexing, parsing, and typesetting pseudocode is done
//! by a [`Renderer`], which pseudomark treats as a black box: it takes
//! pseudocode source and a set of [`RenderOptions`] and returns markup.
//! A renderer may keep state between calls, so no assumptions are made
//! about it beyond that.

pub mod command;

pub use command::CommandRenderer;

use crate::error::{Error, Result};
use crate::options::{MathBackend, RenderOptions};
use log::debug;
use std::io;
use std::process::ExitStatus;
use std::string::FromUtf8Error;
use thiserror::Error;

/// Converts pseudocode source into typeset markup.
pub trait Renderer {
    /// The math backend the renderer typesets math with.
    ///
    /// The backend is filled from the render options before each call to
    /// [`to_markup()`](Renderer::to_markup), but only where it is not
    /// already configured.
    fn backend_mut(&mut self) -> &mut MathBackend;

    /// Renders `source` into markup.
    fn to_markup(
        &mut self,
        source: &str,
        options: &RenderOptions,
    ) -> std::result::Result<String, RenderError>;
}

/// Indicates an error produced by a [`Renderer`].
#[derive(Debug, Error)]
pub enum RenderError {
    /// The renderer rejected its input, e.g., because it is not valid
    /// pseudocode.
    #[error("{0}")]
    Rejected(String),

    /// An I/O error occurred while talking to the renderer.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The render request could not be serialized.
    #[error("could not serialize render request: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The renderer exited unsuccessfully.
    #[error("renderer exited with {status}: {stderr}")]
    Failed { status: ExitStatus, stderr: String },

    /// The renderer produced output that is not UTF-8.
    #[error("renderer output is not valid UTF-8: {0}")]
    Utf8(#[from] FromUtf8Error),
}

/// Renders `source` with `renderer`.
///
/// Returns [`Error::Configuration`] without calling the renderer if `source`
/// is empty or consists only of whitespace. If either math option is set,
/// the renderer's math backend is filled from `options` first (see
/// [`MathBackend::fill_missing()`]).
pub fn render_to_string<R: Renderer + ?Sized>(
    renderer: &mut R,
    source: &str,
    options: &RenderOptions,
) -> Result<String> {
    if source.trim().is_empty() {
        return Err(Error::Configuration(String::from("Input cannot be empty")));
    }

    if options.has_math_options() {
        renderer.backend_mut().fill_missing(options);
    }

    debug!("rendering {} bytes of pseudocode", source.len());
    Ok(renderer.to_markup(source, options)?)
}
