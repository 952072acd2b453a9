// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Errors that can occur while rendering a single pseudocode block.

use crate::hast::ParseError;
use crate::render::RenderError;
use thiserror::Error;

/// Indicates that a pseudocode block could not be rendered.
///
/// These errors never escape a [`PseudoTransform`](crate::transform::PseudoTransform)
/// pass. They are reported to its [`Diagnostics`](crate::diagnostics::Diagnostics)
/// sink, and the block that caused them is left as it was.
#[derive(Debug, Error)]
pub enum Error {
    /// The block cannot be handed to the renderer, e.g., because it is empty.
    #[error("{0}")]
    Configuration(String),

    /// The renderer rejected the block or failed while rendering it.
    #[error("could not render pseudocode: {0}")]
    Render(#[from] RenderError),

    /// The renderer's markup could not be parsed.
    #[error("could not parse rendered pseudocode: {0}")]
    Parse(#[from] ParseError),
}

/// Standard result type for rendering a pseudocode block.
pub type Result<T> = std::result::Result<T, Error>;
