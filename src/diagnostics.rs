// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Reporting of pseudocode blocks that could not be rendered.

use crate::error::Error;
use log::error;

/// Receives errors for pseudocode blocks that could not be rendered.
///
/// Errors are reported once per failed block. Reporting an error never
/// stops the rest of the document from being transformed.
pub trait Diagnostics {
    /// Reports that a block could not be rendered.
    ///
    /// `source` is the block's pseudocode source.
    fn report(&self, error: &Error, source: &str);
}

/// Reports errors through the [`log`] crate, at the error level.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn report(&self, error: &Error, source: &str) {
        let first_line = source.lines().next().unwrap_or_default();
        error!("pseudocode block starting with {first_line:?} was not rendered: {error}");
    }
}
