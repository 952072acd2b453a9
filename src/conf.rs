// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Environment and configuration utilities.

use crate::options::{OptionsError, RenderOptions};
use std::ffi::OsString;
use std::path::Path;
use std::{env, fs, io};
use thiserror::Error;

/// Environment variable naming the program used to render pseudocode.
pub const RENDERER_ENV: &str = "PSEUDOMARK_RENDERER";

/// Program used to render pseudocode when none is configured.
pub const DEFAULT_RENDERER: &str = "pseudocode-render";

/// Indicates that configuration could not be loaded.
#[derive(Debug, Error)]
pub enum ConfError {
    /// The options file could not be read.
    #[error("could not read options file: {0}")]
    Io(#[from] io::Error),

    /// The options file is not valid JSON, or contains unknown options.
    #[error("invalid options file: {0}")]
    Json(#[from] serde_json::Error),

    /// An option has an invalid value.
    #[error(transparent)]
    Options(#[from] OptionsError),
}

/// Returns the program used to render pseudocode.
///
/// `configured` is used if it is given; otherwise, the value of
/// `$PSEUDOMARK_RENDERER` is used, and if that is not set either,
/// `pseudocode-render`.
///
/// # Examples
///
/// ```
/// use pseudomark::conf::renderer_program;
/// # use temp_env::{with_var, with_var_unset};
/// # with_var_unset("PSEUDOMARK_RENDERER", || {
/// assert_eq!(renderer_program(None), "pseudocode-render");
/// # });
/// # with_var("PSEUDOMARK_RENDERER", Some("node"), || {
/// assert_eq!(renderer_program(None), "node");
/// assert_eq!(renderer_program(Some("deno".into())), "deno");
/// # });
/// ```
pub fn renderer_program(configured: Option<OsString>) -> OsString {
    configured
        .or_else(|| env::var_os(RENDERER_ENV).filter(|value| !value.is_empty()))
        .unwrap_or_else(|| OsString::from(DEFAULT_RENDERER))
}

/// Reads render options from a JSON file.
///
/// The file uses the same option names as pseudocode.js, e.g.:
///
/// ```json
/// {"identSize": "2em", "lineNumber": true, "mathEngine": "katex"}
/// ```
///
/// The options are validated before they are returned.
pub fn load_options(path: impl AsRef<Path>) -> Result<RenderOptions, ConfError> {
    let json = fs::read_to_string(path)?;
    parse_options(&json)
}

/// Parses and validates render options from a JSON string.
pub fn parse_options(json: &str) -> Result<RenderOptions, ConfError> {
    let options: RenderOptions = serde_json::from_str(json)?;
    options.validate()?;
    Ok(options)
}
