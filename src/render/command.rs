// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! A renderer that delegates to an external program.
//!
//! The program is spawned once per pseudocode block. It receives a JSON
//! request on its standard input:
//!
//! ```json
//! {"source": "\\begin{algorithmic} ...", "options": {"identSize": "2em", "mathEngine": "katex"}}
//! ```
//!
//! and must write the rendered markup to its standard output and exit
//! successfully. It need not read the whole request. Only options that are
//! set appear in `options`, so the program applies its own defaults for the
//! rest. A small Node.js script wrapping pseudocode.js's `renderToString()`
//! is all that is needed.

use crate::options::{MathBackend, RenderOptions};
use crate::render::{RenderError, Renderer};
use log::{debug, trace, warn};
use serde::Serialize;
use serde_json::Value;
use std::ffi::OsString;
use std::io::{self, Write};
use std::process::{Command, Stdio};
use std::thread;

/// Renders pseudocode by running an external program.
#[derive(Debug)]
pub struct CommandRenderer {
    program: OsString,
    args: Vec<OsString>,
    backend: MathBackend,
}

#[derive(Debug, Serialize)]
struct RenderRequest<'a> {
    source: &'a str,
    options: Value,
}

impl CommandRenderer {
    /// Creates a renderer that runs `program`.
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            backend: MathBackend::default(),
        }
    }

    /// Adds an argument to pass to the program.
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Adds several arguments to pass to the program.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Starts the renderer with an already-configured math backend.
    pub fn with_backend(mut self, backend: MathBackend) -> Self {
        self.backend = backend;
        self
    }

    /// The program the renderer runs.
    pub fn program(&self) -> &OsString {
        &self.program
    }

    fn request(&self, source: &str, options: &RenderOptions) -> Result<Vec<u8>, RenderError> {
        let mut options = serde_json::to_value(options)?;
        if let (Some(name), Some(map)) = (self.backend.name, options.as_object_mut()) {
            map.insert(String::from("mathEngine"), Value::String(name.to_string()));
        }
        if self.backend.render_to_string().is_some() {
            warn!("custom math renderers cannot be passed to an external program; ignoring");
        }
        Ok(serde_json::to_vec(&RenderRequest { source, options })?)
    }
}

impl Renderer for CommandRenderer {
    fn backend_mut(&mut self) -> &mut MathBackend {
        &mut self.backend
    }

    fn to_markup(&mut self, source: &str, options: &RenderOptions) -> Result<String, RenderError> {
        let request = self.request(source, options)?;
        debug!("running renderer: {:?} {:?}", self.program, self.args);

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        // Write on a separate thread so a renderer that fills its stdout
        // pipe before draining stdin cannot deadlock us.
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| io::Error::other("renderer has no stdin"))?;
        let writer = thread::spawn(move || stdin.write_all(&request));

        let output = child.wait_with_output()?;
        let written = writer
            .join()
            .map_err(|_| io::Error::other("renderer stdin writer panicked"))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(RenderError::Failed {
                status: output.status,
                stderr,
            });
        }
        if let Err(err) = written {
            if err.kind() != io::ErrorKind::BrokenPipe {
                return Err(err.into());
            }
            // Exited successfully without reading the whole request.
            debug!("renderer closed its input early: {err}");
        }

        let markup = String::from_utf8(output.stdout)?;
        trace!("renderer produced: {markup}");
        Ok(markup)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::options::MathEngine;
    use pretty_assertions::assert_eq;

    fn shell(script: &str) -> CommandRenderer {
        CommandRenderer::new("sh").arg("-c").arg(script)
    }

    #[test]
    fn it_returns_the_programs_output() {
        let mut renderer = shell("cat >/dev/null; printf '<div>RENDERED</div>'");
        let markup = renderer.to_markup("x", &RenderOptions::default()).unwrap();
        assert_eq!(markup, "<div>RENDERED</div>");
    }

    #[test]
    fn it_accepts_output_from_programs_that_ignore_their_input() {
        let mut renderer = shell("printf '<div>RENDERED</div>'");
        let source = "x".repeat(1 << 20);
        let markup = renderer.to_markup(&source, &RenderOptions::default()).unwrap();
        assert_eq!(markup, "<div>RENDERED</div>");
    }

    #[test]
    fn it_sends_source_and_set_options_as_json() {
        let mut renderer = shell("cat");
        let opts = RenderOptions::build().ident_size("2em").no_end(true).build();
        let echoed = renderer.to_markup("if x then", &opts).unwrap();
        let request: Value = serde_json::from_str(&echoed).unwrap();
        assert_eq!(
            request,
            serde_json::json!({
                "source": "if x then",
                "options": {"identSize": "2em", "noEnd": true}
            })
        );
    }

    #[test]
    fn it_sends_the_backends_math_engine() {
        let mut renderer = shell("cat").with_backend(MathBackend::named(MathEngine::MathJax));
        let opts = RenderOptions::build().math_engine(MathEngine::Katex).build();
        let echoed = renderer.to_markup("x", &opts).unwrap();
        let request: Value = serde_json::from_str(&echoed).unwrap();
        assert_eq!(request["options"]["mathEngine"], "mathjax");
    }

    #[test]
    fn it_reports_unsuccessful_exits() {
        let mut renderer = shell("cat >/dev/null; echo 'parse error at line 1' >&2; exit 3");
        let err = renderer.to_markup("x", &RenderOptions::default()).unwrap_err();
        match err {
            RenderError::Failed { status, stderr } => {
                assert_eq!(status.code(), Some(3));
                assert_eq!(stderr, "parse error at line 1");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn it_reports_missing_programs() {
        let mut renderer = CommandRenderer::new("pseudomark-no-such-renderer");
        let err = renderer.to_markup("x", &RenderOptions::default()).unwrap_err();
        assert!(matches!(err, RenderError::Io(_)));
    }
}
