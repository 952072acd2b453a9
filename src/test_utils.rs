use crate::diagnostics::Diagnostics;
use crate::error::Error;
use crate::options::{MathBackend, RenderOptions};
use crate::render::{RenderError, Renderer};
use std::cell::RefCell;
use std::rc::Rc;

pub fn do_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

type RenderFn = Box<dyn FnMut(&str) -> Result<String, RenderError>>;

/// A renderer that never runs a real pseudocode renderer, and remembers
/// everything it was asked to render.
pub struct StubRenderer {
    render: RenderFn,
    backend: MathBackend,
    sources: Vec<String>,
    options: Vec<RenderOptions>,
}

impl StubRenderer {
    /// A renderer that returns `markup` for any input.
    pub fn new(markup: &str) -> Self {
        let markup = String::from(markup);
        Self::from_fn(move |_| Ok(markup.clone()))
    }

    /// A renderer that rejects every input with `message`.
    pub fn failing(message: &str) -> Self {
        let message = String::from(message);
        Self::from_fn(move |_| Err(RenderError::Rejected(message.clone())))
    }

    /// A renderer that renders its input with `f`.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: FnMut(&str) -> Result<String, RenderError> + 'static,
    {
        Self {
            render: Box::new(f),
            backend: MathBackend::default(),
            sources: Vec::new(),
            options: Vec::new(),
        }
    }

    pub fn sources(&self) -> Vec<&str> {
        self.sources.iter().map(String::as_str).collect()
    }

    pub fn options(&self) -> &Vec<RenderOptions> {
        &self.options
    }

    pub fn last_options(&self) -> Option<&RenderOptions> {
        self.options.last()
    }
}

impl Renderer for StubRenderer {
    fn backend_mut(&mut self) -> &mut MathBackend {
        &mut self.backend
    }

    fn to_markup(&mut self, source: &str, options: &RenderOptions) -> Result<String, RenderError> {
        self.sources.push(String::from(source));
        self.options.push(options.clone());
        (self.render)(source)
    }
}

/// Diagnostics that keep every reported error.
///
/// Clones share the same list, so a test can hand one clone to a transform
/// and inspect the other.
#[derive(Clone, Default)]
pub struct RecordingDiagnostics {
    errors: Rc<RefCell<Vec<String>>>,
}

impl RecordingDiagnostics {
    pub fn errors(&self) -> Vec<String> {
        self.errors.borrow().clone()
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn report(&self, error: &Error, _source: &str) {
        self.errors.borrow_mut().push(error.to_string());
    }
}
