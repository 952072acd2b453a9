// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! pseudomark renders pseudocode blocks in Markdown documents into typeset
//! algorithms. A pseudocode block is a fenced code block tagged `pseudo`:
//!
//! ````markdown
//! ```pseudo
//! \begin{algorithm}
//! \caption{Quicksort}
//! \begin{algorithmic}
//! \PROCEDURE{Quicksort}{$A, p, r$}
//!     \IF{$p < r$}
//!         \STATE $q = $ \CALL{Partition}{$A, p, r$}
//!     \ENDIF
//! \ENDPROCEDURE
//! \end{algorithmic}
//! \end{algorithm}
//! ```
//! ````
//!
//! The Markdown is converted into HTML, each block's pseudocode is handed to
//! an external renderer such as [pseudocode.js], and the markup it returns
//! replaces the block in the document.
//!
//! # Examples
//!
//! Convert a Markdown document, rendering pseudocode with the program named
//! by `$PSEUDOMARK_RENDERER`:
//!
//! ```bash
//! pseudomark algorithms.md -o algorithms.html
//! ```
//!
//! Number every line and typeset math with KaTeX:
//!
//! ```bash
//! pseudomark --line-number --math-engine katex algorithms.md
//! ```
//!
//! Read render options from a JSON file:
//!
//! ```bash
//! pseudomark --options pseudocode.json algorithms.md
//! ```
//!
//! Get usage and help for the tool:
//!
//! ```bash
//! pseudomark --help
//! ```
//!
//! # Renderers
//!
//! pseudomark does not lex or typeset pseudocode itself. Any program that
//! reads a JSON request from standard input and writes markup to standard
//! output can be used as a renderer; see [`CommandRenderer`] for the
//! protocol. Libraries can supply their own [`Renderer`] instead.
//!
//! # License
//!
//! pseudomark is licensed under the terms of the [Apache License 2.0]. Please
//! see the LICENSE file accompanying this source code or visit the previous
//! link for more information on licensing.
//!
//! [Apache License 2.0]: https://www.apache.org/licenses/LICENSE-2.0
//! [pseudocode.js]: https://github.com/SaswatPadhi/pseudocode.js

pub mod cli;
pub mod conf;
pub mod diagnostics;
pub mod error;
pub mod hast;
pub mod options;
pub mod pipeline;
pub mod render;
pub mod transform;

pub use error::{Error, Result};
pub use options::{MathBackend, MathEngine, RenderOptions};
pub use pipeline::{Pipeline, Stage};
pub use render::{CommandRenderer, Renderer};
pub use transform::PseudoTransform;

#[cfg(test)]
mod test_utils;
