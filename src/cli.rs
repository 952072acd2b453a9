// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Drives the command-line program.

use crate::conf::{self, ConfError};
use crate::options::{MathEngine, RenderOptions};
use crate::pipeline::{Pipeline, PipelineError};
use crate::render::CommandRenderer;
use crate::transform::PseudoTransform;
use clap::{Args, Parser};
use clap_verbosity_flag::Verbosity;
use colored::Colorize;
use log::{debug, info};
use std::ffi::OsString;
use std::path::PathBuf;
use std::{fs, io, process};
use thiserror::Error;

/// Prints `message` to stderr and exits with `error_code`.
pub fn die(error_code: i32, message: &str) -> ! {
    eprintln!("{} {message}", "error:".red().bold());
    process::exit(error_code);
}

/// Indicates that the command-line program failed.
#[derive(Debug, Error)]
pub enum Error {
    /// The input could not be read or the output could not be written.
    #[error("{0}")]
    Io(#[from] io::Error),

    /// The configuration is invalid.
    #[error(transparent)]
    Conf(#[from] ConfError),

    /// The document could not be converted.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

/// Program configuration.
#[derive(Debug, Parser)]
#[command(version)]
#[command(about = "Renders pseudocode blocks in Markdown documents into typeset algorithms", long_about = None)]
pub struct Config {
    #[command(flatten)]
    verbosity: Verbosity,

    /// Markdown document to convert; reads standard input if omitted
    input: Option<PathBuf>,

    /// Write HTML to FILE instead of standard output
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Treat the input as an HTML fragment instead of Markdown
    #[arg(long, default_value_t = false)]
    html: bool,

    /// Read render options from a JSON file; flags override its values
    #[arg(long, value_name = "FILE")]
    options: Option<PathBuf>,

    /// Program that renders pseudocode [env: PSEUDOMARK_RENDERER] [default: pseudocode-render]
    #[arg(long, value_name = "PROGRAM")]
    renderer: Option<OsString>,

    /// Argument to pass to the renderer program; may be repeated
    #[arg(long = "renderer-arg", value_name = "ARG", allow_hyphen_values = true)]
    renderer_args: Vec<OsString>,

    #[command(flatten)]
    render: RenderArgs,
}

impl Config {
    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Render options given on the command line, falling back to those in
    /// the options file, if one was given.
    pub fn render_options(&self) -> Result<RenderOptions, ConfError> {
        let flags = self.render.to_options();
        let options = match &self.options {
            Some(path) => flags.or(conf::load_options(path)?),
            None => flags,
        };
        options.validate()?;
        Ok(options)
    }

    fn renderer(&self) -> CommandRenderer {
        let program = conf::renderer_program(self.renderer.clone());
        CommandRenderer::new(program).args(self.renderer_args.iter().cloned())
    }
}

/// Render options that can be given as flags.
#[derive(Args, Debug)]
struct RenderArgs {
    /// Indent size inside control blocks, in em [default: 1.2em]
    #[arg(long, value_name = "SIZE")]
    ident_size: Option<String>,

    /// Delimiter that starts a line comment [default: //]
    #[arg(long, value_name = "DELIMITER")]
    comment_delimiter: Option<String>,

    /// Punctuation that follows line numbers [default: :]
    #[arg(long, value_name = "PUNC")]
    line_number_punc: Option<String>,

    /// Number each line
    #[arg(long, default_value_t = false)]
    line_number: bool,

    /// Hide block endings, such as "end if"
    #[arg(long, default_value_t = false)]
    no_end: bool,

    /// Set the algorithm caption counter to N
    #[arg(long, value_name = "N")]
    caption_count: Option<u32>,

    /// Prefix of algorithm titles [default: Algorithm]
    #[arg(long, value_name = "PREFIX")]
    title_prefix: Option<String>,

    /// Engine used to typeset math
    #[arg(long, value_name = "ENGINE")]
    math_engine: Option<MathEngine>,
}

impl RenderArgs {
    fn to_options(&self) -> RenderOptions {
        let mut builder = RenderOptions::build();
        if let Some(size) = &self.ident_size {
            builder = builder.ident_size(size);
        }
        if let Some(delimiter) = &self.comment_delimiter {
            builder = builder.comment_delimiter(delimiter);
        }
        if let Some(punc) = &self.line_number_punc {
            builder = builder.line_number_punc(punc);
        }
        // Absent switches stay unset so the options file can turn them on.
        if self.line_number {
            builder = builder.line_number(true);
        }
        if self.no_end {
            builder = builder.no_end(true);
        }
        if let Some(count) = self.caption_count {
            builder = builder.caption_count(count);
        }
        if let Some(prefix) = &self.title_prefix {
            builder = builder.title_prefix(prefix);
        }
        if let Some(engine) = self.math_engine {
            builder = builder.math_engine(engine);
        }
        builder.build()
    }
}

/// Runs the command-line program using the given `config`.
pub fn run(config: Config) -> Result<(), Error> {
    let options = config.render_options()?;
    debug!("render options: {options:?}");

    let renderer = config.renderer();
    info!("rendering pseudocode with {:?}", renderer.program());
    let mut pipeline = Pipeline::new().stage(PseudoTransform::new(renderer, options));

    let input = match &config.input {
        Some(path) => fs::read_to_string(path)?,
        None => io::read_to_string(io::stdin())?,
    };

    let html = if config.html {
        pipeline.process_html(&input)?
    } else {
        pipeline.process(&input)?
    };

    match &config.output {
        Some(path) => fs::write(path, html)?,
        None => println!("{html}"),
    }
    Ok(())
}
