#![cfg(unix)]

use std::io::Write;
use std::process::{Command, Output, Stdio};

fn pseudomark(args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_pseudomark"))
        .args(args)
        .env_remove("PSEUDOMARK_RENDERER")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("could not run pseudomark");
    child
        .stdin
        .take()
        .expect("no stdin")
        .write_all(stdin.as_bytes())
        .expect("could not write to pseudomark");
    child.wait_with_output().expect("pseudomark did not finish")
}

const RENDER_BOLD: &str = "cat >/dev/null; printf '<b>ok</b>'";

#[test]
fn it_renders_markdown_from_stdin() {
    let output = pseudomark(
        &["--renderer", "sh", "--renderer-arg", "-c", "--renderer-arg", RENDER_BOLD],
        "```pseudo\n\\PRINT x\n```\n",
    );
    assert!(output.status.success());
    let html = String::from_utf8(output.stdout).unwrap();
    assert_eq!(html.trim_end(), "<pre><div><b>ok</b></div></pre>");
}

#[test]
fn it_renders_html_fragments() {
    let output = pseudomark(
        &[
            "--html",
            "--renderer",
            "sh",
            "--renderer-arg",
            "-c",
            "--renderer-arg",
            RENDER_BOLD,
        ],
        r#"<p>a</p><code class="language-pseudo">x</code>"#,
    );
    assert!(output.status.success());
    let html = String::from_utf8(output.stdout).unwrap();
    assert_eq!(html.trim_end(), "<p>a</p><div><b>ok</b></div>");
}

#[test]
fn it_leaves_blocks_alone_when_the_renderer_fails() {
    let output = pseudomark(
        &["--renderer", "sh", "--renderer-arg", "-c", "--renderer-arg", "cat >/dev/null; exit 1"],
        "```pseudo\nx\n```\n",
    );
    assert!(output.status.success());
    let html = String::from_utf8(output.stdout).unwrap();
    assert_eq!(
        html.trim_end(),
        "<pre><code class=\"language-pseudo\">x\n</code></pre>"
    );
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("was not rendered"));
}

#[test]
fn it_fails_on_invalid_options() {
    let output = pseudomark(&["--ident-size", "12px"], "");
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("indent size must be a length in 'em' units"));
}
