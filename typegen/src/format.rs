//! Post-render formatting through `rustfmt`.

use std::io::{self, Write};
use std::path::Path;
use std::process::{Command, Stdio};
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_EDITION: &str = "2021";

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("failed to run rustfmt")]
    Spawn(#[source] io::Error),
    #[error("rustfmt failed: {0}")]
    Failed(String),
    #[error("rustfmt produced invalid UTF-8")]
    Utf8(#[source] std::string::FromUtf8Error),
}

/// Format `source` with `rustfmt`.
///
/// `rustfmt` runs in the directory of `output` when one is given, so a
/// project `rustfmt.toml` next to the generated file applies.
pub fn rustfmt(source: &str, edition: &str, output: Option<&Path>) -> Result<String, FormatError> {
    let mut cmd = Command::new("rustfmt");
    cmd.args(["--edition", edition])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    if let Some(dir) = output.and_then(Path::parent).filter(|d| d.is_dir()) {
        cmd.current_dir(dir);
    }
    debug!(edition, "running rustfmt");

    let mut child = cmd.spawn().map_err(FormatError::Spawn)?;
    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(source.as_bytes())
            .map_err(FormatError::Spawn)?;
    }
    let output = child.wait_with_output().map_err(FormatError::Spawn)?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(FormatError::Failed(stderr.trim().to_string()));
    }
    String::from_utf8(output.stdout).map_err(FormatError::Utf8)
}
