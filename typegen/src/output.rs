//! Where generated code goes.

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Output sink for one run.
pub enum Destination<'a> {
    Stream(&'a mut dyn Write),
    File(PathBuf),
    Stdout,
}

impl<'a> Destination<'a> {
    /// An explicit stream wins over a path, which wins over stdout.
    pub fn select(stream: Option<&'a mut dyn Write>, path: Option<&Path>) -> Self {
        match (stream, path) {
            (Some(stream), _) => Destination::Stream(stream),
            (None, Some(path)) => Destination::File(path.to_path_buf()),
            (None, None) => Destination::Stdout,
        }
    }

    /// Write `content`. Files are created or truncated.
    pub fn write(self, content: &[u8]) -> io::Result<()> {
        match self {
            Destination::Stream(stream) => {
                stream.write_all(content)?;
                stream.flush()
            }
            Destination::File(path) => fs::write(path, content),
            Destination::Stdout => {
                let mut stdout = io::stdout().lock();
                stdout.write_all(content)?;
                stdout.flush()
            }
        }
    }
}

impl fmt::Display for Destination<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::Stream(_) => f.write_str("<stream>"),
            Destination::File(path) => write!(f, "{}", path.display()),
            Destination::Stdout => f.write_str("<stdout>"),
        }
    }
}
