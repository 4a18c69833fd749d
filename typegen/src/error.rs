//! Pipeline errors. Every variant is fatal: the first failing stage ends the run.

use crate::extract::ExtractError;
use crate::format::FormatError;
use crate::render::RenderError;
use crate::resolve::ResolveError;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Resolution(#[from] ResolveError),
    #[error(transparent)]
    Extraction(#[from] ExtractError),
    #[error(transparent)]
    Template(#[from] RenderError),
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error("{context}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
