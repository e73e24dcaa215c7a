use std::io;
use std::path::PathBuf;

/// A failed publish step. Each variant maps to one stage of the pipeline so
/// callers can tell which step stopped the run.
#[derive(thiserror::Error, Debug)]
pub enum PublishError {
    #[error("failed to read {path}: {source}")]
    ReadInput { path: PathBuf, source: io::Error },

    #[error("failed to read template {path}: {source}")]
    LoadTemplate { path: PathBuf, source: io::Error },

    #[error("failed to parse template {path}: {detail}")]
    ParseTemplate { path: PathBuf, detail: String },

    #[error("failed to write {path}: {source}")]
    CreateOutput { path: PathBuf, source: io::Error },

    #[error("failed to render template {path}: {detail}")]
    RenderTemplate { path: PathBuf, detail: String },
}

impl PublishError {
    /// Path of the file the failing step was working on.
    pub fn path(&self) -> &std::path::Path {
        match self {
            PublishError::ReadInput { path, .. }
            | PublishError::LoadTemplate { path, .. }
            | PublishError::ParseTemplate { path, .. }
            | PublishError::CreateOutput { path, .. }
            | PublishError::RenderTemplate { path, .. } => path,
        }
    }
}
