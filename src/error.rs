use std::path::PathBuf;
use thiserror::Error;

/// Errors that can abort artifact generation
#[derive(Error, Debug)]
pub enum GenError {
  #[error("IO error: {0}")]
  Io(#[from] std::io::Error),

  #[error("Failed to read descriptor table {path}: {source}")]
  ConfigRead {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Malformed descriptor table {path}: {source}")]
  Config {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("Template not found: {path}")]
  MissingTemplate { path: PathBuf },

  #[error("Failed to read template {path}: {source}")]
  TemplateRead {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Failed to write {path}")]
  Write {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Source path has no file name: {path}")]
  InvalidSourcePath { path: PathBuf },
}

impl GenError {
  /// Whether the error comes from the descriptor table or the templates
  pub fn is_config_error(&self) -> bool {
    matches!(
      self,
      Self::ConfigRead { .. }
        | Self::Config { .. }
        | Self::MissingTemplate { .. }
        | Self::TemplateRead { .. }
    )
  }
}

/// Result type for generation operations
pub type Result<T> = std::result::Result<T, GenError>;
