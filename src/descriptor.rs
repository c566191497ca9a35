use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};

use crate::code_writer::CodeWriter;
use crate::error::{GenError, Result};
use crate::utils::join_strings;

/// Default location of the descriptor table, relative to the working directory
pub const DEFAULT_ARGS_CONFIG: &str = "ArgsNeeded.json";

/// Host serving the packaged data files referenced by argument-taking examples
pub const DEFAULT_ASSET_BASE_URL: &str = "https://vtk-wasm-examples.s3.fr-par.scw.cloud";

/// Runtime arguments and data files an example needs
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExampleDescriptor {
  /// Argument names passed to the example, in order
  #[serde(default)]
  pub args: Vec<String>,
  /// Data-file identifiers, each served as `<base>/data/<file>.js`
  #[serde(default)]
  pub files: Vec<String>,
}

impl ExampleDescriptor {
  /// Create a descriptor from argument names and data files
  pub fn new<A, F>(args: A, files: F) -> Self
  where
    A: IntoIterator,
    A::Item: Into<String>,
    F: IntoIterator,
    F::Item: Into<String>,
  {
    Self {
      args: args.into_iter().map(Into::into).collect(),
      files: files.into_iter().map(Into::into).collect(),
    }
  }

  /// An empty descriptor selects the same mode as a missing one
  pub fn is_empty(&self) -> bool {
    self.args.is_empty() && self.files.is_empty()
  }

  /// Arguments joined for insertion between single quotes in the page template
  pub fn joined_arguments(&self) -> String {
    join_strings(&self.args, "', '")
  }

  /// One `<script>` tag per data file, newline separated
  pub fn script_tags(&self, asset_base_url: &str) -> Result<String> {
    let mut writer = CodeWriter::new(Vec::new());
    for file in &self.files {
      writer.write_script_tag(&data_file_url(asset_base_url, file))?;
    }
    Ok(writer.into_string())
  }
}

/// URL of a packaged data file on the asset host
pub fn data_file_url(asset_base_url: &str, file: &str) -> String {
  format!("{}/data/{}.js", asset_base_url.trim_end_matches('/'), file)
}

/// Table of example name to descriptor, loaded from `ArgsNeeded.json`
#[derive(Debug, Clone, Default)]
pub struct ArgsTable {
  entries: BTreeMap<String, Option<ExampleDescriptor>>,
}

impl ArgsTable {
  /// Create an empty table
  pub fn new() -> Self {
    Self::default()
  }

  /// Load and validate the table from a JSON file
  pub fn load(path: &Path) -> Result<Self> {
    let content = fs::read_to_string(path).map_err(|source| GenError::ConfigRead {
      path: path.to_path_buf(),
      source,
    })?;
    let table = Self::from_json(&content, path)?;
    if table.is_empty() {
      warn!(path = %path.display(), "descriptor table is empty, every example is plain");
    }
    debug!(path = %path.display(), entries = table.len(), "loaded descriptor table");
    Ok(table)
  }

  /// Parse the table from JSON text; `origin` is only used for error reporting
  pub fn from_json(content: &str, origin: &Path) -> Result<Self> {
    let entries = serde_json::from_str(content).map_err(|source| GenError::Config {
      path: PathBuf::from(origin),
      source,
    })?;
    Ok(Self { entries })
  }

  /// Register a descriptor for an example
  pub fn insert(&mut self, name: &str, descriptor: ExampleDescriptor) {
    self.entries.insert(name.to_string(), Some(descriptor));
  }

  /// Descriptor for an example, if it has a non-empty one
  pub fn lookup(&self, name: &str) -> Option<&ExampleDescriptor> {
    self
      .entries
      .get(name)
      .and_then(Option::as_ref)
      .filter(|descriptor| !descriptor.is_empty())
  }

  /// Number of entries, including null and empty ones
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  /// Whether the table has no entries
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}
