use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{GenError, Result};
use crate::utils::file_exists;

/// Literal markers replaced in the templates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
  /// Example name
  Name,
  /// Joined argument list
  Arguments,
  /// Script-tag block in pages, module list in build files
  Block,
}

impl Placeholder {
  pub fn token(self) -> &'static str {
    match self {
      Placeholder::Name => "XXX",
      Placeholder::Arguments => "YYY",
      Placeholder::Block => "ZZZ",
    }
  }
}

/// Which template pair an example is rendered from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationMode {
  /// No entry in the descriptor table
  Plain,
  /// The example takes runtime arguments and data files
  Arguments,
}

/// The four template files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
  Index,
  CMake,
  IndexArguments,
  CMakeArguments,
}

impl TemplateKind {
  pub fn file_name(self) -> &'static str {
    match self {
      TemplateKind::Index => "index.html.template",
      TemplateKind::CMake => "CMakeLists.txt.template",
      TemplateKind::IndexArguments => "index_arguments.html.template",
      TemplateKind::CMakeArguments => "CMakeLists_arguments.txt.template",
    }
  }

  /// File name written into the destination directory
  pub fn output_name(self) -> &'static str {
    match self {
      TemplateKind::Index | TemplateKind::IndexArguments => "index.html",
      TemplateKind::CMake | TemplateKind::CMakeArguments => "CMakeLists.txt",
    }
  }

  /// Page and build-file templates for a mode
  pub fn pair(mode: GenerationMode) -> (Self, Self) {
    match mode {
      GenerationMode::Plain => (TemplateKind::Index, TemplateKind::CMake),
      GenerationMode::Arguments => (TemplateKind::IndexArguments, TemplateKind::CMakeArguments),
    }
  }
}

/// A template's text as read from disk
#[derive(Debug, Clone)]
pub struct Template {
  pub kind: TemplateKind,
  pub text: String,
}

impl Template {
  pub fn new(kind: TemplateKind, text: impl Into<String>) -> Self {
    Self {
      kind,
      text: text.into(),
    }
  }

  /// Read a template from a directory
  pub fn load(dir: &Path, kind: TemplateKind) -> Result<Self> {
    let path = dir.join(kind.file_name());
    if !file_exists(&path) {
      return Err(GenError::MissingTemplate { path });
    }
    let text = match fs::read_to_string(&path) {
      Ok(text) => text,
      Err(source) => return Err(GenError::TemplateRead { path, source }),
    };
    debug!(path = %path.display(), bytes = text.len(), "read template");
    Ok(Self { kind, text })
  }

  /// Replace every occurrence of each placeholder, in the given order
  pub fn render(&self, substitutions: &[(Placeholder, &str)]) -> String {
    let mut data = self.text.clone();
    for (placeholder, value) in substitutions {
      if !data.contains(placeholder.token()) {
        warn!(
          template = self.kind.file_name(),
          token = placeholder.token(),
          "template has no placeholder, substitution skipped"
        );
        continue;
      }
      data = data.replace(placeholder.token(), value);
    }
    data
  }
}

/// The page and build-file templates for one mode
#[derive(Debug, Clone)]
pub struct TemplateSet {
  pub index: Template,
  pub cmake: Template,
}

impl TemplateSet {
  pub fn load(dir: &Path, mode: GenerationMode) -> Result<Self> {
    let (index, cmake) = TemplateKind::pair(mode);
    Ok(Self {
      index: Template::load(dir, index)?,
      cmake: Template::load(dir, cmake)?,
    })
  }

  /// Destination paths for the rendered pair
  pub fn output_paths(&self, dest: &Path) -> (PathBuf, PathBuf) {
    (
      dest.join(self.index.kind.output_name()),
      dest.join(self.cmake.kind.output_name()),
    )
  }
}
