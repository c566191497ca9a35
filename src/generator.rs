use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::descriptor::{ArgsTable, ExampleDescriptor, DEFAULT_ASSET_BASE_URL};
use crate::error::{GenError, Result};
use crate::helper::ModuleHelper;
use crate::settings::GeneratorSettings;
use crate::template::{GenerationMode, Placeholder, TemplateSet};
use crate::utils::example_name;

/// What one generation run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
  pub example_name: String,
  pub mode: GenerationMode,
  pub index_path: PathBuf,
  pub cmake_path: PathBuf,
  /// False when the build file carries the helper's error as comments
  pub helper_succeeded: bool,
}

/// Generates `index.html` and `CMakeLists.txt` for examples
#[derive(Debug, Clone)]
pub struct ExampleGenerator {
  table: ArgsTable,
  templates_dir: PathBuf,
  helper: ModuleHelper,
  asset_base_url: String,
}

impl ExampleGenerator {
  /// Create a generator from an already loaded descriptor table
  pub fn new(table: ArgsTable, templates_dir: impl Into<PathBuf>, helper: ModuleHelper) -> Self {
    Self {
      table,
      templates_dir: templates_dir.into(),
      helper,
      asset_base_url: DEFAULT_ASSET_BASE_URL.to_string(),
    }
  }

  /// Create a generator, loading the descriptor table named by the settings
  pub fn from_settings(settings: &GeneratorSettings) -> Result<Self> {
    let table = ArgsTable::load(&settings.args_config)?;
    Ok(
      Self::new(table, &settings.templates_dir, settings.helper())
        .with_asset_base_url(&settings.asset_base_url),
    )
  }

  /// Set the host data-file script tags point at
  pub fn with_asset_base_url(mut self, asset_base_url: &str) -> Self {
    self.asset_base_url = asset_base_url.to_string();
    self
  }

  /// Mode for an example, with its descriptor in arguments mode
  pub fn mode_for(&self, name: &str) -> (GenerationMode, Option<&ExampleDescriptor>) {
    match self.table.lookup(name) {
      Some(descriptor) => (GenerationMode::Arguments, Some(descriptor)),
      None => (GenerationMode::Plain, None),
    }
  }

  /// Generate both artifacts for one example into `dest_path`.
  ///
  /// Existing files are overwritten. A failing helper does not fail the run;
  /// its error ends up commented out in the build file instead.
  pub fn generate(
    &self,
    source_path: &Path,
    dest_path: &Path,
    vtk_source_path: &Path,
  ) -> Result<GenerationReport> {
    let name = example_name(source_path)?;
    let (mode, descriptor) = self.mode_for(&name);
    info!(example = %name, ?mode, "selected template pair");

    // Both templates are read before anything is written
    let templates = TemplateSet::load(&self.templates_dir, mode)?;
    let (index_path, cmake_path) = templates.output_paths(dest_path);

    let index = match descriptor {
      Some(descriptor) => {
        let arguments = descriptor.joined_arguments();
        let scripts = descriptor.script_tags(&self.asset_base_url)?;
        templates.index.render(&[
          (Placeholder::Name, name.as_str()),
          (Placeholder::Arguments, arguments.as_str()),
          (Placeholder::Block, scripts.as_str()),
        ])
      }
      None => templates.index.render(&[(Placeholder::Name, name.as_str())]),
    };
    write_output(&index_path, &index)?;

    let outcome = self.helper.run(vtk_source_path, source_path);
    outcome.log_failure();
    let modules = outcome.cmake_fragment()?;
    let cmake = templates.cmake.render(&[
      (Placeholder::Name, name.as_str()),
      (Placeholder::Block, modules.as_str()),
    ]);
    write_output(&cmake_path, &cmake)?;

    Ok(GenerationReport {
      example_name: name,
      mode,
      index_path,
      cmake_path,
      helper_succeeded: outcome.succeeded(),
    })
  }
}

fn write_output(path: &Path, content: &str) -> Result<()> {
  fs::write(path, content).map_err(|source| GenError::Write {
    path: path.to_path_buf(),
    source,
  })?;
  debug!(path = %path.display(), bytes = content.len(), "wrote output");
  Ok(())
}
