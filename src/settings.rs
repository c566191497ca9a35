use std::path::PathBuf;
use std::time::Duration;

use crate::descriptor::{DEFAULT_ARGS_CONFIG, DEFAULT_ASSET_BASE_URL};
use crate::helper::{
  ModuleHelper, DEFAULT_HELPER_PROGRAM, DEFAULT_HELPER_SCRIPT, DEFAULT_HELPER_TIMEOUT,
};

/// Where the generator finds its inputs and how it runs the helper.
///
/// The defaults read everything from the working directory and run
/// `python3 WhatModulesVTK.py`.
#[derive(Debug, Clone)]
pub struct GeneratorSettings {
  /// Path of the descriptor table
  pub args_config: PathBuf,
  /// Directory holding the four templates
  pub templates_dir: PathBuf,
  /// Helper executable
  pub helper_program: String,
  /// Arguments passed to the helper before the two paths
  pub helper_args: Vec<String>,
  /// Time limit for one helper run
  pub helper_timeout: Duration,
  /// Host serving packaged data files
  pub asset_base_url: String,
}

impl GeneratorSettings {
  /// Build the helper these settings describe
  pub fn helper(&self) -> ModuleHelper {
    ModuleHelper::new(&self.helper_program, self.helper_args.iter().cloned())
      .with_timeout(self.helper_timeout)
  }
}

impl Default for GeneratorSettings {
  fn default() -> Self {
    Self {
      args_config: PathBuf::from(DEFAULT_ARGS_CONFIG),
      templates_dir: PathBuf::from("."),
      helper_program: DEFAULT_HELPER_PROGRAM.to_string(),
      helper_args: vec![DEFAULT_HELPER_SCRIPT.to_string()],
      helper_timeout: DEFAULT_HELPER_TIMEOUT,
      asset_base_url: DEFAULT_ASSET_BASE_URL.to_string(),
    }
  }
}
