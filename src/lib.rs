// Build-artifact generation for toolkit examples: index.html and CMakeLists.txt from templates

mod code_writer;
mod descriptor;
mod error;
mod generator;
mod helper;
mod settings;
mod template;
#[cfg(test)]
mod tests;
mod utils;

pub use code_writer::{CodeWriter, CMAKE_COMMENT_PREFIX};
pub use descriptor::{
  data_file_url, ArgsTable, ExampleDescriptor, DEFAULT_ARGS_CONFIG, DEFAULT_ASSET_BASE_URL,
};
pub use error::{GenError, Result};
pub use generator::{ExampleGenerator, GenerationReport};
pub use helper::{
  HelperFailure, HelperOutcome, ModuleHelper, DEFAULT_HELPER_PROGRAM, DEFAULT_HELPER_SCRIPT,
  DEFAULT_HELPER_TIMEOUT,
};
pub use settings::GeneratorSettings;
pub use template::{GenerationMode, Placeholder, Template, TemplateKind, TemplateSet};
pub use utils::example_name;
