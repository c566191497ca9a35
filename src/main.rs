//! Generate `index.html` and `CMakeLists.txt` for one example.
//!
//! ```bash
//! generate-html-cmake sources/Cone.cxx out/Cone ~/src/VTK
//! ```

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use htmlcmakegen::{
  example_name, ExampleGenerator, GenerationMode, GeneratorSettings, DEFAULT_ARGS_CONFIG,
  DEFAULT_ASSET_BASE_URL, DEFAULT_HELPER_PROGRAM, DEFAULT_HELPER_SCRIPT, DEFAULT_HELPER_TIMEOUT,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Generate the web page and build file for a toolkit example.
#[derive(Parser, Debug)]
#[command(name = "generate-html-cmake")]
#[command(version, about, long_about = None)]
struct Cli {
  /// Example source file; its base name is the example name
  source_path: PathBuf,

  /// Existing directory receiving index.html and CMakeLists.txt
  dest_path: PathBuf,

  /// Toolkit source tree, passed through to the module helper
  vtk_source_path: PathBuf,

  /// Descriptor table of examples taking arguments
  #[arg(long, default_value = DEFAULT_ARGS_CONFIG)]
  args_config: PathBuf,

  /// Directory holding the templates
  #[arg(long, default_value = ".")]
  templates_dir: PathBuf,

  /// Module helper executable
  #[arg(long, default_value = DEFAULT_HELPER_PROGRAM)]
  helper: String,

  /// Argument passed to the helper before the two paths (repeatable)
  #[arg(
    long = "helper-arg",
    num_args = 1,
    allow_hyphen_values = true,
    default_values_t = [DEFAULT_HELPER_SCRIPT.to_string()]
  )]
  helper_args: Vec<String>,

  /// Seconds before the helper is killed
  #[arg(long, default_value_t = DEFAULT_HELPER_TIMEOUT.as_secs())]
  helper_timeout: u64,

  /// Host serving packaged data files
  #[arg(long, default_value = DEFAULT_ASSET_BASE_URL)]
  asset_base_url: String,

  /// Enable verbose logging (debug level)
  #[arg(short, long)]
  verbose: bool,
}

impl Cli {
  fn settings(&self) -> GeneratorSettings {
    GeneratorSettings {
      args_config: self.args_config.clone(),
      templates_dir: self.templates_dir.clone(),
      helper_program: self.helper.clone(),
      helper_args: self.helper_args.clone(),
      helper_timeout: Duration::from_secs(self.helper_timeout),
      asset_base_url: self.asset_base_url.clone(),
    }
  }
}

fn main() -> Result<()> {
  let cli = Cli::parse();
  init_logging(cli.verbose);

  let generator = ExampleGenerator::from_settings(&cli.settings())
    .with_context(|| format!("Failed to load {}", cli.args_config.display()))?;
  let name = example_name(&cli.source_path)?;
  match generator.mode_for(&name).0 {
    GenerationMode::Arguments => println!("arguments found"),
    GenerationMode::Plain => println!("no arguments found"),
  }

  generator
    .generate(&cli.source_path, &cli.dest_path, &cli.vtk_source_path)
    .with_context(|| format!("Failed to generate {}", cli.source_path.display()))?;
  Ok(())
}

fn init_logging(verbose: bool) {
  let filter = if verbose {
    EnvFilter::new("debug")
  } else {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
  };

  tracing_subscriber::registry()
    .with(filter)
    .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
    .init();
}
