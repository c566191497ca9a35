use std::path::Path;

use crate::error::{GenError, Result};

/// Check if a file exists
pub fn file_exists(path: &Path) -> bool {
  path.exists() && path.is_file()
}

/// Derive the example name from its source path.
///
/// Only the final path component is used and only its last extension is
/// stripped, so `a/b/Cone.cxx` gives `Cone` and `Data.tar.gz` gives `Data.tar`.
pub fn example_name(source_path: &Path) -> Result<String> {
  source_path
    .file_stem()
    .map(|stem| stem.to_string_lossy().into_owned())
    .filter(|stem| !stem.is_empty())
    .ok_or_else(|| GenError::InvalidSourcePath {
      path: source_path.to_path_buf(),
    })
}

/// Join strings with a separator
pub fn join_strings<S: AsRef<str>>(strings: &[S], separator: &str) -> String {
  strings
    .iter()
    .map(|s| s.as_ref())
    .collect::<Vec<&str>>()
    .join(separator)
}
