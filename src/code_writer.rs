use std::io::Write;

use crate::error::Result;

/// Prefix that makes a line inert in a CMake file
pub const CMAKE_COMMENT_PREFIX: &str = "# ";

/// A writer for generated text fragments spliced into templates
pub struct CodeWriter<W: Write> {
  /// The underlying writer
  writer: W,
  /// Prefix written before every comment line
  comment_prefix: String,
  /// Number of lines written so far
  line_count: usize,
}

impl<W: Write> CodeWriter<W> {
  /// Create a new CodeWriter producing CMake comments
  pub fn new(writer: W) -> Self {
    Self::with_comment_prefix(writer, CMAKE_COMMENT_PREFIX)
  }

  /// Create a new CodeWriter with a custom comment prefix
  pub fn with_comment_prefix(writer: W, comment_prefix: &str) -> Self {
    Self {
      writer,
      comment_prefix: comment_prefix.to_string(),
      line_count: 0,
    }
  }

  /// Get the comment prefix
  pub fn comment_prefix(&self) -> &str {
    &self.comment_prefix
  }

  /// Get the number of lines written
  pub fn line_count(&self) -> usize {
    self.line_count
  }

  /// Write a line terminated by a newline
  pub fn writeln(&mut self, content: &str) -> Result<()> {
    self.writer.write_all(content.as_bytes())?;
    self.writer.write_all(b"\n")?;
    self.line_count += 1;
    Ok(())
  }

  /// Write a line separated from the previous one, without a trailing newline
  pub fn write_joined(&mut self, content: &str) -> Result<()> {
    if self.line_count > 0 {
      self.writer.write_all(b"\n")?;
    }
    self.writer.write_all(content.as_bytes())?;
    self.line_count += 1;
    Ok(())
  }

  /// Write a comment, one prefixed line per `\n`-separated piece.
  ///
  /// A trailing newline in `comment` yields a final empty comment line.
  pub fn write_comment(&mut self, comment: &str) -> Result<()> {
    for line in comment.split('\n') {
      let prefixed = format!("{}{}", self.comment_prefix, line);
      self.writeln(&prefixed)?;
    }
    Ok(())
  }

  /// Write a `<script>` tag loading a JavaScript file
  pub fn write_script_tag(&mut self, src: &str) -> Result<()> {
    self.write_joined(&format!(
      "<script type=\"text/javascript\" src=\"{}\"></script>",
      src
    ))
  }
}

impl CodeWriter<Vec<u8>> {
  /// Consume an in-memory writer and return its text
  pub fn into_string(self) -> String {
    String::from_utf8_lossy(&self.writer).into_owned()
  }
}
