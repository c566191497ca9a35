#[cfg(test)]
mod tests {
  use std::fs;
  use std::io::Cursor;
  use std::path::Path;
  use tempfile::tempdir;

  use super::super::code_writer::CodeWriter;
  use super::super::descriptor::{data_file_url, ArgsTable, ExampleDescriptor};
  use super::super::error::GenError;
  use super::super::template::{GenerationMode, Placeholder, Template, TemplateKind, TemplateSet};
  use super::super::utils::example_name;

  #[test]
  fn test_code_writer_comment_block() {
    let mut buffer = Cursor::new(Vec::new());
    let mut writer = CodeWriter::new(&mut buffer);

    writer.write_comment("first").unwrap();
    writer.write_comment("second\nthird\n").unwrap();
    assert_eq!(writer.line_count(), 4);

    let result = String::from_utf8(buffer.into_inner()).unwrap();
    assert_eq!(result, "# first\n# second\n# third\n# \n");
  }

  #[test]
  fn test_code_writer_joined_lines() {
    let mut writer = CodeWriter::with_comment_prefix(Vec::new(), "// ");
    writer.write_script_tag("a.js").unwrap();
    writer.write_script_tag("b.js").unwrap();
    writer.write_comment("done").unwrap();

    assert_eq!(writer.comment_prefix(), "// ");
    assert_eq!(
      writer.into_string(),
      "<script type=\"text/javascript\" src=\"a.js\"></script>\n\
       <script type=\"text/javascript\" src=\"b.js\"></script>// done\n"
    );
  }

  #[test]
  fn test_example_name_strips_directories_and_extension() {
    assert_eq!(example_name(Path::new("Cone.cxx")).unwrap(), "Cone");
    assert_eq!(
      example_name(Path::new("/src/Examples/Widgets/SphereWidget2.cxx")).unwrap(),
      "SphereWidget2"
    );
    assert_eq!(example_name(Path::new("rel/dir/NoExtension")).unwrap(), "NoExtension");
    assert_eq!(example_name(Path::new("Archive.tar.gz")).unwrap(), "Archive.tar");
  }

  #[test]
  fn test_example_name_rejects_paths_without_file_name() {
    let err = example_name(Path::new("/")).unwrap_err();
    assert!(matches!(err, GenError::InvalidSourcePath { .. }));
  }

  #[test]
  fn test_args_table_lookup() {
    let json = r#"{
      "Bar": {"args": ["width", "height"], "files": ["bar_data"]},
      "OnlyFiles": {"files": ["bunny"]},
      "Empty": {"args": [], "files": []},
      "Nothing": null
    }"#;
    let table = ArgsTable::from_json(json, Path::new("ArgsNeeded.json")).unwrap();

    assert_eq!(table.len(), 4);
    assert_eq!(
      table.lookup("Bar"),
      Some(&ExampleDescriptor::new(["width", "height"], ["bar_data"]))
    );
    assert_eq!(
      table.lookup("OnlyFiles"),
      Some(&ExampleDescriptor::new(Vec::<String>::new(), ["bunny"]))
    );
    assert_eq!(table.lookup("Empty"), None);
    assert_eq!(table.lookup("Nothing"), None);
    assert_eq!(table.lookup("Foo"), None);
  }

  #[test]
  fn test_args_table_rejects_malformed_json() {
    let cases = [
      r#"{"Bar": {"args": "width"}}"#,
      r#"{"Bar": {"args": [], "file": []}}"#,
      r#"["Bar"]"#,
      r#"{"Bar": "#,
    ];
    for json in cases {
      let err = ArgsTable::from_json(json, Path::new("ArgsNeeded.json")).unwrap_err();
      assert!(err.is_config_error(), "accepted {}", json);
      assert!(err.to_string().contains("ArgsNeeded.json"));
    }
  }

  #[test]
  fn test_args_table_load_missing_file() {
    let dir = tempdir().unwrap();
    let err = ArgsTable::load(&dir.path().join("ArgsNeeded.json")).unwrap_err();
    assert!(err.is_config_error());
    assert!(matches!(err, GenError::ConfigRead { .. }));
    assert!(err.to_string().contains("ArgsNeeded.json"));
  }

  #[test]
  fn test_args_table_load_empty_table() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ArgsNeeded.json");
    fs::write(&path, "{}").unwrap();

    let table = ArgsTable::load(&path).unwrap();
    assert!(table.is_empty());
    assert_eq!(table.lookup("Bar"), None);
  }

  #[test]
  fn test_unreadable_template_is_config_error() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("index.html.template"), [0xff, 0xfe, b'X']).unwrap();

    let err = Template::load(dir.path(), TemplateKind::Index).unwrap_err();
    assert!(err.is_config_error());
    match err {
      GenError::TemplateRead { path, .. } => {
        assert_eq!(path, dir.path().join("index.html.template"))
      }
      other => panic!("unexpected error: {}", other),
    }
  }

  #[test]
  fn test_descriptor_substitutions() {
    let descriptor = ExampleDescriptor::new(["width", "height"], ["bar_data", "baz"]);

    assert_eq!(descriptor.joined_arguments(), "width', 'height");
    assert_eq!(
      descriptor.script_tags("https://assets.example.org/").unwrap(),
      "<script type=\"text/javascript\" src=\"https://assets.example.org/data/bar_data.js\"></script>\n\
       <script type=\"text/javascript\" src=\"https://assets.example.org/data/baz.js\"></script>"
    );
    assert_eq!(
      data_file_url("https://host", "bunny"),
      "https://host/data/bunny.js"
    );
    assert_eq!(ExampleDescriptor::default().script_tags("https://host").unwrap(), "");
  }

  #[test]
  fn test_template_render_replaces_every_occurrence() {
    let template = Template::new(TemplateKind::CMake, "project(XXX)\nadd_executable(XXX XXX.cxx)\nZZZ");
    let rendered = template.render(&[
      (Placeholder::Name, "Foo"),
      (Placeholder::Block, "vtk_module1\nvtk_module2\n"),
    ]);
    assert_eq!(
      rendered,
      "project(Foo)\nadd_executable(Foo Foo.cxx)\nvtk_module1\nvtk_module2\n"
    );
  }

  #[test]
  fn test_template_render_without_placeholder_is_unchanged() {
    let template = Template::new(TemplateKind::Index, "<title>static</title>");
    let rendered = template.render(&[(Placeholder::Name, "Foo"), (Placeholder::Arguments, "a")]);
    assert_eq!(rendered, "<title>static</title>");
  }

  #[test]
  fn test_template_set_load() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("index_arguments.html.template"), "XXX YYY ZZZ").unwrap();
    fs::write(dir.path().join("CMakeLists_arguments.txt.template"), "XXX ZZZ").unwrap();

    let set = TemplateSet::load(dir.path(), GenerationMode::Arguments).unwrap();
    assert_eq!(set.index.kind, TemplateKind::IndexArguments);
    assert_eq!(set.cmake.text, "XXX ZZZ");

    let (index, cmake) = set.output_paths(Path::new("out"));
    assert_eq!(index, Path::new("out").join("index.html"));
    assert_eq!(cmake, Path::new("out").join("CMakeLists.txt"));

    let err = TemplateSet::load(dir.path(), GenerationMode::Plain).unwrap_err();
    match err {
      GenError::MissingTemplate { path } => {
        assert_eq!(path, dir.path().join("index.html.template"))
      }
      other => panic!("unexpected error: {}", other),
    }
  }

  #[cfg(unix)]
  mod helper {
    use std::path::Path;
    use std::time::{Duration, Instant};

    use super::super::super::helper::{HelperFailure, HelperOutcome, ModuleHelper};

    fn script(body: &str) -> ModuleHelper {
      ModuleHelper::new("sh", ["-c", body, "helper"])
    }

    #[test]
    fn test_helper_receives_paths_as_arguments() {
      let helper = script("printf '%s|%s' \"$1\" \"$2\"");
      let outcome = helper.run(Path::new("/opt/VTK src"), Path::new("a b/Cone.cxx"));
      assert_eq!(outcome, HelperOutcome::Modules("/opt/VTK src|a b/Cone.cxx".to_string()));
    }

    #[test]
    fn test_helper_output_is_verbatim() {
      let helper = script("printf 'vtk_module1\\nvtk_module2\\n'; echo ignored >&2");
      let outcome = helper.run(Path::new("vtk"), Path::new("Foo.cxx"));
      assert!(outcome.succeeded());
      assert_eq!(outcome.cmake_fragment().unwrap(), "vtk_module1\nvtk_module2\n");
    }

    #[test]
    fn test_helper_nonzero_exit_becomes_comment() {
      let body = "echo partial; echo \"cannot parse $2\" >&2; echo 'second line' >&2; exit 3";
      let helper = script(body);
      let outcome = helper.run(Path::new("vtk"), Path::new("src/Foo.cxx"));

      match &outcome {
        HelperOutcome::Failed {
          failure, stdout, ..
        } => {
          assert_eq!(failure, &HelperFailure::Exited { code: Some(3) });
          assert_eq!(stdout, b"partial\n");
        }
        other => panic!("unexpected outcome: {:?}", other),
      }

      let expected = format!(
        "# The following error occurred running {}\n# cannot parse src/Foo.cxx\n# second line\n# \n",
        helper.command_line(Path::new("vtk"), Path::new("src/Foo.cxx"))
      );
      assert_eq!(outcome.cmake_fragment().unwrap(), expected);
    }

    #[test]
    fn test_missing_helper_becomes_comment() {
      let helper = ModuleHelper::new("/nonexistent/what-modules", Vec::<String>::new());
      let outcome = helper.run(Path::new("vtk"), Path::new("Foo.cxx"));

      assert!(matches!(
        outcome,
        HelperOutcome::Failed {
          failure: HelperFailure::Io(_),
          ..
        }
      ));
      let fragment = outcome.cmake_fragment().unwrap();
      assert!(fragment.starts_with(
        "# The following error occurred running /nonexistent/what-modules vtk Foo.cxx\n"
      ));
      assert!(fragment.lines().all(|line| line.starts_with("# ")));
    }

    #[test]
    fn test_helper_timeout_kills_child() {
      let helper = script("exec sleep 10").with_timeout(Duration::from_millis(200));
      let outcome = helper.run(Path::new("vtk"), Path::new("Foo.cxx"));

      match &outcome {
        HelperOutcome::Failed { failure, .. } => {
          assert_eq!(failure, &HelperFailure::TimedOut(Duration::from_millis(200)))
        }
        other => panic!("unexpected outcome: {:?}", other),
      }
      assert!(outcome
        .cmake_fragment()
        .unwrap()
        .ends_with("# helper timed out after 0s\n"));
    }

    #[test]
    fn test_helper_timeout_kills_forked_children() {
      let helper = script("sleep 4; echo done").with_timeout(Duration::from_millis(200));
      let started = Instant::now();
      let outcome = helper.run(Path::new("vtk"), Path::new("Foo.cxx"));

      assert!(started.elapsed() < Duration::from_secs(2), "took {:?}", started.elapsed());
      match &outcome {
        HelperOutcome::Failed { failure, stdout, .. } => {
          assert_eq!(failure, &HelperFailure::TimedOut(Duration::from_millis(200)));
          assert!(stdout.is_empty());
        }
        other => panic!("unexpected outcome: {:?}", other),
      }
    }

    #[test]
    fn test_background_child_does_not_hold_output() {
      let helper = script("sleep 4 & echo vtk_module1").with_timeout(Duration::from_secs(10));
      let started = Instant::now();
      let outcome = helper.run(Path::new("vtk"), Path::new("Foo.cxx"));

      assert!(started.elapsed() < Duration::from_secs(2), "took {:?}", started.elapsed());
      assert_eq!(outcome, HelperOutcome::Modules("vtk_module1\n".to_string()));
    }

    #[test]
    fn test_default_helper_command_line() {
      let helper = ModuleHelper::default();
      assert_eq!(
        helper.command_line(Path::new("/src/VTK"), Path::new("Cone.cxx")),
        "python3 WhatModulesVTK.py /src/VTK Cone.cxx"
      );
      assert_eq!(helper.timeout(), Duration::from_secs(120));
    }
  }
}
