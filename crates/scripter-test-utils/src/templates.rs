//! [`TestTemplates`] builder for definition-file test scenarios.

use scripter_meta::{Definition, FileDefinitionSource};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// A temporary directory of definition files with helpers for setup and
/// assertion.
///
/// # Example
///
/// ```rust,no_run
/// use scripter_test_utils::TestTemplates;
///
/// let templates = TestTemplates::new();
/// templates.write("base.yaml", "header:\n  name: base\n");
/// templates.write("leaf.yaml", "header:\n  name: leaf\n  inherits: base.yaml => base\n");
/// templates.assert_file_exists("leaf.yaml");
/// let source = templates.source();
/// ```
pub struct TestTemplates {
    temp_dir: TempDir,
}

impl Default for TestTemplates {
    fn default() -> Self {
        Self::new()
    }
}

impl TestTemplates {
    /// Create an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Copy every file from `fixtures` (non-recursive) into a new directory.
    pub fn from_fixtures(fixtures: impl AsRef<Path>) -> Self {
        let templates = Self::new();
        let fixtures = fixtures.as_ref();
        for entry in fs::read_dir(fixtures)
            .unwrap_or_else(|_| panic!("Could not read fixtures: {}", fixtures.display()))
        {
            let entry = entry.unwrap();
            if entry.file_type().unwrap().is_file() {
                fs::copy(entry.path(), templates.root().join(entry.file_name())).unwrap();
            }
        }
        templates
    }

    /// Return the root path of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write raw YAML to `path` (relative to root), creating parent
    /// directories.
    pub fn write(&self, path: &str, content: &str) -> &Self {
        let full_path = self.root().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&full_path, content)
            .unwrap_or_else(|_| panic!("Could not write file: {}", full_path.display()));
        self
    }

    /// Serialize `definition` as YAML to `path`.
    pub fn write_definition(&self, path: &str, definition: &Definition) -> &Self {
        let content = serde_yaml::to_string(definition).unwrap();
        self.write(path, &content)
    }

    /// A file-backed definition source rooted at this directory.
    pub fn source(&self) -> FileDefinitionSource {
        FileDefinitionSource::new(self.root())
    }

    /// Assert that `path` (relative to the root) exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, path: &str) {
        let full_path = self.root().join(path);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }

    /// Assert that the file at `path` contains `content`.
    ///
    /// # Panics
    /// Panics if the file cannot be read or does not contain `content`.
    pub fn assert_file_contains(&self, path: &str, content: &str) {
        let full_path = self.root().join(path);
        let file_content = fs::read_to_string(&full_path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", full_path.display()));
        assert!(
            file_content.contains(content),
            "File {} does not contain expected content.\nExpected: {}\nActual: {}",
            full_path.display(),
            content,
            file_content
        );
    }
}
