//! Specification loaders
//!
//! A loader turns a storage backend into a `name → PromptSpecification` map.
//! Two backends are provided: a directory of YAML files and an in-memory
//! bundle of (name, source) pairs.

use crate::error::PromptError;
use crate::schema::parse_specification;
use factsheet_domain::{PromptSpecification, SpecificationLoader};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// File extensions recognized as specification files (case-insensitive)
pub const SPECIFICATION_EXTENSIONS: &[&str] = &["yaml", "yml"];

/// Loads one specification per YAML file in a directory
///
/// The file stem becomes the specification name. Files with other
/// extensions and subdirectories are ignored.
#[derive(Debug, Clone)]
pub struct DirectorySpecificationLoader {
    dir: PathBuf,
}

impl DirectorySpecificationLoader {
    /// Create a loader for the given directory
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory this loader scans
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn specification_name(path: &Path) -> Option<String> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        if !SPECIFICATION_EXTENSIONS.contains(&ext.as_str()) {
            return None;
        }
        path.file_stem()?.to_str().map(str::to_string)
    }
}

impl SpecificationLoader for DirectorySpecificationLoader {
    type Error = PromptError;

    fn load(&self) -> Result<HashMap<String, PromptSpecification>, PromptError> {
        let entries = fs::read_dir(&self.dir).map_err(|source| PromptError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let mut specs = HashMap::new();

        for entry in entries {
            let entry = entry.map_err(|source| PromptError::Io {
                path: self.dir.clone(),
                source,
            })?;
            let path = entry.path();

            if !path.is_file() {
                continue;
            }
            let Some(name) = Self::specification_name(&path) else {
                debug!("Ignoring non-specification file {}", path.display());
                continue;
            };

            let source = fs::read_to_string(&path).map_err(|source| PromptError::Io {
                path: path.clone(),
                source,
            })?;

            insert_unique(&mut specs, &name, &source)?;
            debug!("Loaded specification '{}' from {}", name, path.display());
        }

        info!("Loaded {} specifications from {}", specs.len(), self.dir.display());
        Ok(specs)
    }
}

/// Loads specifications from (name, YAML source) pairs held in memory
///
/// Useful for specification bundles compiled into a binary and for tests.
#[derive(Debug, Clone, Default)]
pub struct InMemorySpecificationLoader {
    sources: Vec<(String, String)>,
}

impl InMemorySpecificationLoader {
    /// Create an empty loader
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a specification source under the given name
    pub fn with_source(mut self, name: impl Into<String>, source: impl Into<String>) -> Self {
        self.sources.push((name.into(), source.into()));
        self
    }
}

impl SpecificationLoader for InMemorySpecificationLoader {
    type Error = PromptError;

    fn load(&self) -> Result<HashMap<String, PromptSpecification>, PromptError> {
        let mut specs = HashMap::new();
        for (name, source) in &self.sources {
            insert_unique(&mut specs, name, source)?;
        }
        Ok(specs)
    }
}

fn insert_unique(
    specs: &mut HashMap<String, PromptSpecification>,
    name: &str,
    source: &str,
) -> Result<(), PromptError> {
    if specs.contains_key(name) {
        error!("Specification name '{}' is defined more than once", name);
        return Err(PromptError::DuplicateSpecification {
            name: name.to_string(),
        });
    }

    let spec = parse_specification(name, source).inspect_err(|e| {
        error!("Rejected specification '{}': {}", name, e);
    })?;
    specs.insert(name.to_string(), spec);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPEC: &str = r#"
prompt_config:
  role: Extract the study phase.
  context: Clinical trial synopsis.
  extraction_fields: Study phase.
  constraints:
    - Answer in one word
input_template: "Text: {{input_text}}"
"#;

    #[test]
    fn test_specification_name_from_path() {
        let name = DirectorySpecificationLoader::specification_name(Path::new("/p/s1_phase.yaml"));
        assert_eq!(name.as_deref(), Some("s1_phase"));

        let name = DirectorySpecificationLoader::specification_name(Path::new("/p/S1.YML"));
        assert_eq!(name.as_deref(), Some("S1"));

        assert!(DirectorySpecificationLoader::specification_name(Path::new("/p/readme.md")).is_none());
        assert!(DirectorySpecificationLoader::specification_name(Path::new("/p/noext")).is_none());
    }

    #[test]
    fn test_in_memory_loader() {
        let specs = InMemorySpecificationLoader::new()
            .with_source("phase", SPEC)
            .with_source("design", SPEC)
            .load()
            .unwrap();

        assert_eq!(specs.len(), 2);
        assert_eq!(specs["phase"].name, "phase");
        assert_eq!(specs["design"].name, "design");
    }

    #[test]
    fn test_in_memory_duplicate_name() {
        let err = InMemorySpecificationLoader::new()
            .with_source("phase", SPEC)
            .with_source("phase", SPEC)
            .load()
            .unwrap_err();

        assert!(matches!(err, PromptError::DuplicateSpecification { ref name } if name == "phase"));
    }

    #[test]
    fn test_missing_directory() {
        let err = DirectorySpecificationLoader::new("/definitely/not/here").load().unwrap_err();
        assert!(matches!(err, PromptError::Io { .. }));
    }
}
