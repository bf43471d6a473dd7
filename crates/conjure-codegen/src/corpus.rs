use crate::error::{CodegenError, Result, SchemaError};
use crate::ir::{ConjureDefinition, ErrorDefinition, TypeDefinition, TypeName};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Every definition loaded from a set of IR documents
#[derive(Debug, Clone)]
pub struct ConjureCorpus {
    /// Type definitions in load order
    types: Vec<TypeDefinition>,
    /// Error definitions in load order
    errors: Vec<ErrorDefinition>,
    /// Map from type name to the file that declared it (for error reporting)
    sources: BTreeMap<TypeName, PathBuf>,
}

#[derive(Deserialize)]
struct VersionHeader {
    version: u32,
}

impl ConjureCorpus {
    /// Create an empty corpus
    pub fn new() -> Self {
        Self {
            types: Vec::new(),
            errors: Vec::new(),
            sources: BTreeMap::new(),
        }
    }

    /// Load a single IR file, or every `*.json` file under a directory
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let mut corpus = Self::new();
        corpus.add_path(path)?;
        Ok(corpus)
    }

    /// Load every input path into one corpus
    pub fn load_all<P: AsRef<Path>>(paths: impl IntoIterator<Item = P>) -> Result<Self> {
        let mut corpus = Self::new();
        for path in paths {
            corpus.add_path(path)?;
        }
        Ok(corpus)
    }

    /// Add a file, or recurse into a directory
    pub fn add_path(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if !path.is_dir() {
            return self.add_file(path);
        }

        let mut files: Vec<PathBuf> = walkdir::WalkDir::new(path)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .map(|e| e.into_path())
            .filter(|p| p.is_file() && p.extension().and_then(|s| s.to_str()) == Some("json"))
            .collect();
        // WalkDir order is filesystem-dependent
        files.sort();

        tracing::debug!(dir = %path.display(), files = files.len(), "found IR files");
        for file in files {
            self.add_file(&file)?;
        }
        Ok(())
    }

    /// Parse one IR file and add its definitions
    pub fn add_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;

        let header: VersionHeader = serde_json::from_str(&content)
            .map_err(|e| CodegenError::parse_error_with_source(e, path, content.clone()))?;
        if header.version != 1 {
            return Err(SchemaError::UnsupportedVersion {
                version: header.version,
            }
            .into());
        }

        let doc: ConjureDefinition = serde_json::from_str(&content)
            .map_err(|e| CodegenError::parse_error_with_source(e, path, content.clone()))?;

        tracing::debug!(
            file = %path.display(),
            types = doc.types.len(),
            errors = doc.errors.len(),
            "loaded IR document"
        );
        self.add_document(doc, path)
    }

    /// Add the definitions of an already parsed document
    pub fn add_document(&mut self, doc: ConjureDefinition, origin: impl Into<PathBuf>) -> Result<()> {
        let origin = origin.into();
        for def in doc.types {
            self.claim(def.type_name(), &origin)?;
            self.types.push(def);
        }
        for err in doc.errors {
            self.claim(&err.error_name, &origin)?;
            self.errors.push(err);
        }
        Ok(())
    }

    fn claim(&mut self, name: &TypeName, origin: &Path) -> Result<()> {
        if let Some(first) = self.sources.get(name) {
            tracing::warn!(
                %name,
                first = %first.display(),
                second = %origin.display(),
                "type declared twice"
            );
            return Err(SchemaError::DuplicateTypeName { name: name.clone() }.into());
        }
        self.sources.insert(name.clone(), origin.to_path_buf());
        Ok(())
    }

    /// Type definitions in load order
    pub fn types(&self) -> &[TypeDefinition] {
        &self.types
    }

    /// Error definitions in load order
    pub fn errors(&self) -> &[ErrorDefinition] {
        &self.errors
    }

    /// File that declared a type
    pub fn source_of(&self, name: &TypeName) -> Option<&Path> {
        self.sources.get(name).map(|p| p.as_path())
    }

    /// Number of loaded definitions, errors included
    pub fn len(&self) -> usize {
        self.types.len() + self.errors.len()
    }

    /// Check if corpus is empty
    pub fn is_empty(&self) -> bool {
        self.types.is_empty() && self.errors.is_empty()
    }
}

impl Default for ConjureCorpus {
    fn default() -> Self {
        Self::new()
    }
}
