use crate::codec::{Codecs, Strictness};
use crate::codegen::{CodeGenerator, GeneratedType};
use crate::corpus::ConjureCorpus;
use crate::error::{CodegenError, Result};
use crate::graph::{TypeGraph, TypeName};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Everything one generation run produces, in the form emitters consume
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedBundle {
    /// Unknown-field handling the generated decoders are built for
    pub strictness: Strictness,
    /// Synthesized types in registration order
    pub types: Vec<GeneratedType>,
}

impl GeneratedBundle {
    pub fn new(types: Vec<GeneratedType>, strictness: Strictness) -> Self {
        Self { strictness, types }
    }

    /// Resolve a corpus and synthesize every type in it
    pub fn from_corpus(corpus: &ConjureCorpus, strictness: Strictness) -> Result<Self> {
        let graph = TypeGraph::from_corpus(corpus)?;
        let types = CodeGenerator::new(&graph)?.generate_all()?;
        Ok(Self::new(types, strictness))
    }

    /// Look up a synthesized type by name
    pub fn get(&self, name: &TypeName) -> Option<&GeneratedType> {
        self.types.iter().find(|t| &t.name == name)
    }

    /// Executable codec table for the bundled types
    pub fn codecs(&self) -> Codecs {
        Codecs::from_generated(&self.types)
    }

    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let text = if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        };
        text.map_err(|source| CodegenError::Output { source })
    }

    /// Write the bundle as JSON, creating parent directories as needed
    pub fn write_to(&self, path: impl AsRef<Path>, pretty: bool) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut json = self.to_json(pretty)?;
        json.push('\n');
        fs::write(path, json)?;
        tracing::info!(path = %path.display(), types = self.types.len(), "wrote generated output");
        Ok(())
    }

    /// Read a bundle written by [`GeneratedBundle::write_to`]
    pub fn read_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| CodegenError::parse_error_with_source(e, path, content.clone()))
    }
}
