//! KDL configuration for the `conjure-codegen` binary.
//!
//! ```kdl
//! codegen {
//!     input "ir/library.conjure.json" "ir/shared"
//!     output "target/conjure/library.json"
//!     strict #true
//!     pretty #false
//! }
//! ```
//!
//! Every setting is optional here; command-line flags take precedence.

use crate::cli::CodegenArgs;
use crate::codec::Strictness;
use crate::error::{CodegenError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Settings read from a `codegen` block
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CodegenConfig {
    pub inputs: Vec<PathBuf>,
    pub output: Option<PathBuf>,
    pub strict: Option<bool>,
    pub pretty: Option<bool>,
}

impl CodegenConfig {
    pub fn from_kdl(text: &str) -> Result<Self> {
        let doc = text
            .parse::<kdl::KdlDocument>()
            .map_err(|e| CodegenError::config(format!("Failed to parse KDL: {}", e)))?;

        let mut config: Option<CodegenConfig> = None;
        for node in doc.nodes() {
            match node.name().value() {
                "codegen" => {
                    if config.is_some() {
                        return Err(CodegenError::config("Multiple codegen blocks found"));
                    }
                    config = Some(parse_codegen(node)?);
                }
                other => {
                    return Err(CodegenError::config(format!("Unknown config node: {}", other)));
                }
            }
        }

        config.ok_or_else(|| CodegenError::config("Missing codegen block"))
    }

    /// Read and parse a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let config = Self::from_kdl(&text)?;
        tracing::debug!(path = %path.display(), ?config, "loaded config");
        Ok(config)
    }
}

fn parse_codegen(node: &kdl::KdlNode) -> Result<CodegenConfig> {
    let children = node
        .children()
        .ok_or_else(|| CodegenError::config("codegen block has no children"))?;

    let mut config = CodegenConfig::default();
    for child in children.nodes() {
        match child.name().value() {
            "input" => {
                let paths: Vec<PathBuf> = child
                    .entries()
                    .iter()
                    .filter(|e| e.name().is_none())
                    .map(|e| {
                        e.value()
                            .as_string()
                            .map(PathBuf::from)
                            .ok_or_else(|| CodegenError::config("input expects string values"))
                    })
                    .collect::<Result<_>>()?;
                if paths.is_empty() {
                    return Err(CodegenError::config("input expects at least one path"));
                }
                config.inputs.extend(paths);
            }
            "output" => {
                let val = child
                    .entries()
                    .get(0)
                    .and_then(|e| e.value().as_string())
                    .ok_or_else(|| CodegenError::config("output expects a string value"))?;
                config.output = Some(PathBuf::from(val));
            }
            "strict" => config.strict = Some(bool_arg(child, "strict")?),
            "pretty" => config.pretty = Some(bool_arg(child, "pretty")?),
            other => {
                return Err(CodegenError::config(format!("Unknown codegen field: {}", other)));
            }
        }
    }
    Ok(config)
}

fn bool_arg(node: &kdl::KdlNode, name: &str) -> Result<bool> {
    node.entries()
        .get(0)
        .and_then(|e| e.value().as_bool())
        .ok_or_else(|| CodegenError::config(format!("{} expects #true or #false", name)))
}

/// Effective settings for one run: flags first, then config, then defaults
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub inputs: Vec<PathBuf>,
    pub output: PathBuf,
    pub strictness: Strictness,
    pub pretty: bool,
}

impl Settings {
    /// Merge command-line flags over an optional config file
    pub fn resolve(args: &CodegenArgs) -> Result<Self> {
        let config = match &args.config {
            Some(path) => CodegenConfig::load(path)?,
            None => CodegenConfig::default(),
        };
        Self::merge(args, config)
    }

    pub fn merge(args: &CodegenArgs, config: CodegenConfig) -> Result<Self> {
        let inputs = if args.inputs.is_empty() {
            config.inputs
        } else {
            args.inputs.clone()
        };
        if inputs.is_empty() {
            return Err(CodegenError::config(
                "No input given; pass -i or set input in the codegen block",
            ));
        }

        let output = args.output.clone().or(config.output).ok_or_else(|| {
            CodegenError::config("No output given; pass -o or set output in the codegen block")
        })?;

        Ok(Self {
            inputs,
            output,
            strictness: Strictness::from(args.strict || config.strict.unwrap_or(false)),
            pretty: args.pretty || config.pretty.unwrap_or(false),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_block() {
        let config = CodegenConfig::from_kdl(
            r#"
            codegen {
                input "a.json" "dir"
                input "b.json"
                output "out/bundle.json"
                strict #true
                pretty #false
            }
            "#,
        )
        .unwrap();

        assert_eq!(
            config.inputs,
            vec![
                PathBuf::from("a.json"),
                PathBuf::from("dir"),
                PathBuf::from("b.json")
            ]
        );
        assert_eq!(config.output, Some(PathBuf::from("out/bundle.json")));
        assert_eq!(config.strict, Some(true));
        assert_eq!(config.pretty, Some(false));
    }

    #[test]
    fn rejects_bad_documents() {
        for text in [
            "",
            "other {}",
            "codegen { colour \"red\" }",
            "codegen { strict \"yes\" }",
            "codegen { output \"a\" }\ncodegen { output \"b\" }",
        ] {
            assert!(
                matches!(CodegenConfig::from_kdl(text), Err(CodegenError::Config { .. })),
                "accepted {text:?}"
            );
        }
    }

    #[test]
    fn flags_override_config() {
        let config = CodegenConfig {
            inputs: vec!["from-config.json".into()],
            output: Some("config-out.json".into()),
            strict: Some(true),
            pretty: None,
        };
        let args = CodegenArgs {
            output: Some("flag-out.json".into()),
            pretty: true,
            ..Default::default()
        };

        let settings = Settings::merge(&args, config).unwrap();
        assert_eq!(settings.inputs, vec![PathBuf::from("from-config.json")]);
        assert_eq!(settings.output, PathBuf::from("flag-out.json"));
        assert_eq!(settings.strictness, Strictness::Strict);
        assert!(settings.pretty);
    }

    #[test]
    fn missing_output_is_an_error() {
        let args = CodegenArgs {
            inputs: vec!["ir.json".into()],
            ..Default::default()
        };
        let err = Settings::merge(&args, CodegenConfig::default()).unwrap_err();
        assert!(err.to_string().contains("No output"));
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conjure.kdl");
        fs::write(&path, "codegen {\n    input \"ir\"\n    output \"out.json\"\n}\n").unwrap();

        let args = CodegenArgs {
            config: Some(path),
            ..Default::default()
        };
        let settings = Settings::resolve(&args).unwrap();
        assert_eq!(settings.inputs, vec![PathBuf::from("ir")]);
        assert_eq!(settings.strictness, Strictness::Lenient);
        assert!(!settings.pretty);
    }
}
