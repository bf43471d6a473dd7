//! # Conjure type graph resolution and JSON codec synthesis
//!
//! Reads Conjure IR documents, resolves every named type into a single
//! graph (forward references, cycles through containers, and references
//! across packages included), and synthesizes for each type a declaration
//! shape plus a codec plan describing its exact JSON wire contract.
//!
//! ## Usage
//!
//! The `conjure-codegen` binary runs the whole pipeline and writes the
//! synthesized types as JSON:
//!
//! ```bash
//! cargo run -p conjure-codegen -- \
//!     -i ./ir/library.conjure.json \
//!     -i ./ir/shared \
//!     -o ./target/conjure/library.json --strict
//! ```
//!
//! Defaults may also come from a KDL file passed with `--config`; see
//! [`config`]. Set `CONJURE_LOG` to control log output.
//!
//! The codec plans are executable through [`codec::Codecs`], which is the
//! reference behaviour for generated encoders and decoders.
//!
//! ## Modules
//!
//! - [`ir`] - Conjure IR document model
//! - [`corpus`] - Loading IR files and collecting their definitions
//! - [`graph`] - Two-phase type graph resolver and schema validation
//! - [`codegen`] - Per-kind synthesizers producing declarations and codecs
//! - [`codec`] - Codec plan IR, its runtime, and union visitors
//! - [`output`] - The serialized result of a generation run
//! - [`config`] - KDL configuration and flag merging

pub mod cli;
pub mod codec;
pub mod codegen;
pub mod config;
pub mod corpus;
pub mod error;
pub mod graph;
pub mod ir;
pub mod output;
