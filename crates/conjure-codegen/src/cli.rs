use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone, Default)]
#[command(
    author,
    version,
    about = "Resolve Conjure IR and synthesize JSON codecs for every named type"
)]
pub struct CodegenArgs {
    /// Conjure IR file, or directory of IR files (repeatable)
    #[arg(short = 'i', long = "input")]
    pub inputs: Vec<PathBuf>,

    /// Path of the generated JSON bundle
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Generate decoders that reject unknown fields
    #[arg(long)]
    pub strict: bool,

    /// Path to KDL config file supplying defaults for these flags
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Pretty-print the generated JSON
    #[arg(long)]
    pub pretty: bool,
}
