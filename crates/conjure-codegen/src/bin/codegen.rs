use clap::Parser;
use conjure_codegen::cli::CodegenArgs;
use conjure_codegen::config::Settings;
use conjure_codegen::corpus::ConjureCorpus;
use conjure_codegen::output::GeneratedBundle;
use miette::Result;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("CONJURE_LOG")
                .from_env_lossy(),
        )
        .init();

    let args = CodegenArgs::parse();
    let settings = Settings::resolve(&args)?;

    tracing::info!(inputs = ?settings.inputs, "loading Conjure IR");
    let corpus = ConjureCorpus::load_all(&settings.inputs)?;
    tracing::info!(
        types = corpus.types().len(),
        errors = corpus.errors().len(),
        "loaded definitions"
    );

    let bundle = GeneratedBundle::from_corpus(&corpus, settings.strictness)?;
    bundle.write_to(&settings.output, settings.pretty)?;

    Ok(())
}
