//! typegen: generate code from a Rust trait or struct and a Tera template.
//!
//! ```text
//! typegen Service -t mock.tera -o src/mock.rs --format
//! typegen Config --dump
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use typegen::extract::DEFAULT_ANNOTATION_KEY;
use typegen::format::DEFAULT_EDITION;
use typegen::output::Destination;
use typegen::{Generator, GeneratorConfig, TemplateSource};

#[derive(Parser)]
#[command(
    name = "typegen",
    about = "Generate code from Rust trait and struct declarations"
)]
struct Cli {
    /// Name of the trait or struct to describe
    name: String,

    /// Tera template file
    #[arg(short = 't', long, required_unless_present = "dump")]
    template: Option<PathBuf>,

    /// Output file. Defaults to stdout.
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Directory searched for the declaration
    #[arg(short = 'd', long, default_value = ".")]
    dir: PathBuf,

    /// Run rustfmt on the generated code
    #[arg(long)]
    format: bool,

    /// Edition passed to rustfmt
    #[arg(long, default_value = DEFAULT_EDITION)]
    edition: String,

    /// Attribute name holding field annotations
    #[arg(long, default_value = DEFAULT_ANNOTATION_KEY)]
    annotation: String,

    /// Write the template context as JSON instead of rendering
    #[arg(long)]
    dump: bool,

    /// Log pipeline stages to stderr
    #[arg(long)]
    debug: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    // Only absent with --dump, which never renders.
    let template = cli
        .template
        .map(TemplateSource::File)
        .unwrap_or_else(|| TemplateSource::Inline(String::new()));

    let mut config = GeneratorConfig::new(cli.name, template);
    config.dir = Some(cli.dir);
    config.output = cli.output;
    config.format = cli.format;
    config.edition = cli.edition;
    config.annotation_key = cli.annotation;

    let generator = Generator::new(config);

    if cli.dump {
        let desc = generator
            .describe()
            .with_context(|| format!("failed to describe `{}`", generator.config().name))?;
        let mut json =
            serde_json::to_string_pretty(&desc).context("failed to serialize description")?;
        json.push('\n');
        let dest = Destination::select(None, generator.config().output.as_deref());
        let label = dest.to_string();
        return dest
            .write(json.as_bytes())
            .with_context(|| format!("failed to write {}", label));
    }

    generator
        .run(None)
        .with_context(|| format!("failed to generate code for `{}`", generator.config().name))
}

/// `RUST_LOG` wins; otherwise `info`, or `debug` with `--debug`.
fn init_logging(debug: bool) {
    let default = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
