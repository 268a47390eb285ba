use anyhow::{Context, Result, bail};
use clap::Parser;
use inkdown_config::Config;
use inkdown_engine::document::Document;
use inkdown_engine::extract::extract;
use inkdown_engine::render::render;
use inkdown_engine::toc::extract_headings;
use std::io::Read;
use std::path::PathBuf;

/// Batch mode for the inkdown styling engine: render a markdown file to a
/// styled-markup fragment on stdout, print its heading outline, or reverse
/// rendered markup back to raw text.
#[derive(Parser)]
#[command(name = "inkdown-cli", version, about)]
struct Cli {
    /// Markdown file to process; reads stdin when omitted.
    file: Option<PathBuf>,

    /// Print the heading outline instead of markup.
    #[arg(long)]
    toc: bool,

    /// Treat the input as rendered markup and print the extracted raw text.
    #[arg(long, conflicts_with = "toc")]
    extract: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let input = read_input(cli.file.as_deref())?;

    if cli.extract {
        print!("{}", extract(&input));
        return Ok(());
    }

    let doc = Document::from_text(&input);
    if cli.toc {
        for heading in extract_headings(&doc) {
            println!(
                "{}{} {}",
                "  ".repeat((heading.level - 1) as usize),
                heading.id,
                heading.text
            );
        }
        return Ok(());
    }

    print!("{}", render(&doc));
    Ok(())
}

fn read_input(file: Option<&std::path::Path>) -> Result<String> {
    match file {
        Some(path) => {
            let path = resolve_input_path(path)?;
            std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))
        }
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            Ok(buffer)
        }
    }
}

/// A path that does not exist as given is retried relative to the
/// configured documents root, matching how the editor resolves links.
fn resolve_input_path(path: &std::path::Path) -> Result<PathBuf> {
    if path.exists() {
        return Ok(path.to_path_buf());
    }
    if path.is_relative() {
        if let Ok(Some(config)) = Config::load() {
            let candidate = config.documents_path.join(path);
            if candidate.exists() {
                tracing::debug!(path = %candidate.display(), "resolved via documents root");
                return Ok(candidate);
            }
        }
    }
    bail!("no such file: {}", path.display())
}
