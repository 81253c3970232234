use std::io;

use anyhow::{Context, Result};
use arena_avl::{shell::Shell, AvlTree, Insertion, Value};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "avl-shell", about = "Interactive AVL tree over integer values")]
struct Cli {
    /// Values inserted before the menu starts (comma-separated).
    #[arg(long = "insert", value_delimiter = ',', allow_hyphen_values = true)]
    preload: Vec<Value>,
    /// Hide the menu listing between commands.
    #[arg(long)]
    quiet: bool,
    /// Log filter used when RUST_LOG is not set.
    #[arg(long, default_value = "warn")]
    log: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.log))
        .with_context(|| format!("invalid log filter {:?}", cli.log))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let mut tree = AvlTree::new();
    for value in cli.preload {
        if tree.insert(value) == Insertion::Duplicate {
            tracing::warn!(value, "ignoring duplicate preload value");
        }
    }

    let stdin = io::stdin();
    let mut shell = Shell::new(tree, stdin.lock(), io::stdout().lock()).quiet(cli.quiet);
    shell.run().context("shell session failed")?;

    Ok(())
}
