use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

mod repl;

#[derive(Debug, Parser)]
#[clap(name = "mython", version)]
struct App {
  #[clap(subcommand)]
  command: Option<Command>,

  /// Script to run when no subcommand is given.
  file: Option<PathBuf>,
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
  /// Execute a Mython file.
  Run {
    /// Path to the `.my` file to run.
    file: PathBuf,
  },
  /// Start an interactive REPL.
  Repl,
}

fn main() -> anyhow::Result<()> {
  let app = App::parse();

  let command = app.command.unwrap_or_else(|| match app.file {
    Some(file) => Command::Run { file },
    None => Command::Repl,
  });

  match command {
    Command::Run { file } => run_file(&file),
    Command::Repl => repl::run().map_err(|e| anyhow::anyhow!(e.to_string())),
  }
}

fn run_file(path: &Path) -> anyhow::Result<()> {
  let source = std::fs::read_to_string(path)
    .with_context(|| format!("failed to read {}", path.display()))?;

  let mut interp = mython::Interpreter::builder().build();
  match interp.run(&source) {
    Ok(_) => Ok(()),
    Err(e) => {
      eprintln!("{}", e.report(&source));
      anyhow::bail!("failed to run {}", path.display());
    }
  }
}
