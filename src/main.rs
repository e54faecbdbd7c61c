use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use ecalc::app::App;
use ecalc::calculator::{CalcResult, copy_to_clipboard};
use ecalc::config::Config;
use ecalc::history::HistoryStore;
use ecalc::repl::Repl;

#[derive(Parser)]
#[command(name = "ecalc", version, about = "Scientific calculator with complex numbers")]
struct Cli {
    /// Config file (default: $ECALC_HOME/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// History file (overrides the config)
    #[arg(long, global = true)]
    history_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Evaluate an expression and print the result
    Eval {
        /// Expression; multiple words are joined with spaces
        #[arg(required = true, allow_hyphen_values = true)]
        expression: Vec<String>,

        /// Copy the result to the clipboard
        #[arg(long)]
        copy: bool,

        /// Do not record the evaluation in history
        #[arg(long)]
        no_history: bool,
    },
    /// List or clear the evaluation history
    History {
        /// Delete all entries
        #[arg(long)]
        clear: bool,
    },
}

fn main() -> Result<()> {
    ecalc::logging::init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let history_path = cli
        .history_file
        .clone()
        .unwrap_or_else(|| config.history_path());

    match cli.command {
        Some(Command::Eval {
            expression,
            copy,
            no_history,
        }) => {
            let history = if no_history {
                HistoryStore::in_memory()
            } else {
                HistoryStore::load(history_path)
            };
            let mut app = App::new(history, config.show_history);
            app.set_input(expression.join(" "));

            match app.submit() {
                CalcResult::Success { display_result, .. } => {
                    println!("{}", display_result);
                    if copy || config.copy_results {
                        copy_to_clipboard(&display_result).context("Failed to copy result")?;
                    }
                    Ok(())
                }
                CalcResult::Error { message, .. } => anyhow::bail!(message),
            }
        }
        Some(Command::History { clear }) => {
            let mut app = App::new(HistoryStore::load(history_path), true);
            if clear {
                app.clear_history();
            } else {
                for (index, entry) in app.history().entries().iter().enumerate() {
                    println!("{:3}: {}", index, entry.label());
                }
            }
            Ok(())
        }
        None => {
            let app = App::new(HistoryStore::load(history_path), config.show_history);
            Repl::new(app, config.copy_results).run()
        }
    }
}
