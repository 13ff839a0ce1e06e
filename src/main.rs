//! seshat CLI: semantic interpretation of noun phrases.

use std::io::Read;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

use seshat::engine::{Engine, EngineConfig};
use seshat::syntax::SynTree;

#[derive(Parser)]
#[command(
    name = "seshat",
    version,
    about = "Interpret parsed noun phrases as typed knowledge-graph queries"
)]
struct Cli {
    /// Candidate meanings kept at each composition step (ties included).
    #[arg(long, global = true, default_value = "10")]
    accuracy: usize,

    /// Enable loose whole-word name matching for literal names.
    #[arg(long, global = true)]
    fuzzy_names: bool,

    /// Cap on reported relation suggestions.
    #[arg(long, global = true, default_value = "20")]
    suggestions: usize,

    /// Directory of additional extraction packs (TOML).
    #[arg(long, global = true)]
    packs: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interpret a bracketed syntax tree.
    Interpret {
        /// The tree, e.g. "(NBar (N author) (OF of) (DP Tolkien))".
        /// Pass "-" to read from stdin.
        tree: String,

        /// Emit the ranked wire queries as a JSON array instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Print the regenerated terminal grammar rules for the parser.
    Rules,

    /// Show engine info and table statistics.
    Info,
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = EngineConfig {
        accuracy: cli.accuracy,
        fuzzy_names: cli.fuzzy_names,
        suggestion_limit: cli.suggestions,
        pack_dir: cli.packs.clone(),
    };

    match cli.command {
        Commands::Interpret { tree, json } => {
            let engine = Engine::new(config)?;
            let text = if tree == "-" {
                let mut buf = String::new();
                std::io::stdin().read_to_string(&mut buf).into_diagnostic()?;
                buf
            } else {
                tree
            };

            let tree = SynTree::from_sexpr(text.trim())?;
            let outcome = engine.interpret(&tree)?;

            if json {
                let mut queries = Vec::new();
                for meaning in &outcome.meanings {
                    queries.push(serde_json::json!({
                        "fit": meaning.fit,
                        "types": &meaning.types,
                        "query": meaning.fragment.to_wire().map_err(seshat::error::SeshatError::from)?,
                    }));
                }
                println!(
                    "{}",
                    serde_json::to_string_pretty(&queries).into_diagnostic()?
                );
                return Ok(());
            }

            if outcome.meanings.is_empty() && outcome.suggestions.is_empty() {
                println!("No interpretation found.");
            }
            for (i, meaning) in outcome.meanings.iter().enumerate() {
                println!(
                    "{}. (fit={:.4}) types={}",
                    i + 1,
                    meaning.fit,
                    meaning.types
                );
                println!("   {}", meaning.fragment);
            }
            for suggestion in &outcome.suggestions {
                println!("Help: {suggestion}");
            }
            if outcome.accuracy_cuts {
                println!("(some candidates were pruned; retry with a larger --accuracy to see more)");
            }
        }

        Commands::Rules => {
            let engine = Engine::new(config)?;
            print!("{}", engine.grammar_rules());
        }

        Commands::Info => {
            let engine = Engine::new(config)?;
            print!("{}", engine.info());
        }
    }

    Ok(())
}
