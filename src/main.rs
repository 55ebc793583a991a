//! zea-kg CLI: build and query the maize knowledge graph.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

use zea_kg::engine::{KgConfig, KgEngine};
use zea_kg::graph::sparql::SparqlStore;

#[derive(Parser)]
#[command(name = "zea-kg", version, about = "Maize pest and disease knowledge graph")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the graph, run inference, and write a Turtle document.
    Build {
        /// Records file (JSON). Defaults to the bundled dataset.
        #[arg(long)]
        input: Option<PathBuf>,

        /// Output path for the Turtle document.
        #[arg(long, default_value = "maize_kg.ttl")]
        output: PathBuf,

        /// Skip the inference closure and emit asserted triples only.
        #[arg(long)]
        no_closure: bool,
    },

    /// Run a SPARQL query against a Turtle document.
    Query {
        /// Turtle document to query.
        #[arg(long, default_value = "maize_kg.ttl")]
        file: PathBuf,

        /// The SPARQL query text (SELECT or ASK).
        sparql: String,
    },

    /// Show dataset and schema statistics.
    Info {
        /// Records file (JSON). Defaults to the bundled dataset.
        #[arg(long)]
        input: Option<PathBuf>,
    },
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

    match cli.command {
        Commands::Build {
            input,
            output,
            no_closure,
        } => {
            let engine = KgEngine::new(KgConfig {
                dataset: input,
                run_closure: !no_closure,
            })?;
            let built = engine.build()?;

            if let Some(report) = &built.report {
                print!("{report}");
            }
            if built.violations.is_empty() {
                println!("consistency: no violations");
            } else {
                println!("consistency: {} violation(s)", built.violations.len());
                for violation in &built.violations {
                    println!("  {violation}");
                }
            }

            engine.write_turtle(&built, &output)?;
            println!("{} triples written to {}", built.graph.len(), output.display());
        }

        Commands::Query { file, sparql } => {
            let document = std::fs::read_to_string(&file).into_diagnostic()?;
            let store = SparqlStore::from_turtle(&document)?;
            let rows = store.query_select(&sparql)?;
            if rows.is_empty() {
                println!("no results");
            }
            for row in rows {
                let rendered: Vec<String> = row
                    .iter()
                    .map(|(var, value)| format!("{var} = {value}"))
                    .collect();
                println!("{}", rendered.join("\t"));
            }
        }

        Commands::Info { input } => {
            let engine = KgEngine::new(KgConfig {
                dataset: input,
                run_closure: false,
            })?;
            print!("{}", engine.info());
        }
    }

    Ok(())
}
