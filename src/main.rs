use clap::{Parser as ClapParser, Subcommand};
use kql_parser::ParserConfig;
use kql_parser::cli::{self, CheckMode, CheckOptions, CheckResult, CliError};
use std::io::{self, Read};
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(ClapParser)]
#[command(name = "kql")]
#[command(about = "kql - parse, validate and inspect KQL filter queries")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Maximum parenthesis nesting
    #[arg(long, global = true, default_value_t = ParserConfig::default().max_depth)]
    max_depth: usize,

    /// Maximum number of terms in one AND/OR chain
    #[arg(long, global = true, default_value_t = ParserConfig::default().max_terms)]
    max_terms: usize,

    /// Maximum tree nesting, counting chain links and groups together
    #[arg(long, global = true, default_value_t = ParserConfig::default().max_nesting)]
    max_nesting: usize,

    /// Log parser activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a query
    Check {
        /// The query (reads from stdin if not provided)
        query: Option<String>,
    },

    /// Print the canonical form of a query
    Fmt {
        /// The query (reads from stdin if not provided)
        query: Option<String>,
    },

    /// Print the syntax tree of a query as JSON
    Ast {
        /// The query (reads from stdin if not provided)
        query: Option<String>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Print each leaf comparison as a JSON line
    Matches {
        /// The query (reads from stdin if not provided)
        query: Option<String>,
    },

    /// List documentation categories
    Docs,

    /// Show documentation for a specific category
    Doc {
        /// Category name (use 'kql docs' to list categories)
        category: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    let config = ParserConfig::default()
        .with_max_depth(cli.max_depth)
        .with_max_terms(cli.max_terms)
        .with_max_nesting(cli.max_nesting);

    let result = match cli.command {
        Commands::Check { query } => run_check(query, config, CheckMode::Syntax, false),
        Commands::Fmt { query } => run_check(query, config, CheckMode::Format, false),
        Commands::Ast { query, pretty } => run_check(query, config, CheckMode::Ast, pretty),
        Commands::Matches { query } => run_check(query, config, CheckMode::Matches, false),
        Commands::Docs => {
            print!("{}", cli::get_docs_overview());
            Ok(())
        }
        Commands::Doc { category } => match cli::get_doc_category(&category) {
            Ok(content) => {
                print!("{}", content);
                Ok(())
            }
            Err(e) => Err(e),
        },
    };

    if let Err(e) = result {
        // positioned diagnostics end with their caret line
        let text = e.to_string();
        if text.ends_with('\n') {
            eprint!("{}", text);
        } else {
            eprintln!("{}", text);
        }
        std::process::exit(1);
    }
}

fn read_query(query: Option<String>) -> Result<String, CliError> {
    match query {
        Some(s) => Ok(s),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer).map_err(CliError::Io)?;
            // a piped query usually ends with a newline
            Ok(buffer.trim_end_matches(['\r', '\n']).to_string())
        }
        None => Err(CliError::NoInput),
    }
}

fn run_check(
    query: Option<String>,
    config: ParserConfig,
    mode: CheckMode,
    pretty: bool,
) -> Result<(), CliError> {
    let options = CheckOptions {
        query: read_query(query)?,
        config,
        mode,
    };

    match cli::execute_check(&options)? {
        CheckResult::SyntaxValid => println!("Syntax is valid"),
        CheckResult::Formatted(text) => println!("{}", text),
        CheckResult::Ast(output) => {
            let json = if pretty {
                serde_json::to_string_pretty(&output)
            } else {
                serde_json::to_string(&output)
            }?;
            println!("{}", json);
        }
        CheckResult::Matches(matches) => {
            for m in matches {
                println!("{}", serde_json::to_string(&m)?);
            }
        }
    }
    Ok(())
}
