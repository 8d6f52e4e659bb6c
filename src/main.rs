use clap::{Args, Parser, Subcommand};
use querycraft::{
    codec, command, console, echo, echo_lines, err, error, errors,
    schema::CATALOG,
    session::{Session, Source},
    sql,
    storage::MOCK_DATASET,
    templates,
};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const DEFAULT_BASE_URL: &str = "https://querycraft.dev/builder";

#[derive(Parser)]
#[command(
    name = "querycraft",
    version = VERSION,
    about = "Build, explain, preview and share SQL queries."
)]
struct Cli {
    /// Base URL used for share links.
    #[arg(long, global = true, env = "QUERYCRAFT_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    #[command(flatten)]
    source: SourceArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
#[group(multiple = false)]
struct SourceArgs {
    /// Load the query from a JSON file.
    #[arg(short, long)]
    file: Option<PathBuf>,
    /// Load the query from a share token or share link.
    #[arg(short, long)]
    token: Option<String>,
    /// Start from a built-in template (see `templates`).
    #[arg(short = 'T', long)]
    template: Option<String>,
}

impl SourceArgs {
    fn into_source(self) -> Source {
        if let Some(path) = self.file {
            Source::File(path)
        } else if let Some(token) = self.token {
            Source::Token(token)
        } else if let Some(name) = self.template {
            Source::Template(name)
        } else {
            Source::Empty
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Print the generated SQL.
    Sql,
    /// Describe the query in plain English.
    Explain,
    /// Run the query's joins against the sample data.
    Preview {
        /// Rows to show (overrides the query's LIMIT).
        #[arg(short, long)]
        limit: Option<u64>,
    },
    /// Highlight SQL text; defaults to the generated SQL.
    Highlight {
        sql: Option<String>,
        /// Emit HTML markup instead of terminal colours.
        #[arg(long)]
        html: bool,
    },
    /// Print a share link for the query.
    Share,
    /// Decode a share token or link into query JSON.
    Decode {
        token: String,
        /// Write the JSON to a file instead of stdout.
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Check the query against the sample schema.
    Validate,
    /// List the sample tables, or the columns of one table.
    Schema { table: Option<String> },
    /// List the built-in templates.
    Templates,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        debug!(code = e.code(), category = e.category(), "Command failed.");
        error!("{}\n", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), errors::Error> {
    let source = cli.source.into_source();
    debug!(?source, "Resolved query source.");

    match cli.command {
        Command::Sql => {
            let session = Session::open(&source)?;
            echo!("{}\n", sql::generate_sql(&session.state));
        }
        Command::Explain => {
            let session = Session::open(&source)?;
            echo_lines!("{}", sql::explain_query(&session.state));
        }
        Command::Preview { limit } => {
            let mut session = Session::open(&source)?;
            if let Some(limit) = limit {
                let mut state = session.state.clone();
                state.limit = Some(limit);
                session.set_state(state);
            }
            let set = command::preview_query(&session.state, &MOCK_DATASET)?;
            echo!("{}", console::result_table(&set));
        }
        Command::Highlight { sql: text, html } => {
            let text = match text {
                Some(text) => text,
                None => sql::generate_sql(&Session::open(&source)?.state),
            };
            if html {
                echo!("{}\n", sql::highlight_sql(&text));
            } else {
                let tokens = sql::tokenize_sql(&text)?;
                echo!("{}\n", console::tokens_to_ansi(&tokens));
            }
        }
        Command::Share => {
            let session = Session::open(&source)?;
            if !codec::copy_shareable_url(&mut std::io::stdout(), &cli.base_url, &session.state) {
                return Err(err!(Codec, "Could not produce a share link."));
            }
        }
        Command::Decode { token, out } => {
            let session = Session::open_token_strict(&token)?;
            match out {
                Some(path) => {
                    session.save(&path)?;
                    echo!("Saved to {}\n", path.display());
                }
                None => echo!("{}\n", serde_json::to_string_pretty(&session.state)?),
            }
        }
        Command::Validate => {
            let session = Session::open(&source)?;
            sql::validate_state(&session.state, &CATALOG)?;
            echo!("OK\n");
        }
        Command::Schema { table } => show_schema(table.as_deref())?,
        Command::Templates => show_templates(),
    }
    Ok(())
}

fn show_schema(table: Option<&str>) -> Result<(), errors::Error> {
    match table {
        None => {
            let headers = vec!["Table".to_string(), "Columns".to_string(), "Rows".to_string()];
            let rows: Vec<Vec<String>> = CATALOG
                .tables()
                .iter()
                .map(|t| {
                    vec![
                        t.name.clone(),
                        t.columns.len().to_string(),
                        MOCK_DATASET.rows(&t.name).len().to_string(),
                    ]
                })
                .collect();
            echo!("{}", console::echo_table(&headers, &rows));
        }
        Some(name) => {
            let table = CATALOG
                .table(name)
                .ok_or_else(|| err!(Schema, "Unknown table '{}'.", name))?;
            let headers = vec!["Column".to_string(), "Type".to_string(), "Null".to_string()];
            let rows: Vec<Vec<String>> = table
                .columns
                .iter()
                .map(|c| {
                    vec![
                        c.name.clone(),
                        c.type_.to_string(),
                        if c.nullable { "YES" } else { "NO" }.to_string(),
                    ]
                })
                .collect();
            echo!("{}", console::echo_table(&headers, &rows));
            for c in &table.columns {
                echo!("{}: {}\n", c.name, c.describe());
            }
        }
    }
    Ok(())
}

fn show_templates() {
    let headers = vec![
        "Name".to_string(),
        "Level".to_string(),
        "Description".to_string(),
    ];
    let rows: Vec<Vec<String>> = templates::TEMPLATES
        .iter()
        .map(|t| {
            vec![
                t.name.to_string(),
                t.difficulty.to_string(),
                t.description.to_string(),
            ]
        })
        .collect();
    echo!("{}", console::echo_table(&headers, &rows));
}
