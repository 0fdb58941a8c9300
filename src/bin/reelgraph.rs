//! Command-line entry point: serve the movie API or run one query.
#![forbid(unsafe_code)]

use std::error::Error;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use reelgraph::{
    config::{AppConfig, CONFIG_ENV},
    server, source,
    source::BackendKind,
    MovieService, Operation, QueryOutput,
};

#[path = "reelgraph/ui.rs"]
mod ui;

use ui::Ui;

const NOT_FOUND_EXIT: i32 = 3;

#[derive(Parser, Debug)]
#[command(
    name = "reelgraph",
    version,
    about = "Query movies and their cast from a property graph",
    disable_help_subcommand = true
)]
struct Cli {
    #[arg(
        long,
        global = true,
        value_name = "FILE",
        env = CONFIG_ENV,
        help = "TOML config file (defaults to <config dir>/reelgraph/config.toml)"
    )]
    config: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        value_enum,
        default_value_t = OutputFormat::Text,
        help = "Output format for query results"
    )]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(about = "Serve the movie API over HTTP")]
    Serve(ServeCmd),

    #[command(about = "Run a single query and print the result")]
    Query(QueryCmd),
}

#[derive(Args, Debug)]
struct ServeCmd {
    #[arg(long, help = "Interface to bind")]
    host: Option<String>,

    #[arg(long, help = "Port to bind")]
    port: Option<u16>,

    #[arg(
        long = "allow-origin",
        value_name = "ORIGIN",
        help = "Allowed CORS origin (repeatable; replaces configured origins)"
    )]
    allow_origins: Vec<String>,

    #[command(flatten)]
    backend: BackendArgs,
}

#[derive(Args, Debug)]
struct QueryCmd {
    #[arg(value_enum)]
    operation: OperationArg,

    #[arg(long, help = "Movie title for movie and related")]
    title: Option<String>,

    #[arg(long, help = "Person name for by-director and by-actor")]
    name: Option<String>,

    #[command(flatten)]
    backend: BackendArgs,
}

#[derive(Args, Debug)]
struct BackendArgs {
    #[arg(long, value_enum, help = "Tuple source to query")]
    backend: Option<BackendArg>,

    #[arg(long, value_name = "FILE", help = "Nodes CSV for the memory backend")]
    nodes: Option<PathBuf>,

    #[arg(long, value_name = "FILE", help = "Edges CSV for the memory backend")]
    edges: Option<PathBuf>,

    #[arg(long, help = "Neo4j bolt URI (overrides NEO4J_URI)")]
    neo4j_uri: Option<String>,

    #[arg(long, help = "Neo4j user (overrides NEO4J_USER)")]
    neo4j_user: Option<String>,

    #[arg(long, help = "Neo4j password (overrides NEO4J_PASSWORD)")]
    neo4j_password: Option<String>,

    #[arg(long, help = "Database name, 3.x servers only (overrides NEO4J_DATABASE)")]
    neo4j_database: Option<String>,

    #[arg(long, help = "Neo4j server version (overrides NEO4J_VERSION)")]
    neo4j_version: Option<String>,
}

impl BackendArgs {
    fn apply(self, config: &mut AppConfig) {
        if let Some(backend) = self.backend {
            config.backend = backend.into();
        }
        if self.nodes.is_some() || self.edges.is_some() {
            config.memory.nodes = self.nodes;
            config.memory.edges = self.edges;
        }
        let neo4j = &mut config.neo4j;
        for (value, slot) in [
            (self.neo4j_uri, &mut neo4j.uri),
            (self.neo4j_user, &mut neo4j.user),
            (self.neo4j_password, &mut neo4j.password),
            (self.neo4j_database, &mut neo4j.database),
            (self.neo4j_version, &mut neo4j.version),
        ] {
            if let Some(value) = value {
                *slot = value;
            }
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum BackendArg {
    Neo4j,
    Memory,
}

impl From<BackendArg> for BackendKind {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Neo4j => BackendKind::Neo4j,
            BackendArg::Memory => BackendKind::Memory,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum OperationArg {
    #[value(name = "all")]
    All,
    #[value(name = "movie")]
    Movie,
    #[value(name = "related")]
    Related,
    #[value(name = "by-director")]
    ByDirector,
    #[value(name = "by-actor")]
    ByActor,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_process_env();

    match cli.command {
        Command::Serve(cmd) => {
            server::install_tracing_subscriber();
            cmd.backend.apply(&mut config);
            if let Some(host) = cmd.host {
                config.server.host = host;
            }
            if let Some(port) = cmd.port {
                config.server.port = port;
            }
            if !cmd.allow_origins.is_empty() {
                config.server.allow_origins = cmd.allow_origins;
            }
            let service = MovieService::new(source::open(&config).await?);
            server::serve(&config.server, service).await?;
        }
        Command::Query(cmd) => {
            let operation = build_operation(cmd.operation, cmd.title, cmd.name)?;
            cmd.backend.apply(&mut config);
            run_query(&config, &operation, cli.format).await?;
        }
    }

    Ok(())
}

fn build_operation(
    arg: OperationArg,
    title: Option<String>,
    name: Option<String>,
) -> Result<Operation, Box<dyn Error>> {
    let title = || title.ok_or("--title is required for this operation");
    let name = || name.ok_or("--name is required for this operation");
    let operation = match arg {
        OperationArg::All => Operation::AllMovies,
        OperationArg::Movie => Operation::MovieByTitle { title: title()? },
        OperationArg::Related => Operation::WithinHops { title: title()? },
        OperationArg::ByDirector => Operation::ByDirector { name: name()? },
        OperationArg::ByActor => Operation::ByActor { name: name()? },
    };
    Ok(operation)
}

async fn run_query(
    config: &AppConfig,
    operation: &Operation,
    format: OutputFormat,
) -> Result<(), Box<dyn Error>> {
    let ui = Ui::new(format == OutputFormat::Json);
    let service = MovieService::new(source::open(config).await?);

    let task = ui.task(format!("{} via {}", operation.name(), service.kind()));
    let result = service.run(operation).await;
    let elapsed = task.finish();

    let output = match result {
        Ok(output) => output,
        Err(err) if err.is_not_found() => {
            ui.warn(&err.to_string());
            std::process::exit(NOT_FOUND_EXIT);
        }
        Err(err) => return Err(Box::new(err)),
    };

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&output)?;
            println!("{json}");
        }
        OutputFormat::Text => print_output_text(&ui, &output, elapsed),
    }
    Ok(())
}

fn print_output_text(ui: &Ui, output: &QueryOutput, elapsed: std::time::Duration) {
    let movies = output.movies();
    for movie in movies {
        ui.movie(movie);
    }
    let noun = if movies.len() == 1 { "movie" } else { "movies" };
    ui.info(&format!(
        "{} {noun} in {}",
        movies.len(),
        ui::format_duration(elapsed)
    ));
}
