//! agql CLI - Compile AGQL expressions to MySQL
//!
//! Usage:
//!   agql graph <EXPR> [--schema <file>] [--select S] [--where W] [--order O] [--limit L]
//!   agql participant <EXPR> [--schema <file>] ...
//!   agql escape <TEXT>
//!   agql layers [--schema <file>]
//!
//! Examples:
//!   agql graph "my('corpus').label = 'CC'" --schema schema.toml
//!   agql participant "'NA' IN labels('participant_gender')" --output json
//!   agql escape "O'Brien"

use agql::compile::{
    AgqlError, AgqlToSql, Clause, Fault, GraphAgqlToSql, ParticipantAgqlToSql, Root,
};
use agql::config::Settings;
use agql::ql;
use agql::schema::Schema;
use ariadne::{Color, Config, IndexType, Label, Report, ReportKind, Source};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::ops::Range;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "agql")]
#[command(about = "Compile Annotation Graph Query Language expressions to MySQL")]
#[command(version)]
struct Cli {
    /// Path to agql.toml (defaults to $AGQL_CONFIG, then ./agql.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a transcript query
    Graph {
        /// AGQL filter expression
        expression: String,

        #[command(flatten)]
        query: QueryArgs,
    },

    /// Compile a participant query
    Participant {
        /// AGQL filter expression
        expression: String,

        #[command(flatten)]
        query: QueryArgs,
    },

    /// Escape single quotes for use in a SQL string literal
    Escape {
        text: String,
    },

    /// List schema layers and their storage categories
    Layers {
        /// Path to the schema file (.toml or .json)
        #[arg(short, long)]
        schema: Option<PathBuf>,
    },
}

#[derive(Args)]
struct QueryArgs {
    /// Path to the schema file (.toml or .json)
    #[arg(short, long)]
    schema: Option<PathBuf>,

    /// SELECT list
    #[arg(long)]
    select: Option<String>,

    /// Raw SQL condition AND-ed with the filter
    #[arg(long = "where")]
    extra_where: Option<String>,

    /// AGQL order expression
    #[arg(long)]
    order: Option<String>,

    /// Raw LIMIT clause, e.g. "LIMIT 0,20"
    #[arg(long)]
    limit: Option<String>,

    /// Output format
    #[arg(short, long, default_value = "sql")]
    output: OutputFormat,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// SQL only
    Sql,
    /// SQL and parameters as JSON
    Json,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let settings = match load_settings(cli.config.as_ref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Commands::Graph { expression, query } => {
            cmd_compile(&settings, Root::Transcript, &expression, query)
        }
        Commands::Participant { expression, query } => {
            cmd_compile(&settings, Root::Participant, &expression, query)
        }
        Commands::Escape { text } => {
            println!("{}", ql::esc(&text));
            ExitCode::SUCCESS
        }
        Commands::Layers { schema } => cmd_layers(&settings, schema),
    }
}

fn load_settings(path: Option<&PathBuf>) -> Result<Settings, agql::config::SettingsError> {
    match path {
        Some(path) => Settings::from_file(path),
        None => Settings::load(),
    }
}

fn load_schema(settings: &Settings, path: Option<PathBuf>) -> Result<Schema, String> {
    let path = match path {
        Some(path) => path,
        None => settings
            .schema_path()
            .map_err(|e| e.to_string())?
            .ok_or_else(|| "no schema given; use --schema or set `schema` in agql.toml".to_string())?,
    };
    Schema::from_file(&path).map_err(|e| format!("'{}': {}", path.display(), e))
}

fn cmd_compile(settings: &Settings, root: Root, expression: &str, args: QueryArgs) -> ExitCode {
    let schema = match load_schema(settings, args.schema) {
        Ok(schema) => schema,
        Err(e) => {
            eprintln!("Error loading schema {}", e);
            return ExitCode::FAILURE;
        }
    };

    let defaults = settings.defaults_for(root);
    let select = args
        .select
        .unwrap_or_else(|| settings.select_for(root).to_string());
    let extra_where = args.extra_where.or_else(|| defaults.extra_where.clone());
    let order = args.order.or_else(|| defaults.order.clone());
    let limit = args.limit.or_else(|| defaults.limit.clone());

    let compiler: Box<dyn AgqlToSql + '_> = match root {
        Root::Transcript => Box::new(GraphAgqlToSql::new(&schema)),
        Root::Participant => Box::new(ParticipantAgqlToSql::new(&schema)),
    };
    let result = compiler.sql_for(
        expression,
        &select,
        extra_where.as_deref(),
        order.as_deref(),
        limit.as_deref(),
    );

    match result {
        Ok(query) => {
            match args.output {
                OutputFormat::Sql => println!("{}", query.sql),
                OutputFormat::Json => match serde_json::to_string_pretty(&query) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("Error serializing query: {}", e);
                        return ExitCode::FAILURE;
                    }
                },
            }
            ExitCode::SUCCESS
        }
        Err(error) => {
            report_faults(&error);
            ExitCode::FAILURE
        }
    }
}

/// Render every fault against the clause it was found in.
fn clause_name(clause: Clause) -> &'static str {
    match clause {
        Clause::Filter => "filter",
        Clause::Order => "order",
    }
}

/// Fault spans are byte offsets into the clause source.
fn fault_report(fault: &Fault, color: bool) -> Report<'static, (&'static str, Range<usize>)> {
    let name = clause_name(fault.clause);
    let span = fault.span.clone();

    Report::build(ReportKind::Error, (name, span.clone()))
        .with_config(
            Config::default()
                .with_index_type(IndexType::Byte)
                .with_color(color),
        )
        .with_message(fault.kind.to_string())
        .with_label(
            Label::new((name, span))
                .with_message(fault.kind.to_string())
                .with_color(Color::Red),
        )
        .finish()
}

fn report_faults(error: &AgqlError) {
    for fault in &error.faults {
        let name = clause_name(fault.clause);
        let source = error.source_of(fault.clause);

        let printed = fault_report(fault, true).eprint((name, Source::from(source)));

        if printed.is_err() {
            eprintln!("error: {}", fault);
        }
    }
    eprintln!("{} error(s) in AGQL expression", error.len());
}

fn cmd_layers(settings: &Settings, path: Option<PathBuf>) -> ExitCode {
    let schema = match load_schema(settings, path) {
        Ok(schema) => schema,
        Err(e) => {
            eprintln!("Error loading schema {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("Root: {}", schema.root_layer_id());
    for (role, id) in schema.roles().named() {
        println!("  {:<12} {}", role, id);
    }
    println!();

    println!("Layers:");
    for layer in schema.layers() {
        let category = schema
            .category(&layer.id)
            .map(|c| c.name())
            .unwrap_or("(unmapped)");
        println!("  {:<24} {:<22} {}", layer.id, category, layer.description);
    }

    ExitCode::SUCCESS
}
