use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use elastical_core::ClientConfig;
use elastical_rs::{
    Client, CountOptions, CreateIndexOptions, DeleteOptions, GetMappingOptions, GetOptions,
    IndexOptions, Names, PutMappingOptions, Query, SearchOptions,
};
use serde_json::Value;

mod telemetry;

/// Command-line client for a search server's REST API
#[derive(Debug, Parser)]
#[command(name = "elastical", version, about)]
struct Cli {
    /// JSON config file with protocol, host, port and timeout
    #[arg(long, global = true)]
    config: Option<String>,

    #[arg(long, global = true, env = "ELASTICAL_HOST")]
    host: Option<String>,

    #[arg(long, global = true, env = "ELASTICAL_PORT")]
    port: Option<u16>,

    /// Request timeout in milliseconds
    #[arg(long, global = true, env = "ELASTICAL_TIMEOUT")]
    timeout: Option<u64>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create an index
    CreateIndex {
        index: String,
        /// Settings object as JSON
        #[arg(long)]
        settings: Option<String>,
        /// Mappings object as JSON
        #[arg(long)]
        mappings: Option<String>,
    },
    /// Delete one or more indices
    DeleteIndex {
        #[arg(required = true)]
        indices: Vec<String>,
    },
    /// Check whether indices exist
    Exists {
        #[arg(required = true)]
        indices: Vec<String>,
    },
    /// Index a document given as JSON
    Index {
        index: String,
        doc_type: String,
        /// Document as JSON
        document: String,
        #[arg(long)]
        id: Option<String>,
        /// Fail if the document already exists
        #[arg(long)]
        create: bool,
        #[arg(long)]
        refresh: bool,
        #[arg(long)]
        routing: Option<String>,
        #[arg(long)]
        version: Option<u64>,
    },
    /// Fetch a document
    Get {
        index: String,
        id: String,
        #[arg(long = "type")]
        doc_type: Option<String>,
        #[arg(long, value_delimiter = ',')]
        fields: Vec<String>,
        #[arg(long)]
        routing: Option<String>,
    },
    /// Delete a document
    Delete {
        index: String,
        doc_type: String,
        id: String,
        #[arg(long)]
        ignore_missing: bool,
        #[arg(long)]
        refresh: bool,
        #[arg(long)]
        routing: Option<String>,
    },
    /// Search documents
    Search(SearchArgs),
    /// Count matching documents
    Count {
        #[arg(long, value_delimiter = ',')]
        index: Vec<String>,
        #[arg(long = "type", value_delimiter = ',')]
        doc_type: Vec<String>,
        /// Query text or query DSL as JSON
        #[arg(long, short)]
        query: Option<String>,
    },
    /// Refresh indices, or all of them
    Refresh { indices: Vec<String> },
    /// Show or set a type mapping
    Mapping {
        #[arg(long, value_delimiter = ',')]
        index: Vec<String>,
        #[arg(long = "type")]
        doc_type: Option<String>,
        /// Mapping as JSON; when given the mapping is stored instead of shown
        #[arg(long)]
        put: Option<String>,
        #[arg(long)]
        ignore_conflicts: bool,
    },
}

#[derive(Debug, Args)]
struct SearchArgs {
    /// Query text or query DSL as JSON
    query: Option<String>,
    #[arg(long, value_delimiter = ',')]
    index: Vec<String>,
    #[arg(long = "type", value_delimiter = ',')]
    doc_type: Vec<String>,
    #[arg(long, value_delimiter = ',')]
    fields: Vec<String>,
    #[arg(long)]
    from: Option<u64>,
    #[arg(long)]
    size: Option<u64>,
    /// Sort specification as JSON
    #[arg(long)]
    sort: Option<String>,
    #[arg(long)]
    routing: Option<String>,
    #[arg(long)]
    search_type: Option<String>,
    #[arg(long)]
    explain: bool,
}

fn parse_json(what: &str, text: &str) -> Result<Value> {
    serde_json::from_str(text).with_context(|| format!("{what} is not valid JSON"))
}

fn parse_optional_json(what: &str, text: Option<&str>) -> Result<Option<Value>> {
    text.map(|text| parse_json(what, text)).transpose()
}

/// JSON objects are query DSL, anything else is query text
fn parse_query(text: &str) -> Query {
    match serde_json::from_str::<Value>(text) {
        Ok(value @ Value::Object(_)) => Query::Dsl(value),
        _ => Query::Text(text.to_string()),
    }
}

fn names(values: Vec<String>) -> Option<Names> {
    (!values.is_empty()).then(|| Names::new(values))
}

fn flag(set: bool) -> Option<bool> {
    set.then_some(true)
}

fn load_config(cli: &Cli) -> ClientConfig {
    let mut config = match &cli.config {
        Some(path) => ClientConfig::load(path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load {}, using defaults: {}", path, e);
            ClientConfig::default()
        }),
        None => ClientConfig::default(),
    };

    if let Some(host) = &cli.host {
        config.host = host.clone();
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(timeout) = cli.timeout {
        config.timeout = timeout;
    }
    config
}

fn print(value: &impl serde::Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run(client: &Client, command: Command) -> Result<()> {
    match command {
        Command::CreateIndex {
            index,
            settings,
            mappings,
        } => {
            let options = CreateIndexOptions {
                settings: parse_optional_json("settings", settings.as_deref())?,
                mappings: parse_optional_json("mappings", mappings.as_deref())?,
            };
            print(&client.create_index(&index, &options).await?.result)
        }
        Command::DeleteIndex { indices } => {
            print(&client.delete_index(indices).await?.result)
        }
        Command::Exists { indices } => {
            let exists = client.index_exists(indices).await?.result;
            print(&serde_json::json!({ "exists": exists }))
        }
        Command::Index {
            index,
            doc_type,
            document,
            id,
            create,
            refresh,
            routing,
            version,
        } => {
            let document = parse_json("document", &document)?;
            let options = IndexOptions {
                id,
                create,
                refresh: flag(refresh),
                routing,
                version,
                ..Default::default()
            };
            print(&client.index(&index, &doc_type, &document, &options).await?.result)
        }
        Command::Get {
            index,
            id,
            doc_type,
            fields,
            routing,
        } => {
            let options = GetOptions {
                doc_type,
                fields: names(fields),
                routing,
                ..Default::default()
            };
            print(&client.get(&index, &id, &options).await?.result)
        }
        Command::Delete {
            index,
            doc_type,
            id,
            ignore_missing,
            refresh,
            routing,
        } => {
            let options = DeleteOptions {
                ignore_missing,
                refresh: flag(refresh),
                routing,
                ..Default::default()
            };
            print(&client.delete(&index, &doc_type, &id, &options).await?.result)
        }
        Command::Search(args) => {
            let options = SearchOptions {
                index: names(args.index),
                doc_type: names(args.doc_type),
                query: args.query.as_deref().map(parse_query),
                fields: names(args.fields),
                from: args.from,
                size: args.size,
                sort: parse_optional_json("sort", args.sort.as_deref())?,
                routing: args.routing,
                search_type: args.search_type,
                explain: flag(args.explain),
                ..Default::default()
            };
            let results = client.search(&options).await?.result;
            tracing::info!(total = results.total, returned = results.hits.len(), "search complete");
            print(&results)
        }
        Command::Count {
            index,
            doc_type,
            query,
        } => {
            let options = CountOptions {
                index: names(index),
                doc_type: names(doc_type),
                query: query.as_deref().map(parse_query),
                ..Default::default()
            };
            print(&client.count(&options).await?.result)
        }
        Command::Refresh { indices } => print(&client.refresh(names(indices)).await?.result),
        Command::Mapping {
            index,
            doc_type,
            put,
            ignore_conflicts,
        } => match put {
            Some(mapping) => {
                let index = names(index).context("--index is required with --put")?;
                let doc_type = doc_type.context("--type is required with --put")?;
                let options = PutMappingOptions {
                    ignore_conflicts: flag(ignore_conflicts),
                };
                let mapping = parse_json("mapping", &mapping)?;
                print(
                    &client
                        .put_mapping(index, &doc_type, mapping, &options)
                        .await?
                        .result,
                )
            }
            None => {
                let options = GetMappingOptions {
                    index: names(index),
                    doc_type: doc_type.map(Names::from),
                };
                print(&client.get_mapping(&options).await?.result)
            }
        },
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = telemetry::init_telemetry(cli.log_json, cli.verbose)?;

    let config = load_config(&cli);
    tracing::debug!("Connecting to {}", config.base_url());
    tracing::debug!("  Timeout: {}ms", config.timeout);

    let client = Client::with_config(config);
    run(&client, cli.command).await
}
