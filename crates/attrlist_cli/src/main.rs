//! Command-line editor for repeatable block attribute lists.

use anyhow::Context;
use attrlist_core::config::expand_tilde;
use attrlist_core::{
    AttributeStore, Config, Direction, EditOp, FieldValue, JsonFileStore, ListEditor, Record,
    RecordList, Renumber, DEFAULT_RENUMBER_START, DEFAULT_RENUMBER_WIDTH,
};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use std::io::{self, Read};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};


#[derive(Parser)]
#[command(name = "attrlist", about = "Edit repeatable block attribute lists", version)]
struct Cli {
    /// Attribute document (can also be set via ATTRLIST_DOC_PATH)
    #[arg(short, long, env = "ATTRLIST_DOC_PATH", global = true)]
    doc: Option<String>,

    /// Schema file with templates and field kinds (ATTRLIST_SCHEMA_PATH)
    #[arg(short, long, env = "ATTRLIST_SCHEMA_PATH", global = true)]
    schema: Option<String>,

    /// Reject edits that do not match the attribute schema
    #[arg(long, global = true)]
    strict: bool,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum DirectionArg {
    Up,
    Down,
}

impl From<DirectionArg> for Direction {
    fn from(value: DirectionArg) -> Self {
        match value {
            DirectionArg::Up => Direction::Up,
            DirectionArg::Down => Direction::Down,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
    /// Print the records of an attribute
    Show { attribute: String },
    /// List attribute names in the document
    List,
    /// Create an attribute from its schema seed
    Insert { attribute: String },
    /// Delete an attribute
    Drop { attribute: String },
    /// Append a record (schema template unless --template is given)
    Add {
        attribute: String,
        /// Record as a JSON object
        #[arg(short, long)]
        template: Option<String>,
    },
    /// Set one field of a record
    Update {
        attribute: String,
        index: usize,
        field: String,
        value: String,
        /// Store the value as text even if it parses as JSON
        #[arg(long)]
        text: bool,
    },
    /// Remove a record
    Remove {
        attribute: String,
        index: usize,
        /// Re-derive this positional field for the remaining records
        #[arg(long)]
        renumber: Option<String>,
        #[arg(long, default_value_t = DEFAULT_RENUMBER_START)]
        start: usize,
        #[arg(long, default_value_t = DEFAULT_RENUMBER_WIDTH)]
        width: usize,
    },
    /// Swap a record with its neighbour
    Move {
        attribute: String,
        index: usize,
        #[arg(value_enum)]
        direction: DirectionArg,
    },
    /// Set one entry of a nested list
    UpdateNested {
        attribute: String,
        index: usize,
        field: String,
        nested_index: usize,
        value: String,
        #[arg(long)]
        text: bool,
    },
    /// Append an entry to a nested list
    AddNested {
        attribute: String,
        index: usize,
        field: String,
        value: String,
        #[arg(long)]
        text: bool,
    },
    /// Remove an entry from a nested list
    RemoveNested {
        attribute: String,
        index: usize,
        field: String,
        nested_index: usize,
    },
    /// Swap a nested entry with its neighbour
    MoveNested {
        attribute: String,
        index: usize,
        field: String,
        nested_index: usize,
        #[arg(value_enum)]
        direction: DirectionArg,
    },
    /// Apply a JSON array of edit operations in one write
    Apply {
        attribute: String,
        /// Read operations from a file instead of stdin
        #[arg(short, long)]
        file: Option<String>,
    },
}

/// What a parsed command asks the editor to do.
#[derive(Debug, PartialEq)]
enum Request {
    Names,
    Show(String),
    Insert(String),
    Drop(String),
    Edit { attribute: String, ops: Vec<EditOp> },
}

fn parse_value(raw: &str, force_text: bool) -> FieldValue {
    if force_text {
        return FieldValue::from(raw);
    }
    serde_json::from_str(raw).unwrap_or_else(|_| FieldValue::from(raw))
}

fn parse_template(raw: &str) -> anyhow::Result<Record> {
    serde_json::from_str(raw).with_context(|| format!("Invalid record template: {}", raw))
}

/// Accept either a JSON array of operations or a single operation object.
fn parse_ops(raw: &str) -> anyhow::Result<Vec<EditOp>> {
    let value: serde_json::Value =
        serde_json::from_str(raw).context("Edit operations are not valid JSON")?;
    let ops: Result<Vec<EditOp>, _> = if value.is_array() {
        serde_json::from_value(value)
    } else {
        serde_json::from_value::<EditOp>(value).map(|op| vec![op])
    };
    ops.context("Invalid edit operation")
}

fn read_input(file: Option<&str>) -> anyhow::Result<String> {
    match file {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))
        }
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read stdin")?;
            Ok(buffer)
        }
    }
}

fn edit(attribute: String, op: EditOp) -> Request {
    Request::Edit {
        attribute,
        ops: vec![op],
    }
}

fn build_request(command: Commands) -> anyhow::Result<Request> {
    let request = match command {
        Commands::Completions { .. } => {
            anyhow::bail!("completions are generated before any request is built")
        }
        Commands::Show { attribute } => Request::Show(attribute),
        Commands::List => Request::Names,
        Commands::Insert { attribute } => Request::Insert(attribute),
        Commands::Drop { attribute } => Request::Drop(attribute),
        Commands::Add {
            attribute,
            template,
        } => {
            let template = template.as_deref().map(parse_template).transpose()?;
            edit(attribute, EditOp::Add { template })
        }
        Commands::Update {
            attribute,
            index,
            field,
            value,
            text,
        } => edit(
            attribute,
            EditOp::Update {
                index,
                field,
                value: parse_value(&value, text),
            },
        ),
        Commands::Remove {
            attribute,
            index,
            renumber,
            start,
            width,
        } => edit(
            attribute,
            EditOp::Remove {
                index,
                renumber: renumber
                    .map(|field| Renumber::new(field).start_at(start).with_width(width)),
            },
        ),
        Commands::Move {
            attribute,
            index,
            direction,
        } => edit(
            attribute,
            EditOp::Move {
                index,
                direction: direction.into(),
            },
        ),
        Commands::UpdateNested {
            attribute,
            index,
            field,
            nested_index,
            value,
            text,
        } => edit(
            attribute,
            EditOp::UpdateNested {
                index,
                field,
                nested_index,
                value: parse_value(&value, text),
            },
        ),
        Commands::AddNested {
            attribute,
            index,
            field,
            value,
            text,
        } => edit(
            attribute,
            EditOp::AddNested {
                index,
                field,
                value: parse_value(&value, text),
            },
        ),
        Commands::RemoveNested {
            attribute,
            index,
            field,
            nested_index,
        } => edit(
            attribute,
            EditOp::RemoveNested {
                index,
                field,
                nested_index,
            },
        ),
        Commands::MoveNested {
            attribute,
            index,
            field,
            nested_index,
            direction,
        } => edit(
            attribute,
            EditOp::MoveNested {
                index,
                field,
                nested_index,
                direction: direction.into(),
            },
        ),
        Commands::Apply { attribute, file } => Request::Edit {
            attribute,
            ops: parse_ops(&read_input(file.as_deref())?)?,
        },
    };
    Ok(request)
}

fn record_summary(record: &Record) -> String {
    record
        .fields()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_list_output(list: &RecordList<Record>, json: bool) -> anyhow::Result<String> {
    if json {
        return serde_json::to_string_pretty(list).context("response encoding error");
    }
    let rows: Vec<String> = list
        .iter()
        .enumerate()
        .map(|(index, record)| format!("{:>3}  {}", index, record_summary(record)))
        .collect();
    Ok(rows.join("\n"))
}

fn format_names_output(names: &[String], json: bool) -> anyhow::Result<String> {
    if json {
        return serde_json::to_string_pretty(names).context("response encoding error");
    }
    Ok(names.join("\n"))
}

/// Overlay command-line values on the environment configuration.
fn resolve_config(
    mut config: Config,
    doc: Option<String>,
    schema: Option<String>,
    strict: bool,
) -> Config {
    if let Some(doc) = doc.filter(|value| !value.trim().is_empty()) {
        config.doc_path = expand_tilde(doc);
    }
    if let Some(schema) = schema.filter(|value| !value.trim().is_empty()) {
        config.schema_path = Some(expand_tilde(schema));
    }
    config.strict |= strict;
    config
}

fn run<S: AttributeStore>(
    editor: &mut ListEditor<S>,
    request: Request,
    json: bool,
) -> anyhow::Result<String> {
    match request {
        Request::Names => {
            let names = editor.store().attributes()?;
            format_names_output(&names, json)
        }
        Request::Show(attribute) => format_list_output(&editor.get(&attribute)?, json),
        Request::Insert(attribute) => format_list_output(&editor.insert_block(&attribute)?, json),
        Request::Drop(attribute) => {
            let removed = editor.remove_block(&attribute)?;
            if json {
                return format_list_output(&removed, json);
            }
            Ok(format!(
                "Removed attribute: {} ({} records)",
                attribute,
                removed.len()
            ))
        }
        Request::Edit { attribute, ops } => {
            let list = editor
                .apply_all(&attribute, &ops)
                .with_context(|| format!("Edit on '{}' failed", attribute))?;
            format_list_output(&list, json)
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "attrlist=warn,attrlist_core=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let Cli {
        doc,
        schema,
        strict,
        json,
        command,
    } = Cli::parse();

    if let Commands::Completions { shell } = &command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let config = resolve_config(Config::from_env(), doc, schema, strict);
    tracing::debug!("Using attribute document {}", config.doc_path);
    let store = JsonFileStore::from_config(&config);
    let mut editor = ListEditor::from_config(store, &config)
        .with_context(|| format!("Failed to load schemas from {:?}", config.schema_path))?;

    let output = run(&mut editor, build_request(command)?, json)?;
    if !output.is_empty() {
        println!("{}", output);
    }
    Ok(())
}
