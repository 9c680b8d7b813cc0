use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use controlroom_api::{ControlRoomClient, ControlRoomError, Method};
use controlroom_engine::ControlRoom;
use controlroom_types::{
    BatchOperation, GetAssetInput, GetStepRunArtifactInput, GetWorkItemsInput, ListProcessRunsInput, ListStepRunArtifactsInput, ListStepRunsInput,
    ListWorkItemsInput, RetryWorkItemsInput, StartProcessRunInput, UpdateWorkItemPayloadInput,
};
use serde::Serialize;
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "controlroom", version, about = "Query and manage a Control Room workspace")]
struct Cli {
    /// Print the request a mutating command would send instead of sending it.
    #[arg(long, global = true)]
    dry_run: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Processes defined in the workspace.
    #[command(subcommand)]
    Processes(ProcessesCommand),
    /// Process runs.
    #[command(subcommand)]
    Runs(RunsCommand),
    /// Step runs and their artifacts.
    #[command(subcommand)]
    Steps(StepsCommand),
    /// Workers attached to the workspace.
    #[command(subcommand)]
    Workers(WorkersCommand),
    /// Workspace assets.
    #[command(subcommand)]
    Assets(AssetsCommand),
    /// Work items of a process run.
    #[command(subcommand)]
    WorkItems(WorkItemsCommand),
    /// Print the JSON Schema of an operation input.
    Schema {
        #[arg(value_enum)]
        operation: SchemaTarget,
    },
}

#[derive(Debug, Subcommand)]
enum ProcessesCommand {
    List,
    /// Start a new run of a process.
    Start {
        #[arg(long)]
        process_id: String,
    },
}

#[derive(Debug, Subcommand)]
enum RunsCommand {
    /// List runs of a process (first page only).
    List(RunsListArgs),
}

#[derive(Debug, Args)]
struct RunsListArgs {
    #[arg(long)]
    process_id: String,
    /// Maximum number of runs to return.
    #[arg(long, default_value_t = 10, conflicts_with = "no_limit")]
    limit: u32,
    /// Send the request without a limit.
    #[arg(long)]
    no_limit: bool,
    /// Filter by run state; unsupported values are ignored.
    #[arg(long)]
    state: Option<String>,
}

#[derive(Debug, Subcommand)]
enum StepsCommand {
    /// Step runs of a process run.
    List {
        #[arg(long)]
        process_run_id: String,
    },
    /// Artifacts of a step run.
    Artifacts {
        #[arg(long)]
        step_run_id: String,
    },
    /// One artifact of a step run.
    Artifact {
        #[arg(long)]
        step_run_id: String,
        #[arg(long)]
        artifact_id: String,
    },
}

#[derive(Debug, Subcommand)]
enum WorkersCommand {
    List,
}

#[derive(Debug, Subcommand)]
enum AssetsCommand {
    List,
    Get {
        #[arg(long)]
        asset_id: String,
    },
}

#[derive(Debug, Subcommand)]
enum WorkItemsCommand {
    /// Every work item of a process run, across all pages.
    List {
        #[arg(long)]
        process_id: String,
        #[arg(long)]
        process_run_id: String,
        /// Filter by work item state; unsupported values are ignored.
        #[arg(long)]
        state: Option<String>,
    },
    /// Fetch work items by id, stopping at the first failure.
    Get {
        #[arg(required = true)]
        work_item_ids: Vec<String>,
    },
    /// Replace work item payloads, reporting one outcome per valid entry.
    Update(UpdateArgs),
    /// Retry work items in one batch operation.
    Retry {
        #[arg(required = true)]
        work_item_ids: Vec<String>,
    },
}

#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
struct UpdateArgs {
    /// Updates as JSON: an array of `{work_item_id, payload}` or `{"work_item_updates": [...]}`.
    #[arg(long)]
    updates: Option<String>,
    /// Read the updates JSON from a file.
    #[arg(long)]
    file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SchemaTarget {
    ListProcessRuns,
    ListStepRuns,
    ListStepRunArtifacts,
    GetStepRunArtifact,
    GetAsset,
    StartProcessRun,
    ListWorkItems,
    GetWorkItems,
    UpdateWorkItemPayload,
    RetryWorkItems,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    if let Err(error) = run(cli).await {
        if let Some(hint) = error.downcast_ref::<ControlRoomError>().and_then(ControlRoomError::hint) {
            eprintln!("hint: {hint}");
        }
        return Err(error);
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

async fn run(cli: Cli) -> Result<()> {
    if let Command::Schema { operation } = &cli.command {
        return print_json(&input_schema(*operation));
    }

    let client = ControlRoomClient::from_env()?;
    debug!(config = ?client.config(), "resolved workspace configuration");
    let room = ControlRoom::from_client(client);

    match cli.command {
        Command::Processes(ProcessesCommand::List) => print_json(&room.list_processes().await?),
        Command::Processes(ProcessesCommand::Start { process_id }) => {
            let input = StartProcessRunInput { process_id };
            if cli.dry_run {
                let url = room.endpoints().start_process_run(&input.process_id)?;
                return print_json(&room.gateway().preview_request(&Method::POST, &url, None));
            }
            print_json(&room.start_process_run(&input).await?)
        }
        Command::Runs(RunsCommand::List(args)) => {
            let input = ListProcessRunsInput {
                process_id: args.process_id,
                limit: (!args.no_limit).then_some(args.limit),
                state: args.state,
            };
            print_json(&room.list_process_runs(&input).await?)
        }
        Command::Steps(StepsCommand::List { process_run_id }) => {
            print_json(&room.list_step_runs(&ListStepRunsInput { process_run_id }).await?)
        }
        Command::Steps(StepsCommand::Artifacts { step_run_id }) => {
            print_json(&room.list_step_run_artifacts(&ListStepRunArtifactsInput { step_run_id }).await?)
        }
        Command::Steps(StepsCommand::Artifact { step_run_id, artifact_id }) => {
            let input = GetStepRunArtifactInput { step_run_id, artifact_id };
            print_json(&room.get_step_run_artifact(&input).await?)
        }
        Command::Workers(WorkersCommand::List) => print_json(&room.list_workers().await?),
        Command::Assets(AssetsCommand::List) => print_json(&room.list_assets().await?),
        Command::Assets(AssetsCommand::Get { asset_id }) => print_json(&room.get_asset(&GetAssetInput { asset_id }).await?),
        Command::WorkItems(WorkItemsCommand::List {
            process_id,
            process_run_id,
            state,
        }) => {
            let input = ListWorkItemsInput {
                process_id,
                process_run_id,
                state,
            };
            print_json(&room.list_work_items(&input).await?)
        }
        Command::WorkItems(WorkItemsCommand::Get { work_item_ids }) => {
            print_json(&room.get_all_work_items(&GetWorkItemsInput { work_item_ids }).await?)
        }
        Command::WorkItems(WorkItemsCommand::Update(args)) => {
            let input = load_updates(&args).await?;
            if cli.dry_run {
                return print_json(&preview_updates(&room, &input)?);
            }
            print_json(&room.update_work_item_payloads(&input).await)
        }
        Command::WorkItems(WorkItemsCommand::Retry { work_item_ids }) => {
            let input = RetryWorkItemsInput { work_item_ids };
            if cli.dry_run {
                let body = serde_json::to_value(BatchOperation::retry(input.work_item_ids.clone()))?;
                let url = room.endpoints().work_items_batch();
                return print_json(&room.gateway().preview_request(&Method::POST, &url, Some(&body)));
            }
            print_json(&room.retry_work_items(&input).await?)
        }
        Command::Schema { operation } => print_json(&input_schema(operation)),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn input_schema(target: SchemaTarget) -> schemars::Schema {
    match target {
        SchemaTarget::ListProcessRuns => schemars::schema_for!(ListProcessRunsInput),
        SchemaTarget::ListStepRuns => schemars::schema_for!(ListStepRunsInput),
        SchemaTarget::ListStepRunArtifacts => schemars::schema_for!(ListStepRunArtifactsInput),
        SchemaTarget::GetStepRunArtifact => schemars::schema_for!(GetStepRunArtifactInput),
        SchemaTarget::GetAsset => schemars::schema_for!(GetAssetInput),
        SchemaTarget::StartProcessRun => schemars::schema_for!(StartProcessRunInput),
        SchemaTarget::ListWorkItems => schemars::schema_for!(ListWorkItemsInput),
        SchemaTarget::GetWorkItems => schemars::schema_for!(GetWorkItemsInput),
        SchemaTarget::UpdateWorkItemPayload => schemars::schema_for!(UpdateWorkItemPayloadInput),
        SchemaTarget::RetryWorkItems => schemars::schema_for!(RetryWorkItemsInput),
    }
}

async fn load_updates(args: &UpdateArgs) -> Result<UpdateWorkItemPayloadInput> {
    let text = match (&args.updates, &args.file) {
        (Some(inline), _) => inline.clone(),
        (None, Some(path)) => read_updates_file(path).await?,
        (None, None) => bail!("either --updates or --file is required"),
    };
    parse_updates(&text)
}

async fn read_updates_file(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("read updates from {}", path.display()))
}

/// Accept either a bare array of updates or the full operation input.
fn parse_updates(text: &str) -> Result<UpdateWorkItemPayloadInput> {
    let document: Value = serde_json::from_str(text).context("updates are not valid JSON")?;
    let document = match document {
        Value::Array(entries) => json!({ "work_item_updates": entries }),
        other => other,
    };
    serde_json::from_value(document).context("updates do not match the expected shape")
}

fn preview_updates(room: &ControlRoom, input: &UpdateWorkItemPayloadInput) -> Result<Vec<Value>> {
    let client = room.gateway();
    input
        .work_item_updates
        .iter()
        .filter(|update| update.is_actionable())
        .map(|update| -> Result<Value> {
            let url = room.endpoints().work_item_payload(&update.work_item_id)?;
            let body = json!({ "payload": update.payload });
            Ok(client.preview_request(&Method::POST, &url, Some(&body)))
        })
        .collect()
}
