use clap::Parser;
use nagare::graph::ConstantCondition;
use nagare::prelude::*;
use std::result::Result;
use std::fs;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Identifier the CLI registers the loaded definition under.
const DEFINITION_ID: DefinitionId = 1;

/// Dry-runs a workflow definition against an in-memory store
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the flow definition JSON file (an array of node records)
    definition_path: String,

    /// Actor that starts the instance and completes its work items
    #[arg(short, long, default_value = "admin")]
    actor: String,

    /// Role granted to the actor (repeatable)
    #[arg(short, long = "role")]
    roles: Vec<String>,

    /// Fixed result for a named condition, as `name=value` (repeatable)
    #[arg(short, long = "branch", value_parser = parse_branch)]
    branches: Vec<(String, ConditionValue)>,

    /// Correlation id supplied with every completion
    #[arg(long)]
    ref_id: Option<String>,

    /// Print the flow graph and exit
    #[arg(short, long)]
    describe: bool,

    /// Engine configuration JSON file (missing keys keep their defaults)
    #[arg(short, long)]
    config: Option<String>,

    /// Fail when an exclusive gateway has no branch for its condition result
    #[arg(long)]
    strict: bool,

    /// Match branch tags by exact type and value instead of boolean-like coercion
    #[arg(long)]
    exact: bool,

    /// Stop after this many completions
    #[arg(long, default_value_t = 100)]
    max_steps: usize,

    /// Write a bincode snapshot of the final runtime state to this path
    #[arg(long)]
    snapshot: Option<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("nagare=info,warn")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let definition = FlowDefinition::from_file(DEFINITION_ID, &cli.definition_path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to load definition: {}", e)));

    let mut conditions = ConditionRegistry::new();
    for (name, result) in &cli.branches {
        conditions.register(name, ConstantCondition(result.clone()));
    }
    // Conditions without an explicit --branch evaluate to null.
    for name in definition.nodes.iter().filter_map(|n| n.condition.as_deref()) {
        if !conditions.contains(name) {
            conditions.register(name, ConstantCondition(ConditionValue::Null));
        }
    }

    if cli.describe {
        let graph = FlowGraph::builder(definition)
            .with_conditions(&conditions)
            .build()
            .unwrap_or_else(|e| exit_with_error(&format!("Invalid definition: {}", e)));
        print!("{}", GraphFormatter::format_graph(&graph));
        return;
    }

    run_dry(cli, definition, conditions);
}

fn load_config(cli: &Cli) -> EngineConfig {
    let mut config = match &cli.config {
        Some(path) => {
            let content = fs::read_to_string(path).unwrap_or_else(|e| {
                exit_with_error(&format!("Could not read config '{}': {}", path, e))
            });
            serde_json::from_str(&content).unwrap_or_else(|e| {
                exit_with_error(&format!("Invalid config '{}': {}", path, e))
            })
        }
        None => EngineConfig::default(),
    };
    if cli.strict {
        config.strict_branching = true;
    }
    if cli.exact {
        config.branch_matching = BranchMatching::Exact;
    }
    config
}

fn run_dry(cli: Cli, definition: FlowDefinition, conditions: ConditionRegistry) {
    let total_start = Instant::now();

    let store = Arc::new(MemoryStore::new().with_definition(definition));
    let mut roles = StaticRoles::new();
    for role in &cli.roles {
        roles.grant(&cli.actor, role);
    }
    let engine = Engine::builder(store.clone(), Arc::new(roles))
        .with_conditions(&conditions)
        .with_config(load_config(&cli))
        .build();

    println!("Starting instance of '{}' as '{}'...", cli.definition_path, cli.actor);
    let started = engine
        .start_instance(DEFINITION_ID, &cli.actor)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to start instance: {}", e)));
    let process_id = started.process.id;
    print_activations(&started.activations);
    let mut created = count_created(&started.activations);

    let mut steps = 0;
    while steps < cli.max_steps {
        let visible = engine
            .list_visible_work_items(&cli.actor, Some(process_id))
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to list work items: {}", e)));
        let Some(next) = visible.first() else {
            break;
        };

        println!("\nCompleting work item #{} ('{}')", next.id, next.node_code);
        let completion = engine
            .complete_task(next.id, &cli.actor, cli.ref_id.as_deref())
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to complete task: {}", e)));
        print_activations(&completion.activations);
        created += count_created(&completion.activations);
        steps += 1;
    }

    let process = engine
        .process(process_id)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to load process: {}", e)));
    let waiting: Vec<_> = store
        .work_items_of(process_id)
        .into_iter()
        .filter(|item| !item.completed)
        .collect();

    println!("\n--- Run Summary ---");
    println!("Process:              #{}", process.id);
    println!("Status:               {:?}", process.status);
    println!("Ref id:               {}", process.ref_id.as_deref().unwrap_or("-"));
    println!("Branch matching:      {:?}", engine.config().branch_matching);
    println!("Completions:          {}", steps);
    println!("Work items created:   {}", created);
    println!("Waiting on others:    {}", waiting.len());
    for item in &waiting {
        let addressed = item
            .assignee
            .as_deref()
            .or(item.group.as_deref())
            .or(item.permission.as_deref())
            .unwrap_or("nobody");
        println!("  -> #{} '{}' (for {})", item.id, item.node_code, addressed);
    }
    println!("Total Execution:      {:?}", total_start.elapsed());

    if let Some(path) = &cli.snapshot {
        store
            .save_snapshot(path)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to write snapshot: {}", e)));
        println!("Snapshot written to '{}'", path);
    }
}

fn count_created(activations: &[Activation]) -> usize {
    activations.iter().filter_map(Activation::work_item_id).count()
}

fn print_activations(activations: &[Activation]) {
    if activations.is_empty() {
        println!("  -> (nothing activated)");
    }
    for activation in activations {
        println!("  -> {}", activation);
    }
}

fn parse_branch(s: &str) -> Result<(String, ConditionValue), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected `name=value`, got '{}'", s))?;
    let Ok(result) = value.parse::<ConditionValue>();
    Ok((name.to_string(), result))
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
