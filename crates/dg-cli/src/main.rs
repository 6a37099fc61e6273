//! Datagrid RS demo
//!
//! Drives a grid over the sample user table from the command line. Each
//! positional argument is one edit; after every edit the query string and
//! the displayed page are printed.
//!
//! ```text
//! datagrid sort:name filter:age:gt:25 size:5
//! datagrid --query '?order[0][field]=age&order[0][dir]=desc&page=1&pageSize=10' page:1
//! ```

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dg_core::config::GridConfig;
use dg_grid::{DataSource, FetchOutcome, GridController, MemoryDataSource};
use dg_queries::decode;

mod commands;
mod users;

use commands::GridCommand;

/// Filter, sort, and page the sample user table.
#[derive(Parser)]
#[command(name = "datagrid", version, about, long_about = None)]
struct Cli {
    /// Start from a decoded query string instead of the empty query
    #[arg(long)]
    query: Option<String>,

    /// Print the presentation model as JSON instead of a text table
    #[arg(long)]
    json: bool,

    /// Edits: sort:<field>, filter:<field>:<op>:<value>, remove:<field>:<index>,
    /// clear, page:<n>, size:<n>
    commands: Vec<GridCommand>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    dotenvy::dotenv().ok();
    let config = GridConfig::from_env().unwrap_or_else(|e| {
        warn!("Failed to load config from env: {}, using defaults", e);
        GridConfig::default()
    });

    let cli = Cli::parse();

    let columns = users::columns();
    let source = MemoryDataSource::new(columns.clone(), users::sample_users());
    let mut grid = GridController::new(columns, source, config);
    if let Some(query) = &cli.query {
        grid = grid.with_initial_state(decode(query)?);
    }

    info!(
        version = env!("CARGO_PKG_VERSION"),
        commands = cli.commands.len(),
        "Starting Datagrid RS"
    );

    grid.refresh().await?;
    print_grid(&grid, "initial", cli.json)?;

    for command in &cli.commands {
        let outcome = command.run(&grid).await?;
        if outcome == FetchOutcome::Skipped {
            println!("# {command:?}: no change");
            continue;
        }
        print_grid(&grid, &format!("{command:?}"), cli.json)?;
    }

    Ok(())
}

/// Initialize tracing/logging on stderr
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,dg_grid=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true),
        )
        .init();
}

fn print_grid<R, S>(grid: &GridController<R, S>, title: &str, json: bool) -> anyhow::Result<()>
where
    R: Send + Sync + 'static,
    S: DataSource<R>,
{
    let view = grid.view();
    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        println!("# {title}");
        println!("{}", view.query_string);
        println!("{view}");
        println!();
    }
    Ok(())
}
