//! oxide-ddl CLI
//!
//! Renders JSON change plans into dialect-specific DDL and runs catalog
//! lookups against live servers.

mod config;
mod plan;

use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use tracing::{Level, debug, info};
use tracing_subscriber::FmtSubscriber;

use oxide_ddl_core::introspect::{primary_key, version};
use oxide_ddl_core::{DbVersion, DialectKind};
use oxide_ddl_sqlx::CatalogPool;

use crate::config::{DialectSettings, load_naming_limits};
use crate::plan::Plan;

/// Multi-dialect DDL statement generator.
#[derive(Parser)]
#[command(name = "oxide-ddl")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Target engine: h2, oracle, mssql, mysql or postgresql.
    #[arg(short, long, env = "OXIDE_DDL_DIALECT")]
    dialect: Option<DialectKind>,

    /// PostgreSQL server version, e.g. 15.4. Probed from the server when omitted.
    #[arg(long)]
    pg_version: Option<DbVersion>,

    /// Database URL (postgres:// or mysql://).
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// JSON file overriding identifier length limits.
    #[arg(long)]
    naming_limits: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the statements of a JSON change plan.
    Render {
        /// Plan file.
        plan: PathBuf,
    },

    /// Print the primary key constraint name of a table.
    FindPk {
        /// Table name.
        #[arg(short, long)]
        table: String,
    },

    /// Print the PostgreSQL server version.
    ServerVersion,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let naming_limits = cli
        .naming_limits
        .as_deref()
        .map(load_naming_limits)
        .transpose()?;
    let settings = DialectSettings {
        kind: cli.dialect,
        pg_version: cli.pg_version,
        database_url: cli.database_url.as_deref(),
        naming_limits,
    };

    match &cli.command {
        Commands::Render { plan } => {
            let raw = std::fs::read_to_string(plan)
                .with_context(|| format!("Cannot read plan {}", plan.display()))?;
            let plan = Plan::from_json(&raw)
                .with_context(|| format!("Invalid plan {}", plan.display()))?;
            let dialect = settings.resolve().await?;
            info!(dialect = %dialect, steps = plan.steps.len(), "Rendering plan");

            for (index, step) in plan.steps.iter().enumerate() {
                let statements = step
                    .render(&dialect)
                    .with_context(|| format!("Step {} ({}) failed", index + 1, step.op()))?;
                debug!(step = index + 1, op = step.op(), statements = statements.len(), "Rendered step");
                for sql in statements {
                    println!("{sql};");
                }
            }
        }

        Commands::FindPk { table } => {
            let pool = connect(&settings).await?;
            let dialect = settings.resolve().await?;
            let name = primary_key::constraint_name(&dialect, &pool, table).await;
            pool.close().await;
            println!("{}", name?);
        }

        Commands::ServerVersion => {
            let pool = connect(&settings).await?;
            if pool.kind() != DialectKind::PostgreSql {
                pool.close().await;
                bail!("server-version is only supported on PostgreSQL");
            }
            let server_version = version::server_version(&pool).await;
            pool.close().await;
            println!("{}", server_version?);
        }
    }

    Ok(())
}

async fn connect(settings: &DialectSettings<'_>) -> anyhow::Result<CatalogPool> {
    let url = settings
        .database_url
        .context("--database-url or DATABASE_URL is required")?;
    Ok(CatalogPool::connect(url).await?)
}
