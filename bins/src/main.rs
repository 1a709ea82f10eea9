use std::{path::PathBuf, sync::Arc};

use clap::{Parser, Subcommand};
use eyre::{eyre, Context, Result};
use ledger::{
    service::{cache::SystemClock, SubgroupFilter},
    Ledger,
};
use log::info;
use model::ids::ClubId;
use serde::Serialize;
use storage::{AttendanceSource, MongoStore, SnapshotStore};

/// Attendance reports of a sports club.
#[derive(Parser)]
#[command(name = "attendance-cli", long_about = None)]
struct Cli {
    /// Directory to write the report into instead of stdout
    #[arg(long, global = true)]
    out: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Member x occurrence attendance matrix of one month
    Matrix {
        club: String,
        /// Month as YYYY-MM
        month: String,
        #[arg(long, default_value = "all")]
        subgroup: SubgroupFilter,
    },
    /// Attendance count and rate per member of one month
    Summary {
        club: String,
        /// Month as YYYY-MM
        month: String,
        #[arg(long, default_value = "all")]
        subgroup: SubgroupFilter,
    },
    /// Training volume and weekly trend
    Analysis {
        club: String,
        #[arg(long, default_value = "all")]
        subgroup: SubgroupFilter,
    },
    /// Streaks and inactive members
    Activity {
        club: String,
        #[arg(long, default_value = "all")]
        subgroup: SubgroupFilter,
    },
    /// Today's trainings and their status
    Today { club: String },
    /// Known clubs
    Clubs,
}

#[tokio::main]
async fn main() -> Result<()> {
    let env = env::Env::load()?;
    if std::env::var_os("RUST_LOG").is_none() {
        std::env::set_var("RUST_LOG", env.rust_log());
    }
    pretty_env_logger::init();
    color_eyre::install()?;

    let cli = Cli::parse();
    let source = source(&env).await?;
    let ttl = chrono::Duration::from_std(env.reference_cache_ttl())
        .context("REFERENCE_CACHE_TTL_SECS is out of range")?;
    let ledger = Ledger::new(source, Arc::new(SystemClock), ttl);

    match cli.command {
        Commands::Matrix {
            club,
            month,
            subgroup,
        } => {
            let (year, month) = parse_month(&month)?;
            let export = ledger
                .reports
                .matrix_export(&ClubId::from(club.as_str()), year, month, &subgroup)
                .await?;
            emit(cli.out, Some(&export.file_name), &export)
        }
        Commands::Summary {
            club,
            month,
            subgroup,
        } => {
            let (year, month) = parse_month(&month)?;
            let export = ledger
                .reports
                .summary_export(&ClubId::from(club.as_str()), year, month, &subgroup)
                .await?;
            emit(cli.out, Some(&export.file_name), &export)
        }
        Commands::Analysis { club, subgroup } => {
            let analysis = ledger
                .statistics
                .training_analysis(&ClubId::from(club.as_str()), &subgroup)
                .await?;
            emit(cli.out, None, &analysis)
        }
        Commands::Activity { club, subgroup } => {
            let report = ledger
                .statistics
                .activity(&ClubId::from(club.as_str()), &subgroup)
                .await?;
            emit(cli.out, None, &report)
        }
        Commands::Today { club } => {
            let trainings = ledger.statistics.today(&ClubId::from(club.as_str())).await?;
            emit(cli.out, None, &trainings)
        }
        Commands::Clubs => {
            let clubs = ledger.clubs.list().await?;
            emit(cli.out, None, clubs.as_ref())
        }
    }
}

async fn source(env: &env::Env) -> Result<Arc<dyn AttendanceSource>> {
    if let Some(path) = env.snapshot_path() {
        info!("Reading club snapshot {}", path);
        let store = SnapshotStore::load(path)
            .await
            .context("Failed to load snapshot")?;
        return Ok(Arc::new(store));
    }
    let url = env.mongo_url().ok_or_else(|| eyre!("MONGO_URL is not set"))?;
    info!("connecting to mongo");
    let store = MongoStore::connect(url, env.mongo_db())
        .await
        .context("Failed to create storage")?;
    Ok(Arc::new(store))
}

/// `2024-03` -> (2024, 3)
fn parse_month(value: &str) -> Result<(i32, u32)> {
    let (year, month) = value
        .trim()
        .split_once('-')
        .ok_or_else(|| eyre!("Expected YYYY-MM, got {}", value))?;
    let year = year
        .parse()
        .with_context(|| format!("Invalid year in {}", value))?;
    let month = month
        .parse()
        .with_context(|| format!("Invalid month in {}", value))?;
    Ok((year, month))
}

fn emit<T: Serialize + ?Sized>(
    out: Option<PathBuf>,
    file_name: Option<&str>,
    value: &T,
) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    let Some(dir) = out else {
        println!("{}", json);
        return Ok(());
    };
    let file_name = file_name.unwrap_or("report.xlsx");
    let path = dir.join(file_name).with_extension("json");
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;
    std::fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Report written to {}", path.display());
    Ok(())
}
