use clap::{Parser, Subcommand};
use handover_core::{
    normalise_narrative, render_report, CoreConfig, ExportService, ReportData, ReportGateway,
    SnapshotStore, StoredReport, TextRasterizer, TimestampId,
};
use handover_supabase::{SupabaseConfig, SupabaseGateway};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "handover")]
#[command(about = "ICU shift handover report CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List all saved reports, newest first
    List,
    /// List saved reports for one MRN, newest first
    Find {
        /// Medical record number (exact match)
        mrn: String,
    },
    /// Delete a saved report
    Delete {
        /// Record id
        id: String,
    },
    /// Print narrative text with every non-empty line bulleted
    Normalise {
        /// Narrative text; lines separated by newlines
        text: String,
    },
    /// Export a report JSON file as a paginated document
    Export {
        /// Path to a report payload (as stored in `report_data`)
        report: PathBuf,
        /// Export date (YYYY-MM-DD); defaults to today
        #[arg(long)]
        date: Option<String>,
    },
    /// List local snapshots, or print one
    Snapshots {
        /// Snapshot key to print
        #[arg(long)]
        show: Option<String>,
    },
}

fn gateway() -> Result<SupabaseGateway, Box<dyn std::error::Error>> {
    let config = SupabaseConfig::from_env_values(
        std::env::var("SUPABASE_URL").ok(),
        std::env::var("SUPABASE_ANON_KEY").ok(),
        std::env::var("SUPABASE_ACCESS_TOKEN").ok(),
    )?;
    Ok(SupabaseGateway::new(config))
}

fn core_config() -> Result<CoreConfig, Box<dyn std::error::Error>> {
    Ok(CoreConfig::from_env_values(
        std::env::var("HANDOVER_SNAPSHOT_DIR").ok(),
        std::env::var("HANDOVER_EXPORT_DIR").ok(),
        std::env::var("HANDOVER_PAGE_HEIGHT").ok(),
    )?)
}

fn print_records(records: &[StoredReport]) {
    if records.is_empty() {
        println!("No reports found.");
        return;
    }
    for record in records {
        println!(
            "ID: {}, MRN: {}, Created: {}, Updated: {}",
            record.id,
            record.mrn,
            record.created_at.to_rfc3339(),
            record.updated_at.to_rfc3339()
        );
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("handover=warn".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::List) => match gateway()?.list_all().await {
            Ok(records) => print_records(&records),
            Err(e) => eprintln!("Error listing reports: {}", e),
        },
        Some(Commands::Find { mrn }) => {
            let mrn = match handover_core::Mrn::parse(&mrn) {
                Ok(mrn) => mrn,
                Err(e) => {
                    eprintln!("Invalid MRN: {}", e);
                    return Ok(());
                }
            };
            match gateway()?.find_by_mrn(&mrn).await {
                Ok(records) => print_records(&records),
                Err(e) => eprintln!("Error finding reports: {}", e),
            }
        }
        Some(Commands::Delete { id }) => match gateway()?.remove(&id).await {
            Ok(()) => println!("Deleted report: {}", id),
            Err(e) => eprintln!("Error deleting report: {}", e),
        },
        Some(Commands::Normalise { text }) => {
            println!("{}", normalise_narrative(&text));
        }
        Some(Commands::Export { report, date }) => {
            let cfg = core_config()?;
            let date = match date {
                Some(d) => chrono::NaiveDate::parse_from_str(&d, "%Y-%m-%d")?,
                None => chrono::Utc::now().date_naive(),
            };
            let payload = std::fs::read_to_string(&report)?;
            let data: ReportData = serde_json::from_str(&payload)?;
            let service = ExportService::new(
                TextRasterizer,
                cfg.export_dir().to_path_buf(),
                cfg.page_height(),
            );
            match service.export(&render_report(&data), date) {
                Ok(path) => println!("Exported report to {}", path.display()),
                Err(e) => eprintln!("Error exporting report: {}", e),
            }
        }
        Some(Commands::Snapshots { show }) => {
            let cfg = core_config()?;
            let store = SnapshotStore::open(cfg.snapshot_dir())?;
            match show {
                Some(key) => {
                    let key: TimestampId = key.parse()?;
                    let cases = store.read(&key)?;
                    println!("{}", serde_json::to_string_pretty(&cases)?);
                }
                None => {
                    let keys = store.list()?;
                    if keys.is_empty() {
                        println!("No snapshots found.");
                    }
                    for key in keys {
                        println!("{}", key);
                    }
                }
            }
        }
        None => {
            println!("Use 'handover --help' for commands");
        }
    }

    Ok(())
}
