// src/main.rs
mod documents;
mod extractors;
mod storage;
mod utils;

use clap::Parser;
use documents::{analyze_documents, models::AnalysisReport};
use extractors::PointerResolver;
use std::path::PathBuf;
use storage::StorageManager;
use utils::config::{collect_pointers, ResolverConfig};
use utils::AppError;

/// Command Line Interface for locating pointer facts in documents
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Documents to analyze (.pdf, .html/.htm, .txt with form-feed page breaks, or .json page arrays)
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Pointer to locate, e.g. "contract amount" (repeatable)
    #[arg(short, long = "pointer")]
    pointers: Vec<String>,

    /// Pointers as a JSON array of strings, appended after any --pointer values
    #[arg(long)]
    pointers_json: Option<String>,

    /// Output directory for saved reports (reports are only printed when omitted)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Debug mode - save annotated HTML with every match highlighted (needs --output-dir)
    #[arg(short, long)]
    debug: bool,

    /// Characters of context on each side of a match (overrides SNIPPET_RADIUS)
    #[arg(long)]
    snippet_radius: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    // 2. Parse CLI Arguments
    let args = Args::parse();
    tracing::info!("Starting processing for args: {:?}", args);

    // 3. Validate pointers before touching any document
    let pointers = collect_pointers(&args.pointers, args.pointers_json.as_deref())?;
    if pointers.is_empty() {
        tracing::warn!("No pointers supplied; reports will have empty results");
    }

    let config = ResolverConfig::from_env().with_snippet_radius(args.snippet_radius);
    let resolver = PointerResolver::new(config);
    tracing::debug!("Resolver configuration: {:?}", resolver.config());

    // 4. Initialize storage
    let mut storage = match &args.output_dir {
        Some(dir) => Some(StorageManager::new(dir)?),
        None => {
            if args.debug {
                tracing::warn!("--debug has no effect without --output-dir");
            }
            None
        }
    };

    // 5. Analyze every document independently
    let outcomes = analyze_documents(&args.inputs, &pointers, &resolver).await;

    let mut reports: Vec<AnalysisReport> = Vec::new();
    let mut failure_count = 0;

    for (path, outcome) in outcomes {
        match outcome {
            Ok(analyzed) => {
                if let Some(storage) = storage.as_mut() {
                    let written = storage.persist(&analyzed, args.debug);
                    tracing::debug!("Wrote {} artifacts for {}", written.len(), analyzed.report.file);
                }
                reports.push(analyzed.report);
            }
            Err(e) => {
                tracing::error!("Failed to analyze {}: {}", path.display(), e);
                failure_count += 1;
            }
        }
    }

    tracing::info!("Processing finished. Success: {}, Failures: {}", reports.len(), failure_count);

    // 6. Emit reports on stdout
    let json = serde_json::to_string_pretty(&reports)
        .map_err(|e| AppError::Processing(format!("Failed to serialize reports: {}", e)))?;
    println!("{}", json);

    if reports.is_empty() && failure_count > 0 {
        return Err(AppError::Processing(format!(
            "Failed to analyze any of {} documents",
            failure_count
        )));
    }

    Ok(())
}
