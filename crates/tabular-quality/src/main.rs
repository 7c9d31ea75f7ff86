//! CLI entry point for the tabular data quality analyzer.

use anyhow::{Result, anyhow};
use clap::Parser;
use dotenv::dotenv;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tabular_quality::{
    AnalysisConfig, AnalysisReport, Analyzer, DataPreview, FileSessionStore,
    InferenceStrategy, InsightProvider, ReportGenerator,
};
use tracing::{error, info};

#[cfg(feature = "ai")]
use std::env;
#[cfg(feature = "ai")]
use tabular_quality::ai::{
    API_KEY_ENV, InsightServiceConfig, InsightServiceProvider, OpenAiProvider, SERVICE_URL_ENV,
};
#[cfg(feature = "ai")]
use tracing::warn;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Tabular data quality analyzer",
    long_about = "Profiles a CSV, JSON or XLSX file and scores its data quality.\n\n\
                  ENVIRONMENT VARIABLES:\n  \
                  OPENAI_API_KEY         API key for OpenAI insights\n  \
                  INSIGHT_SERVICE_URL    Insight service endpoint (takes precedence over OpenAI)\n\n\
                  EXAMPLES:\n  \
                  # Analyze a file with AI insights\n  \
                  tabular-quality -i people.csv\n\n  \
                  # JSON report without insights\n  \
                  tabular-quality -i people.csv --json --no-ai\n\n  \
                  # Save the analysis, then show it again later\n  \
                  tabular-quality -i people.csv --session last.json\n  \
                  tabular-quality --session last.json --reload"
)]
struct Args {
    /// Path to the file to analyze
    #[arg(short, long, required_unless_present = "reload")]
    input: Option<String>,

    /// Output the JSON report to stdout instead of the text summary
    ///
    /// Disables all logs so stdout holds only JSON.
    #[arg(long)]
    json: bool,

    /// Do not request AI insights
    #[arg(long)]
    no_ai: bool,

    /// Insight service endpoint, overrides INSIGHT_SERVICE_URL
    #[arg(long)]
    service_url: Option<String>,

    /// Infer column types by majority vote instead of the first value
    #[arg(long)]
    majority_vote: bool,

    /// Session file holding the latest analysis
    #[arg(long)]
    session: Option<String>,

    /// Report the analysis stored in the session file instead of reading input
    #[arg(long, requires = "session")]
    reload: bool,

    /// Include a preview of the first N rows
    #[arg(long)]
    preview_rows: Option<usize>,

    /// Also write the JSON report to this file
    #[arg(short, long)]
    report: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show warnings and the report)
    #[arg(short, long)]
    quiet: bool,
}

/// JSON output: the report plus the optional preview.
#[derive(Serialize)]
struct JsonOutput<'a> {
    #[serde(flatten)]
    report: &'a AnalysisReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    preview: Option<&'a DataPreview>,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is disabled so stdout only holds JSON.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    // Load environment variables from .env file
    dotenv().ok();

    let mut config_builder = AnalysisConfig::builder().generate_insights(!args.no_ai);
    if args.majority_vote {
        config_builder = config_builder.type_inference(InferenceStrategy::MajorityVote);
    }
    if let Some(rows) = args.preview_rows {
        config_builder = config_builder.preview_rows(rows);
    }
    let config = config_builder.build()?;

    let mut builder = Analyzer::builder().config(config);
    if let Some(provider) = build_provider(&args)? {
        builder = builder.insight_provider(provider);
    }
    if let Some(path) = &args.session {
        builder = builder.session_store(Arc::new(FileSessionStore::new(path)));
    }
    let analyzer = builder.build()?;

    let analysis = if args.reload {
        analyzer.restore_required()?
    } else {
        let input = args
            .input
            .as_deref()
            .ok_or_else(|| anyhow!("No input file given"))?;
        if !Path::new(input).exists() {
            return Err(anyhow!("Input file not found: {}", input));
        }
        let analysis = analyzer.analyze_path(input).await?;
        // a failed save does not hide the report
        if let Err(e) = analyzer.remember(&analysis) {
            error!("Session not saved: {}", e);
        }
        analysis
    };

    let outcome = analyzer.insights(&analysis).await;
    if let Some(reason) = &outcome.error {
        error!("No insights: {}", reason);
    }

    let report = ReportGenerator::build_report(&analysis, &outcome);
    if let Some(path) = &args.report {
        ReportGenerator::write_report_to_file(&report, Path::new(path))?;
    }

    let preview = args
        .preview_rows
        .map(|_| ReportGenerator::build_preview(&analysis, analyzer.config()));

    if args.json {
        let output = JsonOutput {
            report: &report,
            preview: preview.as_ref(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    print!("{}", report.render_text());
    if let Some(preview) = &preview {
        print_preview(preview);
    }

    Ok(())
}

/// Pick the insight provider: the service URL if one is set, otherwise OpenAI.
#[cfg(feature = "ai")]
fn build_provider(args: &Args) -> Result<Option<Arc<dyn InsightProvider>>> {
    if args.no_ai {
        info!("AI insights disabled");
        return Ok(None);
    }

    let service_url = args
        .service_url
        .clone()
        .or_else(|| env::var(SERVICE_URL_ENV).ok())
        .filter(|url| !url.trim().is_empty());

    if let Some(url) = service_url {
        info!("Requesting insights from {}", url);
        let provider = InsightServiceProvider::new(InsightServiceConfig::new(url))?;
        return Ok(Some(Arc::new(provider)));
    }

    let provider = OpenAiProvider::from_env()?;
    if provider.has_api_key() {
        info!("Requesting insights from OpenAI");
    } else {
        warn!("{} not set. Insights will be unavailable.", API_KEY_ENV);
    }
    Ok(Some(Arc::new(provider)))
}

/// Without the "ai" feature there is no provider to build.
#[cfg(not(feature = "ai"))]
fn build_provider(args: &Args) -> Result<Option<Arc<dyn InsightProvider>>> {
    if !args.no_ai {
        info!("AI support not compiled in. Compile with --features ai to enable insights.");
    }
    Ok(None)
}

fn print_preview(preview: &DataPreview) {
    println!();
    println!(
        "Preview ({} of {} rows):",
        preview.rows.len(),
        preview.total_rows
    );
    println!("  {}", preview.columns.join(" | "));
    for row in &preview.rows {
        println!("  {}", row.join(" | "));
    }
}
