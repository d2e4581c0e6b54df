// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Instant;
use support_analyst::utils::logging::{format_error, format_info, format_success, format_warning};
use support_analyst::{
    AnalysisError, AnalysisReport, AnalysisRequest, Analyzer, Config, Credentials, DocumentKind,
    HealthCheck, HealthReport, JsonExporter, OpenAiClient, PromptStyle, SegmentStrategy,
    Segmenter, find_item, load_table, render_item, render_report,
};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "support_analyst")]
#[command(version)]
#[command(about = "Six-part market analysis for NDIS assistive technology support items", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config/default.toml"
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the six-part analysis for one support item
    Analyze {
        /// Support Item Ref No.
        ref_no: String,

        /// Optional clinical context added to the prompt
        #[arg(long)]
        context: Option<String>,

        #[arg(long, value_name = "PATH")]
        document: Option<PathBuf>,

        #[arg(long)]
        kind: Option<DocumentKind>,

        #[arg(long, value_enum)]
        strategy: Option<SegmentStrategy>,

        #[arg(long, value_enum)]
        style: Option<PromptStyle>,

        /// Print the report as JSON instead of formatted sections
        #[arg(long)]
        json: bool,

        /// Also write the report as JSON into this directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
    },

    /// Show item details without calling the model
    Lookup {
        ref_no: String,

        #[arg(long, value_name = "PATH")]
        document: Option<PathBuf>,
    },

    /// Split a saved report text into sections
    Segment {
        file: PathBuf,

        #[arg(long, value_enum)]
        strategy: Option<SegmentStrategy>,

        #[arg(long)]
        count: Option<usize>,

        #[arg(long)]
        json: bool,
    },

    /// Check configuration, document and credentials
    Verify {
        #[arg(long, value_name = "PATH")]
        document: Option<PathBuf>,
    },

    /// Write the extracted guide records as JSON
    Export {
        #[arg(long, value_name = "PATH")]
        document: Option<PathBuf>,

        #[arg(short, long, default_value = "./exports")]
        output: PathBuf,

        #[arg(short, long)]
        pretty: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    support_analyst::utils::logging::init_logger(cli.color, cli.verbose);

    if let Err(err) = run(cli).await {
        let stage = err
            .chain()
            .find_map(|cause| cause.downcast_ref::<AnalysisError>())
            .map(AnalysisError::stage);

        match stage {
            Some(stage) => eprintln!("{}", format_error(&format!("{} failed: {:#}", stage, err))),
            None => eprintln!("{}", format_error(&format!("{:#}", err))),
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    info!("Loading configuration from: {}", cli.config.display());

    let config = if cli.config.exists() {
        Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?
    } else {
        warn!(
            "Config file {} not found, using default configuration",
            cli.config.display()
        );
        Config::load(None).context("Failed to load configuration")?
    };

    match cli.command {
        Commands::Analyze {
            ref_no,
            context,
            document,
            kind,
            strategy,
            style,
            json,
            output,
        } => {
            let request = AnalysisRequest {
                ref_code: ref_no,
                context,
                document,
                kind,
                strategy,
                prompt_style: style,
            };
            cmd_analyze(config, request, json, output, cli.verbose).await?;
        }
        Commands::Lookup { ref_no, document } => {
            cmd_lookup(&config, &ref_no, document)?;
        }
        Commands::Segment {
            file,
            strategy,
            count,
            json,
        } => {
            cmd_segment(&config, file, strategy, count, json)?;
        }
        Commands::Verify { document } => {
            cmd_verify(&config, document)?;
        }
        Commands::Export {
            document,
            output,
            pretty,
        } => {
            cmd_export(&config, document, output, pretty)?;
        }
    }

    Ok(())
}

async fn cmd_analyze(
    config: Config,
    request: AnalysisRequest,
    json: bool,
    output: Option<PathBuf>,
    verbose: bool,
) -> Result<()> {
    let credentials = Credentials::resolve(&config.llm).context("Failed to resolve credentials")?;
    let client = OpenAiClient::new(credentials, &config.llm)?;
    let analyzer = Analyzer::new(config, client).with_progress(std::io::stderr().is_terminal());

    let (report, stats) = analyzer
        .run_with_stats(&request)
        .await
        .context("Analysis failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_report(&report));
    }

    if let Some(dir) = output {
        let path = JsonExporter::new(dir, true)?.export_report(&report)?;
        eprintln!("{}", format_success(&format!("Saved {}", path.display())));
    }

    report_missing_sections(&report);
    if verbose {
        info!("{}", stats.summary());
    }

    Ok(())
}

fn report_missing_sections(report: &AnalysisReport) {
    let missing = report.missing_sections();
    if !missing.is_empty() {
        eprintln!(
            "{}",
            format_warning(&format!("No content returned for sections {:?}", missing))
        );
    }
}

fn cmd_lookup(config: &Config, ref_no: &str, document: Option<PathBuf>) -> Result<()> {
    let item = find_item(&config.document, ref_no, document.as_deref(), None)
        .context("Lookup failed")?;
    print!("{}", render_item(&item));
    Ok(())
}

fn cmd_segment(
    config: &Config,
    file: PathBuf,
    strategy: Option<SegmentStrategy>,
    count: Option<usize>,
    json: bool,
) -> Result<()> {
    let text = std::fs::read_to_string(&file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let mut segmentation = config.segmentation.clone();
    if let Some(count) = count.filter(|c| *c > 0) {
        segmentation.section_count = count;
    }
    let mut segmenter = Segmenter::from_config(&segmentation);
    if let Some(strategy) = strategy {
        segmenter = segmenter.with_strategy(strategy);
    }

    let sections = segmenter.segment(&text);
    let labelled =
        AnalysisReport::label_sections(&sections, config.llm.prompt_style.section_labels());

    if json {
        println!("{}", serde_json::to_string_pretty(&labelled)?);
        return Ok(());
    }

    for section in &labelled {
        println!("## {}\n{}\n", section.label, section.body);
    }
    eprintln!(
        "{}",
        format_info(&format!(
            "Located {} of {} sections",
            sections.found_count(),
            sections.len()
        ))
    );
    Ok(())
}

fn cmd_verify(config: &Config, document: Option<PathBuf>) -> Result<()> {
    info!("Verifying setup");
    let mut checks = vec![HealthCheck::healthy(
        "config",
        Some(format!(
            "model {}, {} sections, {:?} segmentation",
            config.llm.model, config.segmentation.section_count, config.segmentation.strategy
        )),
        std::time::Duration::ZERO,
    )];

    let start = Instant::now();
    checks.push(
        match load_table(&config.document, document.as_deref(), None) {
            Ok((source, table)) => HealthCheck::healthy(
                "document",
                Some(format!(
                    "{} ({}): {} records",
                    source.path.display(),
                    source.kind,
                    table.len()
                )),
                start.elapsed(),
            ),
            Err(e) => HealthCheck::unhealthy("document", e.to_string(), start.elapsed()),
        },
    );

    let start = Instant::now();
    checks.push(match Credentials::resolve(&config.llm) {
        Ok(credentials) => HealthCheck::healthy(
            "credentials",
            credentials
                .project_id
                .as_ref()
                .map(|p| format!("project {}", p)),
            start.elapsed(),
        ),
        Err(e) => HealthCheck::degraded("credentials", e.to_string(), start.elapsed()),
    });

    let report = HealthReport::new(checks, env!("CARGO_PKG_VERSION").to_string());
    println!("{}", report.format());

    if !report.is_healthy() {
        return Err(anyhow::anyhow!("Setup verification failed"));
    }
    Ok(())
}

fn cmd_export(
    config: &Config,
    document: Option<PathBuf>,
    output: PathBuf,
    pretty: bool,
) -> Result<()> {
    info!("Initializing JSON export");

    let (source, table) =
        load_table(&config.document, document.as_deref(), None).context("Extraction failed")?;
    let exporter = JsonExporter::new(output, pretty)?;
    let manifest = exporter.export_table(&table, &source)?;

    info!(
        "Export complete: {} records in {} files",
        manifest.total_records,
        manifest.files.len()
    );
    Ok(())
}
