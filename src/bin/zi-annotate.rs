//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Zi.
//! The Zi project belongs to the Dunimd Team.
//!
//! Licensed under the Apache License, Version 2.0 (the "License");
//! You may not use this file except in compliance with the License.
//! You may obtain a copy of the License at
//!
//!     http://www.apache.org/licenses/LICENSE-2.0
//!
//! Unless required by applicable law or agreed to in writing, software
//! distributed under the License is distributed on an "AS IS" BASIS,
//! WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//! See the License for the specific language governing permissions and
//! limitations under the License.

//! zi-annotate CLI - process the texts of a CSV column with a text annotation
//! service and write the derived columns to a new CSV file.

use std::path::PathBuf;
use std::process;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use zi_annotate::dsl::compile_columns;
use zi_annotate::ingest::{
    check_encoding, resolve_output_encoding, ProgressInfo, ZiCsvOptions, ZiRowReader,
};
use zi_annotate::log::ZiLogger;
use zi_annotate::service::details::describe_service;
use zi_annotate::service::{ZiClientConfig, ZiCloudClient};
use zi_annotate::settings::{ZiSettings, DEFAULT_SETTINGS_FILE};
use zi_annotate::{
    ZiPipelineConfig, ZiRateLimiter, ZiRowPipeline, ZiRowSelection, ZiRowWriter,
};

const PROGRESS_EVERY: usize = 100;

#[derive(Parser)]
#[command(name = "zi-annotate")]
#[command(
    version,
    about = "Process texts from a CSV column with a text annotation service",
    long_about = None,
    after_help = "The input is a CSV/TSV file and the output is another CSV file with one row per \
                  input row. Each output row holds the copied input columns, a status column, and \
                  one column per --results definition."
)]
struct Cli {
    /// Settings file with stored credentials and logging options
    #[arg(long, global = true, default_value = DEFAULT_SETTINGS_FILE)]
    settings: PathBuf,

    /// Log level (ERROR, WARNING, INFO, DEBUG); overrides the settings file
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Annotate every row of an input file
    Run(RunArgs),

    /// Show which result columns a service can produce
    Details {
        /// Service endpoint URL
        endpoint: String,

        #[command(flatten)]
        credentials: CredentialArgs,
    },
}

#[derive(Args)]
struct CredentialArgs {
    /// API key ID; overrides the settings file together with --api-password
    #[arg(long)]
    api_key: Option<String>,

    /// API key password
    #[arg(long)]
    api_password: Option<String>,
}

#[derive(Args)]
struct RunArgs {
    /// Service endpoint URL
    #[arg(long)]
    endpoint: String,

    #[command(flatten)]
    credentials: CredentialArgs,

    /// The input CSV or TSV file
    #[arg(long = "in", value_name = "FILE")]
    input: PathBuf,

    /// The texts are HTML rather than plain text
    #[arg(long)]
    html: bool,

    /// Input encoding, e.g. utf-8, latin-1 or cp1252
    #[arg(long, default_value = "utf-8-sig")]
    encoding: String,

    /// Input is tab-separated
    #[arg(long)]
    tsv: bool,

    /// Column name (or 1-based number with --no-headers) holding the text
    #[arg(long)]
    text_column: String,

    /// The input has no header row; columns are given by number
    #[arg(long)]
    no_headers: bool,

    /// The output CSV file
    #[arg(long = "out", value_name = "FILE")]
    output: PathBuf,

    /// Output encoding; utf-8-sig writes a byte-order mark
    #[arg(long, default_value = "utf-8")]
    out_encoding: String,

    /// Input columns to copy to the output
    #[arg(long, num_args = 0..)]
    copy_columns: Vec<String>,

    /// Result column definitions
    #[arg(long, num_args = 1.., required = true)]
    results: Vec<String>,

    /// Request timeout in seconds, 0 for none
    #[arg(long, default_value_t = 120)]
    timeout: u64,
}

fn main() {
    let cli = Cli::parse();

    let result = load_settings(&cli).and_then(|settings| match cli.command {
        Commands::Run(args) => run(args, &settings),
        Commands::Details { endpoint, credentials } => details(endpoint, credentials, &settings),
    });

    if let Err(e) = result {
        log::error!("{:#}", e);
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn load_settings(cli: &Cli) -> Result<ZiSettings> {
    let settings = ZiSettings::load(&cli.settings)
        .with_context(|| format!("loading settings from {}", cli.settings.display()))?;

    let mut logging = settings.logging.clone();
    if let Some(level) = &cli.log_level {
        logging = logging.level(level.clone());
    }
    ZiLogger::init(logging.build()).context("installing logger")?;
    Ok(settings)
}

fn timeout(seconds: u64) -> Option<Duration> {
    (seconds > 0).then(|| Duration::from_secs(seconds))
}

fn run(args: RunArgs, settings: &ZiSettings) -> Result<()> {
    check_encoding(&args.encoding)?;
    resolve_output_encoding(&args.out_encoding)?;

    let credentials = settings.credentials(
        args.credentials.api_key.as_deref(),
        args.credentials.api_password.as_deref(),
    );
    if credentials.is_none() {
        log::warn!("No API credentials given, unauthenticated rate limits apply");
    }

    log::info!("Using annotation endpoint: {}", args.endpoint);
    let client = ZiCloudClient::new(
        ZiClientConfig::new(args.endpoint.clone())
            .credentials(credentials)
            .html(args.html)
            .timeout(timeout(args.timeout)),
    )?;

    log::info!("Fetching service metadata");
    let type_selectors = client.type_selectors();
    let columns =
        compile_columns(&args.results, type_selectors).context("compiling result columns")?;
    log::info!(
        "Annotation output columns: {:?}",
        columns.headers().collect::<Vec<_>>()
    );

    let options = ZiCsvOptions::for_path(&args.input, args.tsv)
        .has_headers(!args.no_headers)
        .encoding(args.encoding.clone());
    log::info!("Columns separated by {:?}", options.delimiter as char);

    let mut reader = ZiRowReader::open(&args.input, &options)?;
    let selection = ZiRowSelection::resolve(&reader, &args.text_column, &args.copy_columns)?;
    let mut writer = ZiRowWriter::create(&args.output, &args.out_encoding)?;

    let config = ZiPipelineConfig {
        max_rate_limit_hits: settings
            .max_rate_limit_hits
            .unwrap_or(ZiPipelineConfig::default().max_rate_limit_hits),
        ..ZiPipelineConfig::default()
    };
    let mut pipeline = ZiRowPipeline::new(&client, columns)
        .with_config(config)
        .with_rate_limiter(ZiRateLimiter::with_config(settings.rate_limit.clone()));

    let progress = |info: &ProgressInfo| {
        if info.rows_processed % PROGRESS_EVERY == 0 {
            match info.fraction() {
                Some(fraction) => log::info!(
                    "Processed {} rows ({:.1}% of input)",
                    info.rows_processed,
                    fraction * 100.0
                ),
                None => log::info!("Processed {} rows", info.rows_processed),
            }
        }
    };

    let stats = pipeline
        .run(&mut reader, &mut writer, &selection, Some(Box::new(progress)))
        .with_context(|| format!("processing {}", args.input.display()))?;
    log::info!(
        "Run finished, {:.1}% of rows annotated: {}",
        stats.success_rate() * 100.0,
        stats.as_json()
    );
    Ok(())
}

fn details(endpoint: String, credentials: CredentialArgs, settings: &ZiSettings) -> Result<()> {
    let credentials = settings.credentials(
        credentials.api_key.as_deref(),
        credentials.api_password.as_deref(),
    );
    let client = ZiCloudClient::new(ZiClientConfig::new(endpoint).credentials(credentials))?;
    let details = describe_service(&client)
        .with_context(|| format!("describing service {}", client.endpoint()))?;
    print!("{}", details);
    Ok(())
}
