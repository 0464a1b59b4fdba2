pub mod config;
pub mod export;
pub mod preview;
pub mod profiles;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::aggregator::{aggregate, RunConfig, RunParams};
use crate::error::{RedeError, Result};
use crate::export::ExportFormat;
use crate::loader::load_sheet;
use crate::models::{AggregatedRecord, Column};
use crate::normalizer::DotPolicy;
use crate::profile::get_by_key;
use crate::settings::{load_settings, Settings};

/// Accepts the form's DD/MM/YYYY as well as ISO dates.
pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%d/%m/%Y")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .map_err(|_| RedeError::InvalidDate(raw.to_string()))
}

#[derive(Parser)]
#[command(
    name = "taxa-rede",
    version,
    about = "Turn a REDE fee report into ERP purchase-order lines per cost center."
)]
pub struct Cli {
    /// Log pipeline details to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the aggregated purchase-order lines and the grand total.
    Preview {
        #[command(flatten)]
        input: InputArgs,
        /// Show every ERP column instead of the summary view
        #[arg(long)]
        wide: bool,
    },
    /// Write the purchase-order lines as CSV and/or XML.
    Export {
        #[command(flatten)]
        input: InputArgs,
        /// Output format
        #[arg(long, value_enum, default_value = "all")]
        format: ExportFormat,
        /// Output directory (default: from settings)
        #[arg(long = "output-dir")]
        output_dir: Option<String>,
        /// File name without extension (default: pedido-compra-YYYY-MM-DD)
        #[arg(long)]
        name: Option<String>,
    },
    /// List the built-in fee report profiles.
    Profiles,
    /// Manage persisted defaults.
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the settings file location and its effective contents.
    Show,
    /// Write a settings file with the default values.
    Init {
        /// Overwrite an existing settings file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args, Clone, Debug)]
pub struct InputArgs {
    /// Cost-center table (.xlsx or .csv)
    #[arg(long)]
    pub dim: PathBuf,
    /// Fee report (.xlsx or .csv)
    #[arg(long)]
    pub fees: PathBuf,
    /// Fee report profile: rede, unitario (default: from settings)
    #[arg(long)]
    pub profile: Option<String>,
    /// Override the fee report's amount column
    #[arg(long = "amount-column")]
    pub amount_column: Option<String>,
    /// Override the cost-center table's cost-center column
    #[arg(long = "cost-center-column")]
    pub cost_center_column: Option<String>,
    /// Override the tax identifier column used for the join
    #[arg(long = "join-key")]
    pub join_key: Option<String>,
    /// Sheet row (0-based) holding the fee report's labels
    #[arg(long = "fee-header-row")]
    pub fee_header_row: Option<usize>,
    /// Sheet row (0-based) holding the cost-center table's labels
    #[arg(long = "dim-header-row")]
    pub dim_header_row: Option<usize>,
    /// Delivery forecast date: DD/MM/YYYY or YYYY-MM-DD (default: today)
    #[arg(long)]
    pub date: Option<String>,
    /// Observation text for every line
    #[arg(long)]
    pub obs: Option<String>,
    /// How to read dotted amounts without a comma
    #[arg(long = "dot-policy", value_enum)]
    pub dot_policy: Option<DotPolicy>,
}

pub(crate) fn run_config(input: &InputArgs, settings: &Settings) -> Result<RunConfig> {
    let key = input.profile.as_deref().unwrap_or(&settings.default_profile);
    let mut profile = get_by_key(key)?;
    if let Some(col) = &input.amount_column {
        profile.amount_column = col.clone();
    }
    if let Some(col) = &input.cost_center_column {
        profile.cost_center_column = col.clone();
    }
    if let Some(col) = &input.join_key {
        profile.join_key = col.clone();
    }
    if let Some(row) = input.fee_header_row {
        profile.fee_header_row = row;
    }
    if let Some(row) = input.dim_header_row {
        profile.dim_header_row = row;
    }

    let delivery_date = match &input.date {
        Some(raw) => parse_date(raw)?,
        None => chrono::Local::now().date_naive(),
    };
    let observation = input.obs.as_deref().unwrap_or(&settings.default_observation);

    Ok(RunConfig {
        profile,
        erp: settings.erp.clone(),
        dot_policy: input.dot_policy.unwrap_or(settings.dot_policy),
        params: RunParams::new(delivery_date, observation),
    })
}

pub(crate) struct Prepared {
    pub records: Vec<AggregatedRecord>,
    pub schema: Vec<Column>,
    pub settings: Settings,
}

/// Load both inputs and run the aggregation.
pub(crate) fn prepare(input: &InputArgs) -> Result<Prepared> {
    let settings = load_settings();
    let config = run_config(input, &settings)?;
    let dims = load_sheet(&input.dim, config.profile.dim_header_row)?;
    let fees = load_sheet(&input.fees, config.profile.fee_header_row)?;
    let records = aggregate(&fees, &dims, &config)?;
    Ok(Prepared {
        records,
        schema: config.profile.output_schema,
        settings,
    })
}
