use crate::error::AppError;
use crate::infra::{build_orchestrator, parse_date};
use crate::server;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use compliance_engine::config::AppConfig;
use compliance_engine::engine::{
    Jurisdiction, Product, RouteId, Stage, ValidationRequest,
};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Landlord Compliance Service",
    about = "Run the compliance decision engine as an HTTP service or one-off validation",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Validate a case facts file and print the decision as JSON
    Validate(ValidateArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

#[derive(Args, Debug)]
pub(crate) struct ValidateArgs {
    /// Path to a JSON object of raw case facts
    #[arg(long)]
    facts: PathBuf,
    /// Jurisdiction, e.g. england, wales, scotland
    #[arg(long, value_parser = parse_jurisdiction)]
    jurisdiction: Jurisdiction,
    /// Product, e.g. notice_only, eviction_bundle, money_claim, tenancy_agreement
    #[arg(long, value_parser = parse_product)]
    product: Product,
    /// Stage, e.g. draft, checkpoint, preview, generate
    #[arg(long, value_parser = parse_stage)]
    stage: Stage,
    /// Route the user has selected, if any
    #[arg(long)]
    route: Option<String>,
    /// Reference date as YYYY-MM-DD (defaults to the current date)
    #[arg(long, value_parser = parse_date)]
    today: Option<NaiveDate>,
}

fn parse_jurisdiction(raw: &str) -> Result<Jurisdiction, String> {
    parse_keyword(raw)
}

fn parse_product(raw: &str) -> Result<Product, String> {
    parse_keyword(raw)
}

fn parse_stage(raw: &str) -> Result<Stage, String> {
    parse_keyword(raw)
}

fn parse_keyword<T: serde::de::DeserializeOwned>(raw: &str) -> Result<T, String> {
    serde_json::from_value(Value::String(raw.trim().to_string())).map_err(|err| err.to_string())
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Validate(args) => run_validate(args),
    }
}

fn run_validate(args: ValidateArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let orchestrator = build_orchestrator(&config)?;

    let raw = std::fs::read_to_string(&args.facts)?;
    let answers: BTreeMap<String, Value> = serde_json::from_str(&raw)
        .map_err(|err| AppError::Input(format!("facts file is not a JSON object: {err}")))?;

    let request = ValidationRequest {
        answers,
        jurisdiction: args.jurisdiction,
        product: args.product,
        stage: args.stage,
        selected_route: args.route.map(RouteId::new),
        today: args
            .today
            .unwrap_or_else(|| chrono::Local::now().date_naive()),
    };

    let result = orchestrator.validate(&request);
    let rendered = serde_json::to_string_pretty(&result)
        .map_err(|err| AppError::Input(format!("failed to render decision: {err}")))?;
    println!("{rendered}");
    Ok(())
}
