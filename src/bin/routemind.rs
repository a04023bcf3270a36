//! CLI binary for routemind.
//!
//! A thin shim over the library crate: it wires configured clients into a
//! session and prints the planned route.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use routemind::auth::hash_password;
use routemind::config::AppConfig;
use routemind::error::{GeocodeError, OptimizeError};
use routemind::extract::AddressExtractor;
use routemind::model::{Coordinate, OptimizationRequest, PlannedStep};
use routemind::ocr::TesseractRecognizer;
use routemind::ors::OrsClient;
use routemind::planner::{OptimizerMode, RoutePlanner};
use routemind::present::route_overview;
use routemind::session::Session;
use routemind::store::{StaticGateCodes, SupabaseStore};
use routemind::traits::{GateCodeStore, Geocoder, TextRecognizer, VehicleRouter};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "routemind", version, about = "Plan delivery routes from shipping label photos")]
struct Cli {
    /// Config file (TOML, JSON or YAML). Environment variables ROUTEMIND_* override it.
    #[arg(short, long, env = "ROUTEMIND_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the candidate addresses found in each image.
    Extract {
        #[arg(required = true)]
        images: Vec<PathBuf>,
    },

    /// Extract addresses, optimize the route and print it.
    Plan {
        /// Label images to read addresses from.
        images: Vec<PathBuf>,

        /// Additional address, may be repeated.
        #[arg(short, long = "address")]
        addresses: Vec<String>,

        #[arg(short, long, env = "ROUTEMIND_USER")]
        user: String,

        #[arg(short, long, env = "ROUTEMIND_PASSWORD", hide_env_values = true)]
        password: String,

        /// Depot by 1-based number or exact name. Defaults to the first depot.
        #[arg(short, long)]
        depot: Option<String>,

        /// Override the configured optimizer: service or approximate.
        #[arg(short, long)]
        mode: Option<OptimizerMode>,

        /// JSON file of gate code rows, used instead of the configured store.
        #[arg(long)]
        gate_codes: Option<PathBuf>,

        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List the configured depots.
    Depots,

    /// Print the credential-table hash of a password.
    HashPassword { password: String },
}

/// Stand-in when no openrouteservice key is configured.
struct Unconfigured;

impl Geocoder for Unconfigured {
    fn geocode(&self, _text: &str) -> Result<Option<Coordinate>, GeocodeError> {
        Ok(None)
    }
}

impl VehicleRouter for Unconfigured {
    fn optimize(&self, _request: &OptimizationRequest) -> Result<Vec<PlannedStep>, OptimizeError> {
        Err(OptimizeError::NoRoute)
    }
}

#[derive(Serialize)]
struct PlanOutput<'a> {
    depot: &'a str,
    optimizer: String,
    approximate: bool,
    #[serde(flatten)]
    summary: routemind::present::RouteSummary,
    maps_url: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref()).context("failed to load configuration")?;

    match cli.command {
        Command::Extract { images } => run_extract(&config, &images),
        Command::Plan {
            images,
            addresses,
            user,
            password,
            depot,
            mode,
            gate_codes,
            json,
        } => {
            let mut config = config;
            if let Some(mode) = mode {
                config.optimizer = mode;
            }
            let request = PlanRequest {
                images,
                addresses,
                user,
                password,
                depot,
                gate_codes,
                json,
            };
            run_plan(&config, request)
        }
        Command::Depots => {
            for (i, depot) in config.depots.iter().enumerate() {
                println!("{}. {}", i + 1, depot);
            }
            Ok(())
        }
        Command::HashPassword { password } => {
            println!("{}", hash_password(&password));
            Ok(())
        }
    }
}

/// The in-process engine when its models are configured, else tesseract.
fn text_recognizer(config: &AppConfig) -> Option<Box<dyn TextRecognizer>> {
    #[cfg(feature = "oar")]
    if let Some(models) = config.oar_models() {
        return routemind::oar::OarRecognizer::try_init(&models)
            .map(|recognizer| Box::new(recognizer) as Box<dyn TextRecognizer>);
    }
    TesseractRecognizer::try_init(config.tesseract())
        .map(|recognizer| Box::new(recognizer) as Box<dyn TextRecognizer>)
}

fn read_images(paths: &[PathBuf]) -> Result<Vec<Vec<u8>>> {
    paths
        .iter()
        .map(|path| std::fs::read(path).with_context(|| format!("failed to read {}", path.display())))
        .collect()
}

fn run_extract(config: &AppConfig, images: &[PathBuf]) -> Result<()> {
    let extractor = AddressExtractor::new(text_recognizer(config), config.extraction_rules());

    for (path, bytes) in images.iter().zip(read_images(images)?) {
        println!("{}:", path.display());
        for candidate in extractor.extract(&bytes).into_candidates() {
            println!("  {candidate}");
        }
    }
    Ok(())
}

struct PlanRequest {
    images: Vec<PathBuf>,
    addresses: Vec<String>,
    user: String,
    password: String,
    depot: Option<String>,
    gate_codes: Option<PathBuf>,
    json: bool,
}

fn run_plan(config: &AppConfig, request: PlanRequest) -> Result<()> {
    let mut session = Session::new(config.depots.clone());

    if !session.login(&config.credential_table(), &request.user, &request.password) {
        bail!("Invalid credentials");
    }
    if let Some(choice) = &request.depot {
        session.select_depot(choice)?;
    }

    if !request.images.is_empty() {
        let extractor = AddressExtractor::new(text_recognizer(config), config.extraction_rules());
        session.ingest_images(&extractor, read_images(&request.images)?);
    }
    session.add_addresses(request.addresses);
    if session.addresses.is_empty() {
        bail!("No addresses to plan: pass label images or --address");
    }

    let store: Option<Box<dyn GateCodeStore>> = match &request.gate_codes {
        Some(path) => Some(Box::new(StaticGateCodes::from_json_file(path)?)),
        None => config
            .supabase()
            .and_then(SupabaseStore::try_connect)
            .map(|store| Box::new(store) as Box<dyn GateCodeStore>),
    };
    match &store {
        Some(store) => {
            if let Err(err) = session.refresh_gate_codes(store.as_ref()) {
                eprintln!("Error fetching gate codes: {err}");
            }
        }
        None => warn!("Gate code store not configured; gate codes disabled"),
    }

    let plan = match config.ors() {
        Some(ors) => {
            let client = OrsClient::new(ors).context("failed to build openrouteservice client")?;
            let planner = RoutePlanner::new(&client, &client, config.plan_options());
            session.optimize(&planner)?
        }
        None => {
            if config.optimizer == OptimizerMode::Service {
                warn!("No openrouteservice API key configured; the route will not be optimized");
            }
            let planner = RoutePlanner::new(Unconfigured, Unconfigured, config.plan_options());
            session.optimize(&planner)?
        }
    };
    info!("Planned {} stops with the {} optimizer", plan.order.len(), plan.mode);

    let maps_url = session.directions_url(&config.maps_base_url);
    if request.json {
        let output = PlanOutput {
            depot: &session.depot,
            optimizer: plan.mode.to_string(),
            approximate: plan.is_approximate(),
            summary: session.summary(),
            maps_url,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if plan.is_approximate() {
        println!("Note: approximate route (alphabetical order, distances and times are not geographic)\n");
    }
    if let Some(outcome) = plan.outcome.as_ref().filter(|outcome| !outcome.is_optimized()) {
        println!("Note: route not optimized ({outcome:?}); showing the original order\n");
    }
    println!("{}\n", session.summary());
    print!("{}", route_overview(&session.depot, &session.route_details));
    if let Some(url) = maps_url {
        println!("\nOpen in Google Maps: {url}");
    }
    Ok(())
}
