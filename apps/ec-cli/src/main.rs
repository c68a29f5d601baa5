use clap::{Parser, Subcommand};
use ec_calc::{
    EnergyMode, EnergyQuery, EnergyVariable, OutputRequest, OutputResolution, ResultKind,
    SelectedOutputs, SimulationOptions,
};
use ec_client::{CleanupTarget, RemoteClient, Reply, SetupOutcome, SetupRequest};
use ec_frame::Frame;
use ec_model::{ParamValue, ParameterSet};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "ec-cli")]
#[command(about = "Remote building-energy and life-cycle evaluation client", long_about = None)]
struct Cli {
    /// Base URL of the evaluation service, e.g. http://127.0.0.1:5000
    #[arg(long, global = true, default_value = "http://127.0.0.1:5000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show server status (setups and result tables)
    Status,
    /// Upload a calculation setup
    Setup {
        /// Name of the setup to create or update
        name: String,
        /// EPW weather file for dynamic simulation
        #[arg(long)]
        epw: Option<PathBuf>,
        /// CSV weather table for steady-state calculation
        #[arg(long)]
        weather_csv: Option<PathBuf>,
        /// Raw engine input (IDF) file
        #[arg(long)]
        idf: Option<PathBuf>,
        /// Building model YAML file
        #[arg(long)]
        model: Option<PathBuf>,
        /// Parameter set JSON file
        #[arg(long)]
        parameters: Option<PathBuf>,
        /// LCA calculation JSON file
        #[arg(long)]
        lca: Option<PathBuf>,
        /// Cost calculation JSON file
        #[arg(long)]
        cost: Option<PathBuf>,
        /// Energy calculation mode: simulation / steady_state
        #[arg(long)]
        energy_mode: Option<String>,
        /// Skip result database creation
        #[arg(long)]
        no_init_db: bool,
    },
    /// Evaluate parameters and persist the result
    Calculate {
        name: String,
        /// Parameter values as key=value pairs
        params: Vec<String>,
    },
    /// Evaluate parameters without persisting
    Instate {
        name: String,
        params: Vec<String>,
        /// Request all simulation outputs
        #[arg(long)]
        all_outputs: bool,
        /// Output resolution for requested outputs
        #[arg(long)]
        resolution: Option<String>,
    },
    /// Replay a persisted run's parameters without persisting
    Reinstate { name: String, calc_id: String },
    /// Dump the setup's result database
    Results {
        name: String,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Delete stored data for a setup
    Cleanup {
        name: String,
        /// 'results' or 'simulations'; both when omitted
        #[arg(long)]
        target: Option<String>,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Fetch the current building model
    Model {
        name: String,
        /// Write the model as YAML to this path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Current parameter values
    Params { name: String },
    /// Full parameter definitions, limits included
    ParamsFull { name: String },
    /// The setup's LCA calculation definition
    Lca { name: String },
    /// The setup's cost calculation definition
    Cost { name: String },
    /// Energy results
    Energy {
        name: String,
        /// Id of a previously run simulation
        #[arg(long)]
        id: Option<String>,
        /// Variables to fetch (defaults: heating, cooling, lights)
        #[arg(long)]
        variables: Vec<String>,
        /// zone / surface / balance
        #[arg(long, default_value = "zone")]
        kind: String,
        /// runperiod / annual / monthly / daily / hourly / timestep
        #[arg(long, default_value = "runperiod")]
        period: String,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Single-variable energy series of one simulation run
    EnergyDetailed {
        name: String,
        calc_id: String,
        variable: String,
        /// zone / surface / balance
        #[arg(long, default_value = "zone")]
        kind: String,
        #[arg(long, default_value = "runperiod")]
        period: String,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error("Client error: {0}")]
    Client(#[from] ec_client::ClientError),

    #[error("Model error: {0}")]
    Model(#[from] ec_model::ModelError),

    #[error("Table error: {0}")]
    Frame(#[from] ec_frame::FrameError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

type CliResult<T> = Result<T, CliError>;

fn main() -> CliResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let client = RemoteClient::from_url(&cli.url)?;

    match cli.command {
        Commands::Status => cmd_status(&client),
        Commands::Setup {
            name,
            epw,
            weather_csv,
            idf,
            model,
            parameters,
            lca,
            cost,
            energy_mode,
            no_init_db,
        } => cmd_setup(
            &client,
            &name,
            epw,
            weather_csv,
            idf,
            model,
            parameters,
            lca,
            cost,
            energy_mode,
            no_init_db,
        ),
        Commands::Calculate { name, params } => cmd_calculate(&client, &name, &params),
        Commands::Instate {
            name,
            params,
            all_outputs,
            resolution,
        } => cmd_instate(&client, &name, &params, all_outputs, resolution.as_deref()),
        Commands::Reinstate { name, calc_id } => cmd_reinstate(&client, &name, &calc_id),
        Commands::Results { name, output } => cmd_results(&client, &name, output.as_deref()),
        Commands::Cleanup { name, target, yes } => {
            cmd_cleanup(&client, &name, target.as_deref(), yes)
        }
        Commands::Model { name, output } => cmd_model(&client, &name, output.as_deref()),
        Commands::Params { name } => cmd_params(&client, &name),
        Commands::ParamsFull { name } => cmd_params_full(&client, &name),
        Commands::Lca { name } => cmd_lca(&client, &name),
        Commands::Cost { name } => cmd_cost(&client, &name),
        Commands::Energy {
            name,
            id,
            variables,
            kind,
            period,
            output,
        } => cmd_energy(&client, &name, id, &variables, &kind, &period, output.as_deref()),
        Commands::EnergyDetailed {
            name,
            calc_id,
            variable,
            kind,
            period,
            output,
        } => cmd_energy_detailed(
            &client,
            &name,
            &calc_id,
            &variable,
            &kind,
            &period,
            output.as_deref(),
        ),
    }
}

/// Parse a wire word into any of the serde-backed query enums.
fn parse_wire<T: DeserializeOwned>(what: &str, word: &str) -> CliResult<T> {
    serde_json::from_value(serde_json::Value::String(word.to_string()))
        .map_err(|_| CliError::InvalidInput(format!("unknown {what}: '{word}'")))
}

fn parse_params(pairs: &[String]) -> CliResult<BTreeMap<String, ParamValue>> {
    let mut params = BTreeMap::new();
    for pair in pairs {
        let Some((key, value)) = pair.split_once('=') else {
            return Err(CliError::InvalidInput(format!(
                "expected key=value, got '{pair}'"
            )));
        };
        let value = if let Ok(i) = value.parse::<i64>() {
            ParamValue::Int(i)
        } else if let Ok(f) = value.parse::<f64>() {
            ParamValue::Float(f)
        } else {
            ParamValue::Text(value.to_string())
        };
        params.insert(key.to_string(), value);
    }
    Ok(params)
}

fn print_json_reply(reply: &Reply<serde_json::Value>) -> CliResult<()> {
    match reply {
        Reply::Parsed(value) => println!("{}", serde_json::to_string_pretty(value)?),
        Reply::Raw(text) => println!("{}", text),
    }
    Ok(())
}

fn write_frame_reply(reply: Reply<Frame>, output: Option<&Path>) -> CliResult<()> {
    match reply {
        Reply::Parsed(frame) => {
            let csv = ec_frame::csv::to_csv(&frame);
            if let Some(path) = output {
                std::fs::write(path, csv)?;
                println!("✓ Wrote {} rows to {}", frame.n_rows(), path.display());
            } else {
                print!("{}", csv);
            }
        }
        Reply::Raw(text) => println!("{}", text),
    }
    Ok(())
}

fn cmd_status(client: &RemoteClient) -> CliResult<()> {
    print_json_reply(&client.status()?)
}

#[allow(clippy::too_many_arguments)]
fn cmd_setup(
    client: &RemoteClient,
    name: &str,
    epw: Option<PathBuf>,
    weather_csv: Option<PathBuf>,
    idf: Option<PathBuf>,
    model: Option<PathBuf>,
    parameters: Option<PathBuf>,
    lca: Option<PathBuf>,
    cost: Option<PathBuf>,
    energy_mode: Option<String>,
    no_init_db: bool,
) -> CliResult<()> {
    let mut request = SetupRequest::new(name);
    if let Some(path) = epw {
        request = request.epw(path);
    }
    if let Some(path) = weather_csv {
        let content = std::fs::read_to_string(&path)?;
        request = request.weather_data(ec_frame::csv::from_csv(&content)?);
    }
    if let Some(path) = idf {
        request = request.idf(std::fs::read_to_string(&path)?);
    }
    if let Some(path) = model {
        request = request.model(ec_model::load_yaml(&path)?);
    }
    if let Some(path) = parameters {
        let content = std::fs::read_to_string(&path)?;
        let set: ParameterSet = serde_json::from_str(&content)?;
        request = request.parameters(set);
    }
    if let Some(path) = lca {
        let content = std::fs::read_to_string(&path)?;
        request = request.lca_calculation(serde_json::from_str(&content)?);
    }
    if let Some(path) = cost {
        let content = std::fs::read_to_string(&path)?;
        request = request.cost_calculation(serde_json::from_str(&content)?);
    }
    if let Some(word) = energy_mode {
        let mode: EnergyMode = parse_wire("energy mode", &word)?;
        request = request.energy_calculation(mode);
    }
    if no_init_db {
        request = request.skip_init_db();
    }

    match client.setup(&request)? {
        SetupOutcome::Completed { acks } => {
            println!("✓ Setup '{}' complete", name);
            for (section, ack) in acks {
                println!("  {}: {}", section, ack);
            }
        }
        SetupOutcome::Rejected {
            section,
            message,
            acks,
        } => {
            for (done, ack) in acks {
                println!("  {}: {}", done, ack);
            }
            println!("✗ Section '{}' rejected: {}", section, message);
        }
    }
    Ok(())
}

fn cmd_calculate(client: &RemoteClient, name: &str, pairs: &[String]) -> CliResult<()> {
    let params = parse_params(pairs)?;
    print_json_reply(&client.calculate(name, &params)?)
}

fn cmd_instate(
    client: &RemoteClient,
    name: &str,
    pairs: &[String],
    all_outputs: bool,
    resolution: Option<&str>,
) -> CliResult<()> {
    let params = parse_params(pairs)?;
    let options = if all_outputs || resolution.is_some() {
        let period: OutputResolution = match resolution {
            Some(word) => parse_wire("output resolution", word)?,
            None => OutputResolution::Runperiod,
        };
        Some(SimulationOptions {
            outputs: if all_outputs {
                OutputRequest::All
            } else {
                OutputRequest::Selected(SelectedOutputs::default())
            },
            output_resolution: period,
            clear_existing_variables: true,
        })
    } else {
        None
    };
    print_json_reply(&client.instate(name, &params, options.as_ref())?)
}

fn cmd_reinstate(client: &RemoteClient, name: &str, calc_id: &str) -> CliResult<()> {
    print_json_reply(&client.reinstate(name, calc_id)?)
}

fn cmd_results(client: &RemoteClient, name: &str, output: Option<&Path>) -> CliResult<()> {
    write_frame_reply(client.results(name)?, output)
}

fn cmd_cleanup(
    client: &RemoteClient,
    name: &str,
    target: Option<&str>,
    yes: bool,
) -> CliResult<()> {
    let target = match target {
        None => None,
        Some("results") => Some(CleanupTarget::Results),
        Some("simulations") => Some(CleanupTarget::Simulations),
        Some(other) => {
            return Err(CliError::InvalidInput(format!(
                "unknown cleanup target: '{other}'"
            )));
        }
    };

    match target {
        Some(CleanupTarget::Results) | None => {
            println!("Result database will be cleared for setup: {}", name)
        }
        _ => {}
    }
    match target {
        Some(CleanupTarget::Simulations) | None => {
            println!("Simulation results will be deleted for setup: {}", name)
        }
        _ => {}
    }

    if !yes && !confirm("Are you sure? (y/n): ")? {
        println!("Cleanup cancelled");
        return Ok(());
    }

    let message = client.cleanup(name, target)?;
    println!("{}", message);
    Ok(())
}

fn confirm(prompt: &str) -> CliResult<bool> {
    print!("{}", prompt);
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(answer.trim() == "y")
}

fn cmd_model(client: &RemoteClient, name: &str, output: Option<&Path>) -> CliResult<()> {
    match client.model(name)? {
        Reply::Parsed(building) => {
            if let Some(path) = output {
                ec_model::save_yaml(path, &building)?;
                println!("✓ Wrote model '{}' to {}", building.name, path.display());
            } else {
                println!("{}", serde_json::to_string_pretty(&building)?);
            }
        }
        Reply::Raw(text) => println!("{}", text),
    }
    Ok(())
}

fn cmd_params(client: &RemoteClient, name: &str) -> CliResult<()> {
    print_json_reply(&client.parameters(name)?)
}

fn cmd_params_full(client: &RemoteClient, name: &str) -> CliResult<()> {
    match client.parameters_full(name)? {
        Reply::Parsed(params) => {
            for param in params {
                let limits = match (param.min, param.max) {
                    (Some(min), Some(max)) => format!(" [{}, {}]", min, max),
                    _ => String::new(),
                };
                println!("  {} = {}{}", param.name, param.value, limits);
            }
        }
        Reply::Raw(text) => println!("{}", text),
    }
    Ok(())
}

fn cmd_lca(client: &RemoteClient, name: &str) -> CliResult<()> {
    match client.lca(name)? {
        Reply::Parsed(calc) => println!("{}", serde_json::to_string_pretty(&calc)?),
        Reply::Raw(text) => println!("{}", text),
    }
    Ok(())
}

fn cmd_cost(client: &RemoteClient, name: &str) -> CliResult<()> {
    match client.cost(name)? {
        Reply::Parsed(calc) => println!("{}", serde_json::to_string_pretty(&calc)?),
        Reply::Raw(text) => println!("{}", text),
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_energy(
    client: &RemoteClient,
    name: &str,
    id: Option<String>,
    variables: &[String],
    kind: &str,
    period: &str,
    output: Option<&Path>,
) -> CliResult<()> {
    let mut query = EnergyQuery {
        calc_id: id,
        kind: parse_wire("result kind", kind)?,
        period: parse_wire("period", period)?,
        ..EnergyQuery::default()
    };
    if !variables.is_empty() {
        query.variables = variables
            .iter()
            .map(|word| parse_wire::<EnergyVariable>("variable", word))
            .collect::<CliResult<Vec<_>>>()?;
    }
    write_frame_reply(client.energy(name, &query)?, output)
}

fn cmd_energy_detailed(
    client: &RemoteClient,
    name: &str,
    calc_id: &str,
    variable: &str,
    kind: &str,
    period: &str,
    output: Option<&Path>,
) -> CliResult<()> {
    let reply = client.energy_detailed(
        name,
        calc_id,
        parse_wire("variable", variable)?,
        parse_wire("result kind", kind)?,
        parse_wire("period", period)?,
    )?;
    write_frame_reply(reply, output)
}
