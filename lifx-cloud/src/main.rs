use std::env;

use anyhow::{anyhow, bail, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tokio::sync::oneshot;

use lifx_cloud_lib::client::{ClientConfig, Completion, LifxClient};
use lifx_cloud_lib::model::{CommandResult, Light};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    handle_cli(cli).await
}

/// This struct defines the command line interface of the application
#[derive(Parser)]
#[clap(
    name = "lifx-cloud",
    about = "Controls LIFX devices through the cloud HTTP API",
    version
)]
pub struct Cli {
    /// LIFX API access token; falls back to the LIFX_TOKEN environment variable
    #[clap(long)]
    pub token: Option<String>,

    /// Overrides the API base URL
    #[clap(long)]
    pub base_url: Option<String>,

    /// Output format (plaintext, json, yaml)
    #[clap(short, long, value_enum, default_value_t = OutputFormat::Plaintext)]
    pub output: OutputFormat,

    #[clap(subcommand)]
    pub command: Commands,
}

/// Supported output formats for record listings.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum OutputFormat {
    /// Plain text format.
    Plaintext,
    /// JSON format.
    Json,
    /// YAML format.
    Yaml,
}

/// Subcommands available for the CLI
#[derive(Subcommand)]
pub enum Commands {
    /// Lists the lights matched by a selector
    #[clap(name = "lights")]
    Lights {
        /// Selector: "all", a light id, or a group expression
        #[clap(default_value = "all")]
        selector: String,
    },
    /// Turns the matched lights on or off
    #[clap(name = "set-power")]
    SetPower {
        /// Selector identifying the target lights
        selector: String,

        /// Target power state
        #[clap(value_enum)]
        state: PowerState,

        /// Fade duration in seconds
        #[clap(short, long, default_value_t = 1.0)]
        duration: f64,
    },
    /// Applies a color expression to the matched lights
    #[clap(name = "set-color")]
    SetColor {
        /// Selector identifying the target lights
        selector: String,

        /// Server-side color expression, e.g. "red" or "hue:120 saturation:1.0"
        color: String,

        /// Fade duration in seconds
        #[clap(short, long, default_value_t = 1.0)]
        duration: f64,

        /// Also power the lights on
        #[clap(long)]
        power_on: bool,
    },
}

/// Desired power state for the `set-power` subcommand.
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum PowerState {
    On,
    Off,
}

async fn handle_cli(cli: Cli) -> Result<()> {
    let token = match cli.token {
        Some(token) => token,
        None => env::var("LIFX_TOKEN")
            .map_err(|_| anyhow!("no access token: pass --token or set LIFX_TOKEN"))?,
    };

    let mut config = ClientConfig::new(token);
    if let Some(base_url) = cli.base_url {
        config = config.with_base_url(base_url);
    }
    let client = LifxClient::new(config)?;

    match cli.command {
        Commands::Lights { selector } => {
            let completion = await_completion(|done| client.list_lights(&selector, done)).await?;
            let lights = into_records(completion)?;
            print_records(&lights, cli.output, |light: &Light| {
                format!(
                    "{}  {}  power={}  brightness={:.2}  connected={}",
                    light.id,
                    light.label,
                    if light.power { "on" } else { "off" },
                    light.brightness,
                    light.connected
                )
            })
        }
        Commands::SetPower {
            selector,
            state,
            duration,
        } => {
            let power = state == PowerState::On;
            let completion = await_completion(|done| {
                client.set_lights_power(&selector, power, duration, done)
            })
            .await?;
            let results = into_records(completion)?;
            print_records(&results, cli.output, result_line)
        }
        Commands::SetColor {
            selector,
            color,
            duration,
            power_on,
        } => {
            let completion = await_completion(|done| {
                client.set_lights_color(&selector, &color, duration, power_on, done)
            })
            .await?;
            let results = into_records(completion)?;
            print_records(&results, cli.output, result_line)
        }
    }
}

/// Issues one client operation and waits for its completion.
async fn await_completion<T: Send + 'static>(
    issue: impl FnOnce(Box<dyn FnOnce(Completion<T>) + Send>),
) -> Result<Completion<T>> {
    let (tx, rx) = oneshot::channel();
    issue(Box::new(move |completion| {
        let _ = tx.send(completion);
    }));
    rx.await
        .map_err(|_| anyhow!("client dropped before the call completed"))
}

fn into_records<T>(completion: Completion<T>) -> Result<Vec<T>> {
    if let Some(error) = completion.error {
        bail!("{} {} failed: {error}", completion.request.method, completion.request.url);
    }
    Ok(completion.records)
}

fn result_line(result: &CommandResult) -> String {
    format!("{}  {}", result.id, result.status)
}

fn print_records<T: Serialize>(
    records: &[T],
    output: OutputFormat,
    line: impl Fn(&T) -> String,
) -> Result<()> {
    match output {
        OutputFormat::Plaintext => {
            for record in records {
                println!("{}", line(record));
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(records)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(records)?),
    }
    Ok(())
}
