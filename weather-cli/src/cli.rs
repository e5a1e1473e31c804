use anyhow::{Context, bail};
use chrono::{Local, NaiveDate};
use clap::{ArgAction, Parser, Subcommand};
use inquire::{InquireError, Text};
use tracing::{debug, info};
use weather_core::{
    Config, FormError, LookupClient, LookupForm, Msg, ViewState, WeatherRequest,
    client_from_config, render::LOADING_TEXT, render_state, runtime, update,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather lookup client")]
pub struct Cli {
    /// Base URL of the weather service; overrides the config file and WEATHER_SERVICE_URL.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Look up a stored weather record by its request ID.
    Lookup {
        /// Weather request ID, as returned by `weather create`.
        id: String,

        /// Print the raw record as JSON instead of tables.
        #[arg(long)]
        json: bool,
    },

    /// Prompt for request IDs repeatedly; an empty answer quits.
    Interactive,

    /// Ask the service to fetch and store current weather for a location.
    Create {
        /// Location name, e.g. "Paris".
        location: String,

        /// Request date (YYYY-MM-DD); defaults to today.
        #[arg(long)]
        date: Option<String>,

        /// Free-text notes stored with the record.
        #[arg(long, default_value = "")]
        notes: String,
    },

    /// Set the weather service base URL in the config file.
    Configure {
        /// New base URL; prompted for when absent.
        url: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let Cli { base_url, command, .. } = self;

        match command {
            Command::Configure { url } => configure(url),
            Command::Lookup { id, json } => lookup(connect(base_url)?.as_ref(), id, json).await,
            Command::Interactive => interactive(connect(base_url)?.as_ref()).await,
            Command::Create { location, date, notes } => {
                create(connect(base_url)?.as_ref(), location, date, notes).await
            }
        }
    }
}

/// Resolve the service endpoint (flag > env > config file) and build a client for it.
fn connect(base_url: Option<String>) -> anyhow::Result<Box<dyn LookupClient>> {
    let config = Config::resolve(base_url)?;
    info!(base_url = config.base_url(), "using weather service");
    Ok(client_from_config(&config))
}

async fn lookup(client: &dyn LookupClient, id: String, json: bool) -> anyhow::Result<()> {
    let (form, _) = update(LookupForm::new(), Msg::IdentifierChanged(id));
    let form = submit(client, form).await?;

    match form.state() {
        ViewState::Success(result) if json => {
            let out = serde_json::to_string_pretty(result)
                .context("Failed to serialize weather record to JSON")?;
            println!("{out}");
        }
        ViewState::Error(message) => bail!("{message}"),
        state => println!("{}", render_state(state)),
    }

    Ok(())
}

async fn interactive(client: &dyn LookupClient) -> anyhow::Result<()> {
    let mut form = LookupForm::new();

    loop {
        let answer = Text::new("Weather request ID:")
            .with_help_message("Leave empty to quit")
            .prompt();

        let id = match answer {
            Ok(id) if id.is_empty() => break,
            Ok(id) => id,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err).context("Failed to read request ID"),
        };

        form = update(form, Msg::IdentifierChanged(id)).0;
        form = submit(client, form).await?;
        println!("{}\n", render_state(form.state()));
    }

    debug!(submissions = form.generation(), "leaving interactive mode");
    Ok(())
}

/// Run one submission, showing the loading line while the request is in flight.
async fn submit(client: &dyn LookupClient, form: LookupForm) -> anyhow::Result<LookupForm> {
    if form.identifier().is_empty() {
        bail!(FormError::EmptyIdentifier);
    }

    eprintln!("{LOADING_TEXT}");
    Ok(runtime::submit(client, form).await)
}

async fn create(
    client: &dyn LookupClient,
    location: String,
    date: Option<String>,
    notes: String,
) -> anyhow::Result<()> {
    let date = match date {
        Some(raw) => NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
            .with_context(|| format!("Invalid date '{raw}', expected YYYY-MM-DD"))?,
        None => Local::now().date_naive(),
    };

    let request = WeatherRequest {
        date: date.format("%Y-%m-%d").to_string(),
        location,
        notes,
    };

    let id = client.create(&request).await?;
    println!("{id}");
    eprintln!("Look it up with: weather lookup {id}");

    Ok(())
}

fn configure(url: Option<String>) -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let url = match url {
        Some(url) => url,
        None => Text::new("Weather service base URL:")
            .with_default(config.base_url())
            .prompt()
            .context("Failed to read base URL")?,
    };

    config.set_base_url(&url)?;
    let path = config.save()?;

    println!("Saved base URL {} to {}", config.base_url(), path.display());
    Ok(())
}
