use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use delivery_desk::api::ApiClient;
use delivery_desk::config::Config;
use delivery_desk::logger::Logger;
use delivery_desk::utils::datetime;
use delivery_desk::{DeliveryBackend, DeliveryPersonArgs, DeliveryService, ProductImage};

#[derive(Parser)]
#[command(name = "delivery-desk", version, about = "Delivery personnel, reports and product images")]
struct Cli {
    /// Config file to use instead of the default lookup
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List delivery personnel
    Personnel,
    /// Create a delivery person
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        identification: String,
        #[arg(long)]
        phone: Option<String>,
    },
    /// Update a delivery person
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        identification: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        active: Option<bool>,
    },
    /// Delete a delivery person
    Delete { id: String },
    /// Delivery report between two dates (defaults to today in Ecuador)
    Report {
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
        #[arg(long)]
        person: Option<String>,
    },
    /// Resolve a product image URL, falling back to the placeholder
    Image { url: Option<String> },
    /// Print today's date in Ecuador
    Today,
    /// Format a timestamp in Ecuador time
    Format {
        date: String,
        #[arg(long)]
        date_only: bool,
    },
    /// Write a default config file
    InitConfig { path: Option<PathBuf> },
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match (&cli.command, &cli.config) {
        (Command::InitConfig { .. }, _) => Config::default(),
        (_, Some(path)) => Config::load_from_file(path)?,
        (_, None) => Config::load()?,
    };
    Logger::init(&config.logging)?;

    let service = || -> Result<DeliveryService> {
        let client = ApiClient::from_config(&config.api).context("Failed to create API client")?;
        Ok(DeliveryService::new(client))
    };

    match cli.command {
        Command::Personnel => print_json(&service()?.get_personnel().await?)?,
        Command::Create {
            name,
            identification,
            phone,
        } => {
            let args = DeliveryPersonArgs {
                name: Some(name),
                identification: Some(identification),
                phone,
                active: None,
            };
            print_json(&service()?.create_person(&args).await?)?
        }
        Command::Update {
            id,
            name,
            identification,
            phone,
            active,
        } => {
            let args = DeliveryPersonArgs {
                name,
                identification,
                phone,
                active,
            };
            print_json(&service()?.update_person(&id, &args).await?)?
        }
        Command::Delete { id } => {
            service()?.delete_person(&id).await?;
            println!("Deleted {}", id);
        }
        Command::Report { start, end, person } => {
            let today = datetime::ect_today_string();
            let start = start.unwrap_or_else(|| today.clone());
            let end = end.unwrap_or(today);
            let report = service()?.get_report(&start, &end, person.as_deref()).await?;
            print_json(&report)?
        }
        Command::Image { url } => {
            let image = ProductImage::from_config(&config.images).context("Failed to create image probe")?;
            image.load(url.as_deref()).await;
            print_json(&image.snapshot())?
        }
        Command::Today => println!("{}", datetime::ect_today_string()),
        Command::Format { date, date_only } => println!("{}", datetime::format_ect(&date, !date_only)),
        Command::InitConfig { path } => {
            let path = match path {
                Some(path) => path,
                None => Config::get_default_config_path()?,
            };
            Config::generate_default_config(path)?
        }
    }

    Ok(())
}
