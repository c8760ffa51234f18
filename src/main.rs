//! Command-line front end for submitting car listings.
use std::env;
use std::path::PathBuf;

use clap::Parser;
use config::Config;
use dotenvy::dotenv;

use pushkind_listings::domain::{City, Field, FileHandle};
use pushkind_listings::forms::login::LoginForm;
use pushkind_listings::models::config::ClientConfig;
use pushkind_listings::services::SubmitRefused;
use pushkind_listings::services::form::ListingFormController;
use pushkind_listings::services::session::{LoginClient, SessionStore};
use pushkind_listings::services::submission::{SubmissionPipeline, build_client};

#[derive(Parser)]
#[command(name = "pushkind-listings", about = "Submit a car listing")]
struct Cli {
    /// Car model, e.g. "Honda Civic"
    #[arg(long)]
    model: String,
    /// Asking price
    #[arg(long)]
    price: Option<f64>,
    /// Ten digit phone number
    #[arg(long)]
    phone: String,
    /// Lahore or Karachi
    #[arg(long, default_value = "Lahore")]
    city: City,
    /// Maximum number of photos (1-5)
    #[arg(long, default_value_t = pushkind_listings::DEFAULT_MAX_PHOTOS)]
    max_photos: u8,
    /// Bearer token from an earlier login
    #[arg(long, env = "LISTING_TOKEN", conflicts_with = "email")]
    token: Option<String>,
    /// Log in with this email before submitting
    #[arg(long, requires = "password")]
    email: Option<String>,
    #[arg(long, env = "LISTING_PASSWORD")]
    password: Option<String>,
    /// Photos to attach
    photos: Vec<PathBuf>,
}

fn load_config() -> Result<ClientConfig, config::ConfigError> {
    // Select config profile (defaults to `local`).
    let app_env = env::var("APP_ENV").unwrap_or_else(|_| "local".into());

    Config::builder()
        .add_source(config::File::with_name("config/default"))
        .add_source(config::File::with_name(&format!("config/{}", app_env)).required(false))
        .add_source(config::Environment::with_prefix("APP"))
        .build()?
        .try_deserialize::<ClientConfig>()
}

#[tokio::main]
async fn main() {
    // Load environment variables from `.env` in local development.
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let cli = Cli::parse();

    let client_config = match load_config() {
        Ok(config) => config,
        Err(err) => {
            log::error!("Error loading client config: {}", err);
            std::process::exit(1);
        }
    };

    let pipeline = match SubmissionPipeline::from_config(&client_config) {
        Ok(pipeline) => pipeline,
        Err(err) => {
            log::error!("Error building HTTP client: {}", err);
            std::process::exit(1);
        }
    };

    let session = SessionStore::new();
    if let (Some(email), Some(password)) = (cli.email.clone(), cli.password.clone()) {
        let http = match build_client(&client_config) {
            Ok(http) => http,
            Err(err) => {
                log::error!("Error building HTTP client: {}", err);
                std::process::exit(1);
            }
        };
        let login = LoginClient::new(http, client_config.login_url());
        if let Err(err) = login.login(&LoginForm { email, password }, &session).await {
            log::error!("Login failed: {}", err);
            std::process::exit(1);
        }
    }

    let mut form = ListingFormController::new(client_config.photo_size_policy());
    form.set_car_model(cli.model);
    form.set_price(cli.price);
    form.set_phone(cli.phone);
    form.set_city(Some(cli.city));
    form.set_max_photos(Some(cli.max_photos));

    let mut photos = Vec::with_capacity(cli.photos.len());
    for path in &cli.photos {
        match FileHandle::from_path(path) {
            Ok(photo) => photos.push(photo),
            Err(err) => {
                log::error!("Cannot use photo {}: {}", path.display(), err);
                std::process::exit(1);
            }
        }
    }
    if let Err(err) = form.add_photos(&photos) {
        log::error!("{}", err);
        std::process::exit(1);
    }
    for url in form.previews().urls_for(form.draft().photos.files()) {
        log::debug!("Attached {}", url);
    }

    let outcome = match cli.token {
        Some(token) => form.submit(&pipeline, token.as_str()).await,
        None => form.submit(&pipeline, &session).await,
    };
    form.unmount();

    match outcome {
        Ok(outcome) if outcome.is_success() => log::info!("Car added successfully!"),
        Ok(_) => {
            log::error!("Failed to add car. Please try again.");
            std::process::exit(1);
        }
        Err(SubmitRefused::Invalid(errors)) => {
            for field in Field::ALL {
                if let Some(message) = errors.get(field) {
                    log::error!("{}: {}", field, message);
                }
            }
            std::process::exit(1);
        }
        Err(err) => {
            log::error!("{}", err);
            std::process::exit(1);
        }
    }
}
