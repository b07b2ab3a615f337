use clap::Parser;

mod models;
mod repositories;
pub mod services;
pub mod settings;
pub mod utils;

#[derive(Parser)]
#[command(name = "leadbot-onboard")]
#[command(about = "Console onboarding client for the LeadBot SaaS")]
struct Args {
    /// Path to the configuration file.
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Path to the log4rs configuration file.
    #[arg(long, default_value = "log4rs.yaml")]
    log_config: String,
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    let args = Args::parse();

    log4rs::init_file(&args.log_config, Default::default()).expect("Could not init logging.");
    let config = settings::Settings::new(&args.config).expect("Could not load config file.");

    println!("[*] Starting services.");
    let channels = services::start_services(config)
        .await
        .expect("Could not start services.");

    services::console::run(channels)
        .await
        .expect("Console session failed.");
}
