use std::io::Write;
use std::sync::Arc;
use std::time::Instant;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

mod api;
mod commands;
mod config;
mod models;
mod services;
mod session;
mod utils;

use api::PortalClient;
use commands::Dispatch;
use config::Config;
use services::auth_service;
use session::Session;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    // Logs go to stderr so they never interleave with the portal's own output
    let mut filter = EnvFilter::from_default_env();
    for directive in ["bank_portal=info", "reqwest=warn"] {
        match directive.parse() {
            Ok(d) => filter = filter.add_directive(d),
            Err(e) => eprintln!("Ignoring log directive {}: {}", directive, e),
        }
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("Configuration error: {}", e);
            return;
        }
    };

    info!("🏦 Starting banking portal against {}", config.api_url);
    let client = match PortalClient::new(&config.api_url, config.timeout) {
        Ok(c) => Arc::new(c),
        Err(e) => {
            error!("Failed to create API client: {}", e);
            return;
        }
    };
    let mut session = Session::new(client);

    if let Some((email, password)) = config.credentials() {
        debug!("Logging in with configured credentials");
        match auth_service::login(&session.client, &mut session.state, email, password).await {
            Ok(profile) => println!("👋 Welcome, {}!", profile.full_name()),
            Err(e) => warn!("Automatic login failed: {}", e),
        }
    }
    println!("Type `help` for a list of commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{}", session.prompt(Instant::now()));
        if let Err(e) = std::io::stdout().flush() {
            error!("Failed to write to stdout: {}", e);
            break;
        }

        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                error!("Failed to read input: {}", e);
                break;
            }
        };

        match commands::handle_line(&mut session, &line).await {
            Dispatch::Reply(reply) => println!("{}", reply),
            Dispatch::Silent => {}
            Dispatch::Quit => break,
        }
    }

    // pending transfers and OTP challenges are left for the server to expire
    info!("Portal closed");
}
