use std::path::PathBuf;

use clap::{Parser, Subcommand};
use notify_hub::config::loader::load_config;
use notify_hub::AppConfig;
use notify_hub_sdk::HubClient;

#[derive(Parser)]
#[command(name = "hub-cli")]
#[command(about = "Operator CLI for notify-hub", long_about = None)]
struct Cli {
    /// Configuration document; supplies the port and auth header
    #[arg(short, long, default_value = "settings.json", global = true)]
    settings: PathBuf,

    /// Hub base URL; defaults to localhost on the configured port
    #[arg(short, long)]
    url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Post a notification to a running hub
    Send {
        /// Topic slug; omit for the default channel
        #[arg(long)]
        slug: Option<String>,

        /// Send the message as application/json
        #[arg(long)]
        json: bool,

        message: String,
    },
    /// Print the topic table of the configuration document
    Topics,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli.settings)?;

    match cli.command {
        Commands::Send { slug, json, message } => {
            let url = cli
                .url
                .unwrap_or_else(|| format!("http://127.0.0.1:{}", config.port));
            let mut client = HubClient::new(&url);
            if config.auth_enabled() {
                client = client.with_auth(&config.auth_header, &config.auth_token);
            }

            let status = if json {
                client.send_json(slug.as_deref(), &message).await?
            } else {
                client.send_text(slug.as_deref(), &message).await?
            };

            println!("{}", status);
            if !status.is_success() {
                std::process::exit(1);
            }
        }
        Commands::Topics => print_topics(&config),
    }

    Ok(())
}

fn print_topics(config: &AppConfig) {
    println!("{:<24} {:<24} {:>12}  STATUS", "NAME", "SLUG", "ID");
    for topic in &config.topics {
        let status = if topic.is_provisioned() { "provisioned" } else { "pending" };
        println!("{:<24} {:<24} {:>12}  {}", topic.name, topic.slug, topic.id, status);
    }
}
