use clap::{Parser, Subcommand};
use jwt_debugger::client::api::DEFAULT_BASE_URL;
use jwt_debugger::client::ApiClient;
use serde::Serialize;
use serde_json::{Map, Value};

/// Command-line client for a running JWT debugger.
#[derive(Debug, Parser)]
#[command(name = "jwt-client", version)]
struct Cli {
    /// Base URL of the debugger service
    #[arg(long, env = "JWT_DEBUGGER_URL", default_value = DEFAULT_BASE_URL)]
    url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Decode a token without checking its signature
    Decode { token: String },
    /// Build and sign a new token
    Encode {
        /// Header fields as a JSON object
        #[arg(long, default_value = "{}")]
        header: String,
        /// Payload claims as a JSON object
        #[arg(long)]
        payload: String,
        #[arg(long)]
        secret: String,
        #[arg(long, default_value = "HS256")]
        algorithm: String,
    },
    /// Check a token's signature and time claims
    Verify {
        token: String,
        #[arg(long)]
        secret: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = ApiClient::new(cli.url);

    match cli.command {
        Command::Decode { token } => print(&client.decode(token.trim()).await?),
        Command::Encode {
            header,
            payload,
            secret,
            algorithm,
        } => {
            let header = parse_object("header", &header)?;
            let payload = parse_object("payload", &payload)?;
            print(&client.encode(header, payload, &secret, &algorithm).await?)
        }
        Command::Verify { token, secret } => print(&client.verify(token.trim(), &secret).await?),
    }
}

fn parse_object(name: &str, text: &str) -> Result<Map<String, Value>, String> {
    serde_json::from_str(text).map_err(|e| format!("Invalid JSON in --{}: {}", name, e))
}

fn print<T: Serialize>(response: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(response)?);
    Ok(())
}
