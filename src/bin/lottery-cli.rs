use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::{json, Value};

use lottery_console::blockchain::wallet::PRIVATE_KEY_ENV_VAR;
use lottery_console::http::SESSION_HEADER;

#[derive(Parser)]
#[command(name = "lottery-cli")]
#[command(about = "Command-line client for the lottery console", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8501")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show contract balance, participants, manager and recent winners
    Status,
    /// Enter the lottery with the configured entry value
    Enter {
        /// Sender address
        #[arg(long)]
        sender: String,
        /// Sender private key
        #[arg(long, env = PRIVATE_KEY_ENV_VAR, hide_env_values = true)]
        key: String,
    },
    /// Prepare an unsigned selectWinner() transaction
    Prepare {
        /// Manager address; the on-chain manager when omitted
        #[arg(long)]
        manager: Option<String>,
        /// Session to hold the transaction in; a new one is issued when omitted
        #[arg(long)]
        session: Option<String>,
    },
    /// Show the transaction held in a session
    Pending {
        #[arg(long)]
        session: String,
    },
    /// Sign and broadcast the held winner transaction
    Send {
        #[arg(long)]
        session: String,
        /// Manager private key
        #[arg(long, env = PRIVATE_KEY_ENV_VAR, hide_env_values = true)]
        key: String,
    },
    /// Look up a transaction through the block explorer
    Lookup { hash: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    match cli.command {
        Commands::Status => {
            let res = client.get(format!("{}/api/v1/status", base)).send().await?;
            print_response(res).await?;
        }
        Commands::Enter { sender, key } => {
            let res = client
                .post(format!("{}/api/v1/enter", base))
                .json(&json!({ "sender": sender, "private_key": key }))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Prepare { manager, session } => {
            let res = client
                .post(format!("{}/api/v1/manager/prepare", base))
                .headers(session_headers(session.as_deref())?)
                .json(&json!({ "manager": manager }))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Pending { session } => {
            let res = client
                .get(format!("{}/api/v1/manager/pending", base))
                .headers(session_headers(Some(&session))?)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Send { session, key } => {
            let res = client
                .post(format!("{}/api/v1/manager/send", base))
                .headers(session_headers(Some(&session))?)
                .json(&json!({ "private_key": key }))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Lookup { hash } => {
            let res = client
                .get(format!("{}/api/v1/tx/{}", base, hash.trim()))
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

fn session_headers(session: Option<&str>) -> Result<HeaderMap, Box<dyn std::error::Error>> {
    let mut headers = HeaderMap::new();
    if let Some(session) = session {
        headers.insert(SESSION_HEADER, HeaderValue::from_str(session)?);
    }
    Ok(headers)
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(session) = res
        .headers()
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
    {
        eprintln!("Session: {}", session);
    }

    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: console returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        std::process::exit(1);
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
