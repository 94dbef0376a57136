use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Command-line client for a running photo gateway", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch one random photo
    Random,
    /// Search photos (first page)
    Search { term: String },
    /// Fetch a photo by id
    Photo { id: String },
    /// Issue a signed token
    Token,
    /// Verify a signed token
    Verify {
        token: String,
        /// Send the token as a bearer header instead of a JSON body
        #[arg(long)]
        bearer: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let res = match cli.command {
        Commands::Random => client.get(format!("{}/api/random", cli.url)).send().await?,
        Commands::Search { term } => {
            client
                .get(format!("{}/api/search", cli.url))
                .query(&[("q", term)])
                .send()
                .await?
        }
        Commands::Photo { id } => client.get(format!("{}/api/photos/{}", cli.url, id)).send().await?,
        Commands::Token => client.get(format!("{}/jwt/get", cli.url)).send().await?,
        Commands::Verify { token, bearer: true } => {
            let mut headers = HeaderMap::new();
            headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {}", token))?);
            client
                .post(format!("{}/jwt/test", cli.url))
                .headers(headers)
                .send()
                .await?
        }
        Commands::Verify { token, bearer: false } => {
            client
                .post(format!("{}/jwt/test", cli.url))
                .json(&json!({ "token": token }))
                .send()
                .await?
        }
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let correlation_id = res
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();

    if !status.is_success() {
        eprintln!("Error: gateway returned status {} (request {})", status, correlation_id);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
