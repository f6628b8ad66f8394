use clap::{Parser, Subcommand};
use reqwest::{Method, RequestBuilder};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "mock-cli")]
#[command(about = "Command-line client for the mock API server", long_about = None)]
struct Cli {
    /// Server base URL.
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    /// Mount prefix the API is served under.
    #[arg(short, long, default_value = "/")]
    prefix: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check server status
    Status,
    /// List collections and record counts
    Collections,
    /// Clear every collection
    Reset,
    /// List the records of a collection
    List { collection: String },
    /// Fetch one record
    Get { collection: String, id: String },
    /// Create a record from a JSON object
    Create { collection: String, json: String },
    /// Delete one record
    Delete { collection: String, id: String },
}

impl Cli {
    fn admin_url(&self, path: &str) -> String {
        format!("{}/__admin/{}", self.url.trim_end_matches('/'), path)
    }

    fn api_url(&self, path: &str) -> String {
        let prefix = self.prefix.trim_matches('/');
        if prefix.is_empty() {
            format!("{}/{}", self.url.trim_end_matches('/'), path)
        } else {
            format!("{}/{}/{}", self.url.trim_end_matches('/'), prefix, path)
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let request: RequestBuilder = match &cli.command {
        Commands::Status => client.get(cli.admin_url("status")),
        Commands::Collections => client.get(cli.admin_url("collections")),
        Commands::Reset => client.request(Method::DELETE, cli.admin_url("collections")),
        Commands::List { collection } => client.get(cli.api_url(collection)),
        Commands::Get { collection, id } => {
            client.get(cli.api_url(&format!("{}/{}", collection, id)))
        }
        Commands::Create { collection, json } => {
            let body: Value = serde_json::from_str(json)?;
            client.post(cli.api_url(collection)).json(&body)
        }
        Commands::Delete { collection, id } => {
            client.delete(cli.api_url(&format!("{}/{}", collection, id)))
        }
    };

    print_response(request.send().await?).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    if !status.is_success() {
        eprintln!("Error: server returned status {}", status);
        if !text.is_empty() {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    if text.is_empty() {
        println!("{}", status);
        return Ok(());
    }

    let json: Value = serde_json::from_str(&text)?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
