use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use reqwest::{Client, Response, multipart};
use serde_json::{Value, json};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "parcel-records-cli")]
#[command(about = "CLI for interacting with the parcel records server", long_about = None)]
struct Cli {
    /// Server URL
    #[arg(short, long, env = "PARCEL_RECORDS_URL", default_value = "http://localhost:3000")]
    url: String,

    /// Record kind to operate on
    #[arg(short, long, value_enum, default_value_t = Kind::Recipients)]
    kind: Kind,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Kind {
    Recipients,
    Packages,
}

impl Kind {
    fn path(&self) -> &'static str {
        match self {
            Kind::Recipients => "recipients",
            Kind::Packages => "packages",
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List all records
    List,

    /// Fetch one record
    Get {
        /// Record identifier
        identifier: u64,
    },

    /// Import records from a JSON file holding an array of drafts
    Import {
        /// JSON file path
        file: PathBuf,
    },

    /// Delete several records at once
    BulkDelete {
        /// Record identifiers
        #[arg(required = true)]
        identifiers: Vec<u64>,
    },

    /// Upload an identity proof for a record
    UploadProof {
        /// Record identifier
        identifier: u64,
        /// File path to upload
        file: PathBuf,
    },

    /// Download the identity proof of a record
    DownloadProof {
        /// Record identifier
        identifier: u64,
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },
}

/// Thin HTTP client over the record routes of one kind
struct RecordsClient {
    http: Client,
    base: String,
}

impl RecordsClient {
    fn new(url: &str, kind: Kind) -> Self {
        Self {
            http: Client::new(),
            base: format!("{}/{}", url.trim_end_matches('/'), kind.path()),
        }
    }

    fn record_url(&self, identifier: u64) -> String {
        format!("{}/{}", self.base, identifier)
    }

    async fn list(&self) -> Result<Value> {
        let response = self.http.get(&self.base).send().await?;
        json_body(response).await
    }

    async fn get(&self, identifier: u64) -> Result<Value> {
        let response = self.http.get(self.record_url(identifier)).send().await?;
        json_body(response).await
    }

    async fn import(&self, file: &Path) -> Result<Value> {
        let bytes = tokio::fs::read(file)
            .await
            .with_context(|| format!("Failed to read {}", file.display()))?;
        let part = multipart::Part::bytes(bytes)
            .file_name(file_name(file))
            .mime_str("application/json")?;
        let form = multipart::Form::new().part("file", part);

        let response = self
            .http
            .post(format!("{}/import", self.base))
            .multipart(form)
            .send()
            .await?;
        json_body(response).await
    }

    async fn bulk_delete(&self, identifiers: &[u64]) -> Result<Value> {
        let response = self
            .http
            .delete(format!("{}/bulk", self.base))
            .json(&json!({ "identifiers": identifiers }))
            .send()
            .await?;
        json_body(response).await
    }

    async fn upload_proof(&self, identifier: u64, file: &Path) -> Result<Value> {
        let bytes = tokio::fs::read(file)
            .await
            .with_context(|| format!("Failed to read {}", file.display()))?;
        let part = multipart::Part::bytes(bytes)
            .file_name(file_name(file))
            .mime_str(guess_mime(file))?;
        let form = multipart::Form::new().part("image", part);

        let response = self
            .http
            .post(format!("{}/id-proof", self.record_url(identifier)))
            .multipart(form)
            .send()
            .await?;
        json_body(response).await
    }

    async fn download_proof(&self, identifier: u64, output: &Path) -> Result<u64> {
        let response = self
            .http
            .get(format!("{}/id-proof", self.record_url(identifier)))
            .send()
            .await?;
        let response = ensure_success(response).await?;
        let bytes = response.bytes().await?;

        tokio::fs::write(output, &bytes)
            .await
            .with_context(|| format!("Failed to write {}", output.display()))?;
        Ok(bytes.len() as u64)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string())
}

/// Content type from the file extension; the server rejects anything else
fn guess_mime(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    anyhow::bail!("Server responded {}: {}", status, body)
}

async fn json_body(response: Response) -> Result<Value> {
    let response = ensure_success(response).await?;
    response
        .json()
        .await
        .context("Server returned a non-JSON body")
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let client = RecordsClient::new(&cli.url, cli.kind);

    let output = match &cli.command {
        Commands::List => client.list().await?,
        Commands::Get { identifier } => client.get(*identifier).await?,
        Commands::Import { file } => client.import(file).await?,
        Commands::BulkDelete { identifiers } => client.bulk_delete(identifiers).await?,
        Commands::UploadProof { identifier, file } => {
            client.upload_proof(*identifier, file).await?
        }
        Commands::DownloadProof { identifier, output } => {
            let written = client.download_proof(*identifier, output).await?;
            println!("Wrote {} bytes to {}", written, output.display());
            return Ok(());
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
