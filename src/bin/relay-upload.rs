use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use reqwest::Client;

use upload_relay::client::{HttpRelayClient, SelectedFile, UploadWidget};
use upload_relay::utils::logging;

/// Upload files to a workflow through a running upload relay.
#[derive(Debug, Parser)]
#[command(name = "relay-upload", version)]
struct Args {
    /// Base URL of the relay.
    #[arg(long, env = "RELAY_URL", default_value = "http://127.0.0.1:3000")]
    relay_url: String,

    /// Workflow id, e.g. `workflow_1`.
    #[arg(long, short, required_unless_present = "list")]
    workflow: Option<String>,

    /// Print the available workflows and exit.
    #[arg(long)]
    list: bool,

    #[arg(required_unless_present = "list")]
    files: Vec<PathBuf>,
}

async fn read_file(path: &Path) -> Result<SelectedFile> {
    let data = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .with_context(|| format!("{} has no file name", path.display()))?;
    Ok(SelectedFile::new(name, data))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::init_tracing();

    let client = HttpRelayClient::new(Client::new(), args.relay_url.as_str());
    let mut widget = UploadWidget::load(client)
        .await
        .with_context(|| format!("failed to load workflows from {}", args.relay_url))?;

    if args.list {
        for workflow in widget.workflows() {
            println!("{}\t{}", workflow.id, workflow.label());
        }
        return Ok(());
    }

    let mut files = Vec::with_capacity(args.files.len());
    for path in &args.files {
        files.push(read_file(path).await?);
    }

    widget.select_workflow(args.workflow);
    widget.add_files(files)?;
    let receipt = widget.submit().await?;

    if let Some(status) = widget.status() {
        println!("{}", status.text);
    }
    println!("{}", serde_json::to_string_pretty(&receipt.response.data)?);

    Ok(())
}
