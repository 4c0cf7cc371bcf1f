//! Docshelf - Command-line client for the document indexing service
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use docshelf_client::{ClientConfig, DocshelfClient, Document, DocumentId, FileTokenStore};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "docshelf")]
#[command(about = "Docshelf document management client", long_about = None)]
struct Cli {
    /// Server base URL
    #[arg(
        long,
        global = true,
        env = "DOCSHELF_SERVER",
        default_value = "http://127.0.0.1:8000"
    )]
    server: String,

    /// Token file path (defaults to the user config directory)
    #[arg(long, global = true, env = "DOCSHELF_TOKEN_FILE")]
    token_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new account
    Register {
        /// Username
        #[arg(short, long)]
        username: Option<String>,
        /// Email address
        #[arg(short, long)]
        email: Option<String>,
    },
    /// Log in and persist the session token
    Login {
        /// Username
        #[arg(short, long)]
        username: Option<String>,
    },
    /// Forget the persisted session token
    Logout,
    /// Show the logged-in user
    Me,
    /// Upload a document for indexing
    Upload {
        /// File to upload
        file: PathBuf,
    },
    /// List uploaded documents
    List,
    /// Poll the document list on an interval
    Watch {
        /// Seconds between refreshes
        #[arg(short, long, default_value_t = 3)]
        interval: u64,
    },
    /// Show one document's indexing status
    Status {
        /// Document id
        id: i64,
    },
    /// Show the extracted text preview
    Preview {
        /// Document id
        id: i64,
    },
    /// Show how a document splits into chunks
    Chunks {
        /// Document id
        id: i64,
        /// Characters per chunk
        #[arg(long, default_value_t = 500)]
        chunk_size: u32,
        /// Overlapping characters between chunks
        #[arg(long, default_value_t = 100)]
        overlap: u32,
    },
    /// Check that the server is reachable
    Ping,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docshelf_cli=warn,docshelf_client=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let client = make_client(&cli)?;

    match cli.command {
        Commands::Register { username, email } => register(&client, username, email).await?,
        Commands::Login { username } => login(&client, username).await?,
        Commands::Logout => logout(&client).await?,
        Commands::Me => me(&client).await?,
        Commands::Upload { file } => upload(&client, &file).await?,
        Commands::List => list(&client).await?,
        Commands::Watch { interval } => watch(&client, interval).await?,
        Commands::Status { id } => status(&client, id).await?,
        Commands::Preview { id } => preview(&client, id).await?,
        Commands::Chunks {
            id,
            chunk_size,
            overlap,
        } => chunks(&client, id, chunk_size, overlap).await?,
        Commands::Ping => ping(&client).await?,
    }

    Ok(())
}

fn make_client(cli: &Cli) -> anyhow::Result<DocshelfClient> {
    let token_path = match &cli.token_file {
        Some(path) => path.clone(),
        None => default_token_path()?,
    };
    tracing::debug!(
        server = %cli.server,
        token_file = %token_path.display(),
        "Building client"
    );

    let store = Arc::new(FileTokenStore::new(token_path));
    let client = DocshelfClient::new(ClientConfig::new(&cli.server), store)?;
    Ok(client)
}

fn default_token_path() -> anyhow::Result<PathBuf> {
    let base = dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine a config directory for the token"))?;
    Ok(base.join("docshelf").join("token"))
}

async fn register(
    client: &DocshelfClient,
    username: Option<String>,
    email: Option<String>,
) -> anyhow::Result<()> {
    let username = match username {
        Some(name) => name,
        None => Input::new().with_prompt("Username").interact_text()?,
    };
    let email = match email {
        Some(address) => address,
        None => Input::new().with_prompt("Email").interact_text()?,
    };
    let password: String = Password::new().with_prompt("Password").interact()?;

    let profile = client.auth().register(&username, &email, &password).await?;
    println!(
        "Registered {} <{}>, please login.",
        profile.username, profile.email
    );
    Ok(())
}

async fn login(client: &DocshelfClient, username: Option<String>) -> anyhow::Result<()> {
    let username = match username {
        Some(name) => name,
        None => Input::new().with_prompt("Username").interact_text()?,
    };
    let password: String = Password::new().with_prompt("Password").interact()?;

    client.auth().login(&username, &password).await?;

    // Confirm the session works before greeting
    let profile = client.auth().me().await?;
    println!("Welcome {}!", profile.username);
    Ok(())
}

async fn logout(client: &DocshelfClient) -> anyhow::Result<()> {
    client.auth().logout().await?;
    println!("Logged out.");
    Ok(())
}

async fn me(client: &DocshelfClient) -> anyhow::Result<()> {
    let profile = client.auth().me().await?;
    println!(
        "{} <{}> (id {})",
        profile.username, profile.email, profile.id
    );
    Ok(())
}

async fn upload(client: &DocshelfClient, file: &Path) -> anyhow::Result<()> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("Uploading...");
    spinner.enable_steady_tick(Duration::from_millis(120));

    let result = client.documents().upload(file).await;
    spinner.finish_and_clear();

    let receipt = result?;
    match receipt.message {
        Some(message) => println!("Document {}: {}", receipt.id, message),
        None => println!("Document {} uploaded ({})", receipt.id, receipt.status),
    }
    Ok(())
}

async fn list(client: &DocshelfClient) -> anyhow::Result<()> {
    let documents = client.documents().list().await?;
    print_documents(&documents);
    Ok(())
}

async fn watch(client: &DocshelfClient, interval_secs: u64) -> anyhow::Result<()> {
    let interval_secs = interval_secs.max(1);
    let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));

    println!("Watching documents every {}s (Ctrl-C to stop)", interval_secs);
    loop {
        ticker.tick().await;
        match client.documents().list().await {
            Ok(documents) => print_documents(&documents),
            Err(e) => {
                tracing::warn!(error = %e, "Document refresh failed");
                println!("Refresh failed: {}", e);
            }
        }
    }
}

async fn status(client: &DocshelfClient, id: i64) -> anyhow::Result<()> {
    let report = client.documents().status(DocumentId(id)).await?;
    println!("Document {} is {}", report.id, report.status);
    Ok(())
}

async fn preview(client: &DocshelfClient, id: i64) -> anyhow::Result<()> {
    let preview = client.documents().text_preview(DocumentId(id)).await?;
    match &preview.content_type {
        Some(content_type) => println!(
            "Document {} ({}, {} chars extracted)",
            preview.id, content_type, preview.text_length
        ),
        None => println!(
            "Document {} ({} chars extracted)",
            preview.id, preview.text_length
        ),
    }
    println!();
    println!("{}", preview.text_preview);
    Ok(())
}

async fn chunks(
    client: &DocshelfClient,
    id: i64,
    chunk_size: u32,
    overlap: u32,
) -> anyhow::Result<()> {
    let preview = client
        .documents()
        .chunk_preview(DocumentId(id), chunk_size, overlap)
        .await?;
    println!(
        "Document {} splits into {} chunks (size {}, overlap {})",
        preview.id, preview.total, preview.chunk_size, preview.overlap
    );
    for (index, chunk) in preview.items.iter().enumerate() {
        println!();
        println!("--- chunk {} ---", index);
        println!("{}", chunk);
    }
    Ok(())
}

async fn ping(client: &DocshelfClient) -> anyhow::Result<()> {
    let message = client.ping().await?;
    println!("{} replied: {}", client.base_url(), message);
    Ok(())
}

fn print_documents(documents: &[Document]) {
    if documents.is_empty() {
        println!("No documents");
        return;
    }

    println!("{:<8} {:<40} {:<12} TYPE", "ID", "FILENAME", "STATUS");
    for document in documents {
        println!(
            "{:<8} {:<40} {:<12} {}",
            document.id.to_string(),
            document.filename,
            document.status,
            document.content_type.as_deref().unwrap_or("-")
        );
    }
}
