use std::sync::Arc;

use clap::Parser;
use sessiongate::identity::{AppwriteClient, IdentityClient, IdentityError, MemoryIdentity};
use sessiongate::session::SessionStore;
use sessiongate::shell::{Flow, Shell, parse_command};
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error("identity client setup failed: {0}")]
    Identity(#[from] IdentityError),
    #[error("stdin read failed: {0}")]
    Stdin(#[from] std::io::Error),
}

#[derive(Parser, Debug)]
#[command(name = "sessiongate", about = "Session-gated pages backed by Appwrite accounts")]
struct Cli {
    /// Use an in-process account store instead of Appwrite.
    #[arg(long, env = "SESSIONGATE_OFFLINE")]
    offline: bool,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let identity: Arc<dyn IdentityClient> = if cli.offline {
        tracing::info!("using in-memory identity backend");
        Arc::new(MemoryIdentity::new())
    } else {
        let client = AppwriteClient::from_env()?;
        tracing::info!(endpoint = client.endpoint(), "using Appwrite identity backend");
        Arc::new(client)
    };

    let store = Arc::new(SessionStore::new(identity));
    let mut shell = Shell::new(store.clone());

    // Startup session check runs alongside the first render.
    let init = tokio::spawn({
        let store = store.clone();
        async move { store.initialize().await }
    });
    println!("{}\n", shell.render());
    shell.wait_ready().await;
    if let Err(e) = init.await {
        tracing::error!(error = %e, "session check task failed");
    }
    println!("{}\n", shell.render());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(e) => {
                println!("{e}\n");
                continue;
            }
        };
        match shell.execute(command).await {
            Flow::Quit => break,
            Flow::Continue(message) => {
                if let Some(message) = message {
                    println!("{message}\n");
                }
                println!("{}\n", shell.render());
            }
        }
    }
    Ok(())
}
