use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args as ClapArgs, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use history_quiz::protocol::DEFAULT_PORT;
use history_quiz::store::{FallbackCache, LocalStore, QuestionStore, RemoteStore};
use history_quiz::{QuestionProvider, QuizError};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Take the quiz (the default)
    Play(BackendArgs),
    /// Edit the question collection
    Admin(BackendArgs),
    /// Run the question sync server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value_t = DEFAULT_PORT)]
        port: u16,
        /// Directory for the server's question file
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
}

#[derive(ClapArgs, Debug, Default)]
struct BackendArgs {
    /// Sync server address (ws://host:port); omit to use the local store
    #[arg(short, long)]
    server: Option<String>,
    /// Directory for the local store and fallback cache
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    if let Err(e) = run(args).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), QuizError> {
    match args.command.unwrap_or(Command::Play(BackendArgs::default())) {
        Command::Play(backend) => {
            let provider = build_provider(&backend).await;
            history_quiz::run_quiz(provider).await
        }
        Command::Admin(backend) => {
            let provider = build_provider(&backend).await;
            history_quiz::admin::run(provider).await
        }
        Command::Serve { port, data_dir } => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| EnvFilter::new("history_quiz=info")),
                )
                .init();
            history_quiz::server::run(port, &resolve_data_dir(data_dir)).await
        }
    }
}

/// Builds the shared provider over the chosen backend. Backend failures
/// here are absorbed: the provider comes up on cached or seed data.
async fn build_provider(backend: &BackendArgs) -> Arc<QuestionProvider> {
    let data_dir = resolve_data_dir(backend.data_dir.clone());
    let cache = FallbackCache::new(&data_dir);

    let store: Option<Arc<dyn QuestionStore>> = match &backend.server {
        Some(url) => match RemoteStore::connect(url).await {
            Ok(remote) => Some(Arc::new(remote)),
            Err(_) => None,
        },
        None => match LocalStore::open(&data_dir) {
            Ok(local) => Some(Arc::new(local)),
            Err(_) => None,
        },
    };

    QuestionProvider::start(store, cache).await
}

fn resolve_data_dir(arg: Option<PathBuf>) -> PathBuf {
    arg.unwrap_or_else(|| {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("history-quiz")
    })
}
