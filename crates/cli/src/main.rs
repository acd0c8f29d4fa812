use std::{path::PathBuf, process};

use clap::{Parser, Subcommand};
use greentick_sdk::{ApiClient, ClientConfig, FileStore, SessionStore, config::API_URL_ENV};
use greentick_types::DEFAULT_API_URL;
use tracing_subscriber::EnvFilter;

mod auth;
mod customers;
mod dashboard;
mod output;
mod payments;
mod profile;
mod prompt;
mod reminders;

/// Environment variable overriding where the session is stored
pub const DATA_DIR_ENV: &str = "GREENTICK_DATA_DIR";

#[derive(Clone, Debug)]
pub struct Context {
    pub api: ApiClient,
    pub session: SessionStore,
}

impl Context {
    /// Open the stored session and build a client for `api_url`.
    pub fn new(api_url: &str, data_dir: Option<PathBuf>) -> Result<Self, String> {
        let store = match data_dir {
            Some(dir) => FileStore::in_dir(dir),
            None => FileStore::in_system_data_dir().map_err(|e| e.to_string())?,
        };
        let session = SessionStore::new(store);
        session.load();

        let config = ClientConfig::new(api_url)
            .map_err(|e| format!("Invalid API URL '{}': {}", api_url, e))?;
        Ok(Context {
            api: ApiClient::new(config, session.clone()),
            session,
        })
    }

    pub fn require_login(&self) -> Result<(), String> {
        if self.session.is_authenticated() {
            Ok(())
        } else {
            Err("Not logged in. Run `greentick login` to authenticate.".to_string())
        }
    }
}

#[derive(Parser, Debug)]
#[clap(author, version, about = "GreenTick - WhatsApp reminders and payments for small businesses", long_about = None)]
struct Opts {
    /// Base URL of the GreenTick backend
    #[arg(long = "api-url", global = true, env = API_URL_ENV, default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Directory holding the stored session (default: system data directory)
    #[arg(long = "data-dir", global = true, env = DATA_DIR_ENV)]
    data_dir: Option<PathBuf>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, PartialEq, Clone, Debug)]
enum Command {
    /// Log in with email and password
    Login(auth::LoginCommand),
    /// Create an account and log in
    Signup(auth::SignupCommand),
    /// Forget the stored session
    Logout,
    /// Show current login status
    Status,
    /// Summary numbers and recent activity
    Dashboard,
    /// Manage customers
    Customers {
        #[clap(subcommand)]
        command: customers::CustomersCommand,
    },
    /// Manage scheduled reminders
    Reminders {
        #[clap(subcommand)]
        command: reminders::RemindersCommand,
    },
    /// Manage payment requests
    Payments {
        #[clap(subcommand)]
        command: payments::PaymentsCommand,
    },
    /// Show or edit the business profile
    Profile {
        #[clap(subcommand)]
        command: profile::ProfileCommand,
    },
}

#[tokio::main]
async fn main() {
    // before parsing: .env feeds the `env` fallbacks of the global flags
    load_env_file();

    let opts: Opts = match Opts::try_parse() {
        Ok(opts) => opts,
        Err(e) => {
            let _ = e.print();
            process::exit(e.exit_code());
        }
    };

    init_tracing();

    let ctx = match Context::new(&opts.api_url, opts.data_dir) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = handle_command(opts.command, &ctx).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Load environment variables from `.env` in the working directory
fn load_env_file() {
    match dotenvy::dotenv() {
        Ok(_) => {}
        Err(e) if e.not_found() => {}
        Err(e) => eprintln!("Warning: Failed to load .env file: {}", e),
    }
}

/// Log to stderr, filtered by `RUST_LOG` (default: warn)
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn handle_command(command: Command, ctx: &Context) -> Result<(), String> {
    match command {
        Command::Login(cmd) => cmd.execute(ctx).await,
        Command::Signup(cmd) => cmd.execute(ctx).await,
        Command::Logout => auth::logout(ctx),
        Command::Status => auth::status(ctx),
        Command::Dashboard => {
            ctx.require_login()?;
            dashboard::show(ctx).await
        }
        Command::Customers { command } => {
            ctx.require_login()?;
            command.execute(ctx).await
        }
        Command::Reminders { command } => {
            ctx.require_login()?;
            command.execute(ctx).await
        }
        Command::Payments { command } => {
            ctx.require_login()?;
            command.execute(ctx).await
        }
        Command::Profile { command } => {
            ctx.require_login()?;
            command.execute(ctx).await
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_parse_global_flags() {
        let opts = Opts::try_parse_from([
            "greentick",
            "customers",
            "list",
            "--api-url",
            "http://localhost:9000",
            "--data-dir",
            "/tmp/greentick",
        ])
        .unwrap();

        assert_eq!(opts.api_url, "http://localhost:9000");
        assert_eq!(opts.data_dir, Some(PathBuf::from("/tmp/greentick")));
    }

    #[test]
    fn test_context_starts_logged_out() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let ctx = Context::new(DEFAULT_API_URL, Some(temp_dir.path().to_path_buf())).unwrap();

        assert!(!ctx.session.is_authenticated());
        assert!(ctx.require_login().is_err());
    }

    #[test]
    fn test_context_rejects_bad_url() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        assert!(Context::new("not a url", Some(temp_dir.path().to_path_buf())).is_err());
    }
}
