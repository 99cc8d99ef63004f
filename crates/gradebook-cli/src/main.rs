//! gradebook CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "gradebook", version, about = "School records keeper")]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a starter config and empty account files
    Init,

    /// Register a teacher or student account
    Register {
        /// Account kind: teacher or student
        #[arg(long)]
        role: String,

        /// Login name (unique across all accounts)
        #[arg(long)]
        login: String,

        /// Password
        #[arg(long)]
        password: String,

        /// Display name
        #[arg(long)]
        name: String,
    },

    /// List registered accounts
    Accounts {
        /// Only list this account kind
        #[arg(long)]
        role: Option<String>,
    },

    /// Run a command session from a script file or stdin
    Session {
        /// Script file (default: stdin)
        #[arg(long)]
        script: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("gradebook=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.config;

    let result = match cli.command {
        Commands::Init => commands::init::execute(config),
        Commands::Register {
            role,
            login,
            password,
            name,
        } => commands::register::execute(config, role, login, password, name),
        Commands::Accounts { role } => commands::accounts::execute(config, role),
        Commands::Session { script } => commands::session::execute(config, script),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
