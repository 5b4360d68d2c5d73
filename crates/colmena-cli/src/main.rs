use clap::{Parser, Subcommand};
use colmena_core::ColmenaConfig;
use std::path::PathBuf;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "colmena", version, about = "La Colmena operational CLI")]
struct Cli {
    /// Path to the configuration file (defaults to $COLMENA_CONFIG, then ./colmena.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API server.
    Serve {
        /// Override the bind address from the configuration file
        #[arg(long)]
        bind: Option<String>,
    },

    /// Check connectivity to the credential store and that the service key is accepted.
    Check,

    /// Sign in with email and password and print the resolved principal.
    Login {
        #[arg(long)]
        email: String,

        #[arg(long, env = "COLMENA_LOGIN_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Set a new password for an existing user (admin operation).
    ResetPassword {
        #[arg(long)]
        email: String,

        /// The new password
        #[arg(long, env = "COLMENA_NEW_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = ColmenaConfig::load(cli.config.as_deref())?;

    colmena_server::logging::init_tracing(&config.observability);

    match cli.cmd {
        Command::Serve { bind } => {
            if let Some(bind) = bind {
                config.server.bind = bind;
            }
            commands::serve::run(&config).await?
        }
        Command::Check => commands::check::run(&config).await?,
        Command::Login { email, password } => commands::login::run(&config, &email, &password).await?,
        Command::ResetPassword { email, password } => {
            commands::reset_password::run(&config, &email, &password).await?
        }
    }

    Ok(())
}
