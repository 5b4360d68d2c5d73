use clap::Parser;
use colmena_core::ColmenaConfig;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "colmena-server", version, about = "La Colmena API server")]
struct Args {
    /// Path to the configuration file (defaults to $COLMENA_CONFIG, then ./colmena.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the bind address from the configuration file
    #[arg(long, env = "COLMENA_BIND")]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = ColmenaConfig::load(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }

    colmena_server::logging::init_tracing(&config.observability);
    colmena_server::run(&config).await
}
