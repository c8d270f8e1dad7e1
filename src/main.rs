use clap::Parser;
use mimalloc::MiMalloc;
use passbook::{AccountService, Config, cli::Cli, handlers};
use tracing::{debug, error};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let args = Cli::parse();
    let cfg = Config::load()?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_level(true)
                .with_target(false),
        )
        .init();

    debug!(
        database_path = %cfg.database_path.display(),
        loglevel = %cfg.loglevel,
        command = ?args.command
    );

    // The store must come up with a valid schema before any command runs.
    let store = passbook::db::spawn(&cfg.database_path).await.inspect_err(|e| {
        error!(path = %cfg.database_path.display(), error = %e, "cannot open account store");
    })?;
    let service = AccountService::new(store);

    let outcome = handlers::run(args.command, &service).await;
    println!("{outcome}");
    Ok(())
}
