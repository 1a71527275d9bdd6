use anyhow::Context;
use category_tracker::utils::{logger, validation::Validate};
use category_tracker::{
    CategoryTracker, CliConfig, ConfigProvider, LocalStorage, MediaWikiFetcher, TomlConfig,
    TrackerError,
};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliConfig::parse();

    // 初始化日誌
    if args.json_logs {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("Starting category-tracker");
    if args.verbose {
        tracing::debug!("CLI config: {:?}", args);
    }

    let result = match &args.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            let config = TomlConfig::from_file(path)
                .with_context(|| format!("failed to load config file '{}'", path))?;
            let monitor = args.monitor || config.monitoring_enabled();
            run(&config, &args, monitor).await
        }
        None => run(&args, &args, args.monitor).await,
    };

    if let Err(e) = result {
        tracing::error!(
            "❌ Run failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(e.exit_code());
    }

    Ok(())
}

async fn run<C: ConfigProvider + Validate>(
    config: &C,
    args: &CliConfig,
    monitor: bool,
) -> Result<(), TrackerError> {
    config.validate()?;

    if monitor {
        tracing::info!("🔍 System monitoring enabled");
    }

    let fetcher = MediaWikiFetcher::from_config(config)?;
    let storage = LocalStorage::new(".");
    let tracker = CategoryTracker::new(
        fetcher,
        storage,
        config.data_file(),
        config.root_category(),
    )
    .with_dry_run(args.dry_run)
    .with_monitoring(monitor);

    let summary = tracker.run().await?;
    println!("{}", summary);
    Ok(())
}
