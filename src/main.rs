use clap::Parser;
use heart_predict::app::form;
use heart_predict::utils::error::ErrorSeverity;
use heart_predict::utils::{logger, validation::Validate};
use heart_predict::{global_store, CliConfig};
use std::io;

fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 載入配置
    let config = match cli.resolve_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config: {}", e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    // 初始化日誌
    let level = if cli.verbose { "debug" } else { config.log_level() };
    logger::init_logger(config.log_format(), level);

    tracing::info!("Starting heart-predict");
    tracing::debug!("Config: {:?}", config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let store = global_store(&config);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    form::render_header(&mut out, &config)?;

    if cli.interactive {
        let stdin = io::stdin();
        let summary = form::run_interactive(&mut stdin.lock(), &mut out, store)?;
        tracing::info!(
            "Session closed after {} prediction(s), {} rejected",
            summary.predictions,
            summary.rejected
        );
        return Ok(());
    }

    if let Err(e) = form::submit(&mut out, store, &cli.form_input()) {
        tracing::error!(
            "❌ Prediction failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}
