use clap::Parser;
use rank_trend::app::{build_engine, build_report_writer};
use rank_trend::utils::error::{ErrorSeverity, TrendError};
use rank_trend::utils::logger;
use rank_trend::{CliConfig, Command, SelectionPolicy};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting rank-trend");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = run(&cli).await {
        report_failure(&e);
    }

    Ok(())
}

async fn run(cli: &CliConfig) -> Result<(), TrendError> {
    let config = cli.effective_config()?;
    let engine = build_engine(&config)?;

    match &cli.command {
        Command::Suggest { query, .. } => {
            let suggestions = engine.suggest(query).await?;
            println!("{}", serde_json::to_string_pretty(&suggestions)?);
        }
        Command::Search {
            query, list: true, ..
        } => {
            for (index, identity) in engine.candidates(query).await?.iter().enumerate() {
                println!("{:>3}  {}", index, identity);
            }
        }
        Command::Search {
            query, pick, print, ..
        } => {
            let policy = pick.map(SelectionPolicy::Index).unwrap_or_default();
            let engine = engine.with_policy(policy);
            let series = engine.search(query).await?;

            if *print {
                println!("{}", serde_json::to_string_pretty(&series)?);
                return Ok(());
            }

            let writer = build_report_writer(&config)?;
            let written = writer.write(&series).await?;
            tracing::info!("✅ Trend charts written for {}", series.identity);
            for name in written {
                println!("📁 {}/{}", config.output.path, name);
            }
        }
    }

    Ok(())
}

fn report_failure(e: &TrendError) {
    if e.is_user_error() {
        tracing::warn!("{}", e);
        println!("{}", e.user_friendly_message());
        return;
    }

    tracing::error!(
        "❌ Request failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

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
