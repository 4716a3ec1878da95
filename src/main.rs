use anyhow::Context;
use apt_price_predictor::utils::error::ErrorSeverity;
use apt_price_predictor::utils::logger;
use apt_price_predictor::{
    CliConfig, EncodedRecord, LocalArtifactStore, PredictionPipeline, PredictionResult,
    PredictorEngine, PricePipeline,
};
use clap::Parser;
use serde::Serialize;

/// `--json` output: the model input next to the prediction.
#[derive(Serialize)]
struct JsonReport<'a> {
    features: Option<&'a EncodedRecord>,
    prediction: &'a PredictionResult,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_logger(cli.log_format(), cli.verbose);

    tracing::info!("Starting apt-price-predictor CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let config = cli
        .predictor_config()
        .context("Configuration validation failed")?;
    let request = cli.request().context("Failed to read apartment features")?;

    let store = LocalArtifactStore::new(config.model_path());
    let engine = PredictorEngine::new(PricePipeline::from_config(store, &config));

    match engine.run(&request).await {
        Ok(result) => {
            if cli.json {
                let features = engine.pipeline().encode(&request).ok();
                let report = JsonReport {
                    features: features.as_ref(),
                    prediction: &result,
                };
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_result(&result);
            }
        }
        Err(e) => {
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 2,
                ErrorSeverity::Medium => 4,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

fn print_result(result: &PredictionResult) {
    println!("Estimated Value: {}", result.formatted_value);
    println!("Accuracy:        {}", result.accuracy_display());
    println!("Avg Error:       {}", result.avg_error_display());
}
