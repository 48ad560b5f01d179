use clap::Parser;
use mortgage_cot::core::report::{render, OutputFormat};
use mortgage_cot::domain::ports::{ExplanationProvider, InputSource};
use mortgage_cot::utils::error::{AffordError, ErrorSeverity};
use mortgage_cot::utils::{logger, validation::Validate};
use mortgage_cot::{
    build_request, AffordabilityEngine, ChatCompletionsExplainer, CliConfig, ConsoleInput,
    Settings,
};

async fn run(settings: Settings) -> Result<(), AffordError> {
    let mut inputs = settings.inputs.clone();
    if settings.interactive {
        println!("--- Mortgage Affordability CoT Demo ---");
        inputs = ConsoleInput::stdio().collect(inputs)?;
    }

    let request = build_request(&inputs, settings.policy)?;

    let explainer: Option<Box<dyn ExplanationProvider>> = if settings.explain {
        let explainer = ChatCompletionsExplainer::new(settings.llm.clone())?;
        tracing::info!(
            "🔧 Explanations via {} ({})",
            explainer.config().base_url,
            explainer.model()
        );
        Some(Box::new(explainer))
    } else {
        None
    };

    let engine = AffordabilityEngine::new(explainer);
    let report = engine.run(&request).await?;

    print!("{}", render(&report, settings.format)?);
    if settings.format == OutputFormat::Json {
        println!();
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 先載入 profile，日誌等級可能來自 profile
    let profile = match cli.load_profile() {
        Ok(profile) => profile,
        Err(e) => {
            eprintln!(
                "❌ Failed to load config file '{}': {}",
                cli.config.as_deref().unwrap_or_default(),
                e
            );
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    let settings = Settings::resolve(&cli, profile.as_ref());

    // 初始化日誌
    if settings.json_logs {
        logger::init_json_logger(settings.log_level.as_deref());
    } else {
        logger::init_cli_logger(settings.verbose, settings.log_level.as_deref());
    }

    tracing::debug!("CLI config: {:?}", cli);
    if let Some(placeholder) = &settings.unresolved_api_key {
        tracing::warn!(
            "⚠️ {} is not set, sending requests without an API key",
            placeholder
        );
    }

    // 驗證配置
    let validation = cli
        .validate()
        .and_then(|_| profile.as_ref().map_or(Ok(()), |p| p.validate()))
        .and_then(|_| settings.validate());
    if let Err(e) = validation {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    if let Err(e) = run(settings).await {
        tracing::error!(
            "❌ Affordability check failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 建議: {}", e.recovery_suggestion());

        // 根據錯誤嚴重程度決定退出碼
        let exit_code = match e.severity() {
            ErrorSeverity::Medium => 2, // 可重試
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        std::process::exit(exit_code);
    }
}
