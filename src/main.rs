use cep_route::adapters::deferred_map::DeferredMap;
use cep_route::adapters::http::build_client;
use cep_route::adapters::leaflet::LeafletPage;
use cep_route::adapters::location::StaticLocation;
use cep_route::adapters::nominatim::NominatimResolver;
use cep_route::adapters::viacep::ViaCepResolver;
use cep_route::app::commands::Command;
use cep_route::core::ConfigProvider;
use cep_route::utils::{logger, validation::Validate};
use cep_route::{
    AppError, CliConfig, Console, LocalStorage, RegistrationPipeline, RouteSession, TomlConfig,
};
use clap::Parser;
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("🚀 Starting cep-route");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let result = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            match TomlConfig::from_file(path) {
                Ok(config) => run(&config, &cli.ceps).await,
                Err(e) => Err(e),
            }
        }
        None => run(&cli, &cli.ceps).await,
    };

    if let Err(e) = result {
        tracing::error!("❌ cep-route failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    Ok(())
}

async fn run<C>(config: &C, batch: &[String]) -> Result<(), AppError>
where
    C: ConfigProvider + Validate,
{
    // 驗證配置
    config.validate()?;

    let client = build_client(
        Duration::from_secs(config.timeout_seconds()),
        config.user_agent(),
    )?;
    let pipeline = RegistrationPipeline::with_fallback(
        ViaCepResolver::new(client.clone(), config.viacep_url()),
        NominatimResolver::new(client, config.nominatim_url()),
        config.fallback_address(),
    );

    let storage = LocalStorage::new(config.output_path().to_string());
    let map_location = storage.full_path(config.map_file()).display().to_string();
    let page = LeafletPage::new(storage, config.map_file());
    let ready = page.ready_signal();
    let mut map = DeferredMap::new(
        page,
        ready,
        Duration::from_millis(config.ready_timeout_ms()),
    );
    map.inner_mut().load().await?;
    tracing::debug!("Map page {} ready", map.inner().file_name());

    let location = StaticLocation::from_config(config);
    let mut console = Console::new(RouteSession::new(pipeline), map, location, map_location);
    let mut stdout = std::io::stdout();

    if batch.is_empty() {
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        console.run(stdin, &mut stdout).await?;
    } else {
        for raw in batch {
            console.execute(Command::Add(raw.clone()), &mut stdout).await?;
        }
        console.execute(Command::Map, &mut stdout).await?;
    }

    tracing::info!(
        "✅ Session finished with {} CEP(s)",
        console.session().entries().len()
    );
    Ok(())
}
