use clap::Parser;
use gbizinfo_mcp::config::{AppConfig, CliConfig, Command};
use gbizinfo_mcp::core::presenter::{self, OutputFormat};
use gbizinfo_mcp::utils::{error::GbizError, logger};
use gbizinfo_mcp::{build_controller, CompanyFilter};

fn exit_with(e: &GbizError) -> ! {
    tracing::error!(
        "❌ gbizinfo failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(1);
}

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    let config = match AppConfig::load(cli.config.as_deref()) {
        Ok(config) => config.with_debug(cli.debug),
        Err(e) => {
            logger::init_cli_logger(cli.verbose, cli.debug);
            exit_with(&e);
        }
    };

    // GBIZINFO_DEBUG 也會切換成 JSON 日誌
    logger::init_cli_logger(cli.verbose, config.debug);
    tracing::debug!("CLI config: {:?}", config);

    match run(&cli, &config).await {
        Ok(output) => println!("{}", output),
        Err(e) => exit_with(&e),
    }
}

async fn run(cli: &CliConfig, config: &AppConfig) -> Result<String, GbizError> {
    let controller = build_controller(config);

    match &cli.command {
        Command::Search { name, from, size } => {
            let page = controller.search_by_name(name, *from, *size).await?;
            presenter::render(&presenter::present_company_list_page(&page), cli.format)
        }
        Command::Find { filter } => {
            let filter: CompanyFilter = serde_json::from_str(filter).map_err(|e| {
                GbizError::validation("filter", format!("Invalid filter JSON: {}", e))
            })?;
            let page = controller.search(&filter).await?;
            presenter::render(&presenter::present_company_list_page(&page), cli.format)
        }
        Command::Lookup {
            kind,
            corporate_number,
        } => {
            if cli.format != OutputFormat::Json {
                tracing::warn!("⚠️ {} info is nested data, printing JSON", kind);
            }
            let data = controller.lookup(*kind, corporate_number).await?;
            presenter::render_value(&data)
        }
        Command::Updates {
            from,
            to,
            page,
            kind,
        } => {
            let result = controller.update_info(*kind, from, to, *page).await?;
            presenter::render(&presenter::present_update_info_page(&result), cli.format)
        }
    }
}
