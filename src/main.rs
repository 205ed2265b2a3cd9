use clap::Parser;
use resilient_gql::config::Command;
use resilient_gql::utils::error::{ClientError, ErrorSeverity};
use resilient_gql::utils::{logger, validation::Validate};
use resilient_gql::{CliConfig, ResilientQueryClient, Session};

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting resilient-gql CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = run(&cli).await {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
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
}

async fn run(cli: &CliConfig) -> Result<(), ClientError> {
    cli.validate()?;

    let config = cli.client_config()?;
    let environment = cli.environment(&config)?;
    tracing::info!("🌐 Environment: {}", environment);

    let client: ResilientQueryClient = config
        .client_builder(environment)?
        .logout_handler(|| {
            tracing::warn!("🔒 Session expired, please sign in again");
            eprintln!("🔒 Session expired, please sign in again (resilient-gql login --token ...)");
        })
        .build()?;

    match &cli.command {
        Command::Query { .. } => {
            let Some(request) = cli.command.query_request()? else {
                return Ok(());
            };
            let response = client.execute(&request).await?;

            for message in response.error_messages() {
                tracing::warn!("⚠️ GraphQL error: {}", message);
            }
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Command::Login { token, user } => {
            let user: serde_json::Value = serde_json::from_str(user)?;
            client.sessions().save(&Session {
                token: token.clone(),
                user,
            })?;
            println!("✅ Session stored");
        }
        Command::Logout => {
            client.sessions().clear()?;
            println!("👋 Signed out");
        }
        Command::Whoami => match client.sessions().current()? {
            Some(session) => println!("{}", serde_json::to_string_pretty(&session.user)?),
            None => println!("Not signed in"),
        },
    }

    Ok(())
}
