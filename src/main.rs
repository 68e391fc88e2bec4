use anyhow::Context;
use clap::Parser;
use league_table::core::ConfigProvider;
use league_table::utils::{logger, validation::Validate};
use league_table::{
    CliConfig, Command, LeagueConfig, LeagueService, RankingStrategy, SqliteRepository, Standing,
};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("❌ {:#}", e);
        eprintln!("❌ {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: CliConfig) -> anyhow::Result<()> {
    let config = cli.resolve().context("Failed to load configuration")?;

    logger::init_logger(cli.verbose, config.logging.json, &config.logging.level);
    if cli.verbose {
        tracing::debug!("Resolved config: {:?}", config);
    }

    config
        .validate()
        .context("Configuration validation failed")?;

    match cli.command {
        Command::Serve { .. } => {
            league_table::server::start_server(&config)
                .await
                .context("Server failed")?;
        }
        Command::Import { file, .. } => {
            let data = tokio::fs::read(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;

            let league = open_league(&config).await?;
            let report = league
                .import_csv(data)
                .await
                .with_context(|| format!("Error uploading games from {}", file.display()))?;

            println!(
                "✅ Imported {} games ({} new teams)",
                report.games_imported, report.teams_created
            );
        }
        Command::Standings {
            ranking_strategy, ..
        } => {
            let strategy = RankingStrategy::from_param(Some(&ranking_strategy));
            let league = open_league(&config).await?;
            let standings = league.standings(strategy).await?;

            print_table(strategy, &standings);
        }
    }

    Ok(())
}

async fn open_league(config: &LeagueConfig) -> anyhow::Result<LeagueService> {
    let repository = SqliteRepository::connect(config.database_url(), config.max_connections())
        .await
        .with_context(|| format!("Failed to open database {}", config.database_url()))?;

    Ok(LeagueService::new(Arc::new(repository)))
}

fn print_table(strategy: RankingStrategy, standings: &[Standing]) {
    let table = strategy.point_table();
    println!(
        "Ranking strategy: {} (win {}, draw {}, loss {})",
        strategy, table.win, table.draw, table.loss
    );
    println!("{:>3}  {:<30} {:>6}", "#", "Team", "Points");

    for (index, standing) in standings.iter().enumerate() {
        println!(
            "{:>3}  {:<30} {:>6}",
            index + 1,
            standing.team.name,
            standing.points
        );
    }
}
