// src/bin/helper_replay_cli.rs
//
// Реплей журнала событий (JSON lines) через трекер и хранилище.
//
//   helper_replay_cli replay events.jsonl
//   helper_replay_cli stats
//   helper_replay_cli recommend 15 9♣

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use blackjack_tracker::api::{InboundEvent, Query, QueryResponse};
use blackjack_tracker::infra::config::{Settings, DEFAULT_DATABASE_PATH};
use blackjack_tracker::infra::{init_logging, InMemoryDecisionStore, SqliteDecisionStore};
use blackjack_tracker::GamblerHelper;
use clap::{Parser, Subcommand};
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(name = "helper_replay_cli")]
#[command(author, version, about = "Replay chat events through the blackjack tracker", long_about = None)]
struct Cli {
    /// Путь к базе SQLite
    #[arg(long, env = "DATABASE_PATH", default_value = DEFAULT_DATABASE_PATH)]
    database: PathBuf,

    /// Уровень логирования (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Прогнать журнал событий (по одному JSON на строку)
    Replay {
        /// Файл с событиями
        events: PathBuf,

        /// Не писать в базу, держать записи в памяти
        #[arg(long)]
        dry_run: bool,

        /// Собственный id бота (его сообщения игнорируются)
        #[arg(long)]
        self_id: Option<u64>,
    },

    /// Разбивка решений по ситуациям
    Stats,

    /// Рекомендация для (сумма игрока, карта дилера)
    Recommend {
        total: u32,
        dealer_card: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    // Токен для реплея не нужен; фильтры берём из окружения, если они заданы.
    let mut settings = Settings::from_env_or_token("replay")
        .context("Failed to load settings from environment")?;
    settings.database_path = cli.database.clone();

    match cli.command {
        Commands::Replay {
            events,
            dry_run,
            self_id,
        } => {
            if dry_run {
                let helper = GamblerHelper::new(settings, InMemoryDecisionStore::new());
                replay(helper, &events, self_id)
            } else {
                let store = SqliteDecisionStore::open(&cli.database)
                    .with_context(|| format!("Failed to open database {:?}", cli.database))?;
                let helper = GamblerHelper::new(settings, store);
                replay(helper, &events, self_id)
            }
        }
        Commands::Stats => {
            let store = SqliteDecisionStore::open(&cli.database)
                .with_context(|| format!("Failed to open database {:?}", cli.database))?;
            let helper = GamblerHelper::new(settings, store);
            println!("{}", helper.stats_report()?);
            Ok(())
        }
        Commands::Recommend { total, dealer_card } => {
            let store = SqliteDecisionStore::open(&cli.database)
                .with_context(|| format!("Failed to open database {:?}", cli.database))?;
            let helper = GamblerHelper::new(settings, store);
            match helper.handle_query(&Query::Recommendation { total, dealer_card })? {
                QueryResponse::Recommendation(Some(rec)) => println!("{rec}"),
                _ => println!("Нет данных для этой ситуации."),
            }
            Ok(())
        }
    }
}

fn replay<S>(mut helper: GamblerHelper<S>, path: &Path, self_id: Option<u64>) -> Result<()>
where
    S: blackjack_tracker::infra::DecisionStore,
{
    if let Some(id) = self_id {
        helper = helper.with_self_id(id);
    }

    let file = File::open(path).with_context(|| format!("Failed to open events file {path:?}"))?;
    let mut processed = 0usize;
    let mut skipped = 0usize;

    for (line_no, line) in BufReader::new(file).lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read line {}", line_no + 1))?;
        if line.trim().is_empty() {
            continue;
        }

        let event: InboundEvent = match serde_json::from_str(&line) {
            Ok(ev) => ev,
            Err(e) => {
                warn!(line = line_no + 1, "пропускаем битое событие: {e}");
                skipped += 1;
                continue;
            }
        };

        for reply in helper.handle_event(&event)? {
            println!("{}\n", reply.text);
        }
        processed += 1;
    }

    info!(
        processed,
        skipped,
        active_hands = helper.tracker().active_count(),
        "реплей завершён"
    );
    Ok(())
}
