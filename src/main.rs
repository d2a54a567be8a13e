//! gym-search CLI
//!
//! - `rank`: rank a JSON record file against one query
//! - `watch`: feed stdin lines as query updates through the debounced session
//! - `config`: inspect or initialise the configuration file

mod cli;
mod output;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands, ConfigCommands};
use gym_search::config::{load_config, resolve_config_path, save_config, SearchConfig};
use gym_search::error::{validate_limit, validate_query, AppError};
use gym_search::records::load_records;
use gym_search::search::{rank_scored, QueryController, Score, SearchSession};
use gym_search::{Searchable, SearchableRecord};
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

/// Line that clears the search in watch mode
const CLEAR_COMMAND: &str = ":clear";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity flags
    let log_level = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(std::io::stderr) // Log to stderr to keep stdout clean
        .init();

    let config_path = cli.config.clone();

    // Execute command
    let result = match cli.command {
        Commands::Rank(args) => execute_rank(args, config_path).await,
        Commands::Watch(args) => execute_watch(args, config_path).await,
        Commands::Config(args) => execute_config(args.command, config_path),
    };

    // Handle result and exit with appropriate code
    match result {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(get_exit_code(&e));
        }
    }
}

/// Execute rank command
async fn execute_rank(args: cli::RankArgs, config_path: Option<PathBuf>) -> Result<String> {
    validate_query(&args.query)?;
    validate_limit(args.limit)?;

    let config = load_config(&resolve_config_path(config_path.as_deref())?)?;
    let limit = args.limit.or(config.limit);

    let records = load_records(&args.records)?;
    debug!("Ranking {} records for '{}'", records.len(), args.query);

    let ranked: Vec<(&SearchableRecord, Option<Score>)> = rank_scored(&records, &args.query)
        .into_iter()
        .take(limit.unwrap_or(usize::MAX))
        .map(|r| (r.item, r.score))
        .collect();

    if args.json {
        Ok(output::format_results_json(&ranked)?)
    } else {
        Ok(output::format_results(
            &ranked,
            records.len(),
            &args.query,
            args.scores,
        ))
    }
}

/// Execute watch command
async fn execute_watch(args: cli::WatchArgs, config_path: Option<PathBuf>) -> Result<String> {
    validate_limit(args.limit)?;

    let config = load_config(&resolve_config_path(config_path.as_deref())?)?;
    let mut options = config.controller_options();
    if let Some(ms) = args.debounce_ms {
        options.debounce_delay = Duration::from_millis(ms);
    }
    options.auto_select |= args.auto_select;
    let limit = args.limit.or(config.limit);

    let records = load_records(&args.records)?;
    let total = records.len();

    info!(
        "Watching {} records (debounce {} ms, auto-select {})",
        total,
        options.debounce_delay.as_millis(),
        options.auto_select
    );

    let controller = QueryController::new(records, options).with_auto_select(
        |best: &SearchableRecord| {
            println!("> Best match: {}", output::describe(best));
        },
    );
    let session = SearchSession::spawn(controller);

    // Print every re-rank; raw query changes alone publish too and are skipped
    let mut updates = session.subscribe();
    let printer = tokio::spawn(async move {
        let mut last_revision = updates.borrow().revision;
        while updates.changed().await.is_ok() {
            let snapshot = updates.borrow_and_update().clone();
            if snapshot.revision != last_revision {
                last_revision = snapshot.revision;
                println!("{}", output::format_snapshot(&snapshot, total, limit));
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        feed_watch_line(&session, line)?;
    }

    let controller = session.shutdown().await?;
    printer
        .await
        .map_err(|e| AppError::Internal(format!("Printer task failed: {}", e)))?;

    let best = controller
        .filtered_items()
        .first()
        .and_then(|record| record.name())
        .map(|name| format!(", best \"{}\"", name))
        .unwrap_or_default();

    Ok(format!(
        "Final query \"{}\": {} of {} records{}",
        controller.debounced_query(),
        controller.filtered_items().len(),
        total,
        best
    ))
}

/// Forward one stdin line to the session. Over-long queries are skipped so
/// the rest of the stream still gets ranked.
fn feed_watch_line(session: &SearchSession<SearchableRecord>, line: String) -> Result<()> {
    if line.trim() == CLEAR_COMMAND {
        session.clear_search()?;
        return Ok(());
    }
    if let Err(e) = validate_query(&line) {
        warn!("Skipping query line: {}", e);
        return Ok(());
    }
    session.set_query(line)?;
    Ok(())
}

/// Execute config command
fn execute_config(command: ConfigCommands, config_path: Option<PathBuf>) -> Result<String> {
    let path = resolve_config_path(config_path.as_deref())?;

    match command {
        ConfigCommands::Show => {
            let config = load_config(&path)?;
            Ok(serde_json::to_string_pretty(&config)?)
        }
        ConfigCommands::Init { force } => {
            if path.exists() && !force {
                return Err(AppError::InvalidInput(format!(
                    "Config already exists at {} (use --force to overwrite)",
                    path.display()
                ))
                .into());
            }
            save_config(&path, &SearchConfig::default())?;
            Ok(format!("✓ Wrote default config to {}", path.display()))
        }
        ConfigCommands::Path => Ok(path.display().to_string()),
        ConfigCommands::Schema => SearchConfig::schema_json(),
    }
}

/// Map AppError to exit code
fn get_exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<AppError>() {
        Some(AppError::InvalidInput(_))
        | Some(AppError::ConfigError(_))
        | Some(AppError::RecordsLoadFailed(_)) => 1,
        Some(AppError::NotFound(_)) => 3,
        _ => 5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_records(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("records.json");
        fs::write(
            &path,
            r#"[
                {"id": "1", "name": "Cinta de Correr"},
                {"id": "2", "name": "Bicicleta Estática"},
                {"id": "3", "name": "Banco de Pesas"}
            ]"#,
        )
        .unwrap();
        path
    }

    fn rank_args(records: PathBuf, query: &str) -> cli::RankArgs {
        cli::RankArgs {
            records,
            query: query.to_string(),
            limit: None,
            scores: true,
            json: false,
        }
    }

    #[tokio::test]
    async fn test_execute_rank_markdown() {
        let dir = tempfile::tempdir().unwrap();
        let records = write_records(&dir);
        let config = Some(dir.path().join("config.json"));

        let out = execute_rank(rank_args(records, "cinta"), config).await.unwrap();
        assert!(out.contains("1. **Cinta de Correr** `1` (score 90)"));
        assert!(!out.contains("Banco de Pesas"));
    }

    #[tokio::test]
    async fn test_execute_rank_json_with_limit() {
        let dir = tempfile::tempdir().unwrap();
        let records = write_records(&dir);
        let config = Some(dir.path().join("config.json"));

        let mut args = rank_args(records, "");
        args.json = true;
        args.limit = Some(2);

        let out = execute_rank(args, config).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 2);
        assert_eq!(value[0]["id"], "1");
    }

    #[tokio::test]
    async fn test_execute_rank_uses_config_limit() {
        let dir = tempfile::tempdir().unwrap();
        let records = write_records(&dir);
        let config_path = dir.path().join("config.json");
        fs::write(&config_path, r#"{"limit": 1}"#).unwrap();

        let mut args = rank_args(records, "");
        args.json = true;

        let out = execute_rank(args, Some(config_path)).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_execute_rank_missing_records() {
        let dir = tempfile::tempdir().unwrap();
        let config = Some(dir.path().join("config.json"));
        let err = execute_rank(rank_args(dir.path().join("none.json"), "x"), config)
            .await
            .unwrap_err();
        assert_eq!(get_exit_code(&err), 3);
    }

    #[tokio::test]
    async fn test_execute_rank_rejects_long_query() {
        let dir = tempfile::tempdir().unwrap();
        let records = write_records(&dir);
        let err = execute_rank(rank_args(records, &"x".repeat(501)), None)
            .await
            .unwrap_err();
        assert_eq!(get_exit_code(&err), 1);
    }

    #[tokio::test]
    async fn test_execute_rank_bad_config_exit_codes() {
        let dir = tempfile::tempdir().unwrap();
        let records = write_records(&dir);
        let config_path = dir.path().join("config.json");

        fs::write(&config_path, "{not json").unwrap();
        let err = execute_rank(rank_args(records.clone(), "cinta"), Some(config_path.clone()))
            .await
            .unwrap_err();
        assert_eq!(get_exit_code(&err), 1);

        fs::write(&config_path, r#"{"debounce_delay_ms": 999999}"#).unwrap();
        let err = execute_rank(rank_args(records, "cinta"), Some(config_path))
            .await
            .unwrap_err();
        assert_eq!(get_exit_code(&err), 1);
    }

    #[tokio::test]
    async fn test_execute_rank_malformed_records_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        let records = dir.path().join("records.json");
        fs::write(&records, r#"{"id": "1", "name": "Rower"}"#).unwrap();
        let config = Some(dir.path().join("config.json"));

        let err = execute_rank(rank_args(records, "rower"), config)
            .await
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<AppError>().map(AppError::error_code),
            Some("records_load_failed")
        );
        assert_eq!(get_exit_code(&err), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_watch_skips_overlong_line() {
        let records = vec![
            SearchableRecord::new("1", "Cinta de Correr"),
            SearchableRecord::new("2", "Banco de Pesas"),
        ];
        let session = SearchSession::spawn(QueryController::new(
            records,
            gym_search::search::ControllerOptions::default(),
        ));

        feed_watch_line(&session, "banco".to_string()).unwrap();
        feed_watch_line(&session, "x".repeat(501)).unwrap();
        feed_watch_line(&session, "cinta".to_string()).unwrap();

        let controller = session.shutdown().await.unwrap();
        assert_eq!(controller.debounced_query(), "cinta");
        assert_eq!(controller.filtered_items()[0].id.as_deref(), Some("1"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_watch_clear_line() {
        let records = vec![SearchableRecord::new("1", "Cinta de Correr")];
        let session = SearchSession::spawn(QueryController::new(
            records,
            gym_search::search::ControllerOptions::default(),
        ));

        feed_watch_line(&session, "zzzz".to_string()).unwrap();
        feed_watch_line(&session, " :clear ".to_string()).unwrap();

        let controller = session.shutdown().await.unwrap();
        assert_eq!(controller.debounced_query(), "");
        assert_eq!(controller.filtered_items().len(), 1);
    }

    #[test]
    fn test_execute_config_init_and_show() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let out = execute_config(ConfigCommands::Init { force: false }, Some(path.clone())).unwrap();
        assert!(out.contains("Wrote default config"));
        assert!(path.exists());

        let err = execute_config(ConfigCommands::Init { force: false }, Some(path.clone()))
            .unwrap_err();
        assert_eq!(get_exit_code(&err), 1);

        let shown = execute_config(ConfigCommands::Show, Some(path.clone())).unwrap();
        let config: SearchConfig = serde_json::from_str(&shown).unwrap();
        assert_eq!(config, SearchConfig::default());

        let printed = execute_config(ConfigCommands::Path, Some(path.clone())).unwrap();
        assert_eq!(printed, path.display().to_string());
    }

    #[test]
    fn test_exit_codes() {
        let err: anyhow::Error = AppError::NotFound("x".to_string()).into();
        assert_eq!(get_exit_code(&err), 3);
        let err: anyhow::Error = AppError::RecordsLoadFailed("x".to_string()).into();
        assert_eq!(get_exit_code(&err), 1);
        let err: anyhow::Error = AppError::SessionClosed.into();
        assert_eq!(get_exit_code(&err), 5);
        let err = anyhow::anyhow!("something else");
        assert_eq!(get_exit_code(&err), 5);
    }
}
