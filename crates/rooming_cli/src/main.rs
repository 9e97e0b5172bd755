//! Command-line entry point for `rooming_core`.
//!
//! # Responsibility
//! - Load `.env` and `ROOMING_*` settings, start logging, open the database.
//! - Print the summary (`summary`, default) or the room board (`rooms`) as JSON.

use rooming_core::{
    init_logging, CoreConfig, RoomService, SqliteRoomRepository, SqliteSummaryRepository,
    SummaryService,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("rooming: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), String> {
    // A missing .env file is fine; a malformed one is not.
    if let Err(err) = dotenvy::dotenv() {
        if !err.not_found() {
            return Err(format!("failed to load .env: {err}"));
        }
    }

    let config = CoreConfig::from_env().map_err(|err| err.to_string())?;
    init_logging(&config.log)?;
    let conn = config.open_database().map_err(|err| err.to_string())?;

    let command = std::env::args().nth(1).unwrap_or_else(|| "summary".to_string());
    let output = match command.as_str() {
        "summary" => {
            let summary = SummaryService::new(SqliteSummaryRepository::new(&conn))
                .compute_summary_now()
                .map_err(|err| err.to_string())?;
            serde_json::to_string_pretty(&summary)
        }
        "rooms" => {
            let rooms = RoomService::new(SqliteRoomRepository::new(&conn))
                .list_rooms()
                .map_err(|err| err.to_string())?;
            serde_json::to_string_pretty(&rooms)
        }
        "version" => Ok(format!("rooming_core {}", rooming_core::core_version())),
        other => return Err(format!("unknown command `{other}`; expected summary|rooms|version")),
    }
    .map_err(|err| err.to_string())?;

    log::info!("event=cli_run module=cli status=ok command={command}");
    println!("{output}");
    Ok(())
}
