//! Interactive SageNote front end.
//!
//! # Responsibility
//! - Resolve configuration, start logging and open the local store.
//! - Read one command per line from stdin and print the result.

mod commands;
mod session;

use commands::parse_command;
use log::{info, warn};
use sagenote_core::db::open_db;
use sagenote_core::{core_version, init_logging, CoreConfig, SqliteKeyValueStore};
use session::Session;
use std::error::Error;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("sagenote: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let config = CoreConfig::from_env()?;

    // Logging is best-effort; the session works without it.
    if let Err(err) = init_logging(config.log_level, &config.log_dir.to_string_lossy()) {
        eprintln!("sagenote: logging disabled: {err}");
    }

    let conn = open_db(&config.db_path)?;
    let kv = SqliteKeyValueStore::try_new(conn)?;
    let mut session = Session::open(kv)?;
    info!(
        "event=session_start module=cli status=ok note_count={} theme={}",
        session.store().notes().len(),
        session.theme()
    );

    println!("SageNote {} ({} mode)", core_version(), session.theme());
    println!("{}", commands::USAGE);

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut input = stdin.lock();
    let mut line = String::new();
    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }

        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                warn!("event=command_parse module=cli status=error");
                println!("{err}");
                continue;
            }
        };

        let outcome = session.handle(command);
        for output in &outcome.lines {
            println!("{output}");
        }
        if outcome.quit {
            break;
        }
    }

    info!("event=session_end module=cli status=ok");
    Ok(())
}
