use clap::Parser;
use color_eyre::Result;
use log::warn;
use std::path::PathBuf;
use warayaki::{Config, Database, Profile, cli::{self, Cli, Commands}};

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    // --dev switches to a separate config and database
    let profile = if cli.dev { Profile::Dev } else { Profile::Prod };

    let config = match cli.config {
        Some(ref path) => Config::load_from_path(&PathBuf::from(path), profile)?,
        None => Config::load_with_profile(profile)?,
    };

    // Logging is best effort; the app still runs without it
    if let Err(e) = warayaki::logging::init_logging(&config.log_level, &config.get_log_dir()) {
        eprintln!("WARNING: file logging disabled: {}", e);
    }

    // The one store handle for this process, passed to whoever needs it
    let db = Database::new(config.get_database_path())?;

    match cli.command.unwrap_or(Commands::Tui) {
        Commands::Tui => {
            let app = warayaki::tui::App::new(config, db);
            warayaki::tui::run_event_loop(app)?;
        }
        Commands::Register { username, password } => cli::handle_register(username, password, &db)?,
        Commands::Login { username, password } => cli::handle_login(username, password, &db)?,
        Commands::Add { title, start, end } => cli::handle_add(title, start, end, &db)?,
        Commands::Edit { id, title, start, end } => cli::handle_edit(id, title, start, end, &db)?,
        Commands::Complete { id, undo } => cli::handle_complete(id, undo, &db)?,
        Commands::Delete { id } => cli::handle_delete(id, &db)?,
        Commands::Month { month, json } => cli::handle_month(month, json, &db)?,
        Commands::Day { date } => cli::handle_day(date, &db)?,
        Commands::Upcoming { token } => {
            if let Err(e) = cli::handle_upcoming(token) {
                warn!("event=upcoming module=main status=error error={}", e);
                return Err(e.into());
            }
        }
    }

    Ok(())
}
