use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::tty::IsTty;
use std::{
    io::{self, stdin, Write},
    path::PathBuf,
    process,
};
use tracing::{error, info, warn};
use typetally::{
    app_dirs::AppDirs,
    config::{ConfigStore, FileConfigStore},
    console::{self, RawModeGuard},
    errors::AppError,
    logging,
    runtime::{self, CrosstermEventSource},
    samples,
    score,
    session::TypingSession,
    JsonFileStorage, Leaderboard, ResultRecord, SortKey, SortOrder,
};

/// console typing speed trainer with a persistent leaderboard
#[derive(Parser, Debug, Clone)]
#[clap(version, about)]
pub struct Cli {
    /// name to record the result under (prompted for when omitted)
    #[clap(short = 'n', long)]
    name: Option<String>,

    /// leaderboard file to read and append to
    #[clap(short = 'l', long)]
    leaderboard: Option<PathBuf>,

    /// config file to use instead of the default location
    #[clap(short = 'c', long)]
    config: Option<PathBuf>,

    /// list the leaderboard slowest first
    #[clap(long)]
    ascending: bool,

    /// print the leaderboard and exit without running a test
    #[clap(long)]
    show: bool,
}

fn main() {
    let cli = Cli::parse();

    if let Err(error) = run(cli) {
        error!(%error, "exiting");
        eprintln!("error: {error}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    let config_store = cli
        .config
        .as_ref()
        .map(FileConfigStore::with_path)
        .unwrap_or_default();
    let config = config_store.load()?;

    let path = cli
        .leaderboard
        .clone()
        .unwrap_or_else(|| config.resolved_leaderboard_path());

    if let Err(e) = logging::init(&config.log_level, &AppDirs::log_path_for(&path)) {
        eprintln!("warning: logging disabled: {e}");
    }
    let order = if cli.ascending {
        SortOrder::Ascending
    } else {
        config.sort_order
    };

    let board = Leaderboard::open(JsonFileStorage::with_path(&path))?;
    info!(path = %path.display(), %order, "starting");

    let mut stdout = io::stdout();
    if cli.show {
        console::write_leaderboard(&mut stdout, &board.sorted_view(SortKey::Wpm, order))?;
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let name = match cli.name {
        Some(name) => name,
        None => prompt_name(&mut stdout)?,
    };

    run_test(&board, &name, order, &mut stdout)?;
    board.flush()?;

    Ok(())
}

fn prompt_name<W: Write>(w: &mut W) -> io::Result<String> {
    write!(w, "Enter your name: ")?;
    w.flush()?;

    let mut name = String::new();
    stdin().read_line(&mut name)?;
    Ok(name.trim_end_matches(['\r', '\n']).to_string())
}

fn run_test(
    board: &Leaderboard<JsonFileStorage>,
    name: &str,
    order: SortOrder,
    stdout: &mut io::Stdout,
) -> Result<(), AppError> {
    let source = CrosstermEventSource::new();

    console::write_welcome(stdout, name)?;
    {
        let _raw = RawModeGuard::enable()?;
        if !runtime::wait_for_any_key(&source) {
            info!("input closed before the test started");
            return Ok(());
        }
    }

    let prompt = samples::random_sample(&mut rand::thread_rng());
    console::write_prompt(stdout, prompt)?;

    let mut session = TypingSession::new(prompt);
    session.start();
    let attempt = {
        let _raw = RawModeGuard::enable()?;
        runtime::collect_attempt(&source, session, |c| console::echo_typed(&mut *stdout, c))?
    };
    writeln!(stdout)?;

    let metrics = score::score_attempt(&attempt)?;
    console::write_results(stdout, name, &metrics)?;

    if let Err(e) = board.add(ResultRecord::from_metrics(name, metrics)) {
        warn!(error = %e, "result kept in memory only");
        eprintln!("warning: could not save leaderboard: {e}");
    }

    console::write_leaderboard(stdout, &board.sorted_view(SortKey::Wpm, order))?;

    writeln!(stdout, "Press Enter to exit.")?;
    stdout.flush()?;
    let _raw = RawModeGuard::enable()?;
    runtime::wait_for_enter(&source);

    Ok(())
}
