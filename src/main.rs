use clap::{CommandFactory, Parser};
use colored::*;
use env_logger::{Builder, Env, Target};
use fastfind::cli::{Cli, Commands};
use fastfind::config::{Config, OutputFormat};
use fastfind::error::{FastfindError, Result as FastfindResult};
use fastfind::output::{write_diagnostics, write_outcome};
use fastfind::SearchEngine;
use log::{info, warn};
use std::fs;
use std::io;
use std::process::ExitCode;

const EXIT_CANCELLED: u8 = 130;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(code) => code,
        Err(FastfindError::Io(e)) if e.kind() == io::ErrorKind::BrokenPipe => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", format!("fastfind: {e}").red());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> FastfindResult<ExitCode> {
    if let Some(Commands::Completions { shell }) = &cli.command {
        let mut cmd = Cli::command();
        clap_complete::generate(*shell, &mut cmd, "fastfind", &mut io::stdout());
        return Ok(ExitCode::SUCCESS);
    }

    setup_logging(cli)?;

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let options = cli.search_options(&config);
    info!("search options: {options:?}");

    let engine = SearchEngine::from_options(&options)?.with_threads(cli.threads(&config));
    let cancel = engine.cancel_token();
    if let Err(e) = ctrlc::set_handler(move || cancel.cancel()) {
        warn!("could not install Ctrl-C handler: {e}");
    }

    let outcome = if cli.parallel(&config) {
        engine.run_parallel()
    } else {
        engine.run()
    };

    let format = cli.output_format(&config);
    let show_errors = cli.show_errors(&config);
    write_outcome(&mut io::stdout().lock(), &outcome, format, show_errors)?;
    if show_errors && format == OutputFormat::Lines {
        write_diagnostics(&mut io::stderr().lock(), &outcome.diagnostics)?;
    }

    if outcome.cancelled {
        return Ok(ExitCode::from(EXIT_CANCELLED));
    }
    Ok(ExitCode::SUCCESS)
}

fn setup_logging(cli: &Cli) -> FastfindResult<()> {
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let mut builder = Builder::from_env(Env::default().default_filter_or(level));

    builder.format(|buf, record| {
        use std::io::Write;
        writeln!(
            buf,
            "{} [{}] [{}] {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            record.level(),
            record.module_path().unwrap_or("unknown"),
            record.args()
        )
    });

    if let Some(log_path) = &cli.log {
        if let Some(parent_dir) = log_path.parent() {
            if !parent_dir.as_os_str().is_empty() && !parent_dir.exists() {
                fs::create_dir_all(parent_dir)?;
            }
        }
        let log_file = fs::File::create(log_path)?;
        builder.target(Target::Pipe(Box::new(log_file)));
    } else {
        builder.target(Target::Stderr);
    }

    builder
        .try_init()
        .map_err(|e| FastfindError::Logging(e.to_string()))?;
    Ok(())
}
