//! Command-line interface for the adjutant agent.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::warn;

use adjutant::core::policy::{self, ExecutionMode, Verdict};
use adjutant::core::types::TaskReport;
use adjutant::exit_codes;
use adjutant::io::config::{AgentConfig, load_config};
use adjutant::io::gateway::build_gateway;
use adjutant::io::prompt::PromptEngine;
use adjutant::logging;
use adjutant::session::Session;

#[derive(Parser)]
#[command(
    name = "adjutant",
    version,
    about = "Turns one natural-language task into one vetted shell command"
)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run one task through the plan-execute-present pipeline.
    Run {
        /// Natural-language description of what to do.
        task: String,
        /// Print the full report as JSON instead of staged text.
        #[arg(long)]
        json: bool,
    },
    /// Interactive loop: one task per line, `exit` or `quit` to leave.
    Repl,
    /// Print the authorization verdict for a command without running it.
    Check {
        /// Command line to check against the active policy.
        command: String,
    },
}

fn main() {
    logging::init();
    match run() {
        Ok(code) => {
            // process::exit skips the runtime's stdout flush.
            let _ = io::stdout().flush();
            std::process::exit(code);
        }
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::FAILURE);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;
    if config.mode == ExecutionMode::Experimental {
        warn!("experimental mode: command allowlist disabled");
    }
    match cli.command {
        Command::Run { task, json } => cmd_run(&config, &task, json),
        Command::Repl => cmd_repl(&config),
        Command::Check { command } => cmd_check(&config, &command),
    }
}

fn cmd_run(config: &AgentConfig, task: &str, json: bool) -> Result<i32> {
    let task = task.trim();
    if task.is_empty() {
        bail!("task must not be empty");
    }
    let gateway = build_gateway(config)?;
    let prompts = PromptEngine::new();
    let session = Session::new(gateway.as_ref(), &prompts, config.exec_policy());
    let report = session.run(task)?;
    print_report(&report, json)?;
    Ok(exit_codes::OK)
}

fn cmd_repl(config: &AgentConfig) -> Result<i32> {
    let gateway = build_gateway(config)?;
    let prompts = PromptEngine::new();
    let session = Session::new(gateway.as_ref(), &prompts, config.exec_policy());

    let mut input = io::stdin().lock();
    let mut line = String::new();
    loop {
        print!("user> ");
        io::stdout().flush().context("flush prompt")?;
        line.clear();
        let read = input.read_line(&mut line).context("read input line")?;
        if read == 0 {
            break;
        }
        let task = line.trim();
        if task.is_empty() {
            continue;
        }
        if task.eq_ignore_ascii_case("exit") || task.eq_ignore_ascii_case("quit") {
            break;
        }
        // One failed run must not end the conversation.
        match session.run(task) {
            Ok(report) => print_report(&report, false)?,
            Err(err) => eprintln!("{:#}", err),
        }
        println!();
    }
    Ok(exit_codes::OK)
}

fn cmd_check(config: &AgentConfig, command: &str) -> Result<i32> {
    match policy::authorize(command, config.mode, &config.allowed_commands) {
        Verdict::Permitted => {
            println!("permitted");
            Ok(exit_codes::OK)
        }
        Verdict::Denied => {
            println!("denied: first token not allowed in {} mode", config.mode);
            Ok(exit_codes::DENIED)
        }
        Verdict::Unparsable => {
            println!("denied: command could not be parsed");
            Ok(exit_codes::DENIED)
        }
    }
}

/// Print a finished report: staged text by default, pretty JSON with a
/// trailing newline under `--json`.
fn print_report(report: &TaskReport, json: bool) -> Result<()> {
    if json {
        let mut payload = serde_json::to_string_pretty(report).context("serialize report")?;
        payload.push('\n');
        print!("{payload}");
        return Ok(());
    }
    if report.command.is_empty() {
        println!("[planner] (no command)");
    } else {
        println!("[planner] {}", report.command);
    }
    if let Some(raw) = &report.raw_output {
        println!("[executor]\n{raw}\n");
    }
    println!("[presenter]\n{}", report.summary);
    Ok(())
}
