//! MediTriage - Main CLI Entry Point

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use meditriage::{
    assessor::Assessor,
    cli::{Args, Commands, Config, Verbosity},
    doctor::Doctor,
    export::export_assessment,
    fixtures, logging,
    prompt::Severity,
    provider::{client::ApiKeySource, GeminiClient},
    repl::{ReplConfig, ReplSession},
    report,
    session::{SendOutcome, TriageSession},
};
use std::sync::Arc;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if let Err(msg) = args.validate() {
        eprintln!("{} {}", "Error:".red().bold(), msg);
        std::process::exit(2);
    }

    if let Some(Commands::Config { init: true }) = &args.command {
        return init_config(&args);
    }

    let config = load_config(&args)?;
    let verbosity = resolve_verbosity(&args, &config);

    if !config.telemetry.color_output {
        colored::control::set_override(false);
    }
    logging::init(verbosity, config.telemetry.color_output);
    tracing::debug!(model = %config.provider.model, "configuration loaded");

    match &args.command {
        Some(Commands::Start) => {
            run_dashboard(&config, verbosity).await?;
        }
        Some(Commands::Doctor) => {
            run_doctor(config).await?;
        }
        Some(Commands::Config { .. }) => {
            show_config(&config)?;
        }
        Some(Commands::Patient { ehr }) => {
            let mut patient = fixtures::mock_patient();
            if *ehr {
                patient = patient.with_ehr(fixtures::mock_ehr_record());
            }
            print!("{}", report::render_records(&patient));
        }
        None => {
            if let Some(symptoms) = &args.symptoms {
                run_once(&args, &config, verbosity, symptoms).await?;
            } else {
                println!("MediTriage v{} - Clinical Triage Assistant (demonstration only)", VERSION);
                println!("\nUsage:");
                println!("  meditriage \"<symptoms>\"        One-shot assessment");
                println!("  meditriage start               Interactive triage dashboard");
                println!("  meditriage doctor              Configuration and connectivity checks");
                println!("  meditriage config [--init]     Show (or create) configuration");
                println!("  meditriage patient [--ehr]     Show the mock patient");
                println!("\nExample:");
                println!("  meditriage --ehr --severity severe \"crushing chest pain radiating to left arm\"");
                println!();
            }
        }
    }

    Ok(())
}

/// Config file plus command-line overrides
fn load_config(args: &Args) -> Result<Config> {
    let mut config = Config::load(args.config.as_deref()).context("Failed to load configuration")?;

    if let Some(model) = &args.model {
        config.provider.model = model.clone();
    }
    if let Some(base_url) = &args.base_url {
        config.provider.base_url = base_url.clone();
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Explicit flags win over the config file default
fn resolve_verbosity(args: &Args, config: &Config) -> Verbosity {
    if args.quiet || args.verbose > 0 {
        args.verbosity()
    } else {
        Verbosity::from_config(&config.telemetry.default_verbosity)
    }
}

fn build_session(config: &Config) -> Result<TriageSession> {
    let client = GeminiClient::with_config(
        &config.provider.base_url,
        &config.provider.model,
        config.request_timeout(),
    )?
    .with_api_key(ApiKeySource::Env(config.provider.api_key_env.clone()));

    let assessor = Assessor::new(Arc::new(client)).with_temperature(config.provider.temperature);
    Ok(TriageSession::new(assessor, config.session_options()))
}

async fn run_dashboard(config: &Config, verbosity: Verbosity) -> Result<()> {
    let session = build_session(config)?;
    let repl_config = ReplConfig {
        history_file: Some(config.history_file()),
        export_dir: config.export_dir(),
        clinician_id: config.session.clinician_id.clone(),
        show_progress: config.telemetry.show_progress && verbosity.show_progress(),
        verbose: verbosity.show_details(),
    };

    let mut repl = ReplSession::new(session, &repl_config)?;
    repl.show_welcome(VERSION);
    repl.run().await
}

/// Login, accept, optional EHR sync and severity, one assessment
async fn run_once(args: &Args, config: &Config, verbosity: Verbosity, symptoms: &str) -> Result<()> {
    let mut session = build_session(config)?;
    session.login(&config.session.clinician_id)?;
    session.accept_disclaimer()?;

    if args.ehr {
        session.connect_ehr().await?;
    }

    if let Some(level) = &args.severity {
        let level: Severity = level.parse().map_err(|e: String| anyhow::anyhow!(e))?;
        session.select_severity(level);
    }

    let spinner = if verbosity.show_progress() && !args.json && config.telemetry.show_progress {
        let pb = indicatif::ProgressBar::new_spinner();
        pb.set_message("Analyzing clinical presentation...");
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        Some(pb)
    } else {
        None
    };

    let outcome = session.send(symptoms).await?;
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    match outcome {
        SendOutcome::Assessed => {}
        SendOutcome::Ignored => {
            eprintln!("{} No symptoms given.", "Error:".red().bold());
            std::process::exit(2);
        }
        SendOutcome::Failed(e) => {
            eprintln!("{} {}", "Error:".red().bold(), fixtures::ENGINE_ERROR_NOTICE);
            eprintln!("  {}", e.to_string().dimmed());
            std::process::exit(1);
        }
    }

    let assessment = session
        .assessment()
        .context("Assessment missing after successful request")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(assessment)?);
    } else {
        if !matches!(verbosity, Verbosity::Quiet) {
            println!("{}", fixtures::DISCLAIMER_REMINDER.yellow());
        }
        print!("{}", report::render_panel(Some(assessment)));
    }

    if let Some(dir) = &args.export {
        let path = export_assessment(dir, session.patient(), Some(assessment))?;
        eprintln!("Assessment exported to {}", path.display());
    }

    tracing::debug!(patient = %session.patient().id, "one-shot assessment complete");
    Ok(())
}

async fn run_doctor(config: Config) -> Result<()> {
    let doctor = Doctor::new(config);
    let checks = doctor.run_diagnostics().await;
    Doctor::display_results(&checks);

    std::process::exit(if Doctor::all_passed(&checks) { 0 } else { 1 });
}

fn init_config(args: &Args) -> Result<()> {
    let path = match args.config.clone().or_else(Config::default_path) {
        Some(path) => path,
        None => anyhow::bail!("No home directory; pass --config <PATH>"),
    };

    Config::init_file(&path).context("Failed to write configuration")?;
    println!("{} Wrote default configuration to {}", "✓".green(), path.display());
    Ok(())
}

fn show_config(config: &Config) -> Result<()> {
    let path = Config::default_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(no home directory)".to_string());

    println!("\n{}", "MediTriage Configuration".bold().cyan());
    println!("{}\n", format!("Default location: {}", path).dimmed());
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}
