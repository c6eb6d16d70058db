//! resume-match: score a resume against a job posting

use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use resume_match::cli::{self, Cli, Commands, ConfigAction};
use resume_match::config::{Config, OutputFormat};
use resume_match::error::{Result, ResumeMatchError};
use resume_match::input::InputManager;
use resume_match::llm::{ChatCompletionClient, CompletionService, OfflineCompletion};
use resume_match::output::formatter::{render, resolve_save_path, save_report_to_file};
use resume_match::output::{MatchReport, ReportMetadata};
use resume_match::processing::analyzer::TargetedMatch;
use resume_match::processing::skill_catalog::{SkillCatalogMatcher, SkillCategory};
use resume_match::processing::MatchEngine;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process;
use std::time::{Duration, Instant};

struct MatchOptions {
    resume: PathBuf,
    job: PathBuf,
    output: Option<String>,
    save: Option<PathBuf>,
    target: Option<f64>,
    enhanced: Option<PathBuf>,
    offline: bool,
    detailed: bool,
}

#[tokio::main]
async fn main() {
    // Credentials may live in a local .env file
    let dotenv_path = dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    if let Some(path) = dotenv_path {
        info!("Loaded environment from {}", path.display());
    }

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let config = match Config::load_from(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, &config_path).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, config: Config, config_path: &Path) -> Result<()> {
    match command {
        Commands::Match {
            resume,
            job,
            output,
            save,
            target,
            enhanced,
            offline,
            detailed,
        } => {
            let options = MatchOptions {
                resume,
                job,
                output,
                save,
                target,
                enhanced,
                offline,
                detailed,
            };
            run_match(options, &config).await
        }
        Commands::Config { action } => run_config(action.unwrap_or(ConfigAction::Show), &config, config_path),
        Commands::Catalog { category } => list_catalog(category.as_deref()),
    }
}

async fn run_match(options: MatchOptions, config: &Config) -> Result<()> {
    cli::validate_file_extension(&options.resume, &["txt", "md", "markdown"])
        .map_err(|e| ResumeMatchError::InvalidInput(format!("Resume file: {}", e)))?;
    cli::validate_file_extension(&options.job, &["txt", "md", "markdown"])
        .map_err(|e| ResumeMatchError::InvalidInput(format!("Job posting file: {}", e)))?;

    let output_format = match &options.output {
        Some(format) => cli::parse_output_format(format).map_err(ResumeMatchError::InvalidInput)?,
        None => config.output.format,
    };

    let mut input_manager = InputManager::new();
    let resume_text = input_manager.extract_text(&options.resume).await?;
    let job_text = input_manager.extract_text(&options.job).await?;
    info!(
        "Read resume ({} chars) and job posting ({} chars)",
        resume_text.len(),
        job_text.len()
    );

    let start_time = Instant::now();
    let mut use_offline = options.offline;
    if !use_offline && !config.completion.is_complete() {
        warn!(
            "Completion service not configured (set {} and the endpoint/deployment), running offline",
            config.completion.api_key_env
        );
        use_offline = true;
    }

    let targeted = if use_offline {
        score(config, OfflineCompletion, &resume_text, &job_text, options.target).await?
    } else {
        match ChatCompletionClient::from_config(&config.completion) {
            Ok(client) => score(config, client, &resume_text, &job_text, options.target).await?,
            Err(e) => {
                warn!("Cannot create completion client ({}), running offline", e);
                use_offline = true;
                score(config, OfflineCompletion, &resume_text, &job_text, options.target).await?
            }
        }
    };

    let mut metadata = ReportMetadata::new(
        options.resume.to_string_lossy(),
        options.job.to_string_lossy(),
    );
    metadata.offline = use_offline;
    metadata.processing_time_ms = start_time.elapsed().as_millis() as u64;

    if let Some(path) = &options.enhanced {
        match &targeted.enhanced_resume {
            Some(text) => {
                save_report_to_file(text, path)?;
                info!("Enhanced resume saved to {}", path.display());
            }
            None => warn!("No skills were added, so no enhanced resume was written"),
        }
    }
    let report = MatchReport::from_targeted(targeted, metadata);

    let detailed = options.detailed || config.output.detailed;
    let use_colors = config.output.color_output && std::io::stdout().is_terminal();
    let rendered = render(&report, output_format, use_colors, detailed)?;
    println!("{}", rendered);

    if let Some(requested) = &options.save {
        let path = resolve_save_path(requested, output_format, &report.metadata.resume_path);
        let content = if output_format == OutputFormat::Console {
            render(&report, output_format, false, detailed)?
        } else {
            rendered
        };
        save_report_to_file(&content, &path)?;
        info!("Report saved to {}", path.display());
    }

    match &report.analysis.error {
        Some(reason) => Err(ResumeMatchError::Processing(reason.clone())),
        None => Ok(()),
    }
}

/// Build the engine around `service` and run one match with a spinner.
async fn score<C: CompletionService>(
    config: &Config,
    service: C,
    resume_text: &str,
    job_text: &str,
    target: Option<f64>,
) -> Result<TargetedMatch> {
    let engine = MatchEngine::new(config, service)?;

    let spinner = spinner("Scoring resume against job posting...");
    let targeted = match target {
        Some(target_pct) => engine.compute_match_with_target(resume_text, job_text, target_pct).await,
        None => TargetedMatch::without_plan(engine.compute_match(resume_text, job_text).await),
    };
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    Ok(targeted)
}

fn spinner(message: &'static str) -> Option<ProgressBar> {
    if !std::io::stderr().is_terminal() {
        return None;
    }
    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(style);
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    Some(spinner)
}

fn run_config(action: ConfigAction, config: &Config, config_path: &Path) -> Result<()> {
    match action {
        ConfigAction::Show => {
            println!("Current configuration ({})\n", config_path.display());
            let content = toml::to_string_pretty(config)
                .map_err(|e| ResumeMatchError::Configuration(format!("Failed to serialize config: {}", e)))?;
            println!("{}", content);
            let key_status = if config.completion.api_key().is_some() { "set" } else { "not set" };
            println!("API key ({}): {}", config.completion.api_key_env, key_status);
            if !config.completion.is_complete() {
                println!("Completion service incomplete: matches will run offline.");
            }
        }
        ConfigAction::Reset => {
            Config::default().save_to(config_path)?;
            println!("Configuration reset to defaults at {}", config_path.display());
        }
        ConfigAction::Path => {
            println!("{}", config_path.display());
        }
    }
    Ok(())
}

fn list_catalog(category: Option<&str>) -> Result<()> {
    let catalog = SkillCatalogMatcher::new()?;

    let categories: Vec<SkillCategory> = match category {
        Some(name) => {
            let parsed = SkillCategory::parse(name).ok_or_else(|| {
                ResumeMatchError::InvalidInput(format!("Unknown skill category: {}", name))
            })?;
            vec![parsed]
        }
        None => SkillCategory::ALL.to_vec(),
    };

    println!("{} skills recognized offline\n", catalog.skill_count());
    for category in categories {
        println!("{}", category.to_string().bold());
        println!("  {}\n", catalog.skills_in(category).join(", "));
    }
    Ok(())
}
