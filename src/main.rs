use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ufind_planner::config::Config;
use ufind_planner::course::Course;
use ufind_planner::crawler::HttpFetcher;
use ufind_planner::error::{Error, PlannerErrorTrait};
use ufind_planner::report::{render_failure, render_footer, render_lecture, ProgressReporter};

#[derive(Parser)]
#[command(
    name = "planner",
    version,
    about = "Lists the next upcoming lectures of a u:find course",
    long_about = None
)]
struct Cli {
    /// Course id as printed in the catalog, e.g. 5.01
    course_id: String,

    /// TOML configuration file (defaults to PLANNER_* environment variables)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Log format (text, json)
    #[arg(long)]
    log_format: Option<String>,

    /// Print the full error chain on failure
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            println!("{}", render_failure(&e, cli.debug));
            return ExitCode::FAILURE;
        }
    };

    let format = cli
        .log_format
        .clone()
        .unwrap_or_else(|| config.logging.format.clone());
    setup_tracing(&format, &config.logging.level, cli.verbose);

    let debug = cli.debug || config.logging.debug;

    match run(&cli.course_id, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(
                category = e.category().label(),
                recoverable = e.is_recoverable(),
                error = %e,
                "Planner failed"
            );
            println!("{}", render_failure(&e, debug));
            ExitCode::FAILURE
        }
    }
}

fn load_config(path: Option<&std::path::Path>) -> Result<Config, Error> {
    let config = match path {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };
    config.validate().context("Configuration validation failed")?;
    Ok(config)
}

async fn run(course_id: &str, config: &Config) -> Result<(), Error> {
    let started = Instant::now();

    let fetcher = Arc::new(HttpFetcher::new(&config.fetch)?);
    let course = Course::resolve(course_id, fetcher, config).await?;

    let references = course.discover().await?;
    let fanout = course.fan_out(references);

    let reporter = ProgressReporter::new(config.report.progress_step);
    let progress = tokio::spawn(reporter.drive(fanout.subscribe(), std::io::stdout()));

    let summary = course.collect(fanout).await;

    match progress.await {
        Ok(Ok(_)) => {}
        Ok(Err(e)) => tracing::warn!(error = %e, "Could not print progress"),
        Err(e) => tracing::warn!(error = %e, "Progress reporter aborted"),
    }

    if summary.failed + summary.panicked > 0 {
        tracing::warn!(
            failed = summary.failed,
            panicked = summary.panicked,
            total = summary.total,
            "Some lecture pages could not be processed"
        );
    }

    let lectures = course.report_top_n(config.report.top_n).await;
    for lecture in &lectures {
        println!("{}", render_lecture(lecture, course.base_url()));
    }

    println!(
        "{}",
        render_footer(lectures.len(), course.len().await, started.elapsed())
    );

    Ok(())
}

fn setup_tracing(format: &str, level: &str, verbose: bool) {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("ufind_planner=debug,planner=debug,info")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level))
    };

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}
