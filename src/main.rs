use anyhow::Context;
use catalog_clone::core::engine::ClonePlan;
use catalog_clone::utils::error::{CloneError, ErrorSeverity};
use catalog_clone::utils::{logger, validation::Validate};
use catalog_clone::{
    CliConfig, CloneEngine, CloneRequest, LocalCatalog, RunReport, TomlConfig, TracingReporter,
};
use chrono::Utc;
use clap::Parser;
use std::path::Path;

/// Everything the run needs once the command line and the job file are merged.
struct Job {
    request: CloneRequest,
    verbose: bool,
    json_logs: bool,
    create_target: bool,
    report_path: Option<String>,
}

fn load_job(args: &CliConfig) -> Result<Job, CloneError> {
    if !args.uses_job_file() {
        args.validate()?;
        return Ok(Job {
            request: CloneRequest::from_provider(args),
            verbose: args.verbose,
            json_logs: args.json_logs,
            create_target: args.create_target,
            report_path: args.report.clone(),
        });
    }

    let mut config = TomlConfig::from_file(&args.config)?;
    config.apply_overrides(args.target.as_deref(), args.overwrite);
    config.validate()?;

    Ok(Job {
        request: CloneRequest::from_provider(&config),
        verbose: args.verbose || config.verbose(),
        json_logs: args.json_logs || config.json_logs(),
        create_target: args.create_target || config.create_if_missing(),
        report_path: args
            .report
            .clone()
            .or_else(|| config.report_path().map(str::to_string)),
    })
}

fn exit_code(severity: ErrorSeverity) -> i32 {
    match severity {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

fn print_plan(plan: &ClonePlan) {
    println!("Phase 1: feature classes and tables");
    for planned in &plan.entities {
        println!("  {} ({}) -> {}", planned.dataset, planned.data_type, planned.target_name);
    }
    println!("Phase 2: relationship classes");
    for planned in &plan.relationships {
        println!("  {} ({}) -> {}", planned.dataset, planned.data_type, planned.target_name);
    }
    if !plan.rejected.is_empty() {
        println!("Not cloneable:");
        for rejected in &plan.rejected {
            println!("  {}: {:?}", rejected.dataset, rejected.status);
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliConfig::parse();

    let job = match load_job(&args) {
        Ok(job) => job,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            std::process::exit(exit_code(e.severity()).max(1));
        }
    };

    if job.json_logs {
        logger::init_json_logger(job.verbose);
    } else {
        logger::init_cli_logger(job.verbose);
    }

    tracing::info!("Starting catalog-clone");
    tracing::debug!("Clone request: {:?}", job.request);

    if job.create_target && !Path::new(&job.request.target_catalog).exists() {
        LocalCatalog::create_catalog(&job.request.target_catalog)
            .with_context(|| format!("creating target catalog {}", job.request.target_catalog))?;
        tracing::info!("Created target catalog {}", job.request.target_catalog);
    }

    let engine = CloneEngine::new(LocalCatalog::new(), TracingReporter::new());

    if args.dry_run {
        tracing::info!("DRY RUN - the target catalog will not be modified");
        print_plan(&engine.plan(&job.request).await);
        return Ok(());
    }

    let started_at = Utc::now();
    let batch = engine.run(&job.request).await;

    println!(
        "Cloned into {}: {} succeeded, {} failed",
        job.request.target_catalog, batch.successes, batch.failures
    );
    for failed in batch.failed_datasets() {
        eprintln!("❌ {}", failed);
    }

    let report = RunReport::new(&job.request, started_at, batch);
    tracing::info!(
        "Processed {} of {} datasets in {} ms",
        engine.reporter().position(),
        job.request.datasets.len(),
        report.elapsed_ms()
    );

    if let Some(path) = &job.report_path {
        report
            .write_to(path)
            .with_context(|| format!("writing run report to {}", path))?;
    }

    if report.failures > 0 {
        std::process::exit(exit_code(ErrorSeverity::Medium));
    }

    Ok(())
}
