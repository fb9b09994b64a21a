//! AltTextBuddy - Main CLI Entry Point

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use alttextbuddy::{
    analytics::{summarize_store, AnalyticsSummary},
    bootstrap::Bootstrap,
    cli::{Args, Commands, Config, FineTuneCommand},
    server::build_router,
    telemetry::init_tracing,
    training::export_training_data,
};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbosity(), args.log_json);

    let mut config = Config::load(args.config.clone()).context("Failed to load configuration")?;
    args.apply_overrides(&mut config);
    config.validate().context("Invalid configuration")?;

    let boot = Bootstrap::new(config)
        .await
        .context("Failed to initialize feedback store")?;

    match args.command() {
        Commands::Serve => serve(&boot, args.verbosity().as_str()).await,
        Commands::Analytics { json } => {
            let summary = summarize_store(&boot.store).await;
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print_summary(&summary);
            }
            Ok(())
        }
        Commands::Export { output } => {
            let path = output.unwrap_or_else(|| boot.config.storage.feedback_export_file.clone());
            let records = boot.store.read_all().await.context("Failed to read feedback")?;
            let export = export_training_data(&records)?;
            export.write_to(&path).await.context("Failed to write export")?;
            println!(
                "{} Generated {} training examples -> {}",
                "✓".green(),
                export.count(),
                path.display()
            );
            Ok(())
        }
        Commands::ExportCorpus => {
            let report = boot.fine_tuning.generate_complete_training_data().await?;
            println!(
                "{} {} examples ({} seed, {} from feedback)",
                "✓".green(),
                report.total_examples,
                report.base_examples,
                report.feedback_examples
            );
            Ok(())
        }
        Commands::FineTune(FineTuneCommand::Create) => {
            let job = boot.fine_tuning.create_fine_tuned_model().await?;
            println!(
                "{} Fine-tuning job {} created ({}, {} examples)",
                "✓".green(),
                job.job_id.bold(),
                job.status,
                job.training_examples
            );
            Ok(())
        }
        Commands::FineTune(FineTuneCommand::Status { job_id }) => {
            let status = boot.fine_tuning.check_fine_tuning_status(&job_id).await?;
            println!("{}: {}", "Status".bold(), status.status);
            if let Some(model) = status.model {
                println!("{}: {}", "Model".bold(), model.green());
            }
            Ok(())
        }
    }
}

async fn serve(boot: &Bootstrap, verbosity: &str) -> Result<()> {
    let addr = boot.config.bind_addr();
    let router = build_router(boot.app_state(), boot.config.server.max_body_bytes);

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!(
        addr = %addr,
        verbosity,
        openai = boot.config.has_openai(),
        feedback_file = %boot.store.path().display(),
        "server running"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown requested");
        })
        .await
        .context("Server error")?;

    Ok(())
}

fn print_summary(summary: &AnalyticsSummary) {
    println!("{}", "Feedback Analytics".bold().cyan());
    println!("  Total feedback:  {}", summary.total_feedback);
    println!("  Average rating:  {:.2}", summary.average_rating);
    println!("  Distribution:");
    for (star, count) in &summary.rating_distribution {
        println!("    {} {:>5}", "★".repeat(usize::from(*star)).yellow(), count);
    }
    println!("  Improvements:    {}", summary.common_improvements.len());
    if !summary.recent_feedback.is_empty() {
        println!("  Recent:");
        for record in &summary.recent_feedback {
            println!(
                "    [{}] {} {}",
                record.rating,
                record.timestamp.format("%Y-%m-%d %H:%M"),
                record.improvement().unwrap_or_else(|| record.alt_text()).dimmed()
            );
        }
    }
}
