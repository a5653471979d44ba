use colored::Colorize;
use s3site_cloud::{Console, Orchestrator, RunOptions, RunReport};
use s3site_cloud_aws::AwsClients;
use std::path::PathBuf;

pub async fn handle(config_file: Option<PathBuf>, options: RunOptions) -> anyhow::Result<()> {
    let mut config = super::load_config(config_file)?;
    let clients = AwsClients::connect(&config).await?;

    let mut console = Console::stdio();
    let report = Orchestrator::new(clients)
        .run(&mut config, &mut console, &options)
        .await;

    print_report(&report);

    if !report.is_success() {
        std::process::exit(1);
    }
    Ok(())
}

fn print_report(report: &RunReport) {
    println!();
    for step in &report.steps {
        if step.success {
            println!("{} {}: {}", "✓".green(), step.step, step.message);
        } else {
            println!(
                "{} {}: {}",
                "✗".red(),
                step.step,
                step.error.as_deref().unwrap_or("failed")
            );
        }
    }

    if let Some(bucket) = &report.bucket {
        for created in &bucket.created {
            println!("  Created bucket {}", created.cyan());
        }
    }
    if let Some(id) = report
        .distribution
        .as_ref()
        .and_then(|outcome| outcome.distribution_id())
    {
        println!("  CloudFront distribution {}", id.cyan());
    }
    if let Some(domain) = &report.domain {
        for zone in &domain.zones_declined {
            println!(
                "  {} Hosted zone {} was not created, its records were skipped",
                "!".yellow(),
                zone
            );
        }
    }

    println!();
    if report.is_success() {
        println!(
            "{} ({}ms)",
            "✓ Website configured".green().bold(),
            report.duration_ms
        );
    } else {
        eprintln!(
            "{} ({} step(s) failed)",
            "✗ Website configuration incomplete".red().bold(),
            report.failures().count()
        );
    }
}
