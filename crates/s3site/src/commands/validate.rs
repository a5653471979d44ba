use colored::Colorize;
use s3site_cloud::Region;
use s3site_config::ConfigSource;
use std::path::PathBuf;

pub async fn handle(config_file: Option<PathBuf>) -> anyhow::Result<()> {
    println!("{}", "Validating configuration...".blue());

    let config = match super::load_config(config_file) {
        Ok(config) => config,
        Err(e) => {
            eprintln!();
            eprintln!("{}", "✗ Configuration error".red().bold());
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    };

    let region = match Region::lookup(config.endpoint()) {
        Ok(region) => region,
        Err(e) => {
            eprintln!();
            eprintln!("{}", "✗ Configuration error".red().bold());
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    };

    println!("Config file: {}", config.path().display().to_string().cyan());
    println!("{}", "✓ Configuration is valid".green().bold());
    println!();
    println!("Summary:");
    println!("  Bucket: {}", config.bucket_name().cyan());
    println!("  Region: {} ({})", region.id.cyan(), region.display_name);
    println!(
        "  Website endpoint: {}",
        region.website_endpoint(config.bucket_name())
    );
    if !config.redirect_domains().is_empty() {
        println!("  Redirect domains: {}", config.redirect_domains().len());
        for domain in config.redirect_domains() {
            println!("    - {}", domain.cyan());
        }
    }
    if !config.routing_rules().is_empty() {
        println!("  Routing rules: {}", config.routing_rules().len());
    }
    match config.distribution_id() {
        Some(id) => println!("  CloudFront distribution: {}", id.cyan()),
        None => println!("  CloudFront distribution: (none)"),
    }
    println!(
        "  Route 53: {}",
        if config.dns_enabled() {
            "enabled"
        } else {
            "disabled"
        }
    );

    Ok(())
}
