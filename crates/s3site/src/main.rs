mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "s3site")]
#[command(
    about = "Host a static website on S3, CloudFront and Route 53",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// バケット・ディストリビューション・DNS を設定どおりに構成
    Apply {
        /// 設定ファイルのパス（省略時は S3SITE_CONFIG_PATH、カレントディレクトリの順に探す）
        #[arg(short = 'f', long = "config-file")]
        config_file: Option<PathBuf>,
        /// API レスポンスとデバッグログを表示
        #[arg(short, long)]
        verbose: bool,
        /// 質問せずに実行（DNS ゾーンの作成は行わない）
        #[arg(long)]
        headless: bool,
        /// headless 実行時、未設定なら CloudFront ディストリビューションを作成
        #[arg(long = "autocreate-cloudfront-dist")]
        autocreate_cloudfront_dist: bool,
    },
    /// 設定ファイルを検証
    Validate {
        /// 設定ファイルのパス
        #[arg(short = 'f', long = "config-file")]
        config_file: Option<PathBuf>,
    },
    /// バージョン情報を表示
    Version,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Version => {
            println!("s3site {}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Validate { config_file } => {
            init_tracing(false);
            commands::validate::handle(config_file).await?;
        }
        Commands::Apply {
            config_file,
            verbose,
            headless,
            autocreate_cloudfront_dist,
        } => {
            init_tracing(verbose);
            let options = s3site_cloud::RunOptions {
                headless,
                autocreate_distribution: autocreate_cloudfront_dist,
                verbose,
            };
            commands::apply::handle(config_file, options).await?;
        }
    }

    Ok(())
}
