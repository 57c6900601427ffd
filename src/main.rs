use std::io::{self, Write};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;

use laketree::cli::{Cli, Command, HealthArgs, TreeArgs};
use laketree::core::explore::{ExploreOptions, explore};
use laketree::core::render::{RenderOptions, write_children};
use laketree::health::{HealthMonitor, HealthStatus, ServiceEndpoint};
use laketree::server::{Config, ServerProfile, ServerRegistry};

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("laketree: {err:#}");
            ExitCode::from(1)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    match cli.command {
        Command::Tree(args) => run_tree(config, args).await,
        Command::Health(args) => run_health(config, args).await,
    }
}

async fn run_tree(config: Config, args: TreeArgs) -> anyhow::Result<ExitCode> {
    let mut registry = match &args.url {
        Some(url) => ServerRegistry::new(vec![ServerProfile {
            name: url.clone(),
            base_url: url.clone(),
            token: None,
        }]),
        None => ServerRegistry::new(config.servers),
    };
    if let Some(name) = &args.server {
        registry.select(name)?;
    }
    let entry = registry
        .selected_mut()
        .context("no server to browse; pass --url or --config with a servers section")?;

    let mut fetcher = entry.profile.fetcher();
    if let Some(token) = args.token.as_deref() {
        fetcher = fetcher.with_token(token);
    }

    let options = ExploreOptions {
        max_depth: args.depth,
        ignore_pattern: args.ignore.clone(),
    };
    let snapshot = explore(&mut entry.cache, &fetcher, &args.path, &options).await?;
    let target = snapshot
        .find(&args.path)
        .context("refreshed path missing from snapshot")?;

    let render = RenderOptions {
        ignore_pattern: args.ignore,
        show_hidden: !args.no_hidden,
        folders_only: args.folders_only,
        folders_first: args.folders_first,
    };
    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{}", laketree::display_path(&args.path))?;
    write_children(&mut out, target, &render)?;

    Ok(ExitCode::SUCCESS)
}

async fn run_health(config: Config, args: HealthArgs) -> anyhow::Result<ExitCode> {
    let mut services = config.services;
    for url in &args.urls {
        services.push(ServiceEndpoint {
            name: url.clone(),
            base_url: url.clone(),
            probe_paths: Vec::new(),
        });
    }
    anyhow::ensure!(
        !services.is_empty(),
        "no services to check; pass --url or --config with a services section"
    );

    let monitor = HealthMonitor::new(Duration::from_secs(args.timeout))?;

    if args.watch {
        monitor
            .watch(
                &services,
                Duration::from_secs(args.interval),
                print_status,
            )
            .await;
        return Ok(ExitCode::SUCCESS);
    }

    let mut all_online = true;
    for service in &services {
        let status = monitor.probe(service).await;
        all_online &= status.online;
        print_status(service, status);
    }

    Ok(if all_online {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

fn print_status(service: &ServiceEndpoint, status: HealthStatus) {
    if status.online {
        println!(
            "{}: online ({} ms)",
            service.name,
            status.response_time.as_millis()
        );
    } else {
        println!(
            "{}: offline ({})",
            service.name,
            status.error.as_deref().unwrap_or("unknown error")
        );
    }
}
