use anyhow::Context;
use api::client::ApiClient;
use api::mock::{mock_bind_address, MockApi};
use clap::Parser;
use fixture::stock::FixtureSet;
use rxlogcore::{AnimatorConfig, Frame};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::DashboardConfig;
use workflow::runner::{RecordSource, Runner};

mod api;
mod fixture;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "RxLog home dashboard session driver")]
struct Args {
    /// Load the dashboard config from YAML
    #[arg(long)]
    config: Option<PathBuf>,
    /// Base URL of the stock API
    #[arg(long)]
    api_base: Option<String>,
    /// Use generated fixture records instead of HTTP
    #[arg(long, default_value_t = false)]
    offline: bool,
    /// Host the mock stock API and keep it alive until Ctrl+C
    #[arg(long, default_value_t = false)]
    serve: bool,
    /// Seed for generated fixture records
    #[arg(long)]
    seed: Option<u64>,
    /// Dataset to switch to once the current animation completes; repeatable
    #[arg(long = "select")]
    selections: Vec<String>,
    /// Item key to highlight once each animation completes
    #[arg(long)]
    highlight: Option<u32>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => DashboardConfig::load(path)?,
        None => DashboardConfig::default(),
    }
    .with_overrides(args.api_base.clone(), args.seed);
    let fixtures = FixtureSet::generate(&config.fixture, config.dataset_names());

    let runtime = TokioBuilder::new_multi_thread()
        .enable_all()
        .build()
        .context("creating session runtime")?;

    let mock = if args.serve {
        let mock = MockApi::spawn(mock_bind_address(), fixtures.clone())?;
        publish_status(&format!("mock stock API listening on {}", mock.addr()));
        if !args.offline {
            config.api_base = mock.base_url();
        }
        Some(mock)
    } else {
        None
    };

    let source = if args.offline {
        RecordSource::Fixture(Arc::new(fixtures))
    } else {
        RecordSource::Http(ApiClient::from_config(&config)?)
    };

    let runner = Runner::new(config, AnimatorConfig::default(), source)
        .with_highlight(args.highlight);
    let report = runtime.block_on(runner.run(&args.selections))?;

    publish_status(&format!("datasets: {}", report.dataset_names.join(" | ")));
    for frame in &report.frames {
        print_frame(frame);
    }
    for name in &report.rejected {
        publish_status(&format!("selection {} rejected: dataset not configured", name));
    }
    println!(
        "Session -> ticks {}, restarts {}, stale ticks {}, fetch failures {}",
        report.metrics.ticks,
        report.metrics.restarts,
        report.metrics.stale_ticks,
        report.metrics.fetch_failures
    );

    if mock.is_some() {
        publish_status("mock API running (Ctrl+C to stop)...");
        runtime.block_on(async {
            signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
            Ok::<(), anyhow::Error>(())
        })?;
    }

    Ok(())
}

fn print_frame(frame: &Frame) {
    publish_status(&format!(
        "{} run {} ({}/{}) -> {} slices",
        frame.dataset,
        frame.run_id,
        frame.step,
        frame.step_count,
        frame.items.len()
    ));
    for item in &frame.items {
        println!("  #{} {:<16} {:>6} {}", item.key, item.label, item.value, item.color);
    }
    if let Some(item) = &frame.highlight {
        println!("  highlighted {}: {}", item.label, item.caption());
    }
}

fn publish_status(message: &str) {
    println!("[RxLog] {}", message);
}
