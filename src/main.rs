mod helpers;

use anyhow::{Context, Result, bail};
use indicatif::{ProgressBar, ProgressStyle};
use std::{env, path::PathBuf, sync::Arc, time::Duration};
use tracing_subscriber::EnvFilter;

use simplestreams::{
    CloudSpec, Constraint, LookupParams, ResultRecord, SchemeRouter, Simplestreams, ToolsVersion,
    repositories::{self as repos, SOURCES_ENV},
    series,
};

use crate::helpers::{arch_options, choose_one, stream_options};

const REGION_ENV: &str = "SIMPLESTREAMS_REGION";
const ENDPOINT_ENV: &str = "SIMPLESTREAMS_ENDPOINT";
const SOURCE_ENV: &str = "SIMPLESTREAMS_SOURCE";

fn construct_properties_file_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("resources").join("sources.json")
}

/// Logs go to stderr so the record listing on stdout stays clean.
fn initialize_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_sources() -> Result<()> {
    if env::var_os(SOURCES_ENV).is_some() {
        repos::init_from_env(SOURCES_ENV).with_context(|| format!("invalid ${SOURCES_ENV}"))?;
    } else {
        let path = construct_properties_file_path();
        repos::init_from_file(&path).with_context(|| format!("cannot load {}", path.display()))?;
    }
    Ok(())
}

/// Every configured source, or only the one named by `$SIMPLESTREAMS_SOURCE`.
fn selected_base_urls() -> Result<Vec<String>> {
    match env::var(SOURCE_ENV) {
        Ok(name) => match repos::by_name(&name)? {
            Some(source) => Ok(vec![source.url().to_string()]),
            None => bail!("no source named '{name}' is configured"),
        },
        Err(_) => Ok(repos::base_urls()?),
    }
}

fn cloud_from_env() -> CloudSpec {
    CloudSpec::new(
        env::var(REGION_ENV).unwrap_or_default(),
        env::var(ENDPOINT_ENV).unwrap_or_default(),
    )
}

/// Kind -> series -> arch -> stream
fn prompt_constraint(cloud: CloudSpec) -> Result<Constraint> {
    let kind = choose_one("Select content", vec!["Images", "Agent tools"])?;
    let series = choose_one("Select series", series::known_series())?;
    let arch = choose_one("Select architecture", arch_options())?;
    let stream = choose_one("Select stream", stream_options())?;

    let params = LookupParams::new(cloud, series, [arch]).with_stream(stream);
    match kind.as_str() {
        "Images" => Ok(Constraint::image(params)),
        "Agent tools" => Ok(Constraint::tools(params, ToolsVersion::Any)),
        _ => bail!("Unsupported content '{kind}'"),
    }
}

fn print_records(constraint: &Constraint, records: &[ResultRecord]) {
    let params = constraint.params();
    println!("\n=== Lookup ===");
    println!("Series:   {}", params.series());
    println!("Arches:   {}", params.arches().join(", "));
    if !params.cloud().is_empty() {
        println!("Region:   {}", params.cloud().region());
    }
    println!("Records:  {}", records.len());
    for record in records {
        println!("  {record}");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    initialize_tracing();
    load_sources()?;

    let settings = repos::settings()?;
    let base_urls = selected_base_urls()?;
    let constraint = prompt_constraint(cloud_from_env())?;

    let router = SchemeRouter::with_defaults().context("cannot build HTTP client")?;
    let lookup = Simplestreams::new(Arc::new(router))
        .with_keyring(repos::keyring()?)
        .with_deadline(settings.deadline());

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    spinner.set_message(format!("Resolving against {} source(s)", base_urls.len()));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let outcome = lookup
        .fetch(
            &base_urls,
            settings.index_path(),
            &constraint,
            settings.require_signed(),
        )
        .await;
    spinner.finish_and_clear();

    let records = outcome.context("metadata lookup failed")?;
    print_records(&constraint, &records);
    Ok(())
}
