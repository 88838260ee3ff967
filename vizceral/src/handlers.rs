use crate::server::{self, AppState, fetch_graph};
use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::Colorize;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use vizceral_core::{DuplicatePolicy, EdgeSet, RawEdge, VizceralGraph, ingest_with_policy, translate};
use vizceral_zipkin::{QueryWindow, ZipkinClient};

// Helper functions shared by the fetch and translate handlers

pub fn duplicate_policy(sum_duplicates: bool) -> DuplicatePolicy {
    if sum_duplicates {
        DuplicatePolicy::Sum
    } else {
        DuplicatePolicy::Overwrite
    }
}

/// Load and ingest a JSON array of Zipkin dependency links from disk
pub fn load_edges_from_file(path: &Path, policy: DuplicatePolicy) -> Result<EdgeSet> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read dependencies file {}", path.display()))?;
    let raw: Vec<RawEdge> = serde_json::from_str(&content)
        .with_context(|| format!("{} is not a JSON array of dependency links", path.display()))?;
    let edges = ingest_with_policy(raw, policy)
        .with_context(|| format!("Invalid dependency links in {}", path.display()))?;
    Ok(edges)
}

/// Serialize either the api region or the whole global node
pub fn render_graph(graph: VizceralGraph, global: bool, pretty: bool) -> Result<String> {
    let node = if global {
        graph.into_global()
    } else {
        graph.into_api()
    };
    let json = if pretty {
        serde_json::to_string_pretty(&node)?
    } else {
        serde_json::to_string(&node)?
    };
    Ok(json)
}

pub fn write_output(json: &str, output: Option<&PathBuf>) -> Result<()> {
    match output {
        Some(path) => fs::write(path, format!("{}\n", json))
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            println!("{}", json);
            Ok(())
        }
    }
}

fn print_summary(graph: &VizceralGraph) {
    let api = graph.api();
    eprintln!(
        "{} {} services, {} connections, {} entry calls",
        "✓".green().bold(),
        api.nodes.len().to_string().bright_white(),
        api.connections.len().to_string().bright_white(),
        graph.internet_connection().metrics.normal.to_string().bright_white()
    );
}

fn emit(graph: VizceralGraph, args: &ArgMatches, quiet: bool) -> Result<()> {
    if !quiet {
        print_summary(&graph);
    }
    let json = render_graph(graph, args.get_flag("global"), args.get_flag("pretty"))?;
    write_output(&json, args.get_one::<PathBuf>("output"))
}

pub async fn handle_serve(args: &ArgMatches) -> Result<()> {
    let bind = *args.get_one::<SocketAddr>("bind").context("missing --bind")?;
    let timeout = *args.get_one::<u64>("timeout").context("missing --timeout")?;
    let policy = duplicate_policy(args.get_flag("sum-duplicates"));

    let zipkin = ZipkinClient::with_timeout(timeout)?;
    server::serve(bind, AppState::new(zipkin, policy)).await
}

pub async fn handle_fetch(args: &ArgMatches, quiet: bool) -> Result<()> {
    let server = args.get_one::<String>("server").context("missing --server")?;
    let minutes = *args.get_one::<u32>("minutes").context("missing --minutes")?;
    let until = args.get_one::<i64>("until").copied();
    let timeout = *args.get_one::<u64>("timeout").context("missing --timeout")?;
    let policy = duplicate_policy(args.get_flag("sum-duplicates"));

    let zipkin = ZipkinClient::with_timeout(timeout)?;
    let graph = fetch_graph(&zipkin, server, &QueryWindow::new(until, minutes), policy).await?;
    emit(graph, args, quiet)
}

pub fn handle_translate(args: &ArgMatches, quiet: bool) -> Result<()> {
    let input = args.get_one::<PathBuf>("input").context("missing --input")?;
    let policy = duplicate_policy(args.get_flag("sum-duplicates"));

    let edges = load_edges_from_file(input, policy)?;
    let graph = translate(&edges)?;
    emit(graph, args, quiet)
}
