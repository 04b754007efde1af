// run.rs - Run one parsed review event against its pull request.
//
// Wires the collaborators from the configuration, runs the batch through the
// invocation handler, and prints the result JSON on stdout. With --dry-run
// commits are simulated in memory and replies are only logged; reads and the
// permission check still go to GitHub.

use std::io::Read;
use std::path::Path;

use anyhow::Context;

use sedy_core::{FixBatch, LogAnswerer, SedyConfig};
use sedy_fixer::SubstitutionResolver;
use sedy_github::{GithubAnswerer, GithubClient};
use sedy_pipeline::{handle, InvocationResult, Pipeline};
use sedy_policy::CollaboratorSafeguard;
use sedy_submit::{DryRunGitSurface, GithubGitSurface};

pub fn execute(
    config_path: &Path,
    event: &Path,
    token: Option<&str>,
    dry_run: bool,
) -> anyhow::Result<()> {
    let config = SedyConfig::load_or_default(config_path)?;
    let batch = read_event(event)?;
    let token = resolve_token(&config, token)?;

    let client = GithubClient::new(&config.github, &token, batch.repository.clone())
        .context("failed to build GitHub client")?;
    let safeguard = CollaboratorSafeguard::new(client.clone(), &config.safeguard)?;

    let result = if dry_run {
        let mut git = DryRunGitSurface::new();
        let resolver = SubstitutionResolver::new(git.content(client));
        let answerer = LogAnswerer::new();
        let result = {
            let mut pipeline = Pipeline::new(&safeguard, &resolver, &mut git, &answerer);
            handle(&mut pipeline, &batch)
        };
        for commit in git.commits() {
            tracing::info!(
                sha = %commit.sha,
                parent = %commit.parent,
                files = ?commit.files,
                "dry-run commit"
            );
        }
        result
    } else {
        let mut git = GithubGitSurface::new(client.clone(), &config.committer);
        let resolver = SubstitutionResolver::new(client.clone());
        let answerer = GithubAnswerer::new(client, batch.pull_request.number);
        let mut pipeline = Pipeline::new(&safeguard, &resolver, &mut git, &answerer);
        handle(&mut pipeline, &batch)
    };

    print_result(&result)
}

fn read_event(event: &Path) -> anyhow::Result<FixBatch> {
    let raw = if event == Path::new("-") {
        let mut raw = String::new();
        std::io::stdin()
            .read_to_string(&mut raw)
            .context("failed to read event from stdin")?;
        raw
    } else {
        std::fs::read_to_string(event)
            .with_context(|| format!("failed to read event {}", event.display()))?
    };
    parse_event(&raw)
}

fn parse_event(raw: &str) -> anyhow::Result<FixBatch> {
    serde_json::from_str(raw).context("event is not a valid fix batch")
}

fn resolve_token(config: &SedyConfig, explicit: Option<&str>) -> anyhow::Result<String> {
    if let Some(token) = explicit {
        return Ok(token.to_string());
    }
    let name = &config.github.token_env;
    std::env::var(name).with_context(|| format!("no GitHub token: set {name} or pass --token"))
}

fn print_result(result: &InvocationResult) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(result).context("failed to serialize result")?;
    println!("{json}");
    Ok(())
}
