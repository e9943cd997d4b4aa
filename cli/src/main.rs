//! tandem binary entry point
//!
//! Wires configuration, gateways, persona selection, and the session
//! use case together, then exports the outcome if requested.

use anyhow::Context;
use clap::Parser;
use std::path::Path;
use std::sync::Arc;
use tandem_application::{
    NoProgress, PersonaSelector, ReportGenerator, RunSessionInput, RunSessionUseCase,
    SessionOutcome, SessionParams,
};
use tandem_domain::Topic;
use tandem_infrastructure::{
    ConfigLoader, FileConfig, OpenAiChatGateway, OpenAiEmbeddingGateway, SessionExporter,
};
use tandem_presentation::{Cli, ConsoleFormatter, ConsoleObserver, builtin_personas};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let topic = Topic::new(cli.topic.as_str()).context("invalid --topic")?;

    let config = ConfigLoader::load(cli.config.as_ref())
        .map_err(|e| anyhow::anyhow!(e))
        .context("failed to load configuration")?;
    let config = apply_overrides(config, &cli);
    debug!(
        base_url = %config.backend.base_url,
        model = %config.backend.model,
        "configuration resolved"
    );

    let params = SessionParams::new(
        config.backend.model.clone(),
        config.session.chunk_threshold,
        config.session.temperature,
        config.session.max_tokens,
    )
    .context("invalid session parameters")?;

    let chat = Arc::new(OpenAiChatGateway::new(
        config.backend.base_url.clone(),
        config.backend.api_key.clone(),
    ));
    let embeddings = Arc::new(OpenAiEmbeddingGateway::new(
        config.backend.base_url.clone(),
        config.backend.api_key.clone(),
        config.backend.embedding_model.clone(),
    ));

    let mut selector = PersonaSelector::new(embeddings, builtin_personas())
        .context("persona pool too small")?;
    let pairs = selector
        .similarity_matrix()
        .await
        .context("failed to embed persona descriptors")?;
    let (left, right) = if cli.similar {
        selector.select_most_similar().await?
    } else {
        selector.select_most_dissimilar().await?
    };
    let score = pairs
        .iter()
        .map(|p| p.score)
        .fold(if cli.similar { f32::NEG_INFINITY } else { f32::INFINITY }, |acc, s| {
            if cli.similar { acc.max(s) } else { acc.min(s) }
        });
    if !cli.quiet {
        println!(
            "{}",
            ConsoleFormatter::pair_selection(left.name(), right.name(), score, !cli.similar)
        );
    }
    info!(left = left.name(), right = right.name(), "personas paired");

    let divergent_turns = cli
        .divergent_turns
        .unwrap_or(config.session.divergent_turns);
    let convergent_turns = cli
        .convergent_turns
        .unwrap_or(config.session.convergent_turns);
    let strategy = cli.strategy.to_strategy(divergent_turns, convergent_turns);

    let input = RunSessionInput::new(topic, (left, right), strategy);
    let model = params.model.clone();
    let chunk_threshold = params.chunk_threshold;
    let use_case = RunSessionUseCase::new(Arc::clone(&chat), params);

    let outcome = if cli.quiet {
        use_case.execute_with_progress(input, &NoProgress).await
    } else {
        use_case.execute_with_progress(input, &ConsoleObserver).await
    };

    if let Some(path) = &cli.output {
        export(&outcome, path)?;
        println!("Session exported to {}", path.display());
    }

    if cli.generate_report {
        if !cli.quiet {
            println!("\nGenerating comprehensive design document...");
        }
        let generator = ReportGenerator::new(Arc::clone(&chat), model, chunk_threshold);
        let report = generator.generate(&outcome.topic, &outcome.transcript).await;
        let path = report_path(cli.output.as_deref());
        SessionExporter::write_report(&report, &path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Report saved to {}", path.display());
    }

    Ok(())
}

/// The report lands next to `--output` when given, otherwise in the
/// working directory
fn report_path(output: Option<&Path>) -> std::path::PathBuf {
    let filename = "DESIGN_DOCUMENT.md";
    match output {
        Some(path) if path.extension().is_some() => match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.join(filename),
            _ => filename.into(),
        },
        Some(dir) => dir.join(filename),
        None => filename.into(),
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();
}

/// CLI flags win over every config source
fn apply_overrides(mut config: FileConfig, cli: &Cli) -> FileConfig {
    if let Some(model) = &cli.model {
        config.backend.model = model.clone();
    }
    if let Some(base_url) = &cli.base_url {
        config.backend.base_url = base_url.clone();
    }
    if let Some(threshold) = cli.chunk_threshold {
        config.session.chunk_threshold = threshold;
    }
    config
}

/// Pick the export format from the file extension; JSON is the default
fn export(outcome: &SessionOutcome, path: &Path) -> anyhow::Result<()> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("md") | Some("markdown") => SessionExporter::write_markdown(outcome, path)
            .with_context(|| format!("failed to write {}", path.display()))?,
        _ => SessionExporter::write_json(outcome, path)
            .with_context(|| format!("failed to write {}", path.display()))?,
    }
    Ok(())
}
