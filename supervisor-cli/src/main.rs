// ABOUTME: Command-line entry point - reads one objective, runs the supervisor,
// ABOUTME: and prints the resulting summaries.

mod logging;

use std::sync::Arc;

use anyhow::{Result, bail};
use rustyline::DefaultEditor;

use objective_supervisor::prelude::*;
use objective_supervisor::supervisor::FINAL_OUTPUT_FILENAME;

const APP_TITLE: &str = "Objective Supervisor";
const APP_REFERER: &str = "http://localhost";

/// Objective from the command line, or from an interactive prompt.
fn read_objective() -> Result<String> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if !args.is_empty() {
        return Ok(args.join(" "));
    }

    let mut rl = DefaultEditor::new()?;
    let line = rl.readline("Enter user objective: ")?;
    let objective = line.trim();
    if objective.is_empty() {
        bail!("no objective given");
    }
    Ok(objective.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();
    logging::init();

    let settings = Settings::from_env()?;
    tracing::debug!(
        model = %settings.model,
        artifact_dir = %settings.artifact_dir.display(),
        "loaded settings"
    );

    println!("{}", APP_TITLE);
    let objective = read_objective()?;

    let client = OpenRouterClient::with_headers(
        &settings.openrouter_api_key,
        Some(APP_REFERER),
        Some(APP_TITLE),
    )
    .with_default_model(&settings.model)
    .with_timeout(settings.timeout);

    let registry = default_registry(&settings).await;
    let store = ArtifactStore::new(&settings.artifact_dir);
    let supervisor = Supervisor::new(Arc::new(client), registry, store);

    let state = supervisor.run(&objective).await?;

    println!(
        "Results saved to {}",
        supervisor.store().path_for(FINAL_OUTPUT_FILENAME).display()
    );
    println!("\nSupervisor finished. Summaries:\n");
    for summary in &state.summaries {
        println!("{}", summary);
    }

    Ok(())
}
