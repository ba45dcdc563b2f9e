use std::path::PathBuf;

use clap::Parser;

use aomdv_node::{NodeConfig, Scenario, ScenarioRunner};

#[derive(Parser)]
#[command(name = "aomdv-node", about = "Replay AOMDV route table scenarios")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Path to scenario file
    #[arg(short, long)]
    scenario: PathBuf,
}

fn main() {
    let cli = Cli::parse();

    let config = match cli.config.as_deref().map(NodeConfig::load).transpose() {
        Ok(c) => c.unwrap_or_default(),
        Err(e) => {
            eprintln!("failed to load config: {e}");
            std::process::exit(1);
        }
    };

    if std::env::var("RUST_LOG_FORMAT").as_deref() == Ok("json") {
        aomdv_node::logging::init_json(&config.logging.level);
    } else {
        aomdv_node::logging::init(&config.logging.level);
    }

    let scenario = match Scenario::load(&cli.scenario) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("failed to load scenario from {}: {e}", cli.scenario.display());
            std::process::exit(1);
        }
    };

    let mut runner = ScenarioRunner::new(&config);
    let stdout = std::io::stdout();
    if let Err(e) = runner.run(&scenario, &mut stdout.lock()) {
        tracing::error!("scenario failed: {e}");
        eprintln!("scenario failed: {e}");
        std::process::exit(1);
    }
}
