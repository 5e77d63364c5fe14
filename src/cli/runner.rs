//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands};
use crate::config::Config;
use crate::engine::Engine;
use crate::error::{Error, Result};
use crate::output::{JsonlWriter, RecordSink};
use crate::state::StateManager;
use std::path::PathBuf;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Run { output } => self.sync(output.clone()).await,
            Commands::Check => self.check().await,
            Commands::Discover => Self::discover(),
        }
    }

    /// Load the extractor configuration
    fn load_config(&self) -> Result<Config> {
        let path = self
            .cli
            .config
            .as_ref()
            .ok_or_else(|| Error::config("Configuration file not specified (use -c flag)"))?;
        Config::from_file(path)
    }

    /// Build the state manager; the CLI flag wins over the config path
    fn build_state(&self, config: &Config) -> Result<StateManager> {
        let path = self.cli.state.clone().or_else(|| config.state_path.clone());
        match path {
            Some(path) => StateManager::from_file(path),
            None => Ok(StateManager::in_memory()),
        }
    }

    /// Execute a sync run
    async fn sync(&self, output: Option<PathBuf>) -> Result<()> {
        let config = self.load_config()?;
        let output = output.or_else(|| config.output_path.clone());
        let state = self.build_state(&config)?;

        if state.is_in_memory() {
            info!("No state path configured; checkpoints will not persist");
        }

        let engine = Engine::new(config, state);
        let mut sink: Box<dyn RecordSink> = match output {
            Some(path) => Box::new(JsonlWriter::to_file(path)?),
            None => Box::new(JsonlWriter::stdout()),
        };

        let stats = engine.run(sink.as_mut()).await?;
        info!(
            records = stats.records_synced,
            duration_ms = stats.duration_ms,
            "Run finished"
        );
        Ok(())
    }

    /// Execute the connection check
    async fn check(&self) -> Result<()> {
        let config = self.load_config()?;
        let engine = Engine::new(config, StateManager::in_memory());
        let message = engine.check().await?;
        println!("{message}");
        Ok(())
    }

    /// Print the stream catalog
    fn discover() -> Result<()> {
        let catalog = Engine::discover();
        println!("{}", serde_json::to_string_pretty(&catalog)?);
        Ok(())
    }
}
