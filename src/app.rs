use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::config::{APP_NAME, REDUNDANCY_SUFFIX};
use crate::degrade::Seed;
use crate::file::File;
use crate::processor::{self, Processor};
use crate::types::{Degradation, ProcessorMode};
use crate::ui::display::{show_parameters, show_removed, show_report, show_success};

#[derive(Subcommand)]
pub enum Commands {
    /// Encode a file and degrade the encoded copy with bytes from a secret file.
    Encode {
        /// Host file path.
        #[arg(short, long)]
        input: PathBuf,

        /// Secret file supplying substitute bytes.
        #[arg(short, long)]
        secret: PathBuf,

        /// Degradation percentage (5, 10, 15, 20, 25 or 50).
        #[arg(short, long)]
        percent: u8,

        /// Seed as 64 hex characters (optional, drawn from the system if omitted).
        #[arg(long)]
        seed: Option<String>,

        /// Degraded output path (optional).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Recover a file from its degraded copy and redundancy stream.
    Decode {
        /// Degraded file path.
        #[arg(short, long)]
        input: PathBuf,

        /// Redundancy file path.
        #[arg(short, long)]
        redundancy: PathBuf,

        /// Degradation percentage used at encode time.
        #[arg(short, long)]
        percent: u8,

        /// Recovered output path (optional).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Remove the encoded, redundancy, decoded and hash files of a host file.
    Clean {
        /// Host file path.
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Show the supported degradation levels.
    Table,
}

#[derive(Parser)]
#[command(name = APP_NAME, version, about = "Reversibly degrade files with Reed-Solomon coding and bytes from a secret file.")]
pub struct App {
    #[command(subcommand)]
    command: Commands,
}

impl App {
    pub fn init() -> Result<Self> {
        let subscriber = tracing_subscriber::fmt().with_file(true).with_line_number(true).with_writer(std::io::stderr).finish();
        tracing::subscriber::set_global_default(subscriber)?;
        Ok(Self::parse())
    }

    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Encode { input, secret, percent, seed, output } => Self::encode(input, secret, percent, seed, output).await,
            Commands::Decode { input, redundancy, percent, output } => Self::decode(input, redundancy, percent, output).await,
            Commands::Clean { input } => Self::clean(input).await,
            Commands::Table => {
                show_parameters();
                Ok(())
            }
        }
    }

    async fn encode(input: PathBuf, secret: PathBuf, percent: u8, seed: Option<String>, output: Option<PathBuf>) -> Result<()> {
        let level = Degradation::try_from(percent)?;
        let seed = seed.as_deref().map(Seed::from_hex).transpose()?;

        let mut input = File::new(input);
        input.validate().await.context("source validation failed")?;

        let encoded = File::new(output.unwrap_or_else(|| input.output_path(ProcessorMode::Encode)));
        let redundancy = File::new(input.artifact_path(REDUNDANCY_SUFFIX));

        let report = Processor::new(level)
            .with_progress(true)
            .encode(&input, &File::new(secret), seed, &encoded, &redundancy)
            .await
            .with_context(|| format!("encode failed: {}", input.path().display()))?;

        show_report(&report);
        show_success(ProcessorMode::Encode, &[encoded.path(), redundancy.path()]);

        Ok(())
    }

    async fn decode(input: PathBuf, redundancy: PathBuf, percent: u8, output: Option<PathBuf>) -> Result<()> {
        let level = Degradation::try_from(percent)?;

        let mut input = File::new(input);
        input.validate().await.context("source validation failed")?;

        let output = File::new(output.unwrap_or_else(|| input.output_path(ProcessorMode::Decode)));

        let report = Processor::new(level)
            .with_progress(true)
            .decode(&input, &File::new(redundancy), &output)
            .await
            .with_context(|| format!("decode failed: {}", input.path().display()))?;

        show_report(&report);
        show_success(ProcessorMode::Decode, &[output.path()]);

        Ok(())
    }

    async fn clean(input: PathBuf) -> Result<()> {
        let removed = processor::clean(&File::new(input)).await?;
        show_removed(&removed);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        App::command().debug_assert();
    }

    #[test]
    fn test_parse_encode() {
        let app = App::try_parse_from(["degrade-rs", "encode", "-i", "a.pdf", "-s", "key.txt", "-p", "25"]).unwrap();

        assert!(matches!(app.command, Commands::Encode { percent: 25, seed: None, output: None, .. }));
    }

    #[tokio::test]
    async fn test_unsupported_percent_fails_before_io() {
        let err = App::encode(PathBuf::from("/nonexistent/host.bin"), PathBuf::from("/nonexistent/secret"), 30, None, None).await.unwrap_err();

        assert_eq!(err.downcast_ref::<crate::error::Error>(), Some(&crate::error::Error::UnsupportedPercent(30)));
    }

    #[tokio::test]
    async fn test_bad_seed_rejected() {
        let err = App::encode(PathBuf::from("/nonexistent/host.bin"), PathBuf::from("/nonexistent/secret"), 25, Some("xyz".to_owned()), None).await.unwrap_err();

        assert!(err.to_string().contains("invalid seed"));
    }
}
