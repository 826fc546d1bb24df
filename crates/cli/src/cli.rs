use crate::commands::Command;
use crate::logging::{LogLevel, TracingFormat};
use baw_cache::ArtifactKind;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "baw-cache")]
#[command(about = "Inspect the worker's cached audio, spectrogram, analysis and dataset files")]
#[command(long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(
        long,
        global = true,
        env = "BAW_CACHE_SETTINGS",
        help = "Path to the worker settings file"
    )]
    pub settings: Option<PathBuf>,

    #[arg(
        short = 'l',
        long,
        global = true,
        help = "Set logging level",
        default_value = "warn",
        value_enum
    )]
    pub level: LogLevel,

    #[arg(
        long,
        global = true,
        help = "Log output format",
        default_value = "compact",
        value_enum
    )]
    pub format: TracingFormat,

    #[arg(long, global = true, help = "Output logs in JSON format")]
    pub json: bool,
}

impl Cli {
    /// Log format after applying `--json`
    pub const fn tracing_format(&self) -> TracingFormat {
        if self.json {
            TracingFormat::Json
        } else {
            self.format
        }
    }
}

/// Artifact kind as accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Kind {
    Audio,
    Spectrogram,
    Analysis,
    Dataset,
}

impl From<Kind> for ArtifactKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Audio => Self::Audio,
            Kind::Spectrogram => Self::Spectrogram,
            Kind::Analysis => Self::Analysis,
            Kind::Dataset => Self::Dataset,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(about = "List the storage roots configured for an artifact kind")]
    Dirs {
        #[arg(value_enum)]
        kind: Kind,
    },
    #[command(about = "Show every candidate path and the write target for a key")]
    Paths {
        #[arg(value_enum)]
        kind: Kind,
        #[arg(
            long = "param",
            short = 'p',
            value_name = "FIELD=VALUE",
            help = "Key field, repeated once per field"
        )]
        params: Vec<String>,
    },
    #[command(about = "Decode a cached file path into its key")]
    Parse {
        #[arg(value_enum)]
        kind: Kind,
        path: PathBuf,
    },
    #[command(about = "Audit the files under the existing storage roots")]
    Scan {
        #[arg(value_enum)]
        kind: Kind,
    },
}

impl From<Commands> for Command {
    fn from(cmd: Commands) -> Self {
        match cmd {
            Commands::Dirs { kind } => Self::Dirs { kind: kind.into() },
            Commands::Paths { kind, params } => Self::Paths {
                kind: kind.into(),
                params,
            },
            Commands::Parse { kind, path } => Self::Parse {
                kind: kind.into(),
                path,
            },
            Commands::Scan { kind } => Self::Scan { kind: kind.into() },
        }
    }
}

pub fn parse() -> Cli {
    Cli::parse()
}
