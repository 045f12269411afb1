//! Command-line interface definitions for rowrelay-tester.

use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use rowrelay_view::sim::Technique;

use crate::logging::LogArgs;

/// Command-line interface for the `rowrelay-tester` binary.
#[derive(Parser, Debug)]
#[command(
    name = "rowrelay-tester",
    about = "Scripted reorder scenarios against the simulated host",
    version
)]
pub struct Cli {
    /// Logging controls.
    #[command(flatten)]
    pub log: LogArgs,

    /// Which scenario to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level tester commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one move against a host accepting the given techniques.
    Move(MoveArgs),
    /// Drive a host that ignores everything and watch escalation exhaust.
    Exhaust(ExhaustArgs),
    /// Resolve a menu selection (top, end, after:<name>) into a move.
    Menu(MenuArgs),
    /// Run every technique/strategy pairing and print the acceptance
    /// matrix.
    Matrix(MatrixArgs),
}

/// Technique names accepted on the command line.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum TechniqueArg {
    /// Private drag-end hook.
    Hook,
    /// State-store dispatch.
    Store,
    /// Pointer-event drag sensor.
    Pointer,
    /// Legacy mouse-event drag sensor.
    Mouse,
    /// Native drag-and-drop protocol.
    Dnd,
    /// Accessible keyboard path.
    Keyboard,
}

impl TechniqueArg {
    /// Map to the simulated host's technique.
    pub fn into_technique(self) -> Technique {
        match self {
            Self::Hook => Technique::Hook,
            Self::Store => Technique::Store,
            Self::Pointer => Technique::Pointer,
            Self::Mouse => Technique::Mouse,
            Self::Dnd => Technique::NativeDnd,
            Self::Keyboard => Technique::Keyboard,
        }
    }
}

/// Arguments for the `move` subcommand.
#[derive(Args, Debug, Clone)]
pub struct MoveArgs {
    /// Comma-separated item names for the simulated list.
    #[arg(long, value_delimiter = ',', default_value = "A,B,C,D,E")]
    pub items: Vec<String>,

    /// Source index in the current visual order.
    #[arg(long)]
    pub from: usize,

    /// Destination index; the source lands immediately before it.
    #[arg(long)]
    pub to: usize,

    /// Techniques the simulated host accepts.
    #[arg(long, value_delimiter = ',', value_enum, default_value = "hook")]
    pub accept: Vec<TechniqueArg>,

    /// Verification bound override, e.g. "500ms".
    #[arg(long, value_parser = humantime::parse_duration, value_name = "DURATION")]
    pub verify: Option<Duration>,
}

/// Arguments for the `exhaust` subcommand.
#[derive(Args, Debug, Clone)]
pub struct ExhaustArgs {
    /// Comma-separated item names for the simulated list.
    #[arg(long, value_delimiter = ',', default_value = "A,B,C")]
    pub items: Vec<String>,

    /// Source index.
    #[arg(long, default_value_t = 0)]
    pub from: usize,

    /// Destination index.
    #[arg(long, default_value_t = 2)]
    pub to: usize,

    /// Keep the visual-splice fallback in the stack (the run then ends
    /// visually reordered instead of exhausted).
    #[arg(long)]
    pub keep_splice: bool,
}

/// Arguments for the `menu` subcommand.
#[derive(Args, Debug, Clone)]
pub struct MenuArgs {
    /// Comma-separated item names for the simulated list.
    #[arg(long, value_delimiter = ',', default_value = "A,B,C,D,E")]
    pub items: Vec<String>,

    /// Display name of the item to move.
    #[arg(long)]
    pub source: String,

    /// Selection: "top", "end", or "after:<name>".
    #[arg(long)]
    pub selection: String,
}

/// Arguments for the `matrix` subcommand.
#[derive(Args, Debug, Clone)]
pub struct MatrixArgs {
    /// Comma-separated item names for the simulated list.
    #[arg(long, value_delimiter = ',', default_value = "A,B,C,D,E")]
    pub items: Vec<String>,

    /// Source index used for every pairing.
    #[arg(long, default_value_t = 0)]
    pub from: usize,

    /// Destination index used for every pairing.
    #[arg(long, default_value_t = 3)]
    pub to: usize,
}
