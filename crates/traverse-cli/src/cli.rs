use clap::Parser;
use std::path::PathBuf;

/// Run a registered task and everything it depends on.
#[derive(Parser, Debug)]
#[command(name = "traverse", version, about)]
pub struct Cli {
    /// Fully-qualified type name of the task to run, e.g.
    /// `traverse_cli.tasks.RunSuite`.
    pub task: String,

    /// Arguments for the task, `k1=v1,k2=v2`. Values follow the same
    /// literal syntax as task identity strings: quoted strings, bare
    /// numerics, true/false/null.
    #[arg(long, default_value = "")]
    pub args: String,

    /// JSON config file applied to every task before it runs.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Reserved for a future interactive post-mortem step.
    #[arg(long)]
    pub debug: bool,

    /// Stop scheduling further tasks after the first non-success status.
    #[arg(long)]
    pub failfast: bool,

    /// Re-run any task that didn't reach SKIP/SUCCESS, once, after the
    /// first full pass completes.
    #[arg(long)]
    pub rerun_failures: bool,

    /// Shuffle among tasks with no ordering dependency on each other.
    #[arg(long)]
    pub random_order: bool,

    /// Suppress ANSI color in terminal output.
    #[arg(long)]
    pub no_color: bool,
}
