// Entry point for the `traverse` command-line front end.

use clap::Parser;
use std::sync::Arc;
use traverse_cli::{cli::Cli, tasks};
use traverse_common::TerminalEmitter;
use traverse_core::{RunOptions, RunnerGraph, TaskRegistry};
use traverse_sdk::args_from_str;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let mut registry = TaskRegistry::new();
    tasks::register_all(&mut registry);

    let Some(spec) = registry.find(&cli.task).copied() else {
        tracing::error!("unknown task type '{}'", cli.task);
        std::process::exit(2);
    };

    let args = match args_from_str(&cli.args) {
        Ok(args) => args,
        Err(err) => {
            tracing::error!("invalid --args: {err}");
            std::process::exit(2);
        }
    };

    let mut graph = RunnerGraph::new();
    graph.add_by_spec(spec, args);

    let emitter: Arc<dyn traverse_sdk::Emitter> =
        Arc::new(TerminalEmitter::new(Box::new(std::io::stdout()), !cli.no_color, true));

    let opts = RunOptions {
        random_order: cli.random_order,
        config_filepath: cli.config.clone(),
        emitters: vec![emitter],
        debug: cli.debug,
        failfast: cli.failfast,
        rerun_failures: cli.rerun_failures,
        between_tasks: None,
    };

    let success = graph.run(opts);
    std::process::exit(if success { 0 } else { 1 });
}
