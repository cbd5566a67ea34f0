// traverse: command-line front end over traverse-core. Wires a TaskRegistry,
// CLI args, and the configured emitters into a single RunnerGraph::run call.

pub mod cli;
pub mod tasks;
