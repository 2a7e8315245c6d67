/// Interfaces Layer - External Entry Points
///
/// ## Modules
/// - `cli`: command-line entry point (stdin frames in, JSON views out)

pub mod cli;
