// Domain layer: core models and ports. No knowledge of SQLite, files or the CLI.

pub mod model;
pub mod ports;
