pub mod anuga_evolve;
pub mod benchmark;
pub mod build_info;
pub mod cli;
pub mod config;
pub mod engine;
pub mod generators;
pub mod logging;
pub mod scenario;
pub mod util;
