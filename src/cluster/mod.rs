//! Cluster assembly and collaborators: input-file reading, system
//! config, wiring, and the run report.

mod build;
mod config;
mod input;
mod report;

pub use build::{build_cluster, trace_source_from_files, BuildError, TraceSource};
pub use config::{ConfigError, SystemConfig};
pub use input::{clean_lines, read_input_lines};
pub use report::{ClusterReport, GpuReport, InstructionRecord};
