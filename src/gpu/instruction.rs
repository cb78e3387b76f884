//! Trace instruction parsing.

use crate::sim::SimTime;
use thiserror::Error;

/// Errors raised while parsing a GPU trace. Both abort simulation
/// setup: a broken trace never reaches the engine.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TraceError {
    #[error("malformed trace line `{line}`: {reason}")]
    MalformedTrace { line: String, reason: String },

    #[error("unknown instruction kind: {0}")]
    UnknownInstructionKind(String),
}

/// What a trace instruction asks the GPU to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstructionKind {
    Compute,
    Communication,
}

impl InstructionKind {
    pub fn parse(raw: &str) -> Result<Self, TraceError> {
        match raw.trim().to_uppercase().as_str() {
            "COMPUTE" => Ok(Self::Compute),
            "COMMUNICATION" => Ok(Self::Communication),
            other => Err(TraceError::UnknownInstructionKind(other.to_string())),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Compute => "COMPUTE",
            Self::Communication => "COMMUNICATION",
        }
    }
}

/// One unit of trace work: a compute step or a communication step.
///
/// `size` is FLOPs for compute and bytes for communication. The two
/// timestamps default to zero and are each set exactly once by the
/// owning GPU, when the instruction starts and when it completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub kind: InstructionKind,
    pub source: String,
    /// Empty means "all peers".
    pub destination: String,
    pub size: u64,
    pub operation: String,
    pub start_time_ns: SimTime,
    pub end_time_ns: SimTime,
}

impl Instruction {
    /// Parse one `TYPE, SOURCE, DESTINATION, SIZE, OPERATION` trace
    /// line. Fields are trimmed; the destination may be empty.
    pub fn parse(line: &str) -> Result<Self, TraceError> {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        let &[kind, source, destination, size, operation] = fields.as_slice() else {
            return Err(TraceError::MalformedTrace {
                line: line.to_string(),
                reason: format!("expected 5 fields, got {}", fields.len()),
            });
        };
        let size: u64 = size.parse().map_err(|_| TraceError::MalformedTrace {
            line: line.to_string(),
            reason: format!("size is not a non-negative integer: `{size}`"),
        })?;
        Ok(Self {
            kind: InstructionKind::parse(kind)?,
            source: source.to_string(),
            destination: destination.to_string(),
            size,
            operation: operation.to_string(),
            start_time_ns: SimTime::ZERO,
            end_time_ns: SimTime::ZERO,
        })
    }
}
