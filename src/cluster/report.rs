//! Run report.
//!
//! Serializable summary of a finished run: per-GPU finished
//! instructions plus the final simulated time.

use crate::gpu::{Gpu, Instruction};
use crate::sim::{Engine, ObjectId};
use serde::{Deserialize, Serialize};

/// One finished instruction as it appears in the run report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstructionRecord {
    pub kind: String,
    pub source: String,
    pub destination: String,
    pub size: u64,
    pub operation: String,
    pub start_time_ns: u64,
    pub end_time_ns: u64,
}

impl From<&Instruction> for InstructionRecord {
    fn from(ins: &Instruction) -> Self {
        Self {
            kind: ins.kind.label().to_string(),
            source: ins.source.clone(),
            destination: ins.destination.clone(),
            size: ins.size,
            operation: ins.operation.clone(),
            start_time_ns: ins.start_time_ns.0,
            end_time_ns: ins.end_time_ns.0,
        }
    }
}

/// Finished instructions of one GPU, in completion order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GpuReport {
    pub gpu: usize,
    pub finished: Vec<InstructionRecord>,
}

impl GpuReport {
    /// Completion time of the GPU's last finished instruction.
    pub fn last_end_ns(&self) -> u64 {
        self.finished
            .iter()
            .map(|record| record.end_time_ns)
            .max()
            .unwrap_or(0)
    }
}

/// Full-cluster run summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterReport {
    pub end_time_ns: u64,
    pub num_gpus: usize,
    pub gpus: Vec<GpuReport>,
}

impl ClusterReport {
    /// Collect per-GPU results after the event queue has drained.
    pub fn collect(engine: &Engine, num_gpus: usize) -> Self {
        let mut gpus = Vec::with_capacity(num_gpus);
        for idx in 0..num_gpus {
            let finished = engine
                .object(ObjectId(idx))
                .and_then(|obj| obj.as_any().downcast_ref::<Gpu>())
                .map(|gpu| gpu.finished().iter().map(InstructionRecord::from).collect())
                .unwrap_or_default();
            gpus.push(GpuReport { gpu: idx, finished });
        }
        Self {
            end_time_ns: engine.now().0,
            num_gpus,
            gpus,
        }
    }
}
