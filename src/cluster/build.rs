//! Cluster wiring.
//!
//! Assembles the engine from a parsed config and trace input: the
//! network object at id `num_gpus`, one GPU per id in `0..num_gpus`,
//! each GPU started once before the engine runs.

use super::config::SystemConfig;
use crate::gpu::{Gpu, TraceError};
use crate::net::{Network, Topology};
use crate::sim::{Engine, ObjectId, SimError};
use thiserror::Error;
use tracing::{debug, info};

/// Trace input: one line list shared by every GPU, or one list per GPU.
#[derive(Debug, Clone)]
pub enum TraceSource {
    Shared(Vec<String>),
    PerGpu(Vec<Vec<String>>),
}

/// Errors raised while assembling the cluster.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Trace(#[from] TraceError),

    #[error(transparent)]
    Sim(#[from] SimError),

    #[error("expected {expected} trace file(s), got {got}")]
    TraceCount { expected: usize, got: usize },
}

/// Turn the trace files the caller read into a [`TraceSource`]
/// matching the config's `shared_trace` mode: one file shared by all
/// GPUs, or exactly one file per GPU.
pub fn trace_source_from_files(
    config: &SystemConfig,
    mut files: Vec<Vec<String>>,
) -> Result<TraceSource, BuildError> {
    if config.shared_trace {
        if files.len() != 1 {
            return Err(BuildError::TraceCount {
                expected: 1,
                got: files.len(),
            });
        }
        Ok(TraceSource::Shared(files.remove(0)))
    } else {
        if files.len() != config.num_gpus {
            return Err(BuildError::TraceCount {
                expected: config.num_gpus,
                got: files.len(),
            });
        }
        Ok(TraceSource::PerGpu(files))
    }
}

/// Build the engine: register the network and the GPUs, prime every
/// GPU's queues. The returned engine is ready to `run()`.
pub fn build_cluster(config: &SystemConfig, traces: &TraceSource) -> Result<Engine, BuildError> {
    if let TraceSource::PerGpu(per_gpu) = traces {
        if per_gpu.len() != config.num_gpus {
            return Err(BuildError::TraceCount {
                expected: config.num_gpus,
                got: per_gpu.len(),
            });
        }
    }

    let topology = Topology::parse(&config.topology);
    info!(
        num_gpus = config.num_gpus,
        bandwidth_gbps = config.network_bandwidth_gbps,
        compute_tflops = config.compute_tflops,
        topology = topology.label(),
        shared_trace = config.shared_trace,
        "assembling cluster"
    );

    let mut engine = Engine::default();

    let network_id = ObjectId(config.num_gpus);
    let network = Network::new(network_id, config.num_gpus, config.network_bandwidth_gbps, topology);
    engine.register(network_id, Box::new(network))?;

    for gpu_idx in 0..config.num_gpus {
        let lines = match traces {
            TraceSource::Shared(lines) => lines,
            TraceSource::PerGpu(per_gpu) => &per_gpu[gpu_idx],
        };
        let id = ObjectId(gpu_idx);
        let mut gpu = Gpu::new(
            id,
            lines,
            config.compute_tflops,
            config.chunk_size_bytes,
            network_id,
        )?;
        debug!(gpu = ?id, trace_lines = lines.len(), "starting gpu");
        gpu.start(&mut engine);
        engine.register(id, Box::new(gpu))?;
    }

    Ok(engine)
}
