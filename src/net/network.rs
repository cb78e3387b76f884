//! 网络对象
//!
//! 定义网络仿真对象：对每次传输独立计算耗时。
//! 不建模带宽竞争、拓扑路由与链路状态。

use super::topology::Topology;
use crate::gpu::Instruction;
use crate::sim::{Engine, Event, EventPayload, ObjectId, SimError, SimObject, SimTime};
use std::any::Any;
use tracing::{debug, info};

/// 网络对象：无状态的传输耗时模型。
pub struct Network {
    id: ObjectId,
    num_gpus: usize,
    /// 聚合带宽（GB/s）。1 GB/s 即 1 byte/ns。
    bandwidth_gbps: u64,
    topology: Topology,
}

impl Network {
    /// 创建网络对象
    pub fn new(id: ObjectId, num_gpus: usize, bandwidth_gbps: u64, topology: Topology) -> Self {
        Self {
            id,
            num_gpus,
            bandwidth_gbps,
            topology,
        }
    }

    /// 获取网络标识符
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// 集群内 GPU 数量
    pub fn num_gpus(&self) -> usize {
        self.num_gpus
    }

    /// 聚合带宽（GB/s）
    pub fn bandwidth_gbps(&self) -> u64 {
        self.bandwidth_gbps
    }

    /// 拓扑标签（仅信息用途）
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// 计算传输指定字节数所需的时间
    pub(crate) fn transfer_time(&self, bytes: u64) -> SimTime {
        // ceil(bytes / GBps) 纳秒。带宽单位取 GB/s（见 DESIGN.md）。
        if self.bandwidth_gbps == 0 {
            return SimTime(u64::MAX / 4);
        }
        let rate = self.bandwidth_gbps as u128;
        let nanos = ((bytes as u128).saturating_add(rate - 1)) / rate;
        SimTime(nanos.min(u64::MAX as u128) as u64)
    }

    /// 处理通信开始事件：调度对应的完成事件发回源 GPU。
    /// 每次调用相互独立，同一时刻的多个传输互不影响。
    fn on_comm_start(
        &mut self,
        at: SimTime,
        src_gpu: ObjectId,
        size_bytes: u64,
        ins: Instruction,
        engine: &mut Engine,
    ) {
        let duration = self.transfer_time(size_bytes);
        let done_at = at.after(duration);

        info!(
            src = ?src_gpu,
            size_bytes,
            duration = ?duration,
            done_at = ?done_at,
            "📡 传输开始"
        );

        engine.schedule(Event::new(done_at, src_gpu, EventPayload::CommDone { ins }));
    }
}

impl SimObject for Network {
    #[tracing::instrument(skip(self, ev, engine), fields(network = ?self.id, kind = ?ev.kind(), at = ?ev.at))]
    fn handle_event(&mut self, ev: Event, engine: &mut Engine) -> Result<(), SimError> {
        let at = ev.at;
        match ev.payload {
            EventPayload::CommStart {
                src_gpu,
                size_bytes,
                ins,
            } => {
                debug!(src = ?src_gpu, size_bytes, "收到通信开始事件");
                self.on_comm_start(at, src_gpu, size_bytes, ins, engine);
                Ok(())
            }
            other => Err(SimError::UnhandledEventType {
                target: self.id,
                kind: other.kind(),
            }),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
