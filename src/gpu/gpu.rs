//! GPU 对象
//!
//! 定义 GPU 仿真对象：两条相互独立的指令队列（计算、通信），
//! 各自逐条顺序执行，并在每条指令完成时产生后续事件。

use super::instruction::{Instruction, InstructionKind, TraceError};
use crate::sim::{Engine, Event, EventPayload, ObjectId, SimError, SimObject, SimTime};
use std::any::Any;
use std::collections::VecDeque;
use tracing::{debug, info, trace};

/// GPU 仿真对象
///
/// 每条队列同一时刻至多一条在途指令：`advance_*` 弹出队首并调度
/// 完成事件，对应的完成处理再次调用 `advance_*` 推进队列。
#[derive(Debug)]
pub struct Gpu {
    id: ObjectId,
    network_id: ObjectId,
    /// 计算能力（TFLOPS）
    compute_tflops: u64,
    /// 预留：通信分块大小（bytes），当前不影响计时。
    chunk_size_bytes: u64,
    compute_queue: VecDeque<Instruction>,
    comm_queue: VecDeque<Instruction>,
    /// 已完成指令，按完成顺序追加。
    finished: Vec<Instruction>,
}

impl Gpu {
    /// 从原始 trace 行构造 GPU，并把指令按种类分流到两条队列。
    pub fn new(
        id: ObjectId,
        trace_lines: &[String],
        compute_tflops: u64,
        chunk_size_bytes: u64,
        network_id: ObjectId,
    ) -> Result<Self, TraceError> {
        let mut compute_queue = VecDeque::new();
        let mut comm_queue = VecDeque::new();
        for line in trace_lines {
            let ins = Instruction::parse(line)?;
            match ins.kind {
                InstructionKind::Compute => compute_queue.push_back(ins),
                InstructionKind::Communication => comm_queue.push_back(ins),
            }
        }

        debug!(
            gpu = ?id,
            compute_instructions = compute_queue.len(),
            comm_instructions = comm_queue.len(),
            "GPU 构造完成"
        );

        Ok(Self {
            id,
            network_id,
            compute_tflops,
            chunk_size_bytes,
            compute_queue,
            comm_queue,
            finished: Vec::new(),
        })
    }

    /// 获取 GPU 标识符
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// 获取预留的通信分块大小（bytes）
    pub fn chunk_size_bytes(&self) -> u64 {
        self.chunk_size_bytes
    }

    /// 待执行的计算指令数
    pub fn compute_queue_len(&self) -> usize {
        self.compute_queue.len()
    }

    /// 待执行的通信指令数
    pub fn comm_queue_len(&self) -> usize {
        self.comm_queue.len()
    }

    /// 已完成指令（完成顺序）
    pub fn finished(&self) -> &[Instruction] {
        &self.finished
    }

    #[cfg(test)]
    pub(crate) fn compute_queue(&self) -> &VecDeque<Instruction> {
        &self.compute_queue
    }

    #[cfg(test)]
    pub(crate) fn comm_queue(&self) -> &VecDeque<Instruction> {
        &self.comm_queue
    }

    /// 计算指定 FLOPs 所需的时间
    fn compute_time(&self, flops: u64) -> SimTime {
        // ceil(flops / (tflops*1e12)) 秒 -> 纳秒，即 ceil(flops / (tflops*1e3))
        if self.compute_tflops == 0 {
            return SimTime(u64::MAX / 4);
        }
        let flops_per_ns = (self.compute_tflops as u128).saturating_mul(1_000);
        let nanos = ((flops as u128).saturating_add(flops_per_ns - 1)) / flops_per_ns;
        SimTime(nanos.min(u64::MAX as u128) as u64)
    }

    /// 启动：为两条队列各注入一次首条指令。
    /// 每个 GPU 仅在仿真开始时调用一次。
    pub fn start(&mut self, engine: &mut Engine) {
        info!(gpu = ?self.id, "🚀 GPU 启动");
        self.advance_compute(engine);
        self.advance_comm(engine);
    }

    /// 取出下一条计算指令并调度其完成事件；队列为空则不做任何事。
    pub fn advance_compute(&mut self, engine: &mut Engine) {
        let Some(mut ins) = self.compute_queue.pop_front() else {
            trace!(gpu = ?self.id, "计算队列为空");
            return;
        };

        ins.start_time_ns = engine.now();
        let duration = self.compute_time(ins.size);
        let done_at = engine.now().after(duration);

        debug!(
            gpu = ?self.id,
            flops = ins.size,
            op = %ins.operation,
            duration = ?duration,
            done_at = ?done_at,
            "开始计算指令"
        );

        engine.schedule(Event::new(
            done_at,
            self.id,
            EventPayload::ComputeDone { ins },
        ));
    }

    /// 计算完成：记录结束时间，追加到完成列表，推进计算队列。
    fn on_compute_done(&mut self, at: SimTime, mut ins: Instruction, engine: &mut Engine) {
        ins.end_time_ns = at;
        info!(gpu = ?self.id, end = ?at, op = %ins.operation, "✅ 计算指令完成");
        self.finished.push(ins);
        self.advance_compute(engine);
    }

    /// 取出下一条通信指令并向网络发出传输请求；队列为空则不做任何事。
    pub fn advance_comm(&mut self, engine: &mut Engine) {
        let Some(mut ins) = self.comm_queue.pop_front() else {
            trace!(gpu = ?self.id, "通信队列为空");
            return;
        };

        ins.start_time_ns = engine.now();
        let size_bytes = ins.size;

        debug!(
            gpu = ?self.id,
            size_bytes,
            op = %ins.operation,
            "开始通信指令"
        );

        engine.schedule(Event::new(
            engine.now(),
            self.network_id,
            EventPayload::CommStart {
                src_gpu: self.id,
                size_bytes,
                ins,
            },
        ));
    }

    /// 通信完成：记录结束时间，追加到完成列表，推进通信队列。
    fn on_comm_done(&mut self, at: SimTime, mut ins: Instruction, engine: &mut Engine) {
        ins.end_time_ns = at;
        info!(gpu = ?self.id, end = ?at, op = %ins.operation, "✅ 通信指令完成");
        self.finished.push(ins);
        self.advance_comm(engine);
    }
}

impl SimObject for Gpu {
    #[tracing::instrument(skip(self, ev, engine), fields(gpu = ?self.id, kind = ?ev.kind(), at = ?ev.at))]
    fn handle_event(&mut self, ev: Event, engine: &mut Engine) -> Result<(), SimError> {
        let at = ev.at;
        match ev.payload {
            EventPayload::ComputeDone { ins } => {
                self.on_compute_done(at, ins, engine);
                Ok(())
            }
            EventPayload::CommDone { ins } => {
                self.on_comm_done(at, ins, engine);
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
