//! 事件类型
//!
//! 定义仿真事件：带时间戳、目标对象与载荷的不可变记录。

use super::object::ObjectId;
use super::time::SimTime;
use crate::gpu::Instruction;

/// 事件种类标签，用于日志与错误报告。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    ComputeDone,
    CommStart,
    CommDone,
}

/// 事件载荷：封闭的标签枚举，每种事件只携带自己需要的字段。
/// 指令按所有权随事件移动：排队 -> 在途（载荷内）-> 完成列表。
#[derive(Debug)]
pub enum EventPayload {
    /// 计算完成，送回发起的 GPU。
    ComputeDone { ins: Instruction },
    /// 通信开始，送往网络对象。
    CommStart {
        src_gpu: ObjectId,
        size_bytes: u64,
        ins: Instruction,
    },
    /// 通信完成，送回源 GPU。
    CommDone { ins: Instruction },
}

impl EventPayload {
    /// 获取载荷的种类标签
    pub fn kind(&self) -> EventKind {
        match self {
            Self::ComputeDone { .. } => EventKind::ComputeDone,
            Self::CommStart { .. } => EventKind::CommStart,
            Self::CommDone { .. } => EventKind::CommDone,
        }
    }
}

/// 事件：调度后不再变更，由引擎队列持有，弹出后交给目标对象处理。
#[derive(Debug)]
pub struct Event {
    pub at: SimTime,
    pub target: ObjectId,
    pub payload: EventPayload,
}

impl Event {
    /// 创建新事件
    pub fn new(at: SimTime, target: ObjectId, payload: EventPayload) -> Self {
        Self {
            at,
            target,
            payload,
        }
    }

    /// 获取事件种类标签
    pub fn kind(&self) -> EventKind {
        self.payload.kind()
    }
}
