//! 仿真引擎
//!
//! 定义事件驱动仿真引擎，维护当前时间、事件队列与对象注册表。

use super::error::SimError;
use super::event::Event;
use super::object::{ObjectId, SimObject};
use super::scheduled_event::ScheduledEvent;
use super::time::SimTime;
use std::collections::{BinaryHeap, HashMap};
use tracing::{debug, info, trace};

/// 事件驱动仿真引擎：维护当前时间、事件队列与对象注册表。
///
/// 注册表在组装阶段填充，`run()` 期间不再增删对象。
#[derive(Default)]
pub struct Engine {
    now: SimTime,
    next_seq: u64,
    q: BinaryHeap<ScheduledEvent>,
    registry: HashMap<ObjectId, Option<Box<dyn SimObject>>>,
}

impl Engine {
    /// 获取当前仿真时间
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// 当前队列中待派发的事件数
    pub fn queue_len(&self) -> usize {
        self.q.len()
    }

    /// 查看下一个将被派发的事件（不弹出）
    pub fn peek(&self) -> Option<&Event> {
        self.q.peek().map(|item| &item.ev)
    }

    /// 注册对象。标识符冲突视为接线错误。
    pub fn register(&mut self, id: ObjectId, obj: Box<dyn SimObject>) -> Result<(), SimError> {
        if self.registry.contains_key(&id) {
            return Err(SimError::DuplicateRegistration(id));
        }
        debug!(id = ?id, "注册对象");
        self.registry.insert(id, Some(obj));
        Ok(())
    }

    /// 调度事件在其时间戳执行。此处不校验 target，留到派发时检查。
    #[tracing::instrument(skip(self, ev), fields(kind = ?ev.kind(), target = ?ev.target, at = ?ev.at))]
    pub fn schedule(&mut self, ev: Event) {
        let seq = self.next_seq;
        trace!(now = ?self.now, seq, "调度事件");

        self.next_seq = self.next_seq.wrapping_add(1);
        self.q.push(ScheduledEvent { at: ev.at, seq, ev });

        debug!(queue_size = self.q.len(), "事件已加入队列");
    }

    /// 派发单个事件给注册对象处理。
    fn dispatch(&mut self, ev: Event) -> Result<(), SimError> {
        let target = ev.target;

        // 暂时把对象取出来，避免 &mut self 与 &mut obj 的重叠借用。
        let mut obj = self
            .registry
            .get_mut(&target)
            .and_then(Option::take)
            .ok_or(SimError::UnknownTarget(target))?;

        let res = obj.handle_event(ev, self);

        trace!(target = ?target, "对象处理完成，放回注册表");
        self.registry.insert(target, Some(obj));
        res
    }

    /// 运行所有事件直到队列为空。队列耗尽是唯一的终止条件。
    #[tracing::instrument(skip(self))]
    pub fn run(&mut self) -> Result<(), SimError> {
        info!("▶️  开始运行仿真");
        debug!(now = ?self.now, queue_size = self.q.len(), "初始状态");

        let mut event_count = 0u64;
        while let Some(item) = self.q.pop() {
            event_count += 1;
            self.now = item.at;

            debug!(
                event_num = event_count,
                now = ?self.now,
                seq = item.seq,
                kind = ?item.ev.kind(),
                target = ?item.ev.target,
                remaining_queue = self.q.len(),
                "派发事件"
            );

            self.dispatch(item.ev)?;
        }

        info!(
            total_events = event_count,
            final_time = ?self.now,
            "✅ 仿真完成"
        );
        Ok(())
    }

    /// 按标识符读取已注册对象（用于运行结束后收集结果）。
    pub fn object(&self, id: ObjectId) -> Option<&dyn SimObject> {
        self.registry.get(&id).and_then(|slot| slot.as_deref())
    }

    #[cfg(test)]
    pub(crate) fn set_now(&mut self, at: SimTime) {
        self.now = at;
    }

    #[cfg(test)]
    pub(crate) fn pop_next(&mut self) -> Option<Event> {
        self.q.pop().map(|item| item.ev)
    }
}
