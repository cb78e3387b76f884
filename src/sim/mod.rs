//! 仿真核心模块
//!
//! 此模块包含事件驱动仿真的核心组件，如仿真时间、事件、对象注册与引擎。

// 子模块声明
mod engine;
mod error;
mod event;
mod object;
mod scheduled_event;
mod time;

// 重新导出公共接口
pub use engine::Engine;
pub use error::SimError;
pub use event::{Event, EventKind, EventPayload};
pub use object::{ObjectId, SimObject};
pub use scheduled_event::ScheduledEvent;
pub use time::SimTime;
