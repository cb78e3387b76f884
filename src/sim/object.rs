//! 仿真对象
//!
//! 定义可注册到引擎的对象接口与其标识符。

use super::engine::Engine;
use super::error::SimError;
use super::event::Event;
use std::any::Any;

/// 对象标识符。按约定 GPU 占用 `0..num_gpus`，网络占用 `num_gpus`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(pub usize);

/// 仿真对象：可接收并处理事件。
///
/// 处理过程中对象已被临时移出注册表，可以安全地通过 `engine`
/// 调度后续事件。收到不认识的事件种类应返回
/// [`SimError::UnhandledEventType`]。
pub trait SimObject: Any {
    /// 处理一个派发给本对象的事件
    fn handle_event(&mut self, ev: Event, engine: &mut Engine) -> Result<(), SimError>;

    /// 向下转型支持（用于运行结束后读取结果）
    fn as_any(&self) -> &dyn Any;

    /// 向下转型支持（可变）
    fn as_any_mut(&mut self) -> &mut dyn Any;
}
