//! 引擎错误
//!
//! 定义仿真引擎与事件协议的致命错误。全部视为接线或协议缺陷，
//! 立即上抛，不重试。

use super::event::EventKind;
use super::object::ObjectId;
use thiserror::Error;

/// 引擎/协议错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SimError {
    /// 同一标识符被注册两次
    #[error("object id {0:?} already registered")]
    DuplicateRegistration(ObjectId),

    /// 事件目标没有对应的注册对象
    #[error("no object registered for target id {0:?}")]
    UnknownTarget(ObjectId),

    /// 对象收到了自己不认识的事件种类
    #[error("object {target:?} cannot handle {kind:?} event")]
    UnhandledEventType { target: ObjectId, kind: EventKind },
}
