//! GPU 模块
//!
//! 此模块包含 GPU 仿真对象与 trace 指令解析。

// 子模块声明
mod gpu;
mod instruction;

// 重新导出公共接口
pub use gpu::Gpu;
pub use instruction::{Instruction, InstructionKind, TraceError};
