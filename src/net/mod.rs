//! 网络模块
//!
//! 此模块包含网络仿真对象与拓扑标签。

// 子模块声明
mod network;
mod topology;

// 重新导出公共接口
pub use network::Network;
pub use topology::Topology;
