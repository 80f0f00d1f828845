//! 多点触控手势提取
//!
//! 把设备上报的多指触控帧转换成指针和手势事件：移动、滚动、滑动、
//! 缩放、旋转、轻点和按键。处理流程为：
//!
//! 1. [`frame::Frame::sanitize`] 去掉无效的触控点
//! 2. [`jitter::JitterFilter`] 对每个触控点做去抖动
//! 3. [`memory::GestureMemory::refresh`] 更新跨帧状态
//! 4. [`extract::extract_gestures`] 或 [`pointer::extract_mouse`] 生成手势记录
//! 5. 轻点等待结束后由宿主调用 [`extract::extract_delayed_gestures`]
//!
//! [`context::DeviceContext`] 把以上步骤组合在一起，每个设备一份。

pub mod bitset;
pub mod config;
pub mod context;
pub mod error;
pub mod extract;
pub mod frame;
pub mod gesture;
pub mod inner_const;
pub mod jitter;
pub mod logger;
pub mod memory;
pub mod pointer;
pub mod sink;
pub mod trace;
