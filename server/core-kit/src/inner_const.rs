/// 拇指接触后静默的时长（毫秒）
pub const FINGER_THUMB_MS: u64 = 600;
/// 按键变化后屏蔽移动的时长（毫秒）
pub const BUTTON_HOLD_MS: u64 = 200;
/// 抬起到判定轻点结束之间的等待时长（毫秒）
pub const TAP_TIMEOUT_MS: u64 = 200;
/// 去抖动滤波的重置距离（距离的平方）
pub const JITTER_RESET_DIST2: i32 = 15;
/// 默认支持的触控点数量
pub const MAX_IDENTITIES: usize = 10;
/// 位掩码能容纳的触控点上限
pub const IDENTITY_LIMIT: usize = 64;
/// 每个触控点保留的历史样本数
pub const HISTORY_LEN: usize = 8;
/// 坐标差在平方前的截断范围
pub const COORD_CLAMP: i32 = 32767;
