use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bitset::IdSet;

/// 触控点数据结构
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FingerSample {
    pub tracking_id: i32, // 负数表示无效触控点
    pub position_x: i32,
    pub position_y: i32,
    #[serde(default)]
    pub pressure: u32,
}

impl FingerSample {
    pub fn new(tracking_id: i32, position_x: i32, position_y: i32, pressure: u32) -> Self {
        Self {
            tracking_id,
            position_x,
            position_y,
            pressure,
        }
    }

    /// 在 `0..max_identities` 范围内时返回编号
    pub fn identity(&self, max_identities: usize) -> Option<usize> {
        usize::try_from(self.tracking_id)
            .ok()
            .filter(|id| *id < max_identities)
    }
}

/// 一次采样中所有接触的手指
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    /// 设备给出的时间戳（毫秒）
    #[serde(default)]
    pub time_ms: u64,
    /// 硬件按键位掩码
    #[serde(default)]
    pub button: u32,
    #[serde(default)]
    pub fingers: Vec<FingerSample>,
}

impl Frame {
    pub fn new(time_ms: u64, button: u32, fingers: Vec<FingerSample>) -> Self {
        Self {
            time_ms,
            button,
            fingers,
        }
    }

    /// 去掉编号越界或重复的触控点
    ///
    /// 调用之后，frame 中的每个 tracking_id 都可以直接用作下标
    pub fn sanitize(mut self, max_identities: usize) -> Self {
        let mut seen = IdSet::empty();
        self.fingers.retain(|finger| match finger.identity(max_identities) {
            Some(id) if !seen.contains(id) => {
                seen.insert(id);
                true
            },
            Some(id) => {
                debug!("Duplicate tracking id {} dropped", id);
                false
            },
            None => {
                debug!("Tracking id {} out of range, dropped", finger.tracking_id);
                false
            },
        });
        self
    }

    pub fn nfinger(&self) -> usize {
        self.fingers.len()
    }

    /// 已经 sanitize 过的 frame 才保证编号完整
    pub fn ids(&self) -> IdSet {
        self.fingers
            .iter()
            .filter_map(|finger| usize::try_from(finger.tracking_id).ok())
            .collect()
    }

    pub fn find(&self, id: usize) -> Option<&FingerSample> {
        self.fingers
            .iter()
            .find(|finger| usize::try_from(finger.tracking_id).ok() == Some(id))
    }

    /// 第一个接触点的位置，没有接触时为原点
    pub fn first_position(&self) -> (i32, i32) {
        self.fingers
            .first()
            .map(|finger| (finger.position_x, finger.position_y))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_drops_invalid_ids() {
        let frame = Frame::new(
            0,
            0,
            vec![
                FingerSample::new(-1, 1, 1, 0),
                FingerSample::new(3, 2, 2, 0),
                FingerSample::new(12, 3, 3, 0),
                FingerSample::new(3, 4, 4, 0),
                FingerSample::new(0, 5, 5, 0),
            ],
        )
        .sanitize(10);
        let ids: Vec<i32> = frame.fingers.iter().map(|f| f.tracking_id).collect();
        assert_eq!(ids, vec![3, 0]);
        assert_eq!(frame.ids().iter().collect::<Vec<_>>(), vec![0, 3]);
        assert_eq!(frame.find(3).map(|f| f.position_x), Some(2));
        assert_eq!(frame.first_position(), (2, 2));
    }

    #[test]
    fn parse_json_frame() {
        let frame: Frame = serde_json::from_str(
            r#"{"time_ms": 16, "fingers": [{"tracking_id": 0, "position_x": 100, "position_y": -4}]}"#,
        )
        .unwrap();
        assert_eq!(frame.time_ms, 16);
        assert_eq!(frame.button, 0);
        assert_eq!(frame.fingers[0], FingerSample::new(0, 100, -4, 0));
    }
}
