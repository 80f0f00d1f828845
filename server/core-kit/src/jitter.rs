//! 坐标去抖动滤波
//!
//! 对每个触控点最近的若干个原始样本做加权平均，越新的样本权重越大。
//! 每输入一个样本就输出一个样本，移动只会变得平滑而不会变慢。
//! 检测到较大的位移时丢弃历史，避免把快速移动也抹平。

use std::collections::VecDeque;

use tracing::debug;

use crate::{
    bitset::IdSet,
    frame::{FingerSample, Frame},
    inner_const::{COORD_CLAMP, HISTORY_LEN},
};

/// 权重表，第 i 行用于 i + 2 个样本，最新的样本在前
///
/// 每行权重之和为 2 的幂，最后一列是它的指数，用右移代替除法
const WEIGHTS: [[u8; HISTORY_LEN + 1]; HISTORY_LEN - 1] = [
    [5, 3, 0, 0, 0, 0, 0, 0, 3],
    [8, 5, 3, 0, 0, 0, 0, 0, 4],
    [6, 4, 3, 3, 0, 0, 0, 0, 4],
    [10, 8, 5, 5, 4, 0, 0, 0, 5],
    [9, 7, 5, 4, 4, 3, 0, 0, 5],
    [9, 6, 5, 4, 3, 3, 2, 0, 5],
    [9, 5, 4, 3, 3, 3, 3, 2, 5],
];

fn clamp15(x: i32) -> i32 {
    x.clamp(-COORD_CLAMP, COORD_CLAMP)
}

/// 位移的平方，两个分量先截断到 15 位以免溢出
pub fn dist2(dx: i32, dy: i32) -> i32 {
    let dx = clamp15(dx);
    let dy = clamp15(dy);
    dx * dx + dy * dy
}

/// 单个触控点的历史样本，最新的在队尾
#[derive(Debug, Default, Clone)]
struct History {
    samples: VecDeque<FingerSample>,
}

impl History {
    fn average(&self, raw: &FingerSample) -> FingerSample {
        let row = &WEIGHTS[self.samples.len() - 2];
        let shift = row[HISTORY_LEN];
        let (mut x, mut y, mut p) = (0i64, 0i64, 0u64);
        for (sample, weight) in self.samples.iter().rev().zip(row.iter()) {
            x += sample.position_x as i64 * *weight as i64;
            y += sample.position_y as i64 * *weight as i64;
            p += sample.pressure as u64 * *weight as u64;
        }
        // 有符号右移向负无穷取整
        FingerSample {
            tracking_id: raw.tracking_id,
            position_x: (x >> shift) as i32,
            position_y: (y >> shift) as i32,
            pressure: (p >> shift) as u32,
        }
    }
}

#[derive(Debug)]
pub struct JitterFilter {
    /// 超过该距离平方即重置历史
    reset_dist2: i32,
    histories: Vec<History>,
    /// 上一帧中出现过的触控点
    prev_present: IdSet,
}

impl JitterFilter {
    pub fn new(max_identities: usize, reset_dist2: i32) -> Self {
        Self {
            reset_dist2,
            histories: vec![History::default(); max_identities],
            prev_present: IdSet::empty(),
        }
    }

    /// 平滑一个原始样本，编号越界时原样返回
    pub fn smooth(&mut self, id: usize, raw: FingerSample) -> FingerSample {
        let Some(history) = self.histories.get_mut(id) else {
            return raw;
        };

        // 移动过快时丢弃历史
        if let Some(prev) = history.samples.back() {
            let dx = raw.position_x.saturating_sub(prev.position_x);
            let dy = raw.position_y.saturating_sub(prev.position_y);
            if dist2(dx, dy) > self.reset_dist2 {
                debug!("Jitter history of finger {} reset, movement exceeds threshold", id);
                history.samples.clear();
            }
        }

        history.samples.push_back(raw);
        if history.samples.len() > HISTORY_LEN {
            history.samples.pop_front();
        }

        // 只有一个样本时无法平均，直接透传
        if history.samples.len() < 2 {
            return raw;
        }
        history.average(&raw)
    }

    /// 清空某个触控点的历史
    pub fn forget(&mut self, id: usize) {
        if let Some(history) = self.histories.get_mut(id) {
            history.samples.clear();
        }
    }

    pub fn reset(&mut self) {
        self.histories.iter_mut().for_each(|h| h.samples.clear());
        self.prev_present = IdSet::empty();
    }

    /// 平滑整帧，frame 需要先经过 sanitize
    pub fn filter_frame(&mut self, frame: &Frame) -> Frame {
        let mut filtered = frame.clone();
        let mut present = IdSet::empty();
        for finger in filtered.fingers.iter_mut() {
            let Some(id) = finger.identity(self.histories.len()) else {
                continue;
            };
            // 上一帧没有出现过的编号可能属于另一根手指
            if !self.prev_present.contains(id) {
                self.forget(id);
            }
            *finger = self.smooth(id, *finger);
            present.insert(id);
        }
        self.prev_present = present;
        filtered
    }
}
