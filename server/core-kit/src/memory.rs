//! 跨帧保存的设备状态
//!
//! 每个设备独占一份，只在该设备的提取调用中修改

use tracing::debug;

use crate::{
    bitset::IdSet,
    config::GestureConfig,
    frame::{FingerSample, Frame},
    gesture::Buttons,
};

#[derive(Debug, Clone, Default)]
pub struct GestureMemory {
    /// 参与按键判定的触控点
    pub pointing: IdSet,
    /// 本帧有位移需要上报的触控点
    pub moving: IdSet,
    /// 被判定为拇指的触控点
    pub thumb: IdSet,
    /// 每个触控点尚未上报的累计位移
    pub dx: Vec<i32>,
    pub dy: Vec<i32>,
    /// 上次上报的按键状态
    pub button_data: Buttons,
    /// 当前按键状态是否由轻点合成
    pub tap_button: bool,
    /// 当前轻点序列的次数
    pub tap_count: u32,
    /// 轻点窗口内同时接触的最多手指数
    pub max_tap: usize,
    /// 最近一次全部按下、全部抬起的时间
    pub tap_down_ms: u64,
    pub tap_up_ms: u64,
    /// 等待延迟提取轻点
    pub wait: bool,
    /// 在该时间之前忽略移动（按键变化）
    pub hold_until_ms: u64,
    /// 在该时间之前忽略移动（拇指）
    pub skip_until_ms: u64,
    pub same_fingers: bool,
    /// 单指模式正在跟踪的触控点
    pub tracking_id: Option<i32>,
    tap_timeout_ms: u64,
}

impl GestureMemory {
    pub fn new(max_identities: usize, tap_timeout_ms: u64) -> Self {
        Self {
            dx: vec![0; max_identities],
            dy: vec![0; max_identities],
            tap_timeout_ms,
            ..Default::default()
        }
    }

    pub fn npoint(&self) -> usize {
        self.pointing.len()
    }

    pub fn nmove(&self) -> usize {
        self.moving.len()
    }

    /// 轻点等待结束的时间，没有待处理的轻点时为 None
    pub fn tap_deadline(&self) -> Option<u64> {
        self.wait
            .then(|| self.tap_up_ms.saturating_add(self.tap_timeout_ms))
    }

    /// 按键变化后一段时间内屏蔽移动，新的变化会重新计时
    pub fn delay_movement(&mut self, now_ms: u64, hold_ms: u64) {
        self.hold_until_ms = now_ms.saturating_add(hold_ms);
        debug!("Movement held until {}", self.hold_until_ms);
    }

    /// 拇指移动时一段时间内不输出移动
    pub fn skip_movement(&mut self, now_ms: u64, skip_ms: u64) {
        self.skip_until_ms = now_ms.saturating_add(skip_ms);
        self.clear_deltas();
        debug!("Movement skipped until {}", self.skip_until_ms);
    }

    pub fn take_delta(&mut self, id: usize) -> (i32, i32) {
        match (self.dx.get_mut(id), self.dy.get_mut(id)) {
            (Some(dx), Some(dy)) => (std::mem::take(dx), std::mem::take(dy)),
            _ => (0, 0),
        }
    }

    fn has_delta(&self, id: usize) -> bool {
        self.dx.get(id).is_some_and(|d| *d != 0) || self.dy.get(id).is_some_and(|d| *d != 0)
    }

    fn clear_deltas(&mut self) {
        self.dx.iter_mut().for_each(|d| *d = 0);
        self.dy.iter_mut().for_each(|d| *d = 0);
    }

    /// 根据当前帧和上一帧刷新记忆，frame 需要先经过 sanitize
    pub fn refresh(&mut self, config: &GestureConfig, frame: &Frame, prev: &Frame) {
        let now = frame.time_ms;
        let active = frame.ids();
        let previous = prev.ids();

        self.same_fingers = !active.is_empty() && active == previous;

        self.pointing = active;
        self.thumb = match config.thumb_pressure {
            Some(threshold) => frame
                .fingers
                .iter()
                .filter(|finger| finger.pressure >= threshold)
                .filter_map(|finger| usize::try_from(finger.tracking_id).ok())
                .collect(),
            None => IdSet::empty(),
        };

        // 抬起的手指不再保留位移
        for id in previous.difference(active) {
            self.take_delta(id);
        }
        for finger in &frame.fingers {
            self.accumulate(finger, prev);
        }

        if now < self.hold_until_ms || now < self.skip_until_ms {
            self.clear_deltas();
        }

        self.moving = self.pointing.iter().filter(|id| self.has_delta(*id)).collect();

        self.update_tapping(now, frame.nfinger(), prev.nfinger());
    }

    fn accumulate(&mut self, finger: &FingerSample, prev: &Frame) {
        let Ok(id) = usize::try_from(finger.tracking_id) else {
            return;
        };
        let Some(last) = prev.find(id) else {
            return;
        };
        if let (Some(dx), Some(dy)) = (self.dx.get_mut(id), self.dy.get_mut(id)) {
            *dx = dx.saturating_add(finger.position_x.saturating_sub(last.position_x));
            *dy = dy.saturating_add(finger.position_y.saturating_sub(last.position_y));
        }
    }

    fn update_tapping(&mut self, now: u64, nfinger: usize, nprev: usize) {
        if nfinger > 0 && nprev == 0 {
            // 到达延迟轻点的截止时间后开始新的轻点序列
            if now.saturating_sub(self.tap_up_ms) >= self.tap_timeout_ms {
                self.tap_count = 0;
                self.max_tap = 0;
            }
            self.tap_down_ms = now;
        }
        self.max_tap = self.max_tap.max(nfinger);
        if nfinger == 0 && nprev > 0 {
            self.tap_up_ms = now;
            if self.tap_up_ms.saturating_sub(self.tap_down_ms) <= self.tap_timeout_ms {
                self.tap_count += 1;
                self.wait = true;
                debug!("Tap {} completed with {} fingers", self.tap_count, self.max_tap);
            } else {
                self.tap_count = 0;
                self.wait = false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(time_ms: u64, fingers: &[(i32, i32, i32)]) -> Frame {
        Frame::new(
            time_ms,
            0,
            fingers
                .iter()
                .map(|(id, x, y)| FingerSample::new(*id, *x, *y, 0))
                .collect(),
        )
    }

    #[test]
    fn moving_follows_deltas() {
        let config = GestureConfig::default();
        let mut mem = GestureMemory::new(config.max_identities, config.tap_timeout_ms);
        let prev = frame(0, &[(0, 10, 10), (1, 50, 50)]);
        let cur = frame(10, &[(0, 12, 10), (1, 50, 50)]);
        mem.refresh(&config, &prev, &Frame::default());
        assert!(!mem.same_fingers);
        mem.refresh(&config, &cur, &prev);
        assert!(mem.same_fingers);
        assert_eq!(mem.npoint(), 2);
        assert_eq!(mem.moving.iter().collect::<Vec<_>>(), vec![0]);
        assert_eq!(mem.take_delta(0), (2, 0));
        assert!(mem.moving.is_subset(mem.pointing));
    }

    #[test]
    fn hold_discards_motion() {
        let config = GestureConfig::default();
        let mut mem = GestureMemory::new(config.max_identities, config.tap_timeout_ms);
        mem.delay_movement(0, 200);
        let prev = frame(100, &[(0, 10, 10)]);
        let cur = frame(150, &[(0, 30, 10)]);
        mem.refresh(&config, &cur, &prev);
        assert!(mem.moving.is_empty());
        let next = frame(200, &[(0, 31, 10)]);
        mem.refresh(&config, &next, &cur);
        assert_eq!(mem.take_delta(0), (1, 0));
    }

    #[test]
    fn lifted_finger_drops_delta() {
        let config = GestureConfig::default();
        let mut mem = GestureMemory::new(config.max_identities, config.tap_timeout_ms);
        let prev = frame(0, &[(3, 0, 0)]);
        mem.refresh(&config, &frame(10, &[(3, 4, 4)]), &prev);
        mem.refresh(&config, &frame(20, &[]), &frame(10, &[(3, 4, 4)]));
        assert_eq!(mem.take_delta(3), (0, 0));
        assert!(mem.pointing.is_empty());
    }

    #[test]
    fn tap_bookkeeping() {
        let config = GestureConfig::default();
        let mut mem = GestureMemory::new(config.max_identities, config.tap_timeout_ms);
        let down = frame(1000, &[(0, 0, 0)]);
        let both = frame(1020, &[(0, 0, 0), (1, 40, 0)]);
        mem.refresh(&config, &down, &Frame::default());
        mem.refresh(&config, &both, &down);
        mem.refresh(&config, &frame(1080, &[]), &both);
        assert_eq!(mem.tap_count, 1);
        assert_eq!(mem.max_tap, 2);
        assert_eq!(mem.tap_deadline(), Some(1080 + config.tap_timeout_ms));

        // 太久的按压不算轻点
        let long = frame(5000, &[(0, 0, 0)]);
        mem.refresh(&config, &long, &Frame::default());
        assert_eq!(mem.tap_count, 0);
        mem.refresh(&config, &frame(5600, &[]), &long);
        assert_eq!(mem.tap_count, 0);
        assert_eq!(mem.tap_deadline(), None);
    }

    #[test]
    fn touch_at_deadline_starts_new_sequence() {
        let config = GestureConfig::default();
        let mut mem = GestureMemory::new(config.max_identities, config.tap_timeout_ms);
        let down = frame(0, &[(0, 0, 0)]);
        mem.refresh(&config, &down, &Frame::default());
        mem.refresh(&config, &frame(50, &[]), &down);
        let deadline = mem.tap_deadline().unwrap();

        let again = frame(deadline, &[(0, 0, 0)]);
        mem.refresh(&config, &again, &Frame::default());
        assert_eq!(mem.tap_count, 0);
        assert_eq!(mem.max_tap, 1);
    }

    #[test]
    fn thumb_by_pressure() {
        let config = GestureConfig {
            thumb_pressure: Some(100),
            ..Default::default()
        };
        let mut mem = GestureMemory::new(config.max_identities, config.tap_timeout_ms);
        let cur = Frame::new(
            0,
            0,
            vec![FingerSample::new(0, 0, 0, 120), FingerSample::new(1, 0, 0, 20)],
        );
        mem.refresh(&config, &cur, &Frame::default());
        assert_eq!(mem.thumb.iter().collect::<Vec<_>>(), vec![0]);
    }
}
