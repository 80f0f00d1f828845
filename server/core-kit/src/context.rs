use tracing::{debug, info};

use crate::{
    config::{ExtractionMode, GestureConfig},
    error::GestureError,
    extract::{extract_delayed_gestures, extract_gestures},
    frame::Frame,
    gesture::GestureRecord,
    jitter::JitterFilter,
    memory::GestureMemory,
    pointer::extract_mouse,
};

/// 单个设备的处理上下文
///
/// 持有配置、滤波器、记忆和上一帧，每帧调用一次 [`DeviceContext::process`]，
/// 不同设备之间互不影响
#[derive(Debug)]
pub struct DeviceContext {
    config: GestureConfig,
    filter: JitterFilter,
    mem: GestureMemory,
    /// 上一帧（已平滑）
    prev: Frame,
}

impl DeviceContext {
    pub fn new(config: GestureConfig) -> Result<Self, GestureError> {
        config.validate()?;
        info!(
            "Device context created, mode: {:?}, max identities: {}",
            config.mode, config.max_identities
        );
        Ok(Self {
            filter: JitterFilter::new(config.max_identities, config.jitter_reset_dist2),
            mem: GestureMemory::new(config.max_identities, config.tap_timeout_ms),
            prev: Frame::default(),
            config,
        })
    }

    pub fn memory(&self) -> &GestureMemory {
        &self.mem
    }

    /// 处理一帧原始数据
    pub fn process(&mut self, frame: Frame) -> GestureRecord {
        let frame = frame.sanitize(self.config.max_identities);
        let smoothed = self.filter.filter_frame(&frame);
        self.mem.refresh(&self.config, &smoothed, &self.prev);

        let record = match self.config.mode {
            ExtractionMode::Gestures => {
                extract_gestures(&self.config, &mut self.mem, &smoothed, &self.prev)
            },
            ExtractionMode::SimplePointer => extract_mouse(&mut self.mem, &smoothed),
        };

        self.prev = smoothed;
        record
    }

    /// 待处理轻点的到期时间，单指模式下没有轻点
    pub fn tap_deadline(&self) -> Option<u64> {
        match self.config.mode {
            ExtractionMode::Gestures => self.mem.tap_deadline(),
            ExtractionMode::SimplePointer => None,
        }
    }

    /// 轻点等待结束后调用
    pub fn process_delayed(&mut self) -> GestureRecord {
        extract_delayed_gestures(&self.config, &mut self.mem, &self.prev)
    }

    /// 到期时执行延迟提取，宿主在处理新帧之前先调用
    pub fn poll_timers(&mut self, now_ms: u64) -> Option<GestureRecord> {
        let deadline = self.tap_deadline()?;
        if now_ms < deadline {
            return None;
        }
        debug!("Tap timer expired at {} (deadline {})", now_ms, deadline);
        Some(self.process_delayed())
    }

    pub fn reset(&mut self) {
        self.filter.reset();
        self.mem = GestureMemory::new(self.config.max_identities, self.config.tap_timeout_ms);
        self.prev = Frame::default();
        debug!("Device context reset");
    }
}
