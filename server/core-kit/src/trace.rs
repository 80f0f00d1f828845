//! 录制帧的回放
//!
//! 每行一个 JSON 格式的 [`Frame`]，空行和 `#` 开头的行会被跳过

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tracing::{debug, info};

use crate::{
    context::DeviceContext, error::GestureError, frame::Frame, gesture::GestureRecord,
    sink::EventSink,
};

pub struct TraceReader<R> {
    lines: Lines<R>,
    line_no: usize,
}

impl<R: AsyncBufRead + Unpin> TraceReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
        }
    }

    /// 读取下一帧，结束时返回 None
    pub async fn next_frame(&mut self) -> Result<Option<Frame>, GestureError> {
        while let Some(line) = self.lines.next_line().await? {
            self.line_no += 1;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let frame = serde_json::from_str(line).map_err(|source| GestureError::TraceParse {
                line: self.line_no,
                source,
            })?;
            return Ok(Some(frame));
        }
        Ok(None)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReplayStats {
    pub frames: usize,
    pub records: usize,
}

/// 把整段录制送入设备上下文
///
/// 每帧之前先按帧时间检查轻点定时器，结束时补发仍在等待的轻点
pub async fn replay<R, S>(
    ctx: &mut DeviceContext,
    mut reader: TraceReader<R>,
    sink: &mut S,
) -> Result<ReplayStats>
where
    R: AsyncBufRead + Unpin,
    S: EventSink + ?Sized,
{
    let mut stats = ReplayStats::default();
    while let Some(frame) = reader.next_frame().await? {
        stats.frames += 1;
        if let Some(record) = ctx.poll_timers(frame.time_ms) {
            stats.records += emit(sink, &record)?;
        }
        let record = ctx.process(frame);
        stats.records += emit(sink, &record)?;
    }

    if let Some(deadline) = ctx.tap_deadline() {
        debug!("Flushing pending tap at {}", deadline);
        if let Some(record) = ctx.poll_timers(deadline) {
            stats.records += emit(sink, &record)?;
        }
    }
    info!("Replay finished: {} frames, {} records", stats.frames, stats.records);
    Ok(stats)
}

fn emit<S: EventSink + ?Sized>(sink: &mut S, record: &GestureRecord) -> Result<usize> {
    if record.gesture_type.is_empty() {
        return Ok(0);
    }
    sink.emit(record)?;
    Ok(1)
}
