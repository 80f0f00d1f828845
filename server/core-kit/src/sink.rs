use anyhow::Result;
use serde::Serialize;
use tracing::info;

use crate::gesture::{Button, GestureRecord, GestureType};

/// 手势记录展开后的指针事件
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PointerEvent {
    ButtonDown { button: Button, x: i32, y: i32 },
    ButtonUp { button: Button, x: i32, y: i32 },
    Motion { x: i32, y: i32, dx: i32, dy: i32 },
    VScroll { dy: i32 },
    HScroll { dx: i32 },
    VSwipe { fingers: u8, dy: i32 },
    HSwipe { fingers: u8, dx: i32 },
    Scale { ratio: f32 },
    Rotate { ratio: f32 },
    Tap { button: Button, count: u32 },
}

/// 接收手势的一方，例如把事件转成系统输入
pub trait EventSink {
    fn emit(&mut self, record: &GestureRecord) -> Result<()>;
}

/// 按固定顺序展开：按键（按位从低到高）、移动、滚动、滑动、缩放、旋转、轻点
pub fn expand(record: &GestureRecord) -> Vec<PointerEvent> {
    let mut events = Vec::new();
    let (x, y) = (record.pos_x, record.pos_y);
    for button in record.button_mask.buttons() {
        events.push(if record.button_data.contains(button.mask()) {
            PointerEvent::ButtonDown { button, x, y }
        } else {
            PointerEvent::ButtonUp { button, x, y }
        });
    }
    let kind = record.gesture_type;
    if kind.contains(GestureType::MOVE) {
        events.push(PointerEvent::Motion {
            x,
            y,
            dx: record.dx,
            dy: record.dy,
        });
    }
    if kind.contains(GestureType::VSCROLL) {
        events.push(PointerEvent::VScroll { dy: record.dy });
    }
    if kind.contains(GestureType::HSCROLL) {
        events.push(PointerEvent::HScroll { dx: record.dx });
    }
    if kind.contains(GestureType::VSWIPE) {
        events.push(PointerEvent::VSwipe {
            fingers: 3,
            dy: record.dy,
        });
    }
    if kind.contains(GestureType::HSWIPE) {
        events.push(PointerEvent::HSwipe {
            fingers: 3,
            dx: record.dx,
        });
    }
    if kind.contains(GestureType::VSWIPE4) {
        events.push(PointerEvent::VSwipe {
            fingers: 4,
            dy: record.dy,
        });
    }
    if kind.contains(GestureType::HSWIPE4) {
        events.push(PointerEvent::HSwipe {
            fingers: 4,
            dx: record.dx,
        });
    }
    if kind.contains(GestureType::SCALE) {
        events.push(PointerEvent::Scale {
            ratio: record.scale,
        });
    }
    if kind.contains(GestureType::ROTATE) {
        events.push(PointerEvent::Rotate {
            ratio: record.rotation,
        });
    }
    for button in record.tap_mask.buttons() {
        events.push(PointerEvent::Tap {
            button,
            count: record.tap_count,
        });
    }
    events
}

/// 只把事件写到日志
#[derive(Debug, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&mut self, record: &GestureRecord) -> Result<()> {
        for event in expand(record) {
            info!("{:?}", event);
        }
        Ok(())
    }
}

/// 收集所有事件，便于回放和测试
#[derive(Debug, Default)]
pub struct CollectSink {
    pub events: Vec<PointerEvent>,
}

impl EventSink for CollectSink {
    fn emit(&mut self, record: &GestureRecord) -> Result<()> {
        self.events.extend(expand(record));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::Buttons;

    #[test]
    fn empty_record_no_events() {
        assert!(expand(&GestureRecord::default()).is_empty());
    }

    #[test]
    fn buttons_before_motion() {
        let record = GestureRecord {
            gesture_type: GestureType::BUTTON | GestureType::MOVE,
            button_mask: Buttons::RIGHT | Buttons::LEFT,
            button_data: Buttons::RIGHT,
            pos_x: 3,
            pos_y: 4,
            dx: 1,
            dy: -1,
            ..Default::default()
        };
        assert_eq!(
            expand(&record),
            vec![
                PointerEvent::ButtonUp {
                    button: Button::Left,
                    x: 3,
                    y: 4
                },
                PointerEvent::ButtonDown {
                    button: Button::Right,
                    x: 3,
                    y: 4
                },
                PointerEvent::Motion {
                    x: 3,
                    y: 4,
                    dx: 1,
                    dy: -1
                },
            ]
        );
    }

    #[test]
    fn tap_events() {
        let record = GestureRecord {
            gesture_type: GestureType::TAP,
            tap_mask: Buttons::MIDDLE,
            tap_count: 2,
            ..Default::default()
        };
        let mut sink = CollectSink::default();
        sink.emit(&record).unwrap();
        assert_eq!(
            sink.events,
            vec![PointerEvent::Tap {
                button: Button::Middle,
                count: 2
            }]
        );
    }
}
