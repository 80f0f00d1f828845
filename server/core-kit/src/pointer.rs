use tracing::trace;

use crate::{
    frame::Frame,
    gesture::{Buttons, GestureRecord, GestureType},
    memory::GestureMemory,
};

/// 单指模拟鼠标
///
/// 单指按下时按下左键并开始跟踪该手指，跟踪期间输出位置，
/// 该手指抬起时松开左键。其他手指全部忽略。
pub fn extract_mouse(mem: &mut GestureMemory, frame: &Frame) -> GestureRecord {
    let mut record = GestureRecord::default();
    record.same_fingers = mem.same_fingers;

    match mem.tracking_id {
        None => {
            // 等待左键按下
            if let [finger] = frame.fingers.as_slice() {
                mem.tracking_id = Some(finger.tracking_id);
                record.pos_x = finger.position_x;
                record.pos_y = finger.position_y;
                record.button_mask = Buttons::LEFT;
                record.button_data = Buttons::LEFT;
                record.gesture_type |= GestureType::BUTTON;
                mem.button_data = Buttons::LEFT;
            }
        },
        Some(tracking_id) => {
            match frame.fingers.iter().find(|f| f.tracking_id == tracking_id) {
                Some(finger) => {
                    record.pos_x = finger.position_x;
                    record.pos_y = finger.position_y;
                    record.gesture_type |= GestureType::MOVE;
                },
                None => {
                    // 跟踪的手指抬起，松开左键
                    mem.tracking_id = None;
                    record.button_mask = Buttons::LEFT;
                    record.gesture_type |= GestureType::BUTTON;
                    mem.button_data = Buttons::empty();
                },
            }
        },
    }

    trace!("Mouse record: {:?}", record);
    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::FingerSample;

    fn frame(fingers: &[(i32, i32, i32)]) -> Frame {
        Frame::new(
            0,
            0,
            fingers
                .iter()
                .map(|(id, x, y)| FingerSample::new(*id, *x, *y, 0))
                .collect(),
        )
    }

    #[test]
    fn press_move_release() {
        let mut mem = GestureMemory::new(10, 200);

        let record = extract_mouse(&mut mem, &frame(&[(2, 10, 20)]));
        assert_eq!(record.gesture_type, GestureType::BUTTON);
        assert_eq!(record.button_data, Buttons::LEFT);
        assert_eq!((record.pos_x, record.pos_y), (10, 20));
        assert_eq!(mem.tracking_id, Some(2));

        // 第二根手指不影响跟踪
        let record = extract_mouse(&mut mem, &frame(&[(5, 0, 0), (2, 15, 25)]));
        assert_eq!(record.gesture_type, GestureType::MOVE);
        assert_eq!((record.pos_x, record.pos_y), (15, 25));

        let record = extract_mouse(&mut mem, &frame(&[(5, 0, 0)]));
        assert_eq!(record.gesture_type, GestureType::BUTTON);
        assert_eq!(record.button_mask, Buttons::LEFT);
        assert!(record.button_data.is_empty());
        assert_eq!(mem.tracking_id, None);
    }

    #[test]
    fn multi_finger_touch_is_ignored() {
        let mut mem = GestureMemory::new(10, 200);
        let record = extract_mouse(&mut mem, &frame(&[(0, 1, 1), (1, 2, 2)]));
        assert!(record.is_empty());
        assert_eq!(mem.tracking_id, None);
    }
}
