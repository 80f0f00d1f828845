//! 手势提取
//!
//! 每次调用都从空记录开始，根据当前帧和记忆生成手势记录并更新记忆。
//! 上一帧的保存由 [`DeviceContext`](crate::context::DeviceContext) 负责。

use tracing::trace;

use crate::{
    config::GestureConfig,
    frame::Frame,
    gesture::{Buttons, GestureRecord, GestureType},
    memory::GestureMemory,
};

/// 手指相对质心的位置和累计位移
struct Contact {
    xp: f32,
    yp: f32,
    xm: f32,
    ym: f32,
}

/// 提取一帧的手势
pub fn extract_gestures(
    config: &GestureConfig,
    mem: &mut GestureMemory,
    frame: &Frame,
    prev: &Frame,
) -> GestureRecord {
    let mut record = GestureRecord::default();
    (record.pos_x, record.pos_y) = frame.first_position();
    record.same_fingers = mem.same_fingers;

    extract_buttons(&mut record, config, mem, frame, prev);
    extract_movement(&mut record, config, mem, frame);

    trace!("Gesture record: {:?}", record);
    record
}

/// 轻点等待结束后由宿主调用，判定轻点的手指数
pub fn extract_delayed_gestures(
    config: &GestureConfig,
    mem: &mut GestureMemory,
    frame: &Frame,
) -> GestureRecord {
    let mut record = GestureRecord::default();
    if !mem.wait {
        return record;
    }
    mem.wait = false;
    (record.pos_x, record.pos_y) = frame.first_position();

    // 最后一次按下早于最后一次抬起，说明轻点已经完成
    if mem.tap_down_ms < mem.tap_up_ms {
        record.tap_mask = config
            .button_for_pointing(mem.max_tap)
            .map(|button| button.mask())
            .unwrap_or_default();
    }
    if !record.tap_mask.is_empty() {
        record.gesture_type |= GestureType::TAP;
        record.tap_count = mem.tap_count;
    }

    trace!("Delayed gesture record: {:?}", record);
    record
}

/// 按键手势
///
/// 硬件按键变化优先；没有变化时根据轻点序列合成左键（轻点后拖动）
fn extract_buttons(
    record: &mut GestureRecord,
    config: &GestureConfig,
    mem: &mut GestureMemory,
    frame: &Frame,
    prev: &Frame,
) {
    let hardware = Buttons::from_hardware(frame.button);
    let npoint = mem.npoint();

    // 触摸板按下时由手指数决定是哪个键
    let mut btdata = hardware;
    if hardware == Buttons::LEFT {
        if let Some(button) = config.button_for_pointing(npoint) {
            btdata = button.mask();
        }
    }

    if hardware != Buttons::from_hardware(prev.button) {
        record.button_mask = btdata ^ mem.button_data;
        record.button_data = btdata;
        mem.button_data = btdata;
        mem.tap_button = false;
    } else if hardware.is_empty() && (mem.tap_count > 0 || mem.tap_button) {
        let synthetic = if mem.tap_count == 1 && mem.max_tap == 1 && npoint == 1 {
            Buttons::LEFT
        } else {
            Buttons::empty()
        };
        record.button_mask = synthetic ^ mem.button_data;
        record.button_data = synthetic;
        mem.button_data = synthetic;
        mem.tap_button = !synthetic.is_empty();
    }

    if !record.button_mask.is_empty() {
        mem.delay_movement(frame.time_ms, config.button_hold_ms);
        record.gesture_type |= GestureType::BUTTON;
    }
}

/// 移动、滚动、滑动、缩放和旋转
///
/// 只有所有手指都更新了位移才输出，累计位移在使用后清零
fn extract_movement(
    record: &mut GestureRecord,
    config: &GestureConfig,
    mem: &mut GestureMemory,
    frame: &Frame,
) {
    let npoint = mem.npoint();
    let nmove = mem.nmove();
    if nmove == 0 || nmove != npoint {
        return;
    }

    let mut contacts = Vec::with_capacity(nmove);
    let (mut xpos, mut ypos) = (0.0f32, 0.0f32);
    let (mut xmove, mut ymove) = (0.0f32, 0.0f32);
    for id in mem.moving {
        let Some(finger) = frame.find(id) else {
            continue;
        };
        let (dx, dy) = mem.take_delta(id);
        let contact = Contact {
            xp: finger.position_x as f32,
            yp: finger.position_y as f32,
            xm: dx as f32,
            ym: dy as f32,
        };
        xpos += contact.xp;
        ypos += contact.yp;
        xmove += contact.xm;
        ymove += contact.ym;
        contacts.push(contact);
    }
    let n = nmove as f32;
    xpos /= n;
    ypos /= n;
    xmove /= n;
    ymove /= n;
    let distance = xmove.hypot(ymove);
    let all_thumbs = mem.moving.is_subset(mem.thumb);

    if nmove == 1 {
        if all_thumbs {
            mem.skip_movement(frame.time_ms, config.thumb_ms);
            return;
        }
        record.dx = xmove as i32;
        record.dy = ymove as i32;
        if record.dx != 0 || record.dy != 0 {
            record.gesture_type |= GestureType::MOVE;
        }
        return;
    }

    let (mut rad2, mut scale, mut rot) = (0.0f32, 0.0f32, 0.0f32);
    for contact in &contacts {
        let xp = contact.xp - xpos;
        let yp = contact.yp - ypos;
        rad2 += xp * xp + yp * yp;
        scale += xp * contact.xm + yp * contact.ym;
        rot += xp * contact.ym - yp * contact.xm;
    }
    rad2 /= n;
    let rad = rad2.sqrt();
    // 所有手指重合时没有旋转和缩放
    if rad > 0.0 {
        scale = scale / n / rad;
        rot = rot / n / rad;
    } else {
        scale = 0.0;
        rot = 0.0;
    }

    if rot.abs() > distance && rot.abs() > scale.abs() {
        record.rotation = rot;
        record.gesture_type |= GestureType::ROTATE;
    } else if scale.abs() > distance {
        record.scale = scale;
        record.gesture_type |= GestureType::SCALE;
    } else {
        if all_thumbs {
            mem.skip_movement(frame.time_ms, config.thumb_ms);
            return;
        }
        record.dx = xmove as i32;
        record.dy = ymove as i32;
        let horizontal = record.dx.abs() > record.dy.abs();
        let vertical = record.dy.abs() > record.dx.abs();
        let gesture = match (nmove, horizontal, vertical) {
            (2, true, _) => GestureType::HSCROLL,
            (2, _, true) => GestureType::VSCROLL,
            (3, true, _) => GestureType::HSWIPE,
            (3, _, true) => GestureType::VSWIPE,
            (4, true, _) => GestureType::HSWIPE4,
            (4, _, true) => GestureType::VSWIPE4,
            _ => GestureType::empty(),
        };
        record.gesture_type |= gesture;
    }
}
