use bitflags::bitflags;
use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};

/// 按键编号，数值即在按键位掩码中的位置
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive, Serialize, Deserialize,
)]
#[repr(u8)]
#[serde(rename_all = "lowercase")]
pub enum Button {
    Left = 0,
    Middle = 1,
    Right = 2,
}

impl Button {
    pub fn mask(self) -> Buttons {
        Buttons::from_bits_truncate(1 << u8::from(self))
    }
}

bitflags! {
    /// 按键位掩码，按位从低到高遍历
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Buttons: u8 {
        const LEFT = 1 << 0;
        const MIDDLE = 1 << 1;
        const RIGHT = 1 << 2;
    }
}

impl Buttons {
    /// 硬件上报的位掩码只保留支持的按键
    pub fn from_hardware(raw: u32) -> Self {
        Buttons::from_bits_truncate((raw & Buttons::all().bits() as u32) as u8)
    }

    /// 置位的按键，按编号从小到大
    pub fn buttons(self) -> impl Iterator<Item = Button> {
        (0..u8::BITS as u8)
            .filter(move |bit| self.bits() >> bit & 1 == 1)
            .filter_map(|bit| Button::try_from(bit).ok())
    }
}

bitflags! {
    /// 一帧中识别出的手势类型
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct GestureType: u16 {
        const MOVE = 1 << 0;
        const BUTTON = 1 << 1;
        const VSCROLL = 1 << 2;
        const HSCROLL = 1 << 3;
        const VSWIPE = 1 << 4;
        const HSWIPE = 1 << 5;
        const VSWIPE4 = 1 << 6;
        const HSWIPE4 = 1 << 7;
        const SCALE = 1 << 8;
        const ROTATE = 1 << 9;
        const TAP = 1 << 10;

        /// 多指平移产生的手势
        const TRANSLATION = Self::VSCROLL.bits()
            | Self::HSCROLL.bits()
            | Self::VSWIPE.bits()
            | Self::HSWIPE.bits()
            | Self::VSWIPE4.bits()
            | Self::HSWIPE4.bits();
    }
}

/// 每次提取输出的手势记录
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GestureRecord {
    pub gesture_type: GestureType,
    /// 本次发生变化的按键
    pub button_mask: Buttons,
    /// 变化后的按键状态
    pub button_data: Buttons,
    pub tap_mask: Buttons,
    pub tap_count: u32,
    pub pos_x: i32,
    pub pos_y: i32,
    pub dx: i32,
    pub dy: i32,
    pub scale: f32,
    pub rotation: f32,
    pub same_fingers: bool,
}

impl GestureRecord {
    pub fn is_empty(&self) -> bool {
        *self == GestureRecord::default()
    }

    pub fn has(&self, gesture_type: GestureType) -> bool {
        self.gesture_type.contains(gesture_type)
    }
}
