//! 外部提供者模块
//!
//! 智能工具不拥有剪辑数据，所有几何、时间基准、网格和修饰键状态都通过这里的 trait 向宿主查询。

use crate::structure::{ClipHit, ClipId, ClipSpan, Neighbors, TrackId};
use egui::{Modifiers, Pos2};
use std::cell::Cell;
use std::rc::Rc;

/// 修饰键快照提供者，每次调用都返回当前的按键状态
pub trait ModifierSource {
    fn modifiers(&self) -> Modifiers;
}

impl ModifierSource for Modifiers {
    fn modifiers(&self) -> Modifiers {
        *self
    }
}

/// 由前端每帧写入的共享修饰键状态
#[derive(Clone, Debug, Default)]
pub struct SharedModifiers(Rc<Cell<Modifiers>>);

impl SharedModifiers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, modifiers: Modifiers) {
        self.0.set(modifiers);
    }
}

impl ModifierSource for SharedModifiers {
    fn modifiers(&self) -> Modifiers {
        self.0.get()
    }
}

/// 拖拽期间关心的三个修饰键语义
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DragModifiers {
    pub axis_lock: bool,
    pub duplicate: bool,
    pub fine_adjust: bool,
}

impl From<Modifiers> for DragModifiers {
    fn from(m: Modifiers) -> Self {
        Self {
            axis_lock: m.shift,
            duplicate: m.alt,
            fine_adjust: m.ctrl || m.command || m.mac_cmd,
        }
    }
}

/// 剪辑/音轨几何与相邻关系提供者
pub trait ClipLayout {
    fn clip_at(&self, pos: Pos2) -> Option<ClipHit>;

    fn neighbors(&self, _clip_id: ClipId) -> Neighbors {
        Neighbors::default()
    }

    /// 按开始时间排列的同轨剪辑
    fn track_clips(&self, _track_id: TrackId) -> Vec<ClipSpan> {
        Vec::new()
    }

    fn track_at(&self, _pos: Pos2) -> Option<TrackId> {
        None
    }
}

/// 屏幕 x 坐标与项目时间之间的换算
pub trait TimeBase {
    fn x_to_time(&self, x: f32) -> f64;
    fn dx_to_time(&self, dx: f32) -> f64;
}

/// Grid 模式的网格间隔，0 表示没有网格
pub trait GridSource {
    fn grid_interval(&self) -> f64;
}

/// 线性时间轴：`time = (x - origin_x) / pixels_per_unit`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearTimeBase {
    pub origin_x: f32,
    pub pixels_per_unit: f32,
}

impl Default for LinearTimeBase {
    fn default() -> Self {
        Self {
            origin_x: 0.0,
            pixels_per_unit: 1.0,
        }
    }
}

impl TimeBase for LinearTimeBase {
    fn x_to_time(&self, x: f32) -> f64 {
        self.dx_to_time(x - self.origin_x)
    }

    fn dx_to_time(&self, dx: f32) -> f64 {
        dx as f64 / self.pixels_per_unit.max(f32::EPSILON) as f64
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FixedGrid(pub f64);

impl GridSource for FixedGrid {
    fn grid_interval(&self) -> f64 {
        self.0
    }
}

/// 一次指针事件所借用的全部提供者
#[derive(Clone, Copy)]
pub struct EditContext<'a> {
    pub layout: &'a dyn ClipLayout,
    pub modifiers: &'a dyn ModifierSource,
    pub time_base: &'a dyn TimeBase,
    pub grid: &'a dyn GridSource,
}

impl<'a> EditContext<'a> {
    pub fn new(
        layout: &'a dyn ClipLayout,
        modifiers: &'a dyn ModifierSource,
        time_base: &'a dyn TimeBase,
        grid: &'a dyn GridSource,
    ) -> Self {
        Self {
            layout,
            modifiers,
            time_base,
            grid,
        }
    }

    pub fn drag_modifiers(&self) -> DragModifiers {
        DragModifiers::from(self.modifiers.modifiers())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modifier_mapping() {
        let m = DragModifiers::from(Modifiers {
            shift: true,
            alt: true,
            ..Default::default()
        });
        assert!(m.axis_lock);
        assert!(m.duplicate);
        assert!(!m.fine_adjust);

        assert!(DragModifiers::from(Modifiers::CTRL).fine_adjust);
        assert!(DragModifiers::from(Modifiers::MAC_CMD).fine_adjust);
    }

    #[test]
    fn shared_modifiers_are_live() {
        let shared = SharedModifiers::new();
        let source: &dyn ModifierSource = &shared;
        assert!(!source.modifiers().shift);
        shared.set(Modifiers::SHIFT);
        assert!(source.modifiers().shift);
    }

    #[test]
    fn linear_time_base() {
        let tb = LinearTimeBase {
            origin_x: 100.0,
            pixels_per_unit: 50.0,
        };
        assert_eq!(tb.x_to_time(200.0), 2.0);
        assert_eq!(tb.dx_to_time(-25.0), -0.5);
        assert_eq!(LinearTimeBase::default().x_to_time(80.0), 80.0);
    }
}
