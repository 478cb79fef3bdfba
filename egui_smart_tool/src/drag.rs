//! 拖拽会话模块
//!
//! 同一时间只存在一个活动拖拽：Idle → Active → (Committed | Cancelled) → Idle。
//! 修饰键在每次 `update` 时重新采样，而不是在拖拽开始时冻结。

use crate::context::DragModifiers;
use crate::structure::{ClipId, Neighbors, SourceExtent, TrackId};
use crate::zone::{EditZone, HitResult};
use egui::{Pos2, Rect, Vec2};

/// 单次拖拽的全部状态，只存活一个手势
#[derive(Clone, Debug, PartialEq)]
pub struct DragState {
    pub zone: EditZone,
    pub clip_id: Option<ClipId>,
    pub track_id: Option<TrackId>,
    pub start_position: Pos2,
    pub current_position: Pos2,
    pub original_bounds: Option<Rect>,
    pub neighbors: Neighbors,
    pub source: Option<SourceExtent>,
    pub axis_lock: bool,
    pub duplicate: bool,
    pub fine_adjust: bool,
    /// 最近一次 `update` 算出的位移（已按轴锁定约束）
    pub delta: Vec2,
}

impl DragState {
    fn new(hit: &HitResult, pos: Pos2, bounds: Option<Rect>, modifiers: DragModifiers) -> Self {
        Self {
            zone: hit.zone,
            clip_id: hit.clip_id,
            track_id: hit.track_id,
            start_position: pos,
            current_position: pos,
            original_bounds: bounds,
            neighbors: hit.neighbors,
            source: hit.source,
            axis_lock: modifiers.axis_lock,
            duplicate: modifiers.duplicate,
            fine_adjust: modifiers.fine_adjust,
            delta: Vec2::ZERO,
        }
    }

    fn apply_modifiers(&mut self, modifiers: DragModifiers) {
        self.axis_lock = modifiers.axis_lock;
        self.duplicate = modifiers.duplicate;
        self.fine_adjust = modifiers.fine_adjust;
    }

    /// 原始位移，不考虑轴锁定
    pub fn raw_delta(&self) -> Vec2 {
        self.current_position - self.start_position
    }

    pub fn is_click(&self) -> bool {
        self.delta == Vec2::ZERO
    }
}

/// 轴锁定：只保留绝对值较大的分量，相等时保留时间轴（x）
pub fn constrain_to_axis(delta: Vec2) -> Vec2 {
    if delta.x.abs() >= delta.y.abs() {
        Vec2::new(delta.x, 0.0)
    } else {
        Vec2::new(0.0, delta.y)
    }
}

#[derive(Debug, Default)]
pub struct DragSession {
    active: Option<DragState>,
}

impl DragSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn state(&self) -> Option<&DragState> {
        self.active.as_ref()
    }

    /// 开始拖拽。已有活动拖拽或命中结果没有可用操作时什么也不做，返回 `false`；
    /// 先开始的拖拽总是优先，后来的按下事件直接丢弃。
    pub fn start(
        &mut self,
        hit: &HitResult,
        pos: Pos2,
        bounds: Option<Rect>,
        modifiers: DragModifiers,
    ) -> bool {
        if hit.zone.is_none() {
            log::debug!("drag rejected at {:?}: no edit zone", pos);
            return false;
        }
        if let Some(active) = &self.active {
            log::debug!(
                "drag rejected at {:?}: {:?} on {:?} still active",
                pos,
                active.zone,
                active.clip_id
            );
            return false;
        }

        log::debug!("drag started: {:?} on {:?} at {:?}", hit.zone, hit.clip_id, pos);
        self.active = Some(DragState::new(hit, pos, bounds, modifiers));
        true
    }

    /// 更新拖拽位置并重新采样修饰键。
    ///
    /// # Panics
    ///
    /// 没有活动拖拽时调用属于调用方错误。
    pub fn update(&mut self, pos: Pos2, modifiers: DragModifiers) -> &DragState {
        let state = self.active_mut("update");
        state.apply_modifiers(modifiers);
        state.current_position = pos;

        // 主轴每次重新判断，反向拖动时可以翻转
        let raw = state.raw_delta();
        state.delta = if state.axis_lock {
            constrain_to_axis(raw)
        } else {
            raw
        };
        log::trace!("drag update: raw {:?} -> delta {:?}", raw, state.delta);
        state
    }

    /// 提交拖拽，返回消耗掉的状态，会话回到 Idle。
    ///
    /// # Panics
    ///
    /// 没有活动拖拽时调用属于调用方错误。
    pub fn end(&mut self) -> DragState {
        let Some(state) = self.active.take() else {
            panic!("DragSession::end called without an active drag");
        };
        log::debug!(
            "drag committed: {:?} on {:?}, delta {:?}",
            state.zone,
            state.clip_id,
            state.delta
        );
        state
    }

    /// 取消拖拽（失去焦点、指针取消），不执行任何操作。Idle 时调用无效果。
    pub fn cancel(&mut self) -> Option<DragState> {
        let state = self.active.take();
        if let Some(state) = &state {
            log::debug!("drag cancelled: {:?} on {:?}", state.zone, state.clip_id);
        }
        state
    }

    fn active_mut(&mut self, op: &str) -> &mut DragState {
        match self.active.as_mut() {
            Some(state) => state,
            None => panic!("DragSession::{op} called without an active drag"),
        }
    }
}
