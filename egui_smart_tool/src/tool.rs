//! 工具选择模块
//!
//! 只有 Smart 和 Select 工具会经过区域分类器；其余工具都是单一操作，点击即执行，
//! 与指针落在剪辑的哪个区域无关。Range 工具的拖拽总是定义一个跨轨的时间范围。

use crate::context::{ClipLayout, TimeBase};
use crate::edit_mode::EditMode;
use crate::structure::{ClipId, TrackId};
use crate::zone::{EditZone, HitResult};
use egui::{CursorIcon, Modifiers, Pos2};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExplicitTool {
    #[default]
    Smart,
    Select,
    Range,
    Split,
    Glue,
    Erase,
    Zoom,
    Mute,
    Draw,
    Play,
}

impl ExplicitTool {
    pub const ALL: [ExplicitTool; 10] = [
        ExplicitTool::Smart,
        ExplicitTool::Select,
        ExplicitTool::Range,
        ExplicitTool::Split,
        ExplicitTool::Glue,
        ExplicitTool::Erase,
        ExplicitTool::Zoom,
        ExplicitTool::Mute,
        ExplicitTool::Draw,
        ExplicitTool::Play,
    ];

    /// Smart/Select 由区域分类器决定行为
    pub fn uses_zones(&self) -> bool {
        matches!(self, ExplicitTool::Smart | ExplicitTool::Select)
    }

    /// 点击即执行的单一操作工具
    pub fn is_click_verb(&self) -> bool {
        !self.uses_zones() && *self != ExplicitTool::Range
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExplicitTool::Smart => "Smart",
            ExplicitTool::Select => "Select",
            ExplicitTool::Range => "Range",
            ExplicitTool::Split => "Split",
            ExplicitTool::Glue => "Glue",
            ExplicitTool::Erase => "Erase",
            ExplicitTool::Zoom => "Zoom",
            ExplicitTool::Mute => "Mute",
            ExplicitTool::Draw => "Draw",
            ExplicitTool::Play => "Play",
        }
    }

    /// 固定工具的光标；Smart/Select 的光标来自最近一次命中测试
    pub fn fixed_cursor(&self, modifiers: Modifiers) -> CursorIcon {
        match self {
            ExplicitTool::Smart | ExplicitTool::Select => CursorIcon::Default,
            ExplicitTool::Range => CursorIcon::Text,
            ExplicitTool::Split => CursorIcon::VerticalText,
            ExplicitTool::Glue => CursorIcon::Alias,
            ExplicitTool::Erase => CursorIcon::NotAllowed,
            ExplicitTool::Zoom if modifiers.alt => CursorIcon::ZoomOut,
            ExplicitTool::Zoom => CursorIcon::ZoomIn,
            ExplicitTool::Mute => CursorIcon::ContextMenu,
            ExplicitTool::Draw => CursorIcon::Crosshair,
            ExplicitTool::Play => CursorIcon::PointingHand,
        }
    }
}

/// 固定工具点击后请求宿主执行的操作
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ToolAction {
    Split { clip_id: ClipId, time: f64 },
    Glue { clip_id: ClipId, time: f64 },
    Erase { clip_id: ClipId },
    Zoom { time: f64, zoom_out: bool },
    Mute { clip_id: ClipId },
    Draw {
        track_id: TrackId,
        clip_id: Option<ClipId>,
        time: f64,
        y: f32,
    },
    Play { time: f64 },
}

#[derive(Clone, Debug, Default)]
pub struct ToolSelector {
    active_tool: ExplicitTool,
    active_edit_mode: EditMode,
}

impl ToolSelector {
    pub fn new(active_tool: ExplicitTool, active_edit_mode: EditMode) -> Self {
        Self {
            active_tool,
            active_edit_mode,
        }
    }

    pub fn active_tool(&self) -> ExplicitTool {
        self.active_tool
    }

    pub fn active_edit_mode(&self) -> EditMode {
        self.active_edit_mode
    }

    pub fn set_tool(&mut self, tool: ExplicitTool) {
        self.active_tool = tool;
    }

    pub fn set_edit_mode(&mut self, mode: EditMode) {
        self.active_edit_mode = mode;
    }

    /// 工具对命中结果的过滤：Range 忽略剪辑区域，点击工具不产生拖拽
    pub fn gate(&self, hit: HitResult, pos: Pos2) -> HitResult {
        match self.active_tool {
            ExplicitTool::Smart | ExplicitTool::Select => hit,
            ExplicitTool::Range => HitResult::range_select(pos),
            _ => HitResult::none(pos),
        }
    }

    pub fn resolve_cursor(&self, last_hit: Option<&HitResult>, modifiers: Modifiers) -> CursorIcon {
        if self.active_tool.uses_zones() {
            last_hit.map_or(EditZone::None.cursor(), |hit| hit.cursor)
        } else {
            self.active_tool.fixed_cursor(modifiers)
        }
    }

    /// 把点击翻译成当前固定工具的操作。需要剪辑的工具在空白处点击时返回 `None`。
    pub fn click_action(
        &self,
        pos: Pos2,
        modifiers: Modifiers,
        layout: &dyn ClipLayout,
        time_base: &dyn TimeBase,
    ) -> Option<ToolAction> {
        let time = time_base.x_to_time(pos.x);
        let clip = layout.clip_at(pos).filter(|clip| clip.bounds.contains(pos));
        match self.active_tool {
            ExplicitTool::Smart | ExplicitTool::Select | ExplicitTool::Range => None,
            ExplicitTool::Split => clip.map(|c| ToolAction::Split {
                clip_id: c.clip_id,
                time,
            }),
            ExplicitTool::Glue => clip.map(|c| ToolAction::Glue {
                clip_id: c.clip_id,
                time,
            }),
            ExplicitTool::Erase => clip.map(|c| ToolAction::Erase { clip_id: c.clip_id }),
            ExplicitTool::Mute => clip.map(|c| ToolAction::Mute { clip_id: c.clip_id }),
            ExplicitTool::Zoom => Some(ToolAction::Zoom {
                time,
                zoom_out: modifiers.alt,
            }),
            ExplicitTool::Draw => {
                let track_id = clip.map(|c| c.track_id).or_else(|| layout.track_at(pos))?;
                Some(ToolAction::Draw {
                    track_id,
                    clip_id: clip.map(|c| c.clip_id),
                    time,
                    y: pos.y,
                })
            }
            ExplicitTool::Play => Some(ToolAction::Play { time: time.max(0.0) }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::LinearTimeBase;
    use crate::structure::ClipHit;
    use egui::Rect;

    struct OneClip;

    impl ClipLayout for OneClip {
        fn clip_at(&self, pos: Pos2) -> Option<ClipHit> {
            let bounds = Rect::from_min_max(Pos2::new(100.0, 0.0), Pos2::new(200.0, 40.0));
            bounds.contains(pos).then(|| ClipHit::new(ClipId(1), TrackId(1), bounds))
        }

        fn track_at(&self, pos: Pos2) -> Option<TrackId> {
            (pos.y >= 0.0 && pos.y <= 40.0).then_some(TrackId(1))
        }
    }

    #[test]
    fn defaults_are_smart_and_grid() {
        let selector = ToolSelector::default();
        assert_eq!(selector.active_tool(), ExplicitTool::Smart);
        assert_eq!(selector.active_edit_mode(), EditMode::Grid);
    }

    #[test]
    fn only_smart_and_select_use_zones() {
        for tool in ExplicitTool::ALL {
            let expected = matches!(tool, ExplicitTool::Smart | ExplicitTool::Select);
            assert_eq!(tool.uses_zones(), expected, "{:?}", tool);
        }
        assert!(!ExplicitTool::Range.is_click_verb());
        assert!(ExplicitTool::Split.is_click_verb());
    }

    #[test]
    fn gate_rewrites_hit_for_fixed_tools() {
        let pos = Pos2::new(150.0, 20.0);
        let mut hit = HitResult::none(pos);
        hit.zone = EditZone::Move;

        let mut selector = ToolSelector::default();
        assert_eq!(selector.gate(hit, pos).zone, EditZone::Move);

        selector.set_tool(ExplicitTool::Range);
        assert_eq!(selector.gate(hit, pos).zone, EditZone::RangeSelect);

        selector.set_tool(ExplicitTool::Erase);
        assert_eq!(selector.gate(hit, pos).zone, EditZone::None);
    }

    #[test]
    fn cursor_resolution() {
        let mut selector = ToolSelector::default();
        let mut hit = HitResult::none(Pos2::ZERO);
        hit.cursor = CursorIcon::ResizeEast;
        assert_eq!(selector.resolve_cursor(Some(&hit), Modifiers::NONE), CursorIcon::ResizeEast);
        assert_eq!(selector.resolve_cursor(None, Modifiers::NONE), CursorIcon::Default);

        selector.set_tool(ExplicitTool::Zoom);
        assert_eq!(selector.resolve_cursor(Some(&hit), Modifiers::NONE), CursorIcon::ZoomIn);
        assert_eq!(selector.resolve_cursor(Some(&hit), Modifiers::ALT), CursorIcon::ZoomOut);
    }

    #[test]
    fn click_actions() {
        let tb = LinearTimeBase::default();
        let mut selector = ToolSelector::default();
        let on_clip = Pos2::new(150.0, 20.0);
        let empty = Pos2::new(300.0, 20.0);

        selector.set_tool(ExplicitTool::Split);
        assert_eq!(
            selector.click_action(on_clip, Modifiers::NONE, &OneClip, &tb),
            Some(ToolAction::Split {
                clip_id: ClipId(1),
                time: 150.0
            })
        );
        assert_eq!(selector.click_action(empty, Modifiers::NONE, &OneClip, &tb), None);

        selector.set_tool(ExplicitTool::Zoom);
        assert_eq!(
            selector.click_action(empty, Modifiers::ALT, &OneClip, &tb),
            Some(ToolAction::Zoom {
                time: 300.0,
                zoom_out: true
            })
        );

        selector.set_tool(ExplicitTool::Draw);
        assert_eq!(
            selector.click_action(empty, Modifiers::NONE, &OneClip, &tb),
            Some(ToolAction::Draw {
                track_id: TrackId(1),
                clip_id: None,
                time: 300.0,
                y: 20.0
            })
        );

        selector.set_tool(ExplicitTool::Smart);
        assert_eq!(selector.click_action(on_clip, Modifiers::NONE, &OneClip, &tb), None);
    }
}
