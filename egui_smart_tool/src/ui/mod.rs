//! UI 模块
//!
//! egui 前端适配：把 egui 的指针响应、修饰键和快捷键翻译为 [`SmartTool`] 的显式调用，
//! 并提供区域高亮和拖拽预览的绘制函数。

mod renderer;
mod toolbar;

pub use renderer::{draw_drag_preview, draw_grid, draw_selection_box, draw_zone_overlay};
pub use toolbar::Toolbar;

use crate::context::{ClipLayout, EditContext, GridSource, TimeBase};
use crate::edit_mode::EditMode;
use crate::editor::{SmartToolCommand, SmartToolEvent};
use crate::smart_tool::SmartTool;
use crate::timeline::TimelineState;
use crate::tool::ExplicitTool;
use egui::*;

pub struct SmartToolEditor {
    tool: SmartTool,
}

impl SmartToolEditor {
    pub fn new(tool: SmartTool) -> Self {
        Self { tool }
    }

    pub fn tool(&self) -> &SmartTool {
        &self.tool
    }

    pub fn tool_mut(&mut self) -> &mut SmartTool {
        &mut self.tool
    }

    pub fn take_events(&mut self) -> Vec<SmartToolEvent> {
        self.tool.take_events()
    }

    pub fn toolbar_ui(&mut self, ui: &mut Ui, timeline: &mut TimelineState) {
        let mut toolbar = Toolbar::new(self.tool.active_tool(), self.tool.edit_mode());
        toolbar.ui(ui, timeline, &mut |cmd| {
            self.tool.execute_command(cmd);
        });
    }

    /// 处理一帧的交互。`response` 应覆盖整个剪辑编辑区域并使用 `Sense::click_and_drag()`。
    pub fn interact(
        &mut self,
        ui: &Ui,
        response: &Response,
        layout: &dyn ClipLayout,
        time_base: &dyn TimeBase,
        grid: &dyn GridSource,
    ) {
        self.handle_shortcuts(ui);

        let (modifiers, focused, press_origin) =
            ui.input(|i| (i.modifiers, i.focused, i.pointer.press_origin()));
        let ctx = EditContext::new(layout, &modifiers, time_base, grid);

        // 窗口失去焦点时取消手势
        if !focused {
            self.tool.execute_command(SmartToolCommand::CancelDrag);
        }

        let pointer_pos = response.interact_pointer_pos().or(response.hover_pos());

        if response.drag_started_by(PointerButton::Primary) {
            if let Some(pos) = pointer_pos {
                // egui 在越过拖拽阈值后才报告开始，用按下的位置作为起点
                self.tool.pointer_down(press_origin.unwrap_or(pos), &ctx);
                self.tool.pointer_move(pos, &ctx);
            }
        } else if response.dragged_by(PointerButton::Primary) {
            if let Some(pos) = pointer_pos {
                self.tool.pointer_move(pos, &ctx);
            }
        }

        if response.drag_stopped_by(PointerButton::Primary) {
            let pos = pointer_pos.or(press_origin).unwrap_or_default();
            self.tool.pointer_up(pos, &ctx);
        } else if response.clicked_by(PointerButton::Primary) {
            if let Some(pos) = pointer_pos {
                self.tool.pointer_down(pos, &ctx);
                self.tool.pointer_up(pos, &ctx);
            }
        } else if !self.tool.is_dragging() {
            if let Some(pos) = response.hover_pos() {
                self.tool.hover(pos, &ctx);
            }
        }

        if response.hovered() || self.tool.is_dragging() {
            ui.ctx().set_cursor_icon(self.tool.cursor());
        }
    }

    /// 绘制悬停区域高亮和进行中的拖拽预览
    pub fn paint_overlay(&self, painter: &Painter) {
        if let Some(drag) = self.tool.drag_state() {
            draw_drag_preview(painter, drag);
        } else if let Some(hit) = self.tool.last_hit() {
            if self.tool.active_tool().uses_zones() {
                draw_zone_overlay(painter, hit, self.tool.zone_config());
            }
        }
    }

    fn handle_shortcuts(&mut self, ui: &Ui) {
        const MODE_KEYS: [(Key, EditMode); 4] = [
            (Key::F1, EditMode::Shuffle),
            (Key::F2, EditMode::Slip),
            (Key::F3, EditMode::Spot),
            (Key::F4, EditMode::Grid),
        ];
        const TOOL_KEYS: [(Key, ExplicitTool); 6] = [
            (Key::F5, ExplicitTool::Zoom),
            (Key::F6, ExplicitTool::Split),
            (Key::F7, ExplicitTool::Select),
            (Key::F8, ExplicitTool::Range),
            (Key::F9, ExplicitTool::Draw),
            (Key::F10, ExplicitTool::Smart),
        ];

        let mut commands = Vec::new();
        ui.input(|i| {
            if i.key_pressed(Key::Escape) {
                commands.push(SmartToolCommand::CancelDrag);
            }
            for (key, mode) in MODE_KEYS {
                if i.key_pressed(key) {
                    commands.push(SmartToolCommand::SetEditMode { mode });
                }
            }
            for (key, tool) in TOOL_KEYS {
                if i.key_pressed(key) {
                    commands.push(SmartToolCommand::SetTool { tool });
                }
            }
        });
        for command in commands {
            self.tool.execute_command(command);
        }
    }
}
