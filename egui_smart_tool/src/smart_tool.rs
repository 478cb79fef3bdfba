//! 智能工具引擎
//!
//! 每个编辑区域持有一个独立的 [`SmartTool`]。它与 UI 工具包无关：任何前端只需把指针事件
//! 转换为 `pointer_down / pointer_move / pointer_up / pointer_cancel` 调用。
//!
//! 流程：工具门控 → 区域分类（悬停）→ 拖拽会话（手势）→ 编辑模式策略（仅移动）→ 分发。

use crate::context::EditContext;
use crate::dispatch::{Dispatcher, EventListener, SmartToolHandlers};
use crate::drag::{DragSession, DragState};
use crate::edit_mode::EditMode;
use crate::editor::{SmartToolCommand, SmartToolEvent};
use crate::settings::SmartToolSettings;
use crate::tool::{ExplicitTool, ToolSelector};
use crate::zone::{EditZone, HitResult, ZoneClassifier, ZoneConfig};
use egui::{CursorIcon, Modifiers, Pos2};

pub struct SmartTool {
    classifier: ZoneClassifier,
    selector: ToolSelector,
    session: DragSession,
    dispatcher: Dispatcher,
    last_hit: Option<HitResult>,
    last_modifiers: Modifiers,
    // 固定工具按下的位置，松开时执行
    pending_click: Option<Pos2>,
}

impl Default for SmartTool {
    fn default() -> Self {
        Self::new(ZoneConfig::default())
    }
}

impl SmartTool {
    pub fn new(config: ZoneConfig) -> Self {
        Self {
            classifier: ZoneClassifier::new(config),
            selector: ToolSelector::default(),
            session: DragSession::new(),
            dispatcher: Dispatcher::default(),
            last_hit: None,
            last_modifiers: Modifiers::NONE,
            pending_click: None,
        }
    }

    pub fn from_settings(settings: &SmartToolSettings) -> Self {
        let mut tool = Self::new(settings.zones);
        tool.selector = ToolSelector::new(settings.tool, settings.edit_mode);
        tool
    }

    pub fn settings(&self) -> SmartToolSettings {
        SmartToolSettings {
            zones: *self.classifier.config(),
            tool: self.selector.active_tool(),
            edit_mode: self.selector.active_edit_mode(),
        }
    }

    pub fn set_handlers(&mut self, handlers: SmartToolHandlers) {
        self.dispatcher.handlers = handlers;
    }

    pub fn handlers_mut(&mut self) -> &mut SmartToolHandlers {
        &mut self.dispatcher.handlers
    }

    pub fn set_event_listener(&mut self, listener: EventListener) {
        self.dispatcher.set_event_listener(listener);
    }

    pub fn take_events(&mut self) -> Vec<SmartToolEvent> {
        self.dispatcher.take_events()
    }

    pub fn execute_command(&mut self, command: SmartToolCommand) {
        match command {
            SmartToolCommand::SetTool { tool } => {
                if tool == self.selector.active_tool() {
                    return;
                }
                // 换工具时中止进行中的手势
                self.pointer_cancel();
                self.selector.set_tool(tool);
                self.last_hit = None;
                log::info!("tool changed to {:?}", tool);
                self.dispatcher.emit_event(SmartToolEvent::ToolChanged { tool });
            }
            SmartToolCommand::SetEditMode { mode } => {
                if mode == self.selector.active_edit_mode() {
                    return;
                }
                self.selector.set_edit_mode(mode);
                log::info!("edit mode changed to {:?}", mode);
                self.dispatcher.emit_event(SmartToolEvent::EditModeChanged { mode });
            }
            SmartToolCommand::CancelDrag => self.pointer_cancel(),
        }
    }

    /// 纯命中测试，不改变任何状态
    pub fn hit_test(&self, pos: Pos2, ctx: &EditContext<'_>) -> HitResult {
        let clip = ctx.layout.clip_at(pos);
        let neighbors = clip
            .map(|c| ctx.layout.neighbors(c.clip_id))
            .unwrap_or_default();
        let hit = self.classifier.hit_test(pos, clip.as_ref(), neighbors);
        self.selector.gate(hit, pos)
    }

    /// 悬停：记录命中结果以便解析光标
    pub fn hover(&mut self, pos: Pos2, ctx: &EditContext<'_>) -> HitResult {
        self.last_modifiers = ctx.modifiers.modifiers();
        let hit = self.hit_test(pos, ctx);
        self.last_hit = Some(hit);
        hit
    }

    /// 指针按下。返回是否开始了新的拖拽；已有拖拽时直接忽略。
    pub fn pointer_down(&mut self, pos: Pos2, ctx: &EditContext<'_>) -> bool {
        self.last_modifiers = ctx.modifiers.modifiers();
        if self.selector.active_tool().is_click_verb() {
            if !self.session.is_active() {
                self.pending_click = Some(pos);
            }
            return false;
        }

        let hit = self.hit_test(pos, ctx);
        if !self.session.start(&hit, pos, hit.clip_bounds, ctx.drag_modifiers()) {
            return false;
        }
        self.last_hit = Some(hit);

        if let (EditZone::Move, Some(clip_id)) = (hit.zone, hit.clip_id) {
            self.dispatcher.clip_selected(clip_id);
        }
        if let Some(state) = self.session.state() {
            self.dispatcher.drag_started(state);
        }
        true
    }

    /// 指针移动：拖拽中更新位移，否则按悬停处理
    pub fn pointer_move(&mut self, pos: Pos2, ctx: &EditContext<'_>) {
        if !self.session.is_active() {
            self.hover(pos, ctx);
            return;
        }
        self.last_modifiers = ctx.modifiers.modifiers();
        let state = self.session.update(pos, ctx.drag_modifiers());
        self.dispatcher.drag_updated(state);
    }

    /// 指针松开：提交拖拽，或执行固定工具的点击操作
    pub fn pointer_up(&mut self, pos: Pos2, ctx: &EditContext<'_>) {
        self.last_modifiers = ctx.modifiers.modifiers();
        if let Some(origin) = self.pending_click.take() {
            let action = self.selector.click_action(
                origin,
                self.last_modifiers,
                ctx.layout,
                ctx.time_base,
            );
            match action {
                Some(action) => self.dispatcher.tool_action(action),
                None => log::debug!(
                    "{:?} click at {:?} hit nothing",
                    self.selector.active_tool(),
                    origin
                ),
            }
            return;
        }
        if !self.session.is_active() {
            return;
        }

        // 松开时的位置和修饰键也算一次更新
        self.session.update(pos, ctx.drag_modifiers());
        let state = self.session.end();
        // 剪辑几何已经变化，按下时的命中结果作废，等下一次悬停重新计算
        self.last_hit = None;
        self.dispatcher.commit(&state, self.selector.active_edit_mode(), ctx);
    }

    /// 失去焦点或指针取消：丢弃手势，不执行任何操作
    pub fn pointer_cancel(&mut self) {
        self.pending_click = None;
        if let Some(state) = self.session.cancel() {
            self.last_hit = None;
            self.dispatcher.drag_cancelled(&state);
        }
    }

    pub fn cursor(&self) -> CursorIcon {
        self.selector
            .resolve_cursor(self.last_hit.as_ref(), self.last_modifiers)
    }

    pub fn active_tool(&self) -> ExplicitTool {
        self.selector.active_tool()
    }

    pub fn edit_mode(&self) -> EditMode {
        self.selector.active_edit_mode()
    }

    pub fn zone_config(&self) -> &ZoneConfig {
        self.classifier.config()
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_active()
    }

    pub fn drag_state(&self) -> Option<&DragState> {
        self.session.state()
    }

    pub fn last_hit(&self) -> Option<&HitResult> {
        self.last_hit.as_ref()
    }
}
