//! 编辑命令和事件模块
//!
//! 定义了智能工具的命令系统和事件系统，用于与宿主应用交互。

use crate::drag::DragState;
use crate::edit_mode::{EditMode, ResolvedMove};
use crate::structure::{ClipId, RangeSelection};
use crate::tool::{ExplicitTool, ToolAction};

#[derive(Clone, Debug)]
pub enum SmartToolCommand {
    SetTool { tool: ExplicitTool },
    SetEditMode { mode: EditMode },
    CancelDrag,
}

#[derive(Clone, Debug)]
pub enum SmartToolEvent {
    DragStarted {
        state: DragState,
    },
    DragUpdated {
        state: DragState,
    },
    DragEnded {
        state: DragState,
    },
    DragCancelled {
        clip_id: Option<ClipId>,
    },
    ClipSelected {
        clip_id: ClipId,
    },
    ClipMoved {
        clip_id: ClipId,
        duplicate: bool,
        resolved: ResolvedMove,
    },
    ClipTrimmedLeft {
        clip_id: ClipId,
        new_boundary: f64,
    },
    ClipTrimmedRight {
        clip_id: ClipId,
        new_boundary: f64,
    },
    FadeInChanged {
        clip_id: ClipId,
        duration: f64,
    },
    FadeOutChanged {
        clip_id: ClipId,
        duration: f64,
    },
    CrossfadeRequested {
        clip_a: ClipId,
        clip_b: ClipId,
        overlap: f64,
    },
    RangeSelected {
        range: RangeSelection,
    },
    ToolActionTriggered {
        action: ToolAction,
    },
    ToolChanged {
        tool: ExplicitTool,
    },
    EditModeChanged {
        mode: EditMode,
    },
}
