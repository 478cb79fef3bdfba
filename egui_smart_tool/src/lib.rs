//! # egui_smart_tool
//!
//! 时间轴剪辑编辑器的上下文感知智能工具：根据指针位置和修饰键判断剪辑上适用的编辑操作
//! （移动、修剪、淡化、交叉淡化、范围选择），管理拖拽手势的生命周期，并按四种编辑模式
//! （Shuffle、Slip、Spot、Grid）之一把拖拽位移折算为最终的剪辑位置。
//!
//! ## 功能特性
//!
//! - **区域分类**：淡化带优先于修剪带，修剪带内侧一半在有邻居时变为交叉淡化
//! - **单一拖拽**：同一时间只有一个活动手势，后来的按下事件被丢弃
//! - **实时修饰键**：Shift 轴锁定、Alt 复制、Ctrl/Cmd 细调在拖拽中随时生效
//! - **编辑模式**：吸附网格、绝对定位、内容滑移、推挤邻居
//!
//! ## 基本使用
//!
//! ```rust,ignore
//! use egui_smart_tool::{EditContext, SmartTool, SmartToolHandlers, ZoneConfig};
//!
//! let mut tool = SmartTool::new(ZoneConfig::default());
//! tool.set_handlers(SmartToolHandlers {
//!     on_clip_trim_left: Some(Box::new(|clip_id, boundary| {
//!         println!("{:?} now starts at {}", clip_id, boundary);
//!     })),
//!     ..Default::default()
//! });
//!
//! let ctx = EditContext::new(&layout, &modifiers, &time_base, &grid);
//! tool.pointer_down(pos, &ctx);
//! tool.pointer_move(pos + delta, &ctx);
//! tool.pointer_up(pos + delta, &ctx);
//! ```
//!
//! ## 集成到 egui
//!
//! ```rust,ignore
//! let response = ui.allocate_rect(lanes_rect, Sense::click_and_drag());
//! editor.interact(ui, &response, &layout, &timeline, &timeline);
//! editor.paint_overlay(&ui.painter_at(lanes_rect));
//! for event in editor.take_events() {
//!     // 应用到宿主的剪辑模型
//! }
//! ```

pub mod context;
pub mod dispatch;
pub mod drag;
pub mod edit_mode;
pub mod editor;
pub mod settings;
pub mod smart_tool;
pub mod structure;
pub mod timeline;
pub mod tool;
pub mod ui;
pub mod zone;

pub use context::{
    ClipLayout, DragModifiers, EditContext, FixedGrid, GridSource, LinearTimeBase, ModifierSource,
    SharedModifiers, TimeBase,
};
pub use dispatch::{Dispatcher, SmartToolHandlers};
pub use drag::{DragSession, DragState};
pub use edit_mode::{Displacement, EditMode, MovePolicy, ResolvedMove};
pub use editor::{SmartToolCommand, SmartToolEvent};
pub use settings::SmartToolSettings;
pub use smart_tool::SmartTool;
pub use structure::{ClipHit, ClipId, ClipSpan, Neighbors, RangeSelection, SourceExtent, TrackId};
pub use timeline::TimelineState;
pub use tool::{ExplicitTool, ToolAction, ToolSelector};
pub use ui::SmartToolEditor;
pub use zone::{ClipEdge, EditZone, HitResult, ZoneClassifier, ZoneConfig};
