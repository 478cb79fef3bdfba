//! 分发模块
//!
//! 把提交的拖拽按区域路由到宿主回调。所有回调都是可选的，没有注册时静默跳过，
//! 因此不接入完整编辑器也能测试。每次分发同时记录为 [`SmartToolEvent`]，供轮询式宿主读取。

use crate::context::EditContext;
use crate::drag::DragState;
use crate::edit_mode::{EditMode, ResolvedMove};
use crate::editor::SmartToolEvent;
use crate::structure::{ClipId, RangeSelection};
use crate::tool::ToolAction;
use crate::zone::{ClipEdge, EditZone};

pub type DragHandler = Box<dyn FnMut(&DragState)>;
pub type ClipHandler = Box<dyn FnMut(ClipId)>;
pub type MoveHandler = Box<dyn FnMut(ClipId, bool, &ResolvedMove)>;
pub type BoundaryHandler = Box<dyn FnMut(ClipId, f64)>;
pub type CrossfadeHandler = Box<dyn FnMut(ClipId, ClipId, f64)>;
pub type RangeHandler = Box<dyn FnMut(&RangeSelection)>;
pub type ToolActionHandler = Box<dyn FnMut(&ToolAction)>;
pub type EventListener = Box<dyn FnMut(&SmartToolEvent)>;

#[derive(Default)]
pub struct SmartToolHandlers {
    pub on_drag_start: Option<DragHandler>,
    pub on_drag_update: Option<DragHandler>,
    pub on_drag_end: Option<DragHandler>,
    pub on_clip_selected: Option<ClipHandler>,
    pub on_clip_moved: Option<MoveHandler>,
    pub on_clip_trim_left: Option<BoundaryHandler>,
    pub on_clip_trim_right: Option<BoundaryHandler>,
    pub on_fade_in_changed: Option<BoundaryHandler>,
    pub on_fade_out_changed: Option<BoundaryHandler>,
    pub on_crossfade: Option<CrossfadeHandler>,
    pub on_range_selected: Option<RangeHandler>,
    pub on_tool_action: Option<ToolActionHandler>,
}

#[derive(Default)]
pub struct Dispatcher {
    pub handlers: SmartToolHandlers,
    pending_events: Vec<SmartToolEvent>,
    event_listener: Option<EventListener>,
}

impl Dispatcher {
    pub fn new(handlers: SmartToolHandlers) -> Self {
        Self {
            handlers,
            ..Default::default()
        }
    }

    pub fn set_event_listener(&mut self, listener: EventListener) {
        self.event_listener = Some(listener);
    }

    pub fn take_events(&mut self) -> Vec<SmartToolEvent> {
        std::mem::take(&mut self.pending_events)
    }

    pub fn emit_event(&mut self, event: SmartToolEvent) {
        if let Some(ref mut listener) = self.event_listener {
            listener(&event);
        }
        self.pending_events.push(event);
    }

    pub fn drag_started(&mut self, state: &DragState) {
        if let Some(ref mut handler) = self.handlers.on_drag_start {
            handler(state);
        }
        self.emit_event(SmartToolEvent::DragStarted {
            state: state.clone(),
        });
    }

    pub fn drag_updated(&mut self, state: &DragState) {
        if let Some(ref mut handler) = self.handlers.on_drag_update {
            handler(state);
        }
        self.emit_event(SmartToolEvent::DragUpdated {
            state: state.clone(),
        });
    }

    pub fn drag_cancelled(&mut self, state: &DragState) {
        self.emit_event(SmartToolEvent::DragCancelled {
            clip_id: state.clip_id,
        });
    }

    pub fn clip_selected(&mut self, clip_id: ClipId) {
        if let Some(ref mut handler) = self.handlers.on_clip_selected {
            handler(clip_id);
        }
        self.emit_event(SmartToolEvent::ClipSelected { clip_id });
    }

    pub fn tool_action(&mut self, action: ToolAction) {
        log::debug!("tool action: {:?}", action);
        if let Some(ref mut handler) = self.handlers.on_tool_action {
            handler(&action);
        }
        self.emit_event(SmartToolEvent::ToolActionTriggered { action });
    }

    /// 执行拖拽的终结操作，每个手势只调用一次。位移为零的手势视为点击，不修改剪辑。
    pub fn commit(&mut self, state: &DragState, mode: EditMode, ctx: &EditContext<'_>) {
        if let Some(ref mut handler) = self.handlers.on_drag_end {
            handler(state);
        }
        self.emit_event(SmartToolEvent::DragEnded {
            state: state.clone(),
        });

        if state.is_click() {
            return;
        }

        match state.zone {
            EditZone::None => {}
            EditZone::Move => self.commit_move(state, mode, ctx),
            EditZone::TrimLeft | EditZone::TrimRight => self.commit_trim(state, ctx),
            EditZone::FadeIn | EditZone::FadeOut => self.commit_fade(state, ctx),
            EditZone::Crossfade { edge } => self.commit_crossfade(state, edge, ctx),
            EditZone::RangeSelect => {
                let range = range_selection(state, ctx);
                log::debug!("range selected: {:?}", range);
                if let Some(ref mut handler) = self.handlers.on_range_selected {
                    handler(&range);
                }
                self.emit_event(SmartToolEvent::RangeSelected { range });
            }
        }
    }

    fn commit_move(&mut self, state: &DragState, mode: EditMode, ctx: &EditContext<'_>) {
        let Some(clip_id) = state.clip_id else {
            log::warn!("move committed without a clip");
            return;
        };
        let Some(resolved) = mode.policy().resolve(state, ctx) else {
            log::warn!("move of {:?} has no original bounds", clip_id);
            return;
        };
        log::debug!(
            "clip {:?} moved ({:?}, duplicate: {}): {:?}",
            clip_id,
            mode,
            state.duplicate,
            resolved
        );
        if let Some(ref mut handler) = self.handlers.on_clip_moved {
            handler(clip_id, state.duplicate, &resolved);
        }
        self.emit_event(SmartToolEvent::ClipMoved {
            clip_id,
            duplicate: state.duplicate,
            resolved,
        });
    }

    fn commit_trim(&mut self, state: &DragState, ctx: &EditContext<'_>) {
        let (Some(clip_id), Some(new_boundary)) = (state.clip_id, trim_boundary(state, ctx)) else {
            log::warn!("trim committed without clip geometry");
            return;
        };
        if state.zone == EditZone::TrimLeft {
            if let Some(ref mut handler) = self.handlers.on_clip_trim_left {
                handler(clip_id, new_boundary);
            }
            self.emit_event(SmartToolEvent::ClipTrimmedLeft { clip_id, new_boundary });
        } else {
            if let Some(ref mut handler) = self.handlers.on_clip_trim_right {
                handler(clip_id, new_boundary);
            }
            self.emit_event(SmartToolEvent::ClipTrimmedRight { clip_id, new_boundary });
        }
    }

    fn commit_fade(&mut self, state: &DragState, ctx: &EditContext<'_>) {
        let (Some(clip_id), Some(duration)) = (state.clip_id, fade_duration(state, ctx)) else {
            log::warn!("fade committed without clip geometry");
            return;
        };
        if state.zone == EditZone::FadeIn {
            if let Some(ref mut handler) = self.handlers.on_fade_in_changed {
                handler(clip_id, duration);
            }
            self.emit_event(SmartToolEvent::FadeInChanged { clip_id, duration });
        } else {
            if let Some(ref mut handler) = self.handlers.on_fade_out_changed {
                handler(clip_id, duration);
            }
            self.emit_event(SmartToolEvent::FadeOutChanged { clip_id, duration });
        }
    }

    fn commit_crossfade(&mut self, state: &DragState, edge: ClipEdge, ctx: &EditContext<'_>) {
        let Some(clip_id) = state.clip_id else {
            log::warn!("crossfade committed without a clip");
            return;
        };
        let pair = match edge {
            ClipEdge::Left => state.neighbors.left.map(|left| (left, clip_id)),
            ClipEdge::Right => state.neighbors.right.map(|right| (clip_id, right)),
        };
        let Some((clip_a, clip_b)) = pair else {
            log::warn!("crossfade on {:?} edge of {:?} has no neighbor", edge, clip_id);
            return;
        };
        let overlap = ctx.time_base.dx_to_time(state.delta.x).abs();
        if let Some(ref mut handler) = self.handlers.on_crossfade {
            handler(clip_a, clip_b, overlap);
        }
        self.emit_event(SmartToolEvent::CrossfadeRequested {
            clip_a,
            clip_b,
            overlap,
        });
    }
}

fn clip_span(state: &DragState, ctx: &EditContext<'_>) -> Option<(f64, f64)> {
    let bounds = state.original_bounds?;
    Some((
        ctx.time_base.x_to_time(bounds.min.x),
        ctx.time_base.x_to_time(bounds.max.x),
    ))
}

/// 修剪后的新边界。左边界不能越过右边界，也不能早于源媒体起点；
/// 右边界不能越过左边界，也不能超出源媒体剩余长度。
pub fn trim_boundary(state: &DragState, ctx: &EditContext<'_>) -> Option<f64> {
    let (start, end) = clip_span(state, ctx)?;
    let delta = ctx.time_base.dx_to_time(state.delta.x);
    match state.zone {
        EditZone::TrimLeft => {
            let earliest = state.source.map_or(f64::NEG_INFINITY, |s| start - s.offset);
            Some((start + delta).max(earliest).min(end))
        }
        EditZone::TrimRight => {
            let latest = state.source.map_or(f64::INFINITY, |s| start + s.remaining());
            Some((end + delta).min(latest).max(start))
        }
        _ => None,
    }
}

/// 淡化时长取时间轴位移的绝对值，限制在剪辑长度内。淡出从右边界向内测量。
pub fn fade_duration(state: &DragState, ctx: &EditContext<'_>) -> Option<f64> {
    let (start, end) = clip_span(state, ctx)?;
    let duration = ctx.time_base.dx_to_time(state.delta.x).abs();
    Some(duration.clamp(0.0, (end - start).max(0.0)))
}

pub fn range_selection(state: &DragState, ctx: &EditContext<'_>) -> RangeSelection {
    let from = state.start_position;
    let to = from + state.delta;
    let (t0, t1) = (ctx.time_base.x_to_time(from.x), ctx.time_base.x_to_time(to.x));
    RangeSelection {
        start: t0.min(t1),
        end: t0.max(t1),
        top: from.y.min(to.y),
        bottom: from.y.max(to.y),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{ClipLayout, FixedGrid, LinearTimeBase};
    use crate::structure::{ClipHit, Neighbors, SourceExtent, TrackId};
    use egui::{Modifiers, Pos2, Rect, Vec2};
    use std::cell::RefCell;
    use std::rc::Rc;

    struct NoClips;

    impl ClipLayout for NoClips {
        fn clip_at(&self, _pos: Pos2) -> Option<ClipHit> {
            None
        }
    }

    fn with_ctx<R>(f: impl FnOnce(&EditContext<'_>) -> R) -> R {
        let tb = LinearTimeBase::default();
        let grid = FixedGrid(10.0);
        f(&EditContext::new(&NoClips, &Modifiers::NONE, &tb, &grid))
    }

    fn drag(zone: EditZone, dx: f32) -> DragState {
        let origin = Pos2::new(150.0, 20.0);
        DragState {
            zone,
            clip_id: Some(ClipId(5)),
            track_id: Some(TrackId(1)),
            start_position: origin,
            current_position: origin + Vec2::new(dx, 0.0),
            original_bounds: Some(Rect::from_min_max(
                Pos2::new(100.0, 0.0),
                Pos2::new(200.0, 40.0),
            )),
            neighbors: Neighbors {
                left: Some(ClipId(4)),
                right: Some(ClipId(6)),
            },
            source: None,
            axis_lock: false,
            duplicate: false,
            fine_adjust: false,
            delta: Vec2::new(dx, 0.0),
        }
    }

    #[test]
    fn trim_clamps_to_opposite_boundary_and_source() {
        with_ctx(|ctx| {
            assert_eq!(trim_boundary(&drag(EditZone::TrimLeft, -20.0), ctx), Some(80.0));
            assert_eq!(trim_boundary(&drag(EditZone::TrimLeft, 500.0), ctx), Some(200.0));
            assert_eq!(trim_boundary(&drag(EditZone::TrimRight, -500.0), ctx), Some(100.0));

            let mut d = drag(EditZone::TrimLeft, -50.0);
            d.source = Some(SourceExtent::new(30.0, 200.0));
            assert_eq!(trim_boundary(&d, ctx), Some(70.0));

            d.zone = EditZone::TrimRight;
            d.delta.x = 500.0;
            // 源剩余 170，右边界最多到 270
            assert_eq!(trim_boundary(&d, ctx), Some(270.0));
        });
    }

    #[test]
    fn fade_is_absolute_and_clamped() {
        with_ctx(|ctx| {
            assert_eq!(fade_duration(&drag(EditZone::FadeIn, 15.0), ctx), Some(15.0));
            assert_eq!(fade_duration(&drag(EditZone::FadeOut, -15.0), ctx), Some(15.0));
            assert_eq!(fade_duration(&drag(EditZone::FadeOut, -400.0), ctx), Some(100.0));
        });
    }

    #[test]
    fn range_is_normalized() {
        let mut d = drag(EditZone::RangeSelect, -50.0);
        d.delta.y = -10.0;
        let range = with_ctx(|ctx| range_selection(&d, ctx));
        assert_eq!(
            range,
            RangeSelection {
                start: 100.0,
                end: 150.0,
                top: 10.0,
                bottom: 20.0
            }
        );
    }

    #[test]
    fn crossfade_names_both_clips() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let sink = calls.clone();
        let mut dispatcher = Dispatcher::new(SmartToolHandlers {
            on_crossfade: Some(Box::new(move |a, b, overlap| {
                sink.borrow_mut().push((a, b, overlap))
            })),
            ..Default::default()
        });
        with_ctx(|ctx| {
            let left = drag(EditZone::Crossfade { edge: ClipEdge::Left }, 12.0);
            let right = drag(EditZone::Crossfade { edge: ClipEdge::Right }, -8.0);
            dispatcher.commit(&left, EditMode::Grid, ctx);
            dispatcher.commit(&right, EditMode::Grid, ctx);
        });
        assert_eq!(
            *calls.borrow(),
            vec![(ClipId(4), ClipId(5), 12.0), (ClipId(5), ClipId(6), 8.0)]
        );
    }

    #[test]
    fn missing_handlers_are_silent_but_events_are_queued() {
        let mut dispatcher = Dispatcher::default();
        with_ctx(|ctx| dispatcher.commit(&drag(EditZone::TrimRight, 10.0), EditMode::Grid, ctx));
        let events = dispatcher.take_events();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], SmartToolEvent::DragEnded { .. }));
        assert!(matches!(
            events[1],
            SmartToolEvent::ClipTrimmedRight {
                clip_id: ClipId(5),
                new_boundary
            } if new_boundary == 210.0
        ));
        assert!(dispatcher.take_events().is_empty());
    }

    #[test]
    fn zero_delta_commits_nothing() {
        let moved = Rc::new(RefCell::new(0));
        let sink = moved.clone();
        let mut dispatcher = Dispatcher::new(SmartToolHandlers {
            on_clip_moved: Some(Box::new(move |_, _, _| *sink.borrow_mut() += 1)),
            ..Default::default()
        });
        with_ctx(|ctx| dispatcher.commit(&drag(EditZone::Move, 0.0), EditMode::Grid, ctx));
        assert_eq!(*moved.borrow(), 0);
    }

    #[test]
    fn listener_sees_every_event() {
        let seen = Rc::new(RefCell::new(0));
        let sink = seen.clone();
        let mut dispatcher = Dispatcher::default();
        dispatcher.set_event_listener(Box::new(move |_| *sink.borrow_mut() += 1));
        dispatcher.clip_selected(ClipId(1));
        dispatcher.tool_action(ToolAction::Play { time: 1.0 });
        assert_eq!(*seen.borrow(), 2);
    }
}
