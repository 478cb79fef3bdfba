//! 编辑模式模块
//!
//! 四种互斥的移动策略，只作用于选择/移动手势；修剪和淡化直接编辑边界，不经过这里。
//!
//! - Grid：最终位置吸附到最近的网格线，按住细调键时不吸附
//! - Spot：忽略相对位移，剪辑起点落在松开指针的绝对时间上
//! - Slip：剪辑边界不动，只移动源媒体的对齐点
//! - Shuffle：剪辑按位移移动，被挤到的邻居按同样的位移让开

use crate::context::EditContext;
use crate::drag::DragState;
use crate::structure::{ClipId, ClipSpan};
use serde::{Deserialize, Serialize};

const EPSILON: f64 = 1e-9;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EditMode {
    Shuffle,
    Slip,
    Spot,
    #[default]
    Grid,
}

impl EditMode {
    pub const ALL: [EditMode; 4] = [
        EditMode::Shuffle,
        EditMode::Slip,
        EditMode::Spot,
        EditMode::Grid,
    ];

    pub fn policy(&self) -> &'static dyn MovePolicy {
        match self {
            EditMode::Shuffle => &ShufflePolicy,
            EditMode::Slip => &SlipPolicy,
            EditMode::Spot => &SpotPolicy,
            EditMode::Grid => &GridPolicy,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EditMode::Shuffle => "Shuffle",
            EditMode::Slip => "Slip",
            EditMode::Spot => "Spot",
            EditMode::Grid => "Grid",
        }
    }
}

/// 被 Shuffle 推开的邻居及其新起点
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Displacement {
    pub clip_id: ClipId,
    pub new_start: f64,
}

/// 策略解析后的最终结果
#[derive(Clone, Debug, PartialEq)]
pub enum ResolvedMove {
    Reposition { start: f64 },
    Shuffle { start: f64, displaced: Vec<Displacement> },
    Slip { content_offset: f64 },
}

impl ResolvedMove {
    /// 剪辑的新起点；Slip 不移动剪辑，返回 `None`
    pub fn start(&self) -> Option<f64> {
        match self {
            ResolvedMove::Reposition { start } | ResolvedMove::Shuffle { start, .. } => {
                Some(*start)
            }
            ResolvedMove::Slip { .. } => None,
        }
    }
}

pub trait MovePolicy {
    /// 把拖拽位移折算为最终位置。拖拽不带剪辑几何时返回 `None`。
    fn resolve(&self, drag: &DragState, ctx: &EditContext<'_>) -> Option<ResolvedMove>;
}

/// 剪辑原始的时间跨度
fn original_span(drag: &DragState, ctx: &EditContext<'_>) -> Option<(f64, f64)> {
    let bounds = drag.original_bounds?;
    let start = ctx.time_base.x_to_time(bounds.min.x);
    let end = ctx.time_base.x_to_time(bounds.max.x);
    Some((start, end))
}

fn time_delta(drag: &DragState, ctx: &EditContext<'_>) -> f64 {
    ctx.time_base.dx_to_time(drag.delta.x)
}

/// 四舍五入到最近的网格线；间隔不大于 0 时原样返回
pub fn snap_to_grid(position: f64, interval: f64) -> f64 {
    if interval <= 0.0 {
        return position;
    }
    (position / interval).round() * interval
}

#[derive(Clone, Copy, Debug, Default)]
pub struct GridPolicy;

impl MovePolicy for GridPolicy {
    fn resolve(&self, drag: &DragState, ctx: &EditContext<'_>) -> Option<ResolvedMove> {
        let (start, _) = original_span(drag, ctx)?;
        let raw = start + time_delta(drag, ctx);
        let snapped = if drag.fine_adjust {
            raw
        } else {
            snap_to_grid(raw, ctx.grid.grid_interval())
        };
        Some(ResolvedMove::Reposition {
            start: snapped.max(0.0),
        })
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SpotPolicy;

impl MovePolicy for SpotPolicy {
    fn resolve(&self, drag: &DragState, ctx: &EditContext<'_>) -> Option<ResolvedMove> {
        drag.original_bounds?;
        // 落点受轴锁定约束；不参考原位置，也不参考网格
        let drop_x = drag.start_position.x + drag.delta.x;
        Some(ResolvedMove::Reposition {
            start: ctx.time_base.x_to_time(drop_x).max(0.0),
        })
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SlipPolicy;

impl MovePolicy for SlipPolicy {
    fn resolve(&self, drag: &DragState, ctx: &EditContext<'_>) -> Option<ResolvedMove> {
        let (start, end) = original_span(drag, ctx)?;
        let (offset, max_offset) = match drag.source {
            Some(source) => (source.offset, (source.length - (end - start)).max(0.0)),
            None => (0.0, f64::INFINITY),
        };
        let shifted = offset + time_delta(drag, ctx);
        Some(ResolvedMove::Slip {
            content_offset: shifted.clamp(0.0, max_offset),
        })
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ShufflePolicy;

impl MovePolicy for ShufflePolicy {
    fn resolve(&self, drag: &DragState, ctx: &EditContext<'_>) -> Option<ResolvedMove> {
        let (start, end) = original_span(drag, ctx)?;
        let others: Vec<ClipSpan> = match drag.track_id {
            Some(track_id) => ctx
                .layout
                .track_clips(track_id)
                .into_iter()
                .filter(|span| Some(span.clip_id) != drag.clip_id)
                .collect(),
            None => Vec::new(),
        };

        let mut delta = time_delta(drag, ctx).max(-start);
        let mut displaced = shuffle_chain(&others, start, end, delta);

        // 向左推挤时，链条最末端不能越过 0
        let lowest = displaced.iter().map(|d| d.new_start).fold(f64::INFINITY, f64::min);
        if lowest < 0.0 {
            delta -= lowest;
            displaced = shuffle_chain(&others, start, end, delta);
        }

        Some(ResolvedMove::Shuffle {
            start: start + delta,
            displaced,
        })
    }
}

/// 沿移动方向依次检查邻居：被当前前沿覆盖的剪辑按同样位移让开，并把前沿推到它的另一端，
/// 直到遇到够不着的剪辑为止。
pub fn shuffle_chain(others: &[ClipSpan], start: f64, end: f64, delta: f64) -> Vec<Displacement> {
    let mut displaced = Vec::new();
    if delta > 0.0 {
        let mut ahead: Vec<&ClipSpan> =
            others.iter().filter(|c| c.start >= end - EPSILON).collect();
        ahead.sort_by(|a, b| a.start.total_cmp(&b.start));
        let mut frontier = end + delta;
        for clip in ahead {
            if clip.start >= frontier - EPSILON {
                break;
            }
            displaced.push(Displacement {
                clip_id: clip.clip_id,
                new_start: clip.start + delta,
            });
            frontier = clip.end + delta;
        }
    } else if delta < 0.0 {
        let mut behind: Vec<&ClipSpan> =
            others.iter().filter(|c| c.end <= start + EPSILON).collect();
        behind.sort_by(|a, b| b.end.total_cmp(&a.end));
        let mut frontier = start + delta;
        for clip in behind {
            if clip.end <= frontier + EPSILON {
                break;
            }
            displaced.push(Displacement {
                clip_id: clip.clip_id,
                new_start: clip.start + delta,
            });
            frontier = clip.start + delta;
        }
    }
    displaced
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{ClipLayout, FixedGrid, LinearTimeBase};
    use crate::structure::{ClipHit, SourceExtent, TrackId};
    use crate::zone::EditZone;
    use egui::{Modifiers, Pos2, Rect, Vec2};

    struct Track(Vec<ClipSpan>);

    impl ClipLayout for Track {
        fn clip_at(&self, _pos: Pos2) -> Option<ClipHit> {
            None
        }

        fn track_clips(&self, _track_id: TrackId) -> Vec<ClipSpan> {
            self.0.clone()
        }
    }

    fn drag(start: f32, end: f32, dx: f32) -> DragState {
        let origin = Pos2::new(start + 1.0, 20.0);
        DragState {
            zone: EditZone::Move,
            clip_id: Some(ClipId(1)),
            track_id: Some(TrackId(1)),
            start_position: origin,
            current_position: origin + Vec2::new(dx, 0.0),
            original_bounds: Some(Rect::from_min_max(Pos2::new(start, 0.0), Pos2::new(end, 40.0))),
            neighbors: Default::default(),
            source: None,
            axis_lock: false,
            duplicate: false,
            fine_adjust: false,
            delta: Vec2::new(dx, 0.0),
        }
    }

    fn resolve(mode: EditMode, drag: &DragState, layout: &Track, grid: f64) -> ResolvedMove {
        let tb = LinearTimeBase::default();
        let grid = FixedGrid(grid);
        let ctx = EditContext::new(layout, &Modifiers::NONE, &tb, &grid);
        mode.policy().resolve(drag, &ctx).unwrap()
    }

    #[test]
    fn snap_to_nearest_multiple() {
        assert_eq!(snap_to_grid(17.0, 10.0), 20.0);
        assert_eq!(snap_to_grid(14.0, 10.0), 10.0);
        assert_eq!(snap_to_grid(16.0, 10.0), 20.0);
        assert_eq!(snap_to_grid(17.0, 0.0), 17.0);
    }

    #[test]
    fn grid_snaps_unless_fine_adjust() {
        let empty = Track(Vec::new());
        let mut d = drag(10.0, 30.0, 7.0);
        assert_eq!(
            resolve(EditMode::Grid, &d, &empty, 10.0),
            ResolvedMove::Reposition { start: 20.0 }
        );

        d.delta.x = 4.0;
        assert_eq!(
            resolve(EditMode::Grid, &d, &empty, 10.0),
            ResolvedMove::Reposition { start: 10.0 }
        );

        d.fine_adjust = true;
        assert_eq!(
            resolve(EditMode::Grid, &d, &empty, 10.0),
            ResolvedMove::Reposition { start: 14.0 }
        );
    }

    #[test]
    fn spot_uses_absolute_drop_position() {
        let empty = Track(Vec::new());
        let d = drag(10.0, 30.0, 56.0);
        // 落点 x = 11 + 56，不吸附网格，不叠加原位置
        assert_eq!(
            resolve(EditMode::Spot, &d, &empty, 10.0),
            ResolvedMove::Reposition { start: 67.0 }
        );
    }

    #[test]
    fn slip_moves_content_not_bounds() {
        let empty = Track(Vec::new());
        let mut d = drag(100.0, 150.0, 20.0);
        d.source = Some(SourceExtent::new(10.0, 100.0));
        let resolved = resolve(EditMode::Slip, &d, &empty, 10.0);
        assert_eq!(resolved, ResolvedMove::Slip { content_offset: 30.0 });
        assert_eq!(resolved.start(), None);

        // 源长度 100，可见 50，对齐点最多 50
        d.delta.x = 500.0;
        assert_eq!(
            resolve(EditMode::Slip, &d, &empty, 10.0),
            ResolvedMove::Slip { content_offset: 50.0 }
        );
        d.delta.x = -500.0;
        assert_eq!(
            resolve(EditMode::Slip, &d, &empty, 10.0),
            ResolvedMove::Slip { content_offset: 0.0 }
        );
    }

    #[test]
    fn shuffle_pushes_overlapped_neighbor_only() {
        let track = Track(vec![
            ClipSpan::new(ClipId(1), 0.0, 10.0),
            ClipSpan::new(ClipId(2), 12.0, 20.0),
            ClipSpan::new(ClipId(3), 100.0, 110.0),
        ]);
        let d = drag(0.0, 10.0, 5.0);
        assert_eq!(
            resolve(EditMode::Shuffle, &d, &track, 10.0),
            ResolvedMove::Shuffle {
                start: 5.0,
                displaced: vec![Displacement {
                    clip_id: ClipId(2),
                    new_start: 17.0
                }],
            }
        );
    }

    #[test]
    fn shuffle_push_cascades() {
        let track = Track(vec![
            ClipSpan::new(ClipId(2), 12.0, 20.0),
            ClipSpan::new(ClipId(3), 21.0, 30.0),
        ]);
        let d = drag(0.0, 10.0, 5.0);
        let ResolvedMove::Shuffle { displaced, .. } = resolve(EditMode::Shuffle, &d, &track, 10.0)
        else {
            panic!("expected shuffle");
        };
        let ids: Vec<_> = displaced.iter().map(|d| d.clip_id).collect();
        assert_eq!(ids, vec![ClipId(2), ClipId(3)]);
    }

    #[test]
    fn shuffle_left_stops_at_zero() {
        let track = Track(vec![ClipSpan::new(ClipId(2), 4.0, 10.0)]);
        let d = drag(10.0, 20.0, -8.0);
        assert_eq!(
            resolve(EditMode::Shuffle, &d, &track, 10.0),
            ResolvedMove::Shuffle {
                start: 6.0,
                displaced: vec![Displacement {
                    clip_id: ClipId(2),
                    new_start: 0.0
                }],
            }
        );
    }
}
