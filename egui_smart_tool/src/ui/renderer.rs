use crate::drag::DragState;
use crate::timeline::TimelineState;
use crate::zone::{ClipEdge, EditZone, HitResult, ZoneConfig};
use egui::*;

const ZONE_HIGHLIGHT: Color32 = Color32::from_rgba_premultiplied(60, 60, 20, 60);
const ZONE_ACTIVE: Color32 = Color32::from_rgba_premultiplied(110, 110, 30, 110);

/// 绘制虚线垂直线
pub fn draw_dashed_vertical_line(painter: &Painter, x: f32, top: f32, bottom: f32, stroke: Stroke) {
    let dash_len = 2.0;
    let gap_len = 2.0;
    let mut y = top;
    while y < bottom {
        let next = (y + dash_len).min(bottom);
        painter.line_segment([Pos2::new(x, y), Pos2::new(x, next)], stroke);
        y += dash_len + gap_len;
    }
}

/// 绘制范围选择框
pub fn draw_selection_box(painter: &Painter, rect: Rect) {
    painter.rect_filled(rect, 0.0, Color32::from_rgba_unmultiplied(100, 150, 255, 50));
    painter.rect_stroke(rect, 0.0, Stroke::new(2.0, Color32::from_rgb(100, 150, 255)));
}

/// 高亮悬停剪辑的各个区域，当前命中的区域颜色更深
pub fn draw_zone_overlay(painter: &Painter, hit: &HitResult, config: &ZoneConfig) {
    let Some(bounds) = hit.clip_bounds else {
        return;
    };
    let trim = config.trim_zone_width(bounds.width());
    let fade = config.fade_zone_height(bounds.height());
    let fill = |zone: EditZone| if hit.zone == zone { ZONE_ACTIVE } else { ZONE_HIGHLIGHT };

    let (fade_left, fade_right) = bounds.split_left_right_at_x(bounds.center().x);
    painter.rect_filled(fade_left.with_max_y(bounds.min.y + fade), 0.0, fill(EditZone::FadeIn));
    painter.rect_filled(fade_right.with_max_y(bounds.min.y + fade), 0.0, fill(EditZone::FadeOut));

    let body_top = bounds.min.y + fade;
    let left = Rect::from_min_max(
        Pos2::new(bounds.min.x, body_top),
        Pos2::new(bounds.min.x + trim, bounds.max.y),
    );
    let right = Rect::from_min_max(Pos2::new(bounds.max.x - trim, body_top), bounds.max);
    painter.rect_filled(left, 0.0, fill(EditZone::TrimLeft));
    painter.rect_filled(right, 0.0, fill(EditZone::TrimRight));

    // 交叉淡化只占修剪带内侧一半
    match hit.zone {
        EditZone::Crossfade { edge: ClipEdge::Left } => {
            painter.rect_filled(left.with_max_x(bounds.min.x + trim / 2.0), 0.0, ZONE_ACTIVE);
        }
        EditZone::Crossfade { edge: ClipEdge::Right } => {
            painter.rect_filled(right.with_min_x(bounds.max.x - trim / 2.0), 0.0, ZONE_ACTIVE);
        }
        _ => {}
    }
}

/// 拖拽预览：范围选择画选择框，其余操作画出起点到当前点的位移
pub fn draw_drag_preview(painter: &Painter, drag: &DragState) {
    let from = drag.start_position;
    let to = from + drag.delta;
    match drag.zone {
        EditZone::None => {}
        EditZone::RangeSelect => draw_selection_box(painter, Rect::from_two_pos(from, to)),
        EditZone::Move => {
            if let Some(bounds) = drag.original_bounds {
                let ghost = bounds.translate(drag.delta);
                painter.rect_stroke(ghost, 4.0, Stroke::new(1.5, Color32::from_rgb(255, 255, 100)));
            }
        }
        EditZone::TrimLeft
        | EditZone::TrimRight
        | EditZone::FadeIn
        | EditZone::FadeOut
        | EditZone::Crossfade { .. } => {
            let top = drag.original_bounds.map_or(from.y, |b| b.min.y);
            let bottom = drag.original_bounds.map_or(from.y, |b| b.max.y);
            let stroke = Stroke::new(1.5, Color32::from_rgb(255, 200, 80));
            draw_dashed_vertical_line(painter, to.x, top, bottom, stroke);
        }
    }
}

/// 绘制时间网格线，网格间隔与 Grid 模式的吸附间隔一致
pub fn draw_grid(painter: &Painter, rect: Rect, timeline: &TimelineState) {
    let tpb = timeline.ticks_per_beat.max(1) as i64;
    let step = if timeline.snap_interval > 0 {
        timeline.snap_interval as i64
    } else {
        tpb
    };
    let first = timeline.x_to_tick(rect.min.x).max(0);
    let last = timeline.x_to_tick(rect.max.x);

    let beat_line_color = Color32::from_rgb(140, 140, 140);
    let subdivision_color = Color32::from_rgb(90, 90, 90);

    let mut tick = (first / step) * step;
    while tick <= last {
        let x = timeline.tick_to_x(tick);
        if x >= rect.min.x && x <= rect.max.x {
            if tick % tpb == 0 {
                painter.line_segment(
                    [Pos2::new(x, rect.min.y), Pos2::new(x, rect.max.y)],
                    Stroke::new(1.0, beat_line_color),
                );
            } else {
                let stroke = Stroke::new(1.0, subdivision_color);
                draw_dashed_vertical_line(painter, x, rect.min.y, rect.max.y, stroke);
            }
        }
        tick += step;
    }
}
