//! 区域分类模块
//!
//! 把剪辑矩形划分为淡入/淡出、修剪、交叉淡化和移动区域，并根据指针位置判断当前适用的编辑操作。
//! 区域之间存在重叠，判定顺序固定：
//!
//! 1. 指针在剪辑矩形之外 → 范围选择
//! 2. 顶部淡化带 → 淡入（左半）/ 淡出（右半），优先于修剪
//! 3. 左侧修剪带 → 有左邻居且位于内侧一半时为交叉淡化，否则修剪左边界
//! 4. 右侧修剪带 → 同上，方向相反
//! 5. 其余 → 选择/移动

use crate::structure::{ClipHit, ClipId, Neighbors, SourceExtent, TrackId};
use egui::{CursorIcon, Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Zone sizing. Sizes are clamped to `[min_*_pixels, max_*_fraction * extent]`;
/// when those bounds cross on a narrow clip the upper cap wins.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneConfig {
    /// Trim band width as a fraction of clip width.
    pub trim_zone_fraction: f32,
    /// Fade band height as a fraction of clip height.
    pub fade_zone_fraction: f32,
    pub min_trim_pixels: f32,
    pub min_fade_pixels: f32,
    pub max_trim_fraction: f32,
    pub max_fade_fraction: f32,
}

impl Default for ZoneConfig {
    fn default() -> Self {
        Self {
            trim_zone_fraction: 0.10,
            fade_zone_fraction: 0.20,
            min_trim_pixels: 8.0,
            min_fade_pixels: 10.0,
            max_trim_fraction: 0.25,
            max_fade_fraction: 0.40,
        }
    }
}

impl ZoneConfig {
    pub fn trim_zone_width(&self, clip_width: f32) -> f32 {
        (clip_width * self.trim_zone_fraction)
            .max(self.min_trim_pixels)
            .min(clip_width * self.max_trim_fraction)
    }

    pub fn fade_zone_height(&self, clip_height: f32) -> f32 {
        (clip_height * self.fade_zone_fraction)
            .max(self.min_fade_pixels)
            .min(clip_height * self.max_fade_fraction)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClipEdge {
    Left,
    Right,
}

/// 指针下方可用的编辑操作
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EditZone {
    /// 没有可用操作，拖拽不会开始
    None,
    RangeSelect,
    FadeIn,
    FadeOut,
    Crossfade { edge: ClipEdge },
    TrimLeft,
    TrimRight,
    /// 选择/移动
    Move,
}

impl EditZone {
    pub fn cursor(&self) -> CursorIcon {
        match self {
            EditZone::None => CursorIcon::Default,
            EditZone::RangeSelect => CursorIcon::Cell,
            EditZone::FadeIn => CursorIcon::ResizeNwSe,
            EditZone::FadeOut => CursorIcon::ResizeNeSw,
            EditZone::Crossfade { .. } => CursorIcon::ResizeColumn,
            EditZone::TrimLeft => CursorIcon::ResizeWest,
            EditZone::TrimRight => CursorIcon::ResizeEast,
            EditZone::Move => CursorIcon::Move,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, EditZone::None)
    }
}

/// 单次命中测试的结果，每个指针事件重新计算，不会被保留
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitResult {
    pub zone: EditZone,
    pub cursor: CursorIcon,
    pub clip_id: Option<ClipId>,
    pub track_id: Option<TrackId>,
    /// 相对剪辑左上角的位置；没有剪辑时为屏幕坐标
    pub local_position: Vec2,
    pub clip_bounds: Option<Rect>,
    pub neighbors: Neighbors,
    pub source: Option<SourceExtent>,
}

impl HitResult {
    pub fn none(pos: Pos2) -> Self {
        Self::empty(EditZone::None, pos)
    }

    pub fn range_select(pos: Pos2) -> Self {
        Self::empty(EditZone::RangeSelect, pos)
    }

    fn empty(zone: EditZone, pos: Pos2) -> Self {
        Self {
            zone,
            cursor: zone.cursor(),
            clip_id: None,
            track_id: None,
            local_position: pos.to_vec2(),
            clip_bounds: None,
            neighbors: Neighbors::default(),
            source: None,
        }
    }
}

/// 纯函数分类器：同样的输入总是得到同样的结果
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ZoneClassifier {
    config: ZoneConfig,
}

impl ZoneClassifier {
    pub fn new(config: ZoneConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ZoneConfig {
        &self.config
    }

    /// 在剪辑局部坐标中分类。`local` 位于 `[0, size]` 之外时返回范围选择。
    pub fn classify(&self, local: Vec2, size: Vec2, neighbors: Neighbors) -> EditZone {
        let (w, h) = (size.x, size.y);
        let (x, y) = (local.x, local.y);
        if x < 0.0 || y < 0.0 || x > w || y > h {
            return EditZone::RangeSelect;
        }
        // 退化的剪辑上没有可编辑区域
        if w <= 0.0 || h <= 0.0 {
            return EditZone::None;
        }

        // 淡化带优先：角落里同时落在淡化带和修剪带时按淡化处理
        let fade_height = self.config.fade_zone_height(h);
        if y < fade_height {
            return if x < w / 2.0 {
                EditZone::FadeIn
            } else {
                EditZone::FadeOut
            };
        }

        let trim_width = self.config.trim_zone_width(w);
        if x < trim_width {
            if neighbors.has_left() && x < trim_width / 2.0 {
                return EditZone::Crossfade {
                    edge: ClipEdge::Left,
                };
            }
            return EditZone::TrimLeft;
        }
        if x > w - trim_width {
            if neighbors.has_right() && x > w - trim_width / 2.0 {
                return EditZone::Crossfade {
                    edge: ClipEdge::Right,
                };
            }
            return EditZone::TrimRight;
        }

        EditZone::Move
    }

    /// 对屏幕坐标做命中测试。`clip` 为空表示指针下方没有剪辑。
    pub fn hit_test(&self, pos: Pos2, clip: Option<&ClipHit>, neighbors: Neighbors) -> HitResult {
        let Some(clip) = clip else {
            return HitResult::range_select(pos);
        };
        let local = pos - clip.bounds.min;
        let zone = self.classify(local, clip.bounds.size(), neighbors);
        if zone == EditZone::RangeSelect {
            return HitResult::range_select(pos);
        }
        HitResult {
            zone,
            cursor: zone.cursor(),
            clip_id: Some(clip.clip_id),
            track_id: Some(clip.track_id),
            local_position: local,
            clip_bounds: Some(clip.bounds),
            neighbors,
            source: clip.source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> ZoneClassifier {
        ZoneClassifier::new(ZoneConfig::default())
    }

    fn both() -> Neighbors {
        Neighbors {
            left: Some(ClipId(1)),
            right: Some(ClipId(3)),
        }
    }

    #[test]
    fn trim_zone_is_clamped() {
        let config = ZoneConfig::default();
        assert_eq!(config.trim_zone_width(50.0), 8.0);
        assert_eq!(config.trim_zone_width(500.0), 50.0);
        assert_eq!(config.trim_zone_width(100.0), 10.0);
        // 上限优先
        assert_eq!(config.trim_zone_width(20.0), 5.0);
    }

    #[test]
    fn fade_zone_is_clamped() {
        let config = ZoneConfig::default();
        assert_eq!(config.fade_zone_height(40.0), 10.0);
        assert_eq!(config.fade_zone_height(100.0), 20.0);
        assert_eq!(config.fade_zone_height(20.0), 8.0);
    }

    #[test]
    fn outside_is_range_select() {
        let c = classifier();
        let size = Vec2::new(100.0, 40.0);
        for local in [
            Vec2::new(-1.0, 20.0),
            Vec2::new(101.0, 20.0),
            Vec2::new(50.0, -0.5),
            Vec2::new(50.0, 40.5),
        ] {
            assert_eq!(c.classify(local, size, both()), EditZone::RangeSelect);
        }
    }

    #[test]
    fn fade_wins_over_trim_in_corners() {
        let c = classifier();
        let size = Vec2::new(100.0, 40.0);
        assert_eq!(c.classify(Vec2::new(2.0, 2.0), size, both()), EditZone::FadeIn);
        assert_eq!(c.classify(Vec2::new(98.0, 2.0), size, both()), EditZone::FadeOut);
        assert_eq!(c.classify(Vec2::new(49.0, 5.0), size, both()), EditZone::FadeIn);
        assert_eq!(c.classify(Vec2::new(51.0, 5.0), size, both()), EditZone::FadeOut);
    }

    #[test]
    fn crossfade_needs_neighbor_and_inner_half() {
        let c = classifier();
        let size = Vec2::new(100.0, 40.0);
        let none = Neighbors::default();

        assert_eq!(
            c.classify(Vec2::new(3.0, 20.0), size, both()),
            EditZone::Crossfade { edge: ClipEdge::Left }
        );
        assert_eq!(c.classify(Vec2::new(3.0, 20.0), size, none), EditZone::TrimLeft);
        // 修剪带另一半仍然是普通修剪
        assert_eq!(c.classify(Vec2::new(7.0, 20.0), size, both()), EditZone::TrimLeft);

        assert_eq!(
            c.classify(Vec2::new(97.0, 20.0), size, both()),
            EditZone::Crossfade { edge: ClipEdge::Right }
        );
        assert_eq!(c.classify(Vec2::new(93.0, 20.0), size, both()), EditZone::TrimRight);
        assert_eq!(c.classify(Vec2::new(97.0, 20.0), size, none), EditZone::TrimRight);
    }

    #[test]
    fn body_is_move() {
        let c = classifier();
        assert_eq!(
            c.classify(Vec2::new(50.0, 20.0), Vec2::new(100.0, 40.0), both()),
            EditZone::Move
        );
    }

    #[test]
    fn degenerate_clip_has_no_zone() {
        let c = classifier();
        let none = Neighbors::default();
        assert_eq!(c.classify(Vec2::ZERO, Vec2::new(0.0, 40.0), none), EditZone::None);
        assert_eq!(c.classify(Vec2::new(0.0, 20.0), Vec2::new(0.0, 40.0), none), EditZone::None);
        assert_eq!(c.classify(Vec2::new(50.0, 0.0), Vec2::new(100.0, 0.0), none), EditZone::None);
    }

    #[test]
    fn outside_degenerate_clip_is_still_range_select() {
        let c = classifier();
        let none = Neighbors::default();
        assert_eq!(
            c.classify(Vec2::new(-50.0, 20.0), Vec2::new(0.0, 40.0), none),
            EditZone::RangeSelect
        );
        assert_eq!(
            c.classify(Vec2::new(1.0, 20.0), Vec2::new(0.0, 40.0), none),
            EditZone::RangeSelect
        );
        assert_eq!(
            c.classify(Vec2::new(50.0, 5.0), Vec2::new(100.0, 0.0), none),
            EditZone::RangeSelect
        );

        let flat = ClipHit::new(
            ClipId(9),
            TrackId(1),
            Rect::from_min_max(Pos2::new(100.0, 0.0), Pos2::new(100.0, 40.0)),
        );
        let hit = c.hit_test(Pos2::new(60.0, 20.0), Some(&flat), none);
        assert_eq!(hit.zone, EditZone::RangeSelect);
        assert_eq!(hit.clip_id, None);
    }

    #[test]
    fn hit_test_reports_clip_and_local_position() {
        let c = classifier();
        let clip = ClipHit::new(
            ClipId(7),
            TrackId(2),
            Rect::from_min_max(Pos2::new(100.0, 0.0), Pos2::new(200.0, 40.0)),
        );
        let hit = c.hit_test(Pos2::new(105.0, 20.0), Some(&clip), Neighbors::default());
        assert_eq!(hit.zone, EditZone::TrimLeft);
        assert_eq!(hit.cursor, CursorIcon::ResizeWest);
        assert_eq!(hit.clip_id, Some(ClipId(7)));
        assert_eq!(hit.track_id, Some(TrackId(2)));
        assert_eq!(hit.local_position, Vec2::new(5.0, 20.0));

        let outside = c.hit_test(Pos2::new(250.0, 20.0), Some(&clip), Neighbors::default());
        assert_eq!(outside.zone, EditZone::RangeSelect);
        assert_eq!(outside.clip_id, None);

        let empty = c.hit_test(Pos2::new(250.0, 20.0), None, Neighbors::default());
        assert_eq!(empty.zone, EditZone::RangeSelect);
        assert_eq!(empty.cursor, CursorIcon::Cell);
    }
}
