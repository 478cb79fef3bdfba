//! 数据结构模块
//!
//! 定义了智能工具使用的最小几何数据：剪辑/音轨标识、剪辑命中信息、源媒体范围和相邻关系。
//! 剪辑的完整数据模型属于宿主应用，这里只保留交互所需的部分。

use egui::Rect;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

static TRACK_ID_COUNTER: AtomicU64 = AtomicU64::new(1);
static CLIP_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TrackId(pub u64);

impl TrackId {
    pub fn next() -> Self {
        TrackId(TRACK_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClipId(pub u64);

impl ClipId {
    pub fn next() -> Self {
        ClipId(CLIP_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

/// 剪辑在源媒体中的可用范围（项目时间单位）
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SourceExtent {
    pub offset: f64,  // 剪辑起点对应的源媒体位置
    pub length: f64,  // 源媒体总长度
}

impl SourceExtent {
    pub fn new(offset: f64, length: f64) -> Self {
        Self { offset, length }
    }

    /// 剪辑起点之后还能露出多少源媒体
    pub fn remaining(&self) -> f64 {
        (self.length - self.offset).max(0.0)
    }
}

/// 几何提供者对某个位置的回答：指针下方的剪辑
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClipHit {
    pub clip_id: ClipId,
    pub track_id: TrackId,
    pub bounds: Rect,          // 屏幕坐标，x 轴即时间轴
    pub source: Option<SourceExtent>,
}

impl ClipHit {
    pub fn new(clip_id: ClipId, track_id: TrackId, bounds: Rect) -> Self {
        Self {
            clip_id,
            track_id,
            bounds,
            source: None,
        }
    }

    pub fn with_source(mut self, source: SourceExtent) -> Self {
        self.source = Some(source);
        self
    }
}

/// 同一音轨上紧邻的剪辑
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Neighbors {
    pub left: Option<ClipId>,
    pub right: Option<ClipId>,
}

impl Neighbors {
    pub fn has_left(&self) -> bool {
        self.left.is_some()
    }

    pub fn has_right(&self) -> bool {
        self.right.is_some()
    }
}

/// 剪辑在音轨上的时间跨度（Shuffle 模式推挤邻居时使用）
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClipSpan {
    pub clip_id: ClipId,
    pub start: f64,
    pub end: f64,
}

impl ClipSpan {
    pub fn new(clip_id: ClipId, start: f64, end: f64) -> Self {
        Self { clip_id, start, end }
    }
}

/// 范围选择的结果，时间在 x 轴，纵向范围保留屏幕坐标以便跨轨选择
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RangeSelection {
    pub start: f64,
    pub end: f64,
    pub top: f32,
    pub bottom: f32,
}
