//! 时间轴模块
//!
//! 宿主时间轴的缩放/滚动/速度状态。它同时充当项目的原生时间基准（以 tick 为最小单位）
//! 和 Grid 模式的网格提供者。

use crate::context::{GridSource, TimeBase};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineState {
    pub zoom_x: f32,           // 水平缩放（像素/节拍）
    pub scroll_x: f64,         // 水平滚动位置（节拍）
    pub manual_scroll_x: f32,  // 手动水平滚动偏移（像素）
    pub header_width: f32,     // 轨道头宽度，时间轴从这里开始
    pub snap_enabled: bool,
    pub snap_interval: u64,    // 对齐间隔（tick）
    pub bpm: f32,
    pub ticks_per_beat: u16,
}

impl Default for TimelineState {
    fn default() -> Self {
        Self {
            zoom_x: 100.0,       // 100 像素/节拍
            scroll_x: 0.0,
            manual_scroll_x: 0.0,
            header_width: 0.0,
            snap_enabled: true,
            snap_interval: 480,  // 1 拍
            bpm: 120.0,
            ticks_per_beat: 480,
        }
    }
}

impl TimelineState {
    fn seconds_per_tick(&self) -> f64 {
        let seconds_per_beat = 60.0 / self.bpm.max(1.0) as f64;
        seconds_per_beat / self.ticks_per_beat.max(1) as f64
    }

    /// 将时间（秒）转换为 tick
    pub fn time_to_tick(&self, time: f64) -> i64 {
        (time / self.seconds_per_tick()).round() as i64
    }

    /// 将 tick 转换为时间（秒）
    pub fn tick_to_time(&self, tick: i64) -> f64 {
        tick as f64 * self.seconds_per_tick()
    }

    pub fn beat_to_tick(&self, beat: f64) -> i64 {
        (beat * self.ticks_per_beat.max(1) as f64).round() as i64
    }

    pub fn tick_to_beat(&self, tick: i64) -> f64 {
        tick as f64 / self.ticks_per_beat.max(1) as f64
    }

    /// 将 tick 转换为 x 坐标（像素）
    pub fn tick_to_x(&self, tick: i64) -> f32 {
        let rel_beat = self.tick_to_beat(tick) - self.scroll_x;
        self.header_width + (rel_beat as f32 * self.zoom_x) + self.manual_scroll_x
    }

    /// 将 x 坐标（像素）转换为 tick。滚动到 0 之前的位置会得到负 tick。
    pub fn x_to_tick(&self, x: f32) -> i64 {
        let rel_x = x - self.header_width - self.manual_scroll_x;
        let beat = (rel_x / self.zoom_x.max(f32::EPSILON)) as f64 + self.scroll_x;
        self.beat_to_tick(beat)
    }

    pub fn time_to_x(&self, time: f64) -> f32 {
        self.tick_to_x(self.time_to_tick(time))
    }
}

impl TimeBase for TimelineState {
    fn x_to_time(&self, x: f32) -> f64 {
        self.tick_to_time(self.x_to_tick(x))
    }

    fn dx_to_time(&self, dx: f32) -> f64 {
        let beats = (dx / self.zoom_x.max(f32::EPSILON)) as f64;
        self.tick_to_time(self.beat_to_tick(beats))
    }
}

impl GridSource for TimelineState {
    fn grid_interval(&self) -> f64 {
        if !self.snap_enabled || self.snap_interval == 0 {
            return 0.0;
        }
        self.tick_to_time(self.snap_interval as i64)
    }
}
