use eframe::egui;
use egui::{Color32, Pos2, Rect, Sense, Stroke, Vec2};
use egui_smart_tool::{
    ClipHit, ClipId, ClipLayout, ClipSpan, Neighbors, ResolvedMove, SmartTool, SmartToolEditor,
    SmartToolEvent, SmartToolSettings, SourceExtent, TimelineState, ToolAction, TrackId,
};
use rfd::FileDialog;

const LANE_HEIGHT: f32 = 80.0;
const LANE_PADDING: f32 = 6.0;
const HEADER_WIDTH: f32 = 120.0;

fn main() -> eframe::Result<()> {
    env_logger::init();

    let native_options = eframe::NativeOptions::default();
    eframe::run_native(
        "egui_smart_tool Example",
        native_options,
        Box::new(|_cc| Ok(Box::new(SmartToolApp::new()))),
    )
}

#[derive(Clone, Debug)]
struct DemoClip {
    id: ClipId,
    start: f64,
    duration: f64,
    content_offset: f64,
    source_length: f64,
    fade_in: f64,
    fade_out: f64,
    muted: bool,
}

impl DemoClip {
    fn new(start: f64, duration: f64) -> Self {
        Self {
            id: ClipId::next(),
            start,
            duration,
            content_offset: 0.5,
            source_length: duration + 2.0,
            fade_in: 0.0,
            fade_out: 0.0,
            muted: false,
        }
    }

    fn end(&self) -> f64 {
        self.start + self.duration
    }
}

struct DemoTrack {
    id: TrackId,
    name: String,
    clips: Vec<DemoClip>,
}

/// 当前帧的剪辑几何，供智能工具查询
struct ProjectView<'a> {
    tracks: &'a [DemoTrack],
    lanes: &'a [(TrackId, Rect)],
    timeline: &'a TimelineState,
}

impl ProjectView<'_> {
    fn clip_rect(&self, lane: Rect, clip: &DemoClip) -> Rect {
        Rect::from_min_max(
            Pos2::new(self.timeline.time_to_x(clip.start), lane.min.y + LANE_PADDING),
            Pos2::new(self.timeline.time_to_x(clip.end()), lane.max.y - LANE_PADDING),
        )
    }

    fn track(&self, id: TrackId) -> Option<&DemoTrack> {
        self.tracks.iter().find(|t| t.id == id)
    }
}

impl ClipLayout for ProjectView<'_> {
    fn clip_at(&self, pos: Pos2) -> Option<ClipHit> {
        let &(track_id, lane) = self.lanes.iter().find(|(_, lane)| lane.contains(pos))?;
        let track = self.track(track_id)?;
        track.clips.iter().find_map(|clip| {
            let bounds = self.clip_rect(lane, clip);
            bounds.contains(pos).then(|| {
                ClipHit::new(clip.id, track_id, bounds)
                    .with_source(SourceExtent::new(clip.content_offset, clip.source_length))
            })
        })
    }

    fn neighbors(&self, clip_id: ClipId) -> Neighbors {
        for track in self.tracks {
            if let Some(clip) = track.clips.iter().find(|c| c.id == clip_id) {
                let touching = |a: f64, b: f64| (a - b).abs() < 1e-6;
                return Neighbors {
                    left: track.clips.iter().find(|c| touching(c.end(), clip.start)).map(|c| c.id),
                    right: track.clips.iter().find(|c| touching(c.start, clip.end())).map(|c| c.id),
                };
            }
        }
        Neighbors::default()
    }

    fn track_clips(&self, track_id: TrackId) -> Vec<ClipSpan> {
        let mut spans: Vec<ClipSpan> = self
            .track(track_id)
            .map(|t| t.clips.iter().map(|c| ClipSpan::new(c.id, c.start, c.end())).collect())
            .unwrap_or_default();
        spans.sort_by(|a, b| a.start.total_cmp(&b.start));
        spans
    }

    fn track_at(&self, pos: Pos2) -> Option<TrackId> {
        self.lanes.iter().find(|(_, lane)| lane.contains(pos)).map(|(id, _)| *id)
    }
}

struct SmartToolApp {
    editor: SmartToolEditor,
    timeline: TimelineState,
    tracks: Vec<DemoTrack>,
    lanes: Vec<(TrackId, Rect)>,
    playhead: f64,
}

impl SmartToolApp {
    fn new() -> Self {
        let timeline = TimelineState {
            header_width: HEADER_WIDTH,
            ..Default::default()
        };

        // 两条音轨：第一条有相邻的剪辑，可以试交叉淡化
        let tracks = vec![
            DemoTrack {
                id: TrackId::next(),
                name: "Track 1".to_string(),
                clips: vec![
                    DemoClip::new(0.0, 2.0),
                    DemoClip::new(2.0, 1.5),
                    DemoClip::new(5.0, 1.0),
                ],
            },
            DemoTrack {
                id: TrackId::next(),
                name: "Track 2".to_string(),
                clips: vec![DemoClip::new(1.0, 2.5), DemoClip::new(4.5, 1.0)],
            },
        ];

        Self {
            editor: SmartToolEditor::new(SmartTool::default()),
            timeline,
            tracks,
            lanes: Vec::new(),
            playhead: 0.0,
        }
    }

    fn clip_mut(&mut self, clip_id: ClipId) -> Option<&mut DemoClip> {
        self.tracks
            .iter_mut()
            .flat_map(|t| t.clips.iter_mut())
            .find(|c| c.id == clip_id)
    }

    fn apply_event(&mut self, event: SmartToolEvent) {
        match event {
            SmartToolEvent::ClipMoved {
                clip_id,
                duplicate,
                resolved,
            } => self.apply_move(clip_id, duplicate, resolved),
            SmartToolEvent::ClipTrimmedLeft { clip_id, new_boundary } => {
                if let Some(clip) = self.clip_mut(clip_id) {
                    let shift = new_boundary - clip.start;
                    clip.start = new_boundary;
                    clip.duration -= shift;
                    clip.content_offset += shift;
                }
            }
            SmartToolEvent::ClipTrimmedRight { clip_id, new_boundary } => {
                if let Some(clip) = self.clip_mut(clip_id) {
                    clip.duration = new_boundary - clip.start;
                }
            }
            SmartToolEvent::FadeInChanged { clip_id, duration } => {
                if let Some(clip) = self.clip_mut(clip_id) {
                    clip.fade_in = duration;
                }
            }
            SmartToolEvent::FadeOutChanged { clip_id, duration } => {
                if let Some(clip) = self.clip_mut(clip_id) {
                    clip.fade_out = duration;
                }
            }
            SmartToolEvent::CrossfadeRequested { clip_a, clip_b, overlap } => {
                // 曲线形状不在演示范围内，用等长的淡出/淡入近似
                if let Some(a) = self.clip_mut(clip_a) {
                    a.fade_out = overlap.min(a.duration);
                }
                if let Some(b) = self.clip_mut(clip_b) {
                    b.fade_in = overlap.min(b.duration);
                }
            }
            SmartToolEvent::RangeSelected { range } => {
                log::info!("range selected: {:.3}s - {:.3}s", range.start, range.end);
            }
            SmartToolEvent::ToolActionTriggered { action } => self.apply_tool_action(action),
            SmartToolEvent::DragUpdated { .. } => {}
            other => log::debug!("[SmartToolEvent] {:?}", other),
        }
    }

    fn apply_move(&mut self, clip_id: ClipId, duplicate: bool, resolved: ResolvedMove) {
        let Some(track) = self
            .tracks
            .iter_mut()
            .find(|t| t.clips.iter().any(|c| c.id == clip_id))
        else {
            return;
        };
        let Some(index) = track.clips.iter().position(|c| c.id == clip_id) else {
            return;
        };
        let mut target = track.clips[index].clone();
        match &resolved {
            ResolvedMove::Reposition { start } => target.start = *start,
            ResolvedMove::Shuffle { start, displaced } => {
                target.start = *start;
                for d in displaced {
                    if let Some(other) = track.clips.iter_mut().find(|c| c.id == d.clip_id) {
                        other.start = d.new_start;
                    }
                }
            }
            ResolvedMove::Slip { content_offset } => target.content_offset = *content_offset,
        }
        if duplicate {
            target.id = ClipId::next();
            track.clips.push(target);
        } else {
            track.clips[index] = target;
        }
    }

    fn apply_tool_action(&mut self, action: ToolAction) {
        match action {
            ToolAction::Split { clip_id, time } => {
                for track in &mut self.tracks {
                    if let Some(pos) = track.clips.iter().position(|c| c.id == clip_id) {
                        let clip = &track.clips[pos];
                        let relative = time - clip.start;
                        if relative > 0.0 && relative < clip.duration {
                            let mut tail = clip.clone();
                            tail.id = ClipId::next();
                            tail.start = time;
                            tail.duration = clip.duration - relative;
                            tail.content_offset += relative;
                            tail.fade_in = 0.0;
                            track.clips[pos].duration = relative;
                            track.clips[pos].fade_out = 0.0;
                            track.clips.insert(pos + 1, tail);
                        }
                        return;
                    }
                }
            }
            ToolAction::Glue { clip_id, .. } => {
                for track in &mut self.tracks {
                    let Some(pos) = track.clips.iter().position(|c| c.id == clip_id) else {
                        continue;
                    };
                    let end = track.clips[pos].end();
                    let next = track.clips.iter().position(|c| (c.start - end).abs() < 1e-6);
                    if let Some(next) = next {
                        let removed = track.clips.remove(next);
                        let pos = if next < pos { pos - 1 } else { pos };
                        track.clips[pos].duration += removed.duration;
                    }
                    return;
                }
            }
            ToolAction::Erase { clip_id } => {
                for track in &mut self.tracks {
                    track.clips.retain(|c| c.id != clip_id);
                }
            }
            ToolAction::Mute { clip_id } => {
                if let Some(clip) = self.clip_mut(clip_id) {
                    clip.muted = !clip.muted;
                }
            }
            ToolAction::Zoom { zoom_out, .. } => {
                let factor = if zoom_out { 0.5 } else { 2.0 };
                self.timeline.zoom_x = (self.timeline.zoom_x * factor).clamp(10.0, 1000.0);
            }
            ToolAction::Play { time } => self.playhead = time,
            ToolAction::Draw { track_id, time, y, .. } => {
                log::info!("automation point on {:?} at {:.3}s (y = {:.1})", track_id, time, y);
            }
        }
    }

    fn load_settings(&mut self) {
        if let Some(path) = FileDialog::new()
            .add_filter("Smart tool settings", &["json"])
            .pick_file()
        {
            match SmartToolSettings::load_from_path(&path) {
                Ok(settings) => {
                    log::info!("Settings loaded: {:?}", path);
                    self.editor = SmartToolEditor::new(SmartTool::from_settings(&settings));
                }
                Err(e) => log::error!("Failed to load settings: {}", e),
            }
        }
    }

    fn save_settings(&self) {
        if let Some(path) = FileDialog::new()
            .add_filter("Smart tool settings", &["json"])
            .set_file_name("smart_tool.json")
            .save_file()
        {
            match self.editor.tool().settings().save_to_path(&path) {
                Ok(()) => log::info!("Settings saved to: {:?}", path),
                Err(e) => log::error!("Failed to save settings: {}", e),
            }
        }
    }

    fn paint_lanes(&self, painter: &egui::Painter, content: Rect) {
        let view = ProjectView {
            tracks: &self.tracks,
            lanes: &self.lanes,
            timeline: &self.timeline,
        };
        for (track, &(_, lane)) in self.tracks.iter().zip(self.lanes.iter()) {
            painter.rect_filled(lane, 0.0, Color32::from_gray(30));
            let header = Rect::from_min_max(
                lane.min,
                Pos2::new(content.min.x + HEADER_WIDTH, lane.max.y),
            );
            painter.rect_filled(header, 0.0, Color32::from_gray(45));
            painter.text(
                header.left_center() + Vec2::new(8.0, 0.0),
                egui::Align2::LEFT_CENTER,
                &track.name,
                egui::FontId::proportional(13.0),
                Color32::WHITE,
            );

            let body = lane.with_min_x(header.max.x);
            let body_painter = painter.with_clip_rect(body);
            egui_smart_tool::ui::draw_grid(&body_painter, body, &self.timeline);

            for clip in &track.clips {
                let rect = view.clip_rect(lane, clip);
                let fill = if clip.muted {
                    Color32::from_gray(90)
                } else {
                    Color32::from_rgb(150, 150, 250)
                };
                body_painter.rect_filled(rect, 4.0, fill);
                body_painter.rect_stroke(rect, 4.0, Stroke::new(1.5, Color32::from_gray(200)));

                // 淡入/淡出用斜线表示
                let fade_stroke = Stroke::new(1.5, Color32::from_rgb(40, 40, 80));
                if clip.fade_in > 0.0 {
                    let x = self.timeline.time_to_x(clip.start + clip.fade_in);
                    let top = Pos2::new(x, rect.min.y);
                    body_painter.line_segment([rect.left_bottom(), top], fade_stroke);
                }
                if clip.fade_out > 0.0 {
                    let x = self.timeline.time_to_x(clip.end() - clip.fade_out);
                    let top = Pos2::new(x, rect.min.y);
                    body_painter.line_segment([top, rect.right_bottom()], fade_stroke);
                }
            }
        }

        let playhead_x = self.timeline.time_to_x(self.playhead);
        painter.line_segment(
            [Pos2::new(playhead_x, content.min.y), Pos2::new(playhead_x, content.max.y)],
            Stroke::new(2.0, Color32::from_rgba_premultiplied(100, 200, 255, 128)),
        );
    }
}

impl eframe::App for SmartToolApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Load settings…").clicked() {
                    self.load_settings();
                }
                if ui.button("Save settings…").clicked() {
                    self.save_settings();
                }
                ui.separator();
                ui.label(format!("Playhead: {:.2}s", self.playhead));
            });
            self.editor.toolbar_ui(ui, &mut self.timeline);
            ui.separator();

            let size = Vec2::new(ui.available_width(), LANE_HEIGHT * self.tracks.len() as f32);
            let (content, response) = ui.allocate_exact_size(size, Sense::click_and_drag());
            self.timeline.header_width = content.min.x + HEADER_WIDTH;
            self.lanes = self
                .tracks
                .iter()
                .enumerate()
                .map(|(i, track)| {
                    let top = content.min.y + i as f32 * LANE_HEIGHT;
                    let min = Pos2::new(content.min.x, top);
                    let size = Vec2::new(content.width(), LANE_HEIGHT);
                    (track.id, Rect::from_min_size(min, size))
                })
                .collect();

            let view = ProjectView {
                tracks: &self.tracks,
                lanes: &self.lanes,
                timeline: &self.timeline,
            };
            self.editor.interact(ui, &response, &view, &self.timeline, &self.timeline);

            let painter = ui.painter_at(content);
            self.paint_lanes(&painter, content);
            self.editor.paint_overlay(&painter);
        });

        for event in self.editor.take_events() {
            self.apply_event(event);
        }
    }
}
