//! Toolbar module
//!
//! 工具和编辑模式的选择栏，以及网格吸附设置。

use crate::edit_mode::EditMode;
use crate::editor::SmartToolCommand;
use crate::timeline::TimelineState;
use crate::tool::ExplicitTool;
use egui::*;

pub struct Toolbar {
    tool: ExplicitTool,
    edit_mode: EditMode,
}

impl Toolbar {
    pub fn new(tool: ExplicitTool, edit_mode: EditMode) -> Self {
        Self { tool, edit_mode }
    }

    pub fn ui(
        &mut self,
        ui: &mut Ui,
        timeline: &mut TimelineState,
        command_callback: &mut dyn FnMut(SmartToolCommand),
    ) {
        ui.horizontal(|ui| {
            // 编辑模式（F1-F4）
            for mode in EditMode::ALL {
                if ui.selectable_label(self.edit_mode == mode, mode.label()).clicked() {
                    self.edit_mode = mode;
                    command_callback(SmartToolCommand::SetEditMode { mode });
                }
            }

            ui.separator();

            for tool in ExplicitTool::ALL {
                if ui.selectable_label(self.tool == tool, tool.label()).clicked() {
                    self.tool = tool;
                    command_callback(SmartToolCommand::SetTool { tool });
                }
            }

            ui.separator();

            ui.checkbox(&mut timeline.snap_enabled, "Snap");
            if timeline.snap_enabled {
                ui.label("Interval:");
                let ticks_per_beat = timeline.ticks_per_beat as u64;
                let common_intervals = [
                    (ticks_per_beat / 4, "1/16"),
                    (ticks_per_beat / 2, "1/8"),
                    (ticks_per_beat, "1/4"),
                    (ticks_per_beat * 2, "1/2"),
                    (ticks_per_beat * 4, "1"),
                ];
                let selected_index = common_intervals
                    .iter()
                    .position(|(interval, _)| *interval == timeline.snap_interval)
                    .unwrap_or(2); // 默认 1/4

                egui::ComboBox::from_id_salt("snap_interval")
                    .selected_text(common_intervals[selected_index].1)
                    .show_ui(ui, |ui| {
                        for (idx, (interval, label)) in common_intervals.iter().enumerate() {
                            if ui.selectable_label(idx == selected_index, *label).clicked() {
                                timeline.snap_interval = *interval;
                            }
                        }
                    });
            }
        });
    }
}
