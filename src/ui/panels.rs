use eframe::egui;

use super::app::UiAction;
use crate::model::{Colormap, Layer};
use crate::session::{
    AssignTarget, InteractionSession, LogitsSide, ReadoutColumn, ReadoutTable,
};

pub(super) fn draw_controls(
    ui: &mut egui::Ui,
    session: &InteractionSession,
    readout_open: bool,
    actions: &mut Vec<UiAction>,
) {
    ui.heading("Files");
    for target in AssignTarget::ALL {
        let enabled = target == AssignTarget::Volume || session.volume().is_some();
        if ui
            .add_enabled(enabled, egui::Button::new(format!("Open {}", target.label())))
            .clicked()
        {
            actions.push(UiAction::Open(target));
        }
    }
    ui.separator();

    let Some(volume) = session.volume() else {
        ui.label("Open a volume or drop files onto the window.");
        return;
    };

    ui.label(format!("Volume: {}", volume.name()));
    let mut slice = session.slice();
    if ui
        .add(
            egui::Slider::new(&mut slice, 0..=volume.depth().saturating_sub(1))
                .text("Slice")
                .clamping(egui::SliderClamping::Always),
        )
        .changed()
    {
        actions.push(UiAction::SetSlice(slice));
    }

    let (lowest, highest) = volume.value_range();
    let window = volume.window();
    let range = lowest.min(window.min)..=highest.max(window.max);
    let mut min = window.min;
    let mut max = window.max;
    if ui
        .add(egui::Slider::new(&mut min, range.clone()).text("Window min"))
        .changed()
    {
        actions.push(UiAction::SetWindowMin(min));
    }
    if ui
        .add(egui::Slider::new(&mut max, range).text("Window max"))
        .changed()
    {
        actions.push(UiAction::SetWindowMax(max));
    }
    ui.separator();

    if let Some(segmentation) = session.segmentation() {
        ui.label(format!(
            "Segmentation: {} ({} classes)",
            segmentation.name(),
            segmentation.num_classes()
        ));
        let mut visible = segmentation.visible();
        if ui.checkbox(&mut visible, "Show segmentation").changed() {
            actions.push(UiAction::SetSegmentationVisible(visible));
        }
        let mut opacity = segmentation.opacity();
        if ui
            .add(egui::Slider::new(&mut opacity, 0.0..=1.0).text("Opacity"))
            .changed()
        {
            actions.push(UiAction::SetSegmentationOpacity(opacity));
        }
        ui.separator();
    }

    draw_logits_controls(ui, session, actions);
    ui.separator();

    ui.horizontal(|ui| {
        let label = if readout_open { "Hide readout" } else { "Show readout" };
        if ui.button(label).clicked() {
            actions.push(UiAction::ToggleReadout);
        }
        if ui.button("Reset view").clicked() {
            actions.push(UiAction::ResetView);
        }
    });
}

fn draw_logits_controls(
    ui: &mut egui::Ui,
    session: &InteractionSession,
    actions: &mut Vec<UiAction>,
) {
    if !session.has_logits() {
        return;
    }

    let mut visible = session.logits_visible();
    if ui.checkbox(&mut visible, "Show logits").changed() {
        actions.push(UiAction::SetLogitsVisible(visible));
    }
    let mut opacity = session.logits_opacity();
    if ui
        .add(egui::Slider::new(&mut opacity, 0.0..=1.0).text("Logits opacity"))
        .changed()
    {
        actions.push(UiAction::SetLogitsOpacity(opacity));
    }

    let current = session.current_class();
    egui::ComboBox::from_label("Class")
        .selected_text(current.to_string())
        .show_ui(ui, |ui| {
            for class in 0..session.num_classes() {
                if ui
                    .selectable_label(class == current, class.to_string())
                    .clicked()
                    && class != current
                {
                    actions.push(UiAction::SetClass(class));
                }
            }
        });

    let colormap = session.colormap();
    egui::ComboBox::from_label("Colormap")
        .selected_text(colormap.name())
        .show_ui(ui, |ui| {
            for candidate in Colormap::ALL {
                if ui
                    .selectable_label(candidate == colormap, candidate.name())
                    .clicked()
                    && candidate != colormap
                {
                    actions.push(UiAction::SetColormap(candidate));
                }
            }
        });

    for side in LogitsSide::ALL {
        let Some(logits) = session.logits(side) else {
            continue;
        };
        ui.add_space(4.0);
        ui.label(format!("{side:?}: {}", logits.info().second_name));
        let range = logits.value_range();
        let band = logits.band();
        let mut low = band.low;
        let mut high = band.high;
        if ui
            .add(egui::Slider::new(&mut low, range.low..=range.high).text("Threshold low"))
            .changed()
        {
            actions.push(UiAction::SetThresholdLow(side, low));
        }
        if ui
            .add(egui::Slider::new(&mut high, range.low..=range.high).text("Threshold high"))
            .changed()
        {
            actions.push(UiAction::SetThresholdHigh(side, high));
        }
    }
}

fn tone_color(table: &ReadoutTable, row: usize, column: ReadoutColumn) -> egui::Color32 {
    let [r, g, b] = table.tone(row, column).color();
    egui::Color32::from_rgb(r, g, b)
}

pub(super) fn draw_readout(ui: &mut egui::Ui, session: &InteractionSession) {
    if let Some(readout) = session.readout() {
        ui.monospace(readout.status_line());
        ui.separator();
    }

    let table = session.readout_table();
    egui::ScrollArea::vertical().show(ui, |ui| {
        egui::Grid::new("readout-table")
            .striped(false)
            .spacing([12.0, 2.0])
            .show(ui, |ui| {
                ui.strong("Class");
                for column in ReadoutColumn::ALL {
                    ui.strong(column.title());
                }
                ui.end_row();

                for (index, row) in table.rows().iter().enumerate() {
                    ui.monospace(row.class.to_string());
                    for column in ReadoutColumn::ALL {
                        ui.label(
                            egui::RichText::new(ReadoutTable::format_value(row.value(column)))
                                .monospace()
                                .color(egui::Color32::WHITE)
                                .background_color(tone_color(&table, index, column)),
                        );
                    }
                    ui.end_row();
                }
            });
    });
}
