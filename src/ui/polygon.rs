use super::{fit_rect, to_local, to_screen, Backdrop, Emitted, PointerInput};
use super::{HIGHLIGHT_FILL, MARKER_FILL, ZONE_STROKE};
use crate::geometry::Resolution;
use crate::polygon::{PolygonEditor, Zone};
use crate::settings::AppSettings;

pub struct PolygonView {
    editor: PolygonEditor,
    marker_radius: f32,
    highlight_radius: f32,
}

impl PolygonView {
    pub fn new(settings: &AppSettings, source: Resolution, zone: Option<&Zone>) -> Self {
        let mut editor = PolygonEditor::new(source, settings.hit_radius);
        if let Some(zone) = zone {
            editor.load_zone(zone);
        }
        Self {
            editor,
            marker_radius: settings.marker_radius,
            highlight_radius: settings.highlight_radius,
        }
    }

    pub fn show(
        &mut self,
        ctx: &egui::Context,
        backdrop: Option<&Backdrop>,
        emit: &mut dyn FnMut(Emitted),
    ) {
        egui::TopBottomPanel::bottom("zone_status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(format!("{} vertices", self.editor.vertices().len()));
                let source = self.editor.source();
                let display = self.editor.display();
                ui.weak(format!(
                    "source {}x{}, shown at {:.0}x{:.0}",
                    source.width, source.height, display.width, display.height
                ));
                if self.editor.is_closed() {
                    ui.weak("closed");
                }
                ui.separator();
                if ui.button("Clear").clicked() {
                    emit(Emitted::ZoneChanged(self.editor.clear()));
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let (response, painter) =
                ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
            let canvas_rect = response.rect;
            painter.rect_filled(canvas_rect, 0.0, egui::Color32::from_gray(40));

            let native = backdrop.map(Backdrop::native).unwrap_or_default();
            let stage = fit_rect(native, canvas_rect);
            if let Some(b) = backdrop {
                b.paint(&painter, stage);
            }
            self.editor
                .resize(Resolution::new(stage.width(), stage.height()));

            let input = PointerInput::read(ui, &response);
            if let Some(pos) = input.pressed {
                if let Some(zone) = self.editor.pointer_down(to_local(stage, pos)) {
                    emit(Emitted::ZoneChanged(zone));
                }
            } else if let Some(pos) = input.moved_to {
                if let Some(zone) = self.editor.pointer_move(to_local(stage, pos)) {
                    emit(Emitted::ZoneChanged(zone));
                }
            }
            if input.released {
                self.editor.pointer_up();
            }

            self.draw(&painter, stage);
        });
    }

    fn draw(&self, painter: &egui::Painter, stage: egui::Rect) {
        let points: Vec<egui::Pos2> = self
            .editor
            .vertices()
            .iter()
            .map(|&p| to_screen(stage, p))
            .collect();
        let stroke = egui::Stroke::new(3.0, ZONE_STROKE);
        if self.editor.is_closed() {
            painter.add(egui::Shape::closed_line(points.clone(), stroke));
        } else if points.len() > 1 {
            painter.add(egui::Shape::line(points.clone(), stroke));
        }
        for &p in &points {
            painter.circle_filled(p, self.marker_radius, MARKER_FILL);
        }
        if let Some(&p) = self.editor.selected().and_then(|i| points.get(i)) {
            painter.circle_filled(p, self.highlight_radius, HIGHLIGHT_FILL);
        }
    }
}
