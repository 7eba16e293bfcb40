use std::path::Path;

use super::{fit_rect, to_local, to_screen, Backdrop, Emitted, PointerInput, MARKER_FILL};
use crate::error::{Error, Result};
use crate::geometry::Resolution;
use crate::proximity::ProximityEditor;
use crate::settings::AppSettings;

pub struct ProximityView {
    editor: ProximityEditor,
    marker_radius: f32,
    preview: Option<Vec<u8>>,
    preview_uri: Option<String>,
}

impl ProximityView {
    pub fn new(settings: &AppSettings, distance: Option<String>) -> Self {
        Self {
            editor: ProximityEditor::new(
                distance.unwrap_or_default(),
                settings.calibration_marker_radius,
            ),
            marker_radius: settings.calibration_marker_radius,
            preview: None,
            preview_uri: None,
        }
    }

    /// Attach the "selected area" thumbnail shown over the image.
    pub fn with_preview(mut self, path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("png");
        self.preview = Some(bytes);
        self.preview_uri = Some(format!("bytes://selected-area.{ext}"));
        Ok(self)
    }

    pub fn editor_mut(&mut self) -> &mut ProximityEditor {
        &mut self.editor
    }

    pub fn show(
        &mut self,
        ctx: &egui::Context,
        backdrop: Option<&Backdrop>,
        emit: &mut dyn FnMut(Emitted),
    ) {
        if let (Some(bytes), Some(uri)) = (self.preview.take(), self.preview_uri.clone()) {
            ctx.include_bytes(uri, bytes);
        }

        egui::SidePanel::right("distance_settings")
            .resizable(false)
            .min_width(240.0)
            .show(ctx, |ui| self.settings_panel(ui, emit));

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
                .set_viewport(native, Resolution::new(stage.width(), stage.height()));

            let input = PointerInput::read(ui, &response);
            let changed = if let Some(pos) = input.pressed {
                self.editor.pointer_down(to_local(stage, pos))
            } else if let Some(pos) = input.moved_to {
                self.editor.drag_to(to_local(stage, pos))
            } else {
                None
            };
            if let Some(known) = changed {
                emit(Emitted::DistanceChanged(known));
            }
            if input.released {
                if let Some(known) = self.editor.release() {
                    emit(Emitted::DistanceChanged(known));
                }
            }

            let points: Vec<egui::Pos2> = self
                .editor
                .display_points()
                .into_iter()
                .map(|p| to_screen(stage, p))
                .collect();
            if points.len() == 2 {
                painter.line_segment([points[0], points[1]], egui::Stroke::new(4.0, MARKER_FILL));
            }
            for &p in &points {
                painter.circle_filled(p, self.marker_radius, MARKER_FILL);
            }

            if let Some(uri) = self.preview_uri.clone().filter(|_| self.editor.show_preview) {
                let width = stage.width() * 0.2;
                let area = egui::Rect::from_min_size(
                    stage.min + egui::vec2(16.0, 16.0),
                    egui::vec2(width, width),
                );
                ui.put(area, egui::Image::new(uri).max_width(width));
                painter.text(
                    area.min + egui::vec2(6.0, 6.0),
                    egui::Align2::LEFT_TOP,
                    "SELECTED AREA",
                    egui::FontId::proportional(11.0),
                    MARKER_FILL,
                );
            }
        });
    }

    fn settings_panel(&mut self, ui: &mut egui::Ui, emit: &mut dyn FnMut(Emitted)) {
        ui.heading("Settings");
        ui.add_space(8.0);
        ui.checkbox(&mut self.editor.show_preview, "Show selected area");
        ui.add_space(8.0);

        ui.label("Distance");
        ui.horizontal(|ui| {
            let mut text = self.editor.distance().to_string();
            let edit = ui.add_enabled(
                self.editor.distance_enabled(),
                egui::TextEdit::singleline(&mut text).desired_width(120.0),
            );
            if edit.changed() {
                if let Some(known) = self.editor.set_distance(text) {
                    emit(Emitted::DistanceChanged(known));
                }
            }
            ui.label("Meter");
        });
        if !self.editor.distance_enabled() {
            ui.weak("To enter a distance you must mark two points by clicking on the image");
        }

        ui.separator();
        ui.label(
            "Draw a known distance so that the distance between points can be \
             calculated without manipulating depth.",
        );
    }
}
