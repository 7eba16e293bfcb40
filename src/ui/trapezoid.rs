use super::{to_local, to_screen, Backdrop, Emitted, PointerInput};
use super::{HIGHLIGHT_FILL, MARKER_FILL, ZONE_STROKE};
use crate::geometry::Resolution;
use crate::settings::AppSettings;
use crate::trapezoid::{is_convex, Orientation, TrapezoidAnnotator};

pub struct TrapezoidView {
    annotator: TrapezoidAnnotator,
    marker_radius: f32,
    highlight_radius: f32,
}

impl TrapezoidView {
    pub fn new(settings: &AppSettings, orientation: Orientation) -> Self {
        Self {
            annotator: TrapezoidAnnotator::new(orientation),
            marker_radius: settings.marker_radius,
            highlight_radius: settings.highlight_radius,
        }
    }

    pub fn frame_loaded(&mut self, native: Resolution) {
        self.annotator.video_ready(native);
    }

    pub fn show(
        &mut self,
        ctx: &egui::Context,
        backdrop: Option<&Backdrop>,
        emit: &mut dyn FnMut(Emitted),
    ) {
        egui::SidePanel::right("area_settings")
            .resizable(false)
            .min_width(240.0)
            .show(ctx, |ui| self.settings_panel(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            let available = ui.available_size();
            let stage = self.annotator.stage();
            if stage.is_degenerate() {
                ui.centered_and_justified(|ui| ui.weak("Waiting for frame…"));
                return;
            }
            // Fit the stage inside the panel with a single scale factor.
            let width = available.x.min(available.y * stage.width / stage.height);
            self.annotator.resize(width);
            let stage = self.annotator.stage();

            let (response, painter) = ui.allocate_painter(
                egui::vec2(stage.width, stage.height),
                egui::Sense::click_and_drag(),
            );
            let stage_rect = response.rect;
            if let Some(b) = backdrop {
                b.paint(&painter, stage_rect);
            }

            let input = PointerInput::read(ui, &response);
            if let Some(pos) = input.pressed {
                if let Some(index) = self
                    .annotator
                    .anchor_at(to_local(stage_rect, pos), self.highlight_radius)
                {
                    self.annotator.begin_drag(index);
                }
            } else if let (Some(pos), Some(index)) = (input.moved_to, self.annotator.active()) {
                self.annotator.drag_anchor(index, to_local(stage_rect, pos));
            }
            if input.released {
                if let Some(trapezoid) = self.annotator.end_drag() {
                    emit(Emitted::TrapezoidChanged(trapezoid));
                }
            }

            self.draw(&painter, stage_rect);
        });
    }

    fn draw(&self, painter: &egui::Painter, stage_rect: egui::Rect) {
        let Some(anchors) = self.annotator.anchors() else {
            return;
        };
        let points: Vec<egui::Pos2> = anchors.iter().map(|&p| to_screen(stage_rect, p)).collect();
        if is_convex(anchors) {
            painter.add(egui::Shape::convex_polygon(
                points.clone(),
                ZONE_STROKE,
                egui::Stroke::NONE,
            ));
        } else {
            painter.add(egui::Shape::closed_line(
                points.clone(),
                egui::Stroke::new(3.0, ZONE_STROKE),
            ));
        }
        for (i, &p) in points.iter().enumerate() {
            if self.annotator.active() == Some(i) {
                painter.circle_filled(p, self.highlight_radius, HIGHLIGHT_FILL);
            } else {
                painter.circle_filled(p, self.marker_radius, MARKER_FILL);
            }
        }
    }

    fn settings_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Area Settings");
        ui.add_space(8.0);
        ui.label("Threshold (Meter)");
        ui.text_edit_singleline(&mut self.annotator.threshold);
        ui.weak(
            "The minimum distance people & vehicles can be detected together \
             before a breach is raised.",
        );
        ui.add_space(8.0);
        let target = match self.annotator.orientation() {
            Orientation::Horizontal => "Vertical",
            Orientation::Vertical => "Horizontal",
        };
        if ui.button(format!("Rotate to {target}")).clicked() {
            self.annotator.toggle_orientation();
            log::info!("trapezoid orientation {:?}", self.annotator.orientation());
        }
    }
}
