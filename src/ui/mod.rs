//! egui front-end: one window hosting a single editor over an optional frame.

mod backdrop;
mod form;
mod polygon;
mod proximity;
mod trapezoid;

use std::path::Path;

use eframe::egui;
use serde::Serialize;

use crate::geometry::Point;
use crate::polygon::Zone;
use crate::proximity::KnownDistance;
use crate::trapezoid::Trapezoid;

pub use backdrop::{fit_rect, Backdrop};
pub use form::FormView;
pub use polygon::PolygonView;
pub use proximity::ProximityView;
pub use trapezoid::TrapezoidView;

// ── Emitted data ────────────────────────────────────────────────────────────

/// Data handed to the host whenever an editor changes.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Emitted {
    ZoneChanged(Zone),
    DistanceChanged(KnownDistance),
    TrapezoidChanged(Trapezoid),
    FormSaved { values: serde_json::Value },
    FormCancelled,
}

pub type Sink = Box<dyn FnMut(Emitted)>;

// ── Shared drawing & input ──────────────────────────────────────────────────

pub(crate) const ZONE_STROKE: egui::Color32 = egui::Color32::from_rgba_premultiplied(162, 115, 14, 166);
pub(crate) const MARKER_FILL: egui::Color32 = egui::Color32::from_rgb(0xf9, 0xb1, 0x15);
pub(crate) const HIGHLIGHT_FILL: egui::Color32 = egui::Color32::from_rgb(0xe5, 0x53, 0x53);

pub(crate) fn to_local(rect: egui::Rect, pos: egui::Pos2) -> Point {
    Point::new(pos.x - rect.min.x, pos.y - rect.min.y)
}

pub(crate) fn to_screen(rect: egui::Rect, p: Point) -> egui::Pos2 {
    rect.min + egui::vec2(p.x, p.y)
}

/// Primary-button state for one frame, relative to a canvas.
pub(crate) struct PointerInput {
    /// Press that landed on the canvas.
    pub pressed: Option<egui::Pos2>,
    pub moved_to: Option<egui::Pos2>,
    pub released: bool,
}

impl PointerInput {
    pub fn read(ui: &egui::Ui, response: &egui::Response) -> Self {
        let on_canvas = response.contains_pointer();
        ui.input(|i| {
            let pos = i.pointer.interact_pos();
            let moving = i.pointer.primary_down() && i.pointer.delta() != egui::Vec2::ZERO;
            Self {
                pressed: pos.filter(|_| i.pointer.primary_pressed() && on_canvas),
                moved_to: pos.filter(|_| moving),
                released: i.pointer.primary_released(),
            }
        })
    }
}

// ── App ─────────────────────────────────────────────────────────────────────

pub enum Widget {
    Polygon(PolygonView),
    Distance(ProximityView),
    Trapezoid(TrapezoidView),
    Form(FormView),
}

impl Widget {
    fn name(&self) -> &'static str {
        match self {
            Widget::Polygon(_) => "Zone",
            Widget::Distance(_) => "Known distance",
            Widget::Trapezoid(_) => "Area",
            Widget::Form(_) => "Camera settings",
        }
    }

    fn uses_frame(&self) -> bool {
        !matches!(self, Widget::Form(_))
    }

    fn frame_loaded(&mut self, backdrop: &Backdrop) {
        if let Widget::Trapezoid(view) = self {
            view.frame_loaded(backdrop.native());
        }
    }
}

pub struct AnnotateApp {
    widget: Widget,
    backdrop: Option<Backdrop>,
    sink: Sink,
}

impl AnnotateApp {
    pub fn new(mut widget: Widget, backdrop: Option<Backdrop>, sink: Sink) -> Self {
        if let Some(ref b) = backdrop {
            widget.frame_loaded(b);
        }
        Self {
            widget,
            backdrop,
            sink,
        }
    }

    fn open_frame(&mut self, path: &Path) {
        match Backdrop::open(path) {
            Ok(backdrop) => {
                self.widget.frame_loaded(&backdrop);
                self.backdrop = Some(backdrop);
            }
            Err(e) => log::warn!("could not open {}: {e}", path.display()),
        }
    }
}

impl eframe::App for AnnotateApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Some(ref mut b) = self.backdrop {
            b.ensure_texture(ctx);
        }

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.strong(self.widget.name());
                if !self.widget.uses_frame() {
                    return;
                }
                ui.separator();
                if ui.button("Open frame…").clicked() {
                    if let Some(path) = rfd::FileDialog::new()
                        .add_filter("image", &["png", "jpg", "jpeg", "bmp", "webp"])
                        .pick_file()
                    {
                        self.open_frame(&path);
                    }
                }
                match self.backdrop {
                    Some(ref b) => {
                        let native = b.native();
                        let name = b.path().file_name().unwrap_or_default();
                        ui.label(format!(
                            "{} {}x{}",
                            name.to_string_lossy(),
                            native.width,
                            native.height
                        ));
                    }
                    None => {
                        ui.weak("no frame");
                    }
                }
            });
        });

        let sink = &mut self.sink;
        let mut emit = |event: Emitted| {
            log::debug!("emit {event:?}");
            sink(event);
        };
        let backdrop = self.backdrop.as_ref();
        match &mut self.widget {
            Widget::Polygon(view) => view.show(ctx, backdrop, &mut emit),
            Widget::Distance(view) => view.show(ctx, backdrop, &mut emit),
            Widget::Trapezoid(view) => view.show(ctx, backdrop, &mut emit),
            Widget::Form(view) => view.show(ctx, &mut emit),
        }
    }
}
