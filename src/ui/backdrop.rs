use std::path::{Path, PathBuf};

use image::DynamicImage;

use crate::error::Result;
use crate::geometry::Resolution;

/// Still frame drawn underneath an editor.
pub struct Backdrop {
    path: PathBuf,
    raw: DynamicImage,
    texture: Option<egui::TextureHandle>,
}

impl Backdrop {
    pub fn open(path: &Path) -> Result<Self> {
        let raw = image::open(path)?;
        log::info!(
            "loaded frame {} ({}x{})",
            path.display(),
            raw.width(),
            raw.height()
        );
        Ok(Self {
            path: path.to_path_buf(),
            raw,
            texture: None,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn native(&self) -> Resolution {
        Resolution::new(self.raw.width() as f32, self.raw.height() as f32)
    }

    pub fn ensure_texture(&mut self, ctx: &egui::Context) {
        if self.texture.is_some() {
            return;
        }
        let rgba = self.raw.to_rgba8();
        let size = [rgba.width() as usize, rgba.height() as usize];
        let pixels = rgba.as_flat_samples();
        let color_image = egui::ColorImage::from_rgba_unmultiplied(size, pixels.as_slice());
        self.texture = Some(ctx.load_texture("frame", color_image, egui::TextureOptions::LINEAR));
    }

    pub fn paint(&self, painter: &egui::Painter, rect: egui::Rect) {
        if let Some(ref tex) = self.texture {
            painter.image(
                tex.id(),
                rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );
        }
    }
}

/// Largest rect with the frame's aspect ratio centered in `available`.
///
/// Without a known size the whole area is used.
pub fn fit_rect(native: Resolution, available: egui::Rect) -> egui::Rect {
    if native.is_degenerate() || available.width() <= 0.0 || available.height() <= 0.0 {
        return available;
    }
    let scale = (available.width() / native.width).min(available.height() / native.height);
    let size = egui::vec2(native.width * scale, native.height * scale);
    egui::Rect::from_center_size(available.center(), size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_rect_letterboxes() {
        let available = egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(800.0, 800.0));
        let rect = fit_rect(Resolution::new(1600.0, 900.0), available);
        assert_eq!(rect.width(), 800.0);
        assert_eq!(rect.height(), 450.0);
        assert_eq!(rect.min.y, 175.0);
    }

    #[test]
    fn test_fit_rect_without_frame_uses_all() {
        let available = egui::Rect::from_min_size(egui::pos2(5.0, 5.0), egui::vec2(300.0, 200.0));
        assert_eq!(fit_rect(Resolution::default(), available), available);
    }

    #[test]
    fn test_open_reports_native_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        image::RgbaImage::new(32, 18).save(&path).unwrap();
        let backdrop = Backdrop::open(&path).unwrap();
        assert_eq!(backdrop.native(), Resolution::new(32.0, 18.0));
        assert_eq!(backdrop.path(), path.as_path());
    }
}
