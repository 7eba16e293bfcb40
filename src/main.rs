use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use eframe::egui;

use zone_annotate::form::FormState;
use zone_annotate::input::read_json;
use zone_annotate::polygon::Zone;
use zone_annotate::proximity::KnownDistance;
use zone_annotate::settings::AppSettings;
use zone_annotate::trapezoid::Orientation;
use zone_annotate::ui::{
    AnnotateApp, Backdrop, Emitted, FormView, PolygonView, ProximityView, Sink, TrapezoidView,
    Widget,
};
use zone_annotate::Resolution;

#[derive(Parser)]
#[command(name = "zone-annotate", version, about = "Camera zone and calibration editors")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Draw a zone polygon over a camera frame
    Polygon {
        frame: PathBuf,
        /// Existing zone to edit ({"coordinates": [[x, y], ...]})
        #[arg(long)]
        zone: Option<PathBuf>,
        #[arg(long, requires = "source_height")]
        source_width: Option<f32>,
        #[arg(long, requires = "source_width")]
        source_height: Option<f32>,
    },
    /// Mark two points and the real-world distance between them
    Distance {
        image: PathBuf,
        /// Thumbnail of the selected area
        #[arg(long)]
        preview: Option<PathBuf>,
        /// Initial distance in meters
        #[arg(long)]
        distance: Option<String>,
        /// Previously recorded calibration
        #[arg(long)]
        known: Option<PathBuf>,
    },
    /// Place a trapezoid with aligned edges over a camera frame
    Trapezoid {
        frame: PathBuf,
        #[arg(long)]
        vertical: bool,
    },
    /// Edit camera processor settings described by a schema
    Form {
        schema: PathBuf,
        /// Existing record ({"processors": {...}})
        #[arg(long)]
        values: Option<PathBuf>,
        /// Treat the record as new and pre-populate every field
        #[arg(long)]
        new: bool,
        #[arg(long)]
        error_message: Option<String>,
    },
    /// Write the effective settings to the config directory
    InitSettings,
}

fn open_backdrop(path: &Path) -> Option<Backdrop> {
    match Backdrop::open(path) {
        Ok(b) => Some(b),
        Err(e) => {
            log::warn!("running without frame, {}: {e}", path.display());
            None
        }
    }
}

fn stdout_sink() -> Sink {
    Box::new(|event: Emitted| match serde_json::to_string(&event) {
        Ok(line) => println!("{line}"),
        Err(e) => log::warn!("could not serialize {event:?}: {e}"),
    })
}

type Built = (Widget, Option<Backdrop>, String);

/// Build the requested editor, or `None` when the command needs no window.
fn build(command: Command, settings: &AppSettings) -> anyhow::Result<Option<Built>> {
    let built = match command {
        Command::Polygon {
            frame,
            zone,
            source_width,
            source_height,
        } => {
            let source = match (source_width, source_height) {
                (Some(w), Some(h)) => Resolution::new(w, h),
                _ => settings.source_resolution,
            };
            let zone: Option<Zone> = zone
                .map(|p| read_json(&p).with_context(|| format!("loading zone {}", p.display())))
                .transpose()?;
            let view = PolygonView::new(settings, source, zone.as_ref());
            (Widget::Polygon(view), open_backdrop(&frame), file_name(&frame))
        }
        Command::Distance {
            image,
            preview,
            distance,
            known,
        } => {
            let mut view = ProximityView::new(settings, distance);
            if let Some(path) = preview {
                view = view
                    .with_preview(&path)
                    .with_context(|| format!("loading preview {}", path.display()))?;
            }
            if let Some(path) = known {
                let known: KnownDistance = read_json(&path)
                    .with_context(|| format!("loading calibration {}", path.display()))?;
                view.editor_mut().load(&known);
            }
            (Widget::Distance(view), open_backdrop(&image), file_name(&image))
        }
        Command::Trapezoid { frame, vertical } => {
            let orientation = if vertical {
                Orientation::Vertical
            } else {
                settings.trapezoid_orientation
            };
            let view = TrapezoidView::new(settings, orientation);
            (Widget::Trapezoid(view), open_backdrop(&frame), file_name(&frame))
        }
        Command::Form {
            schema,
            values,
            new,
            error_message,
        } => {
            let schema_value: serde_json::Value = read_json(&schema)
                .with_context(|| format!("loading schema {}", schema.display()))?;
            let record = values
                .map(|p| read_json(&p).with_context(|| format!("loading values {}", p.display())))
                .transpose()?;
            let mut form = FormState::new(&schema_value, record, new, settings.switch_fields.clone())
                .with_context(|| format!("building form from {}", schema.display()))?;
            form.error_message = error_message;
            log::info!("form with {} tabs", form.tabs().len());
            (Widget::Form(FormView::new(form)), None, file_name(&schema))
        }
        Command::InitSettings => {
            let path =
                AppSettings::settings_path().context("no config directory on this platform")?;
            settings
                .save_to(&path)
                .with_context(|| format!("writing {}", path.display()))?;
            log::info!("wrote {}", path.display());
            return Ok(None);
        }
    };
    Ok(Some(built))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .into_owned()
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let settings = AppSettings::load();

    let Some((widget, backdrop, name)) = build(cli.command, &settings)? else {
        return Ok(());
    };
    let title = format!("zone-annotate - {name}");
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_title(&title),
        ..Default::default()
    };

    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| {
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(AnnotateApp::new(widget, backdrop, stdout_sink())))
        }),
    )
    .map_err(|e| anyhow::anyhow!("failed to run eframe: {e}"))
}
