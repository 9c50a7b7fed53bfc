#![deny(clippy::all)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![forbid(unsafe_code)]

use clap::Parser;
use egui::{Vec2, ViewportBuilder, ViewportCommand, Visuals};
use image::{DynamicImage, Rgba, RgbaImage};
use imglabel_domain::{to_lbl, LblResult, ShapeI};
use imglib::{
    cfg::Cfg,
    file_util::{self, DEFAULT_HOMEDIR},
    result::trace_ok_err,
    tracing_setup,
    util::version_label,
    AnnotationCanvas, CanvasArgs, CanvasView, ColorSchemeSource,
    ColorSchemeWatcher, DisplayMode, QueuedHost, CONTROLS_HEIGHT,
};
use std::{
    ops::Deref,
    panic,
    path::{Path, PathBuf},
};
use tracing::{error, info};

const DEFAULT_SHAPE: ShapeI = ShapeI { w: 640, h: 480 };
/// Space around the widget inside the window
const WINDOW_MARGIN: f32 = 16.0;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Image to annotate, a white canvas is used if missing
    image: Option<PathBuf>,
    /// Canvas arguments as JSON with camelCase keys, takes precedence over the image
    #[arg(long)]
    args_json: Option<PathBuf>,
    #[arg(long)]
    box_color: Option<String>,
    #[arg(long)]
    point_color: Option<String>,
    /// Enables a button that writes the annotated image to this path
    #[arg(long)]
    snapshot: Option<PathBuf>,
    /// Stores the given colors in the config file as new defaults
    #[arg(long)]
    remember_colors: bool,
}

/// Config with the colors of the command line, if any
fn cfg_with_cli_colors(cli: &Cli, cfg: &Cfg) -> Cfg {
    let mut cfg = cfg.clone();
    if let Some(c) = &cli.box_color {
        cfg.box_color.clone_from(c);
    }
    if let Some(c) = &cli.point_color {
        cfg.point_color.clone_from(c);
    }
    cfg
}

fn make_args(cli: &Cli, cfg: &Cfg) -> LblResult<CanvasArgs> {
    // invalid colors of the config file fall back to the defaults here
    let box_color = cli
        .box_color
        .clone()
        .unwrap_or_else(|| cfg.box_color().to_string());
    let point_color = cli
        .point_color
        .clone()
        .unwrap_or_else(|| cfg.point_color().to_string());
    if let Some(args_path) = &cli.args_json {
        let mut args = CanvasArgs::from_json(&file_util::read_to_string(args_path)?)?;
        if let Some(c) = &cli.box_color {
            args.box_color.clone_from(c);
        }
        if let Some(c) = &cli.point_color {
            args.point_color.clone_from(c);
        }
        Ok(args)
    } else if let Some(image_path) = &cli.image {
        info!("loading {image_path:?}");
        let im = image::open(image_path).map_err(to_lbl)?;
        Ok(CanvasArgs::from_image(&im, &box_color, &point_color))
    } else {
        let im = RgbaImage::from_pixel(DEFAULT_SHAPE.w, DEFAULT_SHAPE.h, Rgba([255; 4]));
        Ok(CanvasArgs::from_image(
            &DynamicImage::ImageRgba8(im),
            &box_color,
            &point_color,
        ))
    }
}

fn save_snapshot(canvas: &AnnotationCanvas<QueuedHost>, path: &Path) -> LblResult<()> {
    if let Some(im) = canvas.snapshot() {
        im.save(path).map_err(to_lbl)?;
        info!("saved snapshot to {path:?}");
    }
    Ok(())
}

fn window_size(canvas_shape: ShapeI) -> Vec2 {
    Vec2::new(
        canvas_shape.w as f32 + WINDOW_MARGIN,
        canvas_shape.h as f32 + CONTROLS_HEIGHT + WINDOW_MARGIN,
    )
}

struct ImgLabelApp {
    canvas: AnnotationCanvas<QueuedHost>,
    view: CanvasView,
    watcher: ColorSchemeWatcher,
    forced_mode: Option<DisplayMode>,
    snapshot_path: Option<PathBuf>,
}

impl ImgLabelApp {
    fn new(args: CanvasArgs, cfg: &Cfg, snapshot_path: Option<PathBuf>) -> Self {
        let forced_mode = cfg.forced_display_mode();
        let watcher = ColorSchemeWatcher::new(forced_mode.unwrap_or_default());
        let canvas = AnnotationCanvas::mount(args, QueuedHost::default(), &watcher);
        Self {
            canvas,
            view: CanvasView::default(),
            watcher,
            forced_mode,
            snapshot_path,
        }
    }
    fn forward_to_host(&mut self, ctx: &egui::Context) {
        for report in self.canvas.host_mut().take_reports() {
            if let Some(report_str) = trace_ok_err(serde_json::to_string(&report)) {
                info!("{report_str}");
            }
        }
        if let Some(height) = self.canvas.host_mut().take_frame_height() {
            let width = self.canvas.args().canvas_width as f32;
            ctx.send_viewport_cmd(ViewportCommand::InnerSize(Vec2::new(
                width + WINDOW_MARGIN,
                height + WINDOW_MARGIN,
            )));
        }
    }
}

impl eframe::App for ImgLabelApp {
    fn logic(&mut self, ctx: &egui::Context, _: &mut eframe::Frame) {
        self.watcher.update_from_egui(ctx, self.forced_mode);
        ctx.set_visuals(if self.watcher.current().is_dark() {
            Visuals::dark()
        } else {
            Visuals::light()
        });
    }

    fn ui(&mut self, ui: &mut egui::Ui, _: &mut eframe::Frame) {
        let ctx = ui.ctx().clone();
        egui::CentralPanel::default().show_inside(ui, |ui| {
            self.view.show(ui, &mut self.canvas);
            if let Some(path) = &self.snapshot_path
                && ui.button("save snapshot").clicked()
            {
                trace_ok_err(save_snapshot(&self.canvas, path));
            }
        });
        self.forward_to_host(&ctx);
    }
}

fn main() {
    let cfg = Cfg::read(&DEFAULT_HOMEDIR);
    let log_folder = match &cfg {
        Ok(cfg) => cfg.log_folder(),
        Err(_) => Cfg::default().log_folder(),
    };
    let _guard_flush_to_logfile = tracing_setup::tracing_setup(&log_folder);
    let cfg = trace_ok_err(cfg).unwrap_or_default();
    info!("starting {}", version_label());
    if let Err(e) = panic::catch_unwind(|| {
        let cli = Cli::parse();
        if cli.remember_colors {
            trace_ok_err(cfg_with_cli_colors(&cli, &cfg).write());
        }
        let Some(args) = trace_ok_err(make_args(&cli, &cfg)) else {
            return;
        };
        let size = window_size(ShapeI::new(args.canvas_width, args.canvas_height));
        let native_options = eframe::NativeOptions {
            viewport: ViewportBuilder::default()
                .with_title(version_label())
                .with_inner_size(size),
            ..Default::default()
        };
        if let Err(e) = eframe::run_native(
            "imglabel",
            native_options,
            Box::new(|_| Ok(Box::new(ImgLabelApp::new(args, &cfg, cli.snapshot)))),
        ) {
            error!("{e:?}");
        }
    }) {
        let panic_s = e
            .downcast_ref::<String>()
            .map(String::as_str)
            .or_else(|| e.downcast_ref::<&'static str>().map(Deref::deref));
        error!("{:?}", panic_s);
        if let Some(b) = tracing_setup::BACKTRACE.with(|b| b.borrow_mut().take()) {
            error!("{:?}", b);
        }
    }
}

#[cfg(test)]
use imglib::{defer_folder_removal, file_util::DEFAULT_TMPDIR};

#[test]
fn test_make_args() {
    let cfg = Cfg::default();
    let cli = Cli::parse_from(["imglabel", "--box-color", "green"]);
    let args = make_args(&cli, &cfg).unwrap();
    assert_eq!(args.box_color, "green");
    assert_eq!(args.point_color, "#0000ff");
    assert_eq!(args.shape().unwrap(), DEFAULT_SHAPE);
    assert_eq!(args.image_data.len(), DEFAULT_SHAPE.n_rgba_bytes());

    let tmp_folder = DEFAULT_TMPDIR.join("make_args_test");
    std::fs::create_dir_all(&tmp_folder).unwrap();
    defer_folder_removal!(&tmp_folder);
    let args_path = tmp_folder.join("args.json");
    file_util::write(
        &args_path,
        r#"{"canvasWidth": 4, "canvasHeight": 2, "rects": [{"left": 1, "top": 0, "width": 2, "height": 1}]}"#,
    )
    .unwrap();
    let args_path_str = args_path.to_str().unwrap();
    let cli = Cli::parse_from(["imglabel", "--args-json", args_path_str, "--point-color", "red"]);
    let args = make_args(&cli, &cfg).unwrap();
    assert_eq!(args.shape().unwrap(), ShapeI::new(4, 2));
    assert_eq!(args.point_color, "red");
    assert_eq!(args.box_color, "red");
    assert_eq!(args.rects.len(), 1);
}

#[test]
fn test_invalid_cfg_colors() {
    let cfg = Cfg {
        box_color: "nocolor".to_string(),
        ..Cfg::default()
    };
    let args = make_args(&Cli::parse_from(["imglabel"]), &cfg).unwrap();
    assert_eq!(args.box_color, "#ff0000");
    assert_eq!(args.point_color, "#0000ff");
}

#[test]
fn test_remember_colors() {
    let home = DEFAULT_TMPDIR.join("remember_colors_test");
    defer_folder_removal!(&home);
    let cfg = Cfg {
        home_folder: Some(home.to_str().unwrap().to_string()),
        ..Cfg::default()
    };
    let cli = Cli::parse_from(["imglabel", "--box-color", "green", "--remember-colors"]);
    assert!(cli.remember_colors);
    cfg_with_cli_colors(&cli, &cfg).write().unwrap();
    let read = Cfg::read(&home).unwrap();
    assert_eq!(read.box_color, "green");
    assert_eq!(read.point_color, cfg.point_color);
}

#[test]
fn test_snapshot() {
    let cfg = Cfg::default();
    let tmp_folder = DEFAULT_TMPDIR.join("snapshot_test");
    std::fs::create_dir_all(&tmp_folder).unwrap();
    defer_folder_removal!(&tmp_folder);
    let path = tmp_folder.join("snapshot.png");
    let args = make_args(&Cli::parse_from(["imglabel"]), &cfg).unwrap();
    let mut app = ImgLabelApp::new(args, &cfg, Some(path.clone()));
    app.canvas.add_box();
    save_snapshot(&app.canvas, &path).unwrap();
    let im = image::open(&path).unwrap().to_rgba8();
    // the default box starts at 15% of the canvas
    assert_eq!(im.get_pixel(96, 72).0, [255, 0, 0, 255]);
    assert_eq!(im.get_pixel(0, 0).0, [255; 4]);
    assert_eq!(
        window_size(DEFAULT_SHAPE),
        Vec2::new(640.0 + WINDOW_MARGIN, 480.0 + CONTROLS_HEIGHT + WINDOW_MARGIN)
    );
}
