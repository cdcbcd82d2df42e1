use std::path::Path;
use std::time::Duration;

use eframe::egui;
use fireworks_night::{Fireworks, FireworksConfig, PainterCanvas, StarField, Viewport};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const CONFIG_PATH: &str = "fireworks.json";

const NIGHT_SKY: egui::Color32 = egui::Color32::from_rgb(11, 16, 38);
const STAR_COLOR: [u8; 3] = [255, 248, 231];
const TRIGGER_SIZE: egui::Vec2 = egui::Vec2 { x: 180.0, y: 44.0 };
const REVEAL_FADE: Duration = Duration::from_millis(800);

struct FireworksNight {
    fireworks: Fireworks,
    stars: StarField,
    revealed_at: Option<Duration>,
}

impl FireworksNight {
    fn new(fireworks: Fireworks, stars: StarField) -> Self {
        Self {
            fireworks,
            stars,
            revealed_at: None,
        }
    }

    fn paint_stars(&self, painter: &egui::Painter, rect: egui::Rect, now: Duration) {
        let seconds = now.as_secs_f32();
        let [r, g, b] = STAR_COLOR;
        for star in &self.stars.stars {
            let center = rect.min
                + egui::vec2(
                    rect.width() * star.x_percent / 100.0,
                    rect.height() * star.y_percent / 100.0,
                );
            let alpha = (star.brightness_at(seconds) * 255.0).round() as u8;
            painter.circle_filled(
                center,
                star.radius,
                egui::Color32::from_rgba_unmultiplied(r, g, b, alpha),
            );
        }
    }

    fn paint_reveal(&mut self, painter: &egui::Painter, rect: egui::Rect, now: Duration) {
        if !self.fireworks.is_revealed() {
            return;
        }
        let revealed_at = *self.revealed_at.get_or_insert(now);
        let shown_for = now.saturating_sub(revealed_at).as_secs_f32();
        let fade = (shown_for / REVEAL_FADE.as_secs_f32()).min(1.0);
        let alpha = (fade * 255.0).round() as u8;
        painter.text(
            egui::pos2(rect.center().x, rect.bottom() - 120.0),
            egui::Align2::CENTER_CENTER,
            "Make a wish",
            egui::FontId::proportional(32.0),
            egui::Color32::from_rgba_unmultiplied(255, 240, 214, alpha),
        );
    }
}

impl eframe::App for FireworksNight {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Duration::from_secs_f64(ctx.input(|i| i.time));

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(NIGHT_SKY))
            .show(ctx, |ui| {
                let (rect, scene) =
                    ui.allocate_exact_size(ui.available_size(), egui::Sense::click());
                self.fireworks
                    .resize(rect.width(), rect.height(), ctx.pixels_per_point());

                let painter = ui.painter_at(rect);
                self.paint_stars(&painter, rect, now);
                self.fireworks
                    .tick(&mut PainterCanvas::new(painter.clone(), rect.min), now);
                self.paint_reveal(&painter, rect, now);

                let trigger_rect = egui::Rect::from_center_size(
                    egui::pos2(rect.center().x, rect.bottom() - 60.0),
                    TRIGGER_SIZE,
                );
                let trigger = ui.put(trigger_rect, egui::Button::new("Light the sky"));

                // A trigger click never doubles as a scene click.
                if trigger.clicked() {
                    self.fireworks.run_show(now);
                } else if scene.clicked() {
                    if let Some(pos) = scene.interact_pointer_pos() {
                        let local = pos - rect.min;
                        self.fireworks.click(local.x, local.y, now);
                    }
                }
            });

        ctx.request_repaint();
    }
}

fn load_config() -> FireworksConfig {
    if !Path::new(CONFIG_PATH).exists() {
        return FireworksConfig::default();
    }
    match FireworksConfig::load(CONFIG_PATH) {
        Ok(config) => {
            info!("Loaded {}", CONFIG_PATH);
            config
        }
        Err(err) => {
            warn!("Ignoring {}: {}", CONFIG_PATH, err);
            FireworksConfig::default()
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = load_config();
    let stars = StarField::generate(&config.stars, rand::random());
    // Sized for real on the first frame, before the first tick.
    let fireworks = match Fireworks::new(config, Viewport::new(0.0, 0.0, 1.0)) {
        Ok(fireworks) => fireworks,
        Err(err) => {
            error!("Invalid fireworks config: {}", err);
            return;
        }
    };

    let result = eframe::run_native(
        "Fireworks Night",
        eframe::NativeOptions {
            renderer: eframe::Renderer::Wgpu,
            initial_window_size: Some(egui::vec2(960.0, 720.0)),
            ..Default::default()
        },
        Box::new(move |_cc| Box::new(FireworksNight::new(fireworks, stars))),
    );
    if let Err(err) = result {
        error!("Failed to run window: {}", err);
    }
}
