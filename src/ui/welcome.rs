//! Welcome screen

use eframe::egui::{self, RichText};

use super::UiAction;
use super::components::action_button;
use super::theme::stage_theme;
use crate::app::EduApp;
use crate::lesson::lesson_info;
use crate::progress::StageKind;
use crate::state::RevealPart;

pub fn render_welcome(app: &mut EduApp, ui: &mut egui::Ui) {
    let theme = app.ui.current_theme.clone();
    let shown = app
        .ui
        .reveal
        .as_ref()
        .is_some_and(|r| r.is_shown(RevealPart::WelcomeContent));
    if !shown {
        return;
    }

    ui.vertical_centered(|ui| {
        ui.add_space(40.0);
        ui.label(RichText::new("⚡").size(56.0));
        ui.label(
            RichText::new("Electronics Universe")
                .size(34.0)
                .strong()
                .color(theme.accent),
        );
        ui.add_space(6.0);
        ui.label(
            RichText::new("Join Sparky the electron on a journey through four worlds")
                .size(16.0)
                .color(theme.text_secondary),
        );
        ui.add_space(24.0);

        for kind in StageKind::ALL {
            let palette = stage_theme(kind);
            egui::Frame::new()
                .fill(palette.primary.gamma_multiply(0.12))
                .stroke(egui::Stroke::new(1.0, palette.primary))
                .corner_radius(8.0)
                .inner_margin(8.0)
                .show(ui, |ui| {
                    ui.set_width(320.0);
                    ui.horizontal(|ui| {
                        ui.label(RichText::new(kind.icon()).size(20.0));
                        ui.label(
                            RichText::new(format!(
                                "Stage {}: {}",
                                kind.number(),
                                lesson_info(kind).stage_name
                            ))
                            .color(theme.text_primary),
                        );
                    });
                });
            ui.add_space(6.0);
        }

        ui.add_space(24.0);
        if ui.add(action_button("Start Adventure 🚀", theme.accent)).clicked() {
            app.queue(UiAction::Start);
        }
    });
}
