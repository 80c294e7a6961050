//! Final celebration screen

use eframe::egui::{self, RichText, Stroke};

use super::UiAction;
use super::components::{action_button, star_row};
use super::theme::stage_theme;
use crate::app::EduApp;
use crate::state::RevealPart;

pub fn render_celebration(app: &mut EduApp, ui: &mut egui::Ui) {
    let theme = app.ui.current_theme.clone();
    let view = app.session.view();
    let shown = |part| app.ui.reveal.as_ref().is_some_and(|r| r.is_shown(part));
    let (panel, badges, rank) = (
        shown(RevealPart::CelebrationPanel),
        shown(RevealPart::CelebrationBadges),
        shown(RevealPart::CelebrationRank),
    );
    if !panel {
        return;
    }

    let mut action = None;

    ui.vertical_centered(|ui| {
        ui.add_space(30.0);
        ui.label(RichText::new("🎉").size(56.0));
        ui.label(
            RichText::new("Congratulations, Electronics Explorer!")
                .size(28.0)
                .strong()
                .color(theme.accent),
        );
        ui.add_space(8.0);
        ui.label(
            RichText::new(format!("⭐ {} / {} stars", view.total_stars, view.max_stars))
                .size(22.0)
                .color(theme.star),
        );

        ui.add_space(20.0);
        if badges {
            ui.label(RichText::new("Badges earned").strong().color(theme.text_secondary));
            ui.add_space(6.0);
            for record in view.stages.iter().filter(|r| r.is_completed()) {
                let badge = record.kind().badge();
                let palette = stage_theme(record.kind());
                egui::Frame::new()
                    .fill(palette.primary.gamma_multiply(0.15))
                    .stroke(Stroke::new(1.0, palette.primary))
                    .corner_radius(8.0)
                    .inner_margin(8.0)
                    .show(ui, |ui| {
                        ui.set_width(300.0);
                        ui.horizontal(|ui| {
                            ui.label(RichText::new(badge.icon).size(20.0));
                            ui.label(RichText::new(badge.name).color(theme.text_primary));
                            ui.label(
                                RichText::new(star_row(record.star_count())).color(theme.star),
                            );
                        });
                    });
                ui.add_space(4.0);
            }
        }

        ui.add_space(20.0);
        if rank {
            ui.label(RichText::new("Your rank").color(theme.text_muted));
            ui.label(
                RichText::new(view.rank.to_string())
                    .size(26.0)
                    .strong()
                    .color(theme.accent_hover),
            );
            ui.add_space(24.0);
            ui.horizontal(|ui| {
                if ui.add(action_button("Play Again", theme.accent)).clicked() {
                    action = Some(UiAction::PlayAgain);
                }
                if ui.add(action_button("Home", theme.accent_muted)).clicked() {
                    action = Some(UiAction::GoHome);
                }
            });
        }
    });

    if let Some(action) = action {
        app.queue(action);
    }
}
