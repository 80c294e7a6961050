//! Shared UI components for Electronics Universe

use eframe::egui::{self, Color32, CornerRadius, RichText, Stroke, Vec2};
use egui_commonmark::{CommonMarkCache, CommonMarkViewer};

use super::UiAction;
use super::theme::{StageTheme, Theme, ThemePreset, stage_theme};
use crate::app::EduApp;
use crate::lesson::{LessonInfo, Mascot, Mood, Prompt, PromptKind, lesson_info};
use crate::progress::StageKind;
use crate::scoring::{MAX_STARS_PER_STAGE, Stars};

/// Filled star glyphs for `count`, padded with hollow ones to a full stage
pub fn star_row(count: u8) -> String {
    let filled = count.min(MAX_STARS_PER_STAGE) as usize;
    let hollow = MAX_STARS_PER_STAGE as usize - filled;
    format!("{}{}", "★".repeat(filled), "☆".repeat(hollow))
}

/// Big rounded button in a stage or accent color
pub fn action_button(label: impl Into<String>, fill: Color32) -> impl egui::Widget {
    egui::Button::new(RichText::new(label.into()).size(15.0).strong().color(Color32::WHITE))
        .fill(fill)
        .corner_radius(8.0)
        .min_size(Vec2::new(140.0, 34.0))
}

/// Title, theme picker and About button
pub fn render_top_bar(app: &mut EduApp, ctx: &egui::Context) {
    let theme = app.ui.current_theme.clone();
    let mut picked = app.ui.theme_preset;

    egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
        ui.add_space(4.0);
        ui.horizontal(|ui| {
            ui.label(
                RichText::new("⚡ Electronics Universe")
                    .size(18.0)
                    .strong()
                    .color(theme.accent),
            );
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("About").clicked() {
                    app.queue(UiAction::ShowAbout);
                }
                egui::ComboBox::from_id_salt("theme_select")
                    .selected_text(picked.name())
                    .show_ui(ui, |ui| {
                        for preset in ThemePreset::all() {
                            ui.selectable_value(&mut picked, *preset, preset.name());
                        }
                    });
                ui.label(RichText::new("Theme").color(theme.text_muted));
            });
        });
        ui.add_space(4.0);
    });

    if picked != app.ui.theme_preset {
        app.queue(UiAction::SetTheme(picked));
    }
}

/// Stage dots with their stars and the running total
pub fn render_progress_constellation(app: &EduApp, ctx: &egui::Context) {
    let theme = &app.ui.current_theme;
    let view = app.session.view();

    egui::TopBottomPanel::bottom("constellation").show(ctx, |ui| {
        ui.add_space(6.0);
        ui.horizontal(|ui| {
            for record in &view.stages {
                let palette = stage_theme(record.kind());
                let (dot, label) = if record.is_completed() {
                    (palette.primary, theme.text_primary)
                } else if record.is_current() {
                    (palette.glow, theme.text_primary)
                } else {
                    (theme.bg_light, theme.text_muted)
                };

                let (rect, _) = ui.allocate_exact_size(Vec2::splat(22.0), egui::Sense::hover());
                ui.painter().circle_filled(rect.center(), 8.0, dot);
                if record.is_current() {
                    ui.painter()
                        .circle_stroke(rect.center(), 10.5, Stroke::new(2.0, palette.primary));
                }
                ui.label(RichText::new(record.kind().name()).color(label));
                if record.is_completed() {
                    ui.label(RichText::new(star_row(record.star_count())).color(theme.star));
                }
                ui.add_space(10.0);
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(
                    RichText::new(format!("⭐ {} / {}", view.total_stars, view.max_stars))
                        .strong()
                        .color(theme.star),
                );
            });
        });
        ui.add_space(6.0);
    });
}

/// Sparky the electron and whatever it is saying
pub fn render_mascot(ui: &mut egui::Ui, theme: &Theme, mascot: &Mascot) {
    let face = match mascot.mood {
        Mood::Idle => "😊",
        Mood::Speaking => "💬",
        Mood::Celebrating => "🤩",
        Mood::Encouraging => "💪",
    };

    egui::Frame::new()
        .fill(theme.bg_medium)
        .corner_radius(8.0)
        .inner_margin(10.0)
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.label(RichText::new(format!("⚡{face}")).size(24.0));
                ui.vertical(|ui| {
                    ui.label(RichText::new("Sparky").size(11.0).strong().color(theme.accent));
                    ui.label(RichText::new(&mascot.message).color(theme.text_primary));
                });
            });
        });
}

/// Step prompt banner. Returns true when the close button was clicked.
pub fn render_popup(ui: &mut egui::Ui, theme: &Theme, palette: &StageTheme, prompt: &Prompt) -> bool {
    let (tag, color) = match prompt.kind {
        PromptKind::Action => ("ACTION", palette.primary),
        PromptKind::Hint => ("HINT", theme.warning),
        PromptKind::Learn => ("LEARN", theme.success),
    };
    let mut dismissed = false;

    egui::Frame::new()
        .fill(color.gamma_multiply(0.15))
        .stroke(Stroke::new(1.0, color))
        .corner_radius(8.0)
        .inner_margin(10.0)
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.label(RichText::new(tag).size(11.0).strong().color(color));
                ui.label(RichText::new(prompt.message).color(theme.text_primary));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.small_button("✕").clicked() {
                        dismissed = true;
                    }
                });
            });
        });

    dismissed
}

pub fn render_step_indicator(
    ui: &mut egui::Ui,
    theme: &Theme,
    palette: &StageTheme,
    step: usize,
    total: usize,
) {
    ui.horizontal(|ui| {
        for i in 0..total {
            let color = if i < step {
                palette.primary
            } else if i == step {
                palette.glow
            } else {
                theme.bg_light
            };
            let (rect, _) = ui.allocate_exact_size(Vec2::new(28.0, 6.0), egui::Sense::hover());
            ui.painter().rect_filled(rect, CornerRadius::same(3), color);
        }
        ui.label(
            RichText::new(format!("Step {} of {}", step + 1, total))
                .size(11.0)
                .color(theme.text_muted),
        );
    });
}

/// Lesson intro card. Returns true when the player is ready to begin.
pub fn render_intro(
    ui: &mut egui::Ui,
    cache: &mut CommonMarkCache,
    theme: &Theme,
    palette: &StageTheme,
    info: &LessonInfo,
) -> bool {
    let mut start = false;

    egui::Frame::new()
        .fill(theme.bg_medium)
        .stroke(Stroke::new(1.0, palette.primary))
        .corner_radius(10.0)
        .inner_margin(16.0)
        .show(ui, |ui| {
            ui.label(RichText::new(info.title).size(22.0).strong().color(palette.primary));
            ui.add_space(8.0);
            CommonMarkViewer::new().show(ui, cache, &info.intro_markdown());
            ui.add_space(12.0);
            ui.vertical_centered(|ui| {
                if ui.add(action_button("Let's Go! 🚀", palette.primary)).clicked() {
                    start = true;
                }
            });
        });

    start
}

/// End-of-lesson card with stars, badge and what was learned
pub fn render_summary(
    ui: &mut egui::Ui,
    theme: &Theme,
    palette: &StageTheme,
    kind: StageKind,
    stars: Stars,
) -> Option<UiAction> {
    let info = lesson_info(kind);
    let badge = kind.badge();
    let mut action = None;

    egui::Frame::new()
        .fill(theme.bg_medium)
        .stroke(Stroke::new(2.0, palette.primary))
        .corner_radius(10.0)
        .inner_margin(16.0)
        .show(ui, |ui| {
            ui.vertical_centered(|ui| {
                ui.label(
                    RichText::new(format!("{} Complete!", info.stage_name))
                        .size(22.0)
                        .strong()
                        .color(palette.primary),
                );
                ui.label(RichText::new(stars.to_string()).size(30.0).color(theme.star));
                ui.label(
                    RichText::new(format!("{} {}", badge.icon, badge.name))
                        .size(16.0)
                        .color(theme.text_primary),
                );
            });

            ui.add_space(10.0);
            ui.label(RichText::new("What you learned").strong().color(theme.text_secondary));
            for point in info.summary_points {
                ui.label(RichText::new(format!("✓ {point}")).color(theme.text_primary));
            }

            ui.add_space(12.0);
            ui.horizontal(|ui| {
                let next = if kind.next().is_some() {
                    "Next Stage →"
                } else {
                    "Finish Adventure! 🎉"
                };
                if ui.add(action_button(next, palette.primary)).clicked() {
                    action = Some(UiAction::FinishStage);
                }
                if ui.button("↻ Replay").clicked() {
                    action = Some(UiAction::ReplayStage);
                }
            });
        });

    action
}

/// Render the About dialog
pub fn render_about_dialog(app: &mut EduApp, ctx: &egui::Context) {
    if !app.ui.show_about_dialog {
        return;
    }

    let theme = app.ui.current_theme.clone();
    let mut open = true;

    egui::Window::new("About Electronics Universe")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([300.0, 240.0])
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(8.0);
                ui.label(
                    RichText::new("Electronics Universe")
                        .size(22.0)
                        .strong()
                        .color(theme.accent),
                );
                ui.add_space(4.0);
                ui.label(
                    RichText::new("A guided tour of four components")
                        .size(14.0)
                        .color(theme.text_secondary),
                );

                ui.add_space(12.0);
                ui.label(
                    RichText::new(format!("Version {}", env!("CARGO_PKG_VERSION")))
                        .color(theme.text_muted),
                );

                ui.add_space(12.0);
                for kind in StageKind::ALL {
                    ui.label(
                        RichText::new(format!("{} {}", kind.icon(), kind.name()))
                            .color(stage_theme(kind).primary),
                    );
                }

                ui.add_space(12.0);
                ui.label(
                    RichText::new("Built with Rust + egui")
                        .size(11.0)
                        .color(theme.text_muted),
                );

                ui.add_space(12.0);
                if ui.button("Close").clicked() {
                    open = false;
                }
                ui.add_space(8.0);
            });
        });

    app.ui.show_about_dialog = open;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_star_row() {
        assert_eq!(star_row(0), "☆☆☆");
        assert_eq!(star_row(2), "★★☆");
        assert_eq!(star_row(3), "★★★");
        assert_eq!(star_row(9), "★★★");
    }
}
