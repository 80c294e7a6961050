//! Lesson screen: header, intro, prompts, the circuit drawing and the
//! controls for whichever step the lesson is on

use eframe::egui::{
    self, Color32, CornerRadius, Painter, Pos2, Rect, RichText, Sense, Shape, Stroke, StrokeKind,
    emath::Rot2, vec2,
};

use super::components::{
    action_button, render_intro, render_mascot, render_popup, render_step_indicator,
    render_summary,
};
use super::theme::{StageTheme, Theme, stage_theme};
use crate::app::EduApp;
use crate::lesson::{
    ActiveLesson, Bias, CapacitorLesson, CurrentDirection, DiodeLesson, InductorLesson, Lesson,
    MAX_ROTATIONS, RESISTANCE_PRESETS, RESISTANCE_RANGE, ResistorLesson, Terminal, WireSide,
    electron_lap_seconds, lesson_info,
};

const CANVAS_HEIGHT: f32 = 190.0;

/// Frame-independent animation inputs
#[derive(Clone, Copy)]
struct Motion {
    /// Seconds since the app started
    time: f32,
    /// Hold animations still
    still: bool,
}

impl Motion {
    /// Position in a repeating cycle of `period` seconds, 0.0..1.0
    fn cycle(self, period: f32) -> f32 {
        if self.still {
            0.0
        } else {
            (self.time / period.max(0.1)).fract()
        }
    }
}

pub fn render_stage(app: &mut EduApp, ui: &mut egui::Ui) {
    let theme = app.ui.current_theme.clone();
    let motion = Motion {
        time: ui.input(|i| i.time) as f32,
        still: app.ui.reduce_motion,
    };
    let cache = &mut app.ui.markdown_cache;
    let Some(active) = app.lesson.as_mut() else {
        return;
    };

    let kind = active.as_lesson().kind();
    let palette = stage_theme(kind);
    let info = lesson_info(kind);
    let mut action = None;

    egui::ScrollArea::vertical().show(ui, |ui| {
        ui.horizontal(|ui| {
            ui.label(RichText::new(kind.icon()).size(26.0));
            ui.label(
                RichText::new(format!("Stage {}: {}", kind.number(), info.stage_name))
                    .size(24.0)
                    .strong()
                    .color(palette.primary),
            );
        });
        render_step_indicator(
            ui,
            &theme,
            palette,
            active.as_lesson().step(),
            active.as_lesson().total_steps(),
        );
        ui.add_space(8.0);

        if active.as_lesson().intro_visible() {
            if render_intro(ui, cache, &theme, palette, info) {
                active.as_lesson_mut().dismiss_intro();
            }
            return;
        }

        if let Some(prompt) = active.as_lesson().popup() {
            if render_popup(ui, &theme, palette, prompt) {
                active.as_lesson_mut().dismiss_popup();
            }
            ui.add_space(6.0);
        }
        render_mascot(ui, &theme, active.as_lesson().mascot());
        ui.add_space(8.0);

        match active {
            ActiveLesson::Resistor(lesson) => resistor(ui, &theme, palette, lesson, motion),
            ActiveLesson::Inductor(lesson) => inductor(ui, &theme, palette, lesson, motion),
            ActiveLesson::Capacitor(lesson) => capacitor(ui, &theme, palette, lesson, motion),
            ActiveLesson::Diode(lesson) => diode(ui, &theme, palette, lesson, motion),
        }

        let lesson = active.as_lesson();
        if let (true, Some(stars)) = (lesson.summary_visible(), lesson.stars()) {
            ui.add_space(12.0);
            action = render_summary(ui, &theme, palette, kind, stars);
        }
    });

    if let Some(action) = action {
        app.queue(action);
    }
}

/// Reserve a dark canvas the width of the panel
fn canvas(ui: &mut egui::Ui, theme: &Theme) -> (Rect, Painter) {
    let (response, painter) =
        ui.allocate_painter(vec2(ui.available_width(), CANVAS_HEIGHT), Sense::hover());
    painter.rect_filled(response.rect, CornerRadius::same(10), theme.bg_darkest);
    (response.rect, painter)
}

/// Point at fraction `t` of the way round `rect`, clockwise from the top left
fn point_on_loop(rect: Rect, t: f32) -> Pos2 {
    let (w, h) = (rect.width(), rect.height());
    let mut d = t.rem_euclid(1.0) * 2.0 * (w + h);
    if d < w {
        return rect.left_top() + vec2(d, 0.0);
    }
    d -= w;
    if d < h {
        return rect.right_top() + vec2(0.0, d);
    }
    d -= h;
    if d < w {
        return rect.right_bottom() - vec2(d, 0.0);
    }
    d -= w;
    rect.left_bottom() - vec2(0.0, d)
}

fn electrons(painter: &Painter, rect: Rect, count: usize, offset: f32, color: Color32) {
    for i in 0..count {
        let t = offset + i as f32 / count as f32;
        painter.circle_filled(point_on_loop(rect, t), 4.0, color);
    }
}

fn label(painter: &Painter, pos: Pos2, text: impl ToString, color: Color32) {
    painter.text(
        pos,
        egui::Align2::CENTER_CENTER,
        text,
        egui::FontId::proportional(13.0),
        color,
    );
}

fn resistor(
    ui: &mut egui::Ui,
    theme: &Theme,
    palette: &StageTheme,
    lesson: &mut ResistorLesson,
    motion: Motion,
) {
    let (area, painter) = canvas(ui, theme);
    let rect = area.shrink2(vec2(60.0, 36.0));
    let wire = if lesson.powered() {
        palette.secondary
    } else {
        theme.border
    };
    painter.rect_stroke(rect, CornerRadius::same(12), Stroke::new(3.0, wire), StrokeKind::Middle);

    let body = Rect::from_center_size(rect.center_top(), vec2(72.0, 22.0));
    if lesson.resistor_placed() {
        painter.rect_filled(body, CornerRadius::same(4), palette.primary);
        for (i, band) in [Color32::BROWN, Color32::BLACK, Color32::RED].into_iter().enumerate() {
            let x = body.left() + 16.0 + i as f32 * 14.0;
            painter.line_segment(
                [Pos2::new(x, body.top()), Pos2::new(x, body.bottom())],
                Stroke::new(4.0, band),
            );
        }
    } else {
        painter.rect_filled(body, CornerRadius::same(4), theme.bg_darkest);
        painter.rect_stroke(
            body,
            CornerRadius::same(4),
            Stroke::new(1.5, theme.text_muted),
            StrokeKind::Middle,
        );
        label(&painter, body.center(), "?", theme.text_muted);
    }

    if lesson.battery_placed() {
        let cell = Rect::from_center_size(rect.left_center(), vec2(22.0, 46.0));
        painter.rect_filled(cell, CornerRadius::same(3), theme.success);
        label(&painter, cell.center(), "9V", Color32::BLACK);
    }

    let glow = if lesson.powered() {
        lesson.brightness() / 100.0
    } else {
        0.0
    };
    let bulb = rect.right_center();
    painter.circle_filled(bulb, 20.0, theme.warning.gamma_multiply(0.1 + 0.9 * glow));
    painter.circle_stroke(bulb, 20.0, Stroke::new(1.5, theme.text_muted));

    if lesson.powered() {
        let lap = electron_lap_seconds(lesson.resistance());
        electrons(&painter, rect, 10, motion.cycle(lap), palette.glow);
    }

    ui.add_space(8.0);
    ui.horizontal(|ui| match lesson.step() {
        0 => {
            if ui.add(action_button("Place Resistor", palette.primary)).clicked() {
                lesson.place_resistor();
            }
        }
        1 => {
            if ui
                .add_enabled(!lesson.battery_placed(), egui::Button::new("🔋 Add Battery"))
                .clicked()
            {
                lesson.place_battery();
            }
            let can_power = lesson.battery_placed() && !lesson.powered();
            if ui
                .add_enabled(can_power, egui::Button::new("⏻ Power On"))
                .clicked()
            {
                lesson.power_on();
            }
        }
        2 if lesson.readout_visible() => {
            if ui.add(action_button("Continue", palette.primary)).clicked() {
                lesson.continue_exploring();
            }
        }
        3 => {
            if ui.add(action_button("Start Challenge", palette.primary)).clicked() {
                lesson.start_challenge();
            }
        }
        _ => {}
    });

    if lesson.readout_visible() {
        ui.add_space(8.0);
        let mut resistance = lesson.resistance();
        ui.horizontal(|ui| {
            ui.label(RichText::new("Resistance").color(theme.text_secondary));
            if ui
                .add(egui::Slider::new(&mut resistance, RESISTANCE_RANGE).suffix(" Ω"))
                .changed()
            {
                lesson.set_resistance(resistance);
            }
            for (name, value) in RESISTANCE_PRESETS {
                if ui.button(format!("{name} {value} Ω")).clicked() {
                    lesson.set_resistance(value);
                }
            }
        });
        ui.label(
            RichText::new(format!(
                "Current {:.2} A · Brightness {:.0}%",
                lesson.current_amps(),
                lesson.brightness()
            ))
            .color(theme.text_primary),
        );
    }

    if lesson.step() == 4 && lesson.stars().is_none() {
        ui.add_space(8.0);
        match lesson.time_left() {
            Some(left) => {
                ui.label(
                    RichText::new(format!(
                        "Target brightness {}% · {:.0}s left",
                        lesson.target_brightness(),
                        left.as_secs_f32().ceil()
                    ))
                    .strong()
                    .color(palette.primary),
                );
                let close = if lesson.within_tolerance() {
                    "So close!"
                } else {
                    "Keep turning the knob"
                };
                ui.label(RichText::new(close).color(theme.text_muted));
            }
            None => {
                ui.label(RichText::new("Get ready...").color(theme.text_muted));
            }
        }
    } else if lesson.stars().is_some() && lesson.matched() {
        ui.label(RichText::new("Brightness matched!").color(theme.success));
    }
}

fn inductor(
    ui: &mut egui::Ui,
    theme: &Theme,
    palette: &StageTheme,
    lesson: &mut InductorLesson,
    motion: Motion,
) {
    let (area, painter) = canvas(ui, theme);
    let center = area.center();
    let field = lesson.field_strength() as f32 / 100.0;

    // Field rings grow with strength and drift outward in the current's direction
    let rings = (field * 5.0).ceil() as usize;
    let drift = match lesson.direction() {
        CurrentDirection::Forward => motion.cycle(2.0),
        CurrentDirection::Reverse => 1.0 - motion.cycle(2.0),
    };
    for i in 0..rings {
        let radius = 40.0 + (i as f32 + drift) * 14.0;
        let alpha = field * (1.0 - i as f32 / 6.0);
        painter.circle_stroke(center, radius, Stroke::new(2.0, palette.secondary.gamma_multiply(alpha)));
    }
    if lesson.pulse_open() {
        painter.circle_stroke(center, 110.0, Stroke::new(5.0, palette.glow));
    }

    // Coil
    let coil = if lesson.current_on() {
        palette.primary
    } else {
        theme.text_muted
    };
    for i in 0..6 {
        let x = center.x - 50.0 + i as f32 * 20.0;
        painter.circle_stroke(Pos2::new(x, center.y), 16.0, Stroke::new(2.5, coil));
    }
    let leads = [
        (WireSide::Left, center - vec2(120.0, 0.0)),
        (WireSide::Right, center + vec2(120.0, 0.0)),
    ];
    for (side, end) in leads {
        let color = if lesson.wire_connected(side) {
            palette.primary
        } else {
            theme.border
        };
        let start = Pos2::new(end.x.clamp(center.x - 66.0, center.x + 66.0), center.y);
        painter.line_segment([start, end], Stroke::new(3.0, color));
    }

    ui.add_space(8.0);
    ui.horizontal(|ui| match lesson.step() {
        0 => {
            for (side, name) in [(WireSide::Left, "Connect Left Wire"), (WireSide::Right, "Connect Right Wire")] {
                if ui
                    .add_enabled(!lesson.wire_connected(side), egui::Button::new(name))
                    .clicked()
                {
                    lesson.connect_wire(side);
                }
            }
        }
        1 => {
            if ui
                .add_enabled(!lesson.current_on(), egui::Button::new("⏻ Switch On"))
                .clicked()
            {
                lesson.switch_on();
            }
        }
        3 => {
            if ui.button("⇄ Flip Current").clicked() {
                lesson.flip_current();
            }
            if ui.add(action_button("Start Rhythm Game", palette.primary)).clicked() {
                lesson.start_game();
            }
        }
        4 if lesson.game_active() => {
            let fill = if lesson.pulse_open() {
                palette.primary
            } else {
                theme.bg_light
            };
            if ui.add(action_button("TAP!", fill)).clicked() {
                lesson.tap();
            }
            ui.label(
                RichText::new(format!("Hits: {}", lesson.rhythm_score()))
                    .strong()
                    .color(theme.text_primary),
            );
        }
        _ => {}
    });

    if lesson.current_on() {
        ui.add_space(6.0);
        ui.add(
            egui::ProgressBar::new(field)
                .fill(palette.secondary)
                .text(format!("Field strength {}%", lesson.field_strength())),
        );
        let direction = match lesson.direction() {
            CurrentDirection::Forward => "Current: forward →",
            CurrentDirection::Reverse => "Current: reverse ←",
        };
        ui.label(RichText::new(direction).color(theme.text_secondary));
    }
}

fn capacitor(
    ui: &mut egui::Ui,
    theme: &Theme,
    palette: &StageTheme,
    lesson: &mut CapacitorLesson,
    motion: Motion,
) {
    let (area, painter) = canvas(ui, theme);
    let center = area.center();
    let charge = lesson.charge_level() as f32 / 100.0;

    let gap = 36.0;
    let plate = vec2(10.0, 110.0);
    let left = Rect::from_center_size(center - vec2(gap, 0.0), plate);
    let right = Rect::from_center_size(center + vec2(gap, 0.0), plate);
    painter.rect_filled(left, CornerRadius::same(2), palette.primary);
    painter.rect_filled(right, CornerRadius::same(2), palette.primary);

    // Opposite charges pile up on the two plates
    let dots = (charge * 8.0).round() as usize;
    for i in 0..dots {
        let y = left.top() + 8.0 + i as f32 * 13.0;
        label(&painter, Pos2::new(left.left() - 12.0, y), "+", theme.error);
        label(&painter, Pos2::new(right.right() + 12.0, y), "−", theme.accent);
    }
    if charge > 0.0 {
        let hum = 0.5 + 0.5 * (motion.cycle(1.2) * std::f32::consts::TAU).sin();
        let field = Rect::from_min_max(left.right_top(), right.left_bottom());
        painter.rect_filled(field, CornerRadius::ZERO, palette.glow.gamma_multiply(0.1 + 0.2 * charge * hum));
    }
    if lesson.battery_connected() {
        label(&painter, area.left_center() + vec2(60.0, 0.0), "🔋", theme.text_primary);
    }
    if lesson.flashing() {
        painter.rect_filled(area, CornerRadius::same(10), Color32::WHITE.gamma_multiply(0.35));
        label(&painter, area.center_top() + vec2(0.0, 20.0), "FLASH!", Color32::WHITE);
    }

    ui.add_space(8.0);
    ui.horizontal(|ui| match lesson.step() {
        0 => {
            if ui.add(action_button("Connect Battery", palette.primary)).clicked() {
                lesson.connect_battery();
            }
        }
        1 => {
            if ui.add(action_button("⚡ Start Charge", palette.primary)).clicked() {
                lesson.start_charge();
            }
        }
        3 => {
            if ui
                .add_enabled(lesson.charge_level() == 100, egui::Button::new("💥 Discharge"))
                .clicked()
            {
                lesson.discharge();
            }
            if ui
                .add_enabled(lesson.discharged(), egui::Button::new("Start Balance Game"))
                .clicked()
            {
                lesson.start_game();
            }
        }
        4 if lesson.game_active() => {
            if ui.button("−").clicked() {
                lesson.remove_charge();
            }
            if ui.button("+").clicked() {
                lesson.add_charge();
            }
            if ui.add(action_button("Submit", palette.primary)).clicked() {
                lesson.submit();
            }
        }
        _ => {}
    });

    ui.add_space(6.0);
    if lesson.step() == 4 {
        ui.label(
            RichText::new(format!("Target charge {}%", lesson.target_charge()))
                .strong()
                .color(palette.primary),
        );
        ui.add(
            egui::ProgressBar::new(lesson.player_charge() as f32 / 100.0)
                .fill(palette.secondary)
                .text(format!("Your charge {}%", lesson.player_charge())),
        );
        if let Some(accuracy) = lesson.accuracy() {
            ui.label(RichText::new(format!("Accuracy {accuracy}%")).color(theme.text_primary));
        }
    } else if lesson.step() >= 2 {
        ui.add(
            egui::ProgressBar::new(charge)
                .fill(palette.secondary)
                .text(format!("Stored energy {}%", lesson.charge_level())),
        );
    }
}

fn diode(
    ui: &mut egui::Ui,
    theme: &Theme,
    palette: &StageTheme,
    lesson: &mut DiodeLesson,
    motion: Motion,
) {
    let (area, painter) = canvas(ui, theme);
    let center = area.center();

    let degrees = if lesson.puzzle_active() || lesson.bulb_lit() {
        lesson.rotation()
    } else if lesson.bias() == Bias::Reverse {
        180
    } else {
        0
    };
    let rot = Rot2::from_angle((degrees as f32).to_radians());
    let tri = [vec2(-22.0, -22.0), vec2(-22.0, 22.0), vec2(22.0, 0.0)]
        .map(|v| center + rot * v)
        .to_vec();
    painter.add(Shape::convex_polygon(tri, palette.primary, Stroke::new(1.5, palette.glow)));
    let bar = [vec2(24.0, -22.0), vec2(24.0, 22.0)].map(|v| center + rot * v);
    painter.line_segment(bar, Stroke::new(4.0, palette.glow));

    for (terminal, offset, name) in [
        (Terminal::Anode, -90.0, "Anode +"),
        (Terminal::Cathode, 90.0, "Cathode −"),
    ] {
        let color = if lesson.terminal_connected(terminal) {
            palette.secondary
        } else {
            theme.border
        };
        let end = center + vec2(offset, 0.0);
        let start = center + vec2(offset.signum() * 30.0, 0.0);
        painter.line_segment([start, end], Stroke::new(3.0, color));
        label(&painter, end + vec2(0.0, 18.0), name, theme.text_muted);
    }

    let led = area.right_center() - vec2(50.0, 0.0);
    let wired = lesson.terminal_connected(Terminal::Anode)
        && lesson.terminal_connected(Terminal::Cathode);
    let lit = wired && lesson.conducting();
    let led_color = if lit { theme.error } else { theme.bg_light };
    painter.circle_filled(led, 16.0, led_color);
    if lit {
        painter.circle_stroke(led, 22.0, Stroke::new(2.0, theme.error.gamma_multiply(0.5)));
        let t = motion.cycle(1.5);
        for i in 0..4 {
            let x = center.x - 90.0 + ((t + i as f32 / 4.0).fract()) * 180.0;
            painter.circle_filled(Pos2::new(x, center.y - 34.0), 3.5, palette.glow);
        }
    }

    ui.add_space(8.0);
    ui.horizontal(|ui| {
        let step = lesson.step();
        if step == 0 {
            for (terminal, name) in [(Terminal::Anode, "Connect Anode"), (Terminal::Cathode, "Connect Cathode")] {
                if ui
                    .add_enabled(!lesson.terminal_connected(terminal), egui::Button::new(name))
                    .clicked()
                {
                    lesson.connect(terminal);
                }
            }
        } else if !lesson.puzzle_active() && lesson.stars().is_none() {
            for (bias, name) in [(Bias::Forward, "Forward Bias"), (Bias::Reverse, "Reverse Bias")] {
                if ui.selectable_label(lesson.bias() == bias, name).clicked() {
                    lesson.set_bias(bias);
                }
            }
            if step == 3 && ui.add(action_button("Start Puzzle", palette.primary)).clicked() {
                lesson.start_puzzle();
            }
        } else if lesson.puzzle_active() {
            if ui.button("⟲ Rotate Left").clicked() {
                lesson.rotate_counter_clockwise();
            }
            if ui.button("⟳ Rotate Right").clicked() {
                lesson.rotate_clockwise();
            }
            ui.label(
                RichText::new(format!("Rotations {} / {}", lesson.attempts(), MAX_ROTATIONS))
                    .color(theme.text_secondary),
            );
        }
    });

    if lesson.step() > 0 && !lesson.puzzle_active() && lesson.stars().is_none() {
        let state = if lesson.conducting() {
            "Current flows: forward bias"
        } else if lesson.bias() == Bias::Reverse {
            "Blocked: reverse bias"
        } else {
            "Choose a bias direction"
        };
        ui.label(RichText::new(state).color(theme.text_secondary));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn near(a: Pos2, b: Pos2) -> bool {
        (a - b).length() < 1e-3
    }

    #[test]
    fn test_point_on_loop_corners() {
        let rect = Rect::from_min_size(Pos2::ZERO, vec2(100.0, 50.0));
        // 300 px round: 100 top, 50 right, 100 bottom, 50 left
        assert!(near(point_on_loop(rect, 0.0), Pos2::new(0.0, 0.0)));
        assert!(near(point_on_loop(rect, 0.25), Pos2::new(75.0, 0.0)));
        assert!(near(point_on_loop(rect, 0.5), Pos2::new(100.0, 50.0)));
        assert!(near(point_on_loop(rect, 0.75), Pos2::new(25.0, 50.0)));
        assert!(near(point_on_loop(rect, 0.9), Pos2::new(0.0, 30.0)));
        assert!(near(point_on_loop(rect, 1.0), Pos2::new(0.0, 0.0)));
    }

    #[test]
    fn test_still_motion_holds() {
        let motion = Motion {
            time: 12.3,
            still: true,
        };
        assert_eq!(motion.cycle(2.0), 0.0);
        let moving = Motion {
            time: 3.0,
            still: false,
        };
        assert!((moving.cycle(2.0) - 0.5).abs() < 1e-6);
    }
}
