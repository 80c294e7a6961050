//! Stage listing

use anyhow::Result;
use serde::Serialize;

use crate::cli::output::{OutputFormat, print_formatted, text_rows};
use crate::lesson::{ActiveLesson, LessonSettings, lesson_info};
use crate::progress::StageKind;
use crate::scoring::Badge;

#[derive(Debug, Serialize)]
struct StageEntry {
    number: u8,
    name: &'static str,
    title: &'static str,
    icon: &'static str,
    color_tag: &'static str,
    steps: usize,
    badge: Badge,
}

fn stage_entries() -> Vec<StageEntry> {
    let settings = LessonSettings::default();
    StageKind::ALL
        .iter()
        .map(|&kind| StageEntry {
            number: kind.number(),
            name: kind.name(),
            title: lesson_info(kind).stage_name,
            icon: kind.icon(),
            color_tag: kind.color_tag(),
            steps: ActiveLesson::new(kind, &settings).as_lesson().total_steps(),
            badge: kind.badge(),
        })
        .collect()
}

pub fn run(format: OutputFormat) -> Result<()> {
    let entries = stage_entries();

    print_formatted(&entries, format, |entries| {
        text_rows(entries, |e| {
            format!(
                "{}. {} {:<10} {:<28} {} steps, badge: {} {}",
                e.number, e.icon, e.name, e.title, e.steps, e.badge.icon, e.badge.name
            )
        })
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_follow_lesson_order() {
        let entries = stage_entries();
        let names: Vec<&str> = entries.iter().map(|e| e.name).collect();
        assert_eq!(names, ["Resistor", "Inductor", "Capacitor", "Diode"]);
        assert!(entries.iter().all(|e| e.steps > 0));
        assert_eq!(entries[3].badge.name, "Current Controller");
    }
}
