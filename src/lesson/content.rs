//! Static lesson text: intro panel and summary points

use crate::progress::StageKind;

/// Text shown in a lesson's intro and summary panels
#[derive(Debug)]
pub struct LessonInfo {
    pub stage_name: &'static str,
    pub title: &'static str,
    pub explanation: &'static str,
    pub formula: &'static str,
    pub formula_explanation: &'static str,
    pub did_you_know: &'static str,
    pub summary_points: [&'static str; 4],
}

impl LessonInfo {
    /// Intro panel body as markdown
    pub fn intro_markdown(&self) -> String {
        format!(
            "{}\n\n**{}**\n\n_{}_\n\n### Did You Know?\n\n{}",
            self.explanation, self.formula, self.formula_explanation, self.did_you_know
        )
    }
}

static LESSONS: [LessonInfo; 4] = [
    LessonInfo {
        stage_name: "Resistor Rings",
        title: "Welcome to Resistor Rings! 🔶",
        explanation: "A resistor squeezes the path electrons travel through. The harder \
                      the squeeze, the fewer electrons make it around the circuit each second.",
        formula: "V = I × R",
        formula_explanation: "Voltage equals Current times Resistance",
        did_you_know: "The glowing filament in an old light bulb is a resistor that gets \
                       so hot it shines!",
        summary_points: [
            "Resistors limit how much current flows",
            "More resistance means less current and a dimmer light",
            "Ohm's law ties voltage, current and resistance together",
            "Resistance is measured in Ohms (Ω)",
        ],
    },
    LessonInfo {
        stage_name: "Inductor Galaxy",
        title: "Welcome to Inductor Galaxy! 🔵",
        explanation: "When electricity flows through a coiled wire, it creates an invisible \
                      magnetic force field! This magical property is called inductance.",
        formula: "L = Φ / I",
        formula_explanation: "Inductance equals Magnetic Flux divided by Current",
        did_you_know: "Inductors are used in wireless phone chargers. They move energy \
                       through magnetism without any wires touching!",
        summary_points: [
            "Inductors create magnetic fields when current flows",
            "The field stores energy in magnetic form",
            "Reversing current changes the field direction",
            "Inductance is measured in Henrys (H)",
        ],
    },
    LessonInfo {
        stage_name: "Capacitor Cosmos",
        title: "Welcome to Capacitor Cosmos! 🟢",
        explanation: "A capacitor stores electrical energy like a rechargeable cosmic battery! \
                      It has two metal plates that hold opposite charges, creating an \
                      electric field between them.",
        formula: "C = Q / V",
        formula_explanation: "Capacitance equals Charge divided by Voltage",
        did_you_know: "The flash in your camera uses a capacitor! It stores energy slowly, \
                       then releases it super fast to create that bright flash of light.",
        summary_points: [
            "Capacitors store electrical energy between two plates",
            "They charge slowly and can discharge instantly",
            "Used in camera flashes and phone batteries",
            "Capacitance is measured in Farads (F)",
        ],
    },
    LessonInfo {
        stage_name: "Diode Dimension",
        title: "Welcome to Diode Dimension! 🔴",
        explanation: "A diode is a one-way door for electrons. They can only flow in one \
                      direction! When connected correctly (forward bias), current flows. \
                      When reversed, it's blocked!",
        formula: "Anode → Cathode",
        formula_explanation: "Current flows from positive (Anode) to negative (Cathode)",
        did_you_know: "LEDs are special diodes that light up! The 'D' in LED stands for \
                       Diode. Your phone screen has millions of tiny LEDs!",
        summary_points: [
            "Diodes allow current to flow in only ONE direction",
            "Forward bias = current flows, Reverse bias = blocked",
            "LEDs are diodes that emit light",
            "Used in circuits to protect and control current",
        ],
    },
];

pub fn lesson_info(kind: StageKind) -> &'static LessonInfo {
    &LESSONS[kind.index()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_stage_has_content() {
        for kind in StageKind::ALL {
            let info = lesson_info(kind);
            assert!(info.title.contains(kind.name()));
            assert!(info.summary_points.iter().all(|p| !p.is_empty()));
        }
    }

    #[test]
    fn test_intro_markdown() {
        let md = lesson_info(StageKind::Capacitor).intro_markdown();
        assert!(md.contains("**C = Q / V**"));
        assert!(md.contains("### Did You Know?"));
    }
}
