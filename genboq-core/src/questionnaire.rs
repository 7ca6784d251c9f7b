use shared_types::{
    Answer, Answers, Question, QuestionKind, QuestionOption, QuestionnaireDefinition,
    QuestionnaireSection,
};

const PREAMBLE: &str =
    "Generate a Bill of Quantities for an AV installation based on the following requirements:";

/// Compile answered questions into the requirements text sent to the generator.
///
/// Sections and questions without an answer are skipped entirely; with no answers at
/// all the result is empty.
pub fn compile_requirements(definition: &QuestionnaireDefinition, answers: &Answers) -> String {
    let mut body = String::new();

    for section in &definition.sections {
        let lines: Vec<String> = section
            .questions
            .iter()
            .filter_map(|question| {
                let answer = answers.get(&question.id)?;
                if answer.is_empty() {
                    return None;
                }
                Some(format!("  - {}: {}", question.text, resolve_labels(question, answer)))
            })
            .collect();

        if lines.is_empty() {
            continue;
        }

        body.push_str(&format!("\n- Section: {}\n", section.title));
        for line in lines {
            body.push_str(&line);
            body.push('\n');
        }
    }

    if body.is_empty() {
        return body;
    }
    format!("{PREAMBLE}\n{body}")
}

/// Option labels for an answer; multiple values follow option-list order, with
/// unknown values appended as given.
fn resolve_labels(question: &Question, answer: &Answer) -> String {
    match answer {
        Answer::Single(value) => {
            let value = value.trim();
            question.label_for(value).unwrap_or(value).to_string()
        }
        Answer::Multiple(values) => {
            let chosen: Vec<&str> = values
                .iter()
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .collect();

            let mut labels: Vec<&str> = question
                .options
                .iter()
                .filter(|opt| chosen.contains(&opt.value.as_str()))
                .map(|opt| opt.label.as_str())
                .collect();

            for value in chosen {
                if question.label_for(value).is_none() && !labels.contains(&value) {
                    labels.push(value);
                }
            }

            labels.join(", ")
        }
    }
}

fn option(label: &str, value: &str) -> QuestionOption {
    QuestionOption {
        value: value.to_string(),
        label: label.to_string(),
    }
}

fn question(id: &str, text: &str, kind: QuestionKind, options: Vec<QuestionOption>) -> Question {
    Question {
        id: id.to_string(),
        text: text.to_string(),
        kind,
        options,
    }
}

/// The guided questionnaire offered alongside free-text input
pub fn default_questionnaire() -> QuestionnaireDefinition {
    QuestionnaireDefinition {
        sections: vec![
            QuestionnaireSection {
                title: "Room Details".to_string(),
                questions: vec![
                    question(
                        "roomType",
                        "What is the primary function of this room?",
                        QuestionKind::Select,
                        vec![
                            option("Conference Room", "conference"),
                            option("Huddle Room", "huddle"),
                            option("Boardroom", "boardroom"),
                            option("Classroom / Training Room", "classroom"),
                            option("Auditorium", "auditorium"),
                            option("Town Hall / All-Hands Space", "town_hall"),
                            option("Experience Center", "experience_center"),
                            option("NOC / Command Center", "noc"),
                            option("Executive Office", "executive_office"),
                            option("Lobby / Digital Signage", "lobby"),
                        ],
                    ),
                    question(
                        "dimensions",
                        "What are the approximate room dimensions? (e.g., 8m x 6m)",
                        QuestionKind::Text,
                        vec![],
                    ),
                    question(
                        "capacity",
                        "How many people will the room typically accommodate?",
                        QuestionKind::Number,
                        vec![],
                    ),
                ],
            },
            QuestionnaireSection {
                title: "Display Needs".to_string(),
                questions: vec![
                    question(
                        "displayType",
                        "What kind of main display is needed?",
                        QuestionKind::MultipleChoice,
                        vec![
                            option("Single Large Format Display (LFD)", "single_lfd"),
                            option("Dual Large Format Displays (LFDs)", "dual_lfd"),
                            option("Video Wall", "video_wall"),
                            option("Projector and Screen", "projector"),
                        ],
                    ),
                    question(
                        "displayResolution",
                        "What resolution is required for the main display?",
                        QuestionKind::Select,
                        vec![option("Full HD (1080p)", "FHD"), option("4K (UHD)", "4K")],
                    ),
                ],
            },
            QuestionnaireSection {
                title: "Audio & Conferencing".to_string(),
                questions: vec![
                    question(
                        "conferencing",
                        "Will video conferencing be used in this room?",
                        QuestionKind::Select,
                        vec![
                            option("Yes, frequently", "yes"),
                            option("Occasionally", "sometimes"),
                            option("No", "no"),
                        ],
                    ),
                    question(
                        "audioNeeds",
                        "What are the primary audio requirements?",
                        QuestionKind::MultipleChoice,
                        vec![
                            option(
                                "Clear voice reproduction for meetings (Speech Reinforcement)",
                                "speech",
                            ),
                            option(
                                "High-quality audio for presentations with video/music",
                                "presentation_audio",
                            ),
                            option("Ceiling microphones for clean table space", "ceiling_mics"),
                            option("Tabletop microphones for flexibility", "table_mics"),
                        ],
                    ),
                ],
            },
            QuestionnaireSection {
                title: "Connectivity & Control".to_string(),
                questions: vec![
                    question(
                        "connectivity",
                        "How will users connect to the system to present?",
                        QuestionKind::MultipleChoice,
                        vec![
                            option("Wired connection (HDMI)", "hdmi"),
                            option(
                                "Wireless presentation (e.g., Barco ClickShare, Crestron AirMedia)",
                                "wireless",
                            ),
                        ],
                    ),
                    question(
                        "controlSystem",
                        "How should the room be controlled?",
                        QuestionKind::Select,
                        vec![
                            option("Simple remote control", "remote"),
                            option("Tabletop touch panel", "touch_panel"),
                            option("Wall-mounted keypad", "keypad"),
                            option("No centralized control needed", "none"),
                        ],
                    ),
                    question(
                        "other",
                        "Are there any other specific requirements or features needed?",
                        QuestionKind::Text,
                        vec![],
                    ),
                ],
            },
        ],
    }
}
