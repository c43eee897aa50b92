//! Line-oriented question rendering and answer parsing for the terminal.

use safepills_core::{translate, translate_with, AnswerValue, FlowQuestion, Lang, Progress, QuestionKind};

/// A parsed line of user input.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Answer(AnswerValue),
    Back,
}

const BACK_WORDS: &[&str] = &["b", "back", "r", "retour", "v", "volver"];
const YES_WORDS: &[&str] = &["o", "oui", "y", "yes", "s", "si", "sí"];
const NO_WORDS: &[&str] = &["n", "non", "no"];

pub fn parse_yes_no(raw: &str) -> Option<bool> {
    let word = raw.trim().to_lowercase();
    if YES_WORDS.contains(&word.as_str()) {
        Some(true)
    } else if NO_WORDS.contains(&word.as_str()) {
        Some(false)
    } else {
        None
    }
}

fn is_back(raw: &str) -> bool {
    BACK_WORDS.contains(&raw.trim().to_lowercase().as_str())
}

/// Parse input for a flow question. `None` means "ask again".
///
/// Choice questions accept the option value or its 1-based number.
pub fn parse_flow_input(question: &FlowQuestion, raw: &str) -> Option<Input> {
    if is_back(raw) {
        return Some(Input::Back);
    }
    let raw = raw.trim();

    let value = match question.kind {
        QuestionKind::Boolean => AnswerValue::Boolean(parse_yes_no(raw)?),
        QuestionKind::Number => AnswerValue::Number(raw.parse::<i64>().ok().filter(|n| *n >= 0)?),
        QuestionKind::Choice => {
            let options = question.options.as_deref().unwrap_or_default();
            let by_number = raw
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| options.get(i));
            let by_value = options.iter().find(|o| o.value.eq_ignore_ascii_case(raw));
            match by_number.or(by_value) {
                Some(option) => AnswerValue::Text(option.value.clone()),
                None if options.is_empty() && !raw.is_empty() => AnswerValue::Text(raw.to_string()),
                None => return None,
            }
        }
    };

    question.accepts(&value).then_some(Input::Answer(value))
}

/// Multi-line prompt for a flow question.
pub fn render_flow_question(question: &FlowQuestion, progress: Progress, lang: Lang) -> String {
    let mut out = translate_with(
        lang,
        "quiz.progress",
        &[
            ("current", progress.position.to_string().as_str()),
            ("total", progress.total.to_string().as_str()),
        ],
    );
    out.push('\n');
    out.push_str(&question.text);

    match question.kind {
        QuestionKind::Boolean => {
            out.push_str(&format!(
                "\n  [{}] / [{}]",
                translate(lang, "quiz.yes"),
                translate(lang, "quiz.no")
            ));
        }
        QuestionKind::Number => {
            out.push_str(&format!(
                "\n  ({}, {})",
                translate(lang, "quiz.age_placeholder"),
                translate(lang, "quiz.age_unit")
            ));
        }
        QuestionKind::Choice => {
            for (i, option) in question.options.iter().flatten().enumerate() {
                out.push_str(&format!("\n  {}. {}", i + 1, option.label));
            }
        }
    }
    out
}
