//! Rendering forms in the terminal and collecting answers field by field

use colored::Colorize;
use eyre::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::debug;

use crate::domain::{AnswerValue, FieldKind, FieldSpec, FormAnswers, FormSpec};

/// Source of input lines; `Ok(None)` means the user closed input (Ctrl-D / Ctrl-C)
pub trait LineReader {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;
}

impl LineReader for DefaultEditor {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        match self.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = self.add_history_entry(line.as_str());
                }
                Ok(Some(line))
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
            Err(e) => Err(eyre::eyre!("Readline error: {}", e)),
        }
    }
}

/// What the user did while a form was on screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormInput {
    Answers(FormAnswers),
    /// Free text typed when no form is pending
    Text(String),
    /// A `/command` typed in place of an answer
    Command(String),
    Closed,
}

/// Print the form header and fields overview
pub fn render_form(form: &FormSpec) {
    println!();
    if let Some(title) = &form.title {
        println!("{}", title.bold().cyan());
    }
    if let Some(description) = &form.description {
        println!("{}", description.dimmed());
    }
}

fn render_field(field: &FieldSpec) {
    let marker = if field.required { "*".red().to_string() } else { String::new() };
    println!("{}{}", field.label.bold(), marker);
    if let Some(help) = &field.helper_text {
        println!("  {}", help.dimmed());
    }
    if !field.options.is_empty() {
        for (i, option) in field.options.iter().enumerate() {
            println!("  {} {}", format!("{})", i + 1).yellow(), option);
        }
    }
    let hint = match field.kind {
        FieldKind::Select | FieldKind::Radio => Some("pick a number or type the option".to_string()),
        FieldKind::MultiSelect => Some("comma-separated numbers or options".to_string()),
        FieldKind::Checkbox => Some("y/n".to_string()),
        FieldKind::Text | FieldKind::TextArea => field.placeholder.clone(),
    };
    if let Some(hint) = hint {
        let optional = if field.required { "" } else { ", empty to skip" };
        println!("  {}", format!("({}{})", hint, optional).dimmed());
    }
}

/// Ask every field in order. Required fields are re-asked until answered.
pub fn collect_answers(form: &FormSpec, reader: &mut dyn LineReader) -> Result<FormInput> {
    debug!(fields = form.fields.len(), "collect_answers: called");
    render_form(form);

    let mut answers = FormAnswers::new();
    for field in &form.fields {
        render_field(field);
        loop {
            let Some(line) = reader.read_line(&format!("{} ", "?".bright_green()))? else {
                return Ok(FormInput::Closed);
            };
            let line = line.trim();
            if line.starts_with('/') {
                return Ok(FormInput::Command(line.to_string()));
            }
            if line.is_empty() {
                if field.required {
                    println!("  {}", "This question is required.".yellow());
                    continue;
                }
                break;
            }
            match parse_field(field, line) {
                Ok(value) => {
                    answers.insert(field.id.clone(), value);
                    break;
                }
                Err(msg) => println!("  {}", msg.yellow()),
            }
        }
    }
    println!("{}", format!("[{}]", form.submit_label()).dimmed());
    Ok(FormInput::Answers(answers))
}

/// Turn one non-empty line into an answer for this field
pub fn parse_field(field: &FieldSpec, input: &str) -> Result<AnswerValue, String> {
    match field.kind {
        FieldKind::Text | FieldKind::TextArea => Ok(AnswerValue::text(input)),
        FieldKind::Select | FieldKind::Radio => parse_choice(input, &field.options)
            .map(AnswerValue::text)
            .ok_or_else(|| format!("'{}' is not one of the options.", input)),
        FieldKind::MultiSelect => parse_multi(input, &field.options).map(AnswerValue::many),
        FieldKind::Checkbox => parse_checkbox(input)
            .map(|b| AnswerValue::text(b.to_string()))
            .ok_or_else(|| "Please answer y or n.".to_string()),
    }
}

/// A 1-based option number or the option text (case-insensitive)
pub fn parse_choice(input: &str, options: &[String]) -> Option<String> {
    let input = input.trim();
    if let Ok(n) = input.parse::<usize>()
        && n >= 1
        && n <= options.len()
    {
        return Some(options[n - 1].clone());
    }
    options.iter().find(|o| o.eq_ignore_ascii_case(input)).cloned()
}

/// Comma-separated choices, kept in the order typed, duplicates dropped
pub fn parse_multi(input: &str, options: &[String]) -> Result<Vec<String>, String> {
    let mut picked: Vec<String> = Vec::new();
    for token in input.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let choice = parse_choice(token, options).ok_or_else(|| format!("'{}' is not one of the options.", token))?;
        if !picked.contains(&choice) {
            picked.push(choice);
        }
    }
    Ok(picked)
}

pub fn parse_checkbox(input: &str) -> Option<bool> {
    match input.trim().to_lowercase().as_str() {
        "y" | "yes" | "true" => Some(true),
        "n" | "no" | "false" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::collections::VecDeque;

    /// Feeds canned lines; closes once they run out
    pub struct ScriptedReader {
        lines: VecDeque<String>,
    }

    impl ScriptedReader {
        pub fn new(lines: &[&str]) -> Self {
            Self {
                lines: lines.iter().map(|s| s.to_string()).collect(),
            }
        }
    }

    impl LineReader for ScriptedReader {
        fn read_line(&mut self, _prompt: &str) -> Result<Option<String>> {
            Ok(self.lines.pop_front())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::ScriptedReader;
    use super::*;
    use crate::interview::Stage;

    fn opts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_choice() {
        let options = opts(&["Web", "Desktop"]);
        assert_eq!(parse_choice("2", &options), Some("Desktop".to_string()));
        assert_eq!(parse_choice("web", &options), Some("Web".to_string()));
        assert_eq!(parse_choice("0", &options), None);
        assert_eq!(parse_choice("3", &options), None);
        assert_eq!(parse_choice("Mobile", &options), None);
    }

    #[test]
    fn test_parse_multi_keeps_order() {
        let options = opts(&["Auth", "Payments", "Chat"]);
        assert_eq!(parse_multi("3, auth, 3", &options).unwrap(), opts(&["Chat", "Auth"]));
        assert!(parse_multi("2, nope", &options).is_err());
        assert!(parse_multi(" , ", &options).unwrap().is_empty());
    }

    #[test]
    fn test_parse_checkbox() {
        assert_eq!(parse_checkbox("Y"), Some(true));
        assert_eq!(parse_checkbox("no"), Some(false));
        assert_eq!(parse_checkbox("maybe"), None);
    }

    #[test]
    fn test_collect_basics_form() {
        let form = Stage::Basics.turn_result().form.unwrap();
        // required audience re-asked after a blank, bad platform re-asked, monetization skipped
        let mut reader = ScriptedReader::new(&["", "Students", "Moon", "2", ""]);
        let FormInput::Answers(answers) = collect_answers(&form, &mut reader).unwrap() else {
            panic!("expected answers");
        };
        assert_eq!(answers.len(), 2);
        assert_eq!(answers.get("target_audience"), Some(&AnswerValue::text("Students")));
        assert_eq!(answers.get("platform"), Some(&AnswerValue::text("Mobile (iOS/Android)")));
        assert!(answers.get("monetization").is_none());
        assert!(form.missing_required(&answers).is_empty());
    }

    #[test]
    fn test_collect_multiselect() {
        let form = Stage::TechPrefs.turn_result().form.unwrap();
        let features = &form.field("features").unwrap().options;
        let mut reader = ScriptedReader::new(&["1", &format!("2, {}", features[0])]);
        let FormInput::Answers(answers) = collect_answers(&form, &mut reader).unwrap() else {
            panic!("expected answers");
        };
        assert_eq!(
            answers.get("features"),
            Some(&AnswerValue::many([features[1].clone(), features[0].clone()]))
        );
    }

    #[test]
    fn test_slash_command_interrupts_form() {
        let form = Stage::Spark.turn_result().form.unwrap();
        let mut reader = ScriptedReader::new(&["/transcript"]);
        assert_eq!(
            collect_answers(&form, &mut reader).unwrap(),
            FormInput::Command("/transcript".to_string())
        );
    }

    #[test]
    fn test_closed_input() {
        let form = Stage::Spark.turn_result().form.unwrap();
        let mut reader = ScriptedReader::new(&[]);
        assert_eq!(collect_answers(&form, &mut reader).unwrap(), FormInput::Closed);
    }
}
