//! Stage - the fixed interview sequence

use serde::Serialize;
use tracing::debug;

use crate::domain::{FieldKind, FieldSpec, FormSpec, InterviewTurnResult};

/// One step of the offline interview
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    /// What do you want to build?
    Spark,
    /// Audience, platform, monetization
    Basics,
    /// Visual style and primary color
    #[serde(rename = "design-preferences")]
    DesignPrefs,
    /// Scale and technical features
    #[serde(rename = "tech-preferences")]
    TechPrefs,
    /// Handoff to generation
    Complete,
}

impl Stage {
    /// Every stage, in interview order
    pub const ALL: [Stage; 5] = [
        Stage::Spark,
        Stage::Basics,
        Stage::DesignPrefs,
        Stage::TechPrefs,
        Stage::Complete,
    ];

    /// Select the stage from the number of turns exchanged so far.
    ///
    /// Pure function of the count; the content of the turns is never inspected.
    pub fn from_turn_count(turns: usize) -> Self {
        debug!(%turns, "Stage::from_turn_count: called");
        match turns {
            0 => Stage::Spark,
            1..=2 => Stage::Basics,
            3..=4 => Stage::DesignPrefs,
            5..=6 => Stage::TechPrefs,
            _ => Stage::Complete,
        }
    }

    /// Turn counts that select this stage, for display
    pub fn turn_range(&self) -> &'static str {
        match self {
            Stage::Spark => "0",
            Stage::Basics => "1-2",
            Stage::DesignPrefs => "3-4",
            Stage::TechPrefs => "5-6",
            Stage::Complete => "7+",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Stage::Spark => "spark",
            Stage::Basics => "basics",
            Stage::DesignPrefs => "design-preferences",
            Stage::TechPrefs => "tech-preferences",
            Stage::Complete => "complete",
        }
    }

    /// The canned interview step for this stage
    pub fn turn_result(&self) -> InterviewTurnResult {
        debug!(stage = %self, "Stage::turn_result: called");
        match self {
            Stage::Spark => InterviewTurnResult::ask(
                "Hello! I'm your AI Product Co-founder. I'm here to help you turn your idea into reality. \
                 To get started, tell me: What do you want to build today?",
                FormSpec {
                    title: Some("The Spark".to_string()),
                    description: None,
                    fields: vec![
                        FieldSpec::new("idea", "Describe your app idea", FieldKind::TextArea)
                            .with_placeholder("e.g., A Tinder for adopting pets...")
                            .required(),
                    ],
                    submit_label: Some("Let's Go".to_string()),
                },
            )
            .with_reasoning("Starting the interview. Need to know the core idea."),
            Stage::Basics => InterviewTurnResult::ask(
                "That sounds interesting! Let's pin down the basics.",
                FormSpec {
                    title: Some("The Basics".to_string()),
                    description: None,
                    fields: vec![
                        FieldSpec::new("target_audience", "Who is this for?", FieldKind::Text)
                            .with_placeholder("e.g., Busy professionals, Students...")
                            .required(),
                        FieldSpec::new("platform", "Primary Platform", FieldKind::Radio)
                            .with_options(["Web", "Mobile (iOS/Android)", "Desktop", "Cross-platform"])
                            .required(),
                        FieldSpec::new("monetization", "How will it make money?", FieldKind::Select).with_options([
                            "Free",
                            "Subscription",
                            "Ads",
                            "One-time purchase",
                        ]),
                    ],
                    submit_label: Some("Next: Design".to_string()),
                },
            )
            .with_reasoning("User provided idea. Now need to define the audience and platform."),
            Stage::DesignPrefs => InterviewTurnResult::ask(
                "Got it. Now let's talk about the look and feel.",
                FormSpec {
                    title: Some("Design Vibes".to_string()),
                    description: None,
                    fields: vec![
                        FieldSpec::new("style", "Visual Style", FieldKind::Select)
                            .with_options([
                                "Minimalist",
                                "Playful/Cartoon",
                                "Corporate/Professional",
                                "Dark/Futuristic",
                            ])
                            .required(),
                        FieldSpec::new("colors", "Primary Color Preference", FieldKind::Radio)
                            .with_options(["Blue", "Green", "Purple", "Black/White"])
                            .required(),
                    ],
                    submit_label: Some("Next: Tech".to_string()),
                },
            )
            .with_reasoning("Basics done. Now asking about design preferences."),
            Stage::TechPrefs => InterviewTurnResult::ask(
                "Okay, last step before I generate the specs. Let's get technical.",
                FormSpec {
                    title: Some("Under the Hood".to_string()),
                    description: None,
                    fields: vec![
                        FieldSpec::new("users", "Expected User Scale (Year 1)", FieldKind::Select)
                            .with_options(["< 1,000", "1,000 - 10,000", "10,000 - 1M", "1M+"])
                            .required(),
                        FieldSpec::new("features", "Key Technical Features", FieldKind::MultiSelect).with_options([
                            "Real-time Chat",
                            "Payments",
                            "AI Integration",
                            "Video Streaming",
                            "Maps/Location",
                        ]),
                    ],
                    submit_label: Some("Generate Specs".to_string()),
                },
            )
            .with_reasoning("Design done. Now technical details."),
            Stage::Complete => {
                InterviewTurnResult::finished("I have everything I need! Generating your complete product package now...")
                    .with_reasoning("All info gathered. Signaling completion.")
            }
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_stage_table() {
        let expected = [
            (0, Stage::Spark),
            (1, Stage::Basics),
            (2, Stage::Basics),
            (3, Stage::DesignPrefs),
            (4, Stage::DesignPrefs),
            (5, Stage::TechPrefs),
            (6, Stage::TechPrefs),
            (7, Stage::Complete),
            (8, Stage::Complete),
            (100, Stage::Complete),
        ];
        for (turns, stage) in expected {
            assert_eq!(Stage::from_turn_count(turns), stage, "turn count {}", turns);
        }
    }

    #[test]
    fn test_spark_asks_for_required_free_text() {
        let result = Stage::Spark.turn_result();
        let form = result.form.unwrap();
        assert_eq!(form.fields.len(), 1);
        assert_eq!(form.fields[0].id, "idea");
        assert_eq!(form.fields[0].kind, FieldKind::TextArea);
        assert!(form.fields[0].required);
    }

    #[test]
    fn test_basics_fields() {
        let form = Stage::Basics.turn_result().form.unwrap();
        let audience = form.field("target_audience").unwrap();
        assert!(audience.required);
        let platform = form.field("platform").unwrap();
        assert!(platform.required);
        assert_eq!(platform.options.len(), 4);
        assert!(!form.field("monetization").unwrap().required);
    }

    #[test]
    fn test_design_fields_are_required_choices() {
        let form = Stage::DesignPrefs.turn_result().form.unwrap();
        for field in &form.fields {
            assert!(field.required);
            assert!(field.kind.needs_options());
        }
    }

    #[test]
    fn test_tech_features_are_optional_multi() {
        let form = Stage::TechPrefs.turn_result().form.unwrap();
        assert!(form.field("users").unwrap().required);
        let features = form.field("features").unwrap();
        assert_eq!(features.kind, FieldKind::MultiSelect);
        assert!(!features.required);
    }

    #[test]
    fn test_complete_has_no_form() {
        let result = Stage::Complete.turn_result();
        assert!(result.complete);
        assert!(result.form.is_none());
        assert!(!result.message.is_empty());
    }

    #[test]
    fn test_every_canned_form_is_valid() {
        for stage in Stage::ALL {
            if let Some(form) = stage.turn_result().form {
                assert_eq!(form.validate(), Ok(()), "stage {}", stage);
            }
        }
    }

    proptest! {
        #[test]
        fn prop_stage_depends_only_on_count(turns in 0usize..10_000) {
            let first = Stage::from_turn_count(turns);
            let second = Stage::from_turn_count(turns);
            prop_assert_eq!(first, second);
            prop_assert_eq!(first == Stage::Complete, turns >= 7);
        }

        #[test]
        fn prop_never_complete_with_form(turns in 0usize..10_000) {
            let result = Stage::from_turn_count(turns).turn_result();
            prop_assert!(!(result.complete && result.form.is_some()));
            prop_assert!(result.complete || result.form.is_some());
        }
    }
}
