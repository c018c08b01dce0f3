use crate::error::{ProviderError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const SYSTEM_PROMPT: &str = "You are a helpful AI tutor. Create clear, accurate and engaging learning content that helps students understand and remember the material.";

/// What kind of study material to produce for a topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LearningMode {
    Explain,
    Summary,
    Flashcards,
    Quiz,
    Missing,
    StepByStep,
}

impl LearningMode {
    pub const ALL: [LearningMode; 6] = [
        LearningMode::Explain,
        LearningMode::Summary,
        LearningMode::Flashcards,
        LearningMode::Quiz,
        LearningMode::Missing,
        LearningMode::StepByStep,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            LearningMode::Explain => "explain",
            LearningMode::Summary => "summary",
            LearningMode::Flashcards => "flashcards",
            LearningMode::Quiz => "quiz",
            LearningMode::Missing => "missing",
            LearningMode::StepByStep => "stepByStep",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LearningMode::Explain => "Explain",
            LearningMode::Summary => "Summary",
            LearningMode::Flashcards => "Flashcards",
            LearningMode::Quiz => "Quiz",
            LearningMode::Missing => "Fill in the blanks",
            LearningMode::StepByStep => "Step by step",
        }
    }

    /// Interpolates `topic` verbatim; it is free text meant for the model.
    pub fn render(&self, topic: &str) -> String {
        match self {
            LearningMode::Explain => format!(
                "Explain \"{}\" in simple terms. Start with a one-sentence definition, cover the key ideas with everyday examples, and finish with why it matters.",
                topic
            ),
            LearningMode::Summary => format!(
                "Write a concise summary of \"{}\" as 5-7 bullet points covering the facts a student must remember.",
                topic
            ),
            LearningMode::Flashcards => format!(
                "Create 10 flashcards about \"{}\". Format each card as:\nQ: <question>\nA: <answer>\nKeep every answer short enough to memorize.",
                topic
            ),
            LearningMode::Quiz => format!(
                "Write a 5-question multiple-choice quiz about \"{}\". Give each question four options labelled A-D, then list the correct answers with a one-line explanation each.",
                topic
            ),
            LearningMode::Missing => format!(
                "Create 5 fill-in-the-blank sentences about \"{}\". Replace one key term in each sentence with ____ and list the missing words at the end.",
                topic
            ),
            LearningMode::StepByStep => format!(
                "Break \"{}\" down into a numbered step-by-step learning path. For each step say what to learn and suggest a quick way to practise it.",
                topic
            ),
        }
    }
}

pub fn render_prompt(mode: LearningMode, topic: &str) -> String {
    mode.render(topic)
}

impl fmt::Display for LearningMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for LearningMode {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "step-by-step" | "step_by_step" => Ok(LearningMode::StepByStep),
            _ => LearningMode::ALL
                .into_iter()
                .find(|mode| mode.key() == s)
                .ok_or_else(|| ProviderError::UnknownMode(s.to_string())),
        }
    }
}
