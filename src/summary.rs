//! Summary options - the user's length, format and language choices.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// How long the generated summary should be.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Length {
    Short,
    #[default]
    Medium,
    Detailed,
}

impl Length {
    /// Instruction phrase sent to the model for this length.
    pub fn directive(&self) -> &'static str {
        match self {
            Length::Short => "Summarize this text in 2-3 sentences",
            Length::Medium => "Provide a medium-length summary in 4-5 sentences",
            Length::Detailed => "Create a detailed summary while keeping it concise",
        }
    }
}

/// Layout of the generated summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Paragraphs,
    Bullets,
}

impl OutputFormat {
    /// Instruction phrase sent to the model for this format.
    pub fn directive(&self) -> &'static str {
        match self {
            OutputFormat::Bullets => {
                "Format the summary as bullet points, with each main point on a new line starting with \"• \""
            }
            OutputFormat::Paragraphs => "Format the summary as coherent paragraphs",
        }
    }
}

/// Options controlling the style of a summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryOptions {
    #[serde(default)]
    pub length: Length,
    #[serde(default)]
    pub format: OutputFormat,
    /// Target language, e.g. "French". The source language is kept when unset.
    #[serde(default)]
    pub language: Option<String>,
}

impl SummaryOptions {
    pub fn new(length: Length, format: OutputFormat) -> Self {
        Self {
            length,
            format,
            language: None,
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// The system instruction describing this summary style.
    pub fn instruction(&self) -> String {
        let mut instruction = format!(
            "You are a text summarizer. {}. {}.",
            self.length.directive(),
            self.format.directive()
        );

        if let Some(language) = self.language.as_deref().map(str::trim) {
            if !language.is_empty() {
                instruction.push_str(&format!(" Respond in {}.", language));
            }
        }

        instruction
    }
}
