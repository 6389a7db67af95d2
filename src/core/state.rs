use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Serialize, Deserialize, Default, Clone, Debug, PartialEq, Eq)]
pub struct StoryVariables {
    #[serde(default)]
    pub community: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub concept: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub target_word_count: Option<u32>,
    #[serde(default)]
    pub chapter_count: Option<u32>,
}

/// One of the six story parameters, in prompt order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoryField {
    Community,
    Title,
    Concept,
    Genre,
    TargetWordCount,
    ChapterCount,
}

impl StoryField {
    pub const ALL: [StoryField; 6] = [
        StoryField::Community,
        StoryField::Title,
        StoryField::Concept,
        StoryField::Genre,
        StoryField::TargetWordCount,
        StoryField::ChapterCount,
    ];

    /// Label used in prompt templates and expected back in suggestions.
    pub fn label(self) -> &'static str {
        match self {
            StoryField::Community => "Subreddit/Community",
            StoryField::Title => "Story Title",
            StoryField::Concept => "Story Concept",
            StoryField::Genre => "Niche/Genre",
            StoryField::TargetWordCount => "Target Word Count",
            StoryField::ChapterCount => "Number of Chapters",
        }
    }

    /// Lowercase name used when telling the model what is missing.
    pub fn missing_name(self) -> &'static str {
        match self {
            StoryField::Community => "subreddit/community",
            StoryField::Title => "story title",
            StoryField::Concept => "story concept",
            StoryField::Genre => "niche/genre",
            StoryField::TargetWordCount => "target word count",
            StoryField::ChapterCount => "number of chapters",
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, StoryField::TargetWordCount | StoryField::ChapterCount)
    }
}

impl StoryVariables {
    pub fn missing_fields(&self) -> Vec<StoryField> {
        StoryField::ALL
            .into_iter()
            .filter(|f| !self.is_set(*f))
            .collect()
    }

    fn is_set(&self, field: StoryField) -> bool {
        match field {
            StoryField::Community => !self.community.trim().is_empty(),
            StoryField::Title => !self.title.trim().is_empty(),
            StoryField::Concept => !self.concept.trim().is_empty(),
            StoryField::Genre => !self.genre.trim().is_empty(),
            StoryField::TargetWordCount => self.target_word_count.is_some(),
            StoryField::ChapterCount => self.chapter_count.is_some(),
        }
    }

    /// Value as it appears inside a prompt; unset numbers render empty.
    pub fn display_value(&self, field: StoryField) -> String {
        match field {
            StoryField::Community => self.community.clone(),
            StoryField::Title => self.title.clone(),
            StoryField::Concept => self.concept.clone(),
            StoryField::Genre => self.genre.clone(),
            StoryField::TargetWordCount => {
                self.target_word_count.map(|n| n.to_string()).unwrap_or_default()
            }
            StoryField::ChapterCount => {
                self.chapter_count.map(|n| n.to_string()).unwrap_or_default()
            }
        }
    }

    pub fn set_text(&mut self, field: StoryField, value: String) {
        match field {
            StoryField::Community => self.community = value,
            StoryField::Title => self.title = value,
            StoryField::Concept => self.concept = value,
            StoryField::Genre => self.genre = value,
            StoryField::TargetWordCount | StoryField::ChapterCount => {}
        }
    }

    pub fn set_number(&mut self, field: StoryField, value: u32) {
        match field {
            StoryField::TargetWordCount => self.target_word_count = Some(value),
            StoryField::ChapterCount => self.chapter_count = Some(value),
            _ => {}
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Stage {
    #[default]
    Collecting,
    OutlineReady,
    AwaitingFeedback,
    GeneratingChapters,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Collecting => "collecting inputs",
            Stage::OutlineReady => "outline ready",
            Stage::AwaitingFeedback => "awaiting feedback",
            Stage::GeneratingChapters => "generating chapters",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

#[derive(Default, Clone, Debug)]
pub struct SessionState {
    pub stage: Stage,
    pub variables: StoryVariables,
    pub outline: Option<String>,
    pub chapters: Vec<String>,
}

impl SessionState {
    pub fn new(variables: StoryVariables) -> Self {
        Self {
            variables,
            ..Default::default()
        }
    }

    pub fn full_story(&self) -> String {
        self.chapters.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_text_counts_as_missing() {
        let vars = StoryVariables {
            community: "r/nosleep".to_string(),
            title: "   ".to_string(),
            concept: "A haunted lighthouse".to_string(),
            genre: String::new(),
            target_word_count: Some(2000),
            chapter_count: None,
        };
        assert_eq!(
            vars.missing_fields(),
            vec![StoryField::Title, StoryField::Genre, StoryField::ChapterCount]
        );
    }

    #[test]
    fn test_full_story_joins_with_single_newline() {
        let state = SessionState {
            chapters: vec!["One.".to_string(), "Two.\n".to_string(), "Three".to_string()],
            ..Default::default()
        };
        assert_eq!(state.full_story(), "One.\nTwo.\n\nThree");
    }
}
