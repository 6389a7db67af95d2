use anyhow::{anyhow, bail, Context, Result};
use log::info;
use std::path::Path;
use std::sync::Arc;

use crate::core::io::Storage;
use crate::core::state::{SessionState, Stage, StoryVariables};
use crate::services::llm::LlmClient;
use crate::services::prompts::{self, Prompt};
use crate::services::variables::{apply_suggestions, SuggestionOutcome};

pub const STORY_FILE_NAME: &str = "generated_story.txt";
pub const STORY_MIME_TYPE: &str = "text/plain";

/// What came back from asking the model to complete missing variables.
#[derive(Debug, Clone)]
pub struct FillReport {
    pub suggestions: String,
    pub outcome: SuggestionOutcome,
}

#[derive(Debug, Clone)]
pub struct OutlineReport {
    pub fill: Option<FillReport>,
    pub outline: String,
}

/// Drives one story from inputs to a downloadable text.
pub struct StorySession {
    llm: Box<dyn LlmClient>,
    storage: Arc<dyn Storage>,
    output_folder: String,
    state: SessionState,
}

impl StorySession {
    pub fn new(
        llm: Box<dyn LlmClient>,
        storage: Arc<dyn Storage>,
        output_folder: impl Into<String>,
        variables: StoryVariables,
    ) -> Self {
        Self {
            llm,
            storage,
            output_folder: output_folder.into(),
            state: SessionState::new(variables),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn stage(&self) -> Stage {
        self.state.stage
    }

    pub fn outline(&self) -> Option<&str> {
        self.state.outline.as_deref()
    }

    pub fn chapters(&self) -> &[String] {
        &self.state.chapters
    }

    fn require_stage(&self, allowed: &[Stage], action: &str) -> Result<()> {
        if allowed.contains(&self.state.stage) {
            Ok(())
        } else {
            Err(anyhow!("Cannot {} while {}", action, self.state.stage))
        }
    }

    async fn send(&self, prompt: Prompt) -> Result<String> {
        self.llm.chat(&prompt.system, &prompt.user).await
    }

    /// Replaces the story variables. Only possible before chapters start.
    pub fn set_variables(&mut self, variables: StoryVariables) -> Result<()> {
        self.require_stage(
            &[Stage::Collecting, Stage::OutlineReady, Stage::AwaitingFeedback],
            "edit story variables",
        )?;
        self.state.variables = variables;
        Ok(())
    }

    /// Asks the model to guess any empty variables and applies what parses.
    ///
    /// Returns `None` without calling the model when nothing is missing.
    pub async fn fill_missing_variables(
        &self,
        vars: &mut StoryVariables,
    ) -> Result<Option<FillReport>> {
        let missing = vars.missing_fields();
        if missing.is_empty() {
            return Ok(None);
        }

        info!("Asking for {} missing story variable(s)", missing.len());
        let suggestions = self.send(prompts::missing_variables(vars, &missing)).await?;
        let outcome = apply_suggestions(vars, &suggestions);

        Ok(Some(FillReport { suggestions, outcome }))
    }

    pub async fn generate_outline(&mut self) -> Result<OutlineReport> {
        self.require_stage(
            &[Stage::Collecting, Stage::OutlineReady, Stage::AwaitingFeedback],
            "generate an outline",
        )?;

        let mut vars = self.state.variables.clone();
        let fill = self.fill_missing_variables(&mut vars).await?;
        let outline = self.send(prompts::outline(&vars)).await?;

        self.state.variables = vars;
        self.state.outline = Some(outline.clone());
        self.state.stage = Stage::OutlineReady;
        info!("Outline generated ({} chars)", outline.len());

        Ok(OutlineReport { fill, outline })
    }

    pub fn request_improvements(&mut self) -> Result<()> {
        self.require_stage(&[Stage::OutlineReady], "request improvements")?;
        self.state.stage = Stage::AwaitingFeedback;
        Ok(())
    }

    /// Replaces the outline with a revision addressing `feedback`.
    pub async fn submit_feedback(&mut self, feedback: &str) -> Result<&str> {
        self.require_stage(&[Stage::AwaitingFeedback], "submit feedback")?;
        let current = self
            .state
            .outline
            .as_deref()
            .context("No outline to revise")?;

        let revised = self.send(prompts::revise_outline(current, feedback)).await?;
        info!("Outline revised ({} chars)", revised.len());

        self.state.stage = Stage::OutlineReady;
        Ok(self.state.outline.insert(revised).as_str())
    }

    /// Generates chapters 1..=chapter_count one after another.
    ///
    /// `on_chapter` is called with (index, total, text) after each chapter.
    /// A failed request leaves the session in `GeneratingChapters` with the
    /// chapters received so far; only a restart is accepted afterwards.
    pub async fn approve_outline<F>(&mut self, mut on_chapter: F) -> Result<()>
    where
        F: FnMut(u32, u32, &str),
    {
        self.require_stage(&[Stage::OutlineReady], "approve the outline")?;
        let total = match self.state.variables.chapter_count {
            Some(n) if n > 0 => n,
            _ => bail!("Number of chapters is not set"),
        };
        let outline = self
            .state
            .outline
            .clone()
            .context("No outline to approve")?;

        self.state.stage = Stage::GeneratingChapters;
        self.state.chapters.clear();
        info!("Outline approved, generating {} chapter(s)", total);

        for index in 1..=total {
            let text = self
                .send(prompts::chapter(index, &outline))
                .await
                .with_context(|| format!("Failed to generate chapter {}", index))?;
            info!("Chapter {} generated.", index);
            on_chapter(index, total, &text);
            self.state.chapters.push(text);
        }

        self.state.stage = Stage::Done;
        Ok(())
    }

    pub fn full_story(&self) -> Result<String> {
        self.require_stage(&[Stage::Done], "assemble the story")?;
        Ok(self.state.full_story())
    }

    /// Writes the full story to `<output_folder>/generated_story.txt`.
    pub async fn download(&self) -> Result<String> {
        let story = self.full_story()?;
        let path = Path::new(&self.output_folder).join(STORY_FILE_NAME);
        let path_str = path
            .to_str()
            .ok_or_else(|| anyhow!("Output path is not valid UTF-8: {:?}", path))?;

        self.storage
            .write(path_str, story.as_bytes())
            .await
            .with_context(|| format!("Failed to write {}", path_str))?;
        info!("Story saved to {} ({})", path_str, STORY_MIME_TYPE);
        Ok(path_str.to_string())
    }

    /// Drops everything and starts over with empty variables.
    pub fn restart(&mut self) {
        info!("Session restarted from stage: {}", self.state.stage);
        self.state = SessionState::default();
    }
}
