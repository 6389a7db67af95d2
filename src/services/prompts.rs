//! Prompt templates sent to the text generation service.
//!
//! Each builder returns a [`Prompt`]: the role instruction goes to the
//! model's system slot, the template body to the user slot.

use crate::core::state::{StoryField, StoryVariables};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

fn variables_block(vars: &StoryVariables) -> String {
    let mut block = String::from("🌟 Story Variables\n");
    for field in StoryField::ALL {
        block.push_str(&format!("* {}: {}\n", field.label(), vars.display_value(field)));
    }
    block
}

pub fn missing_variables(vars: &StoryVariables, missing: &[StoryField]) -> Prompt {
    let names = missing
        .iter()
        .map(|f| f.missing_name())
        .collect::<Vec<_>>()
        .join(", ");

    let labels = StoryField::ALL
        .iter()
        .map(|f| format!("{}: <value>", f.label()))
        .collect::<Vec<_>>()
        .join("\n");

    Prompt {
        system: format!(
            "The user has not provided the following story variables: {}. \
             Please fill out these variables autonomously, taking your best educated guess \
             based on the available information and best practices for creative storywriting.",
            names
        ),
        user: format!(
            "{}\n\
             Please provide your autonomous suggestions for the missing variables, keeping in mind \
             the principles of engaging storytelling, coherent narrative structure, and \
             well-developed characters and themes.\n\
             Answer with one line per variable in the form:\n{}",
            variables_block(vars),
            labels
        ),
    }
}

pub fn outline(vars: &StoryVariables) -> Prompt {
    Prompt {
        system: "You are an AI story outliner. Your task is to generate a compelling and detailed \
                 story outline based on the provided story variables and the prompt template, \
                 incorporating best practices for creative storywriting."
            .to_string(),
        user: format!(
            "{}\n\
             Please generate a captivating story outline that includes the following elements, \
             ensuring a well-structured narrative arc, engaging characters, immersive settings, \
             and thought-provoking themes:\n\
             1. Story Arc:\n\
             \x20  * Exposition: Set the stage, introduce the main characters, and establish the initial conflict or inciting incident.\n\
             \x20  * Rising Action: Develop the conflict, introduce complications, and raise the stakes for the characters.\n\
             \x20  * Climax: Present the turning point or moment of highest tension, where the characters face the ultimate challenge or make crucial decisions.\n\
             \x20  * Falling Action: Show the consequences of the climax and how the characters deal with the aftermath.\n\
             \x20  * Resolution: Provide a satisfying conclusion that ties up loose ends, resolves character arcs, and leaves a lasting impact on the reader.\n\
             2. Chapter Summaries: Briefly describe the main events, revelations, and character developments in each chapter, ensuring a coherent and engaging flow of the narrative.\n\
             3. Character Profiles: Create well-rounded and relatable characters with distinct personalities, motivations, and growth arcs throughout the story.\n\
             4. Setting Descriptions: Vividly depict the story's settings, immersing the reader in the world and atmosphere you've created.\n\
             5. Themes and Motifs: Weave meaningful themes and recurring motifs into the story, adding depth and resonance to the narrative.\n\
             6. Conflict and Stakes: Craft compelling conflicts, both internal and external, that challenge the characters and keep the reader invested in the story's outcome.",
            variables_block(vars)
        ),
    }
}

pub fn chapter(index: u32, outline: &str) -> Prompt {
    Prompt {
        system: "You are an AI story writer. Your task is to generate an engaging and immersive \
                 chapter based on the provided story outline and the prompt template, \
                 incorporating best practices for creative storywriting."
            .to_string(),
        user: format!(
            "Please generate Chapter {} of the story based on the following outline:\n\
             {}\n\n\
             Ensure that the chapter:\n\
             - Follows the story arc and advances the plot in a meaningful way\n\
             - Develops the characters, showcasing their personalities, motivations, and growth\n\
             - Immerses the reader in the story's settings through vivid descriptions and sensory details\n\
             - Explores the themes and motifs established in the outline\n\
             - Creates engaging dialogue that reveals character dynamics and moves the story forward\n\
             - Builds tension, suspense, or emotional resonance as appropriate for the genre and story beats\n\
             - Maintains a consistent tone and style that aligns with the target audience and niche",
            index, outline
        ),
    }
}

pub fn revise_outline(outline: &str, feedback: &str) -> Prompt {
    Prompt {
        system: "The user has requested improvements to the story outline. Please provide an \
                 updated outline based on their feedback, incorporating best practices for \
                 creative storywriting."
            .to_string(),
        user: format!(
            "Original Outline:\n{}\n\n\
             User Feedback:\n{}\n\n\
             Please generate an improved story outline that:\n\
             - Addresses the user's feedback and concerns\n\
             - Enhances the story arc, character development, settings, themes, and conflicts\n\
             - Ensures a cohesive and engaging narrative flow\n\
             - Adheres to the story variables and genre conventions\n\
             - Incorporates best practices for creative storywriting, such as show-don't-tell, \
             meaningful symbolism, and evocative language",
            outline, feedback
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> StoryVariables {
        StoryVariables {
            community: "r/WritingPrompts".to_string(),
            title: "Salt and Static".to_string(),
            concept: String::new(),
            genre: "Sci-fi".to_string(),
            target_word_count: Some(1500),
            chapter_count: None,
        }
    }

    #[test]
    fn test_missing_prompt_names_missing_fields_in_order() {
        let vars = sample();
        let prompt = missing_variables(&vars, &vars.missing_fields());
        assert!(prompt
            .system
            .contains("story variables: story concept, number of chapters."));
        assert!(prompt.user.contains("* Story Title: Salt and Static\n"));
        assert!(prompt.user.contains("* Number of Chapters: \n"));
    }

    #[test]
    fn test_outline_embeds_every_variable() {
        let prompt = outline(&sample());
        assert!(prompt.user.contains("* Subreddit/Community: r/WritingPrompts"));
        assert!(prompt.user.contains("* Niche/Genre: Sci-fi"));
        assert!(prompt.user.contains("* Target Word Count: 1500"));
        assert!(prompt.user.contains("6. Conflict and Stakes"));
    }

    #[test]
    fn test_chapter_prompt_carries_index_and_outline() {
        let prompt = chapter(7, "Act I: the signal.\nAct II: the storm.");
        assert!(prompt.user.starts_with("Please generate Chapter 7 of the story"));
        assert!(prompt.user.contains("Act I: the signal.\nAct II: the storm."));
    }

    #[test]
    fn test_revision_prompt_carries_outline_and_feedback() {
        let prompt = revise_outline("old outline", "more dragons");
        assert!(prompt.user.contains("Original Outline:\nold outline"));
        assert!(prompt.user.contains("User Feedback:\nmore dragons"));
    }
}
