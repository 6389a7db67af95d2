use log::warn;

use crate::core::state::{StoryField, StoryVariables};

/// Result of applying a suggestion response to the story variables.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SuggestionOutcome {
    pub applied: Vec<StoryField>,
    pub warning: Option<String>,
}

fn match_label(key: &str) -> Option<StoryField> {
    let key = key
        .trim()
        .trim_start_matches(['*', '-', '•', '_', ' '])
        .trim_end_matches(['*', '_', ' ']);
    StoryField::ALL
        .into_iter()
        .find(|f| f.label().eq_ignore_ascii_case(key))
}

fn clean_value(value: &str) -> &str {
    value.trim().trim_matches(['*', '_']).trim()
}

fn parse_count(value: &str) -> Result<u32, String> {
    let value = clean_value(value);
    match value.parse::<u32>() {
        Ok(0) => Err(format!("'{}' is not a positive number", value)),
        Ok(n) => Ok(n),
        Err(e) => Err(format!("invalid number '{}': {}", value, e)),
    }
}

/// Applies `Label: Value` lines from a free-text suggestion to `vars`.
///
/// Lines without a recognised label are skipped. The first numeric value
/// that fails to convert stops parsing: fields applied before it are kept
/// and the failure is reported as a warning.
pub fn apply_suggestions(vars: &mut StoryVariables, response: &str) -> SuggestionOutcome {
    let mut outcome = SuggestionOutcome::default();

    for line in response.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let Some(field) = match_label(key) else {
            continue;
        };

        if field.is_numeric() {
            match parse_count(value) {
                Ok(n) => vars.set_number(field, n),
                Err(e) => {
                    let message = format!(
                        "Failed to parse the model's suggestions. Error: {}: {}",
                        field.label(),
                        e
                    );
                    warn!("{}", message);
                    outcome.warning = Some(message);
                    break;
                }
            }
        } else {
            vars.set_text(field, clean_value(value).to_string());
        }
        outcome.applied.push(field);
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_value_is_parsed() {
        let mut vars = StoryVariables::default();
        let outcome = apply_suggestions(&mut vars, "Target Word Count: 1200");
        assert_eq!(vars.target_word_count, Some(1200));
        assert_eq!(outcome.applied, vec![StoryField::TargetWordCount]);
        assert!(outcome.warning.is_none());
    }

    #[test]
    fn test_bad_number_warns_and_leaves_field() {
        let mut vars = StoryVariables {
            target_word_count: Some(800),
            ..Default::default()
        };
        let outcome = apply_suggestions(&mut vars, "Target Word Count: abc");
        assert_eq!(vars.target_word_count, Some(800));
        assert!(outcome.applied.is_empty());
        assert!(outcome.warning.unwrap().contains("Target Word Count"));
    }

    #[test]
    fn test_failure_keeps_earlier_fields_and_ignores_rest() {
        let mut vars = StoryVariables::default();
        let response = "Here are my suggestions:\n\
                        Story Title: The Drowned Bell\n\
                        Number of Chapters: five\n\
                        Niche/Genre: Gothic horror";
        let outcome = apply_suggestions(&mut vars, response);

        assert_eq!(vars.title, "The Drowned Bell");
        assert_eq!(vars.chapter_count, None);
        assert_eq!(vars.genre, "");
        assert_eq!(outcome.applied, vec![StoryField::Title]);
        assert!(outcome.warning.is_some());
    }

    #[test]
    fn test_unknown_lines_are_skipped() {
        let mut vars = StoryVariables::default();
        let response = "Sure! Note: these are guesses.\n\
                        Protagonist: Mara\n\
                        Story Concept: A lighthouse keeper hears radio voices: from the sea\n\
                        no colon here";
        let outcome = apply_suggestions(&mut vars, response);

        assert_eq!(vars.concept, "A lighthouse keeper hears radio voices: from the sea");
        assert_eq!(outcome.applied, vec![StoryField::Concept]);
        assert!(outcome.warning.is_none());
    }

    #[test]
    fn test_markdown_list_markers_are_tolerated() {
        let mut vars = StoryVariables::default();
        let response = "* Subreddit/Community: r/nosleep\n\
                        - **Niche/Genre:** Horror\n\
                        * number of chapters: **3**";
        apply_suggestions(&mut vars, response);

        assert_eq!(vars.community, "r/nosleep");
        assert_eq!(vars.genre, "Horror");
        assert_eq!(vars.chapter_count, Some(3));
    }

    #[test]
    fn test_zero_is_rejected() {
        let mut vars = StoryVariables::default();
        let outcome = apply_suggestions(&mut vars, "Number of Chapters: 0");
        assert_eq!(vars.chapter_count, None);
        assert!(outcome.warning.is_some());
    }
}
