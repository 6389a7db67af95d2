//! Interactive terminal form around a [`StorySession`].

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use inquire::error::InquireError;
use inquire::validator::Validation;
use inquire::{CustomUserError, Select, Text};
use std::fmt;

use crate::core::state::{Stage, StoryField, StoryVariables};
use crate::services::session::{FillReport, StorySession};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Action {
    GenerateOutline,
    Approve,
    RequestImprovements,
    SubmitFeedback,
    Download,
    Restart,
    Quit,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Action::GenerateOutline => "Generate Outline",
            Action::Approve => "Approve Outline and Generate Story",
            Action::RequestImprovements => "Request Improvements",
            Action::SubmitFeedback => "Submit Feedback",
            Action::Download => "Download Story",
            Action::Restart => "Restart",
            Action::Quit => "Quit",
        };
        f.write_str(label)
    }
}

fn actions_for(stage: Stage) -> Vec<Action> {
    match stage {
        Stage::Collecting => vec![Action::GenerateOutline, Action::Quit],
        Stage::OutlineReady => vec![
            Action::Approve,
            Action::RequestImprovements,
            Action::GenerateOutline,
            Action::Restart,
            Action::Quit,
        ],
        Stage::AwaitingFeedback => vec![Action::SubmitFeedback, Action::Restart, Action::Quit],
        Stage::GeneratingChapters => vec![Action::Restart, Action::Quit],
        Stage::Done => vec![Action::Download, Action::Restart, Action::Quit],
    }
}

/// Maps Esc / Ctrl-C to `None` so the caller can quit cleanly.
fn answered<T>(res: Result<T, InquireError>) -> Result<Option<T>> {
    match res {
        Ok(v) => Ok(Some(v)),
        Err(InquireError::OperationCanceled) | Err(InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn ask_text(field: StoryField, current: &str) -> Result<Option<String>> {
    let message = format!("{}:", field.label());
    answered(Text::new(&message).with_initial_value(current).prompt())
}

fn validate_count(input: &str) -> Result<Validation, CustomUserError> {
    let input = input.trim();
    if input.is_empty() || input.parse::<u32>().is_ok_and(|n| n >= 1) {
        Ok(Validation::Valid)
    } else {
        Ok(Validation::Invalid("Enter a whole number of at least 1".into()))
    }
}

fn ask_count(field: StoryField, current: Option<u32>) -> Result<Option<Option<u32>>> {
    let message = format!("{}:", field.label());
    let initial = current.map(|n| n.to_string()).unwrap_or_default();
    let answer = answered(
        Text::new(&message)
            .with_initial_value(&initial)
            .with_help_message("Leave empty to let the model decide")
            .with_validator(validate_count)
            .prompt(),
    )?;

    Ok(answer.map(|s| s.trim().parse::<u32>().ok()))
}

/// Walks the six story fields. Returns `None` if the user cancelled.
fn edit_variables(current: &StoryVariables) -> Result<Option<StoryVariables>> {
    let mut vars = current.clone();
    for field in StoryField::ALL {
        if field.is_numeric() {
            let slot = match field {
                StoryField::TargetWordCount => &mut vars.target_word_count,
                _ => &mut vars.chapter_count,
            };
            let Some(answer) = ask_count(field, *slot)? else {
                return Ok(None);
            };
            *slot = answer;
        } else {
            let Some(answer) = ask_text(field, &vars.display_value(field))? else {
                return Ok(None);
            };
            vars.set_text(field, answer);
        }
    }
    println!("Recommendation: Aim for approximately 500 words per chapter.");
    Ok(Some(vars))
}

fn print_fill(fill: &FillReport) {
    println!("\nAutonomous suggestions:\n{}\n", fill.suggestions);
    if let Some(warning) = &fill.outcome.warning {
        eprintln!("Warning: {}", warning);
    }
}

fn print_story(session: &StorySession) -> Result<()> {
    println!("\nGenerated Story Parts:");
    for (i, chapter) in session.chapters().iter().enumerate() {
        println!("\nChapter {}:\n{}", i + 1, chapter);
    }
    println!("\nFull Story:\n{}\n", session.full_story()?);
    Ok(())
}

async fn generate_chapters(session: &mut StorySession) -> Result<()> {
    let total = session.state().variables.chapter_count.unwrap_or(0);
    let pb = ProgressBar::new(u64::from(total));
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );

    let result = session
        .approve_outline(|index, _, _| {
            pb.println(format!("Chapter {} generated.", index));
            pb.inc(1);
        })
        .await;
    pb.finish_and_clear();
    result
}

async fn perform(session: &mut StorySession, action: Action) -> Result<bool> {
    match action {
        Action::GenerateOutline => {
            if session.stage() != Stage::Collecting {
                let Some(vars) = edit_variables(&session.state().variables)? else {
                    return Ok(true);
                };
                session.set_variables(vars)?;
            }
            println!("Generating outline...");
            let report = session.generate_outline().await?;
            if let Some(fill) = &report.fill {
                print_fill(fill);
            }
            println!("\nStory Outline:\n{}\n", report.outline);
        }
        Action::Approve => {
            generate_chapters(session).await?;
            print_story(session)?;
        }
        Action::RequestImprovements => session.request_improvements()?,
        Action::SubmitFeedback => {
            let Some(feedback) =
                answered(Text::new("Please provide feedback on the outline:").prompt())?
            else {
                return Ok(true);
            };
            let revised = session.submit_feedback(&feedback).await?;
            println!("\nImproved Story Outline:\n{}\n", revised);
        }
        Action::Download => {
            let path = session.download().await?;
            println!("Story saved to {}", path);
        }
        Action::Restart => session.restart(),
        Action::Quit => return Ok(false),
    }
    Ok(true)
}

/// Runs the form until the user quits.
pub async fn run(session: &mut StorySession) -> Result<()> {
    println!("Agentic Story Generator");

    loop {
        let stage = session.stage();

        if stage == Stage::Collecting {
            let Some(vars) = edit_variables(&session.state().variables)? else {
                break;
            };
            session.set_variables(vars)?;
        }

        let Some(action) = answered(Select::new("Next step:", actions_for(stage)).prompt())? else {
            break;
        };

        match perform(session, action).await {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => eprintln!("Error: {:#}", e),
        }
    }

    println!("Goodbye.");
    Ok(())
}
