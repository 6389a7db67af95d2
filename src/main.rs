use anyhow::Result;
use std::sync::Arc;

use story_generator::core::config::Config;
use story_generator::core::io::NativeStorage;
use story_generator::services::llm;
use story_generator::services::session::StorySession;
use story_generator::ui;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    // 1. Load Config
    let config = match Config::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error loading config: {:#}", e);
            eprintln!("Please ensure 'config.yml' exists with valid LLM settings.");
            return Err(e);
        }
    };

    config.ensure_directories()?;

    // 2. Initialize LLM
    let llm = llm::create_llm(&config)?;

    // 3. Run the story form
    let storage = Arc::new(NativeStorage::new());
    let mut session = StorySession::new(llm, storage, config.output_folder.clone(), config.story.clone());
    ui::run(&mut session).await?;

    Ok(())
}
