use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::ai::tools::{CreateCalendarEventTool, UpcomingEventsTool};
use crate::core::AppConfig;
use crate::openai::chat;
use crate::openai::{Message, Role, ToolCall};

pub async fn run() -> Result<()> {
    let mut rl = DefaultEditor::new().expect("Editor failed");

    let config = AppConfig::default();

    // Create tools. Each one carries its own credentials so nothing is
    // shared across in-flight requests.
    let create_event_tool = CreateCalendarEventTool::new(
        &config.google_access_token,
        &config.google_calendar_id,
        &config.google_api_base_url,
    );
    let upcoming_events_tool = UpcomingEventsTool::new(
        &config.google_access_token,
        &config.google_calendar_id,
        &config.google_api_base_url,
    );

    let tools: Option<Vec<Box<dyn ToolCall + Send + Sync + 'static>>> = Some(vec![
        Box::new(create_event_tool),
        Box::new(upcoming_events_tool),
    ]);

    let mut history = vec![Message::new(Role::System, &config.system_message)];

    loop {
        let readline = rl.readline(">>> ");
        match readline {
            Ok(line) => {
                history.push(Message::new(Role::User, line.as_str()));
                let resp = chat(
                    &tools,
                    &history,
                    &config.llm_api_hostname,
                    &config.llm_api_key,
                    &config.llm_model,
                )
                .await?;
                for m in resp.iter() {
                    history.push(m.clone());
                }
                if let Some(msg) = resp.last().and_then(|m| m.content.clone()) {
                    println!("{}", msg);
                }
            }
            Err(ReadlineError::Interrupted) => break,
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }

    Ok(())
}
