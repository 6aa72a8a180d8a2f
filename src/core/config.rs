use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub google_api_base_url: String,
    pub google_access_token: String,
    pub google_calendar_id: String,
    pub llm_api_hostname: String,
    pub llm_api_key: String,
    pub llm_model: String,
    pub system_message: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let google_api_base_url = env::var("DAYPLAN_GOOGLE_API_URL")
            .unwrap_or_else(|_| "https://www.googleapis.com".to_string());
        let google_access_token = env::var("DAYPLAN_GOOGLE_ACCESS_TOKEN")
            .expect("Missing env var DAYPLAN_GOOGLE_ACCESS_TOKEN");
        let google_calendar_id =
            env::var("DAYPLAN_GOOGLE_CALENDAR_ID").unwrap_or_else(|_| "primary".to_string());
        let llm_api_hostname = env::var("DAYPLAN_LLM_HOST")
            .unwrap_or_else(|_| "https://api.openai.com".to_string());
        let llm_api_key =
            env::var("OPENAI_API_KEY").unwrap_or_else(|_| "thiswontworkforopenai".to_string());
        let llm_model =
            env::var("DAYPLAN_LLM_MODEL").unwrap_or_else(|_| "gpt-4.1-mini".to_string());
        let system_message = env::var("DAYPLAN_SYSTEM_MESSAGE").unwrap_or_else(|_| {
            "You are a scheduling assistant that manages the user's calendar.".to_string()
        });

        Self {
            google_api_base_url,
            google_access_token,
            google_calendar_id,
            llm_api_hostname,
            llm_api_key,
            llm_model,
            system_message,
        }
    }
}
