//! System prompt builder for course assistant sessions.
//!
//! The prompt is a base instruction text followed by optional personalization
//! lines:
//!
//! ```text
//! {client override, or the default template}
//!
//! Address the learner by name: {user_name}.
//! The learner is enrolled in cohort {cohort_id}.
//! ```
//!
//! The blank line and extras are omitted entirely when there is nothing to
//! personalize.

use coursebot_types::chat::SessionMeta;

/// Instruction template used when the client does not supply its own.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a friendly, patient teaching assistant for an \
online course. Explain concepts clearly and step by step, guide learners toward answers instead \
of handing them over, and keep replies concise. If a question falls outside the course, say so \
politely and steer the conversation back.";

/// Builds system prompts and default greetings from session metadata.
pub struct SystemPromptBuilder;

impl SystemPromptBuilder {
    /// Compose the system prompt.
    ///
    /// `client_override` replaces the default template when it is non-empty
    /// after trimming. Name and cohort lines follow in that order.
    pub fn build(client_override: Option<&str>, meta: &SessionMeta) -> String {
        let base = client_override
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SYSTEM_PROMPT);

        let mut extras = Vec::with_capacity(2);
        if let Some(name) = non_empty(meta.user_name.as_deref()) {
            extras.push(format!("Address the learner by name: {name}."));
        }
        if let Some(cohort) = non_empty(meta.cohort_id.as_deref()) {
            extras.push(format!("The learner is enrolled in cohort {cohort}."));
        }

        if extras.is_empty() {
            base.to_string()
        } else {
            format!("{base}\n\n{}", extras.join("\n"))
        }
    }

    /// Greeting returned by start when the client supplies none.
    pub fn default_initial_message(user_name: Option<&str>) -> String {
        match non_empty(user_name) {
            Some(name) => format!(
                "Hi {name}! I'm your course assistant. What would you like to work on today?"
            ),
            None => {
                "Hi! I'm your course assistant. What would you like to work on today?".to_string()
            }
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}
