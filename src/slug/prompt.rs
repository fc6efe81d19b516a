// src/slug/prompt.rs
// Few-shot prompt construction

use crate::config::SlugPattern;
use crate::llm::ChatMessage;

/// Placeholder in the prompt template replaced by the slug pattern
pub const SLUG_REGEX_PLACEHOLDER: &str = "{slugRegex}";

/// Fixed (url, answer) exemplars shown to the model before the live query
pub const EXEMPLARS: [(&str, &str); 4] = [
    ("https://www.cloudflare.com/", r#"{"slug": "cloudflare"}"#),
    ("https://github.com/nuxt/", r#"{"slug": "nuxt"}"#),
    ("https://sink.cool/", r#"{"slug": "sink-cool"}"#),
    ("https://github.com/miantiao-me/sink", r#"{"slug": "sink"}"#),
];

/// Render the system prompt with the slug pattern substituted
pub fn system_prompt(template: &str, pattern: &SlugPattern) -> String {
    template.replacen(SLUG_REGEX_PLACEHOLDER, &pattern.to_string(), 1)
}

/// Content of the final user turn
pub fn user_content(url: &str, markdown: Option<&str>) -> String {
    match markdown {
        Some(markdown) => format!("URL: {}\n\nPage content:\n{}", url, markdown),
        None => url.to_string(),
    }
}

/// System message, exemplar pairs, then the live query
pub fn build_messages(system: String, user: String) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(2 + EXEMPLARS.len() * 2);
    messages.push(ChatMessage::system(system));
    for (url, answer) in EXEMPLARS {
        messages.push(ChatMessage::user(url));
        messages.push(ChatMessage::assistant(answer));
    }
    messages.push(ChatMessage::user(user));
    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::Role;

    #[test]
    fn test_system_prompt_substitutes_pattern() {
        let prompt = system_prompt(
            "validate with {slugRegex} please",
            &SlugPattern::default(),
        );
        assert_eq!(prompt, "validate with /^[a-z0-9]+(?:-[a-z0-9]+)*$/i please");
    }

    #[test]
    fn test_system_prompt_replaces_first_placeholder_only() {
        let prompt = system_prompt("{slugRegex} {slugRegex}", &SlugPattern::default());
        assert!(prompt.ends_with(" {slugRegex}"));
    }

    #[test]
    fn test_system_prompt_without_placeholder() {
        assert_eq!(system_prompt("plain", &SlugPattern::default()), "plain");
    }

    #[test]
    fn test_user_content_with_markdown() {
        assert_eq!(
            user_content("https://sink.cool/", Some("# Sink")),
            "URL: https://sink.cool/\n\nPage content:\n# Sink"
        );
    }

    #[test]
    fn test_user_content_bare_url() {
        assert_eq!(user_content("https://sink.cool/", None), "https://sink.cool/");
    }

    #[test]
    fn test_message_order() {
        let messages = build_messages("sys".to_string(), "query".to_string());
        assert_eq!(messages.len(), 10);

        assert_eq!(messages[0], ChatMessage::system("sys"));
        let roles: Vec<Role> = messages.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![
                Role::System,
                Role::User,
                Role::Assistant,
                Role::User,
                Role::Assistant,
                Role::User,
                Role::Assistant,
                Role::User,
                Role::Assistant,
                Role::User,
            ]
        );
        assert_eq!(messages[9].content, "query");
    }

    #[test]
    fn test_exemplars_verbatim() {
        let messages = build_messages(String::new(), String::new());
        let pairs: Vec<(&str, &str)> = messages[1..9]
            .chunks(2)
            .map(|pair| (pair[0].content.as_str(), pair[1].content.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("https://www.cloudflare.com/", "{\"slug\": \"cloudflare\"}"),
                ("https://github.com/nuxt/", "{\"slug\": \"nuxt\"}"),
                ("https://sink.cool/", "{\"slug\": \"sink-cool\"}"),
                ("https://github.com/miantiao-me/sink", "{\"slug\": \"sink\"}"),
            ]
        );
    }
}
