//! Fixed prompt templates and setting extraction.
//!
//! The templates are deliberately fixed system instructions wrapping the
//! user's input; prompt construction is the only logic in this module.

/// Wrap the user's prompt in the storyteller instructions.
pub fn story_prompt(user_prompt: &str) -> String {
    format!(
        "You are a master storyteller. From the user's prompt, create an \
         imaginative and family-friendly short story (150-300 words).\n\
         User Prompt: {user_prompt}\n\
         Story:"
    )
}

/// Wrap a generated story in the character-description instructions.
pub fn character_prompt(story: &str) -> String {
    format!(
        "Based on the story, describe the main character's appearance and \
         personality in 80-150 words.\n\
         Story: {story}\n\
         Character Description:"
    )
}

/// Image prompt for the character portrait.
pub fn character_image_prompt(character_description: &str) -> String {
    format!("portrait of {character_description}, detailed character design, beautiful lighting")
}

/// Image prompt for the background landscape, derived from the story's
/// setting.
pub fn background_image_prompt(story: &str) -> String {
    format!(
        "{}, beautiful landscape, detailed environment, no characters",
        extract_setting(story)
    )
}

/// Keyword -> setting phrases checked in order against the lowercased story.
const SETTING_KEYWORDS: &[(&str, &str)] = &[
    ("forest", "a mystical enchanted forest"),
    ("castle", "a majestic medieval castle"),
    ("garden", "a beautiful magical garden with a glowing door"),
    ("cave", "a mysterious glowing cave"),
    ("mountain", "towering snow-capped mountains"),
    ("beach", "a serene beach with golden sand"),
    ("city", "a bustling fantasy city"),
    ("space", "vast cosmic space with stars and nebulae"),
];

/// Fallback setting when no keyword matches.
const DEFAULT_SETTING: &str = "a magical fantasy landscape";

/// Extract a background setting phrase from the story text.
pub fn extract_setting(story: &str) -> &'static str {
    let lower = story.to_lowercase();
    SETTING_KEYWORDS
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, setting)| *setting)
        .unwrap_or(DEFAULT_SETTING)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn story_prompt_embeds_user_input() {
        let p = story_prompt("A wizard finds a treasure");
        assert!(p.contains("A wizard finds a treasure"));
        assert!(p.contains("master storyteller"));
    }

    #[test]
    fn character_prompt_embeds_story() {
        let p = character_prompt("Once upon a time in a forest");
        assert!(p.contains("Once upon a time in a forest"));
    }

    #[test]
    fn extract_setting_matches_keywords_case_insensitively() {
        assert_eq!(
            extract_setting("The Knight rode into the FOREST at dusk"),
            "a mystical enchanted forest"
        );
        assert_eq!(
            extract_setting("They sailed past a castle"),
            "a majestic medieval castle"
        );
    }

    #[test]
    fn extract_setting_falls_back_for_unknown_settings() {
        assert_eq!(extract_setting("A tale with no place at all"), DEFAULT_SETTING);
    }

    #[test]
    fn background_prompt_excludes_characters() {
        let p = background_image_prompt("A dragon slept in a cave");
        assert!(p.starts_with("a mysterious glowing cave"));
        assert!(p.contains("no characters"));
    }
}
