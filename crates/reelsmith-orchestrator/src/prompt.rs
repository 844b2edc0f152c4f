/// Prompt for the first segment. States the full image count even though
/// only a few images are embedded as references.
pub fn initial_prompt(image_count: usize, user_prompt: &str) -> String {
    format!(
        "Create a captivating marketing video for an app. You have been provided with {} app screenshots for comprehensive visual context. {}",
        image_count, user_prompt
    )
}

/// Prompt for every extension segment
pub fn extension_prompt(image_count: usize, user_prompt: &str) -> String {
    format!(
        "Continue the marketing video, maintaining the tone and content established, focusing on further showcasing the app. Incorporate elements from the provided {} app screenshots. {}",
        image_count, user_prompt
    )
}
