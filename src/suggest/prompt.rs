// Prompt templates for the rewrite assistant.

/// Rewrite instructions offered by the editor's AI menu
pub const PRESET_PROMPTS: [&str; 5] = [
    "Make it more engaging",
    "Make it funnier",
    "Make it shorter",
    "Make it clearer",
    "Make it more viral",
];

pub fn system_prompt(instruction: &str) -> String {
    format!(
        "You are an expert social media specialist helping to improve tweet content.\n\
Your task is to {} while maintaining the core message.\n\
Consider the context of the entire thread when making suggestions.\n\
Provide 3 distinct variations that are engaging and appropriate for Twitter.\n\
Each suggestion must be under 280 characters.\n\
Return ONLY a JSON array of objects with 'text' and 'score' properties.\n\
The score should reflect how well the suggestion meets the prompt criteria (0.0 to 1.0).",
        instruction.to_lowercase()
    )
}

pub fn user_prompt(text: &str, thread_context: &str) -> String {
    format!(
        "Thread context: {}\n\
Selected text to improve: \"{}\"\n\
\n\
Remember to return only a JSON array of objects with 'text' and 'score' properties.",
        thread_context, text
    )
}
