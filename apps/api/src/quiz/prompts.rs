// LLM prompt constants for the task suggestion endpoint.

/// Example tasks shown to the model as the style to imitate. Sent verbatim.
pub const EXAMPLE_TASKS: [&str; 4] = [
    "a) Your monthly pocket money is 1000 rupees and user have to complete the debt of 7000 dollar in 6 months",
    "b) Your monthly earning is 25000 rupees and you have to pay the debt of the car loan of 500000 in 12 months",
    "c) complete the debt of 1000000 in 60 months with a salary of 200000 rupees",
    "d) complete the debt of 500000 in 30 months with a salary of 300000 using stock market only",
];

/// Task suggestion prompt template.
/// Replace: {examples}, {context}
pub const SUGGESTION_PROMPT_TEMPLATE: &str = "Based on the user's quiz responses create 4 tasks that are similar to the Examples given below.
The suggestions should be personalized based on their answers.
You have to choose the difficulty of task on the basis of response.
Examples: {examples}.
Make you tasks are strictly like the Examples.
Here are the user's responses:
{context}";

/// Embeds the formatted quiz text into the suggestion template.
pub fn build_suggestion_prompt(quiz_text: &str) -> String {
    // Examples first, so quiz text can never be mistaken for a placeholder.
    SUGGESTION_PROMPT_TEMPLATE
        .replace("{examples}", &EXAMPLE_TASKS.join(",\n"))
        .replace("{context}", quiz_text)
}
