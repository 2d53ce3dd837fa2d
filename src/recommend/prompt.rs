//! Prompts for the advice backend

/// System prompt shared by every advice request
pub const SYSTEM_PROMPT: &str = r#"You are an agricultural extension educator who explains plant diseases to home gardeners and smallholder farmers.

IMPORTANT GUIDELINES:
1. Explain, do not prescribe. Describe management practices in general terms.
2. NEVER give chemical dosages, mixing ratios, application rates or spray schedules.
3. NEVER mention product brand names or trade names.
4. Write plain text. Separate sections with one blank line. Put each section title alone on its first line.
5. Keep each section short: two to five sentences or bullet points starting with "-".
6. The detection comes from an automated image screen and may be wrong; say so once, in the overview."#;

/// Prompt used by the connectivity smoke test
pub const HEALTH_CHECK_PROMPT: &str =
    "Say 'Hello! The advice backend is working perfectly!' in a friendly way.";

/// Titles of the nine sections every answer must contain, in order
pub const SECTION_TITLES: [&str; 9] = [
    "Overview",
    "Cause and Life Cycle",
    "Environmental Triggers",
    "Symptom Progression",
    "Management Practices",
    "Why These Practices Work",
    "Prevention",
    "If Left Untreated",
    "Summary",
];

/// Renders the advice prompt for one classification.
pub fn build_prompt(disease: &str, confidence: u8) -> String {
    let subject = if disease.eq_ignore_ascii_case("healthy") {
        "A plant photo was screened and no disease was detected (label: Healthy).\n\
         Explain how to keep the plant healthy, using the same section structure and \
         describing the most common threats in place of a specific disease."
            .to_string()
    } else {
        format!(
            "A plant photo was screened and classified as \"{}\".",
            disease
        )
    };

    let sections = SECTION_TITLES
        .iter()
        .enumerate()
        .map(|(i, title)| format!("{}. {}: {}", i + 1, title, section_brief(i)))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "{subject}\nDetection confidence: {confidence}%.\n\n\
         Write a structured educational explanation with exactly these 9 numbered sections:\n\
         {sections}\n\n\
         Constraints:\n\
         - No chemical dosages, concentrations or application rates.\n\
         - No brand names or trade names.\n\
         - Start each section with its number and title on its own line, then a blank line between sections."
    )
}

fn section_brief(index: usize) -> &'static str {
    match index {
        0 => "what the condition is and which crops it affects",
        1 => "the organism or cause and how it spreads and survives",
        2 => "weather, soil and growing conditions that favor it",
        3 => "how symptoms appear and change from early to late stages",
        4 => "non-prescriptive cultural and hygiene practices to manage it",
        5 => "the reasoning behind those practices",
        6 => "how to prevent it in future seasons",
        7 => "what happens to the plant and yield if nothing is done",
        _ => "three to five key takeaways",
    }
}
