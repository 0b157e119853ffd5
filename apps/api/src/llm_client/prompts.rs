// Prompt fragments shared by every LLM call. Feature-specific prompts live
// next to the feature (see `analysis::prompts`).

/// System prompt that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Appended to extraction prompts so the model leaves gaps empty.
pub const NO_INVENTION_INSTRUCTION: &str = "\
    Only report what the document states. If a field is not present, use an \
    empty string, an empty list or 0. Do NOT guess names, dates or employers.";
