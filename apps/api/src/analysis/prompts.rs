// Prompt constants for the career-analysis pipeline.

/// Analysis prompt template. Replace `{career_goal}`, `{skills}`, `{repos}`
/// before sending. The shape instruction is literal: the model must answer
/// with a single JSON object and nothing else.
pub const ANALYZE_PROMPT_TEMPLATE: &str = r#"You are a concise tech career guide.
Goal: {career_goal}
Skills: {skills}
Projects: {repos}

Return strict JSON only in this exact shape:
{
  "summary": "2 short sentences about the user's current position and potential",
  "top_suggestions": ["specific actionable suggestion 1","specific actionable suggestion 2","specific actionable suggestion 3"],
  "score": 75
}
Optionally include "skill_gaps" and "strengths" as arrays of short strings."#;
