use crate::models::Utterance;

/// Screening brief for the model (statute, output schema, verdict guide)
pub const SYSTEM_PROMPT: &str = r#"You are an internal compliance-monitoring assistant that screens consultation and sales scripts against Article 21 of the Korean Financial Consumer Protection Act (prohibition of unfair solicitation).
Analyze the script below utterance by utterance and judge whether each utterance may violate Article 21.
This is a pre-screening aid, not legal advice. When unsure, answer CAUTION rather than guessing.

OUTPUT FORMAT: respond with JSON only, matching exactly this shape:
{
  "summary": {
    "has_violation": true | false,
    "risk_level": "HIGH" | "MEDIUM" | "LOW",
    "overall_note": "Overall summary and points of attention in 2-4 sentences"
  },
  "results": [
    {
      "utterance_id": "u1",
      "verdict": "VIOLATION" | "CAUTION" | "CLEAR",
      "law_reference": "Financial Consumer Protection Act Article 21 (unfair solicitation) - short name of the applicable type",
      "reason": "Concrete reason: what is wrong and why (misleading the consumer, pressure, deception, ...)",
      "suggested_fix": "Short replacement wording or remediation",
      "confidence": 0.0 to 1.0
    }
  ]
}
Each utterance_id must appear exactly once in "results".

VERDICT GUIDE:
- VIOLATION: a clear unfair-solicitation concern under Article 21 (false or exaggerated claims, omission of material facts, concealing the possibility of loss, pressure or coercion, inducing misunderstanding)
- CAUTION: information is missing or the nuance is ambiguous; more context is needed
- CLEAR: low likelihood of a violation"#;

/// Build the full screening prompt for a list of utterances
pub fn build_screening_prompt(utterances: &[Utterance]) -> String {
    let mut prompt = String::from(SYSTEM_PROMPT);

    prompt.push_str("\n\nUTTERANCES TO ANALYZE:\n");
    prompt.push_str(&format_utterances(utterances));

    prompt
}

/// Format utterances as `- <id> (line N[, time T]): <text>` lines
pub fn format_utterances(utterances: &[Utterance]) -> String {
    utterances
        .iter()
        .map(|u| format!("- {}: {}", u.tag(), u.text))
        .collect::<Vec<_>>()
        .join("\n")
}
