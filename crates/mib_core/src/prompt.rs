//! Medical analysis prompt.

use std::fmt::Write;

pub const MEDICAL_DISCLAIMER: &str = "This AI analysis is provided for informational and educational purposes only. \
It is NOT a substitute for professional medical diagnosis, treatment, or advice. \
Always consult with qualified healthcare professionals for proper medical evaluation. \
Seek immediate emergency medical care if experiencing severe or worsening symptoms. \
This analysis cannot replace physical examination, medical history review, or clinical judgment by licensed healthcare providers.";

const PREAMBLE: &str = "You are an expert medical AI assistant with specialized training in medical image analysis and diagnosis.

Please analyze this medical image comprehensively and provide your assessment in the following structured format:";

const VISUAL_ANALYSIS: &str = "## VISUAL ANALYSIS
Describe exactly what you observe in the image, including:
- Overall image quality and clarity
- Anatomical structures visible
- Any abnormal findings, lesions, discolorations, or unusual features
- Size, shape, color, and texture of any concerning areas";

const MEDICAL_ASSESSMENT: &str = "## MEDICAL ASSESSMENT
Based on your visual analysis, provide:
- Primary suspected diagnosis with confidence level
- Secondary/differential diagnoses to consider
- Medical reasoning for each potential condition
- Key diagnostic features that support your assessment";

const RECOMMENDATIONS: &str = "## RECOMMENDATIONS
Provide specific guidance on:
- Most appropriate medical specialist to consult (dermatologist, radiologist, etc.)
- Additional diagnostic tests or imaging that may be helpful
- General care instructions or precautions
- When to seek immediate care (red flag symptoms)";

const CLOSING: &str = "Please provide a thorough, professional analysis while emphasizing the critical importance of proper medical consultation.";

/// Urgency vocabulary the model is asked to choose from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrgencyLevel {
    Emergency,
    Urgent,
    Routine,
    FollowUp,
}

impl UrgencyLevel {
    pub const ALL: [UrgencyLevel; 4] = [
        UrgencyLevel::Emergency,
        UrgencyLevel::Urgent,
        UrgencyLevel::Routine,
        UrgencyLevel::FollowUp,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            UrgencyLevel::Emergency => "EMERGENCY",
            UrgencyLevel::Urgent => "URGENT",
            UrgencyLevel::Routine => "ROUTINE",
            UrgencyLevel::FollowUp => "FOLLOW-UP",
        }
    }

    pub fn guidance(&self) -> &'static str {
        match self {
            UrgencyLevel::Emergency => "Requires immediate medical attention (within hours)",
            UrgencyLevel::Urgent => "Needs prompt medical care (within 1-2 days)",
            UrgencyLevel::Routine => "Can schedule regular appointment (within 1-2 weeks)",
            UrgencyLevel::FollowUp => "Monitor and reassess as needed",
        }
    }
}

fn severity_section() -> String {
    let mut section = String::from("## SEVERITY EVALUATION\nDetermine the urgency level:\n");
    for level in UrgencyLevel::ALL {
        // Writing into a String cannot fail.
        let _ = writeln!(section, "- {}: {}", level.label(), level.guidance());
    }
    section.push_str("\nExplain your reasoning for the urgency classification.");
    section
}

/// Build the analysis prompt. The query is inserted verbatim.
pub fn build_analysis_prompt(query: &str) -> String {
    let sections = [
        PREAMBLE.to_string(),
        VISUAL_ANALYSIS.to_string(),
        MEDICAL_ASSESSMENT.to_string(),
        severity_section(),
        RECOMMENDATIONS.to_string(),
        format!("## Patient Query\nAddress this specific question: {}", query),
        format!("## IMPORTANT MEDICAL DISCLAIMER\n{}", MEDICAL_DISCLAIMER),
        CLOSING.to_string(),
    ];
    sections.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_contains_query_and_disclaimer() {
        let prompt = build_analysis_prompt("What is this?");
        assert!(prompt.contains("Address this specific question: What is this?"));
        assert!(prompt.contains(MEDICAL_DISCLAIMER));
    }

    #[test]
    fn test_template_characters_in_query_are_literal() {
        for query in ["", "{query}", "{}", "}{", "{0} {name:?}", "line one\nline two", "¿Es grave? 皮疹"] {
            let prompt = build_analysis_prompt(query);
            assert!(prompt.contains(query), "query {:?} missing from prompt", query);
            assert!(prompt.contains(MEDICAL_DISCLAIMER));
        }
    }

    #[test]
    fn test_sections_are_ordered() {
        let prompt = build_analysis_prompt("q");
        let positions: Vec<usize> = [
            "## VISUAL ANALYSIS",
            "## MEDICAL ASSESSMENT",
            "## SEVERITY EVALUATION",
            "## RECOMMENDATIONS",
            "## Patient Query",
            "## IMPORTANT MEDICAL DISCLAIMER",
        ]
        .iter()
        .map(|heading| prompt.find(heading).unwrap())
        .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_every_urgency_level_is_offered() {
        let prompt = build_analysis_prompt("q");
        for level in UrgencyLevel::ALL {
            assert!(prompt.contains(&format!("- {}: {}", level.label(), level.guidance())));
        }
    }
}
