use prep_core::model::{Question, QuestionBody};

use crate::error::RefinementError;

/// Persona line sent ahead of every refinement request unless the stored
/// system prompt replaces it.
pub const DEFAULT_PERSONA: &str = "You are an expert Amazon interview coach.";

/// Build the refinement prompt for `question`.
///
/// STARL answers are sent labelled section by section and the model is asked
/// to answer in the same layout, so the reply can be parsed back.
///
/// # Errors
///
/// Returns `RefinementError::MissingAnswer` when there is nothing to refine.
pub fn build_prompt(question: &Question, persona: Option<&str>) -> Result<String, RefinementError> {
    if question.body().answer_is_blank() {
        return Err(RefinementError::MissingAnswer);
    }

    let body = match question.body() {
        QuestionBody::StructuredPrinciple { principle, answer } => format!(
            "Question: \"{text}\" (Principle: {principle})\n\n\
             Current STARL Answer:\n{starl}\n\n\
             ---\n\
             Refine this STARL answer for an Amazon interview. Focus on clarity, impact, \
             conciseness, and strong adherence to each component of the STARL method. Keep the \
             language professional and results-oriented. Provide the refined answer in the same \
             STARL format, one labelled section per line (Situation:, Task:, Action:, Result:, \
             Learning:). If a section is weak, suggest improvements.",
            text = question.text(),
            starl = answer.to_labeled_text(),
        ),
        QuestionBody::Freestyle { category, answer } => format!(
            "Question: \"{text}\" (Category: {category})\n\n\
             Current Answer: \"{answer}\"\n\n\
             ---\n\
             Refine this freestyle answer for an Amazon interview. Focus on clarity, impact, \
             conciseness, and professionalism. Make sure the answer directly addresses the \
             question and shows relevant qualities.",
            text = question.text(),
        ),
    };

    let persona = persona
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .unwrap_or(DEFAULT_PERSONA);
    Ok(format!("{persona} {body}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    use prep_core::model::{LeadershipPrinciple, QuestionDraft, QuestionId, Starl};
    use prep_core::time::fixed_now;

    fn question(draft: QuestionDraft) -> Question {
        draft
            .validate()
            .unwrap()
            .assign_id(QuestionId::generate(), fixed_now())
    }

    #[test]
    fn starl_prompt_embeds_labelled_sections() {
        let q = question(QuestionDraft::principle(
            "Tell me about a bold bet.",
            LeadershipPrinciple::ThinkBig,
            Starl::new("s1", "t1", "a1", "r1", "l1"),
        ));
        let prompt = build_prompt(&q, None).unwrap();
        assert!(prompt.starts_with(DEFAULT_PERSONA));
        assert!(prompt.contains("(Principle: Think Big)"));
        assert!(prompt.contains("Situation: s1\nTask: t1\nAction: a1\nResult: r1\nLearning: l1"));
        assert!(prompt.contains("same STARL format"));
    }

    #[test]
    fn freestyle_prompt_uses_category_and_custom_persona() {
        let q = question(QuestionDraft::freestyle("Why us?", "Motivation", "Growth."));
        let prompt = build_prompt(&q, Some("You are a strict reviewer.")).unwrap();
        assert!(prompt.starts_with("You are a strict reviewer. Question: \"Why us?\""));
        assert!(prompt.contains("(Category: Motivation)"));
        assert!(prompt.contains("Current Answer: \"Growth.\""));
    }

    #[test]
    fn blank_persona_falls_back_to_default() {
        let q = question(QuestionDraft::freestyle("Why us?", "Motivation", "Growth."));
        let prompt = build_prompt(&q, Some("   ")).unwrap();
        assert!(prompt.starts_with(DEFAULT_PERSONA));
    }

    #[test]
    fn blank_answers_are_refused() {
        let empty_freestyle = question(QuestionDraft::freestyle("Why us?", "Motivation", "  "));
        assert!(matches!(
            build_prompt(&empty_freestyle, None),
            Err(RefinementError::MissingAnswer)
        ));

        let empty_starl = question(QuestionDraft::principle(
            "Q",
            LeadershipPrinciple::Ownership,
            Starl::default(),
        ));
        assert!(matches!(
            build_prompt(&empty_starl, None),
            Err(RefinementError::MissingAnswer)
        ));
    }
}
