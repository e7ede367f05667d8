use crate::model::preferences::TypeFilter;
use crate::model::question::Question;

/// Listing criteria: a kind filter plus a free-text search term.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionQuery {
    pub type_filter: TypeFilter,
    pub search: String,
}

impl QuestionQuery {
    #[must_use]
    pub fn new(type_filter: TypeFilter, search: impl Into<String>) -> Self {
        Self {
            type_filter,
            search: search.into(),
        }
    }

    #[must_use]
    pub fn matches(&self, question: &Question) -> bool {
        self.type_filter.matches(question.kind()) && question.matches_search(&self.search)
    }

    /// Matching questions, in input order.
    pub fn apply<'a>(&'a self, questions: &'a [Question]) -> impl Iterator<Item = &'a Question> + 'a {
        questions.iter().filter(move |q| self.matches(q))
    }
}
