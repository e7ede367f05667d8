use serde::{Deserialize, Serialize};

/// Situation / Task / Action / Result / Learning answer. Any field may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Starl {
    pub situation: String,
    pub task: String,
    pub action: String,
    pub result: String,
    pub learning: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StarlField {
    Situation,
    Task,
    Action,
    Result,
    Learning,
}

impl StarlField {
    pub const ALL: [StarlField; 5] = [
        Self::Situation,
        Self::Task,
        Self::Action,
        Self::Result,
        Self::Learning,
    ];

    /// Lowercase key, as it appears in a `Key:` line.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Situation => "situation",
            Self::Task => "task",
            Self::Action => "action",
            Self::Result => "result",
            Self::Learning => "learning",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Situation => "Situation",
            Self::Task => "Task",
            Self::Action => "Action",
            Self::Result => "Result",
            Self::Learning => "Learning",
        }
    }
}

impl Starl {
    #[must_use]
    pub fn new(
        situation: impl Into<String>,
        task: impl Into<String>,
        action: impl Into<String>,
        result: impl Into<String>,
        learning: impl Into<String>,
    ) -> Self {
        Self {
            situation: situation.into(),
            task: task.into(),
            action: action.into(),
            result: result.into(),
            learning: learning.into(),
        }
    }

    #[must_use]
    pub fn get(&self, field: StarlField) -> &str {
        match field {
            StarlField::Situation => &self.situation,
            StarlField::Task => &self.task,
            StarlField::Action => &self.action,
            StarlField::Result => &self.result,
            StarlField::Learning => &self.learning,
        }
    }

    pub fn set(&mut self, field: StarlField, value: impl Into<String>) {
        let slot = match field {
            StarlField::Situation => &mut self.situation,
            StarlField::Task => &mut self.task,
            StarlField::Action => &mut self.action,
            StarlField::Result => &mut self.result,
            StarlField::Learning => &mut self.learning,
        };
        *slot = value.into();
    }

    /// Iterate fields in STARL order.
    pub fn fields(&self) -> impl Iterator<Item = (StarlField, &str)> {
        StarlField::ALL.into_iter().map(move |f| (f, self.get(f)))
    }

    /// True when every field is empty or whitespace.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.fields().all(|(_, v)| v.trim().is_empty())
    }

    /// Renders the answer as labelled `Field: value` lines.
    #[must_use]
    pub fn to_labeled_text(&self) -> String {
        self.fields()
            .map(|(f, v)| format!("{}: {}", f.label(), v))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
