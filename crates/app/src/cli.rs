use clap::{Args, Parser, Subcommand};

use prep_core::model::{
    Confidence, LeadershipPrinciple, ParseConfidenceError, QuestionId, Theme, TypeFilter, View,
};

#[derive(Parser)]
#[command(name = "interview-prep")]
#[command(about = "Practice behavioral interview stories and run timed mock panels")]
#[command(version)]
pub struct Cli {
    /// SQLite database URL or file path
    #[arg(
        long,
        global = true,
        env = "PREP_DB_URL",
        default_value = "interview-prep.sqlite3"
    )]
    pub db: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List questions, newest first
    List {
        /// all, lp or freestyle (defaults to the saved filter)
        #[arg(long = "type", value_name = "FILTER")]
        type_filter: Option<TypeFilter>,

        /// Case-insensitive text to look for in questions, answers and tags
        #[arg(long, default_value = "")]
        search: String,
    },

    /// Show one question with its answer
    Show { id: QuestionId },

    /// Add a question
    Add {
        #[command(subcommand)]
        kind: AddCommand,
    },

    /// Replace fields of an existing question
    Edit(EditArgs),

    /// Delete a question
    Delete {
        id: QuestionId,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Toggle the mastered mark
    Master { id: QuestionId },

    /// Toggle the practice flag
    Flag { id: QuestionId },

    /// Set confidence to low, medium, high or none
    Confidence {
        id: QuestionId,

        #[arg(value_parser = parse_confidence_level)]
        level: ConfidenceLevel,
    },

    /// Mastery and confidence overview plus panel statistics
    Progress,

    /// Run a timed mock panel
    Panel,

    /// Review questions as shuffled flashcards
    Flashcards {
        /// all, lp or freestyle (defaults to the saved filter)
        #[arg(long = "type", value_name = "FILTER")]
        type_filter: Option<TypeFilter>,

        #[arg(long, default_value = "")]
        search: String,
    },

    /// Step through flagged questions
    Interview,

    /// Show completed panels
    History {
        /// Delete all panel history
        #[arg(long)]
        clear: bool,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Ask the AI coach to refine an answer
    Refine {
        id: QuestionId,

        /// Write the suggestion into the question
        #[arg(long)]
        apply: bool,
    },

    /// Show or change saved preferences
    Prefs {
        #[arg(long)]
        theme: Option<Theme>,

        #[arg(long)]
        view: Option<View>,

        #[arg(long = "type", value_name = "FILTER")]
        type_filter: Option<TypeFilter>,
    },

    /// Show or change AI refinement settings
    AiSettings(AiSettingsArgs),
}

#[derive(Subcommand)]
pub enum AddCommand {
    /// Leadership principle question with a STARL answer
    Lp {
        #[arg(long)]
        question: String,

        #[arg(long)]
        principle: LeadershipPrinciple,

        #[command(flatten)]
        answer: StarlArgs,

        #[command(flatten)]
        meta: MetaArgs,
    },

    /// Open-ended question with a free-text answer
    Freestyle {
        #[arg(long)]
        question: String,

        #[arg(long)]
        category: String,

        #[arg(long, default_value = "")]
        answer: String,

        #[command(flatten)]
        meta: MetaArgs,
    },
}

#[derive(Args)]
pub struct StarlArgs {
    #[arg(long)]
    pub situation: Option<String>,
    #[arg(long)]
    pub task: Option<String>,
    #[arg(long)]
    pub action: Option<String>,
    #[arg(long)]
    pub result: Option<String>,
    #[arg(long)]
    pub learning: Option<String>,
}

impl StarlArgs {
    pub fn is_empty(&self) -> bool {
        self.situation.is_none()
            && self.task.is_none()
            && self.action.is_none()
            && self.result.is_none()
            && self.learning.is_none()
    }
}

#[derive(Args)]
pub struct MetaArgs {
    /// Comma-separated tags
    #[arg(long, value_delimiter = ',')]
    pub tags: Vec<String>,

    #[arg(long)]
    pub flagged: bool,

    #[arg(long)]
    pub confidence: Option<Confidence>,
}

#[derive(Args)]
pub struct EditArgs {
    pub id: QuestionId,

    #[arg(long)]
    pub question: Option<String>,

    /// Leadership principle (LP questions only)
    #[arg(long)]
    pub principle: Option<LeadershipPrinciple>,

    #[command(flatten)]
    pub starl: StarlArgs,

    /// Category (freestyle questions only)
    #[arg(long)]
    pub category: Option<String>,

    /// Answer text (freestyle questions only)
    #[arg(long)]
    pub answer: Option<String>,

    /// Comma-separated tags; replaces the current tags
    #[arg(long, value_delimiter = ',')]
    pub tags: Option<Vec<String>>,
}

#[derive(Args)]
pub struct AiSettingsArgs {
    #[arg(long)]
    pub api_key: Option<String>,

    #[arg(long)]
    pub model: Option<String>,

    #[arg(long)]
    pub base_url: Option<String>,

    /// Persona line placed before every refinement prompt
    #[arg(long)]
    pub system_prompt: Option<String>,

    /// Forget all stored AI settings
    #[arg(long, conflicts_with_all = ["api_key", "model", "base_url", "system_prompt"])]
    pub reset: bool,
}

impl AiSettingsArgs {
    pub fn is_empty(&self) -> bool {
        !self.reset
            && self.api_key.is_none()
            && self.model.is_none()
            && self.base_url.is_none()
            && self.system_prompt.is_none()
    }
}

/// Confidence as given on the command line; `none` clears it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfidenceLevel(pub Option<Confidence>);

fn parse_confidence_level(raw: &str) -> Result<ConfidenceLevel, ParseConfidenceError> {
    if raw.trim().eq_ignore_ascii_case("none") {
        return Ok(ConfidenceLevel(None));
    }
    raw.parse().map(|level| ConfidenceLevel(Some(level)))
}

#[cfg(test)]
mod tests {
    use super::*;

    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn confidence_accepts_none() {
        assert_eq!(parse_confidence_level("None").unwrap(), ConfidenceLevel(None));
        assert_eq!(
            parse_confidence_level("high").unwrap(),
            ConfidenceLevel(Some(Confidence::High))
        );
        assert!(parse_confidence_level("sure").is_err());
    }

    #[test]
    fn parses_add_lp_with_tags() {
        let cli = Cli::try_parse_from([
            "interview-prep",
            "add",
            "lp",
            "--question",
            "Tell me about a time...",
            "--principle",
            "dive deep",
            "--situation",
            "Alerts were noisy",
            "--tags",
            "ops,metrics",
        ])
        .unwrap();
        let Commands::Add {
            kind: AddCommand::Lp {
                principle,
                answer,
                meta,
                ..
            },
        } = cli.command
        else {
            panic!("expected add lp");
        };
        assert_eq!(principle, LeadershipPrinciple::DiveDeep);
        assert_eq!(answer.situation.as_deref(), Some("Alerts were noisy"));
        assert_eq!(meta.tags, vec!["ops", "metrics"]);
    }

    #[test]
    fn list_type_filter_uses_short_names() {
        let cli = Cli::try_parse_from(["interview-prep", "list", "--type", "lp"]).unwrap();
        let Commands::List { type_filter, .. } = cli.command else {
            panic!("expected list");
        };
        assert_eq!(type_filter, Some(TypeFilter::StructuredPrinciple));
    }

    #[test]
    fn reset_conflicts_with_values() {
        assert!(
            Cli::try_parse_from(["interview-prep", "ai-settings", "--reset", "--model", "m"])
                .is_err()
        );
    }
}
