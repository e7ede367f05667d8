use anyhow::bail;

use prep_core::model::{
    AppSettings, AppSettingsDraft, Question, QuestionBody, QuestionDraft, QuestionQuery, Starl,
    TypeFilter,
};
use prep_core::progress::{panel_kpis, progress_report};
use services::{AppServices, Confirmation};

use crate::cli::{AddCommand, AiSettingsArgs, Commands, EditArgs, MetaArgs, StarlArgs};
use crate::interactive::{self, Terminal};
use crate::render;

pub async fn dispatch(
    command: Commands,
    services: &AppServices,
    term: &mut Terminal,
) -> anyhow::Result<()> {
    let questions = services.questions();
    match command {
        Commands::List {
            type_filter,
            search,
        } => {
            let query = QuestionQuery::new(resolve_filter(services, type_filter).await?, search);
            let matches = questions.query(&query).await;
            if matches.is_empty() {
                println!("No questions match.");
            }
            for question in &matches {
                println!("{}", render::question_line(question));
            }
        }
        Commands::Show { id } => {
            let Some(question) = questions.get(id).await else {
                bail!("question {id} not found");
            };
            println!("{}", render::question_detail(&question));
        }
        Commands::Add { kind } => {
            let created = questions.create(new_draft(kind)).await?;
            tracing::info!(id = %created.id(), "question added");
            println!("Added {}", created.id());
        }
        Commands::Edit(args) => {
            let Some(current) = questions.get(args.id).await else {
                bail!("question {} not found", args.id);
            };
            let id = current.id();
            let updated = questions.update(id, edited_draft(&current, args)?).await?;
            println!("{}", render::question_detail(&updated));
        }
        Commands::Delete { id, yes } => {
            let Some(question) = questions.get(id).await else {
                bail!("question {id} not found");
            };
            let confirmation = confirm(
                term,
                yes,
                &format!("Delete \"{}\"?", question.text()),
            )
            .await?;
            if questions.delete(id, confirmation).await? {
                println!("Deleted {id}");
            } else {
                println!("Kept {id}");
            }
        }
        Commands::Master { id } => {
            let updated = questions.toggle_mastered(id).await?;
            println!(
                "{}",
                if updated.is_mastered() {
                    "Marked as mastered"
                } else {
                    "No longer mastered"
                }
            );
        }
        Commands::Flag { id } => {
            let updated = questions.toggle_flagged(id).await?;
            println!(
                "{}",
                if updated.is_flagged() {
                    "Flagged for practice"
                } else {
                    "Flag removed"
                }
            );
        }
        Commands::Confidence { id, level } => {
            let updated = questions.set_confidence(id, level.0).await?;
            match updated.confidence() {
                Some(level) => println!("Confidence set to {}", level.as_str()),
                None => println!("Confidence cleared"),
            }
        }
        Commands::Progress => {
            let report = progress_report(&questions.list().await);
            let history = services.history().list().await;
            println!("{}", render::progress(&report, panel_kpis(&history).as_ref()));
        }
        Commands::Panel => interactive::run_panel(&services.panels(), term).await?,
        Commands::Flashcards {
            type_filter,
            search,
        } => {
            let query = QuestionQuery::new(resolve_filter(services, type_filter).await?, search);
            interactive::run_flashcards(questions.query(&query).await, term).await?;
        }
        Commands::Interview => interactive::run_interview(&questions, term).await?,
        Commands::History { clear, yes } => {
            let history = services.history();
            if clear {
                if history.is_empty().await {
                    println!("No panel history.");
                    return Ok(());
                }
                let prompt = format!("Delete all {} panel records?", history.len().await);
                let confirmation = confirm(term, yes, &prompt).await?;
                if history.clear(confirmation).await? {
                    println!("Panel history cleared.");
                } else {
                    println!("Kept panel history.");
                }
            } else {
                let records = history.list().await;
                if records.is_empty() {
                    println!("No panel history.");
                }
                for record in &records {
                    println!("{}", render::history_entry(record));
                }
            }
        }
        Commands::Refine { id, apply } => {
            let refinement = services.refinement();
            let suggestion = refinement.request(id).await?;
            println!("{}", render::suggestion(&suggestion));
            if apply {
                let updated = refinement.apply(id, &suggestion).await?;
                println!("\nApplied to {}", updated.id());
            }
        }
        Commands::Prefs {
            theme,
            view,
            type_filter,
        } => {
            let prefs = services.preferences();
            if let Some(theme) = theme {
                prefs.save_theme(theme).await?;
            }
            if let Some(view) = view {
                prefs.save_view(view).await?;
            }
            if let Some(filter) = type_filter {
                prefs.save_type_filter(filter).await?;
            }
            println!("{}", render::preferences(&prefs.load().await?));
        }
        Commands::AiSettings(args) => {
            let prefs = services.preferences();
            let current = prefs.app_settings().await?;
            let settings = if args.is_empty() {
                current
            } else {
                prefs.save_app_settings(settings_draft(&current, args)).await?
            };
            println!("{}", describe_settings(&settings));
        }
    }
    Ok(())
}

async fn resolve_filter(
    services: &AppServices,
    requested: Option<TypeFilter>,
) -> anyhow::Result<TypeFilter> {
    match requested {
        Some(filter) => Ok(filter),
        None => Ok(services.preferences().load().await?.type_filter),
    }
}

async fn confirm(term: &mut Terminal, yes: bool, prompt: &str) -> anyhow::Result<Confirmation> {
    if yes {
        return Ok(Confirmation::Confirmed);
    }
    term.confirm(prompt).await
}

fn with_meta(draft: QuestionDraft, meta: MetaArgs) -> QuestionDraft {
    draft
        .tags(meta.tags)
        .flagged(meta.flagged)
        .confidence(meta.confidence)
}

fn starl_from(args: StarlArgs) -> Starl {
    let mut starl = Starl::default();
    fill_starl(&mut starl, args);
    starl
}

fn fill_starl(starl: &mut Starl, args: StarlArgs) {
    let StarlArgs {
        situation,
        task,
        action,
        result,
        learning,
    } = args;
    let fields = [
        (&mut starl.situation, situation),
        (&mut starl.task, task),
        (&mut starl.action, action),
        (&mut starl.result, result),
        (&mut starl.learning, learning),
    ];
    for (slot, value) in fields {
        if let Some(value) = value {
            *slot = value;
        }
    }
}

fn new_draft(kind: AddCommand) -> QuestionDraft {
    match kind {
        AddCommand::Lp {
            question,
            principle,
            answer,
            meta,
        } => with_meta(
            QuestionDraft::principle(question, principle, starl_from(answer)),
            meta,
        ),
        AddCommand::Freestyle {
            question,
            category,
            answer,
            meta,
        } => with_meta(QuestionDraft::freestyle(question, category, answer), meta),
    }
}

/// Start from the stored question and overwrite only the fields given.
fn edited_draft(current: &Question, args: EditArgs) -> anyhow::Result<QuestionDraft> {
    let mut draft = QuestionDraft::from_question(current);
    if let Some(text) = args.question {
        draft.text = text;
    }
    if let Some(tags) = args.tags {
        draft = draft.tags(tags);
    }

    match &mut draft.body {
        QuestionBody::StructuredPrinciple { principle, answer } => {
            if args.category.is_some() || args.answer.is_some() {
                bail!("--category and --answer only apply to freestyle questions");
            }
            if let Some(new_principle) = args.principle {
                *principle = new_principle;
            }
            fill_starl(answer, args.starl);
        }
        QuestionBody::Freestyle { category, answer } => {
            if args.principle.is_some() || !args.starl.is_empty() {
                bail!("--principle and STARL fields only apply to leadership principle questions");
            }
            if let Some(new_category) = args.category {
                *category = new_category;
            }
            if let Some(new_answer) = args.answer {
                *answer = new_answer;
            }
        }
    }
    Ok(draft)
}

/// Given flags replace stored values; an empty value clears the field.
fn settings_draft(current: &AppSettings, args: AiSettingsArgs) -> AppSettingsDraft {
    if args.reset {
        return AppSettingsDraft::new();
    }
    let keep = |value: Option<&str>| value.map(String::from);
    AppSettingsDraft {
        api_key: args.api_key.or_else(|| keep(current.api_key())),
        api_model: args.model.or_else(|| keep(current.api_model())),
        api_base_url: args.base_url.or_else(|| keep(current.api_base_url())),
        ai_system_prompt: args
            .system_prompt
            .or_else(|| keep(current.ai_system_prompt())),
    }
}

fn mask_key(key: &str) -> String {
    let count = key.chars().count();
    if count <= 4 {
        return "****".to_string();
    }
    let tail: String = key.chars().skip(count - 4).collect();
    format!("****{tail}")
}

fn describe_settings(settings: &AppSettings) -> String {
    let unset = "(not set)";
    format!(
        "api key: {}\nmodel: {}\nbase url: {}\nsystem prompt: {}",
        settings.api_key().map_or_else(|| unset.to_string(), mask_key),
        settings.api_model().unwrap_or(unset),
        settings.api_base_url().unwrap_or(unset),
        settings.ai_system_prompt().unwrap_or(unset),
    )
}
