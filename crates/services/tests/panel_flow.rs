use std::sync::Arc;

use chrono::Duration;
use prep_core::model::{LeadershipPrinciple, Question, QuestionDraft, QuestionKind, Starl};
use prep_core::progress::panel_kpis;
use prep_core::time::fixed_now;
use services::refinement::HttpRefinementClient;
use services::{AppServices, Clock, Confirmation, PanelConfig, PanelProgress, ScriptedRandom};
use storage::keys;
use storage::repository::{Storage, save};

async fn services_over(storage: Storage) -> AppServices {
    AppServices::with_storage(
        storage,
        Clock::fixed(fixed_now()),
        PanelConfig::default(),
        Arc::new(HttpRefinementClient::new(None)),
        Box::new(ScriptedRandom::identity()),
    )
    .await
    .expect("services")
}

async fn seed_pool(app: &AppServices) {
    let bank = app.questions();
    for draft in [
        QuestionDraft::freestyle("Why this team?", "Motivation", "Mission."),
        QuestionDraft::freestyle("Biggest weakness?", "Self-Reflection", "Delegation."),
        QuestionDraft::principle("Saved a launch", LeadershipPrinciple::DeliverResults, Starl::default()),
        QuestionDraft::principle("Hit a stretch goal", LeadershipPrinciple::DeliverResults, Starl::default()),
        QuestionDraft::principle("Disagreed with a VP", LeadershipPrinciple::HaveBackbone, Starl::default()),
    ] {
        bank.create(draft).await.expect("create");
    }
}

#[tokio::test]
async fn panel_history_survives_reload_from_sqlite() {
    let url = "sqlite:file:memdb_panel_flow?mode=memory&cache=shared";
    let storage = Storage::sqlite(url).await.expect("storage");
    save(storage.kv.as_ref(), keys::QUESTIONS, &Vec::<Question>::new())
        .await
        .unwrap();

    let app = services_over(storage.clone()).await;
    seed_pool(&app).await;

    let panels = app.panels();
    let panel = panels.start().await.expect("panel");
    assert_eq!(panel.questions().len(), 5);
    panels.next().await;

    let record = panels.end_early().await.unwrap().expect("record");
    assert_eq!(record.questions().len(), 5);

    let reloaded = services_over(storage).await;
    let history = reloaded.history().list().await;
    assert_eq!(history, vec![record]);

    let kpis = panel_kpis(&history).expect("kpis");
    assert_eq!(kpis.total_sessions, 1);
    assert_eq!(kpis.principle_questions, 3);
    assert_eq!(kpis.freestyle_questions, 2);
    assert_eq!(kpis.principle_percent, 60);
    assert_eq!(kpis.category_frequency[0].category, "Deliver Results");
    assert_eq!(kpis.category_frequency[0].count, 2);
}

#[tokio::test]
async fn timeout_then_clear_history() {
    let storage = Storage::in_memory();
    save(storage.kv.as_ref(), keys::QUESTIONS, &Vec::<Question>::new())
        .await
        .unwrap();
    let app = services_over(storage).await;
    seed_pool(&app).await;

    let panels = app.panels();
    panels.start().await.unwrap();
    let progress = panels
        .tick_at(fixed_now() + Duration::minutes(31))
        .await
        .unwrap();
    let PanelProgress::TimedOut(Some(record)) = progress else {
        panic!("expected timeout, got {progress:?}");
    };
    assert!(
        record
            .questions()
            .iter()
            .any(|q| q.kind == QuestionKind::Freestyle)
    );

    let history = app.history();
    assert!(!history.clear(Confirmation::Declined).await.unwrap());
    assert_eq!(history.len().await, 1);
    assert!(history.clear(Confirmation::Confirmed).await.unwrap());
    assert!(history.is_empty().await);
}

#[tokio::test]
async fn deleting_a_question_leaves_history_untouched() {
    let storage = Storage::in_memory();
    save(storage.kv.as_ref(), keys::QUESTIONS, &Vec::<Question>::new())
        .await
        .unwrap();
    let app = services_over(storage).await;
    seed_pool(&app).await;

    let panels = app.panels();
    panels.start().await.unwrap();
    let record = panels.end_early().await.unwrap().expect("record");

    let first = record.questions()[0].clone();
    assert!(
        app.questions()
            .delete(first.id, Confirmation::Confirmed)
            .await
            .unwrap()
    );
    assert_eq!(app.history().list().await[0].questions()[0], first);
}
