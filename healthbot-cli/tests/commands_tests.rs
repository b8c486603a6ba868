//! Non-interactive commands against a temporary data directory.

use std::fs;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use healthbot_cli::commands;
use healthbot_cli::render::Interrupt;
use healthbot_core::config::PathsConfig;
use healthbot_core::{
    AppContext, HealthbotConfig, KnowledgeStore, QueryOptions, ResponseMode, WebSearch,
};

/// A search service that never answers.
struct HangingSearch;

#[async_trait]
impl WebSearch for HangingSearch {
    async fn search(&self, _query: &str) -> Vec<String> {
        std::future::pending().await
    }
}

fn config(root: &std::path::Path) -> HealthbotConfig {
    let paths = PathsConfig::under(root);
    fs::write(
        &paths.medical_csv,
        "Disease,Symptoms,Description,Medicines,Consultation\n\
         Flu,\"fever, cough, fatigue\",Viral.,Rest,See a GP\n",
    )
    .unwrap();
    fs::write(&paths.doctors_json, "[]").unwrap();
    fs::create_dir_all(&paths.documents_dir).unwrap();
    fs::write(paths.documents_dir.join("flu.md"), "# Influenza\n\nFever and cough are common.")
        .unwrap();

    let mut config = HealthbotConfig { paths, ..HealthbotConfig::default() };
    config.web.enabled = false;
    config.response.typing_delay_ms = 0;
    config.retrieval.embedding_dimensions = 32;
    config
}

#[tokio::test]
async fn rebuild_then_status_then_ask() {
    let temp = tempfile::tempdir().unwrap();
    let config = config(temp.path());
    let store = config.paths.vector_store_dir.clone();
    let ctx = AppContext::from_config(config).unwrap();

    commands::index_status(&ctx).unwrap();
    commands::index_rebuild(&ctx).await.unwrap();
    assert!(store.join("index.json").is_file());
    commands::index_status(&ctx).unwrap();

    let options = QueryOptions { mode: ResponseMode::Concise, use_web: false };
    commands::ask(&ctx, "fever, cough", options).await.unwrap();
}

#[tokio::test]
async fn deliver_without_delay_returns_full_text() {
    let interrupt = Interrupt::default();
    let typed = commands::deliver("🦠 Flu - See a GP", Duration::ZERO, &interrupt).await.unwrap();
    assert_eq!(typed, "🦠 Flu - See a GP");

    interrupt.trigger();
    let typed = commands::deliver("🦠 Flu - See a GP", Duration::ZERO, &interrupt).await.unwrap();
    assert_eq!(typed, "");
}

#[tokio::test]
async fn interrupt_cancels_a_pending_answer() {
    let temp = tempfile::tempdir().unwrap();
    let mut config = config(temp.path());
    config.web.enabled = true;
    let knowledge = KnowledgeStore::load(&config.paths.medical_csv, &config.paths.doctors_json);
    let ctx = AppContext::with_components(config, knowledge, Arc::new(HangingSearch)).unwrap();
    let options = QueryOptions { mode: ResponseMode::Concise, use_web: true };

    let interrupt = Interrupt::default();
    interrupt.trigger();
    let (outcome, ()) = tokio::join!(
        commands::respond(&ctx, "fever, cough", options, &interrupt),
        async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            interrupt.trigger();
        },
    );
    assert_eq!(outcome.unwrap(), None);

    // The next request starts with a cleared flag.
    let options = QueryOptions { use_web: false, ..options };
    let typed = commands::respond(&ctx, "fever, cough", options, &interrupt).await.unwrap();
    assert!(typed.unwrap().starts_with("🦠 Flu - See a GP"));
}

#[tokio::test]
async fn rebuild_of_empty_corpus_fails() {
    let temp = tempfile::tempdir().unwrap();
    let config =
        HealthbotConfig { paths: PathsConfig::under(temp.path()), ..HealthbotConfig::default() };
    let ctx = AppContext::from_config(config).unwrap();
    assert!(commands::index_rebuild(&ctx).await.is_err());
}
