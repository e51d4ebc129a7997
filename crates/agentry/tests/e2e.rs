// SPDX-FileCopyrightText: 2026 Agentry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end knowledge flow: sample embedding, load, grounded query.
//!
//! `live_mongo_pdf_flow` needs MongoDB (`MONGO_CONNECTION_STRING`), a local
//! Ollama with `openhermes` and network access; run it with
//! `cargo test -p agentry -- --ignored`.

use std::sync::Arc;

use agentry_config::AgentryConfig;
use agentry_core::types::ProviderTier;
use agentry_knowledge::KnowledgeAgentBuilder;
use agentry_test_utils::{MemoryVectorStore, MockEmbedder, MockProvider, ScriptedFactory, StaticReader};

const PDF_URL: &str = "https://www.scollingsworthenglish.com/uploads/3/8/4/2/38422447/garth_stein_-_the_art_of_racing_in_the_rain.pdf";
const SAMPLE: &str = "The quick brown fox jumps over the lazy dog.";

fn defaults() -> AgentryConfig {
    agentry_config::load_and_validate_str("").expect("defaults are valid")
}

#[tokio::test]
async fn mock_mongo_pdf_flow() {
    let config = defaults();
    let embedder_config = config.embedder_config();
    let choice = config
        .vector_store_choice_with(|name| {
            (name == "MONGO_CONNECTION_STRING").then(|| "mongodb://127.0.0.1:27017".to_string())
        })
        .unwrap();
    assert_eq!(choice.store_name(), "mongodb");

    let provider = Arc::new(MockProvider::named("ollama"));
    provider.push_text("Eve died of brain cancer.").await;
    let factory = ScriptedFactory::new()
        .fail("groq", "GROQ_API_KEY is not set")
        .succeed("ollama", provider);

    let agent = KnowledgeAgentBuilder::new(
        config.backend_candidate_with(ProviderTier::Primary, |_| None),
        config.backend_candidate_with(ProviderTier::Fallback, |_| None),
    )
    .provider_factory(Arc::new(factory))
    .embedder(Arc::new(MockEmbedder::new(embedder_config.dimensions)))
    .vector_store(Arc::new(MemoryVectorStore::new(choice.collection())))
    .reader(Arc::new(StaticReader::new().with_document(
        PDF_URL,
        "Enzo tells the story.\n\nEve, Denny's wife, died of brain cancer.",
    )))
    .build(vec![PDF_URL.to_string()], &choice, &embedder_config)
    .unwrap();

    let sample = agent.embed_sample(SAMPLE).await.unwrap();
    assert_eq!(sample.dimension, embedder_config.dimensions);

    let report = agent.load_documents(false).await.unwrap();
    assert!(report.failures.is_empty());
    assert_eq!(report.sources_loaded, 1);

    let answer = agent.query("How did Eve die?", true).await.unwrap();
    assert!(!answer.content.is_empty());
    assert_eq!(agent.backend().tier, ProviderTier::Fallback);
}

#[tokio::test]
#[ignore = "needs MongoDB, Ollama and network access"]
async fn live_mongo_pdf_flow() {
    let _ = dotenvy::dotenv_override();
    let config = defaults();
    let choice = config.vector_store_choice().expect("MONGO_CONNECTION_STRING must be set");
    let embedder_config = config.embedder_config();

    let agent = KnowledgeAgentBuilder::new(
        config.backend_candidate(ProviderTier::Primary),
        config.backend_candidate(ProviderTier::Fallback),
    )
    .build(vec![PDF_URL.to_string()], &choice, &embedder_config)
    .unwrap();

    let sample = agent.embed_sample(SAMPLE).await.unwrap();
    assert_eq!(sample.dimension, embedder_config.dimensions);

    let report = agent.load_documents(false).await.unwrap();
    assert!(report.failures.is_empty(), "failures: {:?}", report.failures);

    let answer = agent.query("How did Eve die?", true).await.unwrap();
    assert!(!answer.content.trim().is_empty());
}
