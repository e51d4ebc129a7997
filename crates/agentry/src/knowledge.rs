// SPDX-FileCopyrightText: 2026 Agentry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `agentry knowledge`: embed a sample, load the sources, answer a question.

use agentry_config::AgentryConfig;
use agentry_config::model::VectorDb;
use agentry_core::types::ProviderTier;
use agentry_core::AgentryError;
use agentry_knowledge::KnowledgeAgentBuilder;
use clap::{Args, ValueEnum};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum VectorDbArg {
    Qdrant,
    Mongodb,
}

impl From<VectorDbArg> for VectorDb {
    fn from(arg: VectorDbArg) -> Self {
        match arg {
            VectorDbArg::Qdrant => VectorDb::Qdrant,
            VectorDbArg::Mongodb => VectorDb::Mongodb,
        }
    }
}

#[derive(Args, Debug)]
pub struct KnowledgeArgs {
    /// Source document URL (repeatable). Defaults to `knowledge.sources`.
    #[arg(long = "url")]
    pub urls: Vec<String>,

    /// Vector store to use. Defaults to `knowledge.vector_db`.
    #[arg(long, value_enum)]
    pub vector_db: Option<VectorDbArg>,

    /// Drop and recreate the collection before loading.
    #[arg(long)]
    pub recreate: bool,

    /// Skip loading and only query what is already stored.
    #[arg(long)]
    pub skip_load: bool,

    /// Text embedded to report the embedder's output size.
    #[arg(long, default_value = "The quick brown fox jumps over the lazy dog.")]
    pub sample: String,

    /// Question answered from the knowledge base.
    #[arg(long, default_value = "How did Eve die?")]
    pub prompt: String,
}

pub async fn run_knowledge(mut config: AgentryConfig, args: KnowledgeArgs) -> Result<(), AgentryError> {
    if let Some(db) = args.vector_db {
        config.knowledge.vector_db = db.into();
    }
    let sources = if args.urls.is_empty() {
        config.knowledge.sources.clone()
    } else {
        args.urls.clone()
    };
    if sources.is_empty() && !args.skip_load {
        return Err(AgentryError::Config(
            "no knowledge sources: pass --url or set knowledge.sources".into(),
        ));
    }

    let choice = config.vector_store_choice()?;
    let agent = KnowledgeAgentBuilder::new(
        config.backend_candidate(ProviderTier::Primary),
        config.backend_candidate(ProviderTier::Fallback),
    )
    .chunk_size(config.knowledge.chunk_size)
    .num_documents(config.knowledge.num_documents)
    .build(sources, &choice, &config.embedder_config())?;

    let sample = agent.embed_sample(&args.sample).await?;
    println!("Embeddings (first 5 values): {:?}", sample.leading);
    println!("Embedding Dimension: {}", sample.dimension);

    if !args.skip_load {
        let report = agent.load_documents(args.recreate).await?;
        for failure in &report.failures {
            warn!(error = %failure, "source skipped");
        }
        info!(
            sources = report.sources_loaded,
            documents = report.documents_loaded,
            chunks = report.chunks_upserted,
            failures = report.failures.len(),
            "documents loaded"
        );
        println!(
            "Loaded {} documents ({} chunks) from {} sources, {} failed",
            report.documents_loaded,
            report.chunks_upserted,
            report.sources_loaded,
            report.failures.len()
        );
    }

    let answer = agent.query(&args.prompt, config.agent.markdown).await?;
    println!("{}", answer.content);
    Ok(())
}
