//! Command implementations for the `healthbot` binary.

use std::io::{self, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use healthbot_core::{AppContext, QueryOptions};
use healthbot_rag::{VectorIndex, corpus_fingerprint, load_corpus};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::{debug, info};

use crate::render::{Interrupt, type_out};

const PROMPT: &str = "💬 You: ";

/// Deliver `text` on stdout with the typing animation until `interrupt` is
/// raised; the text typed so far is returned.
pub async fn deliver(text: &str, delay: Duration, interrupt: &Interrupt) -> Result<String> {
    let mut stdout = io::stdout();
    let typed = type_out(text, delay, interrupt.subscribe(), &mut stdout)
        .await
        .context("failed to write reply")?;

    if typed.len() < text.len() {
        writeln!(stdout, "\n\n⏹️ Response stopped.")?;
    } else {
        writeln!(stdout)?;
    }
    stdout.flush()?;
    Ok(typed)
}

/// Answer `query` and deliver the reply. Ctrl-C while the answer is being
/// prepared cancels it and returns `None`; while typing it cuts the reply
/// short.
pub async fn respond(
    ctx: &AppContext,
    query: &str,
    options: QueryOptions,
    interrupt: &Interrupt,
) -> Result<Option<String>> {
    interrupt.reset();
    let reply = tokio::select! {
        reply = ctx.answer(query, options) => reply?,
        () = interrupt.triggered() => {
            info!(query, "request cancelled");
            println!("⏹️ Request cancelled.");
            return Ok(None);
        }
    };
    let typed = deliver(&reply.text, typing_delay(ctx), interrupt).await?;
    debug!(
        typed_chars = typed.chars().count(),
        total_chars = reply.text.chars().count(),
        "reply delivered"
    );
    Ok(Some(typed))
}

/// Answer one query and print the reply.
pub async fn ask(ctx: &AppContext, query: &str, options: QueryOptions) -> Result<()> {
    let interrupt = Interrupt::ctrl_c();
    respond(ctx, query, options, &interrupt).await?;
    Ok(())
}

/// Interactive session. `exit`, `quit`, Ctrl-C at the prompt or Ctrl-D end it.
pub async fn chat(ctx: &AppContext, options: QueryOptions) -> Result<()> {
    let mut editor = DefaultEditor::new().context("failed to start line editor")?;
    let interrupt = Interrupt::ctrl_c();
    println!("🏥 HealthBot - AI Medical Assistant");
    println!(
        "Describe your symptoms separated by commas, e.g. \"fever, cough\". Type 'exit' to quit.\n"
    );

    loop {
        let line = match tokio::task::block_in_place(|| editor.readline(PROMPT)) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => return Err(e).context("failed to read input"),
        };
        let query = line.trim();
        if query.is_empty() {
            continue;
        }
        if matches!(query.to_ascii_lowercase().as_str(), "exit" | "quit") {
            break;
        }
        editor.add_history_entry(query)?;

        println!();
        respond(ctx, query, options, &interrupt).await?;
        println!();
    }
    println!("Take care! 👋");
    Ok(())
}

/// Re-read the corpus folder and replace the persisted index.
pub async fn index_rebuild(ctx: &AppContext) -> Result<()> {
    let pipeline = ctx.pipeline();
    let index = pipeline.rebuild().await.with_context(|| {
        format!("failed to rebuild index from {}", pipeline.corpus_dir().display())
    })?;
    println!(
        "Indexed {} chunks from {} into {}",
        index.len(),
        pipeline.corpus_dir().display(),
        VectorIndex::file_path(pipeline.store_dir()).display()
    );
    Ok(())
}

/// Describe the persisted index and whether the corpus changed since it was built.
pub fn index_status(ctx: &AppContext) -> Result<()> {
    let pipeline = ctx.pipeline();
    let path = VectorIndex::file_path(pipeline.store_dir());
    if !VectorIndex::exists(pipeline.store_dir()) {
        println!(
            "No index at {}. It is built on the first query or with `healthbot index rebuild`.",
            path.display()
        );
        return Ok(());
    }

    let index =
        pipeline.load().with_context(|| format!("index at {} is unusable", path.display()))?;
    println!("Index:      {}", path.display());
    println!("Chunks:     {}", index.len());
    println!("Model:      {}", index.model());
    println!("Dimensions: {}", index.dimensions());

    let documents = load_corpus(pipeline.corpus_dir())?;
    let freshness = match index.corpus_fingerprint() {
        Some(stored) if stored == corpus_fingerprint(&documents) => "up to date",
        Some(_) => "stale (run `healthbot index rebuild`)",
        None => "unknown",
    };
    println!("Corpus:     {} documents, {freshness}", documents.len());
    Ok(())
}

fn typing_delay(ctx: &AppContext) -> Duration {
    Duration::from_millis(ctx.config().response.typing_delay_ms)
}
