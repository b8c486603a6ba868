//! The seam between the index and whatever turns text into vectors.

use async_trait::async_trait;

use crate::error::Result;

/// Turns chunk and query text into fixed-length vectors.
///
/// The index stores the provider's [`model`](EmbeddingProvider::model) and
/// [`dimensions`](EmbeddingProvider::dimensions) so a persisted index can be
/// checked against the active provider before it is queried. Providers must be
/// deterministic: the same text always yields the same vector.
///
/// # Example
///
/// ```rust,ignore
/// use healthbot_rag::EmbeddingProvider;
///
/// let provider = MyEmbeddingProvider::new();
/// let embedding = provider.embed("persistent dry cough").await?;
/// assert_eq!(embedding.len(), provider.dimensions());
/// ```
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed one text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed several texts, in order. Defaults to one [`embed`](Self::embed)
    /// call per text.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut vectors = Vec::with_capacity(texts.len());
        for text in texts {
            vectors.push(self.embed(text).await?);
        }
        Ok(vectors)
    }

    /// Length of every vector this provider returns.
    fn dimensions(&self) -> usize;

    /// Model identifier recorded in persisted indexes.
    fn model(&self) -> &str;
}
