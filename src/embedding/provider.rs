use crate::error::Result;

/// Maps text to fixed-length vectors.
///
/// Every vector produced by one embedder has `dimensions()` components; a
/// collection must only ever be fed by embedders of the same model.
pub trait Embedder: Send + Sync {
    /// Embed a single text.
    fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed a batch of texts, returning one vector per input in order.
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Number of components in every vector.
    fn dimensions(&self) -> usize;

    /// Name recorded alongside stored vectors.
    fn model_name(&self) -> String;
}
