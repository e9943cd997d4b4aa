//! Embedding-based persona pair selection
//!
//! Quantifies semantic distance between persona descriptors with cosine
//! similarity over backend embeddings, then picks the most dissimilar
//! (or most similar) pair from the pool.

use crate::ports::embedding::{EmbeddingError, EmbeddingGateway};
use std::sync::Arc;
use tandem_domain::Persona;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur during pair selection
#[derive(Error, Debug)]
pub enum SelectorError {
    #[error("At least 2 personas are required for selection, got {0}")]
    InsufficientPool(usize),

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),
}

/// Similarity score for one unordered persona pair
#[derive(Debug, Clone, PartialEq)]
pub struct PairSimilarity {
    /// Pool index of the first persona (`i < j`)
    pub i: usize,
    /// Pool index of the second persona
    pub j: usize,
    pub score: f32,
}

/// Selects persona pairs by descriptor similarity
///
/// Descriptor embeddings are computed once per pool lifetime and cached;
/// both selection methods and the similarity matrix reuse them.
#[derive(Debug)]
pub struct PersonaSelector<E> {
    gateway: Arc<E>,
    personas: Vec<Persona>,
    embeddings: Option<Vec<Vec<f32>>>,
}

impl<E: EmbeddingGateway> PersonaSelector<E> {
    /// Create a selector over the given pool
    ///
    /// Fails immediately for pools smaller than 2; no embedding call is
    /// ever attempted for an invalid pool.
    pub fn new(gateway: Arc<E>, personas: Vec<Persona>) -> Result<Self, SelectorError> {
        if personas.len() < 2 {
            return Err(SelectorError::InsufficientPool(personas.len()));
        }
        Ok(Self {
            gateway,
            personas,
            embeddings: None,
        })
    }

    pub fn personas(&self) -> &[Persona] {
        &self.personas
    }

    /// Cosine similarity for every pair, enumerated in `i < j` order
    pub async fn similarity_matrix(&mut self) -> Result<Vec<PairSimilarity>, SelectorError> {
        let embeddings = self.embeddings().await?;

        let mut pairs = Vec::new();
        for i in 0..embeddings.len() {
            for j in (i + 1)..embeddings.len() {
                pairs.push(PairSimilarity {
                    i,
                    j,
                    score: cosine_similarity(&embeddings[i], &embeddings[j]),
                });
            }
        }
        Ok(pairs)
    }

    /// The pair with globally minimum similarity (maximum divergence)
    ///
    /// Ties break to the first minimal pair in enumeration order.
    pub async fn select_most_dissimilar(&mut self) -> Result<(Persona, Persona), SelectorError> {
        let pairs = self.similarity_matrix().await?;
        let mut best = &pairs[0];
        for pair in &pairs[1..] {
            if pair.score < best.score {
                best = pair;
            }
        }
        debug!(
            left = self.personas[best.i].name(),
            right = self.personas[best.j].name(),
            score = best.score,
            "selected most dissimilar pair"
        );
        Ok((self.personas[best.i].clone(), self.personas[best.j].clone()))
    }

    /// The pair with globally maximum similarity
    pub async fn select_most_similar(&mut self) -> Result<(Persona, Persona), SelectorError> {
        let pairs = self.similarity_matrix().await?;
        let mut best = &pairs[0];
        for pair in &pairs[1..] {
            if pair.score > best.score {
                best = pair;
            }
        }
        Ok((self.personas[best.i].clone(), self.personas[best.j].clone()))
    }

    /// Descriptor embeddings, computed on first use and cached
    async fn embeddings(&mut self) -> Result<&[Vec<f32>], SelectorError> {
        if self.embeddings.is_none() {
            let descriptors: Vec<String> = self
                .personas
                .iter()
                .map(|p| p.descriptor().to_string())
                .collect();
            let embeddings = self.gateway.embed(&descriptors).await?;
            self.embeddings = Some(embeddings);
        }
        // Populated just above if it was empty
        Ok(self.embeddings.as_deref().unwrap_or(&[]))
    }
}

/// Cosine similarity of two vectors; zero vectors score 0.0
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Mock embedding gateway with fixed per-text vectors
    #[derive(Debug)]
    struct MockEmbeddings {
        call_count: Mutex<usize>,
    }

    impl MockEmbeddings {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                call_count: Mutex::new(0),
            })
        }

        fn calls(&self) -> usize {
            *self.call_count.lock().unwrap()
        }
    }

    #[async_trait]
    impl EmbeddingGateway for MockEmbeddings {
        async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
            *self.call_count.lock().unwrap() += 1;
            Ok(texts
                .iter()
                .map(|t| match t.as_str() {
                    "software architecture" => vec![1.0, 0.0, 0.1],
                    "software engineering" => vec![0.9, 0.1, 0.1],
                    "cooking recipes" => vec![0.0, 1.0, 0.0],
                    _ => vec![0.5, 0.5, 0.5],
                })
                .collect())
        }
    }

    fn pool() -> Vec<Persona> {
        vec![
            Persona::new("Architect", "software architecture"),
            Persona::new("Engineer", "software engineering"),
            Persona::new("Chef", "cooking recipes"),
        ]
    }

    #[test]
    fn test_pool_of_one_rejected_without_embedding() {
        let gateway = MockEmbeddings::new();
        let result = PersonaSelector::new(
            Arc::clone(&gateway),
            vec![Persona::new("Solo", "alone")],
        );
        assert!(matches!(
            result.unwrap_err(),
            SelectorError::InsufficientPool(1)
        ));
        assert_eq!(gateway.calls(), 0);
    }

    #[tokio::test]
    async fn test_dissimilar_pair_includes_the_outlier() {
        let gateway = MockEmbeddings::new();
        let mut selector = PersonaSelector::new(gateway, pool()).unwrap();
        let (a, b) = selector.select_most_dissimilar().await.unwrap();
        let names = [a.name().to_string(), b.name().to_string()];
        assert!(names.contains(&"Chef".to_string()));
    }

    #[tokio::test]
    async fn test_similar_pair_is_the_close_pair() {
        let gateway = MockEmbeddings::new();
        let mut selector = PersonaSelector::new(gateway, pool()).unwrap();
        let (a, b) = selector.select_most_similar().await.unwrap();
        let mut names = [a.name(), b.name()];
        names.sort();
        assert_eq!(names, ["Architect", "Engineer"]);
    }

    #[tokio::test]
    async fn test_embeddings_computed_once() {
        let gateway = MockEmbeddings::new();
        let mut selector = PersonaSelector::new(Arc::clone(&gateway), pool()).unwrap();
        selector.select_most_dissimilar().await.unwrap();
        selector.select_most_similar().await.unwrap();
        selector.similarity_matrix().await.unwrap();
        assert_eq!(gateway.calls(), 1);
    }

    #[tokio::test]
    async fn test_two_personas_single_pair_both_ways() {
        let gateway = MockEmbeddings::new();
        let two = vec![
            Persona::new("Architect", "software architecture"),
            Persona::new("Chef", "cooking recipes"),
        ];
        let mut selector = PersonaSelector::new(gateway, two).unwrap();
        let dissimilar = selector.select_most_dissimilar().await.unwrap();
        let similar = selector.select_most_similar().await.unwrap();
        assert_eq!(dissimilar.0.name(), similar.0.name());
        assert_eq!(dissimilar.1.name(), similar.1.name());
    }

    #[tokio::test]
    async fn test_matrix_enumeration_order() {
        let gateway = MockEmbeddings::new();
        let mut selector = PersonaSelector::new(gateway, pool()).unwrap();
        let pairs = selector.similarity_matrix().await.unwrap();
        let indices: Vec<(usize, usize)> = pairs.iter().map(|p| (p.i, p.j)).collect();
        assert_eq!(indices, vec![(0, 1), (0, 2), (1, 2)]);
    }

    #[test]
    fn test_cosine_similarity_basics() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }
}
