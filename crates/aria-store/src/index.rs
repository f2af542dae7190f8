//! The in-memory retrieval index: chunks paired with their vectors.

use aria_core::{Chunk, Error, Result};

/// Complete, read-only pairing of chunks and vectors.
///
/// An `Index` can only be constructed from equally long sequences, so a
/// partially embedded index never exists.
#[derive(Debug, Clone)]
pub struct Index {
    chunks: Vec<Chunk>,
    vectors: Vec<Vec<f32>>,
}

impl Index {
    pub fn new(chunks: Vec<Chunk>, vectors: Vec<Vec<f32>>) -> Result<Self> {
        if chunks.len() != vectors.len() {
            return Err(Error::Internal(format!(
                "index needs one vector per chunk: {} chunks, {} vectors",
                chunks.len(),
                vectors.len()
            )));
        }
        Ok(Self { chunks, vectors })
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn vectors(&self) -> &[Vec<f32>] {
        &self.vectors
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Iterate `(chunk, vector)` pairs in index order.
    pub fn entries(&self) -> impl Iterator<Item = (&Chunk, &[f32])> {
        self.chunks
            .iter()
            .zip(self.vectors.iter().map(|v| v.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_mismatched_lengths() {
        let chunks = vec![Chunk::new("a", "doc.txt"), Chunk::new("b", "doc.txt")];
        let result = Index::new(chunks, vec![vec![1.0, 0.0]]);
        assert!(result.is_err());
    }

    #[test]
    fn test_entries_pair_in_order() {
        let chunks = vec![Chunk::new("a", "doc.txt"), Chunk::new("b", "doc.txt")];
        let index = Index::new(chunks, vec![vec![1.0], vec![2.0]]).unwrap();
        assert_eq!(index.len(), index.vectors().len());
        let pairs: Vec<_> = index.entries().map(|(c, v)| (c.text.clone(), v[0])).collect();
        assert_eq!(pairs, vec![("a".to_string(), 1.0), ("b".to_string(), 2.0)]);
    }
}
