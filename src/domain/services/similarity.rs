/// Relevance cutoff for the research path. The consumer search path ranks by
/// descending similarity instead of thresholding; the two policies are
/// deliberately distinct.
pub const RELEVANCE_THRESHOLD: f32 = 0.85;

/// Cosine similarity between two vectors, in [-1, 1].
/// Returns 0.0 for mismatched or zero-magnitude inputs.
pub fn cosine(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Collapses runs of whitespace (newlines included) to single spaces and
/// trims, matching what the embedding provider expects.
pub fn normalize_query(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
