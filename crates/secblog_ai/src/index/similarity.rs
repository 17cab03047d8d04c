pub(crate) fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Cosine similarity from precomputed norms. Zero when either side has no
/// magnitude.
pub(crate) fn cosine(query: &[f32], entry: &[f32], query_norm: f32, entry_norm: f32) -> f32 {
    debug_assert_eq!(query.len(), entry.len());
    if query_norm == 0.0 || entry_norm == 0.0 {
        return 0.0;
    }
    let dot: f32 = query.iter().zip(entry).map(|(q, e)| q * e).sum();
    dot / (query_norm * entry_norm)
}
