//! Helpers for SQLite statement limits.

/// Maximum number of bound parameters used for one `IN (...)` query.
///
/// SQLite caps bound parameters per statement (historically 999), so larger
/// ticker lists are split with [`chunk_for_sqlite`].
pub const SQLITE_MAX_PARAMS_CHUNK: usize = 500;

/// Splits `items` into slices of at most [`SQLITE_MAX_PARAMS_CHUNK`].
pub fn chunk_for_sqlite<T>(items: &[T]) -> impl Iterator<Item = &[T]> {
    items.chunks(SQLITE_MAX_PARAMS_CHUNK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunks_respect_limit() {
        let tickers: Vec<String> = (0..1_201).map(|i| format!("T{}.AX", i)).collect();
        let sizes: Vec<usize> = chunk_for_sqlite(&tickers).map(|c| c.len()).collect();
        assert_eq!(sizes, vec![500, 500, 201]);
    }

    #[test]
    fn test_empty_input_yields_no_chunks() {
        let empty: Vec<String> = Vec::new();
        assert_eq!(chunk_for_sqlite(&empty).count(), 0);
    }
}
