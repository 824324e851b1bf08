//! Helpers for working within SQLite's limits.

/// Upper bound on bound parameters per `IN (...)` list.
///
/// SQLite rejects statements with more than `SQLITE_MAX_VARIABLE_NUMBER`
/// (999 on older builds) parameters; 500 leaves room for the other filters.
pub const SQLITE_MAX_PARAMS_CHUNK: usize = 500;

/// Splits `items` into slices small enough for one `IN (...)` clause each.
pub fn chunk_for_sqlite<T>(items: &[T]) -> impl Iterator<Item = &[T]> {
    items.chunks(SQLITE_MAX_PARAMS_CHUNK)
}
