// =============================================================================
// CATEGORY TREE
// =============================================================================

/// Key of the transaction-scoped advisory lock serializing category tree writes.
/// Any stable i64 works as long as no other feature reuses it.
pub const CATEGORY_TREE_LOCK_KEY: i64 = 0x7669_6465_6f69_6101;

/// How many times a write is retried after losing a slug race
pub const SLUG_CONFLICT_RETRIES: usize = 1;

/// Name of the unique constraint backing category slugs (see migrations)
pub const CATEGORY_SLUG_CONSTRAINT: &str = "categories_slug_key";

// =============================================================================
// SLUGS
// =============================================================================

/// Width of the `slug` columns (see migrations)
pub const SLUG_MAX_LENGTH: usize = 200;

/// Longest generated base slug; the rest of the column is kept for `-N` suffixes
pub const SLUG_BASE_MAX_LENGTH: usize = 180;
