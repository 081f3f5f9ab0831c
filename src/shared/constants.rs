/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

// =============================================================================
// ROLE CONSTANTS
// =============================================================================

/// Official role - may move complaints through the status lifecycle
pub const ROLE_OFFICIAL: &str = "official";

// =============================================================================
// COMPLAINT CONSTANTS
// =============================================================================

/// Prefix added to the description of a complaint created by promoting the
/// oldest support of a deleted complaint
pub const PROMOTED_DESCRIPTION_PREFIX: &str = "[Auto-promoted] ";

/// Guest name given to a promoted complaint when the promoted support was
/// anonymous (a complaint must always carry an author)
pub const ANONYMOUS_SUPPORTER_NAME: &str = "Apoiador anônimo";
