// EstateHub - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "EstateHub";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "EstateHub";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Listings
// =============================================================================

/// Default number of cards shown per page of a listing view.
pub const DEFAULT_PAGE_SIZE: usize = 9;

/// Smallest configurable page size.
pub const MIN_PAGE_SIZE: usize = 1;

/// Largest configurable page size.
pub const MAX_PAGE_SIZE: usize = 100;

/// Bedroom count from which a plain number means "N or more".
///
/// The listing UI offers 1, 2, 3 and "4+"; anything at or above this bucket
/// is treated as a minimum rather than an exact count.
pub const BEDROOM_TOP_BUCKET: u32 = 4;

/// Number of featured property cards the assistant attaches to a reply.
pub const FEATURED_CARD_COUNT: usize = 3;

/// Number of service cards the assistant attaches to a reply.
pub const SERVICE_CARD_COUNT: usize = 3;

/// Number of entries in the "similar properties" strip of a detail view.
pub const SIMILAR_PROPERTY_COUNT: usize = 3;

// =============================================================================
// Dashboards
// =============================================================================

/// Latest users listed on the admin overview.
pub const ADMIN_LATEST_USERS: usize = 5;

/// Latest properties and offers listed on the admin overview.
pub const ADMIN_LATEST_LISTINGS: usize = 3;

/// Recent properties listed on the buyer overview.
pub const BUYER_RECENT_PROPERTIES: usize = 3;

// =============================================================================
// Assistant timing
// =============================================================================

/// Lower bound of the simulated "typing" delay before a reply is posted (ms).
pub const DEFAULT_REPLY_DELAY_MIN_MS: u64 = 1_000;

/// Upper bound of the simulated "typing" delay (ms).
pub const DEFAULT_REPLY_DELAY_MAX_MS: u64 = 2_000;

/// Hard upper bound for either configurable delay bound (ms).
pub const MAX_REPLY_DELAY_MS: u64 = 10_000;

/// How often a pending reply timer checks the cancel flag while sleeping (ms).
pub const REPLY_CANCEL_CHECK_INTERVAL_MS: u64 = 25;

/// How long the CLI waits for a reply before giving up (ms).
pub const CLI_REPLY_WAIT_MS: u64 = MAX_REPLY_DELAY_MS + 1_000;

// =============================================================================
// Remote API
// =============================================================================

/// Backend base URL used when config.toml does not override it.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// =============================================================================
// Configuration and persistence
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Session persistence file name (stored in the platform data directory).
pub const SESSION_FILE_NAME: &str = "session.json";
