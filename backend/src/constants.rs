// =============================================================================
// Skillswap Backend Constants
// =============================================================================
// This file contains all constants used throughout the backend to enable
// easy tuning and configuration from a single location.

// =============================================================================
// SERVER CONFIGURATION
// =============================================================================

/// Default server port if not specified in environment
pub const DEFAULT_SERVER_PORT: u16 = 3000;

// =============================================================================
// SESSION CONFIGURATION
// =============================================================================

/// Name of the HTTP-only cookie carrying the session token
pub const SESSION_COOKIE_NAME: &str = "skillswap_session";

/// Issuer claim on session tokens
pub const SESSION_ISSUER: &str = "skillswap";

/// Default session lifetime in hours
pub const DEFAULT_SESSION_TTL_HOURS: u64 = 168;

// =============================================================================
// REVIEWS
// =============================================================================

/// Lowest rating a review may carry
pub const MIN_RATING: i32 = 1;

/// Highest rating a review may carry
pub const MAX_RATING: i32 = 5;

// =============================================================================
// AVAILABILITY
// =============================================================================

/// Number of weekdays; a slot's `day_of_week` must be in `0..WEEK_DAYS`
pub const WEEK_DAYS: i16 = 7;

// =============================================================================
// EXTERNAL INTEGRATIONS
// =============================================================================

/// Zoom REST API base URL
pub const ZOOM_API_BASE: &str = "https://api.zoom.us/v2";

/// Zoom server-to-server OAuth token endpoint
pub const ZOOM_OAUTH_TOKEN_URL: &str = "https://zoom.us/oauth/token";

/// Google Calendar API base URL (events on the primary calendar)
pub const GOOGLE_CALENDAR_API_BASE: &str =
    "https://www.googleapis.com/calendar/v3/calendars/primary/events";

/// Timeout for outbound Zoom / Calendar calls, in seconds
pub const EXTERNAL_API_TIMEOUT_SECS: u64 = 10;
