/// Payment mode applied when the inbound event does not specify one.
pub const DEFAULT_PAYMENT_MODE: &str = "banktransfer";

/// Application-level error code the accounting service returns for an
/// invalid or expired access token, alongside or instead of HTTP 401.
pub const INVALID_TOKEN_CODE: i64 = 57;

/// Date format the accounting service expects on payment records.
pub const PAYMENT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Default accounting API base URL.
pub const DEFAULT_API_BASE_URL: &str = "https://www.zohoapis.com/books/v3";

/// Default identity provider origin for token refresh.
pub const DEFAULT_AUTH_BASE_URL: &str = "https://accounts.zoho.com";

/// Path of the token refresh endpoint under the auth origin.
pub const TOKEN_ENDPOINT_PATH: &str = "/oauth/v2/token";

/// Timeout applied to every outbound call.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;
