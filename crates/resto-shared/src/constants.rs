//! Application-wide constants

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;
pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_PASSWORD_LENGTH: usize = 128;
pub const SESSION_TOKEN_BYTES: usize = 32;
pub const DEFAULT_SESSION_COOKIE: &str = "resto_session";
pub const MAX_SLUG_ATTEMPTS: u32 = 20;
pub const MAX_ORDER_LINES: usize = 50;
pub const MAX_LINE_QUANTITY: i32 = 99;
pub const DEFAULT_CURRENCY: &str = "USD";
