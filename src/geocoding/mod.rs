pub mod cache;
pub mod nominatim;
pub mod rate_limiter;
