pub mod email;
pub mod factory;
pub mod fallback;
pub mod payments;
pub mod rate_limit;
pub mod repositories;
