pub mod json_fallback_log;
