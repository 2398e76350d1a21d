//! Worker-count resolution for batch runs.

/// Environment override for the worker count
pub const CONCURRENCY_ENV: &str = "CODERAG_CONCURRENCY";

const MAX_CONCURRENCY: usize = 64;

fn default_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

fn parse_concurrency(raw: Option<&str>, default_value: usize) -> usize {
    raw.map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(default_value)
        .clamp(1, MAX_CONCURRENCY)
}

/// Explicit request, then `CODERAG_CONCURRENCY`, then available parallelism;
/// always within `1..=64`.
pub fn resolve_concurrency(requested: Option<usize>) -> usize {
    if let Some(requested) = requested {
        return requested.clamp(1, MAX_CONCURRENCY);
    }
    let raw = std::env::var(CONCURRENCY_ENV).ok();
    parse_concurrency(raw.as_deref(), default_concurrency())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_concurrency_defaults_and_clamps() {
        let default_value = default_concurrency();
        assert_eq!(parse_concurrency(None, default_value), default_value);
        assert_eq!(parse_concurrency(Some(""), default_value), default_value);
        assert_eq!(parse_concurrency(Some("   "), default_value), default_value);
        assert_eq!(parse_concurrency(Some("2"), default_value), 2);
        assert_eq!(parse_concurrency(Some("0"), default_value), 1);
        assert_eq!(parse_concurrency(Some("999"), default_value), MAX_CONCURRENCY);
        assert_eq!(parse_concurrency(Some("abc"), default_value), default_value);
        assert_eq!(parse_concurrency(Some(" 5 "), default_value), 5);
    }

    #[test]
    fn explicit_request_wins_and_is_clamped() {
        assert_eq!(resolve_concurrency(Some(3)), 3);
        assert_eq!(resolve_concurrency(Some(0)), 1);
        assert_eq!(resolve_concurrency(Some(1_000)), MAX_CONCURRENCY);
        assert!(resolve_concurrency(None) >= 1);
    }
}
