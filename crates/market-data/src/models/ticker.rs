/// Default exchange suffix for bare codes (Australian Securities Exchange).
pub const DEFAULT_EXCHANGE_SUFFIX: &str = ".AX";

/// Normalize user-entered ticker text into an exchange-qualified symbol.
///
/// The input is trimmed and upper-cased. A bare code (no `.`) gets
/// `default_suffix` appended; already-qualified symbols such as `BHP.AX` or
/// `XYZ.NZ` are left as they are. Returns `None` for blank input.
pub fn normalize_ticker(raw: &str, default_suffix: &str) -> Option<String> {
    let ticker = raw.trim().to_uppercase();
    if ticker.is_empty() {
        return None;
    }
    if ticker.contains('.') || default_suffix.is_empty() {
        return Some(ticker);
    }
    Some(format!("{}{}", ticker, default_suffix.to_uppercase()))
}
