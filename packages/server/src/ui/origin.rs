//! Origin verification for WebSocket upgrades.

/// Decide whether an upgrade carrying `origin` may proceed.
///
/// `allowed` of `None` or `"*"` accepts everything. A request without an
/// `Origin` header is a non-browser client and is accepted. Otherwise the
/// header must match `allowed` exactly (ignoring a trailing slash).
pub fn is_origin_allowed(allowed: Option<&str>, origin: Option<&str>) -> bool {
    let Some(allowed) = allowed.map(str::trim).filter(|a| !a.is_empty() && *a != "*") else {
        return true;
    };
    match origin {
        None => true,
        Some(origin) => origin.trim_end_matches('/') == allowed.trim_end_matches('/'),
    }
}
