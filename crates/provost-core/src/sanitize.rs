//! Organization name sanitization.
//!
//! The sanitized form is an organization's unique key in the master
//! catalog and the suffix of its tenant store name, so the function
//! must be deterministic and idempotent: both the service and the
//! migration tool derive store addresses from it.

/// Prefix for every tenant store name.
pub const STORE_PREFIX: &str = "org_";

/// Normalize a human-entered organization name to its storage-safe form.
///
/// Lower-cases the input, collapses whitespace runs into a single
/// underscore, and strips everything that is not `[a-z0-9_]`. Total
/// function — degenerate input yields an empty string, which callers
/// reject before it reaches storage.
pub fn sanitize(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_whitespace = false;
    for c in name.trim().chars() {
        if c.is_whitespace() {
            in_whitespace = true;
            continue;
        }
        if in_whitespace {
            out.push('_');
            in_whitespace = false;
        }
        for lower in c.to_lowercase() {
            if lower.is_ascii_alphanumeric() || lower == '_' {
                out.push(lower);
            }
        }
    }
    out
}

/// Compute the tenant store name for an organization name.
///
/// Accepts either a display name or an already-sanitized name —
/// sanitization is idempotent.
pub fn tenant_store_name(name: &str) -> String {
    format!("{STORE_PREFIX}{}", sanitize(name))
}
