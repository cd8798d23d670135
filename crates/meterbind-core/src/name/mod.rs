//! Resource names (`domain:key=value,...`) and the patterns that select them.

mod pattern;
mod resource_name;

pub use pattern::ResourcePattern;
pub use resource_name::ResourceName;

/// Characters that may not appear in a domain.
const DOMAIN_FORBIDDEN: &[char] = &[':', ',', '=', '*', '?', '\n'];

/// Characters that may not appear in a property key.
const KEY_FORBIDDEN: &[char] = &[':', ',', '=', '*', '?', '\n'];

/// Characters that may not appear in an unquoted property value.
const VALUE_FORBIDDEN: &[char] = &[':', ',', '=', '*', '?', '"', '\n'];

/// Split `input` into domain and property list at the single `:`.
fn split_domain(input: &str) -> Result<(&str, &str), crate::NameError> {
    input
        .split_once(':')
        .ok_or_else(|| crate::NameError::malformed(input, "missing ':' after domain"))
}

/// Parse one `key=value` property, validating both halves.
fn parse_property<'a>(
    input: &str,
    property: &'a str,
) -> Result<(&'a str, &'a str), crate::NameError> {
    let (key, value) = property.split_once('=').ok_or_else(|| {
        crate::NameError::malformed(input, format!("property {property:?} has no '='"))
    })?;
    if key.is_empty() {
        return Err(crate::NameError::malformed(input, "empty property key"));
    }
    if let Some(c) = key.chars().find(|c| KEY_FORBIDDEN.contains(c)) {
        return Err(crate::NameError::malformed(
            input,
            format!("invalid character {c:?} in key {key:?}"),
        ));
    }
    if let Some(c) = value.chars().find(|c| VALUE_FORBIDDEN.contains(c)) {
        return Err(crate::NameError::malformed(
            input,
            format!("invalid character {c:?} in value of {key:?}"),
        ));
    }
    Ok((key, value))
}
