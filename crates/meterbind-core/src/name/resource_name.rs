use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::{parse_property, split_domain, DOMAIN_FORBIDDEN};
use crate::NameError;

/// Name of a management resource: a domain plus an unordered set of
/// key properties.
///
/// Properties are kept sorted, so two names built from the same properties
/// in a different order compare and hash equal. `Display` renders the
/// canonical `domain:k1=v1,k2=v2` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceName {
    domain: String,
    properties: BTreeMap<String, String>,
}

impl ResourceName {
    /// Parse `domain:key=value[,key=value...]`.
    pub fn parse(input: &str) -> Result<Self, NameError> {
        let (domain, list) = split_domain(input)?;
        validate_domain(input, domain)?;
        if list.is_empty() {
            return Err(NameError::malformed(input, "key property list is empty"));
        }

        let mut properties = BTreeMap::new();
        for property in list.split(',') {
            let (key, value) = parse_property(input, property)?;
            if properties
                .insert(key.to_string(), value.to_string())
                .is_some()
            {
                return Err(NameError::malformed(
                    input,
                    format!("duplicate key {key:?}"),
                ));
            }
        }

        Ok(Self {
            domain: domain.to_string(),
            properties,
        })
    }

    /// Build a name from parts, applying the same validation as [`parse`](Self::parse).
    pub fn new<K, V>(
        domain: &str,
        properties: impl IntoIterator<Item = (K, V)>,
    ) -> Result<Self, NameError>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let list: Vec<String> = properties
            .into_iter()
            .map(|(k, v)| format!("{}={}", k.as_ref(), v.as_ref()))
            .collect();
        Self::parse(&format!("{domain}:{}", list.join(",")))
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Value of one key property, if present.
    pub fn key_property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// All key properties, sorted by key.
    pub fn properties(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn property_count(&self) -> usize {
        self.properties.len()
    }
}

pub(super) fn validate_domain(input: &str, domain: &str) -> Result<(), NameError> {
    if let Some(c) = domain.chars().find(|c| DOMAIN_FORBIDDEN.contains(c)) {
        return Err(NameError::malformed(
            input,
            format!("invalid character {c:?} in domain"),
        ));
    }
    Ok(())
}

impl fmt::Display for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.domain)?;
        for (i, (k, v)) in self.properties.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{k}={v}")?;
        }
        Ok(())
    }
}

impl FromStr for ResourceName {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
