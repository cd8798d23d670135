use std::collections::BTreeMap;
use std::fmt;

use super::resource_name::validate_domain;
use super::{parse_property, split_domain};
use crate::{NameError, ResourceName};

/// Selects a family of [`ResourceName`]s.
///
/// Syntax: `domain:key=value[,key=value...][,*]` or `domain:*`. A domain of
/// `*` matches every domain. Without the trailing `*` the name must carry
/// exactly the listed properties; with it, extra properties are allowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePattern {
    domain: Option<String>,
    required: BTreeMap<String, String>,
    property_wildcard: bool,
}

impl ResourcePattern {
    pub fn parse(input: &str) -> Result<Self, NameError> {
        let (domain, list) = split_domain(input)?;
        let domain = if domain == "*" {
            None
        } else {
            validate_domain(input, domain)?;
            Some(domain.to_string())
        };

        if list.is_empty() {
            return Err(NameError::malformed(input, "key property list is empty"));
        }

        let mut required = BTreeMap::new();
        let mut property_wildcard = false;
        for property in list.split(',') {
            if property == "*" {
                if property_wildcard {
                    return Err(NameError::malformed(input, "wildcard '*' appears twice"));
                }
                property_wildcard = true;
                continue;
            }
            if property_wildcard {
                return Err(NameError::malformed(
                    input,
                    "properties may not follow the '*' wildcard",
                ));
            }
            let (key, value) = parse_property(input, property)?;
            if required
                .insert(key.to_string(), value.to_string())
                .is_some()
            {
                return Err(NameError::malformed(input, format!("duplicate key {key:?}")));
            }
        }

        Ok(Self {
            domain,
            required,
            property_wildcard,
        })
    }

    /// Pattern selecting every resource of `type_name` in `domain`:
    /// `domain:type=<type_name>,*`.
    pub fn for_type(domain: &str, type_name: &str) -> Result<Self, NameError> {
        Self::parse(&format!("{domain}:type={type_name},*"))
    }

    pub fn matches(&self, name: &ResourceName) -> bool {
        if let Some(domain) = &self.domain {
            if domain != name.domain() {
                return false;
            }
        }
        let required_present = self
            .required
            .iter()
            .all(|(k, v)| name.key_property(k) == Some(v.as_str()));
        required_present && (self.property_wildcard || name.property_count() == self.required.len())
    }
}

impl fmt::Display for ResourcePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.domain.as_deref().unwrap_or("*"))?;
        let mut parts: Vec<String> = self
            .required
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect();
        if self.property_wildcard {
            parts.push("*".to_string());
        }
        f.write_str(&parts.join(","))
    }
}
