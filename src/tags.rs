//! Tag-based service discovery.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::container::Container;
use crate::error::{DiError, DiResult};
use crate::registration::{AnyArc, ServiceInfo};

/// How a set of requested tags must match a service's tag set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagMode {
    /// Every requested tag must be present (AND).
    All,
    /// At least one requested tag must be present (OR).
    Any,
}

impl fmt::Display for TagMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TagMode::All => "AND",
            TagMode::Any => "OR",
        })
    }
}

fn validate_tags(tags: &[&str]) -> DiResult<()> {
    if tags.is_empty() {
        return Err(DiError::InvalidArgument(
            "tags must not be empty; an empty query does not mean 'match everything'".to_string(),
        ));
    }
    if tags.iter().any(|t| t.is_empty()) {
        return Err(DiError::InvalidArgument("empty tag in query".to_string()));
    }
    Ok(())
}

fn matches(service_tags: &BTreeSet<String>, tags: &[&str], mode: TagMode) -> bool {
    match mode {
        TagMode::All => tags.iter().all(|t| service_tags.contains(*t)),
        TagMode::Any => tags.iter().any(|t| service_tags.contains(*t)),
    }
}

impl Container {
    /// Returns registration metadata for every service matching the tag
    /// query, sorted by name. Matching is exact and case-sensitive, and
    /// discovery never forces instantiation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use keyed_di::{Container, TagMode};
    ///
    /// let di = Container::default();
    /// di.register("stripe")
    ///     .factory(|_| Ok(String::from("stripe")))
    ///     .with_tags(["payment", "external"])
    ///     .as_singleton()
    ///     .unwrap();
    /// di.register("ledger")
    ///     .factory(|_| Ok(String::from("ledger")))
    ///     .with_tag("payment")
    ///     .as_singleton()
    ///     .unwrap();
    ///
    /// let both = di.services_by_tags(&["payment"], TagMode::All).unwrap();
    /// assert_eq!(both.len(), 2);
    ///
    /// let external = di
    ///     .services_by_tags(&["payment", "external"], TagMode::All)
    ///     .unwrap();
    /// assert_eq!(external.len(), 1);
    /// assert_eq!(external[0].name, "stripe");
    /// ```
    pub fn services_by_tags(&self, tags: &[&str], mode: TagMode) -> DiResult<Vec<ServiceInfo>> {
        validate_tags(tags)?;
        let mut found: Vec<ServiceInfo> = self
            .registrations()
            .into_iter()
            .filter(|reg| matches(&reg.tags, tags, mode))
            .map(|reg| reg.info())
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(found)
    }

    /// Name-only projection of [`services_by_tags`](Self::services_by_tags).
    pub fn service_names_by_tags(&self, tags: &[&str], mode: TagMode) -> DiResult<Vec<String>> {
        Ok(self
            .services_by_tags(tags, mode)?
            .into_iter()
            .map(|info| info.name)
            .collect())
    }

    /// Resolves every service matching the tag query (forcing
    /// instantiation) and returns instance+metadata pairs.
    pub fn resolve_services_by_tags(
        &self,
        tags: &[&str],
        mode: TagMode,
        scope: Option<&str>,
    ) -> DiResult<Vec<(ServiceInfo, AnyArc)>> {
        let found = self.services_by_tags(tags, mode)?;
        found
            .into_iter()
            .map(|info| {
                let instance = self.resolve_in(&info.name, scope)?;
                Ok((info, instance))
            })
            .collect()
    }

    /// The sorted, deduplicated union of every tag across every
    /// registration.
    pub fn all_tags(&self) -> Vec<String> {
        let mut all = BTreeSet::new();
        for reg in self.registrations() {
            all.extend(reg.tags.iter().cloned());
        }
        all.into_iter().collect()
    }

    /// A mapping from each tag to the sorted list of service names
    /// carrying it; a service with N tags appears under N keys.
    pub fn services_by_tag(&self) -> BTreeMap<String, Vec<String>> {
        let mut index: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for reg in self.registrations() {
            for tag in &reg.tags {
                index.entry(tag.clone()).or_default().push(reg.name.clone());
            }
        }
        for names in index.values_mut() {
            names.sort();
        }
        index
    }
}
