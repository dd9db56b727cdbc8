//! The inventory service's codeowners update payload.

use crate::aggregate::OwnershipMap;
use serde::Serialize;

/// The kind of resource the codeowners object is attached to.
pub const PARENT_KIND: &str = "Project";

/// Identifies the repository and project the payload belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadTarget {
    /// Repository name, used as the object name.
    pub repository: String,
    /// UUID of the parent project.
    pub project_uuid: String,
    /// Tenant namespace.
    pub namespace: String,
}

impl PayloadTarget {
    /// Creates a new target.
    pub fn new(
        repository: impl Into<String>,
        project_uuid: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Self {
        Self {
            repository: repository.into(),
            project_uuid: project_uuid.into(),
            namespace: namespace.into(),
        }
    }
}

/// Object metadata.
#[derive(Debug, Clone, Serialize)]
pub struct PayloadMeta {
    /// Human-readable summary, `Code owner data for <repository>`.
    pub description: String,
    /// Object name; the repository name.
    pub name: String,
    /// Kind of the parent resource, always [`PARENT_KIND`].
    pub parent_kind: &'static str,
    /// UUID of the parent project.
    pub parent_uuid: String,
}

/// Object spec: the directory patterns.
#[derive(Debug, Clone, Serialize)]
pub struct PayloadSpec<'a> {
    /// Declarations per directory, in discovery order.
    pub patterns: &'a OwnershipMap,
}

/// Tenant metadata.
#[derive(Debug, Clone, Serialize)]
pub struct TenantMeta {
    /// Namespace the object is created in.
    pub namespace: String,
}

/// The request body sent to the inventory service.
///
/// Serializes to:
///
/// ```json
/// {
///   "meta": { "description": "...", "name": "...", "parent_kind": "Project", "parent_uuid": "..." },
///   "spec": { "patterns": { "<dir>": { "labels": [...], "owners": [...] } } },
///   "tenant_meta": { "namespace": "..." }
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct CodeOwnersPayload<'a> {
    /// Object metadata.
    pub meta: PayloadMeta,
    /// Directory patterns.
    pub spec: PayloadSpec<'a>,
    /// Tenant the request is scoped to.
    pub tenant_meta: TenantMeta,
}

impl<'a> CodeOwnersPayload<'a> {
    /// Builds the payload for an aggregated ownership map.
    pub fn new(target: &PayloadTarget, patterns: &'a OwnershipMap) -> Self {
        Self {
            meta: PayloadMeta {
                description: format!("Code owner data for {}", target.repository),
                name: target.repository.clone(),
                parent_kind: PARENT_KIND,
                parent_uuid: target.project_uuid.clone(),
            },
            spec: PayloadSpec { patterns },
            tenant_meta: TenantMeta {
                namespace: target.namespace.clone(),
            },
        }
    }

    /// Renders the payload as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::OwnershipEntry;

    #[test]
    fn payload_shape() {
        let mut map = OwnershipMap::new();
        map.insert(
            "svc/api",
            OwnershipEntry::from_pairs([("jira-project", "PROJ"), ("jira-component", "api")]),
        );
        let target = PayloadTarget::new("monorepo", "0000-1111", "acme.prod");

        let json = serde_json::to_value(CodeOwnersPayload::new(&target, &map)).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "meta": {
                    "description": "Code owner data for monorepo",
                    "name": "monorepo",
                    "parent_kind": "Project",
                    "parent_uuid": "0000-1111"
                },
                "spec": {
                    "patterns": {
                        "svc/api": {
                            "labels": ["jira-project", "jira-component"],
                            "owners": ["PROJ", "api"]
                        }
                    }
                },
                "tenant_meta": { "namespace": "acme.prod" }
            })
        );
    }

    #[test]
    fn empty_map_serializes_as_empty_object() {
        let map = OwnershipMap::new();
        let target = PayloadTarget::new("repo", "uuid", "ns");
        let json = serde_json::to_value(CodeOwnersPayload::new(&target, &map)).unwrap();
        assert_eq!(json["spec"]["patterns"], serde_json::json!({}));
    }

    #[test]
    fn pretty_json_keeps_directory_order() {
        let mut map = OwnershipMap::new();
        map.insert("zeta", OwnershipEntry::from_pairs([("jira-project", "Z")]));
        map.insert("alpha", OwnershipEntry::from_pairs([("jira-project", "A")]));
        let target = PayloadTarget::new("repo", "uuid", "ns");

        let text = CodeOwnersPayload::new(&target, &map).to_json_pretty().unwrap();

        let zeta = text.find("\"zeta\"").unwrap();
        let alpha = text.find("\"alpha\"").unwrap();
        assert!(zeta < alpha);
    }
}
