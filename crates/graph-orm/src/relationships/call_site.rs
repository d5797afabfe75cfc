//! Call-Site Inference - Default relation names, keys and edge types
//!
//! A `CallSite` names the accessor that is defining a relationship and the
//! entity type it is defined on. It is built fresh for every definition call
//! and consumed by the builder; nothing here is cached.

use std::fmt;

/// Accessor name plus owning entity identity for one definition call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    accessor: String,
    entity: String,
}

impl CallSite {
    pub fn new(accessor: impl Into<String>, entity: impl Into<String>) -> Self {
        Self {
            accessor: accessor.into(),
            entity: entity.into(),
        }
    }

    /// Name of the accessor defining the relationship (`posts`)
    pub fn accessor(&self) -> &str {
        &self.accessor
    }

    /// Identity of the entity type the accessor lives on
    pub fn entity(&self) -> &str {
        &self.entity
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.entity, self.accessor)
    }
}

/// Treats empty strings the same as absent arguments
pub(crate) fn explicit(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Relation name: explicit value, else the accessor name
pub fn infer_relation_name(explicit_name: Option<&str>, site: &CallSite) -> String {
    explicit(explicit_name)
        .unwrap_or(site.accessor())
        .to_string()
}

/// Foreign key for single-owner/single-owned shapes: explicit value, else
/// the calling entity identity upper-cased. Graph edges are anchored on
/// labels, so the identity is used directly rather than a `<name>_id` column.
pub fn infer_foreign_key(explicit_key: Option<&str>, site: &CallSite) -> String {
    match explicit(explicit_key) {
        Some(key) => key.to_string(),
        None => site.entity().to_uppercase(),
    }
}

/// Edge type for collection and polymorphic shapes: explicit value, else
/// the relation name upper-cased
pub fn infer_edge_type(explicit_type: Option<&str>, relation: &str) -> String {
    match explicit(explicit_type) {
        Some(edge_type) => edge_type.to_string(),
        None => relation.to_uppercase(),
    }
}

/// `imageable` for `imageable`, `commentable_item` for `commentableItem`.
/// Every capital after the first character starts a new word, so acronyms
/// are split letter by letter (`HTMLPage` becomes `h_t_m_l_page`).
pub fn snake_case(name: &str) -> String {
    let mut result = String::with_capacity(name.len() + 4);

    for (i, c) in name.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                result.push('_');
            }
            result.extend(c.to_lowercase());
        } else {
            result.push(c);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> CallSite {
        CallSite::new("posts", "User")
    }

    #[test]
    fn test_relation_name_defaults_to_accessor() {
        assert_eq!(infer_relation_name(None, &site()), "posts");
        assert_eq!(infer_relation_name(Some(""), &site()), "posts");
    }

    #[test]
    fn test_explicit_relation_name_is_kept() {
        assert_eq!(infer_relation_name(Some("articles"), &site()), "articles");
    }

    #[test]
    fn test_foreign_key_is_uppercased_identity() {
        assert_eq!(infer_foreign_key(None, &site()), "USER");
        assert_eq!(
            infer_foreign_key(None, &CallSite::new("account", "App::Models::User")),
            "APP::MODELS::USER"
        );
        assert_eq!(infer_foreign_key(Some("OWNED_BY"), &site()), "OWNED_BY");
    }

    #[test]
    fn test_edge_type_defaults_to_uppercased_relation() {
        assert_eq!(infer_edge_type(None, "posts"), "POSTS");
        assert_eq!(infer_edge_type(Some("WROTE"), "posts"), "WROTE");
        assert_eq!(infer_edge_type(None, "straße"), "STRASSE");
    }

    #[test]
    fn test_snake_case() {
        assert_eq!(snake_case("imageable"), "imageable");
        assert_eq!(snake_case("commentableItem"), "commentable_item");
        assert_eq!(snake_case("HTMLPage"), "h_t_m_l_page");
        assert_eq!(snake_case("Imageable"), "imageable");
        assert_eq!(snake_case("tag2Owner"), "tag2_owner");
    }

    #[test]
    fn test_call_site_display() {
        assert_eq!(site().to_string(), "User::posts");
    }
}
