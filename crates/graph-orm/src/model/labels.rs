//! Label Resolver - Derives the node label set of an entity type
//!
//! Resolution order:
//!
//! 1. an explicit, non-empty label list, returned verbatim;
//! 2. a joined label string (explicit, or the legacy table name when no
//!    label is configured) split on the label separator;
//! 3. the type identity with namespace separators removed.
//!
//! The result is never empty.

use super::entity::{EntityType, LabelConfig};
use crate::config::OrmConfig;

/// Resolve labels using the default conventions
pub fn resolve_labels(entity: &EntityType) -> Vec<String> {
    resolve_labels_with(entity, &OrmConfig::default())
}

/// Resolve labels using the separators of `config`
pub fn resolve_labels_with(entity: &EntityType, config: &OrmConfig) -> Vec<String> {
    let configured = entity.label().filter(|label| !label.is_empty());

    if let Some(LabelConfig::List(labels)) = configured {
        return labels.clone();
    }

    let joined = match configured {
        Some(LabelConfig::Joined(label)) => Some(label.as_str()),
        _ => entity.table().filter(|table| !table.is_empty()),
    };

    if let Some(joined) = joined {
        let labels = split_labels(joined, config.label_separator);
        if !labels.is_empty() {
            return labels;
        }
    }

    vec![entity.identity().replace(config.namespace_separator.as_str(), "")]
}

/// Split a joined label string, dropping empty segments
pub fn split_labels(joined: &str, separator: char) -> Vec<String> {
    joined
        .split(separator)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

/// Compose labels back into the joined form (`User:Fan`)
pub fn join_labels(labels: &[String], separator: char) -> String {
    labels.join(separator.to_string().as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_list_returned_verbatim() {
        let entity = EntityType::new("App::Models::User").with_label(vec!["Person", "User", "Person"]);
        assert_eq!(resolve_labels(&entity), vec!["Person", "User", "Person"]);
    }

    #[test]
    fn test_joined_label_is_split() {
        let entity = EntityType::new("App::Models::User").with_label("User:Fan");
        assert_eq!(resolve_labels(&entity), vec!["User", "Fan"]);
    }

    #[test]
    fn test_empty_segments_discarded() {
        let entity = EntityType::new("App::Models::User").with_label(":User::Fan:");
        assert_eq!(resolve_labels(&entity), vec!["User", "Fan"]);
    }

    #[test]
    fn test_legacy_table_fallback() {
        let entity = EntityType::new("App::Models::User").with_table("Member:Admin");
        assert_eq!(resolve_labels(&entity), vec!["Member", "Admin"]);
    }

    #[test]
    fn test_label_wins_over_table() {
        let entity = EntityType::new("App::Models::User")
            .with_table("users")
            .with_label("Person");
        assert_eq!(resolve_labels(&entity), vec!["Person"]);
    }

    #[test]
    fn test_empty_list_falls_back_to_table() {
        let entity = EntityType::new("App::Models::User")
            .with_label(Vec::<String>::new())
            .with_table("Member");
        assert_eq!(resolve_labels(&entity), vec!["Member"]);
    }

    #[test]
    fn test_identity_fallback_strips_namespace() {
        let entity = EntityType::new("App::Models::WordsUp");
        assert_eq!(resolve_labels(&entity), vec!["AppModelsWordsUp"]);
    }

    #[test]
    fn test_separator_only_label_uses_identity() {
        let entity = EntityType::new("Blog::Post").with_label(":::");
        assert_eq!(resolve_labels(&entity), vec!["BlogPost"]);
    }

    #[test]
    fn test_custom_separators() {
        let config = OrmConfig {
            label_separator: '|',
            namespace_separator: "\\".to_string(),
            ..Default::default()
        };
        let joined = EntityType::new("App\\User").with_label("User|Fan");
        assert_eq!(resolve_labels_with(&joined, &config), vec!["User", "Fan"]);

        let bare = EntityType::new("App\\User");
        assert_eq!(resolve_labels_with(&bare, &config), vec!["AppUser"]);
    }

    #[test]
    fn test_join_labels() {
        let labels = vec!["User".to_string(), "Fan".to_string()];
        assert_eq!(join_labels(&labels, ':'), "User:Fan");
    }
}
