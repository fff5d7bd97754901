//! Tag maps attached to every taggable resource.

use crate::config::GeneratorConfig;

/// `Name`, then `GeneratedBy`, then the configured extra tags in order.
///
/// A later entry with the same key replaces the earlier value in place, so
/// `Name` and `GeneratedBy` always keep their leading positions.
pub fn tag_entries(name: &str, config: &GeneratorConfig) -> Vec<(String, String)> {
    let mut entries = vec![
        ("Name".to_string(), name.to_string()),
        ("GeneratedBy".to_string(), config.generated_by.clone()),
    ];

    for tag in &config.extra_tags {
        match entries.iter_mut().find(|(key, _)| *key == tag.key) {
            Some(existing) => existing.1 = tag.value.clone(),
            None => entries.push((tag.key.clone(), tag.value.clone())),
        }
    }

    entries
}
