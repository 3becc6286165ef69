//! Which formats may be converted into which.
//!
//! Formats are grouped into families; a conversion is only allowed between an
//! input and a target of the same family.

use std::collections::{BTreeMap, BTreeSet};

pub const VIDEO: &str = "video";

/// Which side of a conversion a format token is looked up for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatRole {
    Input,
    Target,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct FamilyFormats {
    inputs: BTreeSet<String>,
    targets: BTreeSet<String>,
}

impl FamilyFormats {
    fn for_role(&self, role: FormatRole) -> &BTreeSet<String> {
        match role {
            FormatRole::Input => &self.inputs,
            FormatRole::Target => &self.targets,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatRegistry {
    families: BTreeMap<String, FamilyFormats>,
}

impl Default for FormatRegistry {
    fn default() -> Self {
        FormatRegistry::builder()
            .family(VIDEO, ["mp4", "mov", "mkv", "m4a"], ["mp3", "mp4", "mov", "m4a"])
            .build()
    }
}

impl FormatRegistry {
    pub fn builder() -> FormatRegistryBuilder {
        FormatRegistryBuilder::default()
    }

    pub fn is_valid_input(&self, token: &str, family: &str) -> bool {
        self.contains(token, family, FormatRole::Input)
    }

    pub fn is_valid_target(&self, token: &str, family: &str) -> bool {
        self.contains(token, family, FormatRole::Target)
    }

    /// First family (alphabetically) that lists `token` for `role`.
    pub fn family_of(&self, token: &str, role: FormatRole) -> Option<&str> {
        self.families
            .iter()
            .find(|(_, formats)| formats.for_role(role).contains(token))
            .map(|(family, _)| family.as_str())
    }

    /// Whether any family accepts `token` as an input.
    pub fn accepts_input(&self, token: &str) -> bool {
        self.family_of(token, FormatRole::Input).is_some()
    }

    /// Whether any family accepts `token` as a target.
    pub fn accepts_target(&self, token: &str) -> bool {
        self.family_of(token, FormatRole::Target).is_some()
    }

    /// The family in which `input -> target` is a permitted conversion.
    pub fn shared_family(&self, input: &str, target: &str) -> Option<&str> {
        self.families
            .iter()
            .find(|(_, formats)| formats.inputs.contains(input) && formats.targets.contains(target))
            .map(|(family, _)| family.as_str())
    }

    pub fn families(&self) -> impl Iterator<Item = &str> {
        self.families.keys().map(String::as_str)
    }

    fn contains(&self, token: &str, family: &str, role: FormatRole) -> bool {
        self.families
            .get(family)
            .is_some_and(|formats| formats.for_role(role).contains(token))
    }
}

#[derive(Debug, Default)]
pub struct FormatRegistryBuilder {
    families: BTreeMap<String, FamilyFormats>,
}

impl FormatRegistryBuilder {
    /// Adds formats to `family`. Tokens are lower-cased and deduplicated, and
    /// repeated calls for the same family extend it.
    pub fn family<I, T>(mut self, family: &str, inputs: I, targets: T) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        T: IntoIterator,
        T::Item: AsRef<str>,
    {
        let entry = self.families.entry(family.to_lowercase()).or_default();
        entry.inputs.extend(inputs.into_iter().map(normalize));
        entry.targets.extend(targets.into_iter().map(normalize));
        self
    }

    pub fn build(self) -> FormatRegistry {
        FormatRegistry {
            families: self.families,
        }
    }
}

fn normalize(token: impl AsRef<str>) -> String {
    token.as_ref().trim().trim_start_matches('.').to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_audio() -> FormatRegistry {
        FormatRegistry::builder()
            .family(VIDEO, ["mp4", "mov", "mkv", "m4a"], ["mp3", "mp4", "mov", "m4a"])
            .family("audio", ["wav"], ["flac"])
            .build()
    }

    #[test]
    fn default_table_matches_video_family() {
        let registry = FormatRegistry::default();

        for token in ["mp4", "mov", "mkv", "m4a"] {
            assert!(registry.is_valid_input(token, VIDEO), "{token}");
        }
        for token in ["mp3", "mp4", "mov", "m4a"] {
            assert!(registry.is_valid_target(token, VIDEO), "{token}");
        }
        assert!(!registry.is_valid_input("mp3", VIDEO));
        assert!(!registry.is_valid_target("mkv", VIDEO));
        assert_eq!(registry.families().collect::<Vec<_>>(), vec![VIDEO]);
    }

    #[test]
    fn builder_normalizes_and_deduplicates() {
        let registry = FormatRegistry::builder()
            .family("Video", ["MP4", "mp4", ".mov"], ["Mp3"])
            .family("video", ["mov"], ["mp3"])
            .build();

        assert_eq!(registry, FormatRegistry::builder().family(VIDEO, ["mp4", "mov"], ["mp3"]).build());
    }

    #[test]
    fn lookups_are_literal_against_the_table() {
        let registry = FormatRegistry::default();

        assert!(!registry.accepts_input("MOV"));
        assert!(!registry.accepts_input(" mov"));
        assert!(registry.accepts_input("mov"));
    }

    #[test]
    fn unknown_family_or_token_is_not_found() {
        let registry = FormatRegistry::default();

        assert!(!registry.is_valid_input("mov", "audio"));
        assert_eq!(registry.family_of("xyz", FormatRole::Input), None);
        assert_eq!(registry.family_of("mp3", FormatRole::Input), None);
        assert_eq!(registry.family_of("mp3", FormatRole::Target), Some(VIDEO));
    }

    #[test]
    fn shared_family_requires_both_sides_in_one_family() {
        let registry = with_audio();

        assert_eq!(registry.shared_family("mov", "mp4"), Some(VIDEO));
        assert_eq!(registry.shared_family("wav", "flac"), Some("audio"));
        assert!(registry.accepts_input("mov") && registry.accepts_target("flac"));
        assert_eq!(registry.shared_family("mov", "flac"), None);
        assert_eq!(registry.shared_family("wav", "mp4"), None);
    }
}
