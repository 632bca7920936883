//! Registry of interactable zones.
//!
//! Scene meshes are matched to logical zones by name fragment: an entry
//! matches when the (lower-cased) node name *contains* its fragment. The
//! table is ordered and the first match wins, so more specific fragments
//! belong earlier. Several fragments may map to the same section - a
//! bookshelf and a single book both open Skills.

use cgmath::Vector3;

use crate::content::SectionId;

/// One clickable zone: a name fragment, the section it opens, and where the
/// camera should sit relative to the object while the section is shown.
#[derive(Debug, Clone, Copy)]
pub struct Interactable {
    /// Lower-case fragment matched against scene node names.
    pub fragment: &'static str,
    pub section: SectionId,
    pub offset: Vector3<f32>,
}

/// Name-based resolution, kept behind a trait so an exact-tag resolver can
/// replace the substring one without touching the callers.
pub trait ResolveByName {
    fn resolve(&self, name: &str) -> Option<&Interactable>;
}

/// Ordered lookup table of [`Interactable`] entries.
pub struct InteractableRegistry {
    entries: Vec<Interactable>,
}

impl InteractableRegistry {
    pub fn new(entries: Vec<Interactable>) -> Self {
        debug_assert!(
            entries.iter().all(|e| e.fragment == e.fragment.to_lowercase()),
            "fragments must be stored lower-case"
        );
        Self { entries }
    }

    /// The room's zone table. Order matters: resolution is first-match.
    pub fn portfolio() -> Self {
        const fn entry(
            fragment: &'static str,
            section: SectionId,
            offset: (f32, f32, f32),
        ) -> Interactable {
            Interactable {
                fragment,
                section,
                offset: Vector3::new(offset.0, offset.1, offset.2),
            }
        }

        Self::new(vec![
            // Secondary PC
            entry("pc_2", SectionId::WorkExperience, (3.0, 3.0, 3.0)),
            entry("second_pc", SectionId::WorkExperience, (3.0, 3.0, 3.0)),
            // TV
            entry("tv", SectionId::GameProject, (0.0, 0.0, 4.0)),
            entry("game", SectionId::GameProject, (0.0, 0.0, 4.0)),
            // Bookshelf
            entry("bookshelf", SectionId::Skills, (0.0, 2.0, 6.0)),
            entry("book", SectionId::Skills, (0.0, 2.0, 6.0)),
            // Posters
            entry("poster", SectionId::Projects, (2.0, 0.0, 2.0)),
            entry("frame", SectionId::Projects, (2.0, 0.0, 2.0)),
            // Main PC
            entry("pc_1", SectionId::AboutMe, (4.0, 3.0, 4.0)),
            entry("monitor", SectionId::AboutMe, (4.0, 3.0, 4.0)),
            entry("laptop", SectionId::AboutMe, (4.0, 3.0, 4.0)),
            entry("computer", SectionId::AboutMe, (4.0, 3.0, 4.0)),
            entry("desktop", SectionId::AboutMe, (4.0, 3.0, 4.0)),
            entry("keyboard", SectionId::AboutMe, (4.0, 3.0, 4.0)),
            entry("mac", SectionId::AboutMe, (4.0, 3.0, 4.0)),
        ])
    }

    pub fn entries(&self) -> &[Interactable] {
        &self.entries
    }
}

impl ResolveByName for InteractableRegistry {
    fn resolve(&self, name: &str) -> Option<&Interactable> {
        if name.is_empty() {
            return None;
        }
        let name = name.to_lowercase();
        self.entries.iter().find(|e| name.contains(e.fragment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_are_case_insensitive_substrings() {
        let registry = InteractableRegistry::portfolio();
        let hit = registry.resolve("TV_Screen_01").expect("tv should match");
        assert_eq!(hit.section, SectionId::GameProject);
        assert_eq!(hit.offset, Vector3::new(0.0, 0.0, 4.0));
    }

    #[test]
    fn first_table_entry_wins_on_ambiguous_names() {
        let registry = InteractableRegistry::portfolio();
        // Contains both "tv" (GameProject) and "bookshelf" (Skills); "tv"
        // sits earlier in the table.
        let hit = registry.resolve("tv_above_bookshelf").unwrap();
        assert_eq!(hit.section, SectionId::GameProject);
        // And "pc_2" outranks the generic "computer" fragment.
        let hit = registry.resolve("Computer_pc_2").unwrap();
        assert_eq!(hit.section, SectionId::WorkExperience);
    }

    #[test]
    fn unrelated_and_empty_names_miss() {
        let registry = InteractableRegistry::portfolio();
        assert!(registry.resolve("Chair_01").is_none());
        assert!(registry.resolve("").is_none());
    }

    #[test]
    fn every_entry_resolves_to_itself() {
        let registry = InteractableRegistry::portfolio();
        for entry in registry.entries() {
            let hit = registry.resolve(entry.fragment).unwrap();
            assert_eq!(hit.section, entry.section);
        }
    }
}
