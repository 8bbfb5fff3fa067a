//! Archetype catalog loader.
//!
//! RON format: a list of archetype structs. Omitted fields take the default
//! stat block.

use std::path::Path;
use std::sync::Arc;

use horde_core::AgentArchetype;

use crate::loaders::{LoadResult, read_file};

/// Loaded archetypes, shared by every agent spawned from them.
#[derive(Clone, Debug, Default)]
pub struct ArchetypeCatalog {
    archetypes: Vec<Arc<AgentArchetype>>,
}

impl ArchetypeCatalog {
    /// Builds a catalog from archetypes assembled in code. Entries are taken
    /// as-is; only the file loaders validate.
    pub fn new(archetypes: impl IntoIterator<Item = AgentArchetype>) -> Self {
        Self {
            archetypes: archetypes.into_iter().map(Arc::new).collect(),
        }
    }

    /// Looks an archetype up by name (case-sensitive).
    pub fn get(&self, name: &str) -> Option<Arc<AgentArchetype>> {
        self.archetypes
            .iter()
            .find(|archetype| archetype.name == name)
            .cloned()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.archetypes.iter().map(|archetype| archetype.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<AgentArchetype>> + '_ {
        self.archetypes.iter()
    }

    pub fn len(&self) -> usize {
        self.archetypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.archetypes.is_empty()
    }
}

/// Loader for the archetype catalog from RON files.
pub struct ArchetypeLoader;

impl ArchetypeLoader {
    /// Load the catalog from a RON file.
    pub fn load(path: &Path) -> LoadResult<ArchetypeCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse the catalog from RON text, validating every entry.
    pub fn parse(content: &str) -> LoadResult<ArchetypeCatalog> {
        let raw: Vec<AgentArchetype> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse archetype catalog RON: {}", e))?;

        let mut archetypes: Vec<Arc<AgentArchetype>> = Vec::with_capacity(raw.len());
        for mut archetype in raw {
            validate(&archetype)?;
            if archetypes.iter().any(|known| known.name == archetype.name) {
                anyhow::bail!("Duplicate archetype '{}'", archetype.name);
            }
            archetype.intelligence_level = archetype.intelligence_level.clamp(0.0, 1.0);
            archetypes.push(Arc::new(archetype));
        }

        tracing::debug!("loaded {} archetypes", archetypes.len());
        Ok(ArchetypeCatalog { archetypes })
    }
}

fn validate(archetype: &AgentArchetype) -> LoadResult<()> {
    let name = &archetype.name;
    if name.is_empty() {
        anyhow::bail!("Archetype with empty name");
    }
    if archetype.health <= 0.0 {
        anyhow::bail!("Archetype '{}' must have positive health", name);
    }
    if archetype.move_speed < 0.0 || archetype.attack_range < 0.0 {
        anyhow::bail!("Archetype '{}' has a negative speed or range", name);
    }
    if !(0.0..=360.0).contains(&archetype.attack_angle) {
        anyhow::bail!(
            "Archetype '{}' attack_angle {} is outside [0, 360]",
            name,
            archetype.attack_angle
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use horde_core::TacticalRole;

    use super::*;

    #[test]
    fn omitted_fields_take_defaults() {
        let catalog = ArchetypeLoader::parse(
            r#"[(name: "crawler", move_speed: 0.5, preferred_role: Blocker)]"#,
        )
        .unwrap();
        let crawler = catalog.get("crawler").unwrap();
        assert_eq!(crawler.move_speed, 0.5);
        assert_eq!(crawler.preferred_role, TacticalRole::Blocker);
        assert_eq!(crawler.health, AgentArchetype::default().health);
    }

    #[test]
    fn duplicates_and_invalid_stats_are_rejected() {
        assert!(ArchetypeLoader::parse(r#"[(name: "a"), (name: "a")]"#).is_err());
        assert!(ArchetypeLoader::parse(r#"[(name: "a", health: 0.0)]"#).is_err());
        assert!(ArchetypeLoader::parse(r#"[(name: "a", attack_angle: 400.0)]"#).is_err());
        assert!(ArchetypeLoader::parse("not ron").is_err());
    }

    #[test]
    fn loads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("archetypes.ron");
        std::fs::write(&path, r#"[(name: "a"), (name: "b", intelligence_level: 7.0)]"#).unwrap();

        let catalog = ArchetypeLoader::load(&path).unwrap();
        assert_eq!(catalog.names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(catalog.get("b").unwrap().intelligence_level, 1.0);
    }
}
