use serde::{Deserialize, Serialize};

/// The sixteen UFO/OntoUML categories for Dutch legal concepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum UfoCategory {
    // Primary categories
    Kind,
    Event,
    Role,
    Phase,
    Relator,
    Mode,
    Quantity,
    Quality,
    // Sortals & non-sortals
    Subkind,
    Category,
    Mixin,
    RoleMixin,
    PhaseMixin,
    // Collections
    Collective,
    VariableCollection,
    FixedCollection,
}

impl UfoCategory {
    pub const ALL: [UfoCategory; 16] = [
        UfoCategory::Kind,
        UfoCategory::Event,
        UfoCategory::Role,
        UfoCategory::Phase,
        UfoCategory::Relator,
        UfoCategory::Mode,
        UfoCategory::Quantity,
        UfoCategory::Quality,
        UfoCategory::Subkind,
        UfoCategory::Category,
        UfoCategory::Mixin,
        UfoCategory::RoleMixin,
        UfoCategory::PhaseMixin,
        UfoCategory::Collective,
        UfoCategory::VariableCollection,
        UfoCategory::FixedCollection,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UfoCategory::Kind => "Kind",
            UfoCategory::Event => "Event",
            UfoCategory::Role => "Role",
            UfoCategory::Phase => "Phase",
            UfoCategory::Relator => "Relator",
            UfoCategory::Mode => "Mode",
            UfoCategory::Quantity => "Quantity",
            UfoCategory::Quality => "Quality",
            UfoCategory::Subkind => "Subkind",
            UfoCategory::Category => "Category",
            UfoCategory::Mixin => "Mixin",
            UfoCategory::RoleMixin => "RoleMixin",
            UfoCategory::PhaseMixin => "PhaseMixin",
            UfoCategory::Collective => "Collective",
            UfoCategory::VariableCollection => "VariableCollection",
            UfoCategory::FixedCollection => "FixedCollection",
        }
    }
}

impl std::fmt::Display for UfoCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_categories_count() {
        assert_eq!(UfoCategory::ALL.len(), 16);
    }

    #[test]
    fn test_category_serialization() {
        for category in UfoCategory::ALL {
            let serialized = serde_json::to_string(&category).unwrap();
            let deserialized: UfoCategory = serde_json::from_str(&serialized).unwrap();
            assert_eq!(category, deserialized);
        }
    }
}
