use std::collections::HashSet;
use std::fmt;

use super::permissions;

/// Category grouping for permission codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PermissionCategory {
    User,
    Exercise,
    Workout,
    Nutrition,
    Goal,
}

impl PermissionCategory {
    pub fn label(&self) -> &'static str {
        match self {
            PermissionCategory::User => "User",
            PermissionCategory::Exercise => "Exercise",
            PermissionCategory::Workout => "Workout",
            PermissionCategory::Nutrition => "Nutrition",
            PermissionCategory::Goal => "Goal",
        }
    }
}

impl fmt::Display for PermissionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

const GROUPS: &[(PermissionCategory, &[&str])] = &[
    (
        PermissionCategory::User,
        &[
            permissions::USER_READ,
            permissions::USER_UPDATE,
            permissions::USER_UPDATE_ROLE,
            permissions::USER_DELETE,
        ],
    ),
    (
        PermissionCategory::Exercise,
        &[
            permissions::EXERCISE_CREATE,
            permissions::EXERCISE_READ,
            permissions::EXERCISE_UPDATE,
            permissions::EXERCISE_DELETE,
        ],
    ),
    (
        PermissionCategory::Workout,
        &[
            permissions::WORKOUT_CREATE,
            permissions::WORKOUT_READ,
            permissions::WORKOUT_UPDATE,
            permissions::WORKOUT_DELETE,
        ],
    ),
    (
        PermissionCategory::Nutrition,
        &[
            permissions::NUTRITION_CREATE,
            permissions::NUTRITION_READ,
            permissions::NUTRITION_UPDATE,
            permissions::NUTRITION_DELETE,
        ],
    ),
    (
        PermissionCategory::Goal,
        &[
            permissions::GOAL_CREATE,
            permissions::GOAL_READ,
            permissions::GOAL_UPDATE,
            permissions::GOAL_DELETE,
        ],
    ),
];

/// The closed set of valid permission codes, grouped by category.
///
/// Codes are case-sensitive and unique across the catalog. The catalog is
/// fixed at process start; membership tests are exact string matches.
#[derive(Debug, Clone)]
pub struct PermissionCatalog {
    groups: &'static [(PermissionCategory, &'static [&'static str])],
    index: HashSet<&'static str>,
}

impl PermissionCatalog {
    /// The catalog shipped with the application.
    pub fn standard() -> Self {
        let index = GROUPS
            .iter()
            .flat_map(|(_, codes)| codes.iter().copied())
            .collect();
        Self {
            groups: GROUPS,
            index,
        }
    }

    pub fn contains(&self, code: &str) -> bool {
        self.index.contains(code)
    }

    /// Codes in catalog order, grouped by category.
    pub fn groups(&self) -> impl Iterator<Item = (PermissionCategory, &'static [&'static str])> {
        self.groups.iter().map(|(category, codes)| (*category, *codes))
    }

    pub fn codes(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.groups.iter().flat_map(|(_, codes)| codes.iter().copied())
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

impl Default for PermissionCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_unique() {
        let catalog = PermissionCatalog::standard();
        let listed: Vec<_> = catalog.codes().collect();
        assert_eq!(listed.len(), catalog.len());
    }

    #[test]
    fn membership_is_case_sensitive() {
        let catalog = PermissionCatalog::standard();
        assert!(catalog.contains("USER_READ"));
        assert!(!catalog.contains("user_read"));
        assert!(!catalog.contains("USER_READ "));
    }
}
