//! Spaces provisioned when the service starts

use super::space::Space;
use super::types::SpaceCategory;

/// The three village Spaces every fresh registry starts with
pub fn default_spaces() -> Vec<Space> {
    vec![
        Space::new(
            1,
            "Community Center",
            SpaceCategory::Meeting,
            "A place for village meetings and discussions",
            30,
        ),
        Space::new(
            2,
            "Village Market",
            SpaceCategory::Market,
            "Buy and sell goods with other villagers",
            100,
        ),
        Space::new(
            3,
            "Festival Grounds",
            SpaceCategory::Festival,
            "Celebrate festivals and cultural events",
            200,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_space::types::SpaceId;

    #[test]
    fn test_seed_spaces() {
        let spaces = default_spaces();

        let summary: Vec<(SpaceId, &str, SpaceCategory, u32)> = spaces
            .iter()
            .map(|s| (s.id, s.name.as_str(), s.category, s.capacity))
            .collect();
        assert_eq!(
            summary,
            vec![
                (SpaceId(1), "Community Center", SpaceCategory::Meeting, 30),
                (SpaceId(2), "Village Market", SpaceCategory::Market, 100),
                (SpaceId(3), "Festival Grounds", SpaceCategory::Festival, 200),
            ]
        );
        assert!(spaces.iter().all(|s| s.occupant_count == 0));
        assert!(spaces.iter().all(|s| s.validate().is_ok()));
    }
}
