/// Closed set of icon identifiers the frontend icon pack can render for a
/// category. Stored names are validated against this list instead of being
/// looked up reflectively at render time.
pub const ICON_SET: &[&str] = &[
    "Beef",
    "Beer",
    "CakeSlice",
    "ChefHat",
    "Coffee",
    "CookingPot",
    "Croissant",
    "Drumstick",
    "Fish",
    "GlassWater",
    "IceCreamCone",
    "Martini",
    "Pizza",
    "Salad",
    "Sandwich",
    "Soup",
    "Star",
    "Utensils",
    "UtensilsCrossed",
    "Wine",
];

/// Shown when a stored icon name is missing or no longer in the set.
pub const FALLBACK_ICON: &str = "Utensils";

pub fn is_known_icon(name: &str) -> bool {
    ICON_SET.contains(&name)
}

/// Map a stored icon name to a renderable one, falling back for anything
/// unrecognized.
pub fn resolve_icon(name: Option<&str>) -> &'static str {
    name.and_then(|n| ICON_SET.iter().find(|known| **known == n))
        .copied()
        .unwrap_or(FALLBACK_ICON)
}
