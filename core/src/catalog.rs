use crate::models::FoodItem;

pub const SEARCH_LIMIT: usize = 5;

const fn food(
    name: &'static str,
    calories: f64,
    protein: f64,
    carbs: f64,
    fat: f64,
    fiber: f64,
) -> FoodItem {
    FoodItem {
        name,
        calories,
        protein,
        carbs,
        fat,
        fiber,
    }
}

pub static FOODS: [FoodItem; 20] = [
    food("Apple", 95.0, 0.5, 25.0, 0.3, 4.4),
    food("Banana", 105.0, 1.3, 27.0, 0.4, 3.1),
    food("Chicken Breast (100g)", 165.0, 31.0, 0.0, 3.6, 0.0),
    food("Brown Rice (1 cup)", 216.0, 5.0, 45.0, 1.8, 3.5),
    food("Egg (large)", 78.0, 6.3, 0.6, 5.3, 0.0),
    food("Salmon (100g)", 208.0, 20.0, 0.0, 13.0, 0.0),
    food("Broccoli (1 cup)", 55.0, 3.7, 11.0, 0.6, 5.1),
    food("Almonds (28g)", 164.0, 6.0, 6.0, 14.0, 3.5),
    food("Greek Yogurt (170g)", 100.0, 17.0, 6.0, 0.0, 0.0),
    food("Avocado (medium)", 240.0, 3.0, 12.0, 22.0, 10.0),
    food("Whole Wheat Bread (slice)", 69.0, 3.6, 12.0, 1.1, 1.9),
    food("Milk (1 cup)", 149.0, 8.0, 12.0, 8.0, 0.0),
    food("Orange (medium)", 62.0, 1.2, 15.0, 0.2, 3.1),
    food("Potato (medium)", 161.0, 4.3, 37.0, 0.2, 4.7),
    food("Spinach (1 cup)", 7.0, 0.9, 1.0, 0.1, 0.7),
    food("Oatmeal (1 cup cooked)", 166.0, 6.0, 28.0, 3.6, 4.0),
    food("Pasta (1 cup cooked)", 221.0, 8.0, 43.0, 1.3, 2.5),
    food("Cheese (28g)", 113.0, 7.0, 0.4, 9.0, 0.0),
    food("Beef (100g)", 250.0, 26.0, 0.0, 17.0, 0.0),
    food("Carrot (medium)", 25.0, 0.6, 6.0, 0.1, 1.7),
];

#[must_use]
pub fn all() -> &'static [FoodItem] {
    &FOODS
}

/// Case-insensitive substring search over food names, in table order.
/// A blank query matches nothing. Surrounding whitespace is part of the
/// query.
#[must_use]
pub fn search(query: &str) -> Vec<&'static FoodItem> {
    if query.trim().is_empty() {
        return Vec::new();
    }
    let needle = query.to_lowercase();
    FOODS
        .iter()
        .filter(|f| f.name.to_lowercase().contains(&needle))
        .take(SEARCH_LIMIT)
        .collect()
}

#[must_use]
pub fn find(name: &str) -> Option<&'static FoodItem> {
    FOODS.iter().find(|f| f.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_chicken() {
        let results = search("chicken");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "Chicken Breast (100g)");
    }

    #[test]
    fn test_search_no_match() {
        assert!(search("choc").is_empty());
    }

    #[test]
    fn test_search_blank_query() {
        assert!(search("").is_empty());
        assert!(search("   ").is_empty());
    }

    #[test]
    fn test_search_keeps_whitespace() {
        assert!(search(" apple").is_empty());
        let results = search("greek ");
        assert_eq!(results.len(), 1);
        assert!(results[0].name.starts_with("Greek "));
    }

    #[test]
    fn test_search_case_insensitive() {
        let results = search("SALMON");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "Salmon (100g)");
    }

    #[test]
    fn test_search_limit_and_order() {
        // "e" appears in most names; results keep table order
        let results = search("e");
        assert_eq!(results.len(), SEARCH_LIMIT);
        assert_eq!(results[0].name, "Apple");
        assert_eq!(results[1].name, "Chicken Breast (100g)");
    }

    #[test]
    fn test_find_exact() {
        let avocado = find("Avocado (medium)").unwrap();
        assert!((avocado.calories - 240.0).abs() < f64::EPSILON);
        assert!(find("avocado").is_none());
    }

    #[test]
    fn test_catalog_size() {
        assert_eq!(all().len(), 20);
    }
}
