//! Starter drinks shipped with the app.
//!
//! The seed table is immutable data; [`default_drinks`] builds fresh aggregates
//! from it each time so no drink instance is ever shared between callers.

use crate::drink::{CreateDrink, Drink, tags};

struct SeedDrink {
    name: &'static str,
    description: &'static str,
    ingredients: &'static [&'static str],
    equipment: &'static [&'static str],
    instructions: &'static str,
}

const SEED: &[SeedDrink] = &[
    SeedDrink {
        name: "Coffee",
        description: "Regular Cup of Coffee",
        ingredients: &[],
        equipment: &["Espresso Machine", "Hot Water Tank", "Milk Frother"],
        instructions: "",
    },
    SeedDrink {
        name: "Latte",
        description: "Espresso With Steamed Milk",
        ingredients: &[],
        equipment: &[],
        instructions: "",
    },
    SeedDrink {
        name: "Cold Brew",
        description: "Alternative Brew Method for Iced Coffee",
        ingredients: &[],
        equipment: &[],
        instructions: "",
    },
    SeedDrink {
        name: "Americano",
        description: "Espresso With Hot Water",
        ingredients: &["Espresso", "Hot Water"],
        equipment: &["Espresso Machine"],
        instructions: "Pull a double shot of espresso into a mug, then top with hot water to taste.",
    },
];

/// Build the starter drinks, each tagged `"Default"`.
pub fn default_drinks() -> Vec<Drink> {
    SEED.iter().map(build).collect()
}

pub fn default_drink_names() -> impl Iterator<Item = &'static str> {
    SEED.iter().map(|seed| seed.name)
}

fn build(seed: &SeedDrink) -> Drink {
    Drink::create(CreateDrink {
        name: seed.name.to_string(),
        description: seed.description.to_string(),
        tags: vec![tags::DEFAULT.to_string()],
        ingredients: seed.ingredients.iter().map(|s| s.to_string()).collect(),
        equipment: seed.equipment.iter().map(|s| s.to_string()).collect(),
        instructions: seed.instructions.to_string(),
        ..CreateDrink::default()
    })
}
