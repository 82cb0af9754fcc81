//! Tag filtering and recency ordering over a drink collection.
//!
//! All functions are pure: they borrow the drinks and return references in a
//! new order, never mutating the input.

use std::collections::HashSet;

use brewup_core::{AggregateRoot, DrinkId};

use crate::drink::{Drink, tags};

/// Drinks carrying any `include` tag and no `exclude` tag.
///
/// Order: include tags are scanned in the order given and, for each, drinks in
/// input order; a drink appears once, at its first match. An empty `include`
/// yields an empty result (not "all drinks").
pub fn filter_by_tags<'a, S, T>(drinks: &'a [Drink], include: &[S], exclude: &[T]) -> Vec<&'a Drink>
where
    S: AsRef<str>,
    T: AsRef<str>,
{
    let mut seen: HashSet<DrinkId> = HashSet::new();
    let mut result = Vec::new();

    for tag in include {
        for drink in drinks {
            if drink.has_tag(tag.as_ref()) && seen.insert(*drink.id()) {
                result.push(drink);
            }
        }
    }

    result.retain(|drink| !exclude.iter().any(|tag| drink.has_tag(tag.as_ref())));
    result
}

/// Most recently created first; ties keep input order.
pub fn sort_by_created_descending<'a, I>(drinks: I) -> Vec<&'a Drink>
where
    I: IntoIterator<Item = &'a Drink>,
{
    let mut sorted: Vec<&Drink> = drinks.into_iter().collect();
    sorted.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
    sorted
}

/// Most recently viewed first; ties keep input order.
pub fn sort_by_last_checked_descending<'a, I>(drinks: I) -> Vec<&'a Drink>
where
    I: IntoIterator<Item = &'a Drink>,
{
    let mut sorted: Vec<&Drink> = drinks.into_iter().collect();
    sorted.sort_by(|a, b| b.last_checked_at().cmp(&a.last_checked_at()));
    sorted
}

/// Shipped drinks the user has not authored, most recently viewed first.
pub fn explore(drinks: &[Drink]) -> Vec<&Drink> {
    sort_by_last_checked_descending(filter_by_tags(drinks, &[tags::DEFAULT], &[tags::CREATED_BY_USER]))
}

pub fn favorites(drinks: &[Drink]) -> Vec<&Drink> {
    sort_by_last_checked_descending(filter_by_tags::<_, &str>(drinks, &[tags::FAVORITE], &[]))
}

pub fn my_recipes(drinks: &[Drink]) -> Vec<&Drink> {
    sort_by_last_checked_descending(filter_by_tags::<_, &str>(drinks, &[tags::CREATED_BY_USER], &[]))
}
