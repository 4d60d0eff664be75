// Cat service - Use case for the per-cat weight cards
use crate::domain::cat::CatSnapshot;
use crate::domain::weight::{Day, WeightCard};

pub fn weight_cards(cats: &[CatSnapshot], day: Day) -> Vec<WeightCard> {
    cats.iter()
        .enumerate()
        .map(|(index, cat)| WeightCard::from_snapshot(index, cat, day))
        .collect()
}
