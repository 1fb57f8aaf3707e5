// src/scrape/extract.rs
use crate::{
    browser::{Browser, BrowserError},
    config::consts::{FIELD_BETS, FIELD_MULTIPLIER, FIELD_PLAYERS, FIELD_PRIZE},
};

use super::Fields;

/// CSV column label → selector, in column order.
pub const FIELDS: [(&str, &str); 4] = [
    ("Value X", FIELD_MULTIPLIER),
    ("Value Bets", FIELD_BETS),
    ("Value Prize", FIELD_PRIZE),
    ("Value Players", FIELD_PLAYERS),
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reading {
    Complete(Fields),
    /// At least one field had no element. Labels of the missing ones.
    Missing(Vec<&'static str>),
}

/// Read all four fields. Absent elements are collected, not raised; any other
/// browser failure is.
pub fn read_fields<B: Browser>(browser: &mut B) -> Result<Reading, BrowserError> {
    let mut values: [String; 4] = Default::default();
    let mut missing = Vec::new();

    for (slot, (label, selector)) in values.iter_mut().zip(FIELDS) {
        match browser.text(selector) {
            Ok(text) => *slot = s!(text.trim()),
            Err(BrowserError::NotFound(_)) => missing.push(label),
            Err(e) => return Err(e),
        }
    }

    if !missing.is_empty() {
        return Ok(Reading::Missing(missing));
    }

    let [multiplier, bets, prize, players] = values;
    Ok(Reading::Complete(Fields { multiplier, bets, prize, players }))
}
