//! Per-country win counts

use crate::data::Dataset;
use serde::Serialize;
use std::collections::HashMap;

/// Number of finals won by each country.
///
/// Only countries with at least one win appear. Iteration order is
/// unspecified; use [`WinCount::countries_sorted`] or
/// [`WinCount::ranked`] when presenting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WinCount {
    wins: HashMap<String, u32>,
}

/// A country and its win count, for presentation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountryWins {
    pub country: String,
    pub wins: u32,
}

impl WinCount {
    /// Count winners across the (already normalized) dataset
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let mut wins: HashMap<String, u32> = HashMap::new();
        for record in dataset.records() {
            *wins.entry(record.winner.clone()).or_default() += 1;
        }
        Self { wins }
    }

    /// Wins for a country, `None` if it never won
    pub fn get(&self, country: &str) -> Option<u32> {
        self.wins.get(country).copied()
    }

    pub fn contains(&self, country: &str) -> bool {
        self.wins.contains_key(country)
    }

    pub fn len(&self) -> usize {
        self.wins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wins.is_empty()
    }

    /// Total wins across all countries
    pub fn total(&self) -> u32 {
        self.wins.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.wins.iter().map(|(country, wins)| (country.as_str(), *wins))
    }

    /// Country names in lexical order
    pub fn countries_sorted(&self) -> Vec<&str> {
        let mut countries: Vec<&str> = self.wins.keys().map(String::as_str).collect();
        countries.sort_unstable();
        countries
    }

    /// Most wins first, ties broken by country name
    pub fn ranked(&self) -> Vec<CountryWins> {
        let mut ranked: Vec<CountryWins> = self
            .iter()
            .map(|(country, wins)| CountryWins {
                country: country.to_string(),
                wins,
            })
            .collect();
        ranked.sort_by(|a, b| b.wins.cmp(&a.wins).then_with(|| a.country.cmp(&b.country)));
        ranked
    }
}
