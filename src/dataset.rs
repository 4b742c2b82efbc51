use std::collections::HashMap;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

/// One tracked quantity per player-season. The two chance metrics are
/// probability-valued and get percentage axis labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Cumulative,
    ByAge,
    HofChance,
    BbwaaChance,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::Cumulative,
        Metric::ByAge,
        Metric::HofChance,
        Metric::BbwaaChance,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Metric::Cumulative => "Cumulative BOOG",
            Metric::ByAge => "BOOG By Age",
            Metric::HofChance => "Hall of Fame Chances By Age",
            Metric::BbwaaChance => "BBWAA Induction Chances By Age",
        }
    }

    pub fn y_label(self) -> &'static str {
        match self {
            Metric::Cumulative | Metric::ByAge => "BOOG Score",
            Metric::HofChance | Metric::BbwaaChance => "Probability",
        }
    }

    pub fn is_percentage(self) -> bool {
        matches!(self, Metric::HofChance | Metric::BbwaaChance)
    }

    /// Short name used in export file names.
    pub fn slug(self) -> &'static str {
        match self {
            Metric::Cumulative => "cumulative",
            Metric::ByAge => "age",
            Metric::HofChance => "hof",
            Metric::BbwaaChance => "bbwaa",
        }
    }
}

/// One player-season in canonical form. Metric slots are optional because the
/// positional dataset carries nulls where a season has no value and the
/// field-named dataset carries no probability columns at all.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonRecord {
    pub age: f64,
    pub by_age: Option<f64>,
    pub cumulative: Option<f64>,
    pub hof: Option<f64>,
    pub bbwaa: Option<f64>,
}

impl SeasonRecord {
    pub fn metric(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Cumulative => self.cumulative,
            Metric::ByAge => self.by_age,
            Metric::HofChance => self.hof,
            Metric::BbwaaChance => self.bbwaa,
        }
    }
}

// Two shapes coexist in the wild: `process_boog_csv.py` emits positional
// arrays `[age, season_BOOG, career_to_date_BOOG, hof_rate, bbwaa_rate]`,
// `process_maws_csv.py` emits `{Season, Age, MAWS, Cumulative}` objects.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawSeason {
    Named {
        #[serde(rename = "Age")]
        age: f64,
        #[serde(rename = "MAWS")]
        maws: Option<f64>,
        #[serde(rename = "Cumulative")]
        cumulative: Option<f64>,
    },
    Positional(Vec<Option<f64>>),
}

impl RawSeason {
    fn into_record(self) -> Result<SeasonRecord> {
        match self {
            RawSeason::Named {
                age,
                maws,
                cumulative,
            } => Ok(SeasonRecord {
                age,
                by_age: maws,
                cumulative,
                hof: None,
                bbwaa: None,
            }),
            RawSeason::Positional(values) => {
                let Some(Some(age)) = values.first().copied() else {
                    bail!("season row is missing an age");
                };
                let slot = |i: usize| values.get(i).copied().flatten();
                Ok(SeasonRecord {
                    age,
                    by_age: slot(1),
                    cumulative: slot(2),
                    hof: slot(3),
                    bbwaa: slot(4),
                })
            }
        }
    }
}

/// The loaded player index: immutable once built.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    players: HashMap<String, Vec<SeasonRecord>>,
    names: Vec<String>,
    metrics: Vec<Metric>,
}

impl Dataset {
    pub fn parse(raw: &str) -> Result<Self> {
        let parsed: HashMap<String, Vec<RawSeason>> =
            serde_json::from_str(raw).context("dataset is not a name -> seasons object")?;

        let mut players = HashMap::with_capacity(parsed.len());
        for (name, seasons) in parsed {
            let records = seasons
                .into_iter()
                .map(RawSeason::into_record)
                .collect::<Result<Vec<_>>>()
                .with_context(|| format!("bad season row for {name}"))?;
            players.insert(name, records);
        }

        let mut names: Vec<String> = players.keys().cloned().collect();
        names.sort();

        let metrics = Metric::ALL
            .into_iter()
            .filter(|metric| {
                players
                    .values()
                    .flatten()
                    .any(|season| season.metric(*metric).is_some())
            })
            .collect();

        Ok(Self {
            players,
            names,
            metrics,
        })
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// All player names, sorted for display.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.players.contains_key(name)
    }

    /// Metrics with at least one value anywhere in the dataset; one chart is
    /// drawn per entry.
    pub fn metrics(&self) -> &[Metric] {
        &self.metrics
    }

    /// `(age, value)` points for one player and one metric, in season order.
    /// Seasons without a value for the metric are skipped.
    pub fn series(&self, name: &str, metric: Metric) -> Vec<(f64, f64)> {
        let Some(seasons) = self.players.get(name) else {
            return Vec::new();
        };
        seasons
            .iter()
            .filter_map(|season| season.metric(metric).map(|value| (season.age, value)))
            .collect()
    }

    /// Names matching `query` as a case-insensitive substring, in display
    /// order. An empty query matches everything.
    pub fn matching_names(&self, query: &str) -> Vec<String> {
        self.names
            .iter()
            .filter(|name| contains_ascii_ci(name, query.trim()))
            .cloned()
            .collect()
    }
}

/// Case-insensitive ASCII substring search without allocating a lowercased copy.
fn contains_ascii_ci(haystack: &str, needle: &str) -> bool {
    let h = haystack.as_bytes();
    let n = needle.as_bytes();
    if n.len() > h.len() {
        return false;
    }
    if n.is_empty() {
        return true;
    }
    h.windows(n.len())
        .any(|window| window.iter().zip(n).all(|(a, b)| a.eq_ignore_ascii_case(b)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_rows_map_slots() {
        let raw = r#"{"Babe Ruth":[[19,0.1,0.1,null,null],[20,0.4,0.5,0.02,0.01]]}"#;
        let dataset = Dataset::parse(raw).expect("valid dataset");
        assert_eq!(dataset.series("Babe Ruth", Metric::Cumulative), vec![
            (19.0, 0.1),
            (20.0, 0.5)
        ]);
        // Null slots are skipped, not zeroed.
        assert_eq!(dataset.series("Babe Ruth", Metric::HofChance), vec![(
            20.0, 0.02
        )]);
    }

    #[test]
    fn missing_age_is_an_error() {
        let raw = r#"{"Nobody":[[null,1.0]]}"#;
        let err = Dataset::parse(raw).unwrap_err();
        assert!(format!("{err:#}").contains("Nobody"));
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let raw = r#"{"Hank Aaron":[[20,1.0,1.0,null,null]],"Willie Mays":[[20,1.0,1.0,null,null]]}"#;
        let dataset = Dataset::parse(raw).expect("valid dataset");
        assert_eq!(dataset.matching_names("aar"), vec!["Hank Aaron"]);
        assert_eq!(dataset.matching_names(""), vec![
            "Hank Aaron",
            "Willie Mays"
        ]);
        assert!(dataset.matching_names("ruth").is_empty());
    }
}
