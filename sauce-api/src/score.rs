use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::submission::Submission;

/// Total grade per team. Only teams that appear among the summed submissions have an entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ScoreLedger {
    totals: BTreeMap<String, f64>,
}

impl ScoreLedger {
    pub fn from_submissions<'a>(submissions: impl IntoIterator<Item = &'a Submission>) -> Self {
        submissions
            .into_iter()
            .map(|submission| (submission.team(), submission.grade()))
            .collect()
    }

    fn add(&mut self, team: &str, grade: f64) {
        *self.totals.entry(team.to_owned()).or_insert(0.0) += grade;
    }

    pub fn get(&self, team: &str) -> Option<f64> {
        self.totals.get(team).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.totals.iter().map(|(team, total)| (team.as_str(), *total))
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }
}

impl<'a> FromIterator<(&'a str, f64)> for ScoreLedger {
    fn from_iter<I: IntoIterator<Item = (&'a str, f64)>>(iter: I) -> Self {
        let mut ledger = Self::default();
        for (team, grade) in iter {
            ledger.add(team, grade);
        }
        ledger
    }
}

impl fmt::Display for ScoreLedger {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (team, total) in self.iter() {
            writeln!(f, "{team}: {total}")?;
        }
        Ok(())
    }
}
