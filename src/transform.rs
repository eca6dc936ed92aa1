use std::collections::{BTreeMap, BTreeSet};

use crate::error::{EtbError, Result};
use crate::models::{CompositionRow, Decile, Observation, RatioRow, RawRecord, Stage, StageRow};

/// Household group used by every chart in the analysis.
pub const ALL_HOUSEHOLDS: &str = "All";

const EQUIVALISED_PREFIX: &str = "Equivalised ";

// ---------------------------------------------------------------------------
// Value normalization
// ---------------------------------------------------------------------------

/// Historical ETB labels collapsed onto their current spelling. The mapping
/// is exact-match and total: anything not listed passes through verbatim,
/// so a new ONS category shows up in output instead of vanishing.
const COMPONENT_ALIASES: &[(&str, &str)] = &[
    ("Original Income", "Original income"),
    ("Cash benefits", "Direct benefits in cash"),
];

pub fn canonical_label(label: &str) -> &str {
    let trimmed = label.trim();
    for (old, canonical) in COMPONENT_ALIASES {
        if trimmed == *old {
            return canonical;
        }
    }
    trimmed
}

/// Parse a monetary cell. Blank cells and the ONS suppression markers
/// ("..", ":", "[c]" and friends) come back as `None` — unmeasured is not
/// the same thing as zero, and nothing downstream may treat it as such.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let s = raw.replace(',', "").replace('"', "").replace('\u{a3}', "");
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Some(inner) = s.strip_prefix('(').and_then(|v| v.strip_suffix(')')) {
        return inner.trim().parse::<f64>().ok().map(|v| -v);
    }
    s.parse().ok()
}

/// Parse a "Financial year ending" cell. Accepts a plain year (2019, also
/// as a float from XLSX) or the "2018/19" fiscal-year form, which denotes
/// the year ending 2019.
pub fn parse_year(raw: &str) -> Option<i32> {
    let s = raw.trim();
    if let Ok(y) = s.parse::<i32>() {
        return Some(y);
    }
    if let Ok(f) = s.parse::<f64>() {
        if f.fract() == 0.0 {
            return Some(f as i32);
        }
    }
    if let Some((start, _)) = s.split_once('/') {
        let y: i32 = start.trim().parse().ok()?;
        return Some(y + 1);
    }
    None
}

/// Turn raw string records into typed observations. Decile values outside
/// the closed 11-label set and unparsable years are fatal; unrecognized
/// component labels are not (they pass through unchanged). `source` is the
/// input path, used only in diagnostics.
pub fn normalize(records: &[RawRecord], source: &str) -> Result<Vec<Observation>> {
    let mut out = Vec::with_capacity(records.len());
    for r in records {
        let year = parse_year(&r.year).ok_or_else(|| EtbError::UnknownYear {
            value: r.year.clone(),
            file: source.to_string(),
        })?;
        let decile = Decile::parse(&r.decile).ok_or_else(|| EtbError::UnknownDecile {
            value: r.decile.clone(),
            file: source.to_string(),
        })?;
        out.push(Observation {
            year,
            group: r.group.trim().to_string(),
            decile,
            component: canonical_label(&r.component).to_string(),
            sub_component: canonical_label(&r.sub_component).to_string(),
            amount: parse_amount(&r.amount),
        });
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// Stage table — income by stage and decile for one year
// ---------------------------------------------------------------------------

/// Equivalised income at each of the five stages, by decile, for `year`.
/// Rows come back ordered by the stage progression and then by decile rank.
/// An absent year yields an empty table, not an error.
pub fn stage_table(obs: &[Observation], year: i32) -> Vec<StageRow> {
    let mut rows: Vec<StageRow> = obs
        .iter()
        .filter(|o| o.year == year && o.group == ALL_HOUSEHOLDS && o.decile != Decile::All)
        .filter_map(|o| {
            let label = o.sub_component.strip_prefix(EQUIVALISED_PREFIX)?;
            let stage = Stage::from_label(label)?;
            let amount = o.amount?;
            Some(StageRow {
                stage,
                decile: o.decile,
                amount,
            })
        })
        .collect();
    rows.sort_by_key(|r| (r.stage, r.decile));
    rows
}

// ---------------------------------------------------------------------------
// Ratio table — one label as a percentage of another
// ---------------------------------------------------------------------------

/// Which level of the label hierarchy a ratio side filters on. A
/// `Component` filter can span several sub-components; those are summed
/// per (year, decile) before the ratio is taken.
#[derive(Debug, Clone, PartialEq)]
pub enum LabelFilter {
    Component(String),
    SubComponent(String),
}

impl LabelFilter {
    pub fn label(&self) -> &str {
        match self {
            LabelFilter::Component(c) => c,
            LabelFilter::SubComponent(s) => s,
        }
    }

    fn matches(&self, o: &Observation) -> bool {
        match self {
            LabelFilter::Component(c) => o.component == *c,
            LabelFilter::SubComponent(s) => o.sub_component == *s,
        }
    }
}

/// 100 × numerator / denominator per (year, decile), for group "All",
/// by-decile only. Keys where either side is unmeasured, or where the
/// denominator is zero, are simply absent from the output.
pub fn ratio_table(
    obs: &[Observation],
    numerator: &LabelFilter,
    denominator: &LabelFilter,
) -> Vec<RatioRow> {
    #[derive(Default)]
    struct Sides {
        num: Option<f64>,
        den: Option<f64>,
    }

    // Sum duplicates per side before widening: a component-level filter
    // legitimately matches several sub-component rows per key.
    let mut wide: BTreeMap<(i32, Decile), Sides> = BTreeMap::new();
    for o in obs {
        if o.group != ALL_HOUSEHOLDS || o.decile == Decile::All {
            continue;
        }
        let Some(amount) = o.amount else { continue };
        let key = (o.year, o.decile);
        if numerator.matches(o) {
            let side = wide.entry(key).or_default();
            *side.num.get_or_insert(0.0) += amount;
        }
        if denominator.matches(o) {
            let side = wide.entry(key).or_default();
            *side.den.get_or_insert(0.0) += amount;
        }
    }

    wide.into_iter()
        .filter_map(|((year, decile), sides)| {
            let num = sides.num?;
            let den = sides.den?;
            if den == 0.0 {
                return None;
            }
            Some(RatioRow {
                year,
                decile,
                pct: 100.0 * num / den,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Composition table — sub-component amounts under one component
// ---------------------------------------------------------------------------

/// Amounts of every sub-component under `component`, unaggregated, keyed by
/// (year, decile, sub_component). Unmeasured amounts are omitted so a
/// stacked rendering never draws zero-height segments for them.
pub fn composition_table(
    obs: &[Observation],
    component: &str,
    year_range: Option<(i32, i32)>,
) -> Vec<CompositionRow> {
    let mut rows: Vec<CompositionRow> = obs
        .iter()
        .filter(|o| {
            o.component == component
                && o.group == ALL_HOUSEHOLDS
                && o.decile != Decile::All
                && year_range.map_or(true, |(from, to)| o.year >= from && o.year <= to)
        })
        .filter_map(|o| {
            Some(CompositionRow {
                year: o.year,
                decile: o.decile,
                sub_component: o.sub_component.clone(),
                amount: o.amount?,
            })
        })
        .collect();
    rows.sort_by(|a, b| {
        (a.year, a.decile, &a.sub_component).cmp(&(b.year, b.decile, &b.sub_component))
    });
    rows
}

// ---------------------------------------------------------------------------
// Dataset summary
// ---------------------------------------------------------------------------

pub struct ComponentSummary {
    pub component: String,
    pub sub_components: Vec<String>,
    pub rows: usize,
}

pub struct DatasetSummary {
    pub rows: usize,
    pub missing_amounts: usize,
    pub years: Vec<i32>,
    pub groups: Vec<String>,
    pub components: Vec<ComponentSummary>,
}

pub fn summarize(obs: &[Observation]) -> DatasetSummary {
    let mut years = BTreeSet::new();
    let mut groups = BTreeSet::new();
    let mut components: BTreeMap<&str, (BTreeSet<&str>, usize)> = BTreeMap::new();
    let mut missing = 0usize;
    for o in obs {
        years.insert(o.year);
        groups.insert(o.group.as_str());
        let entry = components.entry(o.component.as_str()).or_default();
        entry.0.insert(o.sub_component.as_str());
        entry.1 += 1;
        if o.amount.is_none() {
            missing += 1;
        }
    }
    DatasetSummary {
        rows: obs.len(),
        missing_amounts: missing,
        years: years.into_iter().collect(),
        groups: groups.into_iter().map(String::from).collect(),
        components: components
            .into_iter()
            .map(|(component, (subs, rows))| ComponentSummary {
                component: component.to_string(),
                sub_components: subs.into_iter().map(String::from).collect(),
                rows,
            })
            .collect(),
    }
}

/// Most recent year present, used as the default for single-year reports.
pub fn latest_year(obs: &[Observation]) -> Option<i32> {
    obs.iter().map(|o| o.year).max()
}
