use serde::Serialize;

// ---------------------------------------------------------------------------
// Decile — the closed, ordered category set
// ---------------------------------------------------------------------------

/// Income decile group. Ordering follows the declaration order, not the
/// alphabetical order of the labels, so sorting a table by decile always
/// runs bottom → top. `All` is the whole-population aggregate and is
/// excluded from every by-decile table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Decile {
    Bottom,
    Second,
    Third,
    Fourth,
    Fifth,
    Sixth,
    Seventh,
    Eighth,
    Ninth,
    Top,
    All,
}

/// The ten by-decile groups, in rank order. Excludes `All`.
pub const BY_DECILE: [Decile; 10] = [
    Decile::Bottom,
    Decile::Second,
    Decile::Third,
    Decile::Fourth,
    Decile::Fifth,
    Decile::Sixth,
    Decile::Seventh,
    Decile::Eighth,
    Decile::Ninth,
    Decile::Top,
];

impl Decile {
    pub fn parse(raw: &str) -> Option<Decile> {
        match raw.trim().to_lowercase().as_str() {
            "bottom" => Some(Decile::Bottom),
            "second" | "2nd" => Some(Decile::Second),
            "third" | "3rd" => Some(Decile::Third),
            "fourth" | "4th" => Some(Decile::Fourth),
            "fifth" | "5th" => Some(Decile::Fifth),
            "sixth" | "6th" => Some(Decile::Sixth),
            "seventh" | "7th" => Some(Decile::Seventh),
            "eighth" | "8th" => Some(Decile::Eighth),
            "ninth" | "9th" => Some(Decile::Ninth),
            "top" => Some(Decile::Top),
            "all" | "all households" => Some(Decile::All),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Decile::Bottom => "bottom",
            Decile::Second => "second",
            Decile::Third => "third",
            Decile::Fourth => "fourth",
            Decile::Fifth => "fifth",
            Decile::Sixth => "sixth",
            Decile::Seventh => "seventh",
            Decile::Eighth => "eighth",
            Decile::Ninth => "ninth",
            Decile::Top => "top",
            Decile::All => "all",
        }
    }
}

// ---------------------------------------------------------------------------
// Stage — the five-step income progression
// ---------------------------------------------------------------------------

/// Stage of income. Each stage is the previous one plus/minus a named
/// adjustment (cash benefits, direct taxes, indirect taxes, benefits in
/// kind), so display order must follow the progression, never the labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Stage {
    #[serde(rename = "Original income")]
    Original,
    #[serde(rename = "Gross income")]
    Gross,
    #[serde(rename = "Disposable income")]
    Disposable,
    #[serde(rename = "Post-tax income")]
    PostTax,
    #[serde(rename = "Final income")]
    Final,
}

pub const STAGES: [Stage; 5] = [
    Stage::Original,
    Stage::Gross,
    Stage::Disposable,
    Stage::PostTax,
    Stage::Final,
];

impl Stage {
    /// Canonical ONS label, as it appears once the "Equivalised " prefix
    /// is stripped from the sub-component.
    pub fn label(&self) -> &'static str {
        match self {
            Stage::Original => "Original income",
            Stage::Gross => "Gross income",
            Stage::Disposable => "Disposable income",
            Stage::PostTax => "Post-tax income",
            Stage::Final => "Final income",
        }
    }

    /// Case-insensitive: stripping "Equivalised " from "Equivalised gross
    /// income" leaves a lowercase label.
    pub fn from_label(label: &str) -> Option<Stage> {
        match label.trim().to_lowercase().as_str() {
            "original income" => Some(Stage::Original),
            "gross income" => Some(Stage::Gross),
            "disposable income" => Some(Stage::Disposable),
            "post-tax income" => Some(Stage::PostTax),
            "final income" => Some(Stage::Final),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Observation and derived rows
// ---------------------------------------------------------------------------

/// One row of the normalized tidy table. `amount` is `None` when the cell
/// was blank or a suppression marker — unmeasured, not zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub year: i32,
    pub group: String,
    pub decile: Decile,
    pub component: String,
    pub sub_component: String,
    pub amount: Option<f64>,
}

/// Raw string record as pulled from a sheet, before value normalization.
#[derive(Debug, Clone)]
pub struct RawRecord {
    pub year: String,
    pub group: String,
    pub decile: String,
    pub component: String,
    pub sub_component: String,
    pub amount: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageRow {
    pub stage: Stage,
    pub decile: Decile,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatioRow {
    pub year: i32,
    pub decile: Decile,
    pub pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompositionRow {
    pub year: i32,
    pub decile: Decile,
    pub sub_component: String,
    pub amount: f64,
}
