//! Survey dataset loading
//!
//! Reads the A/B test response table: one row per participant with the
//! assigned variant, Likert ratings, and a would-recommend flag.

use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Lowest and highest allowed rating on the Likert scale
pub const RATING_RANGE: (f64, f64) = (1.0, 5.0);

/// Interface design shown to a participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Variant {
    Checklist,
    Calendar,
}

impl Variant {
    pub const ALL: [Variant; 2] = [Variant::Checklist, Variant::Calendar];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Checklist => "Checklist",
            Self::Calendar => "Calendar",
        }
    }

    /// Label used on charts and in the report
    pub fn view_label(&self) -> &'static str {
        match self {
            Self::Checklist => "Checklist View",
            Self::Calendar => "Calendar View",
        }
    }

    /// The opposing arm
    pub fn other(&self) -> Variant {
        match self {
            Self::Checklist => Self::Calendar,
            Self::Calendar => Self::Checklist,
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Variant {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "checklist" | "a" => Ok(Self::Checklist),
            "calendar" | "b" => Ok(Self::Calendar),
            _ => Err(()),
        }
    }
}

/// A rated survey dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Metric {
    EaseOfUse,
    LikelyToUse,
    Clarity,
    Overall,
}

impl Metric {
    pub const COUNT: usize = 4;

    pub const ALL: [Metric; Metric::COUNT] = [
        Metric::EaseOfUse,
        Metric::LikelyToUse,
        Metric::Clarity,
        Metric::Overall,
    ];

    /// The three directly rated dimensions that make up the composite
    pub const DETAILED: [Metric; 3] = [Metric::EaseOfUse, Metric::LikelyToUse, Metric::Clarity];

    pub fn label(&self) -> &'static str {
        match self {
            Self::EaseOfUse => "Ease of Use",
            Self::LikelyToUse => "Likely to Use",
            Self::Clarity => "Clarity",
            Self::Overall => "Overall Score",
        }
    }

    /// Position in `Metric::ALL`
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn short_label(&self) -> &'static str {
        match self {
            Self::EaseOfUse => "Ease",
            Self::LikelyToUse => "Usage",
            Self::Clarity => "Clarity",
            Self::Overall => "Overall",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One participant's answers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurveyResponse {
    pub participant_id: String,
    pub variant: Variant,
    pub ease_of_use: f64,
    pub likely_to_use: f64,
    pub clarity: f64,
    /// Overall UX rating; the composite of the three ratings when the
    /// input carries no explicit overall column
    pub overall: f64,
    pub recommend: bool,
}

impl SurveyResponse {
    pub fn rating(&self, metric: Metric) -> f64 {
        match metric {
            Metric::EaseOfUse => self.ease_of_use,
            Metric::LikelyToUse => self.likely_to_use,
            Metric::Clarity => self.clarity,
            Metric::Overall => self.overall,
        }
    }

    /// Mean of ease-of-use, likely-to-use and clarity
    pub fn composite(&self) -> f64 {
        (self.ease_of_use + self.likely_to_use + self.clarity) / 3.0
    }
}

/// Errors raised while loading survey data
#[derive(Debug, Error)]
pub enum SurveyError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("input has no header row")]
    EmptyInput,

    #[error("missing required column: {0}")]
    MissingColumn(&'static str),

    #[error("line {line}: expected {expected} fields, found {actual}")]
    ColumnCount {
        line: usize,
        expected: usize,
        actual: usize,
    },

    #[error("line {line}: unterminated quoted field")]
    UnterminatedQuote { line: usize },

    #[error("line {line}: unknown variant '{value}' (expected Checklist or Calendar)")]
    InvalidVariant { line: usize, value: String },

    #[error("line {line}: column {column}: '{value}' is not a number")]
    InvalidRating {
        line: usize,
        column: &'static str,
        value: String,
    },

    #[error("line {line}: column {column}: rating {value} outside 1-5")]
    RatingOutOfRange {
        line: usize,
        column: &'static str,
        value: f64,
    },

    #[error("line {line}: '{value}' is not a recommendation answer (expected Y/N)")]
    InvalidRecommendation { line: usize, value: String },

    #[error("line {line}: participant id is empty")]
    MissingParticipantId { line: usize },

    #[error("line {line}: duplicate participant id '{id}'")]
    DuplicateParticipant { line: usize, id: String },
}

/// Column positions resolved from the header row
#[derive(Debug)]
struct ColumnMap {
    width: usize,
    id: usize,
    variant: usize,
    ease_of_use: usize,
    likely_to_use: usize,
    clarity: usize,
    overall: Option<usize>,
    recommend: usize,
}

impl ColumnMap {
    fn from_header(fields: &[String]) -> Result<Self, SurveyError> {
        let headers: Vec<String> = fields.iter().map(|f| normalize_header(f)).collect();
        let h = headers.as_slice();

        Ok(Self {
            width: fields.len(),
            id: require(h, "ParticipantID", &["participantid", "participant", "id", "respondentid"])?,
            variant: require(h, "Variant", &["variant", "group"])?,
            ease_of_use: require(h, "EaseOfUse", &["easeofuse", "ease"])?,
            likely_to_use: require(h, "LikelyToUse", &["likelytouse", "likely"])?,
            clarity: require(h, "Clarity", &["clarity"])?,
            overall: position(h, &["overall", "overallux", "overallscore"]),
            recommend: require(h, "Recommend", &["recommend", "wouldrecommend"])?,
        })
    }
}

fn position(headers: &[String], aliases: &[&str]) -> Option<usize> {
    headers.iter().position(|h| aliases.contains(&h.as_str()))
}

fn require(headers: &[String], name: &'static str, aliases: &[&str]) -> Result<usize, SurveyError> {
    position(headers, aliases).ok_or(SurveyError::MissingColumn(name))
}

fn normalize_header(header: &str) -> String {
    header
        .trim()
        .trim_start_matches('\u{feff}')
        .chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Loaded survey responses in file order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurveyDataset {
    responses: Vec<SurveyResponse>,
}

impl SurveyDataset {
    pub fn new(responses: Vec<SurveyResponse>) -> Self {
        Self { responses }
    }

    /// Load a dataset from a CSV file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SurveyError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| SurveyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let dataset = Self::from_csv_str(&content)?;
        tracing::info!(path = %path.display(), rows = dataset.len(), "survey loaded");
        Ok(dataset)
    }

    /// Parse a dataset from CSV text with a header row
    pub fn from_csv_str(content: &str) -> Result<Self, SurveyError> {
        let mut lines = content
            .lines()
            .enumerate()
            .map(|(i, l)| (i + 1, l))
            .filter(|(_, l)| !l.trim().is_empty());

        let (header_line, header) = lines.next().ok_or(SurveyError::EmptyInput)?;
        let columns = ColumnMap::from_header(&parse_csv_line(header, header_line)?)?;

        let mut seen = HashSet::new();
        let mut responses = Vec::new();
        for (line, text) in lines {
            let fields = parse_csv_line(text, line)?;
            let response = parse_response(&fields, &columns, line)?;
            if !seen.insert(response.participant_id.clone()) {
                return Err(SurveyError::DuplicateParticipant {
                    line,
                    id: response.participant_id,
                });
            }
            responses.push(response);
        }

        tracing::debug!(rows = responses.len(), "survey rows loaded");
        Ok(Self { responses })
    }

    pub fn responses(&self) -> &[SurveyResponse] {
        &self.responses
    }

    pub fn len(&self) -> usize {
        self.responses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }

    /// Responses assigned to one variant
    pub fn by_variant(&self, variant: Variant) -> impl Iterator<Item = &SurveyResponse> {
        self.responses.iter().filter(move |r| r.variant == variant)
    }

    /// Number of participants assigned to a variant
    pub fn count(&self, variant: Variant) -> usize {
        self.by_variant(variant).count()
    }

    /// Ratings of one metric for one variant
    pub fn metric_values(&self, variant: Variant, metric: Metric) -> Vec<f64> {
        self.by_variant(variant).map(|r| r.rating(metric)).collect()
    }

    /// (recommend, not recommend) counts for a variant
    pub fn recommend_counts(&self, variant: Variant) -> (u64, u64) {
        self.by_variant(variant)
            .fold((0, 0), |(yes, no), r| if r.recommend { (yes + 1, no) } else { (yes, no + 1) })
    }
}

fn parse_response(
    fields: &[String],
    columns: &ColumnMap,
    line: usize,
) -> Result<SurveyResponse, SurveyError> {
    if fields.len() != columns.width {
        return Err(SurveyError::ColumnCount {
            line,
            expected: columns.width,
            actual: fields.len(),
        });
    }

    let participant_id = fields[columns.id].trim().to_string();
    if participant_id.is_empty() {
        return Err(SurveyError::MissingParticipantId { line });
    }

    let raw_variant = fields[columns.variant].trim();
    let variant = raw_variant
        .parse::<Variant>()
        .map_err(|()| SurveyError::InvalidVariant {
            line,
            value: raw_variant.to_string(),
        })?;

    let ease_of_use = parse_rating(&fields[columns.ease_of_use], "EaseOfUse", line)?;
    let likely_to_use = parse_rating(&fields[columns.likely_to_use], "LikelyToUse", line)?;
    let clarity = parse_rating(&fields[columns.clarity], "Clarity", line)?;
    let overall = match columns.overall {
        Some(idx) => parse_rating(&fields[idx], "Overall", line)?,
        None => (ease_of_use + likely_to_use + clarity) / 3.0,
    };

    let recommend = parse_recommend(&fields[columns.recommend], line)?;

    Ok(SurveyResponse {
        participant_id,
        variant,
        ease_of_use,
        likely_to_use,
        clarity,
        overall,
        recommend,
    })
}

fn parse_rating(raw: &str, column: &'static str, line: usize) -> Result<f64, SurveyError> {
    let value: f64 = raw.trim().parse().map_err(|_| SurveyError::InvalidRating {
        line,
        column,
        value: raw.trim().to_string(),
    })?;

    let (lo, hi) = RATING_RANGE;
    if !value.is_finite() || value < lo || value > hi {
        return Err(SurveyError::RatingOutOfRange {
            line,
            column,
            value,
        });
    }
    Ok(value)
}

fn parse_recommend(raw: &str, line: usize) -> Result<bool, SurveyError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" | "true" | "1" => Ok(true),
        "n" | "no" | "false" | "0" => Ok(false),
        _ => Err(SurveyError::InvalidRecommendation {
            line,
            value: raw.trim().to_string(),
        }),
    }
}

/// Split one CSV record into fields
///
/// Quoted fields may contain commas and doubled quotes (`""`).
fn parse_csv_line(text: &str, line: usize) -> Result<Vec<String>, SurveyError> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match (c, in_quotes) {
            ('"', true) => {
                if chars.peek() == Some(&'"') {
                    field.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            ('"', false) if field.trim().is_empty() => {
                field.clear();
                in_quotes = true;
            }
            (',', false) => fields.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(SurveyError::UnterminatedQuote { line });
    }
    fields.push(field);
    Ok(fields)
}
