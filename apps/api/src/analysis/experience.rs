//! Experience Estimator. Finds employment date ranges in free text and sums them
//! into total years of experience.
//!
//! Recognised formats (en/em dashes are treated as `-`):
//! - `03/2021 - Present`
//! - `01/2019 - 06/2022`
//! - `Jan 2019 - Mar 2021`, `June 2020 to Present`, `Sept 2018 - 2020`
//! - `2018 - 2020`, `2021 - Present`
//!
//! Unparseable fragments are skipped. No input ever produces an error; text with
//! no recognisable range yields 0.0.

use std::str::FromStr;

use chrono::{Datelike, Months, NaiveDate};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Average Gregorian year length used to convert day spans into years.
pub const DAYS_PER_YEAR: f64 = 365.25;
/// Totals above this are treated as parsing noise and capped.
pub const MAX_TOTAL_YEARS: f64 = 60.0;

const MONTH: &str = r"jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?";
const NUMERIC_MONTH: &str = r"0?[1-9]|1[0-2]";
const YEAR: &str = r"(?:19|20)\d{2}";
const PRESENT: &str = r"present|current|tilldate|till|now|ongoing";
const RANGE_SEP: &str = r"\s*(?:-|to|through)\s*";

static NUMERIC_TO_PRESENT: Lazy<Regex> = Lazy::new(|| {
    compile(&format!(
        r"(?i)\b(?P<sm>{NUMERIC_MONTH})\s*[/-]\s*(?P<sy>{YEAR}){RANGE_SEP}(?P<present>{PRESENT})\b"
    ))
});

static NUMERIC_TO_NUMERIC: Lazy<Regex> = Lazy::new(|| {
    compile(&format!(
        r"(?i)\b(?P<sm>{NUMERIC_MONTH})\s*[/-]\s*(?P<sy>{YEAR}){RANGE_SEP}(?P<em>{NUMERIC_MONTH})\s*[/-]\s*(?P<ey>{YEAR})\b"
    ))
});

static NAMED_MONTH: Lazy<Regex> = Lazy::new(|| {
    compile(&format!(
        r"(?i)\b(?P<sm>{MONTH})\s*[,./ -]*\s*(?P<sy>{YEAR}){RANGE_SEP}(?:(?P<present>{PRESENT})\b|(?P<em>{MONTH})\s*[,./ -]*\s*(?P<ey>{YEAR})\b|(?P<ey_only>{YEAR})\b)"
    ))
});

static YEAR_ONLY: Lazy<Regex> = Lazy::new(|| {
    compile(&format!(
        r"(?i)\b(?P<sy>{YEAR}){RANGE_SEP}(?:(?P<ey>{YEAR})|(?P<present>{PRESENT}))\b"
    ))
});

static SECTION_START: Lazy<Regex> = Lazy::new(|| {
    compile(
        r"(?im)(?:^|\s)(?P<key>work experience|professional experience|employment history|professional history|work history|experience|employment|career|internships|internship|positions)(?:\s|$|:)",
    )
});

static SECTION_END: Lazy<Regex> = Lazy::new(|| {
    compile(
        r"(?im)(?:^|\s)(?P<key>education|projects|skills|certifications|awards|achievements|publications|summary|objective|academic|qualifications|training|certificate)(?:\s|$|:)",
    )
});

type RangeParser = fn(&Captures, NaiveDate) -> Option<DateRange>;

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("date pattern is valid")
}

/// How concurrent employment periods are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
    /// Overlapping or adjacent ranges are unioned before summing, so two
    /// concurrent jobs count once.
    #[default]
    Merge,
    /// Every range is summed as-is; concurrent jobs are double-counted.
    Additive,
}

#[derive(Debug, Error)]
#[error("unknown overlap policy '{0}' (expected 'merge' or 'additive')")]
pub struct UnknownOverlapPolicy(String);

impl FromStr for OverlapPolicy {
    type Err = UnknownOverlapPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "merge" => Ok(OverlapPolicy::Merge),
            "additive" => Ok(OverlapPolicy::Additive),
            other => Err(UnknownOverlapPolicy(other.to_string())),
        }
    }
}

/// End of an employment period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeEnd {
    /// Last month worked, stored as the first day of that month. The month is
    /// covered in full, but never past the evaluation date.
    Month(NaiveDate),
    /// Still ongoing; resolved to the evaluation date.
    Present,
}

/// One period of work experience. `start` is the first day of the start month
/// and never lies after the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: RangeEnd,
}

impl DateRange {
    /// First day not covered by this range.
    pub fn end_exclusive(&self, today: NaiveDate) -> NaiveDate {
        match self.end {
            RangeEnd::Present => today,
            RangeEnd::Month(month) => month
                .checked_add_months(Months::new(1))
                .unwrap_or(month)
                .min(today),
        }
    }

    /// Length of the range in years (days / 365.25).
    pub fn years(&self, today: NaiveDate) -> f64 {
        days_between(self.start, self.end_exclusive(today)) as f64 / DAYS_PER_YEAR
    }
}

/// Result of running the estimator over a resume.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperienceEstimate {
    /// Total years, rounded to one decimal and capped at `MAX_TOTAL_YEARS`.
    pub years: f64,
    pub ranges: Vec<DateRange>,
    pub policy: OverlapPolicy,
    pub evaluated_on: NaiveDate,
}

/// Estimates total years of experience from raw resume text.
pub fn estimate_years(text: &str, today: NaiveDate, policy: OverlapPolicy) -> f64 {
    estimate(text, today, policy).years
}

/// Same as [`estimate`] over phrases that were already segmented, one range
/// per phrase. Heading-based section isolation is skipped.
pub fn estimate_from_phrases<S: AsRef<str>>(
    phrases: &[S],
    today: NaiveDate,
    policy: OverlapPolicy,
) -> ExperienceEstimate {
    let mut ranges: Vec<DateRange> = phrases
        .iter()
        .flat_map(|phrase| extract_date_ranges(phrase.as_ref(), today))
        .collect();
    ranges.sort_by_key(|r| r.start);
    summarize(ranges, today, policy)
}

/// Full estimate including the ranges that contributed to the total.
pub fn estimate(text: &str, today: NaiveDate, policy: OverlapPolicy) -> ExperienceEstimate {
    let section = experience_section(text);

    let mut ranges = extract_date_ranges(section, today);
    if ranges.is_empty() && section.len() != text.len() {
        ranges = extract_date_ranges(text, today);
    }

    summarize(ranges, today, policy)
}

fn summarize(ranges: Vec<DateRange>, today: NaiveDate, policy: OverlapPolicy) -> ExperienceEstimate {
    let total = total_years(&ranges, today, policy).min(MAX_TOTAL_YEARS);

    ExperienceEstimate {
        years: round_one_decimal(total),
        ranges,
        policy,
        evaluated_on: today,
    }
}

/// Unrounded sum of `ranges` under the given overlap policy.
pub fn total_years(ranges: &[DateRange], today: NaiveDate, policy: OverlapPolicy) -> f64 {
    match policy {
        OverlapPolicy::Additive => ranges.iter().map(|r| r.years(today)).sum(),
        OverlapPolicy::Merge => {
            let days: i64 = merge_intervals(ranges, today)
                .into_iter()
                .map(|(start, end)| days_between(start, end))
                .sum();
            days as f64 / DAYS_PER_YEAR
        }
    }
}

/// Unions overlapping or touching ranges into half-open `[start, end)` intervals.
fn merge_intervals(ranges: &[DateRange], today: NaiveDate) -> Vec<(NaiveDate, NaiveDate)> {
    let mut intervals: Vec<(NaiveDate, NaiveDate)> = ranges
        .iter()
        .map(|r| (r.start, r.end_exclusive(today)))
        .collect();
    intervals.sort();

    let mut merged: Vec<(NaiveDate, NaiveDate)> = Vec::with_capacity(intervals.len());
    for (start, end) in intervals {
        match merged.last_mut() {
            Some((_, last_end)) if start <= *last_end => {
                if end > *last_end {
                    *last_end = end;
                }
            }
            _ => merged.push((start, end)),
        }
    }
    merged
}

/// Finds every recognisable date range in `text`. Patterns are tried from most
/// to least specific; text already claimed by an earlier match is not reused.
pub fn extract_date_ranges(text: &str, today: NaiveDate) -> Vec<DateRange> {
    let text = normalize_dashes(text);
    let mut claimed: Vec<(usize, usize)> = Vec::new();
    let mut ranges = Vec::new();

    let patterns: [(&Regex, RangeParser); 4] = [
        (&*NUMERIC_TO_PRESENT, parse_numeric),
        (&*NUMERIC_TO_NUMERIC, parse_numeric),
        (&*NAMED_MONTH, parse_named),
        (&*YEAR_ONLY, parse_year_only),
    ];

    for (pattern, parse) in patterns {
        for caps in pattern.captures_iter(&text) {
            let Some(whole) = caps.get(0) else { continue };
            let span = (whole.start(), whole.end());
            if claimed.iter().any(|&(s, e)| span.0 < e && s < span.1) {
                continue;
            }
            if let Some(range) = parse(&caps, today) {
                claimed.push(span);
                ranges.push(range);
            }
        }
    }

    ranges.sort_by_key(|r| r.start);
    ranges
}

fn parse_numeric(caps: &Captures, today: NaiveDate) -> Option<DateRange> {
    let start = (number(caps, "sy")?, number::<u32>(caps, "sm")?);
    if caps.name("present").is_some() {
        return build_range(start, None, today);
    }
    let end = (number(caps, "ey")?, number::<u32>(caps, "em")?);
    build_range(start, Some(end), today)
}

fn parse_named(caps: &Captures, today: NaiveDate) -> Option<DateRange> {
    let start = (number(caps, "sy")?, month_from_name(caps.name("sm")?.as_str())?);
    if caps.name("present").is_some() {
        return build_range(start, None, today);
    }
    let end = if let Some(year) = caps.name("ey_only") {
        (year.as_str().parse().ok()?, 12)
    } else {
        (number(caps, "ey")?, month_from_name(caps.name("em")?.as_str())?)
    };
    build_range(start, Some(end), today)
}

fn parse_year_only(caps: &Captures, today: NaiveDate) -> Option<DateRange> {
    let start_year: i32 = number(caps, "sy")?;
    if caps.name("present").is_some() {
        return build_range((start_year, 1), None, today);
    }
    let end_year: i32 = number(caps, "ey")?;
    let (first, last) = (start_year.min(end_year), start_year.max(end_year));
    build_range((first, 1), Some((last, 12)), today)
}

/// Validates endpoints and orders them. `end == None` means "present".
fn build_range(
    start: (i32, u32),
    end: Option<(i32, u32)>,
    today: NaiveDate,
) -> Option<DateRange> {
    let max_year = today.year() + 1;
    let valid = |(year, month): (i32, u32)| (1900..=max_year).contains(&year) && (1..=12).contains(&month);
    if !valid(start) {
        return None;
    }

    let Some(end) = end else {
        let start = first_of_month(start)?;
        // a start in the future contributes nothing
        return (start <= today).then_some(DateRange {
            start,
            end: RangeEnd::Present,
        });
    };

    if !valid(end) {
        return None;
    }
    let (start, end) = if start > end { (end, start) } else { (start, end) };
    // ranges that have not finished yet are noise (e.g. expected graduation)
    if end > (today.year(), today.month()) {
        return None;
    }

    Some(DateRange {
        start: first_of_month(start)?,
        end: RangeEnd::Month(first_of_month(end)?),
    })
}

/// Narrows text to the experience section so education dates do not count.
/// Returns the whole text when no experience heading exists.
fn experience_section(text: &str) -> &str {
    let Some(start) = SECTION_START
        .captures(text)
        .and_then(|c| c.name("key"))
        .map(|m| m.start())
    else {
        return text;
    };

    let tail = &text[start..];
    let end = SECTION_END
        .captures_iter(tail)
        .filter_map(|c| c.name("key"))
        .map(|m| m.start())
        .find(|&pos| pos > 0)
        .map(|pos| start + pos)
        .unwrap_or(text.len());

    &text[start..end]
}

fn normalize_dashes(text: &str) -> String {
    text.replace(|c: char| matches!(c, '\u{2013}' | '\u{2014}' | '\u{2212}'), "-")
}

fn month_from_name(name: &str) -> Option<u32> {
    let prefix: String = name.chars().take(3).collect::<String>().to_lowercase();
    let month = match prefix.as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

fn number<T: FromStr>(caps: &Captures, group: &str) -> Option<T> {
    caps.name(group)?.as_str().parse().ok()
}

fn first_of_month((year, month): (i32, u32)) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

fn days_between(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days().max(0)
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
