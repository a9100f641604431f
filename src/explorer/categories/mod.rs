mod vocab;

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::archive::{Record, RecordKind};
use crate::config::CategoryConfig;
use crate::util::stable_unit;

use vocab::{CRIME_KEYWORDS, GAZETTEER, OBJECT_CLASSES, STATUTES};

pub const UNCLASSIFIED: &str = "unclassified";
pub const GENERAL_REGION: &str = "general region";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Dimension {
    ObjectType,
    Decade,
    CrimeType,
    Region,
    ObjectClass,
}

impl Dimension {
    pub const ALL: [Dimension; 5] = [
        Self::ObjectType,
        Self::Decade,
        Self::CrimeType,
        Self::Region,
        Self::ObjectClass,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::ObjectType => "Object type",
            Self::Decade => "Decade",
            Self::CrimeType => "Crime type",
            Self::Region => "Region",
            Self::ObjectClass => "Object class",
        }
    }

    /// Key every record falls back to when nothing matches.
    pub fn fallback_key(self) -> &'static str {
        match self {
            Self::Region => GENERAL_REGION,
            _ => UNCLASSIFIED,
        }
    }
}

/// How a record's year was recovered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DateSource {
    Explicit,
    Text,
    Estimated,
    Unknown,
}

impl DateSource {
    pub fn label(self) -> &'static str {
        match self {
            Self::Explicit => "catalogued",
            Self::Text => "from text",
            Self::Estimated => "estimated",
            Self::Unknown => "unknown",
        }
    }
}

/// One key per dimension for a single record.
#[derive(Clone, Debug, PartialEq)]
pub struct CategoryKeys {
    pub object_type: String,
    pub year: Option<i32>,
    pub date_source: DateSource,
    pub decade: String,
    /// Every crime category the text matched, in priority order.
    pub crime_matches: Vec<String>,
    pub crime_type: String,
    pub region: String,
    pub object_class: String,
}

impl CategoryKeys {
    pub fn key(&self, dimension: Dimension) -> &str {
        match dimension {
            Dimension::ObjectType => &self.object_type,
            Dimension::Decade => &self.decade,
            Dimension::CrimeType => &self.crime_type,
            Dimension::Region => &self.region,
            Dimension::ObjectClass => &self.object_class,
        }
    }
}

#[derive(Default)]
pub struct Categories {
    keys: Vec<CategoryKeys>,
    groups: BTreeMap<Dimension, BTreeMap<String, Vec<usize>>>,
    dropped_crimes: Vec<(String, usize)>,
}

impl Categories {
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn keys(&self, index: usize) -> Option<&CategoryKeys> {
        self.keys.get(index)
    }

    pub fn key(&self, index: usize, dimension: Dimension) -> &str {
        self.keys
            .get(index)
            .map(|keys| keys.key(dimension))
            .unwrap_or_else(|| dimension.fallback_key())
    }

    /// Category key → member record indices, in key order.
    pub fn groups(&self, dimension: Dimension) -> Option<&BTreeMap<String, Vec<usize>>> {
        self.groups.get(&dimension)
    }

    pub fn group_count(&self, dimension: Dimension) -> usize {
        self.groups.get(&dimension).map_or(0, BTreeMap::len)
    }

    /// Dimensions with more than one populated category.
    pub fn groupable_dimensions(&self) -> Vec<Dimension> {
        Dimension::ALL
            .into_iter()
            .filter(|dimension| self.group_count(*dimension) > 1)
            .collect()
    }

    /// Crime categories that matched but stayed below the support threshold.
    pub fn dropped_crimes(&self) -> &[(String, usize)] {
        &self.dropped_crimes
    }
}

pub struct CategoryExtractor {
    config: CategoryConfig,
    gazetteer: Vec<(&'static str, &'static str)>,
}

impl CategoryExtractor {
    pub fn new(config: CategoryConfig) -> Self {
        let mut gazetteer = GAZETTEER.to_vec();
        // Longer names first so "feldkirchen" is not read as "feldkirch".
        gazetteer.sort_by(|a, b| b.0.chars().count().cmp(&a.0.chars().count()));
        Self { config, gazetteer }
    }

    pub fn extract(&self, records: &[Record]) -> Categories {
        let mut keys = Vec::with_capacity(records.len());
        let mut crime_support: HashMap<String, usize> = HashMap::new();

        for record in records {
            let text = record.folded_text();
            let (year, date_source) = self.resolve_year(record, &text);
            let decade = year.map_or_else(|| UNCLASSIFIED.to_owned(), decade_label);
            let crime_matches = crime_matches(record, &text);
            for crime in &crime_matches {
                *crime_support.entry(crime.clone()).or_default() += 1;
            }

            keys.push(CategoryKeys {
                object_type: record.kind.label().to_owned(),
                year,
                date_source,
                decade,
                crime_matches,
                crime_type: UNCLASSIFIED.to_owned(),
                region: self.region(record, &text),
                object_class: object_class(record, &text),
            });
        }

        let min_support = self.config.min_crime_support;
        for entry in &mut keys {
            if let Some(primary) = entry
                .crime_matches
                .iter()
                .find(|crime| crime_support.get(*crime).copied().unwrap_or(0) >= min_support)
            {
                entry.crime_type = primary.clone();
            }
        }

        let mut dropped_crimes = crime_support
            .into_iter()
            .filter(|(_, support)| *support < min_support)
            .collect::<Vec<_>>();
        dropped_crimes.sort();

        let mut groups: BTreeMap<Dimension, BTreeMap<String, Vec<usize>>> = BTreeMap::new();
        for dimension in Dimension::ALL {
            let by_key = groups.entry(dimension).or_default();
            for (index, entry) in keys.iter().enumerate() {
                by_key
                    .entry(entry.key(dimension).to_owned())
                    .or_default()
                    .push(index);
            }
        }

        debug!(
            records = keys.len(),
            decades = groups.get(&Dimension::Decade).map_or(0, BTreeMap::len),
            crimes = groups.get(&Dimension::CrimeType).map_or(0, BTreeMap::len),
            dropped_crimes = dropped_crimes.len(),
            "extracted categories"
        );

        Categories {
            keys,
            groups,
            dropped_crimes,
        }
    }

    fn in_span(&self, year: i32) -> bool {
        let [start, end] = self.config.historical_span;
        (start..=end).contains(&year)
    }

    /// Explicit fields, then years in free text, then a stable estimate
    /// inside the historical span.
    pub fn resolve_year(&self, record: &Record, text: &str) -> (Option<i32>, DateSource) {
        if let Some(year) = record.historical_year.filter(|year| self.in_span(*year)) {
            let source = if record.year_estimated {
                DateSource::Estimated
            } else {
                DateSource::Explicit
            };
            return (Some(year), source);
        }

        if let Some(year) = record
            .created_date
            .as_deref()
            .and_then(leading_year)
            .filter(|year| self.in_span(*year))
        {
            return (Some(year), DateSource::Explicit);
        }

        if let Some(year) = years_in_text(text).filter(|year| self.in_span(*year)).min() {
            return (Some(year), DateSource::Text);
        }

        if self.config.estimate_missing_years {
            let [start, end] = self.config.historical_span;
            let spread = (end - start) as f64;
            let year = start + (stable_unit(&record.id) * spread).floor() as i32;
            return (Some(year.min(end)), DateSource::Estimated);
        }

        (None, DateSource::Unknown)
    }

    fn region(&self, record: &Record, text: &str) -> String {
        let hinted = record.location_hints.iter().find_map(|hint| {
            let hint = hint.to_lowercase();
            self.gazetteer
                .iter()
                .find(|(place, _)| hint.contains(place))
                .map(|(_, state)| *state)
        });

        hinted
            .or_else(|| {
                self.gazetteer
                    .iter()
                    .find(|(place, _)| text.contains(place))
                    .map(|(_, state)| *state)
            })
            .unwrap_or(GENERAL_REGION)
            .to_owned()
    }
}

pub fn decade_label(year: i32) -> String {
    format!("{}s", year.div_euclid(10) * 10)
}

fn leading_year(date: &str) -> Option<i32> {
    let digits = date.trim().get(..4)?;
    if digits.bytes().all(|byte| byte.is_ascii_digit()) {
        digits.parse().ok()
    } else {
        None
    }
}

/// Standalone runs of exactly four digits.
fn years_in_text(text: &str) -> impl Iterator<Item = i32> + '_ {
    let bytes = text.as_bytes();
    let mut start = 0usize;
    std::iter::from_fn(move || {
        while start < bytes.len() {
            if !bytes[start].is_ascii_digit() {
                start += 1;
                continue;
            }

            let run_start = start;
            while start < bytes.len() && bytes[start].is_ascii_digit() {
                start += 1;
            }
            let bounded_before = run_start == 0 || !bytes[run_start - 1].is_ascii_alphabetic();
            let bounded_after = start == bytes.len() || !bytes[start].is_ascii_alphabetic();
            if start - run_start == 4 && bounded_before && bounded_after {
                return text[run_start..start].parse().ok();
            }
        }
        None
    })
}

/// Statute numbers following a `§` sign, e.g. `§ 171` or `§§ 460, 467`.
fn statute_numbers(text: &str) -> Vec<u32> {
    let mut numbers = Vec::new();
    for (offset, _) in text.match_indices('§') {
        if text[..offset].ends_with('§') {
            continue;
        }
        let tail = &text[offset..];
        let mut current = String::new();
        for character in tail.chars().skip(1) {
            if character.is_ascii_digit() {
                current.push(character);
            } else if matches!(character, '§' | ' ' | ',') || character.is_ascii_lowercase() {
                if let Ok(number) = current.parse() {
                    numbers.push(number);
                }
                current.clear();
                if character.is_ascii_lowercase() {
                    break;
                }
            } else {
                break;
            }
        }
        if let Ok(number) = current.parse() {
            numbers.push(number);
        }
    }
    numbers
}

fn crime_matches(record: &Record, text: &str) -> Vec<String> {
    let mut matches: Vec<String> = Vec::new();
    let mut push = |crime: &str| {
        if !matches.iter().any(|existing| existing == crime) {
            matches.push(crime.to_owned());
        }
    };

    if record.has_text() {
        let statutes = statute_numbers(text);
        for (crime, keywords) in CRIME_KEYWORDS {
            let by_keyword = keywords.iter().any(|keyword| text.contains(keyword));
            let by_statute = STATUTES
                .iter()
                .any(|(number, statute_crime)| statute_crime == crime && statutes.contains(number));
            if by_keyword || by_statute {
                push(*crime);
            }
        }
    }

    for hint in record.crime_hints.iter().filter(|hint| !hint.trim().is_empty()) {
        let known = CRIME_KEYWORDS
            .iter()
            .find(|(crime, _)| crime.eq_ignore_ascii_case(hint.trim()))
            .map(|(crime, _)| *crime);
        push(known.unwrap_or(hint.trim()));
    }

    let priority = |crime: &String| {
        CRIME_KEYWORDS
            .iter()
            .position(|(known, _)| known == crime)
            .unwrap_or(CRIME_KEYWORDS.len())
    };
    matches.sort_by_key(priority);
    matches
}

fn object_class(record: &Record, text: &str) -> String {
    if let Some(hint) = record.object_class_hint.as_deref() {
        let head = hint.split('.').next().unwrap_or(hint).trim();
        if !head.is_empty() {
            return head.to_owned();
        }
    }

    if record.kind == RecordKind::IndexCard {
        return "Dokument".to_owned();
    }

    let matched = OBJECT_CLASSES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|keyword| text.contains(keyword)))
        .map(|(class, _)| *class);

    match (matched, record.kind) {
        (Some(class), _) => class.to_owned(),
        (None, RecordKind::Object) => "Beweisstück".to_owned(),
        (None, _) => UNCLASSIFIED.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> CategoryExtractor {
        CategoryExtractor::new(CategoryConfig::default())
    }

    fn object(id: &str, title: &str, description: &str) -> Record {
        Record::new(id, RecordKind::Object)
            .with_title(title)
            .with_description(description)
    }

    #[test]
    fn created_date_maps_to_decade() {
        let record = Record::new("o:km.1", RecordKind::IndexCard).with_created_date("1923");
        let categories = extractor().extract(&[record]);
        assert_eq!(categories.key(0, Dimension::Decade), "1920s");
        assert_eq!(categories.keys(0).map(|keys| keys.date_source), Some(DateSource::Explicit));
    }

    #[test]
    fn digitization_dates_fall_through_to_text() {
        let record = object("o:km.2", "Gewehr", "beschlagnahmt 1907 in Murau")
            .with_created_date("2019-04-02T10:11:12Z");
        let categories = extractor().extract(&[record]);
        assert_eq!(categories.key(0, Dimension::Decade), "1900s");
        assert_eq!(categories.keys(0).map(|keys| keys.date_source), Some(DateSource::Text));
    }

    #[test]
    fn missing_year_is_estimated_inside_span() {
        let categories = extractor().extract(&[object("o:km.3", "Messer", "")]);
        let keys = categories.keys(0).expect("keys");
        assert_eq!(keys.date_source, DateSource::Estimated);
        assert!((1850..=1950).contains(&keys.year.expect("estimated year")));
    }

    #[test]
    fn missing_year_without_estimation_is_unclassified() {
        let config = CategoryConfig {
            estimate_missing_years: false,
            ..CategoryConfig::default()
        };
        let categories = CategoryExtractor::new(config).extract(&[object("o:km.4", "Messer", "")]);
        assert_eq!(categories.key(0, Dimension::Decade), UNCLASSIFIED);
    }

    #[test]
    fn years_need_word_boundaries() {
        let years = years_in_text("km1923 und 1887, nicht 19234").collect::<Vec<_>>();
        assert_eq!(years, vec![1887]);
    }

    #[test]
    fn statutes_are_read_after_paragraph_signs() {
        assert_eq!(statute_numbers("verurteilt nach §§ 171, 174 stg"), vec![171, 174]);
        assert_eq!(statute_numbers("§460"), vec![460]);
    }

    #[test]
    fn rare_crimes_fold_into_unclassified() {
        let mut records = (0..5)
            .map(|i| object(&format!("o:km.w{i}"), "Schlinge", "Wilderei im Revier"))
            .collect::<Vec<_>>();
        records.push(object("o:km.s", "Kiste", "Schmuggel über die Grenze"));

        let categories = extractor().extract(&records);
        assert_eq!(categories.key(0, Dimension::CrimeType), "Wilderei");
        assert_eq!(categories.key(5, Dimension::CrimeType), UNCLASSIFIED);
        assert_eq!(
            categories.keys(5).map(|keys| keys.crime_matches.clone()),
            Some(vec!["Schmuggel".to_owned()])
        );
        assert_eq!(categories.dropped_crimes(), &[("Schmuggel".to_owned(), 1)]);
    }

    #[test]
    fn regions_prefer_longer_place_names() {
        let records = [
            object("a", "Akt", "Bezirksgericht Feldkirchen"),
            object("b", "Akt", "Gendarmerie Feldkirch"),
            object("c", "Akt", "ohne Ortsangabe"),
        ];
        let categories = extractor().extract(&records);
        assert_eq!(categories.key(0, Dimension::Region), "Kärnten");
        assert_eq!(categories.key(1, Dimension::Region), "Vorarlberg");
        assert_eq!(categories.key(2, Dimension::Region), GENERAL_REGION);
    }

    #[test]
    fn object_classes_follow_keywords_and_kind() {
        let records = [
            object("a", "Flobertpistole", ""),
            Record::new("b", RecordKind::IndexCard),
            object("c", "Holzkiste", ""),
            Record::new("d", RecordKind::Unknown),
        ];
        let categories = extractor().extract(&records);
        assert_eq!(categories.key(0, Dimension::ObjectClass), "Waffe");
        assert_eq!(categories.key(1, Dimension::ObjectClass), "Dokument");
        assert_eq!(categories.key(2, Dimension::ObjectClass), "Beweisstück");
        assert_eq!(categories.key(3, Dimension::ObjectClass), UNCLASSIFIED);
    }

    #[test]
    fn groupable_dimensions_need_two_categories() {
        let records = [
            Record::new("a", RecordKind::IndexCard),
            Record::new("b", RecordKind::Object),
        ];
        let categories = extractor().extract(&records);
        let groupable = categories.groupable_dimensions();
        assert!(groupable.contains(&Dimension::ObjectType));
        assert!(!groupable.contains(&Dimension::Region));
    }
}
