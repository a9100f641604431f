use std::collections::BTreeMap;
use std::fmt;

use super::record::Record;
use crate::explorer::categories::{Categories, DateSource, Dimension};
use crate::util::percent;

/// Summary of a loaded collection, printed by `--report`.
#[derive(Clone, Debug)]
pub struct CollectionReport {
    pub total: usize,
    pub by_kind: BTreeMap<&'static str, usize>,
    pub with_image: usize,
    pub with_primary_source: usize,
    pub with_rdf: usize,
    pub with_text: usize,
    pub date_sources: BTreeMap<DateSource, usize>,
    pub groups: Vec<(Dimension, Vec<(String, usize)>)>,
    pub groupable: Vec<Dimension>,
    pub dropped_crimes: Vec<(String, usize)>,
}

impl CollectionReport {
    pub fn new(records: &[Record], categories: &Categories) -> Self {
        let mut by_kind: BTreeMap<&'static str, usize> = BTreeMap::new();
        for record in records {
            *by_kind.entry(record.kind.label()).or_default() += 1;
        }

        let mut date_sources: BTreeMap<DateSource, usize> = BTreeMap::new();
        for index in 0..categories.len() {
            if let Some(keys) = categories.keys(index) {
                *date_sources.entry(keys.date_source).or_default() += 1;
            }
        }

        let groups: Vec<(Dimension, Vec<(String, usize)>)> = Dimension::ALL
            .into_iter()
            .map(|dimension| {
                let mut sizes = categories
                    .groups(dimension)
                    .map(|groups| {
                        groups
                            .iter()
                            .map(|(key, members)| (key.clone(), members.len()))
                            .collect::<Vec<_>>()
                    })
                    .unwrap_or_default();
                sizes.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
                (dimension, sizes)
            })
            .collect();

        Self {
            total: records.len(),
            by_kind,
            with_image: records.iter().filter(|record| record.has_image).count(),
            with_primary_source: records.iter().filter(|record| record.has_primary_source).count(),
            with_rdf: records.iter().filter(|record| record.has_rdf).count(),
            with_text: records.iter().filter(|record| record.has_text()).count(),
            date_sources,
            groups,
            groupable: categories.groupable_dimensions(),
            dropped_crimes: categories.dropped_crimes().to_vec(),
        }
    }

    pub fn group_sizes(&self, dimension: Dimension) -> &[(String, usize)] {
        self.groups
            .iter()
            .find(|(candidate, _)| *candidate == dimension)
            .map(|(_, sizes)| sizes.as_slice())
            .unwrap_or_default()
    }
}

impl fmt::Display for CollectionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.total;
        writeln!(f, "records: {total}")?;
        for (kind, count) in &self.by_kind {
            writeln!(f, "  {kind:<14} {count:>6}")?;
        }

        writeln!(f, "availability:")?;
        for (label, count) in [
            ("image", self.with_image),
            ("primary source", self.with_primary_source),
            ("rdf", self.with_rdf),
            ("text", self.with_text),
        ] {
            writeln!(f, "  {label:<14} {count:>6}  {:>5.1}%", percent(count, total))?;
        }

        writeln!(f, "year coverage:")?;
        for (source, count) in &self.date_sources {
            writeln!(
                f,
                "  {:<14} {count:>6}  {:>5.1}%",
                source.label(),
                percent(*count, total)
            )?;
        }

        for (dimension, sizes) in &self.groups {
            let marker = if self.groupable.contains(dimension) {
                ""
            } else {
                " (not groupable)"
            };
            writeln!(f, "{} ({} groups){marker}:", dimension.label(), sizes.len())?;
            for (key, count) in sizes {
                writeln!(f, "  {key:<24} {count:>6}")?;
            }
        }

        if !self.dropped_crimes.is_empty() {
            writeln!(f, "crime categories below support:")?;
            for (crime, count) in &self.dropped_crimes {
                writeln!(f, "  {crime:<24} {count:>6}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::RecordKind;
    use crate::config::CategoryConfig;
    use crate::explorer::categories::CategoryExtractor;

    #[test]
    fn counts_kinds_and_availability() {
        let mut with_image = Record::new("a", RecordKind::Object).with_title("Revolver");
        with_image.has_image = true;
        let records = vec![
            with_image,
            Record::new("b", RecordKind::IndexCard).with_created_date("1911"),
            Record::new("c", RecordKind::Unknown),
        ];
        let categories = CategoryExtractor::new(CategoryConfig::default()).extract(&records);
        let report = CollectionReport::new(&records, &categories);

        assert_eq!(report.total, 3);
        assert_eq!(report.by_kind.get("Objekt"), Some(&1));
        assert_eq!(report.by_kind.get("unclassified"), Some(&1));
        assert_eq!(report.with_image, 1);
        assert_eq!(report.with_text, 1);
        assert_eq!(report.date_sources.get(&DateSource::Explicit), Some(&1));
        assert_eq!(report.group_sizes(Dimension::ObjectType).len(), 3);

        let text = report.to_string();
        assert!(text.starts_with("records: 3"));
        assert!(text.contains("Object type (3 groups):"));
    }
}
