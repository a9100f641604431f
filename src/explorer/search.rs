use std::cmp::Reverse;

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::archive::Record;

/// Lowercased text per record, built once per collection.
pub struct SearchIndex {
    haystacks: Vec<String>,
    last: Option<(String, Vec<usize>)>,
}

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_lowercase(), query))
}

impl SearchIndex {
    pub fn new(records: &[Record]) -> Self {
        let haystacks = records
            .iter()
            .map(|record| {
                format!(
                    "{}\n{}\n{}\n{}\n{}",
                    record.title,
                    record.description,
                    record.id,
                    record.kind.label(),
                    record.container
                )
                .to_lowercase()
            })
            .collect();
        Self {
            haystacks,
            last: None,
        }
    }

    /// Case-insensitive substring search over title, description, id and type.
    /// Results are ordered by how well the title fuzzy-matches the query, then
    /// by record order. A blank query matches nothing and drops the cached
    /// result.
    pub fn find(&mut self, records: &[Record], query: &str) -> Vec<usize> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            self.last = None;
            return Vec::new();
        }
        if let Some((cached, matches)) = &self.last
            && *cached == query
        {
            return matches.clone();
        }

        let matcher = SkimMatcherV2::default();
        let mut scored = self
            .haystacks
            .iter()
            .enumerate()
            .filter(|(_, haystack)| haystack.contains(&query))
            .map(|(index, _)| {
                let score = records
                    .get(index)
                    .and_then(|record| fuzzy_match_score(&matcher, record.display_title(), &query));
                (Reverse(score.unwrap_or(i64::MIN)), index)
            })
            .collect::<Vec<_>>();
        scored.sort_unstable();

        let matches = scored.into_iter().map(|(_, index)| index).collect::<Vec<_>>();
        self.last = Some((query, matches.clone()));
        matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::RecordKind;

    fn records() -> Vec<Record> {
        vec![
            Record::new("o:km.10", RecordKind::Object)
                .with_title("Schlüsselbund")
                .with_description("Sichergestellt bei einem Einbruch in Graz"),
            Record::new("o:km.11", RecordKind::IndexCard).with_title("Karteikarte Einbruch Leoben"),
            Record::new("o:km.12", RecordKind::Object).with_title("Wildererstutzen"),
        ]
    }

    #[test]
    fn matches_are_case_insensitive_over_all_fields() {
        let records = records();
        let mut index = SearchIndex::new(&records);
        let mut found = index.find(&records, "EINBRUCH");
        found.sort_unstable();
        assert_eq!(found, vec![0, 1]);
        assert_eq!(index.find(&records, "km.12"), vec![2]);
        assert_eq!(index.find(&records, "karteikarte"), vec![1]);
        assert_eq!(index.find(&records, "objekt").len(), 2);
    }

    #[test]
    fn blank_query_drops_the_cached_result() {
        let records = records();
        let mut index = SearchIndex::new(&records);
        let first = index.find(&records, "einbruch");
        assert!(index.last.is_some());

        assert!(index.find(&records, "  ").is_empty());
        assert!(index.last.is_none());
        assert_eq!(index.find(&records, "einbruch"), first);
    }

    #[test]
    fn title_matches_rank_first() {
        let records = records();
        let mut index = SearchIndex::new(&records);
        assert_eq!(index.find(&records, "einbruch"), vec![1, 0]);
    }

    #[test]
    fn blank_query_matches_nothing() {
        let records = records();
        let mut index = SearchIndex::new(&records);
        assert!(index.find(&records, "   ").is_empty());
        assert!(index.find(&records, "pferdedecke").is_empty());
    }
}
