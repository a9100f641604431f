#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordKind {
    IndexCard,
    Object,
    Unknown,
}

impl RecordKind {
    pub fn from_container(raw: &str) -> Self {
        let lowered = raw.trim().to_lowercase();
        if lowered.starts_with("kartei") || lowered.starts_with("index") {
            Self::IndexCard
        } else if lowered.starts_with("objekt") || lowered.starts_with("object") {
            Self::Object
        } else {
            Self::Unknown
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::IndexCard => "Karteikarte",
            Self::Object => "Objekt",
            Self::Unknown => "unclassified",
        }
    }
}

/// One archive entry as delivered by the harvester. Immutable after load.
#[derive(Clone, Debug)]
pub struct Record {
    pub id: String,
    pub kind: RecordKind,
    /// Container string exactly as harvested, kept for unknown kinds.
    pub container: String,
    pub title: String,
    pub description: String,
    pub created_date: Option<String>,
    pub historical_year: Option<i32>,
    pub year_estimated: bool,
    pub has_image: bool,
    pub has_primary_source: bool,
    pub has_rdf: bool,
    pub crime_hints: Vec<String>,
    pub location_hints: Vec<String>,
    pub object_class_hint: Option<String>,
}

impl Record {
    pub fn new(id: impl Into<String>, kind: RecordKind) -> Self {
        let id = id.into();
        Self {
            container: kind.label().to_owned(),
            id,
            kind,
            title: String::new(),
            description: String::new(),
            created_date: None,
            historical_year: None,
            year_estimated: false,
            has_image: false,
            has_primary_source: false,
            has_rdf: false,
            crime_hints: Vec::new(),
            location_hints: Vec::new(),
            object_class_hint: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_created_date(mut self, created_date: impl Into<String>) -> Self {
        self.created_date = Some(created_date.into());
        self
    }

    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            &self.id
        } else {
            &self.title
        }
    }

    pub fn has_text(&self) -> bool {
        !self.title.trim().is_empty() || !self.description.trim().is_empty()
    }

    /// Lowercased title and description, the haystack for keyword heuristics.
    pub fn folded_text(&self) -> String {
        format!("{} {}", self.title, self.description).to_lowercase()
    }
}
