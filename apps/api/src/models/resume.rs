//! JSON Resume document model.
//!
//! The canonical schema shared by master profiles and generated CVs:
//! one optional `basics` record plus eleven ordered sections. Every
//! field is optional and absence is distinct from empty, so each field
//! carries an explicit `Option` and serialization skips absent fields.
//!
//! The twelve top-level section names form a closed set. Section writes
//! go through [`SectionName`] so an unknown name is rejected before any
//! decode is attempted, and through [`ResumeDocument::apply_section`]
//! so a failed decode leaves the document untouched.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub basics: Option<Basics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work: Option<Vec<Work>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volunteer: Option<Vec<Volunteer>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub education: Option<Vec<Education>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub awards: Option<Vec<Award>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificates: Option<Vec<Certificate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publications: Option<Vec<Publication>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<Skill>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub languages: Option<Vec<Language>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interests: Option<Vec<Interest>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub references: Option<Vec<Reference>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projects: Option<Vec<Project>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Basics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profiles: Option<Vec<Profile>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

/// A social or professional profile link under `basics`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Work {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlights: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volunteer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlights: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub study_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub courses: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Award {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub awarder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Certificate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Publication {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Language {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fluency: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Interest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlights: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Section dispatch
// ────────────────────────────────────────────────────────────────────────────

/// The closed set of top-level section names. Any write naming a
/// section outside this set is rejected at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionName {
    Basics,
    Work,
    Volunteer,
    Education,
    Awards,
    Certificates,
    Publications,
    Skills,
    Languages,
    Interests,
    References,
    Projects,
}

impl SectionName {
    pub const ALL: [SectionName; 12] = [
        SectionName::Basics,
        SectionName::Work,
        SectionName::Volunteer,
        SectionName::Education,
        SectionName::Awards,
        SectionName::Certificates,
        SectionName::Publications,
        SectionName::Skills,
        SectionName::Languages,
        SectionName::Interests,
        SectionName::References,
        SectionName::Projects,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionName::Basics => "basics",
            SectionName::Work => "work",
            SectionName::Volunteer => "volunteer",
            SectionName::Education => "education",
            SectionName::Awards => "awards",
            SectionName::Certificates => "certificates",
            SectionName::Publications => "publications",
            SectionName::Skills => "skills",
            SectionName::Languages => "languages",
            SectionName::Interests => "interests",
            SectionName::References => "references",
            SectionName::Projects => "projects",
        }
    }
}

impl fmt::Display for SectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown section '{0}'")]
pub struct UnknownSection(pub String);

impl FromStr for SectionName {
    type Err = UnknownSection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SectionName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| UnknownSection(s.to_string()))
    }
}

#[derive(Debug, Error)]
#[error("invalid {section} data: {source}")]
pub struct SectionDecodeError {
    pub section: SectionName,
    #[source]
    pub source: serde_json::Error,
}

impl ResumeDocument {
    /// A freshly initialized document: zero-value basics, all sections
    /// present but empty. This is the shape stored for a brand-new
    /// profile so clients can render every section immediately.
    pub fn empty() -> Self {
        ResumeDocument {
            basics: Some(Basics::default()),
            work: Some(vec![]),
            volunteer: Some(vec![]),
            education: Some(vec![]),
            awards: Some(vec![]),
            certificates: Some(vec![]),
            publications: Some(vec![]),
            skills: Some(vec![]),
            languages: Some(vec![]),
            interests: Some(vec![]),
            references: Some(vec![]),
            projects: Some(vec![]),
        }
    }

    /// True when the document carries no content: basics absent or
    /// zero-value, and every section absent or empty.
    pub fn is_empty(&self) -> bool {
        fn none_or_empty<T>(v: &Option<Vec<T>>) -> bool {
            v.as_ref().map_or(true, |s| s.is_empty())
        }

        self.basics
            .as_ref()
            .map_or(true, |b| *b == Basics::default())
            && none_or_empty(&self.work)
            && none_or_empty(&self.volunteer)
            && none_or_empty(&self.education)
            && none_or_empty(&self.awards)
            && none_or_empty(&self.certificates)
            && none_or_empty(&self.publications)
            && none_or_empty(&self.skills)
            && none_or_empty(&self.languages)
            && none_or_empty(&self.interests)
            && none_or_empty(&self.references)
            && none_or_empty(&self.projects)
    }

    /// Decodes `raw` into the concrete shape of `section` and replaces
    /// that section wholesale. This is a destructive set, not a merge.
    /// On decode failure the document is left unmodified.
    pub fn apply_section(
        &mut self,
        section: SectionName,
        raw: Value,
    ) -> Result<(), SectionDecodeError> {
        fn decode<T: serde::de::DeserializeOwned>(
            section: SectionName,
            raw: Value,
        ) -> Result<T, SectionDecodeError> {
            serde_json::from_value(raw).map_err(|source| SectionDecodeError { section, source })
        }

        match section {
            SectionName::Basics => self.basics = Some(decode(section, raw)?),
            SectionName::Work => self.work = Some(decode(section, raw)?),
            SectionName::Volunteer => self.volunteer = Some(decode(section, raw)?),
            SectionName::Education => self.education = Some(decode(section, raw)?),
            SectionName::Awards => self.awards = Some(decode(section, raw)?),
            SectionName::Certificates => self.certificates = Some(decode(section, raw)?),
            SectionName::Publications => self.publications = Some(decode(section, raw)?),
            SectionName::Skills => self.skills = Some(decode(section, raw)?),
            SectionName::Languages => self.languages = Some(decode(section, raw)?),
            SectionName::Interests => self.interests = Some(decode(section, raw)?),
            SectionName::References => self.references = Some(decode(section, raw)?),
            SectionName::Projects => self.projects = Some(decode(section, raw)?),
        }
        Ok(())
    }

    /// A document is usable for generation only when it names its
    /// owner. An existing but nameless profile is treated the same as
    /// a missing one.
    pub fn has_owner_name(&self) -> bool {
        self.basics
            .as_ref()
            .and_then(|b| b.name.as_deref())
            .map_or(false, |name| !name.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_document() -> ResumeDocument {
        let mut doc = ResumeDocument::empty();
        doc.basics = Some(Basics {
            name: Some("Ada Lovelace".to_string()),
            email: Some("ada@example.com".to_string()),
            summary: Some("Engineer".to_string()),
            ..Basics::default()
        });
        doc.work = Some(vec![Work {
            name: Some("Analytical Engines Ltd".to_string()),
            position: Some("Programmer".to_string()),
            start_date: Some("1843-01".to_string()),
            highlights: Some(vec!["Wrote the first published algorithm".to_string()]),
            ..Work::default()
        }]);
        doc.skills = Some(vec![Skill {
            name: Some("Mathematics".to_string()),
            keywords: Some(vec!["analysis".to_string()]),
            ..Skill::default()
        }]);
        doc
    }

    #[test]
    fn test_round_trip_preserves_every_present_field() {
        let doc = sample_document();
        let json = serde_json::to_string(&doc).unwrap();
        let recovered: ResumeDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(recovered, doc);
    }

    #[test]
    fn test_absent_fields_are_not_serialized() {
        let doc = ResumeDocument::default();
        assert_eq!(serde_json::to_string(&doc).unwrap(), "{}");
    }

    #[test]
    fn test_absence_distinct_from_empty() {
        let absent = ResumeDocument::default();
        let empty = ResumeDocument::empty();
        assert!(absent.is_empty());
        assert!(empty.is_empty());
        assert_ne!(absent, empty);
        assert!(serde_json::to_string(&empty).unwrap().contains("basics"));
    }

    #[test]
    fn test_empty_document_is_empty_until_content_added() {
        let mut doc = ResumeDocument::empty();
        assert!(doc.is_empty());
        doc.skills = Some(vec![Skill {
            name: Some("Rust".to_string()),
            ..Skill::default()
        }]);
        assert!(!doc.is_empty());
    }

    #[test]
    fn test_date_fields_use_camel_case_on_the_wire() {
        let doc = sample_document();
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["work"][0]["startDate"], "1843-01");
        assert!(json["work"][0].get("start_date").is_none());
    }

    #[test]
    fn test_project_type_field_round_trips() {
        let project: Project = serde_json::from_value(json!({
            "name": "cvgen",
            "type": "application"
        }))
        .unwrap();
        assert_eq!(project.kind.as_deref(), Some("application"));
        let back = serde_json::to_value(&project).unwrap();
        assert_eq!(back["type"], "application");
    }

    #[test]
    fn test_every_section_name_parses_and_prints() {
        for name in SectionName::ALL {
            assert_eq!(name.as_str().parse::<SectionName>().unwrap(), name);
        }
    }

    #[test]
    fn test_unknown_section_name_is_rejected() {
        assert!("hobbies".parse::<SectionName>().is_err());
        assert!("".parse::<SectionName>().is_err());
        // Matching is exact: no case folding, no trimming.
        assert!("Work".parse::<SectionName>().is_err());
        assert!(" work".parse::<SectionName>().is_err());
    }

    #[test]
    fn test_apply_section_replaces_wholesale() {
        let mut doc = sample_document();
        let payload = json!([{ "name": "Chemistry" }]);
        doc.apply_section(SectionName::Skills, payload).unwrap();
        let skills = doc.skills.as_ref().unwrap();
        assert_eq!(skills.len(), 1);
        assert_eq!(skills[0].name.as_deref(), Some("Chemistry"));
        // Previous keywords are gone: a set, not a merge.
        assert!(skills[0].keywords.is_none());
    }

    #[test]
    fn test_apply_section_decode_failure_leaves_document_unmodified() {
        let mut doc = sample_document();
        let before = doc.clone();
        // basics must be a single record, not a sequence
        let err = doc
            .apply_section(SectionName::Basics, json!([1, 2, 3]))
            .unwrap_err();
        assert_eq!(err.section, SectionName::Basics);
        assert_eq!(doc, before);
    }

    #[test]
    fn test_apply_section_rejects_record_where_sequence_expected() {
        let mut doc = ResumeDocument::empty();
        let before = doc.clone();
        let err = doc
            .apply_section(SectionName::Work, json!({ "name": "Acme" }))
            .unwrap_err();
        assert_eq!(err.section, SectionName::Work);
        assert_eq!(doc, before);
    }

    #[test]
    fn test_has_owner_name() {
        let mut doc = ResumeDocument::empty();
        assert!(!doc.has_owner_name());
        doc.basics.as_mut().unwrap().name = Some("  ".to_string());
        assert!(!doc.has_owner_name());
        doc.basics.as_mut().unwrap().name = Some("Ada".to_string());
        assert!(doc.has_owner_name());
        assert!(!ResumeDocument::default().has_owner_name());
    }
}
