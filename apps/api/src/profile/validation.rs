//! Resume document validation.
//!
//! Non-mutating and fail-closed: the first violation aborts with an
//! error naming the offending field kind. Absent and empty fields are
//! always valid — only present, non-empty values are checked.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;
use url::Url;

use crate::models::resume::{
    Award, Basics, Certificate, Education, Project, Publication, ResumeDocument, Volunteer, Work,
};

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("invalid email format")]
    InvalidEmail,
    #[error("invalid URL format")]
    InvalidUrl,
    #[error("invalid phone format")]
    InvalidPhone,
    #[error("invalid date format (expected YYYY, YYYY-MM, or YYYY-MM-DD)")]
    InvalidDate,
}

/// Dates in YYYY, YYYY-MM, or YYYY-MM-DD form.
static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}(-\d{2})?(-\d{2})?$").expect("date regex"));

/// Permissive phone pattern: digits, whitespace and common punctuation.
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\d\s\-+().]+$").expect("phone regex"));

/// Syntactic email check: one `@` with a dotted domain.
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex"));

/// Validates a whole resume document, recursively. Returns on the
/// first violation; callers get one error per rejected write.
pub fn validate(document: &ResumeDocument) -> Result<(), ValidationError> {
    if let Some(basics) = &document.basics {
        validate_basics(basics)?;
    }
    for work in document.work.iter().flatten() {
        validate_work(work)?;
    }
    for volunteer in document.volunteer.iter().flatten() {
        validate_volunteer(volunteer)?;
    }
    for education in document.education.iter().flatten() {
        validate_education(education)?;
    }
    for project in document.projects.iter().flatten() {
        validate_project(project)?;
    }
    for certificate in document.certificates.iter().flatten() {
        validate_certificate(certificate)?;
    }
    for publication in document.publications.iter().flatten() {
        validate_publication(publication)?;
    }
    for award in document.awards.iter().flatten() {
        validate_award(award)?;
    }
    Ok(())
}

fn validate_basics(basics: &Basics) -> Result<(), ValidationError> {
    validate_email(basics.email.as_deref())?;
    validate_url(basics.url.as_deref())?;
    validate_phone(basics.phone.as_deref())?;

    for profile in basics.profiles.iter().flatten() {
        validate_url(profile.url.as_deref())?;
    }

    Ok(())
}

fn validate_work(work: &Work) -> Result<(), ValidationError> {
    validate_url(work.url.as_deref())?;
    validate_date(work.start_date.as_deref())?;
    validate_date(work.end_date.as_deref())
}

fn validate_volunteer(volunteer: &Volunteer) -> Result<(), ValidationError> {
    validate_url(volunteer.url.as_deref())?;
    validate_date(volunteer.start_date.as_deref())?;
    validate_date(volunteer.end_date.as_deref())
}

fn validate_education(education: &Education) -> Result<(), ValidationError> {
    validate_url(education.url.as_deref())?;
    validate_date(education.start_date.as_deref())?;
    validate_date(education.end_date.as_deref())
}

fn validate_project(project: &Project) -> Result<(), ValidationError> {
    validate_url(project.url.as_deref())?;
    validate_date(project.start_date.as_deref())?;
    validate_date(project.end_date.as_deref())
}

fn validate_certificate(certificate: &Certificate) -> Result<(), ValidationError> {
    validate_url(certificate.url.as_deref())?;
    validate_date(certificate.date.as_deref())
}

fn validate_publication(publication: &Publication) -> Result<(), ValidationError> {
    validate_url(publication.url.as_deref())?;
    validate_date(publication.release_date.as_deref())
}

fn validate_award(award: &Award) -> Result<(), ValidationError> {
    validate_date(award.date.as_deref())
}

fn validate_email(email: Option<&str>) -> Result<(), ValidationError> {
    match email.map(str::trim) {
        None | Some("") => Ok(()),
        Some(email) if EMAIL_RE.is_match(email) => Ok(()),
        Some(_) => Err(ValidationError::InvalidEmail),
    }
}

fn validate_url(raw: Option<&str>) -> Result<(), ValidationError> {
    let raw = match raw.map(str::trim) {
        None | Some("") => return Ok(()),
        Some(raw) => raw,
    };

    let parsed = Url::parse(raw).map_err(|_| ValidationError::InvalidUrl)?;
    // A URL must carry both a scheme and a host; Url::parse guarantees
    // the scheme, host still needs a check (e.g. "mailto:x" has none).
    if parsed.host_str().is_none() {
        return Err(ValidationError::InvalidUrl);
    }

    Ok(())
}

fn validate_phone(phone: Option<&str>) -> Result<(), ValidationError> {
    match phone.map(str::trim) {
        None | Some("") => Ok(()),
        Some(phone) if PHONE_RE.is_match(phone) => Ok(()),
        Some(_) => Err(ValidationError::InvalidPhone),
    }
}

fn validate_date(date: Option<&str>) -> Result<(), ValidationError> {
    match date.map(str::trim) {
        None | Some("") => Ok(()),
        Some(date) if DATE_RE.is_match(date) => Ok(()),
        Some(_) => Err(ValidationError::InvalidDate),
    }
}
