use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};

use super::domain::{
    ExperienceLevel, JobCategory, JobId, JobListing, JobType, ListingStatus, SalaryCurrency,
    UserId, Vocabulary,
};
use super::filter::parse_salary_bound;

/// Loads a listing snapshot exported from the `jobs` table as CSV.
pub struct ListingImporter;

impl ListingImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<JobListing>, ListingImportError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Rows keep the file order; callers sort when they need newest-first.
    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<JobListing>, ListingImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut listings = Vec::new();

        for (index, record) in csv_reader.deserialize::<ListingRow>().enumerate() {
            let row = record?;
            // header is line 1
            listings.push(row.into_listing(index + 2)?);
        }

        Ok(listings)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ListingImportError {
    #[error("failed to read listing export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid listing CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("line {line}: unknown listing status '{value}'")]
    UnknownStatus { line: usize, value: String },
    #[error("line {line}: invalid created_at '{value}'")]
    InvalidTimestamp { line: usize, value: String },
}

#[derive(Debug, Deserialize)]
struct ListingRow {
    id: String,
    employer_id: String,
    title: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    description: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    company_name: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    job_type: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    category: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    location: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    experience_level: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    is_remote: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    salary_min: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    salary_max: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    salary_currency: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    status: Option<String>,
    created_at: String,
}

impl ListingRow {
    fn into_listing(self, line: usize) -> Result<JobListing, ListingImportError> {
        let status = match self.status.as_deref() {
            None => ListingStatus::Active,
            Some(raw) => {
                ListingStatus::parse(raw).ok_or_else(|| ListingImportError::UnknownStatus {
                    line,
                    value: raw.to_string(),
                })?
            }
        };
        let created_at = parse_timestamp(&self.created_at).ok_or_else(|| {
            ListingImportError::InvalidTimestamp {
                line,
                value: self.created_at.clone(),
            }
        })?;

        Ok(JobListing {
            id: JobId(self.id),
            employer_id: UserId(self.employer_id),
            title: self.title,
            description: self.description,
            company_name: self.company_name,
            job_type: self.job_type.as_deref().and_then(JobType::parse),
            category: self.category.as_deref().and_then(JobCategory::parse),
            location: self.location,
            experience_level: self
                .experience_level
                .as_deref()
                .and_then(ExperienceLevel::parse),
            is_remote: self.is_remote.as_deref().is_some_and(parse_flag),
            salary_min: parse_salary_bound("salary_min", self.salary_min.as_deref()),
            salary_max: parse_salary_bound("salary_max", self.salary_max.as_deref()),
            salary_currency: self
                .salary_currency
                .as_deref()
                .and_then(SalaryCurrency::parse)
                .unwrap_or_default(),
            requirements: None,
            benefits: None,
            contact_email: None,
            contact_phone: None,
            status,
            created_at,
            updated_at: None,
            expires_at: None,
        })
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "si" | "sí"
    )
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "id,employer_id,title,description,company_name,job_type,category,location,experience_level,is_remote,salary_min,salary_max,salary_currency,status,created_at\n";

    #[test]
    fn imports_rows_with_labels_and_blank_cells() {
        let csv = format!(
            "{HEADER}job-1,emp-1,Cocinero,Cocina caliente,Soda La Esquina,Tiempo Completo,Gastronomía,San Mateo,Sin experiencia,false,350000,450000,CRC,active,2025-09-24T10:00:00Z\n\
job-2,emp-2,Guía turístico,,,part-time,turismo,,,true,,,,,2025-09-20\n"
        );

        let listings = ListingImporter::from_reader(csv.as_bytes()).expect("import succeeds");
        assert_eq!(listings.len(), 2);

        let cook = &listings[0];
        assert_eq!(cook.job_type, Some(JobType::FullTime));
        assert_eq!(cook.category, Some(JobCategory::Gastronomia));
        assert_eq!(cook.experience_level, Some(ExperienceLevel::Entry));
        assert_eq!(cook.salary_min, Some(350000));
        assert!(!cook.is_remote);

        let guide = &listings[1];
        assert!(guide.description.is_none());
        assert!(guide.company_name.is_none());
        assert!(guide.location.is_none());
        assert!(guide.is_remote);
        assert_eq!(guide.salary_min, None);
        assert_eq!(guide.status, ListingStatus::Active);
    }

    #[test]
    fn rejects_unknown_status_with_line_number() {
        let csv = format!(
            "{HEADER}job-1,emp-1,Cocinero,,,,,,,,,,,archived,2025-09-24T10:00:00Z\n"
        );

        match ListingImporter::from_reader(csv.as_bytes()) {
            Err(ListingImportError::UnknownStatus { line, value }) => {
                assert_eq!(line, 2);
                assert_eq!(value, "archived");
            }
            other => panic!("expected unknown status error, got {other:?}"),
        }
    }

    #[test]
    fn non_numeric_salary_cells_are_undisclosed() {
        let csv = format!(
            "{HEADER}job-1,emp-1,Mesero,,,,,,,,a convenir,-5,,active,2025-09-24\n"
        );

        let listings = ListingImporter::from_reader(csv.as_bytes()).expect("import succeeds");
        assert_eq!(listings[0].salary_min, None);
        assert_eq!(listings[0].salary_max, None);
    }
}
