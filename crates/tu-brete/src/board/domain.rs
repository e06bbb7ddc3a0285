use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for published job listings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JobId(pub String);

/// Identity asserted by the auth provider for a signed-in employer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub String);

/// Closed vocabulary with a stable code and a Spanish display label.
///
/// Historic rows carry either the code (`full-time`) or the label
/// (`Tiempo Completo`); both parse into the same variant.
pub trait Vocabulary: Copy + Sized + 'static {
    fn all() -> &'static [Self];
    fn code(self) -> &'static str;
    fn label(self) -> &'static str;

    fn parse(raw: &str) -> Option<Self> {
        parse_vocabulary(raw)
    }
}

/// Match `raw` against every code and label of `T`, ignoring case.
fn parse_vocabulary<T: Vocabulary>(raw: &str) -> Option<T> {
    let needle = raw.trim();
    if needle.is_empty() {
        return None;
    }
    let lowered = needle.to_lowercase();
    T::all().iter().copied().find(|choice| {
        choice.code().eq_ignore_ascii_case(needle) || choice.label().to_lowercase() == lowered
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobType {
    #[serde(rename = "full-time", alias = "Tiempo Completo")]
    FullTime,
    #[serde(rename = "part-time", alias = "Medio Tiempo")]
    PartTime,
    #[serde(rename = "contract", alias = "Por Contrato")]
    Contract,
    #[serde(rename = "freelance", alias = "Freelance")]
    Freelance,
    #[serde(rename = "internship", alias = "Práctica")]
    Internship,
}

impl JobType {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::FullTime,
            Self::PartTime,
            Self::Contract,
            Self::Freelance,
            Self::Internship,
        ]
    }
}

impl Vocabulary for JobType {
    fn all() -> &'static [Self] {
        static ALL: [JobType; 5] = JobType::ordered();
        &ALL
    }

    fn code(self) -> &'static str {
        match self {
            Self::FullTime => "full-time",
            Self::PartTime => "part-time",
            Self::Contract => "contract",
            Self::Freelance => "freelance",
            Self::Internship => "internship",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::FullTime => "Tiempo Completo",
            Self::PartTime => "Medio Tiempo",
            Self::Contract => "Por Contrato",
            Self::Freelance => "Freelance",
            Self::Internship => "Práctica",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExperienceLevel {
    #[serde(rename = "entry", alias = "Principiante", alias = "Sin experiencia")]
    Entry,
    #[serde(rename = "mid", alias = "Intermedio", alias = "1-2 años")]
    Mid,
    #[serde(rename = "senior", alias = "Senior", alias = "3-5 años")]
    Senior,
    #[serde(rename = "lead", alias = "Líder", alias = "5+ años")]
    Lead,
}

impl ExperienceLevel {
    pub const fn ordered() -> [Self; 4] {
        [Self::Entry, Self::Mid, Self::Senior, Self::Lead]
    }

    /// Labels used by the posting wizard before the vocabularies were merged.
    fn legacy(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "sin experiencia" => Some(Self::Entry),
            "1-2 años" => Some(Self::Mid),
            "3-5 años" => Some(Self::Senior),
            "5+ años" => Some(Self::Lead),
            _ => None,
        }
    }
}

impl Vocabulary for ExperienceLevel {
    fn all() -> &'static [Self] {
        static ALL: [ExperienceLevel; 4] = ExperienceLevel::ordered();
        &ALL
    }

    fn code(self) -> &'static str {
        match self {
            Self::Entry => "entry",
            Self::Mid => "mid",
            Self::Senior => "senior",
            Self::Lead => "lead",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Entry => "Principiante",
            Self::Mid => "Intermedio",
            Self::Senior => "Senior",
            Self::Lead => "Líder",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        parse_vocabulary(raw).or_else(|| Self::legacy(raw))
    }
}

/// Industry sectors offered by both the browse filters and the posting wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JobCategory {
    #[serde(alias = "Tecnología")]
    Tecnologia,
    #[serde(alias = "Ventas")]
    Ventas,
    #[serde(alias = "Marketing")]
    Marketing,
    #[serde(alias = "Administración")]
    Administracion,
    #[serde(alias = "Servicio al Cliente")]
    ServicioAlCliente,
    #[serde(alias = "Finanzas")]
    Finanzas,
    #[serde(alias = "Recursos Humanos")]
    RecursosHumanos,
    #[serde(alias = "Diseño")]
    Diseno,
    #[serde(alias = "Construcción")]
    Construccion,
    #[serde(alias = "Educación")]
    Educacion,
    #[serde(alias = "Salud")]
    Salud,
    #[serde(alias = "Turismo")]
    Turismo,
    #[serde(alias = "Servicios")]
    Servicios,
    #[serde(alias = "Comercio")]
    Comercio,
    #[serde(alias = "Agricultura")]
    Agricultura,
    #[serde(alias = "Transporte")]
    Transporte,
    #[serde(alias = "Manufactura")]
    Manufactura,
    #[serde(alias = "Gastronomía")]
    Gastronomia,
    #[serde(alias = "Limpieza")]
    Limpieza,
    #[serde(alias = "Seguridad")]
    Seguridad,
    #[serde(alias = "Otros")]
    Otros,
}

impl JobCategory {
    pub const fn ordered() -> [Self; 21] {
        [
            Self::Tecnologia,
            Self::Ventas,
            Self::Marketing,
            Self::Administracion,
            Self::ServicioAlCliente,
            Self::Finanzas,
            Self::RecursosHumanos,
            Self::Diseno,
            Self::Construccion,
            Self::Educacion,
            Self::Salud,
            Self::Turismo,
            Self::Servicios,
            Self::Comercio,
            Self::Agricultura,
            Self::Transporte,
            Self::Manufactura,
            Self::Gastronomia,
            Self::Limpieza,
            Self::Seguridad,
            Self::Otros,
        ]
    }
}

impl Vocabulary for JobCategory {
    fn all() -> &'static [Self] {
        static ALL: [JobCategory; 21] = JobCategory::ordered();
        &ALL
    }

    fn code(self) -> &'static str {
        match self {
            Self::Tecnologia => "tecnologia",
            Self::Ventas => "ventas",
            Self::Marketing => "marketing",
            Self::Administracion => "administracion",
            Self::ServicioAlCliente => "servicio-al-cliente",
            Self::Finanzas => "finanzas",
            Self::RecursosHumanos => "recursos-humanos",
            Self::Diseno => "diseno",
            Self::Construccion => "construccion",
            Self::Educacion => "educacion",
            Self::Salud => "salud",
            Self::Turismo => "turismo",
            Self::Servicios => "servicios",
            Self::Comercio => "comercio",
            Self::Agricultura => "agricultura",
            Self::Transporte => "transporte",
            Self::Manufactura => "manufactura",
            Self::Gastronomia => "gastronomia",
            Self::Limpieza => "limpieza",
            Self::Seguridad => "seguridad",
            Self::Otros => "otros",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Tecnologia => "Tecnología",
            Self::Ventas => "Ventas",
            Self::Marketing => "Marketing",
            Self::Administracion => "Administración",
            Self::ServicioAlCliente => "Servicio al Cliente",
            Self::Finanzas => "Finanzas",
            Self::RecursosHumanos => "Recursos Humanos",
            Self::Diseno => "Diseño",
            Self::Construccion => "Construcción",
            Self::Educacion => "Educación",
            Self::Salud => "Salud",
            Self::Turismo => "Turismo",
            Self::Servicios => "Servicios",
            Self::Comercio => "Comercio",
            Self::Agricultura => "Agricultura",
            Self::Transporte => "Transporte",
            Self::Manufactura => "Manufactura",
            Self::Gastronomia => "Gastronomía",
            Self::Limpieza => "Limpieza",
            Self::Seguridad => "Seguridad",
            Self::Otros => "Otros",
        }
    }
}

/// Lifecycle of a listing; only `Active` listings reach the public board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingStatus {
    #[default]
    Active,
    Paused,
    Closed,
}

impl ListingStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Active => "Activo",
            Self::Paused => "Pausado",
            Self::Closed => "Cerrado",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "active" | "activo" => Some(Self::Active),
            "paused" | "pausado" => Some(Self::Paused),
            "closed" | "cerrado" => Some(Self::Closed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SalaryCurrency {
    #[default]
    Crc,
    Usd,
}

impl SalaryCurrency {
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Crc => "₡",
            Self::Usd => "$",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "CRC" => Some(Self::Crc),
            "USD" => Some(Self::Usd),
            _ => None,
        }
    }
}

/// A posted job opportunity as stored in the `jobs` table.
///
/// Optional fields are absent on older rows; predicates reading them document
/// how an absent value is treated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobListing {
    pub id: JobId,
    pub employer_id: UserId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub job_type: Option<JobType>,
    #[serde(default)]
    pub category: Option<JobCategory>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub experience_level: Option<ExperienceLevel>,
    #[serde(default)]
    pub is_remote: bool,
    #[serde(default)]
    pub salary_min: Option<u64>,
    #[serde(default)]
    pub salary_max: Option<u64>,
    #[serde(default)]
    pub salary_currency: SalaryCurrency,
    #[serde(default)]
    pub requirements: Option<String>,
    #[serde(default)]
    pub benefits: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub status: ListingStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl JobListing {
    pub fn is_active(&self) -> bool {
        self.status == ListingStatus::Active
    }

    /// Salary range as shown on listing cards, or `A convenir` when undisclosed.
    pub fn salary_display(&self) -> String {
        match (self.salary_min, self.salary_max) {
            (Some(min), Some(max)) => {
                let symbol = self.salary_currency.symbol();
                format!(
                    "{symbol}{} - {symbol}{}",
                    group_thousands(min),
                    group_thousands(max)
                )
            }
            _ => "A convenir".to_string(),
        }
    }

    pub fn card(&self) -> ListingCardView {
        ListingCardView {
            id: self.id.clone(),
            title: self.title.clone(),
            company_name: self
                .company_name
                .clone()
                .unwrap_or_else(|| "Particular".to_string()),
            description: self.description.clone(),
            location: self.location.clone(),
            job_type_label: self
                .job_type
                .map(Vocabulary::label)
                .unwrap_or("No especificado"),
            category_label: self.category.map(Vocabulary::label),
            experience_label: self.experience_level.map(Vocabulary::label),
            is_remote: self.is_remote,
            salary: self.salary_display(),
            created_at: self.created_at,
        }
    }
}

/// Public projection of a listing used by the browse endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct ListingCardView {
    pub id: JobId,
    pub title: String,
    pub company_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub job_type_label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_label: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience_label: Option<&'static str>,
    pub is_remote: bool,
    pub salary: String,
    pub created_at: DateTime<Utc>,
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}
