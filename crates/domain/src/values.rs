// Value Objects - Tipos inmutables autovalidados compartidos entre contexts
// Cada factoría valida su entrada y devuelve Result<Self>; los valores nunca
// existen en estado inválido.

use crate::shared_kernel::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const MAX_NAME_PART_LEN: usize = 100;
const MAX_EMAIL_LEN: usize = 254;
const MAX_ADDRESS_FIELD_LEN: usize = 120;
const MAX_URL_LEN: usize = 2000;

// ============================================================================
// PersonName
// ============================================================================

/// Nombre de una persona (nombre y apellidos)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PersonName {
    first_name: String,
    last_name: String,
}

impl PersonName {
    /// Crea un nombre validado: ambas partes recortadas, no vacías,
    /// máximo 100 caracteres y sin dígitos
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Result<Self> {
        let first_name = validate_name_part("first_name", first_name.into())?;
        let last_name = validate_name_part("last_name", last_name.into())?;
        Ok(Self {
            first_name,
            last_name,
        })
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// Nombre completo separado por un espacio
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl fmt::Display for PersonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full_name())
    }
}

fn validate_name_part(field: &str, raw: String) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(field, "cannot be empty"));
    }
    if trimmed.chars().count() > MAX_NAME_PART_LEN {
        return Err(DomainError::validation(
            field,
            format!("cannot exceed {} characters", MAX_NAME_PART_LEN),
        ));
    }
    if trimmed.chars().any(|c| c.is_ascii_digit()) {
        return Err(DomainError::validation(field, "cannot contain digits"));
    }
    Ok(trimmed.to_string())
}

// ============================================================================
// EmailAddress
// ============================================================================

/// Dirección de correo normalizada a minúsculas en la construcción,
/// por lo que la igualdad es efectivamente case-insensitive
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmailAddress(String);

impl EmailAddress {
    pub fn new(raw: impl Into<String>) -> Result<Self> {
        let value = raw.into().trim().to_lowercase();
        if value.is_empty() {
            return Err(DomainError::validation("email", "cannot be empty"));
        }
        if value.len() > MAX_EMAIL_LEN {
            return Err(DomainError::validation(
                "email",
                format!("cannot exceed {} characters", MAX_EMAIL_LEN),
            ));
        }
        if value.matches('@').count() != 1 {
            return Err(DomainError::validation(
                "email",
                "must contain exactly one '@'",
            ));
        }
        let (local, domain) = value.split_once('@').unwrap_or(("", ""));
        if local.is_empty() {
            return Err(DomainError::validation("email", "local part cannot be empty"));
        }
        if domain.is_empty() || !domain.contains('.') {
            return Err(DomainError::validation(
                "email",
                "domain must contain a '.'",
            ));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EmailAddress {
    type Err = DomainError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl ValueObject for EmailAddress {
    type Value = String;

    fn value(&self) -> &String {
        &self.0
    }
}

// ============================================================================
// PhoneNumber
// ============================================================================

/// Número de teléfono con código de país explícito
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PhoneNumber {
    country_code: String,
    number: String,
}

impl PhoneNumber {
    /// Crea un teléfono validado. El código de país admite un `+` inicial
    /// que se elimina; el número admite espacios, guiones y paréntesis
    /// como separadores
    pub fn new(country_code: impl Into<String>, number: impl Into<String>) -> Result<Self> {
        let raw_cc = country_code.into();
        let cc = raw_cc.trim().trim_start_matches('+');
        if cc.is_empty() || cc.len() > 3 || !cc.chars().all(|c| c.is_ascii_digit()) {
            return Err(DomainError::validation(
                "country_code",
                "must be 1 to 3 digits",
            ));
        }

        let digits: String = number
            .into()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
            .collect();
        if digits.len() < 6 || digits.len() > 14 || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(DomainError::validation(
                "number",
                "must be 6 to 14 digits",
            ));
        }

        Ok(Self {
            country_code: cc.to_string(),
            number: digits,
        })
    }

    pub fn country_code(&self) -> &str {
        &self.country_code
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    /// Representación canónica `+CC NUMBER`
    pub fn formatted(&self) -> String {
        format!("+{} {}", self.country_code, self.number)
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.formatted())
    }
}

impl FromStr for PhoneNumber {
    type Err = DomainError;

    /// Acepta el formato `+CC NUMBER`, por ejemplo `+34 912 345 678`
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        let rest = trimmed.strip_prefix('+').ok_or_else(|| {
            DomainError::validation("phone", "expected '+CC NUMBER' format")
        })?;
        let (cc, number) = rest.split_once(' ').ok_or_else(|| {
            DomainError::validation("phone", "expected '+CC NUMBER' format")
        })?;
        Self::new(cc, number)
    }
}

// ============================================================================
// Address
// ============================================================================

/// Dirección postal
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address {
    street: String,
    city: String,
    state: Option<String>,
    postal_code: String,
    country: String,
}

impl Address {
    pub fn new(
        street: impl Into<String>,
        city: impl Into<String>,
        state: Option<String>,
        postal_code: impl Into<String>,
        country: impl Into<String>,
    ) -> Result<Self> {
        let street = validate_address_field("street", street.into())?;
        let city = validate_address_field("city", city.into())?;
        let country = validate_address_field("country", country.into())?;

        // Estado/provincia opcional; en blanco equivale a ausente
        let state = match state {
            Some(raw) => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    None
                } else if trimmed.chars().count() > MAX_ADDRESS_FIELD_LEN {
                    return Err(DomainError::validation(
                        "state",
                        format!("cannot exceed {} characters", MAX_ADDRESS_FIELD_LEN),
                    ));
                } else {
                    Some(trimmed.to_string())
                }
            }
            None => None,
        };

        let postal_code = postal_code.into().trim().to_string();
        if postal_code.len() < 3 || postal_code.len() > 12 {
            return Err(DomainError::validation(
                "postal_code",
                "must be 3 to 12 characters",
            ));
        }
        if !postal_code
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == ' ' || c == '-')
        {
            return Err(DomainError::validation(
                "postal_code",
                "may only contain letters, digits, spaces and dashes",
            ));
        }

        Ok(Self {
            street,
            city,
            state,
            postal_code,
            country,
        })
    }

    pub fn street(&self) -> &str {
        &self.street
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    pub fn postal_code(&self) -> &str {
        &self.postal_code
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    /// Representación en una línea separada por comas
    pub fn single_line(&self) -> String {
        let mut parts = vec![self.street.clone(), self.city.clone()];
        if let Some(state) = &self.state {
            parts.push(state.clone());
        }
        parts.push(self.postal_code.clone());
        parts.push(self.country.clone());
        parts.join(", ")
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.single_line())
    }
}

fn validate_address_field(field: &str, raw: String) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(field, "cannot be empty"));
    }
    if trimmed.chars().count() > MAX_ADDRESS_FIELD_LEN {
        return Err(DomainError::validation(
            field,
            format!("cannot exceed {} characters", MAX_ADDRESS_FIELD_LEN),
        ));
    }
    Ok(trimmed.to_string())
}

// ============================================================================
// WebUrl
// ============================================================================

/// URL web (http o https) para enlaces de redes sociales
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WebUrl(String);

impl WebUrl {
    pub fn new(raw: impl Into<String>) -> Result<Self> {
        let value = raw.into().trim().to_string();
        if value.is_empty() {
            return Err(DomainError::validation("url", "cannot be empty"));
        }
        if value.len() > MAX_URL_LEN {
            return Err(DomainError::validation(
                "url",
                format!("cannot exceed {} characters", MAX_URL_LEN),
            ));
        }
        let rest = value
            .strip_prefix("https://")
            .or_else(|| value.strip_prefix("http://"))
            .ok_or_else(|| {
                DomainError::validation("url", "must start with http:// or https://")
            })?;
        let host = rest.split('/').next().unwrap_or("");
        if host.is_empty() {
            return Err(DomainError::validation("url", "must include a host"));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WebUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for WebUrl {
    type Err = DomainError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl ValueObject for WebUrl {
    type Value = String;

    fn value(&self) -> &String {
        &self.0
    }
}

// ============================================================================
// SocialMediaPlatform
// ============================================================================

/// Plataformas de redes sociales soportadas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SocialMediaPlatform {
    Facebook,
    Instagram,
    X,
    LinkedIn,
    TikTok,
    YouTube,
    /// Solo seleccionable de forma explícita; nunca se infiere
    Other,
}

impl SocialMediaPlatform {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Facebook => "facebook",
            Self::Instagram => "instagram",
            Self::X => "x",
            Self::LinkedIn => "linkedin",
            Self::TikTok => "tiktok",
            Self::YouTube => "youtube",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for SocialMediaPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SocialMediaPlatform {
    type Err = DomainError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "facebook" => Ok(Self::Facebook),
            "instagram" => Ok(Self::Instagram),
            "x" | "twitter" => Ok(Self::X),
            "linkedin" => Ok(Self::LinkedIn),
            "tiktok" => Ok(Self::TikTok),
            "youtube" => Ok(Self::YouTube),
            "other" => Ok(Self::Other),
            unknown => Err(DomainError::validation(
                "platform",
                format!("unknown platform: {}", unknown),
            )),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_person_name_trims_and_joins() {
        let name = PersonName::new("  Miren ", " Etxeberria  ").unwrap();
        assert_eq!(name.first_name(), "Miren");
        assert_eq!(name.last_name(), "Etxeberria");
        assert_eq!(name.full_name(), "Miren Etxeberria");
    }

    #[test]
    fn test_person_name_rejects_empty_and_digits() {
        assert!(PersonName::new("", "Etxeberria").is_err());
        assert!(PersonName::new("   ", "Etxeberria").is_err());
        assert!(PersonName::new("Miren", "Etx3berria").is_err());
    }

    #[test]
    fn test_person_name_rejects_over_max_length() {
        assert!(PersonName::new("a".repeat(101), "Etxeberria").is_err());
        assert!(PersonName::new("a".repeat(100), "Etxeberria").is_ok());
    }

    #[test]
    fn test_person_name_validation_names_field() {
        let err = PersonName::new("Miren", "").unwrap_err();
        match err {
            DomainError::ValidationError { field, .. } => assert_eq!(field, "last_name"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_email_lowercases_on_construction() {
        let email = EmailAddress::new("  Miren@Example.COM ").unwrap();
        assert_eq!(email.as_str(), "miren@example.com");

        let other = EmailAddress::new("MIREN@example.com").unwrap();
        assert_eq!(email, other);
    }

    #[test]
    fn test_email_rejects_malformed() {
        assert!(EmailAddress::new("").is_err());
        assert!(EmailAddress::new("no-at-sign.example.com").is_err());
        assert!(EmailAddress::new("two@@example.com").is_err());
        assert!(EmailAddress::new("@example.com").is_err());
        assert!(EmailAddress::new("miren@localhost").is_err());
        assert!(EmailAddress::new(format!("{}@example.com", "a".repeat(250))).is_err());
    }

    #[test]
    fn test_email_from_str() {
        let email: EmailAddress = "miren@example.com".parse().unwrap();
        assert_eq!(email.as_str(), "miren@example.com");
        assert!("nope".parse::<EmailAddress>().is_err());
    }

    #[test]
    fn test_phone_strips_plus_and_separators() {
        let phone = PhoneNumber::new("+34", "912-345 (678)").unwrap();
        assert_eq!(phone.country_code(), "34");
        assert_eq!(phone.number(), "912345678");
        assert_eq!(phone.formatted(), "+34 912345678");
    }

    #[test]
    fn test_phone_rejects_bad_country_code() {
        assert!(PhoneNumber::new("", "912345678").is_err());
        assert!(PhoneNumber::new("1234", "912345678").is_err());
        assert!(PhoneNumber::new("3a", "912345678").is_err());
    }

    #[test]
    fn test_phone_rejects_bad_number() {
        assert!(PhoneNumber::new("34", "12345").is_err());
        assert!(PhoneNumber::new("34", "123456789012345").is_err());
        assert!(PhoneNumber::new("34", "91234abcd").is_err());
    }

    #[test]
    fn test_phone_from_str() {
        let phone: PhoneNumber = "+34 912 345 678".parse().unwrap();
        assert_eq!(phone.formatted(), "+34 912345678");

        assert!("34 912345678".parse::<PhoneNumber>().is_err());
        assert!("+34912345678".parse::<PhoneNumber>().is_err());
    }

    #[test]
    fn test_address_single_line_with_and_without_state() {
        let with_state = Address::new(
            "Calle Mayor 1",
            "Bilbao",
            Some("Bizkaia".to_string()),
            "48001",
            "España",
        )
        .unwrap();
        assert_eq!(
            with_state.single_line(),
            "Calle Mayor 1, Bilbao, Bizkaia, 48001, España"
        );

        let without_state =
            Address::new("Calle Mayor 1", "Bilbao", None, "48001", "España").unwrap();
        assert_eq!(
            without_state.single_line(),
            "Calle Mayor 1, Bilbao, 48001, España"
        );
    }

    #[test]
    fn test_address_blank_state_is_absent() {
        let address =
            Address::new("Calle Mayor 1", "Bilbao", Some("  ".to_string()), "48001", "España")
                .unwrap();
        assert_eq!(address.state(), None);
    }

    #[test]
    fn test_address_rejects_empty_required_fields() {
        assert!(Address::new("", "Bilbao", None, "48001", "España").is_err());
        assert!(Address::new("Calle Mayor 1", " ", None, "48001", "España").is_err());
        assert!(Address::new("Calle Mayor 1", "Bilbao", None, "48001", "").is_err());
    }

    #[test]
    fn test_address_postal_code_rules() {
        assert!(Address::new("Calle Mayor 1", "Bilbao", None, "12", "España").is_err());
        assert!(Address::new("Calle Mayor 1", "Bilbao", None, "1234567890123", "España").is_err());
        assert!(Address::new("Calle Mayor 1", "Bilbao", None, "48_001", "España").is_err());
        assert!(Address::new("Calle Mayor 1", "Bilbao", None, "SW1A 1AA", "Reino Unido").is_ok());
        assert!(Address::new("Calle Mayor 1", "Bilbao", None, "48-001", "España").is_ok());
    }

    #[test]
    fn test_web_url_accepts_http_and_https() {
        assert!(WebUrl::new("https://denda.example.com/about").is_ok());
        assert!(WebUrl::new("http://denda.example.com").is_ok());
    }

    #[test]
    fn test_web_url_rejects_malformed() {
        assert!(WebUrl::new("").is_err());
        assert!(WebUrl::new("ftp://denda.example.com").is_err());
        assert!(WebUrl::new("https://").is_err());
        assert!(WebUrl::new(format!("https://example.com/{}", "a".repeat(2000))).is_err());
    }

    #[test]
    fn test_platform_display_is_lowercase() {
        assert_eq!(SocialMediaPlatform::LinkedIn.to_string(), "linkedin");
        assert_eq!(SocialMediaPlatform::YouTube.to_string(), "youtube");
        assert_eq!(SocialMediaPlatform::X.to_string(), "x");
    }

    #[test]
    fn test_platform_from_str_is_case_insensitive() {
        assert_eq!(
            "FaceBook".parse::<SocialMediaPlatform>().unwrap(),
            SocialMediaPlatform::Facebook
        );
        assert_eq!(
            "twitter".parse::<SocialMediaPlatform>().unwrap(),
            SocialMediaPlatform::X
        );
        assert_eq!(
            "TIKTOK".parse::<SocialMediaPlatform>().unwrap(),
            SocialMediaPlatform::TikTok
        );
    }

    #[test]
    fn test_platform_unknown_is_error_and_other_is_explicit() {
        assert!("myspace".parse::<SocialMediaPlatform>().is_err());
        assert_eq!(
            "other".parse::<SocialMediaPlatform>().unwrap(),
            SocialMediaPlatform::Other
        );
    }
}
