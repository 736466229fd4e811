// src/common/validation.rs

use validator::{Validate, ValidationError, ValidationErrors};

use crate::common::{error::AppError, slug::derive_slug};

/// Acumula erros de validação para devolver todos de uma vez.
///
/// Começa com o resultado do `#[derive(Validate)]` do payload e soma as
/// checagens de obrigatoriedade que o derive não expressa bem para
/// formulários HTML (onde "ausente" chega como string vazia).
pub struct FieldChecks {
    errors: ValidationErrors,
}

impl FieldChecks {
    pub fn new() -> Self {
        Self {
            errors: ValidationErrors::new(),
        }
    }

    pub fn of<T: Validate>(payload: &T) -> Self {
        Self {
            errors: payload.validate().err().unwrap_or_else(ValidationErrors::new),
        }
    }

    pub fn required_text(&mut self, field: &'static str, value: &Option<String>) -> &mut Self {
        if value.as_deref().map_or(true, |v| v.trim().is_empty()) {
            self.missing(field);
        }
        self
    }

    pub fn required<T>(&mut self, field: &'static str, value: &Option<T>) -> &mut Self {
        if value.is_none() {
            self.missing(field);
        }
        self
    }

    pub fn missing(&mut self, field: &'static str) -> &mut Self {
        let mut err = ValidationError::new("required");
        err.message = Some(format!("{field} is required").into());
        self.errors.add(field, err);
        self
    }

    pub fn invalid(&mut self, field: &'static str, code: &'static str, message: String) -> &mut Self {
        let mut err = ValidationError::new(code);
        err.message = Some(message.into());
        self.errors.add(field, err);
        self
    }

    /// Deriva o slug de `source`; vazio conta como campo obrigatório ausente.
    pub fn slug(&mut self, field: &'static str, source: &str) -> Option<String> {
        let slug = derive_slug(source);
        if slug.is_empty() {
            self.invalid(field, "required", format!("{field} must contain letters or digits"));
            return None;
        }
        Some(slug)
    }

    pub fn finish(self) -> Result<(), AppError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::ValidationError(self.errors))
        }
    }
}

impl Default for FieldChecks {
    fn default() -> Self {
        Self::new()
    }
}

/// Texto obrigatório já validado (o chamador rodou `FieldChecks` antes).
pub fn take_text(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

/// Normaliza texto opcional: string vazia vira `None`.
pub fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_every_missing_field() {
        let mut checks = FieldChecks::new();
        checks
            .required_text("nameVi", &None)
            .required_text("nameEn", &Some("   ".into()))
            .required_text("key", &Some("north".into()))
            .required::<i32>("order", &None);

        let AppError::ValidationError(errors) = checks.finish().unwrap_err() else {
            panic!("expected validation error");
        };
        let fields = errors.field_errors();
        assert_eq!(fields.len(), 3);
        assert!(fields.contains_key("nameVi"));
        assert!(fields.contains_key("nameEn"));
        assert!(fields.contains_key("order"));
    }

    #[test]
    fn blank_slug_source_is_a_validation_failure() {
        let mut checks = FieldChecks::new();
        assert_eq!(checks.slug("title", "Phú Quốc"), Some("phu-quoc".into()));
        assert_eq!(checks.slug("title", "???"), None);
        let AppError::ValidationError(errors) = checks.finish().unwrap_err() else {
            panic!("expected validation error");
        };
        assert!(errors.field_errors().contains_key("title"));
    }

    #[test]
    fn empty_checks_pass() {
        assert!(FieldChecks::new().finish().is_ok());
    }

    #[test]
    fn optional_text_drops_blank() {
        assert_eq!(optional_text(Some("  ".into())), None);
        assert_eq!(optional_text(Some(" Sapa ".into())), Some("Sapa".into()));
    }
}
