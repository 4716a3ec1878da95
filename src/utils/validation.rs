use crate::utils::error::ConfigError;

pub trait Validate {
    fn validate(&self) -> Result<(), ConfigError>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<(), ConfigError> {
    if path.trim().is_empty() {
        return Err(ConfigError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(ConfigError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<(), ConfigError> {
    if value < min || value > max {
        return Err(ConfigError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

pub fn validate_finite(field_name: &str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value must be a finite number".to_string(),
        });
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(
    field_name: &str,
    value: &'a Option<T>,
) -> Result<&'a T, ConfigError> {
    value.as_ref().ok_or_else(|| ConfigError::MissingConfigError {
        field: field_name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("model.path", "final_model.json").is_ok());
        assert!(validate_path("model.path", "").is_err());
        assert!(validate_path("model.path", "   ").is_err());
        assert!(validate_path("model.path", "final\0model").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("model.load_timeout_seconds", 30u64, 1, 3600).is_ok());
        assert!(validate_range("model.load_timeout_seconds", 0u64, 1, 3600).is_err());
        assert!(validate_range("metadata.accuracy_pct", 100.5, 0.0, 100.0).is_err());
    }

    #[test]
    fn test_validate_finite() {
        assert!(validate_finite("metadata.avg_error_amount", 37816.0).is_ok());
        assert!(validate_finite("metadata.avg_error_amount", f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_required_field() {
        let present = Some(5);
        let absent: Option<i32> = None;
        assert_eq!(validate_required_field("x", &present).unwrap(), &5);
        assert!(matches!(
            validate_required_field("x", &absent),
            Err(ConfigError::MissingConfigError { .. })
        ));
    }
}
