use crate::config::{DisplayConfig, ModelMetadata};
use crate::domain::model::PredictionResult;
use crate::utils::error::FormatError;

/// Turns a raw model output into the figure shown to the user, with the
/// model's offline evaluation metrics attached.
#[derive(Debug, Clone, Default)]
pub struct ResultFormatter {
    display: DisplayConfig,
    metadata: ModelMetadata,
}

impl ResultFormatter {
    pub fn new(display: DisplayConfig, metadata: ModelMetadata) -> Self {
        Self { display, metadata }
    }

    pub fn format(&self, raw_value: f64) -> Result<PredictionResult, FormatError> {
        if !raw_value.is_finite() {
            return Err(FormatError { value: raw_value });
        }

        Ok(PredictionResult {
            raw_value,
            formatted_value: self.currency(raw_value),
            accuracy_pct: self.metadata.accuracy_pct,
            avg_error_amount: self.metadata.avg_error_amount,
            avg_error_display: format!(
                "±{}{}",
                group_thousands(self.metadata.avg_error_amount),
                self.display.currency_suffix
            ),
        })
    }

    fn currency(&self, amount: f64) -> String {
        format!(
            "{}{}{}",
            self.display.currency_prefix,
            group_thousands(amount),
            self.display.currency_suffix
        )
    }
}

/// Drops the fraction and inserts `,` every three digits. Works on the
/// decimal digits of the value, so magnitudes beyond `i64` stay exact.
pub fn group_thousands(value: f64) -> String {
    let truncated = format!("{:.0}", value.trunc());
    let (sign, digits) = match truncated.strip_prefix('-') {
        Some("0") => ("", "0"),
        Some(rest) => ("-", rest),
        None => ("", truncated.as_str()),
    };

    let mut grouped = String::with_capacity(sign.len() + digits.len() + digits.len() / 3);
    grouped.push_str(sign);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
