//! Validation System - Advisory Only
//!
//! Rules inspect the raw input as it arrived from the UI and produce
//! structured violations. Generation never consults the result: out-of-range
//! segments are clamped regardless of what is reported here.

use serde::{Deserialize, Serialize};

use crate::mandala::{HexColor, RawMandalaSpec, MAX_SEGMENTS, MIN_SEGMENTS};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ViolationSeverity {
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationViolation {
    pub rule: String,
    pub severity: ViolationSeverity,
    pub message: String,
    pub expected: Option<String>,
    pub actual: Option<String>,
    pub remediation: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub violations: Vec<ValidationViolation>,
}

impl ValidationResult {
    pub fn has_errors(&self) -> bool {
        self.violations.iter().any(|v| v.severity == ViolationSeverity::Error)
    }
}

/// Validation rule trait - produces violations
pub trait ValidationRule {
    fn name(&self) -> &'static str;
    fn validate(&self, input: &RawMandalaSpec) -> Vec<ValidationViolation>;
}

// --- Concrete Rules ---

pub struct SegmentRangeRule;

impl ValidationRule for SegmentRangeRule {
    fn name(&self) -> &'static str { "segment_range" }

    fn validate(&self, input: &RawMandalaSpec) -> Vec<ValidationViolation> {
        if (MIN_SEGMENTS as i64..=MAX_SEGMENTS as i64).contains(&input.segments) {
            return vec![];
        }
        vec![ValidationViolation {
            rule: self.name().to_string(),
            severity: ViolationSeverity::Warning,
            message: "Segment count out of range; it will be clamped".to_string(),
            expected: Some(format!("{}..={}", MIN_SEGMENTS, MAX_SEGMENTS)),
            actual: Some(input.segments.to_string()),
            remediation: vec!["Use the slider range or accept the clamped value".to_string()],
        }]
    }
}

pub struct ColorFormatRule;

impl ValidationRule for ColorFormatRule {
    fn name(&self) -> &'static str { "color_format" }

    fn validate(&self, input: &RawMandalaSpec) -> Vec<ValidationViolation> {
        match HexColor::parse(&input.color) {
            Ok(_) => vec![],
            Err(_) => vec![ValidationViolation {
                rule: self.name().to_string(),
                severity: ViolationSeverity::Error,
                message: "Color is not a six-digit hex value".to_string(),
                expected: Some("#rrggbb".to_string()),
                actual: Some(input.color.clone()),
                remediation: vec!["Pick the color from the color input".to_string()],
            }],
        }
    }
}

pub struct WatermarkNoticeRule;

impl ValidationRule for WatermarkNoticeRule {
    fn name(&self) -> &'static str { "watermark" }

    fn validate(&self, input: &RawMandalaSpec) -> Vec<ValidationViolation> {
        if input.show_watermark {
            return vec![];
        }
        vec![ValidationViolation {
            rule: self.name().to_string(),
            severity: ViolationSeverity::Info,
            message: "Export will carry no watermark".to_string(),
            expected: None,
            actual: None,
            remediation: vec![],
        }]
    }
}

/// Validator runs every rule and reports; only Error severity marks invalid.
pub struct Validator {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl Validator {
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(SegmentRangeRule),
                Box::new(ColorFormatRule),
                Box::new(WatermarkNoticeRule),
            ],
        }
    }

    pub fn validate(&self, input: &RawMandalaSpec) -> ValidationResult {
        let violations: Vec<_> = self.rules.iter()
            .flat_map(|rule| rule.validate(input))
            .collect();

        let valid = !violations.iter().any(|v| v.severity == ViolationSeverity::Error);
        ValidationResult { valid, violations }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}
