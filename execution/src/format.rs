//! FILENAME: execution/src/format.rs
//! PURPOSE: Format-pattern parser and value formatter for measure values.
//! CONTEXT: Measures carry a format pattern such as
//! `[<0][red]-$#,##0.00;[=null]"n/a";$#,##0.00`. This module parses the pattern
//! into sections and renders one raw result value (a numeric string or null)
//! into a display label with optional text and background colors.
//! Formatting never fails: unparsable values and malformed patterns degrade
//! to the empty marker.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::common::parse_value;
use crate::error::FormatError;
use crate::number_format::{add_thousands_separator, format_general, round_decimal};

/// Label rendered in place of a missing or unrenderable value.
pub const EMPTY_VALUE_MARKER: &str = "–";

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// A parsed token from a format section.
#[derive(Debug, Clone, PartialEq)]
pub enum FormatToken {
    /// `0`: Display a digit; pad with 0 if no digit present
    DigitZero,
    /// `#`: Display a digit only if significant
    DigitHash,
    /// `.`: Decimal point
    DecimalPoint,
    /// `,`: Thousands separator, or scaling when trailing
    Comma,
    /// `%`: Percentage (multiplies value by 100)
    Percent,
    /// Literal text (from "quoted", \escaped, or passthrough chars)
    Literal(String),
}

/// A named color specified via `[Red]` style tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatColor {
    Black,
    Blue,
    Cyan,
    Green,
    Magenta,
    Red,
    White,
    Yellow,
}

/// Text color of a section: a named color or `[color=RRGGBB]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionColor {
    Named(FormatColor),
    /// Normalized `#rrggbb`.
    Hex(String),
}

impl SectionColor {
    pub fn to_css(&self) -> String {
        match self {
            SectionColor::Named(color) => format_color_to_css(color).to_string(),
            SectionColor::Hex(hex) => hex.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionOp {
    Equal,
    NotEqual,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
}

/// A section condition: `[>100]` style comparison or `[=null]`.
#[derive(Debug, Clone, PartialEq)]
pub enum FormatCondition {
    Compare { operator: ConditionOp, value: f64 },
    /// Applies to missing values only.
    IsNull,
}

/// A single section of a format pattern (sections are separated by `;`).
#[derive(Debug, Clone, PartialEq)]
pub struct FormatSection {
    pub tokens: Vec<FormatToken>,
    pub color: Option<SectionColor>,
    /// Normalized `#rrggbb`.
    pub background_color: Option<String>,
    pub condition: Option<FormatCondition>,
    /// Number of trailing commas (each divides by 1000)
    pub scale_divisor: u32,
    /// Whether this section contains a percent sign
    pub has_percent: bool,
    /// Whether this section has digit placeholders
    pub has_digits: bool,
    /// Whether the section writes its own sign: an unquoted `-` before the
    /// digits, or unquoted parentheses around them
    pub explicit_sign: bool,
}

impl FormatSection {
    fn is_null_section(&self) -> bool {
        matches!(self.condition, Some(FormatCondition::IsNull))
    }
}

/// A fully parsed format pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedFormat {
    pub sections: Vec<FormatSection>,
    /// Whether any section carries a numeric condition
    pub has_conditions: bool,
}

/// Result of formatting one value.
///
/// Exactly one of the two outcomes holds: a rendered label with
/// `is_value_empty == false`, or the empty marker with `is_value_empty == true`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedValue {
    pub display_value: String,

    pub is_value_empty: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
}

impl FormattedValue {
    pub fn empty() -> Self {
        FormattedValue {
            display_value: EMPTY_VALUE_MARKER.to_string(),
            is_value_empty: true,
            color: None,
            background_color: None,
        }
    }

    fn plain(display_value: String) -> Self {
        FormattedValue {
            display_value,
            is_value_empty: false,
            color: None,
            background_color: None,
        }
    }

    fn styled(display_value: String, section: &FormatSection) -> Self {
        if display_value.is_empty() {
            return FormattedValue::empty();
        }
        FormattedValue {
            display_value,
            is_value_empty: false,
            color: section.color.as_ref().map(SectionColor::to_css),
            background_color: section.background_color.clone(),
        }
    }
}

// ============================================================================
// COLOR AND CONDITION UTILITIES
// ============================================================================

/// Convert a FormatColor to a CSS hex color string.
pub fn format_color_to_css(color: &FormatColor) -> &'static str {
    match color {
        FormatColor::Black => "#000000",
        FormatColor::Blue => "#0000ff",
        FormatColor::Cyan => "#00ffff",
        FormatColor::Green => "#008000",
        FormatColor::Magenta => "#ff00ff",
        FormatColor::Red => "#ff0000",
        FormatColor::White => "#ffffff",
        FormatColor::Yellow => "#ffff00",
    }
}

fn parse_color_name(name: &str) -> Option<FormatColor> {
    match name {
        "black" => Some(FormatColor::Black),
        "blue" => Some(FormatColor::Blue),
        "cyan" => Some(FormatColor::Cyan),
        "green" => Some(FormatColor::Green),
        "magenta" => Some(FormatColor::Magenta),
        "red" => Some(FormatColor::Red),
        "white" => Some(FormatColor::White),
        "yellow" => Some(FormatColor::Yellow),
        _ => None,
    }
}

/// Normalizes `RRGGBB`, `#RRGGBB` or `RGB` to lowercase `#rrggbb`.
fn parse_hex_color(raw: &str) -> Result<String, FormatError> {
    let hex = raw.trim().trim_start_matches('#');
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(FormatError::InvalidColor(raw.to_string()));
    }
    match hex.len() {
        6 => Ok(format!("#{}", hex.to_ascii_lowercase())),
        3 => {
            let expanded: String = hex
                .chars()
                .flat_map(|c| [c, c])
                .collect::<String>()
                .to_ascii_lowercase();
            Ok(format!("#{}", expanded))
        }
        _ => Err(FormatError::InvalidColor(raw.to_string())),
    }
}

/// Try to parse a comparison from a bracket token like ">100", "<=50".
fn parse_condition(content: &str) -> Option<FormatCondition> {
    let s = content.trim();

    let (operator, rest) = if let Some(rest) = s.strip_prefix(">=") {
        (ConditionOp::GreaterThanOrEqual, rest)
    } else if let Some(rest) = s.strip_prefix("<=") {
        (ConditionOp::LessThanOrEqual, rest)
    } else if let Some(rest) = s.strip_prefix("<>") {
        (ConditionOp::NotEqual, rest)
    } else if let Some(rest) = s.strip_prefix('>') {
        (ConditionOp::GreaterThan, rest)
    } else if let Some(rest) = s.strip_prefix('<') {
        (ConditionOp::LessThan, rest)
    } else if let Some(rest) = s.strip_prefix('=') {
        (ConditionOp::Equal, rest)
    } else {
        return None;
    };

    rest.trim()
        .parse::<f64>()
        .ok()
        .map(|value| FormatCondition::Compare { operator, value })
}

fn evaluate_condition(condition: &FormatCondition, value: f64) -> bool {
    let (operator, target) = match condition {
        FormatCondition::Compare { operator, value } => (*operator, *value),
        FormatCondition::IsNull => return false,
    };
    match operator {
        ConditionOp::Equal => (value - target).abs() < f64::EPSILON,
        ConditionOp::NotEqual => (value - target).abs() >= f64::EPSILON,
        ConditionOp::GreaterThan => value > target,
        ConditionOp::GreaterThanOrEqual => value >= target,
        ConditionOp::LessThan => value < target,
        ConditionOp::LessThanOrEqual => value <= target,
    }
}

// ============================================================================
// PARSER
// ============================================================================

/// Parse a format pattern into its sections.
/// A blank pattern yields no sections (general formatting).
pub fn parse_format(pattern: &str) -> Result<ParsedFormat, FormatError> {
    if pattern.trim().is_empty() {
        return Ok(ParsedFormat {
            sections: Vec::new(),
            has_conditions: false,
        });
    }

    let sections = split_sections(pattern)
        .iter()
        .map(|raw| parse_section(raw))
        .collect::<Result<Vec<_>, _>>()?;

    let has_conditions = sections
        .iter()
        .any(|s| matches!(s.condition, Some(FormatCondition::Compare { .. })));

    Ok(ParsedFormat {
        sections,
        has_conditions,
    })
}

/// Split a pattern by unquoted, unescaped semicolons.
fn split_sections(s: &str) -> Vec<String> {
    let mut sections = Vec::new();
    let mut current = String::new();
    let chars: Vec<char> = s.chars().collect();
    let mut i = 0;
    let mut in_quotes = false;
    let mut in_bracket = false;

    while i < chars.len() {
        let ch = chars[i];

        if ch == '"' && !in_bracket {
            in_quotes = !in_quotes;
            current.push(ch);
        } else if ch == '\\' && !in_quotes && !in_bracket && i + 1 < chars.len() {
            current.push(ch);
            current.push(chars[i + 1]);
            i += 1;
        } else if ch == '[' && !in_quotes {
            in_bracket = true;
            current.push(ch);
        } else if ch == ']' && !in_quotes {
            in_bracket = false;
            current.push(ch);
        } else if ch == ';' && !in_quotes && !in_bracket {
            sections.push(std::mem::take(&mut current));
        } else {
            current.push(ch);
        }

        i += 1;
    }

    sections.push(current);
    sections
}

/// Parse a single section string into a FormatSection.
fn parse_section(section_str: &str) -> Result<FormatSection, FormatError> {
    let mut section = FormatSection {
        tokens: Vec::new(),
        color: None,
        background_color: None,
        condition: None,
        scale_divisor: 0,
        has_percent: false,
        has_digits: false,
        explicit_sign: false,
    };
    let mut minus_before_digits = false;
    let mut paren_before_digits = false;
    let mut paren_after_digits = false;

    let chars: Vec<char> = section_str.chars().collect();
    let len = chars.len();
    let mut i = 0;

    while i < len {
        match chars[i] {
            '[' => {
                let end = find_bracket_end(&chars, i).ok_or(FormatError::UnterminatedBracket(i))?;
                let content: String = chars[i + 1..end].iter().collect();
                apply_bracket_directive(&content, &mut section)?;
                i = end + 1;
            }
            '"' => {
                let start = i;
                let mut literal = String::new();
                i += 1;
                while i < len && chars[i] != '"' {
                    literal.push(chars[i]);
                    i += 1;
                }
                if i >= len {
                    return Err(FormatError::UnterminatedQuote(start));
                }
                if !literal.is_empty() {
                    section.tokens.push(FormatToken::Literal(literal));
                }
                i += 1;
            }
            '\\' => {
                if let Some(&next) = chars.get(i + 1) {
                    note_sign_char(
                        next,
                        section.has_digits,
                        &mut minus_before_digits,
                        &mut paren_before_digits,
                        &mut paren_after_digits,
                    );
                    section.tokens.push(FormatToken::Literal(next.to_string()));
                }
                i += 2;
            }
            '0' => {
                section.tokens.push(FormatToken::DigitZero);
                section.has_digits = true;
                paren_after_digits = false;
                i += 1;
            }
            '#' => {
                section.tokens.push(FormatToken::DigitHash);
                section.has_digits = true;
                paren_after_digits = false;
                i += 1;
            }
            '.' => {
                section.tokens.push(FormatToken::DecimalPoint);
                i += 1;
            }
            ',' => {
                section.tokens.push(FormatToken::Comma);
                i += 1;
            }
            '%' => {
                section.tokens.push(FormatToken::Percent);
                section.has_percent = true;
                i += 1;
            }
            other => {
                note_sign_char(
                    other,
                    section.has_digits,
                    &mut minus_before_digits,
                    &mut paren_before_digits,
                    &mut paren_after_digits,
                );
                section.tokens.push(FormatToken::Literal(other.to_string()));
                i += 1;
            }
        }
    }

    section.explicit_sign = minus_before_digits || (paren_before_digits && paren_after_digits);

    if section.has_digits {
        section.scale_divisor = count_trailing_comma_scale(&section.tokens);
        remove_trailing_scale_commas(&mut section.tokens);
    }

    Ok(section)
}

/// Tracks unquoted sign characters relative to the digit placeholders.
fn note_sign_char(
    ch: char,
    after_digits: bool,
    minus_before: &mut bool,
    paren_before: &mut bool,
    paren_after: &mut bool,
) {
    match (ch, after_digits) {
        ('-', false) => *minus_before = true,
        ('(', false) => *paren_before = true,
        (')', true) => *paren_after = true,
        _ => {}
    }
}

fn apply_bracket_directive(content: &str, section: &mut FormatSection) -> Result<(), FormatError> {
    let directive = content.trim();
    let lower = directive.to_ascii_lowercase();

    if let Some(hex) = lower.strip_prefix("color=") {
        section.color = Some(SectionColor::Hex(parse_hex_color(hex)?));
    } else if let Some(hex) = lower.strip_prefix("backgroundcolor=") {
        section.background_color = Some(parse_hex_color(hex)?);
    } else if lower.replace(' ', "") == "=null" {
        section.condition = Some(FormatCondition::IsNull);
    } else if let Some(color) = parse_color_name(&lower) {
        section.color = Some(SectionColor::Named(color));
    } else if let Some(condition) = parse_condition(directive) {
        section.condition = Some(condition);
    } else {
        warn!("Ignoring unsupported format directive [{}]", directive);
    }

    Ok(())
}

/// Find the matching `]` bracket.
fn find_bracket_end(chars: &[char], start: usize) -> Option<usize> {
    chars[start + 1..]
        .iter()
        .position(|&c| c == ']')
        .map(|offset| start + 1 + offset)
}

fn last_digit_position(tokens: &[FormatToken]) -> Option<usize> {
    tokens.iter().rposition(|t| {
        matches!(
            t,
            FormatToken::DigitZero | FormatToken::DigitHash | FormatToken::DecimalPoint
        )
    })
}

/// Count commas directly after the last digit placeholder (each scales by 1000).
fn count_trailing_comma_scale(tokens: &[FormatToken]) -> u32 {
    match last_digit_position(tokens) {
        Some(pos) => tokens[pos + 1..]
            .iter()
            .take_while(|t| matches!(t, FormatToken::Comma))
            .count() as u32,
        None => 0,
    }
}

/// Remove trailing commas used for scaling (they are not thousands separators).
fn remove_trailing_scale_commas(tokens: &mut Vec<FormatToken>) {
    if let Some(pos) = last_digit_position(tokens) {
        let count = count_trailing_comma_scale(tokens) as usize;
        tokens.drain(pos + 1..pos + 1 + count);
    }
}

// ============================================================================
// FORMATTER
// ============================================================================

/// Format a raw result value with an optional pattern.
pub fn format_value(value: Option<&str>, pattern: Option<&str>) -> FormattedValue {
    let parsed = match pattern.filter(|p| !p.trim().is_empty()) {
        Some(p) => match parse_format(p) {
            Ok(format) => Some(format),
            Err(err) => {
                warn!("Invalid format pattern {:?}: {}", p, err);
                return FormattedValue::empty();
            }
        },
        None => None,
    };

    let raw = match value {
        Some(raw) => raw,
        None => {
            return parsed
                .as_ref()
                .and_then(ParsedFormat::null_section)
                .map(|section| FormattedValue::styled(render_literals_only(section), section))
                .unwrap_or_else(FormattedValue::empty);
        }
    };

    match parse_value(raw) {
        Some(number) => match &parsed {
            Some(format) => format.apply_number(number),
            None => FormattedValue::plain(format_general(number)),
        },
        None => FormattedValue::empty(),
    }
}

impl ParsedFormat {
    /// The `[=null]` section, if any.
    pub fn null_section(&self) -> Option<&FormatSection> {
        self.sections.iter().find(|s| s.is_null_section())
    }

    /// Apply the pattern to a numeric value.
    pub fn apply_number(&self, value: f64) -> FormattedValue {
        match self.select_section_for_number(value) {
            Some((section, auto_sign)) => {
                FormattedValue::styled(render_number(value, section, auto_sign), section)
            }
            None => FormattedValue::plain(format_general(value)),
        }
    }

    /// Pick the section for `value`, and whether a minus sign must be prefixed.
    fn select_section_for_number(&self, value: f64) -> Option<(&FormatSection, bool)> {
        let numeric: Vec<&FormatSection> = self
            .sections
            .iter()
            .filter(|s| !s.is_null_section())
            .collect();

        if self.has_conditions {
            let matched = numeric.iter().find(|s| {
                s.condition
                    .as_ref()
                    .is_some_and(|condition| evaluate_condition(condition, value))
            });
            let chosen = matched.or_else(|| numeric.iter().find(|s| s.condition.is_none()))?;
            return Some((*chosen, !chosen.explicit_sign));
        }

        match numeric.len() {
            0 => None,
            n if value < 0.0 && n >= 2 => Some((numeric[1], false)),
            n if value == 0.0 && n >= 3 => Some((numeric[2], false)),
            _ => Some((numeric[0], !numeric[0].explicit_sign)),
        }
    }
}

/// Placeholder counts of a section's digit layout.
struct DigitLayout {
    int_required: usize,
    frac_required: usize,
    frac_total: usize,
    grouping: bool,
}

impl DigitLayout {
    fn from_tokens(tokens: &[FormatToken]) -> Self {
        let mut layout = DigitLayout {
            int_required: 0,
            frac_required: 0,
            frac_total: 0,
            grouping: has_thousands_separator(tokens),
        };
        let mut past_decimal = false;
        for token in tokens {
            match token {
                FormatToken::DecimalPoint => past_decimal = true,
                FormatToken::DigitZero if past_decimal => {
                    layout.frac_required += 1;
                    layout.frac_total += 1;
                }
                FormatToken::DigitHash if past_decimal => layout.frac_total += 1,
                FormatToken::DigitZero => layout.int_required += 1,
                _ => {}
            }
        }
        layout
    }
}

fn render_number(value: f64, section: &FormatSection, auto_sign: bool) -> String {
    if !section.has_digits {
        return render_literals_only(section);
    }

    let mut number = value.abs();
    if section.scale_divisor > 0 {
        number /= 1000f64.powi(section.scale_divisor as i32);
    }
    if section.has_percent {
        number *= 100.0;
    }

    let layout = DigitLayout::from_tokens(&section.tokens);
    let (mut int_digits, mut frac_digits) = round_decimal(number, layout.frac_total);

    while frac_digits.len() > layout.frac_required && frac_digits.ends_with('0') {
        frac_digits.pop();
    }
    if int_digits == "0" && layout.int_required == 0 {
        int_digits.clear();
    }
    while int_digits.len() < layout.int_required {
        int_digits.insert(0, '0');
    }

    let is_zero = int_digits.chars().all(|c| c == '0') && frac_digits.chars().all(|c| c == '0');
    if layout.grouping {
        int_digits = add_thousands_separator(&int_digits);
    }

    let mut result = String::new();
    if auto_sign && value < 0.0 && !is_zero {
        result.push('-');
    }

    let mut int_emitted = false;
    let mut frac_emitted = false;
    let mut past_decimal = false;
    for token in &section.tokens {
        match token {
            FormatToken::DigitZero | FormatToken::DigitHash => {
                if !past_decimal && !int_emitted {
                    result.push_str(&int_digits);
                    int_emitted = true;
                } else if past_decimal && !frac_emitted {
                    result.push_str(&frac_digits);
                    frac_emitted = true;
                }
            }
            FormatToken::DecimalPoint => {
                if !past_decimal && !frac_digits.is_empty() {
                    result.push('.');
                }
                past_decimal = true;
            }
            FormatToken::Comma => {}
            FormatToken::Percent => result.push('%'),
            FormatToken::Literal(s) => result.push_str(s),
        }
    }

    result
}

/// A comma between digit placeholders (before the decimal point) groups thousands.
fn has_thousands_separator(tokens: &[FormatToken]) -> bool {
    let mut saw_digit = false;

    for token in tokens {
        match token {
            FormatToken::DecimalPoint => return false,
            FormatToken::DigitZero | FormatToken::DigitHash => saw_digit = true,
            FormatToken::Comma if saw_digit => return true,
            _ => {}
        }
    }
    false
}

fn render_literals_only(section: &FormatSection) -> String {
    let mut result = String::new();
    for token in &section.tokens {
        match token {
            FormatToken::Literal(s) => result.push_str(s),
            FormatToken::Percent => result.push('%'),
            FormatToken::DecimalPoint => result.push('.'),
            FormatToken::Comma => result.push(','),
            FormatToken::DigitZero | FormatToken::DigitHash => {}
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(value: Option<&str>, pattern: &str) -> String {
        format_value(value, Some(pattern)).display_value
    }

    #[test]
    fn test_no_pattern_renders_general_number() {
        let result = format_value(Some("42"), None);
        assert_eq!(result.display_value, "42");
        assert!(!result.is_value_empty);
        assert_eq!(format_value(Some("1234.5"), Some("  ")).display_value, "1234.5");
    }

    #[test]
    fn test_null_without_null_section_is_empty() {
        let result = format_value(None, Some("#,##0"));
        assert_eq!(result, FormattedValue::empty());
        assert_eq!(result.display_value, EMPTY_VALUE_MARKER);
        assert!(result.is_value_empty);
    }

    #[test]
    fn test_null_section_renders_literal() {
        let result = format_value(None, Some("[=null]EMPTY"));
        assert_eq!(result.display_value, "EMPTY");
        assert!(!result.is_value_empty);

        let quoted = format_value(None, Some("#,##0;[=null]\"n/a\""));
        assert_eq!(quoted.display_value, "n/a");
    }

    #[test]
    fn test_colors_and_currency() {
        let result = format_value(
            Some("1666.105"),
            Some("[color=9c46b5][backgroundColor=d2ccde]$#,##0.00"),
        );
        assert_eq!(result.display_value, "$1,666.11");
        assert!(!result.is_value_empty);
        assert_eq!(result.color.as_deref(), Some("#9c46b5"));
        assert_eq!(result.background_color.as_deref(), Some("#d2ccde"));
    }

    #[test]
    fn test_named_color() {
        let result = format_value(Some("-5"), Some("[Red]#,##0"));
        assert_eq!(result.display_value, "-5");
        assert_eq!(result.color.as_deref(), Some("#ff0000"));
    }

    #[test]
    fn test_unparsable_value_is_empty() {
        assert!(format_value(Some("abc"), Some("#,##0")).is_value_empty);
        assert!(format_value(Some(""), None).is_value_empty);
        assert!(format_value(Some("NaN"), None).is_value_empty);
    }

    #[test]
    fn test_malformed_pattern_is_empty() {
        assert!(format_value(Some("1"), Some("[color=9c46b5#,##0")).is_value_empty);
        assert!(format_value(Some("1"), Some("\"abc#,##0")).is_value_empty);
        assert!(format_value(Some("1"), Some("[color=zzzzzz]#,##0")).is_value_empty);
    }

    #[test]
    fn test_label_xor_empty() {
        let values = [Some("1"), Some("-1"), Some("0"), None, Some("x")];
        let patterns = [None, Some("#,##0"), Some("[=null]-"), Some("#;(#);\"zero\"")];
        for value in values {
            for pattern in patterns {
                let result = format_value(value, pattern);
                assert_eq!(
                    result.is_value_empty,
                    result.display_value == EMPTY_VALUE_MARKER,
                    "value {:?} pattern {:?}",
                    value,
                    pattern
                );
            }
        }
    }

    #[test]
    fn test_digit_placeholders() {
        assert_eq!(label(Some("1234567.891"), "#,##0.00"), "1,234,567.89");
        assert_eq!(label(Some("1234.5"), "0.0##"), "1234.5");
        assert_eq!(label(Some("0.5"), "#.##"), ".5");
        assert_eq!(label(Some("7"), "000"), "007");
        assert_eq!(label(Some("3.999"), "#,##0.00"), "4.00");
        assert_eq!(label(Some("12"), "#,##0.0#"), "12.0");
    }

    #[test]
    fn test_percent_and_scaling() {
        assert_eq!(label(Some("0.1234"), "#,##0.0%"), "12.3%");
        assert_eq!(label(Some("0.5"), "0%"), "50%");
        assert_eq!(label(Some("1500000"), "#,##0.0,,\"M\""), "1.5M");
        assert_eq!(label(Some("12345"), "#,##0,\"k\""), "12k");
    }

    #[test]
    fn test_sections_route_by_sign() {
        let pattern = "#,##0.00;(#,##0.00);\"zero\"";
        assert_eq!(label(Some("1000"), pattern), "1,000.00");
        assert_eq!(label(Some("-1000"), pattern), "(1,000.00)");
        assert_eq!(label(Some("0"), pattern), "zero");

        // Two sections: the negative section carries its own sign
        assert_eq!(label(Some("-3"), "0;0"), "3");
    }

    #[test]
    fn test_negative_sign_placement() {
        assert_eq!(label(Some("-5"), "$#,##0.00"), "-$5.00");
        assert_eq!(label(Some("-0.001"), "#,##0.00"), "0.00");
    }

    #[test]
    fn test_quoted_sign_characters_keep_automatic_minus() {
        assert_eq!(label(Some("-5"), "#,##0 \"(est)\""), "-5 (est)");
        assert_eq!(label(Some("-5"), "#,##0 \"- units\""), "-5 - units");
        assert_eq!(label(Some("-5"), "\"(\"#,##0\")\""), "-(5)");
        assert_eq!(label(Some("-5"), "[<0]#,##0 \"- units\";#,##0"), "-5 - units");
    }

    #[test]
    fn test_unquoted_sign_characters_replace_automatic_minus() {
        assert_eq!(label(Some("-5"), "(#,##0)"), "(5)");
        assert_eq!(label(Some("-5"), "[<0]-#,##0;#,##0"), "-5");
        assert_eq!(label(Some("-5"), "\\-#,##0"), "-5");
        assert_eq!(label(Some("-5"), "#,##0 (net"), "-5 (net");
    }

    #[test]
    fn test_conditional_sections() {
        let pattern = "[<0][red]#,##0;[>=1000][green]#,##0,\"k\";#,##0";
        let negative = format_value(Some("-20"), Some(pattern));
        assert_eq!(negative.display_value, "-20");
        assert_eq!(negative.color.as_deref(), Some("#ff0000"));

        let large = format_value(Some("25000"), Some(pattern));
        assert_eq!(large.display_value, "25k");
        assert_eq!(large.color.as_deref(), Some("#008000"));

        let plain = format_value(Some("500"), Some(pattern));
        assert_eq!(plain.display_value, "500");
        assert_eq!(plain.color, None);
    }

    #[test]
    fn test_conditional_with_null_section() {
        let pattern = "[=null]\"--\";[=0]\"nothing\";#,##0";
        assert_eq!(label(None, pattern), "--");
        assert_eq!(label(Some("0"), pattern), "nothing");
        assert_eq!(label(Some("12"), pattern), "12");
    }

    #[test]
    fn test_escapes_and_literals() {
        assert_eq!(label(Some("5"), "\\$0 \"units\""), "$5 units");
        assert_eq!(label(Some("5"), "0 pcs"), "5 pcs");
    }

    #[test]
    fn test_only_null_section_falls_back_to_general() {
        assert_eq!(label(Some("3.25"), "[=null]n/a"), "3.25");
    }

    #[test]
    fn test_hex_color_normalization() {
        assert_eq!(parse_hex_color("ABC").unwrap(), "#aabbcc");
        assert_eq!(parse_hex_color("#00FF00").unwrap(), "#00ff00");
        assert!(parse_hex_color("12345").is_err());
    }
}
