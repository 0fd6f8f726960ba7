//! d3-style number format specifiers.
//!
//! Category metadata carries format strings such as `$,.0f`, `.1%` or `,`;
//! this module parses the subset of the d3-format grammar those files use:
//!
//! ```text
//! [[fill]align][sign][symbol][0][width][,][.precision][~][type]
//! ```
//!
//! Supported types are `f`, `%`, `d`, `e`, `g`, `r` and the empty type.
//! Unknown type characters fall back to the empty type.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Right,
    Center,
    /// Pad between the sign/currency prefix and the digits.
    AfterSign,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sign {
    /// `-`: only negatives carry a sign.
    Negative,
    /// `+`: always show a sign.
    Always,
    /// ` `: space for positives, minus for negatives.
    Space,
    /// `(`: wrap negatives in parentheses.
    Parentheses,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormatKind {
    Default,
    Fixed,
    Percent,
    Integer,
    Exponent,
    General,
    Significant,
}

/// Parsed format specifier. Parsing never fails: malformed input degrades to
/// the default format, matching how blank category formats behave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberFormat {
    fill: char,
    align: Align,
    sign: Sign,
    currency: bool,
    width: Option<usize>,
    grouping: bool,
    precision: Option<usize>,
    trim: bool,
    kind: FormatKind,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self {
            fill: ' ',
            align: Align::Right,
            sign: Sign::Negative,
            currency: false,
            width: None,
            grouping: false,
            precision: None,
            trim: false,
            kind: FormatKind::Default,
        }
    }
}

fn parse_align(c: char) -> Option<Align> {
    match c {
        '<' => Some(Align::Left),
        '>' => Some(Align::Right),
        '^' => Some(Align::Center),
        '=' => Some(Align::AfterSign),
        _ => None,
    }
}

impl NumberFormat {
    #[must_use]
    pub fn parse(spec: &str) -> Self {
        let mut format = Self::default();
        let chars: Vec<char> = spec.trim().chars().collect();
        let mut i = 0;

        match (
            chars.first().copied(),
            chars.get(1).copied().and_then(parse_align),
        ) {
            (Some(fill), Some(align)) => {
                format.fill = fill;
                format.align = align;
                i = 2;
            }
            (Some(first), None) => {
                if let Some(align) = parse_align(first) {
                    format.align = align;
                    i = 1;
                }
            }
            _ => {}
        }

        if let Some(sign) = chars.get(i).and_then(|c| match c {
            '-' => Some(Sign::Negative),
            '+' => Some(Sign::Always),
            ' ' => Some(Sign::Space),
            '(' => Some(Sign::Parentheses),
            _ => None,
        }) {
            format.sign = sign;
            i += 1;
        }

        if chars.get(i) == Some(&'$') {
            format.currency = true;
            i += 1;
        }

        if chars.get(i) == Some(&'0') {
            format.fill = '0';
            format.align = Align::AfterSign;
            i += 1;
        }

        let width_start = i;
        while chars.get(i).is_some_and(char::is_ascii_digit) {
            i += 1;
        }
        if i > width_start {
            format.width = chars[width_start..i]
                .iter()
                .collect::<String>()
                .parse()
                .ok();
        }

        if chars.get(i) == Some(&',') {
            format.grouping = true;
            i += 1;
        }

        if chars.get(i) == Some(&'.') {
            i += 1;
            let precision_start = i;
            while chars.get(i).is_some_and(char::is_ascii_digit) {
                i += 1;
            }
            format.precision = chars[precision_start..i]
                .iter()
                .collect::<String>()
                .parse()
                .ok();
        }

        if chars.get(i) == Some(&'~') {
            format.trim = true;
            i += 1;
        }

        format.kind = match chars.get(i) {
            Some('f') => FormatKind::Fixed,
            Some('%') => FormatKind::Percent,
            Some('d') => FormatKind::Integer,
            Some('e') => FormatKind::Exponent,
            Some('g') => FormatKind::General,
            Some('r') => FormatKind::Significant,
            _ => FormatKind::Default,
        };

        format
    }

    #[must_use]
    pub fn is_percent(&self) -> bool {
        self.kind == FormatKind::Percent
    }

    #[must_use]
    pub fn format(&self, value: f64) -> String {
        if value.is_nan() {
            return self.pad(String::new(), "NaN".to_owned());
        }

        let negative = value.is_sign_negative();
        let magnitude = value.abs();
        let (mut digits, suffix) = match self.kind {
            FormatKind::Default => (
                match self.precision {
                    Some(precision) => trim_zeros(&significant(magnitude, precision.max(1))),
                    None => shortest(magnitude),
                },
                "",
            ),
            FormatKind::Fixed => (fixed(magnitude, self.precision.unwrap_or(6)), ""),
            FormatKind::Percent => (fixed(magnitude * 100.0, self.precision.unwrap_or(6)), "%"),
            FormatKind::Integer => (fixed(magnitude, 0), ""),
            FormatKind::Exponent => (exponent(magnitude, self.precision.unwrap_or(6)), ""),
            FormatKind::General | FormatKind::Significant => {
                (significant(magnitude, self.precision.unwrap_or(6).max(1)), "")
            }
        };

        if self.trim {
            digits = trim_zeros(&digits);
        }
        // Rounding can turn a small negative into zero; never print "-0".
        let negative = negative && digits.chars().any(|c| c.is_ascii_digit() && c != '0');

        if self.grouping {
            digits = group_thousands(&digits);
        }

        let mut prefix = String::new();
        let mut closing = String::new();
        match (self.sign, negative) {
            (Sign::Parentheses, true) => {
                prefix.push('(');
                closing.push(')');
            }
            (_, true) => prefix.push('-'),
            (Sign::Always, false) => prefix.push('+'),
            (Sign::Space, false) => prefix.push(' '),
            _ => {}
        }
        if self.currency {
            prefix.push('$');
        }

        self.pad(prefix, format!("{digits}{suffix}{closing}"))
    }

    fn pad(&self, prefix: String, body: String) -> String {
        let length = prefix.chars().count() + body.chars().count();
        let Some(width) = self.width.filter(|width| *width > length) else {
            return prefix + &body;
        };
        let padding = width - length;
        let fill = |count: usize| self.fill.to_string().repeat(count);
        match self.align {
            Align::Left => format!("{prefix}{body}{}", fill(padding)),
            Align::Right => format!("{}{prefix}{body}", fill(padding)),
            Align::Center => {
                let left = padding / 2;
                format!("{}{prefix}{body}{}", fill(left), fill(padding - left))
            }
            Align::AfterSign => format!("{prefix}{}{body}", fill(padding)),
        }
    }
}

fn fixed(value: f64, precision: usize) -> String {
    format!("{value:.precision$}")
}

fn shortest(value: f64) -> String {
    if value.is_infinite() {
        return "Infinity".to_owned();
    }
    crate::core::primitives::display_number(value)
}

fn significant(value: f64, digits: usize) -> String {
    if value == 0.0 || !value.is_finite() {
        return fixed(value, digits.saturating_sub(1));
    }
    let exponent = value.log10().floor() as i64;
    let decimals = (digits as i64 - 1 - exponent).max(0) as usize;
    let scale = 10f64.powi((digits as i64 - 1 - exponent) as i32);
    let rounded = (value * scale).round() / scale;
    fixed(rounded, decimals)
}

fn exponent(value: f64, precision: usize) -> String {
    let rendered = format!("{value:.precision$e}");
    match rendered.split_once('e') {
        Some((mantissa, exp)) if exp.starts_with('-') => format!("{mantissa}e{exp}"),
        Some((mantissa, exp)) => format!("{mantissa}e+{exp}"),
        None => rendered,
    }
}

fn trim_zeros(digits: &str) -> String {
    let (number, exponent) = match digits.split_once('e') {
        Some((number, exponent)) => (number, Some(exponent)),
        None => (digits, None),
    };
    let trimmed = if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    };
    match exponent {
        Some(exponent) => format!("{trimmed}e{exponent}"),
        None => trimmed.to_owned(),
    }
}

fn group_thousands(digits: &str) -> String {
    let split = digits.find(['.', 'e']).unwrap_or(digits.len());
    let (integer, rest) = digits.split_at(split);
    let mut grouped = String::with_capacity(digits.len() + integer.len() / 3);
    for (index, c) in integer.chars().enumerate() {
        if index > 0 && (integer.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped.push_str(rest);
    grouped
}

#[cfg(test)]
mod tests {
    use super::NumberFormat;

    #[test]
    fn group_thousands_only_touches_the_integer_part() {
        assert_eq!(super::group_thousands("1234567.891"), "1,234,567.891");
        assert_eq!(super::group_thousands("999"), "999");
    }

    #[test]
    fn exponent_format_uses_explicit_sign() {
        assert_eq!(NumberFormat::parse(".2e").format(12345.0), "1.23e+4");
        assert_eq!(NumberFormat::parse(".1e").format(0.00123), "1.2e-3");
    }
}
