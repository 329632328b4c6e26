//! Text formatting shared by the renderers.

use chrono::NaiveDateTime;

/// Escape text for interpolation into HTML content or attribute values.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Indian rupees with en-IN grouping and at most two fraction digits,
/// e.g. `₹1,23,456.5`.
pub fn format_currency(amount: f64) -> String {
    let amount = if amount.is_finite() { amount } else { 0.0 };
    let paise = (amount.abs() * 100.0).round() as u64;
    let rupees = paise / 100;
    let fraction = paise % 100;

    let mut out = String::new();
    if amount < 0.0 && paise != 0 {
        out.push('-');
    }
    out.push('₹');
    out.push_str(&group_indian(rupees));
    match fraction {
        0 => {}
        f if f % 10 == 0 => out.push_str(&format!(".{}", f / 10)),
        f => out.push_str(&format!(".{f:02}")),
    }
    out
}

/// `1234567` → `12,34,567`: the last three digits, then pairs.
fn group_indian(n: u64) -> String {
    let digits = n.to_string();
    if digits.len() <= 3 {
        return digits;
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("{},{tail}", groups.join(","))
}

/// Quantities print like the browser would: `2`, `2.5`.
pub fn format_quantity(quantity: f64) -> String {
    format!("{quantity}")
}

pub fn format_date(at: &NaiveDateTime) -> String {
    at.format("%d/%m/%Y").to_string()
}

pub fn format_time(at: &NaiveDateTime) -> String {
    at.format("%H:%M").to_string()
}

pub fn format_datetime(at: &NaiveDateTime) -> String {
    at.format("%d/%m/%Y, %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn currency_uses_indian_grouping() {
        assert_eq!(format_currency(0.0), "₹0");
        assert_eq!(format_currency(999.0), "₹999");
        assert_eq!(format_currency(1234.5), "₹1,234.5");
        assert_eq!(format_currency(123456.789), "₹1,23,456.79");
        assert_eq!(format_currency(12345678.0), "₹1,23,45,678");
        assert_eq!(format_currency(45.05), "₹45.05");
        assert_eq!(format_currency(-100.0), "-₹100");
        assert_eq!(format_currency(f64::NAN), "₹0");
    }

    #[test]
    fn escape_covers_markup_and_quotes() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#x27;Jerry&#x27;&lt;/b&gt;"
        );
        assert_eq!(escape_html("Basmati Rice"), "Basmati Rice");
    }

    #[test]
    fn dates_and_quantities() {
        let at = NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(9, 7, 2)
            .unwrap();
        assert_eq!(format_date(&at), "05/03/2024");
        assert_eq!(format_time(&at), "09:07");
        assert_eq!(format_datetime(&at), "05/03/2024, 09:07:02");
        assert_eq!(format_quantity(2.0), "2");
        assert_eq!(format_quantity(1.25), "1.25");
    }
}
