//! Display helpers shared by the dashboard, the share page and reports.

use chrono::{DateTime, Utc};

/// Formats an amount in rupees with Indian digit grouping, e.g. `₹12,34,567.5`.
///
/// At most two decimals are shown and a zero fraction is dropped.
pub fn currency(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    // amounts that round to zero carry no sign
    let sign = if amount < 0.0 && cents != 0 { "-" } else { "" };
    let whole = cents / 100;
    let fraction = cents % 100;

    let mut out = format!("{}₹{}", sign, group_indian(whole));
    if fraction != 0 {
        let digits = format!("{:02}", fraction);
        out.push('.');
        out.push_str(digits.trim_end_matches('0'));
    }
    out
}

// Last three digits form one group, the rest are grouped in pairs.
fn group_indian(value: u64) -> String {
    let digits = value.to_string();
    if digits.len() <= 3 {
        return digits;
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    let mut rest = head;
    while rest.len() > 2 {
        let (left, right) = rest.split_at(rest.len() - 2);
        groups.push(right);
        rest = left;
    }
    if !rest.is_empty() {
        groups.push(rest);
    }
    groups.reverse();

    format!("{},{}", groups.join(","), tail)
}

/// Turns a stored `snake_case` value into a `Title Case` label
pub fn label(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" "),
        _ => "Not specified".to_string(),
    }
}

pub fn short_date(date: &DateTime<Utc>) -> String {
    date.format("%d %b %Y").to_string()
}

pub fn date_time(date: &DateTime<Utc>) -> String {
    date.format("%d %b, %H:%M").to_string()
}

/// First line of a commit message
pub fn first_line(message: &str) -> &str {
    message.lines().next().unwrap_or("")
}

/// Percentage with one decimal, as used for collection rates
pub fn percent(value: f64) -> String {
    format!("{:.1}%", value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn currency_uses_indian_grouping() {
        assert_eq!(currency(0.0), "₹0");
        assert_eq!(currency(999.0), "₹999");
        assert_eq!(currency(1000.0), "₹1,000");
        assert_eq!(currency(100000.0), "₹1,00,000");
        assert_eq!(currency(1234567.0), "₹12,34,567");
        assert_eq!(currency(123456789.0), "₹12,34,56,789");
    }

    #[test]
    fn currency_keeps_significant_decimals() {
        assert_eq!(currency(1500.5), "₹1,500.5");
        assert_eq!(currency(1500.25), "₹1,500.25");
        assert_eq!(currency(10.004), "₹10");
        assert_eq!(currency(-2500.0), "-₹2,500");
    }

    #[test]
    fn tiny_negative_amounts_render_as_zero() {
        assert_eq!(currency(-0.001), "₹0");
        assert_eq!(currency(-0.004), "₹0");
        assert_eq!(currency(-0.006), "-₹0.01");
    }

    #[test]
    fn labels_are_title_cased() {
        assert_eq!(label(Some("cold_outreach")), "Cold Outreach");
        assert_eq!(label(Some("saas")), "Saas");
        assert_eq!(label(Some("")), "Not specified");
        assert_eq!(label(None), "Not specified");
    }

    #[test]
    fn first_line_strips_commit_body() {
        assert_eq!(first_line("Fix login\n\nLonger body"), "Fix login");
        assert_eq!(first_line(""), "");
    }

    #[test]
    fn dates_render_day_month_year() {
        let date = Utc.with_ymd_and_hms(2025, 3, 7, 14, 5, 0).unwrap();
        assert_eq!(short_date(&date), "07 Mar 2025");
        assert_eq!(date_time(&date), "07 Mar, 14:05");
    }
}
