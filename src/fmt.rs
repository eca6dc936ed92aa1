/// Format a flow amount as whole pounds with thousands separators: £1,234
pub fn pounds(val: f64) -> String {
    let negative = val < 0.0;
    let int_part = format!("{:.0}", val.abs());

    let mut with_commas = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_commas.push(',');
        }
        with_commas.push(c);
    }
    let with_commas: String = with_commas.chars().rev().collect();

    if negative {
        format!("-\u{a3}{with_commas}")
    } else {
        format!("\u{a3}{with_commas}")
    }
}

/// Format a percentage to one decimal place: 47.0%
pub fn pct(val: f64) -> String {
    format!("{val:.1}%")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pounds_formatting() {
        assert_eq!(pounds(1234.0), "\u{a3}1,234");
        assert_eq!(pounds(-500.0), "-\u{a3}500");
        assert_eq!(pounds(0.0), "\u{a3}0");
        assert_eq!(pounds(1000000.4), "\u{a3}1,000,000");
        assert_eq!(pounds(42.0), "\u{a3}42");
    }

    #[test]
    fn test_pct_formatting() {
        assert_eq!(pct(47.0), "47.0%");
        assert_eq!(pct(2.345), "2.3%");
        assert_eq!(pct(100.0), "100.0%");
    }
}
