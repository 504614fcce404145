//! 顯示用的數字格式

/// 四捨五入到指定小數位
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// `5974788` -> `"5,974,788"`
pub fn thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// 固定小數位，同時保留千分位
pub fn fixed(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };
    let int_value: i64 = int_part.parse().unwrap_or(0);
    let sign = if value < 0.0 && formatted.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    };
    match frac_part {
        Some(frac) => format!("{}{}.{}", sign, thousands(int_value), frac),
        None => format!("{}{}", sign, thousands(int_value)),
    }
}

/// 正值前面加上 `+`
pub fn signed(value: f64, decimals: usize) -> String {
    if value > 0.0 {
        format!("+{}", fixed(value, decimals))
    } else {
        fixed(value, decimals)
    }
}

/// 西班牙文小數點：`58.786` -> `"58,79"`
pub fn decimal_comma(value: f64, decimals: usize) -> String {
    format!("{:.*}", decimals, value).replace('.', ",")
}

/// HTML 文字跳脫
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_comma() {
        assert_eq!(decimal_comma(58.7863052, 2), "58,79");
        assert_eq!(decimal_comma(0.511329, 3), "0,511");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<b>\"A&B\"</b> 'x'"),
            "&lt;b&gt;&quot;A&amp;B&quot;&lt;/b&gt; &#39;x&#39;"
        );
        assert_eq!(escape_html("ITAGÜÍ"), "ITAGÜÍ");
    }

    #[test]
    fn test_thousands() {
        assert_eq!(thousands(5974788), "5,974,788");
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(1000), "1,000");
        assert_eq!(thousands(-29504), "-29,504");
    }

    #[test]
    fn test_fixed() {
        assert_eq!(fixed(48.29264, 2), "48.29");
        assert_eq!(fixed(1350781.5, 1), "1,350,781.5");
        assert_eq!(fixed(-0.31, 2), "-0.31");
        assert_eq!(fixed(-0.001, 2), "0.00");
        assert_eq!(fixed(f64::NAN, 2), "-");
    }

    #[test]
    fn test_round_and_signed() {
        assert_eq!(round_to(48.29264, 2), 48.29);
        assert_eq!(signed(0.95, 2), "+0.95");
        assert_eq!(signed(-1.09, 2), "-1.09");
    }
}
