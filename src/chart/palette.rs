//! 固定色盤：同一類別在每個區塊都使用同一個顏色。

pub const MALE: &str = "#1f2eb4";
pub const FEMALE: &str = "#eb0eff";
pub const TOTAL: &str = "#009e73";
pub const NEGATIVE: &str = "#d55e00";

/// 地圖上沒有資料的多邊形
pub const NEUTRAL_FILL: &str = "lightgray";

/// ColorBrewer RdYlGn，6 級
pub const RDYLGN_6: [&str; 6] = [
    "#d73027", "#fc8d59", "#fee08b", "#d9ef8b", "#91cf60", "#1a9850",
];

/// 未登記類別的備用色（Okabe-Ito）
const FALLBACK: [&str; 6] = [
    "#e69f00", "#56b4e9", "#f0e442", "#0072b2", "#cc79a7", "#999999",
];

pub fn category_color(label: &str) -> &'static str {
    match label {
        "Hombres" | "Inmigrantes (F)" => MALE,
        "Mujeres" | "Emigrantes (CF)" => FEMALE,
        "Total" | "No migrantes (NM)" => TOTAL,
        other => FALLBACK[stable_index(other, FALLBACK.len())],
    }
}

// FNV-1a，跨執行結果一致
fn stable_index(label: &str, len: usize) -> usize {
    let mut hash: u64 = 0xcbf29ce484222325;
    for byte in label.bytes() {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    (hash % len as u64) as usize
}

/// 等寬分級，回傳 `[0, classes)` 的級別
pub fn class_index(value: f64, min: f64, max: f64, classes: usize) -> usize {
    if classes == 0 {
        return 0;
    }
    if !(max > min) {
        return classes / 2;
    }
    let position = ((value - min) / (max - min) * classes as f64).floor();
    (position.max(0.0) as usize).min(classes - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sex_categories_have_fixed_colors() {
        assert_eq!(category_color("Hombres"), "#1f2eb4");
        assert_eq!(category_color("Mujeres"), "#eb0eff");
        assert_eq!(category_color("Total"), "#009e73");
    }

    #[test]
    fn test_unknown_category_color_is_stable() {
        let first = category_color("Rural Disperso");
        assert_eq!(first, category_color("Rural Disperso"));
        assert!(FALLBACK.contains(&first));
    }

    #[test]
    fn test_class_index_bounds() {
        assert_eq!(class_index(-18.57, -18.57, 22.12, 6), 0);
        assert_eq!(class_index(22.12, -18.57, 22.12, 6), 5);
        assert_eq!(class_index(1.0, 1.0, 1.0, 6), 3);
        assert_eq!(class_index(0.0, -10.0, 10.0, 6), 3);
    }
}
