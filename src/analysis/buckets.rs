use crate::domain::model::AgeGroupRow;
use serde::{Deserialize, Serialize};

/// 年齡組分桶：0-14、15-64、65+
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgeBuckets {
    pub youth: Vec<String>,
    pub working: Vec<String>,
    pub elderly: Vec<String>,
}

impl Default for AgeBuckets {
    fn default() -> Self {
        fn labels(items: &[&str]) -> Vec<String> {
            items.iter().map(|s| s.to_string()).collect()
        }
        Self {
            youth: labels(&["0 a 4", "5 a 9", "10 a 14"]),
            working: labels(&[
                "15 a 19", "20 a 24", "25 a 29", "30 a 34", "35 a 39", "40 a 44", "45 a 49",
                "50 a 54", "55 a 59", "60 a 64",
            ]),
            elderly: labels(&["65 a 69", "70 a 74", "75 a 79", "80 a 84", "85 y más"]),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BucketSums {
    pub youth: i64,
    pub working: i64,
    pub elderly: i64,
    /// 設定中找不到對應列的標籤
    pub unmatched: Vec<String>,
}

/// 依標籤完全比對加總。找不到的標籤貢獻 0，並記錄在 `unmatched`。
pub fn bucket_sums(rows: &[AgeGroupRow], buckets: &AgeBuckets) -> BucketSums {
    let mut sums = BucketSums::default();

    let mut sum_labels = |labels: &[String]| -> i64 {
        let mut total = 0;
        for label in labels {
            let matched: Vec<&AgeGroupRow> =
                rows.iter().filter(|r| &r.age_band == label).collect();
            if matched.is_empty() {
                tracing::warn!("⚠️ Age bucket label '{}' matches no row; contributes 0", label);
                sums.unmatched.push(label.clone());
            }
            total += matched.iter().map(|r| r.total).sum::<i64>();
        }
        total
    };

    let youth = sum_labels(&buckets.youth);
    let working = sum_labels(&buckets.working);
    let elderly = sum_labels(&buckets.elderly);

    sums.youth = youth;
    sums.working = working;
    sums.elderly = elderly;
    sums
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::population;

    #[test]
    fn test_default_buckets_cover_total_population() {
        let sums = bucket_sums(&population::age_groups(), &AgeBuckets::default());

        assert_eq!(sums.youth, 1177972);
        assert_eq!(sums.working, 4213850);
        assert_eq!(sums.elderly, 582966);
        assert_eq!(sums.youth + sums.working + sums.elderly, 5974788);
        assert!(sums.unmatched.is_empty());
    }

    #[test]
    fn test_misspelled_label_is_reported() {
        let mut buckets = AgeBuckets::default();
        buckets.elderly[4] = "85 y mas".to_string();

        let sums = bucket_sums(&population::age_groups(), &buckets);

        assert_eq!(sums.elderly, 582966 - 63259);
        assert_eq!(sums.unmatched, vec!["85 y mas".to_string()]);
    }
}
