use crate::domain::model::PolygonRecord;
use crate::geo::normalize::normalize;
use crate::utils::error::{DashError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::str::FromStr;

/// 指標表中正規化名稱重複時的處理方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
    #[default]
    Reject,
    FirstWins,
    LastWins,
}

impl FromStr for DuplicatePolicy {
    type Err = DashError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "reject" => Ok(DuplicatePolicy::Reject),
            "first-wins" => Ok(DuplicatePolicy::FirstWins),
            "last-wins" => Ok(DuplicatePolicy::LastWins),
            other => Err(DashError::InvalidConfigValueError {
                field: "duplicate_policy".to_string(),
                value: other.to_string(),
                reason: "Expected one of: reject, first-wins, last-wins".to_string(),
            }),
        }
    }
}

/// 左連接結果：每個多邊形一筆，找不到對應列時 `row` 為 None
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedRecord<'a, T> {
    pub polygon: &'a PolygonRecord,
    pub row: Option<&'a T>,
}

impl<T> JoinedRecord<'_, T> {
    pub fn is_matched(&self) -> bool {
        self.row.is_some()
    }
}

/// 以正規化名稱把指標列接到多邊形上
pub fn join<'a, T, K>(
    polygons: &'a [PolygonRecord],
    rows: &'a [T],
    key: K,
    policy: DuplicatePolicy,
) -> Result<Vec<JoinedRecord<'a, T>>>
where
    K: Fn(&T) -> &str,
{
    let mut index: HashMap<String, &'a T> = HashMap::with_capacity(rows.len());
    for row in rows {
        let name = normalize(key(row));
        if index.contains_key(&name) {
            match policy {
                DuplicatePolicy::Reject => {
                    return Err(DashError::DataInconsistency {
                        table: "join".to_string(),
                        message: format!("duplicate indicator name '{}' after normalization", name),
                    });
                }
                DuplicatePolicy::FirstWins => continue,
                DuplicatePolicy::LastWins => {}
            }
        }
        index.insert(name, row);
    }

    let joined: Vec<JoinedRecord<'a, T>> = polygons
        .iter()
        .map(|polygon| JoinedRecord {
            polygon,
            row: index.get(&normalize(&polygon.name)).copied(),
        })
        .collect();

    let matched = joined.iter().filter(|j| j.is_matched()).count();
    tracing::debug!(
        "Joined {} of {} polygons to {} indicator rows",
        matched,
        polygons.len(),
        rows.len()
    );

    let polygon_names: HashSet<String> = polygons.iter().map(|p| normalize(&p.name)).collect();
    let orphans: Vec<&String> = index.keys().filter(|k| !polygon_names.contains(*k)).collect();
    if !orphans.is_empty() {
        tracing::warn!("⚠️ Indicator rows without a boundary polygon: {:?}", orphans);
    }

    Ok(joined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn polygon(name: &str) -> PolygonRecord {
        PolygonRecord {
            name: name.to_string(),
            geometry: Value::Null,
            properties: serde_json::Map::new(),
            centroid: None,
        }
    }

    #[test]
    fn test_join_preserves_polygon_count() {
        let polygons = vec![polygon("ITAGUI"), polygon("Medellin"), polygon("URRAO")];
        let rows = vec![("ITAGÜÍ", 1.0), ("MEDELLÍN", -0.23), ("BELLO", 7.57)];

        let joined = join(&polygons, &rows, |r| r.0, DuplicatePolicy::Reject).unwrap();

        assert_eq!(joined.len(), polygons.len());
        assert_eq!(joined[0].row.map(|r| r.1), Some(1.0));
        assert_eq!(joined[1].row.map(|r| r.1), Some(-0.23));
        assert!(joined[2].row.is_none());
    }

    #[test]
    fn test_duplicate_names_follow_policy() {
        let polygons = vec![polygon("ENVIGADO")];
        let rows = vec![("Envigado", 1.0), ("ENVIGADO ", 2.0)];

        let err = join(&polygons, &rows, |r| r.0, DuplicatePolicy::Reject).unwrap_err();
        assert!(matches!(err, DashError::DataInconsistency { .. }));

        let first = join(&polygons, &rows, |r| r.0, DuplicatePolicy::FirstWins).unwrap();
        assert_eq!(first[0].row.map(|r| r.1), Some(1.0));

        let last = join(&polygons, &rows, |r| r.0, DuplicatePolicy::LastWins).unwrap();
        assert_eq!(last[0].row.map(|r| r.1), Some(2.0));
    }

    #[test]
    fn test_duplicate_polygons_each_get_the_row() {
        let polygons = vec![polygon("BELLO"), polygon("bello")];
        let rows = vec![("BELLO", 7.57)];
        let joined = join(&polygons, &rows, |r| r.0, DuplicatePolicy::Reject).unwrap();
        assert!(joined.iter().all(JoinedRecord::is_matched));
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("last-wins".parse::<DuplicatePolicy>().unwrap(), DuplicatePolicy::LastWins);
        assert!("newest".parse::<DuplicatePolicy>().is_err());
    }
}
