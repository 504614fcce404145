#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    /// 由大到小（nlargest）
    Descending,
    /// 由小到大（nsmallest）
    Ascending,
}

/// 依 `key` 排序取前 n 筆；排序穩定，同值保留原始順序
pub fn top_n_by<T, F>(rows: &[T], n: usize, key: F, order: Order) -> Vec<&T>
where
    F: Fn(&T) -> f64,
{
    let mut ranked: Vec<&T> = rows.iter().collect();
    match order {
        Order::Descending => ranked.sort_by(|a, b| key(b).total_cmp(&key(a))),
        Order::Ascending => ranked.sort_by(|a, b| key(a).total_cmp(&key(b))),
    }
    ranked.truncate(n);
    ranked
}

/// 最大值所在的列；同值取第一個
pub fn arg_max_by<T, F>(rows: &[T], key: F) -> Option<&T>
where
    F: Fn(&T) -> f64,
{
    let mut best: Option<(&T, f64)> = None;
    for row in rows {
        let value = key(row);
        match best {
            Some((_, current)) if value <= current => {}
            _ => best = Some((row, value)),
        }
    }
    best.map(|(row, _)| row)
}

/// 最小值所在的列；同值取第一個
pub fn arg_min_by<T, F>(rows: &[T], key: F) -> Option<&T>
where
    F: Fn(&T) -> f64,
{
    arg_max_by(rows, |row| -key(row))
}

pub fn count_where<T, F>(rows: &[T], predicate: F) -> usize
where
    F: Fn(&T) -> bool,
{
    rows.iter().filter(|row| predicate(row)).count()
}
