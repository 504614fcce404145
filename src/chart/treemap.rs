//! Squarified treemap layout (Bruls, Huizing, van Wijk).

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// 依數值把 `width × height` 切成矩形，回傳順序與輸入相同。
/// 非正值得到零面積矩形。
pub fn layout_treemap(values: &[f64], width: f64, height: f64) -> Vec<Rect> {
    let mut rects = vec![
        Rect {
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
        };
        values.len()
    ];

    let total: f64 = values.iter().filter(|v| **v > 0.0).sum();
    if total <= 0.0 || width <= 0.0 || height <= 0.0 {
        return rects;
    }

    let scale = width * height / total;
    let mut order: Vec<usize> = (0..values.len()).filter(|&i| values[i] > 0.0).collect();
    order.sort_by(|&a, &b| values[b].total_cmp(&values[a]));
    let areas: Vec<(usize, f64)> = order.iter().map(|&i| (i, values[i] * scale)).collect();

    let mut free = Rect {
        x: 0.0,
        y: 0.0,
        width,
        height,
    };
    let mut row: Vec<(usize, f64)> = Vec::new();

    for &item in &areas {
        let side = free.width.min(free.height);
        if row.is_empty() {
            row.push(item);
            continue;
        }
        let current = worst_ratio(&row, side);
        row.push(item);
        if worst_ratio(&row, side) > current {
            row.pop();
            place_row(&row, &mut free, &mut rects);
            row.clear();
            row.push(item);
        }
    }
    if !row.is_empty() {
        place_row(&row, &mut free, &mut rects);
    }

    rects
}

fn worst_ratio(row: &[(usize, f64)], side: f64) -> f64 {
    let sum: f64 = row.iter().map(|(_, a)| a).sum();
    let max = row.iter().map(|(_, a)| *a).fold(f64::MIN, f64::max);
    let min = row.iter().map(|(_, a)| *a).fold(f64::MAX, f64::min);
    let side_sq = side * side;
    let sum_sq = sum * sum;
    (side_sq * max / sum_sq).max(sum_sq / (side_sq * min))
}

fn place_row(row: &[(usize, f64)], free: &mut Rect, rects: &mut [Rect]) {
    let sum: f64 = row.iter().map(|(_, a)| a).sum();

    if free.width >= free.height {
        // 沿左側放一欄
        let column_width = sum / free.height;
        let mut y = free.y;
        for &(index, area) in row {
            let h = area / column_width;
            rects[index] = Rect {
                x: free.x,
                y,
                width: column_width,
                height: h,
            };
            y += h;
        }
        free.x += column_width;
        free.width -= column_width;
    } else {
        // 沿上方放一列
        let row_height = sum / free.width;
        let mut x = free.x;
        for &(index, area) in row {
            let w = area / row_height;
            rects[index] = Rect {
                x,
                y: free.y,
                width: w,
                height: row_height,
            };
            x += w;
        }
        free.y += row_height;
        free.height -= row_height;
    }
    free.width = free.width.max(0.0);
    free.height = free.height.max(0.0);
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-6;

    fn overlap(a: &Rect, b: &Rect) -> f64 {
        let w = (a.x + a.width).min(b.x + b.width) - a.x.max(b.x);
        let h = (a.y + a.height).min(b.y + b.height) - a.y.max(b.y);
        if w > 0.0 && h > 0.0 {
            w * h
        } else {
            0.0
        }
    }

    #[test]
    fn test_rectangles_tile_the_area() {
        let values = [5511.0, 3679.0, 2095.0, 1506.0, 1477.0, 1393.0, 700.0];
        let rects = layout_treemap(&values, 800.0, 500.0);
        let total: f64 = values.iter().sum();

        let covered: f64 = rects.iter().map(Rect::area).sum();
        assert!((covered - 800.0 * 500.0).abs() < 1e-3);

        for (value, rect) in values.iter().zip(&rects) {
            let expected = value / total * 800.0 * 500.0;
            assert!((rect.area() - expected).abs() < 1e-3);
            assert!(rect.x >= -EPS && rect.y >= -EPS);
            assert!(rect.x + rect.width <= 800.0 + EPS);
            assert!(rect.y + rect.height <= 500.0 + EPS);
        }

        for i in 0..rects.len() {
            for j in (i + 1)..rects.len() {
                assert!(overlap(&rects[i], &rects[j]) < 1e-6, "{} overlaps {}", i, j);
            }
        }
    }

    #[test]
    fn test_largest_value_is_placed_first() {
        let rects = layout_treemap(&[1.0, 10.0], 100.0, 50.0);
        assert_eq!(rects[1].x, 0.0);
        assert_eq!(rects[1].y, 0.0);
    }

    #[test]
    fn test_non_positive_values_get_empty_rects() {
        let rects = layout_treemap(&[0.0, 4.0, -2.0], 10.0, 10.0);
        assert_eq!(rects[0].area(), 0.0);
        assert_eq!(rects[2].area(), 0.0);
        assert!((rects[1].area() - 100.0).abs() < EPS);

        assert!(layout_treemap(&[0.0, 0.0], 10.0, 10.0)
            .iter()
            .all(|r| r.area() == 0.0));
    }
}
