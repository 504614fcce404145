use crate::utils::error::{DashError, Result};
use crate::utils::format;
use serde::Serialize;
use serde_json::{Map, Value};

/// 表格中的單一儲存格
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Int(i64),
    Float(f64),
    Text(String),
    Missing,
}

impl Cell {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Int(v) => Some(*v as f64),
            Cell::Float(v) => Some(*v),
            Cell::Text(_) | Cell::Missing => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Cell::Int(v) => Value::from(*v),
            Cell::Float(v) => serde_json::Number::from_f64(*v)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Cell::Text(s) => Value::String(s.clone()),
            Cell::Missing => Value::Null,
        }
    }

    /// HTML 表格中的顯示文字
    pub fn display(&self) -> String {
        match self {
            Cell::Int(v) => format::thousands(*v),
            Cell::Float(v) => v.to_string(),
            Cell::Text(s) => s.clone(),
            Cell::Missing => "-".to_string(),
        }
    }

    /// CSV 輸出不加千分位
    fn raw(&self) -> String {
        match self {
            Cell::Int(v) => v.to_string(),
            Cell::Float(v) => v.to_string(),
            Cell::Text(s) => s.clone(),
            Cell::Missing => String::new(),
        }
    }
}

impl From<i64> for Cell {
    fn from(v: i64) -> Self {
        Cell::Int(v)
    }
}

impl From<f64> for Cell {
    fn from(v: f64) -> Self {
        Cell::Float(v)
    }
}

impl From<&str> for Cell {
    fn from(v: &str) -> Self {
        Cell::Text(v.to_string())
    }
}

impl From<String> for Cell {
    fn from(v: String) -> Self {
        Cell::Text(v)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Cell::Missing)
    }
}

/// 欄位具名的小型表格，所有圖表與輸出都以它為輸入
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub id: String,
    pub title: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

static MISSING: Cell = Cell::Missing;

/// 越界的儲存格視為缺值
fn cell_at(row: &[Cell], idx: usize) -> &Cell {
    row.get(idx).unwrap_or(&MISSING)
}

impl Table {
    pub fn new(id: impl Into<String>, title: impl Into<String>, columns: &[&str]) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// 寬度不符的列補 `Missing` 或截斷，表格永遠保持矩形
    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        if row.len() != self.columns.len() {
            tracing::warn!(
                "⚠️ Row width {} does not match {} columns in '{}'",
                row.len(),
                self.columns.len(),
                self.id
            );
            row.resize(self.columns.len(), Cell::Missing);
        }
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name).ok_or_else(|| DashError::ProcessingError {
            message: format!("table '{}' has no column '{}'", self.id, name),
        })
    }

    pub fn cell(&self, row: usize, column: &str) -> Option<&Cell> {
        let idx = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(idx))
    }

    /// 只保留符合條件的列（例如去掉 "Total" 彙總列）
    pub fn filter_rows<F>(&self, mut keep: F) -> Table
    where
        F: FnMut(&[Cell]) -> bool,
    {
        Table {
            id: self.id.clone(),
            title: self.title.clone(),
            columns: self.columns.clone(),
            rows: self.rows.iter().filter(|r| keep(r)).cloned().collect(),
        }
    }

    /// 去掉第一欄等於 `label` 的列
    pub fn without_label(&self, label: &str) -> Table {
        self.filter_rows(|row| row.first().and_then(Cell::as_str) != Some(label))
    }

    pub fn select(&self, columns: &[&str]) -> Result<Table> {
        let indices = columns
            .iter()
            .map(|c| self.require_column(c))
            .collect::<Result<Vec<_>>>()?;
        Ok(Table {
            id: self.id.clone(),
            title: self.title.clone(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: self
                .rows
                .iter()
                .map(|r| indices.iter().map(|&i| cell_at(r, i).clone()).collect())
                .collect(),
        })
    }

    /// 新增衍生欄位
    pub fn with_column<F>(mut self, name: &str, mut derive: F) -> Table
    where
        F: FnMut(&[Cell]) -> Cell,
    {
        for row in &mut self.rows {
            let value = derive(row);
            row.push(value);
        }
        self.columns.push(name.to_string());
        self
    }

    /// 寬表轉長表：保留 `id_columns`，其餘欄位展開成 (var_name, value_name)
    pub fn melt(&self, id_columns: &[&str], var_name: &str, value_name: &str) -> Result<Table> {
        let id_indices = id_columns
            .iter()
            .map(|c| self.require_column(c))
            .collect::<Result<Vec<_>>>()?;
        let value_indices: Vec<usize> = (0..self.columns.len())
            .filter(|i| !id_indices.contains(i))
            .collect();

        let mut columns: Vec<&str> = id_columns.to_vec();
        columns.push(var_name);
        columns.push(value_name);
        let mut long = Table::new(self.id.clone(), self.title.clone(), &columns);

        // pandas.melt 的順序：先依欄位，再依列
        for &vi in &value_indices {
            for row in &self.rows {
                let mut out: Vec<Cell> = id_indices.iter().map(|&i| cell_at(row, i).clone()).collect();
                out.push(Cell::Text(self.columns[vi].clone()));
                out.push(cell_at(row, vi).clone());
                long.push_row(out);
            }
        }
        Ok(long)
    }

    /// 轉成 Vega-Lite `data.values` 需要的物件陣列
    pub fn to_records(&self) -> Vec<Value> {
        self.rows
            .iter()
            .map(|row| {
                let mut obj = Map::new();
                for (name, cell) in self.columns.iter().zip(row) {
                    obj.insert(name.clone(), cell.to_json());
                }
                Value::Object(obj)
            })
            .collect()
    }

    pub fn to_csv(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&self.columns)?;
        for row in &self.rows {
            writer.write_record(row.iter().map(Cell::raw))?;
        }
        let bytes = writer.into_inner().map_err(|e| DashError::ProcessingError {
            message: format!("failed to flush CSV for '{}': {}", self.id, e),
        })?;
        String::from_utf8(bytes).map_err(|e| DashError::ProcessingError {
            message: format!("CSV for '{}' is not UTF-8: {}", self.id, e),
        })
    }
}
