use crate::chart::palette;
use crate::chart::treemap::layout_treemap;
use crate::domain::table::{Cell, Table};
use crate::utils::error::{DashError, Result};
use serde::Serialize;
use serde_json::{json, Map, Value};

pub const VEGA_LITE_SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v5.json";

/// 一個欄位在圖上的使用方式（標題、tooltip 格式）
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub title: Option<String>,
    pub format: Option<String>,
}

impl Field {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            title: None,
            format: None,
        }
    }

    pub fn titled(name: &str, title: &str) -> Self {
        Self::new(name).title(title)
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn format(mut self, format: &str) -> Self {
        self.format = Some(format.to_string());
        self
    }

    fn tooltip(&self, table: &Table) -> Value {
        let mut obj = Map::new();
        obj.insert("field".into(), json!(self.name));
        obj.insert("type".into(), json!(field_type(table, &self.name)));
        if let Some(title) = &self.title {
            obj.insert("title".into(), json!(title));
        }
        if let Some(format) = &self.format {
            obj.insert("format".into(), json!(format));
        }
        Value::Object(obj)
    }
}

impl From<&str> for Field {
    fn from(name: &str) -> Self {
        Field::new(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BarColor {
    Fixed(String),
    /// 依類別欄位上色，顏色取自固定色盤
    Category { field: String, legend: Option<String> },
    /// 值 > 0 用 positive，否則 negative
    Diverging { positive: String, negative: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarEncoding {
    pub horizontal: bool,
    pub category: Field,
    pub value: Field,
    pub color: BarColor,
    /// 分組長條（xOffset）
    pub offset: Option<String>,
    /// 水平長條依數值排序（`-x`）
    pub sort_by_value: bool,
    pub tooltip: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineEncoding {
    pub x: Field,
    pub y: Field,
    pub color: Option<String>,
    pub stroke: Option<String>,
    pub stroke_width: Option<f64>,
    pub log_domain: Option<(f64, f64)>,
    pub y_domain: Option<(f64, f64)>,
    pub legend_labels: Option<Vec<(String, String)>>,
    pub tooltip: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PyramidEncoding {
    pub category: String,
    pub left: Field,
    pub right: Field,
    pub left_color: String,
    pub right_color: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArcEncoding {
    pub theta: String,
    pub color: String,
    pub tooltip: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TreemapEncoding {
    pub label: String,
    pub value: Field,
    pub tooltip: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartKind {
    Bar(BarEncoding),
    Line(LineEncoding),
    Pyramid(PyramidEncoding),
    Arc(ArcEncoding),
    Treemap(TreemapEncoding),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub id: String,
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub kind: ChartKind,
}

impl ChartSpec {
    pub fn new(id: &str, title: &str, width: u32, height: u32, kind: ChartKind) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            width,
            height,
            kind,
        }
    }

    fn kind_name(&self) -> &'static str {
        match self.kind {
            ChartKind::Bar(_) => "bar",
            ChartKind::Line(_) => "line",
            ChartKind::Pyramid(_) => "pyramid",
            ChartKind::Arc(_) => "arc",
            ChartKind::Treemap(_) => "treemap",
        }
    }

    /// 所有編碼引用到的欄位
    fn referenced_columns(&self) -> Vec<&str> {
        let mut cols: Vec<&str> = Vec::new();
        match &self.kind {
            ChartKind::Bar(bar) => {
                cols.push(&bar.category.name);
                cols.push(&bar.value.name);
                if let BarColor::Category { field, .. } = &bar.color {
                    cols.push(field);
                }
                if let Some(offset) = &bar.offset {
                    cols.push(offset);
                }
                cols.extend(field_names(&bar.tooltip));
            }
            ChartKind::Line(line) => {
                cols.push(&line.x.name);
                cols.push(&line.y.name);
                if let Some(color) = &line.color {
                    cols.push(color);
                }
                cols.extend(field_names(&line.tooltip));
            }
            ChartKind::Pyramid(p) => {
                cols.push(&p.category);
                cols.push(&p.left.name);
                cols.push(&p.right.name);
            }
            ChartKind::Arc(arc) => {
                cols.push(&arc.theta);
                cols.push(&arc.color);
                cols.extend(field_names(&arc.tooltip));
            }
            ChartKind::Treemap(t) => {
                cols.push(&t.label);
                cols.push(&t.value.name);
                cols.extend(field_names(&t.tooltip));
            }
        }
        cols
    }
}

fn field_names(fields: &[Field]) -> impl Iterator<Item = &str> {
    fields.iter().map(|f| f.name.as_str())
}

/// 可直接交給 vega-embed 的圖表
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    pub id: String,
    pub title: String,
    pub kind: String,
    pub vega_lite: Value,
}

/// 數值欄位為 quantitative，其餘為 nominal
fn field_type(table: &Table, column: &str) -> &'static str {
    let idx = match table.column_index(column) {
        Some(idx) => idx,
        None => return "nominal",
    };
    let numeric = table
        .rows
        .iter()
        .filter_map(|r| r.get(idx))
        .filter(|c| !matches!(c, Cell::Missing))
        .all(|c| c.as_f64().is_some());
    if numeric && !table.is_empty() {
        "quantitative"
    } else {
        "nominal"
    }
}

fn axis_title(field: &Field) -> Value {
    json!(field.title.clone().unwrap_or_else(|| field.name.clone()))
}

fn tooltips(table: &Table, fields: &[Field]) -> Value {
    Value::Array(fields.iter().map(|f| f.tooltip(table)).collect())
}

/// 類別欄位依出現順序的相異值
fn distinct_labels(table: &Table, column: &str) -> Vec<String> {
    let mut labels: Vec<String> = Vec::new();
    if let Some(idx) = table.column_index(column) {
        for row in &table.rows {
            let label = row.get(idx).map(Cell::display).unwrap_or_default();
            if !labels.contains(&label) {
                labels.push(label);
            }
        }
    }
    labels
}

fn category_scale(table: &Table, column: &str) -> Value {
    let domain = distinct_labels(table, column);
    let range: Vec<&str> = domain.iter().map(|l| palette::category_color(l)).collect();
    json!({ "domain": domain, "range": range })
}

/// 每一列一個值，非數值視為 0，索引與 `to_records()` 對齊
fn column_values(table: &Table, column: &str) -> Vec<f64> {
    match table.column_index(column) {
        Some(idx) => table
            .rows
            .iter()
            .map(|r| r.get(idx).and_then(Cell::as_f64).unwrap_or(0.0))
            .collect(),
        None => Vec::new(),
    }
}

/// 把表格依規格轉成 Vega-Lite v5 JSON
pub fn render_chart(table: &Table, spec: &ChartSpec) -> Result<Chart> {
    for column in spec.referenced_columns() {
        if table.column_index(column).is_none() {
            return Err(DashError::ChartError {
                chart: spec.id.clone(),
                message: format!("column '{}' not found in table '{}'", column, table.id),
            });
        }
    }

    let body = match &spec.kind {
        ChartKind::Bar(bar) => bar_chart(table, bar),
        ChartKind::Line(line) => line_chart(table, line),
        ChartKind::Pyramid(pyramid) => pyramid_chart(table, pyramid),
        ChartKind::Arc(arc) => arc_chart(table, arc),
        ChartKind::Treemap(treemap) => {
            treemap_chart(table, treemap, spec.width as f64, spec.height as f64)
        }
    };

    let mut vega_lite = Map::new();
    vega_lite.insert("$schema".into(), json!(VEGA_LITE_SCHEMA));
    vega_lite.insert("title".into(), json!(spec.title));
    vega_lite.insert("width".into(), json!(spec.width));
    vega_lite.insert("height".into(), json!(spec.height));
    if let Value::Object(fields) = body {
        vega_lite.extend(fields);
    }

    tracing::debug!("Rendered {} chart '{}'", spec.kind_name(), spec.id);

    Ok(Chart {
        id: spec.id.clone(),
        title: spec.title.clone(),
        kind: spec.kind_name().to_string(),
        vega_lite: Value::Object(vega_lite),
    })
}

fn bar_chart(table: &Table, bar: &BarEncoding) -> Value {
    let category_type = "nominal";
    let mut category = json!({
        "field": bar.category.name,
        "type": category_type,
        "title": axis_title(&bar.category),
    });
    let value = json!({
        "field": bar.value.name,
        "type": "quantitative",
        "title": axis_title(&bar.value),
    });

    if bar.horizontal && bar.sort_by_value {
        category["sort"] = json!("-x");
    } else {
        category["sort"] = Value::Null;
    }

    let mut encoding = Map::new();
    if bar.horizontal {
        encoding.insert("x".into(), value);
        encoding.insert("y".into(), category);
    } else {
        encoding.insert("x".into(), category);
        encoding.insert("y".into(), value);
    }

    let mut mark = json!({ "type": "bar" });
    match &bar.color {
        BarColor::Fixed(color) => {
            mark["color"] = json!(color);
        }
        BarColor::Category { field, legend } => {
            let mut color = json!({
                "field": field,
                "type": "nominal",
                "scale": category_scale(table, field),
            });
            if let Some(title) = legend {
                color["legend"] = json!({ "title": title });
            }
            encoding.insert("color".into(), color);
        }
        BarColor::Diverging { positive, negative } => {
            encoding.insert(
                "color".into(),
                json!({
                    "condition": {
                        "test": format!("datum['{}'] > 0", bar.value.name),
                        "value": positive,
                    },
                    "value": negative,
                }),
            );
        }
    }

    if let Some(offset) = &bar.offset {
        let channel = if bar.horizontal { "yOffset" } else { "xOffset" };
        encoding.insert(channel.into(), json!({ "field": offset, "type": "nominal" }));
    }
    if !bar.tooltip.is_empty() {
        encoding.insert("tooltip".into(), tooltips(table, &bar.tooltip));
    }

    json!({
        "data": { "values": table.to_records() },
        "mark": mark,
        "encoding": encoding,
    })
}

fn line_chart(table: &Table, line: &LineEncoding) -> Value {
    let mut y = json!({
        "field": line.y.name,
        "type": "quantitative",
        "title": axis_title(&line.y),
    });
    if let Some((lo, hi)) = line.log_domain {
        y["scale"] = json!({ "type": "log", "domain": [lo, hi] });
    } else if let Some((lo, hi)) = line.y_domain {
        y["scale"] = json!({ "domain": [lo, hi] });
    }

    let mut encoding = Map::new();
    encoding.insert(
        "x".into(),
        json!({
            "field": line.x.name,
            "type": "nominal",
            "title": axis_title(&line.x),
            "sort": null,
        }),
    );
    encoding.insert("y".into(), y);

    if let Some(color_field) = &line.color {
        let mut color = json!({
            "field": color_field,
            "type": "nominal",
            "scale": category_scale(table, color_field),
        });
        if let Some(labels) = &line.legend_labels {
            // "Hombres" -> "mxH" 之類的圖例別名
            let expr = labels
                .iter()
                .map(|(from, to)| format!("datum.label == '{}' ? '{}'", from, to))
                .collect::<Vec<_>>()
                .join(" : ");
            color["legend"] = json!({ "title": null, "labelExpr": format!("{} : datum.label", expr) });
        }
        encoding.insert("color".into(), color);
    }
    if !line.tooltip.is_empty() {
        encoding.insert("tooltip".into(), tooltips(table, &line.tooltip));
    }

    let mut mark = json!({ "type": "line", "point": true });
    if let Some(stroke) = &line.stroke {
        mark["color"] = json!(stroke);
    }
    if let Some(width) = line.stroke_width {
        mark["strokeWidth"] = json!(width);
    }

    json!({
        "data": { "values": table.to_records() },
        "mark": mark,
        "encoding": encoding,
        "config": { "axis": { "gridOpacity": 0.3 } },
    })
}

/// 人口金字塔的共用 x 範圍：左右各取最大值 × 1.1
pub fn pyramid_domain(table: &Table, pyramid: &PyramidEncoding) -> (f64, f64) {
    let max_of = |column: &str| {
        column_values(table, column)
            .into_iter()
            .fold(0.0_f64, f64::max)
    };
    (
        -max_of(&pyramid.left.name) * 1.1,
        max_of(&pyramid.right.name) * 1.1,
    )
}

fn pyramid_chart(table: &Table, pyramid: &PyramidEncoding) -> Value {
    let negated = format!("{} (neg)", pyramid.left.name);
    let left_idx = table.column_index(&pyramid.left.name);
    let data = table.clone().with_column(&negated, |row| {
        left_idx
            .and_then(|i| row.get(i))
            .and_then(Cell::as_f64)
            .map(|v| Cell::Float(-v))
            .unwrap_or(Cell::Missing)
    });

    let (lo, hi) = pyramid_domain(table, pyramid);
    // 年長組在上
    let mut order = distinct_labels(table, &pyramid.category);
    order.reverse();

    let y = json!({ "field": pyramid.category, "type": "ordinal", "sort": order, "title": pyramid.category });
    let side = |field: &str, title: Value, color: &str, tooltip_field: &Field| {
        json!({
            "mark": { "type": "bar", "color": color },
            "encoding": {
                "x": {
                    "field": field,
                    "type": "quantitative",
                    "scale": { "domain": [lo, hi] },
                    "title": title,
                },
                "y": y,
                "tooltip": [
                    { "field": pyramid.category, "type": "ordinal" },
                    tooltip_field.tooltip(table),
                ],
            },
        })
    };

    json!({
        "data": { "values": data.to_records() },
        "layer": [
            side(&negated, axis_title(&pyramid.left), &pyramid.left_color, &pyramid.left),
            side(&pyramid.right.name, axis_title(&pyramid.right), &pyramid.right_color, &pyramid.right),
        ],
        "config": {
            "title": { "fontSize": 16, "anchor": "middle" },
            "axis": { "labelFontSize": 12, "titleFontSize": 14 },
        },
    })
}

fn arc_chart(table: &Table, arc: &ArcEncoding) -> Value {
    let mut encoding = json!({
        "theta": { "field": arc.theta, "type": "quantitative" },
        "color": {
            "field": arc.color,
            "type": "nominal",
            "scale": category_scale(table, &arc.color),
        },
    });
    if !arc.tooltip.is_empty() {
        encoding["tooltip"] = tooltips(table, &arc.tooltip);
    }
    json!({
        "data": { "values": table.to_records() },
        "mark": { "type": "arc" },
        "encoding": encoding,
    })
}

fn treemap_chart(table: &Table, treemap: &TreemapEncoding, width: f64, height: f64) -> Value {
    let values = column_values(table, &treemap.value.name);
    let rects = layout_treemap(&values, width, height);

    let mut records = table.to_records();
    for (record, rect) in records.iter_mut().zip(&rects) {
        if let Value::Object(obj) = record {
            let (cx, cy) = rect.center();
            obj.insert("_x".into(), json!(rect.x));
            obj.insert("_x2".into(), json!(rect.x + rect.width));
            obj.insert("_y".into(), json!(rect.y));
            obj.insert("_y2".into(), json!(rect.y + rect.height));
            obj.insert("_cx".into(), json!(cx));
            obj.insert("_cy".into(), json!(cy));
        }
    }

    let x_scale = json!({ "domain": [0.0, width] });
    let y_scale = json!({ "domain": [0.0, height], "reverse": true });

    json!({
        "data": { "values": records },
        "layer": [
            {
                "mark": { "type": "rect", "stroke": "white" },
                "encoding": {
                    "x": { "field": "_x", "type": "quantitative", "axis": null, "scale": x_scale },
                    "x2": { "field": "_x2" },
                    "y": { "field": "_y", "type": "quantitative", "axis": null, "scale": y_scale },
                    "y2": { "field": "_y2" },
                    "color": {
                        "field": treemap.value.name,
                        "type": "quantitative",
                        "scale": { "scheme": "reds" },
                        "legend": { "title": axis_title(&treemap.value) },
                    },
                    "tooltip": tooltips(table, &treemap.tooltip),
                },
            },
            {
                "mark": {
                    "type": "text",
                    "align": "center",
                    "baseline": "middle",
                    "fontSize": 10,
                    "fontWeight": "bold",
                    "color": "white",
                },
                "encoding": {
                    "x": { "field": "_cx", "type": "quantitative", "axis": null, "scale": x_scale },
                    "y": { "field": "_cy", "type": "quantitative", "axis": null, "scale": y_scale },
                    "text": { "field": treemap.label, "type": "nominal" },
                },
            },
        ],
    })
}
