use crate::chart::Chart;
use crate::domain::model::Indicator;
use crate::domain::section::Section;
use crate::domain::table::{Cell, Table};
use crate::geo::MapSpec;
use crate::render::view::{Block, CalloutKind, SectionView};
use crate::render::RenderedDashboard;
use crate::utils::format::{escape_html, fixed};
use serde_json::{json, Value};
use std::fmt::Write;

/// 頁面外部資源與頁首文字
#[derive(Debug, Clone, PartialEq)]
pub struct HtmlOptions {
    pub subtitle: String,
    pub sidebar_title: String,
    pub vega_js: String,
    pub vega_lite_js: String,
    pub vega_embed_js: String,
    pub leaflet_css: String,
    pub leaflet_js: String,
    pub show_footer: bool,
}

impl Default for HtmlOptions {
    fn default() -> Self {
        Self {
            subtitle: "Indicadores de Mortalidad y Fecundidad (2023) y Migración (2018)".to_string(),
            sidebar_title: "🧭 Navegación".to_string(),
            vega_js: "https://cdn.jsdelivr.net/npm/vega@5".to_string(),
            vega_lite_js: "https://cdn.jsdelivr.net/npm/vega-lite@5".to_string(),
            vega_embed_js: "https://cdn.jsdelivr.net/npm/vega-embed@6".to_string(),
            leaflet_css: "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css".to_string(),
            leaflet_js: "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js".to_string(),
            show_footer: true,
        }
    }
}

const STYLE: &str = r#"
body { margin: 0; font-family: "Source Sans Pro", Arial, sans-serif; color: #262730; display: flex; }
nav { width: 260px; min-height: 100vh; background: #f0f2f6; padding: 1.5rem 1rem; box-sizing: border-box; position: sticky; top: 0; }
nav label { display: block; margin: 0.5rem 0; cursor: pointer; }
main { flex: 1; padding: 2rem 3rem; max-width: 1100px; }
hr { border: none; border-top: 1px solid #e6e6e6; margin: 1.5rem 0; }
table { border-collapse: collapse; margin: 0.75rem 0; font-size: 0.9rem; }
th, td { border: 1px solid #e6e6e6; padding: 0.3rem 0.6rem; }
th { background: #fafafa; text-align: left; }
td.num { text-align: right; font-variant-numeric: tabular-nums; }
.metrics { display: flex; gap: 1rem; margin: 0.75rem 0; }
.metrics .column { flex: 1; }
.metric { padding: 0.5rem 0; }
.metric .label { font-size: 0.85rem; color: #555; }
.metric .value { font-size: 1.8rem; }
.callout { padding: 0.75rem 1rem; border-radius: 0.4rem; margin: 0.75rem 0; }
.callout.info { background: #e8f0fe; color: #0b3d91; }
.callout.success { background: #e6f4ea; color: #1e6b34; }
.callout.warning { background: #fff8e1; color: #7a5b00; }
.callout.error { background: #fdecea; color: #8a1c1c; }
.map { margin: 0.75rem 0; }
.legend span { display: inline-block; width: 1rem; height: 0.8rem; margin-right: 0.3rem; }
footer { color: #888; font-size: 0.8rem; margin-top: 3rem; }
"#;

const SCRIPT: &str = r#"
function showSection(slug) {
  document.querySelectorAll("section[data-section]").forEach(function (s) {
    s.style.display = s.dataset.section === slug ? "block" : "none";
  });
  (window.dashboardMaps[slug] || []).forEach(function (m) { m.invalidateSize(); });
}
document.querySelectorAll("input[name=section]").forEach(function (input) {
  input.addEventListener("change", function () { showSection(input.value); });
});
"#;

/// `**粗體**` 轉成 `<strong>`；其餘文字一律跳脫
fn inline_markup(text: &str) -> String {
    let mut out = String::new();
    for (i, part) in text.split("**").enumerate() {
        let escaped = escape_html(part).replace('\n', "<br>");
        if i % 2 == 1 {
            let _ = write!(out, "<strong>{}</strong>", escaped);
        } else {
            out.push_str(&escaped);
        }
    }
    out
}

/// 嵌入 `<script>` 的 JSON 不能出現 `</`
fn script_json(value: &Value) -> String {
    value.to_string().replace("</", "<\\/")
}

fn tile_layer(name: &str) -> (&'static str, &'static str) {
    match name {
        "CartoDB positron" => (
            "https://{s}.basemaps.cartocdn.com/light_all/{z}/{x}/{y}{r}.png",
            "&copy; OpenStreetMap contributors &copy; CARTO",
        ),
        _ => (
            "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png",
            "&copy; OpenStreetMap contributors",
        ),
    }
}

fn write_table(out: &mut String, table: &Table) {
    let _ = write!(out, "<table id=\"table-{}\"><thead><tr>", escape_html(&table.id));
    for column in &table.columns {
        let _ = write!(out, "<th>{}</th>", escape_html(column));
    }
    out.push_str("</tr></thead><tbody>");
    for row in &table.rows {
        out.push_str("<tr>");
        for cell in row {
            let class = match cell {
                Cell::Int(_) | Cell::Float(_) => " class=\"num\"",
                Cell::Text(_) | Cell::Missing => "",
            };
            let _ = write!(out, "<td{}>{}</td>", class, escape_html(&cell.display()));
        }
        out.push_str("</tr>");
    }
    out.push_str("</tbody></table>\n");
}

fn write_metrics(out: &mut String, columns: &[Vec<Indicator>]) {
    out.push_str("<div class=\"metrics\">");
    for column in columns {
        out.push_str("<div class=\"column\">");
        for metric in column {
            let title = metric
                .help
                .as_deref()
                .map(|h| format!(" title=\"{}\"", escape_html(h)))
                .unwrap_or_default();
            let _ = write!(
                out,
                "<div class=\"metric\"{}><div class=\"label\">{}</div><div class=\"value\">{}</div></div>",
                title,
                escape_html(&metric.label),
                escape_html(&metric.value)
            );
        }
        out.push_str("</div>");
    }
    out.push_str("</div>\n");
}

fn write_chart(out: &mut String, scripts: &mut String, element_id: &str, chart: &Chart) {
    let _ = writeln!(out, "<div class=\"chart\" id=\"{}\"></div>", element_id);
    let _ = writeln!(
        scripts,
        "vegaEmbed(\"#{}\", {}, {{\"actions\": false}});",
        element_id,
        script_json(&chart.vega_lite)
    );
}

fn write_map(out: &mut String, scripts: &mut String, slug: &str, element_id: &str, map: &MapSpec) {
    let _ = write!(
        out,
        "<div class=\"map\"><p><strong>{}</strong></p><div id=\"{}\" style=\"width:{}px;height:{}px\"></div><div class=\"legend\">{}: ",
        escape_html(&map.title),
        element_id,
        map.view.width,
        map.view.height,
        escape_html(&map.legend)
    );
    for class in &map.classes {
        let _ = write!(
            out,
            "<span style=\"background:{}\"></span>{} – {} ",
            escape_html(&class.color),
            fixed(class.from, 2),
            fixed(class.to, 2)
        );
    }
    out.push_str("</div></div>\n");

    let (tiles, attribution) = tile_layer(&map.view.tiles);
    let markers: Vec<Value> = map
        .markers
        .iter()
        .map(|m| json!({ "lat": m.lat, "lon": m.lon, "popup": m.popup, "color": m.color }))
        .collect();
    let config = json!({
        "center": map.view.center,
        "zoom": map.view.zoom,
        "tiles": tiles,
        "attribution": attribution,
        "base": map.base,
        "choropleth": map.choropleth,
        "markers": markers,
    });
    let _ = writeln!(
        scripts,
        "addMap(\"{}\", \"{}\", {});",
        slug,
        element_id,
        script_json(&config)
    );
}

fn write_section(out: &mut String, scripts: &mut String, view: &SectionView, visible: bool) {
    let slug = view.section.slug();
    let _ = writeln!(
        out,
        "<section data-section=\"{}\" style=\"display:{}\">",
        slug,
        if visible { "block" } else { "none" }
    );
    let _ = writeln!(out, "<h2>{}</h2>", escape_html(&view.header));

    let mut charts = 0;
    let mut maps = 0;
    for block in &view.blocks {
        match block {
            Block::Subheader { text } => {
                let _ = writeln!(out, "<h3>{}</h3>", escape_html(text));
            }
            Block::Table { table } => write_table(out, table),
            Block::Chart { chart } => {
                charts += 1;
                write_chart(out, scripts, &format!("chart-{}-{}", slug, charts), chart);
            }
            Block::Metrics { columns } => write_metrics(out, columns),
            Block::Bullets { items } => {
                out.push_str("<ul>");
                for item in items {
                    let _ = write!(out, "<li>{}</li>", inline_markup(item));
                }
                out.push_str("</ul>\n");
            }
            Block::Paragraph { text } => {
                let _ = writeln!(out, "<p>{}</p>", inline_markup(text));
            }
            Block::Callout { kind, text } => {
                let class = match kind {
                    CalloutKind::Info => "info",
                    CalloutKind::Success => "success",
                    CalloutKind::Warning => "warning",
                    CalloutKind::Error => "error",
                };
                let _ = writeln!(
                    out,
                    "<div class=\"callout {}\">{}</div>",
                    class,
                    inline_markup(text)
                );
            }
            Block::Map { map } => {
                maps += 1;
                write_map(out, scripts, slug, &format!("map-{}-{}", slug, maps), map);
            }
            Block::Divider => out.push_str("<hr>\n"),
        }
    }
    out.push_str("</section>\n");
}

const MAP_HELPER: &str = r#"
window.dashboardMaps = {};
function addMap(slug, id, cfg) {
  var m = L.map(id).setView(cfg.center, cfg.zoom);
  L.tileLayer(cfg.tiles, { attribution: cfg.attribution }).addTo(m);
  var style = function (f) { return f.properties.style; };
  L.geoJSON(cfg.base, { style: style }).addTo(m);
  L.geoJSON(cfg.choropleth, {
    style: style,
    onEachFeature: function (f, layer) { layer.bindTooltip(f.properties.name); }
  }).addTo(m);
  cfg.markers.forEach(function (mk) {
    L.circleMarker([mk.lat, mk.lon], { radius: 5, color: mk.color, fillOpacity: 0.7 })
      .bindPopup(mk.popup).addTo(m);
  });
  (window.dashboardMaps[slug] = window.dashboardMaps[slug] || []).push(m);
}
"#;

/// 輸出單一自足的 HTML 頁面；相同輸入產生相同輸出
pub fn render_html(dashboard: &RenderedDashboard, options: &HtmlOptions) -> String {
    let mut body = String::new();
    let mut scripts = String::new();

    let _ = writeln!(body, "<nav><h2>{}</h2>", escape_html(&options.sidebar_title));
    body.push_str("<p>Selecciona una sección:</p>\n");
    for view in &dashboard.sections {
        let section: Section = view.section;
        let _ = writeln!(
            body,
            "<label><input type=\"radio\" name=\"section\" value=\"{}\"{}> {}</label>",
            section.slug(),
            if section == dashboard.selected { " checked" } else { "" },
            escape_html(section.label())
        );
    }
    body.push_str("</nav>\n<main>\n");
    let _ = writeln!(body, "<h1>{}</h1>", escape_html(&dashboard.title));
    let _ = writeln!(body, "<h3>{}</h3>\n<hr>", escape_html(&options.subtitle));

    for view in &dashboard.sections {
        write_section(&mut body, &mut scripts, view, view.section == dashboard.selected);
    }

    if options.show_footer {
        let _ = writeln!(
            body,
            "<footer>Generado el {}</footer>",
            dashboard.generated_at.format("%Y-%m-%d %H:%M")
        );
    }
    body.push_str("</main>\n");

    let mut html = String::new();
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html lang=\"es\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n\
         <link rel=\"stylesheet\" href=\"{}\">\n\
         <script src=\"{}\"></script>\n<script src=\"{}\"></script>\n<script src=\"{}\"></script>\n<script src=\"{}\"></script>\n\
         <style>{}</style>\n</head>\n<body>\n{}",
        escape_html(&dashboard.title),
        escape_html(&options.leaflet_css),
        escape_html(&options.vega_js),
        escape_html(&options.vega_lite_js),
        escape_html(&options.vega_embed_js),
        escape_html(&options.leaflet_js),
        STYLE,
        body
    );
    let _ = write!(
        html,
        "<script>{}{}{}showSection(\"{}\");\n</script>\n</body>\n</html>\n",
        MAP_HELPER,
        SCRIPT,
        scripts,
        dashboard.selected.slug()
    );
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};

    fn dashboard(sections: Vec<SectionView>, selected: Section) -> RenderedDashboard {
        RenderedDashboard {
            title: "Análisis <Antioquia>".to_string(),
            sections,
            selected,
            generated_at: Local.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_inline_markup() {
        assert_eq!(
            inline_markup("TNR = **0,511** & <b>"),
            "TNR = <strong>0,511</strong> &amp; &lt;b&gt;"
        );
        assert_eq!(inline_markup("a\n- b"), "a<br>- b");
    }

    #[test]
    fn test_user_text_is_escaped() {
        let mut view = SectionView::new(Section::Population, "Población");
        view.paragraph("<script>alert(1)</script>");
        let mut table = Table::new("t", "T", &["Edad"]);
        table.push_row(vec!["<0 & 1>".into()]);
        view.table(table);

        let html = render_html(&dashboard(vec![view], Section::Population), &HtmlOptions::default());
        assert!(!html.contains("<script>alert(1)"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(html.contains("<td>&lt;0 &amp; 1&gt;</td>"));
        assert!(html.contains("<h1>Análisis &lt;Antioquia&gt;</h1>"));
        assert!(html.contains("Generado el 2024-05-01 09:30"));
    }

    #[test]
    fn test_selected_section_is_initially_visible() {
        let views = Section::ALL
            .iter()
            .map(|s| SectionView::new(*s, s.label()))
            .collect();
        let html = render_html(&dashboard(views, Section::Fertility), &HtmlOptions::default());

        for section in Section::ALL {
            assert!(html.contains(&format!("data-section=\"{}\"", section.slug())));
        }
        assert!(html.contains("value=\"fecundidad\" checked"));
        assert!(html.contains("<section data-section=\"fecundidad\" style=\"display:block\">"));
        assert!(html.contains("<section data-section=\"poblacion\" style=\"display:none\">"));
        assert!(html.contains("showSection(\"fecundidad\");"));
    }

    #[test]
    fn test_map_script_has_no_raw_boundary_markup() {
        use crate::domain::model::PolygonRecord;
        use crate::geo::{choropleth, join, ChoroplethSpec, DuplicatePolicy, MapView};

        let name = "BELLO<img src=x onerror=alert(1)>";
        let polygons = vec![PolygonRecord {
            name: name.to_string(),
            geometry: json!({ "type": "Point", "coordinates": [-75.55, 6.33] }),
            properties: serde_json::Map::new(),
            centroid: Some((6.33, -75.55)),
        }];
        let rows = vec![(name, 7.57)];
        let joined = join(&polygons, &rows, |r| r.0, DuplicatePolicy::Reject).unwrap();
        let spec = ChoroplethSpec::new("mapa_tasa", "Mapa 1", "Tasa").popup("Tasa", " por mil");
        let map = choropleth(&joined, &spec, &MapView::default(), |r| r.1, |r| r.0);

        let mut view = SectionView::new(Section::Migration, "Migración");
        view.map(map);
        let html = render_html(&dashboard(vec![view], Section::Migration), &HtmlOptions::default());

        assert!(html.contains("addMap(\"migracion\""));
        assert!(!html.contains("<img"));
        assert!(html.contains("BELLO&lt;img src=x onerror=alert(1)&gt;"));
    }

    #[test]
    fn test_script_json_cannot_close_script_tag() {
        let value = json!({ "title": "</script>" });
        assert_eq!(script_json(&value), r#"{"title":"<\/script>"}"#);
    }
}
