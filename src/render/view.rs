use crate::chart::{render_chart, Chart, ChartSpec};
use crate::domain::model::Indicator;
use crate::domain::section::Section;
use crate::domain::table::Table;
use crate::geo::MapSpec;
use crate::utils::error::Result;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CalloutKind {
    Info,
    Success,
    Warning,
    Error,
}

/// 區塊依序排列，由 HTML 輸出決定外觀
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Subheader { text: String },
    Table { table: Table },
    Chart { chart: Chart },
    /// 指標卡，外層是欄、內層是同一欄由上而下的卡片
    Metrics { columns: Vec<Vec<Indicator>> },
    Bullets { items: Vec<String> },
    Paragraph { text: String },
    Callout { kind: CalloutKind, text: String },
    Map { map: MapSpec },
    Divider,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionView {
    pub section: Section,
    pub header: String,
    pub blocks: Vec<Block>,
}

impl SectionView {
    pub fn new(section: Section, header: &str) -> Self {
        Self {
            section,
            header: header.to_string(),
            blocks: Vec::new(),
        }
    }

    pub fn subheader(&mut self, text: &str) -> &mut Self {
        self.blocks.push(Block::Subheader {
            text: text.to_string(),
        });
        self
    }

    pub fn table(&mut self, table: Table) -> &mut Self {
        self.blocks.push(Block::Table { table });
        self
    }

    pub fn chart(&mut self, table: &Table, spec: &ChartSpec) -> Result<&mut Self> {
        let chart = render_chart(table, spec)?;
        self.blocks.push(Block::Chart { chart });
        Ok(self)
    }

    /// 單欄指標卡
    pub fn metrics(&mut self, metrics: Vec<Indicator>) -> &mut Self {
        self.blocks.push(Block::Metrics {
            columns: metrics.into_iter().map(|m| vec![m]).collect(),
        });
        self
    }

    pub fn metric_columns(&mut self, columns: Vec<Vec<Indicator>>) -> &mut Self {
        self.blocks.push(Block::Metrics { columns });
        self
    }

    pub fn bullets<I, S>(&mut self, items: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.blocks.push(Block::Bullets {
            items: items.into_iter().map(Into::into).collect(),
        });
        self
    }

    pub fn paragraph(&mut self, text: impl Into<String>) -> &mut Self {
        self.blocks.push(Block::Paragraph { text: text.into() });
        self
    }

    pub fn callout(&mut self, kind: CalloutKind, text: impl Into<String>) -> &mut Self {
        self.blocks.push(Block::Callout {
            kind,
            text: text.into(),
        });
        self
    }

    pub fn map(&mut self, map: MapSpec) -> &mut Self {
        self.blocks.push(Block::Map { map });
        self
    }

    pub fn divider(&mut self) -> &mut Self {
        self.blocks.push(Block::Divider);
        self
    }

    pub fn charts(&self) -> impl Iterator<Item = &Chart> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Chart { chart } => Some(chart),
            _ => None,
        })
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Table { table } => Some(table),
            _ => None,
        })
    }

    pub fn maps(&self) -> impl Iterator<Item = &MapSpec> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Map { map } => Some(map),
            _ => None,
        })
    }

    pub fn callouts(&self, kind: CalloutKind) -> Vec<&str> {
        self.blocks
            .iter()
            .filter_map(|b| match b {
                Block::Callout { kind: k, text } if *k == kind => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}
