pub mod palette;
pub mod spec;
pub mod treemap;

pub use spec::{
    render_chart, ArcEncoding, BarColor, BarEncoding, Chart, ChartKind, ChartSpec, Field,
    LineEncoding, PyramidEncoding, TreemapEncoding,
};
