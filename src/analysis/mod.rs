//! 衍生指標：百分比、年齡組加總、排名。

pub mod buckets;
pub mod ranking;
pub mod shares;

pub use buckets::{bucket_sums, AgeBuckets, BucketSums};
pub use ranking::{arg_max_by, arg_min_by, count_where, top_n_by, Order};
pub use shares::{population_shares, settlement_shares, share, ShareRow};
