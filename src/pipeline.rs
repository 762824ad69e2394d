//! The join/aggregate pipeline: rainfall readings → gauge channel → quadrant,
//! then one summed rainfall total per (quadrant, year).
//!
//! Every function is a pure `LazyFrame → LazyFrame` transformation; nothing
//! here touches the network or the filesystem, and nothing executes until the
//! caller collects.

use polars::prelude::*;

/// First year of usable data. Rainfall records exist for 1988 and 1989 but
/// are incomplete, so the pipeline discards them outright.
pub const YEAR_MIN: i32 = 1990;
/// Last year covered by the readings feed.
pub const YEAR_MAX: i32 = 2021;

const EXCLUDED_YEARS: [i32; 2] = [1988, 1989];

/// Coerces the raw readings feed: Socrata serves every value as a string, so
/// `channel` becomes an integer id, `rainfall` millimeters as floats, and
/// `year` an integer. Casts are strict; a malformed record aborts the collect.
pub fn normalize_readings(readings: LazyFrame) -> LazyFrame {
    readings.with_columns([
        col("channel").strict_cast(DataType::Int64),
        col("rainfall").strict_cast(DataType::Float64),
        col("year").strict_cast(DataType::Int32),
    ])
}

/// Coerces the gauge feed's `channel` column to the same integer type as the
/// readings feed so the join key lines up.
pub fn normalize_gauges(gauges: LazyFrame) -> LazyFrame {
    gauges.with_columns([col("channel").strict_cast(DataType::Int64)])
}

/// Inner-joins readings to gauge locations on `channel`, keeps the columns
/// the aggregation needs, and drops the excluded years.
///
/// Readings whose channel has no gauge record are silently dropped, which is
/// exactly the inner-join contract. The gauge feed's own `name` column is
/// discarded in favor of the reading-side one.
pub fn join_on_channel(readings: LazyFrame, gauges: LazyFrame) -> LazyFrame {
    let mut keep = lit(true);
    for year in EXCLUDED_YEARS {
        keep = keep.and(col("year").neq(lit(year)));
    }

    readings
        .join(
            gauges,
            [col("channel")],
            [col("channel")],
            JoinArgs::new(JoinType::Inner),
        )
        .select([
            col("name"),
            col("year"),
            col("rainfall"),
            col("channel"),
            col("quadrant"),
        ])
        .filter(keep)
}

/// Groups by (`quadrant`, `year`) and sums `rainfall`: exactly one row per
/// combination present in the input.
pub fn sum_by_quadrant_year(joined: LazyFrame) -> LazyFrame {
    joined
        .group_by([col("quadrant"), col("year")])
        .agg([col("rainfall").sum()])
}

/// Full outer join of the totals against the boundary key frame, so every
/// quadrant with boundary data is represented even when it has no rainfall
/// rows (those rows carry null year and rainfall). The boundary file's
/// `quadrant_status` column is not needed downstream and is dropped here.
pub fn attach_boundaries(totals: LazyFrame, boundary_keys: LazyFrame) -> LazyFrame {
    totals
        .join(
            boundary_keys,
            [col("quadrant")],
            [col("quadrant")],
            JoinArgs::new(JoinType::Full).with_coalesce(JoinCoalesce::CoalesceColumns),
        )
        .select([col("quadrant"), col("year"), col("rainfall")])
}

/// The whole pipeline: normalize both feeds, join on channel, sum per
/// (quadrant, year), and complete the result against the boundary set.
pub fn quadrant_totals(
    readings: LazyFrame,
    gauges: LazyFrame,
    boundary_keys: LazyFrame,
) -> LazyFrame {
    let joined = join_on_channel(normalize_readings(readings), normalize_gauges(gauges));
    attach_boundaries(sum_by_quadrant_year(joined), boundary_keys)
}
