//! Contains the `QuadrantYearLazyFrame` structure for handling lazy
//! operations on the aggregated per-quadrant rainfall totals.

use crate::YycRainError;
use polars::prelude::{col, lit, Expr, LazyFrame, SortMultipleOptions};
use serde::Serialize;

/// One collected row of the aggregated output: a quadrant's summed rainfall
/// for one year. Boundary-only rows (quadrants with no readings) carry
/// `None` for year and rainfall.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuadrantYearTotal {
    pub quadrant: String,
    pub year: Option<i32>,
    /// Total rainfall in millimeters.
    pub rainfall: Option<f64>,
}

/// A wrapper around a Polars `LazyFrame` holding aggregated
/// (`quadrant`, `year`, `rainfall`) rows.
///
/// Instances are obtained via [`crate::YycRain::quadrant_totals`]. The
/// wrapper keeps lazy evaluation: nothing executes until
/// [`QuadrantYearLazyFrame::collect_totals`] or a manual `.frame.collect()`.
#[derive(Clone)]
pub struct QuadrantYearLazyFrame {
    /// The underlying Polars LazyFrame containing the aggregated data.
    pub frame: LazyFrame,
}

impl QuadrantYearLazyFrame {
    /// Wraps a `LazyFrame` assumed to carry the aggregated schema
    /// (`quadrant`, `year`, `rainfall`).
    pub fn new(frame: LazyFrame) -> Self {
        Self { frame }
    }

    /// Applies an arbitrary Polars predicate, returning a new wrapper and
    /// leaving this one unchanged.
    pub fn filter(&self, predicate: Expr) -> QuadrantYearLazyFrame {
        QuadrantYearLazyFrame::new(self.frame.clone().filter(predicate))
    }

    /// Restricts the totals to a single year.
    ///
    /// A year with no matching rows yields an empty frame, not an error;
    /// boundary-only rows (null year) never match.
    pub fn for_year(&self, year: i32) -> QuadrantYearLazyFrame {
        self.filter(col("year").eq(lit(year)))
    }

    /// Restricts the totals to an inclusive year range.
    pub fn year_range(&self, start: i32, end: i32) -> QuadrantYearLazyFrame {
        self.filter(col("year").gt_eq(lit(start)).and(col("year").lt_eq(lit(end))))
    }

    /// Collects the frame into [`QuadrantYearTotal`] rows, sorted by
    /// quadrant and year for stable output.
    pub fn collect_totals(&self) -> Result<Vec<QuadrantYearTotal>, YycRainError> {
        let df = self
            .frame
            .clone()
            .sort(["quadrant", "year"], SortMultipleOptions::default())
            .collect()?;

        let quadrants = df.column("quadrant")?.str()?;
        let years = df.column("year")?.i32()?;
        let rainfall = df.column("rainfall")?.f64()?;

        let mut totals = Vec::with_capacity(df.height());
        for i in 0..df.height() {
            // A null quadrant cannot come out of the coalesced join.
            let Some(quadrant) = quadrants.get(i) else {
                continue;
            };
            totals.push(QuadrantYearTotal {
                quadrant: quadrant.to_owned(),
                year: years.get(i),
                rainfall: rainfall.get(i),
            });
        }
        Ok(totals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn totals_fixture() -> QuadrantYearLazyFrame {
        let df = df!(
            "quadrant" => ["NW", "NW", "NE", "SE"],
            "year" => [Some(1995i32), Some(1996), Some(1995), None],
            "rainfall" => [Some(16.0), Some(250.5), Some(3.0), None],
        )
        .unwrap();
        QuadrantYearLazyFrame::new(df.lazy())
    }

    #[test]
    fn test_for_year_keeps_only_that_year() {
        let df = totals_fixture().for_year(1995).frame.collect().unwrap();

        assert_eq!(df.height(), 2);
        let years = df.column("year").unwrap().i32().unwrap();
        assert!(years.into_iter().all(|year| year == Some(1995)));
    }

    #[test]
    fn test_for_year_with_no_rows_is_empty_not_an_error() {
        let df = totals_fixture().for_year(2005).frame.collect().unwrap();
        assert_eq!(df.height(), 0);
    }

    #[test]
    fn test_for_year_excludes_boundary_only_rows() {
        // The SE row has a null year; no single-year selection may match it.
        for year in [1990, 1995, 2021] {
            let df = totals_fixture().for_year(year).frame.collect().unwrap();
            assert_eq!(df.column("year").unwrap().null_count(), 0);
        }
    }

    #[test]
    fn test_year_range_is_inclusive() {
        let df = totals_fixture()
            .year_range(1995, 1996)
            .frame
            .collect()
            .unwrap();
        assert_eq!(df.height(), 3);
    }

    #[test]
    fn test_collect_totals_is_sorted_and_typed() {
        let totals = totals_fixture().collect_totals().unwrap();

        assert_eq!(totals.len(), 4);
        assert_eq!(
            totals[0],
            QuadrantYearTotal {
                quadrant: "NE".to_owned(),
                year: Some(1995),
                rainfall: Some(3.0),
            }
        );
        // Boundary-only row survives collection with empty measurements.
        assert!(totals
            .iter()
            .any(|total| total.quadrant == "SE" && total.rainfall.is_none()));
    }
}
