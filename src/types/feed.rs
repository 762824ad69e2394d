//! Identifies the two City of Calgary open-data feeds the crate consumes and
//! the per-feed constants (resource id, record limit, expected columns).

use std::fmt;

const OPEN_DATA_BASE_URL: &str = "https://data.calgary.ca/resource";

/// One of the two Socrata feeds on the City of Calgary open-data portal.
///
/// Each feed is a JSON array of flat records. [`Feed::Readings`] holds the
/// historical rainfall measurements, one row per gauge per period;
/// [`Feed::Gauges`] maps each gauge channel to its name and city quadrant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feed {
    /// Historical rainfall readings (`channel`, `name`, `year`, `rainfall`).
    Readings,
    /// Rain-gauge locations (`channel`, `name`, `quadrant`).
    Gauges,
}

impl Feed {
    pub(crate) fn resource_id(&self) -> &'static str {
        match self {
            Feed::Readings => "d9kv-swk3",
            Feed::Gauges => "x9fe-3zah",
        }
    }

    /// Record-limit query parameter. The readings feed spans decades of
    /// per-gauge rows; the gauge list is small.
    pub(crate) fn record_limit(&self) -> u32 {
        match self {
            Feed::Readings => 1_000_000,
            Feed::Gauges => 1_000,
        }
    }

    pub(crate) fn url(&self) -> String {
        format!(
            "{}/{}.json?$limit={}",
            OPEN_DATA_BASE_URL,
            self.resource_id(),
            self.record_limit()
        )
    }

    pub(crate) fn path_segment(&self) -> &'static str {
        match self {
            Feed::Readings => "readings",
            Feed::Gauges => "gauges",
        }
    }

    pub(crate) fn cache_file_name(&self) -> String {
        format!("{}.parquet", self.path_segment())
    }

    /// Columns the downstream join requires. The feeds carry more; extra
    /// columns are kept in the raw frame and dropped during selection.
    pub(crate) fn required_columns(&self) -> &'static [&'static str] {
        match self {
            Feed::Readings => &["channel", "name", "year", "rainfall"],
            Feed::Gauges => &["channel", "name", "quadrant"],
        }
    }
}

impl fmt::Display for Feed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path_segment())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_urls() {
        assert_eq!(
            Feed::Readings.url(),
            "https://data.calgary.ca/resource/d9kv-swk3.json?$limit=1000000"
        );
        assert_eq!(
            Feed::Gauges.url(),
            "https://data.calgary.ca/resource/x9fe-3zah.json?$limit=1000"
        );
    }

    #[test]
    fn test_feed_cache_file_names_are_distinct() {
        assert_eq!(Feed::Readings.cache_file_name(), "readings.parquet");
        assert_eq!(Feed::Gauges.cache_file_name(), "gauges.parquet");
    }

    #[test]
    fn test_feed_display() {
        assert_eq!(format!("{}", Feed::Readings), "readings");
        assert_eq!(Feed::Gauges.to_string(), "gauges");
    }
}
