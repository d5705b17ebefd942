//! Break schedules and service-area coverage summaries.
//!
//! A service-area solve returns one polygon per facility per break. Given
//! those polygons and one or more groups of locations, [`summarize_coverage`]
//! assigns each location to the smallest break whose polygon contains it and
//! reports per-break counts for every group.

use serde_json::Value;
use thiserror::Error;

use crate::features::{Attributes, FeatureSet, Path, Point};
use crate::geojson::LocationGroup;

pub const MIN_BREAK_SIZE: u32 = 1;
pub const MAX_BREAK_SIZE: u32 = 30;
pub const MAX_NUM_BREAKS: u32 = 5;

#[derive(Debug, Error, PartialEq)]
pub enum BreakScheduleError {
    #[error("number of breaks must be at least 1")]
    NoBreaks,

    #[error("number of breaks {0} is outside 1..=5")]
    TooManyBreaks(u32),

    #[error("break size {0} is outside 1..=30 minutes")]
    SizeOutOfRange(u32),

    #[error("invalid break value '{0}'")]
    InvalidValue(String),

    #[error("break values must be strictly increasing, got {0} after {1}")]
    NotIncreasing(f64, f64),
}

/// Evenly spaced breaks: `size, 2*size, ..., n*size` minutes.
///
/// # Errors
///
/// Returns [`BreakScheduleError::NoBreaks`] when `num_breaks` is zero,
/// [`BreakScheduleError::TooManyBreaks`] above [`MAX_NUM_BREAKS`], and
/// [`BreakScheduleError::SizeOutOfRange`] when `break_size` is outside
/// [`MIN_BREAK_SIZE`]..=[`MAX_BREAK_SIZE`].
pub fn break_schedule(num_breaks: u32, break_size: u32) -> Result<Vec<f64>, BreakScheduleError> {
    if num_breaks == 0 {
        return Err(BreakScheduleError::NoBreaks);
    }
    if num_breaks > MAX_NUM_BREAKS {
        return Err(BreakScheduleError::TooManyBreaks(num_breaks));
    }
    if !(MIN_BREAK_SIZE..=MAX_BREAK_SIZE).contains(&break_size) {
        return Err(BreakScheduleError::SizeOutOfRange(break_size));
    }
    Ok((1..=num_breaks)
        .map(|i| f64::from(i) * f64::from(break_size))
        .collect())
}

/// Parses a space- or comma-separated list such as `"5 10 15"`.
///
/// # Errors
///
/// Returns [`BreakScheduleError::InvalidValue`] for non-numeric or
/// non-positive entries, [`BreakScheduleError::NotIncreasing`] when the list
/// is not strictly ascending, and [`BreakScheduleError::NoBreaks`] when it is
/// empty.
pub fn parse_break_values(raw: &str) -> Result<Vec<f64>, BreakScheduleError> {
    let mut values: Vec<f64> = Vec::new();
    for token in raw
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
    {
        let v: f64 = token
            .parse()
            .map_err(|_| BreakScheduleError::InvalidValue(token.to_string()))?;
        if !v.is_finite() || v <= 0.0 {
            return Err(BreakScheduleError::InvalidValue(token.to_string()));
        }
        if let Some(&prev) = values.last() {
            if v <= prev {
                return Err(BreakScheduleError::NotIncreasing(v, prev));
            }
        }
        values.push(v);
    }
    if values.is_empty() {
        return Err(BreakScheduleError::NoBreaks);
    }
    Ok(values)
}

/// Formats break values the way the service-area task expects them.
#[must_use]
pub fn format_break_values(values: &[f64]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// One service-area polygon with the upper bound of its break interval.
#[derive(Debug, Clone, PartialEq)]
pub struct BreakPolygon {
    pub break_value: f64,
    pub rings: Vec<Path>,
}

impl BreakPolygon {
    /// Extracts polygons from service-area output features.
    ///
    /// Features without a numeric `ToBreak` attribute or without polygon
    /// geometry are skipped.
    #[must_use]
    pub fn from_features(set: &FeatureSet<Attributes>) -> Vec<BreakPolygon> {
        set.features
            .iter()
            .filter_map(|f| {
                let break_value = f.attributes.get("ToBreak").and_then(Value::as_f64)?;
                let rings = f.geometry.as_ref()?.rings()?.to_vec();
                Some(BreakPolygon { break_value, rings })
            })
            .collect()
    }

    /// Even-odd point-in-polygon test across all rings, so holes are excluded.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        let mut inside = false;
        for ring in &self.rings {
            let n = ring.len();
            if n < 3 {
                continue;
            }
            let mut j = n - 1;
            for i in 0..n {
                let (Some(&xi), Some(&yi)) = (ring[i].first(), ring[i].get(1)) else {
                    j = i;
                    continue;
                };
                let (Some(&xj), Some(&yj)) = (ring[j].first(), ring[j].get(1)) else {
                    j = i;
                    continue;
                };
                if (yi > point.y) != (yj > point.y)
                    && point.x < (xj - xi) * (point.y - yi) / (yj - yi) + xi
                {
                    inside = !inside;
                }
                j = i;
            }
        }
        inside
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoveredLocation {
    pub name: String,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BreakCount {
    pub break_value: f64,
    pub locations: Vec<CoveredLocation>,
}

impl BreakCount {
    #[must_use]
    pub fn count(&self) -> usize {
        self.locations.len()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupCoverage {
    pub name: String,
    /// One entry per break value, ascending.
    pub breaks: Vec<BreakCount>,
    /// Locations outside every polygon.
    pub uncovered: usize,
}

impl GroupCoverage {
    /// Number of locations reached within `break_value` minutes or less.
    #[must_use]
    pub fn covered_within(&self, break_value: f64) -> usize {
        self.breaks
            .iter()
            .filter(|b| b.break_value <= break_value)
            .map(BreakCount::count)
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CoverageSummary {
    pub break_values: Vec<f64>,
    pub groups: Vec<GroupCoverage>,
    /// Smallest break at which every group has at least one location covered.
    pub smallest_break_for_all: Option<f64>,
}

/// Assigns every location to the smallest containing break, per group.
#[must_use]
pub fn summarize_coverage(polygons: &[BreakPolygon], groups: &[LocationGroup]) -> CoverageSummary {
    let mut sorted: Vec<&BreakPolygon> = polygons.iter().collect();
    sorted.sort_by(|a, b| a.break_value.total_cmp(&b.break_value));

    let mut break_values: Vec<f64> = sorted.iter().map(|p| p.break_value).collect();
    break_values.dedup();

    let groups: Vec<GroupCoverage> = groups
        .iter()
        .map(|group| {
            let mut breaks: Vec<BreakCount> = break_values
                .iter()
                .map(|&break_value| BreakCount {
                    break_value,
                    locations: Vec::new(),
                })
                .collect();
            let mut uncovered = 0;

            for (index, location) in group.locations.iter().enumerate() {
                let point = location.point();
                let hit = sorted.iter().find(|p| p.contains(point));
                match hit.and_then(|p| breaks.iter_mut().find(|b| b.break_value == p.break_value)) {
                    Some(slot) => slot.locations.push(CoveredLocation {
                        name: location.display_name(index),
                        id: location.identifier(index),
                    }),
                    None => uncovered += 1,
                }
            }

            GroupCoverage {
                name: group.name.clone(),
                breaks,
                uncovered,
            }
        })
        .collect();

    let smallest_break_for_all = if groups.is_empty() {
        None
    } else {
        break_values
            .iter()
            .copied()
            .find(|&b| groups.iter().all(|g| g.covered_within(b) > 0))
    };

    CoverageSummary {
        break_values,
        groups,
        smallest_break_for_all,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::geojson::LocationPoint;

    fn square(half: f64, break_value: f64) -> BreakPolygon {
        BreakPolygon {
            break_value,
            rings: vec![vec![
                vec![-half, -half],
                vec![-half, half],
                vec![half, half],
                vec![half, -half],
                vec![-half, -half],
            ]],
        }
    }

    fn location(x: f64, y: f64, name: &str) -> LocationPoint {
        let mut properties = Attributes::new();
        properties.insert("name".to_string(), json!(name));
        LocationPoint {
            longitude: x,
            latitude: y,
            properties,
        }
    }

    #[test]
    fn break_schedule_multiplies_size() {
        assert_eq!(break_schedule(3, 5).unwrap(), vec![5.0, 10.0, 15.0]);
        assert_eq!(break_schedule(1, 30).unwrap(), vec![30.0]);
    }

    #[test]
    fn break_schedule_rejects_bad_input() {
        assert_eq!(break_schedule(0, 5), Err(BreakScheduleError::NoBreaks));
        assert_eq!(
            break_schedule(3, 31),
            Err(BreakScheduleError::SizeOutOfRange(31))
        );
        assert_eq!(
            break_schedule(3, 0),
            Err(BreakScheduleError::SizeOutOfRange(0))
        );
    }

    #[test]
    fn break_schedule_caps_number_of_breaks() {
        assert_eq!(
            break_schedule(5, 30).unwrap(),
            vec![30.0, 60.0, 90.0, 120.0, 150.0]
        );
        assert_eq!(
            break_schedule(6, 5),
            Err(BreakScheduleError::TooManyBreaks(6))
        );
        assert_eq!(
            break_schedule(150_000_000, 30),
            Err(BreakScheduleError::TooManyBreaks(150_000_000))
        );
    }

    #[test]
    fn parse_break_values_accepts_spaces_and_commas() {
        assert_eq!(parse_break_values("5 10 15").unwrap(), vec![5.0, 10.0, 15.0]);
        assert_eq!(parse_break_values("2.5,5, 7.5").unwrap(), vec![2.5, 5.0, 7.5]);
    }

    #[test]
    fn parse_break_values_rejects_bad_lists() {
        assert_eq!(parse_break_values("  "), Err(BreakScheduleError::NoBreaks));
        assert_eq!(
            parse_break_values("5 ten"),
            Err(BreakScheduleError::InvalidValue("ten".to_string()))
        );
        assert_eq!(
            parse_break_values("10 5"),
            Err(BreakScheduleError::NotIncreasing(5.0, 10.0))
        );
        assert_eq!(
            parse_break_values("-5"),
            Err(BreakScheduleError::InvalidValue("-5".to_string()))
        );
    }

    #[test]
    fn format_break_values_matches_service_syntax() {
        assert_eq!(format_break_values(&[5.0, 10.0, 15.0]), "5 10 15");
        assert_eq!(format_break_values(&[2.5]), "2.5");
    }

    #[test]
    fn contains_respects_holes() {
        let mut donut = square(2.0, 10.0);
        donut.rings.push(vec![
            vec![-1.0, -1.0],
            vec![1.0, -1.0],
            vec![1.0, 1.0],
            vec![-1.0, 1.0],
            vec![-1.0, -1.0],
        ]);
        assert!(donut.contains(Point::new(1.5, 1.5)));
        assert!(!donut.contains(Point::new(0.0, 0.0)));
        assert!(!donut.contains(Point::new(3.0, 0.0)));
    }

    #[test]
    fn from_features_reads_to_break_and_rings() {
        let set: FeatureSet<Attributes> = serde_json::from_value(json!({
            "features": [
                {
                    "attributes": { "StoreId": "120", "FromBreak": 0, "ToBreak": 5 },
                    "geometry": { "rings": [[[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [0.0, 0.0]]] }
                },
                { "attributes": { "StoreId": "121" } }
            ]
        }))
        .unwrap();
        let polygons = BreakPolygon::from_features(&set);
        assert_eq!(polygons.len(), 1);
        assert!((polygons[0].break_value - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn locations_are_assigned_to_smallest_containing_break() {
        let polygons = vec![square(3.0, 15.0), square(1.0, 5.0), square(2.0, 10.0)];
        let groups = vec![
            LocationGroup {
                name: "schools".to_string(),
                locations: vec![
                    location(0.5, 0.5, "near"),
                    location(1.5, 0.0, "mid"),
                    location(2.5, 2.5, "far"),
                    location(9.0, 9.0, "outside"),
                ],
            },
            LocationGroup {
                name: "parks".to_string(),
                locations: vec![location(2.8, -2.8, "edge")],
            },
        ];

        let summary = summarize_coverage(&polygons, &groups);
        assert_eq!(summary.break_values, vec![5.0, 10.0, 15.0]);

        let schools = &summary.groups[0];
        let counts: Vec<usize> = schools.breaks.iter().map(BreakCount::count).collect();
        assert_eq!(counts, vec![1, 1, 1]);
        assert_eq!(schools.uncovered, 1);
        assert_eq!(schools.breaks[0].locations[0].name, "near");
        assert_eq!(schools.breaks[0].locations[0].id, "1");

        assert_eq!(summary.smallest_break_for_all, Some(15.0));
    }

    #[test]
    fn duplicate_break_polygons_share_one_bucket() {
        let polygons = vec![square(1.0, 5.0), square(1.0, 5.0)];
        let groups = vec![LocationGroup {
            name: "g".to_string(),
            locations: vec![location(0.0, 0.0, "a")],
        }];
        let summary = summarize_coverage(&polygons, &groups);
        assert_eq!(summary.break_values, vec![5.0]);
        assert_eq!(summary.groups[0].breaks[0].count(), 1);
        assert_eq!(summary.smallest_break_for_all, Some(5.0));
    }

    #[test]
    fn no_groups_means_no_common_break() {
        let summary = summarize_coverage(&[square(1.0, 5.0)], &[]);
        assert!(summary.groups.is_empty());
        assert_eq!(summary.smallest_break_for_all, None);
    }
}
