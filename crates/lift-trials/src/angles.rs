//! Inter-segment joint angle series.

use std::collections::BTreeMap;

use lift_core::{segment_angle_deg, Error, PointSeries, Result, ScalarSeries};
use lift_dsp::ButterworthFilter;

use crate::config::AngleDefinition;

/// Filter order for angle series.
const ANGLE_FILTER_ORDER: usize = 2;

/// Angle filter cutoff as a fraction of Nyquist.
const ANGLE_CUTOFF: f64 = 0.1;

/// Per-sample angle between segment (p1 -> p2) and segment (p3 -> p4),
/// in degrees.
pub fn angle_series(
    p1: &PointSeries,
    p2: &PointSeries,
    p3: &PointSeries,
    p4: &PointSeries,
) -> Result<ScalarSeries> {
    let n = p1.len();
    if p2.len() != n || p3.len() != n || p4.len() != n {
        return Err(Error::MisalignedCorrection(format!(
            "angle point series lengths differ: {}/{}/{}/{}",
            p1.len(),
            p2.len(),
            p3.len(),
            p4.len()
        )));
    }

    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let angle = segment_angle_deg(&p1[i], &p2[i], &p3[i], &p4[i])
            .ok_or(Error::DegenerateVector { sample: i })?;
        out.push(angle);
    }

    Ok(out)
}

/// Angle series followed by the pipeline's standard zero-phase low-pass,
/// for consistency of smoothing across signal types.
pub fn filtered_angle_series(
    p1: &PointSeries,
    p2: &PointSeries,
    p3: &PointSeries,
    p4: &PointSeries,
) -> Result<ScalarSeries> {
    let raw = angle_series(p1, p2, p3, p4)?;
    let filter = ButterworthFilter::lowpass_normalized(ANGLE_FILTER_ORDER, ANGLE_CUTOFF)?;
    filter.zero_phase(&raw)
}

/// Compute every configured angle over a trial's aggregated (and already
/// truncated) marker groups.
pub fn compute_angles(
    markers: &BTreeMap<String, PointSeries>,
    definitions: &BTreeMap<String, AngleDefinition>,
) -> Result<BTreeMap<String, ScalarSeries>> {
    let mut out = BTreeMap::new();
    for (name, def) in definitions {
        let series = filtered_angle_series(
            group(markers, &def.p1)?,
            group(markers, &def.p2)?,
            group(markers, &def.p3)?,
            group(markers, &def.p4)?,
        )?;
        out.insert(name.clone(), series);
    }

    Ok(out)
}

fn group<'a>(
    markers: &'a BTreeMap<String, PointSeries>,
    name: &str,
) -> Result<&'a PointSeries> {
    markers.get(name).ok_or_else(|| Error::MissingChannel {
        channel: name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lift_core::Point3;

    fn constant(p: Point3, n: usize) -> PointSeries {
        vec![p; n]
    }

    #[test]
    fn test_right_angle_series() {
        let n = 20;
        let p1 = constant(Point3::origin(), n);
        let p2 = constant(Point3::new(0.0, 0.0, 1.0), n);
        let p3 = constant(Point3::origin(), n);
        let p4 = constant(Point3::new(1.0, 0.0, 0.0), n);

        let angles = angle_series(&p1, &p2, &p3, &p4).unwrap();
        assert_eq!(angles.len(), n);
        for a in angles {
            assert!((a - 90.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_degenerate_vector_reports_sample() {
        let n = 5;
        let p1 = constant(Point3::origin(), n);
        let mut p2 = constant(Point3::new(0.0, 0.0, 1.0), n);
        p2[3] = Point3::origin(); // segment collapses at sample 3
        let p3 = constant(Point3::origin(), n);
        let p4 = constant(Point3::new(1.0, 0.0, 0.0), n);

        let err = angle_series(&p1, &p2, &p3, &p4).unwrap_err();
        assert!(matches!(err, Error::DegenerateVector { sample: 3 }));
    }

    #[test]
    fn test_filtering_keeps_constant_angle() {
        let n = 40;
        let p1 = constant(Point3::origin(), n);
        let p2 = constant(Point3::new(0.0, 1.0, 0.0), n);
        let p3 = constant(Point3::origin(), n);
        let p4 = constant(Point3::new(0.0, -1.0, 0.0), n);

        let filtered = filtered_angle_series(&p1, &p2, &p3, &p4).unwrap();
        assert_eq!(filtered.len(), n);
        for a in filtered {
            assert!((a - 180.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_compute_angles_missing_group() {
        let markers = BTreeMap::new();
        let mut defs = BTreeMap::new();
        defs.insert(
            "spine_angle".to_string(),
            AngleDefinition::new("T8", "C7", "T8", "JLS"),
        );

        let err = compute_angles(&markers, &defs).unwrap_err();
        match err {
            Error::MissingChannel { channel } => assert_eq!(channel, "T8"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
