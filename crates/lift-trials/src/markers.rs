//! Marker aggregation: low-pass filtering and group averaging.

use std::collections::{BTreeMap, HashMap};

use lift_core::{Error, Point3, PointSeries, Result};
use lift_dsp::ButterworthFilter;

/// Filter order for marker trajectories.
const MARKER_FILTER_ORDER: usize = 2;

/// Raw marker channels are in millimeters; aggregated groups in meters.
const MM_PER_M: f64 = 1000.0;

/// Reduce raw marker channels to one representative trajectory per group.
///
/// Every referenced channel is zero-phase low-pass filtered per component,
/// then each group's members are averaged element-wise and converted from
/// millimeters to meters. A sample that is undefined (NaN) in any
/// constituent channel stays undefined in the group trajectory.
pub fn aggregate(
    raw: &HashMap<String, PointSeries>,
    groups: &BTreeMap<String, Vec<String>>,
    sampling_rate: f64,
    cutoff_hz: f64,
) -> Result<BTreeMap<String, PointSeries>> {
    let filter = ButterworthFilter::lowpass(MARKER_FILTER_ORDER, cutoff_hz, sampling_rate)?;

    // Filter each distinct channel once, even when it appears in several
    // groups.
    let mut filtered: HashMap<&str, PointSeries> = HashMap::new();
    for members in groups.values() {
        for name in members {
            if filtered.contains_key(name.as_str()) {
                continue;
            }
            let series = raw.get(name).ok_or_else(|| Error::MissingChannel {
                channel: name.clone(),
            })?;
            filtered.insert(name.as_str(), filter_points(&filter, series)?);
        }
    }

    let mut out = BTreeMap::new();
    for (group, members) in groups {
        if members.is_empty() {
            return Err(Error::Config(format!(
                "marker group '{group}' has no constituent markers"
            )));
        }

        let first = &filtered[members[0].as_str()];
        let n = first.len();
        let mut sum = vec![Point3::origin(); n];
        for name in members {
            let series = &filtered[name.as_str()];
            if series.len() != n {
                return Err(Error::MisalignedCorrection(format!(
                    "marker '{name}' has {} samples, group '{group}' expects {n}",
                    series.len()
                )));
            }
            for (acc, p) in sum.iter_mut().zip(series) {
                acc.x += p.x;
                acc.y += p.y;
                acc.z += p.z;
            }
        }

        let scale = 1.0 / (MM_PER_M * members.len() as f64);
        out.insert(
            group.clone(),
            sum.into_iter()
                .map(|p| Point3::new(p.x * scale, p.y * scale, p.z * scale))
                .collect(),
        );
    }

    Ok(out)
}

/// Zero-phase filter the x/y/z components of a trajectory independently.
fn filter_points(filter: &ButterworthFilter, series: &PointSeries) -> Result<PointSeries> {
    let xs: Vec<f64> = series.iter().map(|p| p.x).collect();
    let ys: Vec<f64> = series.iter().map(|p| p.y).collect();
    let zs: Vec<f64> = series.iter().map(|p| p.z).collect();

    let xs = filter.zero_phase(&xs)?;
    let ys = filter.zero_phase(&ys)?;
    let zs = filter.zero_phase(&zs)?;

    Ok(xs
        .into_iter()
        .zip(ys)
        .zip(zs)
        .map(|((x, y), z)| Point3::new(x, y, z))
        .collect())
}
