#![allow(dead_code)]

use std::fs;

use approx::assert_relative_eq;
use camino::Utf8Path;
use nalgebra::Vector3;
use orbdrift::aligner::AlignedRow;
use orbdrift::propagator::NamedElements;
use orbdrift::time_series::TimeSeries;
use orbdrift::OrbitalElementSet;

pub fn assert_vec3_close(actual: &Vector3<f64>, expected: &Vector3<f64>, epsilon: f64) {
    assert_relative_eq!(actual.x, expected.x, epsilon = epsilon);
    assert_relative_eq!(actual.y, expected.y, epsilon = epsilon);
    assert_relative_eq!(actual.z, expected.z, epsilon = epsilon);
}

/// Circular, eccentric (e = 0.5) and inclined (i = 45°) bodies.
pub fn three_bodies() -> Vec<NamedElements> {
    vec![
        NamedElements::new(
            "circular",
            OrbitalElementSet::from_degrees(1.0, 0.0, 0.0, 0.0, 0.0, 0.0).unwrap(),
        ),
        NamedElements::new(
            "eccentric",
            OrbitalElementSet::from_degrees(2.0, 0.5, 0.0, 0.0, 0.0, 30.0).unwrap(),
        ),
        NamedElements::new(
            "inclined",
            OrbitalElementSet::from_degrees(1.5, 0.1, 45.0, 60.0, 90.0, 120.0).unwrap(),
        ),
    ]
}

/// Aligned rows with the given deviations and placeholder radii/speeds.
pub fn rows(delta_r: &[f64], delta_v: &[f64]) -> Vec<AlignedRow> {
    delta_r
        .iter()
        .zip(delta_v)
        .enumerate()
        .map(|(i, (&dr, &dv))| AlignedRow {
            date: format!("2025-{:02}-{:02}", 1 + i / 28, 1 + i % 28),
            computed_radius: 1.0,
            computed_speed: 0.01,
            reference_radius: 1.0,
            reference_speed: 0.01,
            delta_r: dr,
            delta_v: dv,
        })
        .collect()
}

/// Write an SBDB-style element file `<dir>/<name>.json`.
pub fn write_element_file(dir: &Utf8Path, name: &str, [a, e, i, om, w, ma]: [f64; 6]) {
    let json = format!(
        r#"{{
  "object": {{"fullname": "{name}"}},
  "orbit": {{"elements": [
    {{"name": "a", "value": "{a}"}},
    {{"name": "e", "value": "{e}"}},
    {{"name": "i", "value": "{i}"}},
    {{"name": "om", "value": "{om}"}},
    {{"name": "w", "value": {w}}},
    {{"name": "ma", "value": "{ma}"}}
  ]}}
}}"#
    );
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join(format!("{name}.json")), json).unwrap();
}

/// `2025-01-06` → `A.D. 2025-Jan-06 00:00:00.0000`
pub fn horizons_label(date: &str) -> String {
    const MONTHS: [&str; 12] = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ];
    let month: usize = date[5..7].parse().unwrap();
    format!(
        "A.D. {}-{}-{} 00:00:00.0000",
        &date[0..4],
        MONTHS[month - 1],
        &date[8..10]
    )
}

/// Write `series` as a Horizons-style reference file, adding `radial_offset(date)` to `r_AU`.
pub fn write_reference_file(
    path: &Utf8Path,
    series: &TimeSeries,
    radial_offset: impl Fn(&str) -> f64,
) {
    let mut text = String::from("datetime_str,x,y,z,vx,vy,vz,r_AU\n");
    for (date, rec) in series.iter() {
        let v = rec.velocity.unwrap_or_else(Vector3::zeros);
        text.push_str(&format!(
            "{},{},{},{},{},{},{},{}\n",
            horizons_label(date),
            rec.position.x,
            rec.position.y,
            rec.position.z,
            v.x,
            v.y,
            v.z,
            rec.radial_distance + radial_offset(date)
        ));
    }
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, text).unwrap();
}
