//! Structure builders shared by the unit tests.

use nalgebra::{Point3, Vector3};

#[allow(clippy::too_many_arguments)]
pub(crate) fn pdb_line(
    record: &str,
    serial: usize,
    name: &str,
    res_name: &str,
    chain: char,
    res_seq: isize,
    pos: [f64; 3],
    element: &str,
) -> String {
    let padded = if name.len() < 4 {
        format!(" {:<3}", name)
    } else {
        name.to_string()
    };
    format!(
        "{:<6}{:>5} {:<4}{:1}{:>3} {:1}{:>4}{:1}   {:>8.3}{:>8.3}{:>8.3}{:>6.2}{:>6.2}          {:>2}",
        record, serial, padded, ' ', res_name, chain, res_seq, ' ', pos[0], pos[1], pos[2], 1.0,
        0.0, element
    )
}

/// Regular polygon of `n` points with circumradius `radius` in the plane spanned by `u` and `v`.
pub(crate) fn polygon(
    n: usize,
    center: Point3<f64>,
    radius: f64,
    u: Vector3<f64>,
    v: Vector3<f64>,
) -> Vec<Point3<f64>> {
    let (u, v) = (u.normalize(), v.normalize());
    (0..n)
        .map(|i| {
            let theta = 2.0 * std::f64::consts::PI * i as f64 / n as f64;
            center + u * (radius * theta.cos()) + v * (radius * theta.sin())
        })
        .collect()
}

/// Flat benzene-like carbon hexagon (C-C 1.39 A) lying in the plane spanned by `u` and `v`.
pub(crate) fn benzene(center: Point3<f64>, u: Vector3<f64>, v: Vector3<f64>) -> Vec<Point3<f64>> {
    polygon(6, center, 1.39, u, v)
}

/// Cyclohexane chair in the xy plane: C-C 1.53 A, atoms alternating 0.25 A above and below.
pub(crate) fn cyclohexane(center: Point3<f64>) -> Vec<Point3<f64>> {
    let radius = (1.53f64.powi(2) - 4.0 * 0.25f64.powi(2)).sqrt();
    polygon(6, center, radius, Vector3::x(), Vector3::y())
        .into_iter()
        .enumerate()
        .map(|(i, p)| p + Vector3::z() * if i % 2 == 0 { 0.25 } else { -0.25 })
        .collect()
}

/// Naphthalene carbon skeleton in the xy plane (C-C 1.40 A), fused bond on the y axis.
pub(crate) fn naphthalene(center: Point3<f64>) -> Vec<Point3<f64>> {
    let r = 1.40;
    let offset = r * 30f64.to_radians().cos();
    let at = |cx: f64, deg: f64| {
        let t = deg.to_radians();
        center + Vector3::new(cx + r * t.cos(), r * t.sin(), 0.0)
    };
    let mut atoms: Vec<Point3<f64>> = [30.0, 90.0, 150.0, 210.0, 270.0, 330.0]
        .iter()
        .map(|&deg| at(offset, deg))
        .collect();
    atoms.extend([90.0, 150.0, 210.0, 270.0].iter().map(|&deg| at(-offset, deg)));
    atoms
}

/// PDB records for one residue whose atoms are all of `element`, named `<element><i>`.
pub(crate) fn residue_lines(
    first_serial: usize,
    record: &str,
    res_name: &str,
    chain: char,
    res_seq: isize,
    element: &str,
    coords: &[Point3<f64>],
) -> Vec<String> {
    coords
        .iter()
        .enumerate()
        .map(|(i, p)| {
            pdb_line(
                record,
                first_serial + i,
                &format!("{}{}", element, i + 1),
                res_name,
                chain,
                res_seq,
                [p.x, p.y, p.z],
                element,
            )
        })
        .collect()
}
