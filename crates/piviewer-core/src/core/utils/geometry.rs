use nalgebra::{Matrix3, Point3, SymmetricEigen, Vector3};

/// Relative eigenvalue floor below which a point cloud is treated as degenerate.
const DEGENERACY_RATIO: f64 = 1e-6;

pub fn centroid(points: &[Point3<f64>]) -> Option<Point3<f64>> {
    if points.is_empty() {
        return None;
    }
    let sum = points
        .iter()
        .fold(Vector3::zeros(), |acc, p| acc + p.coords);
    Some(Point3::from(sum / points.len() as f64))
}

/// Computes the unit normal of the least-squares plane through `points`.
///
/// The normal is the eigenvector belonging to the smallest eigenvalue of the
/// covariance matrix of the points about their centroid. Its sign is arbitrary.
///
/// # Return
///
/// Returns `None` for fewer than three points, for coincident points, and for
/// collinear points, where no plane is defined.
pub fn plane_normal(points: &[Point3<f64>]) -> Option<Vector3<f64>> {
    if points.len() < 3 {
        return None;
    }
    let center = centroid(points)?;

    let covariance = points.iter().fold(Matrix3::zeros(), |acc, p| {
        let d = p - center;
        acc + d * d.transpose()
    }) / points.len() as f64;

    let eigen = SymmetricEigen::new(covariance);
    let mut order = [0usize, 1, 2];
    order.sort_by(|&a, &b| eigen.eigenvalues[a].total_cmp(&eigen.eigenvalues[b]));
    let [smallest, middle, largest] = order;

    let spread = eigen.eigenvalues[largest];
    if spread <= f64::EPSILON || eigen.eigenvalues[middle] <= spread * DEGENERACY_RATIO {
        return None;
    }

    let normal: Vector3<f64> = eigen.eigenvectors.column(smallest).into_owned();
    let norm = normal.norm();
    if norm <= f64::EPSILON {
        return None;
    }
    Some(normal / norm)
}

/// Returns the centroid and plane normal of a point set, if the plane is defined.
pub fn center_and_normal(points: &[Point3<f64>]) -> Option<(Point3<f64>, Vector3<f64>)> {
    Some((centroid(points)?, plane_normal(points)?))
}

/// Largest absolute distance of any point from the plane through `origin` with unit `normal`.
pub fn max_plane_deviation(
    points: &[Point3<f64>],
    origin: &Point3<f64>,
    normal: &Vector3<f64>,
) -> f64 {
    points
        .iter()
        .map(|p| (p - origin).dot(normal).abs())
        .fold(0.0, f64::max)
}

/// Angle in degrees between two plane normals, folded into `[0, 90]`.
///
/// Plane normals have no meaningful sign, so an angle `a > 90` is reported as
/// `180 - a`. Exactly 90 is left unchanged.
pub fn folded_normal_angle(n1: &Vector3<f64>, n2: &Vector3<f64>) -> f64 {
    let cos = n1.normalize().dot(&n2.normalize()).clamp(-1.0, 1.0);
    let angle = cos.acos().to_degrees();
    if angle > 90.0 { 180.0 - angle } else { angle }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hexagon(center: Point3<f64>, radius: f64) -> Vec<Point3<f64>> {
        (0..6)
            .map(|i| {
                let theta = (i as f64) * std::f64::consts::PI / 3.0;
                Point3::new(
                    center.x + radius * theta.cos(),
                    center.y + radius * theta.sin(),
                    center.z,
                )
            })
            .collect()
    }

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "expected {b}, got {a}");
    }

    #[test]
    fn centroid_of_hexagon_is_its_center() {
        let c = centroid(&hexagon(Point3::new(1.0, -2.0, 3.5), 1.39)).unwrap();
        assert_close(c.x, 1.0);
        assert_close(c.y, -2.0);
        assert_close(c.z, 3.5);
    }

    #[test]
    fn centroid_of_empty_slice_is_none() {
        assert!(centroid(&[]).is_none());
    }

    #[test]
    fn plane_normal_of_xy_hexagon_is_z_axis() {
        let normal = plane_normal(&hexagon(Point3::origin(), 1.39)).unwrap();
        assert_close(normal.norm(), 1.0);
        assert_close(normal.z.abs(), 1.0);
    }

    #[test]
    fn plane_normal_is_undefined_for_collinear_points() {
        let line = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(3.0, 0.0, 0.0),
        ];
        assert!(plane_normal(&line).is_none());
        assert!(center_and_normal(&line).is_none());
    }

    #[test]
    fn plane_normal_is_undefined_for_too_few_points() {
        assert!(plane_normal(&[Point3::origin(), Point3::new(1.0, 0.0, 0.0)]).is_none());
    }

    #[test]
    fn max_plane_deviation_measures_puckering() {
        let mut ring = hexagon(Point3::origin(), 1.5);
        for (i, p) in ring.iter_mut().enumerate() {
            p.z = if i % 2 == 0 { 0.25 } else { -0.25 };
        }
        let (c, n) = center_and_normal(&ring).unwrap();
        assert_close(max_plane_deviation(&ring, &c, &n), 0.25);
    }

    #[test]
    fn folded_angle_is_independent_of_normal_sign() {
        let z = Vector3::z();
        assert_close(folded_normal_angle(&z, &z), 0.0);
        assert_close(folded_normal_angle(&z, &-z), 0.0);
        assert_close(folded_normal_angle(&z, &Vector3::x()), 90.0);

        let tilted = Vector3::new(0.0, (150f64).to_radians().sin(), (150f64).to_radians().cos());
        assert_close(folded_normal_angle(&z, &tilted), 30.0);
    }

    #[test]
    fn folded_angle_stays_in_range() {
        let z = Vector3::z();
        for deg in (0..=180).step_by(5) {
            let r = (deg as f64).to_radians();
            let n = Vector3::new(r.sin(), 0.0, r.cos());
            let angle = folded_normal_angle(&z, &n);
            assert!((0.0..=90.0 + 1e-9).contains(&angle));
        }
    }
}
