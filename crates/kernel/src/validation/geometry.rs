//! Floating-point predicates over point sets.
//!
//! Every comparison against zero goes through [`Tolerance::is_zero`], so the
//! same epsilon (default `1e-4`) decides both degeneracy and deviation.

use crate::geometry::{Point3d, Vec3};
use crate::Tolerance;

/// True if all points lie on a single line.
///
/// Zero, one or two points are always colinear. When the first two points
/// coincide the set is colinear only if every point coincides with the first.
pub fn are_colinear(points: &[Point3d], tol: &Tolerance) -> bool {
    let [p0, p1, rest @ ..] = points else {
        return true;
    };

    let direction = *p1 - *p0;
    if tol.is_zero(direction.length_squared()) {
        return rest.iter().all(|p| tol.points_coincident(p, p0));
    }

    rest.iter()
        .all(|p| tol.is_zero(direction.cross(&(*p - *p0)).length_squared()))
}

/// Unit normal of the plane spanned by the first non-degenerate consecutive
/// triple `(p0, p[i], p[i + 1])`, or `None` if the whole set is colinear.
pub fn plane_normal(points: &[Point3d], tol: &Tolerance) -> Option<Vec3> {
    let p0 = *points.first()?;
    points.windows(2).skip(1).find_map(|pair| {
        let normal = (pair[0] - p0).cross(&(pair[1] - p0));
        if tol.is_zero(normal.length_squared()) {
            None
        } else {
            normal.normalized()
        }
    })
}

/// True if all points lie on a single plane.
///
/// Fewer than three points are trivially coplanar, and so is any colinear set.
/// Otherwise each point's offset from the first must have a near-zero component
/// along the plane normal, i.e. lie within `epsilon` of the plane.
pub fn are_coplanar(points: &[Point3d], tol: &Tolerance) -> bool {
    if points.len() < 3 {
        return true;
    }

    let Some(normal) = plane_normal(points, tol) else {
        return true;
    };

    let p0 = points[0];
    points[1..]
        .iter()
        .all(|p| tol.is_zero(normal.dot(&(*p - p0))))
}
