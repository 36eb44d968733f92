use nalgebra::Vector2;

pub type Pt2 = Vector2<f64>;

/// Vertical nudge applied when a ray passes exactly through an edge endpoint.
pub const RAY_EPS: f64 = 1e-5;

#[inline]
pub fn distance(p: Pt2, q: Pt2) -> f64 {
    (p - q).norm()
}

/// True iff `q1` and `q2` lie strictly on opposite sides of the line through `p1, p2`.
#[inline]
fn straddles(p1: Pt2, p2: Pt2, q1: Pt2, q2: Pt2) -> bool {
    let d = p1 - p2;
    let s1 = d.x * (q1.y - p1.y) - d.y * (q1.x - p1.x);
    let s2 = d.x * (q2.y - p1.y) - d.y * (q2.x - p1.x);
    s1 * s2 < 0.0
}

#[inline]
fn boxes_overlap(p1: Pt2, p2: Pt2, q1: Pt2, q2: Pt2) -> bool {
    p1.x.max(p2.x) >= q1.x.min(q2.x)
        && q1.x.max(q2.x) >= p1.x.min(p2.x)
        && p1.y.max(p2.y) >= q1.y.min(q2.y)
        && q1.y.max(q2.y) >= p1.y.min(p2.y)
}

/// Proper crossing test for segments `ab` and `cd`.
///
/// Collinear and overlapping segments, and segments that only touch at an
/// endpoint, are not reported. Symmetric in the two pairs.
pub fn segments_intersect(a: Pt2, b: Pt2, c: Pt2, d: Pt2) -> bool {
    straddles(a, b, c, d) && straddles(c, d, a, b) && boxes_overlap(a, b, c, d)
}

/// Closest point to `p` on segment `ab`.
///
/// Two box tests guard the projection: one on `p` before projecting and one on
/// the projected point afterwards. Either failing returns the nearer endpoint.
/// Both are kept; dropping one changes results for some segment orientations.
pub fn closest_point_on_segment(a: Pt2, b: Pt2, p: Pt2) -> Pt2 {
    let (min_x, max_x) = (a.x.min(b.x), a.x.max(b.x));
    let (min_y, max_y) = (a.y.min(b.y), a.y.max(b.y));
    let outside_box = |r: Pt2| {
        (r.x >= max_x || r.x <= min_x) && (r.y >= max_y || r.y <= min_y)
    };
    let nearer_endpoint = |r: Pt2| {
        if distance(a, r) < distance(b, r) {
            a
        } else {
            b
        }
    };

    if outside_box(p) {
        return nearer_endpoint(p);
    }
    let ab = b - a;
    let len2 = ab.norm_squared();
    if len2 <= 0.0 {
        return a;
    }
    let t = (p - a).dot(&ab) / len2;
    let proj = a + ab * t;
    if outside_box(proj) {
        return nearer_endpoint(proj);
    }
    proj
}

/// Does a ray from `p` towards +x cross `edge`?
fn ray_crosses_edge(p: Pt2, edge: (Pt2, Pt2)) -> bool {
    let (mut a, mut b) = edge;
    if a.y > b.y {
        std::mem::swap(&mut a, &mut b);
    }
    let mut py = p.y;
    if py == a.y || py == b.y {
        py += RAY_EPS;
    }
    if py > b.y || py < a.y || p.x > a.x.max(b.x) {
        return false;
    }
    if p.x < a.x.min(b.x) {
        return true;
    }
    let m_edge = if (a.x - b.x).abs() > f64::MIN_POSITIVE {
        (b.y - a.y) / (b.x - a.x)
    } else {
        f64::MAX
    };
    let m_point = if (a.x - p.x).abs() > f64::MIN_POSITIVE {
        (py - a.y) / (p.x - a.x)
    } else {
        f64::MAX
    };
    m_point >= m_edge
}

/// Even-odd ray casting. Boundary points are classified arbitrarily.
pub fn point_in_polygon(p: Pt2, vertices: &[Pt2]) -> bool {
    let crossings = polygon_edges(vertices)
        .filter(|&e| ray_crosses_edge(p, e))
        .count();
    crossings % 2 == 1
}

/// Edges of a closed polygon, starting with the wrap-around edge `(last, first)`.
pub fn polygon_edges(vertices: &[Pt2]) -> impl Iterator<Item = (Pt2, Pt2)> + '_ {
    let n = vertices.len();
    (0..n).map(move |k| (vertices[(k + n - 1) % n], vertices[k]))
}
