//! Edge geometry: anchors, routers and connectors.
//!
//! A route is computed in two steps. The router turns the two end nodes into
//! a list of way points (`normal`: straight, `orth`: one elbow,
//! `manhattan`: perpendicular stubs joined by axis-aligned segments). The
//! connector then joins those points with lines or cubic curves.

use flowdesk_core::{Point, Rect};
use flowdesk_flow::{BodyShape, Connector, Edge, Node, PortSide, Router};

/// Length of the perpendicular stub a manhattan route leaves a node with.
pub const MANHATTAN_STUB: f64 = 20.0;

const CURVE_SAMPLES: usize = 24;
const EPSILON: f64 = 1e-6;

/// One piece of a route, starting where the previous one ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    /// Straight line to the point.
    Line(Point),
    /// Cubic Bézier with two control points and an end point.
    Cubic(Point, Point, Point),
}

impl Segment {
    fn end(self) -> Point {
        match self {
            Self::Line(p) | Self::Cubic(_, _, p) => p,
        }
    }
}

/// A drawable edge path.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// First point, on the source node.
    pub start: Point,
    /// Pieces in drawing order.
    pub segments: Vec<Segment>,
}

impl Route {
    /// Last point, on the target node.
    #[must_use]
    pub fn end(&self) -> Point {
        self.segments.last().map_or(self.start, |s| s.end())
    }

    /// The route flattened to a polyline; curves are sampled.
    #[must_use]
    pub fn polyline(&self) -> Vec<Point> {
        let mut points = vec![self.start];
        let mut from = self.start;
        for segment in &self.segments {
            match *segment {
                Segment::Line(p) => points.push(p),
                Segment::Cubic(c1, c2, p) => {
                    points.extend((1..=CURVE_SAMPLES).map(|i| cubic_at(from, c1, c2, p, i as f64 / CURVE_SAMPLES as f64)));
                }
            }
            from = segment.end();
        }
        points
    }

    /// Total length of the flattened path.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.polyline().windows(2).map(|w| w[0].distance(w[1])).sum()
    }

    /// Point at fraction `t` of the length (clamped to `0.0..=1.0`).
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point {
        let points = self.polyline();
        let total: f64 = points.windows(2).map(|w| w[0].distance(w[1])).sum();
        if total <= EPSILON {
            return self.start;
        }
        let mut remaining = t.clamp(0.0, 1.0) * total;
        for w in points.windows(2) {
            let len = w[0].distance(w[1]);
            if remaining <= len {
                return if len <= EPSILON { w[0] } else { w[0].lerp(w[1], remaining / len) };
            }
            remaining -= len;
        }
        self.end()
    }

    /// Unit vector of travel where the route arrives at the target.
    #[must_use]
    pub fn end_direction(&self) -> Point {
        let before = match self.segments.last() {
            Some(Segment::Cubic(c1, c2, p)) => {
                if c2.distance(*p) > EPSILON {
                    *c2
                } else if c1.distance(*p) > EPSILON {
                    *c1
                } else {
                    self.previous_end()
                }
            }
            _ => self.previous_end(),
        };
        unit(self.end() - before)
    }

    /// Unit vector pointing away from the route at the source.
    #[must_use]
    pub fn start_direction(&self) -> Point {
        let after = match self.segments.first() {
            Some(Segment::Cubic(c1, c2, p)) => [*c1, *c2, *p]
                .into_iter()
                .find(|q| q.distance(self.start) > EPSILON)
                .unwrap_or(*p),
            Some(Segment::Line(p)) => *p,
            None => self.start,
        };
        unit(self.start - after)
    }

    fn previous_end(&self) -> Point {
        let n = self.segments.len();
        if n >= 2 { self.segments[n - 2].end() } else { self.start }
    }
}

fn unit(v: Point) -> Point {
    let len = v.x.hypot(v.y);
    if len <= EPSILON { Point::new(1.0, 0.0) } else { Point::new(v.x / len, v.y / len) }
}

fn cubic_at(p0: Point, c1: Point, c2: Point, p3: Point, t: f64) -> Point {
    let u = 1.0 - t;
    let (a, b, c, d) = (u * u * u, 3.0 * u * u * t, 3.0 * u * t * t, t * t * t);
    Point::new(
        a * p0.x + b * c1.x + c * c2.x + d * p3.x,
        a * p0.y + b * c1.y + c * c2.y + d * p3.y,
    )
}

/// Compute the route of `edge` between its resolved end nodes.
#[must_use]
pub fn route_edge(edge: &Edge, source: &Node, target: &Node) -> Route {
    let points = match edge.router {
        Router::Normal => normal_points(edge, source, target),
        Router::Orth => orth_points(edge, source, target),
        Router::Manhattan => manhattan_points(edge, source, target),
    };
    connect(&simplify(points), edge.connector)
}

/// Where the ray from the node center towards `toward` leaves the body outline.
#[must_use]
pub fn boundary_point(node: &Node, toward: Point) -> Point {
    let bounds = node.bounds();
    let c = bounds.center();
    let d = toward - c;
    if d.x.abs() <= EPSILON && d.y.abs() <= EPSILON {
        return c;
    }
    let t = match &node.shape {
        BodyShape::Rect => rect_exit(bounds, d),
        BodyShape::Ellipse => {
            let (a, b) = (bounds.size.width / 2.0, bounds.size.height / 2.0);
            if a <= EPSILON || b <= EPSILON {
                rect_exit(bounds, d)
            } else {
                1.0 / ((d.x / a).powi(2) + (d.y / b).powi(2)).sqrt()
            }
        }
        BodyShape::Polygon { .. } => node
            .shape
            .polygon_in(bounds)
            .and_then(|pts| polygon_exit(&pts, c, d))
            .unwrap_or_else(|| rect_exit(bounds, d)),
    };
    Point::new(c.x + d.x * t, c.y + d.y * t)
}

fn rect_exit(bounds: Rect, d: Point) -> f64 {
    let (hw, hh) = (bounds.size.width / 2.0, bounds.size.height / 2.0);
    let tx = if d.x.abs() > EPSILON { hw / d.x.abs() } else { f64::INFINITY };
    let ty = if d.y.abs() > EPSILON { hh / d.y.abs() } else { f64::INFINITY };
    tx.min(ty)
}

/// Smallest positive ray parameter at which `origin + t·d` crosses the polygon.
fn polygon_exit(points: &[Point], origin: Point, d: Point) -> Option<f64> {
    let n = points.len();
    (0..n)
        .filter_map(|i| {
            let (a, b) = (points[i], points[(i + 1) % n]);
            let e = b - a;
            let denom = d.x * e.y - d.y * e.x;
            if denom.abs() <= EPSILON {
                return None;
            }
            let w = a - origin;
            let t = (w.x * e.y - w.y * e.x) / denom;
            let s = (w.x * d.y - w.y * d.x) / denom;
            (t > EPSILON && (-EPSILON..=1.0 + EPSILON).contains(&s)).then_some(t)
        })
        .min_by(f64::total_cmp)
}

fn anchor(node: &Node, side: Option<PortSide>, toward: Point) -> Point {
    side.and_then(|s| node.port_anchor(s))
        .unwrap_or_else(|| boundary_point(node, toward))
}

fn normal_points(edge: &Edge, source: &Node, target: &Node) -> Vec<Point> {
    let a = anchor(source, edge.source_side, target.center());
    let b = anchor(target, edge.target_side, source.center());
    vec![a, b]
}

fn orth_points(edge: &Edge, source: &Node, target: &Node) -> Vec<Point> {
    let (sc, tc) = (source.center(), target.center());
    if edge.source_side.is_some() || edge.target_side.is_some() {
        let a = anchor(source, edge.source_side, tc);
        let b = anchor(target, edge.target_side, sc);
        let elbow = if edge.source_side.is_some_and(is_vertical) {
            Point::new(a.x, b.y)
        } else {
            Point::new(b.x, a.y)
        };
        return vec![a, elbow, b];
    }
    let elbow = Point::new(tc.x, sc.y);
    let aligned = (sc.x - tc.x).abs() <= EPSILON || (sc.y - tc.y).abs() <= EPSILON;
    if aligned || source.bounds().contains(elbow) || target.bounds().contains(elbow) {
        return normal_points(edge, source, target);
    }
    vec![
        boundary_point(source, elbow),
        elbow,
        boundary_point(target, elbow),
    ]
}

fn manhattan_points(edge: &Edge, source: &Node, target: &Node) -> Vec<Point> {
    let (sc, tc) = (source.center(), target.center());
    let d = tc - sc;
    let (auto_source, auto_target) = if d.x.abs() >= d.y.abs() {
        if d.x >= 0.0 { (PortSide::Right, PortSide::Left) } else { (PortSide::Left, PortSide::Right) }
    } else if d.y >= 0.0 {
        (PortSide::Bottom, PortSide::Top)
    } else {
        (PortSide::Top, PortSide::Bottom)
    };
    let source_side = edge.source_side.unwrap_or(auto_source);
    let target_side = edge.target_side.unwrap_or(auto_target);

    let a = source_side.anchor(source.bounds());
    let b = target_side.anchor(target.bounds());
    let a1 = step_out(a, source_side, MANHATTAN_STUB);
    let b1 = step_out(b, target_side, MANHATTAN_STUB);

    let middle = match (is_vertical(source_side), is_vertical(target_side)) {
        (false, false) => {
            let mx = (a1.x + b1.x) / 2.0;
            vec![Point::new(mx, a1.y), Point::new(mx, b1.y)]
        }
        (true, true) => {
            let my = (a1.y + b1.y) / 2.0;
            vec![Point::new(a1.x, my), Point::new(b1.x, my)]
        }
        (false, true) => vec![Point::new(b1.x, a1.y)],
        (true, false) => vec![Point::new(a1.x, b1.y)],
    };

    let mut points = vec![a, a1];
    points.extend(middle);
    points.extend([b1, b]);
    points
}

fn is_vertical(side: PortSide) -> bool {
    matches!(side, PortSide::Top | PortSide::Bottom)
}

fn step_out(p: Point, side: PortSide, len: f64) -> Point {
    match side {
        PortSide::Top => Point::new(p.x, p.y - len),
        PortSide::Right => Point::new(p.x + len, p.y),
        PortSide::Bottom => Point::new(p.x, p.y + len),
        PortSide::Left => Point::new(p.x - len, p.y),
    }
}

/// Drop repeated and collinear interior points.
fn simplify(points: Vec<Point>) -> Vec<Point> {
    let mut out: Vec<Point> = Vec::with_capacity(points.len());
    for p in points {
        if out.last().is_some_and(|q| q.distance(p) <= EPSILON) {
            continue;
        }
        if let [.., a, b] = out.as_slice() {
            let cross = (b.x - a.x) * (p.y - b.y) - (b.y - a.y) * (p.x - b.x);
            let forward = (b.x - a.x) * (p.x - b.x) + (b.y - a.y) * (p.y - b.y) >= 0.0;
            if cross.abs() <= EPSILON && forward {
                out.pop();
            }
        }
        out.push(p);
    }
    out
}

fn connect(points: &[Point], connector: Connector) -> Route {
    let start = points.first().copied().unwrap_or(Point::ZERO);
    let end = points.last().copied().unwrap_or(start);
    let segments = match connector {
        Connector::Normal => points.iter().skip(1).copied().map(Segment::Line).collect(),
        Connector::Smooth if points.len() > 2 => smooth_segments(points),
        Connector::Smooth => vec![Segment::Line(end)],
        Connector::Curve => {
            let d = end - start;
            let (c1, c2) = if d.x.abs() >= d.y.abs() {
                (Point::new(start.x + d.x / 2.0, start.y), Point::new(end.x - d.x / 2.0, end.y))
            } else {
                (Point::new(start.x, start.y + d.y / 2.0), Point::new(end.x, end.y - d.y / 2.0))
            };
            vec![Segment::Cubic(c1, c2, end)]
        }
    };
    Route { start, segments }
}

/// Catmull-Rom spline through every point, expressed as cubic pieces.
fn smooth_segments(points: &[Point]) -> Vec<Segment> {
    let n = points.len();
    (0..n - 1)
        .map(|i| {
            let p0 = points[i.saturating_sub(1)];
            let p1 = points[i];
            let p2 = points[i + 1];
            let p3 = points[(i + 2).min(n - 1)];
            let c1 = Point::new(p1.x + (p2.x - p0.x) / 6.0, p1.y + (p2.y - p0.y) / 6.0);
            let c2 = Point::new(p2.x - (p3.x - p1.x) / 6.0, p2.y - (p3.y - p1.y) / 6.0);
            Segment::Cubic(c1, c2, p2)
        })
        .collect()
}
