/// A point in scene space (the runtime's 3-component coordinate convention).
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Point3 {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
    /// Depth coordinate (usually 0).
    pub z: f64,
}

impl Point3 {
    /// Construct a point.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Parse a numeric 2- or 3-tuple. Two components are padded with `z = 0`.
    pub fn from_components(c: &[f64]) -> Option<Self> {
        match *c {
            [x, y] if x.is_finite() && y.is_finite() => Some(Self::new(x, y, 0.0)),
            [x, y, z] if x.is_finite() && y.is_finite() && z.is_finite() => {
                Some(Self::new(x, y, z))
            }
            _ => None,
        }
    }

    /// Arithmetic mean of `points`; `None` for an empty slice.
    pub fn centroid(points: &[Point3]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        let n = points.len() as f64;
        let (sx, sy, sz) = points
            .iter()
            .fold((0.0, 0.0, 0.0), |(x, y, z), p| (x + p.x, y + p.y, z + p.z));
        Some(Self::new(sx / n, sy / n, sz / n))
    }

    /// Move `dist` away from `origin` along the direction `origin -> self`.
    ///
    /// Coincident points are nudged straight up.
    pub fn pushed_away_from(self, origin: Point3, dist: f64) -> Self {
        let (dx, dy) = (self.x - origin.x, self.y - origin.y);
        let len = (dx * dx + dy * dy).sqrt();
        if len < 1e-9 {
            return Self::new(self.x, self.y + dist, self.z);
        }
        Self::new(
            self.x + dx / len * dist,
            self.y + dy / len * dist,
            self.z,
        )
    }
}

/// Hex color literal, kept exactly as authored (e.g. `#112233`).
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct HexColor(String);

impl HexColor {
    /// Accept `#rgb`, `#rrggbb` or `#rrggbbaa` (case-insensitive, surrounding spaces ignored).
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let digits = s.strip_prefix('#')?;
        let ok_len = matches!(digits.len(), 3 | 6 | 8);
        if ok_len && digits.chars().all(|c| c.is_ascii_hexdigit()) {
            Some(Self(s.to_owned()))
        } else {
            None
        }
    }

    /// Compile-time-known palette constant. Callers pass valid literals only.
    pub(crate) fn from_static(s: &'static str) -> Self {
        Self(s.to_owned())
    }

    /// Borrow the literal.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for HexColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
