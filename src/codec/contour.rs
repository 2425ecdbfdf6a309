//! Polygon tracing on top of `imageproc` border following.

use imageproc::contours::{find_contours, BorderType};

use crate::error::CodecError;

use super::{BinaryMask, Polygon, PolygonTracer};

/// Options for [`ContourTracer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TraceOptions {
    /// Also emit the borders of holes.
    ///
    /// Hole outlines are rasterised like any other polygon and unioned, so a
    /// mask rebuilt from them has its holes filled.
    pub include_holes: bool,

    /// Keep only the vertices where the chain changes direction.
    pub simplify: bool,

    /// Contours with fewer vertices are dropped.
    pub min_vertices: usize,
}

impl Default for TraceOptions {
    fn default() -> Self {
        Self {
            include_holes: false,
            simplify: true,
            min_vertices: 3,
        }
    }
}

/// The bundled [`PolygonTracer`].
///
/// Vertices are the pixel coordinates of boundary pixels, so a polygon
/// rasterised back from them loses roughly half a pixel along the whole
/// outline.
#[derive(Clone, Copy, Debug, Default)]
pub struct ContourTracer {
    options: TraceOptions,
}

impl ContourTracer {
    pub fn new(options: TraceOptions) -> Self {
        Self { options }
    }
}

/// Background margin added around the mask before border following.
///
/// Without it, a shape touching the image edge is reported as a hole of the
/// frame rather than as an outer border.
const TRACE_MARGIN: u32 = 1;

impl PolygonTracer for ContourTracer {
    fn trace(&self, mask: &BinaryMask) -> Result<Vec<Polygon>, CodecError> {
        let image = mask.to_gray_image(TRACE_MARGIN);
        let contours = find_contours::<i32>(&image);
        let found = contours.len();

        let polygons: Vec<Polygon> = contours
            .into_iter()
            .filter(|c| self.options.include_holes || matches!(c.border_type, BorderType::Outer))
            .map(|c| {
                let margin = TRACE_MARGIN as i32;
                let points: Vec<(i32, i32)> = c
                    .points
                    .iter()
                    .map(|p| (p.x - margin, p.y - margin))
                    .collect();
                if self.options.simplify {
                    simplify_chain(&points)
                } else {
                    points
                }
            })
            .filter(|points| points.len() >= self.options.min_vertices)
            .map(|points| {
                points
                    .into_iter()
                    .flat_map(|(x, y)| [x as f64, y as f64])
                    .collect()
            })
            .collect();

        tracing::trace!(found, kept = polygons.len(), "traced mask contours");
        Ok(polygons)
    }
}

fn direction(from: (i32, i32), to: (i32, i32)) -> (i32, i32) {
    ((to.0 - from.0).signum(), (to.1 - from.1).signum())
}

/// Drops every vertex whose incoming and outgoing steps point the same way.
fn simplify_chain(points: &[(i32, i32)]) -> Vec<(i32, i32)> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }
    (0..n)
        .filter(|&i| {
            let prev = points[(i + n - 1) % n];
            let next = points[(i + 1) % n];
            direction(prev, points[i]) != direction(points[i], next)
        })
        .map(|i| points[i])
        .collect()
}
