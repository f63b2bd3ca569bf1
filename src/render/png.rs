use std::path::Path;

use image::{Rgb, RgbImage};

use crate::error::Result;
use crate::sim::analysis::Bounds;
use crate::sim::Trajectory;

use super::text::TextPainter;
use super::view::Camera;

/// Default line colors, cycled per trajectory.
pub const PALETTE: [[u8; 3]; 10] = [
    [0x1f, 0x77, 0xb4],
    [0xff, 0x7f, 0x0e],
    [0x2c, 0xa0, 0x2c],
    [0xd6, 0x27, 0x28],
    [0x94, 0x67, 0xbd],
    [0x8c, 0x56, 0x4b],
    [0xe3, 0x77, 0xc2],
    [0x7f, 0x7f, 0x7f],
    [0xbc, 0xbd, 0x22],
    [0x17, 0xbe, 0xcf],
];

pub const TITLE: &str = "Lorenz Attractor (3D)";

pub const AXIS_LABELS: [&str; 3] = [
    "X axis (fluid flow rate)",
    "Y axis (temperature difference)",
    "Z axis (vertical temperature variation)",
];

const BOX_COLOR: [u8; 3] = [0xc8, 0xc8, 0xc8];
const TEXT_COLOR: [u8; 3] = [0x26, 0x26, 0x26];

// ---------------------------------------------------------------------------
// Static figure
// ---------------------------------------------------------------------------

/// Fixed-view raster render of one or more trajectories.
///
/// The default is 3600 x 2400, a 12 x 8 inch figure at 300 dpi.
#[derive(Debug, Clone)]
pub struct Figure {
    pub width: u32,
    pub height: u32,
    pub margin: u32,
    pub background: [u8; 3],
    pub draw_box: bool,
    pub title: Option<String>,
    /// Labels for the x, y and z edges of the bounding box.
    pub axis_labels: Option<[String; 3]>,
    /// Swatch and label per trajectory in the top-right corner.
    pub legend: bool,
}

impl Default for Figure {
    fn default() -> Self {
        Self::new(3600, 2400)
    }
}

/// Maps projected coordinates onto pixel space with a uniform scale.
struct Viewport {
    cx: f64,
    cy: f64,
    scale: f64,
    half_w: f64,
    half_h: f64,
}

impl Viewport {
    fn fit(points: impl Iterator<Item = [f64; 2]>, width: u32, height: u32, margin: u32) -> Self {
        let (mut lo, mut hi) = ([f64::INFINITY; 2], [f64::NEG_INFINITY; 2]);
        for p in points.filter(|p| p[0].is_finite() && p[1].is_finite()) {
            for k in 0..2 {
                lo[k] = lo[k].min(p[k]);
                hi[k] = hi[k].max(p[k]);
            }
        }
        let half_usable_w = width.saturating_sub(2 * margin).max(1) as f64 * 0.5;
        let half_usable_h = height.saturating_sub(2 * margin).max(1) as f64 * 0.5;
        let (cx, cy, scale) = if lo[0].is_finite() {
            // halves first so neither the centre nor the span can overflow
            let half_x = hi[0] * 0.5 - lo[0] * 0.5;
            let half_y = hi[1] * 0.5 - lo[1] * 0.5;
            let sx = if half_x > 0.0 { half_usable_w / half_x } else { f64::INFINITY };
            let sy = if half_y > 0.0 { half_usable_h / half_y } else { f64::INFINITY };
            let s = sx.min(sy);
            let s = if s.is_finite() && s > 0.0 { s } else { 1.0 };
            (lo[0] * 0.5 + hi[0] * 0.5, lo[1] * 0.5 + hi[1] * 0.5, s)
        } else {
            (0.0, 0.0, 1.0)
        };
        Viewport {
            cx,
            cy,
            scale,
            half_w: width as f64 * 0.5,
            half_h: height as f64 * 0.5,
        }
    }

    /// Pixel coordinates, possibly off-canvas; image rows grow downward.
    fn to_pixel(&self, p: [f64; 2]) -> Option<[f64; 2]> {
        let px = self.half_w + (p[0] * self.scale - self.cx * self.scale);
        let py = self.half_h - (p[1] * self.scale - self.cy * self.scale);
        (px.is_finite() && py.is_finite()).then_some([px, py])
    }
}

/// Half-open pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PixelRect {
    x0: i64,
    y0: i64,
    x1: i64,
    y1: i64,
}

struct LegendRow {
    swatch: PixelRect,
    text_at: (f32, f32),
}

struct LegendLayout {
    frame: PixelRect,
    rows: Vec<LegendRow>,
}

impl Figure {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            margin: height / 10,
            background: [0xff, 0xff, 0xff],
            draw_box: true,
            title: Some(TITLE.to_string()),
            axis_labels: Some(AXIS_LABELS.map(String::from)),
            legend: true,
        }
    }

    /// Figure with the trajectories and nothing else.
    pub fn bare(width: u32, height: u32) -> Self {
        Self { draw_box: false, title: None, axis_labels: None, legend: false, ..Self::new(width, height) }
    }

    pub fn color_for(index: usize) -> [u8; 3] {
        PALETTE[index % PALETTE.len()]
    }

    fn text_px(&self) -> f32 {
        (self.height as f32 / 40.0).max(8.0)
    }

    fn title_px(&self) -> f32 {
        self.text_px() * 1.3
    }

    /// Rasterize `trajectories` as seen from `camera`.
    pub fn render(&self, trajectories: &[Trajectory], camera: &Camera) -> RgbImage {
        let mut img = RgbImage::from_pixel(self.width, self.height, Rgb(self.background));

        let projected: Vec<Vec<[f64; 2]>> = trajectories.iter().map(|t| camera.project_all(&t.states)).collect();

        let bounds = trajectories
            .iter()
            .filter_map(|t| Bounds::of(&t.states))
            .reduce(|a, b| a.union(&b));
        let corners: Vec<[f64; 2]> = bounds
            .map(|b| box_corners(&b).iter().map(|c| camera.project_vector(c)).map(|p| [p.x, p.y]).collect())
            .unwrap_or_default();

        let viewport = Viewport::fit(
            projected.iter().flatten().copied().chain(corners.iter().copied()),
            self.width,
            self.height,
            self.margin,
        );
        let corner_px: Vec<[f64; 2]> = corners.iter().filter_map(|c| viewport.to_pixel(*c)).collect();

        if self.draw_box && corner_px.len() == 8 {
            for (a, b) in BOX_EDGES {
                draw_line(&mut img, corner_px[a], corner_px[b], BOX_COLOR);
            }
        }

        for (i, points) in projected.iter().enumerate() {
            let color = Self::color_for(i);
            let mut prev: Option<[f64; 2]> = None;
            for p in points {
                let cur = viewport.to_pixel(*p);
                if let (Some(a), Some(b)) = (prev, cur) {
                    draw_line(&mut img, a, b, color);
                }
                prev = cur;
            }
        }

        let wants_text = self.title.is_some() || self.axis_labels.is_some() || self.legend;
        if wants_text {
            if let Some(painter) = TextPainter::new() {
                self.annotate(&mut img, &painter, trajectories, &corner_px);
            }
        }

        img
    }

    fn annotate(&self, img: &mut RgbImage, painter: &TextPainter, trajectories: &[Trajectory], corner_px: &[[f64; 2]]) {
        if let (Some(labels), 8) = (&self.axis_labels, corner_px.len()) {
            let px = self.text_px() * 0.8;
            let n = corner_px.len() as f64;
            let cx = corner_px.iter().map(|c| c[0]).sum::<f64>() / n;
            let cy = corner_px.iter().map(|c| c[1]).sum::<f64>() / n;
            for (label, (a, b)) in labels.iter().zip(AXIS_EDGES) {
                let mid = [(corner_px[a][0] + corner_px[b][0]) * 0.5, (corner_px[a][1] + corner_px[b][1]) * 0.5];
                let (dx, dy) = (mid[0] - cx, mid[1] - cy);
                let len = dx.hypot(dy);
                let (ux, uy) = if len > 1e-6 { (dx / len, dy / len) } else { (0.0, 1.0) };
                let offset = self.text_px() as f64 * 1.5;
                let at = ((mid[0] + ux * offset) as f32, (mid[1] + uy * offset) as f32);
                painter.draw_centered(img, label, at, px, TEXT_COLOR);
            }
        }

        if let Some(title) = &self.title {
            let px = self.title_px();
            let pad = self.text_px() * 0.5;
            let at = (self.width as f32 * 0.5, pad + painter.line_height(px) * 0.5);
            painter.draw_centered(img, title, at, px, TEXT_COLOR);
        }

        if self.legend {
            let labels: Vec<&str> = trajectories.iter().map(|t| t.label.as_str()).collect();
            if let Some(layout) = self.legend_layout(painter, &labels) {
                fill_rect(img, layout.frame, self.background);
                let PixelRect { x0, y0, x1, y1 } = layout.frame;
                let (x0, y0, x1, y1) = (x0 as f64, y0 as f64, (x1 - 1) as f64, (y1 - 1) as f64);
                for (p, q) in [([x0, y0], [x1, y0]), ([x1, y0], [x1, y1]), ([x1, y1], [x0, y1]), ([x0, y1], [x0, y0])] {
                    draw_line(img, p, q, BOX_COLOR);
                }
                let px = self.text_px();
                for (i, (row, label)) in layout.rows.iter().zip(&labels).enumerate() {
                    fill_rect(img, row.swatch, Self::color_for(i));
                    painter.draw(img, label, row.text_at, px, TEXT_COLOR);
                }
            }
        }
    }

    /// Legend frame and rows, anchored top-right below the title.
    fn legend_layout(&self, painter: &TextPainter, labels: &[&str]) -> Option<LegendLayout> {
        if labels.is_empty() {
            return None;
        }
        let px = self.text_px();
        let pad = px * 0.5;
        let row_h = px * 1.4;
        let swatch_w = px * 2.0;
        let swatch_h = (px * 0.3).max(2.0);
        let line_h = painter.line_height(px);
        let label_w = labels.iter().map(|l| painter.width(l, px)).fold(0.0_f32, f32::max);

        let frame_w = pad * 3.0 + swatch_w + label_w;
        let frame_h = pad * 2.0 + row_h * labels.len() as f32;
        let top = match self.title {
            Some(_) => pad * 2.0 + painter.line_height(self.title_px()),
            None => pad,
        };
        let right = self.width as f32 - pad;
        let left = right - frame_w;

        let rows = (0..labels.len())
            .map(|i| {
                let row_top = top + pad + row_h * i as f32;
                let mid = row_top + row_h * 0.5;
                LegendRow {
                    swatch: PixelRect {
                        x0: (left + pad).round() as i64,
                        y0: (mid - swatch_h * 0.5).round() as i64,
                        x1: (left + pad + swatch_w).round() as i64,
                        y1: (mid + swatch_h * 0.5).round() as i64,
                    },
                    text_at: (left + pad * 2.0 + swatch_w, mid - line_h * 0.5),
                }
            })
            .collect();

        Some(LegendLayout {
            frame: PixelRect {
                x0: left.round() as i64,
                y0: top.round() as i64,
                x1: right.round() as i64,
                y1: (top + frame_h).round() as i64,
            },
            rows,
        })
    }

    /// Render and write a PNG to `path`.
    pub fn save(&self, path: impl AsRef<Path>, trajectories: &[Trajectory], camera: &Camera) -> Result<()> {
        let path = path.as_ref();
        let img = self.render(trajectories, camera);
        img.save(path)?;
        tracing::info!(path = %path.display(), width = self.width, height = self.height, "wrote render");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Raster helpers
// ---------------------------------------------------------------------------

const BOX_EDGES: [(usize, usize); 12] = [
    (0, 1), (1, 3), (3, 2), (2, 0), // bottom face
    (4, 5), (5, 7), (7, 6), (6, 4), // top face
    (0, 4), (1, 5), (2, 6), (3, 7), // verticals
];

/// One box edge along each of x, y and z.
const AXIS_EDGES: [(usize, usize); 3] = [(0, 1), (0, 2), (0, 4)];

fn box_corners(b: &Bounds) -> [nalgebra::Vector3<f64>; 8] {
    let [x0, y0, z0] = b.min;
    let [x1, y1, z1] = b.max;
    [
        nalgebra::Vector3::new(x0, y0, z0),
        nalgebra::Vector3::new(x1, y0, z0),
        nalgebra::Vector3::new(x0, y1, z0),
        nalgebra::Vector3::new(x1, y1, z0),
        nalgebra::Vector3::new(x0, y0, z1),
        nalgebra::Vector3::new(x1, y0, z1),
        nalgebra::Vector3::new(x0, y1, z1),
        nalgebra::Vector3::new(x1, y1, z1),
    ]
}

fn fill_rect(img: &mut RgbImage, r: PixelRect, color: [u8; 3]) {
    let (w, h) = (img.width() as i64, img.height() as i64);
    for y in r.y0.max(0)..r.y1.min(h) {
        for x in r.x0.max(0)..r.x1.min(w) {
            img.put_pixel(x as u32, y as u32, Rgb(color));
        }
    }
}

/// Liang-Barsky clip of segment `p`-`q` to `[0, w-1] x [0, h-1]`.
fn clip_segment(p: [f64; 2], q: [f64; 2], w: f64, h: f64) -> Option<([f64; 2], [f64; 2])> {
    let d = [q[0] - p[0], q[1] - p[1]];
    if !(d[0].is_finite() && d[1].is_finite()) || w < 1.0 || h < 1.0 {
        return None;
    }
    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
    let edges = [(-d[0], p[0]), (d[0], w - 1.0 - p[0]), (-d[1], p[1]), (d[1], h - 1.0 - p[1])];
    for (pk, qk) in edges {
        if pk == 0.0 {
            if qk < 0.0 {
                return None;
            }
            continue;
        }
        let r = qk / pk;
        if pk < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }
    Some(([p[0] + t0 * d[0], p[1] + t0 * d[1]], [p[0] + t1 * d[0], p[1] + t1 * d[1]]))
}

/// Bresenham line over the part of `p`-`q` that lies inside the image.
fn draw_line(img: &mut RgbImage, p: [f64; 2], q: [f64; 2], color: [u8; 3]) {
    let (w, h) = (img.width() as i64, img.height() as i64);
    let Some((a, b)) = clip_segment(p, q, w as f64, h as f64) else {
        return;
    };
    let snap = |v: f64, n: i64| (v.round() as i64).clamp(0, n - 1);
    let (x0, y0, x1, y1) = (snap(a[0], w), snap(a[1], h), snap(b[0], w), snap(b[1], h));

    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut x, mut y) = (x0, y0);
    loop {
        img.put_pixel(x as u32, y as u32, Rgb(color));
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}
