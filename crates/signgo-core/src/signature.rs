//! Signature capture pad
//!
//! The pad records strokes on a cell grid. Saving rasterizes them to a PNG
//! and hands back a base64 data URL.

use std::io::Cursor;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{DynamicImage, GrayImage, ImageFormat, Luma};

use crate::booking::Booking;
use crate::error::{Result, SignGoError};
use crate::incident::NO_ACTIVE_BOOKING;
use crate::status::BookingStatus;

pub const SIGNATURE_REQUIRED: &str = "Please provide a signature.";
pub const ALREADY_DELIVERED: &str = "This booking has already been delivered.";
pub const CANNOT_ADVANCE: &str = "This booking's status cannot be advanced.";
pub const CAPTURED_TITLE: &str = "Signature Captured";
pub const CAPTURED_MESSAGE: &str = "Your signature was successfully captured!";

/// Pixels per grid column in the exported image
const CELL_WIDTH_PX: u32 = 8;
/// Pixels per grid row; terminal cells are about twice as tall as wide
const CELL_HEIGHT_PX: u32 = 16;
/// Half-width of the pen in pixels
const PEN_RADIUS_PX: i64 = 2;

const INK: Luma<u8> = Luma([0]);
const PAPER: Luma<u8> = Luma([255]);

/// A grid position
pub type Point = (u16, u16);

/// Drawing surface for a signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignaturePad {
    width: u16,
    height: u16,
    strokes: Vec<Vec<Point>>,
    cursor: Point,
    pen_down: bool,
}

/// A saved signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedSignature {
    pub png: Vec<u8>,
    /// `data:image/png;base64,...`
    pub data_url: String,
}

impl SignaturePad {
    pub fn new(width: u16, height: u16) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            strokes: Vec::new(),
            cursor: (width / 2, height / 2),
            pen_down: false,
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn cursor(&self) -> Point {
        self.cursor
    }

    pub fn is_pen_down(&self) -> bool {
        self.pen_down
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.iter().all(Vec::is_empty)
    }

    pub fn strokes(&self) -> &[Vec<Point>] {
        &self.strokes
    }

    /// Resize the grid. Strokes are kept as drawn and clipped to the grid
    /// when rendered, so growing back restores them.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width.max(1);
        self.height = height.max(1);
        self.cursor = self.clamp(self.cursor.0 as i32, self.cursor.1 as i32);
    }

    /// Lift or lower the pen at the cursor
    pub fn toggle_pen(&mut self) {
        if self.pen_down {
            self.pen_down = false;
        } else {
            self.pen_down = true;
            self.strokes.push(vec![self.cursor]);
        }
    }

    /// Move the cursor; with the pen down this extends the current stroke
    pub fn move_cursor(&mut self, dx: i32, dy: i32) {
        let next = self.clamp(self.cursor.0 as i32 + dx, self.cursor.1 as i32 + dy);
        self.cursor = next;
        if self.pen_down {
            self.extend_stroke(next);
        }
    }

    /// Start a new stroke at `point` (mouse press)
    pub fn begin_stroke(&mut self, point: Point) {
        let point = self.clamp(point.0 as i32, point.1 as i32);
        self.cursor = point;
        self.pen_down = true;
        self.strokes.push(vec![point]);
    }

    /// Continue the stroke to `point` (mouse drag)
    pub fn drag_to(&mut self, point: Point) {
        let point = self.clamp(point.0 as i32, point.1 as i32);
        self.cursor = point;
        if !self.pen_down {
            self.begin_stroke(point);
            return;
        }
        self.extend_stroke(point);
    }

    /// Finish the stroke (mouse release)
    pub fn end_stroke(&mut self) {
        self.pen_down = false;
    }

    pub fn clear(&mut self) {
        self.strokes.clear();
        self.pen_down = false;
    }

    /// Every visible grid cell covered by ink, with segments filled in
    pub fn inked_cells(&self) -> Vec<Point> {
        let (width, height) = (self.width as i64, self.height as i64);
        let mut cells = Vec::new();
        let mut plot = |x: i64, y: i64| {
            if x < width && y < height {
                cells.push((x as u16, y as u16));
            }
        };
        for stroke in &self.strokes {
            match stroke.as_slice() {
                [] => {}
                [only] => plot(only.0 as i64, only.1 as i64),
                points => {
                    for pair in points.windows(2) {
                        let (x0, y0) = (pair[0].0 as i64, pair[0].1 as i64);
                        let (x1, y1) = (pair[1].0 as i64, pair[1].1 as i64);
                        line(x0, y0, x1, y1, &mut plot);
                    }
                }
            }
        }
        cells.sort_unstable();
        cells.dedup();
        cells
    }

    /// Rasterize the strokes; `None` when no ink is visible
    pub fn capture(&self) -> Result<Option<CapturedSignature>> {
        if self.inked_cells().is_empty() {
            return Ok(None);
        }

        let width = self.width as u32 * CELL_WIDTH_PX;
        let height = self.height as u32 * CELL_HEIGHT_PX;
        let mut canvas = GrayImage::from_pixel(width, height, PAPER);

        for stroke in &self.strokes {
            let centers: Vec<(i64, i64)> = stroke.iter().map(|&p| cell_center(p)).collect();
            if let [only] = centers.as_slice() {
                stamp(&mut canvas, only.0, only.1);
            }
            for pair in centers.windows(2) {
                line(pair[0].0, pair[0].1, pair[1].0, pair[1].1, |x, y| {
                    stamp(&mut canvas, x, y)
                });
            }
        }

        let mut png = Vec::new();
        DynamicImage::ImageLuma8(canvas).write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
        let data_url = format!("data:image/png;base64,{}", STANDARD.encode(&png));

        Ok(Some(CapturedSignature { png, data_url }))
    }

    fn clamp(&self, x: i32, y: i32) -> Point {
        (
            x.clamp(0, self.width as i32 - 1) as u16,
            y.clamp(0, self.height as i32 - 1) as u16,
        )
    }

    fn extend_stroke(&mut self, point: Point) {
        match self.strokes.last_mut() {
            Some(stroke) if stroke.last() != Some(&point) => stroke.push(point),
            Some(_) => {}
            None => self.strokes.push(vec![point]),
        }
    }
}

/// Status update requested by a saved signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedAdvance {
    pub booking_id: String,
    pub status: BookingStatus,
}

/// The successor status a signature moves `booking` to
pub fn advance_on_signature(booking: Option<&Booking>) -> Result<SignedAdvance> {
    let booking = booking.ok_or_else(|| SignGoError::Validation(NO_ACTIVE_BOOKING.to_string()))?;
    if booking.status.is_delivered() {
        return Err(SignGoError::Validation(ALREADY_DELIVERED.to_string()));
    }
    let status = booking
        .status
        .successor()
        .ok_or_else(|| SignGoError::Validation(CANNOT_ADVANCE.to_string()))?;

    Ok(SignedAdvance {
        booking_id: booking.id.clone(),
        status,
    })
}

fn cell_center((x, y): Point) -> (i64, i64) {
    (
        (x as u32 * CELL_WIDTH_PX + CELL_WIDTH_PX / 2) as i64,
        (y as u32 * CELL_HEIGHT_PX + CELL_HEIGHT_PX / 2) as i64,
    )
}

fn stamp(canvas: &mut GrayImage, cx: i64, cy: i64) {
    let (w, h) = (canvas.width() as i64, canvas.height() as i64);
    for y in (cy - PEN_RADIUS_PX).max(0)..=(cy + PEN_RADIUS_PX).min(h - 1) {
        for x in (cx - PEN_RADIUS_PX).max(0)..=(cx + PEN_RADIUS_PX).min(w - 1) {
            canvas.put_pixel(x as u32, y as u32, INK);
        }
    }
}

/// Bresenham line from (x0, y0) to (x1, y1), both ends included
fn line(mut x0: i64, mut y0: i64, x1: i64, y1: i64, mut plot: impl FnMut(i64, i64)) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        plot(x0, y0);
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}
