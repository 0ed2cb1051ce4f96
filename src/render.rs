use std::path::Path;

use anyhow::{bail, Context, Result};
use image::{Rgb, RgbImage};

use crate::data::model::PixelSpectrum;

// ---------------------------------------------------------------------------
// Figure geometry
// ---------------------------------------------------------------------------

/// Pixel density of the saved figure.
const DPI: u32 = 100;
/// Figure size in inches (width, height).
const FIG_SIZE_IN: (u32, u32) = (10, 6);

const MARGIN_LEFT: i64 = 90;
const MARGIN_RIGHT: i64 = 40;
const MARGIN_TOP: i64 = 60;
const MARGIN_BOTTOM: i64 = 70;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const GRID: Rgb<u8> = Rgb([224, 224, 224]);
const FRAME: Rgb<u8> = Rgb([120, 120, 120]);
const TEXT: Rgb<u8> = Rgb([40, 40, 40]);
const SERIES: Rgb<u8> = Rgb([31, 119, 180]);

const LINE_WIDTH: i64 = 2;
const MARKER_RADIUS: i64 = 4;
const TEXT_SCALE: i64 = 2;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Render the spectral signature as a PNG line plot.
///
/// x = wavelength, y = reflectance, with a marker at every sample, axis
/// labels, a title naming the pixel, and a light grid. The canvas is the
/// 10×6-inch figure at 100 dpi, i.e. 1000×600 pixels. The file is written
/// unconditionally; an unwritable path propagates as a fatal error.
pub fn render_spectrum_png(spectrum: &PixelSpectrum, path: &Path) -> Result<()> {
    if spectrum.is_empty() {
        bail!("cannot plot an empty spectrum");
    }

    let width = FIG_SIZE_IN.0 * DPI;
    let height = FIG_SIZE_IN.1 * DPI;
    let mut img = RgbImage::from_pixel(width, height, BACKGROUND);

    let plot_w = width as i64 - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_h = height as i64 - MARGIN_TOP - MARGIN_BOTTOM;

    let xs: Vec<f64> = spectrum
        .samples()
        .iter()
        .map(|s| s.wavelength_nm as f64)
        .collect();
    let ys: Vec<f64> = spectrum.samples().iter().map(|s| s.reflectance).collect();

    let (x_min, x_max) = padded_range(&xs);
    let (y_min, y_max) = padded_range(&ys);

    let to_px = |x: f64| MARGIN_LEFT + ((x - x_min) / (x_max - x_min) * plot_w as f64) as i64;
    let to_py = |y: f64| MARGIN_TOP + plot_h - ((y - y_min) / (y_max - y_min) * plot_h as f64) as i64;

    // Grid and tick labels first, so the series draws on top.
    let (x_ticks, x_decimals) = nice_ticks(x_min, x_max);
    for &tick in &x_ticks {
        let px = to_px(tick);
        draw_segment(&mut img, px, MARGIN_TOP, px, MARGIN_TOP + plot_h, 1, GRID);
        let label = format_tick(tick, x_decimals);
        let tx = px - text_width(&label, TEXT_SCALE) / 2;
        draw_text(&mut img, &label, tx, MARGIN_TOP + plot_h + 8, TEXT_SCALE, TEXT);
    }
    let (y_ticks, y_decimals) = nice_ticks(y_min, y_max);
    for &tick in &y_ticks {
        let py = to_py(tick);
        draw_segment(&mut img, MARGIN_LEFT, py, MARGIN_LEFT + plot_w, py, 1, GRID);
        let label = format_tick(tick, y_decimals);
        let tx = MARGIN_LEFT - 12 - text_width(&label, TEXT_SCALE);
        draw_text(&mut img, &label, tx, py - 7 * TEXT_SCALE / 2, TEXT_SCALE, TEXT);
    }

    // Plot frame.
    draw_segment(&mut img, MARGIN_LEFT, MARGIN_TOP, MARGIN_LEFT + plot_w, MARGIN_TOP, 1, FRAME);
    draw_segment(
        &mut img,
        MARGIN_LEFT,
        MARGIN_TOP + plot_h,
        MARGIN_LEFT + plot_w,
        MARGIN_TOP + plot_h,
        1,
        FRAME,
    );
    draw_segment(&mut img, MARGIN_LEFT, MARGIN_TOP, MARGIN_LEFT, MARGIN_TOP + plot_h, 1, FRAME);
    draw_segment(
        &mut img,
        MARGIN_LEFT + plot_w,
        MARGIN_TOP,
        MARGIN_LEFT + plot_w,
        MARGIN_TOP + plot_h,
        1,
        FRAME,
    );

    // Signature polyline plus one marker per sample.
    let points: Vec<(i64, i64)> = xs
        .iter()
        .zip(&ys)
        .map(|(&x, &y)| (to_px(x), to_py(y)))
        .collect();
    for pair in points.windows(2) {
        draw_segment(&mut img, pair[0].0, pair[0].1, pair[1].0, pair[1].1, LINE_WIDTH, SERIES);
    }
    for &(px, py) in &points {
        draw_disc(&mut img, px, py, MARKER_RADIUS, SERIES);
    }

    // Title and axis labels.
    let title = format!(
        "Spectral Signature at pixel (row={}, col={})",
        spectrum.row, spectrum.col
    );
    let tx = MARGIN_LEFT + plot_w / 2 - text_width(&title, TEXT_SCALE) / 2;
    draw_text(&mut img, &title, tx, 20, TEXT_SCALE, TEXT);

    let x_label = "Wavelength (nm)";
    let lx = MARGIN_LEFT + plot_w / 2 - text_width(x_label, TEXT_SCALE) / 2;
    draw_text(&mut img, x_label, lx, height as i64 - 28, TEXT_SCALE, TEXT);

    let y_label = "Reflectance";
    let ly = MARGIN_TOP + plot_h / 2 + text_width(y_label, TEXT_SCALE) / 2;
    draw_text_vertical(&mut img, y_label, 18, ly, TEXT_SCALE, TEXT);

    img.save(path)
        .with_context(|| format!("writing plot image to {}", path.display()))?;
    log::info!("saved spectral signature plot to {}", path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// Axis helpers
// ---------------------------------------------------------------------------

/// Data range with 5% padding on each side, widened when degenerate.
fn padded_range(values: &[f64]) -> (f64, f64) {
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;
    if span.abs() < 1e-9 {
        return (min - 0.5, max + 0.5);
    }
    (min - span * 0.05, max + span * 0.05)
}

/// Round tick positions covering [min, max], and how many decimals their
/// labels need.
fn nice_ticks(min: f64, max: f64) -> (Vec<f64>, usize) {
    let span = max - min;
    let raw_step = span / 5.0;
    let magnitude = 10f64.powf(raw_step.log10().floor());
    let residual = raw_step / magnitude;
    let step = if residual <= 1.0 {
        magnitude
    } else if residual <= 2.0 {
        2.0 * magnitude
    } else if residual <= 2.5 {
        2.5 * magnitude
    } else if residual <= 5.0 {
        5.0 * magnitude
    } else {
        10.0 * magnitude
    };

    let mut ticks = Vec::new();
    let mut tick = (min / step).ceil() * step;
    while tick <= max + step * 1e-9 {
        ticks.push(tick);
        tick += step;
    }

    let decimals = if step >= 1.0 {
        0
    } else {
        (-step.log10().floor()) as usize
    };
    (ticks, decimals)
}

fn format_tick(value: f64, decimals: usize) -> String {
    // Avoid "-0.00" for values rounded away from a signed zero.
    let v = if value.abs() < 1e-12 { 0.0 } else { value };
    format!("{v:.decimals$}")
}

// ---------------------------------------------------------------------------
// Raster drawing primitives
// ---------------------------------------------------------------------------

fn put(img: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
        img.put_pixel(x as u32, y as u32, color);
    }
}

fn draw_disc(img: &mut RgbImage, cx: i64, cy: i64, r: i64, color: Rgb<u8>) {
    for dy in -r..=r {
        for dx in -r..=r {
            if dx * dx + dy * dy <= r * r {
                put(img, cx + dx, cy + dy, color);
            }
        }
    }
}

/// Straight segment drawn by stepping the longer axis; `width` > 1 stamps a
/// small disc at every step.
fn draw_segment(img: &mut RgbImage, x0: i64, y0: i64, x1: i64, y1: i64, width: i64, color: Rgb<u8>) {
    let dx = x1 - x0;
    let dy = y1 - y0;
    let steps = dx.abs().max(dy.abs()).max(1);
    for i in 0..=steps {
        let x = x0 + dx * i / steps;
        let y = y0 + dy * i / steps;
        if width <= 1 {
            put(img, x, y, color);
        } else {
            draw_disc(img, x, y, width / 2, color);
        }
    }
}

// ---------------------------------------------------------------------------
// Built-in 5×7 glyphs for axis labels and the title
// ---------------------------------------------------------------------------

/// Row bitmaps, most significant of the low 5 bits = leftmost pixel.
fn glyph(c: char) -> Option<[u8; 7]> {
    let rows = match c {
        ' ' => [0, 0, 0, 0, 0, 0, 0],
        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
        '3' => [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110],
        '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        'S' => [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
        'W' => [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010],
        'a' => [0b00000, 0b00000, 0b01110, 0b00001, 0b01111, 0b10001, 0b01111],
        'c' => [0b00000, 0b00000, 0b01110, 0b10000, 0b10000, 0b10001, 0b01110],
        'e' => [0b00000, 0b00000, 0b01110, 0b10001, 0b11111, 0b10000, 0b01110],
        'f' => [0b00110, 0b01001, 0b01000, 0b11100, 0b01000, 0b01000, 0b01000],
        'g' => [0b00000, 0b01111, 0b10001, 0b10001, 0b01111, 0b00001, 0b01110],
        'h' => [0b10000, 0b10000, 0b10110, 0b11001, 0b10001, 0b10001, 0b10001],
        'i' => [0b00100, 0b00000, 0b01100, 0b00100, 0b00100, 0b00100, 0b01110],
        'l' => [0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        'm' => [0b00000, 0b00000, 0b11010, 0b10101, 0b10101, 0b10101, 0b10101],
        'n' => [0b00000, 0b00000, 0b10110, 0b11001, 0b10001, 0b10001, 0b10001],
        'o' => [0b00000, 0b00000, 0b01110, 0b10001, 0b10001, 0b10001, 0b01110],
        'p' => [0b00000, 0b00000, 0b11110, 0b10001, 0b11110, 0b10000, 0b10000],
        'r' => [0b00000, 0b00000, 0b10110, 0b11001, 0b10000, 0b10000, 0b10000],
        't' => [0b01000, 0b01000, 0b11100, 0b01000, 0b01000, 0b01001, 0b00110],
        'u' => [0b00000, 0b00000, 0b10001, 0b10001, 0b10001, 0b10011, 0b01101],
        'v' => [0b00000, 0b00000, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
        'w' => [0b00000, 0b00000, 0b10001, 0b10001, 0b10101, 0b10101, 0b01010],
        'x' => [0b00000, 0b00000, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001],
        '(' => [0b00010, 0b00100, 0b01000, 0b01000, 0b01000, 0b00100, 0b00010],
        ')' => [0b01000, 0b00100, 0b00010, 0b00010, 0b00010, 0b00100, 0b01000],
        '=' => [0b00000, 0b00000, 0b11111, 0b00000, 0b11111, 0b00000, 0b00000],
        ',' => [0b00000, 0b00000, 0b00000, 0b00000, 0b01100, 0b00100, 0b01000],
        '.' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b01100, 0b01100],
        '-' => [0b00000, 0b00000, 0b00000, 0b11111, 0b00000, 0b00000, 0b00000],
        _ => return None,
    };
    Some(rows)
}

/// Advance width in pixels of a rendered string.
fn text_width(text: &str, scale: i64) -> i64 {
    let chars = text.chars().count() as i64;
    if chars == 0 {
        return 0;
    }
    chars * 6 * scale - scale
}

/// Horizontal text with its top-left corner at (x, y). Characters with no
/// glyph render as blanks.
fn draw_text(img: &mut RgbImage, text: &str, x: i64, y: i64, scale: i64, color: Rgb<u8>) {
    for (i, c) in text.chars().enumerate() {
        let Some(rows) = glyph(c) else { continue };
        let cx = x + i as i64 * 6 * scale;
        blit_glyph(img, &rows, scale, color, |gx, gy| (cx + gx, y + gy));
    }
}

/// Text rotated 90° counter-clockwise, reading bottom-to-top, with the
/// first character's baseline near (x, y).
fn draw_text_vertical(img: &mut RgbImage, text: &str, x: i64, y: i64, scale: i64, color: Rgb<u8>) {
    for (i, c) in text.chars().enumerate() {
        let Some(rows) = glyph(c) else { continue };
        let cy = y - i as i64 * 6 * scale;
        blit_glyph(img, &rows, scale, color, |gx, gy| (x + gy, cy - gx));
    }
}

fn blit_glyph(
    img: &mut RgbImage,
    rows: &[u8; 7],
    scale: i64,
    color: Rgb<u8>,
    map: impl Fn(i64, i64) -> (i64, i64),
) {
    for (row_idx, row) in rows.iter().enumerate() {
        for bit in 0..5 {
            if row & (1 << (4 - bit)) == 0 {
                continue;
            }
            for sy in 0..scale {
                for sx in 0..scale {
                    let (px, py) = map(bit as i64 * scale + sx, row_idx as i64 * scale + sy);
                    put(img, px, py, color);
                }
            }
        }
    }
}
