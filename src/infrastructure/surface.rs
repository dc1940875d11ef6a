// Offscreen chart surface backed by a plotters bitmap
use crate::domain::chart::{
    bar_rects, grid_lines, heatmap_cells, prepare_render_data, ChartDimensions, ChartKind,
};
use crate::domain::sample::Sample;
use crate::domain::viewport::Viewport;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use plotters_bitmap::BitMapBackendError;
use thiserror::Error;

const BACKGROUND: RGBColor = RGBColor(250, 250, 250);
const GRID_COLOR: RGBColor = RGBColor(224, 224, 224);
const SCATTER_RADIUS: i32 = 3;
const LINE_STROKE_WIDTH: u32 = 2;

#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("chart draw failed: {0}")]
    Draw(String),
}

impl SurfaceError {
    fn draw(err: DrawingAreaErrorKind<BitMapBackendError>) -> Self {
        SurfaceError::Draw(format!("{err:?}"))
    }
}

/// Everything one chart needs for a single frame.
pub struct ChartFrame<'a> {
    pub kind: ChartKind,
    pub samples: &'a [Sample],
    pub dims: &'a ChartDimensions,
    pub viewport: &'a Viewport,
    pub color: (u8, u8, u8),
    pub show_grid: bool,
}

/// Owned RGB pixel buffer drawn through `BitMapBackend`; no window system
/// involved.
pub struct ChartSurface {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

fn px(v: f64) -> i32 {
    v.round() as i32
}

impl ChartSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0u8; width as usize * height as usize * 3],
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Draws one frame. An empty sample sequence clears the surface and does
    /// no further work.
    pub fn render(&mut self, frame: &ChartFrame<'_>) -> Result<(), SurfaceError> {
        let area = BitMapBackend::with_buffer(&mut self.pixels, (self.width, self.height))
            .into_drawing_area();
        area.fill(&BACKGROUND).map_err(SurfaceError::draw)?;

        if frame.samples.is_empty() {
            area.present().map_err(SurfaceError::draw)?;
            return Ok(());
        }

        if frame.show_grid {
            for (start, end) in grid_lines(frame.dims) {
                area.draw(&PathElement::new(
                    vec![(px(start.0), px(start.1)), (px(end.0), px(end.1))],
                    GRID_COLOR.stroke_width(1),
                ))
                .map_err(SurfaceError::draw)?;
            }
        }

        let (r, g, b) = frame.color;
        let color = RGBColor(r, g, b);
        let render = prepare_render_data(frame.samples, frame.dims);

        match frame.kind {
            ChartKind::Line => {
                // The viewport applies in screen space, after pixel mapping.
                let path: Vec<(i32, i32)> = render
                    .points
                    .iter()
                    .map(|p| {
                        let (x, y) = frame.viewport.apply(p.x, p.y);
                        (px(x), px(y))
                    })
                    .collect();
                area.draw(&PathElement::new(path, color.stroke_width(LINE_STROKE_WIDTH)))
                    .map_err(SurfaceError::draw)?;
            }
            ChartKind::Bar => {
                for bar in bar_rects(&render, frame.dims) {
                    area.draw(&Rectangle::new(
                        [
                            (px(bar.x), px(bar.y)),
                            (px(bar.x + bar.width), px(bar.y + bar.height)),
                        ],
                        color.filled(),
                    ))
                    .map_err(SurfaceError::draw)?;
                }
            }
            ChartKind::Scatter => {
                for point in &render.points {
                    area.draw(&Circle::new(
                        (px(point.x), px(point.y)),
                        SCATTER_RADIUS,
                        color.filled(),
                    ))
                    .map_err(SurfaceError::draw)?;
                }
            }
            ChartKind::Heatmap => {
                for cell in heatmap_cells(frame.samples, frame.dims) {
                    let fill = HSLColor(cell.hue / 360.0, 0.7, 0.5);
                    area.draw(&Rectangle::new(
                        [
                            (px(cell.x), px(cell.y)),
                            (px(cell.x + cell.width), px(cell.y + cell.height)),
                        ],
                        fill.filled(),
                    ))
                    .map_err(SurfaceError::draw)?;
                }
            }
        }

        area.present().map_err(SurfaceError::draw)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(ts: i64, value: f64) -> Sample {
        Sample::new(ts, value, "temperature".to_string())
    }

    fn is_background(pixels: &[u8]) -> bool {
        pixels
            .chunks(3)
            .all(|p| p == [BACKGROUND.0, BACKGROUND.1, BACKGROUND.2])
    }

    fn frame<'a>(
        kind: ChartKind,
        samples: &'a [Sample],
        dims: &'a ChartDimensions,
        viewport: &'a Viewport,
    ) -> ChartFrame<'a> {
        ChartFrame {
            kind,
            samples,
            dims,
            viewport,
            color: (239, 68, 68),
            show_grid: true,
        }
    }

    #[test]
    fn test_empty_input_clears_surface() {
        let dims = ChartDimensions::default();
        let viewport = Viewport::new();
        let mut surface = ChartSurface::new(800, 400);
        surface
            .render(&frame(ChartKind::Line, &[], &dims, &viewport))
            .unwrap();
        assert!(is_background(surface.pixels()));
    }

    #[test]
    fn test_line_render_marks_pixels() {
        let dims = ChartDimensions::default();
        let viewport = Viewport::new();
        let samples: Vec<Sample> = (0..50).map(|i| sample(i * 1_000, i as f64)).collect();
        let mut surface = ChartSurface::new(800, 400);
        surface
            .render(&frame(ChartKind::Line, &samples, &dims, &viewport))
            .unwrap();
        assert!(!is_background(surface.pixels()));
    }

    #[test]
    fn test_every_kind_renders() {
        let dims = ChartDimensions::default();
        let viewport = Viewport::new();
        let samples: Vec<Sample> = (0..100).map(|i| sample(i * 500, (i % 37) as f64)).collect();
        for kind in [
            ChartKind::Line,
            ChartKind::Bar,
            ChartKind::Scatter,
            ChartKind::Heatmap,
        ] {
            let mut surface = ChartSurface::new(800, 400);
            surface.render(&frame(kind, &samples, &dims, &viewport)).unwrap();
            assert!(!is_background(surface.pixels()));
        }
    }

    #[test]
    fn test_single_sample_degenerate_ranges() {
        let dims = ChartDimensions::default();
        let viewport = Viewport::new();
        let samples = vec![sample(1_000, 5.0)];
        for kind in [ChartKind::Line, ChartKind::Bar, ChartKind::Scatter] {
            let mut surface = ChartSurface::new(800, 400);
            surface.render(&frame(kind, &samples, &dims, &viewport)).unwrap();
        }
    }

    #[test]
    fn test_surface_size() {
        let surface = ChartSurface::new(640, 480);
        assert_eq!(surface.size(), (640, 480));
        assert_eq!(surface.pixels().len(), 640 * 480 * 3);
    }
}
