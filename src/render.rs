use thiserror::Error;

use crate::{
    canvas::{Canvas, Rgb},
    expr::{EvalContext, Program},
    grid::SampleGrid,
};

/// Samples evaluated per pixel column when tracing a curve. At one sample
/// per column a steep curve leaves visible horizontal gaps.
const CURVE_OVERSAMPLE: u32 = 50;

/// Side length above which renders are known to misbehave. Callers warn
/// but nothing enforces it.
pub const SOFT_DIMENSION_LIMIT: u32 = 1400;

#[derive(Error, Debug, PartialEq)]
pub enum Error {
    #[error(
        "expressions in x and y can only be plotted on a square canvas, not {width}x{height}"
    )]
    NonSquareCanvas { width: u32, height: u32 },

    #[error("expression is not finite at x={x}, y={y}")]
    NonFiniteSample { x: f64, y: f64 },
}

/// Render dimensions, in pixels.
#[derive(Debug, Clone)]
pub struct Config {
    width: u32,
    height: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            width: 300,
            height: 300,
        }
    }
}

impl Config {
    pub fn with_width(mut self, width: u32) -> Self {
        self.width = width;
        self
    }

    pub fn with_height(mut self, height: u32) -> Self {
        self.height = height;
        self
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

/// How a compiled expression gets plotted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotMode {
    /// `f(x)`: trace the curve in blue over a white background.
    Curve,
    /// `f(x,y)`: color every pixel by its normalized result.
    Surface,
}

impl PlotMode {
    /// Pick the mode from the variables the expression references, before
    /// any evaluation happens. Anything mentioning `y` plots as a surface,
    /// even without an `x`.
    pub fn classify(program: &Program) -> PlotMode {
        if program.uses_y() {
            PlotMode::Surface
        } else {
            PlotMode::Curve
        }
    }
}

/// Render `program` into a fresh canvas sized per `cfg`.
pub fn render(program: &Program, cfg: &Config) -> Result<Canvas, Error> {
    match PlotMode::classify(program) {
        PlotMode::Curve => Ok(render_curve(program, cfg)),
        PlotMode::Surface => render_surface(program, cfg),
    }
}

/// Trace `f(x)` over a white background, sampling `x` on
/// `CURVE_OVERSAMPLE * width` evenly spaced points covering `[0, 1)`.
fn render_curve(program: &Program, cfg: &Config) -> Canvas {
    let width = cfg.width();
    let height = cfg.height();

    let mut canvas = Canvas::new(width, height);
    canvas.fill(Rgb::white());

    let mut ctx = EvalContext::default();
    let steps = width * CURVE_OVERSAMPLE;
    for i in 0..steps {
        ctx.x = f64::from(i) / f64::from(steps);
        let result = program.eval(&ctx);

        // Results at or above 1 sit outside the window; NaN fails the
        // comparison and is dropped with them.
        if !(result < 1.0) {
            continue;
        }

        let x_pixel = (ctx.x * f64::from(width)).floor();
        let y_pixel = (result * f64::from(height)).floor();
        if x_pixel < 0.0 || x_pixel >= f64::from(width) {
            continue;
        }
        if y_pixel < 0.0 || y_pixel >= f64::from(height) {
            continue;
        }

        // Flip the row so results grow upward. Later samples overwrite
        // earlier ones at the same pixel.
        let row = (height - 1) as usize - y_pixel as usize;
        canvas.set(row, x_pixel as usize, Rgb::blue());
    }

    canvas
}

/// Color every pixel of an `f(x,y)` heat map. The grid cell `(i, j)`
/// evaluates at `x = i/height`, `y = j/width`; the two normalizations
/// coincide only on a square canvas, which is why squareness is a hard
/// precondition.
fn render_surface(program: &Program, cfg: &Config) -> Result<Canvas, Error> {
    let width = cfg.width();
    let height = cfg.height();

    if width != height {
        return Err(Error::NonSquareCanvas { width, height });
    }

    // Materialize the whole grid first: normalization needs the global
    // minimum and maximum before any pixel can be colored.
    let mut grid = SampleGrid::new(width, height);
    let mut ctx = EvalContext::default();
    for i in 0..width {
        for j in 0..height {
            ctx.x = f64::from(i) / f64::from(height);
            ctx.y = f64::from(j) / f64::from(width);

            let result = program.eval(&ctx);
            if !result.is_finite() {
                return Err(Error::NonFiniteSample { x: ctx.x, y: ctx.y });
            }

            grid.set(i as usize, j as usize, result);
        }
    }

    let (min, max) = grid.min_max();
    let range = max - min;

    let mut canvas = Canvas::new(width, height);
    for i in 0..width as usize {
        for j in 0..height as usize {
            // A flat surface has no range to normalize over; pin it to the
            // middle of the gradient.
            let p = if range > 0.0 {
                (grid.get(i, j) - min) / range
            } else {
                0.5
            };

            let row = (width as usize) - 1 - i;
            canvas.set(row, j, Rgb::gradient(p));
        }
    }

    Ok(canvas)
}
