use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::warn;

use fnplot::{expr, render};

/// Plot a mathematical expression to an image file.
///
/// Expressions in x alone trace a curve; expressions in x and y render a
/// red-to-blue heat map. The plotted domain is the unit square.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Output image path; the extension picks the format (e.g. plot.png)
    output: PathBuf,

    /// Expression to plot, e.g. "x^2" or "x*y"
    expression: String,
}

const COMPILE_HINT: &str = "expressions are written in terms of x and y only: \
                            use x for curves (\"x^2\"), or x and y together \
                            for surfaces (\"x*y\")";

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    // The extension names the encoder; check it before compiling anything,
    // so a bad path never gets as far as evaluation.
    image::ImageFormat::from_path(&args.output).with_context(|| {
        format!(
            "`{}` needs a recognized image extension, e.g. `plot.png`",
            args.output.display()
        )
    })?;

    if args.expression.contains('=') {
        bail!(
            "equations like \"y=x^2\" or \"z=x*y\" should be given as their \
             right-hand side: \"x^2\" or \"x*y\""
        );
    }

    let program = expr::compile(&args.expression).context(COMPILE_HINT)?;
    if program.uses_y() && !program.uses_x() {
        warn!("expression has no x; it still plots as a surface f(x,y)");
    }

    let cfg = render::Config::default();
    if cfg.width() > render::SOFT_DIMENSION_LIMIT || cfg.height() > render::SOFT_DIMENSION_LIMIT {
        warn!(
            "dimensions above {}px per side may misbehave; lower the resolution \
             if the render fails",
            render::SOFT_DIMENSION_LIMIT
        );
    }

    let canvas = render::render(&program, &cfg)?;

    let image = image::RgbImage::from_raw(canvas.width(), canvas.height(), canvas.data())
        .context("canvas bytes did not match the image dimensions")?;
    image
        .save(&args.output)
        .with_context(|| format!("failed to write `{}`", args.output.display()))?;

    println!("File {} successfully created.", args.output.display());
    Ok(())
}
