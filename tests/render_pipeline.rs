use std::fs;
use std::path::PathBuf;

use fnplot::{
    expr,
    render::{self, Config},
};

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(name)
}

#[test]
fn curve_renders_and_encodes() {
    let program = expr::compile("x^2").unwrap();
    let canvas = render::render(&program, &Config::default()).unwrap();
    assert_eq!(canvas.width(), 300);
    assert_eq!(canvas.height(), 300);

    let path = temp_path("fnplot_curve_e2e.png");
    let image = image::RgbImage::from_raw(canvas.width(), canvas.height(), canvas.data()).unwrap();
    image.save(&path).unwrap();

    let reopened = image::open(&path).unwrap().to_rgb8();
    fs::remove_file(&path).unwrap();

    assert_eq!(reopened.dimensions(), (300, 300));

    let blue = image::Rgb([0u8, 0, 255]);
    let white = image::Rgb([255u8, 255, 255]);

    // x^2 passes through the origin: bottom-left pixel is on the curve
    assert_eq!(*reopened.get_pixel(0, 299), blue);
    // and climbs to the top-right corner by x = 1
    assert_eq!(*reopened.get_pixel(299, 0), blue);

    // everything else is background or curve, nothing in between
    for (_, _, px) in reopened.enumerate_pixels() {
        assert!(*px == blue || *px == white);
    }
}

#[test]
fn surface_renders_and_encodes() {
    let program = expr::compile("x*y").unwrap();
    let canvas = render::render(&program, &Config::default()).unwrap();

    let path = temp_path("fnplot_surface_e2e.png");
    let image = image::RgbImage::from_raw(canvas.width(), canvas.height(), canvas.data()).unwrap();
    image.save(&path).unwrap();

    let reopened = image::open(&path).unwrap().to_rgb8();
    fs::remove_file(&path).unwrap();

    assert_eq!(reopened.dimensions(), (300, 300));

    // the product is minimal along the x=0 edge and maximal at (1,1):
    // red at the bottom-left corner, blue at the top-right
    assert_eq!(*reopened.get_pixel(0, 299), image::Rgb([255u8, 0, 0]));
    assert_eq!(*reopened.get_pixel(299, 0), image::Rgb([0u8, 0, 255]));

    // the green channel stays dark across the whole gradient
    for (_, _, px) in reopened.enumerate_pixels() {
        assert_eq!(px.0[1], 0);
    }
}

#[test]
fn surface_needs_square_dimensions() {
    let program = expr::compile("x*y").unwrap();
    let cfg = Config::default().with_width(300).with_height(200);

    let err = render::render(&program, &cfg).unwrap_err();
    assert_eq!(
        err,
        render::Error::NonSquareCanvas {
            width: 300,
            height: 200
        }
    );
}

#[test]
fn unknown_extension_is_rejected_up_front() {
    // the CLI refuses the output path before compiling anything; this pins
    // the encoder lookup it relies on
    assert!(image::ImageFormat::from_path("plot.txt").is_err());
    assert!(image::ImageFormat::from_path("plot").is_err());
    assert!(image::ImageFormat::from_path("plot.png").is_ok());
    assert!(image::ImageFormat::from_path("plot.bmp").is_ok());
}

#[test]
fn malformed_expression_never_renders() {
    let err = expr::compile("k^2").map(|_| ()).unwrap_err();
    assert_eq!(err, expr::Error::UnknownName("k".to_string()));
}
