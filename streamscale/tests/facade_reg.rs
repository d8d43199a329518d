//! Facade regression test
//!
//! Drives the resizer through the re-exported paths only: core types at the
//! crate root, stages under `stream`, transport under `io`.

use streamscale::io::{config_words, pack_frame, unpack_frame};
use streamscale::stream::{PipelineOptions, from_iter, resize_frame};
use streamscale::{GrayImage, ScaleFactor, StreamFormat};
use streamscale_test::{RegParams, reference, synth};

#[test_log::test]
fn facade_reg() {
    let mut rp = RegParams::new("facade");

    let src = synth::checkerboard(48, 32, 8).unwrap();
    let format = StreamFormat::new(8, 2, 16).unwrap();
    let scale = ScaleFactor::from_step(2.0).unwrap();

    let mut config = from_iter(config_words(src.geometry(), scale));
    let mut pixels = from_iter(pack_frame(&src, format.input_pixels()).unwrap());
    let out = resize_frame(
        &mut config,
        &mut pixels,
        format,
        &PipelineOptions::threaded(),
    )
    .unwrap();

    rp.compare_values(24.0, f64::from(out.config[0].data), 0.0);
    rp.compare_values(16.0, f64::from(out.config[1].data), 0.0);
    rp.compare_values(1.0, f64::from(u8::from(out.config[1].last)), 0.0);

    let img: GrayImage = unpack_frame(&out.pixels, format.output_pixels(), 24, 16).unwrap();
    rp.compare_images(&reference::resize_bilinear(&src, 2.0).unwrap(), &img);

    assert!(rp.cleanup(), "facade regression test failed");
}
