//! Resize pipeline regression test
//!
//! Runs whole frames through `resize_frame` and checks the stream-level
//! properties of the output: geometry, pixel count, terminal marker,
//! bilinear accuracy against a floating-point reference, saturation, and
//! agreement between the inline and threaded executors.

use streamscale_core::{GrayImage, ScaleFactor, StreamFormat};
use streamscale_io::{config_words, pack_frame, unpack_frame};
use streamscale_stream::{
    Execution, FrameOutput, PipelineOptions, StreamError, StreamResult, from_iter, resize_frame,
};
use streamscale_test::{RegParams, reference, synth};

const STEPS: [f64; 6] = [1.25, 1.5, 2.0, 2.5, 3.0, 3.75];

fn run(
    image: &GrayImage,
    step: f64,
    format: StreamFormat,
    options: &PipelineOptions,
) -> StreamResult<FrameOutput> {
    let scale = ScaleFactor::from_step(step).unwrap();
    let mut config = from_iter(config_words(image.geometry(), scale));
    let mut pixels = from_iter(pack_frame(image, format.input_pixels()).unwrap());
    resize_frame(&mut config, &mut pixels, format, options)
}

fn decode(out: &FrameOutput, format: StreamFormat) -> GrayImage {
    unpack_frame(
        &out.pixels,
        format.output_pixels(),
        out.context.derived.new_width,
        out.context.derived.new_height,
    )
    .unwrap()
}

#[test_log::test]
fn resize_geometry_reg() {
    let mut rp = RegParams::new("resize_geometry");
    let format = StreamFormat::default();

    for (w, h) in [(640, 480), (33, 17), (40, 9), (7, 5)] {
        let src = synth::gradient(w, h).unwrap();
        for step in STEPS {
            let out = run(&src, step, format, &PipelineOptions::default()).unwrap();
            let d = out.context.derived;
            rp.compare_values((f64::from(w) / step).floor(), f64::from(d.new_width), 0.0);
            rp.compare_values((f64::from(h) / step).floor(), f64::from(d.new_height), 0.0);
            rp.compare_values(f64::from(d.new_width), f64::from(out.config[0].data), 0.0);
            rp.compare_values(f64::from(d.new_height), f64::from(out.config[1].data), 0.0);
        }
    }

    assert!(rp.cleanup(), "resize_geometry regression test failed");
}

#[test_log::test]
fn resize_stream_reg() {
    let mut rp = RegParams::new("resize_stream");

    let formats = [
        StreamFormat::default(),
        StreamFormat::new(5, 3, 7).unwrap(),
        StreamFormat::new(8, 16, 16).unwrap(),
        StreamFormat::new(1, 1, 4).unwrap(),
    ];
    for format in formats {
        for (w, h) in [(33, 17), (40, 9), (16, 16)] {
            let src = synth::noise(w, h, w * h).unwrap();
            for step in STEPS {
                let out = run(&src, step, format, &PipelineOptions::default()).unwrap();
                let total = out.context.derived.output_pixels();
                let words = total.div_ceil(u64::from(format.output_pixels()));

                // Every output pixel arrives exactly once
                rp.compare_values(words as f64, out.pixels.len() as f64, 0.0);

                // Exactly one terminal marker, on the final word
                let markers = out.pixels.iter().filter(|w| w.last).count();
                rp.compare_values(1.0, markers as f64, 0.0);
                rp.compare_values(
                    1.0,
                    out.pixels.last().map_or(0.0, |w| f64::from(u8::from(w.last))),
                    0.0,
                );
            }
        }
    }

    assert!(rp.cleanup(), "resize_stream regression test failed");
}

#[test_log::test]
fn resize_bilinear_reg() {
    let mut rp = RegParams::new("resize_bilinear");
    let format = StreamFormat::default();

    // 4x4 at step 2 samples the even pixels exactly
    let src = GrayImage::from_vec(
        4,
        4,
        vec![
            10, 20, 30, 40, //
            50, 60, 70, 80, //
            90, 100, 110, 120, //
            130, 140, 150, 160,
        ],
    )
    .unwrap();
    let out = run(&src, 2.0, format, &PipelineOptions::default()).unwrap();
    let out = decode(&out, format);
    let expected = GrayImage::from_vec(2, 2, vec![10, 30, 90, 110]).unwrap();
    rp.compare_images(&expected, &out);

    // Integer and half-pixel positions against the float reference
    for (w, h) in [(40, 30), (33, 21)] {
        for src in [
            synth::gradient(w, h).unwrap(),
            synth::checkerboard(w, h, 3).unwrap(),
            synth::noise(w, h, 11).unwrap(),
        ] {
            for step in [1.5, 2.0] {
                let out = run(&src, step, format, &PipelineOptions::default()).unwrap();
                let out = decode(&out, format);
                let want = reference::resize_bilinear(&src, step).unwrap();
                rp.compare_images_within(&want, &out, 1);
            }
        }
    }

    assert!(rp.cleanup(), "resize_bilinear regression test failed");
}

/// Sampling steps Q2.14 cannot hold exactly.
const INEXACT_STEPS: [f64; 8] = [1.3, 1.7, 2.11, 2.3, 2.7, 3.3, 3.41, 3.98];

/// The step the datapath actually uses after quantization.
fn quantized(step: f64) -> f64 {
    ScaleFactor::from_step(step).unwrap().scale().to_f64()
}

#[test_log::test]
fn resize_bilinear_wide_reg() {
    let mut rp = RegParams::new("resize_bilinear_wide");
    let format = StreamFormat::default();

    // Coordinates are truncated to 1/256 pixel per axis, so the result may
    // drift by up to 3 levels from the exact sample.
    for (w, h) in [(300, 5), (640, 480)] {
        let src = synth::noise(w, h, w + h).unwrap();
        for step in INEXACT_STEPS {
            let out = run(&src, step, format, &PipelineOptions::default()).unwrap();
            let out = decode(&out, format);
            let want = reference::resize_bilinear(&src, quantized(step)).unwrap();
            rp.compare_images_within(&want, &out, 3);
        }
    }

    // A single wide row band through every word layout
    let formats = [
        StreamFormat::default(),
        StreamFormat::new(5, 3, 7).unwrap(),
        StreamFormat::new(8, 16, 16).unwrap(),
        StreamFormat::new(1, 1, 4).unwrap(),
    ];
    let src = synth::noise(255, 3, 17).unwrap();
    let want = reference::resize_bilinear(&src, quantized(1.7)).unwrap();
    for format in formats {
        let out = run(&src, 1.7, format, &PipelineOptions::default()).unwrap();
        rp.compare_images_within(&want, &decode(&out, format), 3);
    }

    assert!(rp.cleanup(), "resize_bilinear_wide regression test failed");
}

#[test_log::test]
fn resize_saturation_reg() {
    let mut rp = RegParams::new("resize_saturation");
    let format = StreamFormat::default();

    let white = GrayImage::from_fn(37, 23, |_, _| 255).unwrap();
    for step in STEPS {
        let out = run(&white, step, format, &PipelineOptions::default()).unwrap();
        let out = decode(&out, format);
        let min = out.as_slice().iter().copied().min().unwrap_or(0);
        rp.compare_values(255.0, f64::from(min), 0.0);
    }

    assert!(rp.cleanup(), "resize_saturation regression test failed");
}

#[test_log::test]
fn resize_identity_reg() {
    let mut rp = RegParams::new("resize_identity");

    let formats = [
        StreamFormat::default(),
        StreamFormat::new(5, 3, 16).unwrap(),
        StreamFormat::new(1, 16, 16).unwrap(),
        StreamFormat::new(16, 1, 16).unwrap(),
        StreamFormat::new(7, 7, 16).unwrap(),
    ];
    for format in formats {
        for (w, h) in [(33, 3), (16, 4), (1, 1), (5, 7)] {
            let src = synth::noise(w, h, 3).unwrap();
            for execution in [Execution::Inline, Execution::Threaded] {
                let options = PipelineOptions::default().with_execution(execution);
                let out = run(&src, 1.0, format, &options).unwrap();
                rp.compare_images(&src, &decode(&out, format));
                let markers = out.pixels.iter().filter(|w| w.last).count();
                rp.compare_values(1.0, markers as f64, 0.0);
            }
        }
    }

    assert!(rp.cleanup(), "resize_identity regression test failed");
}

#[test_log::test]
fn resize_executors_reg() {
    let mut rp = RegParams::new("resize_executors");

    for format in [StreamFormat::default(), StreamFormat::new(3, 5, 8).unwrap()] {
        let src = synth::noise(50, 20, 99).unwrap();
        for step in STEPS {
            let inline = run(&src, step, format, &PipelineOptions::default()).unwrap();
            for depth in [1, 2, 8] {
                let options = PipelineOptions::threaded().with_channel_depth(depth);
                let threaded = run(&src, step, format, &options).unwrap();
                rp.compare_values(1.0, f64::from(u8::from(inline == threaded)), 0.0);
            }
        }
    }

    assert!(rp.cleanup(), "resize_executors regression test failed");
}

#[test_log::test]
fn resize_consecutive_frames_reg() {
    let mut rp = RegParams::new("resize_frames");
    let format = StreamFormat::default();

    let first = synth::gradient(24, 12).unwrap();
    let second = synth::checkerboard(18, 18, 2).unwrap();
    let mut config = from_iter(
        config_words(first.geometry(), ScaleFactor::from_step(2.0).unwrap())
            .into_iter()
            .chain(config_words(second.geometry(), ScaleFactor::from_step(1.5).unwrap())),
    );
    let mut pixels = from_iter(
        pack_frame(&first, 16)
            .unwrap()
            .into_iter()
            .chain(pack_frame(&second, 16).unwrap()),
    );

    let options = PipelineOptions::default();
    let a = resize_frame(&mut config, &mut pixels, format, &options).unwrap();
    let b = resize_frame(&mut config, &mut pixels, format, &options).unwrap();
    rp.compare_images(&reference::resize_bilinear(&first, 2.0).unwrap(), &decode(&a, format));
    rp.compare_images_within(
        &reference::resize_bilinear(&second, 1.5).unwrap(),
        &decode(&b, format),
        1,
    );

    assert!(rp.cleanup(), "resize_frames regression test failed");
}

#[test_log::test]
fn resize_short_input_reg() {
    let format = StreamFormat::default();
    let src = synth::gradient(32, 8).unwrap();
    let scale = ScaleFactor::from_step(2.0).unwrap();

    for options in [PipelineOptions::default(), PipelineOptions::threaded()] {
        let mut words = pack_frame(&src, 16).unwrap();
        words.truncate(words.len() - 3);
        let err = resize_frame(
            &mut from_iter(config_words(src.geometry(), scale)),
            &mut from_iter(words),
            format,
            &options,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            StreamError::UnexpectedEndOfStream { stage: "unpack" }
        ));
    }

    let err = resize_frame(
        &mut from_iter(config_words(src.geometry(), scale).into_iter().take(2)),
        &mut from_iter(pack_frame(&src, 16).unwrap()),
        format,
        &PipelineOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        StreamError::UnexpectedEndOfStream { stage: "config" }
    ));
}
