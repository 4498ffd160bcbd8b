//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use screen_match::PixelImage;
use screen_match::ntt::{Element, MODULUS};

pub const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn rng() -> StdRng {
    StdRng::seed_from_u64(0x5eed_f1e1d)
}

/// Uniformly random field elements.
pub fn random_elements(rng: &mut StdRng, len: usize) -> Vec<Element> {
    (0..len)
        .map(|_| rng.gen_range(0..MODULUS) as Element)
        .collect()
}

/// A solid canvas with white rectangles drawn at `(x, y, width, height)`.
pub fn canvas_with_blocks(width: u32, height: u32, blocks: &[(i32, i32, u32, u32)]) -> RgbaImage {
    let mut canvas = RgbaImage::from_pixel(width, height, BLACK);
    for &(x, y, w, h) in blocks {
        draw_filled_rect_mut(&mut canvas, Rect::at(x, y).of_size(w, h), WHITE);
    }
    canvas
}

/// Every pixel independently black or white.
pub fn noise(rng: &mut StdRng, width: u32, height: u32) -> PixelImage {
    let mut canvas = RgbaImage::from_pixel(width, height, BLACK);
    for pixel in canvas.pixels_mut() {
        if rng.gen_bool(0.5) {
            *pixel = WHITE;
        }
    }
    PixelImage::from(canvas)
}

pub fn solid(width: u32, height: u32, colour: Rgba<u8>) -> PixelImage {
    PixelImage::from(RgbaImage::from_pixel(width, height, colour))
}
