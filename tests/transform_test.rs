//! Round-trip and convolution checks for the number-theoretic transforms.

mod common;

use screen_match::{MatchError, ModulusImage};
use screen_match::ntt::{
    Element, MODULUS, forward_transform_1d, forward_transform_2d, inverse_transform_1d,
    inverse_transform_2d,
};

fn mul(a: Element, b: Element) -> Element {
    (a as u64 * b as u64 % MODULUS) as Element
}

#[test]
fn round_trip_1d_every_length() -> anyhow::Result<()> {
    let mut rng = common::rng();
    for log2_size in 0..=12u32 {
        let original = common::random_elements(&mut rng, 1 << log2_size);
        let mut buffer = original.clone();
        forward_transform_1d(&mut buffer, 0, 1, log2_size)?;
        inverse_transform_1d(&mut buffer, 0, 1, log2_size)?;
        assert_eq!(buffer, original, "round trip failed for 2^{log2_size}");
    }
    Ok(())
}

#[test]
fn round_trip_1d_column_of_a_matrix() -> anyhow::Result<()> {
    let mut rng = common::rng();
    let (width, log2_height) = (16usize, 6u32);
    let original = common::random_elements(&mut rng, width << log2_height);
    let mut buffer = original.clone();
    for column in 0..width {
        forward_transform_1d(&mut buffer, column, width, log2_height)?;
    }
    for column in (0..width).rev() {
        inverse_transform_1d(&mut buffer, column, width, log2_height)?;
    }
    assert_eq!(buffer, original);
    Ok(())
}

#[test]
fn round_trip_2d_512() -> anyhow::Result<()> {
    common::init_logging();
    let mut rng = common::rng();
    let original = common::random_elements(&mut rng, 512 * 512);
    let mut image = ModulusImage::from_pixels(512, 512, original.clone())?;
    forward_transform_2d(&mut image)?;
    inverse_transform_2d(&mut image)?;
    assert_eq!(image.pixels(), original.as_slice());
    Ok(())
}

#[test]
fn pointwise_product_is_cyclic_convolution_1d() -> anyhow::Result<()> {
    let mut rng = common::rng();
    let n = 16usize;
    let a = common::random_elements(&mut rng, n);
    let b = common::random_elements(&mut rng, n);

    let mut expected = vec![0 as Element; n];
    for i in 0..n {
        for j in 0..n {
            let k = (i + j) % n;
            expected[k] = ((expected[k] as u64 + mul(a[i], b[j]) as u64) % MODULUS) as Element;
        }
    }

    let (mut fa, mut fb) = (a.clone(), b.clone());
    forward_transform_1d(&mut fa, 0, 1, 4)?;
    forward_transform_1d(&mut fb, 0, 1, 4)?;
    let mut product: Vec<Element> = fa.iter().zip(&fb).map(|(&x, &y)| mul(x, y)).collect();
    inverse_transform_1d(&mut product, 0, 1, 4)?;
    assert_eq!(product, expected);
    Ok(())
}

#[test]
fn pointwise_product_is_cyclic_convolution_2d() -> anyhow::Result<()> {
    let mut rng = common::rng();
    let (width, height) = (8usize, 4usize);
    let a = common::random_elements(&mut rng, width * height);
    let b = common::random_elements(&mut rng, width * height);

    let mut expected = vec![0 as Element; width * height];
    for ay in 0..height {
        for ax in 0..width {
            for by in 0..height {
                for bx in 0..width {
                    let k = ((ay + by) % height) * width + (ax + bx) % width;
                    let term = mul(a[ay * width + ax], b[by * width + bx]);
                    expected[k] = ((expected[k] as u64 + term as u64) % MODULUS) as Element;
                }
            }
        }
    }

    let mut fa = ModulusImage::from_pixels(width, height, a)?;
    let mut fb = ModulusImage::from_pixels(width, height, b)?;
    forward_transform_2d(&mut fa)?;
    forward_transform_2d(&mut fb)?;
    let product = fa.pixels().iter().zip(fb.pixels()).map(|(&x, &y)| mul(x, y)).collect();
    let mut product = ModulusImage::from_pixels(width, height, product)?;
    inverse_transform_2d(&mut product)?;
    assert_eq!(product.pixels(), expected.as_slice());
    Ok(())
}

#[test]
fn values_past_the_modulus_never_reach_the_butterflies() -> anyhow::Result<()> {
    let mut lane: Vec<Element> = vec![0, 65535];
    let err = forward_transform_1d(&mut lane, 0, 1, 1).unwrap_err();
    assert!(matches!(err, MatchError::OutOfField { index: 1, value: 65535 }));
    assert!(inverse_transform_1d(&mut lane, 0, 1, 1).is_err());

    let mut image = ModulusImage::zeroed(2, 2)?;
    image.set(1, 0, 65535);
    assert_eq!(image.get(1, 0), 65535 - MODULUS as Element);
    let original = image.clone();
    forward_transform_2d(&mut image)?;
    inverse_transform_2d(&mut image)?;
    assert_eq!(image, original);
    Ok(())
}
