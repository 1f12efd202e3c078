use candle_core::{Device, Tensor, DType};
use coursedb_embed::masked_mean;

#[test]
fn masked_mean_skips_padding() {
    let dev = Device::Cpu;
    // Two tokens with hidden dim 4; second token is masked out.
    let h = Tensor::from_slice(&[1.0f32, 2.0, 3.0, 4.0,  // token 0
                                 5.0, 6.0, 7.0, 8.0],    // token 1
                               (1, 2, 4), &dev).unwrap();
    let mask = Tensor::from_slice(&[1i64, 0i64], (1, 2), &dev).unwrap()
        .to_dtype(DType::F32).unwrap();
    let out = masked_mean(&h, &mask).unwrap();
    let v: Vec<Vec<f32>> = out.to_vec2().unwrap();
    // Mean over unmasked tokens = first token, left un-normalized
    for (a, b) in v[0].iter().cloned().zip([1.0f32, 2.0, 3.0, 4.0]) {
        assert!((a - b).abs() < 1e-5, "a={} b={}", a, b);
    }
}

#[test]
fn masked_mean_averages_each_row() {
    let dev = Device::Cpu;
    let h = Tensor::from_slice(&[1.0f32, 1.0,  3.0, 5.0,
                                 2.0, 4.0,  9.0, 9.0],
                               (2, 2, 2), &dev).unwrap();
    let mask = Tensor::from_slice(&[1u32, 1, 1, 0], (2, 2), &dev).unwrap();
    let v: Vec<Vec<f32>> = masked_mean(&h, &mask).unwrap().to_vec2().unwrap();
    assert_eq!(v.len(), 2);
    assert!((v[0][0] - 2.0).abs() < 1e-6 && (v[0][1] - 3.0).abs() < 1e-6);
    assert!((v[1][0] - 2.0).abs() < 1e-6 && (v[1][1] - 4.0).abs() < 1e-6);
}

#[test]
fn rejects_non_3d_hidden() {
    let dev = Device::Cpu;
    let h = Tensor::zeros((2, 4), DType::F32, &dev).unwrap();
    let mask = Tensor::ones((2, 1), DType::F32, &dev).unwrap();
    assert!(masked_mean(&h, &mask).is_err());
}
