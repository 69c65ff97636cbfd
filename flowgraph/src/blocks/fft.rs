use crate::block::{Block, BlockError, ProcessContext};
use std::f32::consts::PI;

/// Magnitude spectrum of the input chunk.
///
/// The input is zero-padded to the next power of two `n`; the output holds
/// `n / 2 + 1` bins scaled by `1 / n`.
pub struct FftBlock {
    name: String,
    type_name: String,
}

impl FftBlock {
    pub const TYPE_NAME: &'static str = "FFT";

    pub fn new(name: &str, type_name: &str) -> Self {
        Self {
            name: name.to_string(),
            type_name: type_name.to_string(),
        }
    }
}

impl Block for FftBlock {
    fn name(&self) -> &str {
        &self.name
    }

    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn process(
        &mut self,
        _ctx: &ProcessContext,
        inputs: &[&[f32]],
        outputs: &mut [Vec<f32>],
    ) -> Result<(), BlockError> {
        let Some(out) = outputs.first_mut() else {
            return Ok(());
        };
        let samples = inputs.first().copied().unwrap_or(&[]);
        out.extend(magnitude_spectrum(samples));
        Ok(())
    }
}

pub fn magnitude_spectrum(samples: &[f32]) -> Vec<f32> {
    if samples.is_empty() {
        return Vec::new();
    }
    let n = samples.len().next_power_of_two();
    let mut re: Vec<f32> = samples.iter().copied().chain(std::iter::repeat(0.0)).take(n).collect();
    let mut im = vec![0.0f32; n];
    fft_in_place(&mut re, &mut im);
    (0..=n / 2)
        .map(|k| (re[k] * re[k] + im[k] * im[k]).sqrt() / n as f32)
        .collect()
}

// Iterative radix-2 Cooley-Tukey; `re.len()` must be a power of two.
fn fft_in_place(re: &mut [f32], im: &mut [f32]) {
    let n = re.len();
    let mut j = 0;
    for i in 1..n {
        let mut bit = n >> 1;
        while j & bit != 0 {
            j ^= bit;
            bit >>= 1;
        }
        j |= bit;
        if i < j {
            re.swap(i, j);
            im.swap(i, j);
        }
    }

    let mut len = 2;
    while len <= n {
        let angle = -2.0 * PI / len as f32;
        let (w_re, w_im) = (angle.cos(), angle.sin());
        for start in (0..n).step_by(len) {
            let (mut cur_re, mut cur_im) = (1.0f32, 0.0f32);
            for k in 0..len / 2 {
                let a = start + k;
                let b = a + len / 2;
                let t_re = re[b] * cur_re - im[b] * cur_im;
                let t_im = re[b] * cur_im + im[b] * cur_re;
                re[b] = re[a] - t_re;
                im[b] = im[a] - t_im;
                re[a] += t_re;
                im[a] += t_im;
                let next_re = cur_re * w_re - cur_im * w_im;
                cur_im = cur_re * w_im + cur_im * w_re;
                cur_re = next_re;
            }
        }
        len <<= 1;
    }
}
