//! Seeded 2-D toy datasets with labels in {-1, 1}, each stored as a
//! one-element label vector.

use std::f64::consts::PI;

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::data::dataset::Dataset;

fn uniform(rng: &mut StdRng, a: f64, b: f64) -> f64 {
    rng.gen::<f64>() * (b - a) + a
}

fn push(data: &mut Dataset, x: f64, y: f64, label: f64) {
    data.inputs.push(vec![x, y]);
    data.labels.push(vec![label]);
}

/// Points inside a disc of radius 2.5 (label 1) and in a ring between 3.5
/// and 5 (label -1). `noise` jitters the point used to decide the label.
pub fn circle(num_samples: usize, noise: f64, seed: u64) -> Dataset {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut data = Dataset::default();
    let radius = 5.0;
    let label_of = |x: f64, y: f64| if (x * x + y * y).sqrt() < radius * 0.5 { 1.0 } else { -1.0 };

    let inner = num_samples / 2;
    for (count, r_min, r_max) in [(inner, 0.0, radius * 0.5), (num_samples - inner, radius * 0.7, radius)] {
        for _ in 0..count {
            let r = uniform(&mut rng, r_min, r_max);
            let angle = uniform(&mut rng, 0.0, 2.0 * PI);
            let x = r * angle.sin();
            let y = r * angle.cos();
            let noise_x = uniform(&mut rng, -radius, radius) * noise;
            let noise_y = uniform(&mut rng, -radius, radius) * noise;
            push(&mut data, x, y, label_of(x + noise_x, y + noise_y));
        }
    }
    data
}

/// Two nested heart outlines: the outer one labelled -1, the inner one 1.
/// Points alternate outer, inner; an odd count adds one more outer point.
pub fn heart(num_samples: usize, noise: f64, seed: u64) -> Dataset {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut data = Dataset::default();
    let polar_heart = |t: f64| {
        let t = t + PI / 2.0;
        (t.sin() * t.cos().abs().sqrt()) / (t.sin() + 7.0 / 5.0) - 2.0 * t.sin() + 2.0
    };

    let half = num_samples / 2;
    let step = 2.0 * PI / half.max(1) as f64;
    let outer = |data: &mut Dataset, rng: &mut StdRng, t: f64| {
        let r = polar_heart(t);
        let x = 2.25 * r * t.sin() + uniform(rng, -1.0, 1.0) * noise;
        let y = 3.75 + 2.25 * r * t.cos() + uniform(rng, -1.0, 1.0) * noise;
        push(data, x, y, -1.0);
    };
    for i in 0..half {
        let t = i as f64 * step;
        outer(&mut data, &mut rng, t);
        let r = polar_heart(t);
        let x = 2.25 * (r - 0.5) * t.sin() + uniform(&mut rng, -1.0, 1.0) * noise;
        let y = 3.5 + 2.25 * (r - 0.6) * t.cos() + uniform(&mut rng, -1.0, 1.0) * noise;
        push(&mut data, x, y, 1.0);
    }
    if num_samples % 2 == 1 {
        outer(&mut data, &mut rng, step / 2.0);
    }
    data
}

/// Points in [-5, 5]² pushed away from the axes; label 1 when the
/// (jittered) coordinates share a sign.
pub fn xor(num_samples: usize, noise: f64, seed: u64) -> Dataset {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut data = Dataset::default();
    let padding = 0.3;
    let pad = |v: f64| if v > 0.0 { v + padding } else { v - padding };

    for _ in 0..num_samples {
        let x = pad(uniform(&mut rng, -5.0, 5.0));
        let y = pad(uniform(&mut rng, -5.0, 5.0));
        let noise_x = uniform(&mut rng, -5.0, 5.0) * noise;
        let noise_y = uniform(&mut rng, -5.0, 5.0) * noise;
        let label = if (x + noise_x) * (y + noise_y) >= 0.0 { 1.0 } else { -1.0 };
        push(&mut data, x, y, label);
    }
    data
}
