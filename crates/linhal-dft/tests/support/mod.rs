//! A host-side reference backend: naive O(n²) 1-D transforms in f64.
//!
//! Serves the host device so the front-end can be exercised end to end
//! without a GPU. Multi-dimensional descriptors and in-place real
//! transforms are refused.

#![allow(dead_code)]

use linhal_common::{BackendInfo, Complex64, Device, Event, LinhalError, Queue, Result};
use linhal_dft::{
    DescriptorValues, DftArgs, DftBackend, DftData, DftDataMut, DftPlan, Direction, Domain,
};
use std::f64::consts::PI;
use std::sync::atomic::{AtomicUsize, Ordering};

pub const NAME: &str = "reference";

#[derive(Debug, Default)]
pub struct ReferenceBackend {
    commits: AtomicUsize,
    /// When set, plans refuse scale changes after commit.
    pub fixed_scales: bool,
}

impl ReferenceBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fixed_scales() -> Self {
        Self { fixed_scales: true, ..Self::default() }
    }

    pub fn commits(&self) -> usize {
        self.commits.load(Ordering::Relaxed)
    }
}

impl BackendInfo for ReferenceBackend {
    fn name(&self) -> &'static str {
        NAME
    }

    fn supports(&self, device: &Device) -> bool {
        device.is_host()
    }
}

impl DftBackend for ReferenceBackend {
    fn commit(&self, _queue: &Queue, values: &DescriptorValues) -> Result<Box<dyn DftPlan>> {
        if values.dimension() != 1 {
            return Err(LinhalError::unimplemented(
                "dft",
                "commit",
                format!("for {}-D transforms in the reference backend", values.dimension()),
            ));
        }
        self.commits.fetch_add(1, Ordering::Relaxed);
        let plan = ReferencePlan { values: values.clone() };
        if self.fixed_scales {
            Ok(Box::new(FixedScalePlan(plan)))
        } else {
            Ok(Box::new(plan))
        }
    }
}

/// Where the elements of one domain live.
#[derive(Debug, Clone, Copy)]
struct Placement {
    offset: usize,
    stride: usize,
    distance: usize,
}

impl Placement {
    fn new(strides: &[i64], distance: i64) -> Self {
        Self { offset: strides[0] as usize, stride: strides[1] as usize, distance: distance as usize }
    }

    fn index(&self, batch: usize, element: usize) -> usize {
        self.offset + batch * self.distance + element * self.stride
    }
}

struct ReferencePlan {
    values: DescriptorValues,
}

impl ReferencePlan {
    fn transform(&self, direction: Direction, args: DftArgs<'_>) -> Result<()> {
        let v = &self.values;
        let function = direction.as_str();
        if v.domain == Domain::Real && v.is_in_place() {
            return Err(LinhalError::unimplemented(
                "dft",
                function,
                "for in-place real transforms in the reference backend",
            ));
        }

        let n = v.lengths[0] as usize;
        let real = v.domain == Domain::Real;
        let spectrum = if real { n / 2 + 1 } else { n };
        let forward_domain = Placement::new(&v.input_strides(), v.fwd_distance);
        let backward_domain = Placement::new(&v.output_strides(), v.bwd_distance);
        let (from, to, in_count, out_count, sign, scale) = match direction {
            Direction::Forward => {
                (forward_domain, backward_domain, n, spectrum, -1.0, v.forward_scale)
            }
            Direction::Backward => {
                (backward_domain, forward_domain, spectrum, n, 1.0, v.backward_scale)
            }
        };

        let (input, mut sink) = split_args(args);
        let batches = v.number_of_transforms as usize;
        let mut results = Vec::with_capacity(batches * out_count);
        for b in 0..batches {
            let mut x = Vec::with_capacity(n);
            for j in 0..in_count {
                let i = from.index(b, j);
                x.push(*input.get(i).ok_or_else(|| too_short(function, "input", i))?);
            }
            if real && direction == Direction::Backward {
                for k in spectrum..n {
                    x.push(x[n - k].conj());
                }
            }
            for k in 0..out_count {
                let sum: Complex64 = x
                    .iter()
                    .enumerate()
                    .map(|(j, xj)| {
                        let angle = sign * 2.0 * PI * (j * k % n) as f64 / n as f64;
                        xj * Complex64::from_polar(1.0, angle)
                    })
                    .sum();
                results.push((to.index(b, k), sum * scale));
            }
        }
        for (i, value) in results {
            if !sink.store(i, value) {
                return Err(too_short(function, "output", i));
            }
        }
        Ok(())
    }
}

impl DftPlan for ReferencePlan {
    fn execute(
        &self,
        queue: &Queue,
        direction: Direction,
        args: DftArgs<'_>,
        dependencies: &[Event],
    ) -> Result<Event> {
        Ok(queue.submit(direction.as_str(), dependencies, || self.transform(direction, args)))
    }

    fn set_scale(&mut self, direction: Direction, scale: f64) -> Result<()> {
        match direction {
            Direction::Forward => self.values.forward_scale = scale,
            Direction::Backward => self.values.backward_scale = scale,
        }
        Ok(())
    }
}

/// Same transforms, but keeps the trait's default `set_scale`.
struct FixedScalePlan(ReferencePlan);

impl DftPlan for FixedScalePlan {
    fn execute(
        &self,
        queue: &Queue,
        direction: Direction,
        args: DftArgs<'_>,
        dependencies: &[Event],
    ) -> Result<Event> {
        self.0.execute(queue, direction, args, dependencies)
    }
}

fn too_short(function: &'static str, which: &str, index: usize) -> LinhalError {
    LinhalError::invalid_argument("dft", function, format!("{which} has no element {index}"))
}

fn read(data: &DftData<'_>) -> Vec<Complex64> {
    match data {
        DftData::F32(s) => s.iter().map(|&x| Complex64::new(f64::from(x), 0.0)).collect(),
        DftData::F64(s) => s.iter().map(|&x| Complex64::new(x, 0.0)).collect(),
        DftData::C32(s) => {
            s.iter().map(|c| Complex64::new(f64::from(c.re), f64::from(c.im))).collect()
        }
        DftData::C64(s) => s.to_vec(),
    }
}

fn read_mut(data: &DftDataMut<'_>) -> Vec<Complex64> {
    match data {
        DftDataMut::F32(s) => read(&DftData::F32(s)),
        DftDataMut::F64(s) => read(&DftData::F64(s)),
        DftDataMut::C32(s) => read(&DftData::C32(s)),
        DftDataMut::C64(s) => read(&DftData::C64(s)),
    }
}

fn zip_split(re: Vec<Complex64>, im: Vec<Complex64>) -> Vec<Complex64> {
    re.into_iter().zip(im).map(|(r, i)| Complex64::new(r.re, i.re)).collect()
}

/// Writes one logical complex element; real views keep the real part.
fn put(data: &mut DftDataMut<'_>, i: usize, value: f64, imag: Option<f64>) -> bool {
    match data {
        DftDataMut::F32(s) => s.get_mut(i).map(|x| *x = value as f32).is_some(),
        DftDataMut::F64(s) => s.get_mut(i).map(|x| *x = value).is_some(),
        DftDataMut::C32(s) => s
            .get_mut(i)
            .map(|x| {
                x.re = value as f32;
                x.im = imag.unwrap_or(0.0) as f32;
            })
            .is_some(),
        DftDataMut::C64(s) => s
            .get_mut(i)
            .map(|x| *x = Complex64::new(value, imag.unwrap_or(0.0)))
            .is_some(),
    }
}

enum Sink<'a> {
    Interleaved(DftDataMut<'a>),
    Split(DftDataMut<'a>, DftDataMut<'a>),
}

impl Sink<'_> {
    fn store(&mut self, i: usize, value: Complex64) -> bool {
        match self {
            Sink::Interleaved(data) => put(data, i, value.re, Some(value.im)),
            Sink::Split(re, im) => put(re, i, value.re, None) && put(im, i, value.im, None),
        }
    }
}

fn split_args(args: DftArgs<'_>) -> (Vec<Complex64>, Sink<'_>) {
    match args {
        DftArgs::InPlace { data } => (read_mut(&data), Sink::Interleaved(data)),
        DftArgs::InPlaceSplit { re, im } => {
            (zip_split(read_mut(&re), read_mut(&im)), Sink::Split(re, im))
        }
        DftArgs::OutOfPlace { input, output } => (read(&input), Sink::Interleaved(output)),
        DftArgs::OutOfPlaceSplit { input_re, input_im, output_re, output_im } => {
            (zip_split(read(&input_re), read(&input_im)), Sink::Split(output_re, output_im))
        }
    }
}

/// Naive forward DFT of `x`, unscaled.
pub fn naive_dft(x: &[Complex64]) -> Vec<Complex64> {
    let n = x.len();
    (0..n)
        .map(|k| {
            x.iter()
                .enumerate()
                .map(|(j, xj)| {
                    xj * Complex64::from_polar(1.0, -2.0 * PI * (j * k % n) as f64 / n as f64)
                })
                .sum()
        })
        .collect()
}

/// Deterministic test signal.
pub fn signal(n: usize) -> Vec<Complex64> {
    (0..n)
        .map(|i| {
            let t = i as f64;
            Complex64::new((0.37 * t).sin() + 0.25, (1.3 * t).cos() - 0.5 * (0.11 * t).sin())
        })
        .collect()
}

pub fn max_error(a: &[Complex64], b: &[Complex64]) -> f64 {
    assert_eq!(a.len(), b.len());
    a.iter().zip(b).map(|(x, y)| (x - y).norm()).fold(0.0, f64::max)
}
