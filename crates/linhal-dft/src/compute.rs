//! `compute_forward` / `compute_backward` on committed descriptors.
//!
//! Each direction comes in buffer and slice ("USM") forms, in-place and
//! out-of-place, with interleaved or split real/imaginary storage. Element
//! types follow the descriptor: forward-domain data is
//! `D::Forward<P>`, backward-domain data is `P::Complex`. Split storage is
//! only offered for complex-domain descriptors and carries `P::Real` halves.
//!
//! Buffer forms block until the transform is done; slice forms return the
//! completion [`Event`].

use crate::backend::DftArgs;
use crate::descriptor::{Descriptor, DescriptorValues};
use crate::types::{
    Complex, ConfigParam, Direction, DftElement, Domain, DomainType, PrecisionType,
};
use linhal_common::{Buffer, Event, LinhalError, Result};
use tracing::debug;

fn run<P: PrecisionType, D: DomainType>(
    desc: &Descriptor<P, D>,
    direction: Direction,
    args: DftArgs<'_>,
    dependencies: &[Event],
) -> Result<Event> {
    let function = direction.as_str();
    let (plan, queue) = desc.plan(function)?;
    let values = desc.values();
    if args.placement() != values.placement {
        return Err(LinhalError::invalid_argument(
            "dft",
            function,
            format!(
                "descriptor PLACEMENT is {} but a {} call was made",
                values.placement,
                args.placement()
            ),
        ));
    }
    if args.complex_storage() != values.complex_storage {
        return Err(LinhalError::invalid_argument(
            "dft",
            function,
            format!(
                "descriptor COMPLEX_STORAGE is {} but {} data was passed",
                values.complex_storage,
                args.complex_storage()
            ),
        ));
    }
    check_extents(values, function, direction, &args)?;
    debug!(
        function,
        placement = %values.placement,
        storage = %values.complex_storage,
        backend = desc.backend_name().unwrap_or("none"),
        "dispatching transform"
    );
    plan.execute(queue, direction, args, dependencies)
}

/// Elements spanned by one domain's data. Forward-domain data is laid out
/// by INPUT_STRIDES and FWD_DISTANCE, backward-domain data by
/// OUTPUT_STRIDES and BWD_DISTANCE; a real-domain spectrum holds n/2+1
/// values along its last dimension.
fn extent(values: &DescriptorValues, function: &'static str, side: Direction) -> Result<usize> {
    let (param, strides, distance) = match side {
        Direction::Forward => (ConfigParam::InputStrides, values.input_strides(), values.fwd_distance),
        Direction::Backward => {
            (ConfigParam::OutputStrides, values.output_strides(), values.bwd_distance)
        }
    };
    let too_large = || {
        LinhalError::invalid_argument(
            "dft",
            function,
            format!("{param} address more elements than fit in memory"),
        )
    };

    let last = values.dimension().saturating_sub(1);
    let offset = i128::from(strides.first().copied().unwrap_or(0));
    let (mut low, mut high) = (offset, offset);
    for (d, (&n, &stride)) in values.lengths.iter().zip(strides.iter().skip(1)).enumerate() {
        let n = if side == Direction::Backward && values.domain == Domain::Real && d == last {
            n / 2 + 1
        } else {
            n
        };
        let reach = i128::from(n - 1).checked_mul(i128::from(stride)).ok_or_else(too_large)?;
        if reach < 0 {
            low = low.checked_add(reach).ok_or_else(too_large)?;
        } else {
            high = high.checked_add(reach).ok_or_else(too_large)?;
        }
    }
    let batches = i128::from(values.number_of_transforms - 1) * i128::from(distance);
    high = high.checked_add(batches).ok_or_else(too_large)?;

    if low < 0 {
        return Err(LinhalError::invalid_argument(
            "dft",
            function,
            format!("{param} reach before the start of the data"),
        ));
    }
    high.checked_add(1).and_then(|end| usize::try_from(end).ok()).ok_or_else(too_large)
}

/// Every view must cover the elements the transform reads or writes.
fn check_extents(
    values: &DescriptorValues,
    function: &'static str,
    direction: Direction,
    args: &DftArgs<'_>,
) -> Result<()> {
    let forward = extent(values, function, Direction::Forward)?;
    let backward = extent(values, function, Direction::Backward)?;
    let (input, output) = match direction {
        Direction::Forward => (forward, backward),
        Direction::Backward => (backward, forward),
    };
    let need = |name: &str, len: usize, required: usize| {
        if len < required {
            return Err(LinhalError::invalid_argument(
                "dft",
                function,
                format!("`{name}` holds {len} elements but the descriptor needs {required}"),
            ));
        }
        Ok(())
    };

    match args {
        DftArgs::InPlace { data } => {
            // A real-domain buffer holds the spectrum as pairs of reals.
            let spectrum = if values.domain == Domain::Real {
                backward.saturating_mul(2)
            } else {
                backward
            };
            need("inout", data.len(), forward.max(spectrum))
        }
        DftArgs::InPlaceSplit { re, im } => {
            let required = forward.max(backward);
            need("re", re.len(), required)?;
            need("im", im.len(), required)
        }
        DftArgs::OutOfPlace { input: data_in, output: data_out } => {
            need("input", data_in.len(), input)?;
            need("output", data_out.len(), output)
        }
        DftArgs::OutOfPlaceSplit { input_re, input_im, output_re, output_im } => {
            need("input_re", input_re.len(), input)?;
            need("input_im", input_im.len(), input)?;
            need("output_re", output_re.len(), output)?;
            need("output_im", output_im.len(), output)
        }
    }
}

/// Buffers written by one call must not share storage with any other
/// buffer of the call.
fn distinct(direction: Direction, ids: &[(&str, usize)]) -> Result<()> {
    for (i, (a, id_a)) in ids.iter().enumerate() {
        if let Some((b, _)) = ids[i + 1..].iter().find(|(_, id_b)| id_b == id_a) {
            return Err(LinhalError::invalid_argument(
                "dft",
                direction.as_str(),
                format!("buffers `{a}` and `{b}` alias"),
            ));
        }
    }
    Ok(())
}

macro_rules! compute_direction {
    (
        $direction:expr,
        input = $input:ty,
        output = $output:ty,
        $in_place:ident,
        $out_of_place:ident,
        $usm:ident,
        $usm_out_of_place:ident,
        $split:ident,
        $split_out_of_place:ident,
        $split_usm:ident,
        $split_usm_out_of_place:ident $(,)?
    ) => {
        /// In-place transform of a buffer.
        pub fn $in_place<P: PrecisionType, D: DomainType>(
            desc: &Descriptor<P, D>,
            inout: &Buffer<D::Forward<P>>,
        ) -> Result<()> {
            let mut data = inout.write();
            let args = DftArgs::InPlace { data: <D::Forward<P>>::view_mut(&mut data) };
            run(desc, $direction, args, &[])?.wait()
        }

        /// Out-of-place transform between buffers.
        pub fn $out_of_place<P: PrecisionType, D: DomainType>(
            desc: &Descriptor<P, D>,
            input: &Buffer<$input>,
            output: &Buffer<$output>,
        ) -> Result<()> {
            distinct($direction, &[("input", input.id()), ("output", output.id())])?;
            let input = input.read();
            let mut output = output.write();
            let args = DftArgs::OutOfPlace {
                input: <$input>::view(&input),
                output: <$output>::view_mut(&mut output),
            };
            run(desc, $direction, args, &[])?.wait()
        }

        /// In-place transform of caller-managed memory.
        pub fn $usm<P: PrecisionType, D: DomainType>(
            desc: &Descriptor<P, D>,
            inout: &mut [D::Forward<P>],
            dependencies: &[Event],
        ) -> Result<Event> {
            let args = DftArgs::InPlace { data: <D::Forward<P>>::view_mut(inout) };
            run(desc, $direction, args, dependencies)
        }

        /// Out-of-place transform of caller-managed memory.
        pub fn $usm_out_of_place<P: PrecisionType, D: DomainType>(
            desc: &Descriptor<P, D>,
            input: &[$input],
            output: &mut [$output],
            dependencies: &[Event],
        ) -> Result<Event> {
            let args = DftArgs::OutOfPlace {
                input: <$input>::view(input),
                output: <$output>::view_mut(output),
            };
            run(desc, $direction, args, dependencies)
        }

        /// In-place transform of split real/imaginary buffers.
        pub fn $split<P: PrecisionType>(
            desc: &Descriptor<P, Complex>,
            re: &Buffer<P::Real>,
            im: &Buffer<P::Real>,
        ) -> Result<()> {
            distinct($direction, &[("re", re.id()), ("im", im.id())])?;
            let mut re = re.write();
            let mut im = im.write();
            let args = DftArgs::InPlaceSplit {
                re: <P::Real as DftElement>::view_mut(&mut re),
                im: <P::Real as DftElement>::view_mut(&mut im),
            };
            run(desc, $direction, args, &[])?.wait()
        }

        /// Out-of-place transform between split real/imaginary buffers.
        pub fn $split_out_of_place<P: PrecisionType>(
            desc: &Descriptor<P, Complex>,
            input_re: &Buffer<P::Real>,
            input_im: &Buffer<P::Real>,
            output_re: &Buffer<P::Real>,
            output_im: &Buffer<P::Real>,
        ) -> Result<()> {
            distinct(
                $direction,
                &[
                    ("input_re", input_re.id()),
                    ("input_im", input_im.id()),
                    ("output_re", output_re.id()),
                    ("output_im", output_im.id()),
                ],
            )?;
            let input_re = input_re.read();
            let input_im = input_im.read();
            let mut output_re = output_re.write();
            let mut output_im = output_im.write();
            let args = DftArgs::OutOfPlaceSplit {
                input_re: <P::Real as DftElement>::view(&input_re),
                input_im: <P::Real as DftElement>::view(&input_im),
                output_re: <P::Real as DftElement>::view_mut(&mut output_re),
                output_im: <P::Real as DftElement>::view_mut(&mut output_im),
            };
            run(desc, $direction, args, &[])?.wait()
        }

        /// In-place transform of split real/imaginary caller-managed memory.
        pub fn $split_usm<P: PrecisionType>(
            desc: &Descriptor<P, Complex>,
            re: &mut [P::Real],
            im: &mut [P::Real],
            dependencies: &[Event],
        ) -> Result<Event> {
            let args = DftArgs::InPlaceSplit {
                re: <P::Real as DftElement>::view_mut(re),
                im: <P::Real as DftElement>::view_mut(im),
            };
            run(desc, $direction, args, dependencies)
        }

        /// Out-of-place transform of split real/imaginary caller-managed memory.
        pub fn $split_usm_out_of_place<P: PrecisionType>(
            desc: &Descriptor<P, Complex>,
            input_re: &[P::Real],
            input_im: &[P::Real],
            output_re: &mut [P::Real],
            output_im: &mut [P::Real],
            dependencies: &[Event],
        ) -> Result<Event> {
            let args = DftArgs::OutOfPlaceSplit {
                input_re: <P::Real as DftElement>::view(input_re),
                input_im: <P::Real as DftElement>::view(input_im),
                output_re: <P::Real as DftElement>::view_mut(output_re),
                output_im: <P::Real as DftElement>::view_mut(output_im),
            };
            run(desc, $direction, args, dependencies)
        }
    };
}

compute_direction!(
    Direction::Forward,
    input = D::Forward<P>,
    output = P::Complex,
    compute_forward,
    compute_forward_out_of_place,
    compute_forward_usm,
    compute_forward_usm_out_of_place,
    compute_forward_split,
    compute_forward_split_out_of_place,
    compute_forward_split_usm,
    compute_forward_split_usm_out_of_place,
);

compute_direction!(
    Direction::Backward,
    input = P::Complex,
    output = D::Forward<P>,
    compute_backward,
    compute_backward_out_of_place,
    compute_backward_usm,
    compute_backward_usm_out_of_place,
    compute_backward_split,
    compute_backward_split_out_of_place,
    compute_backward_split_usm,
    compute_backward_split_usm_out_of_place,
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Double, Real, Single};

    #[test]
    fn extents_follow_strides_distances_and_domain() {
        let mut desc = Descriptor::<Double, Real>::new([4, 16]).unwrap();
        desc.set_value(ConfigParam::NumberOfTransforms, 2).unwrap();
        desc.set_value(ConfigParam::FwdDistance, 64).unwrap();
        desc.set_value(ConfigParam::BwdDistance, 40).unwrap();
        desc.set_value(ConfigParam::OutputStrides, vec![0i64, 9, 1]).unwrap();
        let values = desc.values();
        // 3*16 + 15 + 64, plus one.
        assert_eq!(extent(values, "compute_forward", Direction::Forward).unwrap(), 128);
        // The spectrum's last dimension has 9 entries: 3*9 + 8 + 40, plus one.
        assert_eq!(extent(values, "compute_forward", Direction::Backward).unwrap(), 76);
    }

    #[test]
    fn negative_strides_must_stay_inside_the_data() {
        let mut desc = Descriptor::<Single, Complex>::new([8]).unwrap();
        desc.set_value(ConfigParam::InputStrides, vec![7i64, -1]).unwrap();
        assert_eq!(extent(desc.values(), "compute_forward", Direction::Forward).unwrap(), 8);

        desc.set_value(ConfigParam::InputStrides, vec![3i64, -1]).unwrap();
        let err = extent(desc.values(), "compute_forward", Direction::Forward).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid argument to dft::compute_forward: INPUT_STRIDES reach before the start of the data"
        );
    }

    #[test]
    fn huge_lengths_fail_instead_of_wrapping() {
        let desc = Descriptor::<Double, Complex>::new([i64::MAX, 2]).unwrap();
        assert!(extent(desc.values(), "compute_forward", Direction::Forward).is_ok());
        let mut desc = Descriptor::<Double, Complex>::new([2]).unwrap();
        desc.set_value(ConfigParam::InputStrides, vec![i64::MAX, i64::MAX]).unwrap();
        desc.set_value(ConfigParam::NumberOfTransforms, i64::MAX).unwrap();
        desc.set_value(ConfigParam::FwdDistance, i64::MAX).unwrap();
        let err = extent(desc.values(), "compute_forward", Direction::Forward).unwrap_err();
        assert!(err.to_string().contains("address more elements than fit in memory"), "{err}");
    }

    #[test]
    fn aliasing_buffers_are_named() {
        let err = distinct(Direction::Backward, &[("re", 1), ("im", 2), ("out", 1)]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid argument to dft::compute_backward: buffers `re` and `out` alias"
        );
        assert!(distinct(Direction::Forward, &[("a", 1), ("b", 2)]).is_ok());
    }
}
