//! Argument checks shared by the front-end and the backends.

use crate::groups::Group;
use linhal_common::{LinhalError, Result};

const DOMAIN: &str = "blas";

pub fn batch_size(routine: &'static str, batch_size: i64) -> Result<()> {
    if batch_size < 0 {
        return Err(LinhalError::invalid_argument(
            DOMAIN,
            routine,
            format!("batch_size must be non-negative, got {batch_size}"),
        ));
    }
    Ok(())
}

/// Total number of batch entries across `groups`.
pub fn group_total<G: Group>(routine: &'static str, groups: &[G]) -> Result<usize> {
    let mut total: i64 = 0;
    for (i, group) in groups.iter().enumerate() {
        let size = group.size();
        if size < 0 {
            return Err(LinhalError::invalid_argument(
                DOMAIN,
                routine,
                format!("group {i} has negative size {size}"),
            ));
        }
        total = total.checked_add(size).ok_or_else(|| {
            LinhalError::invalid_argument(DOMAIN, routine, "total group size overflows i64")
        })?;
    }
    usize::try_from(total)
        .map_err(|_| LinhalError::invalid_argument(DOMAIN, routine, "total group size too large"))
}

/// A grouped argument must supply one entry per batch item.
pub fn array_len(routine: &'static str, name: &str, len: usize, total: usize) -> Result<()> {
    if len != total {
        return Err(LinhalError::invalid_argument(
            DOMAIN,
            routine,
            format!("`{name}` has {len} entries but the groups cover {total}"),
        ));
    }
    Ok(())
}

/// Buffer outputs may not share storage with any input of the same call.
pub fn no_alias(routine: &'static str, output: (&str, usize), inputs: &[(&str, usize)]) -> Result<()> {
    if let Some((name, _)) = inputs.iter().find(|(_, id)| *id == output.1) {
        return Err(LinhalError::invalid_argument(
            DOMAIN,
            routine,
            format!("output `{}` aliases input `{name}`", output.0),
        ));
    }
    Ok(())
}

/// Every integer argument must fit the backend's 32-bit integer type.
pub fn overflow_check(routine: &'static str, args: &[(&'static str, i64)]) -> Result<()> {
    for &(argument, value) in args {
        if i32::try_from(value).is_err() {
            return Err(LinhalError::Overflow { function: routine, argument, value });
        }
    }
    Ok(())
}

/// Elements touched by a column-major `rows x cols` matrix with leading
/// dimension `ld`.
pub fn matrix_extent(rows: i64, cols: i64, ld: i64) -> i64 {
    if rows <= 0 || cols <= 0 {
        return 0;
    }
    ld.max(rows) * (cols - 1) + rows
}

/// Elements touched by `batch` matrices of `extent` elements `stride` apart.
pub fn strided_extent(extent: i64, stride: i64, batch: i64) -> i64 {
    if batch <= 0 || extent == 0 {
        return 0;
    }
    stride.max(0) * (batch - 1) + extent
}

/// Fail if a slice is shorter than what the call would touch.
pub fn extent(routine: &'static str, name: &str, len: usize, required: i64) -> Result<()> {
    if (len as i64) < required {
        return Err(LinhalError::invalid_argument(
            DOMAIN,
            routine,
            format!("`{name}` holds {len} elements but the call needs {required}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::groups::CopyGroup;

    fn group(size: i64) -> CopyGroup {
        CopyGroup { n: 4, incx: 1, incy: 1, size }
    }

    #[test]
    fn group_total_sums_sizes() {
        assert_eq!(group_total("copy_batch", &[group(2), group(0), group(3)]).unwrap(), 5);
        assert_eq!(group_total::<CopyGroup>("copy_batch", &[]).unwrap(), 0);
    }

    #[test]
    fn negative_group_size_is_rejected() {
        let err = group_total("copy_batch", &[group(2), group(-1)]).unwrap_err();
        assert!(err.is_invalid_argument());
        assert!(err.to_string().contains("group 1"), "got {err}");
    }

    #[test]
    fn overflow_check_rejects_values_past_i32() {
        assert!(overflow_check("gemm_batch", &[("m", 4), ("lda", i32::MAX as i64)]).is_ok());
        let err = overflow_check("gemm_batch", &[("m", 4), ("lda", i32::MAX as i64 + 1)]).unwrap_err();
        assert_eq!(
            err,
            LinhalError::Overflow { function: "gemm_batch", argument: "lda", value: i32::MAX as i64 + 1 }
        );
    }

    #[test]
    fn extents() {
        // 3x2 matrix with lda 4: columns start at 0 and 4, last element at 6.
        assert_eq!(matrix_extent(3, 2, 4), 7);
        assert_eq!(matrix_extent(0, 2, 4), 0);
        assert_eq!(strided_extent(7, 8, 3), 23);
        assert_eq!(strided_extent(7, 8, 0), 0);
        assert!(extent("gemm_batch", "a", 22, 23).is_err());
        assert!(extent("gemm_batch", "a", 23, 23).is_ok());
    }

    #[test]
    fn aliasing_outputs_are_rejected() {
        assert!(no_alias("gemm_batch", ("c", 1), &[("a", 2), ("b", 3)]).is_ok());
        let err = no_alias("gemm_batch", ("c", 2), &[("a", 2), ("b", 3)]).unwrap_err();
        assert!(err.to_string().contains("aliases input `a`"));
    }
}
