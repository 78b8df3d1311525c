use linhal_blas::CopyGroup;
use linhal_blas::validate::{group_total, matrix_extent, overflow_check, strided_extent};
use proptest::prelude::*;

fn copy_group(size: i64) -> CopyGroup {
    CopyGroup { n: 1, incx: 1, incy: 1, size }
}

proptest! {
    #[test]
    fn group_total_is_the_sum_of_sizes(sizes in prop::collection::vec(0i64..1000, 0..16)) {
        let groups: Vec<CopyGroup> = sizes.iter().copied().map(copy_group).collect();
        let total = group_total("copy_batch", &groups).unwrap();
        prop_assert_eq!(total as i64, sizes.iter().sum::<i64>());
    }

    #[test]
    fn any_negative_group_size_is_rejected(
        mut sizes in prop::collection::vec(0i64..1000, 1..16),
        at in any::<prop::sample::Index>(),
        negative in i64::MIN..0,
    ) {
        let i = at.index(sizes.len());
        sizes[i] = negative;
        let groups: Vec<CopyGroup> = sizes.into_iter().map(copy_group).collect();
        let err = group_total("copy_batch", &groups).unwrap_err();
        prop_assert!(err.is_invalid_argument());
    }

    #[test]
    fn last_element_of_last_column_is_inside_extent(
        rows in 1i64..64,
        cols in 1i64..64,
        pad in 0i64..8,
    ) {
        let ld = rows + pad;
        let extent = matrix_extent(rows, cols, ld);
        // Column-major index of (rows - 1, cols - 1).
        prop_assert_eq!(extent, (cols - 1) * ld + rows);
    }

    #[test]
    fn strided_extent_covers_the_last_matrix(extent in 1i64..1000, stride in 0i64..1000, batch in 1i64..64) {
        let total = strided_extent(extent, stride, batch);
        prop_assert!(total >= extent);
        prop_assert_eq!(total - extent, stride * (batch - 1));
    }

    #[test]
    fn overflow_check_matches_i32_range(value in any::<i64>()) {
        let fits = i32::try_from(value).is_ok();
        prop_assert_eq!(overflow_check("gemm_batch", &[("m", value)]).is_ok(), fits);
    }
}
