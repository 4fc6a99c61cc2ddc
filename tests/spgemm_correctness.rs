//! Tests for SpGEMM correctness against reference implementations

use crsmul::{
    from_sprs_csr, reference_spgemm, spgemm_parallel, spgemm_seq, to_sprs_csr, AccumulatorKind,
    Error, MulConfig, SparseMatrixCRS,
};
use ndarray::{array, Array2};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const KINDS: [AccumulatorKind; 2] = [AccumulatorKind::DenseScan, AccumulatorKind::Dense];

/// Create a diagonal matrix
fn create_diagonal_matrix(n: usize, value: f64) -> SparseMatrixCRS<f64> {
    let row_ptr: Vec<usize> = (0..=n).collect();
    let col_idx: Vec<usize> = (0..n).collect();
    let values = vec![value; n];

    SparseMatrixCRS::new(n, n, row_ptr, col_idx, values)
}

/// Create a tridiagonal matrix
fn create_tridiagonal_matrix(n: usize) -> SparseMatrixCRS<f64> {
    let mut row_ptr = Vec::with_capacity(n + 1);
    let mut col_idx = Vec::new();
    let mut values = Vec::new();

    row_ptr.push(0);

    for i in 0..n {
        if i > 0 {
            col_idx.push(i - 1);
            values.push(1.0);
        }

        col_idx.push(i);
        values.push(2.0);

        if i < n - 1 {
            col_idx.push(i + 1);
            values.push(1.0);
        }

        row_ptr.push(col_idx.len());
    }

    SparseMatrixCRS::new(n, n, row_ptr, col_idx, values)
}

/// Random matrix where each cell is nonzero with probability `density`
fn create_random_matrix(rows: usize, cols: usize, density: f64, seed: u64) -> SparseMatrixCRS<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let dense = Array2::from_shape_fn((rows, cols), |_| {
        if rng.gen::<f64>() < density {
            rng.gen_range(-10.0..10.0)
        } else {
            0.0
        }
    });
    SparseMatrixCRS::from_dense(&dense)
}

fn assert_dense_close(actual: &Array2<f64>, expected: &Array2<f64>) {
    assert_eq!(actual.dim(), expected.dim());
    for (x, y) in actual.iter().zip(expected.iter()) {
        assert!((x - y).abs() < 1e-9, "{} != {}", x, y);
    }
}

#[test]
fn test_documented_example() {
    let a = SparseMatrixCRS::from_dense(&array![[1.0, 0.0, 2.0], [0.0, 3.0, 0.0], [4.0, 0.0, 5.0]]);
    let b = SparseMatrixCRS::from_dense(&array![[7.0, 8.0, 9.0], [0.0, 1.0, 0.0], [6.0, 5.0, 4.0]]);
    let expected = array![[19.0, 18.0, 17.0], [0.0, 3.0, 0.0], [58.0, 57.0, 56.0]];

    for kind in KINDS {
        let c = spgemm_seq(&a, &b, kind).unwrap();
        assert_eq!(c.to_dense(), expected);
        assert_eq!(c.nnz(), 7);
    }
}

#[test]
fn test_identity_multiplication() {
    let a = create_diagonal_matrix(10, 1.0);
    let b = create_diagonal_matrix(10, 2.0);

    let result = spgemm_seq(&a, &b, AccumulatorKind::DenseScan).unwrap();
    assert_eq!(result, b);
}

#[test]
fn test_tridiagonal_squared() {
    let t = create_tridiagonal_matrix(8);
    let expected = reference_spgemm(&t, &t);

    for kind in KINDS {
        let result = spgemm_seq(&t, &t, kind).unwrap();
        assert_eq!(result, expected);
    }

    // Pentadiagonal: interior rows have 5 entries
    let result = spgemm_seq(&t, &t, AccumulatorKind::DenseScan).unwrap();
    assert_eq!(result.row_nnz(4), 5);
    assert_eq!(result.row_iter(4).map(|(_, &v)| v).collect::<Vec<_>>(), vec![1.0, 4.0, 6.0, 4.0, 1.0]);
}

#[test]
fn test_zero_density() {
    let a = SparseMatrixCRS::from_dense(&Array2::<f64>::zeros((3, 3)));
    let b = SparseMatrixCRS::from_dense(&Array2::<f64>::zeros((3, 3)));

    let c = spgemm_seq(&a, &b, AccumulatorKind::DenseScan).unwrap();
    assert!(c.values.is_empty());
    assert!(c.col_idx.is_empty());
    assert_eq!(c.row_ptr, vec![0, 0, 0, 0]);
}

#[test]
fn test_rectangular_shapes() {
    let a = create_random_matrix(7, 4, 0.5, 1);
    let b = create_random_matrix(4, 11, 0.5, 2);

    let c = spgemm_seq(&a, &b, AccumulatorKind::DenseScan).unwrap();
    assert_eq!(c.shape(), (7, 11));
    assert_dense_close(&c.to_dense(), &a.to_dense().dot(&b.to_dense()));
}

#[test]
fn test_dimension_mismatch() {
    let a = SparseMatrixCRS::<f64>::zeros(2, 3);
    let b = SparseMatrixCRS::<f64>::zeros(1, 2);

    assert_eq!(
        spgemm_seq(&a, &b, AccumulatorKind::DenseScan),
        Err(Error::DimensionMismatch { a_cols: 3, b_rows: 1 })
    );
    assert!(spgemm_parallel(&a, &b, &MulConfig::default()).is_err());
}

#[test]
fn test_exact_cancellation_is_dropped() {
    // Row 0: 1*1 + 1*(-1) = 0 exactly
    let a = SparseMatrixCRS::from_dense(&array![[1.0, 1.0], [2.0, 0.0]]);
    let b = SparseMatrixCRS::from_dense(&array![[1.0], [-1.0]]);

    let c = spgemm_seq(&a, &b, AccumulatorKind::DenseScan).unwrap();
    assert_eq!(c.row_ptr, vec![0, 0, 1]);
    assert_eq!(c.values, vec![2.0]);
}

#[test]
fn test_tiny_values_are_kept() {
    // No tolerance: a product of 1e-300 * 1e-10 is still nonzero
    let a = SparseMatrixCRS::from_dense(&array![[1e-300]]);
    let b = SparseMatrixCRS::from_dense(&array![[1e-10]]);

    let c = spgemm_seq(&a, &b, AccumulatorKind::DenseScan).unwrap();
    assert_eq!(c.nnz(), 1);
}

#[test]
fn test_unsorted_input_columns() {
    // Same matrix as [1 0 2; 0 3 0] with row 0 stored backwards
    let a = SparseMatrixCRS::new(2, 3, vec![0, 2, 3], vec![2, 0, 1], vec![2.0, 1.0, 3.0]);
    let b = create_diagonal_matrix(3, 1.0);

    let c = spgemm_seq(&a, &b, AccumulatorKind::Dense).unwrap();
    assert_eq!(c.col_idx, vec![0, 2, 1]);
    assert_eq!(c.values, vec![1.0, 2.0, 3.0]);
}

#[test]
fn test_against_ndarray_and_sprs() {
    let a = create_random_matrix(60, 45, 0.08, 11);
    let b = create_random_matrix(45, 70, 0.08, 12);

    let expected_dense = a.to_dense().dot(&b.to_dense());

    let sprs_product = &to_sprs_csr(&a).unwrap() * &to_sprs_csr(&b).unwrap();
    let sprs_dense = from_sprs_csr(sprs_product).unwrap().to_dense();

    for kind in KINDS {
        let c = spgemm_seq(&a, &b, kind).unwrap();
        assert!(c.check_structure().is_ok());
        assert_dense_close(&c.to_dense(), &expected_dense);
        assert_dense_close(&c.to_dense(), &sprs_dense);
    }
}

#[test]
fn test_parallel_matches_sequential_exactly() {
    let a = create_random_matrix(97, 80, 0.05, 21);
    let b = create_random_matrix(80, 64, 0.05, 22);
    let expected = spgemm_seq(&a, &b, AccumulatorKind::DenseScan).unwrap();

    for n_workers in [1, 2, 3, 8, 200] {
        for kind in KINDS {
            let config = MulConfig::default().with_workers(n_workers).with_accumulator(kind);
            assert_eq!(spgemm_parallel(&a, &b, &config).unwrap(), expected);
        }
    }
}
