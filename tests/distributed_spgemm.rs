//! Tests for the worker-pool multiplication

use crsmul::distributed::distributed_spgemm;
use crsmul::{
    row_block, spgemm_distributed, spgemm_parallel, spgemm_seq, AccumulatorKind, ChannelComm,
    CommError, Communicator, Error, MulConfig, SparseMatrixCRS, WorkerPool, ROOT,
};
use ndarray::Array2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn create_random_matrix(rows: usize, cols: usize, density: f64, seed: u64) -> SparseMatrixCRS<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let dense = Array2::from_shape_fn((rows, cols), |_| {
        if rng.gen::<f64>() < density {
            rng.gen_range(-1.0..1.0)
        } else {
            0.0
        }
    });
    SparseMatrixCRS::from_dense(&dense)
}

#[test]
fn test_matches_sequential_for_every_worker_count() {
    let a = create_random_matrix(41, 30, 0.1, 7);
    let b = create_random_matrix(30, 25, 0.1, 8);
    let expected = spgemm_seq(&a, &b, AccumulatorKind::DenseScan).unwrap();

    for n_workers in 1..=8 {
        let config = MulConfig::default().with_workers(n_workers);
        let c = spgemm_distributed(&a, &b, &config).unwrap();
        assert_eq!(c, expected, "{} workers", n_workers);
    }
}

#[test]
fn test_more_workers_than_rows() {
    let a = create_random_matrix(3, 6, 0.6, 1);
    let b = create_random_matrix(6, 4, 0.6, 2);
    let expected = spgemm_seq(&a, &b, AccumulatorKind::DenseScan).unwrap();

    let config = MulConfig::default().with_workers(7);
    assert_eq!(spgemm_distributed(&a, &b, &config).unwrap(), expected);
}

#[test]
fn test_blocks_cover_rows_in_order() {
    for size in 1..=6 {
        for n_rows in [0, 1, 5, 6, 13] {
            let mut next = 0;
            for rank in 0..size {
                let block = row_block(rank, size, n_rows);
                assert_eq!(block.start, next);
                next = block.end;
            }
            assert_eq!(next, n_rows);
        }
    }
}

#[test]
fn test_accumulators_agree_across_pool() {
    let a = create_random_matrix(20, 20, 0.2, 3);
    let b = create_random_matrix(20, 20, 0.2, 4);

    let scan = MulConfig::default().with_workers(3).with_accumulator(AccumulatorKind::DenseScan);
    let dense = MulConfig::default().with_workers(3).with_accumulator(AccumulatorKind::Dense);

    assert_eq!(
        spgemm_distributed(&a, &b, &scan).unwrap(),
        spgemm_distributed(&a, &b, &dense).unwrap()
    );
}

#[test]
fn test_dimension_mismatch() {
    let a = SparseMatrixCRS::<f64>::zeros(2, 3);
    let b = SparseMatrixCRS::<f64>::zeros(1, 2);

    let config = MulConfig::default().with_workers(2);
    assert_eq!(
        spgemm_distributed(&a, &b, &config),
        Err(Error::DimensionMismatch { a_cols: 3, b_rows: 1 })
    );
}

#[test]
fn test_empty_pool_is_rejected() {
    let a = SparseMatrixCRS::<f64>::identity(2);
    let config = MulConfig::default().with_workers(0);

    assert_eq!(
        spgemm_distributed(&a, &a, &config),
        Err(Error::Comm(CommError::EmptyPool))
    );
}

#[test]
fn test_collective_call_on_explicit_mesh() {
    let a = create_random_matrix(12, 9, 0.3, 5);
    let b = create_random_matrix(9, 10, 0.3, 6);
    let expected = spgemm_seq(&a, &b, AccumulatorKind::DenseScan).unwrap();

    let pool = WorkerPool::new(4).unwrap();
    let results = pool
        .run(|comm: &ChannelComm| {
            let operands = if comm.rank() == ROOT { Some((&a, &b)) } else { None };
            distributed_spgemm(comm, operands, AccumulatorKind::DenseScan)
        })
        .unwrap();

    assert_eq!(results[ROOT], Ok(Some(expected)));
    for result in &results[1..] {
        assert_eq!(result, &Ok(None));
    }
}

#[test]
fn test_malformed_operand_is_rejected() {
    let a = SparseMatrixCRS {
        n_rows: 2,
        n_cols: 2,
        row_ptr: vec![0, 1, 2],
        col_idx: vec![0, 5],
        values: vec![1.0, 2.0],
    };
    let b = SparseMatrixCRS::<f64>::identity(2);
    let config = MulConfig::default().with_workers(3);

    assert!(matches!(spgemm_distributed(&a, &b, &config), Err(Error::Crs(_))));
    assert!(matches!(spgemm_parallel(&a, &b, &config), Err(Error::Crs(_))));

    // Collective entry point: the coordinator rejects, its peers see it leave
    let pool = WorkerPool::new(3).unwrap();
    let results = pool
        .run(|comm: &ChannelComm| {
            let operands = if comm.rank() == ROOT { Some((&a, &b)) } else { None };
            distributed_spgemm(comm, operands, AccumulatorKind::DenseScan)
        })
        .unwrap();

    assert!(matches!(results[ROOT], Err(Error::Crs(_))));
    for result in &results[1..] {
        assert!(matches!(result, Err(Error::Comm(CommError::Disconnected { .. }))));
    }
}
