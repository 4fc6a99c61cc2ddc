use crsmul::{spgemm_distributed, spgemm_parallel, spgemm_seq};
use crsmul::{AccumulatorKind, MulConfig, SparseMatrixCRS};

fn main() {
    println!("crsmul {}: sparse CRS matrix multiplication", crsmul::VERSION);

    // [1 0 2]   [7 8 9]
    // [0 3 0] x [0 1 0]
    // [4 0 5]   [6 5 4]
    let a = SparseMatrixCRS::new(
        3, 3,
        vec![0, 2, 3, 5],
        vec![0, 2, 1, 0, 2],
        vec![1.0, 2.0, 3.0, 4.0, 5.0],
    );

    let b = SparseMatrixCRS::new(
        3, 3,
        vec![0, 3, 4, 7],
        vec![0, 1, 2, 1, 0, 1, 2],
        vec![7.0, 8.0, 9.0, 1.0, 6.0, 5.0, 4.0],
    );

    println!("\nMatrix A:");
    println!("{:?}", a);

    println!("\nMatrix B:");
    println!("{:?}", b);

    let config = MulConfig::default();
    println!("\nConfiguration:");
    println!("  Workers: {}", config.n_workers);
    println!("  Accumulator: {:?}", config.accumulator);

    let c = match spgemm_seq(&a, &b, AccumulatorKind::DenseScan) {
        Ok(c) => c,
        Err(err) => {
            eprintln!("sequential multiply failed: {}", err);
            std::process::exit(1);
        }
    };

    println!("\nSequential result:");
    println!("{:?}", c);
    println!("  Values: {:?}", c.values);
    println!("  Column indices: {:?}", c.col_idx);
    println!("  Row pointers: {:?}", c.row_ptr);

    match spgemm_parallel(&a, &b, &config) {
        Ok(p) => println!("\nRayon result matches: {}", p == c),
        Err(err) => eprintln!("rayon multiply failed: {}", err),
    }

    match spgemm_distributed(&a, &b, &config) {
        Ok(d) => println!("Worker-pool result matches: {}", d == c),
        Err(err) => eprintln!("distributed multiply failed: {}", err),
    }
}
