use std::env;
use std::f64::consts::TAU;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

const TABLE_DEPTH: usize = 64;

/// atan(2^-i), expressed as a fraction of a full turn
fn compute_atan_table() -> Vec<f64> {
    (0..TABLE_DEPTH)
        .map(|i| f64::atan(f64::powi(2.0, -(i as i32))) / TAU)
        .collect()
}

/// Cumulative gain compensation: K_n = prod(1 / sqrt(1 + 2^-2i)) for i < n
fn compute_gain_table() -> Vec<f64> {
    let mut k = 1.0;
    (0..TABLE_DEPTH)
        .map(|i| { k /= f64::sqrt(1.0 + f64::powi(2.0, -2 * i as i32)); k })
        .collect()
}

fn main() -> io::Result<()> {
    println!("cargo:rerun-if-changed=build.rs");

    let out_dir = env::var_os("OUT_DIR").expect("OUT_DIR is set by cargo");
    let mut f = File::create(Path::new(&out_dir).join("cordic_tables.rs"))?;

    writeln!(&mut f, "/// Depth of the generated seed tables")?;
    writeln!(&mut f, "pub const TABLE_DEPTH: usize = {TABLE_DEPTH};")?;
    writeln!(&mut f, "#[allow(clippy::approx_constant, clippy::excessive_precision)]")?;
    writeln!(&mut f, "const ATAN_TURNS: [f64; TABLE_DEPTH] = {:?};", compute_atan_table())?;
    writeln!(&mut f, "#[allow(clippy::excessive_precision)]")?;
    writeln!(&mut f, "const GAIN_TABLE: [f64; TABLE_DEPTH] = {:?};", compute_gain_table())?;
    Ok(())
}
