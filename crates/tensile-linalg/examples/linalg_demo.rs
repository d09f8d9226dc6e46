use argh::FromArgs;
use tensile_linalg::{
    cholesky, det, eigvalsh, lstsq, norm, pinv, LstsqOptions, NormOptions, NormOrd, PinvOptions,
};
use tensile_tensor::{Cpu, Tensor};

/// Runs the linear algebra facade on a small symmetric matrix
#[derive(Debug, FromArgs)]
struct Args {
    /// size of the matrix
    #[argh(option, short = 'n', default = "4")]
    size: usize,

    /// least squares driver
    #[argh(option, short = 'd', default = "String::from(\"gelsy\")")]
    driver: String,

    /// relative cutoff for the pseudo-inverse
    #[argh(option, short = 'r', default = "1e-15")]
    rcond: f64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();
    let n = args.size;

    // tridiagonal [-1, 2, -1] plus identity, positive-definite for every n
    let a = Tensor::<f64, Cpu>::from_shape_fn(&[n, n], |idx| match idx[0].abs_diff(idx[1]) {
        0 => 3.0,
        1 => -1.0,
        _ => 0.0,
    });
    let b = Tensor::<f64, Cpu>::from_shape_fn(&[n, 1], |idx| (idx[0] + 1) as f64);

    log::info!("det: {:?}", det(&a)?.as_slice());
    log::info!("eigenvalues: {:?}", eigvalsh(&a, "L")?.as_slice());
    log::info!("cholesky: {:?}", cholesky(&a)?.as_slice());
    log::info!(
        "frobenius norm: {:?}",
        norm(&a, Some(NormOrd::Label("fro")), NormOptions::default())?.as_slice()
    );

    let pinv_a = pinv(&a, PinvOptions::default().with_rcond(args.rcond))?;
    log::info!("pinv: {:?}", pinv_a.as_slice());

    let solution = lstsq(&a, &b, LstsqOptions::default().with_driver(args.driver))?;
    log::info!(
        "lstsq solution: {:?} rank: {:?}",
        solution.solution.as_slice(),
        solution.rank.as_slice()
    );

    Ok(())
}
