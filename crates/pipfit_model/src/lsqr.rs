//! LSQR sparse least-squares solver (Paige & Saunders, 1982).
//!
//! Minimizes `‖A x − b‖₂` (or the damped `‖[A; λI] x − [b; 0]‖₂`) using only
//! products with `A` and `Aᵀ`. On rank-deficient systems started from zero it
//! converges towards the minimum-norm solution.

use crate::sparse::CscMatrix;
use pipfit_config::SolverConfig;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why the iteration stopped. Mirrors the classic LSQR `istop` codes.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// `x = 0` is the exact solution (`b = 0` or `Aᵀb = 0`).
    ZeroSolution,
    /// `A x = b` holds within `atol`/`btol`.
    Compatible,
    /// A least-squares solution was found within `atol`.
    LeastSquares,
    /// The condition estimate exceeded `conlim`.
    ConditionLimit,
    /// `A x = b` holds to machine precision.
    CompatibleEps,
    /// A least-squares solution was found to machine precision.
    LeastSquaresEps,
    /// The condition estimate exceeded machine precision limits.
    ConditionEps,
    /// The iteration limit was reached.
    IterationLimit,
}

impl StopReason {
    /// The numeric `istop` code.
    pub fn code(self) -> u8 {
        match self {
            StopReason::ZeroSolution => 0,
            StopReason::Compatible => 1,
            StopReason::LeastSquares => 2,
            StopReason::ConditionLimit => 3,
            StopReason::CompatibleEps => 4,
            StopReason::LeastSquaresEps => 5,
            StopReason::ConditionEps => 6,
            StopReason::IterationLimit => 7,
        }
    }

    /// Returns `true` if the solver stopped on a convergence test.
    pub fn converged(self) -> bool {
        !matches!(
            self,
            StopReason::ConditionLimit | StopReason::ConditionEps | StopReason::IterationLimit
        )
    }

    fn describe(self) -> &'static str {
        match self {
            StopReason::ZeroSolution => "x = 0 is the exact solution",
            StopReason::Compatible => "Ax - b is small enough, given atol, btol",
            StopReason::LeastSquares => "the least-squares solution is good enough, given atol",
            StopReason::ConditionLimit => "the estimate of cond(A) has exceeded conlim",
            StopReason::CompatibleEps => "Ax - b is small enough for this machine",
            StopReason::LeastSquaresEps => {
                "the least-squares solution is good enough for this machine"
            }
            StopReason::ConditionEps => "cond(A) seems to be too large for this machine",
            StopReason::IterationLimit => "the iteration limit has been reached",
        }
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// Result of an LSQR run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LsqrOutcome {
    /// The solution estimate.
    pub x: Vec<f64>,
    /// Why the iteration stopped.
    pub stop: StopReason,
    /// Iterations performed.
    pub iterations: usize,
    /// `‖b − A x‖`.
    pub r1norm: f64,
    /// `sqrt(‖b − A x‖² + damp² ‖x‖²)`.
    pub r2norm: f64,
    /// Frobenius norm estimate of `[A; damp I]`.
    pub anorm: f64,
    /// Condition number estimate of `[A; damp I]`.
    pub acond: f64,
    /// `‖Aᵀ (b − A x) − damp² x‖`.
    pub arnorm: f64,
    /// `‖x‖`.
    pub xnorm: f64,
}

fn norm(v: &[f64]) -> f64 {
    v.iter().map(|a| a * a).sum::<f64>().sqrt()
}

fn scale(v: &mut [f64], factor: f64) {
    for a in v {
        *a *= factor;
    }
}

/// Sign with `sign(0) = 0`.
fn sign(a: f64) -> f64 {
    if a > 0.0 {
        1.0
    } else if a < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Stable Givens rotation: returns `(c, s, r)` with `[c s; -s c] [a; b] = [r; 0]`.
fn sym_ortho(a: f64, b: f64) -> (f64, f64, f64) {
    if b == 0.0 {
        (sign(a), 0.0, a.abs())
    } else if a == 0.0 {
        (0.0, sign(b), b.abs())
    } else if b.abs() > a.abs() {
        let tau = a / b;
        let s = sign(b) / (1.0 + tau * tau).sqrt();
        let c = s * tau;
        (c, s, b / s)
    } else {
        let tau = b / a;
        let c = sign(a) / (1.0 + tau * tau).sqrt();
        let s = c * tau;
        (c, s, a / c)
    }
}

/// Solves `min ‖A x − b‖₂` from `x = 0`.
///
/// `config.max_iterations == 0` selects `2 n` iterations for `n` columns.
/// Non-convergence is reported through [`LsqrOutcome::stop`], never as an
/// error.
pub fn lsqr(a: &CscMatrix, b: &[f64], config: &SolverConfig) -> LsqrOutcome {
    let n = a.ncols();
    let iter_lim = if config.max_iterations == 0 {
        2 * n
    } else {
        config.max_iterations
    };
    let (atol, btol, damp) = (config.atol, config.btol, config.damp);
    let ctol = if config.conlim > 0.0 {
        1.0 / config.conlim
    } else {
        0.0
    };
    let dampsq = damp * damp;
    let eps = f64::EPSILON;

    let mut out = LsqrOutcome {
        x: vec![0.0; n],
        stop: StopReason::ZeroSolution,
        iterations: 0,
        r1norm: 0.0,
        r2norm: 0.0,
        anorm: 0.0,
        acond: 0.0,
        arnorm: 0.0,
        xnorm: 0.0,
    };

    let mut u = b.to_vec();
    let bnorm = norm(&u);
    let mut beta = bnorm;
    let mut v;
    let mut alpha;
    if beta > 0.0 {
        scale(&mut u, 1.0 / beta);
        v = a.mul_transpose_vec(&u);
        alpha = norm(&v);
    } else {
        v = vec![0.0; n];
        alpha = 0.0;
    }
    if alpha > 0.0 {
        scale(&mut v, 1.0 / alpha);
    }
    let mut w = v.clone();

    let mut rhobar = alpha;
    let mut phibar = beta;
    out.r1norm = beta;
    out.r2norm = beta;
    out.arnorm = alpha * beta;
    if out.arnorm == 0.0 {
        return out;
    }

    let mut anorm = 0.0f64;
    let mut ddnorm = 0.0;
    let mut res2 = 0.0;
    let mut xxnorm = 0.0;
    let mut z = 0.0;
    let mut cs2 = -1.0;
    let mut sn2 = 0.0;
    let mut stop = None;

    while out.iterations < iter_lim {
        out.iterations += 1;

        // Bidiagonalization step: beta u = A v - alpha u, alpha v = Aᵀ u - beta v.
        let av = a.mul_vec(&v);
        for (ui, avi) in u.iter_mut().zip(&av) {
            *ui = avi - alpha * *ui;
        }
        beta = norm(&u);
        if beta > 0.0 {
            scale(&mut u, 1.0 / beta);
            anorm = (anorm * anorm + alpha * alpha + beta * beta + dampsq).sqrt();
            let atu = a.mul_transpose_vec(&u);
            for (vi, atui) in v.iter_mut().zip(&atu) {
                *vi = atui - beta * *vi;
            }
            alpha = norm(&v);
            if alpha > 0.0 {
                scale(&mut v, 1.0 / alpha);
            }
        }

        // Fold the damping term into the rotation.
        let (rhobar1, psi) = if damp > 0.0 {
            let rhobar1 = (rhobar * rhobar + dampsq).sqrt();
            let cs1 = rhobar / rhobar1;
            let sn1 = damp / rhobar1;
            let psi = sn1 * phibar;
            phibar *= cs1;
            (rhobar1, psi)
        } else {
            (rhobar, 0.0)
        };

        let (cs, sn, rho) = sym_ortho(rhobar1, beta);
        let theta = sn * alpha;
        rhobar = -cs * alpha;
        let phi = cs * phibar;
        phibar *= sn;
        let tau = sn * phi;

        // Update x and w.
        let t1 = phi / rho;
        let t2 = -theta / rho;
        let mut dknorm_sq = 0.0;
        for ((xi, wi), vi) in out.x.iter_mut().zip(w.iter_mut()).zip(&v) {
            let dk = *wi / rho;
            dknorm_sq += dk * dk;
            *xi += t1 * *wi;
            *wi = vi + t2 * *wi;
        }
        ddnorm += dknorm_sq;

        // Estimate ‖x‖ by a second rotation.
        let delta = sn2 * rho;
        let gambar = -cs2 * rho;
        let rhs = phi - delta * z;
        let zbar = rhs / gambar;
        out.xnorm = (xxnorm + zbar * zbar).sqrt();
        let gamma = (gambar * gambar + theta * theta).sqrt();
        cs2 = gambar / gamma;
        sn2 = theta / gamma;
        z = rhs / gamma;
        xxnorm += z * z;

        out.anorm = anorm;
        out.acond = anorm * ddnorm.sqrt();
        let res1 = phibar * phibar;
        res2 += psi * psi;
        let rnorm = (res1 + res2).sqrt();
        out.arnorm = alpha * tau.abs();

        let r1sq = rnorm * rnorm - dampsq * xxnorm;
        out.r1norm = r1sq.abs().sqrt().copysign(r1sq);
        out.r2norm = rnorm;

        let test1 = rnorm / bnorm;
        let test2 = out.arnorm / (anorm * rnorm + eps);
        let test3 = 1.0 / (out.acond + eps);
        let t1 = test1 / (1.0 + anorm * out.xnorm / bnorm);
        let rtol = btol + atol * anorm * out.xnorm / bnorm;

        // Later tests take precedence, as in the reference algorithm.
        if out.iterations >= iter_lim {
            stop = Some(StopReason::IterationLimit);
        }
        if 1.0 + test3 <= 1.0 {
            stop = Some(StopReason::ConditionEps);
        }
        if 1.0 + test2 <= 1.0 {
            stop = Some(StopReason::LeastSquaresEps);
        }
        if 1.0 + t1 <= 1.0 {
            stop = Some(StopReason::CompatibleEps);
        }
        if test3 <= ctol {
            stop = Some(StopReason::ConditionLimit);
        }
        if test2 <= atol {
            stop = Some(StopReason::LeastSquares);
        }
        if test1 <= rtol {
            stop = Some(StopReason::Compatible);
        }
        if stop.is_some() {
            break;
        }
    }

    out.stop = stop.unwrap_or(StopReason::IterationLimit);
    out
}
