//! Dimension-checked matrix helpers.
//!
//! Every function here is pure: operands are borrowed, never modified, and the
//! result is a freshly allocated matrix. Shape checks run before any arithmetic,
//! so a mismatch never yields a partial result.

use crate::error::{NetworkError, Result};
use crate::math::matrix::Matrix;

/// Matrix product `a · b`. Requires `a.cols == b.rows`; result is `a.rows × b.cols`.
pub fn dot(a: &Matrix, b: &Matrix) -> Result<Matrix> {
    if a.cols() != b.rows() {
        return Err(NetworkError::mismatch("dot", a.shape(), b.shape()));
    }

    let (n, m, p) = (a.rows(), a.cols(), b.cols());
    let lhs = a.as_slice();
    let rhs = b.as_slice();
    let mut out = vec![0.0; n * p];

    for i in 0..n {
        let row = &lhs[i * m..(i + 1) * m];
        let dst = &mut out[i * p..(i + 1) * p];
        for (k, &x) in row.iter().enumerate() {
            let rhs_row = &rhs[k * p..(k + 1) * p];
            for (d, &y) in dst.iter_mut().zip(rhs_row) {
                *d += x * y;
            }
        }
    }

    Matrix::from_vec(n, p, out)
}

/// Element-wise (Hadamard) product.
pub fn multiply(a: &Matrix, b: &Matrix) -> Result<Matrix> {
    zip_with("multiply", a, b, |x, y| x * y)
}

pub fn add(a: &Matrix, b: &Matrix) -> Result<Matrix> {
    zip_with("add", a, b, |x, y| x + y)
}

/// Element-wise `a - b`.
pub fn subtract(a: &Matrix, b: &Matrix) -> Result<Matrix> {
    zip_with("subtract", a, b, |x, y| x - y)
}

pub fn scale(k: f64, a: &Matrix) -> Matrix {
    apply_function(|x| x * k, a)
}

/// Applies `f` to every element.
pub fn apply_function<F>(f: F, a: &Matrix) -> Matrix
where
    F: Fn(f64) -> f64,
{
    a.with_data(a.iter().map(|&x| f(x)).collect())
}

fn zip_with<F>(op: &'static str, a: &Matrix, b: &Matrix, f: F) -> Result<Matrix>
where
    F: Fn(f64, f64) -> f64,
{
    if a.shape() != b.shape() {
        return Err(NetworkError::mismatch(op, a.shape(), b.shape()));
    }
    Ok(a.with_data(a.iter().zip(b.iter()).map(|(&x, &y)| f(x, y)).collect()))
}
