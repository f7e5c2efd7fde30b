//! Blocked dense matrix multiplication used as the optimized kernel.
//!
//! All matrices are column-major with an explicit leading dimension. Operands
//! may be read transposed; the transpose is folded into the packing step so
//! the micro-kernel always sees the same panel layout.

use rayon::{
    iter::{IndexedParallelIterator, ParallelIterator},
    slice::ParallelSliceMut,
};
use std::cmp::min;

use crate::{scalar::Scalar, KC, MC, MR, NC, NR, PAR_THRESHOLD};

/// Indicate whether a matrix should be implicitly transposed for an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transpose {
    /// Use a provided matrix directly.
    None,
    /// Use the transpose of a matrix.
    Ordinary,
}

impl Transpose {
    pub fn is_transpose(&self) -> bool {
        matches!(self, Self::Ordinary)
    }

    /// Forward one of the arguments, depending on the value of `self`.
    pub fn forward<T>(&self, if_none: T, if_transpose: T) -> T {
        match self {
            Self::None => if_none,
            Self::Ordinary => if_transpose,
        }
    }
}

/// Calculates the 1D index for a 2D array element in column-major order.
#[inline(always)]
pub(crate) fn at(i: usize, j: usize, ld: usize) -> usize {
    (j * ld) + i
}

/// Read-only view of a column-major matrix, possibly transposed.
#[derive(Clone, Copy)]
struct MatRef<'a, T> {
    data: &'a [T],
    ld: usize,
    trans: Transpose,
}

impl<T: Copy> MatRef<'_, T> {
    /// Element `(i, j)` of the logical (post-transpose) matrix.
    #[inline(always)]
    fn get(&self, i: usize, j: usize) -> T {
        match self.trans {
            Transpose::None => self.data[at(i, j, self.ld)],
            Transpose::Ordinary => self.data[at(j, i, self.ld)],
        }
    }
}

/// Packs a `kc x nr` panel of B starting at logical `(pc, jc)`.
///
/// Each of the `kc` rows holds `nr` elements followed by zeros up to `NR`, so
/// the result has exactly `kc * NR` entries.
fn pack_panel_b<T: Scalar>(b: MatRef<'_, T>, pc: usize, jc: usize, kc: usize, nr: usize) -> Vec<T> {
    assert!(
        nr <= NR,
        "nr (actual columns: {}) cannot exceed NR (target packed width: {})",
        nr,
        NR
    );

    let mut panel = vec![T::zero(); kc * NR];
    for p in 0..kc {
        let row_start = p * NR;
        for j in 0..nr {
            panel[row_start + j] = b.get(pc + p, jc + j);
        }
    }
    panel
}

/// Packs an `kc x nc` block of B as consecutive `NR`-wide panels.
fn pack_block_b<T: Scalar>(b: MatRef<'_, T>, pc: usize, jc: usize, kc: usize, nc: usize) -> Vec<T> {
    let mut block = Vec::with_capacity(nc.div_ceil(NR) * NR * kc);
    for j in (0..nc).step_by(NR) {
        let nr = min(NR, nc - j);
        block.extend(pack_panel_b(b, pc, jc + j, kc, nr));
    }
    block
}

/// Packs an `mr x kc` panel of A starting at logical `(ic, pc)`.
///
/// For each `p` the `mr` entries of column `pc + p` are stored contiguously and
/// padded with zeros up to `MR`.
fn pack_panel_a<T: Scalar>(a: MatRef<'_, T>, ic: usize, pc: usize, mr: usize, kc: usize) -> Vec<T> {
    let mut panel = Vec::with_capacity(kc * MR);
    for p in 0..kc {
        for i in 0..mr {
            panel.push(a.get(ic + i, pc + p));
        }
        panel.extend(std::iter::repeat(T::zero()).take(MR - mr));
    }
    panel
}

/// Packs an `mc x kc` block of A as consecutive `MR`-high panels.
fn pack_block_a<T: Scalar>(a: MatRef<'_, T>, ic: usize, pc: usize, mc: usize, kc: usize) -> Vec<T> {
    let mut block = Vec::with_capacity(mc.div_ceil(MR) * MR * kc);
    for i in (0..mc).step_by(MR) {
        let mr = min(MR, mc - i);
        block.extend(pack_panel_a(a, ic + i, pc, mr, kc));
    }
    block
}

/// How the first K-block combines with what is already in C.
#[derive(Clone, Copy)]
enum Update<T> {
    Overwrite,
    Scale(T),
    Accumulate,
}

/// Computes an `mr_eff x nr_eff` tile of `alpha * A_panel * B_panel` and
/// merges it into `c_micro_panel`.
#[allow(clippy::too_many_arguments, clippy::needless_range_loop, non_snake_case)]
fn kernel_MRxNR<T: Scalar>(
    a_panel: &[T],
    b_panel: &[T],
    c_micro_panel: &mut [T],
    mr_eff: usize,
    nr_eff: usize,
    kc: usize,
    ldc: usize,
    alpha: T,
    update: Update<T>,
) {
    debug_assert!(
        mr_eff <= MR,
        "mr_eff ({}) must be less than or equal to MR ({})",
        mr_eff,
        MR
    );
    debug_assert!(
        nr_eff <= NR,
        "nr_eff ({}) must be less than or equal to NR ({})",
        nr_eff,
        NR
    );

    let mut acc = [[T::zero(); MR]; NR];

    for p in 0..kc {
        let a_col = &a_panel[p * MR..p * MR + MR];
        let b_row = &b_panel[p * NR..p * NR + NR];
        for j in 0..NR {
            let b_scalar = b_row[j];
            for i in 0..MR {
                acc[j][i] = acc[j][i] + a_col[i] * b_scalar;
            }
        }
    }

    for j in 0..nr_eff {
        let column = &mut c_micro_panel[j * ldc..j * ldc + mr_eff];
        for (i, c) in column.iter_mut().enumerate() {
            let value = alpha * acc[j][i];
            *c = match update {
                Update::Overwrite => value,
                Update::Scale(beta) => value + beta * *c,
                Update::Accumulate => *c + value,
            };
        }
    }
}

/// Multiplies into one `m x nc` column block of C, starting at column `jc`.
#[allow(clippy::too_many_arguments)]
fn gemm_column_block<T: Scalar>(
    a: MatRef<'_, T>,
    b: MatRef<'_, T>,
    c_chunk: &mut [T],
    jc: usize,
    m: usize,
    n: usize,
    k: usize,
    alpha: T,
    beta: Option<T>,
    ldc: usize,
) {
    if jc >= n {
        return;
    }
    let nc = min(NC, n - jc);

    for pc in (0..k).step_by(KC) {
        let kc = min(KC, k - pc);
        let update = match (pc, beta) {
            (0, None) => Update::Overwrite,
            (0, Some(beta)) => Update::Scale(beta),
            _ => Update::Accumulate,
        };

        let block_b_packed = pack_block_b(b, pc, jc, kc, nc);

        for ic in (0..m).step_by(MC) {
            let mc = min(MC, m - ic);
            let block_a_packed = pack_block_a(a, ic, pc, mc, kc);

            for (jr_idx, b_panel) in block_b_packed.chunks(kc * NR).enumerate() {
                for (ir_idx, a_panel) in block_a_packed.chunks(MR * kc).enumerate() {
                    let nr_eff = min(NR, nc - jr_idx * NR);
                    let mr_eff = min(MR, mc - ir_idx * MR);

                    let start = at(ic + ir_idx * MR, jr_idx * NR, ldc);
                    kernel_MRxNR(
                        a_panel,
                        b_panel,
                        &mut c_chunk[start..],
                        mr_eff,
                        nr_eff,
                        kc,
                        ldc,
                        alpha,
                        update,
                    );
                }
            }
        }
    }
}

/// General matrix multiplication on column-major storage.
///
/// Performs
/// ```ignore
/// c = alpha * op(a) * op(b) + [beta * c]
/// ```
/// where `op(x)` is `x` or its transpose according to `transa`/`transb`. If
/// `beta` is `None` the destination is overwritten without being read.
///
/// * `m`: rows of `c` and of `op(a)`.
/// * `n`: columns of `c` and of `op(b)`.
/// * `k`: columns of `op(a)` and rows of `op(b)`.
/// * `lda`, `ldb`, `ldc`: leading dimensions (row counts of the stored
///   matrices).
///
/// The loop nest follows the GotoBLAS/BLIS layout: columns of C in `NC`
/// blocks, the K dimension in `KC` blocks, rows in `MC` blocks, and an
/// `MR x NR` register tile at the bottom. Column blocks run in parallel with
/// rayon once `m * n * k` reaches `PAR_THRESHOLD`.
///
/// # Panics
///
/// Panics if any slice is too short for the given dimensions.
#[allow(clippy::too_many_arguments)]
pub fn gemm<T: Scalar>(
    transa: Transpose,
    transb: Transpose,
    m: usize,
    n: usize,
    k: usize,
    alpha: T,
    a: &[T],
    lda: usize,
    b: &[T],
    ldb: usize,
    beta: Option<T>,
    c: &mut [T],
    ldc: usize,
) {
    if m == 0 || n == 0 {
        return;
    }
    assert!(ldc >= m, "ldc ({}) must be at least m ({})", ldc, m);
    assert!(
        c.len() >= at(m, n - 1, ldc),
        "c slice length {} is insufficient for a {}x{} matrix with ldc={}",
        c.len(),
        m,
        n,
        ldc
    );

    if k == 0 {
        for j in 0..n {
            for value in &mut c[at(0, j, ldc)..at(m, j, ldc)] {
                *value = match beta {
                    Some(beta) => beta * *value,
                    None => T::zero(),
                };
            }
        }
        return;
    }

    let (a_rows, a_cols) = transa.forward((m, k), (k, m));
    let (b_rows, b_cols) = transb.forward((k, n), (n, k));
    assert!(
        lda >= a_rows && a.len() >= at(a_rows, a_cols - 1, lda),
        "a slice length {} is insufficient for a {}x{} matrix with lda={}",
        a.len(),
        a_rows,
        a_cols,
        lda
    );
    assert!(
        ldb >= b_rows && b.len() >= at(b_rows, b_cols - 1, ldb),
        "b slice length {} is insufficient for a {}x{} matrix with ldb={}",
        b.len(),
        b_rows,
        b_cols,
        ldb
    );

    let a = MatRef {
        data: a,
        ld: lda,
        trans: transa,
    };
    let b = MatRef {
        data: b,
        ld: ldb,
        trans: transb,
    };

    if m * n * k >= PAR_THRESHOLD {
        c.par_chunks_mut(ldc * NC)
            .enumerate()
            .for_each(|(j_idx, c_chunk)| {
                gemm_column_block(a, b, c_chunk, j_idx * NC, m, n, k, alpha, beta, ldc)
            });
    } else {
        c.chunks_mut(ldc * NC)
            .enumerate()
            .for_each(|(j_idx, c_chunk)| {
                gemm_column_block(a, b, c_chunk, j_idx * NC, m, n, k, alpha, beta, ldc)
            });
    }
}
