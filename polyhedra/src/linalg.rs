//! Dense row operations over [`Num`], with sign tests routed through an [`Epsilon`].

use std::cmp::Ordering;

use crate::num::{Epsilon, Num};

pub fn dot<N: Num>(a: &[N], b: &[N]) -> N {
    debug_assert_eq!(a.len(), b.len(), "dot product length mismatch");
    let mut acc = N::zero();
    for (x, y) in a.iter().zip(b) {
        acc = acc.ref_add(&x.ref_mul(y));
    }
    acc
}

/// `out = ca * a + cb * b`.
pub fn lin_comb2_into<N: Num>(out: &mut Vec<N>, a: &[N], ca: &N, b: &[N], cb: &N) {
    out.clear();
    out.extend(
        a.iter()
            .zip(b)
            .map(|(x, y)| x.ref_mul(ca).ref_add(&y.ref_mul(cb))),
    );
}

pub fn is_zero_vector<N: Num>(v: &[N], eps: &impl Epsilon<N>) -> bool {
    v.iter().all(|x| eps.is_zero(x))
}

pub fn vectors_equal<N: Num>(a: &[N], b: &[N], eps: &impl Epsilon<N>) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| eps.cmp(x, y) == Ordering::Equal)
}

/// Lexicographic comparison under the tolerance; a strict prefix sorts first.
pub fn lex_cmp<N: Num>(a: &[N], b: &[N], eps: &impl Epsilon<N>) -> Ordering {
    for (x, y) in a.iter().zip(b) {
        match eps.cmp(x, y) {
            Ordering::Equal => continue,
            ord => return ord,
        }
    }
    a.len().cmp(&b.len())
}

/// Incrementally maintained reduced row echelon form.
///
/// Rows are offered one at a time; those independent of the rows accepted so far are
/// reduced and kept, the rest are rejected.
#[derive(Clone, Debug)]
pub struct Echelon<N: Num> {
    cols: usize,
    rows: Vec<Vec<N>>,
    pivots: Vec<usize>,
}

impl<N: Num> Echelon<N> {
    pub fn new(cols: usize) -> Self {
        Self {
            cols,
            rows: Vec::new(),
            pivots: Vec::new(),
        }
    }

    pub fn rank(&self) -> usize {
        self.rows.len()
    }

    pub fn pivot_columns(&self) -> &[usize] {
        &self.pivots
    }

    pub fn rows(&self) -> &[Vec<N>] {
        &self.rows
    }

    /// Reduces `row` against the accepted rows and keeps it when something survives.
    pub fn offer(&mut self, row: &[N], eps: &impl Epsilon<N>) -> bool {
        debug_assert_eq!(row.len(), self.cols);
        let mut work = row.to_vec();
        for (basis, &pivot) in self.rows.iter().zip(&self.pivots) {
            if eps.is_zero(&work[pivot]) {
                continue;
            }
            let factor = work[pivot].clone();
            for (w, b) in work.iter_mut().zip(basis) {
                *w = w.ref_sub(&factor.ref_mul(b));
            }
        }
        let Some(pivot) = (0..self.cols).find(|&c| !eps.is_zero(&work[c])) else {
            return false;
        };
        let inv = N::one().ref_div(&work[pivot]);
        for w in work.iter_mut() {
            *w = if eps.is_zero(w) {
                N::zero()
            } else {
                w.ref_mul(&inv)
            };
        }
        for basis in self.rows.iter_mut() {
            if eps.is_zero(&basis[pivot]) {
                continue;
            }
            let factor = basis[pivot].clone();
            for (b, w) in basis.iter_mut().zip(&work) {
                *b = b.ref_sub(&factor.ref_mul(w));
            }
        }
        self.rows.push(work);
        self.pivots.push(pivot);
        true
    }

    /// Basis of `{ x : row · x = 0 }` for every accepted row, one vector per free column.
    pub fn nullspace(&self) -> Vec<Vec<N>> {
        let mut is_pivot = vec![false; self.cols];
        for &p in &self.pivots {
            is_pivot[p] = true;
        }
        (0..self.cols)
            .filter(|&c| !is_pivot[c])
            .map(|free| {
                let mut v = vec![N::zero(); self.cols];
                v[free] = N::one();
                for (row, &p) in self.rows.iter().zip(&self.pivots) {
                    v[p] = row[free].ref_neg();
                }
                v
            })
            .collect()
    }
}

/// Rank of the given rows.
pub fn rank<'a, N: Num>(
    cols: usize,
    rows: impl IntoIterator<Item = &'a [N]>,
    eps: &impl Epsilon<N>,
) -> usize {
    let mut echelon = Echelon::new(cols);
    for row in rows {
        echelon.offer(row, eps);
        if echelon.rank() == cols {
            break;
        }
    }
    echelon.rank()
}

/// Inverse of a square matrix given as rows, or `None` when singular.
pub fn invert<N: Num>(matrix: &[Vec<N>], eps: &impl Epsilon<N>) -> Option<Vec<Vec<N>>> {
    let n = matrix.len();
    let mut aug: Vec<Vec<N>> = matrix
        .iter()
        .enumerate()
        .map(|(i, row)| {
            debug_assert_eq!(row.len(), n);
            let mut r = row.clone();
            r.extend((0..n).map(|j| if i == j { N::one() } else { N::zero() }));
            r
        })
        .collect();
    for col in 0..n {
        let pivot = (col..n).find(|&r| !eps.is_zero(&aug[r][col]))?;
        aug.swap(col, pivot);
        let inv = N::one().ref_div(&aug[col][col]);
        for v in aug[col].iter_mut() {
            *v = v.ref_mul(&inv);
        }
        let pivot_row = aug[col].clone();
        for (r, row) in aug.iter_mut().enumerate() {
            if r == col || eps.is_zero(&row[col]) {
                continue;
            }
            let factor = row[col].clone();
            for (v, p) in row.iter_mut().zip(&pivot_row) {
                *v = v.ref_sub(&factor.ref_mul(p));
            }
        }
    }
    Some(aug.into_iter().map(|row| row[n..].to_vec()).collect())
}

#[cfg(test)]
mod tests {
    use super::{Echelon, dot, invert, lex_cmp, rank};
    use crate::num::{Num, Rat};
    use std::cmp::Ordering;

    fn rats(values: &[i64]) -> Vec<Rat> {
        values.iter().map(|&v| Rat::from(v)).collect()
    }

    #[test]
    fn nullspace_is_orthogonal_to_rows() {
        let eps = Rat::default_eps();
        let mut ech = Echelon::new(4);
        assert!(ech.offer(&rats(&[1, 2, 0, 1]), &eps));
        assert!(ech.offer(&rats(&[0, 1, 1, 0]), &eps));
        assert!(!ech.offer(&rats(&[1, 3, 1, 1]), &eps));
        let null = ech.nullspace();
        assert_eq!(null.len(), 2);
        for v in &null {
            assert_eq!(dot(&rats(&[1, 2, 0, 1]), v), Rat::from(0));
            assert_eq!(dot(&rats(&[0, 1, 1, 0]), v), Rat::from(0));
        }
    }

    #[test]
    fn rank_and_inverse_agree() {
        let eps = Rat::default_eps();
        let m = vec![rats(&[2, 1]), rats(&[1, 1])];
        assert_eq!(rank(2, m.iter().map(Vec::as_slice), &eps), 2);
        let inv = invert(&m, &eps).unwrap();
        assert_eq!(inv, vec![rats(&[1, -1]), rats(&[-1, 2])]);
        assert!(invert(&[rats(&[1, 2]), rats(&[2, 4])], &eps).is_none());
    }

    #[test]
    fn lex_cmp_uses_tolerance() {
        let eps = f64::default_eps();
        assert_eq!(lex_cmp(&[1.0, 2.0], &[1.0 + 1e-12, 3.0], &eps), Ordering::Less);
        assert_eq!(lex_cmp(&[1.0], &[1.0, 0.0], &eps), Ordering::Less);
    }
}
