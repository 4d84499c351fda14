use std::cmp::Ordering;

use polyhedra_core::types::{ComputationStatus, Row};
use tracing::debug;

use crate::dd::HalfspaceOrder;
use crate::dd::state::{ConeBasisPrep, ConeDd, ConeOutput};
use crate::error::Result;
use crate::linalg::{self, Echelon};
use crate::num::Num;

impl<N: Num> ConeBasisPrep<N> {
    /// Chooses the initial basis and runs the iteration to completion.
    pub fn run_dd(self) -> Result<ConeOutput<N>> {
        self.find_initial_basis().run_to_completion()
    }

    /// Picks pivot rows (equalities first), derives the lines and the initial simplicial cone.
    pub fn find_initial_basis(self) -> ConeDd<N> {
        let mut state = self.state;
        let cols = state.col_count();
        let m = state.row_count();
        let eps = state.cone.eps.clone();

        let offer_order: Vec<Row> = state
            .cone
            .equalities
            .iter()
            .raw()
            .chain(state.cone.equalities.iter().complement().raw())
            .collect();

        let mut echelon = Echelon::new(cols);
        let mut pivot_rows: Vec<Row> = Vec::new();
        for &row in &offer_order {
            if echelon.rank() == cols {
                break;
            }
            if echelon.offer(&state.cone.rows[row], &eps) {
                pivot_rows.push(row);
            }
        }
        let rank = echelon.rank();
        state.iter_state.rank = rank;

        state.lines = echelon
            .nullspace()
            .into_iter()
            .map(|mut line| {
                N::normalize_direction(&mut line, &eps);
                line
            })
            .collect();

        for &row in &pivot_rows {
            state.initial_halfspaces.insert(row);
            state.added_halfspaces.insert(row);
        }
        // Dependent equalities are implied by the pivot equalities offered before them.
        for row in state.cone.equalities.iter() {
            state.added_halfspaces.insert(row);
        }

        debug!(
            rows = m,
            cols,
            rank,
            lines = state.lines.len(),
            "initial basis selected"
        );

        if rank == 0 {
            for row in 0..m {
                state.added_halfspaces.insert(row);
            }
            state.comp_status = ComputationStatus::AllFound;
            return ConeDd { state };
        }

        let pivot_cols = echelon.pivot_columns().to_vec();
        let sub: Vec<Vec<N>> = pivot_rows
            .iter()
            .map(|&row| {
                let source = &state.cone.rows[row];
                pivot_cols.iter().map(|&c| source[c].clone()).collect()
            })
            .collect();
        let Some(inverse) = linalg::invert(&sub, &eps) else {
            tracing::warn!(rank, "pivot block became singular under tolerance");
            state.comp_status = ComputationStatus::AllFound;
            return ConeDd { state };
        };

        for (j, &row) in pivot_rows.iter().enumerate() {
            if state.cone.equalities.contains(row) {
                continue;
            }
            let mut vector = vec![N::zero(); cols];
            for (k, &c) in pivot_cols.iter().enumerate() {
                vector[c] = inverse[k][j].clone();
            }
            N::normalize_direction(&mut vector, &eps);
            let zero_set = state.cone.zero_set(&vector);
            state.insert_ray(vector, zero_set);
        }

        let mut pending: Vec<Row> = (0..m)
            .filter(|&row| !state.added_halfspaces.contains(row))
            .collect();
        match state.halfspace_order() {
            HalfspaceOrder::MinIndex => {}
            HalfspaceOrder::MaxIndex => pending.reverse(),
            HalfspaceOrder::LexMin => {
                let rows = &state.cone.rows;
                pending.sort_by(|&a, &b| match linalg::lex_cmp(&rows[a], &rows[b], &eps) {
                    Ordering::Equal => a.cmp(&b),
                    ord => ord,
                });
            }
        }
        state.iter_state.pending = pending;
        state.iter_state.cursor = 0;

        ConeDd { state }
    }
}
