use crate::{SymbolicErrors, evaluate::Bindings, expr::Expr};
use nalgebra::DMatrix;

pub fn simplify_matrix(m: &DMatrix<Expr>) -> DMatrix<Expr> {
    m.map(|e| e.simplify())
}

pub fn evaluate_matrix(
    m: &DMatrix<Expr>,
    bindings: &Bindings,
) -> Result<DMatrix<f64>, SymbolicErrors> {
    let mut out = DMatrix::<f64>::zeros(m.nrows(), m.ncols());
    for i in 0..m.nrows() {
        for j in 0..m.ncols() {
            out[(i, j)] = m[(i, j)].evaluate(bindings)?;
        }
    }
    Ok(out)
}

/// True if the matrix is square and equal to its transpose entry by entry.
pub fn is_symmetric(m: &DMatrix<Expr>) -> bool {
    if m.nrows() != m.ncols() {
        return false;
    }
    (0..m.nrows()).all(|i| (0..i).all(|j| m[(i, j)] == m[(j, i)]))
}

/// One row per line, entries separated by commas.
pub fn matrix_to_text(m: &DMatrix<Expr>) -> String {
    m.row_iter()
        .map(|row| {
            let entries: Vec<String> = row.iter().map(|e| e.to_string()).collect();
            format!("[{}]", entries.join(", "))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn matrix_to_latex(m: &DMatrix<Expr>) -> String {
    let rows: Vec<String> = m
        .row_iter()
        .map(|row| {
            row.iter()
                .map(|e| e.to_latex())
                .collect::<Vec<_>>()
                .join(" & ")
        })
        .collect();
    format!(
        "\\left[\\begin{{matrix}}{}\\end{{matrix}}\\right]",
        rows.join("\\\\")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::Symbol;

    #[test]
    fn test_matrix_output() {
        let a = Expr::from(Symbol::real("a").unwrap());
        let m = DMatrix::from_row_slice(
            2,
            2,
            &[a.clone(), Expr::integer(1), Expr::integer(1), a.pow(2)],
        );
        assert!(is_symmetric(&m));
        assert_eq!(matrix_to_text(&m), "[a, 1]\n[1, a^2]");
        assert_eq!(
            matrix_to_latex(&m),
            "\\left[\\begin{matrix}a & 1\\\\1 & a^{2}\\end{matrix}\\right]"
        );
    }
}
