use crate::expr::Expr;
use num_traits::Zero;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

impl Expr {
    fn add_ref(&self, rhs: &Expr) -> Expr {
        let mut out = self.clone();
        out.add_assign_ref(rhs);
        out
    }

    fn add_assign_ref(&mut self, rhs: &Expr) {
        for (monomial, coefficient) in rhs.terms() {
            self.add_term(monomial.clone(), *coefficient);
        }
    }

    fn sub_ref(&self, rhs: &Expr) -> Expr {
        let mut out = self.clone();
        for (monomial, coefficient) in rhs.terms() {
            out.add_term(monomial.clone(), -*coefficient);
        }
        out
    }

    fn mul_ref(&self, rhs: &Expr) -> Expr {
        let mut out = Expr::zero();
        if self.is_zero() || rhs.is_zero() {
            return out;
        }
        for (lm, lc) in self.terms() {
            for (rm, rc) in rhs.terms() {
                out.add_term(lm.mul(rm), *lc * *rc);
            }
        }
        out
    }

    fn neg_ref(&self) -> Expr {
        let mut out = Expr::zero();
        for (monomial, coefficient) in self.terms() {
            out.add_term(monomial.clone(), -*coefficient);
        }
        out
    }
}

macro_rules! forward_binop {
    ($imp:ident, $method:ident, $inner:ident) => {
        impl $imp<Expr> for Expr {
            type Output = Expr;
            fn $method(self, rhs: Expr) -> Expr {
                self.$inner(&rhs)
            }
        }

        impl $imp<&Expr> for Expr {
            type Output = Expr;
            fn $method(self, rhs: &Expr) -> Expr {
                self.$inner(rhs)
            }
        }

        impl $imp<Expr> for &Expr {
            type Output = Expr;
            fn $method(self, rhs: Expr) -> Expr {
                self.$inner(&rhs)
            }
        }

        impl $imp<&Expr> for &Expr {
            type Output = Expr;
            fn $method(self, rhs: &Expr) -> Expr {
                self.$inner(rhs)
            }
        }
    };
}

forward_binop!(Add, add, add_ref);
forward_binop!(Sub, sub, sub_ref);
forward_binop!(Mul, mul, mul_ref);

impl Neg for Expr {
    type Output = Expr;
    fn neg(self) -> Expr {
        self.neg_ref()
    }
}

impl Neg for &Expr {
    type Output = Expr;
    fn neg(self) -> Expr {
        self.neg_ref()
    }
}

impl AddAssign<Expr> for Expr {
    fn add_assign(&mut self, rhs: Expr) {
        self.add_assign_ref(&rhs);
    }
}

impl AddAssign<&Expr> for Expr {
    fn add_assign(&mut self, rhs: &Expr) {
        self.add_assign_ref(rhs);
    }
}

impl SubAssign<Expr> for Expr {
    fn sub_assign(&mut self, rhs: Expr) {
        *self = self.sub_ref(&rhs);
    }
}

impl SubAssign<&Expr> for Expr {
    fn sub_assign(&mut self, rhs: &Expr) {
        *self = self.sub_ref(rhs);
    }
}

impl MulAssign<Expr> for Expr {
    fn mul_assign(&mut self, rhs: Expr) {
        *self = self.mul_ref(&rhs);
    }
}

impl MulAssign<&Expr> for Expr {
    fn mul_assign(&mut self, rhs: &Expr) {
        *self = self.mul_ref(rhs);
    }
}
