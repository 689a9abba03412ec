use super::FloatT;

/// Operations on dense vectors of [`FloatT`].
///
/// Mutating operations return `self` so that they can be chained, as in
/// `x.copy_from(&v).hadamard(&d)`.  Operations on two vectors panic if
/// the lengths differ.
pub trait VectorOps {
    type T;

    fn copy_from(&mut self, src: &Self) -> &mut Self;

    /// `self[i] = f(self[i])`
    fn map_in_place(&mut self, f: impl Fn(Self::T) -> Self::T) -> &mut Self;

    /// `self[i] = f(src[i])`
    fn map_from(&mut self, f: impl Fn(Self::T) -> Self::T, src: &Self) -> &mut Self;

    fn set(&mut self, c: Self::T) -> &mut Self;

    fn scale(&mut self, c: Self::T) -> &mut Self;

    /// `self[i] *= y[i]`
    fn hadamard(&mut self, y: &Self) -> &mut Self;

    fn dot(&self, y: &Self) -> Self::T;

    /// Largest magnitude, zero when empty.  NaN if any entry is NaN.
    fn norm_inf(&self) -> Self::T;

    /// `max |self[i] * v[i]|`
    fn norm_inf_scaled(&self, v: &Self) -> Self::T;

    /// `max |self[i] - b[i]|`
    fn norm_inf_diff(&self, b: &Self) -> Self::T;

    /// Mean value, zero when empty.
    fn mean(&self) -> Self::T;

    /// No NaN or infinite entries.
    fn is_finite(&self) -> bool;

    /// `self = a*x + b*self`
    fn axpby(&mut self, a: Self::T, x: &Self, b: Self::T) -> &mut Self;

    /// `self = a*x + b*y`
    fn waxpby(&mut self, a: Self::T, x: &Self, b: Self::T, y: &Self) -> &mut Self;
}

fn max_abs<T: FloatT>(values: impl Iterator<Item = T>) -> T {
    let mut out = T::zero();
    for v in values.map(T::abs) {
        if v.is_nan() {
            return v;
        }
        if v > out {
            out = v;
        }
    }
    out
}

impl<T: FloatT> VectorOps for [T] {
    type T = T;

    fn copy_from(&mut self, src: &[T]) -> &mut Self {
        self.copy_from_slice(src);
        self
    }

    fn map_in_place(&mut self, f: impl Fn(T) -> T) -> &mut Self {
        self.iter_mut().for_each(|x| *x = f(*x));
        self
    }

    fn map_from(&mut self, f: impl Fn(T) -> T, src: &[T]) -> &mut Self {
        assert_eq!(self.len(), src.len());
        for (x, &s) in self.iter_mut().zip(src) {
            *x = f(s);
        }
        self
    }

    fn set(&mut self, c: T) -> &mut Self {
        self.fill(c);
        self
    }

    fn scale(&mut self, c: T) -> &mut Self {
        self.map_in_place(|x| x * c)
    }

    fn hadamard(&mut self, y: &[T]) -> &mut Self {
        assert_eq!(self.len(), y.len());
        for (x, &y) in self.iter_mut().zip(y) {
            *x *= y;
        }
        self
    }

    fn dot(&self, y: &[T]) -> T {
        assert_eq!(self.len(), y.len());
        self.iter()
            .zip(y)
            .fold(T::zero(), |acc, (&a, &b)| acc + a * b)
    }

    fn norm_inf(&self) -> T {
        max_abs(self.iter().copied())
    }

    fn norm_inf_scaled(&self, v: &[T]) -> T {
        assert_eq!(self.len(), v.len());
        max_abs(self.iter().zip(v).map(|(&x, &s)| x * s))
    }

    fn norm_inf_diff(&self, b: &[T]) -> T {
        assert_eq!(self.len(), b.len());
        max_abs(self.iter().zip(b).map(|(&x, &y)| x - y))
    }

    fn mean(&self) -> T {
        if self.is_empty() {
            return T::zero();
        }
        let total = self.iter().fold(T::zero(), |acc, &x| acc + x);
        total / T::from_usize(self.len()).unwrap_or_else(T::nan)
    }

    fn is_finite(&self) -> bool {
        self.iter().all(|&x| T::is_finite(x))
    }

    fn axpby(&mut self, a: T, x: &[T], b: T) -> &mut Self {
        assert_eq!(self.len(), x.len());
        for (y, &x) in self.iter_mut().zip(x) {
            *y = a * x + b * *y;
        }
        self
    }

    fn waxpby(&mut self, a: T, x: &[T], b: T, y: &[T]) -> &mut Self {
        assert_eq!(self.len(), x.len());
        assert_eq!(self.len(), y.len());
        for (w, (&u, &v)) in self.iter_mut().zip(x.iter().zip(y)) {
            *w = a * u + b * v;
        }
        self
    }
}
