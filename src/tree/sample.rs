//! Feature access for prediction.
//!
//! [`FeatureVector`] provides read-only access to one sample's feature
//! values, so traversal works directly on slices, fixed-size arrays, and
//! `ndarray` views without wrapper types. The tree never validates
//! feature-vector length; out-of-range access panics.

/// Access the feature values of a single sample.
pub trait FeatureVector {
    /// Get the feature value at the given index.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range for this sample.
    fn feature(&self, index: usize) -> f64;

    /// Number of features in this sample.
    fn n_features(&self) -> usize;
}

impl FeatureVector for [f64] {
    #[inline]
    fn feature(&self, index: usize) -> f64 {
        self[index]
    }

    #[inline]
    fn n_features(&self) -> usize {
        self.len()
    }
}

// Enables `tree.predict(&[0.5, 1.0])` without a slice coercion.
impl<const N: usize> FeatureVector for [f64; N] {
    #[inline]
    fn feature(&self, index: usize) -> f64 {
        self[index]
    }

    #[inline]
    fn n_features(&self) -> usize {
        N
    }
}

impl<T: AsRef<[f64]> + ?Sized> FeatureVector for &T {
    #[inline]
    fn feature(&self, index: usize) -> f64 {
        self.as_ref()[index]
    }

    #[inline]
    fn n_features(&self) -> usize {
        self.as_ref().len()
    }
}

// ndarray rows may be strided, so they cannot go through AsRef<[f64]>.
impl FeatureVector for ndarray::ArrayView1<'_, f64> {
    #[inline]
    fn feature(&self, index: usize) -> f64 {
        self[index]
    }

    #[inline]
    fn n_features(&self) -> usize {
        self.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn slice_access() {
        let x: &[f64] = &[0.5, 1.2, 3.4];
        assert_eq!(x.feature(0), 0.5);
        assert_eq!(x.feature(2), 3.4);
        assert_eq!(x.n_features(), 3);
    }

    #[test]
    fn array_access() {
        let x = [0.5, 1.0];
        assert_eq!(x.feature(1), 1.0);
        assert_eq!(x.n_features(), 2);
    }

    #[test]
    fn vec_access() {
        let x = vec![2.0, 4.0];
        assert_eq!((&x).feature(0), 2.0);
        assert_eq!((&x).n_features(), 2);
    }

    #[test]
    fn strided_ndarray_column() {
        let m = array![[1.0, 2.0], [3.0, 4.0]];
        let col = m.column(1);
        assert_eq!(col.feature(0), 2.0);
        assert_eq!(col.feature(1), 4.0);
        assert_eq!(col.n_features(), 2);
    }

    #[test]
    #[should_panic]
    fn out_of_range_fails_loudly() {
        let x: &[f64] = &[1.0];
        x.feature(3);
    }
}
