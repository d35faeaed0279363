//! Types supported for use with `Smoother`.

/// Types which may be smoothed by `Smoother`.
pub trait Smoothable: Default + Clone + Copy {
    fn to_f64(self) -> f64;
    fn from_f64(value: f64) -> Self;
}

impl Smoothable for f64 {
    #[inline]
    fn to_f64(self) -> f64 {
        self
    }

    #[inline]
    fn from_f64(value: f64) -> Self {
        value
    }
}
