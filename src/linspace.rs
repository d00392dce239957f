pub struct Linspace {
    start: f64,
    step: f64,
    index: usize,
    len: usize,
}

impl Linspace {
    pub fn new(min: f64, max: f64, n: usize) -> Self {
        let step = if n > 1 {
            // REVIEW: try_from instead of cast?
            let num_steps = (n - 1) as f64;
            (max - min) / num_steps
        } else {
            0.
        };
        Linspace {
            start: min,
            step,
            index: 0,
            len: n,
        }
    }

    /// Same points as numpy's `arange(min, max + step, step)`: `min + i * step` while it stays
    /// within `max`. `None` when that would be more than `limit` points.
    pub fn arange(min: f64, max: f64, step: f64, limit: usize) -> Option<Self> {
        // floor is the closest approx to what python does for int() conversion. The nudge keeps
        // quotients like 0.3 / 0.1 == 2.9999999999999996 from dropping the last point
        let steps = ((max - min) / step + 1e-9).floor();

        // Also rejects NaN and infinite quotients
        if !(steps >= 0. && steps < limit as f64) {
            return None;
        }

        let n = steps as usize + 1;

        Some(Linspace::new(min, min + step * (n - 1) as f64, n))
    }
}

impl Iterator for Linspace {
    type Item = f64;

    #[inline]
    fn next(&mut self) -> Option<f64> {
        if self.index >= self.len {
            None
        } else {
            // Calculate the value just like numpy.linspace does
            let i = self.index;
            self.index += 1;
            Some(self.start + self.step * i as f64)
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.len - self.index;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Linspace {}

#[test]
fn test_linspace() {
    let points: Vec<_> = Linspace::new(0., 1., 5).collect();

    assert_eq!(points, vec![0., 0.25, 0.5, 0.75, 1.]);
    assert_eq!(Linspace::new(3., 7., 1).collect::<Vec<_>>(), vec![3.]);
}

#[test]
fn test_arange() {
    let arange = |min, max, step| Linspace::arange(min, max, step, 1_000).unwrap();

    assert_eq!(arange(0., 10., 1.).len(), 11);
    assert_eq!(arange(0., 100., 1.).last(), Some(100.));
    assert_eq!(arange(0., 0.3, 0.1).len(), 4);
    // A step that does not divide the range stops short of max
    assert_eq!(arange(0., 10., 3.).collect::<Vec<_>>(), vec![0., 3., 6., 9.]);
}

#[test]
fn test_arange_limit() {
    assert_eq!(Linspace::arange(0., 9., 1., 10).map(|l| l.len()), Some(10));
    assert!(Linspace::arange(0., 10., 1., 10).is_none());
    assert!(Linspace::arange(0., 1e9, 1e-6, 1_000_000).is_none());
    assert!(Linspace::arange(0., f64::MAX, f64::MIN_POSITIVE, usize::MAX).is_none());
    assert!(Linspace::arange(0., 1., f64::NAN, 10).is_none());
}
