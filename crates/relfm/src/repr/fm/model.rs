//! Factorization machine parameter container.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, ArrayViewMut1, ArrayViewMut2};
use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::error::FMError;
use crate::model::FMConfig;

/// Factorization machine parameters: global bias, linear weights and latent
/// factors.
///
/// ```text
/// score(x) = w0 + Σ_f w[f] x_f + Σ_{f < g} <V[f, :], V[g, :]> x_f x_g
/// ```
///
/// `w` has one entry per feature and `V` has shape `[n_features, n_factors]`.
/// The feature dimension covers the primary matrix columns followed by every
/// relation block's columns, in the order blocks are passed to `predict`.
///
/// A machine starts uninitialized and can't be scored until
/// [`initialize_weights`](Self::initialize_weights) completes (or it was built
/// with [`from_parts`](Self::from_parts)). Sampling code outside this crate
/// updates parameters in place through the `*_mut` accessors; those never
/// change the shapes.
///
/// # Example
///
/// ```
/// use relfm::FactorizationMachine;
/// use ndarray::array;
///
/// let fm = FactorizationMachine::from_parts(
///     0.5,
///     array![1.0, 2.0],
///     array![[0.1, 0.2], [0.3, 0.4]],
/// )
/// .unwrap();
///
/// assert!(fm.is_initialized());
/// assert_eq!(fm.n_features(), 2);
/// assert_eq!(fm.n_factors(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct FactorizationMachine {
    n_factors: usize,
    /// Number of hyperparameter groups. Stored for the sampler; scoring ignores it.
    n_groups: usize,
    w0: f64,
    w: Array1<f64>,
    /// Shape `[n_features, n_factors]`.
    v: Array2<f64>,
    initialized: bool,
}

impl FactorizationMachine {
    /// Create an uninitialized machine with `n_factors` latent factors.
    pub fn new(n_factors: usize) -> Self {
        Self::with_groups(n_factors, 1)
    }

    /// Create an uninitialized machine, recording the hyperparameter group count.
    pub fn with_groups(n_factors: usize, n_groups: usize) -> Self {
        Self {
            n_factors,
            n_groups,
            w0: 0.0,
            w: Array1::zeros(0),
            v: Array2::zeros((0, n_factors)),
            initialized: false,
        }
    }

    /// Create an initialized machine from existing parameters.
    ///
    /// `n_factors` is taken from the column count of `v`.
    ///
    /// # Errors
    ///
    /// Returns [`FMError::ShapeMismatch`] if `w.len() != v.nrows()`.
    pub fn from_parts(w0: f64, w: Array1<f64>, v: Array2<f64>) -> Result<Self, FMError> {
        if w.len() != v.nrows() {
            return Err(FMError::ShapeMismatch {
                weights: w.len(),
                factors: v.nrows(),
            });
        }
        Ok(Self {
            n_factors: v.ncols(),
            n_groups: 1,
            w0,
            w,
            v,
            initialized: true,
        })
    }

    /// Create and initialize a machine as described by `config`, drawing
    /// weights from the config's seeded generator.
    pub fn from_config(n_features: usize, config: &FMConfig) -> Result<Self, FMError> {
        let mut fm = Self::with_groups(config.n_factors, config.n_groups);
        let mut rng = config.rng();
        fm.initialize_weights(n_features, config.init_std, &mut rng)?;
        Ok(fm)
    }

    /// (Re)allocate all parameters and draw them from `Normal(0, init_std)`.
    ///
    /// Fills `V` first, then `w`, then `w0`. The machine is marked
    /// uninitialized while parameters are replaced and initialized once every
    /// entry is drawn.
    ///
    /// # Errors
    ///
    /// Returns [`FMError::InvalidInitStd`] if `init_std` is negative or not
    /// finite. The machine is left untouched in that case.
    pub fn initialize_weights<R: Rng + ?Sized>(
        &mut self,
        n_features: usize,
        init_std: f64,
        rng: &mut R,
    ) -> Result<(), FMError> {
        if !init_std.is_finite() || init_std < 0.0 {
            return Err(FMError::InvalidInitStd(init_std));
        }
        let normal = Normal::new(0.0, init_std).map_err(|_| FMError::InvalidInitStd(init_std))?;

        self.initialized = false;
        self.v = Array2::from_shape_simple_fn((n_features, self.n_factors), || {
            normal.sample(&mut *rng)
        });
        self.w = Array1::from_shape_simple_fn(n_features, || normal.sample(&mut *rng));
        self.w0 = normal.sample(&mut *rng);
        self.initialized = true;

        log::debug!(
            "initialized factorization machine: {} features, {} factors, init_std={}",
            n_features,
            self.n_factors,
            init_std
        );
        Ok(())
    }

    /// Whether parameters are ready for scoring.
    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Number of latent factors (columns of `V`).
    #[inline]
    pub fn n_factors(&self) -> usize {
        self.n_factors
    }

    /// Number of hyperparameter groups.
    #[inline]
    pub fn n_groups(&self) -> usize {
        self.n_groups
    }

    /// Total feature dimension (primary + all relation blocks).
    #[inline]
    pub fn n_features(&self) -> usize {
        self.w.len()
    }

    /// Global bias.
    #[inline]
    pub fn w0(&self) -> f64 {
        self.w0
    }

    /// Linear weights, length `n_features`.
    #[inline]
    pub fn w(&self) -> ArrayView1<'_, f64> {
        self.w.view()
    }

    /// Factor matrix, shape `[n_features, n_factors]`.
    #[inline]
    pub fn v(&self) -> ArrayView2<'_, f64> {
        self.v.view()
    }

    /// Linear weight of one feature.
    #[inline]
    pub fn weight(&self, feature: usize) -> f64 {
        self.w[feature]
    }

    /// Latent embedding of one feature.
    #[inline]
    pub fn factors(&self, feature: usize) -> ArrayView1<'_, f64> {
        self.v.row(feature)
    }

    #[inline]
    pub fn w0_mut(&mut self) -> &mut f64 {
        &mut self.w0
    }

    #[inline]
    pub fn w_mut(&mut self) -> ArrayViewMut1<'_, f64> {
        self.w.view_mut()
    }

    #[inline]
    pub fn v_mut(&mut self) -> ArrayViewMut2<'_, f64> {
        self.v.view_mut()
    }
}
