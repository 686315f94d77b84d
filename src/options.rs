//! Options used when creating a geometry

/// Options for [crate::geometry::GeometryBuilder::create_geometry]
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryOptions {
    /// Distance below which a point is considered to lie on a surface
    on_surface_threshold: f64,
    /// Sample the geometry for overlapping cells when it is created
    check_overlaps: bool,
    /// Number of random points used by the overlap check
    overlap_samples: usize,
    /// Seed of the random number generator used by the overlap check
    seed: u64,
}

impl Default for GeometryOptions {
    fn default() -> Self {
        Self {
            on_surface_threshold: 1e-12,
            check_overlaps: cfg!(debug_assertions),
            overlap_samples: 4096,
            seed: 0,
        }
    }
}

impl GeometryOptions {
    /// Distance below which a point is considered to lie on a surface
    pub fn on_surface_threshold(&self) -> f64 {
        self.on_surface_threshold
    }

    /// Set the distance below which a point is considered to lie on a surface
    pub fn set_on_surface_threshold(&mut self, threshold: f64) {
        self.on_surface_threshold = threshold;
    }

    /// Is the overlap check run when the geometry is created?
    pub fn check_overlaps(&self) -> bool {
        self.check_overlaps
    }

    /// Enable or disable the overlap check
    pub fn set_check_overlaps(&mut self, check: bool) {
        self.check_overlaps = check;
    }

    /// Number of random points used by the overlap check
    pub fn overlap_samples(&self) -> usize {
        self.overlap_samples
    }

    /// Set the number of random points used by the overlap check
    pub fn set_overlap_samples(&mut self, samples: usize) {
        self.overlap_samples = samples;
    }

    /// Seed used by the overlap check
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Set the seed used by the overlap check
    pub fn set_seed(&mut self, seed: u64) {
        self.seed = seed;
    }
}
