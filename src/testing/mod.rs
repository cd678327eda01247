use num_traits::Float;

pub mod effect;
pub mod inference;

/// `-log10(0.05)`: a feature must exceed this on the `-log10(p)` axis to be called.
pub const SIGNIFICANCE_THRESHOLD: f64 = 1.301_029_995_663_981_3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TTestType {
    Student, // Equal variance
    Welch,   // Unequal variance
}

#[derive(Debug, Clone, PartialEq)]
pub struct TestResult<T> {
    /// The t-statistic
    pub statistic: T,
    /// Two-sided p-value
    pub p_value: T,
    /// Degrees of freedom (Welch-Satterthwaite for unequal variances)
    pub degrees_of_freedom: Option<T>,
    /// Standard error of the mean difference
    pub standard_error: Option<T>,
}

impl<T> TestResult<T>
where
    T: Float,
{
    /// Create a new test result with minimal information
    pub fn new(statistic: T, p_value: T) -> Self {
        TestResult {
            statistic,
            p_value,
            degrees_of_freedom: None,
            standard_error: None,
        }
    }

    /// Add degrees of freedom to the result
    pub fn with_degrees_of_freedom(mut self, df: T) -> Self {
        self.degrees_of_freedom = Some(df);
        self
    }

    /// Add standard error to the result
    pub fn with_standard_error(mut self, se: T) -> Self {
        self.standard_error = Some(se);
        self
    }

    /// `-log10(p)`, the y axis of a volcano plot. A p-value of zero maps to infinity.
    pub fn neg_log10_p(&self) -> T {
        -self.p_value.log10()
    }

    /// Check if the result is statistically significant at the given threshold
    pub fn is_significant(&self, alpha: T) -> bool {
        self.p_value < alpha
    }
}
