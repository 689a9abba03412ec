use crate::algebra::*;
use derive_builder::Builder;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{de::DeserializeOwned, Deserialize, Serialize};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
/// Error type returned by settings validation
pub enum SettingsError {
    /// A field holds a value outside its legal range
    #[error("Bad value for field {0}")]
    BadFieldValue(&'static str),
}

/// Settings for the ADMM solver

#[derive(Builder, Debug, Clone, PartialEq)]
#[builder(build_fn(validate = "Self::validate"))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(bound = "T: Serialize + DeserializeOwned"))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AdmmSettings<T: FloatT> {
    ///ADMM step size
    #[builder(default = "(0.1).as_T()")]
    pub rho: T,

    ///ADMM regularization on the primal variable
    #[builder(default = "(1e-6).as_T()")]
    pub sigma: T,

    ///relaxation parameter, in (0,2)
    #[builder(default = "(1.6).as_T()")]
    pub alpha: T,

    ///absolute convergence tolerance
    #[builder(default = "(1e-3).as_T()")]
    pub eps_abs: T,

    ///relative convergence tolerance
    #[builder(default = "(1e-3).as_T()")]
    pub eps_rel: T,

    ///primal infeasibility tolerance
    #[builder(default = "(1e-4).as_T()")]
    pub eps_prim_inf: T,

    ///dual infeasibility tolerance
    #[builder(default = "(1e-4).as_T()")]
    pub eps_dual_inf: T,

    ///maximum number of iterations
    #[builder(default = "4000")]
    pub max_iter: u32,

    ///polish the solution by solving a reduced KKT system
    #[builder(default = "false")]
    pub polish: bool,

    ///regularization used when polishing
    #[builder(default = "(1e-6).as_T()")]
    pub delta: T,

    ///iterative refinement steps when polishing
    #[builder(default = "3")]
    pub polish_refine_iter: u32,

    ///number of Ruiz equilibration iterations.  0 disables scaling.
    #[builder(default = "10")]
    pub scaling: u32,

    ///enable adaptive step size updates
    #[builder(default = "true")]
    pub adaptive_rho: bool,

    ///iterations between adaptive step size updates
    #[builder(default = "25")]
    pub adaptive_rho_interval: u32,

    ///step size change factor required to trigger a refactorisation
    #[builder(default = "(5.0).as_T()")]
    pub adaptive_rho_tolerance: T,

    ///iterations between termination checks.  0 checks only at the iteration limit.
    #[builder(default = "25")]
    pub check_termination: u32,

    ///maximum run time (seconds).  0 means no limit.
    #[builder(default = "0.0")]
    pub time_limit: f64,

    ///verbose printing
    #[builder(default = "true")]
    pub verbose: bool,
}

impl<T> Default for AdmmSettings<T>
where
    T: FloatT,
{
    fn default() -> AdmmSettings<T> {
        AdmmSettingsBuilder::<T>::default().build().unwrap()
    }
}

impl<T> AdmmSettings<T>
where
    T: FloatT,
{
    /// Checks that all numeric fields are within their legal ranges.
    pub fn validate(&self) -> Result<(), SettingsError> {
        check_positive("rho", self.rho)?;
        check_positive("sigma", self.sigma)?;
        validate_alpha(self.alpha)?;
        validate_eps(self.eps_abs, self.eps_rel)?;
        check_positive("eps_prim_inf", self.eps_prim_inf)?;
        check_positive("eps_dual_inf", self.eps_dual_inf)?;
        check_positive("delta", self.delta)?;

        if self.max_iter == 0 {
            return Err(SettingsError::BadFieldValue("max_iter"));
        }
        if !(self.adaptive_rho_tolerance >= T::one()) {
            return Err(SettingsError::BadFieldValue("adaptive_rho_tolerance"));
        }
        if !(self.time_limit >= 0.0) {
            return Err(SettingsError::BadFieldValue("time_limit"));
        }
        Ok(())
    }
}

// pre build checker (for auto-validation when using the builder)

impl From<SettingsError> for AdmmSettingsBuilderError {
    fn from(e: SettingsError) -> Self {
        AdmmSettingsBuilderError::ValidationError(e.to_string())
    }
}

/// Automatic pre-build settings validation
impl<T> AdmmSettingsBuilder<T>
where
    T: FloatT,
{
    /// check whichever fields have been set explicitly
    pub fn validate(&self) -> Result<(), SettingsError> {
        if let Some(rho) = self.rho {
            check_positive("rho", rho)?;
        }
        if let Some(sigma) = self.sigma {
            check_positive("sigma", sigma)?;
        }
        if let Some(alpha) = self.alpha {
            validate_alpha(alpha)?;
        }
        if let Some(0) = self.max_iter {
            return Err(SettingsError::BadFieldValue("max_iter"));
        }
        Ok(())
    }
}

// ---------------------------------------------------------
// individual validation functions go here
// ---------------------------------------------------------

// NaN fails every comparison, so these reject it as well
fn check_positive<T: FloatT>(field: &'static str, v: T) -> Result<(), SettingsError> {
    if v > T::zero() {
        Ok(())
    } else {
        Err(SettingsError::BadFieldValue(field))
    }
}

fn validate_alpha<T: FloatT>(alpha: T) -> Result<(), SettingsError> {
    if alpha > T::zero() && alpha < (2.0).as_T() {
        Ok(())
    } else {
        Err(SettingsError::BadFieldValue("alpha"))
    }
}

fn validate_eps<T: FloatT>(eps_abs: T, eps_rel: T) -> Result<(), SettingsError> {
    if !(eps_abs >= T::zero()) {
        return Err(SettingsError::BadFieldValue("eps_abs"));
    }
    if !(eps_rel >= T::zero()) {
        return Err(SettingsError::BadFieldValue("eps_rel"));
    }
    if eps_abs == T::zero() && eps_rel == T::zero() {
        return Err(SettingsError::BadFieldValue("eps_abs"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_defaults() {
        let settings = AdmmSettings::<f64>::default();
        assert_eq!(settings.rho, 0.1);
        assert_eq!(settings.sigma, 1e-6);
        assert_eq!(settings.alpha, 1.6);
        assert_eq!(settings.max_iter, 4000);
        assert!(!settings.polish);
        assert!(settings.verbose);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_settings_builder_validation() {
        assert!(AdmmSettingsBuilder::<f64>::default()
            .alpha(2.0)
            .build()
            .is_err());
        assert!(AdmmSettingsBuilder::<f64>::default()
            .rho(-1.0)
            .build()
            .is_err());

        let settings = AdmmSettingsBuilder::<f64>::default()
            .rho(0.5)
            .polish(true)
            .build()
            .unwrap();
        assert_eq!(settings.rho, 0.5);
        assert!(settings.polish);
    }

    #[test]
    fn test_settings_validate() {
        let mut settings = AdmmSettings::<f64>::default();
        settings.eps_abs = 0.0;
        settings.eps_rel = 0.0;
        assert_eq!(
            settings.validate(),
            Err(SettingsError::BadFieldValue("eps_abs"))
        );

        let mut settings = AdmmSettings::<f64>::default();
        settings.sigma = f64::NAN;
        assert_eq!(
            settings.validate(),
            Err(SettingsError::BadFieldValue("sigma"))
        );

        let mut settings = AdmmSettings::<f64>::default();
        settings.max_iter = 0;
        assert!(settings.validate().is_err());
    }
}
