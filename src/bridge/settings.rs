//! Resolution of named settings into an [`AdmmSettings`] record.

use super::MarshalError;
use crate::solver::AdmmSettings;
use crate::stdio;
use lazy_static::lazy_static;
use std::collections::HashMap;
use std::io::Write;
use std::str::FromStr;

/// Setting names recognised across the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingName {
    Rho,
    Sigma,
    Alpha,
    EpsAbs,
    EpsRel,
    EpsPrimInf,
    EpsDualInf,
    Polish,
    MaxIter,
}

impl SettingName {
    pub const ALL: [SettingName; 9] = [
        SettingName::Rho,
        SettingName::Sigma,
        SettingName::Alpha,
        SettingName::EpsAbs,
        SettingName::EpsRel,
        SettingName::EpsPrimInf,
        SettingName::EpsDualInf,
        SettingName::Polish,
        SettingName::MaxIter,
    ];

    /// The name as passed by the caller.
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingName::Rho => "RHO",
            SettingName::Sigma => "SIGMA",
            SettingName::Alpha => "ALPHA",
            SettingName::EpsAbs => "EPS_ABS",
            SettingName::EpsRel => "EPS_REL",
            SettingName::EpsPrimInf => "EPS_PRIM_INF",
            SettingName::EpsDualInf => "EPS_DUAL_INF",
            SettingName::Polish => "POLISH",
            SettingName::MaxIter => "MAX_ITER",
        }
    }

    fn apply(&self, settings: &mut AdmmSettings<f64>, value: f64) {
        match self {
            SettingName::Rho => settings.rho = value,
            SettingName::Sigma => settings.sigma = value,
            SettingName::Alpha => settings.alpha = value,
            SettingName::EpsAbs => settings.eps_abs = value,
            SettingName::EpsRel => settings.eps_rel = value,
            SettingName::EpsPrimInf => settings.eps_prim_inf = value,
            SettingName::EpsDualInf => settings.eps_dual_inf = value,
            // casts saturate, and NaN becomes 0
            SettingName::Polish => settings.polish = value as i64 != 0,
            SettingName::MaxIter => settings.max_iter = value as u32,
        }
    }
}

impl std::fmt::Display for SettingName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unrecognised setting name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown setting parameter: [{0}].")]
pub struct UnknownSetting(pub String);

impl FromStr for SettingName {
    type Err = UnknownSetting;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LOOKUP
            .get(s)
            .map(|&(name, _)| name)
            .ok_or_else(|| UnknownSetting(s.to_string()))
    }
}

// how a raw value is converted before assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transform {
    Direct,
    // rounded half away from zero, then cast to an integer
    Rounded,
}

impl Transform {
    fn apply(&self, value: f64) -> f64 {
        match self {
            Transform::Direct => value,
            Transform::Rounded => value.round(),
        }
    }
}

lazy_static! {
    static ref LOOKUP: HashMap<&'static str, (SettingName, Transform)> = {
        use SettingName::*;
        use Transform::*;
        HashMap::from([
            ("RHO", (Rho, Direct)),
            ("SIGMA", (Sigma, Direct)),
            ("ALPHA", (Alpha, Direct)),
            ("EPS_ABS", (EpsAbs, Direct)),
            ("EPS_REL", (EpsRel, Direct)),
            ("EPS_PRIM_INF", (EpsPrimInf, Direct)),
            ("EPS_DUAL_INF", (EpsDualInf, Direct)),
            ("POLISH", (Polish, Rounded)),
            ("MAX_ITER", (MaxIter, Rounded)),
        ])
    };
}

/// Library defaults, with polishing switched on.
pub fn default_settings() -> AdmmSettings<f64> {
    AdmmSettings {
        polish: true,
        ..AdmmSettings::default()
    }
}

/// Builds a settings record from (name, value) pairs.
///
/// Pairs are applied in order over [`default_settings`], so a later
/// pair overrides an earlier one with the same name.  Unknown names are
/// reported on the error stream and otherwise ignored.
pub fn resolve<N: AsRef<str>>(
    names: &[N],
    values: &[f64],
) -> Result<AdmmSettings<f64>, MarshalError> {
    resolve_with(names, values, &mut stdio::stderr())
}

/// Same as [`resolve`], with diagnostics written to `err`.
pub fn resolve_with<N: AsRef<str>>(
    names: &[N],
    values: &[f64],
    err: &mut dyn Write,
) -> Result<AdmmSettings<f64>, MarshalError> {
    if names.len() != values.len() {
        return Err(MarshalError::LengthMismatch {
            what: "setting values",
            expected: names.len(),
            found: values.len(),
        });
    }

    let mut settings = default_settings();

    for (name, &value) in std::iter::zip(names, values) {
        let name = name.as_ref();
        match LOOKUP.get(name) {
            Some(&(setting, transform)) => {
                setting.apply(&mut settings, transform.apply(value));
                log::debug!("setting {setting} = {value}");
            }
            None => {
                let unknown = UnknownSetting(name.to_string());
                log::warn!("{unknown}");
                // a failed diagnostic write must not fail resolution
                let _ = writeln!(err, "{unknown}");
            }
        }
    }

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_write_wins() {
        let settings = resolve(&["RHO", "EPS_ABS", "RHO"], &[0.5, 1e-4, 0.9]).unwrap();
        assert_eq!(settings.rho, 0.9);
        assert_eq!(settings.eps_abs, 1e-4);
    }

    #[test]
    fn test_polish_default_on() {
        let none: [&str; 0] = [];
        let settings = resolve(&none, &[]).unwrap();
        assert!(settings.polish);

        let settings = resolve(&["POLISH"], &[0.4]).unwrap();
        assert!(!settings.polish);
        let settings = resolve(&["POLISH"], &[-0.5]).unwrap();
        assert!(settings.polish);
    }

    #[test]
    fn test_rounded_values() {
        let settings = resolve(&["MAX_ITER"], &[99.5]).unwrap();
        assert_eq!(settings.max_iter, 100);
        let settings = resolve(&["MAX_ITER"], &[-3.0]).unwrap();
        assert_eq!(settings.max_iter, 0);
        let settings = resolve(&["MAX_ITER"], &[1e12]).unwrap();
        assert_eq!(settings.max_iter, u32::MAX);
    }

    #[test]
    fn test_unknown_setting() {
        let mut err = Vec::<u8>::new();
        let settings = resolve_with(&["FOO", "rho"], &[1.0, 2.0], &mut err).unwrap();
        assert_eq!(settings, default_settings());
        assert_eq!(
            String::from_utf8(err).unwrap(),
            "Unknown setting parameter: [FOO].\nUnknown setting parameter: [rho].\n"
        );
    }

    #[test]
    fn test_length_mismatch() {
        assert!(matches!(
            resolve(&["RHO"], &[]),
            Err(MarshalError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn test_names_round_trip() {
        for name in SettingName::ALL {
            assert_eq!(name.as_str().parse::<SettingName>(), Ok(name));
        }
        assert!("EPS".parse::<SettingName>().is_err());
    }
}
