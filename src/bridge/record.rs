//! JSON capture and replay of bridge calls.

use super::{solve, QpBackend, QpCall, TripletSlices};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::{fs::File, io, io::Read};

/// Triplet data of one matrix, owned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TripletRecord {
    pub rows: Vec<i64>,
    pub cols: Vec<i64>,
    pub vals: Vec<f64>,
}

impl TripletRecord {
    fn from_slices(t: &TripletSlices<'_>) -> Self {
        Self {
            rows: t.rows.to_vec(),
            cols: t.cols.to_vec(),
            vals: t.vals.to_vec(),
        }
    }

    fn as_slices(&self) -> TripletSlices<'_> {
        TripletSlices {
            rows: &self.rows,
            cols: &self.cols,
            vals: &self.vals,
        }
    }
}

/// An owned copy of the arguments of one call.
///
/// The record holds the data exactly as the caller passed it, invalid
/// or not, so that a failing call can be replayed as well.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallRecord {
    pub num_variables: i64,
    pub num_constraints: i64,
    pub log_path: String,
    pub linear_objective: Vec<f64>,
    pub quadratic_objective: TripletRecord,
    pub constraints: TripletRecord,
    pub lower_bounds: Vec<f64>,
    pub upper_bounds: Vec<f64>,
    pub setting_names: Vec<String>,
    pub setting_values: Vec<f64>,
}

impl CallRecord {
    pub fn from_call<N: AsRef<str>>(call: &QpCall<'_, N>) -> Self {
        Self {
            num_variables: call.num_variables,
            num_constraints: call.num_constraints,
            log_path: call.log_path.to_string(),
            linear_objective: call.linear_objective.to_vec(),
            quadratic_objective: TripletRecord::from_slices(&call.quadratic_objective),
            constraints: TripletRecord::from_slices(&call.constraints),
            lower_bounds: call.lower_bounds.to_vec(),
            upper_bounds: call.upper_bounds.to_vec(),
            setting_names: call
                .setting_names
                .iter()
                .map(|s| s.as_ref().to_string())
                .collect(),
            setting_values: call.setting_values.to_vec(),
        }
    }

    pub fn as_call(&self) -> QpCall<'_, String> {
        QpCall {
            num_variables: self.num_variables,
            num_constraints: self.num_constraints,
            log_path: &self.log_path,
            linear_objective: &self.linear_objective,
            quadratic_objective: self.quadratic_objective.as_slices(),
            constraints: self.constraints.as_slices(),
            lower_bounds: &self.lower_bounds,
            upper_bounds: &self.upper_bounds,
            setting_names: &self.setting_names,
            setting_values: &self.setting_values,
        }
    }

    pub fn write_to_file(&self, file: &mut File) -> Result<(), io::Error> {
        let mut record = self.clone();

        // json has no infinities
        sanitize(&mut record.lower_bounds);
        sanitize(&mut record.upper_bounds);

        let json = serde_json::to_string(&record)?;
        file.write_all(json.as_bytes())?;

        Ok(())
    }

    pub fn read_from_file(file: &mut File) -> Result<Self, io::Error> {
        let mut buffer = String::new();
        file.read_to_string(&mut buffer)?;
        let mut record: CallRecord = serde_json::from_str(&buffer)?;

        desanitize(&mut record.lower_bounds);
        desanitize(&mut record.upper_bounds);

        Ok(record)
    }

    /// Runs the recorded call against `backend`.
    ///
    /// Returns the status with the primal and dual outputs.  Outputs
    /// the backend did not write are left as NaN.
    pub fn replay<B: QpBackend>(&self, backend: &B) -> (i32, Vec<f64>, Vec<f64>) {
        let n = usize::try_from(self.num_variables).unwrap_or(0);
        let m = usize::try_from(self.num_constraints).unwrap_or(0);
        let mut primal = vec![f64::NAN; n];
        let mut dual = vec![f64::NAN; m];

        let status = solve(backend, &self.as_call(), &mut primal, &mut dual);
        (status, primal, dual)
    }
}

fn sanitize(v: &mut [f64]) {
    for x in v.iter_mut() {
        if x.is_infinite() {
            *x = f64::MAX.copysign(*x);
        }
    }
}

fn desanitize(v: &mut [f64]) {
    for x in v.iter_mut() {
        if x.abs() == f64::MAX {
            *x = f64::INFINITY.copysign(*x);
        }
    }
}

#[test]
fn test_record_io() {
    use super::AdmmBackend;
    use std::io::{Seek, SeekFrom};

    let names = ["EPS_ABS", "POLISH"];
    let call = QpCall {
        num_variables: 1,
        num_constraints: 1,
        log_path: "",
        linear_objective: &[1.0],
        quadratic_objective: TripletSlices::default(),
        constraints: TripletSlices {
            rows: &[0],
            cols: &[0],
            vals: &[1.0],
        },
        lower_bounds: &[0.0],
        upper_bounds: &[f64::INFINITY],
        setting_names: &names,
        setting_values: &[1e-6, 1.0],
    };
    let record = CallRecord::from_call(&call);

    let mut file = tempfile::tempfile().unwrap();
    record.write_to_file(&mut file).unwrap();

    file.seek(SeekFrom::Start(0)).unwrap();
    let loaded = CallRecord::read_from_file(&mut file).unwrap();
    assert_eq!(loaded, record);
    assert_eq!(loaded.upper_bounds[0], f64::INFINITY);

    let (status, x, y) = loaded.replay(&AdmmBackend);
    assert_eq!(status, 1);
    assert!(x[0].abs() < 1e-3);
    assert!((y[0] + 1.0).abs() < 1e-3);
}

#[test]
fn test_replay_invalid() {
    use super::AdmmBackend;

    let record = CallRecord {
        num_variables: -1,
        ..CallRecord::default()
    };
    let (status, x, y) = record.replay(&AdmmBackend);
    assert_eq!(status, -1);
    assert!(x.is_empty() && y.is_empty());
}
