#![allow(non_snake_case)]

#[cfg(feature = "serde")]
#[test]
fn test_json_io() {
    use qpbridge::bridge::*;
    use std::io::{Seek, SeekFrom};

    let names = ["MAX_ITER", "POLISH"];
    let call = QpCall {
        num_variables: 2,
        num_constraints: 3,
        log_path: "",
        linear_objective: &[1., 1.],
        quadratic_objective: TripletSlices {
            rows: &[0, 0, 1],
            cols: &[0, 1, 1],
            vals: &[4., 1., 2.],
        },
        constraints: TripletSlices {
            rows: &[0, 0, 1, 2],
            cols: &[0, 1, 0, 1],
            vals: &[1., 1., 1., 1.],
        },
        lower_bounds: &[1., 0., f64::NEG_INFINITY],
        upper_bounds: &[1., 0.7, 0.7],
        setting_names: &names,
        setting_values: &[4000., 1.],
    };
    let (mut x, mut y) = ([0.; 2], [0.; 3]);
    let status = solve(&AdmmBackend, &call, &mut x, &mut y);

    // write the call to a file
    let record = CallRecord::from_call(&call);
    let mut file = tempfile::tempfile().unwrap();
    record.write_to_file(&mut file).unwrap();

    // read the call from the file and replay it
    file.seek(SeekFrom::Start(0)).unwrap();
    let loaded = CallRecord::read_from_file(&mut file).unwrap();
    assert_eq!(loaded.lower_bounds[2], f64::NEG_INFINITY);

    let (status2, x2, y2) = loaded.replay(&AdmmBackend);
    assert_eq!(status, status2);
    assert_eq!(x.to_vec(), x2);
    assert_eq!(y.to_vec(), y2);

    // replay with an iteration limit
    let mut limited = loaded.clone();
    limited.setting_values[0] = 1.;
    limited.setting_names.push("EPS_ABS".to_string());
    limited.setting_values.push(1e-12);
    limited.setting_names.push("EPS_REL".to_string());
    limited.setting_values.push(1e-12);
    let (status3, _, _) = limited.replay(&AdmmBackend);
    assert_eq!(status3, -2);
}
