#![allow(non_snake_case)]

use qpbridge::{algebra::*, io::ConfigurablePrintTarget, solver::*};

fn test_print_solver() -> AdmmSolver<f64> {
    let P = CscMatrix::identity(1);
    let q = [0.];
    let A = CscMatrix::identity(1);
    let (l, u) = ([1.], [2.]);
    let settings = AdmmSettings::default();
    AdmmSolver::new(&P, &q, &A, &l, &u, settings).unwrap()
}

#[test]
fn test_print_to_stdout() {
    let mut solver = test_print_solver();
    solver.print_to_stdout();
    solver.solve().unwrap();
}

#[test]
fn test_print_to_buffer() {
    let mut solver = test_print_solver();
    solver.print_to_buffer();
    solver.solve().unwrap();
    let result = solver.get_print_buffer().unwrap();
    assert!(result.contains("qpbridge"));
    assert!(result.contains("prim res"));
}

#[test]
fn test_print_to_file() {
    use std::io::{Read, Seek};

    let mut solver = test_print_solver();
    let file = tempfile::NamedTempFile::new().unwrap();
    let mut file2 = file.reopen().unwrap();
    solver.print_to_file(file.into_file());
    solver.solve().unwrap();

    file2.seek(std::io::SeekFrom::Start(0)).unwrap();
    let mut result = String::new();
    file2.read_to_string(&mut result).unwrap();
    assert!(result.contains("qpbridge"));
}

#[test]
fn test_print_to_stream() {
    use std::io::{Read, Seek};

    let mut solver = test_print_solver();
    let file = tempfile::NamedTempFile::new().unwrap();
    let mut file2 = file.reopen().unwrap();
    let stream = Box::new(file.into_file());

    solver.print_to_stream(stream);
    solver.solve().unwrap();

    file2.seek(std::io::SeekFrom::Start(0)).unwrap();
    let mut result = String::new();
    file2.read_to_string(&mut result).unwrap();
    assert!(result.contains("qpbridge"));
}

#[test]
fn test_print_to_sink() {
    let mut solver = test_print_solver();
    solver.print_to_sink();
    solver.solve().unwrap();
    assert!(solver.get_print_buffer().is_err());
}

#[test]
fn test_quiet_buffer_is_empty() {
    let mut solver = test_print_solver();
    solver.settings.verbose = false;
    solver.print_to_buffer();
    solver.solve().unwrap();
    assert_eq!(solver.get_print_buffer().unwrap(), "");
}
