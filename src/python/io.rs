// Provides a Writer to allow for redirection of stdout and stderr streams
// to the ones configured for Python

use pyo3::ffi::{PyObject_CallMethod, PySys_GetObject, PySys_WriteStderr, PySys_WriteStdout};
use std::ffi::CString;
use std::os::raw::c_char;

// PySys_Write* truncates its formatted output at 1000 bytes
const CHUNK: usize = 512;

macro_rules! make_python_stdio {
    ($name:ident, $pyfunc:ident, $modname:literal) => {
        pub(crate) struct $name {}
        impl std::io::Write for $name {
            fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                // embedded NULs would end the C string early
                let bytes: Vec<u8> = buf.iter().copied().filter(|&b| b != 0).collect();
                for chunk in bytes.chunks(CHUNK) {
                    let cstr = CString::new(chunk)
                        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
                    unsafe {
                        $pyfunc(b"%s\0".as_ptr() as *const c_char, cstr.as_ptr());
                    }
                }
                Ok(buf.len())
            }
            fn flush(&mut self) -> std::io::Result<()> {
                // call the python sys.stdout.flush()
                unsafe {
                    let stream = PySys_GetObject(concat!($modname, "\0").as_ptr() as *const c_char);
                    if !stream.is_null() {
                        PyObject_CallMethod(
                            stream,
                            b"flush\0".as_ptr() as *const c_char,
                            std::ptr::null(),
                        );
                    }
                }
                Ok(())
            }
        }
    };
}
make_python_stdio!(PythonStdout, PySys_WriteStdout, "__stdout__");
make_python_stdio!(PythonStderr, PySys_WriteStderr, "__stderr__");

pub(crate) type Stdout = PythonStdout;

pub(crate) fn stdout() -> PythonStdout {
    PythonStdout {}
}

pub(crate) fn stderr() -> PythonStderr {
    PythonStderr {}
}
