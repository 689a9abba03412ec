// stdout and stderr routing.  Under the python feature these go
// to the interpreter's sys.stdout / sys.stderr so that output shows
// up in notebooks.

cfg_if::cfg_if! {
    if #[cfg(feature = "python")] {
        pub(crate) use crate::python::io::{stderr, stdout, Stdout};
    } else {
        pub(crate) use std::io::{stderr, stdout, Stdout};
    }
}
