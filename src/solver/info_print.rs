use crate::algebra::*;
use crate::io::{ConfigurablePrintTarget, PrintTarget};
use crate::solver::*;
use std::io::Write;
use std::time::Duration;

impl<T> ConfigurablePrintTarget for AdmmInfo<T> {
    fn print_to_stdout(&mut self) {
        self.stream.print_to_stdout()
    }
    fn print_to_file(&mut self, file: std::fs::File) {
        self.stream.print_to_file(file)
    }
    fn print_to_stream(&mut self, stream: Box<dyn Write + Send>) {
        self.stream.print_to_stream(stream)
    }
    fn print_to_buffer(&mut self) {
        self.stream.print_to_buffer()
    }
    fn print_to_sink(&mut self) {
        self.stream.print_to_sink()
    }
    fn get_print_buffer(&mut self) -> std::io::Result<String> {
        self.stream.get_print_buffer()
    }
}

macro_rules! expformat {
    ($fmt:expr,$val:expr) => {
        if $val.is_finite() {
            _exp_str_reformat(format!($fmt, $val))
        } else {
            format!($fmt, $val)
        }
    };
}

const RULE: &str = "-----------------------------------------------------------------";

impl<T> AdmmInfo<T>
where
    T: FloatT,
{
    pub(crate) fn print_configuration(
        &mut self,
        settings: &AdmmSettings<T>,
        data: &ProblemData<T>,
    ) -> std::io::Result<()> {
        if !settings.verbose {
            return Ok(());
        }

        let out = &mut self.stream;

        writeln!(out, "{RULE}")?;
        writeln!(
            out,
            "           qpbridge v{}  -  ADMM quadratic program solver",
            crate::VERSION
        )?;
        writeln!(out, "{RULE}")?;

        writeln!(out, "problem:")?;
        writeln!(out, "  variables     = {}", data.n)?;
        writeln!(out, "  constraints   = {}", data.m)?;
        writeln!(out, "  nnz(P)        = {}", data.P.nnz())?;
        writeln!(out, "  nnz(A)        = {}", data.A.nnz())?;
        writeln!(out)?;

        self.print_settings(settings)
    }

    fn print_settings(&mut self, settings: &AdmmSettings<T>) -> std::io::Result<()> {
        let out = &mut self.stream;
        let set = settings;

        writeln!(out, "settings:")?;
        writeln!(
            out,
            "  linear algebra: direct / ldl, precision: {} bit",
            _get_precision_string::<T>()
        )?;

        let time_lim_str = {
            if set.time_limit == 0.0 {
                "none".to_string()
            } else {
                format!("{:?}", Duration::from_secs_f64(set.time_limit))
            }
        };
        writeln!(
            out,
            "  max iter = {}, time limit = {}",
            set.max_iter, time_lim_str
        )?;

        writeln!(
            out,
            "  eps_abs = {:.1e}, eps_rel = {:.1e},",
            set.eps_abs, set.eps_rel
        )?;
        writeln!(
            out,
            "  eps_prim_inf = {:.1e}, eps_dual_inf = {:.1e},",
            set.eps_prim_inf, set.eps_dual_inf
        )?;
        writeln!(
            out,
            "  rho = {:.2e}, sigma = {:.2e}, alpha = {:.2}",
            set.rho, set.sigma, set.alpha
        )?;

        if set.adaptive_rho {
            writeln!(
                out,
                "  adaptive rho: on, interval = {}, tolerance = {:.1}",
                set.adaptive_rho_interval, set.adaptive_rho_tolerance
            )?;
        } else {
            writeln!(out, "  adaptive rho: off")?;
        }

        writeln!(
            out,
            "  scaling: {}, iterations = {}",
            _bool_on_off(set.scaling > 0),
            set.scaling
        )?;
        writeln!(
            out,
            "  polish: {}, delta = {:.1e}, refine iter = {}",
            _bool_on_off(set.polish),
            set.delta,
            set.polish_refine_iter
        )?;
        writeln!(out, "  check termination: every {} iter", set.check_termination)?;
        writeln!(out)?;

        Ok(())
    }

    pub(crate) fn print_status_header(&mut self, settings: &AdmmSettings<T>) -> std::io::Result<()> {
        if !settings.verbose {
            return Ok(());
        }

        let out = &mut self.stream;

        write!(out, "iter   ")?;
        write!(out, "objective    ")?;
        write!(out, "prim res   ")?;
        write!(out, "dual res   ")?;
        write!(out, "rho        ")?;
        write!(out, "time")?;
        writeln!(out)?;
        writeln!(out, "{RULE}")?;
        out.flush()
    }

    pub(crate) fn print_status(
        &mut self,
        settings: &AdmmSettings<T>,
        rho: T,
        elapsed: Duration,
    ) -> std::io::Result<()> {
        if !settings.verbose {
            return Ok(());
        }

        let out = &mut self.stream;

        write!(out, "{:>4}  ", self.iterations)?;
        write!(out, "{}  ", expformat!("{:+8.4e}", self.obj_val))?;
        write!(out, "{}  ", expformat!("{:6.2e}", self.prim_res))?;
        write!(out, "{}  ", expformat!("{:6.2e}", self.dual_res))?;
        write!(out, "{}  ", expformat!("{:6.2e}", rho))?;
        write!(out, "{:.2?}", elapsed)?;
        writeln!(out)?;

        Ok(())
    }

    pub(crate) fn print_footer(&mut self, settings: &AdmmSettings<T>) -> std::io::Result<()> {
        if !settings.verbose {
            return Ok(());
        }

        let out = &mut self.stream;

        writeln!(out, "{RULE}")?;
        writeln!(out, "Terminated with status = {}", self.status)?;
        writeln!(out, "number of iterations   = {}", self.iterations)?;
        if self.status.has_solution() {
            writeln!(out, "optimal objective      = {}", expformat!("{:.4e}", self.obj_val))?;
        }
        if self.status_polish != PolishStatus::NotPerformed {
            writeln!(out, "solution polishing     = {:?}", self.status_polish)?;
        }
        if self.rho_updates > 0 {
            writeln!(out, "rho updates            = {}", self.rho_updates)?;
        }
        writeln!(
            out,
            "setup time = {:?}, solve time = {:?}, polish time = {:?}",
            Duration::from_secs_f64(self.setup_time),
            Duration::from_secs_f64(self.solve_time),
            Duration::from_secs_f64(self.polish_time)
        )?;
        out.flush()
    }

    pub(crate) fn print_target(&mut self) -> &mut PrintTarget {
        &mut self.stream
    }
}

fn _bool_on_off(v: bool) -> &'static str {
    match v {
        true => "on",
        false => "off",
    }
}

fn _get_precision_string<T: FloatT>() -> String {
    (::std::mem::size_of::<T>() * 8).to_string()
}

// convert a string in LowerExp display format into one that
// 1) always has a sign after the exponent, and
// 2) has at least two digits in the exponent.

fn _exp_str_reformat(mut thestr: String) -> String {
    let Some(eidx) = thestr.find('e') else {
        return thestr;
    };
    let has_sign = thestr[eidx + 1..].starts_with('-');

    let has_short_exp = {
        if !has_sign {
            thestr.len() == eidx + 2
        } else {
            thestr.len() == eidx + 3
        }
    };

    let chars = match (has_sign, has_short_exp) {
        (false, true) => "+0",
        (false, false) => "+",
        (true, true) => "0",
        (true, false) => "",
    };

    let shift = if has_sign { 2 } else { 1 };
    thestr.insert_str(eidx + shift, chars);
    thestr
}

#[test]
fn test_exp_str_reformat() {
    assert_eq!(_exp_str_reformat("1.0000e0".to_string()), "1.0000e+00");
    assert_eq!(_exp_str_reformat("1.5e-3".to_string()), "1.5e-03");
    assert_eq!(_exp_str_reformat("2.00e12".to_string()), "2.00e+12");
    assert_eq!(_exp_str_reformat("-7.1e-11".to_string()), "-7.1e-11");
    assert_eq!(_exp_str_reformat("inf".to_string()), "inf");
}
