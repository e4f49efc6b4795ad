// Copyright 2016-2018 Mateusz Sieczko and other GilRs Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use gamepad_info::backend::Backend;
use gamepad_info::config::Config;
use gamepad_info::report::{self, Mode};
use gamepad_info::{nodes, Error, Subsystem};

use log::{error, warn};

use std::env;
use std::io::{self, Write};
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();

    let config = Config::from_env(env::args().skip(1));
    let stdout = io::stdout();

    match run(
        &config,
        Subsystem::new,
        nodes::enumerate,
        nodes::node_name,
        &mut stdout.lock(),
    ) {
        Ok(code) => code,
        Err(e) => {
            error!("Failed to write report: {}", e);
            ExitCode::SUCCESS
        }
    }
}

/// Initializes the subsystem, loads the mapping file, then lists nodes and reports every slot.
///
/// Exit status is failure only when the subsystem can't be initialized.
fn run<B, I, N, R, W>(
    config: &Config,
    init: I,
    enumerate: N,
    resolve: R,
    out: &mut W,
) -> io::Result<ExitCode>
where
    B: Backend,
    I: FnOnce(&Config) -> Result<B, Error>,
    N: FnOnce() -> Vec<u32>,
    R: FnMut(u32) -> String,
    W: Write,
{
    let mut backend = match init(config) {
        Ok(backend) => backend,
        Err(e) => {
            writeln!(out, "Failed to initialize input subsystem: {}", e)?;
            return Ok(ExitCode::FAILURE);
        }
    };

    if let Some(path) = config.mapping_file() {
        if config.mode() == Mode::Verbose {
            writeln!(out, "Loading mappings from {}", path.display())?;
        }
        if let Err(e) = backend.add_mappings_from_file(path) {
            warn!("Failed to load mappings from {}: {}", path.display(), e);
        }
    }

    let nodes = enumerate();
    report::run(&mut backend, &nodes, config.mode(), resolve, out)?;

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gamepad_info::config::MAPPING_FILE_VAR;
    use gamepad_info::{Controller, Joystick};
    use std::cell::RefCell;
    use std::path::Path;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    /// Every slot fails to open; file loads are recorded in `log`.
    struct Unopenable {
        devices: usize,
        log: Log,
    }

    impl Backend for Unopenable {
        type Joystick = Joystick;
        type Controller = Controller;

        fn num_devices(&self) -> usize {
            self.devices
        }

        fn open_controller(&mut self, _slot: usize) -> Result<Controller, Error> {
            Err(Error::NoMapping)
        }

        fn open_joystick(&mut self, slot: usize) -> Result<Joystick, Error> {
            Err(Error::InvalidSlot(slot))
        }

        fn add_mappings_from_file(&mut self, path: &Path) -> io::Result<usize> {
            self.log
                .borrow_mut()
                .push(format!("load {}", path.display()));
            Err(io::Error::new(io::ErrorKind::NotFound, "no such file"))
        }
    }

    fn config(args: &[&str], mapping_file: Option<&str>) -> Config {
        let args = args.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        Config::new(args, |key| {
            if key == MAPPING_FILE_VAR {
                mapping_file.map(str::to_owned)
            } else {
                None
            }
        })
    }

    fn run_with(config: &Config, devices: usize, log: &Log) -> (ExitCode, String) {
        let mut out = Vec::new();
        let code = run(
            config,
            |_| {
                Ok(Unopenable {
                    devices,
                    log: log.clone(),
                })
            },
            || {
                log.borrow_mut().push("enumerate".to_owned());
                vec![0]
            },
            |i| format!("node{}", i),
            &mut out,
        )
        .unwrap();

        (code, String::from_utf8(out).unwrap())
    }

    #[test]
    fn init_failure_exits_with_failure() {
        let enumerated = RefCell::new(false);
        let mut out = Vec::new();

        let code = run(
            &config(&["-v"], Some("/tmp/mappings.txt")),
            |_| Err::<Unopenable, _>(Error::NotSupported),
            || {
                *enumerated.borrow_mut() = true;
                Vec::new()
            },
            |_| String::new(),
            &mut out,
        )
        .unwrap();

        assert_eq!(code, ExitCode::FAILURE);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Failed to initialize input subsystem: platform is not supported\n"
        );
        assert!(!*enumerated.borrow());
    }

    #[test]
    fn mappings_loaded_before_enumeration() {
        let log = Log::default();
        let (code, out) = run_with(&config(&["--verbose"], Some("/tmp/mappings.txt")), 1, &log);

        assert_eq!(code, ExitCode::SUCCESS);
        assert_eq!(
            *log.borrow(),
            vec!["load /tmp/mappings.txt".to_owned(), "enumerate".to_owned()]
        );
        assert!(out.starts_with("Loading mappings from /tmp/mappings.txt\n"));
        assert!(out.ends_with("Could not open joystick 0: there is no device at index 0\n"));
    }

    #[test]
    fn loading_message_only_in_verbose_mode() {
        let log = Log::default();
        let (code, out) = run_with(&config(&[], Some("/tmp/mappings.txt")), 1, &log);

        assert_eq!(code, ExitCode::SUCCESS);
        assert_eq!(log.borrow().len(), 2);
        assert!(!out.contains("Loading mappings"));
    }

    #[test]
    fn no_mapping_file() {
        let log = Log::default();
        let (code, out) = run_with(&config(&["-m"], None), 0, &log);

        assert_eq!(code, ExitCode::SUCCESS);
        assert_eq!(*log.borrow(), vec!["enumerate".to_owned()]);
        assert_eq!(out, "No joystick/gamepad detected.\n");
    }
}
