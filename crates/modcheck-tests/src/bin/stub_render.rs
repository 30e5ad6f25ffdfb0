//! stub-render: deterministic stand-in for the module player.
//!
//! Usage: `stub-render <module>`; writes `<module>.wav`.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use modcheck_tests::stub::{self, Directive, FAIL_EXIT_CODE};

fn main() -> ExitCode {
    let Some(input) = std::env::args_os().nth(1).map(PathBuf::from) else {
        eprintln!("usage: stub-render <module>");
        return ExitCode::from(64);
    };

    let data = match fs::read(&input) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("stub-render: cannot read {}: {}", input.display(), e);
            return ExitCode::from(66);
        }
    };

    let output = match Directive::of(&data) {
        Directive::Fail => {
            eprintln!("stub-render: refusing to render {}", input.display());
            return ExitCode::from(FAIL_EXIT_CODE);
        }
        Directive::NoOutput => return ExitCode::SUCCESS,
        Directive::Hang => {
            thread::sleep(Duration::from_secs(60));
            return ExitCode::SUCCESS;
        }
        Directive::Raw(bytes) => bytes,
        Directive::Render => match stub::render_wav(&data) {
            Ok(wav) => wav,
            Err(e) => {
                eprintln!("stub-render: {}", e);
                return ExitCode::from(70);
            }
        },
    };

    let mut path = input.into_os_string();
    path.push(".wav");
    let path = PathBuf::from(path);
    if let Err(e) = fs::write(&path, output) {
        eprintln!("stub-render: cannot write {}: {}", path.display(), e);
        return ExitCode::from(73);
    }
    ExitCode::SUCCESS
}
