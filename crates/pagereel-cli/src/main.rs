#![forbid(unsafe_code)]

fn main() {
    if let Err(error) = pagereel_cli::run_from_env() {
        eprintln!("pagereel: {error}");
        std::process::exit(error.exit_code());
    }
}
