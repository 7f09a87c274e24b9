mod cli;
mod render;

fn main() {
    if let Err(err) = cli::run() {
        eprintln!("application error: {err}");
        std::process::exit(err.exit_code());
    }
}
