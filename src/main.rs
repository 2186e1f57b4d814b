fn main() {
    if let Err(err) = mergebench::cli::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
