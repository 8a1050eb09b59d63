fn main() {
    if let Err(e) = daylog::cli::run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}
