fn main() {
    if let Err(error) = favicon::cli::run_cli() {
        eprintln!("Error: {:#}", error);
        std::process::exit(1);
    }
}
